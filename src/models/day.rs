use serde::{Deserialize, Serialize};

use crate::models::activity::Activity;

/// One day of an itinerary: its heading, the raw text under it, and the
/// activities extracted from that text.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq, Default)]
pub struct DayPlan {
    pub title: String,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub activities: Vec<Activity>,
}

impl DayPlan {
    pub fn new(title: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            content: content.into(),
            activities: Vec::new(),
        }
    }
}
