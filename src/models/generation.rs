use serde::{Deserialize, Serialize};

use crate::models::day::DayPlan;

#[derive(Debug, Deserialize, Clone)]
pub struct DestinationName {
    pub name: String,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct GenerateRequest {
    #[serde(default)]
    pub destinations: Vec<DestinationName>,
    #[serde(default)]
    pub preferences: String,
    pub days: Option<u32>,
    pub tiktok_tips: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct GenerateResponse {
    pub text: String,
    pub days: Vec<DayPlan>,
}

#[derive(Debug, Deserialize)]
pub struct ExtractTikTokRequest {
    #[serde(default)]
    pub urls: Vec<String>,
}

/// Destination and tips pulled from one video. Fields that could not be read
/// hold `COULD_NOT_EXTRACT`.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct ExtractedInfo {
    pub url: String,
    pub destination: String,
    pub tips: String,
}

pub const COULD_NOT_EXTRACT: &str = "Could not extract";

impl ExtractedInfo {
    pub fn failed(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            destination: COULD_NOT_EXTRACT.to_string(),
            tips: COULD_NOT_EXTRACT.to_string(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ExtractTikTokResponse {
    pub extracted: Vec<ExtractedInfo>,
    pub matched_preferences: Vec<String>,
}
