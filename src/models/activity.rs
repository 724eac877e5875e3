use serde::{Deserialize, Deserializer, Serialize};

#[derive(Debug, Serialize, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "lowercase")]
pub enum ActivityCategory {
    Restaurant,
    Museum,
    Park,
    Shopping,
    Nightlife,
    Hotel,
    #[default]
    Activity,
}

impl ActivityCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            ActivityCategory::Restaurant => "restaurant",
            ActivityCategory::Museum => "museum",
            ActivityCategory::Park => "park",
            ActivityCategory::Shopping => "shopping",
            ActivityCategory::Nightlife => "nightlife",
            ActivityCategory::Hotel => "hotel",
            ActivityCategory::Activity => "activity",
        }
    }

    /// Unknown names fall back to `Activity` instead of being rejected.
    pub fn from_name(name: &str) -> Self {
        match name.trim().to_lowercase().as_str() {
            "restaurant" => ActivityCategory::Restaurant,
            "museum" => ActivityCategory::Museum,
            "park" => ActivityCategory::Park,
            "shopping" => ActivityCategory::Shopping,
            "nightlife" => ActivityCategory::Nightlife,
            "hotel" => ActivityCategory::Hotel,
            _ => ActivityCategory::Activity,
        }
    }
}

// Stored notes may carry categories written by older clients, or none at all
impl<'de> Deserialize<'de> for ActivityCategory {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value: Option<serde_json::Value> = Option::deserialize(deserializer)?;
        match value {
            Some(serde_json::Value::String(name)) => Ok(ActivityCategory::from_name(&name)),
            _ => Ok(ActivityCategory::Activity),
        }
    }
}

/// One stop within a day. Field names match the JSON persisted in item notes.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
pub struct Activity {
    #[serde(default)]
    pub time: String,
    #[serde(rename = "title", default)]
    pub location: String,
    #[serde(rename = "content", default)]
    pub description: String,
    #[serde(rename = "type", default)]
    pub category: ActivityCategory,
}

impl Activity {
    pub fn new(
        time: impl Into<String>,
        location: impl Into<String>,
        description: impl Into<String>,
        category: ActivityCategory,
    ) -> Self {
        Self {
            time: time.into(),
            location: location.into(),
            description: description.into(),
            category,
        }
    }
}
