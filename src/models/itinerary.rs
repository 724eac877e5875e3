use bson::{oid::ObjectId, DateTime};
use serde::{Deserialize, Deserializer, Serialize};

use crate::models::activity::Activity;
use crate::models::day::DayPlan;

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct Itinerary {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<ObjectId>,
    pub created_at: Option<DateTime>,
    pub updated_at: Option<DateTime>,
}

/// A stored row of an itinerary. Generated itineraries keep one item per day
/// with the day's text and activities JSON-encoded in `notes`.
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ItineraryItem {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub itinerary_id: ObjectId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub destination_id: Option<ObjectId>,
    pub day: u32,
    pub position: u32,
    #[serde(default)]
    pub notes: String,
    pub created_at: Option<DateTime>,
}

impl ItineraryItem {
    /// Decodes the item into a day. Notes that are not a `DayNotes` document are
    /// shown as the day's free text.
    pub fn to_day_plan(&self) -> DayPlan {
        let fallback_title = format!("Day {}", self.day);
        if self.notes.is_empty() {
            return DayPlan::new(fallback_title, "");
        }

        match serde_json::from_str::<DayNotes>(&self.notes) {
            Ok(notes) => DayPlan {
                title: if notes.title.is_empty() {
                    fallback_title
                } else {
                    notes.title
                },
                content: notes.content,
                activities: notes.activities.unwrap_or_default(),
            },
            Err(err) => {
                log::debug!("Item {:?} notes are not day JSON: {}", self.id, err);
                DayPlan::new(fallback_title, self.notes.clone())
            }
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

/// Default map position when geocoding has nothing better (New York City).
pub const DEFAULT_COORDINATES: Coordinates = Coordinates {
    latitude: 40.7128,
    longitude: -74.0060,
};

#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct DayNotes {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub destinations: Vec<String>,
    #[serde(default, deserialize_with = "deserialize_preferences")]
    pub preferences: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub coordinates: Option<Coordinates>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub activities: Option<Vec<Activity>>,
}

// Clients send preferences either as a list or as one comma-joined string
pub fn deserialize_preferences<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value: Option<serde_json::Value> = Option::deserialize(deserializer)?;
    match value {
        Some(serde_json::Value::String(text)) => Ok(text
            .split(',')
            .map(|p| p.trim())
            .filter(|p| !p.is_empty())
            .map(String::from)
            .collect()),
        Some(serde_json::Value::Array(values)) => Ok(values
            .into_iter()
            .filter_map(|v| v.as_str().map(String::from))
            .collect()),
        _ => Ok(Vec::new()),
    }
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct DayInput {
    pub title: Option<String>,
    pub content: Option<String>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct CreateItineraryRequest {
    pub title: Option<String>,
    pub destinations: Option<Vec<String>>,
    #[serde(default, deserialize_with = "deserialize_preferences")]
    pub preferences: Vec<String>,
    pub days: Option<u32>,
    pub itinerary: Option<Vec<DayInput>>,
}

#[derive(Debug, Serialize)]
pub struct CreateItineraryResponse {
    pub success: bool,
    pub itinerary: Itinerary,
    pub extracted_activities: usize,
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::activity::ActivityCategory;
    use serde_json::json;

    fn item_with_notes(notes: &str) -> ItineraryItem {
        ItineraryItem {
            id: None,
            itinerary_id: ObjectId::new(),
            destination_id: None,
            day: 2,
            position: 1,
            notes: notes.to_string(),
            created_at: None,
        }
    }

    #[test]
    fn test_item_notes_decode_into_day() {
        let notes = json!({
            "title": "Day 2",
            "content": "9:00 AM - Ueno Park: walk",
            "activities": [
                { "title": "Ueno Park", "content": "walk", "type": "park", "time": "9:00 AM" }
            ]
        });
        let day = item_with_notes(&notes.to_string()).to_day_plan();
        assert_eq!(day.title, "Day 2");
        assert_eq!(day.activities.len(), 1);
        assert_eq!(day.activities[0].category, ActivityCategory::Park);
    }

    #[test]
    fn test_plain_text_notes_become_content() {
        let day = item_with_notes("🍽️ Restaurant: Ichiran").to_day_plan();
        assert_eq!(day.title, "Day 2");
        assert_eq!(day.content, "🍽️ Restaurant: Ichiran");
        assert!(day.activities.is_empty());
    }

    #[test]
    fn test_preferences_accept_string_or_list() {
        let request: CreateItineraryRequest = serde_json::from_value(json!({
            "preferences": "Food, Museums ,",
            "itinerary": []
        }))
        .unwrap();
        assert_eq!(request.preferences, vec!["Food", "Museums"]);

        let request: CreateItineraryRequest = serde_json::from_value(json!({
            "preferences": ["hiking"]
        }))
        .unwrap();
        assert_eq!(request.preferences, vec!["hiking"]);
    }
}
