use bson::{doc, oid::ObjectId, DateTime};
use futures::TryStreamExt;
use std::error::Error;
use std::fmt;

use crate::db::mongo::Store;
use crate::models::day::DayPlan;
use crate::models::itinerary::{Coordinates, DayInput, DayNotes, Itinerary, ItineraryItem};
use crate::services::itinerary_parser::extract_activities;

/// A parsed itinerary ready to be written.
#[derive(Debug, Clone)]
pub struct NewItinerary {
    pub title: String,
    pub days: Vec<DayNotes>,
    pub extracted_activities: usize,
}

pub fn itinerary_title(title: Option<&str>, destinations: &[String]) -> String {
    match title.map(str::trim).filter(|t| !t.is_empty()) {
        Some(title) => title.to_string(),
        None if destinations.is_empty() => "Trip to Unknown".to_string(),
        None => format!("Trip to {}", destinations.join(", ")),
    }
}

/// Builds the notes of every day, extracting activities from each day's
/// content. Days without a single activity keep only their raw content.
pub fn prepare_itinerary(
    title: Option<&str>,
    days: &[DayInput],
    destinations: &[String],
    preferences: &[String],
    coordinates: Coordinates,
) -> NewItinerary {
    let mut extracted_activities = 0;

    let days = days
        .iter()
        .enumerate()
        .map(|(index, day)| {
            let content = day.content.clone().unwrap_or_default();
            let activities = extract_activities(&content);
            extracted_activities += activities.len();

            DayNotes {
                title: day
                    .title
                    .clone()
                    .filter(|t| !t.trim().is_empty())
                    .unwrap_or_else(|| format!("Day {}", index + 1)),
                content,
                destinations: destinations.to_vec(),
                preferences: preferences.to_vec(),
                coordinates: Some(coordinates),
                activities: if activities.is_empty() {
                    None
                } else {
                    Some(activities)
                },
            }
        })
        .collect();

    NewItinerary {
        title: itinerary_title(title, destinations),
        days,
        extracted_activities,
    }
}

#[derive(Debug)]
pub enum SaveItineraryError {
    EncodingError(serde_json::Error),
    DatabaseError(mongodb::error::Error),
}

impl fmt::Display for SaveItineraryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SaveItineraryError::EncodingError(err) => {
                write!(f, "Could not encode day notes: {}", err)
            }
            SaveItineraryError::DatabaseError(err) => write!(f, "Database error: {}", err),
        }
    }
}

impl Error for SaveItineraryError {}

impl From<serde_json::Error> for SaveItineraryError {
    fn from(err: serde_json::Error) -> Self {
        SaveItineraryError::EncodingError(err)
    }
}

impl From<mongodb::error::Error> for SaveItineraryError {
    fn from(err: mongodb::error::Error) -> Self {
        SaveItineraryError::DatabaseError(err)
    }
}

/// One item per day, `day` counted from 1, with the day's notes JSON-encoded.
pub fn day_items(
    itinerary_id: ObjectId,
    days: &[DayNotes],
    created_at: DateTime,
) -> Result<Vec<ItineraryItem>, serde_json::Error> {
    days.iter()
        .enumerate()
        .map(|(index, notes)| -> Result<ItineraryItem, serde_json::Error> {
            Ok(ItineraryItem {
                id: None,
                itinerary_id,
                destination_id: None,
                day: index as u32 + 1,
                position: index as u32,
                notes: serde_json::to_string(notes)?,
                created_at: Some(created_at),
            })
        })
        .collect()
}

/// Writes the itinerary and one item per day. Notes are encoded before
/// anything is written; if the items cannot be inserted the itinerary is
/// removed again so no empty trip is left behind.
pub async fn save_itinerary(
    store: &Store,
    new_itinerary: &NewItinerary,
    user_id: Option<ObjectId>,
) -> Result<Itinerary, SaveItineraryError> {
    let now = DateTime::now();
    let itinerary_id = ObjectId::new();
    let items = day_items(itinerary_id, &new_itinerary.days, now)?;

    let itinerary = Itinerary {
        id: Some(itinerary_id),
        title: new_itinerary.title.clone(),
        user_id,
        created_at: Some(now),
        updated_at: Some(now),
    };

    store.itineraries().insert_one(&itinerary).await?;

    if let Err(err) = store.itinerary_items().insert_many(&items).await {
        log::error!("Failed to insert items of itinerary {}: {}", itinerary_id, err);
        roll_back(store, itinerary_id).await;
        return Err(err.into());
    }

    Ok(itinerary)
}

async fn roll_back(store: &Store, itinerary_id: ObjectId) {
    if let Err(err) = store
        .itinerary_items()
        .delete_many(doc! { "itinerary_id": itinerary_id })
        .await
    {
        log::error!(
            "Rollback left items of itinerary {} behind: {}",
            itinerary_id,
            err
        );
    }
    if let Err(err) = store
        .itineraries()
        .delete_one(doc! { "_id": itinerary_id })
        .await
    {
        log::error!("Rollback left itinerary {} behind: {}", itinerary_id, err);
    }
}

pub async fn items_for_itinerary(
    store: &Store,
    itinerary_id: ObjectId,
) -> Result<Vec<ItineraryItem>, mongodb::error::Error> {
    store
        .itinerary_items()
        .find(doc! { "itinerary_id": itinerary_id })
        .sort(doc! { "day": 1, "position": 1 })
        .await?
        .try_collect()
        .await
}

pub async fn day_plans(
    store: &Store,
    itinerary_id: ObjectId,
) -> Result<Vec<DayPlan>, mongodb::error::Error> {
    let items = items_for_itinerary(store, itinerary_id).await?;
    Ok(items.iter().map(ItineraryItem::to_day_plan).collect())
}
