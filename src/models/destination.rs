use bson::{oid::ObjectId, DateTime};
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Destination {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub name: String,
    pub description: Option<String>,
    pub latitude: f64,
    pub longitude: f64,
    pub image_url: Option<String>,
    pub created_at: Option<DateTime>,
}

/// A destination as listed for one itinerary.
#[derive(Debug, Serialize, Clone)]
pub struct ItineraryDestination {
    #[serde(flatten)]
    pub destination: Destination,
    pub in_itinerary: bool,
}

#[derive(Debug, Deserialize)]
pub struct NewDestination {
    pub name: String,
    pub description: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub image_url: Option<String>,
}

/// One hit of a map place search.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Place {
    pub id: String,
    pub name: String,
    pub short_name: String,
    /// `[longitude, latitude]`, as the map widget expects.
    pub coordinates: (f64, f64),
}
