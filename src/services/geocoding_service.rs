//! Mapbox geocoding.
//!
//! Two uses: pinning a saved itinerary on the map (`geocode`, which never
//! fails and falls back to `DEFAULT_COORDINATES`) and the destination search
//! box (`search_places`).

use reqwest::Client;
use serde::Deserialize;
use std::error::Error;
use std::fmt;
use std::time::Duration;
use url::Url;

use crate::models::destination::Place;
use crate::models::itinerary::{Coordinates, DEFAULT_COORDINATES};

const MAPBOX_GEOCODING_URL: &str = "https://api.mapbox.com/geocoding/v5/mapbox.places";
const SEARCH_TYPES: &str = "place,locality,region,country";
const SEARCH_LIMIT: u32 = 5;

#[derive(Debug, Deserialize)]
struct MapboxResponse {
    #[serde(default)]
    features: Vec<MapboxFeature>,
}

#[derive(Debug, Deserialize)]
struct MapboxFeature {
    id: String,
    place_name: String,
    text: String,
    center: (f64, f64), // longitude, latitude
}

#[derive(Debug)]
pub enum GeocodingError {
    MissingToken,
    UrlError(url::ParseError),
    HttpError(reqwest::Error),
    ApiError(u16),
}

impl fmt::Display for GeocodingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GeocodingError::MissingToken => write!(f, "MAPBOX_TOKEN not set"),
            GeocodingError::UrlError(err) => write!(f, "URL error: {}", err),
            GeocodingError::HttpError(err) => write!(f, "HTTP error: {}", err),
            GeocodingError::ApiError(status) => write!(f, "Mapbox returned status {}", status),
        }
    }
}

impl Error for GeocodingError {}

impl From<reqwest::Error> for GeocodingError {
    fn from(err: reqwest::Error) -> Self {
        GeocodingError::HttpError(err)
    }
}

impl From<url::ParseError> for GeocodingError {
    fn from(err: url::ParseError) -> Self {
        GeocodingError::UrlError(err)
    }
}

#[derive(Clone)]
pub struct GeocodingService {
    client: Client,
    token: Option<String>,
    base_url: String,
}

impl GeocodingService {
    pub fn new(token: Option<String>) -> Self {
        Self::with_base_url(token, MAPBOX_GEOCODING_URL)
    }

    pub fn with_base_url(token: Option<String>, base_url: impl Into<String>) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(10))
            .build()
            .unwrap_or_default();

        Self {
            client,
            token,
            base_url: base_url.into(),
        }
    }

    fn query_url(&self, query: &str, params: &[(&str, String)]) -> Result<Url, GeocodingError> {
        let token = self.token.as_deref().ok_or(GeocodingError::MissingToken)?;
        let mut url = Url::parse(&self.base_url)?;
        url.path_segments_mut()
            .map_err(|_| GeocodingError::UrlError(url::ParseError::RelativeUrlWithCannotBeABaseBase))?
            .push(&format!("{}.json", query));
        {
            let mut pairs = url.query_pairs_mut();
            pairs.append_pair("access_token", token);
            for (key, value) in params {
                pairs.append_pair(key, value);
            }
        }
        Ok(url)
    }

    async fn features(
        &self,
        query: &str,
        params: &[(&str, String)],
    ) -> Result<Vec<MapboxFeature>, GeocodingError> {
        let url = self.query_url(query, params)?;
        let response = self.client.get(url).send().await?;

        if !response.status().is_success() {
            return Err(GeocodingError::ApiError(response.status().as_u16()));
        }

        let body: MapboxResponse = response.json().await?;
        Ok(body.features)
    }

    /// Best-effort coordinates for a place name.
    pub async fn geocode(&self, name: &str) -> Coordinates {
        if name.trim().is_empty() {
            log::warn!("No destination name provided for geocoding");
            return DEFAULT_COORDINATES;
        }

        match self.features(name, &[("limit", "1".to_string())]).await {
            Ok(features) => match features.first() {
                Some(feature) => {
                    let (longitude, latitude) = feature.center;
                    log::info!("Geocoded \"{}\" to ({}, {})", name, latitude, longitude);
                    Coordinates {
                        latitude,
                        longitude,
                    }
                }
                None => {
                    log::warn!("No features found for \"{}\"", name);
                    DEFAULT_COORDINATES
                }
            },
            Err(err) => {
                log::warn!("Geocoding \"{}\" failed: {}", name, err);
                DEFAULT_COORDINATES
            }
        }
    }

    /// Candidate places for the destination search box.
    pub async fn search_places(&self, query: &str) -> Result<Vec<Place>, GeocodingError> {
        if query.trim().is_empty() || self.token.is_none() {
            return Ok(Vec::new());
        }

        let features = self
            .features(
                query.trim(),
                &[
                    ("types", SEARCH_TYPES.to_string()),
                    ("limit", SEARCH_LIMIT.to_string()),
                ],
            )
            .await?;

        Ok(features
            .into_iter()
            .map(|f| Place {
                id: f.id,
                name: f.place_name,
                short_name: f.text,
                coordinates: f.center,
            })
            .collect())
    }
}
