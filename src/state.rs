use crate::config::AppConfig;
use crate::db::mongo::Store;
use crate::services::generation_service::GenerationService;
use crate::services::geocoding_service::GeocodingService;

/// Everything handlers share, handed to actix as `web::Data<AppState>`.
#[derive(Clone)]
pub struct AppState {
    pub store: Store,
    pub config: AppConfig,
    pub geocoder: GeocodingService,
    /// `None` when no AI key is configured; generation routes answer 503.
    pub generation: Option<GenerationService>,
}

impl AppState {
    pub fn new(store: Store, config: AppConfig) -> Self {
        let geocoder = GeocodingService::new(config.mapbox_token.clone());
        let generation = match GenerationService::from_config(&config) {
            Ok(service) => Some(service),
            Err(e) => {
                log::warn!("Itinerary generation not available: {}", e);
                None
            }
        };

        Self {
            store,
            config,
            geocoder,
            generation,
        }
    }
}
