pub mod auth_service;
pub mod generation_service;
pub mod geocoding_service;
pub mod itinerary_parser;
pub mod itinerary_service;
pub mod reorder;
pub mod schedule;
pub mod tiktok_service;
