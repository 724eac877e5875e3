use actix_web::HttpResponse;
use bson::oid::ObjectId;
use serde_json::json;

pub mod auth;
pub mod destinations;
pub mod generate;
pub mod health;
pub mod itinerary;
pub mod itinerary_items;

pub(crate) fn error_body(message: &str) -> serde_json::Value {
    json!({ "error": message })
}

pub(crate) fn parse_object_id(id: &str) -> Result<ObjectId, HttpResponse> {
    ObjectId::parse_str(id).map_err(|_| HttpResponse::BadRequest().json(error_body("Invalid ID")))
}
