use actix_web::{web, HttpResponse, Responder};
use futures::stream::{self, StreamExt};
use serde_json::json;
use std::convert::Infallible;

use crate::models::generation::{
    ExtractTikTokRequest, ExtractTikTokResponse, GenerateRequest, GenerateResponse,
};
use crate::routes::error_body;
use crate::services::generation_service::GenerationService;
use crate::services::itinerary_parser::parse_itinerary;
use crate::services::tiktok_service::{filter_tiktok_urls, matching_preferences, TikTokService};
use crate::state::AppState;

const GENERATION_FAILED: &str = "Failed to generate. Please try again.";

fn has_destination(request: &GenerateRequest) -> bool {
    request
        .destinations
        .iter()
        .any(|destination| !destination.name.trim().is_empty())
}

/// The configured generation client, or the response explaining why there
/// is none for this request.
fn generation_for(
    data: &AppState,
    request: &GenerateRequest,
) -> Result<GenerationService, HttpResponse> {
    if !has_destination(request) {
        return Err(
            HttpResponse::BadRequest().json(error_body("Please add at least one destination"))
        );
    }

    data.generation.clone().ok_or_else(|| {
        HttpResponse::ServiceUnavailable()
            .json(error_body("Itinerary generation is not configured"))
    })
}

/*
    POST /api/generate
*/
pub async fn generate(
    data: web::Data<AppState>,
    input: web::Json<GenerateRequest>,
) -> impl Responder {
    let request = input.into_inner();
    let generation = match generation_for(&data, &request) {
        Ok(generation) => generation,
        Err(resp) => return resp,
    };

    match generation.generate_itinerary(&request).await {
        Ok(text) => {
            let days = parse_itinerary(&text);
            log::info!("Generated itinerary with {} days", days.len());
            HttpResponse::Ok().json(GenerateResponse { text, days })
        }
        Err(err) => {
            log::error!("Itinerary generation failed: {}", err);
            HttpResponse::BadGateway().json(error_body(GENERATION_FAILED))
        }
    }
}

/// One server-sent event carrying a JSON payload.
pub fn sse_event(payload: &serde_json::Value) -> web::Bytes {
    web::Bytes::from(format!("data: {}\n\n", payload))
}

/*
    POST /api/generate/stream
    Server-sent events: `{"content": ...}` per piece of text, then
    `{"done": true, "text": ..., "days": [...]}`, or `{"error": ...}` if the
    model stops partway.
*/
pub async fn generate_stream(
    data: web::Data<AppState>,
    input: web::Json<GenerateRequest>,
) -> impl Responder {
    let request = input.into_inner();
    let generation = match generation_for(&data, &request) {
        Ok(generation) => generation,
        Err(resp) => return resp,
    };

    let pieces = match generation.stream_itinerary(&request).await {
        Ok(pieces) => pieces,
        Err(err) => {
            log::error!("Itinerary stream could not start: {}", err);
            return HttpResponse::BadGateway().json(error_body(GENERATION_FAILED));
        }
    };

    let events = stream::unfold(Some((pieces, String::new())), |state| async move {
        let (mut pieces, mut text) = state?;
        let event = match pieces.next().await {
            Some(Ok(piece)) => {
                let event = sse_event(&json!({ "content": piece }));
                text.push_str(&piece);
                return Some((Ok::<_, Infallible>(event), Some((pieces, text))));
            }
            Some(Err(err)) => {
                log::error!("Itinerary stream failed: {}", err);
                sse_event(&json!({ "error": GENERATION_FAILED }))
            }
            None => {
                let days = parse_itinerary(&text);
                log::info!("Streamed itinerary with {} days", days.len());
                sse_event(&json!({ "done": true, "text": text, "days": days }))
            }
        };
        Some((Ok(event), None))
    });

    HttpResponse::Ok()
        .content_type("text/event-stream")
        .insert_header(("Cache-Control", "no-cache"))
        .streaming(events)
}

/*
    POST /api/extract-tiktok
*/
pub async fn extract_tiktok(
    data: web::Data<AppState>,
    input: web::Json<ExtractTikTokRequest>,
) -> impl Responder {
    let urls = filter_tiktok_urls(&input.urls);
    if urls.is_empty() {
        return HttpResponse::BadRequest()
            .json(error_body("Please enter at least one TikTok URL"));
    }

    let generation = match &data.generation {
        Some(generation) => generation.clone(),
        None => {
            return HttpResponse::ServiceUnavailable()
                .json(error_body("TikTok extraction is not configured"))
        }
    };

    let extracted = TikTokService::new(generation).extract(&urls).await;
    let matched_preferences = matching_preferences(&extracted);

    HttpResponse::Ok().json(ExtractTikTokResponse {
        extracted,
        matched_preferences,
    })
}
