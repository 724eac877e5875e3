use actix_web::{web, HttpResponse, Responder};
use futures::TryStreamExt;
use bson::{doc, DateTime};
use serde::Deserialize;

use crate::models::destination::{Destination, NewDestination};
use crate::models::itinerary::Coordinates;
use crate::routes::{error_body, parse_object_id};
use crate::state::AppState;

#[derive(Deserialize)]
pub struct SearchParams {
    q: Option<String>,
}

/*
    GET /api/destinations
*/
pub async fn get_destinations(data: web::Data<AppState>) -> impl Responder {
    let cursor = data
        .store
        .destinations()
        .find(doc! {})
        .sort(doc! { "name": 1 })
        .await;

    match cursor {
        Ok(cursor) => match cursor.try_collect::<Vec<Destination>>().await {
            Ok(destinations) => HttpResponse::Ok().json(destinations),
            Err(err) => {
                log::error!("Failed to collect destinations: {:?}", err);
                HttpResponse::InternalServerError().json(error_body("Failed to fetch destinations"))
            }
        },
        Err(err) => {
            log::error!("Failed to find destinations: {:?}", err);
            HttpResponse::InternalServerError().json(error_body("Failed to fetch destinations"))
        }
    }
}

/*
    POST /api/destinations
    Pins a destination; a name without coordinates is geocoded.
*/
pub async fn create_destination(
    data: web::Data<AppState>,
    input: web::Json<NewDestination>,
) -> impl Responder {
    let input = input.into_inner();
    let name = input.name.trim().to_string();
    if name.is_empty() {
        return HttpResponse::BadRequest().json(error_body("Destination name is required"));
    }

    let coordinates = match (input.latitude, input.longitude) {
        (Some(latitude), Some(longitude)) => Coordinates {
            latitude,
            longitude,
        },
        _ => data.geocoder.geocode(&name).await,
    };

    let mut destination = Destination {
        id: None,
        name,
        description: input.description,
        latitude: coordinates.latitude,
        longitude: coordinates.longitude,
        image_url: input.image_url,
        created_at: Some(DateTime::now()),
    };

    match data.store.destinations().insert_one(&destination).await {
        Ok(result) => {
            destination.id = result.inserted_id.as_object_id();
            HttpResponse::Created().json(destination)
        }
        Err(err) => {
            log::error!("Failed to insert destination: {:?}", err);
            HttpResponse::InternalServerError().json(error_body("Failed to add destination"))
        }
    }
}

/*
    DELETE /api/destinations/{id}
*/
pub async fn delete_destination(
    path: web::Path<String>,
    data: web::Data<AppState>,
) -> impl Responder {
    let id = match parse_object_id(&path.into_inner()) {
        Ok(id) => id,
        Err(resp) => return resp,
    };

    // Items keep their text; only the pin goes away
    if let Err(err) = data
        .store
        .itinerary_items()
        .update_many(
            doc! { "destination_id": id },
            doc! { "$unset": { "destination_id": "" } },
        )
        .await
    {
        log::error!("Failed to detach items from destination {}: {:?}", id, err);
        return HttpResponse::InternalServerError()
            .json(error_body("Failed to delete destination"));
    }

    match data.store.destinations().delete_one(doc! { "_id": id }).await {
        Ok(result) if result.deleted_count == 0 => {
            HttpResponse::NotFound().json(error_body("Destination not found"))
        }
        Ok(_) => HttpResponse::Ok().json(serde_json::json!({ "success": true })),
        Err(err) => {
            log::error!("Failed to delete destination {}: {:?}", id, err);
            HttpResponse::InternalServerError().json(error_body("Failed to delete destination"))
        }
    }
}

/*
    GET /api/destinations/search?q=
*/
pub async fn search_places(
    data: web::Data<AppState>,
    params: web::Query<SearchParams>,
) -> impl Responder {
    let query = params.q.clone().unwrap_or_default();

    match data.geocoder.search_places(&query).await {
        Ok(places) => HttpResponse::Ok().json(places),
        Err(err) => {
            log::error!("Place search for \"{}\" failed: {}", query, err);
            HttpResponse::BadGateway().json(error_body("Place search failed"))
        }
    }
}
