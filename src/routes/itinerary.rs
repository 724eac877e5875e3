use actix_web::{web, HttpResponse, Responder};
use futures::TryStreamExt;
use bson::doc;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::middleware::auth_context::AuthenticatedUser;
use crate::models::day::DayPlan;
use crate::models::destination::{Destination, ItineraryDestination};
use crate::models::itinerary::{
    CreateItineraryRequest, CreateItineraryResponse, Itinerary, DEFAULT_COORDINATES,
};
use crate::routes::{error_body, parse_object_id};
use crate::services::itinerary_service::{
    day_plans, items_for_itinerary, prepare_itinerary, save_itinerary,
};
use crate::services::reorder::{move_activity, ActivityRef, DropPosition};
use crate::state::AppState;

const LIST_LIMIT: i64 = 50;

/*
    GET /api/itineraries
*/
pub async fn get_all(data: web::Data<AppState>) -> impl Responder {
    let cursor = data
        .store
        .itineraries()
        .find(doc! {})
        .sort(doc! { "created_at": -1 })
        .limit(LIST_LIMIT)
        .await;

    match cursor {
        Ok(cursor) => match cursor.try_collect::<Vec<Itinerary>>().await {
            Ok(itineraries) => HttpResponse::Ok().json(itineraries),
            Err(err) => {
                log::error!("Failed to collect itineraries: {:?}", err);
                HttpResponse::InternalServerError().json(error_body("Failed to fetch itineraries"))
            }
        },
        Err(err) => {
            log::error!("Failed to retrieve itineraries: {:?}", err);
            HttpResponse::InternalServerError().json(error_body("Failed to fetch itineraries"))
        }
    }
}

/*
    GET /api/itineraries/{id}
*/
pub async fn get_by_id(path: web::Path<String>, data: web::Data<AppState>) -> impl Responder {
    let id = match parse_object_id(&path.into_inner()) {
        Ok(id) => id,
        Err(resp) => return resp,
    };

    match data.store.itineraries().find_one(doc! { "_id": id }).await {
        Ok(Some(itinerary)) => HttpResponse::Ok().json(itinerary),
        Ok(None) => HttpResponse::NotFound().json(error_body("Itinerary not found")),
        Err(err) => {
            log::error!("Failed to retrieve itinerary {}: {:?}", id, err);
            HttpResponse::InternalServerError().json(error_body("Failed to fetch itinerary"))
        }
    }
}

/*
    GET /api/itineraries/{id}/days
*/
pub async fn get_days(path: web::Path<String>, data: web::Data<AppState>) -> impl Responder {
    let id = match parse_object_id(&path.into_inner()) {
        Ok(id) => id,
        Err(resp) => return resp,
    };

    match day_plans(&data.store, id).await {
        Ok(days) => HttpResponse::Ok().json(days),
        Err(err) => {
            log::error!("Failed to load days of itinerary {}: {:?}", id, err);
            HttpResponse::InternalServerError().json(error_body("Failed to fetch itinerary days"))
        }
    }
}

/*
    GET /api/itineraries/{id}/destinations
    Every destination, flagged when this itinerary has an item pointing at it.
*/
pub async fn get_destinations(
    path: web::Path<String>,
    data: web::Data<AppState>,
) -> impl Responder {
    let id = match parse_object_id(&path.into_inner()) {
        Ok(id) => id,
        Err(resp) => return resp,
    };

    let items = match items_for_itinerary(&data.store, id).await {
        Ok(items) => items,
        Err(err) => {
            log::error!("Failed to load items of itinerary {}: {:?}", id, err);
            return HttpResponse::InternalServerError()
                .json(error_body("Failed to fetch destinations"));
        }
    };
    let used: HashSet<_> = items.iter().filter_map(|item| item.destination_id).collect();

    let cursor = data
        .store
        .destinations()
        .find(doc! {})
        .sort(doc! { "name": 1 })
        .await;

    match cursor {
        Ok(cursor) => match cursor.try_collect::<Vec<Destination>>().await {
            Ok(destinations) => {
                let listed: Vec<ItineraryDestination> = destinations
                    .into_iter()
                    .map(|destination| ItineraryDestination {
                        in_itinerary: destination.id.is_some_and(|d| used.contains(&d)),
                        destination,
                    })
                    .collect();
                HttpResponse::Ok().json(listed)
            }
            Err(err) => {
                log::error!("Failed to collect destinations: {:?}", err);
                HttpResponse::InternalServerError().json(error_body("Failed to fetch destinations"))
            }
        },
        Err(err) => {
            log::error!("Failed to retrieve destinations: {:?}", err);
            HttpResponse::InternalServerError().json(error_body("Failed to fetch destinations"))
        }
    }
}

/*
    POST /api/itineraries
    Saves generated days, one item per day, with activities extracted from
    each day's text.
*/
pub async fn create(
    data: web::Data<AppState>,
    user: Option<AuthenticatedUser>,
    input: web::Json<CreateItineraryRequest>,
) -> impl Responder {
    let request = input.into_inner();

    let days = match request.itinerary.as_deref() {
        Some(days) if !days.is_empty() => days,
        _ => return HttpResponse::BadRequest().json(error_body("Itinerary items are required")),
    };
    let destinations = request.destinations.clone().unwrap_or_default();

    let coordinates = match destinations.first() {
        Some(first) => data.geocoder.geocode(first).await,
        None => DEFAULT_COORDINATES,
    };

    let prepared = prepare_itinerary(
        request.title.as_deref(),
        days,
        &destinations,
        &request.preferences,
        coordinates,
    );
    let user_id = user.and_then(|u| bson::oid::ObjectId::parse_str(&u.user_id).ok());

    match save_itinerary(&data.store, &prepared, user_id).await {
        Ok(itinerary) => {
            log::info!(
                "Saved itinerary {:?} with {} days and {} activities",
                itinerary.id,
                prepared.days.len(),
                prepared.extracted_activities
            );
            HttpResponse::Created().json(CreateItineraryResponse {
                success: true,
                message: format!(
                    "Itinerary saved with {} individual activities organized under {} days!",
                    prepared.extracted_activities,
                    prepared.days.len()
                ),
                extracted_activities: prepared.extracted_activities,
                itinerary,
            })
        }
        Err(err) => {
            log::error!("Failed to save itinerary: {:?}", err);
            HttpResponse::InternalServerError().json(error_body("Failed to save itinerary"))
        }
    }
}

/*
    DELETE /api/itineraries/{id}
*/
pub async fn delete(path: web::Path<String>, data: web::Data<AppState>) -> impl Responder {
    let id = match parse_object_id(&path.into_inner()) {
        Ok(id) => id,
        Err(resp) => return resp,
    };

    let itinerary = match data.store.itineraries().find_one(doc! { "_id": id }).await {
        Ok(Some(itinerary)) => itinerary,
        Ok(None) => return HttpResponse::NotFound().json(error_body("Itinerary not found")),
        Err(err) => {
            log::error!("Failed to look up itinerary {}: {:?}", id, err);
            return HttpResponse::InternalServerError()
                .json(error_body("Failed to delete itinerary"));
        }
    };

    if let Err(err) = data
        .store
        .itinerary_items()
        .delete_many(doc! { "itinerary_id": id })
        .await
    {
        log::error!("Failed to delete items of itinerary {}: {:?}", id, err);
        return HttpResponse::InternalServerError().json(error_body("Failed to delete itinerary"));
    }

    match data.store.itineraries().delete_one(doc! { "_id": id }).await {
        Ok(result) if result.deleted_count == 0 => {
            HttpResponse::NotFound().json(error_body("Itinerary not found"))
        }
        Ok(_) => HttpResponse::Ok().json(serde_json::json!({
            "success": true,
            "message": "Itinerary deleted successfully",
            "deleted": itinerary,
        })),
        Err(err) => {
            log::error!("Failed to delete itinerary {}: {:?}", id, err);
            HttpResponse::InternalServerError().json(error_body("Failed to delete itinerary"))
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct ReorderRequest {
    pub days: Vec<DayPlan>,
    pub source: ActivityRef,
    pub target: ActivityRef,
    pub position: DropPosition,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ReorderResponse {
    pub moved: bool,
    pub days: Vec<DayPlan>,
}

/*
    POST /api/itineraries/reorder
    Applies one drag-and-drop move to the days the client sends and returns
    them with recomputed times. Nothing is stored.
*/
pub async fn reorder(input: web::Json<ReorderRequest>) -> impl Responder {
    let ReorderRequest {
        mut days,
        source,
        target,
        position,
    } = input.into_inner();

    let source_exists = days
        .get(source.day_index)
        .is_some_and(|day| source.activity_index < day.activities.len());
    // landing just past the last activity is allowed
    let target_exists = days.get(target.day_index).is_some_and(|day| {
        target
            .activity_index
            .checked_add(position.index_offset())
            .is_some_and(|index| index <= day.activities.len())
    });

    if !source_exists || !target_exists {
        return HttpResponse::BadRequest().json(error_body("Activity index out of range"));
    }

    let moved = move_activity(&mut days, source, target, position);
    HttpResponse::Ok().json(ReorderResponse { moved, days })
}
