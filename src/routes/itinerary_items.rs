use actix_web::{web, HttpResponse, Responder};
use futures::TryStreamExt;
use bson::{doc, oid::ObjectId, DateTime, Document};
use serde::Deserialize;

use crate::models::itinerary::ItineraryItem;
use crate::routes::{error_body, parse_object_id};
use crate::state::AppState;

const DEFAULT_POSITION: u32 = 100;

#[derive(Deserialize)]
pub struct ItemQuery {
    itinerary_id: Option<String>,
    destination_id: Option<String>,
}

#[derive(Deserialize)]
pub struct NewItem {
    itinerary_id: String,
    destination_id: Option<String>,
    day: Option<u32>,
    position: Option<u32>,
    notes: Option<String>,
}

#[derive(Deserialize)]
pub struct ItemUpdate {
    notes: Option<String>,
    day: Option<u32>,
    position: Option<u32>,
}

fn item_filter(query: &ItemQuery) -> Result<Document, HttpResponse> {
    let mut filter = doc! {};
    if let Some(id) = query.itinerary_id.as_deref().filter(|id| !id.is_empty()) {
        filter.insert("itinerary_id", parse_object_id(id)?);
    }
    if let Some(id) = query.destination_id.as_deref().filter(|id| !id.is_empty()) {
        filter.insert("destination_id", parse_object_id(id)?);
    }
    Ok(filter)
}

/*
    GET /api/itinerary-items?itinerary_id=&destination_id=
*/
pub async fn get_items(
    data: web::Data<AppState>,
    params: web::Query<ItemQuery>,
) -> impl Responder {
    let filter = match item_filter(&params) {
        Ok(filter) => filter,
        Err(resp) => return resp,
    };

    let cursor = data
        .store
        .itinerary_items()
        .find(filter)
        .sort(doc! { "day": 1, "position": 1 })
        .await;

    match cursor {
        Ok(cursor) => match cursor.try_collect::<Vec<ItineraryItem>>().await {
            Ok(items) => HttpResponse::Ok().json(items),
            Err(err) => {
                log::error!("Failed to collect itinerary items: {:?}", err);
                HttpResponse::InternalServerError().json(error_body("Failed to fetch items"))
            }
        },
        Err(err) => {
            log::error!("Failed to find itinerary items: {:?}", err);
            HttpResponse::InternalServerError().json(error_body("Failed to fetch items"))
        }
    }
}

/*
    POST /api/itinerary-items
*/
pub async fn create_item(data: web::Data<AppState>, input: web::Json<NewItem>) -> impl Responder {
    let input = input.into_inner();

    let itinerary_id = match parse_object_id(&input.itinerary_id) {
        Ok(id) => id,
        Err(resp) => return resp,
    };
    let destination_id: Option<ObjectId> = match input.destination_id.as_deref() {
        Some(id) if !id.is_empty() => match parse_object_id(id) {
            Ok(id) => Some(id),
            Err(resp) => return resp,
        },
        _ => None,
    };

    match data
        .store
        .itineraries()
        .find_one(doc! { "_id": itinerary_id })
        .await
    {
        Ok(Some(_)) => {}
        Ok(None) => return HttpResponse::NotFound().json(error_body("Itinerary not found")),
        Err(err) => {
            log::error!("Failed to look up itinerary {}: {:?}", itinerary_id, err);
            return HttpResponse::InternalServerError().json(error_body("Failed to add item"));
        }
    }

    let mut item = ItineraryItem {
        id: None,
        itinerary_id,
        destination_id,
        day: input.day.unwrap_or(1).max(1),
        position: input.position.unwrap_or(DEFAULT_POSITION),
        notes: input.notes.unwrap_or_default(),
        created_at: Some(DateTime::now()),
    };

    match data.store.itinerary_items().insert_one(&item).await {
        Ok(result) => {
            item.id = result.inserted_id.as_object_id();
            HttpResponse::Created().json(item)
        }
        Err(err) => {
            log::error!("Failed to insert itinerary item: {:?}", err);
            HttpResponse::InternalServerError().json(error_body("Failed to add item"))
        }
    }
}

/*
    PUT /api/itinerary-items/{id}
    Saving an edited day writes its notes back here; last write wins.
*/
pub async fn update_item(
    path: web::Path<String>,
    data: web::Data<AppState>,
    input: web::Json<ItemUpdate>,
) -> impl Responder {
    let id = match parse_object_id(&path.into_inner()) {
        Ok(id) => id,
        Err(resp) => return resp,
    };

    let mut set = Document::new();
    if let Some(notes) = &input.notes {
        set.insert("notes", notes.as_str());
    }
    if let Some(day) = input.day {
        set.insert("day", day.max(1));
    }
    if let Some(position) = input.position {
        set.insert("position", position);
    }
    if set.is_empty() {
        return HttpResponse::BadRequest().json(error_body("Nothing to update"));
    }

    let items = data.store.itinerary_items();
    match items.update_one(doc! { "_id": id }, doc! { "$set": set }).await {
        Ok(result) if result.matched_count == 0 => {
            HttpResponse::NotFound().json(error_body("Item not found"))
        }
        Ok(_) => match items.find_one(doc! { "_id": id }).await {
            Ok(Some(item)) => HttpResponse::Ok().json(item),
            Ok(None) => HttpResponse::NotFound().json(error_body("Item not found")),
            Err(err) => {
                log::error!("Failed to reload item {}: {:?}", id, err);
                HttpResponse::InternalServerError().json(error_body("Failed to update item"))
            }
        },
        Err(err) => {
            log::error!("Failed to update item {}: {:?}", id, err);
            HttpResponse::InternalServerError().json(error_body("Failed to update item"))
        }
    }
}

/*
    DELETE /api/itinerary-items/{id}
*/
pub async fn delete_item(path: web::Path<String>, data: web::Data<AppState>) -> impl Responder {
    let id = match parse_object_id(&path.into_inner()) {
        Ok(id) => id,
        Err(resp) => return resp,
    };

    match data
        .store
        .itinerary_items()
        .delete_one(doc! { "_id": id })
        .await
    {
        Ok(result) if result.deleted_count == 0 => {
            HttpResponse::NotFound().json(error_body("Item not found"))
        }
        Ok(_) => HttpResponse::Ok().json(serde_json::json!({ "success": true })),
        Err(err) => {
            log::error!("Failed to delete item {}: {:?}", id, err);
            HttpResponse::InternalServerError().json(error_body("Failed to delete item"))
        }
    }
}
