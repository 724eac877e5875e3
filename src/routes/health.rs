use actix_web::{web, HttpResponse, Responder};
use serde::Serialize;
use std::collections::HashMap;
use std::env;

use crate::state::AppState;

#[derive(Serialize)]
struct HealthStatus {
    status: String,
    services: HashMap<String, ServiceStatus>,
    environment: String,
    version: String,
}

#[derive(Serialize, Clone)]
struct ServiceStatus {
    status: String,
    details: Option<String>,
}

impl ServiceStatus {
    fn ok() -> Self {
        Self {
            status: "ok".to_string(),
            details: None,
        }
    }

    fn unavailable(details: impl Into<String>) -> Self {
        Self {
            status: "unavailable".to_string(),
            details: Some(details.into()),
        }
    }
}

/*
    GET /api/health
*/
pub async fn ping() -> impl Responder {
    HttpResponse::Ok().json(serde_json::json!({ "status": "ok" }))
}

/*
    GET /health
    The store is required; missing map or AI keys only mark the service degraded.
*/
pub async fn health_check(data: web::Data<AppState>) -> impl Responder {
    let mut health = HealthStatus {
        status: "ok".to_string(),
        services: HashMap::new(),
        environment: env::var("RUST_ENV").unwrap_or("development".to_string()),
        version: env!("CARGO_PKG_VERSION").to_string(),
    };

    let mongo = match data.store.ping().await {
        Ok(()) => ServiceStatus::ok(),
        Err(err) => {
            log::warn!("MongoDB health check failed: {}", err);
            ServiceStatus::unavailable(err.to_string())
        }
    };
    let mapbox = match data.config.mapbox_token {
        Some(_) => ServiceStatus::ok(),
        None => ServiceStatus::unavailable("MAPBOX_TOKEN not set"),
    };
    let generation = match data.generation {
        Some(_) => ServiceStatus::ok(),
        None => ServiceStatus::unavailable("AI_API_KEY not set"),
    };

    if [&mongo, &mapbox, &generation]
        .iter()
        .any(|service| service.status != "ok")
    {
        health.status = "degraded".to_string();
    }

    health.services.insert("mongodb".to_string(), mongo);
    health.services.insert("mapbox".to_string(), mapbox);
    health.services.insert("generation".to_string(), generation);

    HttpResponse::Ok().json(health)
}
