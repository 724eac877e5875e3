mod common;

use actix_web::{http::header, test, App};
use serde_json::{json, Value};

use common::TestApp;
use trip_planner_api::middleware::cors::build_cors;

#[actix_rt::test]
async fn test_health_ping() {
    let test_app = TestApp::new().await;
    let app = test::init_service(test_app.create_app()).await;

    let req = test::TestRequest::get().uri("/api/health").to_request();
    let resp = test::call_service(&app, req).await;
    assert!(resp.status().is_success());

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["status"], "ok");
}

#[actix_rt::test]
async fn test_generate_requires_destination() {
    let test_app = TestApp::new().await;
    let app = test::init_service(test_app.create_app()).await;

    let req = test::TestRequest::post()
        .uri("/api/generate")
        .set_json(&json!({ "destinations": [{ "name": "  " }], "preferences": "food" }))
        .to_request();

    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 400);

    let body: Value = test::read_body_json(resp).await;
    assert!(body["error"].as_str().unwrap().contains("destination"));
}

#[actix_rt::test]
async fn test_generate_without_key_is_unavailable() {
    let test_app = TestApp::new().await;
    let app = test::init_service(test_app.create_app()).await;

    let req = test::TestRequest::post()
        .uri("/api/generate")
        .set_json(&json!({ "destinations": [{ "name": "Lisbon" }], "days": 2 }))
        .to_request();

    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 503);
}

#[actix_rt::test]
async fn test_generate_stream_checks_request_before_streaming() {
    let test_app = TestApp::new().await;
    let app = test::init_service(test_app.create_app()).await;

    let req = test::TestRequest::post()
        .uri("/api/generate/stream")
        .set_json(&json!({ "destinations": [], "days": 3 }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 400);

    let req = test::TestRequest::post()
        .uri("/api/generate/stream")
        .set_json(&json!({ "destinations": [{ "name": "Lisbon" }], "days": 3 }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 503);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "Itinerary generation is not configured");
}

#[actix_rt::test]
async fn test_extract_tiktok_requires_tiktok_url() {
    let test_app = TestApp::new().await;
    let app = test::init_service(test_app.create_app()).await;

    let req = test::TestRequest::post()
        .uri("/api/extract-tiktok")
        .set_json(&json!({ "urls": ["https://example.com/video/1", ""] }))
        .to_request();

    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 400);
}

#[actix_rt::test]
async fn test_create_itinerary_requires_days() {
    let test_app = TestApp::new().await;
    let app = test::init_service(test_app.create_app()).await;

    let req = test::TestRequest::post()
        .uri("/api/itineraries")
        .set_json(&json!({ "title": "Empty", "destinations": ["Rome"], "itinerary": [] }))
        .to_request();

    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 400);
}

#[actix_rt::test]
async fn test_invalid_ids_are_rejected() {
    let test_app = TestApp::new().await;
    let app = test::init_service(test_app.create_app()).await;

    for uri in [
        "/api/itineraries/not-an-id",
        "/api/itineraries/not-an-id/days",
        "/api/itineraries/not-an-id/destinations",
    ] {
        let req = test::TestRequest::get().uri(uri).to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), 400, "{}", uri);
    }

    let req = test::TestRequest::delete()
        .uri("/api/itinerary-items/not-an-id")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 400);
}

#[actix_rt::test]
async fn test_place_search_without_token_is_empty() {
    let test_app = TestApp::new().await;
    let app = test::init_service(test_app.create_app()).await;

    let req = test::TestRequest::get()
        .uri("/api/destinations/search?q=Paris")
        .to_request();

    let resp = test::call_service(&app, req).await;
    assert!(resp.status().is_success());

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body, json!([]));
}

#[actix_rt::test]
async fn test_cors_allows_dev_origin() {
    let app = test::init_service(
        App::new()
            .wrap(build_cors(None))
            .route("/ping", actix_web::web::get().to(|| async { "pong" })),
    )
    .await;

    let req = test::TestRequest::get()
        .uri("/ping")
        .insert_header((header::ORIGIN, "http://localhost:5173"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(
        resp.headers()
            .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
            .and_then(|v| v.to_str().ok()),
        Some("http://localhost:5173")
    );

    let req = test::TestRequest::get()
        .uri("/ping")
        .insert_header((header::ORIGIN, "https://evil.example.com"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert!(resp
        .headers()
        .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
        .is_none());
}
