mod common;

use actix_web::test;
use serde_json::{json, Value};

use common::TestApp;

fn activity(name: &str, time: &str) -> Value {
    json!({ "title": name, "content": "", "type": "activity", "time": time })
}

fn three_and_empty() -> Value {
    json!([
        {
            "title": "Day 1",
            "content": "",
            "activities": [
                activity("X", "9:00 AM"),
                activity("Y", "11:00 AM"),
                activity("Z", "1:00 PM")
            ]
        },
        { "title": "Day 2", "content": "", "activities": [] }
    ])
}

fn field(body: &Value, day: usize, key: &str) -> Vec<String> {
    body["days"][day]["activities"]
        .as_array()
        .unwrap()
        .iter()
        .map(|a| a[key].as_str().unwrap().to_string())
        .collect()
}

#[actix_rt::test]
async fn test_reorder_into_empty_day() {
    let test_app = TestApp::new().await;
    let app = test::init_service(test_app.create_app()).await;

    let req = test::TestRequest::post()
        .uri("/api/itineraries/reorder")
        .set_json(&json!({
            "days": three_and_empty(),
            "source": { "day_index": 0, "activity_index": 0 },
            "target": { "day_index": 1, "activity_index": 0 },
            "position": "before"
        }))
        .to_request();

    let resp = test::call_service(&app, req).await;
    assert!(resp.status().is_success());

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["moved"], true);
    assert_eq!(field(&body, 0, "title"), vec!["Y", "Z"]);
    assert_eq!(field(&body, 0, "time"), vec!["9:00 AM", "11:00 AM"]);
    assert_eq!(field(&body, 1, "title"), vec!["X"]);
    assert_eq!(field(&body, 1, "time"), vec!["9:00 AM"]);
}

#[actix_rt::test]
async fn test_reorder_onto_own_slot_changes_nothing() {
    let test_app = TestApp::new().await;
    let app = test::init_service(test_app.create_app()).await;

    let mut days = three_and_empty();
    days[0]["activities"][2]["time"] = json!("8:15 PM");

    let req = test::TestRequest::post()
        .uri("/api/itineraries/reorder")
        .set_json(&json!({
            "days": days,
            "source": { "day_index": 0, "activity_index": 1 },
            "target": { "day_index": 0, "activity_index": 0 },
            "position": "after"
        }))
        .to_request();

    let resp = test::call_service(&app, req).await;
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["moved"], false);
    assert_eq!(field(&body, 0, "title"), vec!["X", "Y", "Z"]);
    assert_eq!(field(&body, 0, "time"), vec!["9:00 AM", "11:00 AM", "8:15 PM"]);
}

#[actix_rt::test]
async fn test_reorder_center_lands_after_target() {
    let test_app = TestApp::new().await;
    let app = test::init_service(test_app.create_app()).await;

    let req = test::TestRequest::post()
        .uri("/api/itineraries/reorder")
        .set_json(&json!({
            "days": three_and_empty(),
            "source": { "day_index": 0, "activity_index": 2 },
            "target": { "day_index": 0, "activity_index": 0 },
            "position": "center"
        }))
        .to_request();

    let resp = test::call_service(&app, req).await;
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(field(&body, 0, "title"), vec!["X", "Z", "Y"]);
}

#[actix_rt::test]
async fn test_reorder_rejects_out_of_range() {
    let test_app = TestApp::new().await;
    let app = test::init_service(test_app.create_app()).await;

    let req = test::TestRequest::post()
        .uri("/api/itineraries/reorder")
        .set_json(&json!({
            "days": three_and_empty(),
            "source": { "day_index": 0, "activity_index": 5 },
            "target": { "day_index": 1, "activity_index": 0 },
            "position": "before"
        }))
        .to_request();

    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 400);

    let req = test::TestRequest::post()
        .uri("/api/itineraries/reorder")
        .set_json(&json!({
            "days": three_and_empty(),
            "source": { "day_index": 0, "activity_index": 0 },
            "target": { "day_index": 1, "activity_index": 0 },
            "position": "after"
        }))
        .to_request();

    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 400);
}

#[actix_rt::test]
async fn test_reorder_rejects_target_index_at_usize_max() {
    let test_app = TestApp::new().await;
    let app = test::init_service(test_app.create_app()).await;

    for position in ["before", "center", "after"] {
        let req = test::TestRequest::post()
            .uri("/api/itineraries/reorder")
            .set_json(&json!({
                "days": three_and_empty(),
                "source": { "day_index": 0, "activity_index": 0 },
                "target": { "day_index": 0, "activity_index": usize::MAX },
                "position": position
            }))
            .to_request();

        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), 400, "{}", position);
    }
}

#[actix_rt::test]
async fn test_reorder_unknown_category_reads_as_activity() {
    let test_app = TestApp::new().await;
    let app = test::init_service(test_app.create_app()).await;

    let req = test::TestRequest::post()
        .uri("/api/itineraries/reorder")
        .set_json(&json!({
            "days": [{
                "title": "Day 1",
                "activities": [
                    { "title": "A", "type": "spa", "time": "" },
                    { "title": "B", "type": "museum", "time": "" }
                ]
            }],
            "source": { "day_index": 0, "activity_index": 1 },
            "target": { "day_index": 0, "activity_index": 0 },
            "position": "before"
        }))
        .to_request();

    let resp = test::call_service(&app, req).await;
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(field(&body, 0, "type"), vec!["museum", "activity"]);
    assert_eq!(field(&body, 0, "time"), vec!["9:00 AM", "11:00 AM"]);
}
