#![allow(dead_code)]

use actix_web::{web, App};
use bson::oid::ObjectId;

use trip_planner_api::config::AppConfig;
use trip_planner_api::db::mongo::Store;
use trip_planner_api::services::auth_service::generate_token;
use trip_planner_api::state::AppState;

pub const TEST_SECRET: &str = "test_secret";

pub fn test_config() -> AppConfig {
    AppConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        mongo_uri: "mongodb://localhost:27017".to_string(),
        database: "TripPlannerTest".to_string(),
        jwt_secret: TEST_SECRET.to_string(),
        mapbox_token: None,
        ai_api_key: None,
        ai_api_url: "http://localhost:9/v1/chat/completions".to_string(),
        ai_model: "test-model".to_string(),
        frontend_url: None,
    }
}

pub struct TestApp {
    pub state: web::Data<AppState>,
}

impl TestApp {
    /// The client connects lazily, so routes that answer before touching the
    /// store run without a database.
    pub async fn new() -> Self {
        let config = test_config();
        let client = mongodb::Client::with_uri_str(&config.mongo_uri)
            .await
            .expect("test URI parses");
        let store = Store::new(std::sync::Arc::new(client), config.database.clone());

        Self {
            state: web::Data::new(AppState::new(store, config)),
        }
    }

    pub fn create_app(
        &self,
    ) -> App<
        impl actix_web::dev::ServiceFactory<
            actix_web::dev::ServiceRequest,
            Config = (),
            Response = actix_web::dev::ServiceResponse,
            Error = actix_web::Error,
            InitError = (),
        >,
    > {
        App::new()
            .app_data(self.state.clone())
            .configure(|cfg| trip_planner_api::configure_routes(cfg, TEST_SECRET))
    }
}

pub fn bearer_token() -> String {
    let token = generate_token("test@example.com", ObjectId::new(), TEST_SECRET)
        .expect("token encodes");
    format!("Bearer {}", token)
}
