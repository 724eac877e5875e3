use actix_web::{middleware::Logger, web, App, HttpServer};
use env_logger::Env;

use trip_planner_api::config::AppConfig;
use trip_planner_api::db::mongo::{create_mongo_client, Store};
use trip_planner_api::middleware::cors::build_cors;
use trip_planner_api::routes;
use trip_planner_api::state::AppState;

fn invalid_input(err: impl std::fmt::Display) -> std::io::Error {
    std::io::Error::new(std::io::ErrorKind::InvalidInput, err.to_string())
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    if cfg!(debug_assertions) {
        dotenv::dotenv().ok();
    }

    env_logger::init_from_env(Env::default().default_filter_or("info"));
    log::info!("Application starting...");

    let config = AppConfig::from_env().map_err(invalid_input)?;

    let client = create_mongo_client(&config.mongo_uri)
        .await
        .map_err(invalid_input)?;
    let store = Store::new(client, config.database.clone());
    if let Err(err) = store.ensure_indexes().await {
        log::warn!("Could not create indexes: {}", err);
    }

    let state = web::Data::new(AppState::new(store, config.clone()));
    let jwt_secret = config.jwt_secret.clone();
    let frontend_url = config.frontend_url.clone();

    log::info!("Starting HTTP server on {}:{}", config.host, config.port);

    HttpServer::new(move || {
        App::new()
            .wrap(build_cors(frontend_url.clone()))
            .wrap(Logger::default())
            .app_data(state.clone())
            .route("/health", web::get().to(routes::health::health_check))
            .configure(|cfg| trip_planner_api::configure_routes(cfg, &jwt_secret))
    })
    .bind((config.host.as_str(), config.port))?
    .run()
    .await
}
