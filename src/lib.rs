use actix_web::web;

pub mod config;
pub mod db;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod state;

/// Mounts every `/api` route. `/api/auth/me` is the only route that demands a token.
pub fn configure_routes(cfg: &mut web::ServiceConfig, jwt_secret: &str) {
    cfg.service(
        web::scope("/api")
            .route("/health", web::get().to(routes::health::ping))
            .service(
                web::scope("/auth")
                    .route("/register", web::post().to(routes::auth::register))
                    .route("/login", web::post().to(routes::auth::login))
                    .service(
                        web::resource("/me")
                            .wrap(middleware::auth::AuthMiddleware::new(jwt_secret))
                            .route(web::get().to(routes::auth::me)),
                    ),
            )
            .route("/generate", web::post().to(routes::generate::generate))
            .route(
                "/generate/stream",
                web::post().to(routes::generate::generate_stream),
            )
            .route(
                "/extract-tiktok",
                web::post().to(routes::generate::extract_tiktok),
            )
            .service(
                web::scope("/destinations")
                    .route("", web::get().to(routes::destinations::get_destinations))
                    .route("", web::post().to(routes::destinations::create_destination))
                    .route("/search", web::get().to(routes::destinations::search_places))
                    .route(
                        "/{id}",
                        web::delete().to(routes::destinations::delete_destination),
                    ),
            )
            .service(
                web::scope("/itineraries")
                    .route("", web::get().to(routes::itinerary::get_all))
                    .route("", web::post().to(routes::itinerary::create))
                    .route("/reorder", web::post().to(routes::itinerary::reorder))
                    .route("/{id}", web::get().to(routes::itinerary::get_by_id))
                    .route("/{id}", web::delete().to(routes::itinerary::delete))
                    .route("/{id}/days", web::get().to(routes::itinerary::get_days))
                    .route(
                        "/{id}/destinations",
                        web::get().to(routes::itinerary::get_destinations),
                    ),
            )
            .service(
                web::scope("/itinerary-items")
                    .route("", web::get().to(routes::itinerary_items::get_items))
                    .route("", web::post().to(routes::itinerary_items::create_item))
                    .route("/{id}", web::put().to(routes::itinerary_items::update_item))
                    .route("/{id}", web::delete().to(routes::itinerary_items::delete_item)),
            ),
    );
}
