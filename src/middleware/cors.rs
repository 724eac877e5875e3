use actix_cors::Cors;
use actix_web::http::header;

const DEV_ORIGINS: &[&str] = &[
    "http://localhost:5173",
    "http://127.0.0.1:5173",
    "http://localhost:5174",
    "http://127.0.0.1:5174",
];

/// Dev servers, the configured frontend, and Vercel preview deployments.
pub fn is_allowed_origin(origin: &str, frontend_url: Option<&str>) -> bool {
    DEV_ORIGINS.contains(&origin)
        || frontend_url.is_some_and(|url| url.trim_end_matches('/') == origin)
        || origin.ends_with(".vercel.app")
}

pub fn build_cors(frontend_url: Option<String>) -> Cors {
    Cors::default()
        .allowed_origin_fn(move |origin, _req_head| {
            origin
                .to_str()
                .map(|origin| is_allowed_origin(origin, frontend_url.as_deref()))
                .unwrap_or(false)
        })
        .allowed_methods(vec!["GET", "POST", "PUT", "DELETE", "OPTIONS"])
        .allowed_headers(vec![header::CONTENT_TYPE, header::AUTHORIZATION])
        .supports_credentials()
        .max_age(3600)
}
