use axum::{
    http::{header, HeaderValue, Method},
    routing::{get, post},
    Router,
};
use tower::Layer;
use tower_http::compression::CompressionLayer;
use tower_http::cors::CorsLayer;
use tower_http::normalize_path::{NormalizePath, NormalizePathLayer};
use tower_http::trace::TraceLayer;

use crate::config::Config;
use crate::handlers;
use crate::AppState;

/// The full application. Trailing slashes are trimmed before routing, so
/// `/api/v1/diaries/` and `/api/v1/diaries` reach the same handler.
pub type App = NormalizePath<Router>;

pub fn build_router(state: AppState) -> App {
    let public_routes = Router::new()
        .route("/health", get(handlers::health::health_check))
        .route("/readyz", get(handlers::health::readyz))
        .route(
            "/users",
            get(handlers::users::list_users).post(handlers::users::create_user_from_query),
        );

    let api_routes = Router::new()
        .route("/moods", get(handlers::moods::list_moods))
        // Users
        .route(
            "/users",
            get(handlers::users::list_users).post(handlers::users::create_user),
        )
        .route(
            "/users/:id",
            get(handlers::users::get_user).delete(handlers::users::delete_user),
        )
        // Diaries
        .route(
            "/diaries",
            get(handlers::diaries::list_diaries).post(handlers::diaries::create_diary),
        )
        .route(
            "/diaries/:id",
            get(handlers::diaries::get_diary)
                .put(handlers::diaries::update_diary)
                .delete(handlers::diaries::delete_diary),
        )
        // Flowers
        .route("/flowers/generate", post(handlers::flowers::generate_flower))
        .route(
            "/flowers/diary/:diary_id",
            get(handlers::flowers::list_diary_flowers),
        )
        .route("/flowers/:id", get(handlers::flowers::get_flower))
        // Admin
        .route("/admin/users", get(handlers::admin::list_users))
        .route("/admin/users/:id/diaries", get(handlers::admin::user_diaries))
        .route("/admin/diaries", get(handlers::admin::all_diaries))
        .route("/admin/stats", get(handlers::admin::stats));

    let cors = cors_layer(&state.config);

    let router = Router::new()
        .merge(public_routes)
        .nest("/api/v1", api_routes)
        .layer(cors)
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    NormalizePathLayer::trim_trailing_slash().layer(router)
}

fn cors_layer(config: &Config) -> CorsLayer {
    let mut origins: Vec<HeaderValue> = Vec::new();
    match config.frontend_url.parse::<HeaderValue>() {
        Ok(hv) => origins.push(hv),
        Err(_) => tracing::warn!(frontend_url = %config.frontend_url, "Invalid FRONTEND_URL, ignoring for CORS"),
    }
    // In dev, also allow LAN access (e.g. testing from another device)
    if let Ok(extra) = std::env::var("CORS_EXTRA_ORIGINS") {
        for o in extra.split(',') {
            if let Ok(hv) = o.trim().parse::<HeaderValue>() {
                origins.push(hv);
            }
        }
    }

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::CONTENT_TYPE, header::ACCEPT])
        .allow_credentials(true)
}
