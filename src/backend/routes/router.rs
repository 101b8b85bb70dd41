/**
 * Router Configuration
 *
 * Combines the API routes with health, static frontend serving and the
 * cross-cutting layers.
 *
 * # Route Order
 *
 * 1. `GET /health`
 * 2. API routes (`api_routes`)
 * 3. Fallback: files from `STATIC_DIR`, `index.html` for unknown paths
 */

use axum::{
    http::{header, HeaderValue, Method},
    response::Json,
    routing::get,
    Router,
};
use serde::Serialize;
use tower_http::{
    cors::{AllowOrigin, Any, CorsLayer},
    services::{ServeDir, ServeFile},
    trace::TraceLayer,
};

use crate::backend::routes::api_routes::configure_api_routes;
use crate::backend::server::state::AppState;

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
    database: bool,
}

async fn health_check(
    axum::extract::State(state): axum::extract::State<AppState>,
) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        version: env!("CARGO_PKG_VERSION"),
        database: state.db_pool.is_some(),
    })
}

/// CORS for the configured origin, or any origin when none is set
pub fn cors_layer(origin: Option<&str>) -> CorsLayer {
    let base = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::DELETE, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION]);

    match origin.map(HeaderValue::from_str) {
        Some(Ok(value)) => base.allow_origin(AllowOrigin::exact(value)),
        Some(Err(e)) => {
            tracing::warn!("Ignoring invalid CORS_ORIGIN: {}", e);
            base.allow_origin(Any)
        }
        None => base.allow_origin(Any),
    }
}

/// Create the Axum router with all routes configured
pub fn create_router(app_state: AppState) -> Router<()> {
    let static_dir = app_state.config.static_dir.clone();
    let cors = cors_layer(app_state.config.cors_origin.as_deref());

    let router = Router::new().route("/health", get(health_check));
    let router = configure_api_routes(router, app_state.clone());

    let frontend =
        ServeDir::new(&static_dir).not_found_service(ServeFile::new(static_dir.join("index.html")));

    router
        .fallback_service(frontend)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(app_state)
}
