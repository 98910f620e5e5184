/**
 * Router Configuration
 *
 * Combines the route groups into a single Axum router and adds the
 * cross-cutting layers.
 *
 * # Route Order
 *
 * 1. Service routes (`/health`, `/realtime`)
 * 2. Board routes (`/boards/...`)
 * 3. Fallback handler (JSON 404)
 *
 * # Layers
 *
 * Every request is traced with `TraceLayer`. When `cors_allow_any` is set a
 * permissive `CorsLayer` is added on top.
 */
use axum::{http::StatusCode, response::IntoResponse, routing::get, Json, Router};
use serde_json::json;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::backend::realtime::handle_realtime_subscription;
use crate::backend::routes::board_routes::configure_board_routes;
use crate::backend::server::state::AppState;

/// Create the Axum router with all routes configured
pub fn create_router(app_state: AppState) -> Router<()> {
    let cors = app_state
        .config
        .cors_allow_any
        .then(CorsLayer::permissive);

    let router = Router::new()
        .route("/health", get(health))
        .route("/realtime", get(handle_realtime_subscription));

    let router = configure_board_routes(router).fallback(not_found);

    let router = router.layer(
        ServiceBuilder::new()
            .layer(TraceLayer::new_for_http())
            .option_layer(cors),
    );

    router.with_state(app_state)
}

async fn health() -> impl IntoResponse {
    Json(json!({ "status": "ok" }))
}

async fn not_found() -> impl IntoResponse {
    (
        StatusCode::NOT_FOUND,
        Json(json!({ "error": "Not found", "status": 404 })),
    )
}
