use axum::{
    middleware,
    routing::{get, patch, post},
    Json, Router,
};
use serde_json::{json, Value};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::handlers::{bookings, dashboard, flights};
use crate::middleware::rate_limit::{create_public_governor, log_request};
use crate::AppState;

async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

/// Bare API router without middleware.
pub fn create_router(state: AppState) -> Router {
    let flight_routes = Router::new()
        .route("/", get(flights::list_flights).post(flights::create_flight))
        .route("/{id}", get(flights::get_flight))
        .route("/{id}/seats", get(flights::flight_seats));

    let booking_routes = Router::new()
        .route("/", get(bookings::list_bookings).post(bookings::create_booking))
        .route("/email-ticket", post(bookings::email_ticket))
        .route("/reference/{reference}", get(bookings::get_booking_by_reference))
        .route("/{id}", get(bookings::get_booking))
        .route("/{id}/status", patch(bookings::update_booking_status));

    let dashboard_routes = Router::new()
        .route("/stats", get(dashboard::stats))
        .route("/availability", get(dashboard::availability));

    Router::new()
        .route("/api/health", get(health))
        .nest("/api/flights", flight_routes)
        .nest("/api/bookings", booking_routes)
        .nest("/api/dashboard", dashboard_routes)
        .with_state(state)
}

/// API router with tracing, CORS, per-IP rate limiting and request logging.
///
/// Requests must carry `ConnectInfo<SocketAddr>`, so serve it with
/// `into_make_service_with_connect_info`. The request log sits outermost and
/// also records rate-limited requests.
pub fn create_app(state: AppState) -> Router {
    create_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::new().allow_origin(Any).allow_methods(Any).allow_headers(Any))
        .layer(create_public_governor())
        .layer(middleware::from_fn(log_request))
}
