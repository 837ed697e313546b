use axum::{extract::State, Json};

use super::internal;
use crate::error::AppResult;
use crate::services::dashboard::{self, DashboardStats, FlightAvailability};
use crate::AppState;

/// Dashboard headline statistics
pub async fn stats(State(state): State<AppState>) -> AppResult<Json<DashboardStats>> {
    let stats = dashboard::stats(state.store.as_ref())
        .map_err(internal("Failed to fetch dashboard stats"))?;
    Ok(Json(stats))
}

/// Per-flight seat availability
pub async fn availability(
    State(state): State<AppState>,
) -> AppResult<Json<Vec<FlightAvailability>>> {
    let rows = dashboard::availability(state.store.as_ref())
        .map_err(internal("Failed to fetch availability data"))?;
    Ok(Json(rows))
}
