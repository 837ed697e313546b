use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    http::StatusCode,
    Json,
};
use rust_decimal::Decimal;
use serde::Deserialize;
use validator::{Validate, ValidationError};

use super::{internal, json_body};
use crate::entities::{Flight, NewFlight, Seat};
use crate::error::{AppError, AppResult};
use crate::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct FlightSearch {
    pub from: Option<String>,
    pub to: Option<String>,
}

impl FlightSearch {
    fn matches(&self, flight: &Flight) -> bool {
        fn contains(haystack: &str, needle: &Option<String>) -> bool {
            match needle.as_deref().map(str::trim) {
                Some(needle) if !needle.is_empty() => haystack
                    .to_lowercase()
                    .contains(&needle.to_lowercase()),
                _ => true,
            }
        }
        contains(&flight.departure, &self.from) && contains(&flight.destination, &self.to)
    }
}

fn non_negative(price: &Decimal) -> Result<(), ValidationError> {
    if price.is_sign_negative() {
        let mut err = ValidationError::new("range");
        err.message = Some("Price must not be negative".into());
        return Err(err);
    }
    Ok(())
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateFlightRequest {
    #[validate(length(min = 1, message = "Flight number is required"))]
    pub flight_number: String,
    #[validate(length(min = 1, message = "Departure is required"))]
    pub departure: String,
    #[validate(length(min = 1, message = "Destination is required"))]
    pub destination: String,
    #[validate(length(min = 1, message = "Departure time is required"))]
    pub departure_time: String,
    #[validate(length(min = 1, message = "Arrival time is required"))]
    pub arrival_time: String,
    #[validate(length(min = 1, message = "Duration is required"))]
    pub duration: String,
    #[validate(custom(function = "non_negative"))]
    pub price: Decimal,
    #[validate(range(max = 300, message = "Too many economy seats"))]
    pub economy_seats: Option<u32>,
    #[validate(range(max = 60, message = "Too many business seats"))]
    pub business_seats: Option<u32>,
}

/// List flights, optionally filtered by departure / destination
pub async fn list_flights(
    State(state): State<AppState>,
    Query(search): Query<FlightSearch>,
) -> AppResult<Json<Vec<Flight>>> {
    let flights = state
        .store
        .flights()
        .map_err(internal("Failed to fetch flights"))?
        .into_iter()
        .filter(|flight| search.matches(flight))
        .collect();

    Ok(Json(flights))
}

/// Get a single flight
pub async fn get_flight(
    State(state): State<AppState>,
    Path(flight_id): Path<String>,
) -> AppResult<Json<Flight>> {
    let flight = state
        .store
        .flight(&flight_id)
        .map_err(internal("Failed to fetch flight"))?
        .ok_or_else(|| AppError::NotFound("Flight not found".to_string()))?;

    Ok(Json(flight))
}

/// Seat map of a flight. Unknown flights have an empty map.
pub async fn flight_seats(
    State(state): State<AppState>,
    Path(flight_id): Path<String>,
) -> AppResult<Json<Vec<Seat>>> {
    let seats = state
        .store
        .flight_seats(&flight_id)
        .map_err(internal("Failed to fetch seats"))?;

    Ok(Json(seats))
}

/// Create a flight together with its seat map
pub async fn create_flight(
    State(state): State<AppState>,
    payload: Result<Json<CreateFlightRequest>, JsonRejection>,
) -> AppResult<(StatusCode, Json<Flight>)> {
    let payload = json_body(payload)?;
    payload.validate()?;

    let flight = state.store.create_flight(NewFlight {
        flight_number: payload.flight_number,
        departure: payload.departure,
        destination: payload.destination,
        departure_time: payload.departure_time,
        arrival_time: payload.arrival_time,
        duration: payload.duration,
        price: payload.price,
        economy_seats: payload.economy_seats,
        business_seats: payload.business_seats,
    })?;

    tracing::info!(
        flight_id = %flight.id,
        flight_number = %flight.flight_number,
        seats = flight.total_seats,
        "Flight created"
    );

    Ok((StatusCode::CREATED, Json(flight)))
}
