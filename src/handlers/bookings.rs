use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use validator::Validate;

use super::{internal, json_body};
use crate::email::TicketEmail;
use crate::entities::{Booking, BookingStatus};
use crate::error::{AppError, AppResult};
use crate::services::booking::{self, CreateBookingRequest, CreatedBooking};
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct UpdateStatusRequest {
    pub status: BookingStatus,
}

#[derive(Debug, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase", default)]
pub struct EmailTicketRequest {
    #[validate(length(min = 1, message = "Booking reference is required"))]
    pub booking_reference: String,
    /// Overrides the passenger's address when present.
    #[validate(email(message = "Invalid email address"))]
    pub email: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct EmailTicketResponse {
    pub message: String,
    pub email: String,
}

/// List all bookings
pub async fn list_bookings(State(state): State<AppState>) -> AppResult<Json<Vec<Booking>>> {
    let bookings = state
        .store
        .bookings()
        .map_err(internal("Failed to fetch bookings"))?;

    Ok(Json(bookings))
}

/// Get a booking by id
pub async fn get_booking(
    State(state): State<AppState>,
    Path(booking_id): Path<String>,
) -> AppResult<Json<Booking>> {
    let booking = state
        .store
        .booking(&booking_id)
        .map_err(internal("Failed to fetch booking"))?
        .ok_or_else(|| AppError::NotFound("Booking not found".to_string()))?;

    Ok(Json(booking))
}

/// Get a booking by its customer-facing reference
pub async fn get_booking_by_reference(
    State(state): State<AppState>,
    Path(reference): Path<String>,
) -> AppResult<Json<Booking>> {
    let booking = state
        .store
        .booking_by_reference(&reference)
        .map_err(internal("Failed to fetch booking"))?
        .ok_or_else(|| AppError::NotFound("Booking not found".to_string()))?;

    Ok(Json(booking))
}

/// Create a passenger and book their seat
pub async fn create_booking(
    State(state): State<AppState>,
    payload: Result<Json<CreateBookingRequest>, JsonRejection>,
) -> AppResult<(StatusCode, Json<CreatedBooking>)> {
    let payload = json_body(payload)?;
    let created = booking::create_booking(state.store.as_ref(), payload).map_err(|err| match err {
        AppError::Internal(_) => AppError::Internal("Failed to create booking".to_string()),
        other => other,
    })?;

    Ok((StatusCode::CREATED, Json(created)))
}

/// Change a booking's status (confirmed, checked-in, cancelled)
pub async fn update_booking_status(
    State(state): State<AppState>,
    Path(booking_id): Path<String>,
    payload: Result<Json<UpdateStatusRequest>, JsonRejection>,
) -> AppResult<Json<Booking>> {
    let payload = json_body(payload)?;
    let booking = booking::update_status(state.store.as_ref(), &booking_id, payload.status)?;
    Ok(Json(booking))
}

/// Email the ticket for a booking, or log it outside production
pub async fn email_ticket(
    State(state): State<AppState>,
    payload: Result<Json<EmailTicketRequest>, JsonRejection>,
) -> AppResult<Json<EmailTicketResponse>> {
    let payload = json_body(payload)?;
    payload.validate()?;

    let booking = state
        .store
        .booking_by_reference(&payload.booking_reference)
        .map_err(internal("Failed to send email"))?
        .ok_or_else(|| AppError::NotFound("Booking not found".to_string()))?;
    let flight = state
        .store
        .flight(&booking.flight_id)
        .map_err(internal("Failed to send email"))?
        .ok_or_else(|| AppError::NotFound("Flight not found".to_string()))?;
    let passenger = state
        .store
        .passenger(&booking.passenger_id)
        .map_err(internal("Failed to send email"))?
        .ok_or_else(|| AppError::NotFound("Passenger not found".to_string()))?;

    let recipient = payload.email.unwrap_or_else(|| passenger.email.clone());
    let ticket = TicketEmail::render(&booking, &flight, &passenger);

    state
        .mailer
        .send(&recipient, &ticket)
        .await
        .map_err(internal("Failed to send email"))?;

    Ok(Json(EmailTicketResponse {
        message: "Ticket sent successfully".to_string(),
        email: recipient,
    }))
}
