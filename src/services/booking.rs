use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::entities::{Booking, BookingStatus, Flight, NewBooking, NewPassenger, Passenger, Seat};
use crate::error::{AppError, AppResult};
use crate::store::FlightStore;

/// Flat taxes and fees added to every ticket.
pub const TAX_SURCHARGE: Decimal = dec!(12.00);

#[derive(Debug, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase", default)]
pub struct BookingDetails {
    #[validate(length(min = 1, message = "Flight is required"))]
    pub flight_id: String,
    #[validate(length(min = 1, message = "Seat number is required"))]
    pub seat_number: String,
    pub special_requests: Option<Vec<String>>,
    pub status: Option<BookingStatus>,
}

#[derive(Debug, Default, Deserialize, Validate)]
#[serde(default)]
pub struct CreateBookingRequest {
    #[validate(nested)]
    pub passenger: NewPassenger,
    #[validate(nested)]
    pub booking: BookingDetails,
}

#[derive(Debug, Clone, Serialize)]
pub struct CreatedBooking {
    pub booking: Booking,
    pub passenger: Passenger,
}

/// Ticket price: flight fare plus the seat's class price plus the surcharge.
pub fn total_price(flight: &Flight, seat: &Seat) -> Decimal {
    let mut total = flight.price + seat.price + TAX_SURCHARGE;
    total.rescale(2);
    total
}

/// Books one seat for one new passenger.
///
/// The seat is claimed with a single compare-and-swap before anything else is
/// written, so two requests racing for the same seat cannot both succeed and
/// a rejected request leaves the store untouched.
pub fn create_booking(
    store: &dyn FlightStore,
    request: CreateBookingRequest,
) -> AppResult<CreatedBooking> {
    request.validate()?;
    let CreateBookingRequest { passenger, booking } = request;

    let flight = store
        .flight(&booking.flight_id)?
        .ok_or_else(|| AppError::NotFound("Flight not found".to_string()))?;

    let seat = store.reserve_seat(&flight.id, &booking.seat_number)?;

    let passenger = match store.create_passenger(passenger) {
        Ok(passenger) => passenger,
        Err(err) => {
            release_seat(store, &seat);
            return Err(err.into());
        }
    };

    let new_booking = NewBooking {
        flight_id: flight.id.clone(),
        passenger_id: passenger.id.clone(),
        seat_number: seat.seat_number.clone(),
        seat_class: seat.seat_class,
        total_price: total_price(&flight, &seat),
        special_requests: booking.special_requests.unwrap_or_default(),
        status: booking.status.unwrap_or_default(),
    };

    let booking = match store.create_booking(new_booking) {
        Ok(booking) => booking,
        Err(err) => {
            release_seat(store, &seat);
            return Err(err.into());
        }
    };

    tracing::info!(
        reference = %booking.booking_reference,
        flight = %flight.flight_number,
        seat = %booking.seat_number,
        total = %booking.total_price,
        "Booking confirmed"
    );

    Ok(CreatedBooking { booking, passenger })
}

/// Changes a booking's status. Cancelling keeps the seat occupied.
pub fn update_status(
    store: &dyn FlightStore,
    booking_id: &str,
    status: BookingStatus,
) -> AppResult<Booking> {
    let booking = store.update_booking_status(booking_id, status)?;
    tracing::info!(
        reference = %booking.booking_reference,
        status = booking.status.as_str(),
        "Booking status updated"
    );
    Ok(booking)
}

fn release_seat(store: &dyn FlightStore, seat: &Seat) {
    if let Err(err) = store.update_seat_occupancy(&seat.flight_id, &seat.seat_number, false) {
        tracing::warn!(
            flight_id = %seat.flight_id,
            seat = %seat.seat_number,
            error = %err,
            "Failed to release seat after aborted booking"
        );
    }
}
