//! Entity storage.
//!
//! [`FlightStore`] is the seam handlers and services talk to. The only
//! adapter is [`MemoryStore`], which lives for the process lifetime and is
//! built once in `main` then shared through `AppState`.

mod memory;
pub mod seed;

use std::sync::Arc;

use thiserror::Error;

use crate::config::Config;
use crate::entities::{
    Booking, BookingStatus, Flight, NewBooking, NewFlight, NewPassenger, NewSeat, Passenger, Seat,
};

pub use memory::MemoryStore;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error("seat not found")]
    SeatNotFound,
    #[error("booking not found")]
    BookingNotFound,
    #[error("seat is already occupied")]
    SeatOccupied,
    #[error("flight number {0} already exists")]
    DuplicateFlightNumber(String),
    #[error("store lock poisoned")]
    Poisoned,
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Flights, seats and bookings read under a single lock, so counts derived
/// from them agree with each other.
#[derive(Debug, Clone, Default)]
pub struct Snapshot {
    pub flights: Vec<Flight>,
    pub seats: Vec<Seat>,
    pub bookings: Vec<Booking>,
}

impl Snapshot {
    pub fn flight_seats<'a>(&'a self, flight_id: &'a str) -> impl Iterator<Item = &'a Seat> + 'a {
        self.seats.iter().filter(move |seat| seat.flight_id == flight_id)
    }
}

pub trait FlightStore: Send + Sync {
    // Flights
    fn flights(&self) -> StoreResult<Vec<Flight>>;
    fn flight(&self, id: &str) -> StoreResult<Option<Flight>>;
    /// Creates the flight and its full seat map, all seats unoccupied.
    fn create_flight(&self, flight: NewFlight) -> StoreResult<Flight>;

    // Passengers
    fn passenger(&self, id: &str) -> StoreResult<Option<Passenger>>;
    fn create_passenger(&self, passenger: NewPassenger) -> StoreResult<Passenger>;

    // Bookings
    fn bookings(&self) -> StoreResult<Vec<Booking>>;
    fn booking(&self, id: &str) -> StoreResult<Option<Booking>>;
    fn booking_by_reference(&self, reference: &str) -> StoreResult<Option<Booking>>;
    /// Persists the booking with a fresh reference code. Seat occupancy is
    /// not touched; callers reserve the seat first.
    fn create_booking(&self, booking: NewBooking) -> StoreResult<Booking>;
    fn update_booking_status(&self, id: &str, status: BookingStatus) -> StoreResult<Booking>;

    // Seats
    fn flight_seats(&self, flight_id: &str) -> StoreResult<Vec<Seat>>;
    fn seat(&self, flight_id: &str, seat_number: &str) -> StoreResult<Option<Seat>>;
    fn create_seat(&self, seat: NewSeat) -> StoreResult<Seat>;
    fn update_seat_occupancy(
        &self,
        flight_id: &str,
        seat_number: &str,
        is_occupied: bool,
    ) -> StoreResult<Seat>;
    /// Atomically flips a free seat to occupied. Fails with
    /// [`StoreError::SeatOccupied`] if another booking got there first.
    fn reserve_seat(&self, flight_id: &str, seat_number: &str) -> StoreResult<Seat>;

    fn snapshot(&self) -> StoreResult<Snapshot>;
}

/// Builds the process-wide store, seeded with the default schedule unless
/// disabled in config.
pub fn connect(config: &Config) -> Arc<dyn FlightStore> {
    let store = if config.seed_data {
        MemoryStore::seeded()
    } else {
        MemoryStore::new()
    };
    Arc::new(store)
}
