use std::collections::HashMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use rand::Rng;
use uuid::Uuid;

use super::seed;
use super::{FlightStore, Snapshot, StoreError, StoreResult};
use crate::entities::{
    Booking, BookingStatus, Flight, NewBooking, NewFlight, NewPassenger, NewSeat, Passenger, Seat,
};

const REFERENCE_PREFIX: &str = "ET";
const REFERENCE_LEN: usize = 6;
const REFERENCE_ALPHABET: &[u8] = b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZ";

/// Keyed rows that list back in insertion order.
#[derive(Debug)]
struct Table<T> {
    rows: HashMap<String, T>,
    order: Vec<String>,
}

impl<T: Clone> Table<T> {
    fn new() -> Self {
        Self {
            rows: HashMap::new(),
            order: Vec::new(),
        }
    }

    fn insert(&mut self, id: String, row: T) {
        if self.rows.insert(id.clone(), row).is_none() {
            self.order.push(id);
        }
    }

    fn get(&self, id: &str) -> Option<&T> {
        self.rows.get(id)
    }

    fn get_mut(&mut self, id: &str) -> Option<&mut T> {
        self.rows.get_mut(id)
    }

    fn values(&self) -> impl Iterator<Item = &T> {
        self.order.iter().filter_map(|id| self.rows.get(id))
    }
}

#[derive(Debug)]
struct Tables {
    flights: Table<Flight>,
    passengers: Table<Passenger>,
    bookings: Table<Booking>,
    seats: Table<Seat>,
    /// booking reference -> booking id
    references: HashMap<String, String>,
}

impl Tables {
    fn new() -> Self {
        Self {
            flights: Table::new(),
            passengers: Table::new(),
            bookings: Table::new(),
            seats: Table::new(),
            references: HashMap::new(),
        }
    }

    fn insert_seats(&mut self, seats: Vec<NewSeat>) {
        for seat in seats {
            let seat = seat.into_seat();
            self.seats.insert(seat.id.clone(), seat);
        }
    }

    fn unique_reference<R: Rng>(&self, rng: &mut R) -> String {
        loop {
            let candidate = generate_reference(rng);
            if !self.references.contains_key(&candidate) {
                return candidate;
            }
        }
    }
}

/// `ET` followed by six upper-case base-36 characters.
pub(crate) fn generate_reference<R: Rng>(rng: &mut R) -> String {
    let mut reference = String::with_capacity(REFERENCE_PREFIX.len() + REFERENCE_LEN);
    reference.push_str(REFERENCE_PREFIX);
    for _ in 0..REFERENCE_LEN {
        let idx = rng.gen_range(0..REFERENCE_ALPHABET.len());
        reference.push(REFERENCE_ALPHABET[idx] as char);
    }
    reference
}

/// In-process store. Every operation takes the single lock once, so each
/// call is atomic with respect to the others.
#[derive(Debug)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryStore {
    /// Empty store with no flights.
    pub fn new() -> Self {
        Self {
            tables: RwLock::new(Tables::new()),
        }
    }

    /// Store loaded with the default schedule and random seat occupancy.
    pub fn seeded() -> Self {
        Self::seeded_with(&mut rand::thread_rng())
    }

    pub fn seeded_with<R: Rng>(rng: &mut R) -> Self {
        let mut tables = Tables::new();
        for flight in seed::default_flights() {
            let mut seats = seed::seat_layout(&flight.id, flight.business_seats, flight.economy_seats);
            seed::randomize_occupancy(&mut seats, rng);
            tables.insert_seats(seats);
            tables.flights.insert(flight.id.clone(), flight);
        }
        tracing::debug!(flights = tables.flights.order.len(), "Seeded default flights");
        Self {
            tables: RwLock::new(tables),
        }
    }

    fn read(&self) -> StoreResult<RwLockReadGuard<'_, Tables>> {
        self.tables.read().map_err(|_| StoreError::Poisoned)
    }

    fn write(&self) -> StoreResult<RwLockWriteGuard<'_, Tables>> {
        self.tables.write().map_err(|_| StoreError::Poisoned)
    }
}

impl FlightStore for MemoryStore {
    fn flights(&self) -> StoreResult<Vec<Flight>> {
        Ok(self.read()?.flights.values().cloned().collect())
    }

    fn flight(&self, id: &str) -> StoreResult<Option<Flight>> {
        Ok(self.read()?.flights.get(id).cloned())
    }

    fn create_flight(&self, flight: NewFlight) -> StoreResult<Flight> {
        let mut tables = self.write()?;
        if tables
            .flights
            .values()
            .any(|f| f.flight_number == flight.flight_number)
        {
            return Err(StoreError::DuplicateFlightNumber(flight.flight_number));
        }

        let flight = flight.into_flight(Uuid::new_v4().to_string());
        let seats = seed::seat_layout(&flight.id, flight.business_seats, flight.economy_seats);
        tables.insert_seats(seats);
        tables.flights.insert(flight.id.clone(), flight.clone());
        Ok(flight)
    }

    fn passenger(&self, id: &str) -> StoreResult<Option<Passenger>> {
        Ok(self.read()?.passengers.get(id).cloned())
    }

    fn create_passenger(&self, passenger: NewPassenger) -> StoreResult<Passenger> {
        let passenger = passenger.into_passenger(Uuid::new_v4().to_string());
        self.write()?
            .passengers
            .insert(passenger.id.clone(), passenger.clone());
        Ok(passenger)
    }

    fn bookings(&self) -> StoreResult<Vec<Booking>> {
        Ok(self.read()?.bookings.values().cloned().collect())
    }

    fn booking(&self, id: &str) -> StoreResult<Option<Booking>> {
        Ok(self.read()?.bookings.get(id).cloned())
    }

    fn booking_by_reference(&self, reference: &str) -> StoreResult<Option<Booking>> {
        let tables = self.read()?;
        Ok(tables
            .references
            .get(reference)
            .and_then(|id| tables.bookings.get(id))
            .cloned())
    }

    fn create_booking(&self, booking: NewBooking) -> StoreResult<Booking> {
        let mut tables = self.write()?;
        let reference = tables.unique_reference(&mut rand::thread_rng());
        let booking = booking.into_booking(Uuid::new_v4().to_string(), reference);
        tables
            .references
            .insert(booking.booking_reference.clone(), booking.id.clone());
        tables.bookings.insert(booking.id.clone(), booking.clone());
        Ok(booking)
    }

    fn update_booking_status(&self, id: &str, status: BookingStatus) -> StoreResult<Booking> {
        let mut tables = self.write()?;
        let booking = tables
            .bookings
            .get_mut(id)
            .ok_or(StoreError::BookingNotFound)?;
        booking.status = status;
        Ok(booking.clone())
    }

    fn flight_seats(&self, flight_id: &str) -> StoreResult<Vec<Seat>> {
        Ok(self
            .read()?
            .seats
            .values()
            .filter(|seat| seat.flight_id == flight_id)
            .cloned()
            .collect())
    }

    fn seat(&self, flight_id: &str, seat_number: &str) -> StoreResult<Option<Seat>> {
        Ok(self
            .read()?
            .seats
            .get(&Seat::id_for(flight_id, seat_number))
            .cloned())
    }

    fn create_seat(&self, seat: NewSeat) -> StoreResult<Seat> {
        let seat = seat.into_seat();
        self.write()?.seats.insert(seat.id.clone(), seat.clone());
        Ok(seat)
    }

    fn update_seat_occupancy(
        &self,
        flight_id: &str,
        seat_number: &str,
        is_occupied: bool,
    ) -> StoreResult<Seat> {
        let mut tables = self.write()?;
        let seat = tables
            .seats
            .get_mut(&Seat::id_for(flight_id, seat_number))
            .ok_or(StoreError::SeatNotFound)?;
        seat.is_occupied = is_occupied;
        Ok(seat.clone())
    }

    fn reserve_seat(&self, flight_id: &str, seat_number: &str) -> StoreResult<Seat> {
        let mut tables = self.write()?;
        let seat = tables
            .seats
            .get_mut(&Seat::id_for(flight_id, seat_number))
            .ok_or(StoreError::SeatNotFound)?;
        if seat.is_occupied {
            return Err(StoreError::SeatOccupied);
        }
        seat.is_occupied = true;
        Ok(seat.clone())
    }

    fn snapshot(&self) -> StoreResult<Snapshot> {
        let tables = self.read()?;
        Ok(Snapshot {
            flights: tables.flights.values().cloned().collect(),
            seats: tables.seats.values().cloned().collect(),
            bookings: tables.bookings.values().cloned().collect(),
        })
    }
}
