use rust_decimal::Decimal;
use serde::Serialize;

use crate::entities::Seat;
use crate::error::AppResult;
use crate::store::FlightStore;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub total_flights: usize,
    pub active_bookings: usize,
    pub occupancy_rate: u32,
    /// Sum of every booking's total price, two decimals.
    pub total_revenue: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FlightAvailability {
    pub flight_number: String,
    pub destination: String,
    pub available_seats: usize,
    pub total_seats: usize,
    pub occupancy_rate: u32,
}

/// `round(100 * occupied / total)`, rounding halves up; 0 for an empty map.
pub fn occupancy_rate(occupied: usize, total: usize) -> u32 {
    if total == 0 {
        return 0;
    }
    ((200 * occupied + total) / (2 * total)) as u32
}

fn occupied<'a>(seats: impl IntoIterator<Item = &'a Seat>) -> usize {
    seats.into_iter().filter(|seat| seat.is_occupied).count()
}

/// Headline numbers, recomputed from one store snapshot on every call.
pub fn stats(store: &dyn FlightStore) -> AppResult<DashboardStats> {
    let snapshot = store.snapshot()?;

    let active_bookings = snapshot
        .bookings
        .iter()
        .filter(|b| b.status.is_active())
        .count();
    let total_revenue: Decimal = snapshot.bookings.iter().map(|b| b.total_price).sum();

    let mut total_seats = 0;
    let mut occupied_seats = 0;
    for flight in &snapshot.flights {
        total_seats += snapshot.flight_seats(&flight.id).count();
        occupied_seats += occupied(snapshot.flight_seats(&flight.id));
    }

    Ok(DashboardStats {
        total_flights: snapshot.flights.len(),
        active_bookings,
        occupancy_rate: occupancy_rate(occupied_seats, total_seats),
        total_revenue: format!("{:.2}", total_revenue),
    })
}

/// Per-flight seat availability for the dashboard progress bars.
pub fn availability(store: &dyn FlightStore) -> AppResult<Vec<FlightAvailability>> {
    let snapshot = store.snapshot()?;
    let mut rows = Vec::with_capacity(snapshot.flights.len());

    for flight in &snapshot.flights {
        let total = snapshot.flight_seats(&flight.id).count();
        let taken = occupied(snapshot.flight_seats(&flight.id));
        rows.push(FlightAvailability {
            flight_number: flight.flight_number.clone(),
            destination: flight.destination.clone(),
            available_seats: total - taken,
            total_seats: total,
            occupancy_rate: occupancy_rate(taken, total),
        });
    }

    Ok(rows)
}
