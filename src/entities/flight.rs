use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

pub const DEFAULT_ECONOMY_SEATS: u32 = 10;
pub const DEFAULT_BUSINESS_SEATS: u32 = 5;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Flight {
    pub id: String,
    pub flight_number: String,
    pub departure: String,
    pub destination: String,
    pub departure_time: String,
    pub arrival_time: String,
    pub duration: String,
    pub price: Decimal,
    pub economy_seats: u32,
    pub business_seats: u32,
    pub total_seats: u32,
}

/// Flight fields supplied on creation. Missing or zero seat counts fall back
/// to the standard 5 business / 10 economy layout; the total is their sum.
#[derive(Clone, Debug)]
pub struct NewFlight {
    pub flight_number: String,
    pub departure: String,
    pub destination: String,
    pub departure_time: String,
    pub arrival_time: String,
    pub duration: String,
    pub price: Decimal,
    pub economy_seats: Option<u32>,
    pub business_seats: Option<u32>,
}

impl NewFlight {
    pub fn into_flight(self, id: String) -> Flight {
        let economy_seats = self
            .economy_seats
            .filter(|n| *n > 0)
            .unwrap_or(DEFAULT_ECONOMY_SEATS);
        let business_seats = self
            .business_seats
            .filter(|n| *n > 0)
            .unwrap_or(DEFAULT_BUSINESS_SEATS);
        let mut price = self.price;
        price.rescale(2);
        Flight {
            id,
            flight_number: self.flight_number,
            departure: self.departure,
            destination: self.destination,
            departure_time: self.departure_time,
            arrival_time: self.arrival_time,
            duration: self.duration,
            price,
            economy_seats,
            business_seats,
            total_seats: economy_seats + business_seats,
        }
    }
}
