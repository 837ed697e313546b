use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SeatClass {
    Business,
    Economy,
}

impl SeatClass {
    /// Price tier of the class, independent of the flight.
    pub fn price(self) -> Decimal {
        match self {
            SeatClass::Business => dec!(25.00),
            SeatClass::Economy => dec!(15.00),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            SeatClass::Business => "Business",
            SeatClass::Economy => "Economy",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Seat {
    pub id: String,
    pub flight_id: String,
    pub seat_number: String,
    pub seat_class: SeatClass,
    pub is_occupied: bool,
    pub price: Decimal,
}

impl Seat {
    /// Seat identity is derived from the owning flight and the seat number.
    pub fn id_for(flight_id: &str, seat_number: &str) -> String {
        format!("{}_{}", flight_id, seat_number)
    }
}

#[derive(Clone, Debug)]
pub struct NewSeat {
    pub flight_id: String,
    pub seat_number: String,
    pub seat_class: SeatClass,
    pub is_occupied: bool,
}

impl NewSeat {
    pub fn into_seat(self) -> Seat {
        Seat {
            id: Seat::id_for(&self.flight_id, &self.seat_number),
            flight_id: self.flight_id,
            seat_number: self.seat_number,
            price: self.seat_class.price(),
            seat_class: self.seat_class,
            is_occupied: self.is_occupied,
        }
    }
}
