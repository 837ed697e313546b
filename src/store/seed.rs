use rand::Rng;
use rust_decimal_macros::dec;

use crate::entities::{Flight, NewSeat, SeatClass};

const BUSINESS_LETTERS: [char; 3] = ['A', 'B', 'C'];
const ECONOMY_LETTERS: [char; 6] = ['A', 'B', 'C', 'D', 'E', 'F'];

const BUSINESS_OCCUPANCY: f64 = 0.3;
const ECONOMY_OCCUPANCY: f64 = 0.4;

/// Seat map for a flight, every seat free.
///
/// Business seats fill rows of three starting at row 1. Economy seats fill
/// rows of six starting on the row after the last business row.
pub fn seat_layout(flight_id: &str, business_seats: u32, economy_seats: u32) -> Vec<NewSeat> {
    let mut seats = Vec::with_capacity((business_seats + economy_seats) as usize);

    let business_rows = business_seats.div_ceil(3);
    for row in 1..=business_rows {
        let in_row = (business_seats - (row - 1) * 3).min(3) as usize;
        for letter in &BUSINESS_LETTERS[..in_row] {
            seats.push(NewSeat {
                flight_id: flight_id.to_string(),
                seat_number: format!("{}{}", row, letter),
                seat_class: SeatClass::Business,
                is_occupied: false,
            });
        }
    }

    let start_row = business_rows + 1;
    let economy_rows = economy_seats.div_ceil(6);
    for offset in 0..economy_rows {
        let in_row = (economy_seats - offset * 6).min(6) as usize;
        for letter in &ECONOMY_LETTERS[..in_row] {
            seats.push(NewSeat {
                flight_id: flight_id.to_string(),
                seat_number: format!("{}{}", start_row + offset, letter),
                seat_class: SeatClass::Economy,
                is_occupied: false,
            });
        }
    }

    seats
}

/// Marks seeded seats occupied at random: 30% of business, 40% of economy.
pub fn randomize_occupancy<R: Rng>(seats: &mut [NewSeat], rng: &mut R) {
    for seat in seats {
        let chance = match seat.seat_class {
            SeatClass::Business => BUSINESS_OCCUPANCY,
            SeatClass::Economy => ECONOMY_OCCUPANCY,
        };
        seat.is_occupied = rng.gen_bool(chance);
    }
}

fn flight(
    id: &str,
    departure: &str,
    destination: &str,
    departure_time: &str,
    arrival_time: &str,
    price: rust_decimal::Decimal,
) -> Flight {
    Flight {
        id: id.to_string(),
        flight_number: format!("ET-{}", id),
        departure: departure.to_string(),
        destination: destination.to_string(),
        departure_time: departure_time.to_string(),
        arrival_time: arrival_time.to_string(),
        duration: "2h 0m".to_string(),
        price,
        economy_seats: 10,
        business_seats: 5,
        total_seats: 15,
    }
}

/// The domestic schedule loaded at startup.
pub fn default_flights() -> Vec<Flight> {
    vec![
        flight("101", "Addis Ababa (ADD)", "Dire Dawa (DIR)", "08:00", "10:00", dec!(89.00)),
        flight("102", "Addis Ababa (ADD)", "Gondar (GDQ)", "09:00", "11:00", dec!(95.00)),
        flight("103", "Addis Ababa (ADD)", "Bahir Dar (BJR)", "10:00", "12:00", dec!(92.00)),
        flight("104", "Addis Ababa (ADD)", "Mekele (MQX)", "13:00", "15:00", dec!(88.00)),
        flight("105", "Dire Dawa (DIR)", "Addis Ababa (ADD)", "14:00", "16:00", dec!(89.00)),
    ]
}
