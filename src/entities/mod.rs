pub mod booking;
pub mod flight;
pub mod passenger;
pub mod seat;

pub use booking::{Booking, BookingStatus, NewBooking};
pub use flight::{Flight, NewFlight};
pub use passenger::{NewPassenger, Passenger};
pub use seat::{NewSeat, Seat, SeatClass};
