use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::SeatClass;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BookingStatus {
    #[default]
    Confirmed,
    CheckedIn,
    Cancelled,
}

impl BookingStatus {
    /// Confirmed and checked-in bookings count as active on the dashboard.
    pub fn is_active(self) -> bool {
        matches!(self, BookingStatus::Confirmed | BookingStatus::CheckedIn)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            BookingStatus::Confirmed => "confirmed",
            BookingStatus::CheckedIn => "checked-in",
            BookingStatus::Cancelled => "cancelled",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Booking {
    pub id: String,
    pub booking_reference: String,
    pub flight_id: String,
    pub passenger_id: String,
    pub seat_number: String,
    pub seat_class: SeatClass,
    pub total_price: Decimal,
    pub special_requests: Vec<String>,
    pub booking_date: DateTime<Utc>,
    pub status: BookingStatus,
}

/// Booking fields known before the store assigns id, reference and date.
#[derive(Clone, Debug)]
pub struct NewBooking {
    pub flight_id: String,
    pub passenger_id: String,
    pub seat_number: String,
    pub seat_class: SeatClass,
    pub total_price: Decimal,
    pub special_requests: Vec<String>,
    pub status: BookingStatus,
}

impl NewBooking {
    pub fn into_booking(self, id: String, booking_reference: String) -> Booking {
        Booking {
            id,
            booking_reference,
            flight_id: self.flight_id,
            passenger_id: self.passenger_id,
            seat_number: self.seat_number,
            seat_class: self.seat_class,
            total_price: self.total_price,
            special_requests: self.special_requests,
            booking_date: Utc::now(),
            status: self.status,
        }
    }
}
