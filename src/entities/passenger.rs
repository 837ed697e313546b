use serde::{Deserialize, Serialize};
use validator::Validate;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Passenger {
    pub id: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub date_of_birth: String,
    pub gender: String,
    pub nationality: String,
    pub passport_id: String,
}

impl Passenger {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

/// Passenger details as submitted by the booking form. Missing fields
/// deserialize as empty strings so validation can report each of them.
#[derive(Clone, Debug, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase", default)]
pub struct NewPassenger {
    #[validate(length(min = 1, message = "First name is required"))]
    pub first_name: String,
    #[validate(length(min = 1, message = "Last name is required"))]
    pub last_name: String,
    #[validate(email(message = "Invalid email address"))]
    pub email: String,
    #[validate(length(min = 1, message = "Phone number is required"))]
    pub phone: String,
    #[validate(length(min = 1, message = "Date of birth is required"))]
    pub date_of_birth: String,
    #[validate(length(min = 1, message = "Gender is required"))]
    pub gender: String,
    #[validate(length(min = 1, message = "Nationality is required"))]
    pub nationality: String,
    #[validate(length(min = 1, message = "ID number is required"))]
    pub passport_id: String,
}

impl NewPassenger {
    pub fn into_passenger(self, id: String) -> Passenger {
        Passenger {
            id,
            first_name: self.first_name,
            last_name: self.last_name,
            email: self.email,
            phone: self.phone,
            date_of_birth: self.date_of_birth,
            gender: self.gender,
            nationality: self.nationality,
            passport_id: self.passport_id,
        }
    }
}
