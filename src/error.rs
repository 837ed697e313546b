use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use serde_json::json;
use thiserror::Error;
use validator::{ValidationErrors, ValidationErrorsKind};

use crate::store::StoreError;

/// One rejected field of a request payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    /// The requested resource is in a state that forbids the operation,
    /// e.g. the seat is already occupied. Reported as 400.
    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Invalid request data")]
    Validation(Vec<FieldError>),

    #[error("Internal error: {0}")]
    Internal(String),
}

pub type AppResult<T> = Result<T, AppError>;

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, json!({ "message": msg })),
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, json!({ "message": msg })),
            AppError::Conflict(msg) => (StatusCode::BAD_REQUEST, json!({ "message": msg })),
            AppError::Validation(errors) => (
                StatusCode::BAD_REQUEST,
                json!({ "message": "Invalid request data", "errors": errors }),
            ),
            AppError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!({ "message": msg }),
                )
            }
        };

        (status, Json(body)).into_response()
    }
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::SeatNotFound => AppError::NotFound("Seat not found".to_string()),
            StoreError::BookingNotFound => AppError::NotFound("Booking not found".to_string()),
            StoreError::SeatOccupied => AppError::Conflict("Seat is already occupied".to_string()),
            StoreError::DuplicateFlightNumber(number) => {
                AppError::BadRequest(format!("Flight number {} already exists", number))
            }
            StoreError::Poisoned => AppError::Internal("Data store unavailable".to_string()),
        }
    }
}

impl From<ValidationErrors> for AppError {
    fn from(errors: ValidationErrors) -> Self {
        let mut fields = Vec::new();
        flatten_validation_errors(None, &errors, &mut fields);
        fields.sort_by(|a, b| a.field.cmp(&b.field));
        AppError::Validation(fields)
    }
}

fn flatten_validation_errors(
    prefix: Option<&str>,
    errors: &ValidationErrors,
    out: &mut Vec<FieldError>,
) {
    for (field, kind) in errors.errors() {
        let field = camel_case(field);
        let path = match prefix {
            Some(prefix) => format!("{}.{}", prefix, field),
            None => field,
        };
        match kind {
            ValidationErrorsKind::Field(errs) => {
                for err in errs {
                    let message = err
                        .message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| format!("Invalid value ({})", err.code));
                    out.push(FieldError {
                        field: path.clone(),
                        message,
                    });
                }
            }
            ValidationErrorsKind::Struct(inner) => {
                flatten_validation_errors(Some(&path), inner, out)
            }
            ValidationErrorsKind::List(items) => {
                for (index, inner) in items {
                    let item_path = format!("{}[{}]", path, index);
                    flatten_validation_errors(Some(&item_path), inner, out);
                }
            }
        }
    }
}

/// Reports fields under their JSON names (`first_name` -> `firstName`).
fn camel_case(field: &str) -> String {
    let mut out = String::with_capacity(field.len());
    let mut upper = false;
    for c in field.chars() {
        if c == '_' {
            upper = true;
        } else if upper {
            out.extend(c.to_uppercase());
            upper = false;
        } else {
            out.push(c);
        }
    }
    out
}
