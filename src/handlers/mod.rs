pub mod bookings;
pub mod dashboard;
pub mod flights;

use axum::extract::rejection::JsonRejection;
use axum::Json;

use crate::error::{AppError, AppResult};

/// Unwraps a JSON body, turning malformed input into a 400.
pub(crate) fn json_body<T>(payload: Result<Json<T>, JsonRejection>) -> AppResult<T> {
    payload
        .map(|Json(body)| body)
        .map_err(|rejection| AppError::BadRequest(rejection.body_text()))
}

/// Logs a store failure and hides it behind an operation-specific message.
pub(crate) fn internal<E: std::fmt::Display>(message: &'static str) -> impl FnOnce(E) -> AppError {
    move |err| {
        tracing::error!(error = %err, "{}", message);
        AppError::Internal(message.to_string())
    }
}
