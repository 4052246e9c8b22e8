//! Error types for web handlers.
//!
//! Bridges booking errors and HTTP responses, implementing Axum's
//! `IntoResponse` trait.
//!
//! | Error                          | Status | Code                      |
//! |--------------------------------|--------|---------------------------|
//! | Rule rejection                 | 422    | rule code (`NO_CAPACITY`) |
//! | Reservation history unreadable | 503    | `HISTORY_UNAVAILABLE`     |
//! | Unknown activity / session     | 404    | `NOT_FOUND`               |
//! | Invalid participant or party   | 400    | `INVALID_PARTICIPANT` ... |
//! | Store failure                  | 500    | `INTERNAL_SERVER_ERROR`   |

use crate::error::{ServiceError, StoreError};
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use ecopark_core::{BookingError, PartyError};
use serde::Serialize;
use std::fmt;

/// Application error type for web handlers.
///
/// Wraps domain errors and provides HTTP-friendly error responses.
#[derive(Debug)]
pub struct AppError {
    /// HTTP status code
    status: StatusCode,
    /// Error message (user-facing)
    message: String,
    /// Error code (for client error handling)
    code: String,
    /// Internal error (for logging, not exposed to client)
    source: Option<anyhow::Error>,
}

impl AppError {
    /// Create a new application error.
    #[must_use]
    pub const fn new(status: StatusCode, message: String, code: String) -> Self {
        Self {
            status,
            message,
            code,
            source: None,
        }
    }

    /// Create a new error with a source error.
    #[must_use]
    pub fn with_source(mut self, source: anyhow::Error) -> Self {
        self.source = Some(source);
        self
    }

    /// HTTP status of this error
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        self.status
    }

    /// Stable error code
    #[must_use]
    pub fn code(&self) -> &str {
        &self.code
    }

    /// Create a 400 Bad Request error.
    #[must_use]
    pub fn bad_request(code: &str, message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message.into(), code.to_string())
    }

    /// Create a 404 Not Found error.
    #[must_use]
    pub fn not_found(resource: impl fmt::Display, id: impl fmt::Display) -> Self {
        Self::new(
            StatusCode::NOT_FOUND,
            format!("{resource} {id} not found"),
            "NOT_FOUND".to_string(),
        )
    }

    /// Create a 422 Unprocessable Entity error carrying a rule code.
    #[must_use]
    pub fn rejected(code: &str, message: impl Into<String>) -> Self {
        Self::new(
            StatusCode::UNPROCESSABLE_ENTITY,
            message.into(),
            code.to_string(),
        )
    }

    /// Create a 500 Internal Server Error.
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(
            StatusCode::INTERNAL_SERVER_ERROR,
            message.into(),
            "INTERNAL_SERVER_ERROR".to_string(),
        )
    }

    /// Create a 503 Service Unavailable error.
    #[must_use]
    pub fn unavailable(code: &str, message: impl Into<String>) -> Self {
        Self::new(
            StatusCode::SERVICE_UNAVAILABLE,
            message.into(),
            code.to_string(),
        )
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)
    }
}

impl std::error::Error for AppError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_ref()
            .map(|e| e.as_ref() as &(dyn std::error::Error + 'static))
    }
}

/// Error response body (JSON).
#[derive(Debug, Serialize)]
struct ErrorResponse {
    /// Error code (for client error handling).
    code: String,
    /// Human-readable error message.
    message: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        if self.status.is_server_error() {
            if let Some(source) = &self.source {
                tracing::error!(
                    status = %self.status,
                    code = %self.code,
                    message = %self.message,
                    error = %source,
                    "Internal server error"
                );
            } else {
                tracing::error!(
                    status = %self.status,
                    code = %self.code,
                    message = %self.message,
                    "Internal server error"
                );
            }
        }

        let body = ErrorResponse {
            code: self.code,
            message: self.message,
        };

        (self.status, Json(body)).into_response()
    }
}

impl From<ServiceError> for AppError {
    fn from(err: ServiceError) -> Self {
        let message = err.to_string();
        match err {
            ServiceError::Booking(BookingError::Rejected(rejection)) => {
                Self::rejected(rejection.kind().code(), message)
            },
            ServiceError::Booking(BookingError::HistoryUnavailable(source)) => {
                Self::unavailable(
                    "HISTORY_UNAVAILABLE",
                    "Reservation history is unavailable, please retry",
                )
                .with_source(source.into())
            },
            ServiceError::InvalidParticipant(_) => {
                Self::bad_request("INVALID_PARTICIPANT", message)
            },
            ServiceError::InvalidParty(PartyError::DuplicateNationalId { .. }) => {
                Self::bad_request("DUPLICATE_PARTICIPANT", message)
            },
            ServiceError::InvalidParty(PartyError::Empty) => {
                Self::bad_request("EMPTY_PARTY", message)
            },
            ServiceError::UnknownActivity { activity } => Self::not_found("Activity", activity),
            ServiceError::SessionNotFound { .. } => {
                Self::new(StatusCode::NOT_FOUND, message, "NOT_FOUND".to_string())
            },
            ServiceError::Store(StoreError::ReservationNotFound { id }) => {
                Self::not_found("Reservation", id)
            },
            ServiceError::Store(source @ StoreError::Poisoned) => {
                Self::internal("An internal error occurred").with_source(source.into())
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ecopark_core::{HistoryError, Rejection};

    #[test]
    fn test_error_display() {
        let err = AppError::bad_request("BAD_REQUEST", "Invalid input");
        assert_eq!(err.to_string(), "[BAD_REQUEST] Invalid input");
    }

    #[test]
    fn test_not_found() {
        let err = AppError::not_found("Reservation", "123");
        assert_eq!(err.to_string(), "[NOT_FOUND] Reservation 123 not found");
        assert_eq!(err.status, StatusCode::NOT_FOUND);
    }

    #[test]
    fn rejections_carry_their_rule_code() {
        let err = AppError::from(ServiceError::from(BookingError::from(
            Rejection::NoCapacity {
                requested: 2,
                available: 1,
            },
        )));
        assert_eq!(err.status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(err.code, "NO_CAPACITY");
    }

    #[test]
    fn history_faults_are_retryable() {
        let err = AppError::from(ServiceError::from(BookingError::from(
            HistoryError::Unavailable {
                reason: "timeout".to_string(),
            },
        )));
        assert_eq!(err.status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(err.code, "HISTORY_UNAVAILABLE");
    }

    #[test]
    fn duplicate_participants_are_bad_requests() {
        let err = AppError::from(ServiceError::from(PartyError::DuplicateNationalId {
            national_id: ecopark_core::NationalId::new(7),
        }));
        assert_eq!(err.status, StatusCode::BAD_REQUEST);
        assert_eq!(err.code, "DUPLICATE_PARTICIPANT");
    }
}
