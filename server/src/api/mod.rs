//! HTTP API endpoints.
//!
//! - `POST /api/reservations` - Book a party into a session
//! - `GET /api/reservations/:id` - Get a reservation
//! - `DELETE /api/reservations/:id` - Cancel a reservation
//! - `GET /api/activities` - List the activity catalogue
//! - `GET /api/sessions?date=YYYY-MM-DD` - List sessions and free places

pub mod activities;
pub mod error;
pub mod reservations;
pub mod sessions;

pub use error::AppError;

/// Result type alias for web handlers.
pub type WebResult<T> = Result<T, AppError>;

/// Serde adapter for `HH:MM` session times.
///
/// Seconds are accepted on input and never written on output.
pub(crate) mod hhmm {
    use chrono::NaiveTime;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(time: &NaiveTime, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(&time.format("%H:%M"))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveTime, D::Error> {
        let raw = String::deserialize(deserializer)?;
        NaiveTime::parse_from_str(&raw, "%H:%M")
            .or_else(|_| NaiveTime::parse_from_str(&raw, "%H:%M:%S"))
            .map_err(|_| serde::de::Error::custom(format!("invalid time {raw:?}, expected HH:MM")))
    }
}
