//! Error types for the booking server.

use chrono::{NaiveDate, NaiveTime};
use ecopark_core::{BookingError, ParticipantError, PartyError, ReservationId};
use thiserror::Error;

/// Configuration could not be loaded.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Opening time is not before closing time.
    #[error("Opening time {opening} must be before closing time {closing}")]
    InvalidOpeningHours {
        /// Configured opening time
        opening: NaiveTime,
        /// Configured closing time
        closing: NaiveTime,
    },

    /// Session slots of zero minutes.
    #[error("Session slot length must be at least one minute")]
    ZeroSlotLength,

    /// The activities file could not be read.
    #[error("Failed to read activities file {path}: {source}")]
    ActivitiesFile {
        /// File path
        path: String,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// The activities file is not a valid catalogue.
    #[error("Invalid activities file {path}: {reason}")]
    InvalidActivities {
        /// File path
        path: String,
        /// What is wrong with it
        reason: String,
    },
}

/// The in-memory store failed.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// No reservation has this identifier.
    #[error("Reservation {id} not found")]
    ReservationNotFound {
        /// Requested identifier
        id: ReservationId,
    },

    /// A writer panicked while holding the store lock.
    #[error("Store lock poisoned")]
    Poisoned,
}

/// A booking service operation failed.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// A participant record was invalid.
    #[error(transparent)]
    InvalidParticipant(#[from] ParticipantError),

    /// The party was empty or repeated a national ID.
    #[error(transparent)]
    InvalidParty(#[from] PartyError),

    /// The activity is not in the catalogue.
    #[error("Activity {activity} not found")]
    UnknownActivity {
        /// Requested activity
        activity: String,
    },

    /// No session exists for the activity at that date and time.
    #[error("No {activity} session on {date} at {time}")]
    SessionNotFound {
        /// Requested activity
        activity: String,
        /// Requested date
        date: NaiveDate,
        /// Requested time
        time: NaiveTime,
    },

    /// The booking was rejected or could not be decided.
    #[error(transparent)]
    Booking(#[from] BookingError),

    /// The store failed.
    #[error(transparent)]
    Store(#[from] StoreError),
}
