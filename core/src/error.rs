//! Error types for booking operations.
//!
//! Every rule of the booking chain has its own [`Rejection`] variant so
//! callers can map each one to a specific message or status. Infrastructure
//! faults that are not rule outcomes travel separately in [`BookingError`].

use crate::types::NationalId;
use chrono::{NaiveDate, NaiveTime};
use serde::Serialize;
use std::fmt;
use thiserror::Error;

/// A booking request failed one of the eligibility rules.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum Rejection {
    /// The booker did not accept the terms and conditions.
    #[error("Terms and conditions must be accepted")]
    ConsentNotAccepted,

    /// The session date is before the current date.
    #[error("Session date {date} is in the past")]
    PastDate {
        /// Requested session date
        date: NaiveDate,
    },

    /// The park does not open on the session date.
    #[error("The park is closed on {date}")]
    ParkClosed {
        /// Requested session date
        date: NaiveDate,
    },

    /// The session is too far ahead to be booked yet.
    #[error("Bookings must be made less than {horizon_days} days ahead ({date} is {days_ahead} days away)")]
    ExcessiveLeadTime {
        /// Requested session date
        date: NaiveDate,
        /// Days between the current date and the session date
        days_ahead: i64,
        /// Configured booking horizon
        horizon_days: i64,
    },

    /// The session time falls outside opening hours.
    #[error("Session time {time} is outside opening hours ({opening}-{closing})")]
    InvalidSchedule {
        /// Requested session time
        time: NaiveTime,
        /// Park opening time
        opening: NaiveTime,
        /// Park closing time
        closing: NaiveTime,
    },

    /// The contact email is not shaped like an address.
    #[error("Invalid contact email: {email}")]
    InvalidEmail {
        /// The rejected address
        email: String,
    },

    /// The session cannot take the whole party.
    #[error("Not enough places: {requested} requested, {available} available")]
    NoCapacity {
        /// Party size
        requested: u32,
        /// Places left before this booking
        available: u32,
    },

    /// The activity needs an attire size and a participant gave none.
    #[error("{activity} requires an attire size; {name} did not provide one")]
    MissingAttireSize {
        /// Activity name
        activity: String,
        /// First participant without a size
        name: String,
    },

    /// A participant is younger than the activity allows.
    #[error("{activity} requires age {minimum_age} or older; {name} is {age}")]
    AgeRestriction {
        /// Activity name
        activity: String,
        /// First participant under age
        name: String,
        /// That participant's age
        age: u32,
        /// Activity minimum age
        minimum_age: u32,
    },

    /// A participant already holds a reservation at the same date and time.
    #[error("Participant {national_id} already has a reservation on {date} at {time}")]
    ScheduleConflict {
        /// The double-booked participant
        national_id: NationalId,
        /// Session date
        date: NaiveDate,
        /// Session time
        time: NaiveTime,
    },
}

/// Field-less discriminant of a [`Rejection`], in rule-chain order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RejectionKind {
    /// Rule 1
    ConsentNotAccepted,
    /// Rule 2
    PastDate,
    /// Rule 3
    ParkClosed,
    /// Rule 4
    ExcessiveLeadTime,
    /// Rule 5
    InvalidSchedule,
    /// Rule 6
    InvalidEmail,
    /// Rule 7
    NoCapacity,
    /// Rule 8
    MissingAttireSize,
    /// Rule 9
    AgeRestriction,
    /// Rule 10
    ScheduleConflict,
}

impl RejectionKind {
    /// Stable machine-readable code
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::ConsentNotAccepted => "CONSENT_NOT_ACCEPTED",
            Self::PastDate => "PAST_DATE",
            Self::ParkClosed => "PARK_CLOSED",
            Self::ExcessiveLeadTime => "EXCESSIVE_LEAD_TIME",
            Self::InvalidSchedule => "INVALID_SCHEDULE",
            Self::InvalidEmail => "INVALID_EMAIL",
            Self::NoCapacity => "NO_CAPACITY",
            Self::MissingAttireSize => "MISSING_ATTIRE_SIZE",
            Self::AgeRestriction => "AGE_RESTRICTION",
            Self::ScheduleConflict => "SCHEDULE_CONFLICT",
        }
    }
}

impl fmt::Display for RejectionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl Rejection {
    /// Which rule produced this rejection
    #[must_use]
    pub const fn kind(&self) -> RejectionKind {
        match self {
            Self::ConsentNotAccepted => RejectionKind::ConsentNotAccepted,
            Self::PastDate { .. } => RejectionKind::PastDate,
            Self::ParkClosed { .. } => RejectionKind::ParkClosed,
            Self::ExcessiveLeadTime { .. } => RejectionKind::ExcessiveLeadTime,
            Self::InvalidSchedule { .. } => RejectionKind::InvalidSchedule,
            Self::InvalidEmail { .. } => RejectionKind::InvalidEmail,
            Self::NoCapacity { .. } => RejectionKind::NoCapacity,
            Self::MissingAttireSize { .. } => RejectionKind::MissingAttireSize,
            Self::AgeRestriction { .. } => RejectionKind::AgeRestriction,
            Self::ScheduleConflict { .. } => RejectionKind::ScheduleConflict,
        }
    }
}

/// The reservation history could not be read.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum HistoryError {
    /// The backing store did not answer.
    #[error("Reservation history unavailable: {reason}")]
    Unavailable {
        /// Underlying cause
        reason: String,
    },
}

/// Failure of a booking attempt.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum BookingError {
    /// A rule of the booking chain rejected the request.
    #[error("Booking rejected: {0}")]
    Rejected(#[from] Rejection),

    /// Existing reservations could not be read; the request may be retried.
    #[error(transparent)]
    HistoryUnavailable(#[from] HistoryError),
}

impl BookingError {
    /// The rule rejection, if this is one
    #[must_use]
    pub const fn rejection(&self) -> Option<&Rejection> {
        match self {
            Self::Rejected(rejection) => Some(rejection),
            Self::HistoryUnavailable(_) => None,
        }
    }

    /// True for infrastructure faults the caller should retry
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(self, Self::HistoryUnavailable(_))
    }
}

/// Sending a confirmation failed. Never fatal to a booking.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum NotificationError {
    /// The recipient address was refused.
    #[error("Invalid recipient address: {address}")]
    InvalidRecipient {
        /// Refused address
        address: String,
    },

    /// The message could not be delivered.
    #[error("Delivery failed: {reason}")]
    Delivery {
        /// Underlying cause
        reason: String,
    },

    /// The background delivery queue has shut down.
    #[error("Notification queue closed")]
    QueueClosed,
}

/// A participant record could not be created.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ParticipantError {
    /// Name was empty or blank.
    #[error("Participant name cannot be empty")]
    EmptyName,

    /// Name contained characters other than letters and spaces.
    #[error("Participant name may only contain letters and spaces: {name}")]
    InvalidName {
        /// Rejected name
        name: String,
    },
}

/// A party of participants could not be formed.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PartyError {
    /// No participants were given.
    #[error("A booking needs at least one participant")]
    Empty,

    /// The same national ID appears twice in one request.
    #[error("National ID {national_id} appears more than once in the request")]
    DuplicateNationalId {
        /// Repeated ID
        national_id: NationalId,
    },
}
