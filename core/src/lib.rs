//! # EcoPark Core
//!
//! Booking eligibility rules and commit protocol for timed activity sessions
//! at the park.
//!
//! Given a session, a party of participants, consent and a contact email, the
//! [`BookingValidator`] either produces a confirmed [`Reservation`] or rejects
//! the request with one specific [`Rejection`].
//!
//! ## Core Concepts
//!
//! - **Session**: a bookable (activity, date, time) slot with an occupied count
//! - **Participant** / **Party**: the people being enrolled
//! - **Reservation**: the confirmed result of a booking
//! - **Activity rules**: capacity, minimum age and attire-size requirement per
//!   activity
//! - **Park calendar**: opening hours, closed days and booking horizon
//!
//! ## Collaborators
//!
//! The validator depends on two injected traits and nothing else:
//!
//! - [`ReservationHistory`]: confirmed reservations, for schedule conflicts
//! - [`ConfirmationNotifier`]: best-effort confirmation delivery
//!
//! Session lookup, persistence and the HTTP surface live outside this crate.
//!
//! ## Example
//!
//! ```
//! use ecopark_core::{
//!     ActivityRule, ActivityRules, BookingValidator, NationalId, NoopNotifier,
//!     ParkCalendar, Participant, Party, Reservation, Session, SessionId,
//! };
//! use chrono::{NaiveDate, NaiveTime};
//! use std::num::NonZeroU32;
//! use std::sync::Arc;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let rules = ActivityRules::new().with_activity(
//!     "Tirolesa",
//!     ActivityRule::new(NonZeroU32::new(10).ok_or("zero")?)
//!         .requiring_attire_size()
//!         .with_minimum_age(8),
//! );
//! let validator = BookingValidator::new(
//!     Arc::new(rules),
//!     ParkCalendar::default(),
//!     Arc::new(Vec::<Reservation>::new()),
//!     Arc::new(NoopNotifier),
//! );
//!
//! let today = NaiveDate::from_ymd_opt(2025, 6, 4).ok_or("date")?;
//! let mut session = Session::new(
//!     SessionId::new(),
//!     "Tirolesa",
//!     today,
//!     NaiveTime::from_hms_opt(14, 0, 0).ok_or("time")?,
//!     3,
//! );
//! let party = Party::new(vec![Participant::new(
//!     "Beto",
//!     NationalId::new(25_678_901),
//!     28,
//!     Some("L".to_string()),
//! )?])?;
//!
//! let reservation = validator.book(&mut session, party, true, "beto@example.com", today)?;
//! assert_eq!(reservation.total_participants(), 1);
//! assert_eq!(session.occupied(), 4);
//! # Ok(())
//! # }
//! ```

pub mod calendar;
pub mod error;
pub mod history;
pub mod notification;
pub mod rules;
pub mod types;
pub mod validator;

// Re-export commonly used types
pub use calendar::{AnnualDate, ParkCalendar};
pub use error::{
    BookingError, HistoryError, NotificationError, ParticipantError, PartyError, Rejection,
    RejectionKind,
};
pub use history::ReservationHistory;
pub use notification::{ConfirmationNotifier, NoopNotifier};
pub use rules::{ActivityRule, ActivityRules};
pub use types::{NationalId, Participant, Party, Reservation, ReservationId, Session, SessionId};
pub use validator::BookingValidator;

/// Environment module - injected dependencies
pub mod environment {
    use chrono::{DateTime, FixedOffset, NaiveDate, Utc};

    /// Clock trait - abstracts time operations for testability
    ///
    /// # Examples
    ///
    /// ```ignore
    /// // Production - uses system clock
    /// struct SystemClock;
    /// impl Clock for SystemClock {
    ///     fn now(&self) -> DateTime<Utc> {
    ///         Utc::now()
    ///     }
    /// }
    ///
    /// // Test - fixed time for deterministic tests
    /// struct FixedClock { time: DateTime<Utc> }
    /// impl Clock for FixedClock {
    ///     fn now(&self) -> DateTime<Utc> {
    ///         self.time
    ///     }
    /// }
    /// ```
    pub trait Clock: Send + Sync {
        /// Get the current time
        fn now(&self) -> DateTime<Utc>;

        /// Current calendar date at the given UTC offset
        fn today(&self, offset: FixedOffset) -> NaiveDate {
            self.now().with_timezone(&offset).date_naive()
        }
    }

    /// Production clock backed by the system time
    #[derive(Clone, Copy, Debug, Default)]
    pub struct SystemClock;

    impl Clock for SystemClock {
        fn now(&self) -> DateTime<Utc> {
            Utc::now()
        }
    }
}
