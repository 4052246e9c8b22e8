//! # EcoPark Testing
//!
//! Testing utilities and fixtures for EcoPark bookings.
//!
//! This crate provides:
//! - Mock implementations of the validator's collaborators
//! - A fixed clock for deterministic dates
//! - Fixtures mirroring the park's activity catalogue
//! - Property-based testing strategies
//!
//! ## Example
//!
//! ```
//! use ecopark_testing::{fixtures, InMemoryHistory, RecordingNotifier};
//!
//! let history = InMemoryHistory::new();
//! let notifier = RecordingNotifier::new();
//! let validator = fixtures::validator(history.clone(), notifier.clone());
//!
//! let mut session = fixtures::session("Tirolesa", fixtures::reference_date(), fixtures::at(14, 0), 3);
//! let party = fixtures::party(vec![fixtures::visitor("Beto", 25_678_901, 28, Some("L"))]);
//!
//! let reservation = validator
//!     .book(&mut session, party, true, "beto@example.com", fixtures::reference_date())
//!     .unwrap();
//! assert_eq!(session.occupied(), 4);
//! assert_eq!(notifier.count(), 1);
//! # let _ = reservation;
//! ```

pub mod history_mocks;
pub mod notifier_mocks;

use chrono::{DateTime, Utc};
use ecopark_core::environment::Clock;

/// Mock implementations of Environment traits
pub mod mocks {
    use super::{Clock, DateTime, Utc};

    /// Fixed clock for deterministic tests
    ///
    /// Always returns the same time, making tests reproducible.
    ///
    /// # Example
    ///
    /// ```
    /// use ecopark_testing::mocks::FixedClock;
    /// use ecopark_core::environment::Clock;
    /// use chrono::Utc;
    ///
    /// let clock = FixedClock::new(Utc::now());
    /// let time1 = clock.now();
    /// let time2 = clock.now();
    /// assert_eq!(time1, time2); // Always the same!
    /// ```
    #[derive(Debug, Clone)]
    pub struct FixedClock {
        time: DateTime<Utc>,
    }

    impl FixedClock {
        /// Create a new fixed clock with the given time
        #[must_use]
        pub const fn new(time: DateTime<Utc>) -> Self {
            Self { time }
        }
    }

    impl Clock for FixedClock {
        fn now(&self) -> DateTime<Utc> {
            self.time
        }
    }

    /// Create a fixed clock at the reference date (Wednesday 2025-06-04, 12:00 UTC)
    ///
    /// # Panics
    ///
    /// This function will panic if the hardcoded timestamp fails to parse,
    /// which should never happen in practice.
    #[must_use]
    #[allow(clippy::expect_used)]
    pub fn test_clock() -> FixedClock {
        FixedClock::new(
            DateTime::parse_from_rfc3339("2025-06-04T12:00:00Z")
                .expect("hardcoded timestamp should always parse")
                .with_timezone(&Utc),
        )
    }
}

/// Fixtures built around the park's default activity catalogue
#[allow(clippy::unwrap_used)] // Fixtures use hardcoded valid values
#[allow(clippy::missing_panics_doc)]
pub mod fixtures {
    use chrono::{NaiveDate, NaiveTime};
    use ecopark_core::{
        ActivityRule, ActivityRules, BookingValidator, ConfirmationNotifier, NationalId,
        ParkCalendar, Participant, Party, ReservationHistory, Session, SessionId,
    };
    use std::num::NonZeroU32;
    use std::sync::Arc;

    /// Safari, Palestra, Jardinería and Tirolesa with their published limits
    #[must_use]
    pub fn park_rules() -> ActivityRules {
        let cap = |n| NonZeroU32::new(n).unwrap();
        ActivityRules::new()
            .with_activity("Safari", ActivityRule::new(cap(8)))
            .with_activity(
                "Palestra",
                ActivityRule::new(cap(12))
                    .requiring_attire_size()
                    .with_minimum_age(12),
            )
            .with_activity("Jardinería", ActivityRule::new(cap(12)))
            .with_activity(
                "Tirolesa",
                ActivityRule::new(cap(10))
                    .requiring_attire_size()
                    .with_minimum_age(8),
            )
    }

    /// An ordinary open day: Wednesday 2025-06-04
    #[must_use]
    pub fn reference_date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 6, 4).unwrap()
    }

    /// Time of day
    #[must_use]
    pub fn at(hour: u32, minute: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(hour, minute, 0).unwrap()
    }

    /// A valid participant
    #[must_use]
    pub fn visitor(name: &str, national_id: u64, age: u32, size: Option<&str>) -> Participant {
        Participant::new(
            name,
            NationalId::new(national_id),
            age,
            size.map(str::to_string),
        )
        .unwrap()
    }

    /// A non-empty party
    #[must_use]
    pub fn party(participants: Vec<Participant>) -> Party {
        Party::new(participants).unwrap()
    }

    /// A session with a fresh identifier
    #[must_use]
    pub fn session(activity: &str, date: NaiveDate, time: NaiveTime, occupied: u32) -> Session {
        Session::new(SessionId::new(), activity, date, time, occupied)
    }

    /// Validator over [`park_rules`] and the default calendar
    #[must_use]
    pub fn validator(
        history: impl ReservationHistory + 'static,
        notifier: impl ConfirmationNotifier + 'static,
    ) -> BookingValidator {
        BookingValidator::new(
            Arc::new(park_rules()),
            ParkCalendar::default(),
            Arc::new(history),
            Arc::new(notifier),
        )
    }
}

/// Property-based testing strategies using proptest.
pub mod properties {
    use ecopark_core::{NationalId, Participant, Party};
    use proptest::prelude::*;

    /// Any valid participant; attire size present with probability one half
    pub fn arb_participant() -> impl Strategy<Value = Participant> {
        (
            "[A-Za-z]{1,10}( [A-Za-z]{1,10})?",
            1_000_000u64..99_999_999,
            0u32..90,
            proptest::option::of(prop::sample::select(vec!["XS", "S", "M", "L", "XL"])),
        )
            .prop_filter_map("valid participant", |(name, id, age, size)| {
                Participant::new(name, NationalId::new(id), age, size.map(str::to_string)).ok()
            })
    }

    /// A party of 1 to `max` participants
    pub fn arb_party(max: usize) -> impl Strategy<Value = Party> {
        prop::collection::vec(arb_participant(), 1..=max.max(1))
            .prop_filter_map("non-empty party", |participants| Party::new(participants).ok())
    }
}

// Re-export commonly used items
pub use history_mocks::{InMemoryHistory, UnavailableHistory};
pub use mocks::{FixedClock, test_clock};
pub use notifier_mocks::{FailingNotifier, RecordingNotifier, SentConfirmation};
