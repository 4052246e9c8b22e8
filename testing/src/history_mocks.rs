//! In-memory reservation history for tests
//!
//! - [`InMemoryHistory`]: Vec-backed history with read-your-writes
//! - [`UnavailableHistory`]: always fails, for infrastructure-fault paths

#![allow(clippy::unwrap_used)] // Test infrastructure uses unwrap for simplicity
#![allow(clippy::missing_panics_doc)] // Test utilities document panics where critical

use chrono::{NaiveDate, NaiveTime};
use ecopark_core::error::HistoryError;
use ecopark_core::history::ReservationHistory;
use ecopark_core::types::Reservation;
use std::sync::{Arc, RwLock};

/// In-memory reservation history.
///
/// Clones share the same underlying list, so a test can hand one clone to
/// the validator and record committed bookings through another.
///
/// # Example
///
/// ```
/// use ecopark_testing::InMemoryHistory;
/// use ecopark_core::history::ReservationHistory;
/// use chrono::{NaiveDate, NaiveTime};
///
/// let history = InMemoryHistory::new();
/// let date = NaiveDate::from_ymd_opt(2025, 6, 4).unwrap();
/// let time = NaiveTime::from_hms_opt(14, 0, 0).unwrap();
/// assert!(history.reservations_at(date, time).unwrap().is_empty());
/// ```
#[derive(Clone, Debug, Default)]
pub struct InMemoryHistory {
    reservations: Arc<RwLock<Vec<Reservation>>>,
}

impl InMemoryHistory {
    /// Create an empty history
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a committed reservation
    pub fn record(&self, reservation: Reservation) {
        self.reservations.write().unwrap().push(reservation);
    }

    /// Number of recorded reservations
    #[must_use]
    pub fn len(&self) -> usize {
        self.reservations.read().unwrap().len()
    }

    /// Check if nothing has been recorded
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.reservations.read().unwrap().is_empty()
    }
}

impl ReservationHistory for InMemoryHistory {
    fn reservations_at(
        &self,
        date: NaiveDate,
        time: NaiveTime,
    ) -> Result<Vec<Reservation>, HistoryError> {
        self.reservations
            .read()
            .unwrap()
            .as_slice()
            .reservations_at(date, time)
    }
}

/// History that is never reachable.
#[derive(Clone, Debug)]
pub struct UnavailableHistory {
    reason: String,
}

impl UnavailableHistory {
    /// Create a history failing with `reason`
    #[must_use]
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

impl Default for UnavailableHistory {
    fn default() -> Self {
        Self::new("history store unreachable")
    }
}

impl ReservationHistory for UnavailableHistory {
    fn reservations_at(
        &self,
        _date: NaiveDate,
        _time: NaiveTime,
    ) -> Result<Vec<Reservation>, HistoryError> {
        Err(HistoryError::Unavailable {
            reason: self.reason.clone(),
        })
    }
}
