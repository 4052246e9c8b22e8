//! Reservation history provider.
//!
//! The validator reads already-confirmed reservations through this trait to
//! detect schedule conflicts. Implementations must reflect every reservation
//! committed before the call.

use crate::error::HistoryError;
use crate::types::{NationalId, Party, Reservation};
use chrono::{NaiveDate, NaiveTime};

/// Source of confirmed reservations.
///
/// # Examples
///
/// ```
/// use ecopark_core::history::ReservationHistory;
/// use ecopark_core::types::Reservation;
/// use chrono::{NaiveDate, NaiveTime};
///
/// let history: Vec<Reservation> = Vec::new();
/// let date = NaiveDate::from_ymd_opt(2025, 6, 4).unwrap();
/// let time = NaiveTime::from_hms_opt(14, 0, 0).unwrap();
/// assert!(history.reservations_at(date, time).unwrap().is_empty());
/// ```
pub trait ReservationHistory: Send + Sync {
    /// Confirmed reservations whose session starts at `date` and `time`.
    ///
    /// # Errors
    ///
    /// Returns [`HistoryError`] if the backing store cannot be read. This is
    /// an infrastructure fault, not a booking outcome.
    fn reservations_at(
        &self,
        date: NaiveDate,
        time: NaiveTime,
    ) -> Result<Vec<Reservation>, HistoryError>;
}

impl ReservationHistory for [Reservation] {
    fn reservations_at(
        &self,
        date: NaiveDate,
        time: NaiveTime,
    ) -> Result<Vec<Reservation>, HistoryError> {
        Ok(self
            .iter()
            .filter(|r| r.session().is_at(date, time))
            .cloned()
            .collect())
    }
}

impl ReservationHistory for Vec<Reservation> {
    fn reservations_at(
        &self,
        date: NaiveDate,
        time: NaiveTime,
    ) -> Result<Vec<Reservation>, HistoryError> {
        self.as_slice().reservations_at(date, time)
    }
}

/// First participant of `party` who already appears in one of `existing`.
///
/// Only reservations at the given date and time count, whatever the
/// provider returned.
#[must_use]
pub fn find_conflict(
    existing: &[Reservation],
    date: NaiveDate,
    time: NaiveTime,
    party: &Party,
) -> Option<NationalId> {
    let same_slot: Vec<&Reservation> = existing
        .iter()
        .filter(|r| r.session().is_at(date, time))
        .collect();

    if same_slot.is_empty() {
        return None;
    }

    party
        .national_ids()
        .find(|id| same_slot.iter().any(|r| r.includes(*id)))
}
