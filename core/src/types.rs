//! Domain types for park bookings.
//!
//! Value records only: participants, the sessions they book into, and the
//! reservations produced by a successful booking. Behaviour lives in the
//! [`validator`](crate::validator) module.

use crate::error::{ParticipantError, PartyError};
use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use uuid::Uuid;

// ============================================================================
// Identifiers
// ============================================================================

/// Unique identifier for a bookable session
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionId(Uuid);

impl SessionId {
    /// Creates a new random `SessionId`
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Create a `SessionId` from a `Uuid`
    #[must_use]
    pub const fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Get the inner UUID
    #[must_use]
    pub const fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Unique identifier assigned to a reservation when it is persisted
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ReservationId(Uuid);

impl ReservationId {
    /// Creates a new random `ReservationId`
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Create a `ReservationId` from a `Uuid`
    #[must_use]
    pub const fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Get the inner UUID
    #[must_use]
    pub const fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for ReservationId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ReservationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// National identity document number of a participant
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NationalId(u64);

impl NationalId {
    /// Creates a `NationalId` from its document number
    #[must_use]
    pub const fn new(number: u64) -> Self {
        Self(number)
    }
}

impl fmt::Display for NationalId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ============================================================================
// Participant
// ============================================================================

/// One person being enrolled in a session.
///
/// The name is validated on construction (non-empty, letters and spaces
/// only). A blank attire size is treated as absent.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Participant {
    name: String,
    national_id: NationalId,
    age: u32,
    attire_size: Option<String>,
}

impl Participant {
    /// Creates a participant.
    ///
    /// # Errors
    ///
    /// Returns [`ParticipantError`] if the name is empty or contains anything
    /// other than letters and spaces.
    pub fn new(
        name: impl Into<String>,
        national_id: NationalId,
        age: u32,
        attire_size: Option<String>,
    ) -> Result<Self, ParticipantError> {
        let name = name.into().trim().to_string();

        if name.is_empty() {
            return Err(ParticipantError::EmptyName);
        }

        if !name.chars().all(|c| c.is_alphabetic() || c == ' ') {
            return Err(ParticipantError::InvalidName { name });
        }

        let attire_size = attire_size
            .map(|size| size.trim().to_string())
            .filter(|size| !size.is_empty());

        Ok(Self {
            name,
            national_id,
            age,
            attire_size,
        })
    }

    /// Participant's full name
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Participant's national ID
    #[must_use]
    pub const fn national_id(&self) -> NationalId {
        self.national_id
    }

    /// Participant's age in years
    #[must_use]
    pub const fn age(&self) -> u32 {
        self.age
    }

    /// Attire size, if one was given
    #[must_use]
    pub fn attire_size(&self) -> Option<&str> {
        self.attire_size.as_deref()
    }
}

// ============================================================================
// Party
// ============================================================================

/// The non-empty, ordered list of participants in one booking request.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Party(Vec<Participant>);

impl Party {
    /// Creates a party from its participants.
    ///
    /// Duplicate national IDs are *not* rejected here; callers that need
    /// that guarantee run [`Party::ensure_unique_national_ids`] before
    /// booking.
    ///
    /// # Errors
    ///
    /// Returns [`PartyError::Empty`] if `participants` is empty.
    pub fn new(participants: Vec<Participant>) -> Result<Self, PartyError> {
        if participants.is_empty() {
            return Err(PartyError::Empty);
        }
        Ok(Self(participants))
    }

    /// Checks that no national ID appears twice in the party.
    ///
    /// # Errors
    ///
    /// Returns [`PartyError::DuplicateNationalId`] naming the first repeated ID.
    pub fn ensure_unique_national_ids(&self) -> Result<(), PartyError> {
        let mut seen = HashSet::with_capacity(self.0.len());
        for participant in &self.0 {
            if !seen.insert(participant.national_id) {
                return Err(PartyError::DuplicateNationalId {
                    national_id: participant.national_id,
                });
            }
        }
        Ok(())
    }

    /// Number of participants
    #[must_use]
    pub fn size(&self) -> u32 {
        u32::try_from(self.0.len()).unwrap_or(u32::MAX)
    }

    /// Participants in request order
    #[must_use]
    pub fn participants(&self) -> &[Participant] {
        &self.0
    }

    /// Iterates over the participants' national IDs
    pub fn national_ids(&self) -> impl Iterator<Item = NationalId> + '_ {
        self.0.iter().map(Participant::national_id)
    }

    /// Consumes the party, returning its participants
    #[must_use]
    pub fn into_participants(self) -> Vec<Participant> {
        self.0
    }
}

// ============================================================================
// Session
// ============================================================================

/// A bookable (activity, date, time) slot.
///
/// The occupied count only grows through a successful booking and only
/// shrinks through [`Session::release`], which never goes below zero.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Session {
    /// Session identifier
    pub id: SessionId,
    /// Name of the activity, as keyed in the activity rule table
    pub activity: String,
    /// Calendar date of the session
    pub date: NaiveDate,
    /// Start time of the session
    pub time: NaiveTime,
    occupied: u32,
}

impl Session {
    /// Creates a session with its current occupied count
    #[must_use]
    pub fn new(
        id: SessionId,
        activity: impl Into<String>,
        date: NaiveDate,
        time: NaiveTime,
        occupied: u32,
    ) -> Self {
        Self {
            id,
            activity: activity.into(),
            date,
            time,
            occupied,
        }
    }

    /// Participants already booked into this session
    #[must_use]
    pub const fn occupied(&self) -> u32 {
        self.occupied
    }

    /// True if this session starts at the given date and time
    #[must_use]
    pub fn is_at(&self, date: NaiveDate, time: NaiveTime) -> bool {
        self.date == date && self.time == time
    }

    /// Frees `count` places, saturating at zero.
    pub const fn release(&mut self, count: u32) {
        self.occupied = self.occupied.saturating_sub(count);
    }

    /// Takes `count` places. Only the validator calls this, after the
    /// capacity rule has passed.
    pub(crate) const fn occupy(&mut self, count: u32) {
        self.occupied = self.occupied.saturating_add(count);
    }
}

// ============================================================================
// Reservation
// ============================================================================

/// The confirmed result of a successful booking.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Reservation {
    session: Session,
    participants: Vec<Participant>,
    total_participants: u32,
    consent_given: bool,
    contact_email: String,
}

impl Reservation {
    /// Builds a confirmed reservation.
    ///
    /// The validator is the only producer of new reservations; storage
    /// collaborators use this to rehydrate reservations they committed
    /// earlier.
    #[must_use]
    pub fn from_parts(session: Session, party: Party, contact_email: impl Into<String>) -> Self {
        let total_participants = party.size();
        Self {
            session,
            participants: party.into_participants(),
            total_participants,
            consent_given: true,
            contact_email: contact_email.into(),
        }
    }

    /// Session that was booked (as it stood right after the booking)
    #[must_use]
    pub const fn session(&self) -> &Session {
        &self.session
    }

    /// Booked participants, in request order
    #[must_use]
    pub fn participants(&self) -> &[Participant] {
        &self.participants
    }

    /// Number of booked participants
    #[must_use]
    pub const fn total_participants(&self) -> u32 {
        self.total_participants
    }

    /// Always true: a reservation cannot exist without consent
    #[must_use]
    pub const fn consent_given(&self) -> bool {
        self.consent_given
    }

    /// Contact email given at booking time
    #[must_use]
    pub fn contact_email(&self) -> &str {
        &self.contact_email
    }

    /// True if any booked participant carries `national_id`
    #[must_use]
    pub fn includes(&self, national_id: NationalId) -> bool {
        self.participants
            .iter()
            .any(|p| p.national_id() == national_id)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn participant(name: &str, id: u64) -> Participant {
        Participant::new(name, NationalId::new(id), 30, Some("M".to_string())).unwrap()
    }

    #[test]
    fn participant_name_must_be_letters_and_spaces() {
        assert!(Participant::new("Ana María", NationalId::new(1), 30, None).is_ok());
        assert_eq!(
            Participant::new("   ", NationalId::new(1), 30, None),
            Err(ParticipantError::EmptyName)
        );
        assert!(matches!(
            Participant::new("R2D2", NationalId::new(1), 30, None),
            Err(ParticipantError::InvalidName { .. })
        ));
    }

    #[test]
    fn blank_attire_size_is_absent() {
        let p = Participant::new("Ema", NationalId::new(7), 35, Some("  ".to_string())).unwrap();
        assert_eq!(p.attire_size(), None);
    }

    #[test]
    fn empty_party_is_rejected() {
        assert_eq!(Party::new(vec![]), Err(PartyError::Empty));
    }

    #[test]
    fn duplicate_ids_are_reported_on_request() {
        let party = Party::new(vec![participant("Ana", 1), participant("Beto", 1)]).unwrap();
        assert_eq!(party.size(), 2);
        assert_eq!(
            party.ensure_unique_national_ids(),
            Err(PartyError::DuplicateNationalId {
                national_id: NationalId::new(1)
            })
        );
    }

    #[test]
    fn release_saturates_at_zero() {
        let mut session = Session::new(
            SessionId::new(),
            "Safari",
            NaiveDate::from_ymd_opt(2025, 6, 4).unwrap(),
            NaiveTime::from_hms_opt(10, 0, 0).unwrap(),
            2,
        );
        session.release(5);
        assert_eq!(session.occupied(), 0);
    }

    #[test]
    fn reservation_counts_its_participants() {
        let session = Session::new(
            SessionId::new(),
            "Safari",
            NaiveDate::from_ymd_opt(2025, 6, 4).unwrap(),
            NaiveTime::from_hms_opt(10, 0, 0).unwrap(),
            0,
        );
        let party = Party::new(vec![participant("Ana", 1), participant("Beto", 2)]).unwrap();
        let reservation = Reservation::from_parts(session, party, "ana@example.com");

        assert_eq!(reservation.total_participants(), 2);
        assert!(reservation.consent_given());
        assert!(reservation.includes(NationalId::new(2)));
        assert!(!reservation.includes(NationalId::new(3)));
    }
}
