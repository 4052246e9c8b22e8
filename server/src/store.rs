//! In-memory session and reservation store.
//!
//! Holds the seeded sessions with their occupied counts and every confirmed
//! reservation. It is also the [`ReservationHistory`] the validator reads
//! schedule conflicts from.
//!
//! The store itself does not serialise read-validate-write sequences; the
//! [`BookingService`](crate::service::BookingService) does, by funnelling
//! every mutation through one commit lock.

use crate::error::StoreError;
use chrono::{NaiveDate, NaiveTime};
use ecopark_core::{HistoryError, Reservation, ReservationHistory, ReservationId, Session};
use std::collections::{BTreeMap, HashMap};
use std::sync::RwLock;

/// Sessions are ordered by date, then time, then activity.
type SessionKey = (NaiveDate, NaiveTime, String);

/// A reservation as persisted, with its generated identifier.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StoredReservation {
    /// Generated identifier
    pub id: ReservationId,
    /// The confirmed reservation
    pub reservation: Reservation,
}

/// In-memory store.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    sessions: RwLock<BTreeMap<SessionKey, Session>>,
    reservations: RwLock<HashMap<ReservationId, Reservation>>,
}

fn key_of(session: &Session) -> SessionKey {
    (session.date, session.time, session.activity.clone())
}

impl InMemoryStore {
    /// Create a store holding `sessions` and no reservations
    #[must_use]
    pub fn new(sessions: impl IntoIterator<Item = Session>) -> Self {
        Self {
            sessions: RwLock::new(
                sessions
                    .into_iter()
                    .map(|session| (key_of(&session), session))
                    .collect(),
            ),
            reservations: RwLock::default(),
        }
    }

    /// Session for `activity` at `date` and `time`, with its current
    /// occupied count.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Poisoned`] if the store lock is poisoned.
    pub fn find_session(
        &self,
        activity: &str,
        date: NaiveDate,
        time: NaiveTime,
    ) -> Result<Option<Session>, StoreError> {
        let sessions = self.sessions.read().map_err(|_| StoreError::Poisoned)?;
        Ok(sessions.get(&(date, time, activity.to_string())).cloned())
    }

    /// Sessions on `date`, ordered by time then activity.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Poisoned`] if the store lock is poisoned.
    pub fn sessions_on(&self, date: NaiveDate) -> Result<Vec<Session>, StoreError> {
        let sessions = self.sessions.read().map_err(|_| StoreError::Poisoned)?;
        Ok(sessions
            .values()
            .filter(|session| session.date == date)
            .cloned()
            .collect())
    }

    /// Sessions on `date` or later, in chronological order.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Poisoned`] if the store lock is poisoned.
    pub fn sessions_from(&self, date: NaiveDate) -> Result<Vec<Session>, StoreError> {
        let sessions = self.sessions.read().map_err(|_| StoreError::Poisoned)?;
        Ok(sessions
            .values()
            .filter(|session| session.date >= date)
            .cloned()
            .collect())
    }

    /// Persist a confirmed reservation.
    ///
    /// The stored session takes the occupied count carried by the
    /// reservation's session snapshot.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Poisoned`] if the store lock is poisoned.
    pub fn commit(&self, reservation: Reservation) -> Result<ReservationId, StoreError> {
        let id = ReservationId::new();
        let session = reservation.session().clone();

        {
            let mut sessions = self.sessions.write().map_err(|_| StoreError::Poisoned)?;
            sessions.insert(key_of(&session), session);
        }
        self.reservations
            .write()
            .map_err(|_| StoreError::Poisoned)?
            .insert(id, reservation);

        Ok(id)
    }

    /// Reservation with identifier `id`.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Poisoned`] if the store lock is poisoned.
    pub fn reservation(&self, id: ReservationId) -> Result<Option<StoredReservation>, StoreError> {
        let reservations = self.reservations.read().map_err(|_| StoreError::Poisoned)?;
        Ok(reservations
            .get(&id)
            .map(|reservation| StoredReservation {
                id,
                reservation: reservation.clone(),
            }))
    }

    /// Remove a reservation and give its places back to the session.
    ///
    /// The occupied count never drops below zero.
    ///
    /// # Errors
    ///
    /// - [`StoreError::ReservationNotFound`] if `id` is unknown
    /// - [`StoreError::Poisoned`] if the store lock is poisoned
    pub fn cancel(&self, id: ReservationId) -> Result<StoredReservation, StoreError> {
        let reservation = self
            .reservations
            .write()
            .map_err(|_| StoreError::Poisoned)?
            .remove(&id)
            .ok_or(StoreError::ReservationNotFound { id })?;

        let mut sessions = self.sessions.write().map_err(|_| StoreError::Poisoned)?;
        if let Some(session) = sessions.get_mut(&key_of(reservation.session())) {
            session.release(reservation.total_participants());
        }

        Ok(StoredReservation { id, reservation })
    }

    /// Number of stored reservations.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Poisoned`] if the store lock is poisoned.
    pub fn reservation_count(&self) -> Result<usize, StoreError> {
        Ok(self
            .reservations
            .read()
            .map_err(|_| StoreError::Poisoned)?
            .len())
    }
}

impl ReservationHistory for InMemoryStore {
    fn reservations_at(
        &self,
        date: NaiveDate,
        time: NaiveTime,
    ) -> Result<Vec<Reservation>, HistoryError> {
        let reservations = self
            .reservations
            .read()
            .map_err(|_| HistoryError::Unavailable {
                reason: "reservation store lock poisoned".to_string(),
            })?;

        Ok(reservations
            .values()
            .filter(|reservation| reservation.session().is_at(date, time))
            .cloned()
            .collect())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use ecopark_core::{NationalId, Participant, Party, SessionId};

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 6, 4).unwrap()
    }

    fn time(hour: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(hour, 0, 0).unwrap()
    }

    fn booked(session: &Session, occupied_after: u32, ids: &[u64]) -> Reservation {
        let snapshot = Session::new(
            session.id,
            session.activity.clone(),
            session.date,
            session.time,
            occupied_after,
        );
        let party = Party::new(
            ids.iter()
                .map(|id| Participant::new("Ana", NationalId::new(*id), 30, None).unwrap())
                .collect(),
        )
        .unwrap();
        Reservation::from_parts(snapshot, party, "ana@example.com")
    }

    #[test]
    fn finds_sessions_by_slot() {
        let safari = Session::new(SessionId::new(), "Safari", date(), time(10), 0);
        let store = InMemoryStore::new([safari.clone()]);

        assert_eq!(
            store.find_session("Safari", date(), time(10)).unwrap(),
            Some(safari)
        );
        assert_eq!(store.find_session("Safari", date(), time(11)).unwrap(), None);
        assert_eq!(store.find_session("Palestra", date(), time(10)).unwrap(), None);
    }

    #[test]
    fn commit_updates_occupancy_and_history() {
        let safari = Session::new(SessionId::new(), "Safari", date(), time(10), 2);
        let store = InMemoryStore::new([safari.clone()]);

        let id = store.commit(booked(&safari, 4, &[1, 2])).unwrap();

        let stored = store.find_session("Safari", date(), time(10)).unwrap().unwrap();
        assert_eq!(stored.occupied(), 4);
        assert_eq!(store.reservations_at(date(), time(10)).unwrap().len(), 1);
        assert!(store.reservations_at(date(), time(11)).unwrap().is_empty());
        assert_eq!(store.reservation(id).unwrap().unwrap().id, id);
    }

    #[test]
    fn cancel_releases_places() {
        let safari = Session::new(SessionId::new(), "Safari", date(), time(10), 0);
        let store = InMemoryStore::new([safari.clone()]);
        let id = store.commit(booked(&safari, 3, &[1, 2, 3])).unwrap();

        let cancelled = store.cancel(id).unwrap();

        assert_eq!(cancelled.reservation.total_participants(), 3);
        assert_eq!(
            store
                .find_session("Safari", date(), time(10))
                .unwrap()
                .unwrap()
                .occupied(),
            0
        );
        assert_eq!(store.reservation_count().unwrap(), 0);
        assert_eq!(
            store.cancel(id),
            Err(StoreError::ReservationNotFound { id })
        );
    }

    #[test]
    fn lists_sessions_in_order() {
        let tomorrow = date().succ_opt().unwrap();
        let store = InMemoryStore::new([
            Session::new(SessionId::new(), "Tirolesa", date(), time(11), 0),
            Session::new(SessionId::new(), "Safari", tomorrow, time(9), 0),
            Session::new(SessionId::new(), "Safari", date(), time(11), 0),
            Session::new(SessionId::new(), "Safari", date(), time(9), 0),
        ]);

        let today: Vec<_> = store
            .sessions_on(date())
            .unwrap()
            .into_iter()
            .map(|s| (s.time, s.activity))
            .collect();
        assert_eq!(
            today,
            vec![
                (time(9), "Safari".to_string()),
                (time(11), "Safari".to_string()),
                (time(11), "Tirolesa".to_string()),
            ]
        );
        assert_eq!(store.sessions_from(tomorrow).unwrap().len(), 1);
    }
}
