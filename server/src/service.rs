//! Booking service.
//!
//! Wires the validator to the session store: looks the session up, runs the
//! rule chain, persists the result. Every mutation of the store runs under a
//! single commit lock, so two concurrent bookings for the same session can
//! never both pass the capacity rule on a stale occupied count.

use crate::error::{ServiceError, StoreError};
use crate::metrics;
use crate::store::{InMemoryStore, StoredReservation};
use chrono::{FixedOffset, NaiveDate, NaiveTime};
use ecopark_core::environment::Clock;
use ecopark_core::{
    ActivityRule, BookingError, BookingValidator, Participant, Party, ReservationId, Session,
};
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::Mutex;
use tracing::{info, warn};

/// A booking request as received from a client.
#[derive(Clone, Debug)]
pub struct BookingRequest {
    /// Activity name
    pub activity: String,
    /// Session date
    pub date: NaiveDate,
    /// Session start time
    pub time: NaiveTime,
    /// Everyone being enrolled
    pub participants: Vec<Participant>,
    /// Where the confirmation goes
    pub contact_email: String,
    /// Whether terms and conditions were accepted
    pub consent_given: bool,
}

/// A session together with the rule that governs it.
#[derive(Clone, Debug)]
pub struct SessionAvailability {
    /// The session
    pub session: Session,
    /// Maximum participants, if the activity has a rule
    pub capacity: Option<u32>,
}

impl SessionAvailability {
    /// Places left, if the activity has a capacity
    #[must_use]
    pub fn available(&self) -> Option<u32> {
        self.capacity
            .map(|capacity| capacity.saturating_sub(self.session.occupied()))
    }
}

/// Booking service shared by all request handlers.
pub struct BookingService {
    store: Arc<InMemoryStore>,
    validator: BookingValidator,
    clock: Arc<dyn Clock>,
    utc_offset: FixedOffset,
    commit_lock: Mutex<()>,
}

impl BookingService {
    /// Create a booking service.
    ///
    /// `validator` should read its history from `store`, or conflicts with
    /// bookings made through this service will go unnoticed.
    #[must_use]
    pub fn new(
        store: Arc<InMemoryStore>,
        validator: BookingValidator,
        clock: Arc<dyn Clock>,
        utc_offset: FixedOffset,
    ) -> Self {
        Self {
            store,
            validator,
            clock,
            utc_offset,
            commit_lock: Mutex::new(()),
        }
    }

    /// Current date at the park
    #[must_use]
    pub fn today(&self) -> NaiveDate {
        self.clock.today(self.utc_offset)
    }

    /// Activities and their rules, in name order
    #[must_use]
    pub fn activities(&self) -> Vec<(String, ActivityRule)> {
        self.validator
            .rules()
            .iter()
            .map(|(name, rule)| (name.to_string(), rule.clone()))
            .collect()
    }

    /// Sessions on `date`, or from today onwards when `date` is `None`.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError::Store`] if the store is unavailable.
    pub fn sessions(
        &self,
        date: Option<NaiveDate>,
    ) -> Result<Vec<SessionAvailability>, ServiceError> {
        let sessions = match date {
            Some(date) => self.store.sessions_on(date)?,
            None => self.store.sessions_from(self.today())?,
        };

        Ok(sessions
            .into_iter()
            .map(|session| SessionAvailability {
                capacity: self
                    .validator
                    .rules()
                    .resolve(&session.activity)
                    .map(ActivityRule::capacity),
                session,
            })
            .collect())
    }

    /// Book a party into a session.
    ///
    /// Duplicate national IDs within the request are refused before the rule
    /// chain runs.
    ///
    /// # Errors
    ///
    /// - [`ServiceError::InvalidParty`] if the party is empty or repeats an ID
    /// - [`ServiceError::UnknownActivity`] if the activity has no rule
    /// - [`ServiceError::SessionNotFound`] if no session exists at that slot
    /// - [`ServiceError::Booking`] if a rule rejects the booking or history
    ///   is unavailable
    /// - [`ServiceError::Store`] if the store is unavailable
    pub async fn book(&self, request: BookingRequest) -> Result<StoredReservation, ServiceError> {
        let started = Instant::now();
        let result = self.try_book(request).await;

        match &result {
            Ok(stored) => metrics::record_booking_confirmed(
                &stored.reservation.session().activity,
                stored.reservation.total_participants(),
                started.elapsed().as_secs_f64(),
            ),
            Err(ServiceError::Booking(BookingError::Rejected(rejection))) => {
                metrics::record_booking_rejected(rejection.kind());
            },
            Err(ServiceError::Booking(BookingError::HistoryUnavailable(_))) => {
                metrics::record_booking_error("HISTORY_UNAVAILABLE");
            },
            Err(ServiceError::InvalidParty(_) | ServiceError::InvalidParticipant(_)) => {
                metrics::record_booking_error("INVALID_PARTY");
            },
            Err(ServiceError::UnknownActivity { .. } | ServiceError::SessionNotFound { .. }) => {
                metrics::record_booking_error("NOT_FOUND");
            },
            Err(ServiceError::Store(_)) => metrics::record_booking_error("STORE_UNAVAILABLE"),
        }

        result
    }

    async fn try_book(&self, request: BookingRequest) -> Result<StoredReservation, ServiceError> {
        let party = Party::new(request.participants)?;
        party.ensure_unique_national_ids()?;

        if self.validator.rules().resolve(&request.activity).is_none() {
            return Err(ServiceError::UnknownActivity {
                activity: request.activity,
            });
        }

        let _guard = self.commit_lock.lock().await;

        let mut session = self
            .store
            .find_session(&request.activity, request.date, request.time)?
            .ok_or_else(|| ServiceError::SessionNotFound {
                activity: request.activity.clone(),
                date: request.date,
                time: request.time,
            })?;

        let reservation = self.validator.reserve(
            &mut session,
            party,
            request.consent_given,
            &request.contact_email,
            self.today(),
        )?;

        let id = self.store.commit(reservation.clone())?;
        info!(
            reservation_id = %id,
            session_id = %session.id,
            "Reservation stored"
        );

        // Only stored reservations are confirmed.
        self.validator.confirm(&reservation);

        Ok(StoredReservation { id, reservation })
    }

    /// Look up a reservation.
    ///
    /// # Errors
    ///
    /// - [`StoreError::ReservationNotFound`] (as [`ServiceError::Store`]) if
    ///   `id` is unknown
    /// - [`ServiceError::Store`] if the store is unavailable
    pub fn reservation(&self, id: ReservationId) -> Result<StoredReservation, ServiceError> {
        self.store
            .reservation(id)?
            .ok_or(ServiceError::Store(StoreError::ReservationNotFound { id }))
    }

    /// Cancel a reservation and free its places.
    ///
    /// # Errors
    ///
    /// Same as [`BookingService::reservation`].
    pub async fn cancel(&self, id: ReservationId) -> Result<StoredReservation, ServiceError> {
        let _guard = self.commit_lock.lock().await;

        match self.store.cancel(id) {
            Ok(cancelled) => {
                metrics::record_cancellation();
                info!(
                    reservation_id = %id,
                    released = cancelled.reservation.total_participants(),
                    "Reservation cancelled"
                );
                Ok(cancelled)
            },
            Err(error) => {
                warn!(reservation_id = %id, error = %error, "Cancellation failed");
                Err(error.into())
            },
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::catalog::{default_activity_rules, seed_sessions};
    use ecopark_core::{ParkCalendar, PartyError, RejectionKind};
    use ecopark_testing::fixtures::{at, reference_date, visitor};
    use ecopark_core::{ConfirmationNotifier, NotificationError, Reservation};
    use ecopark_testing::{RecordingNotifier, test_clock};
    use std::sync::Mutex as StdMutex;

    fn seeded_store() -> Arc<InMemoryStore> {
        Arc::new(InMemoryStore::new(seed_sessions(
            &default_activity_rules(),
            &ParkCalendar::default(),
            reference_date(),
            3,
            30,
        )))
    }

    fn service_over(
        store: Arc<InMemoryStore>,
        notifier: Arc<dyn ConfirmationNotifier>,
    ) -> BookingService {
        let validator = BookingValidator::new(
            Arc::new(default_activity_rules()),
            ParkCalendar::default(),
            store.clone(),
            notifier,
        );
        let offset = FixedOffset::east_opt(0).unwrap();
        BookingService::new(store, validator, Arc::new(test_clock()), offset)
    }

    fn service() -> (BookingService, RecordingNotifier) {
        let notifier = RecordingNotifier::new();
        (
            service_over(seeded_store(), Arc::new(notifier.clone())),
            notifier,
        )
    }

    /// Notes how many reservations the store held when each confirmation
    /// went out.
    struct StoreObservingNotifier {
        store: Arc<InMemoryStore>,
        stored_at_send: StdMutex<Vec<usize>>,
    }

    impl ConfirmationNotifier for StoreObservingNotifier {
        fn send_confirmation(
            &self,
            _reservation: &Reservation,
            _contact_email: &str,
        ) -> Result<(), NotificationError> {
            let stored = self.store.reservation_count().unwrap();
            self.stored_at_send.lock().unwrap().push(stored);
            Ok(())
        }
    }

    fn request(activity: &str, participants: Vec<Participant>) -> BookingRequest {
        BookingRequest {
            activity: activity.to_string(),
            date: reference_date(),
            time: at(14, 0),
            participants,
            contact_email: "familia@example.com".to_string(),
            consent_given: true,
        }
    }

    #[tokio::test]
    async fn books_and_persists() {
        let (service, notifier) = service();

        let stored = service
            .book(request(
                "Tirolesa",
                vec![visitor("Beto", 25_678_901, 28, Some("L"))],
            ))
            .await
            .unwrap();

        assert_eq!(service.reservation(stored.id).unwrap(), stored);
        assert_eq!(notifier.count(), 1);

        let tirolesa = service
            .sessions(Some(reference_date()))
            .unwrap()
            .into_iter()
            .find(|s| s.session.activity == "Tirolesa" && s.session.time == at(14, 0))
            .unwrap();
        assert_eq!(tirolesa.session.occupied(), 1);
        assert_eq!(tirolesa.available(), Some(9));
    }

    #[tokio::test]
    async fn confirmation_goes_out_after_the_reservation_is_stored() {
        let store = seeded_store();
        let notifier = Arc::new(StoreObservingNotifier {
            store: Arc::clone(&store),
            stored_at_send: StdMutex::new(Vec::new()),
        });
        let service = service_over(store, notifier.clone());

        service
            .book(request("Safari", vec![visitor("Ana", 1, 40, None)]))
            .await
            .unwrap();

        assert_eq!(*notifier.stored_at_send.lock().unwrap(), vec![1]);
    }

    #[tokio::test]
    async fn second_booking_sees_the_first() {
        let (service, _) = service();
        let beto = visitor("Beto", 25_678_901, 28, Some("L"));

        service.book(request("Safari", vec![beto.clone()])).await.unwrap();
        let error = service.book(request("Tirolesa", vec![beto])).await.unwrap_err();

        assert!(matches!(
            error,
            ServiceError::Booking(BookingError::Rejected(ref r))
                if r.kind() == RejectionKind::ScheduleConflict
        ));
    }

    #[tokio::test]
    async fn duplicate_ids_are_refused_before_the_rules() {
        let (service, notifier) = service();
        let error = service
            .book(request(
                "Safari",
                vec![
                    visitor("Ana", 40_000_001, 40, None),
                    visitor("Ana Maria", 40_000_001, 40, None),
                ],
            ))
            .await
            .unwrap_err();

        assert!(matches!(
            error,
            ServiceError::InvalidParty(PartyError::DuplicateNationalId { .. })
        ));
        assert_eq!(notifier.count(), 0);
    }

    #[tokio::test]
    async fn unknown_activity_and_slot() {
        let (service, _) = service();

        assert!(matches!(
            service
                .book(request("Buceo", vec![visitor("Ana", 1, 40, None)]))
                .await,
            Err(ServiceError::UnknownActivity { .. })
        ));

        let mut off_grid = request("Safari", vec![visitor("Ana", 1, 40, None)]);
        off_grid.time = at(14, 10);
        assert!(matches!(
            service.book(off_grid).await,
            Err(ServiceError::SessionNotFound { .. })
        ));
    }

    #[tokio::test]
    async fn concurrent_bookings_never_overrun_capacity() {
        let (service, _) = service();
        let service = Arc::new(service);

        let mut handles = Vec::new();
        for i in 0..20u64 {
            let service = Arc::clone(&service);
            handles.push(tokio::spawn(async move {
                service
                    .book(request("Safari", vec![visitor("Ana", 1_000 + i, 40, None)]))
                    .await
            }));
        }

        let mut confirmed = 0;
        for handle in handles {
            if handle.await.unwrap().is_ok() {
                confirmed += 1;
            }
        }

        assert_eq!(confirmed, 8);
        let safari = service
            .sessions(Some(reference_date()))
            .unwrap()
            .into_iter()
            .find(|s| s.session.activity == "Safari" && s.session.time == at(14, 0))
            .unwrap();
        assert_eq!(safari.session.occupied(), 8);
    }

    #[tokio::test]
    async fn cancel_frees_places() {
        let (service, _) = service();
        let stored = service
            .book(request(
                "Safari",
                vec![visitor("Ana", 1, 40, None), visitor("Luz", 2, 9, None)],
            ))
            .await
            .unwrap();

        service.cancel(stored.id).await.unwrap();

        assert!(service.reservation(stored.id).is_err());
        assert!(matches!(
            service.cancel(stored.id).await,
            Err(ServiceError::Store(StoreError::ReservationNotFound { .. }))
        ));
        let safari = service
            .sessions(Some(reference_date()))
            .unwrap()
            .into_iter()
            .find(|s| s.session.activity == "Safari" && s.session.time == at(14, 0))
            .unwrap();
        assert_eq!(safari.session.occupied(), 0);
    }
}
