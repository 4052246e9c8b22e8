//! Booking validator.
//!
//! Runs the eligibility rules against a booking request, strictly in order,
//! and commits the booking when all of them pass:
//!
//! ```text
//!  1. consent            6. contact email
//!  2. date not past      7. capacity
//!  3. park closed        8. attire size
//!  4. lead time          9. minimum age
//!  5. opening hours     10. schedule conflict (reads history)
//! ```
//!
//! The first violated rule is reported; nothing is mutated until every rule
//! has passed. On success the session's occupied count grows by the party
//! size, a [`Reservation`] is built, and the confirmation notifier is called
//! best-effort.
//!
//! The validator does not serialise concurrent bookings of one session.
//! Callers must run read → [`BookingValidator::book`] → write under a
//! per-session lock (or a row-level transaction) or two bookings can both
//! pass the capacity rule.

use crate::calendar::ParkCalendar;
use crate::error::{BookingError, Rejection};
use crate::history::{ReservationHistory, find_conflict};
use crate::notification::ConfirmationNotifier;
use crate::rules::{ActivityRule, ActivityRules};
use crate::types::{Party, Reservation, Session};
use chrono::NaiveDate;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Validates and commits bookings.
#[derive(Clone)]
pub struct BookingValidator {
    rules: Arc<ActivityRules>,
    calendar: ParkCalendar,
    history: Arc<dyn ReservationHistory>,
    notifier: Arc<dyn ConfirmationNotifier>,
}

impl BookingValidator {
    /// Creates a validator over the given rule table and collaborators
    #[must_use]
    pub fn new(
        rules: Arc<ActivityRules>,
        calendar: ParkCalendar,
        history: Arc<dyn ReservationHistory>,
        notifier: Arc<dyn ConfirmationNotifier>,
    ) -> Self {
        Self {
            rules,
            calendar,
            history,
            notifier,
        }
    }

    /// Activity rule table in use
    #[must_use]
    pub fn rules(&self) -> &ActivityRules {
        &self.rules
    }

    /// Books `party` into `session` and sends the confirmation.
    ///
    /// Same as [`BookingValidator::reserve`] followed by
    /// [`BookingValidator::confirm`].
    ///
    /// # Errors
    ///
    /// Same as [`BookingValidator::reserve`].
    pub fn book(
        &self,
        session: &mut Session,
        party: Party,
        consent_given: bool,
        contact_email: &str,
        today: NaiveDate,
    ) -> Result<Reservation, BookingError> {
        let reservation = self.reserve(session, party, consent_given, contact_email, today)?;
        self.confirm(&reservation);
        Ok(reservation)
    }

    /// Books `party` into `session` without notifying anyone.
    ///
    /// For callers that persist the reservation before confirming it.
    /// `today` is the current date as seen by the caller; it is never read
    /// from the wall clock here.
    ///
    /// # Errors
    ///
    /// - [`BookingError::Rejected`] with the first rule the request violates
    /// - [`BookingError::HistoryUnavailable`] if existing reservations could
    ///   not be read
    ///
    /// On error `session` is left untouched.
    pub fn reserve(
        &self,
        session: &mut Session,
        party: Party,
        consent_given: bool,
        contact_email: &str,
        today: NaiveDate,
    ) -> Result<Reservation, BookingError> {
        if let Err(error) = self.check(session, &party, consent_given, contact_email, today) {
            debug!(
                session_id = %session.id,
                activity = %session.activity,
                error = %error,
                "Booking rejected"
            );
            return Err(error);
        }

        session.occupy(party.size());
        let reservation = Reservation::from_parts(session.clone(), party, contact_email);

        info!(
            session_id = %session.id,
            activity = %session.activity,
            date = %session.date,
            time = %session.time,
            participants = reservation.total_participants(),
            occupied = session.occupied(),
            "Booking confirmed"
        );

        Ok(reservation)
    }

    /// Sends the confirmation for `reservation`, best-effort.
    ///
    /// A notifier failure is logged and otherwise ignored; the booking
    /// stands.
    pub fn confirm(&self, reservation: &Reservation) {
        if let Err(error) = self
            .notifier
            .send_confirmation(reservation, reservation.contact_email())
        {
            warn!(
                to = %reservation.contact_email(),
                error = %error,
                "Confirmation could not be sent; booking stands"
            );
        }
    }

    /// Runs the whole rule chain without committing anything.
    ///
    /// # Errors
    ///
    /// Same as [`BookingValidator::book`].
    pub fn check(
        &self,
        session: &Session,
        party: &Party,
        consent_given: bool,
        contact_email: &str,
        today: NaiveDate,
    ) -> Result<(), BookingError> {
        let rule = self.rules.resolve(&session.activity);

        Self::check_consent(consent_given)?;
        Self::check_not_past(session, today)?;
        self.check_park_open(session)?;
        self.check_lead_time(session, today)?;
        self.check_opening_hours(session)?;
        Self::check_email(contact_email)?;

        if let Some(rule) = rule {
            Self::check_capacity(session, party, rule)?;
            Self::check_attire_size(session, party, rule)?;
            Self::check_minimum_age(session, party, rule)?;
        }

        self.check_schedule_conflict(session, party)
    }

    /// Rule 1
    const fn check_consent(consent_given: bool) -> Result<(), Rejection> {
        if consent_given {
            Ok(())
        } else {
            Err(Rejection::ConsentNotAccepted)
        }
    }

    /// Rule 2
    fn check_not_past(session: &Session, today: NaiveDate) -> Result<(), Rejection> {
        if session.date < today {
            return Err(Rejection::PastDate { date: session.date });
        }
        Ok(())
    }

    /// Rule 3
    fn check_park_open(&self, session: &Session) -> Result<(), Rejection> {
        if self.calendar.is_closed(session.date) {
            return Err(Rejection::ParkClosed { date: session.date });
        }
        Ok(())
    }

    /// Rule 4
    fn check_lead_time(&self, session: &Session, today: NaiveDate) -> Result<(), Rejection> {
        if self.calendar.is_beyond_horizon(today, session.date) {
            return Err(Rejection::ExcessiveLeadTime {
                date: session.date,
                days_ahead: ParkCalendar::days_ahead(today, session.date),
                horizon_days: self.calendar.booking_horizon_days,
            });
        }
        Ok(())
    }

    /// Rule 5
    fn check_opening_hours(&self, session: &Session) -> Result<(), Rejection> {
        if !self.calendar.is_open_at(session.time) {
            return Err(Rejection::InvalidSchedule {
                time: session.time,
                opening: self.calendar.opening_time,
                closing: self.calendar.closing_time,
            });
        }
        Ok(())
    }

    /// Rule 6
    fn check_email(contact_email: &str) -> Result<(), Rejection> {
        if is_plausible_email(contact_email) {
            Ok(())
        } else {
            Err(Rejection::InvalidEmail {
                email: contact_email.to_string(),
            })
        }
    }

    /// Rule 7
    fn check_capacity(
        session: &Session,
        party: &Party,
        rule: &ActivityRule,
    ) -> Result<(), Rejection> {
        let capacity = rule.capacity();
        let requested = party.size();
        let fits = session
            .occupied()
            .checked_add(requested)
            .is_some_and(|total| total <= capacity);

        if !fits {
            return Err(Rejection::NoCapacity {
                requested,
                available: capacity.saturating_sub(session.occupied()),
            });
        }
        Ok(())
    }

    /// Rule 8
    fn check_attire_size(
        session: &Session,
        party: &Party,
        rule: &ActivityRule,
    ) -> Result<(), Rejection> {
        if !rule.requires_attire_size {
            return Ok(());
        }

        match party
            .participants()
            .iter()
            .find(|p| p.attire_size().is_none())
        {
            Some(offender) => Err(Rejection::MissingAttireSize {
                activity: session.activity.clone(),
                name: offender.name().to_string(),
            }),
            None => Ok(()),
        }
    }

    /// Rule 9
    fn check_minimum_age(
        session: &Session,
        party: &Party,
        rule: &ActivityRule,
    ) -> Result<(), Rejection> {
        let Some(minimum_age) = rule.minimum_age else {
            return Ok(());
        };

        match party.participants().iter().find(|p| p.age() < minimum_age) {
            Some(offender) => Err(Rejection::AgeRestriction {
                activity: session.activity.clone(),
                name: offender.name().to_string(),
                age: offender.age(),
                minimum_age,
            }),
            None => Ok(()),
        }
    }

    /// Rule 10
    fn check_schedule_conflict(
        &self,
        session: &Session,
        party: &Party,
    ) -> Result<(), BookingError> {
        let existing = self.history.reservations_at(session.date, session.time)?;

        if let Some(national_id) = find_conflict(&existing, session.date, session.time, party) {
            return Err(Rejection::ScheduleConflict {
                national_id,
                date: session.date,
                time: session.time,
            }
            .into());
        }
        Ok(())
    }
}

/// Permissive shape check: an `@` that is not the first character, followed
/// somewhere by a `.`.
#[must_use]
pub fn is_plausible_email(email: &str) -> bool {
    match email.find('@') {
        Some(at) if at > 0 => email[at + 1..].contains('.'),
        _ => false,
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::error::{HistoryError, NotificationError, RejectionKind};
    use crate::notification::NoopNotifier;
    use crate::types::{NationalId, Participant, SessionId};
    use chrono::NaiveTime;
    use std::num::NonZeroU32;
    use std::sync::Mutex;

    struct BrokenHistory;

    impl ReservationHistory for BrokenHistory {
        fn reservations_at(
            &self,
            _date: NaiveDate,
            _time: NaiveTime,
        ) -> Result<Vec<Reservation>, HistoryError> {
            Err(HistoryError::Unavailable {
                reason: "connection reset".to_string(),
            })
        }
    }

    #[derive(Default)]
    struct RefusingNotifier {
        attempts: Mutex<u32>,
    }

    impl ConfirmationNotifier for RefusingNotifier {
        fn send_confirmation(
            &self,
            _reservation: &Reservation,
            _contact_email: &str,
        ) -> Result<(), NotificationError> {
            *self.attempts.lock().unwrap() += 1;
            Err(NotificationError::Delivery {
                reason: "smtp down".to_string(),
            })
        }
    }

    // 2025-06-04 is a Wednesday
    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 6, 4).unwrap()
    }

    fn rules() -> Arc<ActivityRules> {
        Arc::new(ActivityRules::new().with_activity(
            "Tirolesa",
            ActivityRule::new(NonZeroU32::new(10).unwrap())
                .requiring_attire_size()
                .with_minimum_age(8),
        ))
    }

    fn validator(
        history: Arc<dyn ReservationHistory>,
        notifier: Arc<dyn ConfirmationNotifier>,
    ) -> BookingValidator {
        BookingValidator::new(rules(), ParkCalendar::default(), history, notifier)
    }

    fn session(occupied: u32) -> Session {
        Session::new(
            SessionId::new(),
            "Tirolesa",
            today(),
            NaiveTime::from_hms_opt(14, 0, 0).unwrap(),
            occupied,
        )
    }

    fn beto() -> Party {
        Party::new(vec![
            Participant::new(
                "Beto",
                NationalId::new(25_678_901),
                28,
                Some("L".to_string()),
            )
            .unwrap(),
        ])
        .unwrap()
    }

    #[test]
    fn email_shape() {
        assert!(is_plausible_email("ana@example.com"));
        assert!(is_plausible_email("a@b.c"));
        assert!(!is_plausible_email("@example.com"));
        assert!(!is_plausible_email("ana.example@com"));
        assert!(!is_plausible_email("ana@examplecom"));
        assert!(!is_plausible_email(""));
    }

    #[test]
    fn rejection_leaves_session_untouched() {
        let v = validator(Arc::new(Vec::<Reservation>::new()), Arc::new(NoopNotifier));
        let mut s = session(10);

        let err = v.book(&mut s, beto(), true, "beto@example.com", today()).unwrap_err();

        assert_eq!(err.rejection().map(Rejection::kind), Some(RejectionKind::NoCapacity));
        assert_eq!(s.occupied(), 10);
    }

    #[test]
    fn history_failure_is_not_a_rejection() {
        let v = validator(Arc::new(BrokenHistory), Arc::new(NoopNotifier));
        let mut s = session(3);

        let err = v.book(&mut s, beto(), true, "beto@example.com", today()).unwrap_err();

        assert!(err.is_retryable());
        assert!(matches!(err, BookingError::HistoryUnavailable(_)));
        assert_eq!(s.occupied(), 3);
    }

    #[test]
    fn notifier_failure_does_not_void_booking() {
        let notifier = Arc::new(RefusingNotifier::default());
        let v = validator(Arc::new(Vec::<Reservation>::new()), notifier.clone());
        let mut s = session(3);

        let reservation = v.book(&mut s, beto(), true, "beto@example.com", today()).unwrap();

        assert_eq!(*notifier.attempts.lock().unwrap(), 1);
        assert_eq!(reservation.total_participants(), 1);
        assert_eq!(s.occupied(), 4);
    }

    #[test]
    fn reserve_leaves_confirmation_to_the_caller() {
        let notifier = Arc::new(RefusingNotifier::default());
        let v = validator(Arc::new(Vec::<Reservation>::new()), notifier.clone());
        let mut s = session(3);

        let reservation = v
            .reserve(&mut s, beto(), true, "beto@example.com", today())
            .unwrap();
        assert_eq!(*notifier.attempts.lock().unwrap(), 0);
        assert_eq!(s.occupied(), 4);

        v.confirm(&reservation);
        assert_eq!(*notifier.attempts.lock().unwrap(), 1);
    }

    #[test]
    fn unknown_activity_without_fallback_skips_activity_rules() {
        let v = validator(Arc::new(Vec::<Reservation>::new()), Arc::new(NoopNotifier));
        let mut s = Session::new(
            SessionId::new(),
            "Kayak",
            today(),
            NaiveTime::from_hms_opt(10, 0, 0).unwrap(),
            500,
        );
        let party = Party::new(vec![
            Participant::new("Gala", NationalId::new(50_000_001), 2, None).unwrap(),
        ])
        .unwrap();

        assert!(v.book(&mut s, party, true, "gala@example.com", today()).is_ok());
        assert_eq!(s.occupied(), 501);
    }

    #[test]
    fn unknown_activity_uses_fallback_capacity() {
        let rules = ActivityRules::new()
            .with_fallback(ActivityRule::new(NonZeroU32::new(2).unwrap()));
        let v = BookingValidator::new(
            Arc::new(rules),
            ParkCalendar::default(),
            Arc::new(Vec::<Reservation>::new()),
            Arc::new(NoopNotifier),
        );
        let mut s = Session::new(
            SessionId::new(),
            "Kayak",
            today(),
            NaiveTime::from_hms_opt(10, 0, 0).unwrap(),
            2,
        );

        let err = v.book(&mut s, beto(), true, "beto@example.com", today()).unwrap_err();
        assert_eq!(err.rejection().map(Rejection::kind), Some(RejectionKind::NoCapacity));
    }

    #[test]
    fn past_date_wins_over_closed_day() {
        let v = validator(Arc::new(Vec::<Reservation>::new()), Arc::new(NoopNotifier));
        // 2025-06-02 is a Monday and in the past
        let mut s = Session::new(
            SessionId::new(),
            "Tirolesa",
            NaiveDate::from_ymd_opt(2025, 6, 2).unwrap(),
            NaiveTime::from_hms_opt(14, 0, 0).unwrap(),
            0,
        );

        let err = v.book(&mut s, beto(), true, "beto@example.com", today()).unwrap_err();
        assert_eq!(err.rejection().map(Rejection::kind), Some(RejectionKind::PastDate));
    }
}
