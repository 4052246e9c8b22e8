//! Integration tests for the booking rule chain
//!
//! Drives [`BookingValidator::book`] end to end against the park's default
//! catalogue, with in-memory history and a recording notifier.

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)] // Test code can use unwrap/expect/panic

use chrono::{Days, NaiveDate};
use ecopark_core::{BookingError, BookingValidator, Participant, RejectionKind, Session};
use ecopark_testing::fixtures::{at, park_rules, party, reference_date, session, validator, visitor};
use ecopark_testing::{FailingNotifier, InMemoryHistory, RecordingNotifier, UnavailableHistory};

// ============================================================================
// Test Fixtures
// ============================================================================

const EMAIL: &str = "familia@example.com";

fn days_after_today(days: u64) -> NaiveDate {
    reference_date().checked_add_days(Days::new(days)).unwrap()
}

fn rejection_kind(result: Result<impl std::fmt::Debug, BookingError>) -> RejectionKind {
    match result {
        Err(error) => error
            .rejection()
            .map(|rejection| rejection.kind())
            .unwrap_or_else(|| panic!("expected a rule rejection, got {error:?}")),
        Ok(value) => panic!("expected a rejection, booking succeeded: {value:?}"),
    }
}

fn tirolesa_at_two(occupied: u32) -> Session {
    session("Tirolesa", reference_date(), at(14, 0), occupied)
}

fn adult_with_size() -> Participant {
    visitor("Beto Gomez", 25_678_901, 28, Some("L"))
}

struct Harness {
    history: InMemoryHistory,
    notifier: RecordingNotifier,
    validator: BookingValidator,
}

impl Harness {
    fn new() -> Self {
        let history = InMemoryHistory::new();
        let notifier = RecordingNotifier::new();
        let validator = validator(history.clone(), notifier.clone());
        Self {
            history,
            notifier,
            validator,
        }
    }
}

// ============================================================================
// Reference scenarios
// ============================================================================

#[test]
fn tirolesa_booking_with_room_succeeds() {
    let harness = Harness::new();
    let mut session = tirolesa_at_two(3);

    let reservation = harness
        .validator
        .book(
            &mut session,
            party(vec![adult_with_size()]),
            true,
            EMAIL,
            reference_date(),
        )
        .unwrap();

    assert_eq!(session.occupied(), 4);
    assert_eq!(reservation.total_participants(), 1);
    assert_eq!(reservation.session().occupied(), 4);
}

#[test]
fn full_palestra_session_has_no_capacity() {
    let harness = Harness::new();
    let mut session = session("Palestra", reference_date(), at(10, 0), 12);

    let result = harness.validator.book(
        &mut session,
        party(vec![visitor("Carla", 30_111_222, 30, Some("M"))]),
        true,
        EMAIL,
        reference_date(),
    );

    assert_eq!(rejection_kind(result), RejectionKind::NoCapacity);
    assert_eq!(session.occupied(), 12);
}

#[test]
fn tirolesa_without_attire_size_is_rejected() {
    let harness = Harness::new();
    let mut session = tirolesa_at_two(3);

    let result = harness.validator.book(
        &mut session,
        party(vec![visitor("Beto Gomez", 25_678_901, 28, None)]),
        true,
        EMAIL,
        reference_date(),
    );

    assert_eq!(rejection_kind(result), RejectionKind::MissingAttireSize);
    assert_eq!(session.occupied(), 3);
}

#[test]
fn palestra_rejects_eleven_year_old() {
    let harness = Harness::new();
    let mut session = session("Palestra", reference_date(), at(10, 0), 0);

    let result = harness.validator.book(
        &mut session,
        party(vec![
            visitor("Ana", 40_000_001, 40, Some("M")),
            visitor("Tomas", 50_000_002, 11, Some("S")),
        ]),
        true,
        EMAIL,
        reference_date(),
    );

    let error = result.unwrap_err();
    match error.rejection() {
        Some(ecopark_core::Rejection::AgeRestriction {
            name, minimum_age, ..
        }) => {
            assert_eq!(name, "Tomas");
            assert_eq!(*minimum_age, 12);
        }
        other => panic!("expected age restriction, got {other:?}"),
    }
}

#[test]
fn same_participant_cannot_hold_two_activities_at_once() {
    let harness = Harness::new();

    let mut safari = session("Safari", reference_date(), at(14, 0), 0);
    let first = harness
        .validator
        .book(
            &mut safari,
            party(vec![adult_with_size()]),
            true,
            EMAIL,
            reference_date(),
        )
        .unwrap();
    harness.history.record(first);

    let mut tirolesa = tirolesa_at_two(0);
    let result = harness.validator.book(
        &mut tirolesa,
        party(vec![adult_with_size()]),
        true,
        EMAIL,
        reference_date(),
    );

    assert_eq!(rejection_kind(result), RejectionKind::ScheduleConflict);
    assert_eq!(tirolesa.occupied(), 0);
}

#[test]
fn same_participant_at_another_time_is_fine() {
    let harness = Harness::new();

    let mut morning = session("Safari", reference_date(), at(10, 0), 0);
    let first = harness
        .validator
        .book(
            &mut morning,
            party(vec![adult_with_size()]),
            true,
            EMAIL,
            reference_date(),
        )
        .unwrap();
    harness.history.record(first);

    let mut afternoon = tirolesa_at_two(0);
    assert!(
        harness
            .validator
            .book(
                &mut afternoon,
                party(vec![adult_with_size()]),
                true,
                EMAIL,
                reference_date(),
            )
            .is_ok()
    );
}

#[test]
fn booking_horizon_is_exclusive() {
    let harness = Harness::new();

    // Wednesday + 3 = Saturday
    let mut too_far = session("Safari", days_after_today(3), at(11, 0), 0);
    let result = harness.validator.book(
        &mut too_far,
        party(vec![adult_with_size()]),
        true,
        EMAIL,
        reference_date(),
    );
    assert_eq!(rejection_kind(result), RejectionKind::ExcessiveLeadTime);

    // Wednesday + 2 = Friday
    let mut in_time = session("Safari", days_after_today(2), at(11, 0), 0);
    assert!(
        harness
            .validator
            .book(
                &mut in_time,
                party(vec![adult_with_size()]),
                true,
                EMAIL,
                reference_date(),
            )
            .is_ok()
    );
}

// ============================================================================
// Rule chain ordering
// ============================================================================

#[test]
fn consent_is_reported_before_capacity() {
    let harness = Harness::new();
    let mut session = session("Palestra", reference_date(), at(10, 0), 12);

    let result = harness.validator.book(
        &mut session,
        party(vec![visitor("Carla", 30_111_222, 30, Some("M"))]),
        false,
        EMAIL,
        reference_date(),
    );

    assert_eq!(rejection_kind(result), RejectionKind::ConsentNotAccepted);
}

#[test]
fn each_rule_is_reported_by_its_own_kind() {
    let harness = Harness::new();
    let yesterday = reference_date().pred_opt().unwrap();
    let monday = NaiveDate::from_ymd_opt(2025, 6, 2).unwrap();
    let new_year = NaiveDate::from_ymd_opt(2026, 1, 1).unwrap();
    let new_year_eve = NaiveDate::from_ymd_opt(2025, 12, 30).unwrap();

    let cases: Vec<(Session, &str, NaiveDate, RejectionKind)> = vec![
        (
            session("Safari", yesterday, at(11, 0), 0),
            EMAIL,
            reference_date(),
            RejectionKind::PastDate,
        ),
        (
            session("Safari", monday, at(11, 0), 0),
            EMAIL,
            NaiveDate::from_ymd_opt(2025, 5, 31).unwrap(),
            RejectionKind::ParkClosed,
        ),
        (
            session("Safari", new_year, at(11, 0), 0),
            EMAIL,
            new_year_eve,
            RejectionKind::ParkClosed,
        ),
        (
            session("Safari", reference_date(), at(8, 30), 0),
            EMAIL,
            reference_date(),
            RejectionKind::InvalidSchedule,
        ),
        (
            session("Safari", reference_date(), at(18, 30), 0),
            EMAIL,
            reference_date(),
            RejectionKind::InvalidSchedule,
        ),
        (
            session("Safari", reference_date(), at(11, 0), 0),
            "not-an-email",
            reference_date(),
            RejectionKind::InvalidEmail,
        ),
    ];

    for (mut session, email, today, expected) in cases {
        let result = harness.validator.book(
            &mut session,
            party(vec![adult_with_size()]),
            true,
            email,
            today,
        );
        assert_eq!(rejection_kind(result), expected, "session {session:?}");
        assert_eq!(session.occupied(), 0);
    }
}

#[test]
fn opening_and_closing_times_are_bookable() {
    let harness = Harness::new();

    for time in [at(9, 0), at(18, 0)] {
        let mut session = session("Jardinería", reference_date(), time, 0);
        assert!(
            harness
                .validator
                .book(
                    &mut session,
                    party(vec![adult_with_size()]),
                    true,
                    EMAIL,
                    reference_date(),
                )
                .is_ok(),
            "{time} should be inside opening hours"
        );
    }
}

// ============================================================================
// Commit protocol
// ============================================================================

#[test]
fn rejection_is_idempotent() {
    let harness = Harness::new();
    let mut session = tirolesa_at_two(10);
    let booking = party(vec![adult_with_size()]);

    let first = harness
        .validator
        .book(&mut session, booking.clone(), true, EMAIL, reference_date());
    let second = harness
        .validator
        .book(&mut session, booking, true, EMAIL, reference_date());

    assert_eq!(rejection_kind(first), rejection_kind(second));
    assert_eq!(session.occupied(), 10);
    assert_eq!(harness.notifier.count(), 0);
}

#[test]
fn reservation_reproduces_request() {
    let harness = Harness::new();
    let mut session = tirolesa_at_two(0);
    let participants = vec![
        visitor("Ana Perez", 40_000_001, 40, Some("M")),
        visitor("Luz Perez", 50_000_002, 9, Some("XS")),
    ];

    let reservation = harness
        .validator
        .book(
            &mut session,
            party(participants.clone()),
            true,
            EMAIL,
            reference_date(),
        )
        .unwrap();

    assert_eq!(reservation.participants(), participants.as_slice());
    assert_eq!(reservation.total_participants(), 2);
    assert_eq!(reservation.contact_email(), EMAIL);
    assert!(reservation.consent_given());
}

#[test]
fn confirmation_is_sent_after_commit() {
    let harness = Harness::new();
    let mut session = tirolesa_at_two(0);

    let reservation = harness
        .validator
        .book(
            &mut session,
            party(vec![adult_with_size()]),
            true,
            EMAIL,
            reference_date(),
        )
        .unwrap();

    let sent = harness.notifier.sent();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].to, EMAIL);
    assert_eq!(sent[0].reservation, reservation);
}

#[test]
fn failed_confirmation_keeps_the_booking() {
    let notifier = FailingNotifier::new();
    let validator = validator(InMemoryHistory::new(), notifier.clone());
    let mut session = tirolesa_at_two(3);

    let result = validator.book(
        &mut session,
        party(vec![adult_with_size()]),
        true,
        EMAIL,
        reference_date(),
    );

    assert!(result.is_ok());
    assert_eq!(session.occupied(), 4);
    assert_eq!(notifier.attempts(), 1);
}

#[test]
fn unreachable_history_is_not_a_rule_outcome() {
    let notifier = RecordingNotifier::new();
    let validator = validator(UnavailableHistory::default(), notifier.clone());
    let mut session = tirolesa_at_two(3);

    let error = validator
        .book(
            &mut session,
            party(vec![adult_with_size()]),
            true,
            EMAIL,
            reference_date(),
        )
        .unwrap_err();

    assert!(matches!(error, BookingError::HistoryUnavailable(_)));
    assert!(error.rejection().is_none());
    assert!(error.is_retryable());
    assert_eq!(session.occupied(), 3);
    assert_eq!(notifier.count(), 0);
}

#[test]
fn default_catalogue_limits() {
    let rules = park_rules();
    assert_eq!(rules.len(), 4);

    let tirolesa = rules.rules_for("Tirolesa").unwrap();
    assert_eq!(tirolesa.capacity(), 10);
    assert!(tirolesa.requires_attire_size);
    assert_eq!(tirolesa.minimum_age, Some(8));

    let safari = rules.rules_for("Safari").unwrap();
    assert_eq!(safari.capacity(), 8);
    assert!(!safari.requires_attire_size);
    assert_eq!(safari.minimum_age, None);
}
