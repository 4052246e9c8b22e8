//! Business metrics for park bookings.
//!
//! # Exported Metrics
//!
//! ## Counters
//! - `ecopark_bookings_total{outcome, code}` - Booking attempts by outcome
//!   (`confirmed`, `rejected`, `error`) and rejection code
//! - `ecopark_participants_booked_total{activity}` - Participants enrolled
//! - `ecopark_cancellations_total` - Reservations cancelled
//! - `ecopark_notification_failures_total` - Confirmations that could not be
//!   delivered
//!
//! ## Histograms
//! - `ecopark_booking_duration_seconds` - Time to decide and commit a booking

use ecopark_core::{ConfirmationNotifier, NotificationError, RejectionKind, Reservation};
use metrics::{describe_counter, describe_histogram};

/// Initialize and register all business metrics descriptions.
///
/// This should be called once at application startup, before any metrics are recorded.
pub fn register_business_metrics() {
    describe_counter!(
        "ecopark_bookings_total",
        "Total number of booking attempts by outcome (confirmed, rejected, error) and code"
    );
    describe_counter!(
        "ecopark_participants_booked_total",
        "Total number of participants enrolled, by activity"
    );
    describe_counter!(
        "ecopark_cancellations_total",
        "Total number of cancelled reservations"
    );
    describe_counter!(
        "ecopark_notification_failures_total",
        "Total number of confirmations that could not be delivered"
    );
    describe_histogram!(
        "ecopark_booking_duration_seconds",
        "Time taken to validate and commit a booking"
    );

    tracing::info!("Business metrics registered");
}

// ============================================================================
// Metric Recording Functions
// ============================================================================

/// Record a confirmed booking.
pub fn record_booking_confirmed(activity: &str, participants: u32, duration_secs: f64) {
    metrics::counter!("ecopark_bookings_total", "outcome" => "confirmed", "code" => "OK")
        .increment(1);
    metrics::counter!("ecopark_participants_booked_total", "activity" => activity.to_string())
        .increment(u64::from(participants));
    metrics::histogram!("ecopark_booking_duration_seconds").record(duration_secs);
    tracing::debug!(activity, participants, "Recorded booking_confirmed metric");
}

/// Record a booking rejected by one of the eligibility rules.
pub fn record_booking_rejected(kind: RejectionKind) {
    metrics::counter!("ecopark_bookings_total", "outcome" => "rejected", "code" => kind.code())
        .increment(1);
    tracing::debug!(code = kind.code(), "Recorded booking_rejected metric");
}

/// Record a booking that failed for a reason other than a rule.
pub fn record_booking_error(code: &'static str) {
    metrics::counter!("ecopark_bookings_total", "outcome" => "error", "code" => code).increment(1);
    tracing::debug!(code, "Recorded booking_error metric");
}

/// Record a cancelled reservation.
pub fn record_cancellation() {
    metrics::counter!("ecopark_cancellations_total").increment(1);
    tracing::debug!("Recorded cancellation metric");
}

/// Record a confirmation that could not be delivered.
pub fn record_notification_failure() {
    metrics::counter!("ecopark_notification_failures_total").increment(1);
}

/// Notifier wrapper counting delivery failures.
#[derive(Clone, Debug)]
pub struct MeteredNotifier<N> {
    inner: N,
}

impl<N> MeteredNotifier<N> {
    /// Wrap `inner`
    #[must_use]
    pub const fn new(inner: N) -> Self {
        Self { inner }
    }
}

impl<N: ConfirmationNotifier> ConfirmationNotifier for MeteredNotifier<N> {
    fn send_confirmation(
        &self,
        reservation: &Reservation,
        contact_email: &str,
    ) -> Result<(), NotificationError> {
        self.inner
            .send_confirmation(reservation, contact_email)
            .inspect_err(|_| record_notification_failure())
    }
}
