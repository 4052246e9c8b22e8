//! Confirmation notifier mocks
//!
//! - [`RecordingNotifier`]: captures every confirmation it is asked to send
//! - [`FailingNotifier`]: refuses every confirmation

#![allow(clippy::unwrap_used)] // Test infrastructure uses unwrap for simplicity
#![allow(clippy::missing_panics_doc)] // Test utilities document panics where critical

use ecopark_core::error::NotificationError;
use ecopark_core::notification::ConfirmationNotifier;
use ecopark_core::types::Reservation;
use std::sync::{Arc, Mutex};

/// One captured confirmation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SentConfirmation {
    /// Recipient address
    pub to: String,
    /// Reservation being confirmed
    pub reservation: Reservation,
}

/// Notifier that records confirmations instead of sending them.
#[derive(Clone, Debug, Default)]
pub struct RecordingNotifier {
    sent: Arc<Mutex<Vec<SentConfirmation>>>,
}

impl RecordingNotifier {
    /// Create a notifier with nothing recorded
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Confirmations sent so far, oldest first
    #[must_use]
    pub fn sent(&self) -> Vec<SentConfirmation> {
        self.sent.lock().unwrap().clone()
    }

    /// Number of confirmations sent
    #[must_use]
    pub fn count(&self) -> usize {
        self.sent.lock().unwrap().len()
    }
}

impl ConfirmationNotifier for RecordingNotifier {
    fn send_confirmation(
        &self,
        reservation: &Reservation,
        contact_email: &str,
    ) -> Result<(), NotificationError> {
        self.sent.lock().unwrap().push(SentConfirmation {
            to: contact_email.to_string(),
            reservation: reservation.clone(),
        });
        Ok(())
    }
}

/// Notifier whose every delivery fails.
#[derive(Clone, Debug, Default)]
pub struct FailingNotifier {
    attempts: Arc<Mutex<usize>>,
}

impl FailingNotifier {
    /// Create a failing notifier
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of delivery attempts made
    #[must_use]
    pub fn attempts(&self) -> usize {
        *self.attempts.lock().unwrap()
    }
}

impl ConfirmationNotifier for FailingNotifier {
    fn send_confirmation(
        &self,
        _reservation: &Reservation,
        _contact_email: &str,
    ) -> Result<(), NotificationError> {
        *self.attempts.lock().unwrap() += 1;
        Err(NotificationError::Delivery {
            reason: "mail relay refused connection".to_string(),
        })
    }
}
