//! Confirmation notifier.
//!
//! Invoked by the validator after a booking is committed. Delivery is
//! best-effort: a failure is logged and never undoes the booking.

use crate::error::NotificationError;
use crate::types::Reservation;

/// Sends booking confirmations.
///
/// This trait abstracts over delivery channels (console, SMTP, a background
/// queue, ...).
pub trait ConfirmationNotifier: Send + Sync {
    /// Send the confirmation for `reservation` to `contact_email`.
    ///
    /// # Errors
    ///
    /// Returns [`NotificationError`] if the message could not be handed
    /// over for delivery.
    fn send_confirmation(
        &self,
        reservation: &Reservation,
        contact_email: &str,
    ) -> Result<(), NotificationError>;
}

/// Notifier that discards every confirmation.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopNotifier;

impl ConfirmationNotifier for NoopNotifier {
    fn send_confirmation(
        &self,
        _reservation: &Reservation,
        _contact_email: &str,
    ) -> Result<(), NotificationError> {
        Ok(())
    }
}
