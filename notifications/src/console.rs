//! Console notifier for development and testing.

use crate::receipt::Receipt;
use ecopark_core::{ConfirmationNotifier, NotificationError, Reservation};
use tracing::info;

/// Console notifier.
///
/// Logs confirmations to the console instead of sending them.
/// Useful for development where you don't want to send real emails.
///
/// # Examples
///
/// ```ignore
/// use ecopark_notifications::ConsoleNotifier;
///
/// let notifier = ConsoleNotifier::new();
/// notifier.send_confirmation(&reservation, "visitor@example.com")?;
/// ```
#[derive(Clone, Debug, Default)]
pub struct ConsoleNotifier;

impl ConsoleNotifier {
    /// Create a new console notifier.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl ConfirmationNotifier for ConsoleNotifier {
    fn send_confirmation(
        &self,
        reservation: &Reservation,
        contact_email: &str,
    ) -> Result<(), NotificationError> {
        let receipt = Receipt::for_reservation(reservation);

        info!(
            to = %contact_email,
            activity = %reservation.session().activity,
            participants = reservation.total_participants(),
            "📧 Booking Confirmation (Development Mode)"
        );
        println!("\n╔══════════════════════════════════════════════════════════════╗");
        println!("║                  BOOKING CONFIRMATION                        ║");
        println!("╠══════════════════════════════════════════════════════════════╣");
        println!("║ To: {contact_email:<57}║");
        println!("║ Subject: {:<52}║", receipt.subject);
        println!("╠══════════════════════════════════════════════════════════════╣");
        for line in receipt.text.lines() {
            println!("║ {line:<61}║");
        }
        println!("╚══════════════════════════════════════════════════════════════╝\n");

        Ok(())
    }
}
