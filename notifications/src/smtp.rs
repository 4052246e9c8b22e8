//! SMTP notifier implementation using Lettre.

use crate::receipt::Receipt;
use ecopark_core::{ConfirmationNotifier, NotificationError, Reservation};
use lettre::message::{Mailbox, MultiPart};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{Message, SmtpTransport, Transport};
use tracing::debug;

/// SMTP connection and sender settings.
#[derive(Clone, Debug)]
pub struct SmtpSettings {
    /// SMTP server address (e.g., "smtp.gmail.com")
    pub server: String,
    /// SMTP server port (usually 587 for STARTTLS, 465 for TLS)
    pub port: u16,
    /// SMTP authentication username
    pub username: String,
    /// SMTP authentication password
    pub password: String,
    /// Sender email address
    pub from_email: String,
    /// Sender display name
    pub from_name: String,
}

/// SMTP notifier using Lettre.
///
/// Sends the rendered [`Receipt`] as a `multipart/alternative` message with
/// plain-text and HTML parts. Sending blocks the calling thread; wrap it in a
/// [`QueuedNotifier`](crate::QueuedNotifier) to keep delivery off the request
/// path.
///
/// # Examples
///
/// ```ignore
/// use ecopark_notifications::{SmtpNotifier, SmtpSettings};
///
/// let notifier = SmtpNotifier::new(SmtpSettings {
///     server: "smtp.gmail.com".to_string(),
///     port: 587,
///     username: "park@gmail.com".to_string(),
///     password: "app_password".to_string(),
///     from_email: "reservas@ecopark.example".to_string(),
///     from_name: "EcoPark".to_string(),
/// })?;
/// ```
#[derive(Clone)]
pub struct SmtpNotifier {
    /// SMTP server address.
    server: String,

    /// SMTP server port.
    port: u16,

    /// SMTP credentials.
    credentials: Credentials,

    /// Parsed "From" mailbox.
    from: Mailbox,
}

impl SmtpNotifier {
    /// Create a new SMTP notifier.
    ///
    /// # Errors
    ///
    /// Returns [`NotificationError::InvalidRecipient`] if the sender address
    /// does not parse.
    pub fn new(settings: SmtpSettings) -> Result<Self, NotificationError> {
        let from_header = format!("{} <{}>", settings.from_name, settings.from_email);
        let from: Mailbox = from_header
            .parse()
            .map_err(|_| NotificationError::InvalidRecipient {
                address: from_header.clone(),
            })?;

        Ok(Self {
            server: settings.server,
            port: settings.port,
            credentials: Credentials::new(settings.username, settings.password),
            from,
        })
    }

    /// Build SMTP transport for sending emails.
    ///
    /// Creates a new transport for each email to avoid connection pooling issues.
    fn build_transport(&self) -> Result<SmtpTransport, NotificationError> {
        Ok(SmtpTransport::relay(&self.server)
            .map_err(|e| NotificationError::Delivery {
                reason: format!("SMTP relay error: {e}"),
            })?
            .port(self.port)
            .credentials(self.credentials.clone())
            .build())
    }

    /// Build the confirmation message.
    fn build_message(
        &self,
        reservation: &Reservation,
        contact_email: &str,
    ) -> Result<Message, NotificationError> {
        let to: Mailbox = contact_email
            .parse()
            .map_err(|_| NotificationError::InvalidRecipient {
                address: contact_email.to_string(),
            })?;
        let receipt = Receipt::for_reservation(reservation);

        Message::builder()
            .from(self.from.clone())
            .to(to)
            .subject(receipt.subject)
            .multipart(MultiPart::alternative_plain_html(receipt.text, receipt.html))
            .map_err(|e| NotificationError::Delivery {
                reason: format!("Failed to build email: {e}"),
            })
    }
}

impl ConfirmationNotifier for SmtpNotifier {
    fn send_confirmation(
        &self,
        reservation: &Reservation,
        contact_email: &str,
    ) -> Result<(), NotificationError> {
        let email = self.build_message(reservation, contact_email)?;
        let mailer = self.build_transport()?;

        mailer.send(&email).map_err(|e| NotificationError::Delivery {
            reason: format!("Failed to send email: {e}"),
        })?;

        debug!(to = %contact_email, server = %self.server, "Confirmation email sent");
        Ok(())
    }
}
