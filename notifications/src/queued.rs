//! Background delivery queue.
//!
//! [`QueuedNotifier`] accepts confirmations on the booking path and hands
//! them to a worker task, so a slow or failing mail relay never delays a
//! booking response.

use ecopark_core::{ConfirmationNotifier, NotificationError, Reservation};
use std::sync::Arc;
use tokio::sync::mpsc::{self, error::TrySendError};
use tokio::task::JoinHandle;

/// One confirmation waiting for delivery.
struct Job {
    reservation: Reservation,
    to: String,
}

/// Notifier that enqueues confirmations for a background worker.
///
/// `send_confirmation` never blocks: it fails fast with
/// [`NotificationError::Delivery`] when the queue is full and with
/// [`NotificationError::QueueClosed`] once the worker has stopped. Delivery
/// errors from the wrapped notifier are logged by the worker.
///
/// The worker exits after every clone of the notifier has been dropped and
/// the queue has drained.
#[derive(Clone, Debug)]
pub struct QueuedNotifier {
    sender: mpsc::Sender<Job>,
}

impl QueuedNotifier {
    /// Spawn the delivery worker on the current Tokio runtime.
    ///
    /// `buffer_size` bounds the number of pending confirmations (minimum 1).
    /// Each delivery runs on the blocking thread pool.
    #[must_use]
    pub fn spawn(
        inner: Arc<dyn ConfirmationNotifier>,
        buffer_size: usize,
    ) -> (Self, JoinHandle<()>) {
        let (tx, mut rx) = mpsc::channel::<Job>(buffer_size.max(1));

        let handle = tokio::spawn(async move {
            while let Some(job) = rx.recv().await {
                let inner = Arc::clone(&inner);
                let to = job.to.clone();

                let outcome = tokio::task::spawn_blocking(move || {
                    inner.send_confirmation(&job.reservation, &job.to)
                })
                .await;

                match outcome {
                    Ok(Ok(())) => {
                        tracing::debug!(to = %to, "Confirmation delivered");
                    },
                    Ok(Err(error)) => {
                        tracing::warn!(to = %to, error = %error, "Confirmation delivery failed");
                    },
                    Err(error) => {
                        tracing::error!(to = %to, error = %error, "Confirmation task failed");
                    },
                }
            }

            tracing::debug!("Notification queue drained, exiting worker");
        });

        (Self { sender: tx }, handle)
    }
}

impl ConfirmationNotifier for QueuedNotifier {
    fn send_confirmation(
        &self,
        reservation: &Reservation,
        contact_email: &str,
    ) -> Result<(), NotificationError> {
        let job = Job {
            reservation: reservation.clone(),
            to: contact_email.to_string(),
        };

        self.sender.try_send(job).map_err(|error| match error {
            TrySendError::Full(_) => NotificationError::Delivery {
                reason: "notification queue full".to_string(),
            },
            TrySendError::Closed(_) => NotificationError::QueueClosed,
        })
    }
}
