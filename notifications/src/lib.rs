//! # EcoPark Notifications
//!
//! Confirmation delivery for committed bookings.
//!
//! Every notifier here implements [`ecopark_core::ConfirmationNotifier`] and
//! renders the same [`Receipt`]:
//!
//! - [`ConsoleNotifier`]: prints confirmations, for development
//! - [`SmtpNotifier`]: sends them through an SMTP relay with `lettre`
//! - [`QueuedNotifier`]: wraps either one and delivers in the background
//!
//! ## Example
//!
//! ```ignore
//! use ecopark_notifications::{ConsoleNotifier, QueuedNotifier};
//! use std::sync::Arc;
//!
//! let (notifier, worker) = QueuedNotifier::spawn(Arc::new(ConsoleNotifier::new()), 64);
//! ```

pub mod console;
pub mod queued;
pub mod receipt;
pub mod smtp;

pub use console::ConsoleNotifier;
pub use queued::QueuedNotifier;
pub use receipt::Receipt;
pub use smtp::{SmtpNotifier, SmtpSettings};
