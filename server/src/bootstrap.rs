//! Application assembly.
//!
//! Turns a [`Config`] into the pieces the binary runs: the activity
//! catalogue, the confirmation notifier with its delivery worker, and a
//! [`BookingService`] over a freshly seeded store.
//!
//! ```rust,ignore
//! let rules = activity_rules(&config)?;
//! let (notifier, worker) = confirmation_notifier(&config.notifications)?;
//! let service = booking_service(&config, rules, Arc::new(SystemClock), notifier);
//! let app = build_router(AppState::new(Arc::new(service)));
//! ```

use crate::catalog::{default_activity_rules, load_activity_rules, seed_sessions};
use crate::config::{Config, NotificationConfig};
use crate::error::ConfigError;
use crate::metrics::MeteredNotifier;
use crate::service::BookingService;
use crate::store::InMemoryStore;
use ecopark_core::environment::Clock;
use ecopark_core::{ActivityRules, BookingValidator, ConfirmationNotifier, NotificationError};
use ecopark_notifications::{ConsoleNotifier, QueuedNotifier, SmtpNotifier};
use std::sync::Arc;
use tokio::task::JoinHandle;

/// Activity catalogue: the configured file, or the built-in one.
///
/// # Errors
///
/// Returns [`ConfigError`] if the activities file cannot be read or parsed.
pub fn activity_rules(config: &Config) -> Result<ActivityRules, ConfigError> {
    match &config.park.activities_file {
        Some(path) => {
            let rules = load_activity_rules(path)?;
            tracing::info!(path = %path, activities = rules.len(), "Loaded activity catalogue");
            Ok(rules)
        },
        None => {
            tracing::info!("Using built-in activity catalogue");
            Ok(default_activity_rules())
        },
    }
}

/// Confirmation notifier for `config`.
///
/// SMTP delivery when a relay is configured, console output otherwise.
/// Deliveries go through a queue; both failed deliveries and confirmations
/// refused by a full or closed queue are counted. The returned handle is the
/// delivery worker. Must be called from within a Tokio runtime.
///
/// # Errors
///
/// Returns [`NotificationError::InvalidRecipient`] if the configured sender
/// address is not a valid mailbox.
pub fn confirmation_notifier(
    config: &NotificationConfig,
) -> Result<(Arc<dyn ConfirmationNotifier>, JoinHandle<()>), NotificationError> {
    let inner: Arc<dyn ConfirmationNotifier> = match &config.smtp {
        Some(settings) => {
            tracing::info!(
                server = %settings.server,
                port = settings.port,
                "Confirmations via SMTP"
            );
            Arc::new(MeteredNotifier::new(SmtpNotifier::new(settings.clone())?))
        },
        None => {
            tracing::info!("SMTP not configured, printing confirmations to the console");
            Arc::new(MeteredNotifier::new(ConsoleNotifier::new()))
        },
    };

    let (queued, worker) = QueuedNotifier::spawn(inner, config.queue_size);
    Ok((Arc::new(MeteredNotifier::new(queued)), worker))
}

/// Booking service over a store seeded from today's date at the park.
#[must_use]
pub fn booking_service(
    config: &Config,
    rules: ActivityRules,
    clock: Arc<dyn Clock>,
    notifier: Arc<dyn ConfirmationNotifier>,
) -> BookingService {
    let rules = Arc::new(rules);
    let calendar = config.calendar();
    let today = clock.today(config.park.utc_offset);

    let store = Arc::new(InMemoryStore::new(seed_sessions(
        &rules,
        &calendar,
        today,
        config.park.seed_days,
        config.park.slot_minutes,
    )));
    let validator = BookingValidator::new(rules, calendar, store.clone(), notifier);

    BookingService::new(store, validator, clock, config.park.utc_offset)
}
