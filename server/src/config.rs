//! Configuration management for the booking server.
//!
//! Loads configuration from environment variables with sensible defaults.

use crate::error::ConfigError;
use chrono::{FixedOffset, NaiveTime, Offset, Utc, Weekday};
use ecopark_core::{AnnualDate, ParkCalendar};
use ecopark_notifications::SmtpSettings;
use std::env;

/// Server configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// HTTP server configuration
    pub server: ServerConfig,
    /// Park calendar and session seeding
    pub park: ParkConfig,
    /// Confirmation delivery
    pub notifications: NotificationConfig,
}

/// HTTP server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Host to bind to
    pub host: String,
    /// Port to bind to
    pub port: u16,
    /// Log filter (trace, debug, info, warn, error or a full directive)
    pub log_level: String,
}

/// Park calendar and session seeding configuration
#[derive(Debug, Clone)]
pub struct ParkConfig {
    /// First bookable session time
    pub opening_time: NaiveTime,
    /// Last bookable session time
    pub closing_time: NaiveTime,
    /// Weekly closing day
    pub closed_weekday: Weekday,
    /// Sessions this many days ahead or more are not bookable yet
    pub booking_horizon_days: i64,
    /// Length of a seeded session slot in minutes
    pub slot_minutes: u32,
    /// Calendar days of sessions to seed at startup, starting today
    pub seed_days: u32,
    /// Offset from UTC used to decide what "today" is
    pub utc_offset: FixedOffset,
    /// Optional JSON file with the activity catalogue
    pub activities_file: Option<String>,
}

/// Confirmation delivery configuration
#[derive(Debug, Clone)]
pub struct NotificationConfig {
    /// SMTP settings; confirmations go to the console when absent
    pub smtp: Option<SmtpSettings>,
    /// Maximum confirmations waiting for delivery
    pub queue_size: usize,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the resulting park configuration is
    /// inconsistent (see [`Config::from_lookup`]).
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration through `lookup`, which maps a variable name to
    /// its value.
    ///
    /// Unparseable values fall back to their defaults.
    ///
    /// # Errors
    ///
    /// - [`ConfigError::InvalidOpeningHours`] if opening is not before closing
    /// - [`ConfigError::ZeroSlotLength`] if `PARK_SLOT_MINUTES` is 0
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let defaults = ParkCalendar::default();

        let config = Self {
            server: ServerConfig {
                host: lookup("HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
                port: lookup("PORT")
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(8080),
                log_level: lookup("RUST_LOG").unwrap_or_else(|| "info".to_string()),
            },
            park: ParkConfig {
                opening_time: lookup("PARK_OPENING_TIME")
                    .and_then(|s| parse_time(&s))
                    .unwrap_or(defaults.opening_time),
                closing_time: lookup("PARK_CLOSING_TIME")
                    .and_then(|s| parse_time(&s))
                    .unwrap_or(defaults.closing_time),
                closed_weekday: lookup("PARK_CLOSED_WEEKDAY")
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(defaults.closed_weekday),
                booking_horizon_days: lookup("PARK_BOOKING_HORIZON_DAYS")
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(defaults.booking_horizon_days),
                slot_minutes: lookup("PARK_SLOT_MINUTES")
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(30),
                seed_days: lookup("PARK_SEED_DAYS")
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(28),
                utc_offset: lookup("PARK_UTC_OFFSET_MINUTES")
                    .and_then(|s| s.parse::<i32>().ok())
                    .and_then(|minutes| FixedOffset::east_opt(minutes.saturating_mul(60)))
                    .unwrap_or_else(|| Utc.fix()),
                activities_file: lookup("ACTIVITIES_FILE").filter(|s| !s.trim().is_empty()),
            },
            notifications: NotificationConfig {
                smtp: lookup("SMTP_SERVER").map(|server| SmtpSettings {
                    server,
                    port: lookup("SMTP_PORT")
                        .and_then(|s| s.parse().ok())
                        .unwrap_or(587),
                    username: lookup("SMTP_USERNAME").unwrap_or_default(),
                    password: lookup("SMTP_PASSWORD").unwrap_or_default(),
                    from_email: lookup("SMTP_FROM_EMAIL")
                        .unwrap_or_else(|| "reservas@ecopark.example".to_string()),
                    from_name: lookup("SMTP_FROM_NAME").unwrap_or_else(|| "EcoPark".to_string()),
                }),
                queue_size: lookup("NOTIFICATION_QUEUE_SIZE")
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(256),
            },
        };

        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.park.opening_time >= self.park.closing_time {
            return Err(ConfigError::InvalidOpeningHours {
                opening: self.park.opening_time,
                closing: self.park.closing_time,
            });
        }
        if self.park.slot_minutes == 0 {
            return Err(ConfigError::ZeroSlotLength);
        }
        Ok(())
    }

    /// Socket address string to bind to
    #[must_use]
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }

    /// Park calendar built from this configuration.
    ///
    /// The park always closes on December 31st and January 1st.
    #[must_use]
    pub fn calendar(&self) -> ParkCalendar {
        ParkCalendar {
            opening_time: self.park.opening_time,
            closing_time: self.park.closing_time,
            closed_weekday: self.park.closed_weekday,
            closed_dates: vec![AnnualDate::new(12, 31), AnnualDate::new(1, 1)],
            booking_horizon_days: self.park.booking_horizon_days,
        }
    }
}

fn parse_time(raw: &str) -> Option<NaiveTime> {
    NaiveTime::parse_from_str(raw.trim(), "%H:%M").ok()
}
