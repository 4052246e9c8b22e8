//! Activity catalogue and session seeding.
//!
//! The catalogue is either the park's built-in activity list or a JSON file
//! of the form:
//!
//! ```json
//! [
//!   { "name": "Safari", "capacity": 8 },
//!   { "name": "Tirolesa", "capacity": 10, "requires_attire_size": true, "minimum_age": 8 }
//! ]
//! ```

use crate::error::ConfigError;
use chrono::{Days, NaiveDate, TimeDelta};
use ecopark_core::{ActivityRule, ActivityRules, ParkCalendar, Session, SessionId};
use serde::Deserialize;
use std::collections::BTreeSet;
use std::num::NonZeroU32;
use std::path::Path;

/// One entry of an activities file
#[derive(Debug, Deserialize)]
struct ActivityDefinition {
    name: String,
    #[serde(flatten)]
    rule: ActivityRule,
}

/// The park's built-in catalogue.
///
/// | Activity   | Capacity | Attire size | Minimum age |
/// |------------|----------|-------------|-------------|
/// | Safari     | 8        | no          | -           |
/// | Palestra   | 12       | yes         | 12          |
/// | Jardinería | 12       | no          | -           |
/// | Tirolesa   | 10       | yes         | 8           |
#[must_use]
pub fn default_activity_rules() -> ActivityRules {
    ActivityRules::new()
        .with_activity("Safari", ActivityRule::new(capacity::<8>()))
        .with_activity(
            "Palestra",
            ActivityRule::new(capacity::<12>())
                .requiring_attire_size()
                .with_minimum_age(12),
        )
        .with_activity("Jardinería", ActivityRule::new(capacity::<12>()))
        .with_activity(
            "Tirolesa",
            ActivityRule::new(capacity::<10>())
                .requiring_attire_size()
                .with_minimum_age(8),
        )
}

const fn capacity<const N: u32>() -> NonZeroU32 {
    match NonZeroU32::new(N) {
        Some(capacity) => capacity,
        None => NonZeroU32::MIN,
    }
}

/// Load the catalogue from a JSON file.
///
/// # Errors
///
/// - [`ConfigError::ActivitiesFile`] if the file cannot be read
/// - [`ConfigError::InvalidActivities`] if it is not a list of activities,
///   a capacity is zero, a name is blank or repeated, or the list is empty
pub fn load_activity_rules(path: impl AsRef<Path>) -> Result<ActivityRules, ConfigError> {
    let path = path.as_ref();
    let display = path.display().to_string();

    let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::ActivitiesFile {
        path: display.clone(),
        source,
    })?;

    parse_activity_rules(&raw).map_err(|reason| ConfigError::InvalidActivities {
        path: display,
        reason,
    })
}

fn parse_activity_rules(raw: &str) -> Result<ActivityRules, String> {
    let definitions: Vec<ActivityDefinition> =
        serde_json::from_str(raw).map_err(|e| e.to_string())?;

    if definitions.is_empty() {
        return Err("no activities defined".to_string());
    }

    let mut seen = BTreeSet::new();
    for definition in &definitions {
        let name = definition.name.trim();
        if name.is_empty() {
            return Err("activity name cannot be blank".to_string());
        }
        if !seen.insert(name.to_string()) {
            return Err(format!("activity {name} is defined twice"));
        }
    }

    Ok(definitions
        .into_iter()
        .map(|definition| (definition.name.trim().to_string(), definition.rule))
        .collect())
}

/// Generate empty sessions for every activity.
///
/// Covers `days` calendar days starting at `from` (inclusive), skipping days
/// the park is closed. Each open day gets one session per `slot_minutes`
/// starting at opening time, the last one starting before closing time.
#[must_use]
pub fn seed_sessions(
    rules: &ActivityRules,
    calendar: &ParkCalendar,
    from: NaiveDate,
    days: u32,
    slot_minutes: u32,
) -> Vec<Session> {
    let slot = TimeDelta::minutes(i64::from(slot_minutes.max(1)));
    let mut sessions = Vec::new();

    for offset in 0..u64::from(days) {
        let Some(date) = from.checked_add_days(Days::new(offset)) else {
            break;
        };
        if calendar.is_closed(date) {
            continue;
        }

        for (activity, _) in rules.iter() {
            let mut time = calendar.opening_time;
            while time < calendar.closing_time {
                sessions.push(Session::new(SessionId::new(), activity, date, time, 0));

                let (next, wrapped) = time.overflowing_add_signed(slot);
                if wrapped != 0 {
                    break;
                }
                time = next;
            }
        }
    }

    tracing::info!(
        from = %from,
        days,
        activities = rules.len(),
        sessions = sessions.len(),
        "Seeded sessions"
    );

    sessions
}
