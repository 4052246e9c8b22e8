//! Activity rule table.
//!
//! Static mapping from activity name to its capacity, minimum age and whether
//! an attire size is mandatory. Built once from configuration and shared by
//! reference across validations.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::num::NonZeroU32;

/// Booking constraints of one activity.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivityRule {
    /// Maximum participants per session
    pub capacity: NonZeroU32,
    /// Whether every participant must give an attire size
    #[serde(default)]
    pub requires_attire_size: bool,
    /// Minimum participant age, if any
    #[serde(default)]
    pub minimum_age: Option<u32>,
}

impl ActivityRule {
    /// Creates a rule limited only by capacity
    #[must_use]
    pub const fn new(capacity: NonZeroU32) -> Self {
        Self {
            capacity,
            requires_attire_size: false,
            minimum_age: None,
        }
    }

    /// Requires every participant to give an attire size
    #[must_use]
    pub const fn requiring_attire_size(mut self) -> Self {
        self.requires_attire_size = true;
        self
    }

    /// Sets the minimum participant age
    #[must_use]
    pub const fn with_minimum_age(mut self, minimum_age: u32) -> Self {
        self.minimum_age = Some(minimum_age);
        self
    }

    /// Capacity as a plain integer
    #[must_use]
    pub const fn capacity(&self) -> u32 {
        self.capacity.get()
    }
}

/// Lookup table of activity rules, keyed by activity name.
///
/// An optional fallback rule applies to activities missing from the table.
/// Without one, unknown activities are only subject to the calendar and
/// contact rules.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ActivityRules {
    rules: BTreeMap<String, ActivityRule>,
    fallback: Option<ActivityRule>,
}

impl ActivityRules {
    /// Creates an empty table
    #[must_use]
    pub const fn new() -> Self {
        Self {
            rules: BTreeMap::new(),
            fallback: None,
        }
    }

    /// Adds or replaces the rule for `activity`
    #[must_use]
    pub fn with_activity(mut self, activity: impl Into<String>, rule: ActivityRule) -> Self {
        self.rules.insert(activity.into(), rule);
        self
    }

    /// Sets the rule applied to activities missing from the table
    #[must_use]
    pub const fn with_fallback(mut self, rule: ActivityRule) -> Self {
        self.fallback = Some(rule);
        self
    }

    /// Rule registered for `activity`
    #[must_use]
    pub fn rules_for(&self, activity: &str) -> Option<&ActivityRule> {
        self.rules.get(activity)
    }

    /// Rule that governs `activity`: its own, else the fallback
    #[must_use]
    pub fn resolve(&self, activity: &str) -> Option<&ActivityRule> {
        self.rules_for(activity).or(self.fallback.as_ref())
    }

    /// Registered activities in name order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &ActivityRule)> {
        self.rules.iter().map(|(name, rule)| (name.as_str(), rule))
    }

    /// Number of registered activities
    #[must_use]
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// True if no activity is registered
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

impl<S: Into<String>> FromIterator<(S, ActivityRule)> for ActivityRules {
    fn from_iter<I: IntoIterator<Item = (S, ActivityRule)>>(iter: I) -> Self {
        Self {
            rules: iter
                .into_iter()
                .map(|(name, rule)| (name.into(), rule))
                .collect(),
            fallback: None,
        }
    }
}
