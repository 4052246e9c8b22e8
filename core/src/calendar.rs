//! Park opening calendar.
//!
//! Opening hours, closed days and how far ahead bookings are accepted.

use chrono::{Datelike, NaiveDate, NaiveTime, Weekday};
use serde::{Deserialize, Serialize};

/// A day of the year on which the park is always closed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnnualDate {
    /// Month (1-12)
    pub month: u32,
    /// Day of month (1-31)
    pub day: u32,
}

impl AnnualDate {
    /// Creates an annual date
    #[must_use]
    pub const fn new(month: u32, day: u32) -> Self {
        Self { month, day }
    }

    /// True if `date` falls on this day of the year
    #[must_use]
    pub fn matches(&self, date: NaiveDate) -> bool {
        date.month() == self.month && date.day() == self.day
    }
}

/// When the park takes bookings.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParkCalendar {
    /// Earliest bookable session time (inclusive)
    pub opening_time: NaiveTime,
    /// Latest bookable session time (inclusive)
    pub closing_time: NaiveTime,
    /// Weekday on which the park is closed
    pub closed_weekday: Weekday,
    /// Days of the year on which the park is closed
    pub closed_dates: Vec<AnnualDate>,
    /// Sessions this many days ahead or more cannot be booked yet
    pub booking_horizon_days: i64,
}

impl Default for ParkCalendar {
    fn default() -> Self {
        Self {
            opening_time: NaiveTime::from_hms_opt(9, 0, 0).unwrap_or_default(),
            closing_time: NaiveTime::from_hms_opt(18, 0, 0).unwrap_or_default(),
            closed_weekday: Weekday::Mon,
            closed_dates: vec![AnnualDate::new(12, 31), AnnualDate::new(1, 1)],
            booking_horizon_days: 3,
        }
    }
}

impl ParkCalendar {
    /// True if the park does not open on `date`
    #[must_use]
    pub fn is_closed(&self, date: NaiveDate) -> bool {
        date.weekday() == self.closed_weekday || self.closed_dates.iter().any(|d| d.matches(date))
    }

    /// True if `time` lies within opening hours, both ends included
    #[must_use]
    pub fn is_open_at(&self, time: NaiveTime) -> bool {
        (self.opening_time..=self.closing_time).contains(&time)
    }

    /// Whole days from `today` to `date` (negative for past dates)
    #[must_use]
    pub fn days_ahead(today: NaiveDate, date: NaiveDate) -> i64 {
        (date - today).num_days()
    }

    /// True if `date` is at or beyond the booking horizon
    #[must_use]
    pub fn is_beyond_horizon(&self, today: NaiveDate, date: NaiveDate) -> bool {
        Self::days_ahead(today, date) >= self.booking_horizon_days
    }
}
