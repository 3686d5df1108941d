//! Clock adapter mirroring the receiver's time
//!
//! The tracker has no battery-backed RTC; local time is a passive mirror of
//! the last valid time the receiver reported. It is adopted whenever the fix
//! carries a valid, freshly updated time-of-day and is never advanced by a
//! free-running tick, so interval arithmetic always works against receiver
//! time.

use core::fmt::Write;
use core::ops::Add;
use heapless::String;

use crate::gps::fix::{FixDateTime, GpsSnapshot};

/// Seconds since the Unix epoch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct UnixTime(i64);

impl UnixTime {
    pub const fn from_seconds(seconds: i64) -> Self {
        Self(seconds)
    }

    pub const fn seconds(self) -> i64 {
        self.0
    }

    /// Convert a civil UTC date and time-of-day to epoch seconds.
    pub fn from_civil(datetime: &FixDateTime) -> Self {
        let days = days_from_civil(
            datetime.year as i64,
            datetime.month as i64,
            datetime.day as i64,
        );
        let seconds = days * 86_400
            + datetime.hour as i64 * 3_600
            + datetime.minute as i64 * 60
            + datetime.second as i64;
        Self(seconds)
    }

    /// Seconds elapsed since the preceding midnight.
    fn seconds_of_day(self) -> i64 {
        self.0.rem_euclid(86_400)
    }
}

impl Add<i64> for UnixTime {
    type Output = Self;

    fn add(self, seconds: i64) -> Self {
        Self(self.0 + seconds)
    }
}

/// Days between 1970-01-01 and the given civil date (proleptic Gregorian).
fn days_from_civil(year: i64, month: i64, day: i64) -> i64 {
    let year = if month <= 2 { year - 1 } else { year };
    let era = if year >= 0 { year } else { year - 399 } / 400;
    let year_of_era = year - era * 400;
    let month_shifted = if month > 2 { month - 3 } else { month + 9 };
    let day_of_year = (153 * month_shifted + 2) / 5 + day - 1;
    let day_of_era = year_of_era * 365 + year_of_era / 4 - year_of_era / 100 + day_of_year;
    era * 146_097 + day_of_era - 719_468
}

/// Formatted date or time string for the status display
pub type TimeString = String<12>;

/// Placeholder shown before the first valid fix and for an unset schedule
const PLACEHOLDER_TIME: &str = "00:00:00";

/// Local time mirror of the navigation receiver.
#[derive(Debug, Default)]
pub struct GpsClock {
    now: Option<UnixTime>,
    date: Option<FixDateTime>,
}

impl GpsClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adopt the fix time when it is valid and freshly updated; otherwise the
    /// clock is left untouched.
    pub fn update(&mut self, snapshot: &GpsSnapshot) {
        if snapshot.time_valid && snapshot.time_updated {
            self.now = Some(UnixTime::from_civil(&snapshot.datetime));
            self.date = Some(snapshot.datetime);
        }
    }

    /// Current authoritative time; `None` before the first valid fix.
    pub fn now(&self) -> Option<UnixTime> {
        self.now
    }

    /// Render a timestamp as `HH:MM:SS`, or the fixed placeholder when the
    /// timestamp is unset.
    pub fn format_time(timestamp: Option<UnixTime>) -> TimeString {
        let mut text = TimeString::new();
        match timestamp {
            Some(time) => {
                let of_day = time.seconds_of_day();
                let _ = write!(
                    text,
                    "{:02}:{:02}:{:02}",
                    of_day / 3_600,
                    (of_day / 60) % 60,
                    of_day % 60
                );
            }
            None => {
                let _ = text.push_str(PLACEHOLDER_TIME);
            }
        }
        text
    }

    /// Render the adopted date as `DD.MM.YYYY`, or a zero date before the
    /// first valid fix.
    pub fn format_date(&self) -> TimeString {
        let mut text = TimeString::new();
        match self.date {
            Some(date) => {
                let _ = write!(text, "{:02}.{:02}.{:04}", date.day, date.month, date.year);
            }
            None => {
                let _ = text.push_str("00.00.0000");
            }
        }
        text
    }
}
