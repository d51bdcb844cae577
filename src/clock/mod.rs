//! Clock-state derivation: the immutable [`ClockState`] snapshot, the Gregorian
//! leap-year rule, and the sampler that produces snapshots from an injected
//! instant source.

pub mod sampler;
pub mod source;

use std::fmt;

use serde::{Deserialize, Serialize};

pub use sampler::TimeSampler;
pub use source::{
    EnglishWeekdays, FixedInstantSource, InstantSource, SystemInstantSource, WeekdayFormatter,
};

/// One self-consistent reading of the local wall clock.
///
/// Every field is derived from a single instant; a new tick replaces the whole
/// value rather than mutating it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClockState {
    /// Hour of day, `0..=23`.
    pub hour: u32,
    /// Minute of hour, `0..=59`.
    pub minute: u32,
    /// Second of minute, `0..=59`.
    pub second: u32,
    /// Day of month, `1..=31`.
    pub day: u32,
    /// Month of year, 1-indexed.
    pub month: u32,
    /// Local calendar year.
    pub year: i32,
    /// Full weekday name from the weekday formatter.
    pub day_of_week: String,
    /// Gregorian leap-year flag for `year`.
    pub is_leap_year: bool,
    /// Milliseconds since the Unix epoch.
    pub timestamp: i64,
    /// IANA timezone identifier reported by the host.
    pub timezone: String,
}

impl ClockState {
    /// `<dayOfWeek>, <year>-<MM>-<DD> <hh>:<mm>:<ss>`, the `toString()` shown in
    /// the instance inspector.
    #[must_use]
    pub fn display_string(&self) -> String {
        format!(
            "{}, {}-{}-{} {}:{}:{}",
            self.day_of_week,
            self.year,
            pad2(self.month),
            pad2(self.day),
            pad2(self.hour),
            pad2(self.minute),
            pad2(self.second),
        )
    }
}

impl fmt::Display for ClockState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.display_string())
    }
}

/// Gregorian leap-year rule, valid for the whole proleptic range.
#[must_use]
pub const fn is_leap_year(year: i32) -> bool {
    (year % 4 == 0 && year % 100 != 0) || year % 400 == 0
}

/// Zero-pad to at least two digits.
#[must_use]
pub fn pad2(value: u32) -> String {
    format!("{value:02}")
}
