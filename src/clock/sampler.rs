//! Produces [`ClockState`] snapshots from one instant read per call.

use chrono::{Datelike, Timelike};

use super::source::{EnglishWeekdays, InstantSource, SystemInstantSource, WeekdayFormatter};
use super::{ClockState, is_leap_year};

/// Derives clock snapshots from injected host capabilities.
pub struct TimeSampler {
    source: Box<dyn InstantSource>,
    weekdays: Box<dyn WeekdayFormatter>,
}

impl TimeSampler {
    #[must_use]
    pub fn new(source: Box<dyn InstantSource>, weekdays: Box<dyn WeekdayFormatter>) -> Self {
        Self { source, weekdays }
    }

    /// Sampler over the real host clock with English weekday names.
    #[must_use]
    pub fn system() -> Self {
        Self::new(Box::new(SystemInstantSource), Box::new(EnglishWeekdays))
    }

    /// Take one snapshot. The instant source is read exactly once so every
    /// field agrees, even across a midnight or new-year rollover. A host
    /// without a zone name reports the sampled offset instead.
    #[must_use]
    pub fn sample(&self) -> ClockState {
        let now = self.source.now();
        let year = now.year();
        ClockState {
            hour: now.hour(),
            minute: now.minute(),
            second: now.second(),
            day: now.day(),
            month: now.month(),
            year,
            day_of_week: self.weekdays.weekday_name(now.weekday()),
            is_leap_year: is_leap_year(year),
            timestamp: now.timestamp_millis(),
            timezone: self
                .source
                .timezone()
                .unwrap_or_else(|| now.offset().to_string()),
        }
    }
}

impl Default for TimeSampler {
    fn default() -> Self {
        Self::system()
    }
}

impl std::fmt::Debug for TimeSampler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TimeSampler").finish_non_exhaustive()
    }
}
