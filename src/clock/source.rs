//! Host capabilities the sampler depends on: the current instant with its
//! timezone, and weekday naming. Tests swap in fixed implementations.

use std::env;
use std::fs;
use std::path::Path;

use chrono::{DateTime, FixedOffset, Local, Weekday};

/// Source of "now" plus the host's timezone identifier.
pub trait InstantSource {
    /// Current instant, carrying the host's UTC offset at that instant.
    fn now(&self) -> DateTime<FixedOffset>;

    /// IANA timezone identifier, surfaced exactly as the host reports it.
    /// `None` when the host does not name its zone.
    fn timezone(&self) -> Option<String>;
}

/// Weekday naming capability.
pub trait WeekdayFormatter {
    /// Full weekday name, e.g. `"Tuesday"`.
    fn weekday_name(&self, weekday: Weekday) -> String;
}

/// Real host clock via `chrono::Local`.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemInstantSource;

impl InstantSource for SystemInstantSource {
    fn now(&self) -> DateTime<FixedOffset> {
        Local::now().fixed_offset()
    }

    fn timezone(&self) -> Option<String> {
        host_timezone()
    }
}

/// Pinned instant for deterministic rendering and tests.
#[derive(Debug, Clone)]
pub struct FixedInstantSource {
    at: DateTime<FixedOffset>,
    zone: String,
}

impl FixedInstantSource {
    #[must_use]
    pub fn new(at: DateTime<FixedOffset>, zone: impl Into<String>) -> Self {
        Self {
            at,
            zone: zone.into(),
        }
    }

    /// Parse an RFC 3339 timestamp such as `2024-03-05T09:02:07+01:00`.
    pub fn parse(rfc3339: &str, zone: impl Into<String>) -> Result<Self, chrono::ParseError> {
        Ok(Self::new(DateTime::parse_from_rfc3339(rfc3339)?, zone))
    }
}

impl InstantSource for FixedInstantSource {
    fn now(&self) -> DateTime<FixedOffset> {
        self.at
    }

    fn timezone(&self) -> Option<String> {
        Some(self.zone.clone())
    }
}

/// English weekday names, matching an `en-US` long weekday format.
#[derive(Debug, Clone, Copy, Default)]
pub struct EnglishWeekdays;

impl WeekdayFormatter for EnglishWeekdays {
    fn weekday_name(&self, weekday: Weekday) -> String {
        match weekday {
            Weekday::Mon => "Monday",
            Weekday::Tue => "Tuesday",
            Weekday::Wed => "Wednesday",
            Weekday::Thu => "Thursday",
            Weekday::Fri => "Friday",
            Weekday::Sat => "Saturday",
            Weekday::Sun => "Sunday",
        }
        .to_string()
    }
}

/// Resolve the host timezone: `TZ`, then `/etc/timezone`, then the
/// `/etc/localtime` symlink target. A copied tzfile carries no name.
#[must_use]
pub fn host_timezone() -> Option<String> {
    resolve_timezone(
        env::var("TZ").ok().as_deref(),
        Path::new("/etc/timezone"),
        Path::new("/etc/localtime"),
    )
}

fn resolve_timezone(
    tz_env: Option<&str>,
    timezone_file: &Path,
    localtime: &Path,
) -> Option<String> {
    if let Some(raw) = tz_env {
        let name = raw.trim().trim_start_matches(':');
        if !name.is_empty() {
            return Some(zone_from_path(name).unwrap_or(name).to_string());
        }
    }

    if let Ok(contents) = fs::read_to_string(timezone_file) {
        let name = contents.trim();
        if !name.is_empty() {
            return Some(name.to_string());
        }
    }

    let target = fs::read_link(localtime).ok()?;
    zone_from_path(&target.to_string_lossy()).map(str::to_string)
}

/// Strip a `.../zoneinfo/` prefix from a tzfile path.
fn zone_from_path(path: &str) -> Option<&str> {
    path.split_once("zoneinfo/")
        .map(|(_, zone)| zone)
        .filter(|zone| !zone.is_empty())
}
