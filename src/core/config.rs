//! Configuration system: TOML file + env var overrides + smart defaults.

#![allow(missing_docs)]

use std::env;
use std::fmt::Display;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::core::errors::{ClockError, Result};

/// Full classclock configuration model.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(default)]
pub struct Config {
    pub display: DisplayConfig,
    pub theme: ThemeConfig,
    pub log: LogConfig,
    pub paths: PathsConfig,
}

/// Timer durations driving the display.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct DisplayConfig {
    /// Interval between clock samples.
    pub tick_interval_ms: u64,
    /// How long the boot overlay hides the class panel.
    pub boot_duration_ms: u64,
    /// Inactivity window before the display returns to idle.
    pub idle_timeout_ms: u64,
    /// How long a changed field stays highlighted.
    pub pulse_ms: u64,
}

/// Color and contrast switches.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(default)]
pub struct ThemeConfig {
    pub no_color: bool,
    pub high_contrast: bool,
}

/// JSONL event log settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct LogConfig {
    pub enabled: bool,
    pub path: PathBuf,
    pub max_size_bytes: u64,
    pub max_rotated_files: u32,
}

/// Filesystem paths used by classclock.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct PathsConfig {
    pub config_file: PathBuf,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            tick_interval_ms: 1_000,
            boot_duration_ms: 2_000,
            idle_timeout_ms: 5_000,
            pulse_ms: 400,
        }
    }
}

impl DisplayConfig {
    #[must_use]
    pub const fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms)
    }

    #[must_use]
    pub const fn boot_duration(&self) -> Duration {
        Duration::from_millis(self.boot_duration_ms)
    }

    #[must_use]
    pub const fn idle_timeout(&self) -> Duration {
        Duration::from_millis(self.idle_timeout_ms)
    }

    #[must_use]
    pub const fn pulse(&self) -> Duration {
        Duration::from_millis(self.pulse_ms)
    }
}

fn home_dir() -> PathBuf {
    env::var_os("HOME").map_or_else(
        || {
            eprintln!("[CLK-CONFIG] WARNING: HOME not set, falling back to /tmp for data paths");
            PathBuf::from("/tmp")
        },
        PathBuf::from,
    )
}

impl Default for LogConfig {
    fn default() -> Self {
        let data = home_dir().join(".local").join("share").join("classclock");
        Self {
            enabled: true,
            path: data.join("events.jsonl"),
            max_size_bytes: 1024 * 1024,
            max_rotated_files: 3,
        }
    }
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            config_file: home_dir()
                .join(".config")
                .join("classclock")
                .join("config.toml"),
        }
    }
}

impl Config {
    /// Default configuration path.
    #[must_use]
    pub fn default_path() -> PathBuf {
        PathsConfig::default().config_file
    }

    /// Load config from default or explicit path, then apply env overrides.
    ///
    /// Missing config file is not an error when loading from default path; defaults are used.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let path_buf = path.map_or_else(Self::default_path, Path::to_path_buf);
        let is_explicit_path = path.is_some();

        let mut cfg = if path_buf.exists() {
            let raw = fs::read_to_string(&path_buf).map_err(|source| ClockError::Io {
                path: path_buf.clone(),
                source,
            })?;
            let parsed: Self = toml::from_str(&raw)?;
            parsed
        } else if is_explicit_path {
            return Err(ClockError::MissingConfig { path: path_buf });
        } else {
            Self::default()
        };

        cfg.paths.config_file = path_buf;
        cfg.apply_env_overrides_from(env_var)?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Deterministic hash of the effective config for log entries.
    ///
    /// FNV-1a over the canonical JSON form, stable across processes.
    pub fn stable_hash(&self) -> Result<String> {
        let canonical = serde_json::to_string(self)?;
        let mut hash: u64 = 0xcbf2_9ce4_8422_2325;
        for byte in canonical.as_bytes() {
            hash ^= u64::from(*byte);
            hash = hash.wrapping_mul(0x0100_0000_01b3);
        }
        Ok(format!("{hash:016x}"))
    }

    /// Effective configuration rendered as TOML.
    pub fn to_toml_string(&self) -> Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    fn apply_env_overrides_from<F>(&mut self, mut lookup: F) -> Result<()>
    where
        F: FnMut(&str) -> Option<String>,
    {
        for (name, slot) in [
            (
                "CLASSCLOCK_DISPLAY_TICK_INTERVAL_MS",
                &mut self.display.tick_interval_ms,
            ),
            (
                "CLASSCLOCK_DISPLAY_BOOT_DURATION_MS",
                &mut self.display.boot_duration_ms,
            ),
            (
                "CLASSCLOCK_DISPLAY_IDLE_TIMEOUT_MS",
                &mut self.display.idle_timeout_ms,
            ),
            ("CLASSCLOCK_DISPLAY_PULSE_MS", &mut self.display.pulse_ms),
            (
                "CLASSCLOCK_LOG_MAX_SIZE_BYTES",
                &mut self.log.max_size_bytes,
            ),
        ] {
            if let Some(raw) = lookup(name) {
                *slot = parse_env(name, &raw)?;
            }
        }

        if let Some(raw) = lookup("CLASSCLOCK_LOG_MAX_ROTATED_FILES") {
            self.log.max_rotated_files = parse_env("CLASSCLOCK_LOG_MAX_ROTATED_FILES", &raw)?;
        }

        for (name, slot) in [
            ("CLASSCLOCK_THEME_NO_COLOR", &mut self.theme.no_color),
            ("CLASSCLOCK_THEME_HIGH_CONTRAST", &mut self.theme.high_contrast),
            ("CLASSCLOCK_LOG_ENABLED", &mut self.log.enabled),
        ] {
            if let Some(raw) = lookup(name) {
                *slot = parse_env(name, &raw)?;
            }
        }

        if let Some(raw) = lookup("CLASSCLOCK_LOG_PATH") {
            self.log.path = PathBuf::from(raw);
        }

        // NO_COLOR is honored regardless of its value, per no-color.org.
        if lookup("NO_COLOR").is_some() {
            self.theme.no_color = true;
        }

        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        for (name, val) in [
            ("tick_interval_ms", self.display.tick_interval_ms),
            ("boot_duration_ms", self.display.boot_duration_ms),
            ("idle_timeout_ms", self.display.idle_timeout_ms),
            ("pulse_ms", self.display.pulse_ms),
        ] {
            if val == 0 {
                return Err(ClockError::InvalidConfig {
                    details: format!("display.{name} must be > 0"),
                });
            }
        }

        if self.log.enabled && self.log.max_size_bytes == 0 {
            return Err(ClockError::InvalidConfig {
                details: "log.max_size_bytes must be > 0 when logging is enabled".to_string(),
            });
        }

        Ok(())
    }
}

fn env_var(name: &str) -> Option<String> {
    env::var(name).ok().filter(|raw| !raw.trim().is_empty())
}

fn parse_env<T>(name: &str, raw: &str) -> Result<T>
where
    T: FromStr,
    T::Err: Display,
{
    raw.trim()
        .parse::<T>()
        .map_err(|error| ClockError::ConfigParse {
            context: "env",
            details: format!("{name}={raw:?}: {error}"),
        })
}

#[cfg(test)]
mod tests {
    use super::{ClockError, Config};
    use std::collections::HashMap;
    use std::path::{Path, PathBuf};
    use std::time::Duration;

    fn vars(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(name, value)| ((*name).to_string(), (*value).to_string()))
            .collect()
    }

    #[test]
    fn default_config_is_valid() {
        let cfg = Config::default();
        assert!(cfg.validate().is_ok());
        assert_eq!(cfg.display.tick_interval(), Duration::from_secs(1));
        assert_eq!(cfg.display.boot_duration(), Duration::from_secs(2));
        assert_eq!(cfg.display.idle_timeout(), Duration::from_secs(5));
        assert_eq!(cfg.display.pulse(), Duration::from_millis(400));
    }

    #[test]
    fn zero_intervals_are_rejected() {
        let mut cfg = Config::default();
        cfg.display.idle_timeout_ms = 0;
        let err = cfg.validate().expect_err("expected invalid idle timeout");
        match err {
            ClockError::InvalidConfig { details } => {
                assert!(details.contains("idle_timeout_ms"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn zero_log_size_rejected_only_when_enabled() {
        let mut cfg = Config::default();
        cfg.log.max_size_bytes = 0;
        assert!(cfg.validate().is_err());
        cfg.log.enabled = false;
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn stable_hash_changes_when_config_changes() {
        let cfg = Config::default();
        let hash_before = cfg.stable_hash().expect("hash should compute");
        let mut modified = Config::default();
        modified.display.pulse_ms += 1;
        let hash_after = modified.stable_hash().expect("hash should compute");
        assert_ne!(hash_before, hash_after);
        assert_eq!(hash_before, Config::default().stable_hash().unwrap());
    }

    #[test]
    fn env_overrides_apply_numbers_and_flags() {
        let mut cfg = Config::default();
        let overrides = vars(&[
            ("CLASSCLOCK_DISPLAY_TICK_INTERVAL_MS", "250"),
            ("CLASSCLOCK_DISPLAY_IDLE_TIMEOUT_MS", " 9000 "),
            ("CLASSCLOCK_THEME_HIGH_CONTRAST", "true"),
            ("CLASSCLOCK_LOG_ENABLED", "false"),
            ("CLASSCLOCK_LOG_PATH", "/tmp/clock-events.jsonl"),
        ]);
        cfg.apply_env_overrides_from(|name| overrides.get(name).cloned())
            .expect("overrides should parse");

        assert_eq!(cfg.display.tick_interval_ms, 250);
        assert_eq!(cfg.display.idle_timeout_ms, 9000);
        assert!(cfg.theme.high_contrast);
        assert!(!cfg.log.enabled);
        assert_eq!(cfg.log.path, PathBuf::from("/tmp/clock-events.jsonl"));
    }

    #[test]
    fn env_overrides_cover_log_rotation() {
        let mut cfg = Config::default();
        let overrides = vars(&[
            ("CLASSCLOCK_LOG_MAX_SIZE_BYTES", "4096"),
            ("CLASSCLOCK_LOG_MAX_ROTATED_FILES", "7"),
        ]);
        cfg.apply_env_overrides_from(|name| overrides.get(name).cloned())
            .unwrap();
        assert_eq!(cfg.log.max_size_bytes, 4096);
        assert_eq!(cfg.log.max_rotated_files, 7);

        let overrides = vars(&[("CLASSCLOCK_LOG_MAX_ROTATED_FILES", "-1")]);
        let err = cfg
            .apply_env_overrides_from(|name| overrides.get(name).cloned())
            .expect_err("negative rotation count");
        assert_eq!(err.code(), "CLK-1003");
    }

    #[test]
    fn no_color_env_disables_color_for_any_value() {
        let mut cfg = Config::default();
        let overrides = vars(&[("NO_COLOR", "0")]);
        cfg.apply_env_overrides_from(|name| overrides.get(name).cloned())
            .unwrap();
        assert!(cfg.theme.no_color);
    }

    #[test]
    fn malformed_env_value_is_a_parse_error() {
        let mut cfg = Config::default();
        let overrides = vars(&[("CLASSCLOCK_DISPLAY_PULSE_MS", "soon")]);
        let err = cfg
            .apply_env_overrides_from(|name| overrides.get(name).cloned())
            .expect_err("expected env parse failure");
        assert_eq!(err.code(), "CLK-1003");
        assert!(err.to_string().contains("CLASSCLOCK_DISPLAY_PULSE_MS"));
    }

    #[test]
    fn explicit_missing_file_is_an_error() {
        let err = Config::load(Some(Path::new("/nonexistent_clk_dir/config.toml")))
            .expect_err("explicit path must exist");
        assert_eq!(err.code(), "CLK-1002");
    }

    #[test]
    fn partial_toml_file_keeps_defaults_for_missing_keys() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[display]\nboot_duration_ms = 500\n").unwrap();

        let cfg = Config::load(Some(&path)).expect("config should load");
        assert_eq!(cfg.display.boot_duration_ms, 500);
        assert_eq!(cfg.display.idle_timeout_ms, 5_000);
        assert_eq!(cfg.paths.config_file, path);
    }

    #[test]
    fn toml_round_trip_preserves_values() {
        let mut cfg = Config::default();
        cfg.display.tick_interval_ms = 125;
        cfg.theme.no_color = true;
        let rendered = cfg.to_toml_string().unwrap();
        let parsed: Config = toml::from_str(&rendered).unwrap();
        assert_eq!(parsed, cfg);
    }
}
