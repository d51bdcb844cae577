//! JSONL event log: one self-contained JSON object per line.
//!
//! Lines are assembled in memory and written with a single `write_all` so a
//! concurrent `tail -f` never sees a partial line.
//!
//! Degradation chain:
//! 1. Configured file path
//! 2. stderr with `[CLK-JSONL]` prefix
//! 3. Silent discard (the display must never stop for logging failures)

#![allow(missing_docs)]

use std::fs::{self, File, OpenOptions, rename};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::clock::ClockState;
use crate::core::config::LogConfig;
use crate::core::errors::{ClockError, Result};
use crate::display::DisplayEvent;

/// Severity level for log events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Info,
    Warning,
    Critical,
}

/// Display lifecycle events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventType {
    DisplayStart,
    BootComplete,
    BecameActive,
    BecameIdle,
    DisplayStop,
    Error,
}

impl From<DisplayEvent> for EventType {
    fn from(event: DisplayEvent) -> Self {
        match event {
            DisplayEvent::BootComplete => Self::BootComplete,
            DisplayEvent::BecameActive => Self::BecameActive,
            DisplayEvent::BecameIdle => Self::BecameIdle,
        }
    }
}

/// A single log line. Only `ts`, `event` and `severity` are always present.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogEntry {
    /// ISO 8601 UTC timestamp.
    pub ts: String,
    pub event: EventType,
    pub severity: Severity,
    /// Zone name of the clock state at the time of the event.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timezone: Option<String>,
    /// Epoch milliseconds of the clock state at the time of the event.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub config_hash: Option<String>,
    /// Freeform details.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl LogEntry {
    /// Create a new entry stamped with the current UTC time.
    #[must_use]
    pub fn new(event: EventType, severity: Severity) -> Self {
        Self {
            ts: format_utc_now(),
            event,
            severity,
            timezone: None,
            timestamp: None,
            config_hash: None,
            details: None,
        }
    }

    /// Attach the zone and instant of a clock snapshot.
    #[must_use]
    pub fn with_state(mut self, state: Option<&ClockState>) -> Self {
        if let Some(state) = state {
            self.timezone = Some(state.timezone.clone());
            self.timestamp = Some(state.timestamp);
        }
        self
    }

    #[must_use]
    pub fn with_config_hash(mut self, hash: impl Into<String>) -> Self {
        self.config_hash = Some(hash.into());
        self
    }

    #[must_use]
    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }
}

/// Degradation state of the writer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum WriterState {
    Normal,
    Stderr,
    Discard,
}

/// Configuration for the JSONL writer.
#[derive(Debug, Clone)]
pub struct JsonlConfig {
    pub path: PathBuf,
    /// Maximum file size before rotation (bytes).
    pub max_size_bytes: u64,
    /// Number of rotated files to keep.
    pub max_rotated_files: u32,
}

impl From<&LogConfig> for JsonlConfig {
    fn from(config: &LogConfig) -> Self {
        Self {
            path: config.path.clone(),
            max_size_bytes: config.max_size_bytes,
            max_rotated_files: config.max_rotated_files,
        }
    }
}

/// Append-only JSONL writer with rotation and fallback.
#[derive(Debug)]
pub struct JsonlWriter {
    config: JsonlConfig,
    writer: Option<BufWriter<File>>,
    state: WriterState,
    bytes_written: u64,
}

impl JsonlWriter {
    /// Open the log file, falling through the degradation chain on failure.
    #[must_use]
    pub fn open(config: JsonlConfig) -> Self {
        let mut w = Self {
            config,
            writer: None,
            state: WriterState::Discard,
            bytes_written: 0,
        };
        match open_append(&w.config.path) {
            Ok((file, size)) => {
                w.writer = Some(BufWriter::new(file));
                w.state = WriterState::Normal;
                w.bytes_written = size;
            }
            Err(e) => {
                w.state = WriterState::Stderr;
                let _ = writeln!(io::stderr(), "[CLK-JSONL] {e}, using stderr");
            }
        }
        w
    }

    /// Writer that drops everything; used when logging is disabled.
    #[must_use]
    pub fn disabled() -> Self {
        Self {
            config: JsonlConfig {
                path: PathBuf::new(),
                max_size_bytes: u64::MAX,
                max_rotated_files: 0,
            },
            writer: None,
            state: WriterState::Discard,
            bytes_written: 0,
        }
    }

    /// Write one entry as a single line and flush it.
    pub fn write_entry(&mut self, entry: &LogEntry) {
        let line = match serde_json::to_string(entry) {
            Ok(json) => format!("{json}\n"),
            Err(e) => {
                let _ = writeln!(io::stderr(), "[CLK-JSONL] serialize error: {e}");
                return;
            }
        };
        self.write_line(&line);
        self.flush();
    }

    pub fn flush(&mut self) {
        if let Some(w) = self.writer.as_mut()
            && w.flush().is_err()
        {
            self.degrade();
        }
    }

    /// Current degradation state.
    #[must_use]
    pub const fn state(&self) -> &'static str {
        match self.state {
            WriterState::Normal => "normal",
            WriterState::Stderr => "stderr",
            WriterState::Discard => "discard",
        }
    }

    // ──────────────────────── internals ────────────────────────

    fn write_line(&mut self, line: &str) {
        let len = line.len() as u64;
        if self.state == WriterState::Normal
            && self.bytes_written > 0
            && self.bytes_written.saturating_add(len) > self.config.max_size_bytes
        {
            self.rotate();
        }

        match self.state {
            WriterState::Normal => {
                if let Some(w) = self.writer.as_mut()
                    && w.write_all(line.as_bytes()).is_ok()
                {
                    self.bytes_written += len;
                    return;
                }
                self.degrade();
                self.write_line(line);
            }
            WriterState::Stderr => {
                if write!(io::stderr(), "[CLK-JSONL] {line}").is_err() {
                    self.degrade();
                }
            }
            WriterState::Discard => {}
        }
    }

    fn degrade(&mut self) {
        self.writer = None;
        self.state = match self.state {
            WriterState::Normal => {
                let _ = writeln!(io::stderr(), "[CLK-JSONL] file write failed, using stderr");
                WriterState::Stderr
            }
            WriterState::Stderr | WriterState::Discard => WriterState::Discard,
        };
    }

    fn rotate(&mut self) {
        if let Some(w) = self.writer.as_mut() {
            let _ = w.flush();
        }
        self.writer = None;
        let base = self.config.path.clone();

        // .N is dropped, .N-1 → .N, …, current → .1
        let keep = self.config.max_rotated_files;
        if keep == 0 {
            let _ = fs::remove_file(&base);
        } else {
            let _ = fs::remove_file(rotated_name(&base, keep));
            for i in (1..keep).rev() {
                let _ = rename(rotated_name(&base, i), rotated_name(&base, i + 1));
            }
            let _ = rename(&base, rotated_name(&base, 1));
        }

        match open_append(&base) {
            Ok((file, _)) => {
                self.writer = Some(BufWriter::new(file));
                self.bytes_written = 0;
            }
            Err(_) => self.degrade(),
        }
    }
}

impl Drop for JsonlWriter {
    fn drop(&mut self) {
        if let Some(w) = self.writer.as_mut() {
            let _ = w.flush();
        }
    }
}

// ──────────────────────── helpers ────────────────────────

/// Open or create a file for appending. Returns `(File, current_size)`.
fn open_append(path: &Path) -> Result<(File, u64)> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent).map_err(|source| ClockError::io(parent, source))?;
    }
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(|source| ClockError::io(path, source))?;
    let size = file.metadata().map(|m| m.len()).unwrap_or(0);
    Ok((file, size))
}

/// `events.jsonl` → `events.jsonl.3`.
fn rotated_name(base: &Path, index: u32) -> PathBuf {
    let mut name = base.as_os_str().to_owned();
    name.push(format!(".{index}"));
    PathBuf::from(name)
}

fn format_utc_now() -> String {
    chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Millis, true)
}

// ──────────────────────── tests ────────────────────────
