//! Terminal runtime: drives a mounted [`ClockDisplay`] from wall-clock time
//! and crossterm events, and renders it whenever something changed.

#![allow(missing_docs)]

use std::io;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

use crossterm::event;
use signal_hook::consts::{SIGINT, SIGTERM};

use super::input::{self, InputAction};
use super::render;
use super::terminal_guard::TerminalGuard;
use super::theme::{AccessibilityProfile, Theme};
use crate::clock::TimeSampler;
use crate::core::config::Config;
use crate::core::errors::{ClockError, Result};
use crate::display::ClockDisplay;
use crate::logger::jsonl::{EventType, JsonlConfig, JsonlWriter, LogEntry, Severity};

/// One step of the background drift animation.
const DRIFT_STEP: Duration = Duration::from_millis(150);

/// JSONL event log stamped with the effective config hash.
pub struct EventLog {
    writer: JsonlWriter,
    config_hash: String,
}

impl EventLog {
    #[must_use]
    pub fn open(config: &Config) -> Self {
        let writer = if config.log.enabled {
            JsonlWriter::open(JsonlConfig::from(&config.log))
        } else {
            JsonlWriter::disabled()
        };
        Self {
            writer,
            config_hash: config.stable_hash().unwrap_or_default(),
        }
    }

    pub fn record(&mut self, event: EventType, severity: Severity, display: &ClockDisplay) {
        let entry = LogEntry::new(event, severity)
            .with_state(display.state())
            .with_config_hash(self.config_hash.clone());
        self.writer.write_entry(&entry);
    }

    pub fn record_error(&mut self, err: &ClockError, display: &ClockDisplay) {
        self.record_failure(err, Severity::Critical, display);
    }

    /// Failure the display keeps running through.
    pub fn record_warning(&mut self, err: &ClockError, display: &ClockDisplay) {
        self.record_failure(err, Severity::Warning, display);
    }

    fn record_failure(&mut self, err: &ClockError, severity: Severity, display: &ClockDisplay) {
        let entry = LogEntry::new(EventType::Error, severity)
            .with_state(display.state())
            .with_config_hash(self.config_hash.clone())
            .with_details(format!("{} {err}", err.code()));
        self.writer.write_entry(&entry);
    }

    /// Write every transition the display recorded since the last drain.
    pub fn drain(&mut self, display: &mut ClockDisplay) {
        for event in display.take_events() {
            self.record(event.into(), Severity::Info, display);
        }
    }
}

/// Shutdown flag raised by SIGINT/SIGTERM, plus one error per signal whose
/// handler could not be installed.
fn register_shutdown_flag() -> (Arc<AtomicBool>, Vec<ClockError>) {
    shutdown_flag_with(|signal, flag| signal_hook::flag::register(signal, flag).map(drop))
}

fn shutdown_flag_with<F>(mut register: F) -> (Arc<AtomicBool>, Vec<ClockError>)
where
    F: FnMut(i32, Arc<AtomicBool>) -> io::Result<()>,
{
    let flag = Arc::new(AtomicBool::new(false));
    let failures = [SIGTERM, SIGINT]
        .into_iter()
        .filter_map(|signal| {
            register(signal, Arc::clone(&flag))
                .err()
                .map(|e| ClockError::Runtime {
                    details: format!("failed to register handler for signal {signal}: {e}"),
                })
        })
        .collect();
    (flag, failures)
}

/// Run the full-screen display until the user quits or a signal arrives.
///
/// # Errors
/// Returns terminal I/O failures; the terminal is restored first.
pub fn run_display(config: &Config) -> Result<()> {
    let (shutdown, signal_failures) = register_shutdown_flag();
    let theme = Theme::new(AccessibilityProfile::from_config(&config.theme));
    let mut log = EventLog::open(config);

    let mut display = ClockDisplay::mount(&config.display, TimeSampler::system());
    log.record(EventType::DisplayStart, Severity::Info, &display);
    for err in &signal_failures {
        eprintln!("classclock: {err}");
        log.record_warning(err, &display);
    }

    let result = TerminalGuard::new()
        .map_err(ClockError::from)
        .and_then(|guard| {
            let outcome = event_loop(&mut display, &theme, &shutdown, &mut log);
            drop(guard);
            outcome
        });

    display.unmount();
    log.drain(&mut display);
    if let Err(err) = &result {
        log.record_error(err, &display);
    }
    log.record(EventType::DisplayStop, Severity::Info, &display);
    result
}

fn event_loop(
    display: &mut ClockDisplay,
    theme: &Theme,
    shutdown: &AtomicBool,
    log: &mut EventLog,
) -> Result<()> {
    let started = Instant::now();
    let mut stdout = io::stdout();
    let mut dirty = true;
    let mut last_drift = usize::MAX;

    while !shutdown.load(Ordering::SeqCst) {
        let elapsed = started.elapsed();
        dirty |= display.advance_to(elapsed);
        log.drain(display);

        let drift = usize::try_from(elapsed.as_millis() / DRIFT_STEP.as_millis()).unwrap_or(0);
        if drift != last_drift {
            last_drift = drift;
            dirty = true;
        }

        if dirty {
            let (cols, rows) = TerminalGuard::terminal_size();
            let frame = render::compose(&display.view(), cols, rows, drift);
            render::draw(&mut stdout, &frame, theme)?;
            dirty = false;
        }

        let now = started.elapsed();
        let timeout = display
            .next_deadline()
            .map_or(DRIFT_STEP, |deadline| deadline.saturating_sub(now))
            .min(DRIFT_STEP);

        if event::poll(timeout)? {
            match input::resolve(&event::read()?) {
                Some(InputAction::Quit) => break,
                Some(InputAction::Activity(kind)) => dirty |= display.input(kind),
                Some(InputAction::Resize) => dirty = true,
                None => {}
            }
        }
    }
    Ok(())
}
