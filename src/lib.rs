#![forbid(unsafe_code)]

//! classclock: a decorative full-screen clock styled as a live Java class.
//!
//! The crate is layered so that everything except the terminal front end is
//! deterministic and testable without a tty:
//! 1. **clock**: pure derivation of a [`clock::ClockState`] from one instant
//! 2. **display**: the mounted display with its virtual timers, activity
//!    monitor, refresh scheduler and field pulse tracker
//! 3. **presentation**: a pure tree describing what is on screen
//! 4. **tui**: crossterm rendering and the real-time event loop
//!
//! # Library usage
//!
//! ```rust,no_run
//! use classclock::prelude::*;
//!
//! let mut display = ClockDisplay::mount(&DisplayConfig::default(), TimeSampler::system());
//! display.advance_by(std::time::Duration::from_secs(2));
//! assert!(!display.flags().booting);
//! ```

pub mod prelude;

pub mod clock;
pub mod core;
pub mod display;
pub mod logger;
pub mod presentation;
#[cfg(feature = "tui")]
pub mod tui;
