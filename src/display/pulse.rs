//! Short highlight on clock fields that just changed.

use std::time::Duration;

use super::timers::{TimerEvent, TimerGuard, Timers};
use crate::clock::ClockState;

/// Which fields are currently highlighted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PulseFlags {
    pub hour: bool,
    pub minute: bool,
    pub second: bool,
    pub day: bool,
}

impl PulseFlags {
    #[must_use]
    pub const fn any(self) -> bool {
        self.hour || self.minute || self.second || self.day
    }

    /// Fields that differ between two snapshots. With no previous snapshot
    /// every field counts as changed.
    #[must_use]
    pub fn changed(previous: Option<&ClockState>, next: &ClockState) -> Self {
        previous.map_or(
            Self {
                hour: true,
                minute: true,
                second: true,
                day: true,
            },
            |prev| Self {
                hour: prev.hour != next.hour,
                minute: prev.minute != next.minute,
                second: prev.second != next.second,
                day: prev.day != next.day,
            },
        )
    }
}

/// Tracks highlight flags and the single decay timer that clears them.
#[derive(Debug)]
pub struct PulseTracker {
    flags: PulseFlags,
    duration: Duration,
    decay: Option<TimerGuard>,
    mounted: bool,
}

impl PulseTracker {
    #[must_use]
    pub const fn new(duration: Duration) -> Self {
        Self {
            flags: PulseFlags {
                hour: false,
                minute: false,
                second: false,
                day: false,
            },
            duration,
            decay: None,
            mounted: true,
        }
    }

    #[must_use]
    pub const fn flags(&self) -> PulseFlags {
        self.flags
    }

    /// Record a new snapshot; highlighted fields accumulate until the decay
    /// timer clears them all.
    pub fn observe(&mut self, timers: &Timers, previous: Option<&ClockState>, next: &ClockState) {
        if !self.mounted {
            return;
        }
        let changed = PulseFlags::changed(previous, next);
        if !changed.any() {
            return;
        }
        self.flags = PulseFlags {
            hour: self.flags.hour || changed.hour,
            minute: self.flags.minute || changed.minute,
            second: self.flags.second || changed.second,
            day: self.flags.day || changed.day,
        };
        self.decay = Some(timers.after(self.duration, TimerEvent::PulseDecay));
    }

    /// Clear every highlight.
    pub fn on_decay(&mut self) -> bool {
        if !self.mounted {
            return false;
        }
        self.decay = None;
        let was = self.flags.any();
        self.flags = PulseFlags::default();
        was
    }

    pub fn dispose(&mut self) {
        self.mounted = false;
        self.decay = None;
    }
}
