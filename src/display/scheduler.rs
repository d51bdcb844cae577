//! Periodic clock re-sampling plus the one-shot boot timer.

use std::time::Duration;

use super::timers::{TimerEvent, TimerGuard, Timers};
use crate::clock::{ClockState, TimeSampler};

/// What a scheduler timer produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScheduleOutcome {
    /// A fresh snapshot to publish as the current state.
    Sampled(ClockState),
    /// Boot finished; `booting` is now false.
    Booted,
}

/// Owns the repeating tick timer and the boot timer.
#[derive(Debug)]
pub struct RefreshScheduler {
    sampler: TimeSampler,
    booting: bool,
    tick: Option<TimerGuard>,
    boot: Option<TimerGuard>,
}

impl RefreshScheduler {
    /// Sample once immediately, then arm both timers.
    ///
    /// The initial snapshot is returned so the caller can publish it before
    /// the first tick.
    pub fn mount(
        timers: &Timers,
        sampler: TimeSampler,
        tick_interval: Duration,
        boot_duration: Duration,
    ) -> (Self, ClockState) {
        let first = sampler.sample();
        let scheduler = Self {
            sampler,
            booting: true,
            tick: Some(timers.every(tick_interval, TimerEvent::ClockTick)),
            boot: Some(timers.after(boot_duration, TimerEvent::BootComplete)),
        };
        (scheduler, first)
    }

    #[must_use]
    pub const fn booting(&self) -> bool {
        self.booting
    }

    #[must_use]
    pub fn is_mounted(&self) -> bool {
        self.tick.is_some()
    }

    /// Handle a timer this scheduler owns. Other events are ignored.
    pub fn on_timer(&mut self, event: TimerEvent) -> Option<ScheduleOutcome> {
        if !self.is_mounted() {
            return None;
        }
        match event {
            TimerEvent::ClockTick => Some(ScheduleOutcome::Sampled(self.sampler.sample())),
            TimerEvent::BootComplete if self.booting => {
                self.booting = false;
                self.boot = None;
                Some(ScheduleOutcome::Booted)
            }
            _ => None,
        }
    }

    /// Cancel both timers.
    pub fn dispose(&mut self) {
        self.tick = None;
        self.boot = None;
    }
}
