//! Mounted display: owns the timer queue, the input router, and every
//! component whose lifetime is bound to the display.
//!
//! Both the terminal runtime and tests drive a [`ClockDisplay`] the same way:
//! feed input kinds and elapsed time, then ask for the presentation tree.
//! Nothing here touches the real clock or the terminal.

pub mod activity;
pub mod input;
pub mod pulse;
pub mod scheduler;
pub mod timers;

use std::time::Duration;

use crate::clock::{ClockState, TimeSampler};
use crate::core::config::DisplayConfig;
use crate::presentation::{self, PresentationTree, UiFlags};

use activity::{ActivityMonitor, ActivityState};
use input::{InputKind, InputRouter};
use pulse::{PulseFlags, PulseTracker};
use scheduler::{RefreshScheduler, ScheduleOutcome};
use timers::{TimerEvent, Timers};

/// Transitions worth recording in the event log.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisplayEvent {
    BootComplete,
    BecameActive,
    BecameIdle,
}

/// A mounted clock display.
#[derive(Debug)]
pub struct ClockDisplay {
    timers: Timers,
    input: InputRouter,
    scheduler: RefreshScheduler,
    activity: ActivityMonitor,
    pulse: PulseTracker,
    current: Option<ClockState>,
    events: Vec<DisplayEvent>,
    mounted: bool,
}

impl ClockDisplay {
    /// Mount: subscribe to input, sample immediately, arm every timer.
    #[must_use]
    pub fn mount(config: &DisplayConfig, sampler: TimeSampler) -> Self {
        let timers = Timers::new();
        let input = InputRouter::new();
        let activity = ActivityMonitor::mount(&input, config.idle_timeout());
        let (scheduler, first) = RefreshScheduler::mount(
            &timers,
            sampler,
            config.tick_interval(),
            config.boot_duration(),
        );
        let mut display = Self {
            timers,
            input,
            scheduler,
            activity,
            pulse: PulseTracker::new(config.pulse()),
            current: None,
            events: Vec::new(),
            mounted: true,
        };
        display.publish(first);
        display
    }

    /// Current snapshot, if any.
    #[must_use]
    pub fn state(&self) -> Option<&ClockState> {
        self.current.as_ref()
    }

    #[must_use]
    pub fn flags(&self) -> UiFlags {
        let activity = self.activity.state();
        UiFlags {
            idle: activity.is_idle(),
            booting: self.scheduler.booting(),
            show_exit_hint: activity.shows_exit_hint(),
        }
    }

    #[must_use]
    pub fn pulse(&self) -> PulseFlags {
        self.pulse.flags()
    }

    #[must_use]
    pub fn is_mounted(&self) -> bool {
        self.mounted
    }

    /// Virtual time since mount.
    #[must_use]
    pub fn now(&self) -> Duration {
        self.timers.now()
    }

    #[must_use]
    pub fn next_deadline(&self) -> Option<Duration> {
        self.timers.next_deadline()
    }

    /// Live timers and listeners; both are zero after unmount.
    #[must_use]
    pub fn pending_resources(&self) -> (usize, usize) {
        (self.timers.pending(), self.input.listener_count())
    }

    /// Deliver one raw input event. Returns whether any state changed.
    pub fn input(&mut self, kind: InputKind) -> bool {
        if !self.input.route(kind) {
            return false;
        }
        match self.activity.on_activity(&self.timers) {
            Some(ActivityState::Active) => {
                self.events.push(DisplayEvent::BecameActive);
                true
            }
            Some(ActivityState::Idle) => {
                self.events.push(DisplayEvent::BecameIdle);
                true
            }
            None => false,
        }
    }

    /// Fire every timer due up to `now`. Returns whether any state changed.
    pub fn advance_to(&mut self, now: Duration) -> bool {
        let mut changed = false;
        while let Some(event) = self.timers.pop_due(now) {
            changed |= self.dispatch(event);
        }
        changed
    }

    pub fn advance_by(&mut self, delta: Duration) -> bool {
        let target = self.timers.now() + delta;
        self.advance_to(target)
    }

    /// Build the presentation tree for what is currently shown.
    #[must_use]
    pub fn view(&self) -> PresentationTree {
        presentation::build(self.current.as_ref(), &self.flags(), self.pulse.flags())
    }

    /// Drain transitions recorded since the last call.
    pub fn take_events(&mut self) -> Vec<DisplayEvent> {
        std::mem::take(&mut self.events)
    }

    /// Tear down: cancel every timer and remove every listener. Idempotent.
    pub fn unmount(&mut self) {
        if !self.mounted {
            return;
        }
        self.mounted = false;
        self.scheduler.dispose();
        self.activity.dispose();
        self.pulse.dispose();
    }

    fn dispatch(&mut self, event: TimerEvent) -> bool {
        match event {
            TimerEvent::ClockTick | TimerEvent::BootComplete => {
                match self.scheduler.on_timer(event) {
                    Some(ScheduleOutcome::Sampled(next)) => {
                        self.publish(next);
                        true
                    }
                    Some(ScheduleOutcome::Booted) => {
                        self.events.push(DisplayEvent::BootComplete);
                        true
                    }
                    None => false,
                }
            }
            TimerEvent::IdleTimeout => {
                let became_idle = self.activity.on_idle_timeout();
                if became_idle {
                    self.events.push(DisplayEvent::BecameIdle);
                }
                became_idle
            }
            TimerEvent::PulseDecay => self.pulse.on_decay(),
        }
    }

    /// Replace the current snapshot wholesale.
    fn publish(&mut self, next: ClockState) {
        if !self.mounted {
            return;
        }
        self.pulse
            .observe(&self.timers, self.current.as_ref(), &next);
        self.current = Some(next);
    }
}

impl Drop for ClockDisplay {
    fn drop(&mut self) {
        self.unmount();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::{EnglishWeekdays, FixedInstantSource};

    const fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    fn display() -> ClockDisplay {
        let sampler = TimeSampler::new(
            Box::new(FixedInstantSource::parse("2024-03-05T09:02:07+00:00", "UTC").unwrap()),
            Box::new(EnglishWeekdays),
        );
        ClockDisplay::mount(&DisplayConfig::default(), sampler)
    }

    #[test]
    fn mount_samples_immediately_and_boots() {
        let d = display();
        assert_eq!(
            d.state().map(ClockState::display_string).as_deref(),
            Some("Tuesday, 2024-03-05 09:02:07")
        );
        assert_eq!(d.flags(), UiFlags::default());
        assert!(d.pulse().any());
        // tick, boot, pulse decay; three input listeners
        assert_eq!(d.pending_resources(), (3, 3));
    }

    #[test]
    fn boot_event_recorded_once() {
        let mut d = display();
        d.advance_to(ms(1999));
        assert!(d.flags().booting);
        d.advance_to(ms(2000));
        assert!(!d.flags().booting);
        d.advance_to(ms(9000));
        let boots = d
            .take_events()
            .into_iter()
            .filter(|e| *e == DisplayEvent::BootComplete)
            .count();
        assert_eq!(boots, 1);
    }

    #[test]
    fn input_drives_idle_flags_and_events() {
        let mut d = display();
        assert!(d.input(InputKind::PointerMove));
        assert!(!d.input(InputKind::KeyDown));
        let flags = d.flags();
        assert!(!flags.idle && flags.show_exit_hint);

        d.advance_by(ms(5000));
        assert!(d.flags().idle);
        assert_eq!(
            d.take_events(),
            vec![
                DisplayEvent::BecameActive,
                DisplayEvent::BootComplete,
                DisplayEvent::BecameIdle
            ]
        );
        assert!(d.take_events().is_empty());
    }

    #[test]
    fn pulse_decays_after_configured_duration() {
        let mut d = display();
        d.advance_to(ms(399));
        assert!(d.pulse().any());
        d.advance_to(ms(400));
        assert!(!d.pulse().any());
    }

    #[test]
    fn unmount_is_idempotent_and_releases_everything() {
        let mut d = display();
        d.input(InputKind::PointerDown);
        d.unmount();
        d.unmount();
        assert!(!d.is_mounted());
        assert_eq!(d.pending_resources(), (0, 0));

        let before = (d.state().cloned(), d.flags(), d.pulse());
        assert!(!d.input(InputKind::KeyDown));
        assert!(!d.advance_by(ms(60_000)));
        assert_eq!((d.state().cloned(), d.flags(), d.pulse()), before);
    }
}
