//! Idle/active state machine behind the screensaver effect.
//!
//! `Idle` is initial. Any pointer-move, pointer-down or key-down moves to
//! `Active` and (re)arms a single inactivity timer; the timer elapsing moves
//! back to `Idle`. The exit hint is shown exactly while `Active`.

use std::time::Duration;

use super::input::{InputKind, InputRouter, ListenerGuard};
use super::timers::{TimerEvent, TimerGuard, Timers};

/// Activity state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ActivityState {
    #[default]
    Idle,
    Active,
}

impl ActivityState {
    #[must_use]
    pub const fn is_idle(self) -> bool {
        matches!(self, Self::Idle)
    }

    /// The exit hint is coupled to activity.
    #[must_use]
    pub const fn shows_exit_hint(self) -> bool {
        matches!(self, Self::Active)
    }
}

/// Owns the inactivity timer and the three input registrations.
#[derive(Debug)]
pub struct ActivityMonitor {
    state: ActivityState,
    idle_timeout: Duration,
    idle_timer: Option<TimerGuard>,
    listeners: Vec<ListenerGuard>,
}

impl ActivityMonitor {
    /// Start in `Idle` and subscribe to every activity input kind.
    #[must_use]
    pub fn mount(input: &InputRouter, idle_timeout: Duration) -> Self {
        Self {
            state: ActivityState::Idle,
            idle_timeout,
            idle_timer: None,
            listeners: InputKind::ALL
                .into_iter()
                .map(|kind| input.subscribe(kind))
                .collect(),
        }
    }

    #[must_use]
    pub const fn state(&self) -> ActivityState {
        self.state
    }

    #[must_use]
    pub fn is_mounted(&self) -> bool {
        !self.listeners.is_empty()
    }

    /// Handle one activity event. Returns the new state when it changed.
    pub fn on_activity(&mut self, timers: &Timers) -> Option<ActivityState> {
        if !self.is_mounted() {
            return None;
        }
        // Replacing the guard cancels the previous countdown.
        self.idle_timer = Some(timers.after(self.idle_timeout, TimerEvent::IdleTimeout));
        self.transition(ActivityState::Active)
    }

    /// Handle the inactivity timer firing. Returns `true` when the monitor
    /// went idle; the timeout never produces any other transition.
    pub fn on_idle_timeout(&mut self) -> bool {
        if !self.is_mounted() {
            return false;
        }
        self.idle_timer = None;
        self.transition(ActivityState::Idle).is_some()
    }

    /// Release the timer and all listeners together.
    pub fn dispose(&mut self) {
        self.idle_timer = None;
        self.listeners.clear();
    }

    fn transition(&mut self, next: ActivityState) -> Option<ActivityState> {
        if self.state == next {
            return None;
        }
        self.state = next;
        Some(next)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    struct Rig {
        timers: Timers,
        input: InputRouter,
        monitor: ActivityMonitor,
    }

    impl Rig {
        fn new() -> Self {
            let timers = Timers::new();
            let input = InputRouter::new();
            let monitor = ActivityMonitor::mount(&input, ms(5000));
            Self {
                timers,
                input,
                monitor,
            }
        }

        fn advance_to(&mut self, now: Duration) {
            while let Some(event) = self.timers.pop_due(now) {
                assert_eq!(event, TimerEvent::IdleTimeout);
                self.monitor.on_idle_timeout();
            }
        }
    }

    #[test]
    fn starts_idle_with_hint_hidden() {
        let rig = Rig::new();
        assert_eq!(rig.monitor.state(), ActivityState::Idle);
        assert!(rig.monitor.state().is_idle());
        assert!(!rig.monitor.state().shows_exit_hint());
        assert_eq!(rig.input.listener_count(), 3);
    }

    #[test]
    fn activity_then_timeout_round_trip() {
        let mut rig = Rig::new();
        assert_eq!(
            rig.monitor.on_activity(&rig.timers),
            Some(ActivityState::Active)
        );
        assert!(rig.monitor.state().shows_exit_hint());

        rig.advance_to(ms(4999));
        assert_eq!(rig.monitor.state(), ActivityState::Active);

        rig.advance_to(ms(5000));
        assert_eq!(rig.monitor.state(), ActivityState::Idle);
        assert!(!rig.monitor.state().shows_exit_hint());
    }

    #[test]
    fn activity_while_active_restarts_countdown() {
        let mut rig = Rig::new();
        rig.monitor.on_activity(&rig.timers);
        rig.advance_to(ms(4000));
        assert_eq!(rig.monitor.on_activity(&rig.timers), None);
        assert_eq!(rig.timers.pending(), 1);

        rig.advance_to(ms(8999));
        assert_eq!(rig.monitor.state(), ActivityState::Active);
        rig.advance_to(ms(9000));
        assert_eq!(rig.monitor.state(), ActivityState::Idle);
    }

    #[test]
    fn idle_timeout_only_ever_goes_idle() {
        let mut rig = Rig::new();
        assert!(!rig.monitor.on_idle_timeout());
        assert_eq!(rig.monitor.state(), ActivityState::Idle);

        rig.monitor.on_activity(&rig.timers);
        assert!(rig.monitor.on_idle_timeout());
        assert_eq!(rig.monitor.state(), ActivityState::Idle);
        assert!(!rig.monitor.on_idle_timeout());
    }

    #[test]
    fn dispose_releases_timer_and_listeners() {
        let mut rig = Rig::new();
        rig.monitor.on_activity(&rig.timers);
        rig.monitor.dispose();

        assert_eq!(rig.timers.pending(), 0);
        assert_eq!(rig.input.listener_count(), 0);
        assert!(!rig.monitor.is_mounted());
        assert_eq!(rig.monitor.on_activity(&rig.timers), None);
        assert_eq!(rig.timers.pending(), 0);
        rig.advance_to(ms(60_000));
        assert_eq!(rig.monitor.state(), ActivityState::Active);
    }
}
