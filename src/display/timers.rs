//! Single-threaded virtual timer queue with scoped cancellation.
//!
//! Time is the elapsed [`Duration`] since the display was mounted. The runtime
//! feeds real elapsed time; tests feed simulated time. Every scheduled entry is
//! owned by a [`TimerGuard`]; dropping the guard cancels the entry, so a
//! component that is torn down cannot leave callbacks behind.

use std::cell::RefCell;
use std::rc::{Rc, Weak};
use std::time::Duration;

/// What a timer fires when it elapses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TimerEvent {
    /// Periodic re-sample of the clock.
    ClockTick,
    /// One-shot end of the boot sequence.
    BootComplete,
    /// One-shot inactivity timeout.
    IdleTimeout,
    /// One-shot end of field highlighting.
    PulseDecay,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
struct TimerId(u64);

#[derive(Debug)]
struct Entry {
    id: TimerId,
    deadline: Duration,
    repeat: Option<Duration>,
    event: TimerEvent,
}

#[derive(Debug, Default)]
struct Queue {
    now: Duration,
    next_id: u64,
    entries: Vec<Entry>,
}

impl Queue {
    fn insert(&mut self, delay: Duration, repeat: Option<Duration>, event: TimerEvent) -> TimerId {
        let id = TimerId(self.next_id);
        self.next_id += 1;
        self.entries.push(Entry {
            id,
            deadline: self.now + delay,
            repeat,
            event,
        });
        id
    }

    fn cancel(&mut self, id: TimerId) {
        self.entries.retain(|entry| entry.id != id);
    }

    /// Index of the earliest due entry; ties go to the entry scheduled first.
    fn earliest(&self) -> Option<usize> {
        self.entries
            .iter()
            .enumerate()
            .min_by_key(|(_, entry)| (entry.deadline, entry.id))
            .map(|(idx, _)| idx)
    }
}

/// Shared handle to the timer queue of one mounted display.
#[derive(Debug, Clone, Default)]
pub struct Timers {
    queue: Rc<RefCell<Queue>>,
}

impl Timers {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Current virtual time.
    #[must_use]
    pub fn now(&self) -> Duration {
        self.queue.borrow().now
    }

    /// Fire `event` once, `delay` from now.
    #[must_use = "dropping the guard cancels the timer"]
    pub fn after(&self, delay: Duration, event: TimerEvent) -> TimerGuard {
        let id = self.queue.borrow_mut().insert(delay, None, event);
        self.guard(id, event)
    }

    /// Fire `event` every `interval`, first at `now + interval`.
    #[must_use = "dropping the guard cancels the timer"]
    pub fn every(&self, interval: Duration, event: TimerEvent) -> TimerGuard {
        let interval = interval.max(Duration::from_millis(1));
        let id = self
            .queue
            .borrow_mut()
            .insert(interval, Some(interval), event);
        self.guard(id, event)
    }

    /// Pop the earliest entry due at or before `now`, moving virtual time to
    /// its deadline. Repeating entries are rescheduled. Returns `None` (and
    /// moves virtual time to `now`) once nothing else is due.
    pub fn pop_due(&self, now: Duration) -> Option<TimerEvent> {
        let mut queue = self.queue.borrow_mut();
        let due = queue
            .earliest()
            .filter(|&idx| queue.entries[idx].deadline <= now);

        let Some(idx) = due else {
            queue.now = queue.now.max(now);
            return None;
        };

        let deadline = queue.entries[idx].deadline;
        queue.now = queue.now.max(deadline);
        let event = queue.entries[idx].event;
        match queue.entries[idx].repeat {
            Some(interval) => queue.entries[idx].deadline = deadline + interval,
            None => {
                queue.entries.swap_remove(idx);
            }
        }
        Some(event)
    }

    /// Deadline of the next entry to fire.
    #[must_use]
    pub fn next_deadline(&self) -> Option<Duration> {
        let queue = self.queue.borrow();
        queue.earliest().map(|idx| queue.entries[idx].deadline)
    }

    /// Number of live entries.
    #[must_use]
    pub fn pending(&self) -> usize {
        self.queue.borrow().entries.len()
    }

    fn guard(&self, id: TimerId, event: TimerEvent) -> TimerGuard {
        TimerGuard {
            id,
            event,
            queue: Rc::downgrade(&self.queue),
        }
    }
}

/// Owns one scheduled entry; cancels it on drop.
#[derive(Debug)]
pub struct TimerGuard {
    id: TimerId,
    event: TimerEvent,
    queue: Weak<RefCell<Queue>>,
}

impl TimerGuard {
    /// Event this guard's entry fires.
    #[must_use]
    pub const fn event(&self) -> TimerEvent {
        self.event
    }

    /// Cancel explicitly. Equivalent to dropping the guard.
    pub fn cancel(self) {
        drop(self);
    }
}

impl Drop for TimerGuard {
    fn drop(&mut self) {
        if let Some(queue) = self.queue.upgrade() {
            queue.borrow_mut().cancel(self.id);
        }
    }
}
