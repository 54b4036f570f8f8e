//! Single-threaded timer registry driving the frame and spawn callbacks.
//!
//! Every timer is owned by a [`Registration`]; dropping it removes the timer,
//! so a torn-down view can never leave a timer behind.

use std::cell::RefCell;
use std::rc::Rc;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TimerKind {
    /// Render-frame callback, repeats on its period.
    Frame,
    /// Spawner callback, one-shot; re-armed after every fire.
    Spawn,
}

#[derive(Debug)]
struct Entry {
    id: u64,
    kind: TimerKind,
    due: f64,
    period: Option<f64>,
}

#[derive(Debug, Default)]
struct Timers {
    next_id: u64,
    entries: Vec<Entry>,
}

/// Cloneable handle to the shared timer table.
#[derive(Clone, Debug, Default)]
pub struct Scheduler {
    timers: Rc<RefCell<Timers>>,
}

impl Scheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a timer first due at `due`. A `period` makes it repeat.
    pub fn register(&self, kind: TimerKind, due: f64, period: Option<f64>) -> Registration {
        let mut timers = self.timers.borrow_mut();
        let id = timers.next_id;
        timers.next_id += 1;
        timers.entries.push(Entry { id, kind, due, period });
        Registration { id, kind, timers: Rc::clone(&self.timers) }
    }

    /// Fire every timer due at `now`, in registration order.
    pub fn poll(&self, now: f64) -> Vec<TimerKind> {
        let mut fired = Vec::new();
        for entry in self.timers.borrow_mut().entries.iter_mut() {
            if entry.due > now {
                continue;
            }
            fired.push(entry.kind);
            entry.due = match entry.period {
                // Skip missed periods instead of bursting to catch up
                Some(period) if entry.due + period <= now => now + period,
                Some(period) => entry.due + period,
                None => f64::INFINITY,
            };
        }
        fired
    }

    /// Earliest due time across all armed timers.
    pub fn next_due(&self) -> Option<f64> {
        self.timers
            .borrow()
            .entries
            .iter()
            .map(|e| e.due)
            .filter(|d| d.is_finite())
            .min_by(|a, b| a.total_cmp(b))
    }

    #[cfg(test)]
    pub fn active(&self) -> usize {
        self.timers.borrow().entries.len()
    }
}

/// Owner of one timer. Dropping it deregisters the timer.
#[derive(Debug)]
pub struct Registration {
    id: u64,
    kind: TimerKind,
    timers: Rc<RefCell<Timers>>,
}

impl Registration {
    /// Set the next due time (used for one-shot timers).
    pub fn rearm(&self, due: f64) {
        if let Some(entry) = self.timers.borrow_mut().entries.iter_mut().find(|e| e.id == self.id) {
            entry.due = due;
        }
    }
}

impl Drop for Registration {
    fn drop(&mut self) {
        if let Ok(mut timers) = self.timers.try_borrow_mut() {
            timers.entries.retain(|e| e.id != self.id);
        } else {
            log::error!(
                "timer {} ({:?}) dropped while the scheduler was borrowed",
                self.id,
                self.kind
            );
        }
    }
}
