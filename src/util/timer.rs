//! Cancellable deferred callbacks.
//!
//! DESIGN
//! ======
//! Controllers never touch `setTimeout` directly. They ask a [`Scheduler`] for
//! a deferred callback and keep the returned [`Teardown`]; dropping it cancels
//! the callback. The browser build uses `gloo_timers`, tests use
//! [`ManualScheduler`] and advance a virtual clock.

#[cfg(test)]
#[path = "timer_test.rs"]
mod timer_test;

use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

use super::teardown::Teardown;

/// Deferred-callback capability.
pub trait Scheduler {
    /// Run `task` once after `delay`. Releasing the returned handle before
    /// the delay elapses guarantees `task` never runs.
    fn schedule(&self, delay: Duration, task: Box<dyn FnOnce()>) -> Teardown;
}

/// Longest delay `setTimeout` honours. Larger values fire immediately.
pub const MAX_TIMEOUT_MS: u32 = i32::MAX.unsigned_abs();

/// `delay` in whole milliseconds, clamped to [`MAX_TIMEOUT_MS`].
pub fn timeout_millis(delay: Duration) -> u32 {
    u32::try_from(delay.as_millis()).map_or(MAX_TIMEOUT_MS, |ms| ms.min(MAX_TIMEOUT_MS))
}

/// Browser scheduler backed by `gloo_timers::callback::Timeout`.
#[cfg(feature = "hydrate")]
#[derive(Clone, Copy, Debug, Default)]
pub struct BrowserScheduler;

#[cfg(feature = "hydrate")]
impl Scheduler for BrowserScheduler {
    fn schedule(&self, delay: Duration, task: Box<dyn FnOnce()>) -> Teardown {
        let millis = timeout_millis(delay);
        let timeout = gloo_timers::callback::Timeout::new(millis, move || task());
        // Dropping a gloo Timeout clears it; clearing a fired timeout is a no-op.
        Teardown::new(move || drop(timeout))
    }
}

struct ManualTask {
    id: u64,
    due: Duration,
    task: Box<dyn FnOnce()>,
}

#[derive(Default)]
struct ManualClock {
    now: Duration,
    next_id: u64,
    tasks: Vec<ManualTask>,
}

/// Virtual-time scheduler. Nothing runs until [`ManualScheduler::advance`].
#[derive(Clone, Default)]
pub struct ManualScheduler {
    clock: Rc<RefCell<ManualClock>>,
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Move the clock forward and run every task that became due, earliest
    /// first. Returns how many tasks ran.
    pub fn advance(&self, by: Duration) -> usize {
        let target = self.clock.borrow().now + by;
        let mut ran = 0;
        loop {
            let next = {
                let mut clock = self.clock.borrow_mut();
                let due = clock
                    .tasks
                    .iter()
                    .enumerate()
                    .filter(|(_, t)| t.due <= target)
                    .min_by_key(|(_, t)| (t.due, t.id))
                    .map(|(idx, _)| idx);
                match due {
                    Some(idx) => {
                        let task = clock.tasks.remove(idx);
                        clock.now = task.due;
                        Some(task)
                    }
                    None => {
                        clock.now = target;
                        None
                    }
                }
            };
            // The borrow is released before running so tasks may reschedule.
            let Some(task) = next else {
                break;
            };
            (task.task)();
            ran += 1;
        }
        ran
    }

    /// Number of scheduled tasks that have neither run nor been cancelled.
    pub fn pending(&self) -> usize {
        self.clock.borrow().tasks.len()
    }

    pub fn now(&self) -> Duration {
        self.clock.borrow().now
    }
}

impl Scheduler for ManualScheduler {
    fn schedule(&self, delay: Duration, task: Box<dyn FnOnce()>) -> Teardown {
        let id = {
            let mut clock = self.clock.borrow_mut();
            let id = clock.next_id;
            clock.next_id += 1;
            let due = clock.now + delay;
            clock.tasks.push(ManualTask { id, due, task });
            id
        };
        let clock = Rc::downgrade(&self.clock);
        Teardown::new(move || {
            if let Some(clock) = clock.upgrade() {
                clock.borrow_mut().tasks.retain(|t| t.id != id);
            }
        })
    }
}
