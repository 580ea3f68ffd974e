use std::cell::{Cell, RefCell};
use std::cmp::{Ordering, Reverse};
use std::collections::BinaryHeap;
use std::fmt;
use std::rc::Rc;
use std::time::Duration;

/// A cooperative timer facility that runs deferred work on the thread that owns it.
///
/// Implementations must never run a task synchronously from within
/// [`schedule()`][Self::schedule] - tasks run later, when the host drives the scheduler.
pub trait Scheduler {
    /// Arranges for `task` to run once, after `delay` has elapsed.
    fn schedule(&self, delay: Duration, task: Box<dyn FnOnce()>);
}

impl<S: Scheduler + ?Sized> Scheduler for Rc<S> {
    fn schedule(&self, delay: Duration, task: Box<dyn FnOnce()>) {
        (**self).schedule(delay, task);
    }
}

impl<S: Scheduler + ?Sized> Scheduler for &S {
    fn schedule(&self, delay: Duration, task: Box<dyn FnOnce()>) {
        (**self).schedule(delay, task);
    }
}

/// A [`Scheduler`] with a virtual clock that advances only when the host says so.
///
/// This matches a frame-driven update loop: once per frame the host calls
/// [`advance()`][Self::advance] with the frame time, and every task whose deadline has been
/// reached runs on the spot. Tasks run in deadline order; tasks with equal deadlines run in the
/// order they were scheduled.
///
/// Tasks may schedule further tasks. A task scheduled while `advance()` is running, whose
/// deadline falls within the same advance, also runs before `advance()` returns.
///
/// # Example
///
/// ```rust
/// use std::cell::Cell;
/// use std::rc::Rc;
/// use std::time::Duration;
///
/// use recycle_pool::{FrameScheduler, Scheduler};
///
/// let scheduler = FrameScheduler::new();
/// let fired = Rc::new(Cell::new(false));
///
/// scheduler.schedule(Duration::from_millis(50), Box::new({
///     let fired = Rc::clone(&fired);
///     move || fired.set(true)
/// }));
///
/// assert_eq!(scheduler.advance(Duration::from_millis(16)), 0);
/// assert_eq!(scheduler.advance(Duration::from_millis(16)), 0);
/// assert_eq!(scheduler.advance(Duration::from_millis(16)), 0);
/// assert_eq!(scheduler.advance(Duration::from_millis(16)), 1);
/// assert!(fired.get());
/// ```
pub struct FrameScheduler {
    now: Cell<Duration>,
    next_sequence: Cell<u64>,
    timers: RefCell<BinaryHeap<Reverse<Timer>>>,
}

struct Timer {
    deadline: Duration,

    // Breaks ties between equal deadlines in favor of whoever scheduled first.
    sequence: u64,

    task: Box<dyn FnOnce()>,
}

impl Timer {
    fn order_key(&self) -> (Duration, u64) {
        (self.deadline, self.sequence)
    }
}

impl PartialEq for Timer {
    fn eq(&self, other: &Self) -> bool {
        self.order_key() == other.order_key()
    }
}

impl Eq for Timer {}

impl PartialOrd for Timer {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Timer {
    fn cmp(&self, other: &Self) -> Ordering {
        self.order_key().cmp(&other.order_key())
    }
}

impl FrameScheduler {
    /// Creates a scheduler whose clock starts at zero.
    #[must_use]
    pub fn new() -> Self {
        Self {
            now: Cell::new(Duration::ZERO),
            next_sequence: Cell::new(0),
            timers: RefCell::new(BinaryHeap::new()),
        }
    }

    /// Time elapsed on the virtual clock.
    #[must_use]
    pub fn now(&self) -> Duration {
        self.now.get()
    }

    /// Number of tasks that have not run yet.
    #[must_use]
    pub fn pending(&self) -> usize {
        self.timers.borrow().len()
    }

    /// Moves the clock forward by `elapsed`, running every task that becomes due.
    ///
    /// Returns the number of tasks that ran.
    ///
    /// # Panics
    ///
    /// Panics if called from within one of its own tasks.
    pub fn advance(&self, elapsed: Duration) -> usize {
        let target = self.now.get().saturating_add(elapsed);
        let mut ran: usize = 0;

        while let Some(timer) = self.pop_due(target) {
            // Tasks observe the clock at their own deadline, not at the end of the frame.
            self.now.set(timer.deadline);
            (timer.task)();
            ran = ran.wrapping_add(1);
        }

        self.now.set(target);

        if ran > 0 {
            tracing::trace!(ran, now = ?target, "scheduled tasks ran");
        }

        ran
    }

    // The heap borrow ends before the task runs, so tasks are free to schedule more tasks.
    fn pop_due(&self, target: Duration) -> Option<Timer> {
        let mut timers = self.timers.borrow_mut();

        if timers
            .peek()
            .is_some_and(|Reverse(timer)| timer.deadline <= target)
        {
            timers.pop().map(|Reverse(timer)| timer)
        } else {
            None
        }
    }
}

impl Scheduler for FrameScheduler {
    fn schedule(&self, delay: Duration, task: Box<dyn FnOnce()>) {
        let sequence = self.next_sequence.get();
        self.next_sequence.set(sequence.wrapping_add(1));

        let deadline = self.now.get().saturating_add(delay);

        self.timers.borrow_mut().push(Reverse(Timer {
            deadline,
            sequence,
            task,
        }));
    }
}

impl Default for FrameScheduler {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for FrameScheduler {
    #[cfg_attr(test, mutants::skip)] // No API contract to test.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FrameScheduler")
            .field("now", &self.now.get())
            .field("pending", &self.timers.borrow().len())
            .finish()
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use static_assertions::assert_not_impl_any;

    use super::*;

    assert_not_impl_any!(FrameScheduler: Send, Sync);

    fn log_task(log: &Rc<RefCell<Vec<&'static str>>>, name: &'static str) -> Box<dyn FnOnce()> {
        let log = Rc::clone(log);
        Box::new(move || log.borrow_mut().push(name))
    }

    #[test]
    fn runs_in_deadline_then_schedule_order() {
        let scheduler = FrameScheduler::new();
        let log = Rc::new(RefCell::new(Vec::new()));

        scheduler.schedule(Duration::from_secs(3), log_task(&log, "late"));
        scheduler.schedule(Duration::from_secs(1), log_task(&log, "early-a"));
        scheduler.schedule(Duration::from_secs(1), log_task(&log, "early-b"));

        assert_eq!(scheduler.pending(), 3);
        assert_eq!(scheduler.advance(Duration::from_secs(5)), 3);
        assert_eq!(*log.borrow(), ["early-a", "early-b", "late"]);
        assert_eq!(scheduler.pending(), 0);
    }

    #[test]
    fn nothing_runs_before_deadline() {
        let scheduler = FrameScheduler::new();
        let log = Rc::new(RefCell::new(Vec::new()));

        scheduler.schedule(Duration::from_millis(100), log_task(&log, "task"));

        assert_eq!(scheduler.advance(Duration::from_millis(99)), 0);
        assert!(log.borrow().is_empty());

        assert_eq!(scheduler.advance(Duration::from_millis(1)), 1);
        assert_eq!(*log.borrow(), ["task"]);
    }

    #[test]
    fn zero_delay_waits_for_next_advance() {
        let scheduler = FrameScheduler::new();
        let log = Rc::new(RefCell::new(Vec::new()));

        scheduler.schedule(Duration::ZERO, log_task(&log, "task"));
        assert!(log.borrow().is_empty());

        assert_eq!(scheduler.advance(Duration::ZERO), 1);
        assert_eq!(*log.borrow(), ["task"]);
    }

    #[test]
    fn tasks_see_their_own_deadline() {
        let scheduler = Rc::new(FrameScheduler::new());
        let seen = Rc::new(Cell::new(Duration::ZERO));

        scheduler.schedule(Duration::from_millis(30), {
            let scheduler = Rc::clone(&scheduler);
            let seen = Rc::clone(&seen);
            Box::new(move || seen.set(scheduler.now()))
        });

        scheduler.advance(Duration::from_millis(100));

        assert_eq!(seen.get(), Duration::from_millis(30));
        assert_eq!(scheduler.now(), Duration::from_millis(100));
    }

    #[test]
    fn tasks_can_schedule_tasks() {
        let scheduler = Rc::new(FrameScheduler::new());
        let log = Rc::new(RefCell::new(Vec::new()));

        scheduler.schedule(Duration::from_millis(10), {
            let scheduler = Rc::clone(&scheduler);
            let log = Rc::clone(&log);
            Box::new(move || {
                log.borrow_mut().push("outer");
                scheduler.schedule(Duration::from_millis(10), log_task(&log, "inner-soon"));
                scheduler.schedule(Duration::from_millis(500), log_task(&log, "inner-later"));
            })
        });

        assert_eq!(scheduler.advance(Duration::from_millis(50)), 2);
        assert_eq!(*log.borrow(), ["outer", "inner-soon"]);
        assert_eq!(scheduler.pending(), 1);

        assert_eq!(scheduler.advance(Duration::from_secs(1)), 1);
        assert_eq!(*log.borrow(), ["outer", "inner-soon", "inner-later"]);
    }
}
