use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::{Rc, Weak};
use std::time::Duration;

use crate::{InstanceKey, Lifecycle, Pool, PoolError, Result, Scheduler};

/// Binds one consumer's use of a pooled instance to the eventual return of that instance.
///
/// A handle is created by [`LocalPool::acquire_handle()`][crate::LocalPool::acquire_handle] and
/// refers to exactly one instance of exactly one pool. It does not keep the pool alive.
///
/// The instance goes back to the pool either:
///
/// * immediately, via [`return_to_pool()`][Self::return_to_pool], or
/// * later, via [`return_to_pool_after()`][Self::return_to_pool_after], which schedules the
///   return on a [`Scheduler`] and returns right away.
///
/// Once the instance has been returned the handle is inert. Dropping a handle does *not* return
/// its instance; it does cancel any delayed return that has not fired yet.
///
/// # Example
///
/// ```rust
/// use std::time::Duration;
///
/// use recycle_pool::{FrameScheduler, LocalPool, Pool};
///
/// let pool = LocalPool::from(Pool::from_fn(1, || "projectile"));
/// let scheduler = FrameScheduler::new();
///
/// let handle = pool.acquire_handle();
/// handle.return_to_pool_after(Duration::from_secs(2), &scheduler);
///
/// scheduler.advance(Duration::from_secs(1));
/// assert_eq!(pool.active_len(), 1);
///
/// scheduler.advance(Duration::from_secs(1));
/// assert_eq!(pool.active_len(), 0);
/// assert!(handle.is_returned());
/// ```
#[must_use = "dropping a handle leaves its instance checked out"]
pub struct PooledHandle<L: Lifecycle> {
    binding: Rc<Binding<L>>,
}

// Shared between the handle and any pending delayed returns, which only hold a `Weak` to it.
struct Binding<L: Lifecycle> {
    key: InstanceKey,
    pool: Weak<RefCell<Pool<L>>>,
    returned: Cell<bool>,
}

impl<L: Lifecycle> Binding<L> {
    fn return_to_pool(&self) -> Result<()> {
        if self.returned.replace(true) {
            return Err(PoolError::DoubleReturn { key: self.key });
        }

        let pool = self.pool.upgrade().ok_or(PoolError::PoolDropped)?;
        let mut pool = pool.borrow_mut();
        pool.release(self.key)
    }
}

impl<L: Lifecycle> PooledHandle<L> {
    pub(crate) fn new(key: InstanceKey, pool: Weak<RefCell<Pool<L>>>) -> Self {
        Self {
            binding: Rc::new(Binding {
                key,
                pool,
                returned: Cell::new(false),
            }),
        }
    }

    /// The instance this handle is bound to.
    #[must_use]
    pub fn key(&self) -> InstanceKey {
        self.binding.key
    }

    /// Whether the instance has already been returned through this handle.
    #[must_use]
    pub fn is_returned(&self) -> bool {
        self.binding.returned.get()
    }

    /// Calls `f` with the bound instance and returns its result.
    ///
    /// Returns `None` if the instance has been returned or the pool no longer exists.
    pub fn with<T>(&self, f: impl FnOnce(&L::Item) -> T) -> Option<T> {
        if self.is_returned() {
            return None;
        }

        let pool = self.binding.pool.upgrade()?;
        let pool = pool.borrow();
        pool.get(self.binding.key).map(f)
    }

    /// Calls `f` with the bound instance and returns its result.
    ///
    /// Returns `None` if the instance has been returned or the pool no longer exists.
    pub fn with_mut<T>(&self, f: impl FnOnce(&mut L::Item) -> T) -> Option<T> {
        if self.is_returned() {
            return None;
        }

        let pool = self.binding.pool.upgrade()?;
        let mut pool = pool.borrow_mut();
        pool.get_mut(self.binding.key).map(f)
    }

    /// Returns the bound instance to its pool now.
    ///
    /// # Errors
    ///
    /// * [`PoolError::DoubleReturn`] if a delayed return already returned the instance, or if
    ///   the instance was released through the pool directly. This also covers the case where
    ///   the instance has since been handed out to someone else, which is left untouched.
    /// * [`PoolError::PoolDropped`] if the pool no longer exists.
    ///
    /// # Panics
    ///
    /// Panics if the pool is currently borrowed, for example from within a
    /// [`LocalPool::with()`][crate::LocalPool::with] callback.
    pub fn return_to_pool(self) -> Result<()> {
        self.binding.return_to_pool()
    }

    /// Schedules the bound instance to be returned to its pool once `delay` has elapsed.
    ///
    /// This returns immediately. The return happens when `scheduler` runs the task, and is
    /// skipped if this handle has been dropped or has already returned the instance by then.
    /// There is no other way to cancel it.
    ///
    /// The task has no caller to report failures to, so a return that fails when the timer
    /// fires (because the pool is gone or the instance was released by other means) is logged
    /// as a warning and otherwise ignored.
    pub fn return_to_pool_after<S>(&self, delay: Duration, scheduler: &S)
    where
        S: Scheduler + ?Sized,
        L: 'static,
    {
        let binding = Rc::downgrade(&self.binding);

        scheduler.schedule(
            delay,
            Box::new(move || {
                let Some(binding) = binding.upgrade() else {
                    tracing::trace!("handle dropped before its delayed return fired");
                    return;
                };

                if binding.returned.get() {
                    return;
                }

                if let Err(error) = binding.return_to_pool() {
                    tracing::warn!(key = %binding.key, %error, "delayed return failed");
                }
            }),
        );
    }
}

impl<L: Lifecycle> fmt::Debug for PooledHandle<L> {
    #[cfg_attr(test, mutants::skip)] // No API contract to test.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PooledHandle")
            .field("key", &self.binding.key)
            .field("returned", &self.binding.returned.get())
            .finish_non_exhaustive()
    }
}
