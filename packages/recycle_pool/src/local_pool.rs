use std::cell::RefCell;
use std::convert::Infallible;
use std::fmt;
use std::rc::{Rc, Weak};

use crate::{InstanceKey, Lifecycle, Pool, PooledHandle, Result};

/// A single-threaded, cloneable handle to a shared [`Pool`].
///
/// All clones refer to the same pool. This is the pool type that hands out
/// [`PooledHandle`]s, which need a shared pool to return their instance to later.
///
/// # Single-threaded design
///
/// This type is neither [`Send`] nor [`Sync`]. The pool is borrowed for the duration of each
/// call, so callbacks passed to [`with()`][Self::with] and [`with_mut()`][Self::with_mut] must
/// not call back into the same pool.
///
/// # Example
///
/// ```rust
/// use recycle_pool::{LocalPool, Pool};
///
/// let pool = LocalPool::from(Pool::from_fn(1, || 0_u32));
/// let pool_clone = pool.clone();
///
/// let key = pool.acquire();
/// pool_clone.with_mut(key, |value| *value += 5);
///
/// assert_eq!(pool.with(key, |value| *value), Some(5));
/// assert_eq!(pool_clone.active_len(), 1);
/// ```
pub struct LocalPool<L: Lifecycle> {
    inner: Rc<RefCell<Pool<L>>>,
}

impl<L: Lifecycle> From<Pool<L>> for LocalPool<L> {
    fn from(pool: Pool<L>) -> Self {
        Self {
            inner: Rc::new(RefCell::new(pool)),
        }
    }
}

impl<L: Lifecycle> LocalPool<L> {
    /// Creates an empty shared pool with default configuration.
    #[must_use]
    pub fn new(lifecycle: L) -> Self {
        Self::from(Pool::new(lifecycle))
    }

    /// Hands out an instance. See [`Pool::try_acquire()`].
    ///
    /// # Errors
    ///
    /// Returns the lifecycle's error if a new instance was needed but could not be constructed.
    pub fn try_acquire(&self) -> std::result::Result<InstanceKey, L::Error> {
        self.inner.borrow_mut().try_acquire()
    }

    /// Hands out an instance wrapped in a handle that can return it later, possibly after a
    /// delay.
    ///
    /// # Errors
    ///
    /// Returns the lifecycle's error if a new instance was needed but could not be constructed.
    pub fn try_acquire_handle(&self) -> std::result::Result<PooledHandle<L>, L::Error> {
        let key = self.try_acquire()?;
        Ok(PooledHandle::new(key, self.downgrade()))
    }

    /// Takes back an instance. See [`Pool::release()`].
    ///
    /// # Errors
    ///
    /// Fails if the key is from another pool or the instance is already idle.
    pub fn release(&self, key: InstanceKey) -> Result<()> {
        self.inner.borrow_mut().release(key)
    }

    /// Calls `f` with an active instance and returns its result.
    ///
    /// Returns `None` if the key is from another pool or the instance is idle.
    pub fn with<T>(&self, key: InstanceKey, f: impl FnOnce(&L::Item) -> T) -> Option<T> {
        self.inner.borrow().get(key).map(f)
    }

    /// Calls `f` with an active instance and returns its result.
    ///
    /// Returns `None` if the key is from another pool or the instance is idle.
    pub fn with_mut<T>(&self, key: InstanceKey, f: impl FnOnce(&mut L::Item) -> T) -> Option<T> {
        self.inner.borrow_mut().get_mut(key).map(f)
    }

    /// Number of instances the pool has created.
    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.borrow().len()
    }

    /// Whether the pool has not created any instances yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inner.borrow().is_empty()
    }

    /// Number of instances waiting in the idle queue.
    #[must_use]
    pub fn idle_len(&self) -> usize {
        self.inner.borrow().idle_len()
    }

    /// Number of instances currently handed out.
    #[must_use]
    pub fn active_len(&self) -> usize {
        self.inner.borrow().active_len()
    }

    /// Keys of the idle instances, in the order they will be handed out.
    #[must_use]
    pub fn idle_keys(&self) -> Vec<InstanceKey> {
        self.inner.borrow().idle_keys().collect()
    }

    pub(crate) fn downgrade(&self) -> Weak<RefCell<Pool<L>>> {
        Rc::downgrade(&self.inner)
    }
}

impl<L> LocalPool<L>
where
    L: Lifecycle<Error = Infallible>,
{
    /// Hands out an instance, constructing a new one if none is idle.
    pub fn acquire(&self) -> InstanceKey {
        self.inner.borrow_mut().acquire()
    }

    /// Hands out an instance wrapped in a handle that can return it later, possibly after a
    /// delay.
    pub fn acquire_handle(&self) -> PooledHandle<L> {
        let key = self.acquire();
        PooledHandle::new(key, self.downgrade())
    }
}

impl<L: Lifecycle> Clone for LocalPool<L> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<L: Lifecycle> fmt::Debug for LocalPool<L> {
    #[cfg_attr(test, mutants::skip)] // No API contract to test.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LocalPool")
            .field("inner", &self.inner)
            .finish()
    }
}
