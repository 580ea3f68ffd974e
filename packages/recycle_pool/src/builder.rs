use std::any::type_name;
use std::fmt;

use crate::{DropPolicy, Lifecycle, Pool};

/// Builder for creating an instance of [`Pool`].
///
/// You only need to use this builder if you want to preload instances or customize the pool
/// configuration. [`Pool::new()`][1] creates an empty pool with the default configuration.
///
/// # Examples
///
/// ```
/// use recycle_pool::{DropPolicy, FromFn, Pool};
///
/// let pool = Pool::builder(FromFn::new(|| [0_u8; 64]))
///     .initial_size(16)
///     .name("scratch buffers")
///     .drop_policy(DropPolicy::MustNotDropActive)
///     .build()
///     .unwrap();
///
/// assert_eq!(pool.idle_len(), 16);
/// ```
///
/// [1]: Pool::new
#[must_use]
pub struct PoolBuilder<L: Lifecycle> {
    lifecycle: L,
    initial_size: usize,
    name: Option<String>,
    drop_policy: DropPolicy,
}

impl<L: Lifecycle> fmt::Debug for PoolBuilder<L> {
    #[cfg_attr(test, mutants::skip)] // No API contract to test.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PoolBuilder")
            .field("lifecycle", &format_args!("{}", type_name::<L>()))
            .field("initial_size", &self.initial_size)
            .field("name", &self.name)
            .field("drop_policy", &self.drop_policy)
            .finish()
    }
}

impl<L: Lifecycle> PoolBuilder<L> {
    pub(crate) fn new(lifecycle: L) -> Self {
        Self {
            lifecycle,
            initial_size: 0,
            name: None,
            drop_policy: DropPolicy::default(),
        }
    }

    /// Sets how many instances are constructed up front and placed in the idle queue.
    ///
    /// Defaults to zero, in which case instances are only constructed on demand.
    pub fn initial_size(mut self, count: usize) -> Self {
        self.initial_size = count;
        self
    }

    /// Gives the pool a name that is included in its log events.
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Sets the [drop policy][DropPolicy] for the pool. This governs what happens if
    /// instances are still checked out when the pool is dropped.
    pub fn drop_policy(mut self, policy: DropPolicy) -> Self {
        self.drop_policy = policy;
        self
    }

    /// Builds the pool, constructing the preloaded instances.
    ///
    /// Preloaded instances are deactivated and queued in construction order.
    ///
    /// # Errors
    ///
    /// Returns the lifecycle's error if constructing any preloaded instance fails.
    pub fn build(self) -> Result<Pool<L>, L::Error> {
        let mut pool = Pool::new_inner(self.lifecycle, self.name, self.drop_policy);
        pool.preload(self.initial_size)?;

        tracing::debug!(
            pool = %pool.id(),
            name = pool.name(),
            preloaded = self.initial_size,
            "pool created"
        );

        Ok(pool)
    }
}
