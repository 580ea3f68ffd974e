use std::fmt;
use std::sync::atomic::{self, AtomicU64};

static NEXT_POOL_ID: AtomicU64 = AtomicU64::new(0);

/// Process-unique identity of a [`Pool`][crate::Pool].
///
/// Every key handed out by a pool carries the pool's identity, which lets the pool reject keys
/// that came from somewhere else.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct PoolId(u64);

impl PoolId {
    pub(crate) fn next() -> Self {
        Self(NEXT_POOL_ID.fetch_add(1, atomic::Ordering::Relaxed))
    }
}

impl fmt::Display for PoolId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "pool#{}", self.0)
    }
}

/// Identifies one instance owned by a [`Pool`][crate::Pool].
///
/// Keys are cheap to copy. Each key names one checkout of an instance: the pool stamps a new
/// generation into the key every time it hands the instance out. Once the instance has been
/// handed out again, keys from earlier checkouts are stale and the pool rejects them, so a
/// consumer holding on to an old key cannot touch or release the instance's next user.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct InstanceKey {
    pool: PoolId,
    index: usize,
    generation: u64,
}

impl InstanceKey {
    pub(crate) fn new(pool: PoolId, index: usize, generation: u64) -> Self {
        Self {
            pool,
            index,
            generation,
        }
    }

    /// The pool that issued this key.
    #[must_use]
    pub fn pool(&self) -> PoolId {
        self.pool
    }

    /// Position of the instance in its pool, in creation order starting from zero.
    #[must_use]
    pub fn index(&self) -> usize {
        self.index
    }

    /// How many times the instance had been handed out when this key was issued.
    ///
    /// Two keys with the same [`index()`][Self::index] but different generations refer to the
    /// same instance during different checkouts.
    #[must_use]
    pub fn generation(&self) -> u64 {
        self.generation
    }
}

impl fmt::Display for InstanceKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "instance {} of {}", self.index, self.pool)
    }
}

/// Whether a pooled instance is checked out or waiting for reuse.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
#[non_exhaustive]
pub enum InstanceState {
    /// In use by a consumer.
    Active,

    /// In the idle queue, waiting to be handed out again.
    Idle,
}
