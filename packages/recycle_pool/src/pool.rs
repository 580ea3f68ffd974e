use std::collections::VecDeque;
use std::convert::Infallible;
use std::fmt;
use std::thread;

use crate::{
    DropPolicy, FromFn, InstanceKey, InstanceState, Lifecycle, PoolBuilder, PoolError, PoolId,
    Result,
};

/// A lazily growing collection of reusable instances.
///
/// The pool owns every instance it has ever created. Each instance is either *active* (handed
/// out to a consumer) or *idle* (waiting in the idle queue). Acquiring takes the instance that
/// has been idle the longest; only when no instance is idle does the pool construct a new one via
/// its [`Lifecycle`]. Releasing puts an instance at the back of the idle queue. Instances are
/// never destroyed while the pool exists, so the instance count only ever grows.
///
/// Consumers refer to instances by [`InstanceKey`]. Keys carry the identity of the pool that
/// issued them and the generation of the checkout they belong to. Releasing a key from another
/// pool, releasing the same instance twice, or releasing through a stale key after the instance
/// has been handed out again, is detected and rejected with a [`PoolError`] instead of
/// corrupting the idle queue.
///
/// There is no upper limit on the number of instances. Callers that want one can check
/// [`len()`][Self::len] before acquiring.
///
/// # Example
///
/// ```rust
/// use recycle_pool::Pool;
///
/// let mut next = 100;
/// let mut pool = Pool::from_fn(2, move || {
///     let value = next;
///     next += 1;
///     value
/// });
///
/// let a = pool.acquire();
/// let b = pool.acquire();
/// let c = pool.acquire(); // The idle queue is empty, so the pool grows.
///
/// assert_eq!(pool.get(a), Some(&100));
/// assert_eq!(pool.get(b), Some(&101));
/// assert_eq!(pool.get(c), Some(&102));
///
/// pool.release(b).unwrap();
///
/// // Same instance, new checkout.
/// let again = pool.acquire();
/// assert_eq!(again.index(), b.index());
/// assert_eq!(pool.get(again), Some(&101));
/// assert!(pool.get(b).is_none());
/// assert_eq!(pool.len(), 3);
/// ```
///
/// # Thread safety
///
/// The pool does no internal locking. It can be moved to another thread if its lifecycle and
/// items can, but sharing it requires external synchronization. For single-threaded sharing and
/// self-returning handles, see [`LocalPool`][crate::LocalPool].
pub struct Pool<L: Lifecycle> {
    id: PoolId,
    name: Option<String>,
    lifecycle: L,

    // Every instance ever created, in creation order. `InstanceKey::index` points in here.
    instances: Vec<Entry<L::Item>>,

    // Indexes into `instances`, longest-idle first. An index is in here exactly when its
    // entry has `idle == true`.
    idle: VecDeque<usize>,

    drop_policy: DropPolicy,
}

struct Entry<T> {
    item: T,
    idle: bool,

    // Bumped every time the instance is handed out.
    generation: u64,
}

impl<L: Lifecycle> Pool<L> {
    /// Creates an empty pool with default configuration.
    ///
    /// Use [`builder()`][Self::builder] to preload instances or change the configuration.
    #[must_use]
    pub fn new(lifecycle: L) -> Self {
        Self::new_inner(lifecycle, None, DropPolicy::default())
    }

    /// Returns a builder for creating a pool with custom configuration.
    ///
    /// # Example
    ///
    /// ```rust
    /// use recycle_pool::{FromFn, Pool};
    ///
    /// let pool = Pool::builder(FromFn::new(String::new))
    ///     .initial_size(8)
    ///     .name("strings")
    ///     .build()
    ///     .unwrap();
    ///
    /// assert_eq!(pool.len(), 8);
    /// assert_eq!(pool.idle_len(), 8);
    /// ```
    pub fn builder(lifecycle: L) -> PoolBuilder<L> {
        PoolBuilder::new(lifecycle)
    }

    pub(crate) fn new_inner(lifecycle: L, name: Option<String>, drop_policy: DropPolicy) -> Self {
        Self {
            id: PoolId::next(),
            name,
            lifecycle,
            instances: Vec::new(),
            idle: VecDeque::new(),
            drop_policy,
        }
    }

    /// Constructs `count` instances up front and puts them in the idle queue, deactivated,
    /// in construction order.
    #[cfg_attr(test, mutants::skip)] // Can be mutated to infinitely growing memory use.
    pub(crate) fn preload(&mut self, count: usize) -> std::result::Result<(), L::Error> {
        self.instances.reserve(count);
        self.idle.reserve(count);

        for _ in 0..count {
            let mut item = self.lifecycle.construct()?;
            self.lifecycle.deactivate(&mut item);

            let index = self.instances.len();
            self.instances.push(Entry {
                item,
                idle: true,
                generation: 0,
            });
            self.idle.push_back(index);
        }

        Ok(())
    }

    /// Hands out an instance, constructing a new one if none is idle.
    ///
    /// The longest-idle instance is preferred. The returned instance has been activated.
    ///
    /// # Errors
    ///
    /// If the idle queue is empty and the lifecycle fails to construct a new instance, that
    /// error is returned as-is. The pool is unchanged in that case.
    pub fn try_acquire(&mut self) -> std::result::Result<InstanceKey, L::Error> {
        let index = match self.idle.pop_front() {
            Some(index) => index,
            None => self.grow()?,
        };

        let entry = self
            .instances
            .get_mut(index)
            .expect("the idle queue only holds indexes of existing instances");

        entry.idle = false;
        entry.generation = entry.generation.wrapping_add(1);
        self.lifecycle.activate(&mut entry.item);

        let generation = entry.generation;

        tracing::trace!(pool = %self.id, index, generation, "instance acquired");

        Ok(InstanceKey::new(self.id, index, generation))
    }

    fn grow(&mut self) -> std::result::Result<usize, L::Error> {
        let item = self.lifecycle.construct()?;

        let index = self.instances.len();
        self.instances.push(Entry {
            item,
            idle: false,
            generation: 0,
        });

        tracing::debug!(
            pool = %self.id,
            name = self.name.as_deref(),
            instances = self.instances.len(),
            "pool grew"
        );

        Ok(index)
    }

    /// Takes back an instance, deactivating it and placing it at the back of the idle queue.
    ///
    /// # Errors
    ///
    /// * [`PoolError::NotOwned`] if the key was issued by a different pool.
    /// * [`PoolError::DoubleReturn`] if the instance is already idle, or if the key is stale
    ///   because the instance has been handed out again since the key was issued.
    ///
    /// The pool is unchanged when an error is returned.
    pub fn release(&mut self, key: InstanceKey) -> Result<()> {
        if key.pool() != self.id {
            return Err(PoolError::NotOwned { key });
        }

        let Some(entry) = self.instances.get_mut(key.index()) else {
            return Err(PoolError::NotOwned { key });
        };

        if entry.idle || entry.generation != key.generation() {
            return Err(PoolError::DoubleReturn { key });
        }

        self.lifecycle.deactivate(&mut entry.item);
        entry.idle = true;
        self.idle.push_back(key.index());

        tracing::trace!(pool = %self.id, index = key.index(), "instance released");

        Ok(())
    }

    /// Accesses an active instance.
    ///
    /// Returns `None` if the key belongs to another pool, the instance is idle, or the key is
    /// stale.
    #[must_use]
    pub fn get(&self, key: InstanceKey) -> Option<&L::Item> {
        self.current_entry(key)
            .filter(|entry| !entry.idle)
            .map(|entry| &entry.item)
    }

    /// Mutably accesses an active instance.
    ///
    /// Returns `None` if the key belongs to another pool, the instance is idle, or the key is
    /// stale.
    #[must_use]
    pub fn get_mut(&mut self, key: InstanceKey) -> Option<&mut L::Item> {
        if key.pool() != self.id {
            return None;
        }

        self.instances
            .get_mut(key.index())
            .filter(|entry| !entry.idle && entry.generation == key.generation())
            .map(|entry| &mut entry.item)
    }

    // The entry `key` refers to, if the key is from this pool and not stale.
    fn current_entry(&self, key: InstanceKey) -> Option<&Entry<L::Item>> {
        if key.pool() != self.id {
            return None;
        }

        self.instances
            .get(key.index())
            .filter(|entry| entry.generation == key.generation())
    }

    /// Reports whether an instance is active or idle.
    ///
    /// Returns `None` if the key was not issued by this pool, or if it is stale because the
    /// instance has been handed out again since the key was issued.
    #[must_use]
    pub fn state(&self, key: InstanceKey) -> Option<InstanceState> {
        self.current_entry(key).map(|entry| {
            if entry.idle {
                InstanceState::Idle
            } else {
                InstanceState::Active
            }
        })
    }

    /// Number of instances the pool has created, active and idle alike.
    #[must_use]
    pub fn len(&self) -> usize {
        self.instances.len()
    }

    /// Whether the pool has not created any instances yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.instances.is_empty()
    }

    /// Number of instances waiting in the idle queue.
    #[must_use]
    pub fn idle_len(&self) -> usize {
        self.idle.len()
    }

    /// Number of instances currently handed out.
    #[must_use]
    pub fn active_len(&self) -> usize {
        self.instances
            .len()
            .checked_sub(self.idle.len())
            .expect("the idle queue never holds more entries than there are instances")
    }

    /// Keys of the idle instances, in the order they will be handed out.
    ///
    /// These name the instances' most recent checkouts. Acquiring an instance issues a new key
    /// for it and makes these stale.
    pub fn idle_keys(&self) -> impl Iterator<Item = InstanceKey> + '_ {
        self.idle.iter().map(|&index| self.current_key(index))
    }

    /// Keys of every instance, in creation order.
    pub fn keys(&self) -> impl Iterator<Item = InstanceKey> + '_ {
        (0..self.instances.len()).map(|index| self.current_key(index))
    }

    fn current_key(&self, index: usize) -> InstanceKey {
        let entry = self
            .instances
            .get(index)
            .expect("only called with indexes of existing instances");

        InstanceKey::new(self.id, index, entry.generation)
    }

    /// The identity stamped into every key this pool hands out.
    #[must_use]
    pub fn id(&self) -> PoolId {
        self.id
    }

    /// The name given to the pool at creation, if any.
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// The lifecycle the pool uses to construct and toggle instances.
    #[must_use]
    pub fn lifecycle(&self) -> &L {
        &self.lifecycle
    }

    /// The policy applied when the pool is dropped.
    #[must_use]
    pub fn drop_policy(&self) -> DropPolicy {
        self.drop_policy
    }
}

impl<L> Pool<L>
where
    L: Lifecycle<Error = Infallible>,
{
    /// Hands out an instance, constructing a new one if none is idle.
    ///
    /// This is [`try_acquire()`][Self::try_acquire] for lifecycles that cannot fail.
    pub fn acquire(&mut self) -> InstanceKey {
        let Ok(key) = self.try_acquire();
        key
    }
}

impl<F, R> Pool<FromFn<F>>
where
    F: FnMut() -> R,
{
    /// Creates a pool whose instances are produced by `factory`, preloading `initial_size` of
    /// them into the idle queue.
    ///
    /// # Example
    ///
    /// ```rust
    /// use recycle_pool::Pool;
    ///
    /// let mut pool = Pool::from_fn(4, Vec::<u8>::new);
    ///
    /// assert_eq!(pool.len(), 4);
    ///
    /// let key = pool.acquire();
    /// pool.get_mut(key).unwrap().push(1);
    /// ```
    #[must_use]
    pub fn from_fn(initial_size: usize, factory: F) -> Self {
        let Ok(pool) = Self::builder(FromFn::new(factory))
            .initial_size(initial_size)
            .build();
        pool
    }
}

impl<L: Lifecycle> Drop for Pool<L> {
    fn drop(&mut self) {
        if thread::panicking() || self.drop_policy != DropPolicy::MustNotDropActive {
            return;
        }

        let active = self.active_len();

        assert!(
            active == 0,
            "dropped {} with {active} active instances - this is forbidden by DropPolicy::MustNotDropActive",
            self.id
        );
    }
}

impl<L: Lifecycle> fmt::Debug for Pool<L> {
    #[cfg_attr(test, mutants::skip)] // No API contract to test.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Pool")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("instances", &self.instances.len())
            .field("idle", &self.idle.len())
            .field("drop_policy", &self.drop_policy)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use std::cell::Cell;
    use std::collections::HashSet;
    use std::rc::Rc;

    use static_assertions::{assert_impl_all, assert_not_impl_any};

    use super::*;

    type CounterPool = Pool<FromFn<Box<dyn FnMut() -> u32>>>;

    assert_impl_all!(Pool<FromFn<fn() -> u32>>: Send);
    assert_not_impl_any!(CounterPool: Send, Sync);

    fn counting_from(start: u32) -> impl FnMut() -> u32 {
        let mut next = start;
        move || {
            let value = next;
            next += 1;
            value
        }
    }

    /// Records activation toggles so tests can observe the presentation state.
    struct Lamp {
        lit: bool,
        toggles: u32,
    }

    struct LampLifecycle {
        constructed: Rc<Cell<u32>>,
        fail: Rc<Cell<bool>>,
    }

    impl Lifecycle for LampLifecycle {
        type Item = Lamp;
        type Error = &'static str;

        fn construct(&mut self) -> std::result::Result<Lamp, &'static str> {
            if self.fail.get() {
                return Err("out of lamps");
            }

            self.constructed.set(self.constructed.get() + 1);
            Ok(Lamp {
                lit: true,
                toggles: 0,
            })
        }

        fn activate(&self, item: &mut Lamp) {
            item.lit = true;
            item.toggles += 1;
        }

        fn deactivate(&self, item: &mut Lamp) {
            item.lit = false;
            item.toggles += 1;
        }
    }

    fn lamp_pool() -> (Pool<LampLifecycle>, Rc<Cell<u32>>, Rc<Cell<bool>>) {
        let constructed = Rc::new(Cell::new(0));
        let fail = Rc::new(Cell::new(false));

        let pool = Pool::new(LampLifecycle {
            constructed: Rc::clone(&constructed),
            fail: Rc::clone(&fail),
        });

        (pool, constructed, fail)
    }

    #[test]
    fn scenario_growth_then_fifo_reuse() {
        let mut pool = Pool::from_fn(2, counting_from(100));

        let a = pool.acquire();
        let b = pool.acquire();
        let c = pool.acquire();

        assert_eq!(pool.get(a), Some(&100));
        assert_eq!(pool.get(b), Some(&101));
        assert_eq!(pool.get(c), Some(&102));
        assert_eq!(pool.len(), 3);

        pool.release(b).unwrap();
        let again = pool.acquire();

        assert_eq!(again.index(), b.index());
        assert_eq!(pool.get(again), Some(&101));
        assert_eq!(pool.len(), 3);
    }

    #[test]
    fn reuse_follows_release_order() {
        let mut pool = Pool::from_fn(0, counting_from(0));
        let keys: Vec<_> = (0..5).map(|_| pool.acquire()).collect();

        let release_order = [keys[3], keys[0], keys[4], keys[1], keys[2]];
        for key in release_order {
            pool.release(key).unwrap();
        }

        let reacquired: Vec<_> = (0..5).map(|_| pool.acquire().index()).collect();

        assert_eq!(reacquired, release_order.map(|key| key.index()));
        assert_eq!(pool.len(), 5);
    }

    #[test]
    fn growth_adds_exactly_one() {
        let mut pool = Pool::from_fn(0, counting_from(0));

        for expected in 1..=10 {
            assert_eq!(pool.idle_len(), 0);
            pool.acquire();
            assert_eq!(pool.len(), expected);
        }
    }

    #[test]
    fn preloaded_instances_are_idle_and_deactivated() {
        let constructed = Rc::new(Cell::new(0));
        let pool = Pool::builder(LampLifecycle {
            constructed: Rc::clone(&constructed),
            fail: Rc::new(Cell::new(false)),
        })
        .initial_size(3)
        .build()
        .unwrap();

        assert_eq!(constructed.get(), 3);
        assert_eq!(pool.idle_len(), 3);
        assert_eq!(pool.active_len(), 0);

        for key in pool.keys() {
            assert_eq!(pool.state(key), Some(InstanceState::Idle));
        }

        // Constructed lit, switched off by preloading, switched on again when handed out.
        let mut pool = pool;
        let key = pool.try_acquire().unwrap();
        let lamp = pool.get(key).unwrap();
        assert!(lamp.lit);
        assert_eq!(lamp.toggles, 2);
        assert_eq!(constructed.get(), 3);
    }

    #[test]
    fn acquire_activates_and_release_deactivates() {
        let (mut pool, _, _) = lamp_pool();

        let key = pool.try_acquire().unwrap();
        assert!(pool.get(key).unwrap().lit);

        pool.release(key).unwrap();
        assert_eq!(pool.state(key), Some(InstanceState::Idle));
        assert!(pool.get(key).is_none());

        let key = pool.try_acquire().unwrap();
        let lamp = pool.get(key).unwrap();
        assert!(lamp.lit);
        assert_eq!(lamp.toggles, 3);
    }

    #[test]
    fn construct_failure_leaves_pool_unchanged() {
        let (mut pool, constructed, fail) = lamp_pool();

        let first = pool.try_acquire().unwrap();
        fail.set(true);

        assert_eq!(pool.try_acquire().err(), Some("out of lamps"));
        assert_eq!(pool.len(), 1);
        assert_eq!(pool.idle_len(), 0);
        assert_eq!(constructed.get(), 1);

        // Reuse does not need the factory at all.
        pool.release(first).unwrap();
        assert_eq!(
            pool.try_acquire().map(|key| key.index()),
            Ok(first.index())
        );
    }

    #[test]
    fn construct_failure_during_preload_fails_build() {
        let result = Pool::builder(LampLifecycle {
            constructed: Rc::new(Cell::new(0)),
            fail: Rc::new(Cell::new(true)),
        })
        .initial_size(2)
        .build();

        assert_eq!(result.err(), Some("out of lamps"));
    }

    #[test]
    fn double_release_is_rejected() {
        let mut pool = Pool::from_fn(1, counting_from(0));
        let key = pool.acquire();

        pool.release(key).unwrap();

        assert_eq!(pool.release(key), Err(PoolError::DoubleReturn { key }));
        assert_eq!(pool.idle_len(), 1);
    }

    #[test]
    fn release_of_preloaded_idle_instance_is_rejected() {
        let mut pool = Pool::from_fn(1, counting_from(0));
        let key = pool.keys().next().unwrap();

        assert_eq!(pool.release(key), Err(PoolError::DoubleReturn { key }));
    }

    #[test]
    fn stale_key_cannot_release_next_checkout() {
        let mut pool = Pool::from_fn(0, counting_from(0));

        let first = pool.acquire();
        pool.release(first).unwrap();

        let second = pool.acquire();
        assert_eq!(second.index(), first.index());
        assert_ne!(second, first);

        assert_eq!(
            pool.release(first),
            Err(PoolError::DoubleReturn { key: first })
        );
        assert_eq!(pool.state(second), Some(InstanceState::Active));
        assert_eq!(pool.idle_len(), 0);

        // A third consumer gets a fresh instance rather than the one still in use.
        let third = pool.acquire();
        assert_ne!(third.index(), second.index());
        assert_eq!(pool.len(), 2);
    }

    #[test]
    fn stale_key_cannot_access_next_checkout() {
        let mut pool = Pool::from_fn(0, String::new);

        let first = pool.acquire();
        pool.release(first).unwrap();
        assert_eq!(pool.state(first), Some(InstanceState::Idle));

        let second = pool.acquire();
        pool.get_mut(second).unwrap().push_str("mine");

        assert!(pool.get(first).is_none());
        assert!(pool.get_mut(first).is_none());
        assert_eq!(pool.state(first), None);
        assert_eq!(pool.get(second).map(String::as_str), Some("mine"));
    }

    #[test]
    fn stale_key_is_rejected_after_instance_is_idle_again() {
        let mut pool = Pool::from_fn(0, counting_from(0));

        let first = pool.acquire();
        pool.release(first).unwrap();
        let second = pool.acquire();
        pool.release(second).unwrap();

        assert_eq!(
            pool.release(first),
            Err(PoolError::DoubleReturn { key: first })
        );
        assert_eq!(pool.idle_keys().collect::<Vec<_>>(), [second]);
    }

    #[test]
    fn foreign_key_is_rejected() {
        let mut pool_a = Pool::from_fn(0, counting_from(0));
        let mut pool_b = Pool::from_fn(0, counting_from(0));

        let key_a = pool_a.acquire();
        let _key_b = pool_b.acquire();

        assert_eq!(pool_b.release(key_a), Err(PoolError::NotOwned { key: key_a }));
        assert_eq!(pool_b.idle_len(), 0);
        assert!(pool_b.get(key_a).is_none());
        assert!(pool_b.get_mut(key_a).is_none());
        assert_eq!(pool_b.state(key_a), None);
    }

    #[test]
    fn idle_invariant_holds_under_mixed_traffic() {
        let mut pool = Pool::from_fn(3, counting_from(0));
        let mut active = Vec::new();

        for round in 0_usize..50 {
            if round % 3 == 2 && !active.is_empty() {
                let key = active.remove(round % active.len());
                pool.release(key).unwrap();
            } else {
                active.push(pool.acquire());
            }

            let idle: Vec<_> = pool.idle_keys().collect();
            let unique: HashSet<_> = idle.iter().copied().collect();

            assert_eq!(idle.len(), unique.len());
            assert!(active.iter().all(|key| !unique.contains(key)));
            assert_eq!(pool.active_len(), active.len());
            assert!(pool.idle_len() <= pool.len());
        }
    }

    #[test]
    fn get_mut_modifies_active_instance() {
        let mut pool = Pool::from_fn(0, String::new);
        let key = pool.acquire();

        pool.get_mut(key).unwrap().push_str("hello");

        assert_eq!(pool.get(key).map(String::as_str), Some("hello"));
    }

    #[test]
    fn name_and_policy_come_from_builder() {
        let pool = Pool::builder(FromFn::new(|| 0_u8))
            .name("bytes")
            .drop_policy(DropPolicy::MustNotDropActive)
            .build()
            .unwrap();

        assert_eq!(pool.name(), Some("bytes"));
        assert_eq!(pool.drop_policy(), DropPolicy::MustNotDropActive);
        assert!(pool.is_empty());
    }

    #[test]
    fn drop_without_active_does_not_panic_if_policy_must_not_drop() {
        let mut pool = Pool::builder(FromFn::new(|| 0_u8))
            .initial_size(2)
            .drop_policy(DropPolicy::MustNotDropActive)
            .build()
            .unwrap();

        let key = pool.acquire();
        pool.release(key).unwrap();

        drop(pool);
    }

    #[test]
    #[should_panic]
    fn drop_with_active_panics_if_policy_must_not_drop() {
        let mut pool = Pool::builder(FromFn::new(|| 0_u8))
            .drop_policy(DropPolicy::MustNotDropActive)
            .build()
            .unwrap();

        _ = pool.acquire();

        drop(pool);
    }
}
