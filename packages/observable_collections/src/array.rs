use std::fmt;
use std::iter;
use std::ops::Index;

use crate::{Notifier, SlotStore, SubscriptionToken};

/// Number of slots in an [`ObservableArray`] created via [`Default`].
pub const DEFAULT_ARRAY_LEN: usize = 20;

/// A fixed number of slots that broadcasts all of its slots to subscribers after every mutation.
///
/// Each slot is either vacant (`None`) or holds one value. The number of slots ([`len()`][1]) is
/// fixed at creation, whereas [`count()`][2] reports how many slots are occupied.
///
/// Every successful mutation (`swap`, `clear`, `try_add`, `try_add_at`, `try_remove`,
/// `try_remove_at`) first changes the slots and then calls every subscriber, in subscription
/// order, with the complete post-mutation slot sequence. One mutation always produces exactly one
/// broadcast. A `try_*` call that returns `false` changes nothing and notifies no one.
///
/// # Example
///
/// ```rust
/// use std::cell::RefCell;
/// use std::rc::Rc;
///
/// use observable_collections::ObservableArray;
///
/// let mut inventory = ObservableArray::new(4);
///
/// let latest = Rc::new(RefCell::new(Vec::new()));
/// inventory.subscribe({
///     let latest = Rc::clone(&latest);
///     move |slots: &[Option<&str>]| *latest.borrow_mut() = slots.to_vec()
/// });
///
/// assert!(inventory.try_add_at(2, "sword"));
/// assert!(!inventory.try_add_at(2, "shield")); // Occupied.
///
/// assert_eq!(*latest.borrow(), [None, None, Some("sword"), None]);
/// assert_eq!(inventory.count(), 1);
/// assert_eq!(inventory.len(), 4);
/// ```
///
/// [1]: Self::len
/// [2]: Self::count
pub struct ObservableArray<T> {
    store: SlotStore<T>,
    notifier: Notifier<[Option<T>]>,
}

impl<T> ObservableArray<T> {
    /// Creates an array of `len` vacant slots.
    #[must_use]
    pub fn new(len: usize) -> Self {
        Self {
            store: SlotStore::new(len),
            notifier: Notifier::new(),
        }
    }

    /// Creates an array of `len` slots, filling them in order from `initial`.
    ///
    /// Items beyond the first `len` are ignored. If `initial` yields fewer than `len` items,
    /// the remaining slots are vacant.
    ///
    /// # Example
    ///
    /// ```rust
    /// use observable_collections::ObservableArray;
    ///
    /// let array = ObservableArray::with_initial(3, [1, 2, 3, 4]);
    /// assert_eq!(array.slots(), &[Some(1), Some(2), Some(3)]);
    ///
    /// let array = ObservableArray::with_initial(3, [1]);
    /// assert_eq!(array.slots(), &[Some(1), None, None]);
    /// ```
    #[must_use]
    pub fn with_initial<I>(len: usize, initial: I) -> Self
    where
        I: IntoIterator<Item = T>,
    {
        let store = initial
            .into_iter()
            .map(Some)
            .chain(iter::repeat_with(|| None))
            .take(len)
            .collect();

        Self {
            store,
            notifier: Notifier::new(),
        }
    }

    /// Total number of slots. Never changes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.store.len()
    }

    /// Number of occupied slots.
    #[must_use]
    pub fn count(&self) -> usize {
        self.store.occupied()
    }

    /// Whether no slot is occupied.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.count() == 0
    }

    /// Whether every slot is occupied.
    #[must_use]
    pub fn is_full(&self) -> bool {
        self.store.first_vacant().is_none()
    }

    /// The value in slot `index`, or `None` if the slot is vacant or out of range.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&T> {
        self.store.get(index)
    }

    /// All slots in index order - the same view subscribers receive.
    #[must_use]
    pub fn slots(&self) -> &[Option<T>] {
        self.store.as_slice()
    }

    /// Registers a callback that receives all slots after every mutation.
    ///
    /// Registering does not itself trigger a notification.
    pub fn subscribe<F>(&mut self, callback: F) -> SubscriptionToken
    where
        F: FnMut(&[Option<T>]) + 'static,
    {
        self.notifier.subscribe(callback)
    }

    /// Detaches a callback. Returns `false` if `token` is not subscribed.
    pub fn unsubscribe(&mut self, token: SubscriptionToken) -> bool {
        self.notifier.unsubscribe(token)
    }

    /// Number of registered subscribers.
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.notifier.len()
    }

    /// Exchanges the contents of two slots and notifies.
    ///
    /// # Panics
    ///
    /// Panics if either index is out of range.
    pub fn swap(&mut self, a: usize, b: usize) {
        self.store.swap(a, b);
        self.notify();
    }

    /// Empties every slot and notifies.
    pub fn clear(&mut self) {
        self.store.clear();
        self.notify();
    }

    /// Places `item` in the lowest vacant slot.
    ///
    /// Returns `false` if every slot is occupied; the item is dropped and nobody is notified.
    pub fn try_add(&mut self, item: T) -> bool {
        match self.store.first_vacant() {
            Some(index) => self.try_add_at(index, item),
            None => false,
        }
    }

    /// Places `item` in slot `index`.
    ///
    /// Returns `false` if `index` is out of range or the slot is occupied; the item is dropped
    /// and nobody is notified.
    pub fn try_add_at(&mut self, index: usize, item: T) -> bool {
        if self.store.put(index, item).is_err() {
            return false;
        }

        self.notify();
        true
    }

    /// Empties slot `index`. The slot stays in place as a vacancy.
    ///
    /// Returns `false` if `index` is out of range or the slot is already vacant.
    pub fn try_remove_at(&mut self, index: usize) -> bool {
        if self.store.take(index).is_none() {
            return false;
        }

        self.notify();
        true
    }

    fn notify(&mut self) {
        self.notifier.notify(self.store.as_slice());
    }
}

impl<T: PartialEq> ObservableArray<T> {
    /// Empties the lowest slot holding a value equal to `item`.
    ///
    /// Returns `false` if no slot holds such a value.
    pub fn try_remove(&mut self, item: &T) -> bool {
        match self.store.position(item) {
            Some(index) => self.try_remove_at(index),
            None => false,
        }
    }
}

impl<T> Default for ObservableArray<T> {
    fn default() -> Self {
        Self::new(DEFAULT_ARRAY_LEN)
    }
}

impl<T> Index<usize> for ObservableArray<T> {
    type Output = Option<T>;

    /// # Panics
    ///
    /// Panics if `index` is out of range.
    fn index(&self, index: usize) -> &Self::Output {
        &self.store.as_slice()[index]
    }
}

impl<T: fmt::Debug> fmt::Debug for ObservableArray<T> {
    #[cfg_attr(test, mutants::skip)] // No API contract to test.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ObservableArray")
            .field("slots", &self.store.as_slice())
            .field("subscribers", &self.notifier.len())
            .finish()
    }
}
