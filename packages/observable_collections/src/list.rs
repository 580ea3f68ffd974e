use std::fmt;
use std::ops::Deref;

use crate::{Notifier, SubscriptionToken};

/// A growable list that broadcasts all of its items to subscribers after every mutation.
///
/// Mutating operations (`add`, `add_range`, `remove`, `remove_at`, `clear`) change the list and
/// then call every subscriber, in subscription order, with the complete list. Each call produces
/// exactly one broadcast, so `add_range` notifies once no matter how many items it appends.
///
/// Read access goes through [`Deref<Target = [T]>`][Deref], so all slice methods are available.
///
/// # Example
///
/// ```rust
/// use std::cell::Cell;
/// use std::rc::Rc;
///
/// use observable_collections::ObservableList;
///
/// let mut checked_out = ObservableList::new();
///
/// let broadcasts = Rc::new(Cell::new(0));
/// checked_out.subscribe({
///     let broadcasts = Rc::clone(&broadcasts);
///     move |_: &[u32]| broadcasts.set(broadcasts.get() + 1)
/// });
///
/// checked_out.add_range([1, 2, 3]);
/// checked_out.add(4);
///
/// assert_eq!(broadcasts.get(), 2);
/// assert_eq!(&*checked_out, &[1, 2, 3, 4]);
/// ```
pub struct ObservableList<T> {
    items: Vec<T>,
    notifier: Notifier<[T]>,
}

impl<T> ObservableList<T> {
    /// Creates an empty list.
    #[must_use]
    pub fn new() -> Self {
        Self::from_vec(Vec::new())
    }

    /// Creates an empty list with room for at least `capacity` items before reallocating.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self::from_vec(Vec::with_capacity(capacity))
    }

    fn from_vec(items: Vec<T>) -> Self {
        Self {
            items,
            notifier: Notifier::new(),
        }
    }

    /// Registers a callback that receives all items after every mutation.
    ///
    /// Registering does not itself trigger a notification.
    pub fn subscribe<F>(&mut self, callback: F) -> SubscriptionToken
    where
        F: FnMut(&[T]) + 'static,
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

    /// Appends one item and notifies.
    pub fn add(&mut self, item: T) {
        self.items.push(item);
        self.notify();
    }

    /// Appends every item of `items` and notifies once.
    ///
    /// An empty `items` still produces one notification.
    pub fn add_range<I>(&mut self, items: I)
    where
        I: IntoIterator<Item = T>,
    {
        self.items.extend(items);
        self.notify();
    }

    /// Removes the item at `index`, shifting later items down, and notifies.
    ///
    /// # Panics
    ///
    /// Panics if `index` is out of range.
    pub fn remove_at(&mut self, index: usize) -> T {
        let item = self.items.remove(index);
        self.notify();
        item
    }

    /// Removes every item and notifies.
    pub fn clear(&mut self) {
        self.items.clear();
        self.notify();
    }

    fn notify(&mut self) {
        self.notifier.notify(&self.items);
    }
}

impl<T: PartialEq> ObservableList<T> {
    /// Removes the first item equal to `item` and notifies.
    ///
    /// Returns whether an item was removed. Subscribers are notified either way.
    pub fn remove(&mut self, item: &T) -> bool {
        let position = self.items.iter().position(|candidate| candidate == item);

        if let Some(index) = position {
            self.items.remove(index);
        }

        self.notify();
        position.is_some()
    }
}

impl<T> Deref for ObservableList<T> {
    type Target = [T];

    fn deref(&self) -> &Self::Target {
        &self.items
    }
}

impl<T> Default for ObservableList<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> FromIterator<T> for ObservableList<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self::from_vec(iter.into_iter().collect())
    }
}

impl<T> From<Vec<T>> for ObservableList<T> {
    fn from(items: Vec<T>) -> Self {
        Self::from_vec(items)
    }
}

impl<T: fmt::Debug> fmt::Debug for ObservableList<T> {
    #[cfg_attr(test, mutants::skip)] // No API contract to test.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ObservableList")
            .field("items", &self.items)
            .field("subscribers", &self.notifier.len())
            .finish()
    }
}
