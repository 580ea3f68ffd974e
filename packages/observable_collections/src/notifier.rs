use std::fmt;

/// Identifies one subscription registered with a [`Notifier`].
///
/// A token is only meaningful for the notifier (or observable collection) that issued it.
/// Passing it to [`Notifier::unsubscribe()`] detaches the callback it was issued for.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct SubscriptionToken(u64);

type Callback<S> = Box<dyn FnMut(&S)>;

/// An ordered list of subscriber callbacks that all receive the same state on every broadcast.
///
/// Callbacks are invoked synchronously, in the order they were subscribed. Subscribing and
/// unsubscribing never invoke any callback.
///
/// The state type `S` is typically a slice, so subscribers see the entire current contents of
/// the collection that owns the notifier rather than a description of the change.
///
/// # Example
///
/// ```rust
/// use std::cell::Cell;
/// use std::rc::Rc;
///
/// use observable_collections::Notifier;
///
/// let mut notifier = Notifier::<[u32]>::new();
///
/// let total = Rc::new(Cell::new(0));
/// let token = notifier.subscribe({
///     let total = Rc::clone(&total);
///     move |state: &[u32]| total.set(state.iter().sum())
/// });
///
/// notifier.notify(&[1, 2, 3]);
/// assert_eq!(total.get(), 6);
///
/// assert!(notifier.unsubscribe(token));
/// notifier.notify(&[10]);
/// assert_eq!(total.get(), 6);
/// ```
pub struct Notifier<S: ?Sized> {
    // Kept in subscription order. Tokens are strictly increasing along the list.
    subscribers: Vec<(SubscriptionToken, Callback<S>)>,

    next_token: u64,
}

impl<S: ?Sized> Notifier<S> {
    /// Creates a notifier with no subscribers.
    #[must_use]
    pub fn new() -> Self {
        Self {
            subscribers: Vec::new(),
            next_token: 0,
        }
    }

    /// Registers a callback that will receive the state on every future broadcast.
    ///
    /// The callback is appended after all existing subscribers.
    pub fn subscribe<F>(&mut self, callback: F) -> SubscriptionToken
    where
        F: FnMut(&S) + 'static,
    {
        let token = SubscriptionToken(self.next_token);
        self.next_token = self
            .next_token
            .checked_add(1)
            .expect("subscription token space cannot realistically be exhausted");

        self.subscribers.push((token, Box::new(callback)));
        token
    }

    /// Detaches the callback registered under `token`.
    ///
    /// Returns `false` if no such subscription exists, for example because it was already
    /// removed. The relative order of the remaining subscribers is preserved.
    pub fn unsubscribe(&mut self, token: SubscriptionToken) -> bool {
        let Some(position) = self.subscribers.iter().position(|(t, _)| *t == token) else {
            return false;
        };

        // Preserves delivery order.
        self.subscribers.remove(position);
        true
    }

    /// Delivers `state` to every subscriber, in subscription order.
    pub fn notify(&mut self, state: &S) {
        tracing::trace!(subscribers = self.subscribers.len(), "broadcasting state");

        for (_, callback) in &mut self.subscribers {
            callback(state);
        }
    }

    /// Returns the number of active subscriptions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.subscribers.len()
    }

    /// Returns whether there are no active subscriptions.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.subscribers.is_empty()
    }
}

impl<S: ?Sized> Default for Notifier<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: ?Sized> fmt::Debug for Notifier<S> {
    #[cfg_attr(test, mutants::skip)] // No API contract to test.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Notifier")
            .field("subscribers", &self.subscribers.len())
            .field("next_token", &self.next_token)
            .finish()
    }
}
