/// Fixed-capacity storage of optional values addressed by index.
///
/// The number of slots is chosen at creation time and never changes. Each slot is either vacant
/// or holds exactly one value. Removing a value leaves a vacant slot behind; the store never
/// compacts.
///
/// This type carries no notification logic - see [`ObservableArray`][crate::ObservableArray]
/// for the observable wrapper.
///
/// # Example
///
/// ```rust
/// use observable_collections::SlotStore;
///
/// let mut store = SlotStore::new(3);
///
/// assert!(store.put(1, "middle").is_ok());
/// assert_eq!(store.first_vacant(), Some(0));
/// assert_eq!(store.occupied(), 1);
/// assert_eq!(store.len(), 3);
/// ```
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct SlotStore<T> {
    slots: Box<[Option<T>]>,
}

impl<T> SlotStore<T> {
    /// Creates a store with `len` vacant slots.
    #[must_use]
    pub fn new(len: usize) -> Self {
        Self {
            slots: (0..len).map(|_| None).collect(),
        }
    }

    /// Total number of slots, occupied or not.
    #[must_use]
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Whether the store has zero slots.
    ///
    /// This is about capacity, not contents. Use [`occupied()`][Self::occupied] to count values.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Number of slots that currently hold a value.
    #[must_use]
    pub fn occupied(&self) -> usize {
        self.slots.iter().filter(|slot| slot.is_some()).count()
    }

    /// Returns the value in slot `index`, or `None` if the slot is vacant or out of range.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&T> {
        self.slots.get(index)?.as_ref()
    }

    /// Whether slot `index` exists and holds a value.
    #[must_use]
    pub fn is_occupied(&self, index: usize) -> bool {
        self.get(index).is_some()
    }

    /// Index of the lowest vacant slot, if any.
    #[must_use]
    pub fn first_vacant(&self) -> Option<usize> {
        self.slots.iter().position(Option::is_none)
    }

    /// Stores `value` in slot `index`.
    ///
    /// # Errors
    ///
    /// Gives the value back if `index` is out of range or the slot is already occupied. The
    /// store is unchanged in that case.
    pub fn put(&mut self, index: usize, value: T) -> Result<(), T> {
        let Some(slot) = self.slots.get_mut(index) else {
            return Err(value);
        };

        if slot.is_some() {
            return Err(value);
        }

        *slot = Some(value);
        Ok(())
    }

    /// Empties slot `index` and returns what it held.
    ///
    /// Returns `None` (and changes nothing) if the slot is vacant or out of range.
    pub fn take(&mut self, index: usize) -> Option<T> {
        self.slots.get_mut(index)?.take()
    }

    /// Exchanges the contents of two slots. Vacant slots are exchanged like any other.
    ///
    /// # Panics
    ///
    /// Panics if either index is out of range.
    pub fn swap(&mut self, a: usize, b: usize) {
        self.slots.swap(a, b);
    }

    /// Empties every slot. The number of slots is unchanged.
    pub fn clear(&mut self) {
        for slot in &mut self.slots {
            *slot = None;
        }
    }

    /// All slots in index order.
    #[must_use]
    pub fn as_slice(&self) -> &[Option<T>] {
        &self.slots
    }
}

impl<T: PartialEq> SlotStore<T> {
    /// Index of the lowest slot holding a value equal to `value`.
    #[must_use]
    pub fn position(&self, value: &T) -> Option<usize> {
        self.slots
            .iter()
            .position(|slot| slot.as_ref() == Some(value))
    }
}

impl<T> FromIterator<Option<T>> for SlotStore<T> {
    /// Creates a store with one slot per element, keeping vacant elements vacant.
    fn from_iter<I: IntoIterator<Item = Option<T>>>(iter: I) -> Self {
        Self {
            slots: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;

    #[test]
    fn starts_vacant() {
        let store = SlotStore::<u32>::new(4);

        assert_eq!(store.len(), 4);
        assert_eq!(store.occupied(), 0);
        assert_eq!(store.as_slice(), &[None, None, None, None]);
        assert_eq!(store.first_vacant(), Some(0));
    }

    #[test]
    fn zero_slots() {
        let mut store = SlotStore::<u32>::new(0);

        assert!(store.is_empty());
        assert_eq!(store.first_vacant(), None);
        assert_eq!(store.put(0, 1), Err(1));
    }

    #[test]
    fn put_rejects_occupied_and_out_of_range() {
        let mut store = SlotStore::new(2);

        assert_eq!(store.put(1, 'a'), Ok(()));
        assert_eq!(store.put(1, 'b'), Err('b'));
        assert_eq!(store.put(2, 'c'), Err('c'));

        assert_eq!(store.as_slice(), &[None, Some('a')]);
    }

    #[test]
    fn take_leaves_hole() {
        let mut store: SlotStore<_> = [Some(1), Some(2), Some(3)].into_iter().collect();

        assert_eq!(store.take(1), Some(2));
        assert_eq!(store.take(1), None);
        assert_eq!(store.take(9), None);

        assert_eq!(store.as_slice(), &[Some(1), None, Some(3)]);
        assert_eq!(store.first_vacant(), Some(1));
        assert_eq!(store.occupied(), 2);
    }

    #[test]
    fn position_finds_lowest_match() {
        let store: SlotStore<_> = [None, Some(5), Some(7), Some(5)].into_iter().collect();

        assert_eq!(store.position(&5), Some(1));
        assert_eq!(store.position(&7), Some(2));
        assert_eq!(store.position(&9), None);
    }

    #[test]
    fn swap_moves_vacancies() {
        let mut store: SlotStore<_> = [Some('x'), None].into_iter().collect();

        store.swap(0, 1);

        assert_eq!(store.as_slice(), &[None, Some('x')]);
    }

    #[test]
    #[should_panic]
    fn swap_out_of_range_panics() {
        let mut store = SlotStore::<u8>::new(2);
        store.swap(0, 2);
    }

    #[test]
    fn clear_keeps_length() {
        let mut store: SlotStore<_> = [Some(1), Some(2)].into_iter().collect();

        store.clear();

        assert_eq!(store.len(), 2);
        assert_eq!(store.occupied(), 0);
        assert!(!store.is_occupied(0));
    }
}
