#![cfg_attr(coverage_nightly, feature(coverage_attribute))]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![cfg_attr(coverage_nightly, coverage(off))] // This is all test code, no need to test it.

//! Private helpers for testing and examples in the pooling and observable collection packages.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

/// Records every state broadcast delivered to the callbacks it hands out.
///
/// Each call of a callback obtained from [`callback()`][Self::callback] stores a copy of the
/// slice it was given. All callbacks from the same recorder append to the same log, in call
/// order.
///
/// # Example
///
/// ```rust
/// use testing::Recorder;
///
/// let recorder = Recorder::<u8>::new();
/// let mut callback = recorder.callback();
///
/// callback(&[1, 2]);
/// callback(&[3]);
///
/// assert_eq!(recorder.count(), 2);
/// assert_eq!(recorder.last(), Some(vec![3]));
/// ```
pub struct Recorder<T> {
    log: Rc<RefCell<Vec<Vec<T>>>>,
}

impl<T: Clone + 'static> Recorder<T> {
    /// Creates a recorder with an empty log.
    #[must_use]
    pub fn new() -> Self {
        Self {
            log: Rc::new(RefCell::new(Vec::new())),
        }
    }

    /// Returns a callback that appends a copy of every state it receives to the log.
    pub fn callback(&self) -> impl FnMut(&[T]) + 'static {
        let log = Rc::clone(&self.log);
        move |state: &[T]| log.borrow_mut().push(state.to_vec())
    }

    /// Number of broadcasts recorded so far.
    #[must_use]
    pub fn count(&self) -> usize {
        self.log.borrow().len()
    }

    /// The most recently recorded state, if any.
    #[must_use]
    pub fn last(&self) -> Option<Vec<T>> {
        self.log.borrow().last().cloned()
    }

    /// Every recorded state, oldest first.
    #[must_use]
    pub fn snapshots(&self) -> Vec<Vec<T>> {
        self.log.borrow().clone()
    }
}

impl<T: Clone + 'static> Default for Recorder<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> fmt::Debug for Recorder<T> {
    #[cfg_attr(test, mutants::skip)] // No API contract to test.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Recorder")
            .field("count", &self.log.borrow().len())
            .finish()
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;

    #[test]
    fn callbacks_share_one_log() {
        let recorder = Recorder::<&str>::new();
        let mut first = recorder.callback();
        let mut second = recorder.callback();

        first(&["a"]);
        second(&["b", "c"]);

        assert_eq!(recorder.snapshots(), vec![vec!["a"], vec!["b", "c"]]);
    }

    #[test]
    fn empty_log() {
        let recorder = Recorder::<u8>::new();

        assert_eq!(recorder.count(), 0);
        assert_eq!(recorder.last(), None);
    }
}
