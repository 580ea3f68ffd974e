use std::any::type_name;
use std::convert::Infallible;
use std::fmt;

/// The capabilities a [`Pool`][crate::Pool] needs to manage instances of some resource type.
///
/// A pool knows nothing about its items beyond this trait: how to make a new one when the idle
/// queue is empty, and how to switch an item between its visible ("active") and hidden
/// ("inactive") presentation when it is handed out or taken back.
///
/// The different pool flavors in this crate are just different implementations of this trait:
///
/// * [`FromFn`] - items produced by a closure, with no presentation state.
/// * [`ObjectLifecycle`][crate::ObjectLifecycle] - whole objects instantiated from a prototype,
///   optionally under a placement context.
/// * [`ComponentLifecycle`][crate::ComponentLifecycle] - parts of a larger object, whose
///   activation toggles the object that hosts them.
pub trait Lifecycle {
    /// The pooled resource.
    type Item;

    /// What can go wrong when constructing a new item.
    type Error;

    /// Creates one new item.
    ///
    /// # Errors
    ///
    /// Whatever the implementation reports. The pool passes it to its caller untouched.
    fn construct(&mut self) -> Result<Self::Item, Self::Error>;

    /// Switches an item to its active presentation. Called when the item is handed out.
    fn activate(&self, item: &mut Self::Item);

    /// Switches an item to its inactive presentation. Called when the item becomes idle.
    fn deactivate(&self, item: &mut Self::Item);
}

/// Something that can be shown/enabled or hidden/disabled.
///
/// This is the presentation toggle used by the object and component pool flavors.
pub trait Toggle {
    /// Enables (`true`) or disables (`false`) the object.
    fn set_active(&mut self, active: bool);
}

/// A [`Lifecycle`] that creates items by calling a closure and has no presentation state.
///
/// # Example
///
/// ```rust
/// use recycle_pool::{FromFn, Pool};
///
/// let mut next_id = 100;
/// let mut pool = Pool::new(FromFn::new(move || {
///     next_id += 1;
///     next_id
/// }));
///
/// let key = pool.acquire();
/// assert_eq!(pool.get(key), Some(&101));
/// ```
pub struct FromFn<F> {
    factory: F,
}

impl<F> FromFn<F> {
    /// Wraps a closure that produces one new item per call.
    #[must_use]
    pub fn new(factory: F) -> Self {
        Self { factory }
    }
}

impl<F, R> Lifecycle for FromFn<F>
where
    F: FnMut() -> R,
{
    type Item = R;
    type Error = Infallible;

    fn construct(&mut self) -> Result<R, Infallible> {
        Ok((self.factory)())
    }

    #[cfg_attr(test, mutants::skip)] // Intentionally does nothing.
    fn activate(&self, _item: &mut R) {}

    #[cfg_attr(test, mutants::skip)] // Intentionally does nothing.
    fn deactivate(&self, _item: &mut R) {}
}

impl<F> fmt::Debug for FromFn<F> {
    #[cfg_attr(test, mutants::skip)] // No API contract to test.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FromFn")
            .field("factory", &format_args!("{}", type_name::<F>()))
            .finish()
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;

    #[test]
    fn from_fn_calls_closure_per_construct() {
        let mut calls = 0;
        let mut lifecycle = FromFn::new(|| {
            calls += 1;
            calls
        });

        assert_eq!(lifecycle.construct(), Ok(1));
        assert_eq!(lifecycle.construct(), Ok(2));
    }

    #[test]
    fn from_fn_leaves_items_alone() {
        let lifecycle = FromFn::new(|| String::from("same"));
        let mut item = String::from("same");

        lifecycle.activate(&mut item);
        lifecycle.deactivate(&mut item);

        assert_eq!(item, "same");
    }
}
