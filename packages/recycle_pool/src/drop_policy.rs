/// Determines what happens when a pool is dropped while some of its instances are checked out.
///
/// By default, the pool simply drops every instance it owns, active or idle.
///
/// # Examples
///
/// ```
/// use recycle_pool::{DropPolicy, FromFn, Pool};
///
/// // The drop policy is set at pool creation time.
/// let _pool = Pool::builder(FromFn::new(|| 0_u32))
///     .drop_policy(DropPolicy::MustNotDropActive)
///     .build();
/// ```
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
#[non_exhaustive]
pub enum DropPolicy {
    /// The pool drops all of its instances when it is dropped. This is the default.
    #[default]
    MayDropActive,

    /// The pool panics if any instance is still active when the pool is dropped.
    ///
    /// This turns a forgotten release into a loud failure, which is useful when every
    /// checked-out instance is expected to come back before the pool goes away.
    MustNotDropActive,
}
