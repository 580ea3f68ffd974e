use std::fmt;

use crate::{Lifecycle, Pool, Toggle};

/// A whole object that can produce copies of itself, optionally placed under a context object.
///
/// The placement context (for example a parent node in a scene) is passed through unmodified
/// from the pool to every call; the pool never inspects it.
pub trait Instantiate<P = ()>: Sized {
    /// What can go wrong when creating a copy.
    type Error;

    /// Creates a new, independent copy of `self`, attached under `placement` if one is given.
    ///
    /// # Errors
    ///
    /// Whatever the implementation reports. Pools pass it to their caller untouched.
    fn instantiate(&self, placement: Option<&P>) -> Result<Self, Self::Error>;
}

/// A [`Lifecycle`] for pooling whole objects that are instantiated from a prototype.
///
/// New instances are created by [`Instantiate::instantiate()`] on the prototype, under the
/// optional placement context. Activation calls [`Toggle::set_active()`] on the object itself.
pub struct ObjectLifecycle<R, P> {
    prototype: R,
    placement: Option<P>,
}

impl<R, P> ObjectLifecycle<R, P> {
    /// Creates a lifecycle that copies `prototype`, placing the copies under `placement`.
    #[must_use]
    pub fn new(prototype: R, placement: Option<P>) -> Self {
        Self {
            prototype,
            placement,
        }
    }

    /// The object every instance is copied from.
    #[must_use]
    pub fn prototype(&self) -> &R {
        &self.prototype
    }

    /// The context new instances are placed under, if any.
    #[must_use]
    pub fn placement(&self) -> Option<&P> {
        self.placement.as_ref()
    }
}

impl<R, P> Lifecycle for ObjectLifecycle<R, P>
where
    R: Instantiate<P> + Toggle,
{
    type Item = R;
    type Error = R::Error;

    fn construct(&mut self) -> Result<R, R::Error> {
        self.prototype.instantiate(self.placement.as_ref())
    }

    fn activate(&self, item: &mut R) {
        item.set_active(true);
    }

    fn deactivate(&self, item: &mut R) {
        item.set_active(false);
    }
}

impl<R: fmt::Debug, P: fmt::Debug> fmt::Debug for ObjectLifecycle<R, P> {
    #[cfg_attr(test, mutants::skip)] // No API contract to test.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ObjectLifecycle")
            .field("prototype", &self.prototype)
            .field("placement", &self.placement)
            .finish()
    }
}

/// A pool of whole objects copied from a prototype, optionally under a placement context.
pub type ObjectPool<R, P> = Pool<ObjectLifecycle<R, P>>;

impl<R, P> Pool<ObjectLifecycle<R, P>>
where
    R: Instantiate<P> + Toggle,
{
    /// Creates an object pool that copies `prototype` under `placement`, preloading
    /// `initial_size` deactivated copies.
    ///
    /// # Errors
    ///
    /// Returns the prototype's instantiation error if any preloaded copy cannot be created.
    ///
    /// # Example
    ///
    /// ```rust
    /// use std::convert::Infallible;
    ///
    /// use recycle_pool::{Instantiate, ObjectPool, Toggle};
    ///
    /// #[derive(Clone, Debug)]
    /// struct Enemy {
    ///     layer: Option<&'static str>,
    ///     visible: bool,
    /// }
    ///
    /// impl Instantiate<&'static str> for Enemy {
    ///     type Error = Infallible;
    ///
    ///     fn instantiate(&self, layer: Option<&&'static str>) -> Result<Self, Infallible> {
    ///         Ok(Self {
    ///             layer: layer.copied(),
    ///             ..self.clone()
    ///         })
    ///     }
    /// }
    ///
    /// impl Toggle for Enemy {
    ///     fn set_active(&mut self, active: bool) {
    ///         self.visible = active;
    ///     }
    /// }
    ///
    /// let prototype = Enemy { layer: None, visible: true };
    /// let mut pool: ObjectPool<Enemy, &str> =
    ///     ObjectPool::from_prototype(prototype, 2, Some("enemies")).unwrap();
    ///
    /// let key = pool.acquire();
    /// let enemy = pool.get(key).unwrap();
    /// assert!(enemy.visible);
    /// assert_eq!(enemy.layer, Some("enemies"));
    /// ```
    pub fn from_prototype(
        prototype: R,
        initial_size: usize,
        placement: Option<P>,
    ) -> Result<Self, R::Error> {
        Self::builder(ObjectLifecycle::new(prototype, placement))
            .initial_size(initial_size)
            .build()
    }

    /// The context new instances are placed under, if any.
    #[must_use]
    pub fn placement(&self) -> Option<&P> {
        self.lifecycle().placement()
    }
}
