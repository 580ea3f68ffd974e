use std::convert::Infallible;
use std::fmt;

use crate::{Lifecycle, Pool, Toggle};

/// A part of a larger object that can be pooled on its own.
///
/// Pooling components rather than whole objects lets a frequently recycled part (a collider,
/// an emitter, a sound source) be reused independently of whatever structure it belongs to.
/// The component is cloned to create new instances, and activating it toggles its host.
///
/// Cloning must produce a component with its own, independent host.
pub trait Component: Clone {
    /// The object whose presentation state follows the component's pooling state.
    type Host: Toggle;

    /// The object hosting this component.
    fn host_mut(&mut self) -> &mut Self::Host;
}

/// A [`Lifecycle`] for pooling components cloned from a prototype.
pub struct ComponentLifecycle<C> {
    prototype: C,
}

impl<C> ComponentLifecycle<C> {
    /// Creates a lifecycle that clones `prototype` to create new instances.
    #[must_use]
    pub fn new(prototype: C) -> Self {
        Self { prototype }
    }

    /// The component every instance is cloned from.
    #[must_use]
    pub fn prototype(&self) -> &C {
        &self.prototype
    }
}

impl<C: Component> Lifecycle for ComponentLifecycle<C> {
    type Item = C;
    type Error = Infallible;

    fn construct(&mut self) -> Result<C, Infallible> {
        Ok(self.prototype.clone())
    }

    fn activate(&self, item: &mut C) {
        item.host_mut().set_active(true);
    }

    fn deactivate(&self, item: &mut C) {
        item.host_mut().set_active(false);
    }
}

impl<C: fmt::Debug> fmt::Debug for ComponentLifecycle<C> {
    #[cfg_attr(test, mutants::skip)] // No API contract to test.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ComponentLifecycle")
            .field("prototype", &self.prototype)
            .finish()
    }
}

/// A pool of components cloned from a prototype.
pub type ComponentPool<C> = Pool<ComponentLifecycle<C>>;

impl<C: Component> Pool<ComponentLifecycle<C>> {
    /// Creates a component pool that clones `prototype`, preloading `initial_size`
    /// deactivated clones.
    ///
    /// # Example
    ///
    /// ```rust
    /// use recycle_pool::{Component, ComponentPool, Toggle};
    ///
    /// #[derive(Clone, Debug, Default)]
    /// struct Body {
    ///     enabled: bool,
    /// }
    ///
    /// impl Toggle for Body {
    ///     fn set_active(&mut self, active: bool) {
    ///         self.enabled = active;
    ///     }
    /// }
    ///
    /// #[derive(Clone, Debug, Default)]
    /// struct Collider {
    ///     radius: f32,
    ///     body: Body,
    /// }
    ///
    /// impl Component for Collider {
    ///     type Host = Body;
    ///
    ///     fn host_mut(&mut self) -> &mut Body {
    ///         &mut self.body
    ///     }
    /// }
    ///
    /// let mut pool = ComponentPool::from_prototype(Collider { radius: 0.5, ..Default::default() }, 4);
    ///
    /// let key = pool.acquire();
    /// assert!(pool.get(key).unwrap().body.enabled);
    /// ```
    #[must_use]
    pub fn from_prototype(prototype: C, initial_size: usize) -> Self {
        let Ok(pool) = Self::builder(ComponentLifecycle::new(prototype))
            .initial_size(initial_size)
            .build();
        pool
    }
}
