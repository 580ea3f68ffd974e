#![cfg_attr(coverage_nightly, feature(coverage_attribute))]
#![cfg_attr(docsrs, feature(doc_cfg))]

//! A lazily growing pool of reusable instances, recycled in first-in-first-out order.
//!
//! This crate provides [`Pool`], which owns every instance it has ever created and hands them
//! out again once consumers are done with them. An instance is either *active* (in use) or
//! *idle* (waiting in the idle queue). Acquiring takes the longest-idle instance and only
//! constructs a new one when nothing is idle; releasing puts the instance at the back of the
//! queue. Pools never destroy instances, so their size only grows.
//!
//! What a pool pools is defined by a [`Lifecycle`]: how to construct a new instance, and how to
//! switch an instance between its active and inactive presentation. Three are provided:
//!
//! * [`FromFn`] - plain values produced by a closure ([`Pool::from_fn()`]).
//! * [`ObjectLifecycle`] - whole objects copied from a prototype, optionally under a placement
//!   context ([`ObjectPool`]).
//! * [`ComponentLifecycle`] - parts of a larger object whose activation toggles the object that
//!   hosts them ([`ComponentPool`]).
//!
//! # Keys and handles
//!
//! Instances are referred to by [`InstanceKey`]. A key records which pool issued it and which
//! checkout of the instance it belongs to, so returning an instance to the wrong pool, returning
//! it twice, or using a key after the instance has been handed out again, is reported as a
//! [`PoolError`] (or `None` from the accessors) and leaves the pool untouched.
//!
//! For instances that should return themselves later, wrap the pool in a [`LocalPool`] and
//! acquire a [`PooledHandle`]. A handle can return its instance immediately or schedule the
//! return on a [`Scheduler`] such as [`FrameScheduler`], a virtual clock that the host advances
//! once per frame.
//!
//! # Example
//!
//! ```rust
//! use std::time::Duration;
//!
//! use recycle_pool::{FrameScheduler, LocalPool, Pool};
//!
//! let mut next = 100;
//! let pool = LocalPool::from(Pool::from_fn(2, move || {
//!     let value = next;
//!     next += 1;
//!     value
//! }));
//!
//! let a = pool.acquire();
//! let b = pool.acquire();
//! let c = pool.acquire();
//!
//! assert_eq!(pool.with(c, |value| *value), Some(102));
//! assert_eq!(pool.len(), 3);
//!
//! // Instances returned with a delay stay checked out until the clock catches up.
//! let scheduler = FrameScheduler::new();
//! let handle = pool.acquire_handle();
//! handle.return_to_pool_after(Duration::from_millis(100), &scheduler);
//!
//! pool.release(b).unwrap();
//! assert_eq!(pool.acquire().index(), b.index());
//!
//! scheduler.advance(Duration::from_millis(100));
//! assert!(handle.is_returned());
//! # pool.release(a).unwrap();
//! ```
//!
//! # Logging
//!
//! Pools emit [`tracing`] events: `debug` when a pool is created or grows, `trace` for every
//! acquire and release, and `warn` when a scheduled return cannot be carried out.
//!
//! # Thread safety
//!
//! [`Pool`] does no internal locking and is [`Send`] when its lifecycle and items are.
//! [`LocalPool`], [`PooledHandle`] and [`FrameScheduler`] are single-threaded.

mod builder;
mod component_pool;
mod drop_policy;
mod error;
mod handle;
mod key;
mod lifecycle;
mod local_pool;
mod object_pool;
mod pool;
mod scheduler;

pub use builder::*;
pub use component_pool::*;
pub use drop_policy::*;
pub use error::*;
pub use handle::*;
pub use key::*;
pub use lifecycle::*;
pub use local_pool::*;
pub use object_pool::*;
pub use pool::*;
pub use scheduler::*;
