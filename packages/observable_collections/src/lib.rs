#![cfg_attr(coverage_nightly, feature(coverage_attribute))]
#![cfg_attr(docsrs, feature(doc_cfg))]

//! Collections that tell subscribers about every change made to them.
//!
//! This package provides two observable collections:
//!
//! * [`ObservableArray`] - a fixed number of slots, each vacant or holding one value.
//! * [`ObservableList`] - a growable list.
//!
//! Both compose their storage with a [`Notifier`], an ordered list of subscriber callbacks.
//! After every structural mutation the collection hands its *entire* current contents to each
//! subscriber, synchronously and in subscription order, before the mutating call returns. There
//! is no batching and no diffing: N mutations produce N notifications.
//!
//! Subscribers keep only a [`SubscriptionToken`], which can later be used to detach them.
//!
//! # Example
//!
//! ```rust
//! use std::cell::RefCell;
//! use std::rc::Rc;
//!
//! use observable_collections::ObservableArray;
//!
//! let mut hotbar = ObservableArray::new(4);
//!
//! let redraws = Rc::new(RefCell::new(Vec::new()));
//! hotbar.subscribe({
//!     let redraws = Rc::clone(&redraws);
//!     move |slots: &[Option<char>]| redraws.borrow_mut().push(slots.to_vec())
//! });
//!
//! assert!(hotbar.try_add_at(0, 'x'));
//! assert!(hotbar.try_add_at(2, 'y'));
//! assert!(hotbar.try_remove_at(0));
//!
//! assert_eq!(redraws.borrow().len(), 3);
//! assert_eq!(redraws.borrow()[2], [None, None, Some('y'), None]);
//! assert_eq!(hotbar.count(), 1);
//! assert_eq!(hotbar.len(), 4);
//! ```
//!
//! # Single-threaded design
//!
//! Subscribers are arbitrary non-`Send` closures, so none of the collections can be moved across
//! threads. Wrap them in your own synchronization if you need to share state across threads.

mod array;
mod list;
mod notifier;
mod slots;

pub use array::*;
pub use list::*;
pub use notifier::*;
pub use slots::*;
