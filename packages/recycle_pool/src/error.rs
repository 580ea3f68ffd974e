use thiserror::Error;

use crate::InstanceKey;

/// Errors that can occur when returning instances to a pool.
///
/// All of these indicate that the caller broke the pool's usage contract. The pool is left
/// unchanged whenever one of them is returned.
#[derive(Clone, Copy, Debug, Eq, Error, PartialEq)]
#[non_exhaustive]
pub enum PoolError {
    /// The key was not handed out by this pool.
    #[error("{key} does not belong to this pool")]
    NotOwned {
        /// The key that was presented to the pool.
        key: InstanceKey,
    },

    /// The checkout the key belongs to has already ended: the instance is idle, or it has been
    /// handed out again under a newer key.
    #[error("{key} was already returned to its pool")]
    DoubleReturn {
        /// The key of the instance that was returned twice.
        key: InstanceKey,
    },

    /// The pool the instance belongs to no longer exists.
    #[error("the pool owning the instance has been dropped")]
    PoolDropped,
}

/// A specialized `Result` type for pool operations, returning the crate's
/// [`PoolError`] type as the error value.
pub(crate) type Result<T> = std::result::Result<T, PoolError>;
