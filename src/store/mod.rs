//! Entity layer: validated writes and reads over the durable relations.
//!
//! Each submodule owns one entity family and exposes plain functions over
//! `&mut SqliteConnection`:
//! - [`customers`] — registration and lookup
//! - [`products`] — categories and catalog products
//! - [`orders`] — atomic order placement (order + line items + history)
//! - [`stock`] — the concurrency guard for stock decrements
//!
//! Writes that would break an invariant fail with a typed [`StoreError`]
//! rather than coercing values; callers are expected to match on the error
//! kind (insufficient stock is a normal business outcome, not a fault).

use diesel::result::Error as DieselError;

pub mod customers;
pub(crate) mod history;
pub mod orders;
pub mod products;
pub mod stock;

/// A structural invariant rejected by the entity layer.
#[derive(thiserror::Error, Debug)]
pub enum ConstraintViolation {
    /// A referenced row does not exist.
    #[error("{entity} {id} does not exist")]
    ForeignKeyMissing {
        /// Entity kind the missing id refers to ("customer", "category", ...).
        entity: &'static str,
        /// The id that failed to resolve.
        id: i32,
    },
    /// A unique column already holds this value.
    #[error("{field} {value:?} already exists")]
    UniqueViolation {
        /// Column that must be unique ("email", "category name").
        field: &'static str,
        /// The conflicting value.
        value: String,
    },
    /// A value falls outside its permitted range.
    #[error("{field}: {message}")]
    RangeViolation {
        /// Offending field.
        field: &'static str,
        /// What was wrong with it.
        message: String,
    },
}

/// Errors surfaced by the store.
#[derive(thiserror::Error, Debug)]
pub enum StoreError {
    /// An invalid write was rejected. See [`ConstraintViolation`].
    #[error(transparent)]
    Constraint(#[from] ConstraintViolation),
    /// Requested stock decrement exceeds what is available. A normal business
    /// outcome; callers should not treat it as a system fault.
    #[error("insufficient stock for product {product_id}: requested {requested}, available {available}")]
    InsufficientStock {
        /// Product whose stock was requested.
        product_id: i32,
        /// Units requested.
        requested: i32,
        /// Units actually available.
        available: i32,
    },
    /// Exclusive access could not be acquired within the bounded wait
    /// (SQLite busy_timeout). Retryable by the caller; never retried here.
    #[error("timed out waiting for exclusive access to the store")]
    LockTimeout,
    /// A lookup that requires existence found nothing.
    #[error("{entity} {id} not found")]
    NotFound {
        /// Entity kind ("customer", "product", ...).
        entity: &'static str,
        /// The id that was looked up.
        id: i32,
    },
    /// Any other database failure.
    #[error("database error: {0}")]
    Database(DieselError),
}

/// Result type used throughout the store for fallible operations.
pub type StoreResult<T> = Result<T, StoreError>;

impl From<DieselError> for StoreError {
    fn from(e: DieselError) -> Self {
        if is_locked(&e) {
            StoreError::LockTimeout
        } else {
            StoreError::Database(e)
        }
    }
}

/// True if the error is SQLite's "database is locked" contention signal,
/// raised once busy_timeout expires.
pub(crate) fn is_locked(e: &DieselError) -> bool {
    match e {
        DieselError::DatabaseError(_, info) => info.message().contains("database is locked"),
        _ => false,
    }
}

/// Non-positive or negative numeric field helper.
pub(crate) fn range_violation(field: &'static str, message: impl Into<String>) -> StoreError {
    StoreError::Constraint(ConstraintViolation::RangeViolation {
        field,
        message: message.into(),
    })
}
