//! Concurrency guard for stock decrements.
//!
//! The exposed contract is a single atomic check-and-decrement, never a
//! separate read-then-write pair: the decrement is one conditional UPDATE, so
//! there is no time-of-check-to-time-of-use gap for concurrent callers to
//! race through, and `stock_quantity` can never go negative.
//!
//! Serialization is per row at the store level. If the database lock cannot
//! be acquired within the connection's busy_timeout, the call fails with
//! [`StoreError::LockTimeout`]; retrying is left to the caller so persistent
//! contention stays visible.

use diesel::prelude::*;
use tracing::debug;

use crate::schema::products;
use crate::store::{StoreError, StoreResult, range_violation};

/// Atomically check `stock_quantity >= quantity` and decrement.
///
/// Returns the remaining stock on success. Fails with:
/// - `InsufficientStock` when the product exists but holds fewer units
/// - `NotFound` when the product id does not resolve
/// - `RangeViolation` when `quantity` is not positive
/// - `LockTimeout` when the bounded lock wait expires
///
/// The `available` count in `InsufficientStock` is advisory: it comes from a
/// follow-up read, so outside an enclosing transaction another writer may
/// have moved the stock by the time the caller sees it. The decrement itself
/// is atomic either way.
pub fn reserve(conn: &mut SqliteConnection, product_id: i32, quantity: i32) -> StoreResult<i32> {
    if quantity <= 0 {
        return Err(range_violation(
            "quantity",
            format!("must be > 0, got {quantity}"),
        ));
    }

    // Compare-and-swap: the WHERE clause carries the stock check, so the
    // update either applies fully or touches nothing.
    let remaining: Option<i32> = diesel::update(
        products::table.filter(
            products::id
                .eq(product_id)
                .and(products::stock_quantity.ge(quantity)),
        ),
    )
    .set(products::stock_quantity.eq(products::stock_quantity - quantity))
    .returning(products::stock_quantity)
    .get_result(conn)
    .optional()?;

    match remaining {
        Some(left) => {
            debug!(product_id, quantity, left, "stock reserved");
            Ok(left)
        }
        None => {
            // Zero rows: either the product is gone or the stock check failed.
            // This read is for the diagnostic only; without an enclosing
            // transaction the count can already be stale.
            let available: Option<i32> = products::table
                .find(product_id)
                .select(products::stock_quantity)
                .first(conn)
                .optional()?;
            match available {
                None => Err(StoreError::NotFound {
                    entity: "product",
                    id: product_id,
                }),
                Some(available) => Err(StoreError::InsufficientStock {
                    product_id,
                    requested: quantity,
                    available,
                }),
            }
        }
    }
}
