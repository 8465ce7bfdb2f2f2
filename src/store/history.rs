//! Sale-history projector.
//!
//! The source of truth is `orders` + `order_items`; `sale_history` is a
//! derived, append-only projection written in the same transaction as each
//! line item (the write path's explicit version of a database trigger). It is
//! never updated or deleted, and it has no read API of its own: reporting
//! reads the table directly.

use diesel::prelude::*;

use crate::models::NewSaleHistoryRecord;
use crate::schema::sale_history;
use crate::store::StoreResult;

/// Append one denormalized record for a freshly inserted line item.
///
/// Must be called inside the order-placement transaction so a projection
/// failure rolls the whole line item back.
pub(crate) fn append(
    conn: &mut SqliteConnection,
    record: &NewSaleHistoryRecord<'_>,
) -> StoreResult<()> {
    diesel::insert_into(sale_history::table)
        .values(record)
        .execute(conn)?;
    Ok(())
}
