//! Atomic order placement.
//!
//! An order, its line items, and their sale-history projections are created
//! as one all-or-nothing unit inside a single immediate transaction (BEGIN
//! IMMEDIATE takes the write lock up front, so the stock checks and inserts
//! cannot interleave with another writer). A failure at any step, including
//! an insufficient-stock line, rolls back everything.
//!
//! Orders are immutable after creation: there is no update or cancel path.

use chrono::{DateTime, Utc};
use diesel::prelude::*;
use tracing::info;

use crate::models::{NewOrder, NewOrderItem, NewSaleHistoryRecord, Order, OrderItem};
use crate::schema::{order_items, orders, products};
use crate::store::{
    ConstraintViolation, StoreError, StoreResult, customers, history, range_violation, stock,
};
use crate::tz;

/// One requested line of an order: which product and how many units.
#[derive(Debug, Clone, Copy)]
pub struct OrderLine {
    /// Product to purchase.
    pub product_id: i32,
    /// Units to purchase; must be positive.
    pub quantity: i32,
}

/// Place an order for `customer_id` dated `order_date`.
///
/// For each line the current product price is snapshotted into the line item
/// and stock is decremented through the guard; the order total is the sum of
/// the snapshots, maintained here so `total_cents == Σ quantity ×
/// unit_price_cents` holds for every order ever written.
///
/// Errors: `RangeViolation` for an empty order or non-positive quantity,
/// `ForeignKeyMissing` for an unknown customer or product,
/// `InsufficientStock` when any line exceeds available stock (the whole order
/// rolls back), `LockTimeout` under contention.
pub fn place(
    conn: &mut SqliteConnection,
    customer_id: i32,
    order_date: DateTime<Utc>,
    lines: &[OrderLine],
) -> StoreResult<Order> {
    if lines.is_empty() {
        return Err(range_violation("lines", "order must have at least one line"));
    }
    for line in lines {
        if line.quantity <= 0 {
            return Err(range_violation(
                "quantity",
                format!(
                    "must be > 0, got {} for product {}",
                    line.quantity, line.product_id
                ),
            ));
        }
    }

    let date_str = tz::to_rfc3339_millis(order_date);

    let order = conn.immediate_transaction::<Order, StoreError, _>(|conn| {
        if !customers::exists(conn, customer_id)? {
            return Err(StoreError::Constraint(
                ConstraintViolation::ForeignKeyMissing {
                    entity: "customer",
                    id: customer_id,
                },
            ));
        }

        // Snapshot prices, then reserve stock line by line. Reservation
        // failures abort the transaction, undoing earlier decrements.
        let mut priced = Vec::with_capacity(lines.len());
        for line in lines {
            let unit_price: Option<i64> = products::table
                .find(line.product_id)
                .select(products::price_cents)
                .first(conn)
                .optional()?;
            let unit_price = unit_price.ok_or(StoreError::Constraint(
                ConstraintViolation::ForeignKeyMissing {
                    entity: "product",
                    id: line.product_id,
                },
            ))?;
            stock::reserve(conn, line.product_id, line.quantity)?;
            priced.push((line, unit_price));
        }

        let total_cents: i64 = priced
            .iter()
            .map(|(line, unit_price)| i64::from(line.quantity) * unit_price)
            .sum();

        let order: Order = diesel::insert_into(orders::table)
            .values(&NewOrder {
                customer_id,
                order_date: &date_str,
                total_cents,
            })
            .returning(Order::as_returning())
            .get_result(conn)?;

        for (line, unit_price) in &priced {
            diesel::insert_into(order_items::table)
                .values(&NewOrderItem {
                    order_id: order.id,
                    product_id: line.product_id,
                    quantity: line.quantity,
                    unit_price_cents: *unit_price,
                })
                .execute(conn)?;

            history::append(
                conn,
                &NewSaleHistoryRecord {
                    customer_id,
                    product_id: line.product_id,
                    total_cents,
                    quantity: line.quantity,
                    order_date: &date_str,
                },
            )?;
        }

        Ok(order)
    })?;

    info!(
        order_id = order.id,
        customer_id,
        total_cents = order.total_cents,
        lines = lines.len(),
        "order placed"
    );
    Ok(order)
}

/// Look up an order by id, failing with `NotFound` if absent.
pub fn get(conn: &mut SqliteConnection, order_id: i32) -> StoreResult<Order> {
    orders::table
        .find(order_id)
        .select(Order::as_select())
        .first(conn)
        .optional()?
        .ok_or(StoreError::NotFound {
            entity: "order",
            id: order_id,
        })
}

/// The line items of an order, in insertion order.
pub fn items(conn: &mut SqliteConnection, order_id: i32) -> StoreResult<Vec<OrderItem>> {
    let rows = order_items::table
        .filter(order_items::order_id.eq(order_id))
        .order(order_items::id.asc())
        .select(OrderItem::as_select())
        .load(conn)?;
    Ok(rows)
}
