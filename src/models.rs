//! Diesel models mapping to the database schema.
//!
//! These types mirror the tables defined in the embedded migrations and in
//! [`crate::schema`] for use with Diesel's Queryable/Insertable APIs:
//! - [`crate::schema::customers`] — registered customers
//! - [`crate::schema::categories`] / [`crate::schema::products`] — the catalog
//! - [`crate::schema::orders`] / [`crate::schema::order_items`] — immutable purchase records
//! - [`crate::schema::sale_history`] — append-only denormalized projection of line items
//!
//! Monetary amounts are integer cents (see [`crate::money`]); timestamps are
//! RFC3339 UTC strings (see [`crate::tz`]), so lexicographic comparison in SQL
//! matches chronological order.

use diesel::prelude::*;

use crate::schema::*;

/// A row in [`crate::schema::customers`]: one registered customer.
#[derive(Debug, Clone, Queryable, Identifiable, Selectable)]
#[diesel(table_name = customers, check_for_backend(diesel::sqlite::Sqlite))]
pub struct Customer {
    /// Database primary key.
    pub id: i32,
    /// Given name.
    pub first_name: String,
    /// Family name.
    pub last_name: String,
    /// Login email; unique across customers.
    pub email: String,
    /// Opaque hashed credential. Hashing happens outside this crate.
    pub password_hash: String,
}

/// Insertable form of [`Customer`].
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = customers)]
pub struct NewCustomer<'a> {
    /// Given name.
    pub first_name: &'a str,
    /// Family name.
    pub last_name: &'a str,
    /// Login email; must be unique.
    pub email: &'a str,
    /// Opaque hashed credential.
    pub password_hash: &'a str,
}

/// A row in [`crate::schema::categories`]: one catalog category.
#[derive(Debug, Clone, Queryable, Identifiable, Selectable)]
#[diesel(table_name = categories, check_for_backend(diesel::sqlite::Sqlite))]
pub struct Category {
    /// Database primary key.
    pub id: i32,
    /// Display name; unique across categories.
    pub name: String,
}

/// Insertable form of [`Category`].
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = categories)]
pub struct NewCategory<'a> {
    /// Display name; must be unique.
    pub name: &'a str,
}

/// A row in [`crate::schema::products`]: one sellable product.
#[derive(Debug, Clone, Queryable, Identifiable, Associations, Selectable)]
#[diesel(table_name = products, check_for_backend(diesel::sqlite::Sqlite))]
#[diesel(belongs_to(Category))]
pub struct Product {
    /// Database primary key.
    pub id: i32,
    /// FK to [`Category::id`].
    pub category_id: i32,
    /// Display name.
    pub name: String,
    /// Optional free-form description.
    pub description: Option<String>,
    /// Current list price in cents; never negative.
    pub price_cents: i64,
    /// Units on hand; never negative. Mutated only by the stock guard and
    /// catalog restocks.
    pub stock_quantity: i32,
}

/// Insertable form of [`Product`].
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = products)]
pub struct NewProduct<'a> {
    /// FK to [`Category::id`].
    pub category_id: i32,
    /// Display name.
    pub name: &'a str,
    /// Optional free-form description.
    pub description: Option<&'a str>,
    /// List price in cents.
    pub price_cents: i64,
    /// Initial units on hand.
    pub stock_quantity: i32,
}

/// A row in [`crate::schema::orders`]: one placed order.
///
/// Immutable after creation. `total_cents` always equals the sum of
/// `quantity * unit_price_cents` over the order's line items; the creation
/// path in [`crate::store::orders`] maintains this transactionally.
#[derive(Debug, Clone, Queryable, Identifiable, Associations, Selectable)]
#[diesel(table_name = orders, check_for_backend(diesel::sqlite::Sqlite))]
#[diesel(belongs_to(Customer))]
pub struct Order {
    /// Database primary key.
    pub id: i32,
    /// FK to [`Customer::id`].
    pub customer_id: i32,
    /// Placement timestamp, RFC3339 UTC.
    pub order_date: String,
    /// Order total in cents.
    pub total_cents: i64,
}

/// Insertable form of [`Order`].
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = orders)]
pub struct NewOrder<'a> {
    /// FK to [`Customer::id`].
    pub customer_id: i32,
    /// Placement timestamp, RFC3339 UTC.
    pub order_date: &'a str,
    /// Order total in cents.
    pub total_cents: i64,
}

/// A row in [`crate::schema::order_items`]: one line of an order.
///
/// `unit_price_cents` is a snapshot of the product price at order time and is
/// never rewritten when the catalog price changes later.
#[derive(Debug, Clone, Queryable, Identifiable, Associations, Selectable)]
#[diesel(table_name = order_items, check_for_backend(diesel::sqlite::Sqlite))]
#[diesel(belongs_to(Order))]
#[diesel(belongs_to(Product))]
pub struct OrderItem {
    /// Database primary key.
    pub id: i32,
    /// FK to [`Order::id`].
    pub order_id: i32,
    /// FK to [`Product::id`].
    pub product_id: i32,
    /// Units purchased; always positive.
    pub quantity: i32,
    /// Price per unit in cents at order time.
    pub unit_price_cents: i64,
}

/// Insertable form of [`OrderItem`].
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = order_items)]
pub struct NewOrderItem {
    /// FK to [`Order::id`].
    pub order_id: i32,
    /// FK to [`Product::id`].
    pub product_id: i32,
    /// Units purchased.
    pub quantity: i32,
    /// Price per unit in cents at order time.
    pub unit_price_cents: i64,
}

/// A row in [`crate::schema::sale_history`]: denormalized copy of one line item.
///
/// Appended in the same transaction as the line item it mirrors, never updated
/// or deleted. Carries the parent order's customer, total, and date so
/// analytics can read purchase history without joining three tables.
#[derive(Debug, Clone, Queryable, Identifiable, Selectable)]
#[diesel(table_name = sale_history, check_for_backend(diesel::sqlite::Sqlite))]
pub struct SaleHistoryRecord {
    /// Database primary key.
    pub id: i32,
    /// Customer who placed the parent order.
    pub customer_id: i32,
    /// Product sold.
    pub product_id: i32,
    /// Total of the parent order in cents.
    pub total_cents: i64,
    /// Units sold on this line.
    pub quantity: i32,
    /// Parent order's placement timestamp, RFC3339 UTC.
    pub order_date: String,
}

/// Insertable form of [`SaleHistoryRecord`].
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = sale_history)]
pub struct NewSaleHistoryRecord<'a> {
    /// Customer who placed the parent order.
    pub customer_id: i32,
    /// Product sold.
    pub product_id: i32,
    /// Total of the parent order in cents.
    pub total_cents: i64,
    /// Units sold on this line.
    pub quantity: i32,
    /// Parent order's placement timestamp, RFC3339 UTC.
    pub order_date: &'a str,
}
