//! Reporting query engine.
//!
//! Parameterized, read-only aggregations over the store. Two standing rules,
//! both inherited from benchmarking the underlying schema:
//!
//! - Every time range is half-open `[start, end)`, so adjacent windows
//!   compose without double-counting a boundary order.
//! - Aggregations over the high-fan-out `order_items` table group **before**
//!   joining a dimension table. Joining first multiplies rows per match and
//!   silently inflates sums; the pre-aggregation lives in a subquery and the
//!   dimension join sees one row per product.
//!
//! The grouped queries are written as raw SQL with typed
//! [`QueryableByName`] rows; the simple filters use the Diesel DSL.

use chrono::{DateTime, Utc};
use diesel::prelude::*;
use diesel::sql_query;
use diesel::sql_types::{BigInt, Integer, Nullable, Text};

use crate::models::Product;
use crate::schema::{orders, products};
use crate::store::{StoreError, StoreResult, customers};
use crate::tz;

/// Per-product revenue over a range.
#[derive(Debug, Clone, PartialEq, Eq, QueryableByName)]
pub struct ProductRevenue {
    /// Product id.
    #[diesel(sql_type = Integer)]
    pub product_id: i32,
    /// Product name.
    #[diesel(sql_type = Text)]
    pub name: String,
    /// Σ(quantity × unit_price_cents) over the range.
    #[diesel(sql_type = BigInt)]
    pub revenue_cents: i64,
}

/// Per-product units sold over a range.
#[derive(Debug, Clone, PartialEq, Eq, QueryableByName)]
pub struct ProductQuantity {
    /// Product id.
    #[diesel(sql_type = Integer)]
    pub product_id: i32,
    /// Product name.
    #[diesel(sql_type = Text)]
    pub name: String,
    /// Σ(quantity) over the range.
    #[diesel(sql_type = BigInt)]
    pub total_quantity: i64,
}

/// Per-customer spend over a range.
#[derive(Debug, Clone, PartialEq, Eq, QueryableByName)]
pub struct CustomerSpend {
    /// Customer id.
    #[diesel(sql_type = Integer)]
    pub customer_id: i32,
    /// Given name.
    #[diesel(sql_type = Text)]
    pub first_name: String,
    /// Family name.
    #[diesel(sql_type = Text)]
    pub last_name: String,
    /// Login email.
    #[diesel(sql_type = Text)]
    pub email: String,
    /// Σ(order total_cents) over the range.
    #[diesel(sql_type = BigInt)]
    pub total_cents: i64,
}

/// A product matched by [`search_products`], with its category name.
#[derive(Debug, Clone, PartialEq, Eq, QueryableByName)]
pub struct ProductHit {
    /// Product id.
    #[diesel(sql_type = Integer)]
    pub product_id: i32,
    /// Product name.
    #[diesel(sql_type = Text)]
    pub name: String,
    /// Optional description.
    #[diesel(sql_type = Nullable<Text>)]
    pub description: Option<String>,
    /// Current list price in cents.
    #[diesel(sql_type = BigInt)]
    pub price_cents: i64,
    /// Units on hand.
    #[diesel(sql_type = Integer)]
    pub stock_quantity: i32,
    /// Name of the product's category.
    #[diesel(sql_type = Text)]
    pub category_name: String,
}

/// Per-category revenue over a range; zero-sale categories included at 0.
#[derive(Debug, Clone, PartialEq, Eq, QueryableByName)]
pub struct CategoryRevenue {
    /// Category id.
    #[diesel(sql_type = Integer)]
    pub category_id: i32,
    /// Category name.
    #[diesel(sql_type = Text)]
    pub name: String,
    /// Σ(quantity × unit_price_cents) over line items in the range.
    #[diesel(sql_type = BigInt)]
    pub revenue_cents: i64,
}

/// A recommended product for a customer.
#[derive(Debug, Clone, PartialEq, Eq, QueryableByName)]
pub struct Recommendation {
    /// Product id.
    #[diesel(sql_type = Integer)]
    pub product_id: i32,
    /// Product name.
    #[diesel(sql_type = Text)]
    pub name: String,
    /// All-time units sold across all customers.
    #[diesel(sql_type = BigInt)]
    pub total_quantity_sold: i64,
}

/// Total order revenue in cents over `[start, end)`.
///
/// An empty range is 0, not an error.
pub fn revenue_in_range(
    conn: &mut SqliteConnection,
    start: DateTime<Utc>,
    end: DateTime<Utc>,
) -> StoreResult<i64> {
    let (start, end) = range_strings(start, end);
    let total: Option<i64> = orders::table
        .filter(orders::order_date.ge(start).and(orders::order_date.lt(end)))
        .select(diesel::dsl::sql::<Nullable<BigInt>>("SUM(total_cents)"))
        .first(conn)?;
    Ok(total.unwrap_or(0))
}

/// Top `limit` products by revenue over `[start, end)`, descending, ties
/// broken by smallest product id.
pub fn top_products_by_revenue(
    conn: &mut SqliteConnection,
    start: DateTime<Utc>,
    end: DateTime<Utc>,
    limit: i64,
) -> StoreResult<Vec<ProductRevenue>> {
    let (start, end) = range_strings(start, end);
    let rows = sql_query(
        "SELECT p.id AS product_id, p.name AS name, \
                SUM(oi.quantity * oi.unit_price_cents) AS revenue_cents \
         FROM order_items oi \
         JOIN orders o ON o.id = oi.order_id \
         JOIN products p ON p.id = oi.product_id \
         WHERE o.order_date >= ? AND o.order_date < ? \
         GROUP BY p.id, p.name \
         ORDER BY revenue_cents DESC, p.id ASC \
         LIMIT ?",
    )
    .bind::<Text, _>(start)
    .bind::<Text, _>(end)
    .bind::<BigInt, _>(limit)
    .load(conn)?;
    Ok(rows)
}

/// Top `limit` products by units sold over `[start, end)`, descending, ties
/// broken by smallest product id.
///
/// Kept distinct from [`top_products_by_revenue`]: a cheap high-volume
/// product and an expensive low-volume product rank differently under the
/// two metrics.
pub fn top_products_by_quantity(
    conn: &mut SqliteConnection,
    start: DateTime<Utc>,
    end: DateTime<Utc>,
    limit: i64,
) -> StoreResult<Vec<ProductQuantity>> {
    let (start, end) = range_strings(start, end);
    let rows = sql_query(
        "SELECT p.id AS product_id, p.name AS name, \
                SUM(oi.quantity) AS total_quantity \
         FROM order_items oi \
         JOIN orders o ON o.id = oi.order_id \
         JOIN products p ON p.id = oi.product_id \
         WHERE o.order_date >= ? AND o.order_date < ? \
         GROUP BY p.id, p.name \
         ORDER BY total_quantity DESC, p.id ASC \
         LIMIT ?",
    )
    .bind::<Text, _>(start)
    .bind::<Text, _>(end)
    .bind::<BigInt, _>(limit)
    .load(conn)?;
    Ok(rows)
}

/// Customers whose spend over `[start, end)` strictly exceeds
/// `threshold_cents`, descending by spend, ties broken by customer id.
pub fn big_spenders(
    conn: &mut SqliteConnection,
    start: DateTime<Utc>,
    end: DateTime<Utc>,
    threshold_cents: i64,
) -> StoreResult<Vec<CustomerSpend>> {
    let (start, end) = range_strings(start, end);
    let rows = sql_query(
        "SELECT c.id AS customer_id, c.first_name AS first_name, \
                c.last_name AS last_name, c.email AS email, \
                SUM(o.total_cents) AS total_cents \
         FROM orders o \
         JOIN customers c ON c.id = o.customer_id \
         WHERE o.order_date >= ? AND o.order_date < ? \
         GROUP BY c.id, c.first_name, c.last_name, c.email \
         HAVING SUM(o.total_cents) > ? \
         ORDER BY total_cents DESC, c.id ASC",
    )
    .bind::<Text, _>(start)
    .bind::<Text, _>(end)
    .bind::<BigInt, _>(threshold_cents)
    .load(conn)?;
    Ok(rows)
}

/// Products whose name or description contains `term`, case-insensitively,
/// with their category names. Ordered by product name then id; paging is the
/// caller's concern.
///
/// Case folding uses SQLite's `lower()`, which only folds ASCII: "Café"
/// matches "café" on the 'c'/'a'/'f' but not on the accented letter.
pub fn search_products(conn: &mut SqliteConnection, term: &str) -> StoreResult<Vec<ProductHit>> {
    let rows = sql_query(
        "SELECT p.id AS product_id, p.name AS name, p.description AS description, \
                p.price_cents AS price_cents, p.stock_quantity AS stock_quantity, \
                c.name AS category_name \
         FROM products p \
         JOIN categories c ON c.id = p.category_id \
         WHERE instr(lower(p.name), lower(?)) > 0 \
            OR instr(lower(coalesce(p.description, '')), lower(?)) > 0 \
         ORDER BY p.name ASC, p.id ASC",
    )
    .bind::<Text, _>(term)
    .bind::<Text, _>(term)
    .load(conn)?;
    Ok(rows)
}

/// Products with `stock_quantity < max_quantity`, ordered by stock ascending
/// then name ascending.
pub fn low_stock(conn: &mut SqliteConnection, max_quantity: i32) -> StoreResult<Vec<Product>> {
    let rows = products::table
        .filter(products::stock_quantity.lt(max_quantity))
        .order((products::stock_quantity.asc(), products::name.asc()))
        .select(Product::as_select())
        .load(conn)?;
    Ok(rows)
}

/// Revenue per category over `[start, end)`, including categories with no
/// sales at 0. Ordered by revenue descending, category id ascending.
///
/// The inner subquery aggregates per product first; the category join then
/// sees at most one row per product, so a category joining many sold products
/// cannot fan out and double-count line items.
pub fn category_revenue(
    conn: &mut SqliteConnection,
    start: DateTime<Utc>,
    end: DateTime<Utc>,
) -> StoreResult<Vec<CategoryRevenue>> {
    let (start, end) = range_strings(start, end);
    let rows = sql_query(
        "SELECT c.id AS category_id, c.name AS name, \
                COALESCE(SUM(pa.revenue_cents), 0) AS revenue_cents \
         FROM categories c \
         LEFT JOIN ( \
             SELECT p.category_id AS category_id, \
                    SUM(oi.quantity * oi.unit_price_cents) AS revenue_cents \
             FROM order_items oi \
             JOIN orders o ON o.id = oi.order_id \
             JOIN products p ON p.id = oi.product_id \
             WHERE o.order_date >= ? AND o.order_date < ? \
             GROUP BY p.id \
         ) pa ON pa.category_id = c.id \
         GROUP BY c.id, c.name \
         ORDER BY revenue_cents DESC, c.id ASC",
    )
    .bind::<Text, _>(start)
    .bind::<Text, _>(end)
    .load(conn)?;
    Ok(rows)
}

/// Up to `limit` products sharing a category with anything `customer_id` has
/// ever purchased, excluding products already purchased, ranked by all-time
/// units sold (descending), ties broken by product id.
///
/// Reads the sale_history projection rather than re-joining orders and line
/// items. A known customer with no purchase history gets an empty vec; an
/// unknown customer is `NotFound`.
pub fn recommendations_for(
    conn: &mut SqliteConnection,
    customer_id: i32,
    limit: i64,
) -> StoreResult<Vec<Recommendation>> {
    if !customers::exists(conn, customer_id)? {
        return Err(StoreError::NotFound {
            entity: "customer",
            id: customer_id,
        });
    }

    let rows = sql_query(
        "SELECT p.id AS product_id, p.name AS name, \
                COALESCE(sold.total_quantity, 0) AS total_quantity_sold \
         FROM products p \
         JOIN ( \
             SELECT DISTINCT pr.category_id AS category_id \
             FROM sale_history sh \
             JOIN products pr ON pr.id = sh.product_id \
             WHERE sh.customer_id = ? \
         ) owned ON owned.category_id = p.category_id \
         LEFT JOIN ( \
             SELECT product_id, SUM(quantity) AS total_quantity \
             FROM sale_history \
             GROUP BY product_id \
         ) sold ON sold.product_id = p.id \
         WHERE p.id NOT IN ( \
             SELECT product_id FROM sale_history WHERE customer_id = ? \
         ) \
         ORDER BY total_quantity_sold DESC, p.id ASC \
         LIMIT ?",
    )
    .bind::<Integer, _>(customer_id)
    .bind::<Integer, _>(customer_id)
    .bind::<BigInt, _>(limit)
    .load(conn)?;
    Ok(rows)
}

fn range_strings(start: DateTime<Utc>, end: DateTime<Utc>) -> (String, String) {
    (tz::to_rfc3339_millis(start), tz::to_rfc3339_millis(end))
}
