//! Category and product accessors.

use diesel::prelude::*;
use diesel::result::{DatabaseErrorKind, Error as DieselError};
use tracing::debug;

use crate::models::{Category, NewCategory, NewProduct, Product};
use crate::schema::{categories, products};
use crate::store::{ConstraintViolation, StoreError, StoreResult, range_violation};

/// Everything needed to create a product.
#[derive(Debug, Clone)]
pub struct ProductSpec<'a> {
    /// Category the product belongs to; must exist.
    pub category_id: i32,
    /// Display name.
    pub name: &'a str,
    /// Optional free-form description.
    pub description: Option<&'a str>,
    /// List price in cents; must be non-negative.
    pub price_cents: i64,
    /// Initial units on hand; must be non-negative.
    pub stock_quantity: i32,
}

/// Create a category, failing with `UniqueViolation` on a duplicate name.
pub fn create_category(conn: &mut SqliteConnection, name: &str) -> StoreResult<Category> {
    let name = name.trim();
    if name.is_empty() {
        return Err(range_violation("category name", "must be non-empty"));
    }

    diesel::insert_into(categories::table)
        .values(&NewCategory { name })
        .returning(Category::as_returning())
        .get_result(conn)
        .map_err(|e| match e {
            DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
                StoreError::Constraint(ConstraintViolation::UniqueViolation {
                    field: "category name",
                    value: name.to_string(),
                })
            }
            other => other.into(),
        })
}

/// Create a product.
///
/// Validates the numeric ranges up front and resolves the category FK
/// explicitly so the caller gets `ForeignKeyMissing` with the offending id
/// rather than a bare constraint failure from the database.
pub fn create(conn: &mut SqliteConnection, spec: &ProductSpec<'_>) -> StoreResult<Product> {
    if spec.price_cents < 0 {
        return Err(range_violation(
            "price_cents",
            format!("must be >= 0, got {}", spec.price_cents),
        ));
    }
    if spec.stock_quantity < 0 {
        return Err(range_violation(
            "stock_quantity",
            format!("must be >= 0, got {}", spec.stock_quantity),
        ));
    }
    if !category_exists(conn, spec.category_id)? {
        return Err(StoreError::Constraint(
            ConstraintViolation::ForeignKeyMissing {
                entity: "category",
                id: spec.category_id,
            },
        ));
    }

    let row = NewProduct {
        category_id: spec.category_id,
        name: spec.name,
        description: spec.description,
        price_cents: spec.price_cents,
        stock_quantity: spec.stock_quantity,
    };

    let created: Product = diesel::insert_into(products::table)
        .values(&row)
        .returning(Product::as_returning())
        .get_result(conn)?;

    debug!(product_id = created.id, name = %created.name, "product created");
    Ok(created)
}

/// Look up a product by id, failing with `NotFound` if absent.
pub fn get(conn: &mut SqliteConnection, product_id: i32) -> StoreResult<Product> {
    products::table
        .find(product_id)
        .select(Product::as_select())
        .first(conn)
        .optional()?
        .ok_or(StoreError::NotFound {
            entity: "product",
            id: product_id,
        })
}

/// Look up a category by id, failing with `NotFound` if absent.
pub fn get_category(conn: &mut SqliteConnection, category_id: i32) -> StoreResult<Category> {
    categories::table
        .find(category_id)
        .select(Category::as_select())
        .first(conn)
        .optional()?
        .ok_or(StoreError::NotFound {
            entity: "category",
            id: category_id,
        })
}

/// Change a product's list price. Existing line items keep their snapshot.
pub fn update_price(
    conn: &mut SqliteConnection,
    product_id: i32,
    price_cents: i64,
) -> StoreResult<()> {
    if price_cents < 0 {
        return Err(range_violation(
            "price_cents",
            format!("must be >= 0, got {price_cents}"),
        ));
    }
    let n = diesel::update(products::table.find(product_id))
        .set(products::price_cents.eq(price_cents))
        .execute(conn)?;
    if n == 0 {
        return Err(StoreError::NotFound {
            entity: "product",
            id: product_id,
        });
    }
    Ok(())
}

pub(crate) fn category_exists(conn: &mut SqliteConnection, category_id: i32) -> StoreResult<bool> {
    let found: Option<i32> = categories::table
        .find(category_id)
        .select(categories::id)
        .first(conn)
        .optional()?;
    Ok(found.is_some())
}
