//! Apply a normalized catalog to the database.
//!
//! Sync is additive and idempotent: missing categories are created, new
//! products are inserted with their initial stock, and existing products get
//! their description and price refreshed while `stock_quantity` is left
//! untouched (stock is live state owned by the guard, not configuration).
//! Nothing is ever pruned: a product may be referenced by immutable order
//! history, so removal is a manual operation outside this crate.

use diesel::prelude::*;
use tracing::{debug, info};

use crate::catalog::config::Catalog;
use crate::models::{NewCategory, NewProduct};
use crate::schema::{categories, products};

/// Options for a catalog sync run.
#[derive(Debug, Clone, Copy, Default)]
pub struct SyncOptions {
    /// Compute and report changes without writing anything.
    pub dry_run: bool,
}

/// Counts of changes a sync performed (or would perform under `dry_run`).
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SyncReport {
    /// Categories that did not exist and were created.
    pub categories_created: usize,
    /// Products that did not exist and were inserted.
    pub products_created: usize,
    /// Existing products whose price or description changed.
    pub products_updated: usize,
    /// Existing products already matching the catalog.
    pub products_unchanged: usize,
}

/// Sync a normalized catalog into the categories/products tables.
///
/// Runs in one immediate transaction so a half-applied catalog is never
/// observable. Expects the catalog to be normalized already (see
/// [`crate::catalog::config::load_catalog_str`]).
pub fn sync_catalog(
    conn: &mut SqliteConnection,
    cat: &Catalog,
    opt: SyncOptions,
) -> anyhow::Result<SyncReport> {
    let report = conn.immediate_transaction::<SyncReport, anyhow::Error, _>(|conn| {
        let mut report = SyncReport::default();

        for (category_name, cfg) in &cat.categories {
            let existing: Option<i32> = categories::table
                .filter(categories::name.eq(category_name))
                .select(categories::id)
                .first(conn)
                .optional()?;

            let category_id = match existing {
                Some(id) => id,
                None => {
                    report.categories_created += 1;
                    if opt.dry_run {
                        // No row to hang products off; count them as creates.
                        report.products_created += cfg.products.len();
                        continue;
                    }
                    diesel::insert_into(categories::table)
                        .values(&NewCategory {
                            name: category_name,
                        })
                        .returning(categories::id)
                        .get_result(conn)?
                }
            };

            for p in &cfg.products {
                let price_cents = crate::money::parse_price_cents(&p.price)?;
                let current: Option<(i32, i64, Option<String>)> = products::table
                    .filter(
                        products::category_id
                            .eq(category_id)
                            .and(products::name.eq(&p.name)),
                    )
                    .select((products::id, products::price_cents, products::description))
                    .first(conn)
                    .optional()?;

                match current {
                    None => {
                        report.products_created += 1;
                        if !opt.dry_run {
                            diesel::insert_into(products::table)
                                .values(&NewProduct {
                                    category_id,
                                    name: &p.name,
                                    description: p.description.as_deref(),
                                    price_cents,
                                    stock_quantity: p.stock,
                                })
                                .execute(conn)?;
                        }
                    }
                    Some((id, cur_price, cur_desc)) => {
                        if cur_price == price_cents && cur_desc == p.description {
                            report.products_unchanged += 1;
                            continue;
                        }
                        report.products_updated += 1;
                        debug!(
                            product_id = id,
                            name = %p.name,
                            "catalog sync updating price/description"
                        );
                        if !opt.dry_run {
                            diesel::update(products::table.find(id))
                                .set((
                                    products::price_cents.eq(price_cents),
                                    products::description.eq(p.description.as_deref()),
                                ))
                                .execute(conn)?;
                        }
                    }
                }
            }
        }

        Ok(report)
    })?;

    info!(
        dry_run = opt.dry_run,
        categories_created = report.categories_created,
        products_created = report.products_created,
        products_updated = report.products_updated,
        products_unchanged = report.products_unchanged,
        "catalog sync finished"
    );
    Ok(report)
}
