//! Typed data-access and reporting layer for an e-commerce store.
//!
//! `shop_ledger` owns five durable relations (customers, categories,
//! products, orders, order line items) plus a derived append-only
//! `sale_history` projection, all in SQLite via Diesel. On top of them it
//! provides:
//!
//! - a validated entity layer ([`store`]) whose writes fail with typed
//!   constraint errors instead of coercing values,
//! - an atomic check-and-decrement stock guard ([`store::stock`]) so
//!   concurrent order placement can never oversell,
//! - a reporting engine ([`reports`]) of parameterized aggregations over
//!   half-open time ranges, and
//! - a TOML catalog loader/sync ([`catalog`]) for reference data.
//!
//! The crate exposes no network surface; order placement services and
//! analytics frontends consume it as a library.

#![deny(missing_docs)]

pub mod catalog;
pub mod db;
pub mod models;
pub mod money;
pub mod reports;
#[allow(missing_docs)]
pub mod schema;
pub mod store;
pub mod tz;
