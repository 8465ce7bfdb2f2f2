//! Catalog subsystem.
//!
//! Categories and products are long-lived reference data owned by catalog
//! management, not by the order path. This module gives that external flow a
//! declarative entrypoint: a TOML catalog file describing categories and
//! their products, normalized by [`config`] and applied transactionally by
//! [`sync`]. Live stock counts are never overwritten by a sync; they belong
//! to the stock guard.

pub mod config;
pub mod sync;
