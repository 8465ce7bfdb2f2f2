//! Database utilities for connections and schema migrations.
//!
//! This module provides:
//! - SQLite connection helper: [`connection::connect_sqlite`] applies WAL,
//!   foreign_keys=ON, and a 5000ms busy_timeout.
//! - Embedded Diesel migrations: [`migrate::run_sqlite`].
//!
//! The busy_timeout PRAGMA is load-bearing: it is the bounded lock wait behind
//! the stock guard's `LockTimeout` error (see [`crate::store::stock`]).
//!
//! Example:
//! ```no_run
//! use shop_ledger::db::{connection, migrate};
//!
//! let db_path = std::env::temp_dir().join("shop_ledger_example.db");
//! migrate::run_sqlite(db_path.to_str().unwrap()).expect("migrations");
//! let _conn = connection::connect_sqlite(db_path.to_str().unwrap()).expect("connect");
//! ```

pub mod connection;
pub mod migrate;
