#![allow(dead_code)]

use chrono::{DateTime, TimeZone, Utc};
use diesel::QueryableByName;
use diesel::prelude::*;
use diesel::sql_types::{Integer, Text};
use std::path::PathBuf;
use tempfile::TempDir;

use shop_ledger::db::{connection, migrate};
use shop_ledger::store::{customers, orders, products};

#[derive(QueryableByName)]
struct JournalMode {
    #[diesel(sql_type = Text)]
    journal_mode: String,
}
#[derive(QueryableByName)]
struct ForeignKeys {
    #[diesel(sql_type = Integer)]
    foreign_keys: i32,
}
#[derive(QueryableByName)]
struct BusyTimeout {
    #[diesel(sql_type = Integer, column_name = "timeout")]
    busy_timeout: i32,
}

pub struct TestDb {
    _dir: TempDir, // keep alive for the life of the test
    pub path: String,
}

pub fn setup_db() -> (TestDb, SqliteConnection) {
    let dir = TempDir::new().expect("tempdir");
    let mut p = PathBuf::from(dir.path());
    p.push("test.db");
    let path = p.to_string_lossy().to_string();

    migrate::run_sqlite(&path).expect("migrations");

    let conn = connection::connect_sqlite(&path).expect("connect");
    (TestDb { _dir: dir, path }, conn)
}

pub fn assert_sqlite_pragmas(conn: &mut SqliteConnection) {
    use diesel::sql_query;

    let jm: JournalMode = sql_query("PRAGMA journal_mode;").get_result(conn).unwrap();
    assert_eq!(jm.journal_mode.to_lowercase(), "wal");

    let fk: ForeignKeys = sql_query("PRAGMA foreign_keys;").get_result(conn).unwrap();
    assert_eq!(fk.foreign_keys, 1);

    let bt: BusyTimeout = sql_query("PRAGMA busy_timeout;").get_result(conn).unwrap();
    assert_eq!(bt.busy_timeout, 5000);
}

pub fn ts(y: i32, mo: u32, d: u32, h: u32, mi: u32, s: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(y, mo, d, h, mi, s).unwrap()
}

/// Ids created by [`seed_store`], in insertion order.
pub struct Seed {
    pub customers: Vec<i32>,
    pub categories: Vec<i32>,
    pub products: Vec<i32>,
    pub orders: Vec<i32>,
}

/// Seed scenario: 10 customers, 10 categories, 10 products, 11 orders.
///
/// Fixed facts the report tests rely on:
/// - Orders 1 and 2 both fall on 2025-10-10 and total 120.50 + 250.00.
/// - Orders 7 and 8 fall in March 2025; Lego Set and Pasta Pack each sell
///   4 units there while Mystery Novel sells 2.
/// - Every product keeps at least 20 units after all orders are placed.
pub fn seed_store(conn: &mut SqliteConnection) -> Seed {
    let people: [(&str, &str); 10] = [
        ("Alice", "Nguyen"),
        ("Ben", "Ortiz"),
        ("Chloe", "Smith"),
        ("Dmitri", "Volkov"),
        ("Elena", "Rossi"),
        ("Farid", "Khan"),
        ("Grace", "Lee"),
        ("Hugo", "Martins"),
        ("Iris", "Kovacs"),
        ("Jonas", "Berg"),
    ];
    let customer_ids: Vec<i32> = people
        .iter()
        .enumerate()
        .map(|(i, (first, last))| {
            let email = format!("{}.{}{}@example.com", first.to_lowercase(), last.to_lowercase(), i);
            customers::create(conn, first, last, &email, "argon2id$stub")
                .expect("customer")
                .id
        })
        .collect();

    let category_names = [
        "Electronics",
        "Books",
        "Toys",
        "Groceries",
        "Clothing",
        "Sports",
        "Home",
        "Beauty",
        "Garden",
        "Music",
    ];
    let category_ids: Vec<i32> = category_names
        .iter()
        .map(|name| products::create_category(conn, name).expect("category").id)
        .collect();

    // (name, category index, price cents, initial stock)
    let catalog: [(&str, usize, i64, i32); 10] = [
        ("Wireless Headphones", 0, 12050, 40),
        ("Mystery Novel", 1, 1500, 60),
        ("Lego Set", 2, 5525, 30),
        ("Pasta Pack", 3, 475, 120),
        ("Denim Jacket", 4, 12500, 35),
        ("Tennis Racket", 5, 8999, 25),
        ("Table Lamp", 6, 3450, 45),
        ("Face Cream", 7, 1995, 80),
        ("Garden Hose", 8, 2740, 50),
        ("Acoustic Guitar", 9, 34900, 22),
    ];
    let product_ids: Vec<i32> = catalog
        .iter()
        .map(|(name, cat, price, stock)| {
            products::create(
                conn,
                &products::ProductSpec {
                    category_id: category_ids[*cat],
                    name,
                    description: None,
                    price_cents: *price,
                    stock_quantity: *stock,
                },
            )
            .expect("product")
            .id
        })
        .collect();

    // (customer index, date, lines as (product index, quantity))
    let order_specs: [(usize, DateTime<Utc>, &[(usize, i32)]); 11] = [
        (0, ts(2025, 10, 10, 10, 30, 0), &[(0, 1)]),
        (1, ts(2025, 10, 10, 15, 45, 0), &[(4, 2)]),
        (2, ts(2025, 1, 12, 11, 0, 0), &[(7, 2), (8, 1)]),
        (3, ts(2025, 5, 3, 16, 20, 0), &[(5, 1), (6, 2)]),
        (4, ts(2025, 6, 18, 9, 45, 0), &[(9, 1)]),
        (5, ts(2025, 7, 22, 13, 10, 0), &[(1, 3), (3, 5)]),
        (6, ts(2025, 3, 5, 9, 0, 0), &[(2, 4), (1, 2)]),
        (7, ts(2025, 3, 20, 14, 0, 0), &[(3, 4)]),
        (8, ts(2025, 8, 30, 18, 5, 0), &[(6, 1), (7, 3)]),
        (9, ts(2025, 9, 14, 10, 15, 0), &[(8, 2), (5, 1)]),
        (0, ts(2025, 11, 2, 12, 0, 0), &[(0, 1), (9, 1)]),
    ];
    let order_ids: Vec<i32> = order_specs
        .iter()
        .map(|(cust, date, lines)| {
            let lines: Vec<orders::OrderLine> = lines
                .iter()
                .map(|(p, q)| orders::OrderLine {
                    product_id: product_ids[*p],
                    quantity: *q,
                })
                .collect();
            orders::place(conn, customer_ids[*cust], *date, &lines)
                .expect("order")
                .id
        })
        .collect();

    Seed {
        customers: customer_ids,
        categories: category_ids,
        products: product_ids,
        orders: order_ids,
    }
}
