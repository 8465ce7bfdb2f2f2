//! Customer registration and lookup.

use diesel::prelude::*;
use diesel::result::{DatabaseErrorKind, Error as DieselError};
use tracing::debug;

use crate::models::{Customer, NewCustomer};
use crate::schema::customers;
use crate::store::{ConstraintViolation, StoreError, StoreResult, range_violation};

/// Register a customer.
///
/// Fails with `UniqueViolation` if the email is already registered and with
/// `RangeViolation` if the email is blank. The credential is stored opaquely;
/// hashing is the caller's concern.
pub fn create(
    conn: &mut SqliteConnection,
    first_name: &str,
    last_name: &str,
    email: &str,
    password_hash: &str,
) -> StoreResult<Customer> {
    let email = email.trim();
    if email.is_empty() {
        return Err(range_violation("email", "must be non-empty"));
    }

    let row = NewCustomer {
        first_name,
        last_name,
        email,
        password_hash,
    };

    let created = diesel::insert_into(customers::table)
        .values(&row)
        .returning(Customer::as_returning())
        .get_result(conn)
        .map_err(|e| match e {
            DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
                StoreError::Constraint(ConstraintViolation::UniqueViolation {
                    field: "email",
                    value: email.to_string(),
                })
            }
            other => other.into(),
        })?;

    debug!(customer_id = created.id, "customer registered");
    Ok(created)
}

/// Look up a customer by id, failing with `NotFound` if absent.
pub fn get(conn: &mut SqliteConnection, customer_id: i32) -> StoreResult<Customer> {
    customers::table
        .find(customer_id)
        .select(Customer::as_select())
        .first(conn)
        .optional()?
        .ok_or(StoreError::NotFound {
            entity: "customer",
            id: customer_id,
        })
}

/// True if the customer id resolves to a row.
pub(crate) fn exists(conn: &mut SqliteConnection, customer_id: i32) -> StoreResult<bool> {
    let found: Option<i32> = customers::table
        .find(customer_id)
        .select(customers::id)
        .first(conn)
        .optional()?;
    Ok(found.is_some())
}
