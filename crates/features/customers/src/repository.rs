//! SQL for the `customers` table.

use crate::error::{CustomersError, CustomersErrorExt};
use crate::model::{Customer, CustomerInput, NewCustomer};
use autoims_kernel::prelude::{CUSTOMERS, Changes, ConstraintViolation, fetch_all, like_pattern, trimmed};
use chrono::Utc;
use rusqlite::{Connection, OptionalExtension, Row, params};

pub fn customer_from_row(row: &Row<'_>) -> rusqlite::Result<Customer> {
    Ok(Customer {
        customer_id: row.get("customer_id")?,
        name: row.get("name")?,
        phone: row.get("phone")?,
        email: row.get("email")?,
        address: row.get("address")?,
        created_at: row.get("created_at")?,
    })
}

/// Newest first, or by name when searching.
pub(crate) fn list(conn: &Connection, search: Option<&str>) -> Result<Vec<Customer>, CustomersError> {
    let (sql, pattern) = match search {
        Some(term) => (
            "SELECT * FROM customers
             WHERE name LIKE ?1 ESCAPE '\\' OR phone LIKE ?1 ESCAPE '\\' OR email LIKE ?1 ESCAPE '\\'
             ORDER BY name",
            Some(like_pattern(term)),
        ),
        None => ("SELECT * FROM customers ORDER BY created_at DESC, customer_id DESC", None),
    };

    match pattern {
        Some(pattern) => fetch_all(conn, sql, [pattern], customer_from_row),
        None => fetch_all(conn, sql, [], customer_from_row),
    }
    .context("Listing customers")
}

pub(crate) fn get(conn: &Connection, customer_id: i64) -> Result<Customer, CustomersError> {
    conn.query_row("SELECT * FROM customers WHERE customer_id = ?1", [customer_id], customer_from_row)
        .optional()
        .context("Loading customer")?
        .ok_or(CustomersError::NotFound)
}

/// Plain insert, shared with flows that create a customer inside their own transaction.
///
/// # Errors
///
/// SQLite failures, including UNIQUE violations on phone or email.
pub fn insert(conn: &Connection, customer: &NewCustomer) -> rusqlite::Result<Customer> {
    conn.query_row(
        "INSERT INTO customers (name, phone, email, address, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5) RETURNING *",
        params![customer.name, customer.phone, customer.email, customer.address, Utc::now()],
        customer_from_row,
    )
}

pub(crate) fn create(conn: &Connection, customer: &NewCustomer) -> Result<Customer, CustomersError> {
    insert(conn, customer).map_err(|err| conflict_or(err, "Creating customer"))
}

/// Changes only the fields that carry a non-blank value.
pub(crate) fn update(
    conn: &Connection,
    customer_id: i64,
    input: &CustomerInput,
) -> Result<Customer, CustomersError> {
    let changes = Changes::new()
        .set_opt("name", trimmed(input.name.as_deref()))
        .set_opt("phone", trimmed(input.phone.as_deref()))
        .set_opt("email", trimmed(input.email.as_deref()))
        .set_opt("address", trimmed(input.address.as_deref()));
    if changes.is_empty() {
        return get(conn, customer_id);
    }

    changes
        .apply(conn, CUSTOMERS, "customer_id", customer_id, customer_from_row)
        .map_err(|err| conflict_or(err, "Updating customer"))?
        .ok_or(CustomersError::NotFound)
}

/// Vehicles reference customers with `ON DELETE RESTRICT`, so a customer
/// who still owns one is refused by the foreign key.
pub(crate) fn delete(conn: &Connection, customer_id: i64) -> Result<(), CustomersError> {
    match conn.execute("DELETE FROM customers WHERE customer_id = ?1", [customer_id]) {
        Ok(0) => Err(CustomersError::NotFound),
        Ok(_) => Ok(()),
        Err(err) if err.is_foreign_key_violation() => Err(CustomersError::HasVehicles),
        Err(err) => Err(err).context("Deleting customer"),
    }
}

fn conflict_or(err: rusqlite::Error, context: &'static str) -> CustomersError {
    if err.is_unique_violation() {
        CustomersError::Duplicate
    } else {
        CustomersError::Sqlite { source: err, context: Some(context.into()) }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MIGRATIONS;

    fn conn() -> Connection {
        let conn = Connection::open_in_memory().expect("memory db");
        for migration in MIGRATIONS {
            conn.execute_batch(migration.script).expect("migrate");
        }
        conn
    }

    fn new(name: &str, phone: &str, email: &str) -> NewCustomer {
        NewCustomer {
            name: name.to_owned(),
            phone: phone.to_owned(),
            email: email.to_owned(),
            address: "1 Main St".to_owned(),
        }
    }

    #[test]
    fn search_matches_any_contact_field_case_insensitively() {
        let conn = conn();
        create(&conn, &new("Zed", "555-0001", "zed@garage.test")).expect("zed");
        create(&conn, &new("Ada", "555-0002", "ada@garage.test")).expect("ada");
        create(&conn, &new("Bob", "777-0003", "bob@garage.test")).expect("bob");

        let names = |found: Vec<Customer>| found.into_iter().map(|c| c.name).collect::<Vec<_>>();
        assert_eq!(names(list(&conn, Some("555")).expect("phone")), ["Ada", "Zed"]);
        assert_eq!(names(list(&conn, Some("BOB@")).expect("email")), ["Bob"]);
        assert_eq!(names(list(&conn, None).expect("all")), ["Bob", "Ada", "Zed"]);
        assert!(list(&conn, Some("%")).expect("literal percent").is_empty());
    }

    #[test]
    fn duplicates_conflict_on_create_and_update() {
        let conn = conn();
        create(&conn, &new("Ada", "555-0001", "ada@garage.test")).expect("ada");
        let bob = create(&conn, &new("Bob", "555-0002", "bob@garage.test")).expect("bob");

        let err = create(&conn, &new("Eve", "555-0001", "eve@garage.test")).expect_err("phone taken");
        assert!(matches!(err, CustomersError::Duplicate));

        let input = CustomerInput { email: Some("ada@garage.test".into()), ..Default::default() };
        let err = update(&conn, bob.customer_id, &input).expect_err("email taken");
        assert!(matches!(err, CustomersError::Duplicate));
    }

    #[test]
    fn partial_update_keeps_other_fields() {
        let conn = conn();
        let ada = create(&conn, &new("Ada", "555-0001", "ada@garage.test")).expect("ada");

        let input = CustomerInput { address: Some(" 2 Side St ".into()), name: Some("  ".into()), ..Default::default() };
        let updated = update(&conn, ada.customer_id, &input).expect("update");
        assert_eq!(updated.name, "Ada");
        assert_eq!(updated.address, "2 Side St");

        let err = update(&conn, 999, &input).expect_err("missing");
        assert!(matches!(err, CustomersError::NotFound));
    }

    #[test]
    fn delete_reports_missing_rows() {
        let conn = conn();
        let ada = create(&conn, &new("Ada", "555-0001", "ada@garage.test")).expect("ada");
        delete(&conn, ada.customer_id).expect("delete");
        assert!(matches!(delete(&conn, ada.customer_id), Err(CustomersError::NotFound)));
        assert!(matches!(get(&conn, ada.customer_id), Err(CustomersError::NotFound)));
    }
}
