// SPDX-FileCopyrightText: 2026 Triage Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Customer CRUD operations.

use rusqlite::params;
use triage_core::TriageError;

use super::parse_column;
use crate::database::Database;
use crate::models::{Customer, NewCustomer};

const CUSTOMER_COLUMNS: &str = "id, name, email, tier, account_balance, created_at";

fn row_to_customer(row: &rusqlite::Row<'_>) -> rusqlite::Result<Customer> {
    Ok(Customer {
        id: row.get(0)?,
        name: row.get(1)?,
        email: row.get(2)?,
        tier: parse_column(row, 3)?,
        account_balance: row.get(4)?,
        created_at: row.get(5)?,
    })
}

/// Insert a customer and return the new row id.
///
/// A duplicate email maps to [`TriageError::Conflict`].
pub async fn create_customer(db: &Database, customer: &NewCustomer) -> Result<i64, TriageError> {
    let customer = customer.clone();
    db.connection()
        .call(move |conn| {
            conn.execute(
                "INSERT INTO customers (name, email, tier, account_balance, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
                params![
                    customer.name,
                    customer.email,
                    customer.tier.to_string(),
                    customer.account_balance,
                    customer.created_at,
                ],
            )?;
            Ok(conn.last_insert_rowid())
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Get a customer by id.
pub async fn get_customer(db: &Database, id: i64) -> Result<Option<Customer>, TriageError> {
    db.connection()
        .call(move |conn| {
            let sql = format!("SELECT {CUSTOMER_COLUMNS} FROM customers WHERE id = ?1");
            match conn.query_row(&sql, params![id], row_to_customer) {
                Ok(customer) => Ok(Some(customer)),
                Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                Err(e) => Err(e),
            }
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Get a customer by exact email.
pub async fn get_customer_by_email(
    db: &Database,
    email: &str,
) -> Result<Option<Customer>, TriageError> {
    let email = email.to_string();
    db.connection()
        .call(move |conn| {
            let sql = format!("SELECT {CUSTOMER_COLUMNS} FROM customers WHERE email = ?1");
            match conn.query_row(&sql, params![email], row_to_customer) {
                Ok(customer) => Ok(Some(customer)),
                Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                Err(e) => Err(e),
            }
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// List all customers ordered by name.
pub async fn list_customers(db: &Database) -> Result<Vec<Customer>, TriageError> {
    db.connection()
        .call(|conn| {
            let sql = format!("SELECT {CUSTOMER_COLUMNS} FROM customers ORDER BY name, id");
            let mut stmt = conn.prepare(&sql)?;
            let rows = stmt.query_map([], row_to_customer)?;
            rows.collect::<Result<Vec<_>, _>>()
        })
        .await
        .map_err(crate::database::map_tr_err)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::queries::test_support::{make_customer, setup_db};
    use triage_core::CustomerTier;

    #[tokio::test]
    async fn create_and_get_customer_roundtrips() {
        let (db, _dir) = setup_db().await;
        let mut new = make_customer("Ada Lovelace", "ada@example.com");
        new.tier = CustomerTier::Gold;
        new.account_balance = 1250.75;

        let id = create_customer(&db, &new).await.unwrap();
        let customer = get_customer(&db, id).await.unwrap().unwrap();
        assert_eq!(customer.name, "Ada Lovelace");
        assert_eq!(customer.email, "ada@example.com");
        assert_eq!(customer.tier, CustomerTier::Gold);
        assert_eq!(customer.account_balance, 1250.75);

        db.close().await.unwrap();
    }

    #[tokio::test]
    async fn lookup_by_email_finds_existing_customer() {
        let (db, _dir) = setup_db().await;
        let id = create_customer(&db, &make_customer("Grace", "grace@example.com"))
            .await
            .unwrap();

        let found = get_customer_by_email(&db, "grace@example.com").await.unwrap();
        assert_eq!(found.map(|c| c.id), Some(id));
        assert!(
            get_customer_by_email(&db, "nobody@example.com")
                .await
                .unwrap()
                .is_none()
        );
    }

    #[tokio::test]
    async fn duplicate_email_is_a_conflict() {
        let (db, _dir) = setup_db().await;
        create_customer(&db, &make_customer("One", "same@example.com"))
            .await
            .unwrap();
        let err = create_customer(&db, &make_customer("Two", "same@example.com"))
            .await
            .unwrap_err();
        assert!(matches!(err, TriageError::Conflict(_)), "got {err:?}");
    }

    #[tokio::test]
    async fn missing_customer_is_none() {
        let (db, _dir) = setup_db().await;
        assert!(get_customer(&db, 404).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn customers_are_listed_by_name() {
        let (db, _dir) = setup_db().await;
        for (name, email) in [("Zed", "z@x.io"), ("Amy", "a@x.io"), ("Mo", "m@x.io")] {
            create_customer(&db, &make_customer(name, email)).await.unwrap();
        }
        let names: Vec<String> = list_customers(&db)
            .await
            .unwrap()
            .into_iter()
            .map(|c| c.name)
            .collect();
        assert_eq!(names, ["Amy", "Mo", "Zed"]);
    }
}
