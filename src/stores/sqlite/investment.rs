//! Implements a SQLite backed investment store.

use std::sync::{Arc, Mutex};

use rusqlite::{Connection, Row};

use crate::{
    Error,
    database_id::{DatabaseId, OwnerId},
    investment::{Investment, InvestmentInput},
    stores::InvestmentStore,
};

/// Stores investments in a SQLite database.
#[derive(Debug, Clone)]
pub struct SqliteInvestmentStore {
    connection: Arc<Mutex<Connection>>,
}

impl SqliteInvestmentStore {
    /// Create a new store for the SQLite `connection`.
    pub fn new(connection: Arc<Mutex<Connection>>) -> Self {
        Self { connection }
    }
}

const INVESTMENT_COLUMNS: &str =
    "id, owner_id, operation, asset_category, institution, principal, yield_amount, date, note";

impl InvestmentStore for SqliteInvestmentStore {
    /// Create a new investment in the database.
    ///
    /// # Errors
    /// Returns an [Error::SqlError] if there is an SQL error.
    fn create(&mut self, owner_id: OwnerId, input: InvestmentInput) -> Result<Investment, Error> {
        let investment = self
            .connection
            .lock()
            .unwrap()
            .prepare(&format!(
                "INSERT INTO investment (owner_id, operation, asset_category, institution, \
                 principal, yield_amount, date, note)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
                 RETURNING {INVESTMENT_COLUMNS}"
            ))?
            .query_row(
                (
                    owner_id.as_i64(),
                    input.operation,
                    input.asset_category,
                    input.institution,
                    input.principal,
                    input.yield_amount,
                    input.date,
                    input.note,
                ),
                map_investment_row,
            )?;

        Ok(investment)
    }

    /// Overwrite the stored investment with the same `id` and `owner_id`.
    ///
    /// # Errors
    /// This function will return an:
    /// - [Error::UpdateMissingInvestment] if the investment is not in the
    ///   database,
    /// - or [Error::SqlError] if there is some other SQL error.
    fn update(&mut self, investment: &Investment) -> Result<(), Error> {
        let rows_changed = self.connection.lock().unwrap().execute(
            "UPDATE investment
             SET operation = ?3, asset_category = ?4, institution = ?5, principal = ?6,
                 yield_amount = ?7, date = ?8, note = ?9
             WHERE id = ?1 AND owner_id = ?2",
            (
                investment.id,
                investment.owner_id.as_i64(),
                investment.operation,
                &investment.asset_category,
                &investment.institution,
                investment.principal,
                investment.yield_amount,
                investment.date,
                &investment.note,
            ),
        )?;

        if rows_changed == 0 {
            return Err(Error::UpdateMissingInvestment);
        }

        Ok(())
    }

    /// Delete an investment from the database.
    ///
    /// # Errors
    /// This function will return an:
    /// - [Error::DeleteMissingInvestment] if the investment is not in the
    ///   database,
    /// - or [Error::SqlError] if there is some other SQL error.
    fn delete(&mut self, owner_id: OwnerId, id: DatabaseId) -> Result<(), Error> {
        let rows_changed = self.connection.lock().unwrap().execute(
            "DELETE FROM investment WHERE id = ?1 AND owner_id = ?2",
            (id, owner_id.as_i64()),
        )?;

        if rows_changed == 0 {
            return Err(Error::DeleteMissingInvestment);
        }

        Ok(())
    }

    /// Retrieve an investment in the database by its `id`.
    ///
    /// # Errors
    /// This function will return an:
    /// - [Error::NotFound] if `id` does not refer to the owner's investment,
    /// - or [Error::SqlError] if there is some other SQL error.
    fn get(&self, owner_id: OwnerId, id: DatabaseId) -> Result<Investment, Error> {
        let investment = self
            .connection
            .lock()
            .unwrap()
            .prepare(&format!(
                "SELECT {INVESTMENT_COLUMNS} FROM investment WHERE id = ?1 AND owner_id = ?2"
            ))?
            .query_row((id, owner_id.as_i64()), map_investment_row)?;

        Ok(investment)
    }

    /// Retrieve all of an owner's investments, newest first.
    ///
    /// # Errors
    /// Returns an [Error::SqlError] if there is an SQL error.
    fn get_by_owner(&self, owner_id: OwnerId) -> Result<Vec<Investment>, Error> {
        self.connection
            .lock()
            .unwrap()
            .prepare(&format!(
                "SELECT {INVESTMENT_COLUMNS} FROM investment
                 WHERE owner_id = ?1
                 ORDER BY date DESC, id DESC"
            ))?
            .query_map([owner_id.as_i64()], map_investment_row)?
            .map(|maybe_investment| maybe_investment.map_err(|error| error.into()))
            .collect()
    }
}

/// Create the investment table and its index in the database.
///
/// # Errors
/// Returns an error if the table cannot be created or if there is an SQL error.
pub(super) fn create_investment_table(connection: &Connection) -> Result<(), Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS investment (
                id INTEGER PRIMARY KEY,
                owner_id INTEGER NOT NULL,
                operation TEXT NOT NULL,
                asset_category TEXT NOT NULL,
                institution TEXT NOT NULL,
                principal REAL NOT NULL,
                yield_amount REAL NOT NULL DEFAULT 0,
                date TEXT NOT NULL,
                note TEXT NOT NULL DEFAULT ''
                )",
        (),
    )?;

    connection.execute(
        "CREATE INDEX IF NOT EXISTS idx_investment_owner_date ON investment(owner_id, date)",
        (),
    )?;

    Ok(())
}

/// Map a database row to an [Investment].
fn map_investment_row(row: &Row) -> Result<Investment, rusqlite::Error> {
    let id = row.get(0)?;
    let owner_id = OwnerId::new(row.get(1)?);
    let operation = row.get(2)?;
    let asset_category = row.get(3)?;
    let institution = row.get(4)?;
    let principal = row.get(5)?;
    let yield_amount = row.get(6)?;
    let date = row.get(7)?;
    let note = row.get(8)?;

    Ok(Investment {
        id,
        owner_id,
        operation,
        asset_category,
        institution,
        principal,
        yield_amount,
        date,
        note,
    })
}
