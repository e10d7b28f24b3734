//! SQLite backed implementations of the store traits.
//!
//! Each store holds a shared connection behind a mutex and scopes every
//! statement by owner. There are deliberately no foreign key constraints
//! between the tables: the store contract is a document store, dangling
//! references are tolerated at write time and surfaced by the read-time
//! label join instead.

use std::sync::{Arc, Mutex};

use rusqlite::{
    Connection, ToSql,
    types::{FromSql, FromSqlError, FromSqlResult, ToSqlOutput, ValueRef},
};

use crate::{
    Error, investment::OperationKind, reference::CategoryKind, transaction::TransactionKind,
};

mod investment;
mod reference;
mod transaction;

pub use investment::SqliteInvestmentStore;
pub use reference::SqliteReferenceStore;
pub use transaction::SqliteTransactionStore;

/// Create all of the ledger tables in the database if they do not exist.
///
/// # Errors
/// Returns an [Error::SqlError] if a table or index cannot be created.
pub fn initialize(connection: &Connection) -> Result<(), Error> {
    reference::create_reference_tables(connection)?;
    transaction::create_transaction_table(connection)?;
    investment::create_investment_table(connection)?;

    Ok(())
}

/// Open an in-memory database with the full schema.
///
/// Intended for tests and ephemeral tooling; real deployments should open a
/// file-backed connection and call [initialize] themselves.
pub fn open_in_memory() -> Result<Arc<Mutex<Connection>>, Error> {
    let connection = Connection::open_in_memory()?;
    initialize(&connection)?;

    Ok(Arc::new(Mutex::new(connection)))
}

impl ToSql for TransactionKind {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(self.as_str().into())
    }
}

impl FromSql for TransactionKind {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        match value.as_str()? {
            "income" => Ok(TransactionKind::Income),
            "expense" => Ok(TransactionKind::Expense),
            other => Err(FromSqlError::Other(
                format!("unknown transaction kind {other:?}").into(),
            )),
        }
    }
}

impl ToSql for OperationKind {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(self.as_str().into())
    }
}

impl FromSql for OperationKind {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        match value.as_str()? {
            "apply" => Ok(OperationKind::Apply),
            "redeem" => Ok(OperationKind::Redeem),
            other => Err(FromSqlError::Other(
                format!("unknown operation kind {other:?}").into(),
            )),
        }
    }
}

impl ToSql for CategoryKind {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(self.as_str().into())
    }
}

impl FromSql for CategoryKind {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        match value.as_str()? {
            "income" => Ok(CategoryKind::Income),
            "expense" => Ok(CategoryKind::Expense),
            other => Err(FromSqlError::Other(
                format!("unknown category kind {other:?}").into(),
            )),
        }
    }
}
