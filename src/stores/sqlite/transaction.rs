//! Implements a SQLite backed transaction store.

use std::sync::{Arc, Mutex};

use rusqlite::{Connection, Row};

use crate::{
    Error,
    database_id::{DatabaseId, OwnerId},
    investment::mirror_note,
    stores::TransactionStore,
    transaction::{Transaction, TransactionBuilder},
};

/// Stores transactions in a SQLite database.
#[derive(Debug, Clone)]
pub struct SqliteTransactionStore {
    connection: Arc<Mutex<Connection>>,
}

impl SqliteTransactionStore {
    /// Create a new store for the SQLite `connection`.
    pub fn new(connection: Arc<Mutex<Connection>>) -> Self {
        Self { connection }
    }
}

const TRANSACTION_COLUMNS: &str = "id, owner_id, kind, amount, date, vendor_id, \
     payment_method_id, category_id, note, tags, is_auto_generated, source_investment_id";

impl TransactionStore for SqliteTransactionStore {
    /// Create a new transaction in the database.
    ///
    /// # Errors
    /// This function will return an:
    /// - [Error::InvalidAmount] if the amount is negative or not finite,
    /// - [Error::JsonSerializationError] if the tag list cannot be serialized,
    /// - or [Error::SqlError] if there is some other SQL error.
    fn create(&mut self, builder: TransactionBuilder) -> Result<Transaction, Error> {
        if !builder.amount.is_finite() || builder.amount < 0.0 {
            return Err(Error::InvalidAmount(format!(
                "transaction amounts must be non-negative, got {}",
                builder.amount
            )));
        }

        let tags = serde_json::to_string(&builder.tags)
            .map_err(|error| Error::JsonSerializationError(error.to_string()))?;

        let transaction = self
            .connection
            .lock()
            .unwrap()
            .prepare(&format!(
                "INSERT INTO \"transaction\" (owner_id, kind, amount, date, vendor_id, \
                 payment_method_id, category_id, note, tags, is_auto_generated, source_investment_id)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)
                 RETURNING {TRANSACTION_COLUMNS}"
            ))?
            .query_row(
                (
                    builder.owner_id.as_i64(),
                    builder.kind,
                    builder.amount,
                    builder.date,
                    builder.vendor_id,
                    builder.payment_method_id,
                    builder.category_id,
                    builder.note,
                    tags,
                    builder.is_auto_generated,
                    builder.source_investment_id,
                ),
                map_transaction_row,
            )?;

        Ok(transaction)
    }

    /// Overwrite the stored transaction with the same `id` and `owner_id`.
    ///
    /// # Errors
    /// This function will return an:
    /// - [Error::UpdateMissingTransaction] if the transaction is not in the
    ///   database,
    /// - [Error::JsonSerializationError] if the tag list cannot be serialized,
    /// - or [Error::SqlError] if there is some other SQL error.
    fn update(&mut self, transaction: &Transaction) -> Result<(), Error> {
        let tags = serde_json::to_string(&transaction.tags)
            .map_err(|error| Error::JsonSerializationError(error.to_string()))?;

        let rows_changed = self.connection.lock().unwrap().execute(
            "UPDATE \"transaction\"
             SET kind = ?3, amount = ?4, date = ?5, vendor_id = ?6, payment_method_id = ?7,
                 category_id = ?8, note = ?9, tags = ?10, is_auto_generated = ?11,
                 source_investment_id = ?12
             WHERE id = ?1 AND owner_id = ?2",
            (
                transaction.id,
                transaction.owner_id.as_i64(),
                transaction.kind,
                transaction.amount,
                transaction.date,
                transaction.vendor_id,
                transaction.payment_method_id,
                transaction.category_id,
                &transaction.note,
                tags,
                transaction.is_auto_generated,
                transaction.source_investment_id,
            ),
        )?;

        if rows_changed == 0 {
            return Err(Error::UpdateMissingTransaction);
        }

        Ok(())
    }

    /// Delete a transaction from the database.
    ///
    /// # Errors
    /// This function will return an:
    /// - [Error::DeleteMissingTransaction] if the transaction is not in the
    ///   database,
    /// - or [Error::SqlError] if there is some other SQL error.
    fn delete(&mut self, owner_id: OwnerId, id: DatabaseId) -> Result<(), Error> {
        let rows_changed = self.connection.lock().unwrap().execute(
            "DELETE FROM \"transaction\" WHERE id = ?1 AND owner_id = ?2",
            (id, owner_id.as_i64()),
        )?;

        if rows_changed == 0 {
            return Err(Error::DeleteMissingTransaction);
        }

        Ok(())
    }

    /// Retrieve a transaction in the database by its `id`.
    ///
    /// # Errors
    /// This function will return an:
    /// - [Error::NotFound] if `id` does not refer to the owner's transaction,
    /// - or [Error::SqlError] if there is some other SQL error.
    fn get(&self, owner_id: OwnerId, id: DatabaseId) -> Result<Transaction, Error> {
        let transaction = self
            .connection
            .lock()
            .unwrap()
            .prepare(&format!(
                "SELECT {TRANSACTION_COLUMNS} FROM \"transaction\" WHERE id = ?1 AND owner_id = ?2"
            ))?
            .query_row((id, owner_id.as_i64()), map_transaction_row)?;

        Ok(transaction)
    }

    /// Retrieve all of an owner's transactions, newest first.
    ///
    /// # Errors
    /// Returns an [Error::SqlError] if there is an SQL error.
    fn get_by_owner(&self, owner_id: OwnerId) -> Result<Vec<Transaction>, Error> {
        self.connection
            .lock()
            .unwrap()
            .prepare(&format!(
                "SELECT {TRANSACTION_COLUMNS} FROM \"transaction\"
                 WHERE owner_id = ?1
                 ORDER BY date DESC, id DESC"
            ))?
            .query_map([owner_id.as_i64()], map_transaction_row)?
            .map(|maybe_transaction| maybe_transaction.map_err(|error| error.into()))
            .collect()
    }

    /// Retrieve the mirror transactions of an investment, oldest first.
    ///
    /// Matches the typed link column as well as the legacy note marker so
    /// rows written before the column existed are still found.
    ///
    /// # Errors
    /// Returns an [Error::SqlError] if there is an SQL error.
    fn mirrors_of(
        &self,
        owner_id: OwnerId,
        investment_id: DatabaseId,
    ) -> Result<Vec<Transaction>, Error> {
        self.connection
            .lock()
            .unwrap()
            .prepare(&format!(
                "SELECT {TRANSACTION_COLUMNS} FROM \"transaction\"
                 WHERE owner_id = ?1 AND (source_investment_id = ?2 OR note LIKE ?3)
                 ORDER BY id"
            ))?
            .query_map(
                (
                    owner_id.as_i64(),
                    investment_id,
                    format!("%{}", mirror_note(investment_id)),
                ),
                map_transaction_row,
            )?
            .map(|maybe_transaction| maybe_transaction.map_err(|error| error.into()))
            .collect()
    }

    /// Delete every mirror transaction of an investment.
    ///
    /// # Errors
    /// Returns an [Error::SqlError] if there is an SQL error.
    fn delete_mirrors_of(
        &mut self,
        owner_id: OwnerId,
        investment_id: DatabaseId,
    ) -> Result<usize, Error> {
        let rows_changed = self.connection.lock().unwrap().execute(
            "DELETE FROM \"transaction\"
             WHERE owner_id = ?1 AND (source_investment_id = ?2 OR note LIKE ?3)",
            (
                owner_id.as_i64(),
                investment_id,
                format!("%{}", mirror_note(investment_id)),
            ),
        )?;

        Ok(rows_changed)
    }
}

/// Create the transaction table and its indexes in the database.
///
/// # Errors
/// Returns an error if the table cannot be created or if there is an SQL error.
pub(super) fn create_transaction_table(connection: &Connection) -> Result<(), Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS \"transaction\" (
                id INTEGER PRIMARY KEY,
                owner_id INTEGER NOT NULL,
                kind TEXT NOT NULL,
                amount REAL NOT NULL,
                date TEXT NOT NULL,
                vendor_id INTEGER NOT NULL,
                payment_method_id INTEGER NOT NULL,
                category_id INTEGER NOT NULL,
                note TEXT NOT NULL DEFAULT '',
                tags TEXT NOT NULL DEFAULT '[]',
                is_auto_generated INTEGER NOT NULL DEFAULT 0,
                source_investment_id INTEGER
                )",
        (),
    )?;

    // Composite indexes for the owner-scoped read paths and the mirror lookup.
    connection.execute(
        "CREATE INDEX IF NOT EXISTS idx_transaction_owner_date
         ON \"transaction\"(owner_id, date)",
        (),
    )?;
    connection.execute(
        "CREATE INDEX IF NOT EXISTS idx_transaction_owner_source
         ON \"transaction\"(owner_id, source_investment_id)",
        (),
    )?;

    Ok(())
}

/// Map a database row to a [Transaction].
fn map_transaction_row(row: &Row) -> Result<Transaction, rusqlite::Error> {
    let id = row.get(0)?;
    let owner_id = OwnerId::new(row.get(1)?);
    let kind = row.get(2)?;
    let amount = row.get(3)?;
    let date = row.get(4)?;
    let vendor_id = row.get(5)?;
    let payment_method_id = row.get(6)?;
    let category_id = row.get(7)?;
    let note = row.get(8)?;
    let raw_tags: String = row.get(9)?;
    let is_auto_generated = row.get(10)?;
    let source_investment_id = row.get(11)?;

    // Tags are display-only; a corrupt tag list should not make the row
    // unreadable.
    let tags = serde_json::from_str(&raw_tags).unwrap_or_default();

    Ok(Transaction {
        id,
        owner_id,
        kind,
        amount,
        date,
        vendor_id,
        payment_method_id,
        category_id,
        note,
        tags,
        is_auto_generated,
        source_investment_id,
    })
}

#[cfg(test)]
mod store_tests {
    use time::macros::date;

    use crate::{
        Error,
        database_id::OwnerId,
        stores::{TransactionStore, sqlite::open_in_memory},
        transaction::{Tag, Transaction, TransactionKind},
    };

    use super::SqliteTransactionStore;

    fn get_test_store() -> SqliteTransactionStore {
        SqliteTransactionStore::new(open_in_memory().unwrap())
    }

    #[test]
    fn create_round_trips_all_fields() {
        let mut store = get_test_store();
        let owner = OwnerId::new(1);
        let tags = vec![Tag {
            label: "holiday".to_owned(),
            color: "#3B82F6".to_owned(),
        }];

        let created = store
            .create(
                Transaction::build(owner, TransactionKind::Expense, 42.5, date!(2025 - 03 - 14))
                    .vendor_id(2)
                    .payment_method_id(3)
                    .category_id(4)
                    .note("flights")
                    .tags(tags.clone()),
            )
            .expect("Could not create transaction");

        let fetched = store.get(owner, created.id).unwrap();
        assert_eq!(created, fetched);
        assert_eq!(fetched.tags, tags);
        assert_eq!(fetched.note, "flights");
        assert!(!fetched.is_auto_generated);
    }

    #[test]
    fn create_rejects_negative_amount() {
        let mut store = get_test_store();

        let result = store.create(Transaction::build(
            OwnerId::new(1),
            TransactionKind::Expense,
            -1.0,
            date!(2025 - 03 - 14),
        ));

        assert!(matches!(result, Err(Error::InvalidAmount(_))));
        assert!(store.get_by_owner(OwnerId::new(1)).unwrap().is_empty());
    }

    #[test]
    fn get_does_not_leak_across_owners() {
        let mut store = get_test_store();
        let created = store
            .create(Transaction::build(
                OwnerId::new(1),
                TransactionKind::Income,
                100.0,
                date!(2025 - 03 - 14),
            ))
            .unwrap();

        let result = store.get(OwnerId::new(2), created.id);

        assert_eq!(result, Err(Error::NotFound));
    }

    #[test]
    fn get_by_owner_returns_newest_first() {
        let mut store = get_test_store();
        let owner = OwnerId::new(1);
        store
            .create(Transaction::build(
                owner,
                TransactionKind::Income,
                1.0,
                date!(2025 - 01 - 01),
            ))
            .unwrap();
        store
            .create(Transaction::build(
                owner,
                TransactionKind::Income,
                2.0,
                date!(2025 - 03 - 01),
            ))
            .unwrap();
        store
            .create(Transaction::build(
                owner,
                TransactionKind::Income,
                3.0,
                date!(2025 - 02 - 01),
            ))
            .unwrap();

        let transactions = store.get_by_owner(owner).unwrap();

        let amounts: Vec<f64> = transactions.iter().map(|t| t.amount).collect();
        assert_eq!(amounts, vec![2.0, 3.0, 1.0]);
    }

    #[test]
    fn update_overwrites_stored_row() {
        let mut store = get_test_store();
        let owner = OwnerId::new(1);
        let mut transaction = store
            .create(Transaction::build(
                owner,
                TransactionKind::Expense,
                10.0,
                date!(2025 - 01 - 01),
            ))
            .unwrap();

        transaction.amount = 25.0;
        transaction.kind = TransactionKind::Income;
        store.update(&transaction).unwrap();

        let fetched = store.get(owner, transaction.id).unwrap();
        assert_eq!(fetched.amount, 25.0);
        assert_eq!(fetched.kind, TransactionKind::Income);
    }

    #[test]
    fn update_fails_for_missing_transaction() {
        let mut store = get_test_store();
        let owner = OwnerId::new(1);
        let mut transaction = store
            .create(Transaction::build(
                owner,
                TransactionKind::Expense,
                10.0,
                date!(2025 - 01 - 01),
            ))
            .unwrap();
        transaction.id += 1;

        let result = store.update(&transaction);

        assert_eq!(result, Err(Error::UpdateMissingTransaction));
    }

    #[test]
    fn delete_fails_for_missing_transaction() {
        let mut store = get_test_store();

        let result = store.delete(OwnerId::new(1), 1337);

        assert_eq!(result, Err(Error::DeleteMissingTransaction));
    }

    #[test]
    fn mirrors_of_matches_typed_link() {
        let mut store = get_test_store();
        let owner = OwnerId::new(1);
        let mirror = store
            .create(
                Transaction::build(owner, TransactionKind::Expense, 1000.0, date!(2025 - 01 - 15))
                    .note(&crate::investment::mirror_note(7))
                    .mirror_of(7),
            )
            .unwrap();
        store
            .create(Transaction::build(
                owner,
                TransactionKind::Expense,
                50.0,
                date!(2025 - 01 - 15),
            ))
            .unwrap();

        let mirrors = store.mirrors_of(owner, 7).unwrap();

        assert_eq!(mirrors, vec![mirror]);
    }

    #[test]
    fn mirrors_of_matches_legacy_note_marker() {
        let store = get_test_store();
        let owner = OwnerId::new(1);
        // A row written before the typed link column existed: marker in the
        // note, NULL source_investment_id.
        insert_legacy_mirror(&store, owner, 7);

        let mirrors = store.mirrors_of(owner, 7).unwrap();

        assert_eq!(mirrors.len(), 1);
        assert_eq!(mirrors[0].source_investment_id, None);
        assert_eq!(crate::investment::mirror_source(&mirrors[0]), Some(7));
    }

    #[test]
    fn mirrors_of_does_not_match_other_investment_ids() {
        let store = get_test_store();
        let owner = OwnerId::new(1);
        insert_legacy_mirror(&store, owner, 42);
        insert_legacy_mirror(&store, owner, 142);

        let mirrors = store.mirrors_of(owner, 42).unwrap();

        assert_eq!(mirrors.len(), 1);
        assert_eq!(crate::investment::mirror_source(&mirrors[0]), Some(42));
    }

    #[test]
    fn delete_mirrors_of_removes_duplicates_and_reports_count() {
        let mut store = get_test_store();
        let owner = OwnerId::new(1);
        insert_legacy_mirror(&store, owner, 7);
        store
            .create(
                Transaction::build(owner, TransactionKind::Expense, 1000.0, date!(2025 - 01 - 15))
                    .note(&crate::investment::mirror_note(7))
                    .mirror_of(7),
            )
            .unwrap();

        let removed = store.delete_mirrors_of(owner, 7).unwrap();

        assert_eq!(removed, 2);
        assert!(store.mirrors_of(owner, 7).unwrap().is_empty());
    }

    fn insert_legacy_mirror(store: &SqliteTransactionStore, owner: OwnerId, investment_id: i64) {
        store
            .connection
            .lock()
            .unwrap()
            .execute(
                "INSERT INTO \"transaction\"
                 (owner_id, kind, amount, date, vendor_id, payment_method_id, category_id,
                  note, is_auto_generated)
                 VALUES (?1, 'expense', 1000.0, '2024-11-02', 0, 0, 0, ?2, 1)",
                (
                    owner.as_i64(),
                    crate::investment::mirror_note(investment_id),
                ),
            )
            .unwrap();
    }
}
