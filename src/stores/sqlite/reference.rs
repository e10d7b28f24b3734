//! Implements a SQLite backed reference entity store.

use std::sync::{Arc, Mutex};

use rusqlite::{Connection, OptionalExtension, Row};

use crate::{
    Error,
    database_id::OwnerId,
    reference::{Category, CategoryKind, PaymentMethod, ReferenceName, Vendor},
    stores::ReferenceStore,
};

/// Stores vendors, payment methods and categories in a SQLite database.
#[derive(Debug, Clone)]
pub struct SqliteReferenceStore {
    connection: Arc<Mutex<Connection>>,
}

impl SqliteReferenceStore {
    /// Create a new store for the SQLite `connection`.
    pub fn new(connection: Arc<Mutex<Connection>>) -> Self {
        Self { connection }
    }
}

impl ReferenceStore for SqliteReferenceStore {
    /// Create a new vendor in the database.
    ///
    /// # Errors
    /// Returns an [Error::SqlError] if there is an SQL error.
    fn create_vendor(&mut self, owner_id: OwnerId, name: ReferenceName) -> Result<Vendor, Error> {
        let vendor = self
            .connection
            .lock()
            .unwrap()
            .prepare(
                "INSERT INTO vendor (owner_id, name) VALUES (?1, ?2)
                 RETURNING id, owner_id, name",
            )?
            .query_row((owner_id.as_i64(), name.as_ref()), map_vendor_row)?;

        Ok(vendor)
    }

    /// Find an owner's vendor by case-insensitive name match.
    ///
    /// # Errors
    /// Returns an [Error::SqlError] if there is an SQL error.
    fn find_vendor_by_name(
        &self,
        owner_id: OwnerId,
        name: &str,
    ) -> Result<Option<Vendor>, Error> {
        let vendor = self
            .connection
            .lock()
            .unwrap()
            .prepare(
                "SELECT id, owner_id, name FROM vendor
                 WHERE owner_id = ?1 AND name = ?2 COLLATE NOCASE",
            )?
            .query_row((owner_id.as_i64(), name), map_vendor_row)
            .optional()?;

        Ok(vendor)
    }

    /// Get all of an owner's vendors, sorted by name.
    ///
    /// # Errors
    /// Returns an [Error::SqlError] if there is an SQL error.
    fn get_vendors(&self, owner_id: OwnerId) -> Result<Vec<Vendor>, Error> {
        self.connection
            .lock()
            .unwrap()
            .prepare("SELECT id, owner_id, name FROM vendor WHERE owner_id = ?1 ORDER BY name")?
            .query_map([owner_id.as_i64()], map_vendor_row)?
            .map(|maybe_vendor| maybe_vendor.map_err(|error| error.into()))
            .collect()
    }

    /// Create a new payment method in the database.
    ///
    /// # Errors
    /// Returns an [Error::SqlError] if there is an SQL error.
    fn create_payment_method(
        &mut self,
        owner_id: OwnerId,
        name: ReferenceName,
    ) -> Result<PaymentMethod, Error> {
        let method = self
            .connection
            .lock()
            .unwrap()
            .prepare(
                "INSERT INTO payment_method (owner_id, name) VALUES (?1, ?2)
                 RETURNING id, owner_id, name",
            )?
            .query_row((owner_id.as_i64(), name.as_ref()), map_payment_method_row)?;

        Ok(method)
    }

    /// Find an owner's payment method by case-insensitive name match.
    ///
    /// # Errors
    /// Returns an [Error::SqlError] if there is an SQL error.
    fn find_payment_method_by_name(
        &self,
        owner_id: OwnerId,
        name: &str,
    ) -> Result<Option<PaymentMethod>, Error> {
        let method = self
            .connection
            .lock()
            .unwrap()
            .prepare(
                "SELECT id, owner_id, name FROM payment_method
                 WHERE owner_id = ?1 AND name = ?2 COLLATE NOCASE",
            )?
            .query_row((owner_id.as_i64(), name), map_payment_method_row)
            .optional()?;

        Ok(method)
    }

    /// Get all of an owner's payment methods, sorted by name.
    ///
    /// # Errors
    /// Returns an [Error::SqlError] if there is an SQL error.
    fn get_payment_methods(&self, owner_id: OwnerId) -> Result<Vec<PaymentMethod>, Error> {
        self.connection
            .lock()
            .unwrap()
            .prepare(
                "SELECT id, owner_id, name FROM payment_method
                 WHERE owner_id = ?1 ORDER BY name",
            )?
            .query_map([owner_id.as_i64()], map_payment_method_row)?
            .map(|maybe_method| maybe_method.map_err(|error| error.into()))
            .collect()
    }

    /// Create a new category in the database.
    ///
    /// # Errors
    /// Returns an [Error::SqlError] if there is an SQL error.
    fn create_category(
        &mut self,
        owner_id: OwnerId,
        name: ReferenceName,
        kind: CategoryKind,
        icon: &str,
    ) -> Result<Category, Error> {
        let category = self
            .connection
            .lock()
            .unwrap()
            .prepare(
                "INSERT INTO category (owner_id, name, kind, icon) VALUES (?1, ?2, ?3, ?4)
                 RETURNING id, owner_id, name, kind, icon",
            )?
            .query_row(
                (owner_id.as_i64(), name.as_ref(), kind, icon),
                map_category_row,
            )?;

        Ok(category)
    }

    /// Find an owner's category by case-insensitive name match and kind.
    ///
    /// # Errors
    /// Returns an [Error::SqlError] if there is an SQL error.
    fn find_category_by_name(
        &self,
        owner_id: OwnerId,
        name: &str,
        kind: CategoryKind,
    ) -> Result<Option<Category>, Error> {
        let category = self
            .connection
            .lock()
            .unwrap()
            .prepare(
                "SELECT id, owner_id, name, kind, icon FROM category
                 WHERE owner_id = ?1 AND kind = ?2 AND name = ?3 COLLATE NOCASE",
            )?
            .query_row((owner_id.as_i64(), kind, name), map_category_row)
            .optional()?;

        Ok(category)
    }

    /// Get all of an owner's categories, sorted by name.
    ///
    /// # Errors
    /// Returns an [Error::SqlError] if there is an SQL error.
    fn get_categories(&self, owner_id: OwnerId) -> Result<Vec<Category>, Error> {
        self.connection
            .lock()
            .unwrap()
            .prepare(
                "SELECT id, owner_id, name, kind, icon FROM category
                 WHERE owner_id = ?1 ORDER BY name",
            )?
            .query_map([owner_id.as_i64()], map_category_row)?
            .map(|maybe_category| maybe_category.map_err(|error| error.into()))
            .collect()
    }
}

/// Create the vendor, payment method and category tables in the database.
///
/// # Errors
/// Returns an error if a table cannot be created or if there is an SQL error.
pub(super) fn create_reference_tables(connection: &Connection) -> Result<(), Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS vendor (
                id INTEGER PRIMARY KEY,
                owner_id INTEGER NOT NULL,
                name TEXT NOT NULL
                )",
        (),
    )?;
    connection.execute(
        "CREATE TABLE IF NOT EXISTS payment_method (
                id INTEGER PRIMARY KEY,
                owner_id INTEGER NOT NULL,
                name TEXT NOT NULL
                )",
        (),
    )?;
    connection.execute(
        "CREATE TABLE IF NOT EXISTS category (
                id INTEGER PRIMARY KEY,
                owner_id INTEGER NOT NULL,
                name TEXT NOT NULL,
                kind TEXT NOT NULL,
                icon TEXT NOT NULL
                )",
        (),
    )?;

    connection.execute(
        "CREATE INDEX IF NOT EXISTS idx_vendor_owner ON vendor(owner_id)",
        (),
    )?;
    connection.execute(
        "CREATE INDEX IF NOT EXISTS idx_payment_method_owner ON payment_method(owner_id)",
        (),
    )?;
    connection.execute(
        "CREATE INDEX IF NOT EXISTS idx_category_owner ON category(owner_id)",
        (),
    )?;

    Ok(())
}

/// Map a database row to a [Vendor].
fn map_vendor_row(row: &Row) -> Result<Vendor, rusqlite::Error> {
    let id = row.get(0)?;
    let owner_id = OwnerId::new(row.get(1)?);
    let raw_name: String = row.get(2)?;

    Ok(Vendor {
        id,
        owner_id,
        name: ReferenceName::new_unchecked(&raw_name),
    })
}

/// Map a database row to a [PaymentMethod].
fn map_payment_method_row(row: &Row) -> Result<PaymentMethod, rusqlite::Error> {
    let id = row.get(0)?;
    let owner_id = OwnerId::new(row.get(1)?);
    let raw_name: String = row.get(2)?;

    Ok(PaymentMethod {
        id,
        owner_id,
        name: ReferenceName::new_unchecked(&raw_name),
    })
}

/// Map a database row to a [Category].
fn map_category_row(row: &Row) -> Result<Category, rusqlite::Error> {
    let id = row.get(0)?;
    let owner_id = OwnerId::new(row.get(1)?);
    let raw_name: String = row.get(2)?;
    let kind = row.get(3)?;
    let icon = row.get(4)?;

    Ok(Category {
        id,
        owner_id,
        name: ReferenceName::new_unchecked(&raw_name),
        kind,
        icon,
    })
}
