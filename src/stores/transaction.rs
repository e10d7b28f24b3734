//! Defines the transaction store trait.

use crate::{
    Error,
    database_id::{DatabaseId, OwnerId},
    transaction::{Transaction, TransactionBuilder},
};

/// Handles the creation and retrieval of transactions.
///
/// All reads and writes are scoped to one owner; implementers must never let
/// records cross owners.
pub trait TransactionStore {
    /// Create a new transaction in the store.
    ///
    /// Implementers must reject negative or non-finite amounts with
    /// [Error::InvalidAmount] and perform no write in that case.
    fn create(&mut self, builder: TransactionBuilder) -> Result<Transaction, Error>;

    /// Overwrite the stored transaction with the same `id` and `owner_id`.
    ///
    /// # Errors
    /// Returns an [Error::UpdateMissingTransaction] if no such transaction
    /// exists for the owner.
    fn update(&mut self, transaction: &Transaction) -> Result<(), Error>;

    /// Delete a transaction from the store.
    ///
    /// # Errors
    /// Returns an [Error::DeleteMissingTransaction] if no such transaction
    /// exists for the owner.
    fn delete(&mut self, owner_id: OwnerId, id: DatabaseId) -> Result<(), Error>;

    /// Retrieve a transaction from the store.
    fn get(&self, owner_id: OwnerId, id: DatabaseId) -> Result<Transaction, Error>;

    /// Retrieve all of an owner's transactions, newest first.
    fn get_by_owner(&self, owner_id: OwnerId) -> Result<Vec<Transaction>, Error>;

    /// Retrieve the mirror transactions of an investment, oldest first.
    ///
    /// A transaction counts as a mirror when its typed link column points at
    /// `investment_id`, or when its note carries the legacy marker
    /// (see [crate::investment::mirror_note]). Zero or one result is the
    /// healthy case; more indicates drift.
    fn mirrors_of(
        &self,
        owner_id: OwnerId,
        investment_id: DatabaseId,
    ) -> Result<Vec<Transaction>, Error>;

    /// Delete every mirror transaction of an investment, returning how many
    /// were removed.
    ///
    /// Matches the same rows as [TransactionStore::mirrors_of]. Removing zero
    /// rows is not an error here; the caller decides whether that is worth
    /// reporting.
    fn delete_mirrors_of(
        &mut self,
        owner_id: OwnerId,
        investment_id: DatabaseId,
    ) -> Result<usize, Error>;
}
