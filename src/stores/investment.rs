//! Defines the investment store trait.

use crate::{
    Error,
    database_id::{DatabaseId, OwnerId},
    investment::{Investment, InvestmentInput},
};

/// Handles the creation and retrieval of investments.
///
/// All reads and writes are scoped to one owner. Application code should not
/// write through this trait directly: the
/// [operation handler](crate::investment::operations) owns investment writes
/// so the mirror transaction stays in lockstep.
pub trait InvestmentStore {
    /// Create a new investment in the store.
    fn create(&mut self, owner_id: OwnerId, input: InvestmentInput) -> Result<Investment, Error>;

    /// Overwrite the stored investment with the same `id` and `owner_id`.
    ///
    /// # Errors
    /// Returns an [Error::UpdateMissingInvestment] if no such investment
    /// exists for the owner.
    fn update(&mut self, investment: &Investment) -> Result<(), Error>;

    /// Delete an investment from the store.
    ///
    /// # Errors
    /// Returns an [Error::DeleteMissingInvestment] if no such investment
    /// exists for the owner.
    fn delete(&mut self, owner_id: OwnerId, id: DatabaseId) -> Result<(), Error>;

    /// Retrieve an investment from the store.
    fn get(&self, owner_id: OwnerId, id: DatabaseId) -> Result<Investment, Error>;

    /// Retrieve all of an owner's investments, newest first.
    fn get_by_owner(&self, owner_id: OwnerId) -> Result<Vec<Investment>, Error>;
}
