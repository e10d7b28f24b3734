//! Defines the crate level error type and conversions from store errors.

use crate::currency::format_currency;

/// The errors that may occur in the ledger core.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum Error {
    /// An empty or blank string was used where a display name is required
    /// (vendor, payment method, category, institution).
    #[error("a name cannot be empty")]
    EmptyName,

    /// An amount failed validation (negative, non-finite, or otherwise not a
    /// usable decimal).
    ///
    /// Callers should pass a short description of the offending value.
    #[error("invalid amount: {0}")]
    InvalidAmount(String),

    /// An apply operation asked for more money than the owner's current
    /// balance holds.
    ///
    /// Carries the requested and available amounts so the caller can show the
    /// user how much is actually available. No writes are performed when this
    /// error is returned.
    #[error(
        "insufficient balance: requested {} but only {} is available",
        format_currency(*.requested),
        format_currency(*.available)
    )]
    InsufficientBalance {
        /// The principal the operation asked to move.
        requested: f64,
        /// The owner's current balance at the time of the check.
        available: f64,
    },

    /// The requested record could not be found for this owner.
    ///
    /// Internally, this error may occur when a query returns no rows.
    #[error("the requested record could not be found")]
    NotFound,

    /// Tried to update an investment that does not exist
    #[error("tried to update an investment that is not in the store")]
    UpdateMissingInvestment,

    /// Tried to delete an investment that does not exist
    #[error("tried to delete an investment that is not in the store")]
    DeleteMissingInvestment,

    /// Tried to update a transaction that does not exist
    #[error("tried to update a transaction that is not in the store")]
    UpdateMissingTransaction,

    /// Tried to delete a transaction that does not exist
    #[error("tried to delete a transaction that is not in the store")]
    DeleteMissingTransaction,

    /// An error occurred while serializing a struct as JSON
    #[error("could not serialize as JSON: {0}")]
    JsonSerializationError(String),

    /// An unhandled/unexpected SQL error.
    #[error("an unexpected SQL error occurred: {0}")]
    SqlError(rusqlite::Error),
}

impl From<rusqlite::Error> for Error {
    fn from(value: rusqlite::Error) -> Self {
        match value {
            rusqlite::Error::QueryReturnedNoRows => Error::NotFound,
            error => {
                tracing::error!("an unhandled SQL error occurred: {}", error);
                Error::SqlError(error)
            }
        }
    }
}
