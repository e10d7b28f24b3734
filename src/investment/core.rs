//! Defines the core data model for investment operations.

use serde::{Deserialize, Serialize};
use time::Date;

use crate::{
    Error,
    database_id::{DatabaseId, OwnerId},
    transaction::TransactionKind,
};

/// The direction of an investment operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Hash)]
#[serde(rename_all = "lowercase")]
pub enum OperationKind {
    /// Money applied to (deposited into) an investment vehicle.
    Apply,
    /// Money redeemed (withdrawn) from an investment vehicle.
    Redeem,
}

impl OperationKind {
    /// The lowercase text form stored in the ledger.
    pub fn as_str(&self) -> &'static str {
        match self {
            OperationKind::Apply => "apply",
            OperationKind::Redeem => "redeem",
        }
    }

    /// The cash-flow direction of this operation's mirror transaction.
    ///
    /// Applying money is cash leaving the account (an expense); redeeming is
    /// cash coming back in (income).
    pub fn mirror_kind(&self) -> TransactionKind {
        match self {
            OperationKind::Apply => TransactionKind::Expense,
            OperationKind::Redeem => TransactionKind::Income,
        }
    }
}

/// An application or redemption against an investment vehicle.
///
/// Every investment is kept in lockstep with a single auto-generated mirror
/// [Transaction](crate::transaction::Transaction) representing its cash-flow
/// effect. Investments are only ever written through
/// [the operation handler](crate::investment::operations), which owns that
/// synchronization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Investment {
    /// The ID of the investment.
    pub id: DatabaseId,
    /// The owner the investment belongs to.
    pub owner_id: OwnerId,
    /// Whether this is an application or a redemption.
    pub operation: OperationKind,
    /// Free-text classification of the asset, e.g. 'Equities'.
    pub asset_category: String,
    /// The institution holding the investment, e.g. a broker name.
    pub institution: String,
    /// The amount moved, always a positive magnitude regardless of the
    /// operation kind.
    pub principal: f64,
    /// Realized gain or loss attributable to this operation. Signed, defaults
    /// to zero.
    pub yield_amount: f64,
    /// When the operation happened.
    pub date: Date,
    /// Free text annotation.
    pub note: String,
}

/// The user-submitted fields for creating or updating an investment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InvestmentInput {
    /// Whether this is an application or a redemption.
    pub operation: OperationKind,
    /// Free-text classification of the asset.
    pub asset_category: String,
    /// The institution holding the investment.
    pub institution: String,
    /// The amount moved, a positive magnitude.
    pub principal: f64,
    /// Realized gain or loss. Signed.
    pub yield_amount: f64,
    /// When the operation happened.
    pub date: Date,
    /// Free text annotation.
    pub note: String,
}

impl InvestmentInput {
    /// Check the submitted fields before any write happens.
    ///
    /// # Errors
    /// This function will return an:
    /// - [Error::InvalidAmount] if `principal` is not a positive, finite
    ///   number or `yield_amount` is not finite,
    /// - or [Error::EmptyName] if `institution` or `asset_category` is blank.
    pub fn validate(&self) -> Result<(), Error> {
        if !self.principal.is_finite() || self.principal <= 0.0 {
            return Err(Error::InvalidAmount(format!(
                "principal must be a positive amount, got {}",
                self.principal
            )));
        }

        if !self.yield_amount.is_finite() {
            return Err(Error::InvalidAmount(format!(
                "yield must be a finite amount, got {}",
                self.yield_amount
            )));
        }

        if self.institution.trim().is_empty() || self.asset_category.trim().is_empty() {
            return Err(Error::EmptyName);
        }

        Ok(())
    }
}
