//! Provisioning of the well-known reference entities used for investment
//! transfers.
//!
//! Mirror transactions need a vendor, a category and a payment method like
//! any other transaction. The vendor is the investment's institution, but
//! the category and payment method are sentinels reserved for investment
//! movements so that read paths can label them consistently. They are
//! provisioned once per owner by an explicit, idempotent bootstrap step
//! rather than ad hoc inside the operation handler.

use crate::{
    Error,
    database_id::{DatabaseId, OwnerId},
    reference::{
        domain::CategoryKind,
        resolver::{ReferenceValue, resolve_category, resolve_payment_method},
    },
    stores::ReferenceStore,
    transaction::TransactionKind,
};

/// The display name of the sentinel category for investment movements.
///
/// Two categories carry this name per owner, one per [CategoryKind], because
/// an apply mirrors as an expense and a redeem mirrors as income.
pub const INVESTMENT_CATEGORY_NAME: &str = "Investment Movement";

/// The display name of the sentinel payment method for investment transfers.
pub const INVESTMENT_PAYMENT_METHOD_NAME: &str = "Investment Transfer";

/// The resolved IDs of an owner's investment sentinel entities.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvestmentSentinels {
    /// The 'Investment Movement' category classifying expense mirrors.
    pub expense_category_id: DatabaseId,
    /// The 'Investment Movement' category classifying income mirrors.
    pub income_category_id: DatabaseId,
    /// The 'Investment Transfer' payment method.
    pub payment_method_id: DatabaseId,
}

impl InvestmentSentinels {
    /// The sentinel category that classifies a mirror transaction of `kind`.
    pub fn category_for(&self, kind: TransactionKind) -> DatabaseId {
        match kind {
            TransactionKind::Income => self.income_category_id,
            TransactionKind::Expense => self.expense_category_id,
        }
    }
}

/// Find or create the owner's investment sentinel entities.
///
/// Calling this repeatedly returns the same IDs and creates nothing new.
///
/// # Errors
/// Returns an [Error::SqlError] if the store fails.
pub fn ensure_investment_sentinels<R>(
    store: &mut R,
    owner_id: OwnerId,
) -> Result<InvestmentSentinels, Error>
where
    R: ReferenceStore,
{
    let expense_category_id = resolve_category(
        store,
        owner_id,
        ReferenceValue::Name(INVESTMENT_CATEGORY_NAME.to_owned()),
        CategoryKind::Expense,
    )?;
    let income_category_id = resolve_category(
        store,
        owner_id,
        ReferenceValue::Name(INVESTMENT_CATEGORY_NAME.to_owned()),
        CategoryKind::Income,
    )?;
    let payment_method_id = resolve_payment_method(
        store,
        owner_id,
        ReferenceValue::Name(INVESTMENT_PAYMENT_METHOD_NAME.to_owned()),
    )?;

    Ok(InvestmentSentinels {
        expense_category_id,
        income_category_id,
        payment_method_id,
    })
}
