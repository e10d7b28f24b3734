//! Income, expense, balance and net worth totals.

use crate::{
    investment::{Investment, OperationKind},
    transaction::{Transaction, TransactionKind},
};

/// The sum of all income amounts in `transactions`.
pub fn income_total(transactions: &[Transaction]) -> f64 {
    transactions
        .iter()
        .filter(|transaction| transaction.kind == TransactionKind::Income)
        .map(|transaction| transaction.amount)
        .sum()
}

/// The sum of all expense amounts in `transactions`.
///
/// Amounts are stored as non-negative magnitudes, but rows imported from
/// older data may carry signed amounts, so the absolute value is taken.
pub fn expense_total(transactions: &[Transaction]) -> f64 {
    transactions
        .iter()
        .filter(|transaction| transaction.kind == TransactionKind::Expense)
        .map(|transaction| transaction.amount.abs())
        .sum()
}

/// The owner's current cash balance: income minus expenses over **all**
/// transactions, including auto-generated investment transfers.
///
/// The transfers are what keep cash-in-hand correct after money moves into
/// or out of investments, so they must not be filtered here.
pub fn current_balance(transactions: &[Transaction]) -> f64 {
    income_total(transactions) - expense_total(transactions)
}

/// The income total for period displays, excluding investment transfers.
pub fn display_income_total(transactions: &[Transaction]) -> f64 {
    transactions
        .iter()
        .filter(|transaction| {
            !transaction.is_auto_generated && transaction.kind == TransactionKind::Income
        })
        .map(|transaction| transaction.amount)
        .sum()
}

/// The expense total for period displays, excluding investment transfers.
pub fn display_expense_total(transactions: &[Transaction]) -> f64 {
    transactions
        .iter()
        .filter(|transaction| {
            !transaction.is_auto_generated && transaction.kind == TransactionKind::Expense
        })
        .map(|transaction| transaction.amount.abs())
        .sum()
}

/// Summed movements across an owner's investments.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct InvestmentTotals {
    /// Total principal applied (deposited).
    pub applied: f64,
    /// Total principal redeemed (withdrawn).
    pub redeemed: f64,
    /// Cumulative realized yield across all operations.
    pub yield_total: f64,
}

impl InvestmentTotals {
    /// Principal currently held in investments: applied minus redeemed.
    pub fn invested_balance(&self) -> f64 {
        self.applied - self.redeemed
    }

    /// What the investments are worth: invested balance plus realized yield.
    pub fn invested_worth(&self) -> f64 {
        self.invested_balance() + self.yield_total
    }
}

/// Sum the principal and yield movements across `investments`.
pub fn investment_totals(investments: &[Investment]) -> InvestmentTotals {
    let mut totals = InvestmentTotals::default();

    for investment in investments {
        match investment.operation {
            OperationKind::Apply => totals.applied += investment.principal,
            OperationKind::Redeem => totals.redeemed += investment.principal,
        }
        totals.yield_total += investment.yield_amount;
    }

    totals
}

/// The owner's net worth: cash balance plus invested principal plus
/// cumulative realized yield.
pub fn net_worth(transactions: &[Transaction], investments: &[Investment]) -> f64 {
    current_balance(transactions) + investment_totals(investments).invested_worth()
}
