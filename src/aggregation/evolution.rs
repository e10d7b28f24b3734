//! The net worth evolution time series.

use time::Date;

use crate::transaction::{Transaction, TransactionKind};

/// How much of the monthly series to return.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EvolutionWindow {
    /// The last six months with data.
    SixMonths,
    /// The last twelve months with data.
    TwelveMonths,
    /// The whole series.
    All,
}

/// One point of the evolution series: the running totals as of the end of a
/// calendar month.
#[derive(Debug, Clone, PartialEq)]
pub struct EvolutionPoint {
    /// The month, as a date pinned to the first day.
    pub month: Date,
    /// Running cash balance.
    pub balance: f64,
    /// Running total moved into investments (net of redemptions).
    pub invested: f64,
    /// Running net worth: balance plus invested.
    pub net_worth: f64,
}

/// Compute the monthly evolution of balance, invested total and net worth.
///
/// Transactions are processed in date order, maintaining running totals, and
/// one point is emitted per distinct calendar month; when several
/// transactions share a month the last value wins. The invested series moves
/// on auto-generated transfers only: an expense transfer is money entering
/// investments, an income transfer is money leaving them. Because the series
/// derives entirely from transactions, unrealized yield does not appear here.
///
/// `window` slices the tail of the series (last 6, last 12, or everything).
pub fn net_worth_evolution(
    transactions: &[Transaction],
    window: EvolutionWindow,
) -> Vec<EvolutionPoint> {
    let mut sorted: Vec<&Transaction> = transactions.iter().collect();
    sorted.sort_by_key(|transaction| transaction.date);

    let mut points: Vec<EvolutionPoint> = Vec::new();
    let mut balance = 0.0;
    let mut invested = 0.0;

    for transaction in sorted {
        let amount = transaction.amount.abs();

        match transaction.kind {
            TransactionKind::Income => balance += amount,
            TransactionKind::Expense => balance -= amount,
        }

        if transaction.is_auto_generated {
            match transaction.kind {
                TransactionKind::Expense => invested += amount,
                TransactionKind::Income => invested -= amount,
            }
        }

        let month = transaction.date.replace_day(1).unwrap();
        let point = EvolutionPoint {
            month,
            balance,
            invested,
            net_worth: balance + invested,
        };

        match points.last_mut() {
            Some(last) if last.month == month => *last = point,
            _ => points.push(point),
        }
    }

    let keep = match window {
        EvolutionWindow::SixMonths => 6,
        EvolutionWindow::TwelveMonths => 12,
        EvolutionWindow::All => points.len(),
    };

    if points.len() > keep {
        points.split_off(points.len() - keep)
    } else {
        points
    }
}
