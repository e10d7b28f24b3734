//! Linear savings projections from recent history.

use time::{Date, Month};

use crate::{
    aggregation::totals::{display_expense_total, display_income_total},
    transaction::Transaction,
};

/// How many trailing months feed the averages.
const TRAILING_MONTHS: f64 = 3.0;

/// Average monthly cash flow over the trailing three months and its linear
/// extrapolation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SavingsProjection {
    /// Average monthly income.
    pub average_monthly_income: f64,
    /// Average monthly expenses.
    pub average_monthly_expense: f64,
    /// Average monthly net savings: income minus expenses.
    pub average_monthly_savings: f64,
    /// Net savings extrapolated six months out.
    pub six_month_projection: f64,
    /// Net savings extrapolated twelve months out.
    pub twelve_month_projection: f64,
}

/// Project future savings from the trailing three months of activity.
///
/// The window starts at the first day of the month three months before
/// `today` and the averages use a fixed divisor of three, so a sparse month
/// drags the average down rather than being skipped. Auto-generated
/// investment transfers are excluded; moving money into an investment is not
/// spending. The extrapolation is linear, with no seasonality or growth
/// modelling.
pub fn project_savings(transactions: &[Transaction], today: Date) -> SavingsProjection {
    let cutoff = first_of_month_back(today, 3);

    let recent: Vec<Transaction> = transactions
        .iter()
        .filter(|transaction| transaction.date >= cutoff)
        .cloned()
        .collect();

    let average_monthly_income = display_income_total(&recent) / TRAILING_MONTHS;
    let average_monthly_expense = display_expense_total(&recent) / TRAILING_MONTHS;
    let average_monthly_savings = average_monthly_income - average_monthly_expense;

    SavingsProjection {
        average_monthly_income,
        average_monthly_expense,
        average_monthly_savings,
        six_month_projection: average_monthly_savings * 6.0,
        twelve_month_projection: average_monthly_savings * 12.0,
    }
}

/// The first day of the month `months` before the one containing `date`.
fn first_of_month_back(date: Date, months: i32) -> Date {
    let total_months = date.year() * 12 + (date.month() as i32 - 1) - months;
    let year = total_months.div_euclid(12);
    let month = Month::try_from((total_months.rem_euclid(12) + 1) as u8).unwrap();

    Date::from_calendar_date(year, month, 1).unwrap()
}
