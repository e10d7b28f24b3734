//! Pure aggregation functions over an owner's ledger.
//!
//! Everything in this module is side-effect free: the caller fetches the
//! owner's transactions and investments from the stores and these functions
//! turn them into display-ready numbers. One rule is applied consistently
//! throughout: auto-generated investment-transfer entries are excluded from
//! category/vendor breakdowns and period income/expense displays (moving
//! money into an investment is not spending), but included in balance and
//! net-worth computations (it is real cash movement). The filter always
//! checks the `is_auto_generated` flag, never the category name.

mod breakdown;
mod evolution;
mod projection;
mod totals;

pub use breakdown::{
    BreakdownEntry, UNRESOLVED_LABEL, category_breakdown, category_labels, vendor_breakdown,
    vendor_labels,
};
pub use evolution::{EvolutionPoint, EvolutionWindow, net_worth_evolution};
pub use projection::{SavingsProjection, project_savings};
pub use totals::{
    InvestmentTotals, current_balance, display_expense_total, display_income_total,
    expense_total, income_total, investment_totals, net_worth,
};
