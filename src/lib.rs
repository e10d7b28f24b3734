//! Wealthtrack is the ledger core of a personal finance tracker: users record
//! income/expense transactions and investment operations, and dashboards
//! display the aggregates computed here.
//!
//! The crate has three working parts:
//! - the [investment] operation handler, which keeps every investment in
//!   lockstep with the auto-generated mirror transaction representing its
//!   cash-flow effect, without relying on cross-collection transactions,
//! - the [aggregation] engine, pure functions computing balances, net worth,
//!   category/vendor breakdowns, evolution series and projections,
//! - the [reference] resolver, which turns free-text vendor, payment method
//!   and category names into stable per-owner IDs, creating them on first
//!   use.
//!
//! Persistence sits behind the traits in [stores], with SQLite
//! implementations in [stores::sqlite]. Presentation, authentication and
//! routing are not this crate's concern.

#![warn(missing_docs)]

pub mod aggregation;
mod currency;
mod database_id;
mod error;
pub mod investment;
pub mod reference;
pub mod stores;
pub mod transaction;

pub use currency::format_currency;
pub use database_id::{DatabaseId, OwnerId};
pub use error::Error;
