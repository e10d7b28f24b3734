//! Contains traits and implementations for objects that store the ledger
//! records.
//!
//! The traits model the document store the core is written against: per-owner
//! find, create, update and delete on each record kind, plus the mirror
//! lookups the investment handler needs. No cross-collection atomicity is
//! offered or assumed; keeping paired records consistent is the caller's job
//! (see [crate::investment]).

mod investment;
mod reference;
mod transaction;

pub mod sqlite;

pub use investment::InvestmentStore;
pub use reference::ReferenceStore;
pub use transaction::TransactionStore;
