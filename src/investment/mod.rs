//! Investment operations and their synchronization with the ledger.
//!
//! Every [Investment] is mirrored by exactly one auto-generated
//! [Transaction](crate::transaction::Transaction) representing its cash-flow
//! effect, linked by a typed column and a note marker. This module contains:
//! - the domain types,
//! - the note marker wire format,
//! - the operation handler that keeps the pair in lockstep,
//! - the sync-inconsistency reporting and the reconciliation sweep that
//!   detects and repairs drift between the two collections.

mod core;
mod marker;
pub mod operations;
pub mod reconcile;
mod sync;

pub use core::{Investment, InvestmentInput, OperationKind};
pub use marker::{MIRROR_NOTE_PREFIX, mirror_note, mirror_source, parse_mirror_note};
pub use operations::{
    InvestmentDeleteOutcome, InvestmentWriteOutcome, create_investment_operation,
    delete_investment_operation, update_investment_operation,
};
pub use reconcile::{repair_owner, scan_owner};
pub use sync::SyncInconsistency;
