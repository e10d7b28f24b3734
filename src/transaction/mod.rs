//! The transaction side of the ledger.
//!
//! A [Transaction] is a single cash-flow event: money earned or money spent.
//! Transactions are either entered directly by the user or generated by the
//! investment operation handler as the mirror of an investment movement (see
//! [crate::investment]).

mod core;

pub use core::{Tag, Transaction, TransactionBuilder, TransactionKind};
