//! The note marker that links a mirror transaction back to its investment.
//!
//! The marker is a persisted wire format: other tooling greps for it and
//! historical rows carry it as their only link, so the literal text must not
//! change.

use crate::{database_id::DatabaseId, transaction::Transaction};

/// The prefix of the machine-readable note on mirror transactions.
pub const MIRROR_NOTE_PREFIX: &str = "[AUTO] Ref. Investment ID: ";

/// The note written on the mirror transaction of `investment_id`.
pub fn mirror_note(investment_id: DatabaseId) -> String {
    format!("{MIRROR_NOTE_PREFIX}{investment_id}")
}

/// Parse a note as a mirror marker, returning the linked investment ID.
///
/// Returns `None` for anything that is not exactly a marker note.
pub fn parse_mirror_note(note: &str) -> Option<DatabaseId> {
    sscanf::sscanf!(note, "[AUTO] Ref. Investment ID: {i64}")
}

/// The investment a transaction mirrors, if any.
///
/// Prefers the typed link column and falls back to parsing the note marker so
/// that rows written before the column existed are still recognized.
pub fn mirror_source(transaction: &Transaction) -> Option<DatabaseId> {
    transaction
        .source_investment_id
        .or_else(|| parse_mirror_note(&transaction.note))
}
