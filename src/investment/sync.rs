//! Reporting for investment/mirror pairs that have drifted out of sync.
//!
//! The investment and its mirror transaction live in separate collections
//! with no cross-collection transactionality, so a crash or a failed second
//! write can leave half a pair behind. These states are reported, never
//! silently swallowed: operations surface them in their outcome and the
//! [reconciliation sweep](crate::investment::reconcile) can repair them.

use std::fmt::Display;

use crate::database_id::DatabaseId;

/// A detected mismatch between an investment and its mirror transaction.
///
/// An inconsistency is not an [Error](crate::Error): the user-visible
/// operation that produced it still succeeded. It exists so that callers and
/// operators can see that the two collections have drifted and retry or
/// repair the missing half.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncInconsistency {
    /// An investment exists with no mirror transaction, either because the
    /// mirror write failed or because the mirror was removed out of band.
    MissingMirror {
        /// The investment left without a mirror.
        investment_id: DatabaseId,
    },

    /// An investment has more than one mirror transaction.
    DuplicateMirrors {
        /// The investment with surplus mirrors.
        investment_id: DatabaseId,
        /// How many mirrors were found (expected: one).
        count: usize,
    },

    /// An auto-generated transaction points at an investment that no longer
    /// exists.
    OrphanedMirror {
        /// The transaction carrying the dangling link.
        transaction_id: DatabaseId,
        /// The investment the link points at.
        investment_id: DatabaseId,
    },
}

impl Display for SyncInconsistency {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SyncInconsistency::MissingMirror { investment_id } => {
                write!(f, "investment {investment_id} has no mirror transaction")
            }
            SyncInconsistency::DuplicateMirrors {
                investment_id,
                count,
            } => write!(
                f,
                "investment {investment_id} has {count} mirror transactions, expected one"
            ),
            SyncInconsistency::OrphanedMirror {
                transaction_id,
                investment_id,
            } => write!(
                f,
                "transaction {transaction_id} mirrors investment {investment_id}, which does not exist"
            ),
        }
    }
}
