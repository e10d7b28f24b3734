//! A per-owner sweep that detects and repairs half-completed mirror pairs.
//!
//! The investment and mirror writes in
//! [operations](crate::investment::operations) are not atomic, so a crash or
//! a failed second write can leave an investment without a mirror, a mirror
//! without an investment, or (after interleaved retries) more than one
//! mirror. [scan_owner] finds all three states; [repair_owner] fixes them and
//! reports what it fixed.

use std::collections::{HashMap, HashSet};

use crate::{
    Error,
    database_id::{DatabaseId, OwnerId},
    investment::{
        marker::{mirror_note, mirror_source},
        sync::SyncInconsistency,
    },
    reference::{ReferenceValue, ensure_investment_sentinels, resolve_vendor},
    stores::{InvestmentStore, ReferenceStore, TransactionStore},
    transaction::Transaction,
};

/// Detect investment/mirror drift for one owner without changing anything.
///
/// Mirrors are recognized through the typed link column or, for rows written
/// before the column existed, the note marker.
///
/// # Errors
/// Returns an [Error::SqlError] if the store fails.
pub fn scan_owner<I, T>(
    owner_id: OwnerId,
    investments: &I,
    transactions: &T,
) -> Result<Vec<SyncInconsistency>, Error>
where
    I: InvestmentStore,
    T: TransactionStore,
{
    let investments = investments.get_by_owner(owner_id)?;
    let transactions = transactions.get_by_owner(owner_id)?;

    let investment_ids: HashSet<DatabaseId> = investments.iter().map(|i| i.id).collect();

    let mut findings = Vec::new();
    let mut mirror_counts: HashMap<DatabaseId, usize> = HashMap::new();

    for transaction in &transactions {
        let Some(investment_id) = mirror_source(transaction) else {
            continue;
        };

        *mirror_counts.entry(investment_id).or_insert(0) += 1;

        if !investment_ids.contains(&investment_id) {
            findings.push(SyncInconsistency::OrphanedMirror {
                transaction_id: transaction.id,
                investment_id,
            });
        }
    }

    for investment in &investments {
        match mirror_counts.get(&investment.id).copied().unwrap_or(0) {
            0 => findings.push(SyncInconsistency::MissingMirror {
                investment_id: investment.id,
            }),
            1 => {}
            count => findings.push(SyncInconsistency::DuplicateMirrors {
                investment_id: investment.id,
                count,
            }),
        }
    }

    Ok(findings)
}

/// Repair the drift [scan_owner] finds and return what was repaired.
///
/// - A missing mirror is recreated from the investment, through the same
///   sentinel and vendor machinery the operation handler uses.
/// - Surplus duplicate mirrors are removed, keeping the oldest.
/// - Orphaned mirrors are deleted.
///
/// Each repair is logged. The returned list contains the inconsistencies as
/// they were found, i.e. before repair.
///
/// # Errors
/// Returns an [Error::SqlError] if the store fails part-way; repairs already
/// made are not undone.
pub fn repair_owner<I, T, R>(
    owner_id: OwnerId,
    investments: &I,
    transactions: &mut T,
    references: &mut R,
) -> Result<Vec<SyncInconsistency>, Error>
where
    I: InvestmentStore,
    T: TransactionStore,
    R: ReferenceStore,
{
    let findings = scan_owner(owner_id, investments, transactions)?;

    for finding in &findings {
        tracing::warn!("repairing sync inconsistency: {}", finding);

        match *finding {
            SyncInconsistency::MissingMirror { investment_id } => {
                let investment = investments.get(owner_id, investment_id)?;
                let kind = investment.operation.mirror_kind();
                let sentinels = ensure_investment_sentinels(references, owner_id)?;
                let vendor_id = resolve_vendor(
                    references,
                    owner_id,
                    ReferenceValue::Name(investment.institution.clone()),
                )?;

                transactions.create(
                    Transaction::build(owner_id, kind, investment.principal, investment.date)
                        .vendor_id(vendor_id)
                        .payment_method_id(sentinels.payment_method_id)
                        .category_id(sentinels.category_for(kind))
                        .note(&mirror_note(investment.id))
                        .mirror_of(investment.id),
                )?;
            }
            SyncInconsistency::DuplicateMirrors { investment_id, .. } => {
                let mirrors = transactions.mirrors_of(owner_id, investment_id)?;

                for surplus in mirrors.iter().skip(1) {
                    transactions.delete(owner_id, surplus.id)?;
                }
            }
            SyncInconsistency::OrphanedMirror { transaction_id, .. } => {
                transactions.delete(owner_id, transaction_id)?;
            }
        }
    }

    Ok(findings)
}
