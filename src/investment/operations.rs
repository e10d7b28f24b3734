//! The investment operation handler.
//!
//! Each user action (create, update, delete) writes an [Investment] and its
//! mirror [Transaction](crate::transaction::Transaction) as a pair. The two
//! writes are not atomic: the store offers no cross-collection transactions,
//! so a failure between them leaves half a pair behind. The handler's job is
//! to keep the pair in lockstep on the happy path and to *report* drift on
//! the unhappy one; see [SyncInconsistency] and
//! [the reconciliation sweep](crate::investment::reconcile).

use crate::{
    Error,
    aggregation::current_balance,
    database_id::{DatabaseId, OwnerId},
    investment::{
        core::{Investment, InvestmentInput, OperationKind},
        marker::mirror_note,
        sync::SyncInconsistency,
    },
    reference::{ReferenceValue, ensure_investment_sentinels, resolve_vendor},
    stores::{InvestmentStore, ReferenceStore, TransactionStore},
    transaction::Transaction,
};

/// The result of creating or updating an investment.
///
/// The operation succeeded; `inconsistency` records whether the mirror
/// transaction could be kept in lockstep. Callers may retry the missing half
/// or leave it to the reconciliation sweep.
#[derive(Debug, Clone, PartialEq)]
pub struct InvestmentWriteOutcome {
    /// The investment as persisted.
    pub investment: Investment,
    /// Drift between the investment and its mirror, if any was detected.
    pub inconsistency: Option<SyncInconsistency>,
}

/// The result of deleting an investment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvestmentDeleteOutcome {
    /// How many mirror transactions were removed (expected: one).
    pub mirrors_removed: usize,
    /// Drift detected during the delete, if any.
    pub inconsistency: Option<SyncInconsistency>,
}

/// Create an investment and its mirror transaction.
///
/// For an apply operation the owner's current balance is computed over all
/// existing transactions first; an apply that exceeds it fails with
/// [Error::InsufficientBalance] before anything is written. The mirror
/// transaction stores the principal as a positive magnitude, an expense for
/// apply and income for redeem, dated on the investment's date, categorized
/// with the owner's investment sentinels, and linked both by the typed column
/// and the note marker.
///
/// A mirror write failure after the investment write is reported in the
/// outcome rather than rolling anything back.
///
/// # Errors
/// This function will return an:
/// - [Error::InvalidAmount] or [Error::EmptyName] if the input fails
///   validation (no writes are performed),
/// - [Error::InsufficientBalance] if an apply exceeds the current balance
///   (no writes are performed),
/// - or [Error::SqlError] if the store fails.
pub fn create_investment_operation<I, T, R>(
    owner_id: OwnerId,
    input: InvestmentInput,
    investments: &mut I,
    transactions: &mut T,
    references: &mut R,
) -> Result<InvestmentWriteOutcome, Error>
where
    I: InvestmentStore,
    T: TransactionStore,
    R: ReferenceStore,
{
    input.validate()?;

    if input.operation == OperationKind::Apply {
        let existing = transactions.get_by_owner(owner_id)?;
        let available = current_balance(&existing);

        if input.principal > available {
            return Err(Error::InsufficientBalance {
                requested: input.principal,
                available,
            });
        }
    }

    let sentinels = ensure_investment_sentinels(references, owner_id)?;
    let vendor_id = resolve_vendor(
        references,
        owner_id,
        ReferenceValue::Name(input.institution.clone()),
    )?;

    let investment = investments.create(owner_id, input)?;

    let kind = investment.operation.mirror_kind();
    let mirror = Transaction::build(owner_id, kind, investment.principal, investment.date)
        .vendor_id(vendor_id)
        .payment_method_id(sentinels.payment_method_id)
        .category_id(sentinels.category_for(kind))
        .note(&mirror_note(investment.id))
        .mirror_of(investment.id);

    let inconsistency = match transactions.create(mirror) {
        Ok(_) => None,
        Err(error) => {
            tracing::warn!(
                "could not create the mirror transaction for investment {}: {}",
                investment.id,
                error
            );
            Some(SyncInconsistency::MissingMirror {
                investment_id: investment.id,
            })
        }
    };

    Ok(InvestmentWriteOutcome {
        investment,
        inconsistency,
    })
}

/// Update an investment and bring its mirror transaction up to date.
///
/// The mirror's amount (always the positive magnitude of the new principal),
/// kind, date, vendor and category are refreshed to match the updated
/// investment. A missing mirror does not fail the update; it is reported in
/// the outcome. The balance is deliberately not re-checked here: an update
/// that would overdraw the balance is accepted.
///
/// # Errors
/// This function will return an:
/// - [Error::UpdateMissingInvestment] if the owner has no such investment,
/// - [Error::InvalidAmount] or [Error::EmptyName] if the input fails
///   validation (no writes are performed),
/// - or [Error::SqlError] if the store fails.
pub fn update_investment_operation<I, T, R>(
    owner_id: OwnerId,
    id: DatabaseId,
    input: InvestmentInput,
    investments: &mut I,
    transactions: &mut T,
    references: &mut R,
) -> Result<InvestmentWriteOutcome, Error>
where
    I: InvestmentStore,
    T: TransactionStore,
    R: ReferenceStore,
{
    input.validate()?;

    let mut investment = investments.get(owner_id, id).map_err(|error| match error {
        Error::NotFound => Error::UpdateMissingInvestment,
        error => error,
    })?;

    investment.operation = input.operation;
    investment.asset_category = input.asset_category;
    investment.institution = input.institution;
    investment.principal = input.principal;
    investment.yield_amount = input.yield_amount;
    investment.date = input.date;
    investment.note = input.note;

    investments.update(&investment)?;

    let mirrors = transactions.mirrors_of(owner_id, id)?;

    let inconsistency = match mirrors.into_iter().next() {
        None => {
            tracing::warn!(
                "no mirror transaction found while updating investment {}",
                id
            );
            Some(SyncInconsistency::MissingMirror { investment_id: id })
        }
        Some(mut mirror) => {
            let kind = investment.operation.mirror_kind();
            let sentinels = ensure_investment_sentinels(references, owner_id)?;
            let vendor_id = resolve_vendor(
                references,
                owner_id,
                ReferenceValue::Name(investment.institution.clone()),
            )?;

            mirror.kind = kind;
            mirror.amount = investment.principal;
            mirror.date = investment.date;
            mirror.vendor_id = vendor_id;
            mirror.category_id = sentinels.category_for(kind);
            mirror.payment_method_id = sentinels.payment_method_id;
            // Rewriting the note refreshes legacy rows to the current marker;
            // setting the typed link adopts rows that only carried the note.
            mirror.note = mirror_note(id);
            mirror.source_investment_id = Some(id);

            transactions.update(&mirror)?;

            None
        }
    };

    // A surplus mirror is left in place for the reconciliation sweep, but the
    // drift is reported rather than swallowed.
    let inconsistency = match inconsistency {
        Some(inconsistency) => Some(inconsistency),
        None => {
            let count = transactions.mirrors_of(owner_id, id)?.len();
            if count > 1 {
                tracing::warn!("investment {} has {} mirror transactions", id, count);
                Some(SyncInconsistency::DuplicateMirrors {
                    investment_id: id,
                    count,
                })
            } else {
                None
            }
        }
    };

    Ok(InvestmentWriteOutcome {
        investment,
        inconsistency,
    })
}

/// Delete an investment and every transaction mirroring it.
///
/// The mirrors are removed first so that a failure part-way leaves an
/// orphaned investment (which the reconciliation sweep can recover) rather
/// than a mirror pointing at a vanished source. Duplicate mirrors are
/// tolerated and all removed.
///
/// # Errors
/// This function will return an:
/// - [Error::DeleteMissingInvestment] if the owner has no such investment,
/// - or [Error::SqlError] if the store fails.
pub fn delete_investment_operation<I, T>(
    owner_id: OwnerId,
    id: DatabaseId,
    investments: &mut I,
    transactions: &mut T,
) -> Result<InvestmentDeleteOutcome, Error>
where
    I: InvestmentStore,
    T: TransactionStore,
{
    let mirrors_removed = transactions.delete_mirrors_of(owner_id, id)?;

    investments.delete(owner_id, id)?;

    let inconsistency = if mirrors_removed == 0 {
        tracing::warn!(
            "no mirror transaction found while deleting investment {}",
            id
        );
        Some(SyncInconsistency::MissingMirror { investment_id: id })
    } else {
        None
    };

    Ok(InvestmentDeleteOutcome {
        mirrors_removed,
        inconsistency,
    })
}

#[cfg(test)]
mod operation_tests {
    use time::macros::date;

    use crate::{
        Error,
        database_id::OwnerId,
        investment::{
            InvestmentInput, OperationKind, SyncInconsistency, mirror_note, parse_mirror_note,
        },
        reference::INVESTMENT_PAYMENT_METHOD_NAME,
        stores::{
            InvestmentStore, ReferenceStore, TransactionStore,
            sqlite::{
                SqliteInvestmentStore, SqliteReferenceStore, SqliteTransactionStore,
                open_in_memory,
            },
        },
        transaction::{Transaction, TransactionKind},
    };

    use super::{
        create_investment_operation, delete_investment_operation, update_investment_operation,
    };

    struct TestStores {
        investments: SqliteInvestmentStore,
        transactions: SqliteTransactionStore,
        references: SqliteReferenceStore,
    }

    fn get_test_stores() -> TestStores {
        let connection = open_in_memory().unwrap();

        TestStores {
            investments: SqliteInvestmentStore::new(connection.clone()),
            transactions: SqliteTransactionStore::new(connection.clone()),
            references: SqliteReferenceStore::new(connection),
        }
    }

    /// Give the owner an income of 5000 and an expense of 2000, i.e. a
    /// current balance of 3000.
    fn seed_balance(stores: &mut TestStores, owner: OwnerId) {
        stores
            .transactions
            .create(Transaction::build(
                owner,
                TransactionKind::Income,
                5000.0,
                date!(2025 - 01 - 05),
            ))
            .unwrap();
        stores
            .transactions
            .create(Transaction::build(
                owner,
                TransactionKind::Expense,
                2000.0,
                date!(2025 - 01 - 20),
            ))
            .unwrap();
    }

    fn get_apply_input(principal: f64) -> InvestmentInput {
        InvestmentInput {
            operation: OperationKind::Apply,
            asset_category: "Equities".to_owned(),
            institution: "Broker A".to_owned(),
            principal,
            yield_amount: 0.0,
            date: date!(2025 - 02 - 01),
            note: String::new(),
        }
    }

    #[test]
    fn create_apply_writes_investment_and_mirror() {
        let mut stores = get_test_stores();
        let owner = OwnerId::new(1);
        seed_balance(&mut stores, owner);

        let outcome = create_investment_operation(
            owner,
            get_apply_input(1000.0),
            &mut stores.investments,
            &mut stores.transactions,
            &mut stores.references,
        )
        .expect("Could not create investment");

        assert_eq!(outcome.inconsistency, None);
        assert_eq!(outcome.investment.principal, 1000.0);

        let mirrors = stores
            .transactions
            .mirrors_of(owner, outcome.investment.id)
            .unwrap();
        assert_eq!(mirrors.len(), 1);
        let mirror = &mirrors[0];
        assert_eq!(mirror.kind, TransactionKind::Expense);
        assert_eq!(mirror.amount, 1000.0);
        assert_eq!(mirror.date, outcome.investment.date);
        assert!(mirror.is_auto_generated);
        assert_eq!(mirror.note, mirror_note(outcome.investment.id));
        assert_eq!(parse_mirror_note(&mirror.note), Some(outcome.investment.id));

        let balance =
            crate::aggregation::current_balance(&stores.transactions.get_by_owner(owner).unwrap());
        assert_eq!(balance, 2000.0);
    }

    #[test]
    fn create_apply_fails_when_principal_exceeds_balance() {
        let mut stores = get_test_stores();
        let owner = OwnerId::new(1);
        seed_balance(&mut stores, owner);

        let result = create_investment_operation(
            owner,
            get_apply_input(3500.0),
            &mut stores.investments,
            &mut stores.transactions,
            &mut stores.references,
        );

        assert_eq!(
            result,
            Err(Error::InsufficientBalance {
                requested: 3500.0,
                available: 3000.0
            })
        );
        assert!(stores.investments.get_by_owner(owner).unwrap().is_empty());
        assert_eq!(stores.transactions.get_by_owner(owner).unwrap().len(), 2);
    }

    #[test]
    fn create_redeem_skips_the_balance_gate() {
        let mut stores = get_test_stores();
        let owner = OwnerId::new(1);

        let mut input = get_apply_input(750.0);
        input.operation = OperationKind::Redeem;
        let outcome = create_investment_operation(
            owner,
            input,
            &mut stores.investments,
            &mut stores.transactions,
            &mut stores.references,
        )
        .expect("Redeem should not require a balance");

        let mirrors = stores
            .transactions
            .mirrors_of(owner, outcome.investment.id)
            .unwrap();
        assert_eq!(mirrors[0].kind, TransactionKind::Income);
        assert_eq!(mirrors[0].amount, 750.0);
    }

    #[test]
    fn create_balance_gate_counts_existing_mirror_transactions() {
        let mut stores = get_test_stores();
        let owner = OwnerId::new(1);
        seed_balance(&mut stores, owner);
        create_investment_operation(
            owner,
            get_apply_input(1000.0),
            &mut stores.investments,
            &mut stores.transactions,
            &mut stores.references,
        )
        .unwrap();

        // Balance is now 2000; another 2500 apply must be rejected.
        let result = create_investment_operation(
            owner,
            get_apply_input(2500.0),
            &mut stores.investments,
            &mut stores.transactions,
            &mut stores.references,
        );

        assert_eq!(
            result,
            Err(Error::InsufficientBalance {
                requested: 2500.0,
                available: 2000.0
            })
        );
    }

    #[test]
    fn create_reuses_sentinels_and_vendor_across_operations() {
        let mut stores = get_test_stores();
        let owner = OwnerId::new(1);
        seed_balance(&mut stores, owner);

        create_investment_operation(
            owner,
            get_apply_input(500.0),
            &mut stores.investments,
            &mut stores.transactions,
            &mut stores.references,
        )
        .unwrap();
        create_investment_operation(
            owner,
            get_apply_input(500.0),
            &mut stores.investments,
            &mut stores.transactions,
            &mut stores.references,
        )
        .unwrap();

        assert_eq!(stores.references.get_vendors(owner).unwrap().len(), 1);
        assert_eq!(stores.references.get_categories(owner).unwrap().len(), 2);
        let methods = stores.references.get_payment_methods(owner).unwrap();
        assert_eq!(methods.len(), 1);
        assert_eq!(methods[0].name.as_ref(), INVESTMENT_PAYMENT_METHOD_NAME);
    }

    #[test]
    fn create_rejects_invalid_principal_before_any_write() {
        let mut stores = get_test_stores();
        let owner = OwnerId::new(1);
        seed_balance(&mut stores, owner);

        let result = create_investment_operation(
            owner,
            get_apply_input(-10.0),
            &mut stores.investments,
            &mut stores.transactions,
            &mut stores.references,
        );

        assert!(matches!(result, Err(Error::InvalidAmount(_))));
        assert!(stores.investments.get_by_owner(owner).unwrap().is_empty());
    }

    #[test]
    fn update_refreshes_the_mirror() {
        let mut stores = get_test_stores();
        let owner = OwnerId::new(1);
        seed_balance(&mut stores, owner);
        let created = create_investment_operation(
            owner,
            get_apply_input(1000.0),
            &mut stores.investments,
            &mut stores.transactions,
            &mut stores.references,
        )
        .unwrap();

        let mut input = get_apply_input(800.0);
        input.operation = OperationKind::Redeem;
        input.institution = "Broker B".to_owned();
        input.date = date!(2025 - 03 - 10);
        let outcome = update_investment_operation(
            owner,
            created.investment.id,
            input,
            &mut stores.investments,
            &mut stores.transactions,
            &mut stores.references,
        )
        .expect("Could not update investment");

        assert_eq!(outcome.inconsistency, None);
        let mirrors = stores
            .transactions
            .mirrors_of(owner, created.investment.id)
            .unwrap();
        assert_eq!(mirrors.len(), 1);
        assert_eq!(mirrors[0].kind, TransactionKind::Income);
        assert_eq!(mirrors[0].amount, 800.0);
        assert_eq!(mirrors[0].date, date!(2025 - 03 - 10));

        let vendor = stores
            .references
            .find_vendor_by_name(owner, "Broker B")
            .unwrap()
            .expect("updating should have created the new vendor");
        assert_eq!(mirrors[0].vendor_id, vendor.id);
    }

    #[test]
    fn update_is_not_balance_gated() {
        let mut stores = get_test_stores();
        let owner = OwnerId::new(1);
        seed_balance(&mut stores, owner);
        let created = create_investment_operation(
            owner,
            get_apply_input(1000.0),
            &mut stores.investments,
            &mut stores.transactions,
            &mut stores.references,
        )
        .unwrap();

        // 10000 is far more than the remaining balance; the update is still
        // accepted.
        let outcome = update_investment_operation(
            owner,
            created.investment.id,
            get_apply_input(10000.0),
            &mut stores.investments,
            &mut stores.transactions,
            &mut stores.references,
        );

        assert!(outcome.is_ok());
    }

    #[test]
    fn update_succeeds_but_reports_missing_mirror() {
        let mut stores = get_test_stores();
        let owner = OwnerId::new(1);
        seed_balance(&mut stores, owner);
        let created = create_investment_operation(
            owner,
            get_apply_input(1000.0),
            &mut stores.investments,
            &mut stores.transactions,
            &mut stores.references,
        )
        .unwrap();
        stores
            .transactions
            .delete_mirrors_of(owner, created.investment.id)
            .unwrap();

        let outcome = update_investment_operation(
            owner,
            created.investment.id,
            get_apply_input(900.0),
            &mut stores.investments,
            &mut stores.transactions,
            &mut stores.references,
        )
        .expect("Update should succeed despite the missing mirror");

        assert_eq!(
            outcome.inconsistency,
            Some(SyncInconsistency::MissingMirror {
                investment_id: created.investment.id
            })
        );
        assert_eq!(
            stores
                .investments
                .get(owner, created.investment.id)
                .unwrap()
                .principal,
            900.0
        );
    }

    #[test]
    fn update_reports_duplicate_mirrors() {
        let mut stores = get_test_stores();
        let owner = OwnerId::new(1);
        seed_balance(&mut stores, owner);
        let created = create_investment_operation(
            owner,
            get_apply_input(1000.0),
            &mut stores.investments,
            &mut stores.transactions,
            &mut stores.references,
        )
        .unwrap();
        stores
            .transactions
            .create(
                Transaction::build(owner, TransactionKind::Expense, 1000.0, date!(2025 - 02 - 01))
                    .note(&mirror_note(created.investment.id))
                    .mirror_of(created.investment.id),
            )
            .unwrap();

        let outcome = update_investment_operation(
            owner,
            created.investment.id,
            get_apply_input(900.0),
            &mut stores.investments,
            &mut stores.transactions,
            &mut stores.references,
        )
        .unwrap();

        assert_eq!(
            outcome.inconsistency,
            Some(SyncInconsistency::DuplicateMirrors {
                investment_id: created.investment.id,
                count: 2
            })
        );
        // Only the oldest mirror is refreshed.
        let mirrors = stores
            .transactions
            .mirrors_of(owner, created.investment.id)
            .unwrap();
        assert_eq!(mirrors[0].amount, 900.0);
        assert_eq!(mirrors[1].amount, 1000.0);
    }

    #[test]
    fn update_fails_for_missing_investment() {
        let mut stores = get_test_stores();

        let result = update_investment_operation(
            OwnerId::new(1),
            1337,
            get_apply_input(100.0),
            &mut stores.investments,
            &mut stores.transactions,
            &mut stores.references,
        );

        assert_eq!(result, Err(Error::UpdateMissingInvestment));
    }

    #[test]
    fn delete_removes_investment_and_mirror() {
        let mut stores = get_test_stores();
        let owner = OwnerId::new(1);
        seed_balance(&mut stores, owner);
        let created = create_investment_operation(
            owner,
            get_apply_input(1000.0),
            &mut stores.investments,
            &mut stores.transactions,
            &mut stores.references,
        )
        .unwrap();

        let outcome = delete_investment_operation(
            owner,
            created.investment.id,
            &mut stores.investments,
            &mut stores.transactions,
        )
        .expect("Could not delete investment");

        assert_eq!(outcome.mirrors_removed, 1);
        assert_eq!(outcome.inconsistency, None);
        assert_eq!(
            stores.investments.get(owner, created.investment.id),
            Err(Error::NotFound)
        );
        // No transaction bearing the marker survives.
        let remaining = stores.transactions.get_by_owner(owner).unwrap();
        assert!(
            remaining
                .iter()
                .all(|t| parse_mirror_note(&t.note).is_none())
        );
    }

    #[test]
    fn delete_tolerates_and_removes_duplicate_mirrors() {
        let mut stores = get_test_stores();
        let owner = OwnerId::new(1);
        seed_balance(&mut stores, owner);
        let created = create_investment_operation(
            owner,
            get_apply_input(1000.0),
            &mut stores.investments,
            &mut stores.transactions,
            &mut stores.references,
        )
        .unwrap();
        // A second, stray mirror left behind by an interrupted earlier write.
        stores
            .transactions
            .create(
                Transaction::build(owner, TransactionKind::Expense, 1000.0, date!(2025 - 02 - 01))
                    .note(&mirror_note(created.investment.id))
                    .mirror_of(created.investment.id),
            )
            .unwrap();

        let outcome = delete_investment_operation(
            owner,
            created.investment.id,
            &mut stores.investments,
            &mut stores.transactions,
        )
        .unwrap();

        assert_eq!(outcome.mirrors_removed, 2);
        assert!(
            stores
                .transactions
                .mirrors_of(owner, created.investment.id)
                .unwrap()
                .is_empty()
        );
    }

    #[test]
    fn delete_fails_for_missing_investment() {
        let mut stores = get_test_stores();

        let result = delete_investment_operation(
            OwnerId::new(1),
            1337,
            &mut stores.investments,
            &mut stores.transactions,
        );

        assert_eq!(result, Err(Error::DeleteMissingInvestment));
    }

    #[test]
    fn delete_reports_missing_mirror_but_still_succeeds() {
        let mut stores = get_test_stores();
        let owner = OwnerId::new(1);
        seed_balance(&mut stores, owner);
        let created = create_investment_operation(
            owner,
            get_apply_input(1000.0),
            &mut stores.investments,
            &mut stores.transactions,
            &mut stores.references,
        )
        .unwrap();
        stores
            .transactions
            .delete_mirrors_of(owner, created.investment.id)
            .unwrap();

        let outcome = delete_investment_operation(
            owner,
            created.investment.id,
            &mut stores.investments,
            &mut stores.transactions,
        )
        .unwrap();

        assert_eq!(outcome.mirrors_removed, 0);
        assert_eq!(
            outcome.inconsistency,
            Some(SyncInconsistency::MissingMirror {
                investment_id: created.investment.id
            })
        );
    }

    #[test]
    fn operations_are_scoped_to_the_owner() {
        let mut stores = get_test_stores();
        let owner = OwnerId::new(1);
        seed_balance(&mut stores, owner);
        let created = create_investment_operation(
            owner,
            get_apply_input(1000.0),
            &mut stores.investments,
            &mut stores.transactions,
            &mut stores.references,
        )
        .unwrap();

        let result = delete_investment_operation(
            OwnerId::new(2),
            created.investment.id,
            &mut stores.investments,
            &mut stores.transactions,
        );

        assert_eq!(result, Err(Error::DeleteMissingInvestment));
        assert!(stores.investments.get(owner, created.investment.id).is_ok());
    }
}
