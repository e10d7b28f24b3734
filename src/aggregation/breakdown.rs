//! Category and vendor breakdowns with display-ready percentages.

use std::collections::HashMap;

use crate::{
    database_id::DatabaseId,
    reference::{Category, Vendor},
    transaction::Transaction,
};

/// The label used for transactions whose reference ID cannot be resolved to
/// a display name (dangling or zero IDs).
pub const UNRESOLVED_LABEL: &str = "Other";

/// One group in a breakdown: a display label, the summed amount, and the
/// group's share of the subset total.
#[derive(Debug, Clone, PartialEq)]
pub struct BreakdownEntry {
    /// The group's display name.
    pub label: String,
    /// The summed amount for the group.
    pub amount: f64,
    /// The group's share of the subset total, rounded to one decimal.
    ///
    /// Across the full (untruncated) breakdown these sum to exactly 100.0;
    /// see [category_breakdown].
    pub percentage: f64,
}

/// Build the ID-to-name map for a read-time category join.
pub fn category_labels(categories: &[Category]) -> HashMap<DatabaseId, String> {
    categories
        .iter()
        .map(|category| (category.id, category.name.to_string()))
        .collect()
}

/// Build the ID-to-name map for a read-time vendor join.
pub fn vendor_labels(vendors: &[Vendor]) -> HashMap<DatabaseId, String> {
    vendors
        .iter()
        .map(|vendor| (vendor.id, vendor.name.to_string()))
        .collect()
}

/// Group a transaction subset by category and annotate each group with its
/// share of the subset total.
///
/// The caller chooses the subset (typically the period's expenses).
/// Auto-generated investment transfers are always excluded; they are not real
/// spending categories. Groups are sorted by amount, descending, and the
/// rounded percentages are normalized to sum to exactly 100.0 by adjusting
/// the largest group (ties go to the first group encountered).
///
/// The full sorted set is returned; pass `top_n` to truncate for display
/// (the original call sites use 5, 6, 8 or 10). Truncation happens after
/// normalization, so a truncated listing keeps its percentages relative to
/// the whole subset.
pub fn category_breakdown(
    transactions: &[Transaction],
    labels: &HashMap<DatabaseId, String>,
    top_n: Option<usize>,
) -> Vec<BreakdownEntry> {
    breakdown_by(
        transactions,
        labels,
        |transaction| transaction.category_id,
        top_n,
    )
}

/// Group a transaction subset by vendor.
///
/// Same contract as [category_breakdown].
pub fn vendor_breakdown(
    transactions: &[Transaction],
    labels: &HashMap<DatabaseId, String>,
    top_n: Option<usize>,
) -> Vec<BreakdownEntry> {
    breakdown_by(
        transactions,
        labels,
        |transaction| transaction.vendor_id,
        top_n,
    )
}

fn breakdown_by<F>(
    transactions: &[Transaction],
    labels: &HashMap<DatabaseId, String>,
    group_key: F,
    top_n: Option<usize>,
) -> Vec<BreakdownEntry>
where
    F: Fn(&Transaction) -> DatabaseId,
{
    // Group in first-encountered order so that the later stable sort gives a
    // deterministic tie-break.
    let mut entries: Vec<BreakdownEntry> = Vec::new();
    let mut index_by_label: HashMap<String, usize> = HashMap::new();

    for transaction in transactions {
        if transaction.is_auto_generated {
            continue;
        }

        let label = labels
            .get(&group_key(transaction))
            .map(String::as_str)
            .unwrap_or(UNRESOLVED_LABEL);

        match index_by_label.get(label).copied() {
            Some(index) => entries[index].amount += transaction.amount.abs(),
            None => {
                index_by_label.insert(label.to_owned(), entries.len());
                entries.push(BreakdownEntry {
                    label: label.to_owned(),
                    amount: transaction.amount.abs(),
                    percentage: 0.0,
                });
            }
        }
    }

    entries.sort_by(|a, b| b.amount.total_cmp(&a.amount));

    let total: f64 = entries.iter().map(|entry| entry.amount).sum();

    if total > 0.0 {
        for entry in &mut entries {
            entry.percentage = round_one_decimal(entry.amount / total * 100.0);
        }

        // Rounding can leave the displayed percentages summing to 99.9 or
        // 100.1; the residual is folded into the largest group, which after
        // the descending sort is the first entry.
        let rounded_sum: f64 = entries.iter().map(|entry| entry.percentage).sum();
        let residual = round_one_decimal(100.0 - rounded_sum);
        if residual != 0.0 {
            entries[0].percentage = round_one_decimal(entries[0].percentage + residual);
        }
    }

    if let Some(top_n) = top_n {
        entries.truncate(top_n);
    }

    entries
}

fn round_one_decimal(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}
