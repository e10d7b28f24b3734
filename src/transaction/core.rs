//! Defines the core data model for transactions.

use serde::{Deserialize, Serialize};
use time::Date;

use crate::database_id::{DatabaseId, OwnerId};

/// Whether a transaction brings money in or takes money out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Hash)]
#[serde(rename_all = "lowercase")]
pub enum TransactionKind {
    /// Money earned, e.g. wages or a refund.
    Income,
    /// Money spent.
    Expense,
}

impl TransactionKind {
    /// The lowercase text form stored in the ledger.
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionKind::Income => "income",
            TransactionKind::Expense => "expense",
        }
    }
}

/// A display-only label attached to a transaction.
///
/// Tags carry no aggregation weight, they only affect how a transaction is
/// presented in lists.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tag {
    /// The text shown on the tag.
    pub label: String,
    /// The display colour, e.g. a hex string.
    pub color: String,
}

/// An expense or income, i.e. an event where money was either spent or earned.
///
/// To create a new `Transaction`, use [Transaction::build].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    /// The ID of the transaction.
    pub id: DatabaseId,
    /// The owner the transaction belongs to.
    pub owner_id: OwnerId,
    /// Whether this is income or an expense.
    pub kind: TransactionKind,
    /// The amount of money spent or earned, always a non-negative magnitude.
    /// The direction of the cash flow is carried by `kind`, not the sign.
    pub amount: f64,
    /// When the transaction happened.
    pub date: Date,
    /// The vendor (or client) the money went to or came from.
    pub vendor_id: DatabaseId,
    /// How the money moved, e.g. card or bank transfer.
    pub payment_method_id: DatabaseId,
    /// The classification of the transaction.
    pub category_id: DatabaseId,
    /// Free text. For mirror transactions this holds the machine-readable
    /// marker that links back to the source investment.
    pub note: String,
    /// Display-only labels.
    pub tags: Vec<Tag>,
    /// Whether this entry was generated as the mirror of an investment
    /// operation rather than entered by the user.
    pub is_auto_generated: bool,
    /// The investment this transaction mirrors, if any.
    pub source_investment_id: Option<DatabaseId>,
}

impl Transaction {
    /// Create a new transaction.
    ///
    /// Shortcut for [TransactionBuilder] for discoverability.
    pub fn build(
        owner_id: OwnerId,
        kind: TransactionKind,
        amount: f64,
        date: Date,
    ) -> TransactionBuilder {
        TransactionBuilder {
            owner_id,
            kind,
            amount,
            date,
            vendor_id: 0,
            payment_method_id: 0,
            category_id: 0,
            note: String::new(),
            tags: Vec::new(),
            is_auto_generated: false,
            source_investment_id: None,
        }
    }
}

/// A builder for creating [Transaction] instances.
///
/// The reference fields default to zero (a dangling ID, which the read paths
/// tolerate) so that tests and simple callers can create transactions without
/// first provisioning vendors and categories. Real write paths should resolve
/// names to IDs via the [reference resolver](crate::reference) first.
#[derive(Debug, PartialEq, Clone)]
pub struct TransactionBuilder {
    /// The owner the transaction belongs to.
    pub owner_id: OwnerId,
    /// Whether this is income or an expense.
    pub kind: TransactionKind,
    /// The monetary amount, a non-negative magnitude.
    pub amount: f64,
    /// The date when the transaction occurred.
    pub date: Date,
    /// The resolved vendor ID.
    pub vendor_id: DatabaseId,
    /// The resolved payment method ID.
    pub payment_method_id: DatabaseId,
    /// The resolved category ID.
    pub category_id: DatabaseId,
    /// Free text annotation.
    pub note: String,
    /// Display-only labels.
    pub tags: Vec<Tag>,
    /// Whether this entry mirrors an investment operation.
    pub is_auto_generated: bool,
    /// The investment this transaction mirrors, if any.
    pub source_investment_id: Option<DatabaseId>,
}

impl TransactionBuilder {
    /// Set the vendor for the transaction.
    pub fn vendor_id(mut self, vendor_id: DatabaseId) -> Self {
        self.vendor_id = vendor_id;
        self
    }

    /// Set the payment method for the transaction.
    pub fn payment_method_id(mut self, payment_method_id: DatabaseId) -> Self {
        self.payment_method_id = payment_method_id;
        self
    }

    /// Set the category for the transaction.
    pub fn category_id(mut self, category_id: DatabaseId) -> Self {
        self.category_id = category_id;
        self
    }

    /// Set the free text note for the transaction.
    pub fn note(mut self, note: &str) -> Self {
        self.note = note.to_owned();
        self
    }

    /// Set the display tags for the transaction.
    pub fn tags(mut self, tags: Vec<Tag>) -> Self {
        self.tags = tags;
        self
    }

    /// Mark the transaction as the auto-generated mirror of `investment_id`.
    ///
    /// The caller is responsible for also writing the note marker (see
    /// [crate::investment::mirror_note]) so the link survives in stores that
    /// only kept the free text form.
    pub fn mirror_of(mut self, investment_id: DatabaseId) -> Self {
        self.is_auto_generated = true;
        self.source_investment_id = Some(investment_id);
        self
    }
}
