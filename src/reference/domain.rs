//! Core reference entity domain types.

use std::{fmt::Display, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::{
    Error,
    database_id::{DatabaseId, OwnerId},
};

/// The icon assigned to categories created by the resolver when the caller
/// did not pick one.
pub const DEFAULT_CATEGORY_ICON: &str = "💰";

/// A validated, non-empty reference entity name.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, Hash)]
pub struct ReferenceName(String);

impl ReferenceName {
    /// Create a reference name.
    ///
    /// Leading and trailing whitespace is trimmed.
    ///
    /// # Errors
    ///
    /// This function will return an [Error::EmptyName] if `name` is empty or
    /// consists only of whitespace.
    pub fn new(name: &str) -> Result<Self, Error> {
        let name = name.trim();

        if name.is_empty() {
            Err(Error::EmptyName)
        } else {
            Ok(Self(name.to_string()))
        }
    }

    /// Create a reference name without validation.
    ///
    /// The caller should ensure that the string is not empty.
    ///
    /// This function has `_unchecked` in the name but is not `unsafe`, because if the non-empty invariant is violated it will cause incorrect behaviour but not affect memory safety.
    pub fn new_unchecked(name: &str) -> Self {
        Self(name.to_string())
    }
}

impl AsRef<str> for ReferenceName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl FromStr for ReferenceName {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ReferenceName::new(s)
    }
}

impl Display for ReferenceName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The direction of cash flow a category classifies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Hash)]
#[serde(rename_all = "lowercase")]
pub enum CategoryKind {
    /// Classifies income transactions.
    Income,
    /// Classifies expense transactions.
    Expense,
}

impl CategoryKind {
    /// The lowercase text form stored in the ledger.
    pub fn as_str(&self) -> &'static str {
        match self {
            CategoryKind::Income => "income",
            CategoryKind::Expense => "expense",
        }
    }
}

/// A vendor or client money went to or came from, e.g. a shop or an employer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Hash)]
pub struct Vendor {
    /// The ID of the vendor.
    pub id: DatabaseId,
    /// The owner the vendor belongs to.
    pub owner_id: OwnerId,
    /// The display name, unique per owner (case-insensitively).
    pub name: ReferenceName,
}

/// How money moved, e.g. 'Card', 'Cash', 'Bank Transfer'.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Hash)]
pub struct PaymentMethod {
    /// The ID of the payment method.
    pub id: DatabaseId,
    /// The owner the payment method belongs to.
    pub owner_id: OwnerId,
    /// The display name, unique per owner (case-insensitively).
    pub name: ReferenceName,
}

/// A classification for income or expenses, e.g. 'Groceries', 'Wages'.
///
/// Unlike vendors and payment methods, a category also carries the direction
/// of cash flow it applies to, so 'Consulting' the income category and
/// 'Consulting' the expense category are distinct records.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Hash)]
pub struct Category {
    /// The ID of the category.
    pub id: DatabaseId,
    /// The owner the category belongs to.
    pub owner_id: OwnerId,
    /// The display name, unique per owner and kind (case-insensitively).
    pub name: ReferenceName,
    /// Whether the category classifies income or expenses.
    pub kind: CategoryKind,
    /// The icon shown next to the name.
    pub icon: String,
}
