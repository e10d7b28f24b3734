//! Reference entities and name resolution.
//!
//! Vendors, payment methods and categories are per-owner lookup records that
//! transactions point at by ID. This module contains:
//! - the domain types, including the validated [ReferenceName],
//! - the resolver, which turns a free-text name or an existing ID into a
//!   stable ID, creating the entity on first use,
//! - the sentinel bootstrap that provisions the well-known entities used for
//!   investment transfer mirror transactions.

mod domain;
mod resolver;
mod sentinels;

pub use domain::{
    Category, CategoryKind, DEFAULT_CATEGORY_ICON, PaymentMethod, ReferenceName, Vendor,
};
pub use resolver::{ReferenceValue, resolve_category, resolve_payment_method, resolve_vendor};
pub use sentinels::{
    INVESTMENT_CATEGORY_NAME, INVESTMENT_PAYMENT_METHOD_NAME, InvestmentSentinels,
    ensure_investment_sentinels,
};
