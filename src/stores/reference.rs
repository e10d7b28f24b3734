//! Defines the reference entity store trait.

use crate::{
    Error,
    database_id::OwnerId,
    reference::{Category, CategoryKind, PaymentMethod, ReferenceName, Vendor},
};

/// Creates and retrieves the reference entities transactions point at:
/// vendors, payment methods and categories.
///
/// Name lookups are case-insensitive and scoped to one owner. The store does
/// not enforce name uniqueness itself; the
/// [resolver](crate::reference::resolve_vendor) looks up before creating,
/// which keeps names unique on every path that goes through it.
pub trait ReferenceStore {
    /// Create a new vendor and add it to the store.
    fn create_vendor(&mut self, owner_id: OwnerId, name: ReferenceName) -> Result<Vendor, Error>;

    /// Find an owner's vendor by case-insensitive name match.
    fn find_vendor_by_name(&self, owner_id: OwnerId, name: &str)
    -> Result<Option<Vendor>, Error>;

    /// Get all vendors for an owner, sorted by name.
    fn get_vendors(&self, owner_id: OwnerId) -> Result<Vec<Vendor>, Error>;

    /// Create a new payment method and add it to the store.
    fn create_payment_method(
        &mut self,
        owner_id: OwnerId,
        name: ReferenceName,
    ) -> Result<PaymentMethod, Error>;

    /// Find an owner's payment method by case-insensitive name match.
    fn find_payment_method_by_name(
        &self,
        owner_id: OwnerId,
        name: &str,
    ) -> Result<Option<PaymentMethod>, Error>;

    /// Get all payment methods for an owner, sorted by name.
    fn get_payment_methods(&self, owner_id: OwnerId) -> Result<Vec<PaymentMethod>, Error>;

    /// Create a new category and add it to the store.
    fn create_category(
        &mut self,
        owner_id: OwnerId,
        name: ReferenceName,
        kind: CategoryKind,
        icon: &str,
    ) -> Result<Category, Error>;

    /// Find an owner's category by case-insensitive name match and kind.
    fn find_category_by_name(
        &self,
        owner_id: OwnerId,
        name: &str,
        kind: CategoryKind,
    ) -> Result<Option<Category>, Error>;

    /// Get all categories for an owner, sorted by name.
    fn get_categories(&self, owner_id: OwnerId) -> Result<Vec<Category>, Error>;
}
