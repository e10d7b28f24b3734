//! Resolves free-text names (or pre-resolved IDs) to stable reference IDs.

use crate::{
    Error,
    database_id::{DatabaseId, OwnerId},
    reference::domain::{CategoryKind, DEFAULT_CATEGORY_ICON, ReferenceName},
    stores::ReferenceStore,
};

/// A value submitted for a reference field: either an ID that has already
/// been resolved, or a display name that still needs to be.
///
/// Stored records only ever hold resolved IDs. This tagged input type exists
/// so the write paths never have to guess the shape of a value at runtime.
#[derive(Debug, Clone, PartialEq)]
pub enum ReferenceValue {
    /// An existing reference entity ID, used unchanged.
    Id(DatabaseId),
    /// A display name to look up or create.
    Name(String),
}

/// Resolve a vendor name or ID to a stable vendor ID for this owner.
///
/// Names are matched case-insensitively. If no vendor with the name exists
/// yet, one is created; at most one record is created per call. IDs pass
/// through without an existence check, so a dangling ID is accepted here and
/// surfaces as the fallback label on read paths instead.
///
/// # Errors
/// This function will return an [Error::EmptyName] if a submitted name is
/// empty or blank.
pub fn resolve_vendor<R>(
    store: &mut R,
    owner_id: OwnerId,
    value: ReferenceValue,
) -> Result<DatabaseId, Error>
where
    R: ReferenceStore,
{
    match value {
        ReferenceValue::Id(id) => Ok(id),
        ReferenceValue::Name(name) => {
            let name = ReferenceName::new(&name)?;

            if let Some(vendor) = store.find_vendor_by_name(owner_id, name.as_ref())? {
                return Ok(vendor.id);
            }

            Ok(store.create_vendor(owner_id, name)?.id)
        }
    }
}

/// Resolve a payment method name or ID to a stable ID for this owner.
///
/// Same contract as [resolve_vendor].
///
/// # Errors
/// This function will return an [Error::EmptyName] if a submitted name is
/// empty or blank.
pub fn resolve_payment_method<R>(
    store: &mut R,
    owner_id: OwnerId,
    value: ReferenceValue,
) -> Result<DatabaseId, Error>
where
    R: ReferenceStore,
{
    match value {
        ReferenceValue::Id(id) => Ok(id),
        ReferenceValue::Name(name) => {
            let name = ReferenceName::new(&name)?;

            if let Some(method) = store.find_payment_method_by_name(owner_id, name.as_ref())? {
                return Ok(method.id);
            }

            Ok(store.create_payment_method(owner_id, name)?.id)
        }
    }
}

/// Resolve a category name or ID to a stable ID for this owner.
///
/// The `kind` participates in the match: an income category and an expense
/// category with the same name are distinct records. Categories created here
/// get [DEFAULT_CATEGORY_ICON].
///
/// # Errors
/// This function will return an [Error::EmptyName] if a submitted name is
/// empty or blank.
pub fn resolve_category<R>(
    store: &mut R,
    owner_id: OwnerId,
    value: ReferenceValue,
    kind: CategoryKind,
) -> Result<DatabaseId, Error>
where
    R: ReferenceStore,
{
    match value {
        ReferenceValue::Id(id) => Ok(id),
        ReferenceValue::Name(name) => {
            let name = ReferenceName::new(&name)?;

            if let Some(category) = store.find_category_by_name(owner_id, name.as_ref(), kind)? {
                return Ok(category.id);
            }

            Ok(store
                .create_category(owner_id, name, kind, DEFAULT_CATEGORY_ICON)?
                .id)
        }
    }
}
