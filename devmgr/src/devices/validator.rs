//! Update rules for devices
//!
//! `name` and `brand` are frozen while a device is `IN_USE`. The predicates
//! here only answer whether a proposed change touches them; callers decide
//! when the rule applies.

use crate::devices::error::{DeviceError, DeviceResult};
use crate::models::device::{Device, DeviceChanges, DeviceDetails};

/// Whether a full replacement changes the name or brand of `existing`
pub fn violates_immutable_full(existing: &Device, proposed: &DeviceDetails) -> bool {
    existing.name != proposed.name || existing.brand != proposed.brand
}

/// Whether a partial update changes the name or brand of `existing`
///
/// Fields absent from `changes`, or present with the stored value, are fine.
pub fn violates_immutable_partial(existing: &Device, changes: &DeviceChanges) -> bool {
    let name_changed = changes
        .name
        .as_ref()
        .is_some_and(|name| *name != existing.name);
    let brand_changed = changes
        .brand
        .as_ref()
        .is_some_and(|brand| *brand != existing.brand);
    name_changed || brand_changed
}

/// Reject empty or whitespace-only values
pub fn ensure_not_blank(field: &str, value: &str) -> DeviceResult<()> {
    if value.trim().is_empty() {
        return Err(DeviceError::Validation(format!("{} cannot be blank", field)));
    }
    Ok(())
}
