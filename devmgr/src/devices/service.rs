use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::devices::error::{DeviceError, DeviceResult};
use crate::devices::validator::{
    ensure_not_blank, violates_immutable_full, violates_immutable_partial,
};
use crate::models::device::{
    Device, DeviceChanges, DeviceDetails, DeviceFilter, DeviceId, DeviceState, NewDevice,
};
use crate::storage::store::DeviceStore;

const IN_USE_IDENTITY_CONFLICT: &str = "Cannot update name or brand of a device that is in use";

/// Device management business logic
///
/// Every operation is a single read-check-write against the store. All checks
/// run before the write, so a rejected call leaves the store untouched.
pub struct DeviceService {
    store: Arc<dyn DeviceStore>,
}

impl DeviceService {
    pub fn new(store: Arc<dyn DeviceStore>) -> Self {
        Self { store }
    }

    /// Create an `AVAILABLE` device stamped with the current time
    pub async fn create(&self, name: String, brand: String) -> DeviceResult<Device> {
        ensure_not_blank("Name", &name)?;
        ensure_not_blank("Brand", &brand)?;

        debug!(name = %name, brand = %brand, "Creating device");

        let device = self.store.insert(NewDevice::new(name, brand)).await?;

        info!(device_id = device.id, "Device created");
        Ok(device)
    }

    pub async fn get_by_id(&self, id: DeviceId) -> DeviceResult<Device> {
        debug!(device_id = id, "Getting device");
        self.store
            .get(id)
            .await?
            .ok_or_else(|| not_found(id))
    }

    pub async fn list_all(&self) -> DeviceResult<Vec<Device>> {
        let devices = self.store.list().await?;
        debug!(count = devices.len(), "Listed devices");
        Ok(devices)
    }

    /// Devices whose brand equals `brand` exactly
    pub async fn list_by_brand(&self, brand: &str) -> DeviceResult<Vec<Device>> {
        let devices = self
            .store
            .list_by(&DeviceFilter::Brand(brand.to_string()))
            .await?;
        debug!(brand = %brand, count = devices.len(), "Listed devices by brand");
        Ok(devices)
    }

    pub async fn list_by_state(&self, state: DeviceState) -> DeviceResult<Vec<Device>> {
        let devices = self.store.list_by(&DeviceFilter::State(state)).await?;
        debug!(state = %state, count = devices.len(), "Listed devices by state");
        Ok(devices)
    }

    /// Delete a device that is not in use
    pub async fn delete(&self, id: DeviceId) -> DeviceResult<()> {
        let device = self.get_by_id(id).await?;

        if device.state.is_in_use() {
            warn!(device_id = id, "Refusing to delete device in use");
            return Err(DeviceError::Conflict(
                "Cannot delete a device that is in use".to_string(),
            ));
        }

        self.store.delete(&device).await?;

        info!(device_id = id, "Device deleted");
        Ok(())
    }

    /// Replace a device with `details`
    ///
    /// The stored id and creation time always win over the payload. The state
    /// is taken from the payload even when the device is in use.
    pub async fn full_update(&self, id: DeviceId, details: DeviceDetails) -> DeviceResult<Device> {
        ensure_not_blank("Name", &details.name)?;
        ensure_not_blank("Brand", &details.brand)?;

        let existing = self.get_by_id(id).await?;

        if existing.state.is_in_use() && violates_immutable_full(&existing, &details) {
            warn!(device_id = id, "Rejected name/brand change of device in use");
            return Err(DeviceError::Conflict(IN_USE_IDENTITY_CONFLICT.to_string()));
        }

        let replacement = Device {
            id: existing.id,
            name: details.name,
            brand: details.brand,
            state: details.state,
            creation_time: existing.creation_time,
        };

        let device = self.store.save(replacement).await?;

        info!(device_id = id, state = %device.state, "Device updated");
        Ok(device)
    }

    /// Apply only the supplied fields to a device
    pub async fn partial_update(
        &self,
        id: DeviceId,
        changes: DeviceChanges,
    ) -> DeviceResult<Device> {
        let existing = self.get_by_id(id).await?;

        if changes.creation_time_requested {
            warn!(device_id = id, "Rejected creation time change");
            return Err(DeviceError::Conflict(
                "Creation time cannot be updated".to_string(),
            ));
        }

        changes.ensure_valid()?;
        if let Some(name) = &changes.name {
            ensure_not_blank("Name", name)?;
        }
        if let Some(brand) = &changes.brand {
            ensure_not_blank("Brand", brand)?;
        }

        if existing.state.is_in_use() && violates_immutable_partial(&existing, &changes) {
            warn!(device_id = id, "Rejected name/brand change of device in use");
            return Err(DeviceError::Conflict(IN_USE_IDENTITY_CONFLICT.to_string()));
        }

        let device = self.store.save(changes.apply_to(&existing)).await?;

        info!(device_id = id, state = %device.state, "Device partially updated");
        Ok(device)
    }
}

fn not_found(id: DeviceId) -> DeviceError {
    DeviceError::NotFound(format!("Device with id {} was not found", id))
}
