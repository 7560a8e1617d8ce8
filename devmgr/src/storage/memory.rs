//! In-memory device store

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::RwLock;

use async_trait::async_trait;

use crate::errors::AppError;
use crate::models::device::{Device, DeviceFilter, DeviceId, NewDevice};
use crate::storage::store::DeviceStore;

/// Device store backed by an ordered map
pub struct InMemoryDeviceStore {
    devices: RwLock<BTreeMap<DeviceId, Device>>,
    next_id: AtomicU64,
}

impl InMemoryDeviceStore {
    pub fn new() -> Self {
        Self {
            devices: RwLock::new(BTreeMap::new()),
            next_id: AtomicU64::new(1),
        }
    }

    /// Number of stored devices
    pub fn len(&self) -> usize {
        let devices = self.devices.read().unwrap_or_else(|e| e.into_inner());
        devices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for InMemoryDeviceStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl DeviceStore for InMemoryDeviceStore {
    async fn get(&self, id: DeviceId) -> Result<Option<Device>, AppError> {
        let devices = self.devices.read().unwrap_or_else(|e| e.into_inner());
        Ok(devices.get(&id).cloned())
    }

    async fn list(&self) -> Result<Vec<Device>, AppError> {
        let devices = self.devices.read().unwrap_or_else(|e| e.into_inner());
        Ok(devices.values().cloned().collect())
    }

    async fn list_by(&self, filter: &DeviceFilter) -> Result<Vec<Device>, AppError> {
        let devices = self.devices.read().unwrap_or_else(|e| e.into_inner());
        Ok(devices
            .values()
            .filter(|device| filter.matches(device))
            .cloned()
            .collect())
    }

    async fn insert(&self, device: NewDevice) -> Result<Device, AppError> {
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        let device = device.with_id(id);

        let mut devices = self.devices.write().unwrap_or_else(|e| e.into_inner());
        devices.insert(id, device.clone());
        Ok(device)
    }

    async fn save(&self, device: Device) -> Result<Device, AppError> {
        let mut devices = self.devices.write().unwrap_or_else(|e| e.into_inner());
        match devices.get_mut(&device.id) {
            Some(stored) => {
                *stored = device.clone();
                Ok(device)
            }
            None => Err(AppError::StorageError(format!(
                "Device {} does not exist",
                device.id
            ))),
        }
    }

    async fn delete(&self, device: &Device) -> Result<(), AppError> {
        let mut devices = self.devices.write().unwrap_or_else(|e| e.into_inner());
        devices.remove(&device.id);
        Ok(())
    }
}
