//! Device file management
//!
//! Keeps the whole device table in a single JSON document. Every mutation
//! rewrites the document atomically while holding the table lock, so a
//! load-modify-write of one call never interleaves with another.

use std::collections::BTreeMap;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::sync::{Mutex, MutexGuard};
use tracing::debug;

use crate::errors::AppError;
use crate::filesys::file::File;
use crate::models::device::{Device, DeviceFilter, DeviceId, NewDevice};
use crate::storage::store::DeviceStore;

/// On-disk layout of the device file
#[derive(Debug, Clone, Serialize, Deserialize)]
struct DeviceTable {
    /// Next id to hand out; survives deletes and restarts
    next_id: DeviceId,

    /// Devices keyed by id
    #[serde(default)]
    devices: BTreeMap<DeviceId, Device>,
}

impl Default for DeviceTable {
    fn default() -> Self {
        Self {
            next_id: 1,
            devices: BTreeMap::new(),
        }
    }
}

/// Device store persisted to a JSON file
pub struct JsonFileDeviceStore {
    file: File,
    table: Mutex<Option<DeviceTable>>,
}

impl JsonFileDeviceStore {
    pub fn new(file: File) -> Self {
        Self {
            file,
            table: Mutex::new(None),
        }
    }

    /// Get the backing file
    pub fn file(&self) -> &File {
        &self.file
    }

    async fn lock(&self) -> Result<MutexGuard<'_, Option<DeviceTable>>, AppError> {
        let mut guard = self.table.lock().await;
        if guard.is_none() {
            let table = if self.file.exists().await {
                debug!("Loading devices from {}", self.file.path().display());
                self.file.read_json::<DeviceTable>().await?
            } else {
                DeviceTable::default()
            };
            *guard = Some(table);
        }
        Ok(guard)
    }

    async fn persist(&self, table: &DeviceTable) -> Result<(), AppError> {
        self.file.write_json_atomic(table).await
    }
}

fn loaded(guard: &mut Option<DeviceTable>) -> Result<&mut DeviceTable, AppError> {
    guard
        .as_mut()
        .ok_or_else(|| AppError::StorageError("Device table not loaded".to_string()))
}

#[async_trait]
impl DeviceStore for JsonFileDeviceStore {
    async fn get(&self, id: DeviceId) -> Result<Option<Device>, AppError> {
        let mut guard = self.lock().await?;
        let table = loaded(&mut guard)?;
        Ok(table.devices.get(&id).cloned())
    }

    async fn list(&self) -> Result<Vec<Device>, AppError> {
        let mut guard = self.lock().await?;
        let table = loaded(&mut guard)?;
        Ok(table.devices.values().cloned().collect())
    }

    async fn list_by(&self, filter: &DeviceFilter) -> Result<Vec<Device>, AppError> {
        let mut guard = self.lock().await?;
        let table = loaded(&mut guard)?;
        Ok(table
            .devices
            .values()
            .filter(|device| filter.matches(device))
            .cloned()
            .collect())
    }

    async fn insert(&self, device: NewDevice) -> Result<Device, AppError> {
        let mut guard = self.lock().await?;
        let table = loaded(&mut guard)?;

        let mut updated = table.clone();
        let device = device.with_id(updated.next_id);
        updated.next_id += 1;
        updated.devices.insert(device.id, device.clone());

        self.persist(&updated).await?;
        *table = updated;
        Ok(device)
    }

    async fn save(&self, device: Device) -> Result<Device, AppError> {
        let mut guard = self.lock().await?;
        let table = loaded(&mut guard)?;

        if !table.devices.contains_key(&device.id) {
            return Err(AppError::StorageError(format!(
                "Device {} does not exist",
                device.id
            )));
        }

        let mut updated = table.clone();
        updated.devices.insert(device.id, device.clone());

        self.persist(&updated).await?;
        *table = updated;
        Ok(device)
    }

    async fn delete(&self, device: &Device) -> Result<(), AppError> {
        let mut guard = self.lock().await?;
        let table = loaded(&mut guard)?;

        let mut updated = table.clone();
        if updated.devices.remove(&device.id).is_none() {
            return Ok(());
        }

        self.persist(&updated).await?;
        *table = updated;
        Ok(())
    }
}
