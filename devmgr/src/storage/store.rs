//! Device store abstraction

use async_trait::async_trait;

use crate::errors::AppError;
use crate::models::device::{Device, DeviceFilter, DeviceId, NewDevice};

/// Persistence operations for device records
///
/// Implementations own the canonical copy of every device and guard their
/// own data; callers work on the clones they get back.
#[async_trait]
pub trait DeviceStore: Send + Sync {
    /// Get a device by id
    async fn get(&self, id: DeviceId) -> Result<Option<Device>, AppError>;

    /// List all devices in ascending id order
    async fn list(&self) -> Result<Vec<Device>, AppError>;

    /// List devices matching a filter, in ascending id order
    async fn list_by(&self, filter: &DeviceFilter) -> Result<Vec<Device>, AppError>;

    /// Insert a new device and assign its id
    async fn insert(&self, device: NewDevice) -> Result<Device, AppError>;

    /// Replace the stored record with the same id
    async fn save(&self, device: Device) -> Result<Device, AppError>;

    /// Remove a device
    async fn delete(&self, device: &Device) -> Result<(), AppError>;
}
