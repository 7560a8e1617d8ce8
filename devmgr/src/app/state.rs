//! Application state management

use std::sync::Arc;

use tracing::{info, warn};

use crate::app::options::StorageOptions;
use crate::devices::service::DeviceService;
use crate::errors::AppError;
use crate::filesys::file::File;
use crate::storage::device::JsonFileDeviceStore;
use crate::storage::memory::InMemoryDeviceStore;
use crate::storage::settings::StoreKind;
use crate::storage::store::DeviceStore;

/// Main application state
pub struct AppState {
    /// Device store backend
    pub store: Arc<dyn DeviceStore>,

    /// Which backend `store` is
    pub store_kind: StoreKind,

    /// Device service
    pub service: Arc<DeviceService>,
}

impl AppState {
    /// Initialize application state
    pub async fn init(storage: &StorageOptions) -> Result<Self, AppError> {
        info!("Initializing application state...");

        let store: Arc<dyn DeviceStore> = match storage.kind {
            StoreKind::Memory => {
                info!("Using in-memory device store");
                Arc::new(InMemoryDeviceStore::new())
            }
            StoreKind::File => {
                info!(
                    "Using device file store at {}",
                    storage.devices_file.display()
                );
                let store = JsonFileDeviceStore::new(File::new(storage.devices_file.clone()));
                // Fail at startup rather than on the first request
                store.list().await?;
                Arc::new(store)
            }
        };

        let service = Arc::new(DeviceService::new(store.clone()));

        Ok(Self {
            store,
            store_kind: storage.kind,
            service,
        })
    }

    /// Shutdown application state
    pub async fn shutdown(&self) -> Result<(), AppError> {
        info!("Shutting down application state...");

        let devices = self.store.list().await?;
        match self.store_kind {
            StoreKind::Memory if !devices.is_empty() => {
                warn!("Discarding {} in-memory devices", devices.len());
            }
            StoreKind::Memory => {}
            StoreKind::File => info!("{} devices persisted", devices.len()),
        }

        Ok(())
    }
}
