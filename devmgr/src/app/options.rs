//! Application configuration options

use std::path::PathBuf;
use std::time::Duration;

use crate::storage::layout::StorageLayout;
use crate::storage::settings::{Settings, StoreKind};

/// Main application options
#[derive(Debug, Clone, Default)]
pub struct AppOptions {
    /// Lifecycle configuration
    pub lifecycle: LifecycleOptions,

    /// Storage configuration
    pub storage: StorageOptions,

    /// Server configuration
    pub server: ServerOptions,
}

impl AppOptions {
    /// Build runtime options from a settings file
    pub fn from_settings(settings: &Settings, layout: &StorageLayout) -> Self {
        let devices_file = settings
            .store
            .path
            .clone()
            .unwrap_or_else(|| layout.devices_file().path().to_path_buf());

        Self {
            lifecycle: LifecycleOptions {
                max_shutdown_delay: Duration::from_secs(settings.max_shutdown_delay_secs),
            },
            storage: StorageOptions {
                kind: settings.store.kind,
                devices_file,
            },
            server: ServerOptions {
                host: settings.server.host.clone(),
                port: settings.server.port,
            },
        }
    }
}

/// Lifecycle options
#[derive(Debug, Clone)]
pub struct LifecycleOptions {
    /// Maximum delay for graceful shutdown
    pub max_shutdown_delay: Duration,
}

impl Default for LifecycleOptions {
    fn default() -> Self {
        Self {
            max_shutdown_delay: Duration::from_secs(30),
        }
    }
}

/// Device store options
#[derive(Debug, Clone)]
pub struct StorageOptions {
    /// Store backend
    pub kind: StoreKind,

    /// Devices file, used by the file backend
    pub devices_file: PathBuf,
}

impl Default for StorageOptions {
    fn default() -> Self {
        Self {
            kind: StoreKind::Memory,
            devices_file: StorageLayout::default().devices_file().path().to_path_buf(),
        }
    }
}

/// HTTP server options
#[derive(Debug, Clone)]
pub struct ServerOptions {
    /// Host to bind to
    pub host: String,

    /// Port to listen on
    pub port: u16,
}

impl Default for ServerOptions {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8080,
        }
    }
}
