//! Server state

use std::sync::Arc;

use crate::devices::service::DeviceService;

/// Server state shared across handlers
pub struct ServerState {
    pub service: Arc<DeviceService>,
}

impl ServerState {
    pub fn new(service: Arc<DeviceService>) -> Self {
        Self { service }
    }
}
