//! Conversions between domain types and API models

use openapi_server::models as api;

use crate::models::device::{Device, DeviceDetails, DeviceState};

impl From<api::DeviceState> for DeviceState {
    fn from(state: api::DeviceState) -> Self {
        match state {
            api::DeviceState::Available => DeviceState::Available,
            api::DeviceState::InUse => DeviceState::InUse,
            api::DeviceState::Inactive => DeviceState::Inactive,
        }
    }
}

impl From<DeviceState> for api::DeviceState {
    fn from(state: DeviceState) -> Self {
        match state {
            DeviceState::Available => api::DeviceState::Available,
            DeviceState::InUse => api::DeviceState::InUse,
            DeviceState::Inactive => api::DeviceState::Inactive,
        }
    }
}

impl From<Device> for api::Device {
    fn from(device: Device) -> Self {
        api::Device {
            id: device.id,
            name: device.name,
            brand: device.brand,
            state: device.state.into(),
            creation_time: device.creation_time,
        }
    }
}

impl From<api::DeviceUpdateRequest> for DeviceDetails {
    fn from(request: api::DeviceUpdateRequest) -> Self {
        DeviceDetails {
            id: request.id,
            name: request.name,
            brand: request.brand,
            state: request.state.into(),
            creation_time: request.creation_time,
        }
    }
}
