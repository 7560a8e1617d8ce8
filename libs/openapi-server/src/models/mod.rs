//! Device manager API models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Health response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub service: String,
    pub version: String,
}

/// Version response
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VersionResponse {
    pub version: String,
    pub git_hash: String,
    pub build_time: String,
}

/// Device lifecycle state as it appears on the wire
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DeviceState {
    Available,
    InUse,
    Inactive,
}

/// Device response
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Device {
    pub id: u64,
    pub name: String,
    pub brand: String,
    pub state: DeviceState,
    pub creation_time: DateTime<Utc>,
}

/// Device creation request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeviceCreationRequest {
    pub name: String,
    pub brand: String,
}

/// Full device update request
///
/// `id` and `creationTime` are accepted so a client can send back a device it
/// previously read, but the server always keeps the stored values.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeviceUpdateRequest {
    #[serde(default)]
    pub id: Option<u64>,
    pub name: String,
    pub brand: String,
    pub state: DeviceState,
    #[serde(default)]
    pub creation_time: Option<DateTime<Utc>>,
}

/// Partial device update request: only the keys to change
pub type DevicePatchRequest = serde_json::Map<String, serde_json::Value>;

/// Device list query parameters
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DeviceListQuery {
    pub brand: Option<String>,
    pub state: Option<DeviceState>,
}

/// Error response body
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: u16,
}
