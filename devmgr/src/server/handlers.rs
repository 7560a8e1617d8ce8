//! HTTP request handlers

use std::sync::Arc;

use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection, QueryRejection},
        Path, Query, State,
    },
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use openapi_server::models::{
    self as api, DeviceCreationRequest, DeviceListQuery, DevicePatchRequest, DeviceUpdateRequest,
    HealthResponse, VersionResponse,
};

use crate::devices::error::DeviceError;
use crate::models::device::{Device, DeviceChanges, DeviceId};
use crate::server::state::ServerState;
use crate::utils::version_info;

/// Health check handler
pub async fn health_handler() -> impl IntoResponse {
    let version = version_info();
    Json(HealthResponse {
        status: "healthy".to_string(),
        service: "devmgr".to_string(),
        version: version.version,
    })
}

/// Version handler
pub async fn version_handler() -> impl IntoResponse {
    let version = version_info();
    Json(VersionResponse {
        version: version.version,
        git_hash: version.git_hash,
        build_time: version.build_time,
    })
}

/// Create device handler
pub async fn create_device_handler(
    State(state): State<Arc<ServerState>>,
    payload: Result<Json<DeviceCreationRequest>, JsonRejection>,
) -> Result<impl IntoResponse, DeviceError> {
    let Json(request) = payload.map_err(|e| DeviceError::Validation(e.body_text()))?;

    let device = state.service.create(request.name, request.brand).await?;

    Ok((StatusCode::CREATED, Json(api::Device::from(device))))
}

/// Get device by id handler
pub async fn get_device_handler(
    State(state): State<Arc<ServerState>>,
    id: Result<Path<DeviceId>, PathRejection>,
) -> Result<impl IntoResponse, DeviceError> {
    let Path(id) = id.map_err(|e| DeviceError::Validation(e.body_text()))?;

    let device = state.service.get_by_id(id).await?;

    Ok(Json(api::Device::from(device)))
}

/// List devices handler, optionally filtered by brand or state
pub async fn list_devices_handler(
    State(state): State<Arc<ServerState>>,
    query: Result<Query<DeviceListQuery>, QueryRejection>,
) -> Result<impl IntoResponse, DeviceError> {
    let Query(query) = query.map_err(|e| DeviceError::Validation(e.body_text()))?;

    let devices = match (query.brand, query.state) {
        (Some(_), Some(_)) => {
            return Err(DeviceError::Validation(
                "Filter by either brand or state, not both".to_string(),
            ));
        }
        (Some(brand), None) => state.service.list_by_brand(&brand).await?,
        (None, Some(device_state)) => state.service.list_by_state(device_state.into()).await?,
        (None, None) => state.service.list_all().await?,
    };

    Ok(Json(to_api_devices(devices)))
}

/// Delete device handler
pub async fn delete_device_handler(
    State(state): State<Arc<ServerState>>,
    id: Result<Path<DeviceId>, PathRejection>,
) -> Result<StatusCode, DeviceError> {
    let Path(id) = id.map_err(|e| DeviceError::Validation(e.body_text()))?;

    state.service.delete(id).await?;

    Ok(StatusCode::OK)
}

/// Full update handler
pub async fn update_device_handler(
    State(state): State<Arc<ServerState>>,
    id: Result<Path<DeviceId>, PathRejection>,
    payload: Result<Json<DeviceUpdateRequest>, JsonRejection>,
) -> Result<impl IntoResponse, DeviceError> {
    let Path(id) = id.map_err(|e| DeviceError::Validation(e.body_text()))?;
    let Json(request) = payload.map_err(|e| DeviceError::Validation(e.body_text()))?;

    let device = state.service.full_update(id, request.into()).await?;

    Ok(Json(api::Device::from(device)))
}

/// Partial update handler
pub async fn patch_device_handler(
    State(state): State<Arc<ServerState>>,
    id: Result<Path<DeviceId>, PathRejection>,
    payload: Result<Json<DevicePatchRequest>, JsonRejection>,
) -> Result<impl IntoResponse, DeviceError> {
    let Path(id) = id.map_err(|e| DeviceError::Validation(e.body_text()))?;
    let Json(fields) = payload.map_err(|e| DeviceError::Validation(e.body_text()))?;

    let changes = DeviceChanges::from_fields(fields);
    let device = state.service.partial_update(id, changes).await?;

    Ok(Json(api::Device::from(device)))
}

fn to_api_devices(devices: Vec<Device>) -> Vec<api::Device> {
    devices.into_iter().map(api::Device::from).collect()
}
