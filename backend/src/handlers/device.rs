//! Device management HTTP handlers

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};

use crate::services::device::{DeviceInput, DeviceService};
use crate::AppState;

/// List all registered devices
pub async fn list_devices(State(state): State<AppState>) -> impl IntoResponse {
    let service = DeviceService::new(state.db.clone());

    match service.list().await {
        Ok(devices) => (StatusCode::OK, Json(devices)).into_response(),
        Err(e) => e.into_response(),
    }
}

/// Get a single device
pub async fn get_device(
    State(state): State<AppState>,
    Path(device_id): Path<i64>,
) -> impl IntoResponse {
    let service = DeviceService::new(state.db.clone());

    match service.get(device_id).await {
        Ok(device) => (StatusCode::OK, Json(device)).into_response(),
        Err(e) => e.into_response(),
    }
}

/// Register a new device
pub async fn create_device(
    State(state): State<AppState>,
    Json(input): Json<DeviceInput>,
) -> impl IntoResponse {
    let service = DeviceService::new(state.db.clone());

    match service.create(input).await {
        Ok(device) => (StatusCode::CREATED, Json(device)).into_response(),
        Err(e) => e.into_response(),
    }
}

/// Replace a device's record, thresholds included
pub async fn update_device(
    State(state): State<AppState>,
    Path(device_id): Path<i64>,
    Json(input): Json<DeviceInput>,
) -> impl IntoResponse {
    let service = DeviceService::new(state.db.clone());

    match service.replace(device_id, input).await {
        Ok(device) => (StatusCode::OK, Json(device)).into_response(),
        Err(e) => e.into_response(),
    }
}

/// Delete a device together with its readings and alerts
pub async fn delete_device(
    State(state): State<AppState>,
    Path(device_id): Path<i64>,
) -> impl IntoResponse {
    let service = DeviceService::new(state.db.clone());

    match service.delete(device_id).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => e.into_response(),
    }
}
