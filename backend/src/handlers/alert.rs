//! Alert listing and resolution HTTP handlers

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};

use crate::services::alert::{AlertService, UpdateAlertInput};
use crate::AppState;

/// List all alerts, newest first
pub async fn list_alerts(State(state): State<AppState>) -> impl IntoResponse {
    let service = AlertService::new(state.db.clone());

    match service.list().await {
        Ok(alerts) => (StatusCode::OK, Json(alerts)).into_response(),
        Err(e) => e.into_response(),
    }
}

/// Update an alert's status (operator resolution).
///
/// Responds with the number of rows changed; resolving an alert that is
/// already resolved or missing reports zero without failing.
pub async fn update_alert(
    State(state): State<AppState>,
    Path(alert_id): Path<i64>,
    Json(input): Json<UpdateAlertInput>,
) -> impl IntoResponse {
    let service = AlertService::new(state.db.clone());

    match service.set_status(alert_id, input.status).await {
        Ok(updated) => (
            StatusCode::OK,
            Json(serde_json::json!({ "updated": updated })),
        )
            .into_response(),
        Err(e) => e.into_response(),
    }
}
