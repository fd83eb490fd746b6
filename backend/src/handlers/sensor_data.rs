//! Sensor data ingestion and history HTTP handlers

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};

use crate::services::alert::AlertService;
use crate::services::sensor_data::{IngestReadingInput, ReadingService, ReadingsQuery};
use crate::AppState;

/// List stored readings, newest first
pub async fn list_sensor_data(
    State(state): State<AppState>,
    Query(query): Query<ReadingsQuery>,
) -> impl IntoResponse {
    let service = ReadingService::new(state.db.clone());

    match service.list(&query).await {
        Ok(readings) => (StatusCode::OK, Json(readings)).into_response(),
        Err(e) => e.into_response(),
    }
}

/// Ingest a device reading, then evaluate threshold alerts.
///
/// Reading durability and alert derivation are independent: once the row is
/// stored the endpoint reports success, and evaluation problems are only
/// logged.
pub async fn ingest_sensor_data(
    State(state): State<AppState>,
    Json(input): Json<IngestReadingInput>,
) -> impl IntoResponse {
    let readings = ReadingService::new(state.db.clone());

    let reading = match readings.ingest(input).await {
        Ok(reading) => reading,
        Err(e) => return e.into_response(),
    };

    let alerts = AlertService::new(state.db.clone());
    match alerts.evaluate_reading(&reading).await {
        Ok(summary) => {
            tracing::debug!(
                "Evaluated reading {}: {} alerts created, {} suppressed, {} failed",
                reading.id,
                summary.created,
                summary.suppressed,
                summary.failed
            );
        }
        Err(e) => {
            tracing::warn!("Alert evaluation failed for reading {}: {}", reading.id, e);
        }
    }

    (StatusCode::CREATED, Json(reading)).into_response()
}
