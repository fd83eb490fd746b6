//! Threshold alert evaluation and lifecycle service
//!
//! Every ingested reading is checked against the owning device's threshold
//! configuration. A breach opens an alert unless one is already open for the
//! same (device, metric, direction); resolving is an explicit operator
//! action, never automatic.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;

use crate::error::{AppError, AppResult};
use crate::models::{
    detect_breaches, AlertCause, AlertStatus, Breach, Direction, Metric, ThresholdConfig,
};
use crate::services::sensor_data::SensorReading;

/// Alert service for threshold evaluation and alert lifecycle
#[derive(Clone)]
pub struct AlertService {
    db: PgPool,
}

/// Alert row as stored
#[derive(Debug, Clone, sqlx::FromRow)]
struct AlertRecord {
    alert_id: i64,
    device_id: i64,
    metric: Metric,
    direction: Direction,
    sensor_value: f64,
    threshold: f64,
    created_at: DateTime<Utc>,
    status: AlertStatus,
}

/// Alert as served to the dashboard, with the derived display label
#[derive(Debug, Clone, Serialize)]
pub struct Alert {
    pub alert_id: i64,
    pub device_id: i64,
    pub metric: Metric,
    pub direction: Direction,
    pub alert_type: String,
    pub sensor_value: f64,
    pub threshold: f64,
    pub created_at: DateTime<Utc>,
    pub status: AlertStatus,
}

impl From<AlertRecord> for Alert {
    fn from(record: AlertRecord) -> Self {
        let alert_type = AlertCause::new(record.metric, record.direction).label();
        Alert {
            alert_id: record.alert_id,
            device_id: record.device_id,
            metric: record.metric,
            direction: record.direction,
            alert_type,
            sensor_value: record.sensor_value,
            threshold: record.threshold,
            created_at: record.created_at,
            status: record.status,
        }
    }
}

/// Input for updating an alert's status
#[derive(Debug, Deserialize)]
pub struct UpdateAlertInput {
    pub status: AlertStatus,
}

/// Outcome counts of one evaluation pass over a reading
#[derive(Debug, Clone, Copy, Default)]
pub struct EvaluationSummary {
    pub created: u32,
    pub suppressed: u32,
    pub failed: u32,
}

/// Device row reduced to what evaluation needs
#[derive(Debug, sqlx::FromRow)]
struct DeviceThresholdRow {
    device_id: i64,
    #[sqlx(flatten)]
    thresholds: ThresholdConfig,
}

impl AlertService {
    /// Create a new AlertService instance
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// All alerts, newest first
    pub async fn list(&self) -> AppResult<Vec<Alert>> {
        let records = sqlx::query_as::<_, AlertRecord>(
            r#"
            SELECT alert_id, device_id, metric, direction, sensor_value, threshold,
                   created_at, status
            FROM alerts
            ORDER BY created_at DESC
            "#,
        )
        .fetch_all(&self.db)
        .await?;

        Ok(records.into_iter().map(Alert::from).collect())
    }

    /// The open alert for a cause, if any
    pub async fn find_active(&self, device_id: i64, cause: AlertCause) -> AppResult<Option<Alert>> {
        let record = sqlx::query_as::<_, AlertRecord>(
            r#"
            SELECT alert_id, device_id, metric, direction, sensor_value, threshold,
                   created_at, status
            FROM alerts
            WHERE device_id = $1 AND metric = $2 AND direction = $3 AND status = $4
            "#,
        )
        .bind(device_id)
        .bind(cause.metric)
        .bind(cause.direction)
        .bind(AlertStatus::Active)
        .fetch_optional(&self.db)
        .await?;

        Ok(record.map(Alert::from))
    }

    /// Open a new Active alert unless one is already open for the cause.
    ///
    /// The pre-check keeps the common repeat-breach case to a single read.
    /// Concurrent evaluations of the same device can still pass the check
    /// together, so the insert itself is conditional on the partial unique
    /// index over Active rows; losing that race reports as suppressed.
    pub async fn open_if_absent(&self, device_id: i64, breach: &Breach) -> AppResult<Option<Alert>> {
        if self.find_active(device_id, breach.cause).await?.is_some() {
            return Ok(None);
        }

        let record = sqlx::query_as::<_, AlertRecord>(
            r#"
            INSERT INTO alerts (device_id, metric, direction, sensor_value, threshold,
                                created_at, status)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            ON CONFLICT (device_id, metric, direction) WHERE status = 'Active' DO NOTHING
            RETURNING alert_id, device_id, metric, direction, sensor_value, threshold,
                      created_at, status
            "#,
        )
        .bind(device_id)
        .bind(breach.cause.metric)
        .bind(breach.cause.direction)
        .bind(breach.value)
        .bind(breach.threshold)
        .bind(Utc::now())
        .bind(AlertStatus::Active)
        .fetch_optional(&self.db)
        .await?;

        Ok(record.map(Alert::from))
    }

    /// Evaluate a stored reading against its device's thresholds.
    ///
    /// A reading for an unregistered device is kept but never alerts. One
    /// failed insert does not stop the remaining candidates; the summary
    /// reports how far the pass got.
    pub async fn evaluate_reading(&self, reading: &SensorReading) -> AppResult<EvaluationSummary> {
        let device = sqlx::query_as::<_, DeviceThresholdRow>(
            r#"
            SELECT device_id,
                   threshold_moisture_low, threshold_moisture_high,
                   threshold_temp_low, threshold_temp_high,
                   threshold_ph_low, threshold_ph_high,
                   threshold_ec_low, threshold_ec_high,
                   threshold_salinity_low, threshold_salinity_high,
                   threshold_nitrogen_low, threshold_nitrogen_high,
                   threshold_phosphorus_low, threshold_phosphorus_high,
                   threshold_potassium_low, threshold_potassium_high
            FROM devices
            WHERE device_id = $1
            "#,
        )
        .bind(reading.device_id)
        .fetch_optional(&self.db)
        .await?;

        let Some(device) = device else {
            tracing::debug!(
                "No device {} registered, skipping alert evaluation",
                reading.device_id
            );
            return Ok(EvaluationSummary::default());
        };

        let mut summary = EvaluationSummary::default();
        for breach in detect_breaches(&reading.values, &device.thresholds) {
            match self.open_if_absent(device.device_id, &breach).await {
                Ok(Some(alert)) => {
                    tracing::info!(
                        "Opened alert {} ({}) for device {}: value {} crossed threshold {}",
                        alert.alert_id,
                        alert.alert_type,
                        alert.device_id,
                        breach.value,
                        breach.threshold
                    );
                    summary.created += 1;
                }
                Ok(None) => summary.suppressed += 1,
                Err(e) => {
                    tracing::error!(
                        "Failed to open {} alert for device {}: {}",
                        breach.cause.label(),
                        device.device_id,
                        e
                    );
                    summary.failed += 1;
                }
            }
        }

        Ok(summary)
    }

    /// Update an alert's status (operator resolution).
    ///
    /// Resolving is idempotent: a missing or already-resolved alert changes
    /// zero rows, which is reported rather than treated as an error. Alerts
    /// never return to Active; a later breach of the same cause opens a new
    /// row instead.
    pub async fn set_status(&self, alert_id: i64, status: AlertStatus) -> AppResult<u64> {
        if status == AlertStatus::Active {
            return Err(AppError::InvalidStateTransition(
                "Alerts cannot be reactivated; a new breach opens a new alert".to_string(),
            ));
        }

        let result = sqlx::query("UPDATE alerts SET status = $1 WHERE alert_id = $2 AND status <> $1")
            .bind(status)
            .bind(alert_id)
            .execute(&self.db)
            .await?;

        Ok(result.rows_affected())
    }
}
