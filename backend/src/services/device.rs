//! Device management service for field device registration and thresholds

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;

use crate::error::{AppError, AppResult};
use crate::models::{DeviceStatus, ThresholdConfig};
use shared::validation::{validate_latitude, validate_longitude};

/// Device service for managing field devices
#[derive(Clone)]
pub struct DeviceService {
    db: PgPool,
}

/// A registered field device with its alert threshold configuration
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Device {
    pub device_id: i64,
    pub device_name: String,
    pub location: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub status: DeviceStatus,
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub thresholds: ThresholdConfig,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Input for creating or replacing a device
///
/// Updates replace the whole record: omitting a threshold bound clears it,
/// which is how an operator disables alerting for that direction. Changed
/// thresholds apply from the next reading onward; existing alerts are left
/// untouched.
#[derive(Debug, Deserialize)]
pub struct DeviceInput {
    pub device_name: String,
    pub location: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub status: Option<DeviceStatus>,
    #[serde(flatten)]
    pub thresholds: ThresholdConfig,
}

impl DeviceService {
    /// Create a new DeviceService instance
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// Get all registered devices
    pub async fn list(&self) -> AppResult<Vec<Device>> {
        let devices = sqlx::query_as::<_, Device>(
            r#"
            SELECT device_id, device_name, location, latitude, longitude, status,
                   threshold_moisture_low, threshold_moisture_high,
                   threshold_temp_low, threshold_temp_high,
                   threshold_ph_low, threshold_ph_high,
                   threshold_ec_low, threshold_ec_high,
                   threshold_salinity_low, threshold_salinity_high,
                   threshold_nitrogen_low, threshold_nitrogen_high,
                   threshold_phosphorus_low, threshold_phosphorus_high,
                   threshold_potassium_low, threshold_potassium_high,
                   created_at, updated_at
            FROM devices
            ORDER BY device_name ASC
            "#,
        )
        .fetch_all(&self.db)
        .await?;

        Ok(devices)
    }

    /// Get a device by ID
    pub async fn get(&self, device_id: i64) -> AppResult<Device> {
        let device = sqlx::query_as::<_, Device>(
            r#"
            SELECT device_id, device_name, location, latitude, longitude, status,
                   threshold_moisture_low, threshold_moisture_high,
                   threshold_temp_low, threshold_temp_high,
                   threshold_ph_low, threshold_ph_high,
                   threshold_ec_low, threshold_ec_high,
                   threshold_salinity_low, threshold_salinity_high,
                   threshold_nitrogen_low, threshold_nitrogen_high,
                   threshold_phosphorus_low, threshold_phosphorus_high,
                   threshold_potassium_low, threshold_potassium_high,
                   created_at, updated_at
            FROM devices
            WHERE device_id = $1
            "#,
        )
        .bind(device_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Device".to_string()))?;

        Ok(device)
    }

    /// Register a new device
    pub async fn create(&self, input: DeviceInput) -> AppResult<Device> {
        validate_input(&input)?;

        let device = sqlx::query_as::<_, Device>(
            r#"
            INSERT INTO devices (device_name, location, latitude, longitude, status,
                                 threshold_moisture_low, threshold_moisture_high,
                                 threshold_temp_low, threshold_temp_high,
                                 threshold_ph_low, threshold_ph_high,
                                 threshold_ec_low, threshold_ec_high,
                                 threshold_salinity_low, threshold_salinity_high,
                                 threshold_nitrogen_low, threshold_nitrogen_high,
                                 threshold_phosphorus_low, threshold_phosphorus_high,
                                 threshold_potassium_low, threshold_potassium_high)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16,
                    $17, $18, $19, $20, $21)
            RETURNING device_id, device_name, location, latitude, longitude, status,
                      threshold_moisture_low, threshold_moisture_high,
                      threshold_temp_low, threshold_temp_high,
                      threshold_ph_low, threshold_ph_high,
                      threshold_ec_low, threshold_ec_high,
                      threshold_salinity_low, threshold_salinity_high,
                      threshold_nitrogen_low, threshold_nitrogen_high,
                      threshold_phosphorus_low, threshold_phosphorus_high,
                      threshold_potassium_low, threshold_potassium_high,
                      created_at, updated_at
            "#,
        )
        .bind(&input.device_name)
        .bind(&input.location)
        .bind(input.latitude)
        .bind(input.longitude)
        .bind(input.status.unwrap_or(DeviceStatus::Offline))
        .bind(input.thresholds.threshold_moisture_low)
        .bind(input.thresholds.threshold_moisture_high)
        .bind(input.thresholds.threshold_temp_low)
        .bind(input.thresholds.threshold_temp_high)
        .bind(input.thresholds.threshold_ph_low)
        .bind(input.thresholds.threshold_ph_high)
        .bind(input.thresholds.threshold_ec_low)
        .bind(input.thresholds.threshold_ec_high)
        .bind(input.thresholds.threshold_salinity_low)
        .bind(input.thresholds.threshold_salinity_high)
        .bind(input.thresholds.threshold_nitrogen_low)
        .bind(input.thresholds.threshold_nitrogen_high)
        .bind(input.thresholds.threshold_phosphorus_low)
        .bind(input.thresholds.threshold_phosphorus_high)
        .bind(input.thresholds.threshold_potassium_low)
        .bind(input.thresholds.threshold_potassium_high)
        .fetch_one(&self.db)
        .await?;

        Ok(device)
    }

    /// Replace a device's record, thresholds included
    pub async fn replace(&self, device_id: i64, input: DeviceInput) -> AppResult<Device> {
        validate_input(&input)?;

        let device = sqlx::query_as::<_, Device>(
            r#"
            UPDATE devices
            SET device_name = $1, location = $2, latitude = $3, longitude = $4, status = $5,
                threshold_moisture_low = $6, threshold_moisture_high = $7,
                threshold_temp_low = $8, threshold_temp_high = $9,
                threshold_ph_low = $10, threshold_ph_high = $11,
                threshold_ec_low = $12, threshold_ec_high = $13,
                threshold_salinity_low = $14, threshold_salinity_high = $15,
                threshold_nitrogen_low = $16, threshold_nitrogen_high = $17,
                threshold_phosphorus_low = $18, threshold_phosphorus_high = $19,
                threshold_potassium_low = $20, threshold_potassium_high = $21,
                updated_at = NOW()
            WHERE device_id = $22
            RETURNING device_id, device_name, location, latitude, longitude, status,
                      threshold_moisture_low, threshold_moisture_high,
                      threshold_temp_low, threshold_temp_high,
                      threshold_ph_low, threshold_ph_high,
                      threshold_ec_low, threshold_ec_high,
                      threshold_salinity_low, threshold_salinity_high,
                      threshold_nitrogen_low, threshold_nitrogen_high,
                      threshold_phosphorus_low, threshold_phosphorus_high,
                      threshold_potassium_low, threshold_potassium_high,
                      created_at, updated_at
            "#,
        )
        .bind(&input.device_name)
        .bind(&input.location)
        .bind(input.latitude)
        .bind(input.longitude)
        .bind(input.status.unwrap_or(DeviceStatus::Offline))
        .bind(input.thresholds.threshold_moisture_low)
        .bind(input.thresholds.threshold_moisture_high)
        .bind(input.thresholds.threshold_temp_low)
        .bind(input.thresholds.threshold_temp_high)
        .bind(input.thresholds.threshold_ph_low)
        .bind(input.thresholds.threshold_ph_high)
        .bind(input.thresholds.threshold_ec_low)
        .bind(input.thresholds.threshold_ec_high)
        .bind(input.thresholds.threshold_salinity_low)
        .bind(input.thresholds.threshold_salinity_high)
        .bind(input.thresholds.threshold_nitrogen_low)
        .bind(input.thresholds.threshold_nitrogen_high)
        .bind(input.thresholds.threshold_phosphorus_low)
        .bind(input.thresholds.threshold_phosphorus_high)
        .bind(input.thresholds.threshold_potassium_low)
        .bind(input.thresholds.threshold_potassium_high)
        .bind(device_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Device".to_string()))?;

        Ok(device)
    }

    /// Delete a device along with the readings and alerts it owns
    pub async fn delete(&self, device_id: i64) -> AppResult<()> {
        let mut tx = self.db.begin().await?;

        // sensor_data carries no foreign key (readings outlive registry
        // changes), so its rows are removed here together with the alerts.
        sqlx::query("DELETE FROM sensor_data WHERE device_id = $1")
            .bind(device_id)
            .execute(&mut *tx)
            .await?;

        sqlx::query("DELETE FROM alerts WHERE device_id = $1")
            .bind(device_id)
            .execute(&mut *tx)
            .await?;

        let result = sqlx::query("DELETE FROM devices WHERE device_id = $1")
            .bind(device_id)
            .execute(&mut *tx)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Device".to_string()));
        }

        tx.commit().await?;

        Ok(())
    }
}

/// Validate a device create/replace payload.
///
/// Threshold bounds are deliberately not cross-checked: low and high are
/// independent, and an inverted pair is tolerated by the evaluator.
fn validate_input(input: &DeviceInput) -> AppResult<()> {
    if input.device_name.trim().is_empty() {
        return Err(AppError::Validation {
            field: "device_name".to_string(),
            message: "Device name cannot be empty".to_string(),
        });
    }

    if let Some(latitude) = input.latitude {
        validate_latitude(latitude).map_err(|message| AppError::Validation {
            field: "latitude".to_string(),
            message: message.to_string(),
        })?;
    }

    if let Some(longitude) = input.longitude {
        validate_longitude(longitude).map_err(|message| AppError::Validation {
            field: "longitude".to_string(),
            message: message.to_string(),
        })?;
    }

    Ok(())
}
