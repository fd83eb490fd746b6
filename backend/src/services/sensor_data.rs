//! Sensor reading ingestion and history service

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;

use crate::error::AppResult;
use crate::models::SensorValues;

/// Default page size for the history endpoint, matching the dashboard's
/// chart window.
const DEFAULT_LIMIT: i64 = 100;
const MAX_LIMIT: i64 = 1000;

/// Reading service for telemetry ingestion and history queries
#[derive(Clone)]
pub struct ReadingService {
    db: PgPool,
}

/// A stored sensor reading
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct SensorReading {
    pub id: i64,
    /// Reading time as reported by the device, not the time of arrival.
    pub timestamp: DateTime<Utc>,
    pub device_id: i64,
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub values: SensorValues,
}

/// Input for ingesting a reading
#[derive(Debug, Deserialize)]
pub struct IngestReadingInput {
    pub timestamp: DateTime<Utc>,
    pub device_id: i64,
    #[serde(flatten)]
    pub values: SensorValues,
}

/// Query parameters for the reading history endpoint
#[derive(Debug, Deserialize)]
pub struct ReadingsQuery {
    #[serde(rename = "deviceId")]
    pub device_id: Option<i64>,
    pub limit: Option<i64>,
}

impl ReadingService {
    /// Create a new ReadingService instance
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// Store a reading exactly as reported.
    ///
    /// Readings are accepted even when the device is unknown: telemetry
    /// durability does not depend on the device registry, and the alert pass
    /// afterwards simply skips readings it cannot attribute.
    pub async fn ingest(&self, input: IngestReadingInput) -> AppResult<SensorReading> {
        let reading = sqlx::query_as::<_, SensorReading>(
            r#"
            INSERT INTO sensor_data (timestamp, device_id, moisture_percent, temperature_celsius,
                                     ec_us_cm, salinity_mg_l, ph, nitrogen_mg_kg,
                                     phosphorus_mg_kg, potassium_mg_kg)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            RETURNING id, timestamp, device_id, moisture_percent, temperature_celsius,
                      ec_us_cm, salinity_mg_l, ph, nitrogen_mg_kg,
                      phosphorus_mg_kg, potassium_mg_kg
            "#,
        )
        .bind(input.timestamp)
        .bind(input.device_id)
        .bind(input.values.moisture_percent)
        .bind(input.values.temperature_celsius)
        .bind(input.values.ec_us_cm)
        .bind(input.values.salinity_mg_l)
        .bind(input.values.ph)
        .bind(input.values.nitrogen_mg_kg)
        .bind(input.values.phosphorus_mg_kg)
        .bind(input.values.potassium_mg_kg)
        .fetch_one(&self.db)
        .await?;

        Ok(reading)
    }

    /// Reading history, newest first, optionally filtered by device
    pub async fn list(&self, query: &ReadingsQuery) -> AppResult<Vec<SensorReading>> {
        let limit = query.limit.unwrap_or(DEFAULT_LIMIT).clamp(1, MAX_LIMIT);

        let readings = match query.device_id {
            Some(device_id) => {
                sqlx::query_as::<_, SensorReading>(
                    r#"
                    SELECT id, timestamp, device_id, moisture_percent, temperature_celsius,
                           ec_us_cm, salinity_mg_l, ph, nitrogen_mg_kg,
                           phosphorus_mg_kg, potassium_mg_kg
                    FROM sensor_data
                    WHERE device_id = $1
                    ORDER BY timestamp DESC
                    LIMIT $2
                    "#,
                )
                .bind(device_id)
                .bind(limit)
                .fetch_all(&self.db)
                .await?
            }
            None => {
                sqlx::query_as::<_, SensorReading>(
                    r#"
                    SELECT id, timestamp, device_id, moisture_percent, temperature_celsius,
                           ec_us_cm, salinity_mg_l, ph, nitrogen_mg_kg,
                           phosphorus_mg_kg, potassium_mg_kg
                    FROM sensor_data
                    ORDER BY timestamp DESC
                    LIMIT $1
                    "#,
                )
                .bind(limit)
                .fetch_all(&self.db)
                .await?
            }
        };

        Ok(readings)
    }
}
