//! Route definitions for the Smart Agriculture Monitoring Platform

use axum::{
    routing::{get, put},
    Router,
};

use crate::{handlers, AppState};

/// Create API routes
pub fn api_routes() -> Router<AppState> {
    Router::new()
        // Health check
        .route("/health", get(handlers::health_check))
        // Device management
        .nest("/devices", device_routes())
        // Telemetry ingestion and history
        .nest("/sensor-data", sensor_data_routes())
        // User management
        .nest("/users", user_routes())
        // Alert listing and resolution
        .nest("/alerts", alert_routes())
}

/// Device management routes
fn device_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(handlers::list_devices).post(handlers::create_device),
        )
        .route(
            "/:device_id",
            get(handlers::get_device)
                .put(handlers::update_device)
                .delete(handlers::delete_device),
        )
}

/// Sensor data routes
fn sensor_data_routes() -> Router<AppState> {
    Router::new().route(
        "/",
        get(handlers::list_sensor_data).post(handlers::ingest_sensor_data),
    )
}

/// User management routes
fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::list_users).post(handlers::create_user))
        .route(
            "/:user_id",
            put(handlers::update_user).delete(handlers::delete_user),
        )
}

/// Alert routes
fn alert_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::list_alerts))
        .route("/:alert_id", put(handlers::update_alert))
}
