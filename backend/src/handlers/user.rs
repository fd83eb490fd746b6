//! User management HTTP handlers

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};

use crate::services::user::{CreateUserInput, UpdateUserInput, UserService};
use crate::AppState;

/// List all user accounts
pub async fn list_users(State(state): State<AppState>) -> impl IntoResponse {
    let service = UserService::new(state.db.clone());

    match service.list().await {
        Ok(users) => (StatusCode::OK, Json(users)).into_response(),
        Err(e) => e.into_response(),
    }
}

/// Create a new user account
pub async fn create_user(
    State(state): State<AppState>,
    Json(input): Json<CreateUserInput>,
) -> impl IntoResponse {
    let service = UserService::new(state.db.clone());

    match service.create(input).await {
        Ok(user) => (StatusCode::CREATED, Json(user)).into_response(),
        Err(e) => e.into_response(),
    }
}

/// Update a user account
pub async fn update_user(
    State(state): State<AppState>,
    Path(user_id): Path<i64>,
    Json(input): Json<UpdateUserInput>,
) -> impl IntoResponse {
    let service = UserService::new(state.db.clone());

    match service.update(user_id, input).await {
        Ok(user) => (StatusCode::OK, Json(user)).into_response(),
        Err(e) => e.into_response(),
    }
}

/// Delete a user account
pub async fn delete_user(
    State(state): State<AppState>,
    Path(user_id): Path<i64>,
) -> impl IntoResponse {
    let service = UserService::new(state.db.clone());

    match service.delete(user_id).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => e.into_response(),
    }
}
