//! User account management service
//!
//! Passwords are stored as bcrypt hashes and never leave the database. Note
//! that the platform currently has no authentication layer in front of the
//! admin endpoints; accounts only gate the dashboard UI.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;

use crate::error::{AppError, AppResult};
use crate::models::UserRole;
use shared::validation::{validate_email, validate_password};

/// User service for managing dashboard accounts
#[derive(Clone)]
pub struct UserService {
    db: PgPool,
}

/// A dashboard user account, without the password hash
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct User {
    pub user_id: i64,
    pub name: String,
    pub email: String,
    pub role: UserRole,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Input for creating a user
#[derive(Debug, Deserialize)]
pub struct CreateUserInput {
    pub name: String,
    pub email: String,
    pub password: String,
    pub role: UserRole,
}

/// Input for updating a user; the password is only rehashed when provided
#[derive(Debug, Deserialize)]
pub struct UpdateUserInput {
    pub name: String,
    pub email: String,
    pub role: UserRole,
    pub password: Option<String>,
}

impl UserService {
    /// Create a new UserService instance
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// Get all user accounts
    pub async fn list(&self) -> AppResult<Vec<User>> {
        let users = sqlx::query_as::<_, User>(
            r#"
            SELECT user_id, name, email, role, created_at, updated_at
            FROM users
            ORDER BY name ASC
            "#,
        )
        .fetch_all(&self.db)
        .await?;

        Ok(users)
    }

    /// Create a new user account
    pub async fn create(&self, input: CreateUserInput) -> AppResult<User> {
        validate_account_fields(&input.name, &input.email)?;
        validate_password(&input.password).map_err(|message| AppError::Validation {
            field: "password".to_string(),
            message: message.to_string(),
        })?;

        // Check for duplicate email
        let existing = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM users WHERE LOWER(email) = LOWER($1)",
        )
        .bind(&input.email)
        .fetch_one(&self.db)
        .await?;

        if existing > 0 {
            return Err(AppError::DuplicateEntry("email".to_string()));
        }

        let password_hash = hash_password(&input.password)?;

        let user = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (name, email, password_hash, role)
            VALUES ($1, $2, $3, $4)
            RETURNING user_id, name, email, role, created_at, updated_at
            "#,
        )
        .bind(&input.name)
        .bind(&input.email)
        .bind(&password_hash)
        .bind(input.role)
        .fetch_one(&self.db)
        .await
        .map_err(|e| match &e {
            // The unique constraint closes the race left by the pre-check.
            sqlx::Error::Database(db) if db.is_unique_violation() => {
                AppError::DuplicateEntry("email".to_string())
            }
            _ => AppError::DatabaseError(e),
        })?;

        Ok(user)
    }

    /// Update a user account
    pub async fn update(&self, user_id: i64, input: UpdateUserInput) -> AppResult<User> {
        validate_account_fields(&input.name, &input.email)?;

        // Check for duplicate email on another account
        let duplicate = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM users WHERE LOWER(email) = LOWER($1) AND user_id != $2",
        )
        .bind(&input.email)
        .bind(user_id)
        .fetch_one(&self.db)
        .await?;

        if duplicate > 0 {
            return Err(AppError::DuplicateEntry("email".to_string()));
        }

        let user = match &input.password {
            Some(password) => {
                validate_password(password).map_err(|message| AppError::Validation {
                    field: "password".to_string(),
                    message: message.to_string(),
                })?;
                let password_hash = hash_password(password)?;

                sqlx::query_as::<_, User>(
                    r#"
                    UPDATE users
                    SET name = $1, email = $2, role = $3, password_hash = $4, updated_at = NOW()
                    WHERE user_id = $5
                    RETURNING user_id, name, email, role, created_at, updated_at
                    "#,
                )
                .bind(&input.name)
                .bind(&input.email)
                .bind(input.role)
                .bind(&password_hash)
                .bind(user_id)
                .fetch_optional(&self.db)
                .await?
            }
            None => {
                sqlx::query_as::<_, User>(
                    r#"
                    UPDATE users
                    SET name = $1, email = $2, role = $3, updated_at = NOW()
                    WHERE user_id = $4
                    RETURNING user_id, name, email, role, created_at, updated_at
                    "#,
                )
                .bind(&input.name)
                .bind(&input.email)
                .bind(input.role)
                .bind(user_id)
                .fetch_optional(&self.db)
                .await?
            }
        };

        user.ok_or_else(|| AppError::NotFound("User".to_string()))
    }

    /// Delete a user account
    pub async fn delete(&self, user_id: i64) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM users WHERE user_id = $1")
            .bind(user_id)
            .execute(&self.db)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("User".to_string()));
        }

        Ok(())
    }
}

fn validate_account_fields(name: &str, email: &str) -> AppResult<()> {
    if name.trim().is_empty() {
        return Err(AppError::Validation {
            field: "name".to_string(),
            message: "Name cannot be empty".to_string(),
        });
    }

    validate_email(email).map_err(|message| AppError::Validation {
        field: "email".to_string(),
        message: message.to_string(),
    })?;

    Ok(())
}

fn hash_password(password: &str) -> AppResult<String> {
    bcrypt::hash(password, bcrypt::DEFAULT_COST)
        .map_err(|e| AppError::Internal(format!("Failed to hash password: {}", e)))
}
