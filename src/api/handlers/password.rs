/*
 * Responsibility
 * - GET /gerar-password?password=...: bcrypt digest for seeding the credential store
 * - hashing is CPU-bound, so it runs on the blocking pool
 */
use axum::{
    Json,
    extract::{Query, State, rejection::QueryRejection},
};

use crate::api::dto::password::{GeneratePasswordQuery, GeneratedPasswordResponse};
use crate::error::AppError;
use crate::services::password::PasswordError;
use crate::state::AppState;

pub async fn generate_password(
    State(state): State<AppState>,
    query: Result<Query<GeneratePasswordQuery>, QueryRejection>,
) -> Result<Json<GeneratedPasswordResponse>, AppError> {
    let Query(query) =
        query.map_err(|rejection| AppError::bad_request("INVALID_QUERY", rejection.body_text()))?;

    query
        .validate()
        .map_err(|msg| AppError::bad_request("INVALID_PASSWORD", msg))?;

    let hasher = state.passwords;
    let hash = tokio::task::spawn_blocking(move || hasher.hash(&query.password))
        .await
        .map_err(|e| {
            tracing::error!(error = %e, "password hashing task failed");
            AppError::Internal
        })?
        .map_err(|e| match e {
            PasswordError::TooLong => {
                AppError::bad_request("INVALID_PASSWORD", "password must be <= 72 bytes")
            }
            other => {
                tracing::error!(error = %other, "password hashing failed");
                AppError::Internal
            }
        })?;

    Ok(Json(GeneratedPasswordResponse {
        hash,
        cost: state.passwords.cost(),
    }))
}
