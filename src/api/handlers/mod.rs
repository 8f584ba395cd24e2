pub mod account;
pub mod health;
pub mod password;

use crate::error::AppError;

/// Reached only after enforcement allowed the request.
pub async fn not_found() -> AppError {
    AppError::NotFound
}
