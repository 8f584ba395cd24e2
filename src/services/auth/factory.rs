/// Factory: build `AccessTokenVerifier` from application `Config`.
use std::sync::Arc;

use crate::config::Config;
use crate::services::auth::{AccessJwtError, AccessTokenVerifier};

pub fn build_access_verifier(config: &Config) -> Result<Arc<AccessTokenVerifier>, AccessJwtError> {
    let verifier = AccessTokenVerifier::new(
        &config.access_key,
        &config.auth_issuer,
        config.auth_audience.as_deref(),
        config.access_token_leeway_seconds,
    )?;

    tracing::info!(
        issuer = %config.auth_issuer,
        audience = ?config.auth_audience,
        key = ?config.access_key,
        "access token verifier ready"
    );

    Ok(Arc::new(verifier))
}
