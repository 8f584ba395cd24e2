use base64::Engine as _;
use chrono::DateTime;
use jsonwebtoken::{Algorithm, DecodingKey, Validation};
use serde::Deserialize;
use sha2::{Digest, Sha256};
use thiserror::Error;

use crate::config::{AccessKeyMaterial, MAX_TOKEN_LEEWAY_SECONDS};
use crate::services::auth::{principal::Principal, role::Role};

/// Errors returned by access-token verification + strict claim validation.
#[derive(Debug, Error)]
pub enum AccessJwtError {
    #[error("invalid verification key: {0}")]
    InvalidKey(String),
    #[error("leeway of {0}s exceeds {max}s", max = MAX_TOKEN_LEEWAY_SECONDS)]
    InvalidLeeway(u64),
    #[error("jwt verification failed: {0}")]
    Jwt(#[from] jsonwebtoken::errors::Error),
    #[error("missing or invalid 'aud' claim")]
    MissingOrInvalidAud,
    #[error("empty '{0}' claim")]
    EmptyClaim(&'static str),
}

fn aud_is_present_and_valid(aud: &serde_json::Value) -> bool {
    match aud {
        serde_json::Value::String(s) => !s.trim().is_empty(),
        serde_json::Value::Array(arr) => arr.iter().any(|v| match v {
            serde_json::Value::String(s) => !s.trim().is_empty(),
            _ => false,
        }),
        // Missing claim ends up as Null due to #[serde(default)]
        _ => false,
    }
}

/// `roles` may be a single string or an array of strings.
fn role_names(roles: &serde_json::Value) -> Vec<&str> {
    match roles {
        serde_json::Value::String(s) => vec![s.as_str()],
        serde_json::Value::Array(arr) => arr.iter().filter_map(|v| v.as_str()).collect(),
        _ => Vec::new(),
    }
}

/// Access token (JWT) claims.
#[derive(Debug, Clone, Deserialize)]
pub struct AccessTokenClaims {
    pub iss: String,
    // Keep as Value to accept both string and array.
    #[serde(default)]
    pub aud: serde_json::Value,

    pub sub: String,
    pub exp: u64,

    #[serde(default)]
    pub nbf: Option<u64>,
    #[serde(default)]
    pub iat: Option<u64>,
    #[serde(default)]
    pub jti: Option<String>,

    #[serde(default)]
    pub roles: serde_json::Value,
}

/// Access-token verifier (EdDSA public key or HS256 shared secret).
///
/// - Key material is intentionally not printable via Debug.
/// - The decoding key is built once at startup; verification does no I/O.
#[derive(Clone)]
pub struct AccessTokenVerifier {
    decoding_key: DecodingKey,
    validation: Validation,
    audience_required: bool,
}

impl std::fmt::Debug for AccessTokenVerifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Do not print key material
        f.debug_struct("AccessTokenVerifier")
            .field("validation", &self.validation)
            .finish()
    }
}

impl AccessTokenVerifier {
    pub fn new(
        key: &AccessKeyMaterial,
        issuer: &str,
        audience: Option<&str>,
        leeway_seconds: u64,
    ) -> Result<Self, AccessJwtError> {
        // jsonwebtoken subtracts the leeway from the current time unchecked
        if leeway_seconds > MAX_TOKEN_LEEWAY_SECONDS {
            return Err(AccessJwtError::InvalidLeeway(leeway_seconds));
        }

        let (decoding_key, algorithm) = match key {
            AccessKeyMaterial::Ed25519PublicPem(pem) => {
                let key = DecodingKey::from_ed_pem(pem.as_bytes()).map_err(|e| {
                    AccessJwtError::InvalidKey(format!("invalid ed25519 public key pem: {}", e))
                })?;
                (key, Algorithm::EdDSA)
            }
            AccessKeyMaterial::SharedSecret(secret) => {
                (DecodingKey::from_secret(secret.as_bytes()), Algorithm::HS256)
            }
        };

        let mut validation = Validation::new(algorithm);
        validation.set_issuer(&[issuer]);
        validation.set_required_spec_claims(&["exp", "iss", "sub"]);
        validation.validate_nbf = true;
        validation.leeway = leeway_seconds;
        match audience {
            Some(aud) => validation.set_audience(&[aud]),
            None => validation.validate_aud = false,
        }

        Ok(Self {
            decoding_key,
            validation,
            audience_required: audience.is_some(),
        })
    }

    /// Verify and decode a JWT access token.
    pub fn verify(&self, token: &str) -> Result<AccessTokenClaims, jsonwebtoken::errors::Error> {
        let data =
            jsonwebtoken::decode::<AccessTokenClaims>(token, &self.decoding_key, &self.validation)?;

        Ok(data.claims)
    }

    /// Verify + strict claim validation.
    ///
    /// `jsonwebtoken::Validation` already checks:
    /// - signature and algorithm
    /// - `exp` / `nbf` with leeway
    /// - `iss` (and `aud` when configured)
    ///
    /// This method additionally rejects empty `iss` / `sub` and, when an
    /// audience is configured, a missing or blank `aud`.
    pub fn verify_strict(&self, token: &str) -> Result<AccessTokenClaims, AccessJwtError> {
        let claims = self.verify(token)?;

        if claims.iss.trim().is_empty() {
            return Err(AccessJwtError::EmptyClaim("iss"));
        }
        if claims.sub.trim().is_empty() {
            return Err(AccessJwtError::EmptyClaim("sub"));
        }
        if self.audience_required && !aud_is_present_and_valid(&claims.aud) {
            return Err(AccessJwtError::MissingOrInvalidAud);
        }

        Ok(claims)
    }

    /// Verify the token and turn its claims into a [`Principal`].
    ///
    /// Role names outside [`Role`] are dropped; they grant nothing.
    pub fn verify_principal(&self, token: &str) -> Result<Principal, AccessJwtError> {
        let claims = self.verify_strict(token)?;

        let mut roles = Vec::new();
        for name in role_names(&claims.roles) {
            match name.parse::<Role>() {
                Ok(role) => roles.push(role),
                Err(err) => tracing::debug!(sub = %claims.sub, error = %err, "ignoring role claim"),
            }
        }

        let expires_at = i64::try_from(claims.exp)
            .ok()
            .and_then(|secs| DateTime::from_timestamp(secs, 0));

        let mut principal = Principal::new(claims.sub).with_roles(roles);
        principal.token_id = claims.jti;
        principal.expires_at = expires_at;
        Ok(principal)
    }
}

/// Short, non-reversible handle for a bearer token, safe to put in logs.
pub fn token_fingerprint(token: &str) -> String {
    let digest = Sha256::digest(token.as_bytes());
    let mut encoded = base64::engine::general_purpose::URL_SAFE_NO_PAD.encode(digest);
    encoded.truncate(12);
    encoded
}
