//! Credential verification: `Authorization: Bearer <jwt>` → `Principal`.
//!
//! Fails open to "no identity": a missing, malformed, expired or forged token
//! leaves the request without a principal and lets it continue. Whether that
//! is acceptable is decided by `enforce`, never here.

use axum::{
    body::Body,
    extract::State,
    http::{HeaderMap, Request, header},
    middleware::Next,
    response::Response,
};

use crate::services::auth::{AccessTokenVerifier, Principal, token_fingerprint};
use crate::state::AppState;

pub async fn verify_credentials(
    State(state): State<AppState>,
    mut req: Request<Body>,
    next: Next,
) -> Response {
    // attach once per request; an existing principal is never replaced
    if req.extensions().get::<Principal>().is_none()
        && let Some(principal) = resolve_principal(&state.auth, req.headers())
    {
        tracing::debug!(
            sub = %principal.subject,
            roles = ?principal.roles,
            jti = ?principal.token_id,
            "principal attached"
        );
        req.extensions_mut().insert(principal);
    }

    next.run(req).await
}

/// `None` when there is no bearer token or it does not verify.
pub fn resolve_principal(verifier: &AccessTokenVerifier, headers: &HeaderMap) -> Option<Principal> {
    let token = bearer_token(headers)?;

    match verifier.verify_principal(token) {
        Ok(principal) => Some(principal),
        Err(err) => {
            tracing::warn!(
                error = %err,
                token = %token_fingerprint(token),
                "access token verification failed"
            );
            None
        }
    }
}

/// Token from `Authorization: Bearer <token>`; the scheme is case-insensitive.
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    let value = headers.get(header::AUTHORIZATION)?.to_str().ok()?;
    let (scheme, token) = value.trim().split_once(' ')?;
    if !scheme.eq_ignore_ascii_case("bearer") {
        return None;
    }

    let token = token.trim();
    (!token.is_empty()).then_some(token)
}
