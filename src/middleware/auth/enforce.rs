//! Route enforcement: classify the request, then allow it or answer 401 / 403.

use axum::{
    body::Body,
    extract::State,
    http::Request,
    middleware::Next,
    response::Response,
};

use crate::error::AppError;
use crate::services::auth::Principal;
use crate::services::authz::{Decision, authorize};
use crate::state::AppState;

pub async fn enforce_access(
    State(state): State<AppState>,
    req: Request<Body>,
    next: Next,
) -> Result<Response, AppError> {
    let requirement = state.routes.classify(req.method(), req.uri().path());
    let principal = req.extensions().get::<Principal>();

    match authorize(&requirement, principal) {
        Decision::Allow => Ok(next.run(req).await),
        Decision::Deny(reason) => {
            tracing::info!(
                method = %req.method(),
                path = %req.uri().path(),
                requirement = ?requirement,
                reason = ?reason,
                sub = principal.map(|p| p.subject.as_str()),
                "access denied"
            );
            Err(reason.into())
        }
    }
}
