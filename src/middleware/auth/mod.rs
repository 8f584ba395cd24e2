//! Authentication + authorization middleware.
//!
//! Two layers, always in this order:
//!
//! 1. [`verify`]: bearer token → `Principal` in request extensions (never rejects)
//! 2. [`enforce`]: route requirement + principal → allow, 401 or 403
//!
//! ```ignore
//! let router = middleware::auth::apply(api::routes(), state.clone());
//! ```

use axum::{Router, middleware};

use crate::state::AppState;

pub mod enforce;
pub mod verify;

/// Apply credential verification and route enforcement to `router`, fallback included.
///
/// The last layer added runs first, so `verify` is added after `enforce`.
pub fn apply(router: Router<AppState>, state: AppState) -> Router<AppState> {
    router
        .layer(middleware::from_fn_with_state(
            state.clone(),
            enforce::enforce_access,
        ))
        .layer(middleware::from_fn_with_state(
            state,
            verify::verify_credentials,
        ))
}
