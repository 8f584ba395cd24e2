/*
 * Responsibility
 * - shared context bound to the Router (AppState)
 *   - auth: bearer token verifier, routes: access table, passwords: bcrypt hasher
 * - Clone is expected to be cheap (Arc / Copy inside)
 */
use std::sync::Arc;

use crate::services::{auth::AccessTokenVerifier, authz::RouteClassifier, password::PasswordHasher};

#[derive(Clone, Debug)]
pub struct AppState {
    pub auth: Arc<AccessTokenVerifier>,
    pub routes: Arc<RouteClassifier>,
    pub passwords: PasswordHasher,
}

impl AppState {
    pub fn new(
        auth: Arc<AccessTokenVerifier>,
        routes: Arc<RouteClassifier>,
        passwords: PasswordHasher,
    ) -> Self {
        Self {
            auth,
            routes,
            passwords,
        }
    }
}
