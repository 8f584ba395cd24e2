/*
 * Responsibility
 * - URL layout of the service
 * - access requirements are NOT declared here; they come from services::authz::table
 *   and are applied to every route (and the fallback) by middleware::auth
 */
use axum::{Router, routing::get};

use crate::api::handlers::{
    account::{admin_overview, me},
    health::{generate_204, health, index},
    not_found,
    password::generate_password,
};
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(index))
        .route("/check/health", get(health))
        .route("/generate_204", get(generate_204))
        .route("/gerar-password", get(generate_password))
        .route("/me", get(me))
        .route("/admin", get(admin_overview))
        .fallback(not_found)
}
