/*
 * Responsibility
 * - GET /me: the principal the token resolved to (any authenticated caller)
 * - GET /admin: admin overview (ADMIN only; enforced before this handler runs)
 */
use axum::{Json, extract::State};

use crate::api::dto::account::{AccessRuleResponse, AdminOverviewResponse, PrincipalResponse};
use crate::api::extractors::CurrentPrincipal;
use crate::state::AppState;

pub async fn me(CurrentPrincipal(principal): CurrentPrincipal) -> Json<PrincipalResponse> {
    Json(PrincipalResponse::from(&principal))
}

pub async fn admin_overview(
    State(state): State<AppState>,
    CurrentPrincipal(principal): CurrentPrincipal,
) -> Json<AdminOverviewResponse> {
    let rules = state
        .routes
        .rules()
        .iter()
        .map(AccessRuleResponse::from)
        .collect();

    Json(AdminOverviewResponse {
        principal: PrincipalResponse::from(&principal),
        access_rules: rules,
    })
}
