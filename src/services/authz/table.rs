//! The flight API's access table.

use crate::services::authz::classifier::{RouteClassifier, RuleError};
use crate::services::authz::pattern::MethodFilter;

pub const ENDPOINTS_POST_NO_AUTH: &[&str] = &["/auth/**", "/predict"];

pub const ENDPOINTS_GET_NO_AUTH: &[&str] = &[
    "/",
    "/check/**",
    "/generate_204",
    "/actuator/**",
    "/gerar-password",
    "/airports",
    "/airlines",
];

pub const ENDPOINTS_DOCS: &[&str] = &["/v3/api-docs/**", "/swagger-ui.html", "/swagger-ui/**"];

pub const ENDPOINTS_ADMIN: &[&str] = &["/admin", "/users/**"];

pub const ADMIN_ROLE: &str = "ADMIN";

pub fn flight_api() -> Result<RouteClassifier, RuleError> {
    RouteClassifier::builder()
        .permit(MethodFilter::Post, ENDPOINTS_POST_NO_AUTH)
        .permit(MethodFilter::Get, ENDPOINTS_GET_NO_AUTH)
        .permit_any_method(ENDPOINTS_DOCS)
        .require_role(ENDPOINTS_ADMIN, ADMIN_ROLE)
        .build()
}
