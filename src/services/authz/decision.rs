/*
 * Responsibility
 * - combine the route's requirement with the (optional) principal
 * - the only place that decides 401 vs 403
 */
use crate::error::AppError;
use crate::services::auth::Principal;
use crate::services::authz::classifier::AccessRequirement;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DenyReason {
    /// No (valid) credential on a route that needs one.
    Unauthenticated,
    /// Valid credential, missing role.
    Forbidden,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Allow,
    Deny(DenyReason),
}

pub fn authorize(requirement: &AccessRequirement, principal: Option<&Principal>) -> Decision {
    match (requirement, principal) {
        (AccessRequirement::Public, _) => Decision::Allow,
        (_, None) => Decision::Deny(DenyReason::Unauthenticated),
        (AccessRequirement::Authenticated, Some(_)) => Decision::Allow,
        (AccessRequirement::Role(role), Some(p)) if p.has_role(*role) => Decision::Allow,
        (AccessRequirement::Role(_), Some(_)) => Decision::Deny(DenyReason::Forbidden),
    }
}

impl From<DenyReason> for AppError {
    fn from(reason: DenyReason) -> Self {
        match reason {
            DenyReason::Unauthenticated => AppError::Unauthorized,
            DenyReason::Forbidden => AppError::Forbidden,
        }
    }
}
