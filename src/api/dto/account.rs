use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::services::auth::{Principal, Role};
use crate::services::authz::AccessRule;

#[derive(Debug, Serialize)]
pub struct PrincipalResponse {
    pub subject: String,
    pub roles: Vec<Role>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<DateTime<Utc>>,
}

impl From<&Principal> for PrincipalResponse {
    fn from(p: &Principal) -> Self {
        Self {
            subject: p.subject.clone(),
            roles: p.roles.iter().copied().collect(),
            token_id: p.token_id.clone(),
            expires_at: p.expires_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct AccessRuleResponse {
    pub method: String,
    pub pattern: String,
    pub requirement: String,
}

impl From<&AccessRule> for AccessRuleResponse {
    fn from(rule: &AccessRule) -> Self {
        Self {
            method: rule.pattern.method().to_string(),
            pattern: rule.pattern.glob().to_string(),
            requirement: rule.requirement.to_string(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct AdminOverviewResponse {
    pub principal: PrincipalResponse,
    /// in evaluation order
    pub access_rules: Vec<AccessRuleResponse>,
}
