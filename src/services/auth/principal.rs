/*
 * Responsibility
 * - the verified identity attached to a single request
 * - built by the credential verification middleware, read by enforcement and handlers
 *
 * Notes
 * - lives in request extensions only; never persisted, never shared across requests
 */
use std::collections::BTreeSet;

use chrono::{DateTime, Utc};

use super::role::Role;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Principal {
    pub subject: String,
    pub roles: BTreeSet<Role>,
    /// `jti` of the token, for log correlation.
    pub token_id: Option<String>,
    pub expires_at: Option<DateTime<Utc>>,
}

impl Principal {
    pub fn new(subject: impl Into<String>) -> Self {
        Self {
            subject: subject.into(),
            roles: BTreeSet::new(),
            token_id: None,
            expires_at: None,
        }
    }

    pub fn with_roles(mut self, roles: impl IntoIterator<Item = Role>) -> Self {
        self.roles.extend(roles);
        self
    }

    pub fn has_role(&self, role: Role) -> bool {
        self.roles.contains(&role)
    }
}
