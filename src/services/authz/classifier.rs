//! Route classifier: `(method, path) → AccessRequirement`.
//!
//! Rules are evaluated first-match-wins in a pinned group order:
//!
//! 1. method-specific PUBLIC rules
//! 2. method-agnostic PUBLIC rules
//! 3. ROLE rules
//! 4. explicit AUTHENTICATED rules
//! 5. fallback: AUTHENTICATED
//!
//! Declaration order only matters inside a group. The builder sorts once, so
//! moving a line in the table cannot change which group wins.

use std::fmt;

use axum::http::Method;
use thiserror::Error;

use crate::services::auth::Role;
use crate::services::authz::pattern::{MethodFilter, PatternError, RoutePattern, normalize_path};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AccessRequirement {
    Public,
    Authenticated,
    Role(Role),
}

impl fmt::Display for AccessRequirement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AccessRequirement::Public => f.write_str("PUBLIC"),
            AccessRequirement::Authenticated => f.write_str("AUTHENTICATED"),
            AccessRequirement::Role(role) => write!(f, "ROLE({role})"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessRule {
    pub pattern: RoutePattern,
    pub requirement: AccessRequirement,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum RuleGroup {
    MethodPublic,
    AnyMethodPublic,
    RoleRestricted,
    Authenticated,
}

impl RuleGroup {
    fn of(rule: &AccessRule) -> Self {
        match rule.requirement {
            AccessRequirement::Public if rule.pattern.method().is_any() => Self::AnyMethodPublic,
            AccessRequirement::Public => Self::MethodPublic,
            AccessRequirement::Role(_) => Self::RoleRestricted,
            AccessRequirement::Authenticated => Self::Authenticated,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RuleError {
    #[error(transparent)]
    Pattern(#[from] PatternError),
    #[error("rule {pattern} requires unknown role {role:?}")]
    UnknownRole { pattern: String, role: String },
    #[error("rule {pattern} is declared with conflicting requirements")]
    Conflict { pattern: String },
}

#[derive(Debug)]
enum Declared {
    Public,
    Authenticated,
    Role(String),
}

/// Collects rule declarations as strings; [`RouteTableBuilder::build`]
/// validates all of them at once.
#[derive(Debug, Default)]
pub struct RouteTableBuilder {
    declared: Vec<(MethodFilter, String, Declared)>,
}

impl RouteTableBuilder {
    fn declare(
        mut self,
        method: MethodFilter,
        globs: &[&str],
        declared: impl Fn() -> Declared,
    ) -> Self {
        self.declared
            .extend(globs.iter().map(|glob| (method, glob.to_string(), declared())));
        self
    }

    pub fn permit(self, method: MethodFilter, globs: &[&str]) -> Self {
        self.declare(method, globs, || Declared::Public)
    }

    pub fn permit_any_method(self, globs: &[&str]) -> Self {
        self.permit(MethodFilter::Any, globs)
    }

    /// Any method on `globs` requires `role` (e.g. `"ADMIN"` or `"ROLE_ADMIN"`).
    pub fn require_role(self, globs: &[&str], role: &str) -> Self {
        self.declare(MethodFilter::Any, globs, || Declared::Role(role.to_string()))
    }

    pub fn authenticate(self, method: MethodFilter, globs: &[&str]) -> Self {
        self.declare(method, globs, || Declared::Authenticated)
    }

    pub fn build(self) -> Result<RouteClassifier, RuleError> {
        let mut rules: Vec<AccessRule> = Vec::with_capacity(self.declared.len());

        for (method, glob, declared) in self.declared {
            let pattern = RoutePattern::parse(method, &glob)?;
            let requirement = match declared {
                Declared::Public => AccessRequirement::Public,
                Declared::Authenticated => AccessRequirement::Authenticated,
                Declared::Role(name) => match name.parse::<Role>() {
                    Ok(role) => AccessRequirement::Role(role),
                    Err(_) => {
                        return Err(RuleError::UnknownRole {
                            pattern: pattern.to_string(),
                            role: name,
                        });
                    }
                },
            };

            if let Some(existing) = rules.iter().find(|r| r.pattern == pattern) {
                if existing.requirement != requirement {
                    return Err(RuleError::Conflict {
                        pattern: pattern.to_string(),
                    });
                }
                continue;
            }

            rules.push(AccessRule {
                pattern,
                requirement,
            });
        }

        // stable: keeps declaration order within a group
        rules.sort_by_key(RuleGroup::of);

        Ok(RouteClassifier { rules })
    }
}

/// Read-only after construction; share it behind an `Arc`.
#[derive(Debug, Clone)]
pub struct RouteClassifier {
    rules: Vec<AccessRule>,
}

impl RouteClassifier {
    pub fn builder() -> RouteTableBuilder {
        RouteTableBuilder::default()
    }

    pub fn rules(&self) -> &[AccessRule] {
        &self.rules
    }

    /// First matching rule in group order, or `Authenticated` if none match.
    pub fn classify(&self, method: &Method, path: &str) -> AccessRequirement {
        let path = normalize_path(path);

        self.rules
            .iter()
            .find(|rule| rule.pattern.matches(method, &path))
            .map(|rule| rule.requirement)
            .unwrap_or(AccessRequirement::Authenticated)
    }
}
