//! Route patterns: an HTTP method filter plus a `/`-delimited path glob.
//!
//! Glob segments:
//! - literal text, compared exactly (case-sensitive)
//! - `*` matches exactly one segment
//! - `**` matches every remaining segment, including none; only allowed last
//!
//! So `/auth/**` matches `/auth`, `/auth/login` and `/auth/a/b`, while
//! `/airports` matches only `/airports`.

use std::fmt;

use axum::http::Method;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MethodFilter {
    Any,
    Get,
    Post,
    Put,
    Patch,
    Delete,
}

impl MethodFilter {
    pub fn matches(&self, method: &Method) -> bool {
        match self {
            MethodFilter::Any => true,
            MethodFilter::Get => method == Method::GET,
            MethodFilter::Post => method == Method::POST,
            MethodFilter::Put => method == Method::PUT,
            MethodFilter::Patch => method == Method::PATCH,
            MethodFilter::Delete => method == Method::DELETE,
        }
    }

    pub fn is_any(&self) -> bool {
        matches!(self, MethodFilter::Any)
    }
}

impl fmt::Display for MethodFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            MethodFilter::Any => "ANY",
            MethodFilter::Get => "GET",
            MethodFilter::Post => "POST",
            MethodFilter::Put => "PUT",
            MethodFilter::Patch => "PATCH",
            MethodFilter::Delete => "DELETE",
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PatternError {
    #[error("pattern {0:?} must start with '/'")]
    MissingLeadingSlash(String),
    #[error("pattern {0:?} has an empty segment")]
    EmptySegment(String),
    #[error("pattern {0:?} uses '**' before its last segment")]
    RestNotLast(String),
    #[error("pattern {0:?} mixes '*' with literal text in one segment")]
    PartialWildcard(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    Single,
    Rest,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoutePattern {
    method: MethodFilter,
    glob: String,
    segments: Vec<Segment>,
}

impl RoutePattern {
    pub fn parse(method: MethodFilter, glob: &str) -> Result<Self, PatternError> {
        let rest = glob
            .strip_prefix('/')
            .ok_or_else(|| PatternError::MissingLeadingSlash(glob.to_string()))?;

        let mut segments = Vec::new();
        if !rest.is_empty() {
            let raw: Vec<&str> = rest.split('/').collect();
            let last = raw.len() - 1;
            for (i, part) in raw.into_iter().enumerate() {
                let segment = match part {
                    "" => return Err(PatternError::EmptySegment(glob.to_string())),
                    "**" if i != last => return Err(PatternError::RestNotLast(glob.to_string())),
                    "**" => Segment::Rest,
                    "*" => Segment::Single,
                    s if s.contains('*') => {
                        return Err(PatternError::PartialWildcard(glob.to_string()));
                    }
                    s => Segment::Literal(s.to_string()),
                };
                segments.push(segment);
            }
        }

        Ok(Self {
            method,
            glob: glob.to_string(),
            segments,
        })
    }

    pub fn method(&self) -> MethodFilter {
        self.method
    }

    pub fn glob(&self) -> &str {
        &self.glob
    }

    /// `path` must already be normalized (see [`normalize_path`]).
    pub fn matches(&self, method: &Method, path: &str) -> bool {
        self.method.matches(method) && self.matches_path(path)
    }

    fn matches_path(&self, path: &str) -> bool {
        let mut actual = path.split('/').filter(|s| !s.is_empty());

        for expected in &self.segments {
            match expected {
                Segment::Rest => return true,
                Segment::Single => {
                    if actual.next().is_none() {
                        return false;
                    }
                }
                Segment::Literal(lit) => match actual.next() {
                    Some(s) if s == lit => {}
                    _ => return false,
                },
            }
        }

        actual.next().is_none()
    }
}

impl fmt::Display for RoutePattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.method, self.glob)
    }
}

/// Canonical form of a request path used for matching.
///
/// - query string and fragment removed
/// - repeated slashes collapsed, `.` dropped, `..` resolved (never above root)
/// - leading slash kept, trailing slash dropped except for `/`
pub fn normalize_path(raw: &str) -> String {
    let path = raw.split(['?', '#']).next().unwrap_or_default();

    let mut segments: Vec<&str> = Vec::new();
    for segment in path.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                segments.pop();
            }
            other => segments.push(other),
        }
    }

    if segments.is_empty() {
        return "/".to_string();
    }

    let mut out = String::with_capacity(path.len());
    for segment in segments {
        out.push('/');
        out.push_str(segment);
    }
    out
}
