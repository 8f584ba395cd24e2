pub mod classifier;
pub mod decision;
pub mod pattern;
pub mod table;

pub use classifier::{AccessRequirement, AccessRule, RouteClassifier, RouteTableBuilder, RuleError};
pub use decision::{Decision, DenyReason, authorize};
pub use pattern::{MethodFilter, PatternError, RoutePattern, normalize_path};
