//! Runtime validation of untyped JSON into domain records.
//!
//! Records are decoded with `serde` and then checked with `validator`.
//! Failures from both steps are reported as [`ValidationIssue`]s carrying
//! the JSON path of the offending value.

pub mod plan;

pub use plan::{parse_plan, parse_plans};

use serde::Serialize;
use serde_json::Value;
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum PathSegment {
    Index(usize),
    Key(String),
}

impl fmt::Display for PathSegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PathSegment::Index(i) => write!(f, "[{}]", i),
            PathSegment::Key(k) => write!(f, ".{}", k),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum IssueCode {
    InvalidType,
    TooSmall,
    Custom,
}

impl IssueCode {
    /// Map a `validator` rule code onto an issue code.
    pub fn from_rule(code: &str) -> Self {
        match code {
            "length" | "range" => IssueCode::TooSmall,
            _ => IssueCode::Custom,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ValidationIssue {
    pub path: Vec<PathSegment>,
    pub code: IssueCode,
    pub message: String,
}

impl ValidationIssue {
    pub fn new(path: Vec<PathSegment>, code: IssueCode, message: impl Into<String>) -> Self {
        Self {
            path,
            code,
            message: message.into(),
        }
    }

    /// Dotted rendering of the path, e.g. `[0].price`; empty for the root.
    pub fn path_string(&self) -> String {
        let rendered: String = self.path.iter().map(|s| s.to_string()).collect();
        rendered.trim_start_matches('.').to_string()
    }
}

impl fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.path.is_empty() {
            write!(f, "{}", self.message)
        } else {
            write!(f, "{}: {}", self.path_string(), self.message)
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ValidationError {
    issues: Vec<ValidationIssue>,
}

impl ValidationError {
    pub fn new(issues: Vec<ValidationIssue>) -> Self {
        Self { issues }
    }

    pub fn issues(&self) -> &[ValidationIssue] {
        &self.issues
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rendered: Vec<String> = self.issues.iter().map(|i| i.to_string()).collect();
        write!(f, "{}", rendered.join("; "))
    }
}

impl std::error::Error for ValidationError {}

pub(crate) fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_issue_display_includes_path() {
        let issue = ValidationIssue::new(
            vec![PathSegment::Index(2), PathSegment::Key("price".to_string())],
            IssueCode::TooSmall,
            "Price must be at least 0",
        );
        assert_eq!(issue.path_string(), "[2].price");
        assert_eq!(issue.to_string(), "[2].price: Price must be at least 0");
    }

    #[test]
    fn test_root_issue_has_no_path_prefix() {
        let issue = ValidationIssue::new(vec![], IssueCode::InvalidType, "Expected array");
        assert_eq!(issue.to_string(), "Expected array");
    }

    #[test]
    fn test_rule_codes_map_to_issue_codes() {
        assert_eq!(IssueCode::from_rule("length"), IssueCode::TooSmall);
        assert_eq!(IssueCode::from_rule("range"), IssueCode::TooSmall);
        assert_eq!(IssueCode::from_rule("email"), IssueCode::Custom);
    }
}
