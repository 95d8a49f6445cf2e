use super::{json_type_name, IssueCode, PathSegment, ValidationError, ValidationIssue};
use crate::domain::model::{Plan, PLAN_FIELDS};
use regex::Regex;
use serde_json::Value;
use std::sync::OnceLock;
use validator::Validate;

pub const NAME_REQUIRED: &str = "Plan name is required";
pub const PRICE_MIN: &str = "Price must be at least 0";

fn missing_field_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^missing field `([^`]+)`").expect("static regex is valid"))
}

/// Validate a `GET /plans` body: an array whose every element is a plan.
///
/// Issues from all elements are reported together; a single bad element
/// fails the whole array.
pub fn parse_plans(value: &Value) -> Result<Vec<Plan>, ValidationError> {
    let items = match value.as_array() {
        Some(items) => items,
        None => {
            return Err(ValidationError::new(vec![type_issue(Vec::new(), "array", value)]));
        }
    };

    let mut plans = Vec::with_capacity(items.len());
    let mut issues = Vec::new();
    for (index, item) in items.iter().enumerate() {
        match check_plan(item, vec![PathSegment::Index(index)]) {
            Ok(plan) => plans.push(plan),
            Err(found) => issues.extend(found),
        }
    }

    if !issues.is_empty() {
        tracing::debug!("Plan list rejected with {} issue(s)", issues.len());
        return Err(ValidationError::new(issues));
    }
    Ok(plans)
}

/// Validate a single plan object.
pub fn parse_plan(value: &Value) -> Result<Plan, ValidationError> {
    check_plan(value, Vec::new()).map_err(ValidationError::new)
}

fn check_plan(value: &Value, base: Vec<PathSegment>) -> Result<Plan, Vec<ValidationIssue>> {
    if !value.is_object() {
        return Err(vec![type_issue(base, "object", value)]);
    }

    // 先以 serde 解析型別，再交給 validator 檢查欄位限制
    let plan: Plan = serde_json::from_value(value.clone()).map_err(|e| vec![decode_issue(&base, &e)])?;

    match plan.validate() {
        Ok(()) => Ok(plan),
        Err(errors) => Err(rule_issues(&base, &errors)),
    }
}

fn type_issue(path: Vec<PathSegment>, expected: &str, actual: &Value) -> ValidationIssue {
    ValidationIssue::new(
        path,
        IssueCode::InvalidType,
        format!("Expected {}, received {}", expected, json_type_name(actual)),
    )
}

/// serde stops at the first bad field; missing fields keep their name in
/// the path, other type errors are reported on the element.
fn decode_issue(base: &[PathSegment], error: &serde_json::Error) -> ValidationIssue {
    let message = error.to_string();
    let mut path = base.to_vec();
    match missing_field_pattern().captures(&message) {
        Some(caps) => {
            path.push(PathSegment::Key(caps[1].to_string()));
            ValidationIssue::new(path, IssueCode::InvalidType, "Required")
        }
        None => ValidationIssue::new(path, IssueCode::InvalidType, message),
    }
}

fn rule_issues(base: &[PathSegment], errors: &validator::ValidationErrors) -> Vec<ValidationIssue> {
    let mut issues: Vec<(usize, ValidationIssue)> = Vec::new();
    for (field, field_errors) in errors.field_errors() {
        let field: &str = field.as_ref();
        let order = PLAN_FIELDS
            .iter()
            .position(|f| *f == field)
            .unwrap_or(PLAN_FIELDS.len());
        for error in field_errors.iter() {
            let mut path = base.to_vec();
            path.push(PathSegment::Key(field.to_string()));
            let message = error
                .message
                .as_ref()
                .map(|m| m.to_string())
                .unwrap_or_else(|| format!("Invalid value ({})", error.code));
            issues.push((
                order,
                ValidationIssue::new(path, IssueCode::from_rule(&error.code), message),
            ));
        }
    }
    // field_errors() 是 HashMap，依欄位宣告順序排序以保持輸出穩定
    issues.sort_by_key(|(order, _)| *order);
    issues.into_iter().map(|(_, issue)| issue).collect()
}
