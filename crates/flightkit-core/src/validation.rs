//! Structured, non-throwing validation results.
//!
//! Calculators collect [`ValidationIssue`]s while checking their inputs.
//! Errors block the computation; warnings travel with the result.

use crate::error::NavError;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Computation proceeds but the condition must be surfaced
    Warning,
    /// Computation is unsafe or impossible
    Error,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationIssue {
    pub field: String,
    pub message: String,
    pub severity: Severity,
}

impl ValidationIssue {
    pub fn error(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
            severity: Severity::Error,
        }
    }

    pub fn warning(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
            severity: Severity::Warning,
        }
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

impl fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let tag = match self.severity {
            Severity::Warning => "warning",
            Severity::Error => "error",
        };
        write!(f, "{} [{}]: {}", tag, self.field, self.message)
    }
}

/// Turn collected issues into an outcome.
///
/// Any error fails the whole check (all issues are kept for the caller);
/// otherwise the warnings are handed back.
pub fn finish(issues: Vec<ValidationIssue>) -> Result<Vec<ValidationIssue>, NavError> {
    if issues.iter().any(ValidationIssue::is_error) {
        Err(NavError::InvalidInput(issues))
    } else {
        Ok(issues)
    }
}

pub(crate) fn require_finite(issues: &mut Vec<ValidationIssue>, field: &str, value: f64) -> bool {
    if value.is_finite() {
        true
    } else {
        issues.push(ValidationIssue::error(field, "must be a finite number"));
        false
    }
}

pub(crate) fn require_positive(
    issues: &mut Vec<ValidationIssue>,
    field: &str,
    value: f64,
) -> bool {
    if !require_finite(issues, field, value) {
        return false;
    }
    if value <= 0.0 {
        issues.push(ValidationIssue::error(
            field,
            format!("must be greater than 0 (got {value})"),
        ));
        return false;
    }
    true
}

pub(crate) fn require_non_negative(issues: &mut Vec<ValidationIssue>, field: &str, value: f64) {
    if require_finite(issues, field, value) && value < 0.0 {
        issues.push(ValidationIssue::error(
            field,
            format!("must not be negative (got {value})"),
        ));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn warnings_alone_pass() {
        let issues = vec![ValidationIssue::warning("bank_deg", "steep turn")];
        let warnings = finish(issues).unwrap();
        assert_eq!(warnings.len(), 1);
    }

    #[test]
    fn any_error_fails_and_keeps_everything() {
        let issues = vec![
            ValidationIssue::warning("bank_deg", "steep turn"),
            ValidationIssue::error("weight", "above maximum"),
        ];
        match finish(issues) {
            Err(NavError::InvalidInput(all)) => assert_eq!(all.len(), 2),
            other => panic!("expected InvalidInput, got {other:?}"),
        }
    }

    #[test]
    fn helpers_reject_nan_and_sign() {
        let mut issues = Vec::new();
        require_positive(&mut issues, "tas", 0.0);
        require_non_negative(&mut issues, "wind", -1.0);
        require_finite(&mut issues, "dir", f64::NAN);
        assert_eq!(issues.len(), 3);
        assert!(issues.iter().all(ValidationIssue::is_error));
    }

    #[test]
    fn severity_serializes_lowercase() {
        let json = serde_json::to_string(&ValidationIssue::warning("x", "y")).unwrap();
        assert!(json.contains(r#""severity":"warning""#), "{json}");
    }
}
