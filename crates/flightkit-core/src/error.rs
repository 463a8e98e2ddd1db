//! Error type shared by all calculators.

use crate::validation::ValidationIssue;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum NavError {
    /// At least one input failed validation with [`Severity::Error`](crate::Severity::Error).
    #[error("invalid input: {}", join_issues(.0))]
    InvalidInput(Vec<ValidationIssue>),

    /// The inputs are valid but the geometry has no solution (e.g. crosswind
    /// stronger than the true airspeed).
    #[error("no solution: {reason}")]
    NoSolution { reason: String },

    /// The inputs describe a degenerate case (e.g. antipodal endpoints).
    #[error("degenerate input: {reason}")]
    DegenerateInput { reason: String },

    /// A leg of a flight plan could not be computed.
    #[error("leg {index} ({from} -> {to}): {source}")]
    Leg {
        index: usize,
        from: String,
        to: String,
        source: Box<NavError>,
    },
}

impl NavError {
    pub fn invalid(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidInput(vec![ValidationIssue::error(field, message)])
    }

    pub fn no_solution(reason: impl Into<String>) -> Self {
        Self::NoSolution {
            reason: reason.into(),
        }
    }

    pub fn degenerate(reason: impl Into<String>) -> Self {
        Self::DegenerateInput {
            reason: reason.into(),
        }
    }

    /// Validation issues attached to this error, if any.
    pub fn issues(&self) -> &[ValidationIssue] {
        match self {
            Self::InvalidInput(issues) => issues,
            Self::Leg { source, .. } => source.issues(),
            _ => &[],
        }
    }
}

fn join_issues(issues: &[ValidationIssue]) -> String {
    issues
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn leg_error_keeps_inner_issues() {
        let inner = NavError::invalid("true_airspeed_kt", "must be greater than 0");
        let err = NavError::Leg {
            index: 2,
            from: "LEMD".into(),
            to: "LEBL".into(),
            source: Box::new(inner),
        };
        assert_eq!(err.issues().len(), 1);
        let text = err.to_string();
        assert!(text.contains("leg 2"), "{text}");
        assert!(text.contains("true_airspeed_kt"), "{text}");
    }
}
