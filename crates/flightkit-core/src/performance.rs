//! Stall speed under weight and bank.

use crate::error::NavError;
use crate::rules::NavRules;
use crate::validation::{finish, require_finite, require_positive, ValidationIssue};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StallSpeedInput {
    /// Published wings-level stall speed at maximum weight (kt)
    pub vs_kt: f64,
    pub max_weight: f64,
    /// Actual weight; maximum weight when omitted
    #[serde(default)]
    pub weight: Option<f64>,
    #[serde(default)]
    pub min_weight: Option<f64>,
    #[serde(default)]
    pub bank_deg: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StallSpeedResult {
    pub stall_speed_kt: f64,
    pub load_factor: f64,
    pub weight_ratio: f64,
    #[serde(default)]
    pub warnings: Vec<ValidationIssue>,
}

pub fn stall_speed(input: &StallSpeedInput) -> Result<StallSpeedResult, NavError> {
    stall_speed_with_rules(input, &NavRules::default())
}

/// Stall speed scaled by sqrt(weight ratio) and sqrt(load factor).
pub fn stall_speed_with_rules(
    input: &StallSpeedInput,
    rules: &NavRules,
) -> Result<StallSpeedResult, NavError> {
    let mut issues = Vec::new();
    require_positive(&mut issues, "vs_kt", input.vs_kt);
    require_positive(&mut issues, "max_weight", input.max_weight);
    let weight = input.weight.unwrap_or(input.max_weight);
    if require_finite(&mut issues, "weight", weight) {
        let min_weight = input.min_weight.unwrap_or(0.0);
        if weight <= 0.0 || weight < min_weight || weight > input.max_weight {
            issues.push(ValidationIssue::error(
                "weight",
                format!(
                    "weight {weight} outside airframe limits ({min_weight}-{})",
                    input.max_weight
                ),
            ));
        }
    }
    if require_finite(&mut issues, "bank_deg", input.bank_deg) {
        let bank = input.bank_deg.abs();
        if bank >= 90.0 {
            issues.push(ValidationIssue::error(
                "bank_deg",
                "bank angle must be below 90°",
            ));
        } else if bank > rules.large_bank_deg {
            issues.push(ValidationIssue::warning(
                "bank_deg",
                format!("large bank angle ({bank:.0}°), load factor rises steeply"),
            ));
        }
    }
    let warnings = finish(issues)?;

    let load_factor = 1.0 / input.bank_deg.to_radians().cos();
    let weight_ratio = weight / input.max_weight;
    Ok(StallSpeedResult {
        stall_speed_kt: input.vs_kt * weight_ratio.sqrt() * load_factor.sqrt(),
        load_factor,
        weight_ratio,
        warnings,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input(weight: Option<f64>, bank_deg: f64) -> StallSpeedInput {
        StallSpeedInput {
            vs_kt: 48.0,
            max_weight: 1100.0,
            weight,
            min_weight: Some(600.0),
            bank_deg,
        }
    }

    #[test]
    fn wings_level_at_max_weight_is_published_speed() {
        let result = stall_speed(&input(None, 0.0)).unwrap();
        assert!((result.stall_speed_kt - 48.0).abs() < 1e-12);
        assert_eq!(result.load_factor, 1.0);
    }

    #[test]
    fn sixty_degree_bank_doubles_load_factor() {
        let result = stall_speed(&input(None, 60.0)).unwrap();
        assert!((result.load_factor - 2.0).abs() < 1e-9);
        assert!((result.stall_speed_kt - 48.0 * 2f64.sqrt()).abs() < 1e-9);
        assert_eq!(result.warnings.len(), 1);
    }

    #[test]
    fn lighter_aircraft_stalls_slower() {
        let result = stall_speed(&input(Some(825.0), 0.0)).unwrap();
        assert!((result.stall_speed_kt - 48.0 * 0.75f64.sqrt()).abs() < 1e-9);
    }

    #[test]
    fn weight_outside_limits_blocks() {
        assert!(stall_speed(&input(Some(1200.0), 0.0)).is_err());
        assert!(stall_speed(&input(Some(500.0), 0.0)).is_err());
    }

    #[test]
    fn weight_limits_themselves_are_accepted() {
        let at_min = stall_speed(&input(Some(600.0), 0.0)).unwrap();
        assert!((at_min.weight_ratio - 600.0 / 1100.0).abs() < 1e-12);
        assert!(stall_speed(&input(Some(1100.0), 0.0)).is_ok());
    }

    #[test]
    fn vertical_bank_blocks() {
        let err = stall_speed(&input(None, 90.0)).unwrap_err();
        assert_eq!(err.issues()[0].field, "bank_deg");
    }
}
