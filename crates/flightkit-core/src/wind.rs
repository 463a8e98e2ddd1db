//! Wind triangle solver for a single leg.
//!
//! Sign conventions at this boundary:
//! - `crosswind_kt` is positive when the wind comes from the right of the
//!   heading.
//! - `along_track_wind_kt` is NEGATIVE for a headwind and POSITIVE for a
//!   tailwind, so `ground_speed = airspeed + along_track_wind_kt`.

use crate::error::NavError;
use crate::geodesy::{fold_degrees, normalize_degrees};
use crate::models::CarryMode;
use crate::rules::NavRules;
use crate::validation::{
    finish, require_finite, require_non_negative, require_positive, ValidationIssue,
};
use serde::{Deserialize, Serialize};

const ZERO_SNAP: f64 = 1e-9;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WindTriangleInput {
    /// Direction the wind blows FROM (degrees true)
    pub wind_direction_deg: f64,
    pub wind_speed_kt: f64,
    pub true_heading_deg: f64,
    pub true_airspeed_kt: f64,
    /// Signed magnetic variation added to the true heading
    #[serde(default)]
    pub magnetic_variation_deg: f64,
    #[serde(default)]
    pub distance_nm: Option<f64>,
    /// Fuel flow in units per hour
    #[serde(default)]
    pub fuel_flow: Option<f64>,
    #[serde(default)]
    pub carry: CarryMode,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WindTriangleResult {
    /// Positive = wind from the right
    pub crosswind_kt: f64,
    /// Negative = headwind, positive = tailwind
    pub along_track_wind_kt: f64,
    pub wind_correction_angle_deg: f64,
    pub ground_speed_kt: f64,
    /// Normalized to [0, 360)
    pub compass_heading_deg: f64,
    /// Effective TAS, only set when |WCA| exceeds the ETAS threshold
    pub etas_kt: Option<f64>,
    /// Leg time in hours, when a distance was given
    pub eta_hours: Option<f64>,
    /// Fuel figure per the input's carry mode, when distance and fuel flow were given
    pub fuel_used: Option<f64>,
    #[serde(default)]
    pub warnings: Vec<ValidationIssue>,
}

impl WindTriangleResult {
    pub fn is_headwind(&self) -> bool {
        self.along_track_wind_kt < 0.0
    }
}

/// Check a wind triangle input without solving it.
pub fn validate_wind_input(input: &WindTriangleInput) -> Vec<ValidationIssue> {
    let mut issues = Vec::new();
    require_finite(&mut issues, "wind_direction_deg", input.wind_direction_deg);
    require_non_negative(&mut issues, "wind_speed_kt", input.wind_speed_kt);
    require_finite(&mut issues, "true_heading_deg", input.true_heading_deg);
    require_positive(&mut issues, "true_airspeed_kt", input.true_airspeed_kt);
    require_finite(&mut issues, "magnetic_variation_deg", input.magnetic_variation_deg);
    if let Some(distance) = input.distance_nm {
        require_non_negative(&mut issues, "distance_nm", distance);
    }
    if let Some(fuel_flow) = input.fuel_flow {
        require_non_negative(&mut issues, "fuel_flow", fuel_flow);
    }
    match input.carry {
        CarryMode::None => {}
        CarryMode::Time { elapsed_minutes } => {
            require_non_negative(&mut issues, "elapsed_minutes", elapsed_minutes);
        }
        CarryMode::Fuel {
            elapsed_minutes,
            previous_fuel_used,
        } => {
            require_non_negative(&mut issues, "elapsed_minutes", elapsed_minutes);
            require_non_negative(&mut issues, "previous_fuel_used", previous_fuel_used);
        }
    }
    issues
}

/// Solve the wind triangle with default thresholds.
pub fn solve_wind_triangle(input: &WindTriangleInput) -> Result<WindTriangleResult, NavError> {
    solve_wind_triangle_with_rules(input, &NavRules::default())
}

/// Solve the wind triangle for one leg.
///
/// Returns [`NavError::NoSolution`] when the crosswind exceeds the true
/// airspeed or the headwind leaves no positive ground speed.
pub fn solve_wind_triangle_with_rules(
    input: &WindTriangleInput,
    rules: &NavRules,
) -> Result<WindTriangleResult, NavError> {
    let mut warnings = finish(validate_wind_input(input))?;

    let tas = input.true_airspeed_kt;
    let heading = normalize_degrees(input.true_heading_deg);
    let wind_angle =
        fold_degrees(normalize_degrees(input.wind_direction_deg) - heading).to_radians();

    let crosswind = snap_zero(input.wind_speed_kt * wind_angle.sin());
    let along_track = snap_zero(-input.wind_speed_kt * wind_angle.cos());

    let ratio = crosswind / tas;
    if ratio.abs() > 1.0 {
        tracing::debug!(crosswind, tas, "crosswind exceeds true airspeed");
        return Err(NavError::no_solution(format!(
            "crosswind component {crosswind:.1} kt exceeds true airspeed {tas:.1} kt"
        )));
    }

    let wca_rad = ratio.asin();
    let wca = wca_rad.to_degrees();

    let etas = (wca.abs() > rules.etas_threshold_deg).then(|| tas * wca_rad.cos());
    let ground_speed = snap_zero(etas.unwrap_or(tas) + along_track);
    if ground_speed <= 0.0 {
        tracing::debug!(ground_speed, "headwind leaves no forward ground speed");
        return Err(NavError::no_solution(format!(
            "headwind {:.1} kt leaves no forward ground speed",
            -along_track
        )));
    }

    if wca.abs() > rules.large_wca_warning_deg {
        warnings.push(ValidationIssue::warning(
            "wind_correction_angle_deg",
            format!("large wind correction angle ({wca:.1}°), effective TAS applied"),
        ));
    }

    let compass_heading = normalize_degrees(heading + wca + input.magnetic_variation_deg);
    let eta_hours = input.distance_nm.map(|distance| distance / ground_speed);
    let fuel_used = match (input.fuel_flow, eta_hours) {
        (Some(fuel_flow), Some(leg_hours)) => Some(leg_fuel(fuel_flow, leg_hours, input.carry)),
        _ => None,
    };

    Ok(WindTriangleResult {
        crosswind_kt: crosswind,
        along_track_wind_kt: along_track,
        wind_correction_angle_deg: wca,
        ground_speed_kt: ground_speed,
        compass_heading_deg: compass_heading,
        etas_kt: etas,
        eta_hours,
        fuel_used,
        warnings,
    })
}

/// Fuel figure for a leg under the given carry mode.
///
/// Fuel carry adds this leg's burn to the earlier total. Time carry bills
/// the earlier elapsed time at this leg's fuel flow.
fn leg_fuel(fuel_flow: f64, leg_hours: f64, carry: CarryMode) -> f64 {
    match carry {
        CarryMode::Fuel {
            previous_fuel_used, ..
        } => previous_fuel_used + fuel_flow * leg_hours,
        CarryMode::Time { elapsed_minutes } => fuel_flow * (leg_hours + elapsed_minutes / 60.0),
        CarryMode::None => fuel_flow * leg_hours,
    }
}

fn snap_zero(value: f64) -> f64 {
    if value.abs() < ZERO_SNAP {
        0.0
    } else {
        value
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input(
        wind_direction_deg: f64,
        wind_speed_kt: f64,
        true_heading_deg: f64,
        tas: f64,
    ) -> WindTriangleInput {
        WindTriangleInput {
            wind_direction_deg,
            wind_speed_kt,
            true_heading_deg,
            true_airspeed_kt: tas,
            magnetic_variation_deg: 0.0,
            distance_nm: None,
            fuel_flow: None,
            carry: CarryMode::None,
        }
    }

    #[test]
    fn pure_crosswind_from_the_right() {
        let result = solve_wind_triangle(&input(90.0, 20.0, 0.0, 100.0)).unwrap();
        assert!((result.crosswind_kt - 20.0).abs() < 1e-9);
        assert_eq!(result.along_track_wind_kt, 0.0);
        assert!(result.wind_correction_angle_deg > 11.0);
        // |WCA| > 10°, so effective TAS is used and only a small loss shows up
        let etas = result.etas_kt.unwrap();
        assert!((result.ground_speed_kt - etas).abs() < 1e-9);
        assert!(result.ground_speed_kt > 97.0 && result.ground_speed_kt < 100.0);
        assert_eq!(result.warnings.len(), 1);
    }

    #[test]
    fn head_and_tail_wind_signs() {
        let head = solve_wind_triangle(&input(0.0, 20.0, 0.0, 100.0)).unwrap();
        assert_eq!(head.crosswind_kt, 0.0);
        assert_eq!(head.wind_correction_angle_deg, 0.0);
        assert!((head.along_track_wind_kt + 20.0).abs() < 1e-9);
        assert!(head.is_headwind());
        assert!((head.ground_speed_kt - 80.0).abs() < 1e-9);

        let tail = solve_wind_triangle(&input(180.0, 20.0, 0.0, 100.0)).unwrap();
        assert_eq!(tail.crosswind_kt, 0.0);
        assert_eq!(tail.wind_correction_angle_deg, 0.0);
        assert!((tail.along_track_wind_kt - 20.0).abs() < 1e-9);
        assert!((tail.ground_speed_kt - 120.0).abs() < 1e-9);
    }

    #[test]
    fn wind_from_left_gives_negative_correction() {
        let result = solve_wind_triangle(&input(270.0, 10.0, 0.0, 100.0)).unwrap();
        assert!(result.crosswind_kt < 0.0);
        assert!(result.wind_correction_angle_deg < 0.0);
        assert!(result.etas_kt.is_none());
        assert!((result.ground_speed_kt - 100.0).abs() < 1e-9);
        assert!(result.compass_heading_deg > 354.0);
    }

    #[test]
    fn angles_wrap_through_north() {
        let a = solve_wind_triangle(&input(350.0, 15.0, 10.0, 110.0)).unwrap();
        let b = solve_wind_triangle(&input(-10.0, 15.0, 370.0, 110.0)).unwrap();
        assert!((a.crosswind_kt - b.crosswind_kt).abs() < 1e-9);
        assert!((a.ground_speed_kt - b.ground_speed_kt).abs() < 1e-9);
    }

    #[test]
    fn compass_heading_applies_variation() {
        let mut i = input(0.0, 0.0, 355.0, 100.0);
        i.magnetic_variation_deg = 10.0;
        let result = solve_wind_triangle(&i).unwrap();
        assert!((result.compass_heading_deg - 5.0).abs() < 1e-9);
    }

    #[test]
    fn crosswind_stronger_than_tas_has_no_solution() {
        let err = solve_wind_triangle(&input(90.0, 60.0, 0.0, 50.0)).unwrap_err();
        assert!(matches!(err, NavError::NoSolution { .. }));
    }

    #[test]
    fn crosswind_equal_to_tas_has_no_solution() {
        let mut wind = input(90.0, 100.0, 0.0, 100.0);
        wind.distance_nm = Some(60.0);
        let err = solve_wind_triangle(&wind).unwrap_err();
        assert!(matches!(err, NavError::NoSolution { .. }));
    }

    #[test]
    fn headwind_stronger_than_tas_has_no_solution() {
        let err = solve_wind_triangle(&input(0.0, 60.0, 0.0, 50.0)).unwrap_err();
        assert!(matches!(err, NavError::NoSolution { .. }));
    }

    #[test]
    fn invalid_airspeed_is_an_input_error() {
        let err = solve_wind_triangle(&input(0.0, 10.0, 0.0, 0.0)).unwrap_err();
        assert_eq!(err.issues()[0].field, "true_airspeed_kt");
        let err = solve_wind_triangle(&input(0.0, -5.0, 0.0, 100.0)).unwrap_err();
        assert_eq!(err.issues()[0].field, "wind_speed_kt");
    }

    #[test]
    fn eta_and_fuel_carry_modes() {
        let mut i = input(0.0, 0.0, 0.0, 120.0);
        i.distance_nm = Some(60.0);
        i.fuel_flow = Some(10.0);

        let plain = solve_wind_triangle(&i).unwrap();
        assert!((plain.eta_hours.unwrap() - 0.5).abs() < 1e-12);
        assert!((plain.fuel_used.unwrap() - 5.0).abs() < 1e-12);

        i.carry = CarryMode::Fuel {
            elapsed_minutes: 30.0,
            previous_fuel_used: 7.0,
        };
        let fuel_carry = solve_wind_triangle(&i).unwrap();
        assert!((fuel_carry.fuel_used.unwrap() - 12.0).abs() < 1e-12);

        i.carry = CarryMode::Time {
            elapsed_minutes: 30.0,
        };
        let time_carry = solve_wind_triangle(&i).unwrap();
        assert!((time_carry.fuel_used.unwrap() - 10.0).abs() < 1e-12);
    }

    #[test]
    fn no_fuel_without_distance() {
        let mut i = input(0.0, 0.0, 0.0, 120.0);
        i.fuel_flow = Some(10.0);
        let result = solve_wind_triangle(&i).unwrap();
        assert!(result.eta_hours.is_none());
        assert!(result.fuel_used.is_none());
    }
}
