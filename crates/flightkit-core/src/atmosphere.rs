//! International Standard Atmosphere helpers.
//!
//! Altitudes in feet, temperatures in °C, pressures in hPa. Covers the
//! troposphere and the isothermal layer above the tropopause.

use crate::error::NavError;
use crate::rules::NavRules;
use crate::validation::{finish, require_finite, require_positive, ValidationIssue};
use serde::{Deserialize, Serialize};

pub const SEA_LEVEL_PRESSURE_HPA: f64 = 1013.25;
pub const SEA_LEVEL_TEMPERATURE_C: f64 = 15.0;
pub const TROPOPAUSE_FT: f64 = 36_089.24;
pub const TROPOPAUSE_TEMPERATURE_C: f64 = -56.5;

const KELVIN: f64 = 273.15;
const LAPSE_RATE_C_PER_FT: f64 = 0.001_981_2;
const PRESSURE_COEFF_PER_FT: f64 = 6.875_59e-6;
const PRESSURE_EXPONENT: f64 = 5.255_88;
const TROPOPAUSE_PRESSURE_HPA: f64 = 226.32;
const STRATOSPHERE_SCALE_FT: f64 = 20_805.8;
/// Pressure altitude change per hPa of QNH offset
const FT_PER_HPA: f64 = 30.0;
/// Density altitude change per °C of ISA deviation
const FT_PER_DEGREE_C: f64 = 120.0;

/// ISA temperature at a pressure altitude.
pub fn isa_temperature_c(pressure_altitude_ft: f64) -> f64 {
    if pressure_altitude_ft < TROPOPAUSE_FT {
        SEA_LEVEL_TEMPERATURE_C - LAPSE_RATE_C_PER_FT * pressure_altitude_ft
    } else {
        TROPOPAUSE_TEMPERATURE_C
    }
}

/// ISA static pressure at a pressure altitude.
pub fn isa_pressure_hpa(pressure_altitude_ft: f64) -> f64 {
    if pressure_altitude_ft < TROPOPAUSE_FT {
        SEA_LEVEL_PRESSURE_HPA
            * (1.0 - PRESSURE_COEFF_PER_FT * pressure_altitude_ft).powf(PRESSURE_EXPONENT)
    } else {
        TROPOPAUSE_PRESSURE_HPA
            * (-(pressure_altitude_ft - TROPOPAUSE_FT) / STRATOSPHERE_SCALE_FT).exp()
    }
}

/// Pressure altitude from an altimeter reading with QNH set.
pub fn pressure_altitude_ft(altitude_ft: f64, qnh_hpa: f64) -> f64 {
    altitude_ft + (SEA_LEVEL_PRESSURE_HPA - qnh_hpa) * FT_PER_HPA
}

pub fn density_altitude_ft(pressure_altitude_ft: f64, oat_c: f64) -> f64 {
    pressure_altitude_ft + FT_PER_DEGREE_C * (oat_c - isa_temperature_c(pressure_altitude_ft))
}

/// Air density relative to ISA sea level.
pub fn density_ratio(pressure_altitude_ft: f64, oat_c: f64) -> f64 {
    let pressure_ratio = isa_pressure_hpa(pressure_altitude_ft) / SEA_LEVEL_PRESSURE_HPA;
    let temperature_ratio = (oat_c + KELVIN) / (SEA_LEVEL_TEMPERATURE_C + KELVIN);
    pressure_ratio / temperature_ratio
}

/// True airspeed from calibrated airspeed (incompressible approximation).
pub fn tas_from_cas(cas_kt: f64, pressure_altitude_ft: f64, oat_c: f64) -> f64 {
    cas_kt / density_ratio(pressure_altitude_ft, oat_c).sqrt()
}

fn standard_qnh() -> f64 {
    SEA_LEVEL_PRESSURE_HPA
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AtmosphereInput {
    /// Altimeter altitude with QNH set (ft)
    pub altitude_ft: f64,
    #[serde(default = "standard_qnh")]
    pub qnh_hpa: f64,
    /// Outside air temperature; ISA when omitted
    #[serde(default)]
    pub oat_c: Option<f64>,
    #[serde(default)]
    pub cas_kt: Option<f64>,
    #[serde(default)]
    pub service_ceiling_ft: Option<f64>,
}

impl AtmosphereInput {
    pub fn new(altitude_ft: f64) -> Self {
        Self {
            altitude_ft,
            qnh_hpa: SEA_LEVEL_PRESSURE_HPA,
            oat_c: None,
            cas_kt: None,
            service_ceiling_ft: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AtmosphereReport {
    pub pressure_altitude_ft: f64,
    pub isa_temperature_c: f64,
    pub oat_c: f64,
    pub isa_deviation_c: f64,
    pub pressure_hpa: f64,
    pub density_ratio: f64,
    pub density_altitude_ft: f64,
    pub tas_kt: Option<f64>,
    #[serde(default)]
    pub warnings: Vec<ValidationIssue>,
}

pub fn compute_atmosphere(input: &AtmosphereInput) -> Result<AtmosphereReport, NavError> {
    compute_atmosphere_with_rules(input, &NavRules::default())
}

/// Atmosphere at an altitude, with density-altitude and service-ceiling checks.
pub fn compute_atmosphere_with_rules(
    input: &AtmosphereInput,
    rules: &NavRules,
) -> Result<AtmosphereReport, NavError> {
    let mut issues = Vec::new();
    require_finite(&mut issues, "altitude_ft", input.altitude_ft);
    if require_finite(&mut issues, "qnh_hpa", input.qnh_hpa)
        && !(850.0..=1100.0).contains(&input.qnh_hpa)
    {
        issues.push(ValidationIssue::error(
            "qnh_hpa",
            format!("QNH {} hPa outside 850-1100 hPa", input.qnh_hpa),
        ));
    }
    if let Some(oat) = input.oat_c {
        if require_finite(&mut issues, "oat_c", oat) && !(-90.0..=60.0).contains(&oat) {
            issues.push(ValidationIssue::error(
                "oat_c",
                format!("temperature {oat} °C outside -90..60 °C"),
            ));
        }
    }
    if let Some(cas) = input.cas_kt {
        require_positive(&mut issues, "cas_kt", cas);
    }
    let mut issues = finish(issues)?;

    let pressure_altitude = pressure_altitude_ft(input.altitude_ft, input.qnh_hpa);
    let isa_temperature = isa_temperature_c(pressure_altitude);
    let oat = input.oat_c.unwrap_or(isa_temperature);
    let density_altitude = density_altitude_ft(pressure_altitude, oat);
    let sigma = density_ratio(pressure_altitude, oat);

    if let Some(ceiling) = input.service_ceiling_ft {
        if pressure_altitude >= ceiling {
            issues.push(ValidationIssue::error(
                "altitude_ft",
                format!(
                    "pressure altitude {pressure_altitude:.0} ft at or above service ceiling {ceiling:.0} ft"
                ),
            ));
        }
    }
    if density_altitude > rules.high_density_altitude_ft {
        issues.push(ValidationIssue::warning(
            "density_altitude_ft",
            format!("high density altitude ({density_altitude:.0} ft), expect reduced performance"),
        ));
    }
    let warnings = finish(issues)?;

    Ok(AtmosphereReport {
        pressure_altitude_ft: pressure_altitude,
        isa_temperature_c: isa_temperature,
        oat_c: oat,
        isa_deviation_c: oat - isa_temperature,
        pressure_hpa: isa_pressure_hpa(pressure_altitude),
        density_ratio: sigma,
        density_altitude_ft: density_altitude,
        tas_kt: input.cas_kt.map(|cas| tas_from_cas(cas, pressure_altitude, oat)),
        warnings,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sea_level_standard_day() {
        let report = compute_atmosphere(&AtmosphereInput::new(0.0)).unwrap();
        assert_eq!(report.isa_temperature_c, 15.0);
        assert!((report.pressure_hpa - 1013.25).abs() < 1e-9);
        assert!((report.density_ratio - 1.0).abs() < 1e-12);
        assert!(report.density_altitude_ft.abs() < 1e-9);
        assert!(report.warnings.is_empty());
    }

    #[test]
    fn ten_thousand_feet() {
        assert!((isa_temperature_c(10_000.0) + 4.81).abs() < 0.01);
        assert!((isa_pressure_hpa(10_000.0) - 696.8).abs() < 0.5);
        let tas = tas_from_cas(100.0, 10_000.0, isa_temperature_c(10_000.0));
        assert!((tas - 116.4).abs() < 0.5, "{tas}");
    }

    #[test]
    fn stratosphere_is_isothermal() {
        assert_eq!(isa_temperature_c(40_000.0), TROPOPAUSE_TEMPERATURE_C);
        let below = isa_pressure_hpa(TROPOPAUSE_FT - 1.0);
        let above = isa_pressure_hpa(TROPOPAUSE_FT + 1.0);
        assert!((below - above).abs() < 0.1);
    }

    #[test]
    fn low_qnh_raises_pressure_altitude() {
        assert!((pressure_altitude_ft(1000.0, 1003.25) - 1300.0).abs() < 1e-9);
    }

    #[test]
    fn hot_day_warns_about_density_altitude() {
        let input = AtmosphereInput {
            oat_c: Some(35.0),
            ..AtmosphereInput::new(5000.0)
        };
        let report = compute_atmosphere(&input).unwrap();
        assert!(report.density_altitude_ft > 8000.0);
        assert_eq!(report.warnings.len(), 1);
        assert_eq!(report.warnings[0].field, "density_altitude_ft");
    }

    #[test]
    fn at_service_ceiling_is_an_error() {
        let input = AtmosphereInput {
            service_ceiling_ft: Some(14_000.0),
            ..AtmosphereInput::new(14_000.0)
        };
        let err = compute_atmosphere(&input).unwrap_err();
        assert!(err.issues().iter().any(|i| i.field == "altitude_ft" && i.is_error()));
    }

    #[test]
    fn implausible_qnh_is_rejected() {
        let input = AtmosphereInput {
            qnh_hpa: 29.92,
            ..AtmosphereInput::new(1000.0)
        };
        assert!(compute_atmosphere(&input).is_err());
    }
}
