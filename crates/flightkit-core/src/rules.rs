//! Thresholds and labels used by the navigation engine.

use serde::{Deserialize, Serialize};

/// Tunable thresholds for the calculators.
///
/// Every public entry point has a `*_with_rules` variant; the plain variant
/// uses [`NavRules::default`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NavRules {
    /// Above this |WCA| (degrees) the effective TAS replaces TAS in the ground speed sum
    pub etas_threshold_deg: f64,
    /// |WCA| (degrees) above which the wind triangle result carries a warning
    pub large_wca_warning_deg: f64,
    /// Chords shorter than this (NM) are measured with the geodesic distance
    pub short_chord_nm: f64,
    /// Endpoints closer than this (NM) yield an empty segmentation
    pub degenerate_distance_nm: f64,
    /// Latitude/longitude tolerance (degrees) for treating endpoints as antipodal
    pub antipodal_tolerance_deg: f64,
    /// Label of the synthetic top-of-climb checkpoint
    pub cruise_marker_name: String,
    /// Label of the synthetic end-of-leg checkpoint
    pub arrival_name: String,
    /// Density altitude (ft) above which a warning is raised
    pub high_density_altitude_ft: f64,
    /// Bank angle (degrees) above which the stall calculator warns
    pub large_bank_deg: f64,
}

impl Default for NavRules {
    fn default() -> Self {
        Self {
            etas_threshold_deg: 10.0,
            large_wca_warning_deg: 10.0,
            short_chord_nm: 100.0,
            degenerate_distance_nm: 0.01,
            antipodal_tolerance_deg: 1e-6,
            cruise_marker_name: "Cruise Altitude Reached".to_string(),
            arrival_name: "Arrival".to_string(),
            high_density_altitude_ft: 8000.0,
            large_bank_deg: 45.0,
        }
    }
}
