//! Geodesy primitives on the WGS-84 ellipsoid.
//!
//! Distances are in nautical miles and bearings in degrees true,
//! normalized to [0, 360).

use crate::error::NavError;
use crate::models::Coordinate;
use crate::validation::{finish, ValidationIssue};
use geo::{Bearing, Destination, Distance, Geodesic, Haversine, Rhumb};
use serde::{Deserialize, Serialize};

pub const METERS_PER_NM: f64 = 1852.0;

/// Result of the inverse geodesic problem between two points.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeodesicInverse {
    pub distance_nm: f64,
    pub initial_bearing_deg: f64,
    pub final_bearing_deg: f64,
}

/// Distance calculator output: shortest path and constant-heading path
/// between two points.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RouteDistance {
    pub from: Coordinate,
    pub to: Coordinate,
    pub distance_nm: f64,
    pub initial_bearing_deg: f64,
    pub final_bearing_deg: f64,
    pub rhumb_distance_nm: f64,
    pub rhumb_bearing_deg: f64,
}

/// Normalize an angle to [0, 360).
pub fn normalize_degrees(angle: f64) -> f64 {
    let normalized = angle.rem_euclid(360.0);
    if normalized >= 360.0 {
        0.0
    } else {
        normalized
    }
}

/// Fold an angle to (-180, 180].
pub fn fold_degrees(angle: f64) -> f64 {
    let normalized = normalize_degrees(angle);
    if normalized > 180.0 {
        normalized - 360.0
    } else {
        normalized
    }
}

/// Inverse geodesic: distance plus initial and final bearings.
pub fn inverse(from: Coordinate, to: Coordinate) -> GeodesicInverse {
    let a = from.to_point();
    let b = to.to_point();
    let distance_m = Geodesic.distance(a, b);
    let initial = Geodesic.bearing(a, b);
    // Azimuth at the far end is the reverse geodesic's start azimuth turned around.
    let reverse = Geodesic.bearing(b, a);
    GeodesicInverse {
        distance_nm: distance_m / METERS_PER_NM,
        initial_bearing_deg: normalize_degrees(initial),
        final_bearing_deg: normalize_degrees(reverse + 180.0),
    }
}

/// Point reached by following the geodesic from `from` with the given
/// initial bearing for `distance_nm`.
pub fn destination(from: Coordinate, bearing_deg: f64, distance_nm: f64) -> Coordinate {
    let point = Geodesic.destination(from.to_point(), bearing_deg, distance_nm * METERS_PER_NM);
    let mut coordinate = Coordinate::from_point(point);
    coordinate.lon = fold_degrees(coordinate.lon);
    coordinate
}

/// Constant-heading (loxodrome) distance between two points.
///
/// Spherical rhumb distance scaled by the ellipsoid/sphere ratio of the
/// shortest path between the same two points, so the scale factor follows
/// the latitudes involved. Never shorter than the geodesic.
pub fn rhumb_distance_nm(from: Coordinate, to: Coordinate) -> f64 {
    let a = from.to_point();
    let b = to.to_point();
    let geodesic_m = Geodesic.distance(a, b);
    let sphere_gc_m = Haversine.distance(a, b);
    if sphere_gc_m <= f64::EPSILON {
        return geodesic_m / METERS_PER_NM;
    }

    let scale = geodesic_m / sphere_gc_m;
    let rhumb_m = Rhumb.distance(a, b) * scale;
    if !rhumb_m.is_finite() || rhumb_m < geodesic_m {
        tracing::debug!(
            rhumb_m,
            geodesic_m,
            "rhumb distance below geodesic, clamping"
        );
        return geodesic_m / METERS_PER_NM;
    }
    rhumb_m / METERS_PER_NM
}

/// Constant true heading from `from` to `to`.
pub fn rhumb_bearing_deg(from: Coordinate, to: Coordinate) -> f64 {
    normalize_degrees(Rhumb.bearing(from.to_point(), to.to_point()))
}

/// Whether two points are (nearly) antipodal, where the shortest path has
/// no unique direction.
pub fn is_antipodal(from: Coordinate, to: Coordinate, tolerance_deg: f64) -> bool {
    let pole_to_pole = from.lat.abs() >= 90.0 - tolerance_deg
        && to.lat.abs() >= 90.0 - tolerance_deg
        && from.lat.signum() != to.lat.signum();
    let mirrored = (from.lat + to.lat).abs() <= tolerance_deg
        && fold_degrees(to.lon - from.lon).abs() >= 180.0 - tolerance_deg;
    pole_to_pole || mirrored
}

pub(crate) fn validate_coordinate(issues: &mut Vec<ValidationIssue>, field: &str, c: Coordinate) {
    if !c.is_valid() {
        issues.push(ValidationIssue::error(
            field,
            format!(
                "latitude must be within [-90, 90] and longitude within [-180, 180] (got {}, {})",
                c.lat, c.lon
            ),
        ));
    }
}

/// Distance and bearings between two points, geodesic and rhumb.
pub fn route_distance(from: Coordinate, to: Coordinate) -> Result<RouteDistance, NavError> {
    let mut issues = Vec::new();
    validate_coordinate(&mut issues, "from", from);
    validate_coordinate(&mut issues, "to", to);
    finish(issues)?;

    let inv = inverse(from, to);
    Ok(RouteDistance {
        from,
        to,
        distance_nm: inv.distance_nm,
        initial_bearing_deg: inv.initial_bearing_deg,
        final_bearing_deg: inv.final_bearing_deg,
        rhumb_distance_nm: rhumb_distance_nm(from, to),
        rhumb_bearing_deg: rhumb_bearing_deg(from, to),
    })
}
