//! Approximation of a geodesic route by a chain of constant-heading chords.
//!
//! Navigation systems fly long great-circle routes as a series of rhumb
//! lines between intermediate waypoints. The difference between the sum of
//! the chords and the true geodesic is the segmentation penalty.

use crate::error::NavError;
use crate::geodesy::{destination, inverse, is_antipodal, rhumb_distance_nm, validate_coordinate};
use crate::models::Coordinate;
use crate::rules::NavRules;
use crate::validation::{finish, ValidationIssue};
use serde::{Deserialize, Serialize};

/// One constant-heading chord of a segmented route.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NavigationSegment {
    /// 1-based position in the chain
    pub index: usize,
    pub start: Coordinate,
    pub end: Coordinate,
    /// Initial geodesic bearing of the chord (degrees true)
    pub heading_deg: f64,
    /// Flown (rhumb) distance of the chord
    pub distance_nm: f64,
    pub cumulative_distance_nm: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SegmentCalculationResult {
    pub segments: Vec<NavigationSegment>,
    /// Sum of the chord distances
    pub total_distance_nm: f64,
    /// Shortest path between the endpoints
    pub orthodromic_distance_nm: f64,
    /// Single constant-heading chord between the endpoints
    pub pure_rhumb_distance_nm: f64,
    pub initial_bearing_deg: f64,
    pub final_bearing_deg: f64,
    pub segment_count: usize,
}

impl SegmentCalculationResult {
    /// Result for coincident endpoints: no segments, all distances zero.
    pub fn empty() -> Self {
        Self {
            segments: Vec::new(),
            total_distance_nm: 0.0,
            orthodromic_distance_nm: 0.0,
            pure_rhumb_distance_nm: 0.0,
            initial_bearing_deg: 0.0,
            final_bearing_deg: 0.0,
            segment_count: 0,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Extra distance flown by the chord chain compared to the geodesic.
    pub fn segmentation_penalty_nm(&self) -> f64 {
        (self.total_distance_nm - self.orthodromic_distance_nm).max(0.0)
    }
}

/// Segment a route with default thresholds.
pub fn segment_geodesic(
    from: Coordinate,
    to: Coordinate,
    num_segments: usize,
) -> Result<SegmentCalculationResult, NavError> {
    segment_geodesic_with_rules(from, to, num_segments, &NavRules::default())
}

/// Divide the geodesic from `from` to `to` into `num_segments` chords of
/// equal geodesic length and measure each chord as flown at constant heading.
pub fn segment_geodesic_with_rules(
    from: Coordinate,
    to: Coordinate,
    num_segments: usize,
    rules: &NavRules,
) -> Result<SegmentCalculationResult, NavError> {
    let mut issues = Vec::new();
    validate_coordinate(&mut issues, "from", from);
    validate_coordinate(&mut issues, "to", to);
    if num_segments == 0 {
        issues.push(ValidationIssue::error(
            "num_segments",
            "at least one segment is required",
        ));
    }
    finish(issues)?;

    let route = inverse(from, to);
    if route.distance_nm < rules.degenerate_distance_nm {
        tracing::debug!(distance_nm = route.distance_nm, "endpoints coincide, nothing to segment");
        return Ok(SegmentCalculationResult::empty());
    }
    if is_antipodal(from, to, rules.antipodal_tolerance_deg) {
        return Err(NavError::degenerate(
            "endpoints are antipodal; the shortest path has no unique direction",
        ));
    }

    let mut segments = Vec::with_capacity(num_segments);
    let mut cumulative = 0.0;
    let mut start = from;

    for i in 1..=num_segments {
        let end = if i == num_segments {
            to
        } else {
            let along_nm = route.distance_nm * i as f64 / num_segments as f64;
            destination(from, route.initial_bearing_deg, along_nm)
        };

        let chord = inverse(start, end);
        let distance_nm = chord_distance_nm(start, end, chord.distance_nm, rules);
        cumulative += distance_nm;

        segments.push(NavigationSegment {
            index: i,
            start,
            end,
            heading_deg: chord.initial_bearing_deg,
            distance_nm,
            cumulative_distance_nm: cumulative,
        });
        start = end;
    }

    let pure_rhumb_distance_nm = chord_distance_nm(from, to, route.distance_nm, rules);

    tracing::debug!(
        segments = num_segments,
        total_nm = cumulative,
        orthodromic_nm = route.distance_nm,
        "segmented geodesic route"
    );

    Ok(SegmentCalculationResult {
        segment_count: segments.len(),
        segments,
        total_distance_nm: cumulative,
        orthodromic_distance_nm: route.distance_nm,
        pure_rhumb_distance_nm,
        initial_bearing_deg: route.initial_bearing_deg,
        final_bearing_deg: route.final_bearing_deg,
    })
}

/// Flown distance of one chord.
///
/// Short chords use the geodesic directly (rhumb and geodesic agree at that
/// scale). Longer chords use the rhumb distance, never below the geodesic.
fn chord_distance_nm(
    start: Coordinate,
    end: Coordinate,
    geodesic_nm: f64,
    rules: &NavRules,
) -> f64 {
    if geodesic_nm < rules.short_chord_nm {
        return geodesic_nm;
    }
    rhumb_distance_nm(start, end).max(geodesic_nm)
}
