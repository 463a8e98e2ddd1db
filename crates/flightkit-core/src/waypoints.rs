//! Time, fuel and ETA propagation along the checkpoints of one leg.

use crate::clock::{eta_from_departure, parse_hhmm};
use crate::error::NavError;
use crate::models::{CarryMode, ClimbPhase, Waypoint};
use crate::rules::NavRules;
use crate::validation::{finish, require_non_negative, require_positive, ValidationIssue};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// Distances closer than this (NM) count as the same position.
const SAME_POSITION_NM: f64 = 1e-9;

/// Allowed mismatch (hours) between a climb's duration and distance / ground speed.
const CLIMB_TIME_TOLERANCE_HOURS: f64 = 1e-6;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PropagationParams {
    /// Departure clock time, HHMM; ETAs are only produced when set
    #[serde(default)]
    pub departure_time: Option<String>,
    #[serde(default)]
    pub carry: CarryMode,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WaypointKind {
    /// Top of climb, inserted by the propagator
    CruiseAltitudeReached,
    /// Checkpoint supplied by the caller
    Checkpoint,
    /// End of leg, appended by the propagator
    Arrival,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WaypointResult {
    pub name: String,
    pub kind: WaypointKind,
    /// Distance from the start of the leg
    pub distance_nm: f64,
    pub distance_since_last_nm: f64,
    /// Minutes, including carried elapsed time
    pub cumulative_time_min: f64,
    pub time_since_last_min: f64,
    /// Clock time HHMM
    pub eta: Option<String>,
    /// Including carried fuel when fuel is carried
    pub fuel_used: Option<f64>,
    pub fuel_since_last: Option<f64>,
}

/// Ground speed and fuel profile of a leg: an optional climb prefix flown
/// at its own rate, then cruise.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LegProfile {
    pub cruise_ground_speed_kt: f64,
    pub cruise_fuel_flow: Option<f64>,
    pub climb: Option<ClimbPhase>,
}

impl LegProfile {
    pub fn new(
        cruise_ground_speed_kt: f64,
        cruise_fuel_flow: Option<f64>,
        climb: Option<ClimbPhase>,
    ) -> Self {
        // A climb of zero length has no effect on the profile.
        let climb = climb.filter(|c| c.distance_nm > 0.0);
        Self {
            cruise_ground_speed_kt,
            cruise_fuel_flow,
            climb,
        }
    }

    /// Minutes from the leg start to `distance_nm`.
    pub fn minutes_at(&self, distance_nm: f64) -> f64 {
        match self.climb {
            Some(climb) if distance_nm <= climb.distance_nm => {
                distance_nm / climb.ground_speed_kt * 60.0
            }
            Some(climb) => {
                climb.time_hours * 60.0
                    + (distance_nm - climb.distance_nm) / self.cruise_ground_speed_kt * 60.0
            }
            None => distance_nm / self.cruise_ground_speed_kt * 60.0,
        }
    }

    /// Fuel burnt from the leg start to `distance_nm`, if a fuel flow is known.
    pub fn fuel_at(&self, distance_nm: f64) -> Option<f64> {
        let fuel_flow = self.cruise_fuel_flow?;
        let fuel = match self.climb {
            Some(climb) if distance_nm <= climb.distance_nm => {
                distance_nm / climb.distance_nm * climb.fuel_used
            }
            Some(climb) => {
                climb.fuel_used
                    + (distance_nm - climb.distance_nm) / self.cruise_ground_speed_kt * fuel_flow
            }
            None => distance_nm / self.cruise_ground_speed_kt * fuel_flow,
        };
        Some(fuel)
    }
}

/// Propagate checkpoints with default labels.
pub fn propagate_waypoints(
    waypoints: &[Waypoint],
    ground_speed_kt: f64,
    fuel_flow: Option<f64>,
    params: &PropagationParams,
    total_leg_distance_nm: Option<f64>,
    climb: Option<&ClimbPhase>,
) -> Result<Vec<WaypointResult>, NavError> {
    propagate_waypoints_with_rules(
        waypoints,
        ground_speed_kt,
        fuel_flow,
        params,
        total_leg_distance_nm,
        climb,
        &NavRules::default(),
    )
}

/// Order the checkpoints of a leg by distance and annotate each with time,
/// fuel and ETA.
///
/// A non-positive ground speed yields an empty result. When a climb phase is
/// given, a top-of-climb checkpoint is inserted at the climb distance; when
/// the leg extends past the last checkpoint, an arrival checkpoint is
/// appended.
pub fn propagate_waypoints_with_rules(
    waypoints: &[Waypoint],
    ground_speed_kt: f64,
    fuel_flow: Option<f64>,
    params: &PropagationParams,
    total_leg_distance_nm: Option<f64>,
    climb: Option<&ClimbPhase>,
    rules: &NavRules,
) -> Result<Vec<WaypointResult>, NavError> {
    if ground_speed_kt.is_nan() || ground_speed_kt <= 0.0 {
        return Ok(Vec::new());
    }
    validate(waypoints, fuel_flow, total_leg_distance_nm, climb, params.carry)?;
    let departure = params.departure_time.as_deref().map(parse_hhmm).transpose()?;

    let profile = LegProfile::new(ground_speed_kt, fuel_flow, climb.copied());
    let entries = ordered_entries(waypoints, total_leg_distance_nm, profile.climb.as_ref(), rules);

    let offset_min = params.carry.elapsed_minutes();
    let offset_fuel = params.carry.previous_fuel_used().unwrap_or(0.0);

    let mut last_distance = 0.0;
    let mut last_time = offset_min;
    let mut last_fuel = profile.cruise_fuel_flow.map(|_| offset_fuel);

    let results = entries
        .into_iter()
        .map(|(name, kind, distance_nm)| {
            let cumulative_time = offset_min + profile.minutes_at(distance_nm);
            let fuel_used = profile.fuel_at(distance_nm).map(|fuel| offset_fuel + fuel);
            let fuel_since_last = fuel_used.zip(last_fuel).map(|(now, before)| now - before);

            let result = WaypointResult {
                name,
                kind,
                distance_nm,
                distance_since_last_nm: distance_nm - last_distance,
                cumulative_time_min: cumulative_time,
                time_since_last_min: cumulative_time - last_time,
                eta: departure.map(|dep| eta_from_departure(dep, cumulative_time)),
                fuel_used,
                fuel_since_last,
            };

            last_distance = distance_nm;
            last_time = cumulative_time;
            last_fuel = fuel_used;
            result
        })
        .collect();

    Ok(results)
}

fn validate(
    waypoints: &[Waypoint],
    fuel_flow: Option<f64>,
    total_leg_distance_nm: Option<f64>,
    climb: Option<&ClimbPhase>,
    carry: CarryMode,
) -> Result<(), NavError> {
    let mut issues = Vec::new();
    for (idx, waypoint) in waypoints.iter().enumerate() {
        let field = format!("waypoints[{idx}].distance_nm");
        require_non_negative(&mut issues, &field, waypoint.distance_nm);
    }
    if let Some(fuel_flow) = fuel_flow {
        require_non_negative(&mut issues, "fuel_flow", fuel_flow);
    }
    if let Some(total) = total_leg_distance_nm {
        require_non_negative(&mut issues, "total_leg_distance_nm", total);
    }
    if let Some(climb) = climb {
        require_non_negative(&mut issues, "climb.distance_nm", climb.distance_nm);
        require_non_negative(&mut issues, "climb.fuel_used", climb.fuel_used);
        require_non_negative(&mut issues, "climb.time_hours", climb.time_hours);
        if climb.distance_nm > 0.0
            && require_positive(&mut issues, "climb.ground_speed_kt", climb.ground_speed_kt)
        {
            let expected = climb.distance_nm / climb.ground_speed_kt;
            if (climb.time_hours - expected).abs() > CLIMB_TIME_TOLERANCE_HOURS {
                issues.push(ValidationIssue::error(
                    "climb.time_hours",
                    format!(
                        "climb time {} h does not match distance / ground speed ({expected} h)",
                        climb.time_hours
                    ),
                ));
            }
        }
    }
    require_non_negative(&mut issues, "elapsed_minutes", carry.elapsed_minutes());
    if let Some(previous) = carry.previous_fuel_used() {
        require_non_negative(&mut issues, "previous_fuel_used", previous);
    }
    finish(issues).map(|_| ())
}

/// Caller checkpoints plus synthetic top-of-climb and arrival entries,
/// sorted by distance. At equal distance the top-of-climb marker comes
/// first and the arrival last; ties between checkpoints go by name.
fn ordered_entries(
    waypoints: &[Waypoint],
    total_leg_distance_nm: Option<f64>,
    climb: Option<&ClimbPhase>,
    rules: &NavRules,
) -> Vec<(String, WaypointKind, f64)> {
    let mut entries: Vec<(String, WaypointKind, f64)> = waypoints
        .iter()
        .map(|wp| (wp.name.clone(), WaypointKind::Checkpoint, wp.distance_nm))
        .collect();

    let last_checkpoint = waypoints.iter().map(|wp| wp.distance_nm).reduce(f64::max);
    let leg_end = match (total_leg_distance_nm, last_checkpoint) {
        (Some(total), Some(last)) => total.max(last),
        (Some(total), None) => total,
        (None, Some(last)) => last,
        (None, None) => 0.0,
    };

    if let Some(climb) = climb {
        let occupied = waypoints
            .iter()
            .any(|wp| (wp.distance_nm - climb.distance_nm).abs() < SAME_POSITION_NM);
        if climb.distance_nm <= leg_end && !occupied {
            entries.push((
                rules.cruise_marker_name.clone(),
                WaypointKind::CruiseAltitudeReached,
                climb.distance_nm,
            ));
        }
    }

    if let Some(total) = total_leg_distance_nm {
        let beyond_checkpoints = last_checkpoint.map_or(true, |last| total > last);
        if beyond_checkpoints {
            entries.push((rules.arrival_name.clone(), WaypointKind::Arrival, total));
        }
    }

    entries.sort_by(|a, b| {
        a.2.partial_cmp(&b.2)
            .unwrap_or(Ordering::Equal)
            .then_with(|| a.1.cmp(&b.1))
            .then_with(|| a.0.cmp(&b.0))
    });
    entries
}
