//! Cumulative time/fuel/distance across the legs of a flight plan.
//!
//! Main-route legs chain into each other: each leg starts where the previous
//! main leg ended. Alternate legs (diversions) start from the end of the
//! main leg they branch off and never feed back into the main-route totals.
//! Every call recomputes the whole chain from the plan; offsets stored on the
//! input legs are ignored and rewritten.

use crate::error::NavError;
use crate::models::{CarryMode, FlightPlan, FlightPlanLeg};
use crate::rules::NavRules;
use crate::waypoints::{
    propagate_waypoints_with_rules, LegProfile, PropagationParams, WaypointResult,
};
use crate::wind::{solve_wind_triangle_with_rules, WindTriangleInput, WindTriangleResult};
use serde::{Deserialize, Serialize};

/// Running totals at a point of the plan.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ChainState {
    pub elapsed_min: f64,
    pub fuel_used: f64,
    pub distance_nm: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "class", rename_all = "snake_case")]
pub enum LegClass {
    Main,
    /// Diversion departing from the end of main leg `branch_from`
    /// (`None` = from the departure point)
    Alternate { branch_from: Option<usize> },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LegComputation {
    pub index: usize,
    pub class: LegClass,
    pub start: ChainState,
    pub end: ChainState,
    /// Cruise solution for the leg. Its `eta_hours` and `fuel_used` ignore
    /// any climb phase; `end - start` is the leg's own time and fuel.
    pub wind: WindTriangleResult,
    pub waypoints: Vec<WaypointResult>,
}

/// Totals of one diversion branch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BranchTotals {
    pub branch_from: Option<usize>,
    /// Indices of the legs forming the branch, in order
    pub legs: Vec<usize>,
    /// Main-route state where the branch departs
    pub origin: ChainState,
    /// Cumulative state at the end of the diversion
    pub arrival: ChainState,
    /// Fuel left at the end of the diversion, when fuel on board is known
    pub fuel_remaining: Option<f64>,
    /// Whether the diversion ends with at least the reserve fuel
    pub feasible: Option<bool>,
}

impl BranchTotals {
    fn starting_at(branch_from: Option<usize>, origin: ChainState) -> Self {
        Self {
            branch_from,
            legs: Vec::new(),
            origin,
            arrival: origin,
            fuel_remaining: None,
            feasible: None,
        }
    }

    pub fn distance_nm(&self) -> f64 {
        self.arrival.distance_nm - self.origin.distance_nm
    }

    pub fn time_min(&self) -> f64 {
        self.arrival.elapsed_min - self.origin.elapsed_min
    }

    pub fn fuel_used(&self) -> f64 {
        self.arrival.fuel_used - self.origin.fuel_used
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LegChain {
    /// The input legs with rewritten starting offsets
    pub legs: Vec<FlightPlanLeg>,
    pub computations: Vec<LegComputation>,
    /// Totals at the end of the main route
    pub main_totals: ChainState,
    pub main_fuel_remaining: Option<f64>,
    pub branches: Vec<BranchTotals>,
}

/// Classify every leg as main route or alternate.
///
/// An alternate leg that starts where the previous alternate leg ended
/// continues that diversion. Otherwise the diversion departs from the end of
/// the latest earlier main leg arriving at its starting point; failing that,
/// from the start of a main leg departing from that point; failing that,
/// from the end of the latest main leg before it.
pub fn classify_legs(legs: &[FlightPlanLeg]) -> Vec<LegClass> {
    classify(legs).into_iter().map(|(class, _)| class).collect()
}

/// Classes plus whether each alternate continues the preceding branch.
fn classify(legs: &[FlightPlanLeg]) -> Vec<(LegClass, bool)> {
    let mut classes: Vec<(LegClass, bool)> = Vec::with_capacity(legs.len());

    for (idx, leg) in legs.iter().enumerate() {
        if !leg.alternate {
            classes.push((LegClass::Main, false));
            continue;
        }

        let continued = idx.checked_sub(1).and_then(|prev| match classes[prev].0 {
            LegClass::Alternate { branch_from } if same_point(&legs[prev].to, &leg.from) => {
                Some(branch_from)
            }
            _ => None,
        });

        let class = match continued {
            Some(branch_from) => (LegClass::Alternate { branch_from }, true),
            None => (
                LegClass::Alternate {
                    branch_from: departure_of(legs, &classes, idx),
                },
                false,
            ),
        };
        classes.push(class);
    }

    classes
}

fn departure_of(legs: &[FlightPlanLeg], classes: &[(LegClass, bool)], idx: usize) -> Option<usize> {
    let mains: Vec<usize> = (0..idx)
        .rev()
        .filter(|&j| classes[j].0 == LegClass::Main)
        .collect();
    let origin = &legs[idx].from;

    if let Some(&j) = mains.iter().find(|&&j| same_point(&legs[j].to, origin)) {
        return Some(j);
    }
    if let Some(pos) = mains.iter().position(|&j| same_point(&legs[j].from, origin)) {
        // Departs where main leg mains[pos] starts, i.e. after the main leg before it.
        return mains.get(pos + 1).copied();
    }
    mains.first().copied()
}

fn same_point(a: &str, b: &str) -> bool {
    a.trim().eq_ignore_ascii_case(b.trim())
}

/// Recompute the leg chain with default thresholds.
pub fn recompute_leg_chain(plan: &FlightPlan) -> Result<LegChain, NavError> {
    recompute_leg_chain_with_rules(plan, &NavRules::default())
}

/// Recompute every leg's starting offsets, per-leg results, the main-route
/// totals and the per-diversion totals.
pub fn recompute_leg_chain_with_rules(
    plan: &FlightPlan,
    rules: &NavRules,
) -> Result<LegChain, NavError> {
    let classes = classify(&plan.legs);
    let departure = plan.departure_time.as_deref();

    let mut main_state = ChainState::default();
    let mut main_end_states: Vec<Option<ChainState>> = vec![None; plan.legs.len()];
    let mut branches: Vec<BranchTotals> = Vec::new();
    let mut legs = Vec::with_capacity(plan.legs.len());
    let mut computations = Vec::with_capacity(plan.legs.len());

    for (idx, (leg, &(class, continues))) in plan.legs.iter().zip(&classes).enumerate() {
        let start = match class {
            LegClass::Main => main_state,
            LegClass::Alternate { branch_from } => {
                let continuing = branches.last().filter(|_| continues).map(|b| b.arrival);
                match continuing {
                    Some(arrival) => arrival,
                    None => {
                        let origin = branch_from
                            .and_then(|j| main_end_states[j])
                            .unwrap_or_default();
                        branches.push(BranchTotals::starting_at(branch_from, origin));
                        origin
                    }
                }
            }
        };

        let computation =
            compute_leg(idx, leg, class, start, departure, rules).map_err(|source| NavError::Leg {
                index: idx,
                from: leg.from.clone(),
                to: leg.to.clone(),
                source: Box::new(source),
            })?;

        match class {
            LegClass::Main => {
                main_state = computation.end;
                main_end_states[idx] = Some(computation.end);
            }
            LegClass::Alternate { .. } => {
                if let Some(branch) = branches.last_mut() {
                    branch.legs.push(idx);
                    branch.arrival = computation.end;
                }
            }
        }

        let mut updated = leg.clone();
        updated.elapsed_min = start.elapsed_min;
        updated.prev_fuel = start.fuel_used;
        updated.elapsed_dist = start.distance_nm;
        legs.push(updated);
        computations.push(computation);
    }

    let reserve = plan.reserve_fuel.unwrap_or(0.0);
    for branch in &mut branches {
        branch.fuel_remaining = plan.fuel_on_board.map(|fob| fob - branch.arrival.fuel_used);
        branch.feasible = branch.fuel_remaining.map(|remaining| remaining >= reserve);
    }
    let main_fuel_remaining = plan.fuel_on_board.map(|fob| fob - main_state.fuel_used);

    tracing::debug!(
        legs = plan.legs.len(),
        alternates = classes.iter().filter(|(c, _)| *c != LegClass::Main).count(),
        branches = branches.len(),
        total_min = main_state.elapsed_min,
        "recomputed leg chain"
    );

    Ok(LegChain {
        legs,
        computations,
        main_totals: main_state,
        main_fuel_remaining,
        branches,
    })
}

fn compute_leg(
    index: usize,
    leg: &FlightPlanLeg,
    class: LegClass,
    start: ChainState,
    departure: Option<&str>,
    rules: &NavRules,
) -> Result<LegComputation, NavError> {
    let carry = CarryMode::Fuel {
        elapsed_minutes: start.elapsed_min,
        previous_fuel_used: start.fuel_used,
    };

    let wind = solve_wind_triangle_with_rules(
        &WindTriangleInput {
            wind_direction_deg: leg.wind_direction_deg,
            wind_speed_kt: leg.wind_speed_kt,
            true_heading_deg: leg.true_course_deg,
            true_airspeed_kt: leg.true_airspeed_kt,
            magnetic_variation_deg: leg.magnetic_variation_deg,
            distance_nm: Some(leg.distance_nm),
            fuel_flow: leg.fuel_flow,
            carry,
        },
        rules,
    )?;

    let params = PropagationParams {
        departure_time: departure.map(str::to_string),
        carry,
    };
    let waypoints = propagate_waypoints_with_rules(
        &leg.checkpoints,
        wind.ground_speed_kt,
        leg.fuel_flow,
        &params,
        Some(leg.distance_nm),
        leg.climb.as_ref(),
        rules,
    )?;

    let profile = LegProfile::new(wind.ground_speed_kt, leg.fuel_flow, leg.climb);
    let end = ChainState {
        elapsed_min: start.elapsed_min + profile.minutes_at(leg.distance_nm),
        fuel_used: start.fuel_used + profile.fuel_at(leg.distance_nm).unwrap_or(0.0),
        distance_nm: start.distance_nm + leg.distance_nm,
    };

    Ok(LegComputation {
        index,
        class,
        start,
        end,
        wind,
        waypoints,
    })
}
