//! Navigation and fuel/time computation engine for VFR flight planning.
//!
//! Everything in this crate is a pure function of its arguments: no I/O,
//! no shared state. Callers own any state carried between legs and pass it
//! back in explicitly.

pub mod atmosphere;
pub mod clock;
pub mod error;
pub mod geodesy;
pub mod leg_chain;
pub mod models;
pub mod performance;
pub mod rules;
pub mod segmentation;
pub mod validation;
pub mod waypoints;
pub mod wind;

pub use atmosphere::{
    compute_atmosphere, compute_atmosphere_with_rules, AtmosphereInput, AtmosphereReport,
};
pub use error::NavError;
pub use geodesy::{route_distance, RouteDistance};
pub use leg_chain::{
    classify_legs, recompute_leg_chain, recompute_leg_chain_with_rules, BranchTotals, ChainState,
    LegChain, LegClass, LegComputation,
};
pub use models::{CarryMode, ClimbPhase, Coordinate, FlightPlan, FlightPlanLeg, Waypoint};
pub use performance::{stall_speed, stall_speed_with_rules, StallSpeedInput, StallSpeedResult};
pub use rules::NavRules;
pub use segmentation::{
    segment_geodesic, segment_geodesic_with_rules, NavigationSegment, SegmentCalculationResult,
};
pub use validation::{Severity, ValidationIssue};
pub use waypoints::{
    propagate_waypoints, propagate_waypoints_with_rules, LegProfile, PropagationParams,
    WaypointKind, WaypointResult,
};
pub use wind::{
    solve_wind_triangle, solve_wind_triangle_with_rules, WindTriangleInput, WindTriangleResult,
};
