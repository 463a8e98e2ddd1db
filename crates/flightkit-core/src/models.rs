//! Core data models shared by the calculators.

use geo::Point;
use serde::{Deserialize, Serialize};

/// A WGS-84 position in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub lat: f64,
    pub lon: f64,
}

impl Coordinate {
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }

    pub fn is_valid(&self) -> bool {
        self.lat.is_finite()
            && self.lon.is_finite()
            && (-90.0..=90.0).contains(&self.lat)
            && (-180.0..=180.0).contains(&self.lon)
    }

    pub(crate) fn to_point(self) -> Point<f64> {
        Point::new(self.lon, self.lat)
    }

    pub(crate) fn from_point(point: Point<f64>) -> Self {
        Self {
            lat: point.y(),
            lon: point.x(),
        }
    }
}

/// A named checkpoint along a leg.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Waypoint {
    pub name: String,
    /// Cumulative distance from the start of the leg (NM)
    pub distance_nm: f64,
}

impl Waypoint {
    pub fn new(name: impl Into<String>, distance_nm: f64) -> Self {
        Self {
            name: name.into(),
            distance_nm,
        }
    }
}

/// Climb prefix of a leg, flown at its own ground speed and fuel rate.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ClimbPhase {
    /// Distance covered until top of climb (NM)
    pub distance_nm: f64,
    /// Ground speed during the climb (kt)
    pub ground_speed_kt: f64,
    /// Climb duration (hours)
    pub time_hours: f64,
    /// Total fuel burnt during the climb
    pub fuel_used: f64,
}

impl ClimbPhase {
    /// Build a climb phase whose duration follows from distance and ground speed.
    pub fn new(distance_nm: f64, ground_speed_kt: f64, fuel_used: f64) -> Self {
        let time_hours = if ground_speed_kt > 0.0 {
            distance_nm / ground_speed_kt
        } else {
            0.0
        };
        Self {
            distance_nm,
            ground_speed_kt,
            time_hours,
            fuel_used,
        }
    }
}

/// How state from earlier legs is carried into a computation.
///
/// Time carry and fuel carry behave differently: with [`CarryMode::Time`]
/// the elapsed minutes shift cumulative time while fuel only counts the
/// current leg; with [`CarryMode::Fuel`] both time and fuel continue from
/// the earlier totals.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum CarryMode {
    /// Nothing carried; totals start at zero
    #[default]
    None,
    /// Cumulative time starts at `elapsed_minutes`; fuel is this leg only
    Time { elapsed_minutes: f64 },
    /// Cumulative time and fuel both continue from earlier legs
    Fuel {
        elapsed_minutes: f64,
        previous_fuel_used: f64,
    },
}

impl CarryMode {
    pub fn elapsed_minutes(&self) -> f64 {
        match *self {
            Self::None => 0.0,
            Self::Time { elapsed_minutes } | Self::Fuel { elapsed_minutes, .. } => elapsed_minutes,
        }
    }

    pub fn previous_fuel_used(&self) -> Option<f64> {
        match *self {
            Self::Fuel {
                previous_fuel_used, ..
            } => Some(previous_fuel_used),
            _ => None,
        }
    }
}

/// A multi-leg flight plan as stored by the caller.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FlightPlan {
    /// Departure clock time, HHMM
    #[serde(default)]
    pub departure_time: Option<String>,
    /// Usable fuel on board at departure
    #[serde(default)]
    pub fuel_on_board: Option<f64>,
    /// Fuel that must remain at the end of any route or diversion
    #[serde(default)]
    pub reserve_fuel: Option<f64>,
    pub legs: Vec<FlightPlanLeg>,
}

/// One leg of a flight plan.
///
/// `elapsed_min`, `prev_fuel` and `elapsed_dist` are the starting offsets of
/// the leg. They are outputs of the leg chain and are overwritten on every
/// recomputation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlightPlanLeg {
    pub from: String,
    pub to: String,
    pub true_course_deg: f64,
    pub distance_nm: f64,
    pub true_airspeed_kt: f64,
    #[serde(default)]
    pub wind_direction_deg: f64,
    #[serde(default)]
    pub wind_speed_kt: f64,
    #[serde(default)]
    pub magnetic_variation_deg: f64,
    #[serde(default)]
    pub fuel_flow: Option<f64>,
    #[serde(default)]
    pub climb: Option<ClimbPhase>,
    #[serde(default)]
    pub checkpoints: Vec<Waypoint>,
    /// Diversion branch, excluded from main-route totals
    #[serde(default)]
    pub alternate: bool,
    #[serde(default)]
    pub elapsed_min: f64,
    #[serde(default)]
    pub prev_fuel: f64,
    #[serde(default)]
    pub elapsed_dist: f64,
}

impl FlightPlanLeg {
    /// A calm-wind leg with no fuel data; fill the rest with struct update syntax.
    pub fn new(
        from: impl Into<String>,
        to: impl Into<String>,
        true_course_deg: f64,
        distance_nm: f64,
        true_airspeed_kt: f64,
    ) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
            true_course_deg,
            distance_nm,
            true_airspeed_kt,
            wind_direction_deg: 0.0,
            wind_speed_kt: 0.0,
            magnetic_variation_deg: 0.0,
            fuel_flow: None,
            climb: None,
            checkpoints: Vec::new(),
            alternate: false,
            elapsed_min: 0.0,
            prev_fuel: 0.0,
            elapsed_dist: 0.0,
        }
    }
}
