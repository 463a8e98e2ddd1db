//! Argument definitions and command dispatch.

use crate::config::Config;
use crate::render;
use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use flightkit_core::{
    compute_atmosphere_with_rules, propagate_waypoints_with_rules, recompute_leg_chain_with_rules,
    route_distance, segment_geodesic_with_rules, solve_wind_triangle_with_rules,
    stall_speed_with_rules, AtmosphereInput, CarryMode, ClimbPhase, Coordinate, FlightPlan,
    NavRules, PropagationParams, StallSpeedInput, Waypoint, WindTriangleInput,
};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// VFR navigation and fuel planning calculators
#[derive(Parser, Debug)]
#[command(author, version, about = "VFR navigation and fuel planning calculators")]
pub struct Cli {
    /// Print results as JSON instead of a text summary
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Solve the wind triangle for one leg
    Wind(WindArgs),
    /// Great-circle and rhumb-line distance between two points
    Distance(RouteArgs),
    /// Split a great-circle route into constant-heading segments
    Segment(SegmentArgs),
    /// Time, fuel and ETA at each checkpoint of a leg (JSON request file)
    Waypoints {
        /// Path to a waypoint request JSON file
        file: PathBuf,
    },
    /// Recompute every leg of a flight plan (JSON plan file)
    Plan {
        /// Path to a flight plan JSON file
        file: PathBuf,
    },
    /// ISA atmosphere, density altitude and true airspeed
    Isa(IsaArgs),
    /// Stall speed for weight and bank angle
    Stall(StallArgs),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum CarryArg {
    None,
    Time,
    Fuel,
}

#[derive(Args, Debug)]
pub struct WindArgs {
    /// Direction the wind blows from (degrees true)
    #[arg(long)]
    pub wind_dir: f64,
    /// Wind speed (kt)
    #[arg(long)]
    pub wind_speed: f64,
    /// True heading or course (degrees)
    #[arg(long)]
    pub heading: f64,
    /// True airspeed (kt)
    #[arg(long)]
    pub tas: f64,
    /// Magnetic variation, east positive (degrees)
    #[arg(long, default_value_t = 0.0, allow_negative_numbers = true)]
    pub variation: f64,
    /// Leg distance (NM)
    #[arg(long)]
    pub distance: Option<f64>,
    /// Fuel flow (units per hour)
    #[arg(long)]
    pub fuel_flow: Option<f64>,
    /// What to carry over from earlier legs
    #[arg(long, value_enum, default_value_t = CarryArg::None)]
    pub carry: CarryArg,
    /// Minutes already flown before this leg
    #[arg(long, default_value_t = 0.0)]
    pub elapsed_min: f64,
    /// Fuel already used before this leg
    #[arg(long, default_value_t = 0.0)]
    pub prev_fuel: f64,
}

impl WindArgs {
    fn carry_mode(&self) -> CarryMode {
        match self.carry {
            CarryArg::None => CarryMode::None,
            CarryArg::Time => CarryMode::Time {
                elapsed_minutes: self.elapsed_min,
            },
            CarryArg::Fuel => CarryMode::Fuel {
                elapsed_minutes: self.elapsed_min,
                previous_fuel_used: self.prev_fuel,
            },
        }
    }

    fn to_input(&self) -> WindTriangleInput {
        WindTriangleInput {
            wind_direction_deg: self.wind_dir,
            wind_speed_kt: self.wind_speed,
            true_heading_deg: self.heading,
            true_airspeed_kt: self.tas,
            magnetic_variation_deg: self.variation,
            distance_nm: self.distance,
            fuel_flow: self.fuel_flow,
            carry: self.carry_mode(),
        }
    }
}

#[derive(Args, Debug)]
pub struct RouteArgs {
    #[arg(long, allow_negative_numbers = true)]
    pub from_lat: f64,
    #[arg(long, allow_negative_numbers = true)]
    pub from_lon: f64,
    #[arg(long, allow_negative_numbers = true)]
    pub to_lat: f64,
    #[arg(long, allow_negative_numbers = true)]
    pub to_lon: f64,
}

impl RouteArgs {
    fn endpoints(&self) -> (Coordinate, Coordinate) {
        (
            Coordinate::new(self.from_lat, self.from_lon),
            Coordinate::new(self.to_lat, self.to_lon),
        )
    }
}

#[derive(Args, Debug)]
pub struct SegmentArgs {
    #[command(flatten)]
    pub route: RouteArgs,
    /// Number of segments; FLIGHTKIT_SEGMENTS or 10 when omitted
    #[arg(long, short = 'n')]
    pub segments: Option<usize>,
}

#[derive(Args, Debug)]
pub struct IsaArgs {
    /// Indicated altitude (ft)
    #[arg(long, allow_negative_numbers = true)]
    pub altitude: f64,
    /// Altimeter setting (hPa)
    #[arg(long, default_value_t = 1013.25)]
    pub qnh: f64,
    /// Outside air temperature (°C); ISA when omitted
    #[arg(long, allow_negative_numbers = true)]
    pub oat: Option<f64>,
    /// Calibrated airspeed (kt)
    #[arg(long)]
    pub cas: Option<f64>,
    /// Service ceiling (ft)
    #[arg(long)]
    pub ceiling: Option<f64>,
}

#[derive(Args, Debug)]
pub struct StallArgs {
    /// Wings-level stall speed at maximum weight (kt)
    #[arg(long)]
    pub vs: f64,
    #[arg(long)]
    pub max_weight: f64,
    #[arg(long)]
    pub weight: Option<f64>,
    #[arg(long)]
    pub min_weight: Option<f64>,
    /// Bank angle (degrees)
    #[arg(long, default_value_t = 0.0)]
    pub bank: f64,
}

/// Input of the `waypoints` command.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WaypointsRequest {
    pub waypoints: Vec<Waypoint>,
    pub ground_speed_kt: f64,
    #[serde(default)]
    pub fuel_flow: Option<f64>,
    #[serde(default)]
    pub params: PropagationParams,
    #[serde(default)]
    pub total_distance_nm: Option<f64>,
    #[serde(default)]
    pub climb: Option<ClimbPhase>,
}

/// A command result, ready to print either way.
#[derive(Debug, Clone)]
pub struct Output {
    pub json: serde_json::Value,
    pub text: String,
}

impl Output {
    fn new<T: Serialize>(value: &T, text: String) -> Result<Self> {
        Ok(Self {
            json: serde_json::to_value(value)?,
            text,
        })
    }
}

pub fn run(command: &Command, config: &Config, rules: &NavRules) -> Result<Output> {
    match command {
        Command::Wind(args) => {
            let result = solve_wind_triangle_with_rules(&args.to_input(), rules)?;
            Output::new(&result, render::wind(&result))
        }
        Command::Distance(args) => {
            let (from, to) = args.endpoints();
            let result = route_distance(from, to)?;
            Output::new(&result, render::distance(&result))
        }
        Command::Segment(args) => {
            let (from, to) = args.route.endpoints();
            let count = args.segments.unwrap_or(config.default_segments);
            let result = segment_geodesic_with_rules(from, to, count, rules)?;
            Output::new(&result, render::segments(&result))
        }
        Command::Waypoints { file } => {
            let request: WaypointsRequest = read_json(file)?;
            let results = run_waypoints(&request, rules)?;
            Output::new(&results, render::waypoints(&results))
        }
        Command::Plan { file } => {
            let plan: FlightPlan = read_json(file)?;
            let chain = recompute_leg_chain_with_rules(&plan, rules)?;
            Output::new(&chain, render::plan(&chain))
        }
        Command::Isa(args) => {
            let input = AtmosphereInput {
                altitude_ft: args.altitude,
                qnh_hpa: args.qnh,
                oat_c: args.oat,
                cas_kt: args.cas,
                service_ceiling_ft: args.ceiling,
            };
            let report = compute_atmosphere_with_rules(&input, rules)?;
            Output::new(&report, render::atmosphere(&report))
        }
        Command::Stall(args) => {
            let input = StallSpeedInput {
                vs_kt: args.vs,
                max_weight: args.max_weight,
                weight: args.weight,
                min_weight: args.min_weight,
                bank_deg: args.bank,
            };
            let result = stall_speed_with_rules(&input, rules)?;
            Output::new(&result, render::stall(&result))
        }
    }
}

pub fn run_waypoints(
    request: &WaypointsRequest,
    rules: &NavRules,
) -> Result<Vec<flightkit_core::WaypointResult>> {
    let results = propagate_waypoints_with_rules(
        &request.waypoints,
        request.ground_speed_kt,
        request.fuel_flow,
        &request.params,
        request.total_distance_nm,
        request.climb.as_ref(),
        rules,
    )?;
    Ok(results)
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("reading {}", path.display()))?;
    tracing::debug!(path = %path.display(), bytes = text.len(), "read input file");
    serde_json::from_str(&text).with_context(|| format!("parsing {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use flightkit_core::NavError;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("flightkit").chain(args.iter().copied())).unwrap()
    }

    fn config() -> Config {
        Config::from_lookup(|_| None)
    }

    #[test]
    fn parses_negative_coordinates() {
        let cli = parse(&[
            "segment", "--from-lat", "40.71", "--from-lon", "-74.0", "--to-lat", "35.68",
            "--to-lon", "139.76", "-n", "20",
        ]);
        match cli.command {
            Command::Segment(args) => {
                assert_eq!(args.route.from_lon, -74.0);
                assert_eq!(args.segments, Some(20));
            }
            other => panic!("unexpected command {other:?}"),
        }
        assert!(!cli.json);
    }

    #[test]
    fn wind_command_carries_fuel() {
        let cli = parse(&[
            "--json", "wind", "--wind-dir", "270", "--wind-speed", "20", "--heading", "360",
            "--tas", "100", "--distance", "60", "--fuel-flow", "30", "--carry", "fuel",
            "--elapsed-min", "30", "--prev-fuel", "12",
        ]);
        assert!(cli.json);
        let output = run(&cli.command, &config(), &NavRules::default()).unwrap();
        let fuel = output.json["fuel_used"].as_f64().unwrap();
        let gs = output.json["ground_speed_kt"].as_f64().unwrap();
        assert!((fuel - (12.0 + 30.0 * 60.0 / gs)).abs() < 1e-9);
        assert!(output.text.contains("Ground speed"));
    }

    #[test]
    fn segment_uses_configured_default_count() {
        let cli = parse(&[
            "segment", "--from-lat", "50", "--from-lon", "0", "--to-lat", "50", "--to-lon", "30",
        ]);
        let config = Config::from_lookup(|key| (key == "FLIGHTKIT_SEGMENTS").then(|| "4".into()));
        let output = run(&cli.command, &config, &NavRules::default()).unwrap();
        assert_eq!(output.json["segment_count"], 4);
        assert_eq!(output.json["segments"].as_array().unwrap().len(), 4);
    }

    #[test]
    fn impossible_wind_is_an_error() {
        let cli = parse(&[
            "wind", "--wind-dir", "90", "--wind-speed", "150", "--heading", "0", "--tas", "100",
        ]);
        let err = run(&cli.command, &config(), &NavRules::default()).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<NavError>(),
            Some(NavError::NoSolution { .. })
        ));
    }

    #[test]
    fn waypoint_request_from_json() {
        let request: WaypointsRequest = serde_json::from_str(
            r#"{
                "waypoints": [{"name": "B", "distance_nm": 40}, {"name": "A", "distance_nm": 20}],
                "ground_speed_kt": 120,
                "fuel_flow": 30,
                "params": {"departure_time": "0930", "carry": {"mode": "time", "elapsed_minutes": 15}},
                "total_distance_nm": 60
            }"#,
        )
        .unwrap();
        let results = run_waypoints(&request, &NavRules::default()).unwrap();
        let names: Vec<_> = results.iter().map(|w| w.name.as_str()).collect();
        assert_eq!(names, ["A", "B", "Arrival"]);
        assert_eq!(results[2].eta.as_deref(), Some("1015"));
        assert!((results[2].cumulative_time_min - 45.0).abs() < 1e-9);
    }

    #[test]
    fn missing_plan_file_has_context() {
        let cli = parse(&["plan", "/nonexistent/plan.json"]);
        let err = run(&cli.command, &config(), &NavRules::default()).unwrap_err();
        assert!(format!("{err:#}").contains("reading /nonexistent/plan.json"));
    }
}
