//! Order independence and carry behaviour of the waypoint propagator.

use flightkit_core::{
    propagate_waypoints, solve_wind_triangle, CarryMode, ClimbPhase, PropagationParams, Waypoint,
    WaypointKind, WindTriangleInput,
};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

fn checkpoints() -> Vec<Waypoint> {
    vec![
        Waypoint::new("Lake", 4.0),
        Waypoint::new("Mast", 12.5),
        Waypoint::new("Bridge", 12.5),
        Waypoint::new("Town", 27.0),
        Waypoint::new("Dam", 41.0),
        Waypoint::new("Field", 58.0),
    ]
}

fn params() -> PropagationParams {
    PropagationParams {
        departure_time: Some("0945".to_string()),
        carry: CarryMode::Fuel {
            elapsed_minutes: 12.0,
            previous_fuel_used: 3.0,
        },
    }
}

#[test]
fn shuffled_input_gives_identical_output() {
    let climb = ClimbPhase::new(10.0, 80.0, 2.0);
    let reference =
        propagate_waypoints(&checkpoints(), 110.0, Some(9.5), &params(), Some(64.0), Some(&climb))
            .unwrap();

    let mut rng = StdRng::seed_from_u64(0x5eed);
    for _ in 0..20 {
        let mut shuffled = checkpoints();
        shuffled.shuffle(&mut rng);
        let result =
            propagate_waypoints(&shuffled, 110.0, Some(9.5), &params(), Some(64.0), Some(&climb))
                .unwrap();
        assert_eq!(result, reference);
    }

    let again =
        propagate_waypoints(&checkpoints(), 110.0, Some(9.5), &params(), Some(64.0), Some(&climb))
            .unwrap();
    assert_eq!(again, reference);
}

#[test]
fn cumulative_values_never_decrease() {
    let climb = ClimbPhase::new(10.0, 80.0, 2.0);
    let results =
        propagate_waypoints(&checkpoints(), 110.0, Some(9.5), &params(), Some(64.0), Some(&climb))
            .unwrap();

    assert_eq!(results.first().unwrap().name, "Lake");
    assert_eq!(results.last().unwrap().kind, WaypointKind::Arrival);
    assert_eq!(
        results.iter().filter(|r| r.kind == WaypointKind::CruiseAltitudeReached).count(),
        1
    );
    for pair in results.windows(2) {
        assert!(pair[1].distance_nm >= pair[0].distance_nm);
        assert!(pair[1].cumulative_time_min >= pair[0].cumulative_time_min);
        assert!(pair[1].fuel_used.unwrap() >= pair[0].fuel_used.unwrap());
        assert!(pair[1].time_since_last_min >= 0.0);
    }
    // equal-distance checkpoints are ordered by name
    assert_eq!(results[2].name, "Bridge");
    assert_eq!(results[3].name, "Mast");
}

#[test]
fn ground_speed_from_wind_triangle_feeds_propagation() {
    let wind = solve_wind_triangle(&WindTriangleInput {
        wind_direction_deg: 360.0,
        wind_speed_kt: 20.0,
        true_heading_deg: 0.0,
        true_airspeed_kt: 110.0,
        magnetic_variation_deg: -3.0,
        distance_nm: Some(45.0),
        fuel_flow: Some(9.0),
        carry: CarryMode::None,
    })
    .unwrap();
    assert!((wind.ground_speed_kt - 90.0).abs() < 1e-9);

    let results = propagate_waypoints(
        &[],
        wind.ground_speed_kt,
        Some(9.0),
        &PropagationParams::default(),
        Some(45.0),
        None,
    )
    .unwrap();
    assert_eq!(results.len(), 1);
    assert!((results[0].cumulative_time_min / 60.0 - wind.eta_hours.unwrap()).abs() < 1e-12);
    assert!((results[0].fuel_used.unwrap() - wind.fuel_used.unwrap()).abs() < 1e-12);
}
