//! Plain-text summaries. Values are rounded here and nowhere else.

use flightkit_core::{
    AtmosphereReport, BranchTotals, LegChain, LegClass, RouteDistance, SegmentCalculationResult,
    StallSpeedResult, ValidationIssue, WaypointResult, WindTriangleResult,
};
use std::fmt::Write;

fn warnings(out: &mut String, issues: &[ValidationIssue]) {
    for issue in issues {
        let _ = writeln!(out, "warning: {issue}");
    }
}

fn fuel(value: Option<f64>) -> String {
    value.map_or_else(|| "-".to_string(), |f| format!("{f:.1}"))
}

pub fn wind(result: &WindTriangleResult) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Crosswind         {:>7.1} kt", result.crosswind_kt);
    let _ = writeln!(
        out,
        "{:<17} {:>7.1} kt",
        if result.is_headwind() { "Headwind" } else { "Tailwind" },
        result.along_track_wind_kt.abs()
    );
    let _ = writeln!(out, "WCA               {:>7.1}°", result.wind_correction_angle_deg);
    let _ = writeln!(out, "Ground speed      {:>7.1} kt", result.ground_speed_kt);
    let _ = writeln!(out, "Compass heading   {:>7.0}°", result.compass_heading_deg);
    if let Some(etas) = result.etas_kt {
        let _ = writeln!(out, "ETAS              {etas:>7.1} kt");
    }
    if let Some(hours) = result.eta_hours {
        let _ = writeln!(out, "Time enroute      {:>7.0} min", hours * 60.0);
    }
    if let Some(used) = result.fuel_used {
        let _ = writeln!(out, "Fuel used         {used:>7.1}");
    }
    warnings(&mut out, &result.warnings);
    out
}

pub fn distance(result: &RouteDistance) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "Great circle  {:>9.1} NM  initial {:>5.1}°  final {:>5.1}°",
        result.distance_nm, result.initial_bearing_deg, result.final_bearing_deg
    );
    let _ = writeln!(
        out,
        "Rhumb line    {:>9.1} NM  heading {:>5.1}°",
        result.rhumb_distance_nm, result.rhumb_bearing_deg
    );
    out
}

pub fn segments(result: &SegmentCalculationResult) -> String {
    if result.is_empty() {
        return "Endpoints coincide; nothing to segment\n".to_string();
    }
    let mut out = String::new();
    let _ = writeln!(out, "  #   start              end                hdg     dist    cum");
    for seg in &result.segments {
        let _ = writeln!(
            out,
            "{:>3}  {:>7.3},{:>8.3}  {:>7.3},{:>8.3}  {:>5.1}  {:>7.1}  {:>7.1}",
            seg.index,
            seg.start.lat,
            seg.start.lon,
            seg.end.lat,
            seg.end.lon,
            seg.heading_deg,
            seg.distance_nm,
            seg.cumulative_distance_nm
        );
    }
    let _ = writeln!(
        out,
        "Total {:.1} NM over {} segments (great circle {:.1} NM, rhumb {:.1} NM, +{:.1} NM)",
        result.total_distance_nm,
        result.segment_count,
        result.orthodromic_distance_nm,
        result.pure_rhumb_distance_nm,
        result.segmentation_penalty_nm()
    );
    out
}

pub fn waypoints(results: &[WaypointResult]) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{:<24} {:>7} {:>6} {:>5} {:>5} {:>7}",
        "name", "NM", "leg", "min", "ETA", "fuel"
    );
    for wp in results {
        let _ = writeln!(
            out,
            "{:<24} {:>7.1} {:>6.1} {:>5.0} {:>5} {:>7}",
            wp.name,
            wp.distance_nm,
            wp.distance_since_last_nm,
            wp.cumulative_time_min,
            wp.eta.as_deref().unwrap_or("-"),
            fuel(wp.fuel_used)
        );
    }
    out
}

fn branch_line(out: &mut String, chain: &LegChain, branch: &BranchTotals) {
    let origin = match branch.branch_from {
        Some(idx) => format!("after leg {} ({})", idx + 1, chain.legs[idx].to),
        None => "from departure".to_string(),
    };
    let verdict = match branch.feasible {
        Some(true) => "reachable",
        Some(false) => "NOT reachable",
        None => "fuel unknown",
    };
    let _ = writeln!(
        out,
        "Alternate {origin}: {:.1} NM, {:.0} min, fuel used {:.1}, remaining {} ({verdict})",
        branch.distance_nm(),
        branch.time_min(),
        branch.fuel_used(),
        fuel(branch.fuel_remaining)
    );
}

pub fn plan(chain: &LegChain) -> String {
    let mut out = String::new();
    for comp in &chain.computations {
        let leg = &chain.legs[comp.index];
        let tag = match comp.class {
            LegClass::Main => "main",
            LegClass::Alternate { .. } => "alt ",
        };
        let _ = writeln!(
            out,
            "{:>2} {tag} {} -> {}  GS {:.0} kt  HDG {:.0}°  {:.1} NM  {:.0} min  fuel {}",
            comp.index + 1,
            leg.from,
            leg.to,
            comp.wind.ground_speed_kt,
            comp.wind.compass_heading_deg,
            comp.end.distance_nm - comp.start.distance_nm,
            comp.end.elapsed_min - comp.start.elapsed_min,
            fuel(Some(comp.end.fuel_used - comp.start.fuel_used))
        );
        for wp in &comp.waypoints {
            let _ = writeln!(
                out,
                "     {:<24} {:>6.1} NM {:>4.0} min {:>5}",
                wp.name,
                wp.distance_nm,
                wp.cumulative_time_min,
                wp.eta.as_deref().unwrap_or("")
            );
        }
        warnings(&mut out, &comp.wind.warnings);
    }
    let _ = writeln!(
        out,
        "Main route: {:.1} NM, {:.0} min, fuel used {:.1}, remaining {}",
        chain.main_totals.distance_nm,
        chain.main_totals.elapsed_min,
        chain.main_totals.fuel_used,
        fuel(chain.main_fuel_remaining)
    );
    for branch in &chain.branches {
        branch_line(&mut out, chain, branch);
    }
    out
}

pub fn atmosphere(report: &AtmosphereReport) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Pressure altitude {:>8.0} ft", report.pressure_altitude_ft);
    let _ = writeln!(out, "Pressure          {:>8.1} hPa", report.pressure_hpa);
    let _ = writeln!(
        out,
        "Temperature       {:>8.1} °C (ISA {:.1}, dev {:+.1})",
        report.oat_c, report.isa_temperature_c, report.isa_deviation_c
    );
    let _ = writeln!(out, "Density ratio     {:>8.3}", report.density_ratio);
    let _ = writeln!(out, "Density altitude  {:>8.0} ft", report.density_altitude_ft);
    if let Some(tas) = report.tas_kt {
        let _ = writeln!(out, "TAS               {tas:>8.0} kt");
    }
    warnings(&mut out, &report.warnings);
    out
}

pub fn stall(result: &StallSpeedResult) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Stall speed  {:>6.1} kt", result.stall_speed_kt);
    let _ = writeln!(out, "Load factor  {:>6.2} g", result.load_factor);
    let _ = writeln!(out, "Weight ratio {:>6.3}", result.weight_ratio);
    warnings(&mut out, &result.warnings);
    out
}
