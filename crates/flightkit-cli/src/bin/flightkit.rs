//! flightkit - VFR navigation calculators on the command line.
//!
//! Usage:
//!   flightkit wind --wind-dir 270 --wind-speed 20 --heading 360 --tas 100
//!   flightkit segment --from-lat 40.71 --from-lon -74.01 --to-lat 35.68 --to-lon 139.76 -n 20
//!   flightkit --json plan plan.json
//!
//! Logs go to stderr; set FLIGHTKIT_LOG (e.g. `flightkit_core=debug`) or RUST_LOG.

use anyhow::Result;
use clap::Parser;
use flightkit_cli::{commands, Cli, Config};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

fn main() -> Result<()> {
    let config = Config::from_env();

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::from_default_env().add_directive(config.log_directive.parse()?))
        .init();

    let cli = Cli::parse();
    let rules = config.load_rules()?;
    tracing::debug!(command = ?cli.command, "running");

    let output = commands::run(&cli.command, &config, &rules)?;
    if cli.json {
        println!("{}", serde_json::to_string_pretty(&output.json)?);
    } else {
        print!("{}", output.text);
    }
    Ok(())
}
