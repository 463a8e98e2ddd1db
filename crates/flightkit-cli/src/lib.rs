//! flightkit CLI - command line front end for the flightkit calculators.
//!
//! The `flightkit` binary parses arguments, reads JSON inputs and prints
//! results; all computation happens in `flightkit-core`.

pub mod commands;
pub mod config;
pub mod render;

pub use commands::{run, Cli, Command, Output};
pub use config::Config;
