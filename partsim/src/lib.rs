//! Command-line front end for `partcore`: turns flags into a
//! [`SimConfig`](partcore::SimConfig), runs the simulation and prints it.

pub mod cli;
pub mod render;

use std::io::Write;

use anyhow::{Context, Result};
use log::info;
use partcore::Simulation;

pub use crate::cli::{Args, Fit, Parser, Plan};

/// Runs one simulation as described by `args` and writes the tables to `out`.
pub fn simulate<W: Write>(args: &Args, out: &mut W) -> Result<()> {
    let config = args.to_config();
    info!("configuration: {:?}", config);
    let outcome = Simulation::run(&config).context("simulation aborted")?;
    render::outcome(out, &outcome).context("could not write the report")?;

    Ok(())
}
