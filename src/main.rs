mod cli;
mod config;
mod engine;
mod error;
mod host;
mod logging;
mod simfile;
mod validate;

use crate::cli::Cli;
use crate::engine::{DryRun, Engine};
use crate::error::StartupError;
use crate::host::Host;
use crate::logging::LogTopology;
use anyhow::{Context, Result};
use clap::Parser;

fn main() {
    let args = match Cli::try_parse() {
        Ok(args) => args,
        Err(error) => {
            // Help and version requests are printed to stdout and succeed.
            let code = if error.use_stderr() { 1 } else { 0 };
            if error.print().is_err() {
                eprintln!("{error}");
            }
            std::process::exit(code);
        }
    };

    if let Err(error) = run_cli(args) {
        let code = error
            .downcast_ref::<StartupError>()
            .map_or(1, StartupError::exit_code);
        eprintln!("error: {error:#}");
        std::process::exit(code);
    }
}

fn run_cli(args: Cli) -> Result<()> {
    let host = Host::detect();

    let validated = validate::validate(args, &host)?;
    let opts = &validated.options;

    let topology = LogTopology::resolve(opts)?;
    let (cfg, sim_cfgs) = config::build(opts, validated.sim_files);

    let log_handle = topology.install().context("failed to initialize logging")?;
    for file in log_handle.files() {
        log::info!("logging to {file:?}");
    }

    let mut engine = DryRun::default();
    engine
        .go(cfg, sim_cfgs)
        .context("failed to hand over to engine")?;
    log::info!("handed over {} simulation(s)", engine.loaded().len());

    log_handle.shutdown();

    Ok(())
}
