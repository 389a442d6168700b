//! Handoff to the simulation engine.

use crate::config::{Config, SimConfig};
use crate::logging::FLOW;
use anyhow::Result;
use std::path::PathBuf;

/// Entry point of a simulation engine.
///
/// Called once, after logging is live. The launcher makes no further calls.
pub trait Engine {
    /// Take over with the process configuration and the simulations to load,
    /// in command-line order.
    fn go(&mut self, cfg: Config, sim_cfgs: Vec<SimConfig>) -> Result<()>;
}

/// Engine that reports what it was handed and returns.
#[derive(Debug, Default)]
pub struct DryRun {
    loaded: Vec<PathBuf>,
}

impl DryRun {
    /// Simulation files received, in order.
    pub fn loaded(&self) -> &[PathBuf] {
        &self.loaded
    }
}

impl Engine for DryRun {
    fn go(&mut self, cfg: Config, sim_cfgs: Vec<SimConfig>) -> Result<()> {
        log::info!(
            "gui={} random-seed={:?} logdir={:?}",
            cfg.use_gui(),
            cfg.random_seed(),
            cfg.log_dir()
        );
        log::info!(
            "cooja={:?} javac={:?} contiki={:?} config={:?}",
            cfg.install_path(),
            cfg.compiler_path(),
            cfg.contiki_path(),
            cfg.external_user_config()
        );

        if sim_cfgs.is_empty() {
            log::info!("no simulation files given");
        }

        for (i_sim, sim_cfg) in sim_cfgs.into_iter().enumerate() {
            log::trace!(target: FLOW, "handing over {:?}", sim_cfg.file());
            log::info!(
                "simulation {i_sim}: {:?} autostart={} update-simulation={} logdir={:?}",
                sim_cfg.file(),
                sim_cfg.auto_start(),
                sim_cfg.update_simulation(),
                sim_cfg.log_dir()
            );
            for (key, val) in sim_cfg.overrides().iter() {
                log::debug!("simulation {i_sim}: override {key}={val}");
            }
            self.loaded.push(sim_cfg.file().to_path_buf());
        }

        Ok(())
    }
}
