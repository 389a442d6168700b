use crate::simfile::{AUTOSTART, LOGDIR, Overrides, SimFileSpec, UPDATE_SIMULATION};
use crate::validate::GlobalOptions;
use std::path::{Path, PathBuf};

/// Recognized log file suffix.
pub const LOG_SUFFIX: &str = ".log";

/// Process-wide configuration handed to the engine.
///
/// Built from global options only; nothing here can be overridden per file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Graphical mode.
    use_gui: bool,
    /// Seed for the simulations, if fixed.
    random_seed: Option<i64>,
    /// External user config file.
    external_user_config: Option<PathBuf>,
    /// Default log directory.
    log_dir: PathBuf,
    /// Contiki-NG directory.
    contiki_path: Option<PathBuf>,
    /// Cooja directory, with a trailing separator.
    install_path: PathBuf,
    /// Java compiler.
    compiler_path: PathBuf,
}

impl Config {
    pub fn new(opts: &GlobalOptions) -> Self {
        Self {
            use_gui: opts.use_gui,
            random_seed: opts.random_seed,
            external_user_config: opts.external_user_config.clone(),
            log_dir: opts.log_dir.clone(),
            contiki_path: opts.contiki_path.clone(),
            install_path: opts.install_path.clone(),
            compiler_path: opts.compiler_path.clone(),
        }
    }

    pub fn use_gui(&self) -> bool {
        self.use_gui
    }

    pub fn random_seed(&self) -> Option<i64> {
        self.random_seed
    }

    pub fn external_user_config(&self) -> Option<&Path> {
        self.external_user_config.as_deref()
    }

    pub fn log_dir(&self) -> &Path {
        &self.log_dir
    }

    pub fn contiki_path(&self) -> Option<&Path> {
        self.contiki_path.as_deref()
    }

    pub fn install_path(&self) -> &Path {
        &self.install_path
    }

    pub fn compiler_path(&self) -> &Path {
        &self.compiler_path
    }
}

/// Configuration of a single simulation.
///
/// Each value comes from the file's overrides if present, else from the
/// global options, else from a fixed default.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SimConfig {
    /// Simulation file.
    file: PathBuf,
    /// Start the simulation without user interaction.
    auto_start: bool,
    /// Write an updated simulation file and exit.
    update_simulation: bool,
    /// Log directory of this simulation.
    log_dir: PathBuf,
    /// All overrides given for the file, including unrecognized keys.
    overrides: Overrides,
}

impl SimConfig {
    /// Resolve the effective values for one simulation file.
    ///
    /// Without an override, auto-start defaults to true when running without
    /// GUI or when `--autostart` was given.
    pub fn resolve(spec: SimFileSpec, opts: &GlobalOptions) -> Self {
        let (file, overrides) = spec.into_parts();

        let auto_start = overrides
            .flag(AUTOSTART)
            .unwrap_or(opts.auto_start || !opts.use_gui);
        let update_simulation = overrides
            .flag(UPDATE_SIMULATION)
            .unwrap_or(opts.update_simulation);
        let log_dir = overrides
            .get(LOGDIR)
            .map_or_else(|| opts.log_dir.clone(), PathBuf::from);

        Self {
            file,
            auto_start,
            update_simulation,
            log_dir,
            overrides,
        }
    }

    pub fn file(&self) -> &Path {
        &self.file
    }

    pub fn auto_start(&self) -> bool {
        self.auto_start
    }

    pub fn update_simulation(&self) -> bool {
        self.update_simulation
    }

    pub fn log_dir(&self) -> &Path {
        &self.log_dir
    }

    pub fn overrides(&self) -> &Overrides {
        &self.overrides
    }
}

/// Build the process configuration and one [`SimConfig`] per file, in order.
pub fn build(opts: &GlobalOptions, sim_files: Vec<SimFileSpec>) -> (Config, Vec<SimConfig>) {
    let cfg = Config::new(opts);
    let sim_cfgs = sim_files
        .into_iter()
        .map(|spec| SimConfig::resolve(spec, opts))
        .collect();
    (cfg, sim_cfgs)
}

/// Append [`LOG_SUFFIX`] to a log name that lacks it.
pub fn log_file_name(name: &str) -> String {
    if name.ends_with(LOG_SUFFIX) {
        name.to_string()
    } else {
        format!("{name}{LOG_SUFFIX}")
    }
}
