use clap::{Args, Parser};
use std::path::PathBuf;

/// Cooja network simulator.
// Parsed arguments are a draft: nothing here has been checked against the
// host yet. See `validate::validate`.
#[derive(Debug, Parser)]
#[command(name = "cooja", version, about, long_about = None)]
pub struct Cli {
    /// Cooja directory
    #[arg(long = "cooja", value_name = "DIR")]
    pub cooja_path: PathBuf,

    /// javac binary
    #[arg(long, value_name = "FILE")]
    pub javac: PathBuf,

    /// Use graphical mode (default)
    #[arg(long, overrides_with = "no_gui")]
    pub gui: bool,

    /// Do not use graphical mode
    #[arg(long = "no-gui", overrides_with = "gui")]
    pub no_gui: bool,

    /// One or more simulation files, each optionally followed by ",key=value" overrides
    #[arg(value_name = "FILE")]
    pub sim_files: Vec<String>,

    #[command(flatten)]
    pub paths: PathArgs,

    #[command(flatten)]
    pub log: LogArgs,

    #[command(flatten)]
    pub sim: SimArgs,
}

#[derive(Debug, Args)]
#[command(next_help_heading = "Cooja paths")]
pub struct PathArgs {
    /// Filename for external user config
    #[arg(long = "config", value_name = "FILE")]
    pub external_user_config: Option<PathBuf>,

    /// Contiki-NG directory
    #[arg(long = "contiki", value_name = "DIR")]
    pub contiki_path: Option<PathBuf>,
}

#[derive(Debug, Args)]
#[command(next_help_heading = "Log configuration")]
pub struct LogArgs {
    /// Log directory to use
    #[arg(long = "logdir", value_name = "DIR", default_value = ".")]
    pub log_dir: PathBuf,

    /// Filename for the log
    #[arg(long = "logname", value_name = "NAME")]
    pub log_name: Option<String>,

    /// Log configuration file (TOML)
    #[arg(long = "log4j2", visible_alias = "log-config", value_name = "FILE")]
    pub log_config_file: Option<PathBuf>,
}

#[derive(Debug, Args)]
#[command(next_help_heading = "Simulation config")]
pub struct SimArgs {
    /// Automatically start simulations
    #[arg(long = "autostart")]
    pub auto_start: bool,

    /// Random seed
    #[arg(long, value_name = "SEED", allow_negative_numbers = true)]
    pub random_seed: Option<i64>,

    /// Write an updated simulation file (.csc) and exit
    #[arg(long = "update-simulation")]
    pub update_simulation: bool,
}

impl Cli {
    /// Graphical mode is enabled unless explicitly negated.
    pub fn use_gui(&self) -> bool {
        !self.no_gui
    }
}
