//! Ordered precondition checks.
//!
//! Checks run in a fixed order and stop at the first failure; each check may
//! assume that all earlier ones passed.

use crate::cli::Cli;
use crate::error::StartupError;
use crate::host::Host;
use crate::simfile::SimFileSpec;
use std::{
    fs,
    path::{MAIN_SEPARATOR_STR, Path, PathBuf},
};

/// Process-wide options, frozen after validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GlobalOptions {
    pub use_gui: bool,
    pub log_dir: PathBuf,
    pub log_name: Option<String>,
    pub log_config_file: Option<PathBuf>,
    pub contiki_path: Option<PathBuf>,
    /// Always ends with a path separator.
    pub install_path: PathBuf,
    pub compiler_path: PathBuf,
    pub external_user_config: Option<PathBuf>,
    pub auto_start: bool,
    pub random_seed: Option<i64>,
    pub update_simulation: bool,
}

/// Arguments that passed every check.
#[derive(Debug)]
pub struct Validated {
    pub options: GlobalOptions,
    /// Simulation files in command-line order.
    pub sim_files: Vec<SimFileSpec>,
}

/// Check the parsed arguments against the host and the filesystem.
///
/// Creates the log directory when running without GUI.
///
/// # Errors
/// Returns the first failed check.
pub fn validate(cli: Cli, host: &Host) -> Result<Validated, StartupError> {
    let use_gui = cli.use_gui();

    if use_gui && !host.display {
        return Err(StartupError::HeadlessGui);
    }

    if cli.sim.update_simulation && !use_gui {
        return Err(StartupError::UpdateWithoutGui);
    }

    if !use_gui {
        prepare_log_dir(&cli.log.log_dir)?;
    }

    let sim_files = cli
        .sim_files
        .iter()
        .map(String::as_str)
        .map(check_sim_file)
        .collect::<Result<Vec<_>, _>>()?;

    if let Some(file) = &cli.log.log_config_file {
        check_exists(file, "--log4j2", "log configuration file")?;
    }

    if let Some(dir) = &cli.paths.contiki_path {
        check_exists(dir, "--contiki", "Contiki-NG path")?;
    }

    let install_path = with_trailing_separator(cli.cooja_path);
    check_exists(&install_path, "--cooja", "Cooja path")?;

    check_exists(&cli.javac, "--javac", "Java compiler")?;

    let options = GlobalOptions {
        use_gui,
        log_dir: cli.log.log_dir,
        log_name: cli.log.log_name,
        log_config_file: cli.log.log_config_file,
        contiki_path: cli.paths.contiki_path,
        install_path,
        compiler_path: cli.javac,
        external_user_config: cli.paths.external_user_config,
        auto_start: cli.sim.auto_start,
        random_seed: cli.sim.random_seed,
        update_simulation: cli.sim.update_simulation,
    };

    Ok(Validated { options, sim_files })
}

fn prepare_log_dir(dir: &Path) -> Result<(), StartupError> {
    if dir.exists() {
        return Ok(());
    }
    fs::create_dir_all(dir).map_err(|source| StartupError::CreateLogDir {
        dir: dir.to_path_buf(),
        source,
    })
}

fn check_sim_file(arg: &str) -> Result<SimFileSpec, StartupError> {
    let spec = SimFileSpec::parse(arg)?;
    if !spec.has_sim_extension() {
        return Err(StartupError::SimFileExtension(spec.path().to_path_buf()));
    }
    if !spec.path().exists() {
        return Err(StartupError::SimFileMissing(spec.path().to_path_buf()));
    }
    Ok(spec)
}

fn check_exists(path: &Path, option: &'static str, what: &'static str) -> Result<(), StartupError> {
    if path.exists() {
        return Ok(());
    }
    Err(StartupError::PathMissing {
        option,
        what,
        path: path.to_path_buf(),
    })
}

fn with_trailing_separator(path: PathBuf) -> PathBuf {
    let mut path = path.into_os_string();
    if !path.as_encoded_bytes().ends_with(MAIN_SEPARATOR_STR.as_bytes()) {
        path.push(MAIN_SEPARATOR_STR);
    }
    PathBuf::from(path)
}
