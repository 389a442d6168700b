use crate::simfile::ParseError;
use std::{io, path::PathBuf};
use thiserror::Error;

/// Fatal startup error.
///
/// Every variant names the offending value and, where one exists, the option
/// that produced it.
#[derive(Debug, Error)]
pub enum StartupError {
    #[error("--gui requested but no display is available (headless environment)")]
    HeadlessGui,

    #[error("--update-simulation requires --gui")]
    UpdateWithoutGui,

    #[error("could not create log directory {dir:?} (--logdir)")]
    CreateLogDir { dir: PathBuf, source: io::Error },

    #[error("invalid simulation file argument")]
    SimFileSyntax(#[from] ParseError),

    #[error("simulation file {0:?} must have an extension of '.csc' or '.csc.gz'")]
    SimFileExtension(PathBuf),

    #[error("simulation file {0:?} does not exist")]
    SimFileMissing(PathBuf),

    #[error("{what} {path:?} ({option}) does not exist")]
    PathMissing {
        option: &'static str,
        what: &'static str,
        path: PathBuf,
    },
}

impl StartupError {
    /// Process exit status for this error.
    pub fn exit_code(&self) -> i32 {
        1
    }
}
