//! Simulation file arguments.
//!
//! Each positional argument names one simulation file, optionally followed by
//! per-file overrides: `file.csc[,key=value]*`.

use std::{
    collections::HashMap,
    path::{Path, PathBuf},
};
use thiserror::Error;

/// Override key for automatically starting the simulation.
pub const AUTOSTART: &str = "autostart";
/// Override key for writing an updated simulation file.
pub const UPDATE_SIMULATION: &str = "update-simulation";
/// Override key for the log directory of the simulation.
pub const LOGDIR: &str = "logdir";

/// Recognized simulation file extensions.
pub const EXTENSIONS: [&str; 2] = [".csc", ".csc.gz"];

/// Syntax error in a simulation file argument.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseError {
    #[error("parsing failed for '{0}'")]
    MissingPath(String),

    #[error("faulty key=value specification '{segment}' in '{arg}'")]
    FaultyPair { arg: String, segment: String },
}

/// Per-file overrides, keyed by override name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Overrides(HashMap<String, String>);

impl Overrides {
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    /// Boolean value of an override.
    ///
    /// Only `true` (ignoring ASCII case) is true; any other value is false.
    pub fn flag(&self, key: &str) -> Option<bool> {
        self.get(key).map(|val| val.eq_ignore_ascii_case("true"))
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(key, val)| (key.as_str(), val.as_str()))
    }
}

/// Parsed simulation file argument.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SimFileSpec {
    path: PathBuf,
    overrides: Overrides,
}

impl SimFileSpec {
    /// Parse an argument of the form `path[,key=value]*`.
    ///
    /// The first comma-separated segment is the path. Every following segment
    /// must contain exactly one `=`, so a trailing comma is an error.
    ///
    /// # Errors
    /// Returns an error naming the argument if it holds no path, or naming the
    /// offending segment if a segment is not a `key=value` pair.
    pub fn parse(arg: &str) -> Result<Self, ParseError> {
        let mut segments = arg.split(',');

        let path = segments
            .next()
            .filter(|path| !path.trim().is_empty())
            .ok_or_else(|| ParseError::MissingPath(arg.to_string()))?;

        let mut overrides = HashMap::new();
        for segment in segments {
            let mut pair = segment.split('=');
            match (pair.next(), pair.next(), pair.next()) {
                (Some(key), Some(val), None) => {
                    overrides.insert(key.to_string(), val.to_string());
                }
                _ => {
                    return Err(ParseError::FaultyPair {
                        arg: arg.to_string(),
                        segment: segment.to_string(),
                    });
                }
            }
        }

        Ok(Self {
            path: PathBuf::from(path),
            overrides: Overrides(overrides),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Whether the path ends in one of the [`EXTENSIONS`].
    pub fn has_sim_extension(&self) -> bool {
        self.path
            .to_str()
            .is_some_and(|path| EXTENSIONS.iter().any(|ext| path.ends_with(ext)))
    }

    pub fn into_parts(self) -> (PathBuf, Overrides) {
        (self.path, self.overrides)
    }
}
