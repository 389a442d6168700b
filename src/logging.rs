//! Logging topology.
//!
//! A [`LogTopology`] describes the sinks the root logger routes to. It is plain
//! data until [`LogTopology::install`] opens the sinks and registers a
//! [`Router`] as the global logger.

use crate::config::log_file_name;
use crate::validate::GlobalOptions;
use anyhow::{Context, Result};
use env_logger::Target;
use log::{LevelFilter, Log, Metadata, Record};
use serde::Deserialize;
use std::{
    fs::{self, OpenOptions},
    io::Write,
    path::{Path, PathBuf},
    thread,
};

/// Target of high-volume flow tracing records.
///
/// Sinks built by this module drop such records regardless of level.
pub const FLOW: &str = "flow";

/// Threshold of the default sinks.
const DEFAULT_FILTERS: &str = "info";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Layout {
    /// `level [thread] (file:line) - message`
    Console,
    /// `[timestamp - thread] [file:line] [level] - message`
    Timestamped,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Destination {
    Stdout,
    File { path: PathBuf, append: bool },
}

/// One logging destination.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SinkSpec {
    pub destination: Destination,
    /// Filter directives in `env_logger` syntax, e.g. `info` or `warn,cooja=debug`.
    pub filters: String,
    pub layout: Layout,
    /// Records with this target are dropped.
    pub deny_target: Option<&'static str>,
}

/// Sinks the root logger routes every record to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogTopology {
    sinks: Vec<SinkSpec>,
    /// Layer `RUST_LOG` directives on top of each sink's filters.
    env_filters: bool,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct LogConfigFile {
    #[serde(default = "default_filters")]
    filters: String,
    #[serde(default = "default_true")]
    suppress_flow: bool,
    #[serde(default = "default_true")]
    console: bool,
    file: Option<FileSection>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct FileSection {
    path: PathBuf,
    filters: Option<String>,
    #[serde(default)]
    append: bool,
}

fn default_filters() -> String {
    DEFAULT_FILTERS.to_string()
}

fn default_true() -> bool {
    true
}

impl LogTopology {
    /// Select the topology for the given options.
    ///
    /// An external log configuration file, if given, replaces the built-in
    /// topology entirely.
    ///
    /// # Errors
    /// Returns an error if the external file cannot be read or parsed.
    pub fn resolve(opts: &GlobalOptions) -> Result<Self> {
        match &opts.log_config_file {
            Some(file) => Self::from_file(file, &opts.log_dir)
                .with_context(|| format!("failed to load log configuration {file:?}")),
            None => Ok(Self::programmatic(&opts.log_dir, opts.log_name.as_deref())),
        }
    }

    /// Built-in topology: a console sink, plus a truncated file sink in
    /// `log_dir` when a log name is given.
    pub fn programmatic(log_dir: &Path, log_name: Option<&str>) -> Self {
        let mut sinks = vec![SinkSpec {
            destination: Destination::Stdout,
            filters: default_filters(),
            layout: Layout::Console,
            deny_target: Some(FLOW),
        }];

        if let Some(name) = log_name {
            sinks.push(SinkSpec {
                destination: Destination::File {
                    path: log_dir.join(log_file_name(name)),
                    append: false,
                },
                filters: default_filters(),
                layout: Layout::Timestamped,
                deny_target: Some(FLOW),
            });
        }

        Self {
            sinks,
            env_filters: true,
        }
    }

    /// Topology described by a TOML log configuration file.
    ///
    /// A relative file sink path is resolved against `log_dir`.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read or is not a valid log
    /// configuration.
    pub fn from_file<P: AsRef<Path>>(file: P, log_dir: &Path) -> Result<Self> {
        let file = file.as_ref();
        let contents =
            fs::read_to_string(file).with_context(|| format!("failed to read {file:?}"))?;
        let cfg: LogConfigFile =
            toml::from_str(&contents).context("failed to deserialize log configuration")?;

        let deny_target = cfg.suppress_flow.then_some(FLOW);

        let mut sinks = Vec::new();
        if cfg.console {
            sinks.push(SinkSpec {
                destination: Destination::Stdout,
                filters: cfg.filters.clone(),
                layout: Layout::Console,
                deny_target,
            });
        }
        if let Some(section) = cfg.file {
            sinks.push(SinkSpec {
                destination: Destination::File {
                    path: log_dir.join(section.path),
                    append: section.append,
                },
                filters: section.filters.unwrap_or(cfg.filters),
                layout: Layout::Timestamped,
                deny_target,
            });
        }

        Ok(Self {
            sinks,
            env_filters: false,
        })
    }

    /// Open every sink and build the router, without registering it.
    ///
    /// # Errors
    /// Returns an error if a log file cannot be opened.
    pub fn router(&self) -> Result<Router> {
        let sinks = self
            .sinks
            .iter()
            .map(|spec| spec.open(self.env_filters))
            .collect::<Result<Vec<_>>>()?;
        Ok(Router { sinks })
    }

    /// Open every sink and register the router as the global logger.
    ///
    /// Can succeed only once per process.
    ///
    /// # Errors
    /// Returns an error if a log file cannot be opened or a global logger is
    /// already registered.
    pub fn install(self) -> Result<LogHandle> {
        let router = self.router()?;
        let max_level = router.max_level();

        log::set_boxed_logger(Box::new(router)).context("failed to register logger")?;
        log::set_max_level(max_level);

        let files = self
            .sinks
            .into_iter()
            .filter_map(|spec| match spec.destination {
                Destination::File { path, .. } => Some(path),
                Destination::Stdout => None,
            })
            .collect();

        Ok(LogHandle { files })
    }
}

impl SinkSpec {
    fn open(&self, env_filters: bool) -> Result<RoutedSink> {
        let mut builder = env_logger::Builder::new();
        builder.parse_filters(&self.filters);
        if env_filters {
            builder.parse_default_env();
        }

        let target = match &self.destination {
            Destination::Stdout => Target::Stdout,
            Destination::File { path, append } => {
                if let Some(dir) = path.parent().filter(|dir| !dir.as_os_str().is_empty()) {
                    fs::create_dir_all(dir)
                        .with_context(|| format!("failed to create log directory {dir:?}"))?;
                }
                let file = OpenOptions::new()
                    .create(true)
                    .write(true)
                    .append(*append)
                    .truncate(!*append)
                    .open(path)
                    .with_context(|| format!("failed to open {path:?}"))?;
                Target::Pipe(Box::new(file))
            }
        };
        builder.target(target);

        match self.layout {
            Layout::Console => {
                builder.format(|buf, record| {
                    writeln!(
                        buf,
                        "{:>5} [{}] ({}:{}) - {}",
                        record.level(),
                        thread::current().name().unwrap_or("unnamed"),
                        record.file().unwrap_or("?"),
                        record.line().unwrap_or(0),
                        record.args()
                    )
                });
            }
            Layout::Timestamped => {
                builder.format(|buf, record| {
                    let timestamp = buf.timestamp_seconds();
                    writeln!(
                        buf,
                        "[{} - {}] [{}:{}] [{}] - {}",
                        timestamp,
                        thread::current().name().unwrap_or("unnamed"),
                        record.file().unwrap_or("?"),
                        record.line().unwrap_or(0),
                        record.level(),
                        record.args()
                    )
                });
            }
        }

        Ok(RoutedSink {
            deny_target: self.deny_target,
            logger: builder.build(),
        })
    }
}

struct RoutedSink {
    deny_target: Option<&'static str>,
    logger: env_logger::Logger,
}

impl RoutedSink {
    fn accepts(&self, metadata: &Metadata) -> bool {
        let denied = self
            .deny_target
            .is_some_and(|target| target == metadata.target());
        !denied && self.logger.enabled(metadata)
    }
}

/// Fans records out to the sinks of a topology.
pub struct Router {
    sinks: Vec<RoutedSink>,
}

impl Router {
    /// Most verbose level any sink accepts.
    pub fn max_level(&self) -> LevelFilter {
        self.sinks
            .iter()
            .map(|sink| sink.logger.filter())
            .max()
            .unwrap_or(LevelFilter::Off)
    }
}

impl Log for Router {
    fn enabled(&self, metadata: &Metadata) -> bool {
        self.sinks.iter().any(|sink| sink.accepts(metadata))
    }

    fn log(&self, record: &Record) {
        for sink in &self.sinks {
            if sink.accepts(record.metadata()) {
                sink.logger.log(record);
            }
        }
    }

    fn flush(&self) {
        for sink in &self.sinks {
            sink.logger.flush();
        }
    }
}

/// Handle to the installed logger, held until the engine returns.
#[must_use]
pub struct LogHandle {
    files: Vec<PathBuf>,
}

impl LogHandle {
    /// Log files written by the installed sinks.
    pub fn files(&self) -> &[PathBuf] {
        &self.files
    }

    /// Flush every sink.
    pub fn shutdown(self) {
        log::logger().flush();
    }
}
