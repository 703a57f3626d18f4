//! Configuration of the log output of the bootstrap.
pub mod layers;

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use thiserror::Error;
use tracing::Level;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::filter::Directive;

/// Environment variable overriding the computed filter, using the [EnvFilter] syntax.
pub const LOG_LEVEL_ENV: &str = "LOG_LEVEL";
const LOG_FILE_PREFIX: &str = "prestarter";
const LOG_FILE_SUFFIX: &str = "log";

#[derive(Error, Debug)]
pub enum LoggingConfigError {
    #[error("invalid log level `{0}`")]
    InvalidLevel(String),
    #[error("invalid logging directive `{directive}`: {reason}")]
    InvalidDirective { directive: String, reason: String },
    #[error("could not set up the log file in `{}`: {reason}", dir.display())]
    File { dir: PathBuf, reason: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LogLevel(Level);

impl LogLevel {
    pub fn as_level(&self) -> Level {
        self.0
    }
}

impl Default for LogLevel {
    fn default() -> Self {
        Self(Level::INFO)
    }
}

impl FromStr for LogLevel {
    type Err = LoggingConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Level::from_str(s)
            .map(Self)
            .map_err(|_| LoggingConfigError::InvalidLevel(s.to_string()))
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.as_str().to_lowercase())
    }
}

/// Timestamp format following [chrono strftime](https://docs.rs/chrono/latest/chrono/format/strftime/index.html).
#[derive(Debug, PartialEq, Clone)]
pub struct TimestampFormat(pub String);

impl Default for TimestampFormat {
    fn default() -> Self {
        Self("%Y-%m-%dT%H:%M:%S".to_string())
    }
}

#[derive(Debug, PartialEq, Clone, Default)]
pub struct LoggingFormat {
    /// Include the target of each event.
    pub target: bool,
    pub timestamp: TimestampFormat,
}

#[derive(Debug, PartialEq, Clone, Default)]
pub struct LoggingConfig {
    pub format: LoggingFormat,
    pub level: LogLevel,
    /// Also write daily rotated log files into this directory.
    pub file_dir: Option<PathBuf>,
}

impl LoggingConfig {
    pub fn new(level: LogLevel, file_dir: Option<PathBuf>) -> Self {
        Self {
            level,
            file_dir,
            ..Default::default()
        }
    }

    /// Events of this crate at the configured level, unless [LOG_LEVEL_ENV] says otherwise.
    pub fn logging_filter(&self) -> Result<EnvFilter, LoggingConfigError> {
        let directive = format!("{}={}", env!("CARGO_CRATE_NAME"), self.level);
        let crate_directive =
            directive
                .parse::<Directive>()
                .map_err(|err| LoggingConfigError::InvalidDirective {
                    directive: directive.clone(),
                    reason: err.to_string(),
                })?;

        Ok(EnvFilter::builder()
            .with_default_directive(crate_directive)
            .with_env_var(LOG_LEVEL_ENV)
            .from_env_lossy())
    }
}
