//! Global [tracing_subscriber] set up.
use super::logs::{self, LoggingConfig, LoggingConfigError, layers::FileGuard};
use thiserror::Error;
use tracing::debug;
use tracing_subscriber::{Layer, Registry, layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Error, Debug)]
pub enum TracingError {
    #[error("logging config error: {0}")]
    Logs(#[from] LoggingConfigError),
    #[error("could not start tracing: {0}")]
    Init(String),
}

/// A registry layer reporting tracing data to some destination.
pub type LayerBox = Box<dyn Layer<Registry> + Send + Sync + 'static>;

pub struct TracingConfig {
    logging_config: LoggingConfig,
}

impl TracingConfig {
    pub fn new(logging_config: LoggingConfig) -> Self {
        Self { logging_config }
    }
}

/// Installs the global subscriber. Standard output is always on, files only when configured.
///
/// The returned guard must be held while logging to files, dropping it flushes and stops the
/// file writer.
pub fn try_init_tracing(config: TracingConfig) -> Result<Option<FileGuard>, TracingError> {
    let mut layers = Vec::from([logs::layers::stdout(&config.logging_config)?]);

    let file_guard = match logs::layers::file(&config.logging_config)? {
        Some((file_layer, guard)) => {
            layers.push(file_layer);
            Some(guard)
        }
        None => None,
    };

    tracing_subscriber::registry()
        .with(layers)
        .try_init()
        .map_err(|err| TracingError::Init(format!("unable to set global tracer: {err}")))?;

    debug!("Tracer initialized successfully");
    Ok(file_guard)
}
