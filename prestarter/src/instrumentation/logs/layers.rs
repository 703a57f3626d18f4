use super::{LOG_FILE_PREFIX, LOG_FILE_SUFFIX, LoggingConfig, LoggingConfigError};
use crate::instrumentation::tracing::LayerBox;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::Layer;
use tracing_subscriber::fmt::format::PrettyFields;
use tracing_subscriber::fmt::time::ChronoLocal;

pub type FileGuard = WorkerGuard;

/// Layer writing to the standard output.
pub fn stdout(config: &LoggingConfig) -> Result<LayerBox, LoggingConfigError> {
    let layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stdout)
        .with_target(config.format.target)
        .with_timer(ChronoLocal::new(config.format.timestamp.0.clone()))
        .fmt_fields(PrettyFields::new())
        .with_filter(config.logging_filter()?)
        .boxed();
    Ok(layer)
}

/// Layer writing to daily rotated files, with the guard flushing them. `None` when file logging
/// is not enabled.
pub fn file(config: &LoggingConfig) -> Result<Option<(LayerBox, FileGuard)>, LoggingConfigError> {
    let Some(dir) = config.file_dir.as_ref() else {
        return Ok(None);
    };

    let appender = RollingFileAppender::builder()
        .rotation(Rotation::DAILY)
        .filename_prefix(LOG_FILE_PREFIX)
        .filename_suffix(LOG_FILE_SUFFIX)
        .build(dir)
        .map_err(|err| LoggingConfigError::File {
            dir: dir.clone(),
            reason: err.to_string(),
        })?;
    let (writer, guard) = tracing_appender::non_blocking(appender);

    let layer = tracing_subscriber::fmt::layer()
        .with_writer(writer)
        .with_ansi(false) // Disable colors for file
        .with_target(config.format.target)
        .with_timer(ChronoLocal::new(config.format.timestamp.0.clone()))
        .fmt_fields(PrettyFields::new())
        .with_filter(config.logging_filter()?)
        .boxed();
    Ok(Some((layer, guard)))
}
