//! Command line interface of the bootstrap.
//!
//! Parses the command line arguments and decides how the application runs as defined in [Command].
use crate::bootstrap::BootstrapError;
use crate::config::{BuildConfig, Settings};
use crate::defaults::{DEFAULT_CONNECT_TIMEOUT_SECS, DEFAULT_WORK_DIR};
use crate::handoff::LaunchMode;
use crate::http::config::HttpConfig;
use crate::instrumentation::logs::{LogLevel, LoggingConfig};
use crate::instrumentation::tracing::{TracingConfig, try_init_tracing};
use crate::utils::binary_metadata::binary_metadata;
use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;
use tracing::info;
use url::Url;

/// Exit code when logging cannot be set up.
const TRACING_EXIT_CODE: u8 = 70;

/// Command line arguments, as parsed by [`clap`].
#[derive(Parser, Debug)]
#[command(author, about, long_about = None)] // Read from `Cargo.toml`
pub struct Command {
    #[arg(long)]
    print_debug_info: bool,

    #[arg(long)]
    version: bool,

    /// Directory where the runtime, the SDK and the launcher are installed.
    #[arg(long, default_value = DEFAULT_WORK_DIR)]
    work_dir: PathBuf,

    /// Wait for the launcher and share the terminal with it instead of detaching.
    #[arg(long)]
    attached: bool,

    /// Keep an already downloaded launcher instead of downloading it on every run.
    #[arg(long)]
    reuse_launcher: bool,

    #[arg(long, default_value_t = LogLevel::default())]
    log_level: LogLevel,

    /// Also write logs to daily rotated files in this directory.
    #[arg(long)]
    log_dir: Option<PathBuf>,

    /// Seconds allowed to establish a connection.
    #[arg(long, default_value_t = DEFAULT_CONNECT_TIMEOUT_SECS)]
    connect_timeout: u64,

    /// Seconds allowed for a whole download. Unlimited by default.
    #[arg(long)]
    timeout: Option<u64>,

    #[arg(long)]
    proxy: Option<Url>,
}

impl Command {
    fn settings(&self) -> Settings {
        let http = HttpConfig::new(
            self.timeout.map(Duration::from_secs),
            Duration::from_secs(self.connect_timeout),
        );
        let http = match self.proxy.clone() {
            Some(proxy) => http.with_proxy(proxy),
            None => http,
        };

        Settings {
            work_dir: self.work_dir.clone(),
            launch_mode: if self.attached {
                LaunchMode::Attached
            } else {
                LaunchMode::Detached
            },
            reuse_launcher: self.reuse_launcher,
            http,
        }
    }

    fn logging_config(&self) -> LoggingConfig {
        LoggingConfig::new(self.log_level, self.log_dir.clone())
    }

    /// Runs the provided main function or shows the binary information according to flags
    pub fn run<F>(main_fn: F) -> ExitCode
    where
        F: FnOnce(Settings) -> Result<(), BootstrapError>,
    {
        let flags = Self::parse();

        if flags.version {
            println!("{}", binary_metadata());
            return ExitCode::SUCCESS;
        }
        if flags.print_debug_info {
            println!("Printing debug info");
            println!("BUILD CONFIG: {:#?}", BuildConfig::from_build_env());
            println!("FLAGS: {flags:#?}");
            return ExitCode::SUCCESS;
        }

        let _file_guard = match try_init_tracing(TracingConfig::new(flags.logging_config())) {
            Ok(guard) => guard,
            Err(err) => {
                // Using print because the tracer failed to start
                println!("Error initializing logs: {err}");
                return ExitCode::from(TRACING_EXIT_CODE);
            }
        };
        info!("{}", binary_metadata());

        match main_fn(flags.settings()) {
            Ok(()) => {
                info!("The bootstrap finished successfully");
                ExitCode::SUCCESS
            }
            Err(err) => ExitCode::from(&err),
        }
    }
}
