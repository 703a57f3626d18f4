//! Entry point of the bootstrap.
//!
//! Parses the command line arguments and either performs one-shot actions or runs the bootstrap.
use prestarter::bootstrap::{Bootstrap, BootstrapError};
use prestarter::command::Command;
use prestarter::config::{BuildConfig, Settings};
use prestarter::fetcher::HttpFetcher;
use prestarter::handoff::ProcessLauncher;
use prestarter::provisioner::DefaultProvisioner;
use prestarter::reporter::{LogReporter, StatusReporter};
use std::process::ExitCode;
use std::sync::Arc;
use tracing::error;

fn main() -> ExitCode {
    Command::run(_main)
}

/// This is the actual main function.
///
/// It is separated from [main] so failures are logged once, in string format, and then turned
/// into the process exit code.
fn _main(settings: Settings) -> Result<(), BootstrapError> {
    let reporter: Arc<dyn StatusReporter> = Arc::new(LogReporter);

    let fetcher = HttpFetcher::try_new(settings.http.clone())
        .inspect_err(|err| error!("Could not build the HTTP client: {err}"))?;
    let provisioner =
        DefaultProvisioner::new(fetcher, settings.work_dir.clone(), reporter.clone());
    let launcher = ProcessLauncher::new(settings.launch_mode);

    Bootstrap::new(provisioner, launcher, reporter).run(&BuildConfig::from_build_env(), &settings)
}
