use crate::common::archives::runtime_tar_gz;
use crate::common::global_logger::init_logger;
use crate::common::server::{LAUNCHER_BYTES, LAUNCHER_PATH, RUNTIME_PATH, build_config, serve};
use assert_matches::assert_matches;
use httpmock::MockServer;
use prestarter::bootstrap::{Bootstrap, BootstrapError};
use prestarter::config::{BuildConfig, ConfigurationError, Settings};
use prestarter::fetcher::HttpFetcher;
use prestarter::handoff::{LaunchError, LaunchMode, ProcessLauncher};
use prestarter::http::config::HttpConfig;
use prestarter::provisioner::DefaultProvisioner;
use prestarter::reporter::NoopReporter;
use std::path::Path;
use std::sync::Arc;
use tempfile::tempdir;

fn run(build_config: &BuildConfig, work_dir: &Path) -> Result<(), BootstrapError> {
    init_logger();
    let settings = Settings {
        work_dir: work_dir.to_path_buf(),
        launch_mode: LaunchMode::Attached,
        ..Default::default()
    };
    let fetcher = HttpFetcher::try_new(HttpConfig::default()).unwrap();
    let provisioner =
        DefaultProvisioner::new(fetcher, settings.work_dir.clone(), Arc::new(NoopReporter));

    Bootstrap::new(
        provisioner,
        ProcessLauncher::new(settings.launch_mode),
        Arc::new(NoopReporter),
    )
    .run(build_config, &settings)
}

#[test]
fn missing_configuration_issues_no_request() {
    let server = MockServer::start();
    let runtime = serve(&server, RUNTIME_PATH, runtime_tar_gz("#!/bin/sh\n"));
    let launcher = serve(&server, LAUNCHER_PATH, LAUNCHER_BYTES.to_vec());

    let build_config = BuildConfig {
        runtime_url_amd64: None,
        ..build_config(&server, false)
    };
    let work_dir = tempdir().unwrap();
    let result = run(&build_config, work_dir.path());

    assert_matches!(
        result,
        Err(BootstrapError::Configuration(ConfigurationError::Missing(_)))
    );
    runtime.assert_hits(0);
    launcher.assert_hits(0);
    assert_eq!(std::fs::read_dir(work_dir.path()).unwrap().count(), 0);
}

#[cfg(target_family = "unix")]
#[test]
fn launcher_receives_the_assembled_arguments() {
    let work_dir = tempdir().unwrap();
    let args_file = work_dir.path().join("args.txt");
    let java = format!(
        "#!/bin/sh\nprintf '%s\\n' \"$@\" > '{}'\n",
        args_file.display()
    );

    let server = MockServer::start();
    serve(&server, RUNTIME_PATH, runtime_tar_gz(&java));
    serve(&server, LAUNCHER_PATH, LAUNCHER_BYTES.to_vec());

    run(&build_config(&server, false), work_dir.path()).unwrap();

    let args = std::fs::read_to_string(&args_file).unwrap();
    assert_eq!(
        args,
        format!("-jar\n{}\n", work_dir.path().join("Launcher.jar").display())
    );
}

#[cfg(target_family = "unix")]
#[test]
fn attached_launcher_failure_is_propagated() {
    let server = MockServer::start();
    serve(&server, RUNTIME_PATH, runtime_tar_gz("#!/bin/sh\nexit 42\n"));
    serve(&server, LAUNCHER_PATH, LAUNCHER_BYTES.to_vec());

    let work_dir = tempdir().unwrap();
    let result = run(&build_config(&server, false), work_dir.path());

    assert_matches!(result, Err(err @ BootstrapError::Launch(LaunchError::ChildFailed { .. })) => {
        assert_eq!(err.exit_code(), 42);
    });
}
