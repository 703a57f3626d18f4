use crate::common::archives::{Entry, runtime_tar_gz, sdk_zip, tar_gz};
use crate::common::global_logger::init_logger;
use crate::common::server::{
    LAUNCHER_BYTES, LAUNCHER_PATH, RUNTIME_PATH, SDK_PATH, build_config, serve, serve_not_found,
};
use assert_matches::assert_matches;
use httpmock::MockServer;
use prestarter::config::Settings;
use prestarter::fetcher::{DownloadError, HttpFetcher};
use prestarter::handoff::InvocationPlan;
use prestarter::http::config::HttpConfig;
use prestarter::provisioner::{DefaultProvisioner, Provision, Provisioned, ProvisioningError};
use prestarter::reporter::NoopReporter;
use prestarter::resource::ResourceSet;
use std::ffi::OsString;
use std::path::Path;
use std::sync::Arc;
use tempfile::tempdir;

fn provision(
    server: &MockServer,
    work_dir: &Path,
    with_sdk: bool,
    reuse_launcher: bool,
) -> Result<Provisioned, ProvisioningError> {
    init_logger();
    let settings = Settings {
        work_dir: work_dir.to_path_buf(),
        reuse_launcher,
        ..Default::default()
    };
    let config = build_config(server, with_sdk).validate().unwrap();
    let resources = ResourceSet::new(&config, &settings);

    let fetcher = HttpFetcher::try_new(HttpConfig::default()).unwrap();
    DefaultProvisioner::new(fetcher, work_dir.to_path_buf(), Arc::new(NoopReporter))
        .provision(&resources)
}

#[test]
fn fresh_directory_is_fully_provisioned() {
    let server = MockServer::start();
    let runtime = serve(&server, RUNTIME_PATH, runtime_tar_gz("#!/bin/sh\n"));
    let launcher = serve(&server, LAUNCHER_PATH, LAUNCHER_BYTES.to_vec());

    let work_dir = tempdir().unwrap();
    let provisioned = provision(&server, work_dir.path(), false, false).unwrap();

    runtime.assert_hits(1);
    launcher.assert_hits(1);

    let java = work_dir.path().join("java/bin/java");
    assert!(java.is_file());
    assert_eq!(
        std::fs::read_to_string(work_dir.path().join("java/lib/data")).unwrap(),
        "runtime data"
    );
    assert!(!work_dir.path().join("java/pkg").exists());
    assert_eq!(
        std::fs::read(work_dir.path().join("Launcher.jar")).unwrap(),
        LAUNCHER_BYTES
    );
    // Temporary archives are gone
    assert!(!work_dir.path().join("Java.tar.gz").exists());

    let plan = InvocationPlan::from(provisioned);
    assert_eq!(plan.executable, java);
    assert_eq!(
        plan.args,
        vec![
            OsString::from("-jar"),
            work_dir.path().join("Launcher.jar").into_os_string()
        ]
    );
}

#[cfg(target_family = "unix")]
#[test]
fn executable_bits_survive_extraction() {
    use std::os::unix::fs::PermissionsExt;

    let server = MockServer::start();
    serve(&server, RUNTIME_PATH, runtime_tar_gz("#!/bin/sh\n"));
    serve(&server, LAUNCHER_PATH, LAUNCHER_BYTES.to_vec());

    let work_dir = tempdir().unwrap();
    provision(&server, work_dir.path(), false, false).unwrap();

    let mode = |path: &str| {
        std::fs::metadata(work_dir.path().join(path))
            .unwrap()
            .permissions()
            .mode()
            & 0o777
    };
    assert_eq!(mode("java/bin/java"), 0o755);
    assert_eq!(mode("java/lib/data"), 0o644);
}

#[test]
fn second_run_downloads_nothing_with_launcher_reuse() {
    let server = MockServer::start();
    let runtime = serve(&server, RUNTIME_PATH, runtime_tar_gz("#!/bin/sh\n"));
    let sdk = serve(&server, SDK_PATH, sdk_zip());
    let launcher = serve(&server, LAUNCHER_PATH, LAUNCHER_BYTES.to_vec());

    let work_dir = tempdir().unwrap();
    let first = provision(&server, work_dir.path(), true, true).unwrap();
    let java_before = std::fs::read(work_dir.path().join("java/bin/java")).unwrap();

    let second = provision(&server, work_dir.path(), true, true).unwrap();

    runtime.assert_hits(1);
    sdk.assert_hits(1);
    launcher.assert_hits(1);
    assert_eq!(first, second);
    assert_eq!(
        std::fs::read(work_dir.path().join("java/bin/java")).unwrap(),
        java_before
    );
}

#[test]
fn launcher_is_downloaded_on_every_run_by_default() {
    let server = MockServer::start();
    let runtime = serve(&server, RUNTIME_PATH, runtime_tar_gz("#!/bin/sh\n"));
    let launcher = serve(&server, LAUNCHER_PATH, LAUNCHER_BYTES.to_vec());

    let work_dir = tempdir().unwrap();
    provision(&server, work_dir.path(), false, false).unwrap();
    provision(&server, work_dir.path(), false, false).unwrap();

    runtime.assert_hits(1);
    launcher.assert_hits(2);
}

#[test]
fn sdk_zip_is_unwrapped() {
    let server = MockServer::start();
    serve(&server, RUNTIME_PATH, runtime_tar_gz("#!/bin/sh\n"));
    serve(&server, SDK_PATH, sdk_zip());
    serve(&server, LAUNCHER_PATH, LAUNCHER_BYTES.to_vec());

    let work_dir = tempdir().unwrap();
    let provisioned = provision(&server, work_dir.path(), true, false).unwrap();

    let library = work_dir.path().join("javafx/lib");
    assert_eq!(provisioned.sdk_library, Some(library.clone()));
    assert!(library.join("javafx.base.jar").is_file());
    assert!(work_dir.path().join("javafx/legal/LICENSE").is_file());
    assert!(!work_dir.path().join("JavaFX.zip").exists());

    let plan = InvocationPlan::from(provisioned);
    assert_eq!(plan.args[0], OsString::from("--module-path"));
    assert_eq!(plan.args[1], library.into_os_string());
}

#[test]
fn not_found_leaves_nothing_behind() {
    let server = MockServer::start();
    let runtime = serve_not_found(&server, RUNTIME_PATH);
    let launcher = serve(&server, LAUNCHER_PATH, LAUNCHER_BYTES.to_vec());

    let work_dir = tempdir().unwrap();
    let result = provision(&server, work_dir.path(), false, false);

    assert_matches!(
        result,
        Err(ProvisioningError::Download { resource, source: DownloadError::Status { .. } }) => {
            assert_eq!(resource, "Java");
        }
    );
    runtime.assert_hits(1);
    launcher.assert_hits(0);
    assert!(!work_dir.path().join("Java.tar.gz").exists());
    assert!(!work_dir.path().join("java").exists());
}

#[test]
fn archive_without_runtime_is_a_consistency_failure() {
    let server = MockServer::start();
    serve(
        &server,
        RUNTIME_PATH,
        tar_gz(&[Entry::file("pkg/README", "no runtime in here", 0o644)]),
    );
    let launcher = serve(&server, LAUNCHER_PATH, LAUNCHER_BYTES.to_vec());

    let work_dir = tempdir().unwrap();
    let result = provision(&server, work_dir.path(), false, false);

    assert_matches!(result, Err(ProvisioningError::Consistency { resource }) => {
        assert_eq!(resource, "Java");
    });
    launcher.assert_hits(0);
    assert!(!work_dir.path().join("Java.tar.gz").exists());
}

#[test]
fn launcher_failure_keeps_installed_runtime() {
    let server = MockServer::start();
    serve(&server, RUNTIME_PATH, runtime_tar_gz("#!/bin/sh\n"));
    serve_not_found(&server, LAUNCHER_PATH);

    let work_dir = tempdir().unwrap();
    let result = provision(&server, work_dir.path(), false, false);

    assert_matches!(result, Err(ProvisioningError::Download { resource, .. }) => {
        assert_eq!(resource, "Launcher");
    });
    assert!(work_dir.path().join("java/bin/java").is_file());
    assert!(!work_dir.path().join("Launcher.jar").exists());
}

#[test]
fn missing_work_dir_is_created() {
    let server = MockServer::start();
    serve(&server, RUNTIME_PATH, runtime_tar_gz("#!/bin/sh\n"));
    serve(&server, LAUNCHER_PATH, LAUNCHER_BYTES.to_vec());

    let tmp = tempdir().unwrap();
    let work_dir = tmp.path().join("fresh/install");
    let provisioned = provision(&server, &work_dir, false, false).unwrap();

    assert!(work_dir.join("java/bin/java").is_file());
    assert_eq!(provisioned.launcher, work_dir.join("Launcher.jar"));
    assert_eq!(
        std::fs::read(work_dir.join("Launcher.jar")).unwrap(),
        LAUNCHER_BYTES
    );
    assert!(!work_dir.join("Launcher.jar.part").exists());
}

#[test]
fn failed_launcher_refresh_keeps_previous_launcher() {
    let server = MockServer::start();
    serve(&server, RUNTIME_PATH, runtime_tar_gz("#!/bin/sh\n"));
    let mut launcher = serve(&server, LAUNCHER_PATH, LAUNCHER_BYTES.to_vec());

    let work_dir = tempdir().unwrap();
    provision(&server, work_dir.path(), false, false).unwrap();

    launcher.delete();
    serve_not_found(&server, LAUNCHER_PATH);
    let result = provision(&server, work_dir.path(), false, false);

    assert_matches!(result, Err(ProvisioningError::Download { resource, .. }) => {
        assert_eq!(resource, "Launcher");
    });
    assert_eq!(
        std::fs::read(work_dir.path().join("Launcher.jar")).unwrap(),
        LAUNCHER_BYTES
    );
    assert!(!work_dir.path().join("Launcher.jar.part").exists());
}
