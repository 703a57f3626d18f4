use assert_cmd::Command;
use predicates::prelude::predicate;
use std::time::Duration;
use tempfile::TempDir;

fn cmd() -> Command {
    let mut cmd = Command::cargo_bin("prestarter").unwrap();
    cmd.timeout(Duration::from_secs(10));
    cmd
}

#[test]
fn print_version() -> Result<(), Box<dyn std::error::Error>> {
    cmd()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::starts_with("Prestarter Version: "));
    Ok(())
}

#[test]
fn print_debug_info() -> Result<(), Box<dyn std::error::Error>> {
    cmd()
        .arg("--print-debug-info")
        .assert()
        .success()
        .stdout(predicate::str::contains("BUILD CONFIG"));
    Ok(())
}

#[test]
fn unconfigured_build_refuses_to_run() -> Result<(), Box<dyn std::error::Error>> {
    let dir = TempDir::new()?;
    cmd()
        .arg("--work-dir")
        .arg(dir.path())
        .assert()
        .code(78)
        .stdout(predicate::str::contains("FATAL: Not configured."));

    // Nothing was provisioned
    assert_eq!(std::fs::read_dir(dir.path())?.count(), 0);
    Ok(())
}

#[test]
fn invalid_flag_value_fails() -> Result<(), Box<dyn std::error::Error>> {
    cmd()
        .args(["--log-level", "loud"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid log level"));
    Ok(())
}

#[test]
fn log_dir_receives_logs() -> Result<(), Box<dyn std::error::Error>> {
    let dir = TempDir::new()?;
    let log_dir = dir.path().join("logs");
    cmd()
        .arg("--work-dir")
        .arg(dir.path())
        .arg("--log-dir")
        .arg(&log_dir)
        .assert()
        .code(78);

    let log_files: Vec<_> = std::fs::read_dir(&log_dir)?.collect::<Result<_, _>>()?;
    assert_eq!(log_files.len(), 1);
    let logs = std::fs::read_to_string(log_files[0].path())?;
    assert!(logs.contains("FATAL: Not configured."));
    Ok(())
}
