//! Fixed names and layout of the provisioned working directory.

pub const DEFAULT_PROJECT_NAME: &str = "Launcher";

pub const RUNTIME_NAME: &str = "Java";
pub const RUNTIME_DIRECTORY: &str = "java";
#[cfg(target_family = "windows")]
pub const RUNTIME_EXECUTABLE: &str = "java.exe";
#[cfg(not(target_family = "windows"))]
pub const RUNTIME_EXECUTABLE: &str = "java";

pub const SDK_NAME: &str = "JavaFX";
pub const SDK_DIRECTORY: &str = "javafx";
/// Sub-path of the SDK directory whose existence means the SDK is installed.
pub const SDK_MARKER: &str = "lib";
pub const SDK_MODULES: &str =
    "javafx.controls,javafx.fxml,javafx.graphics,javafx.media,javafx.swing,javafx.web";

pub const LAUNCHER_NAME: &str = "Launcher";
pub const LAUNCHER_FILE: &str = "Launcher.jar";

pub const TAR_GZ_EXTENSION: &str = "tar.gz";
pub const ZIP_EXTENSION: &str = "zip";

pub const DEFAULT_WORK_DIR: &str = ".";
pub const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_PROGRESS_INTERVAL_MS: u64 = 100;
