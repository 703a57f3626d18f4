//! One run of the bootstrap: validate, provision, hand off.
use crate::config::{BuildConfig, ConfigurationError, Settings};
use crate::handoff::{InvocationPlan, Launch, LaunchError};
use crate::http::client::ReqwestBuildError;
use crate::provisioner::{Provision, ProvisioningError};
use crate::reporter::StatusReporter;
use crate::resource::ResourceSet;
use std::process::ExitCode;
use std::sync::Arc;
use thiserror::Error;
use tracing::{error, info};

pub const NOT_CONFIGURED_STATUS: &str = "FATAL: Not configured.";

#[derive(Debug, Error)]
pub enum BootstrapError {
    #[error("not configured: {0}")]
    Configuration(#[from] ConfigurationError),

    #[error("could not build the HTTP client: {0}")]
    HttpClient(#[from] ReqwestBuildError),

    #[error(transparent)]
    Provisioning(#[from] ProvisioningError),

    #[error(transparent)]
    Launch(#[from] LaunchError),
}

impl BootstrapError {
    /// Process exit code for this error, following the BSD sysexits conventions.
    ///
    /// A launcher that was waited for and failed hands its own exit code through.
    pub fn exit_code(&self) -> u8 {
        match self {
            BootstrapError::Configuration(_) | BootstrapError::HttpClient(_) => 78,
            BootstrapError::Provisioning(err) => match err {
                ProvisioningError::UnsupportedPlatform(_) | ProvisioningError::Download { .. } => {
                    69
                }
                ProvisioningError::Extract { .. } | ProvisioningError::Locate { .. } => 74,
                ProvisioningError::WorkDir { .. } => 73,
                ProvisioningError::Consistency { .. } => 70,
            },
            BootstrapError::Launch(LaunchError::ChildFailed { code }) => code
                .and_then(|code| u8::try_from(code).ok())
                .filter(|code| *code != 0)
                .unwrap_or(1),
            BootstrapError::Launch(_) => 71,
        }
    }
}

impl From<&BootstrapError> for ExitCode {
    fn from(value: &BootstrapError) -> Self {
        Self::from(value.exit_code())
    }
}

pub struct Bootstrap<P, L>
where
    P: Provision,
    L: Launch,
{
    provisioner: P,
    launcher: L,
    reporter: Arc<dyn StatusReporter>,
}

impl<P, L> Bootstrap<P, L>
where
    P: Provision,
    L: Launch,
{
    pub fn new(provisioner: P, launcher: L, reporter: Arc<dyn StatusReporter>) -> Self {
        Self {
            provisioner,
            launcher,
            reporter,
        }
    }

    /// Runs the whole pipeline. Any failure is reported to the presentation layer before being
    /// returned, and nothing already installed is rolled back.
    pub fn run(&self, build_config: &BuildConfig, settings: &Settings) -> Result<(), BootstrapError> {
        self.try_run(build_config, settings).inspect_err(|err| {
            error!("Bootstrap failed: {err}");
            match err {
                BootstrapError::Configuration(_) => {
                    self.reporter.report_status(NOT_CONFIGURED_STATUS)
                }
                err => self.reporter.report_status(&format!("Error: {err}")),
            }
        })
    }

    fn try_run(&self, build_config: &BuildConfig, settings: &Settings) -> Result<(), BootstrapError> {
        let config = build_config.validate()?;
        info!(
            project = %config.project_name,
            work_dir = %settings.work_dir.display(),
            "Bootstrapping"
        );

        let resources = ResourceSet::new(&config, settings);
        let provisioned = self.provisioner.provision(&resources)?;
        let plan = InvocationPlan::from(provisioned);

        self.reporter
            .report_status(&format!("Starting {}...", config.project_name));
        self.launcher.launch(plan)?;
        Ok(())
    }
}
