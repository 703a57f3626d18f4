//! Hands execution over to the provisioned launcher.
use crate::defaults::SDK_MODULES;
use crate::provisioner::Provisioned;
use std::ffi::OsString;
use std::io;
use std::path::PathBuf;
use std::process::{Child, Command, ExitStatus, Stdio};
use thiserror::Error;
use tracing::{debug, info, instrument};

#[derive(Debug, Error)]
pub enum LaunchError {
    #[error("failed to start {}: {source}", executable.display())]
    Spawn {
        executable: PathBuf,
        source: io::Error,
    },
    #[error("failed waiting for the launcher: {0}")]
    Wait(io::Error),
    #[error("the launcher exited with {}", code.map_or("no exit code".to_string(), |c| format!("code {c}")))]
    ChildFailed { code: Option<i32> },
}

/// Whether the bootstrap waits for the launcher.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum LaunchMode {
    /// Start the launcher and return as soon as it is running.
    #[default]
    Detached,
    /// Share standard streams with the launcher and wait for it to exit.
    Attached,
}

/// Executable and arguments of the launcher process, consumed once.
#[derive(Debug, Clone, PartialEq)]
pub struct InvocationPlan {
    pub executable: PathBuf,
    pub args: Vec<OsString>,
}

impl From<Provisioned> for InvocationPlan {
    fn from(provisioned: Provisioned) -> Self {
        let mut args = Vec::new();
        if let Some(sdk_library) = provisioned.sdk_library {
            args.push("--module-path".into());
            args.push(sdk_library.into_os_string());
            args.push("--add-modules".into());
            args.push(SDK_MODULES.into());
        }
        args.push("-jar".into());
        args.push(provisioned.launcher.into_os_string());

        Self {
            executable: provisioned.runtime_executable,
            args,
        }
    }
}

pub trait Launch {
    fn launch(&self, plan: InvocationPlan) -> Result<(), LaunchError>;
}

pub struct Unstarted {
    command: Command,
}

pub struct Started {
    child: Child,
}

pub struct ProcessRunner<State = Unstarted> {
    executable: PathBuf,
    state: State,
}

impl ProcessRunner {
    pub fn new(plan: InvocationPlan, mode: LaunchMode) -> Self {
        let mut command = Command::new(&plan.executable);
        command.args(&plan.args);
        match mode {
            LaunchMode::Attached => {
                command
                    .stdin(Stdio::inherit())
                    .stdout(Stdio::inherit())
                    .stderr(Stdio::inherit());
            }
            LaunchMode::Detached => {
                command
                    .stdin(Stdio::null())
                    .stdout(Stdio::null())
                    .stderr(Stdio::null());
                #[cfg(target_family = "unix")]
                {
                    use std::os::unix::process::CommandExt;
                    // Own process group, so signals sent to ours do not reach it
                    command.process_group(0);
                }
            }
        }

        Self {
            executable: plan.executable,
            state: Unstarted { command },
        }
    }

    pub fn start(mut self) -> Result<ProcessRunner<Started>, LaunchError> {
        let child = self
            .state
            .command
            .spawn()
            .map_err(|source| LaunchError::Spawn {
                executable: self.executable.clone(),
                source,
            })?;
        Ok(ProcessRunner {
            executable: self.executable,
            state: Started { child },
        })
    }
}

impl ProcessRunner<Started> {
    pub fn pid(&self) -> u32 {
        self.state.child.id()
    }

    pub fn wait(mut self) -> Result<ExitStatus, LaunchError> {
        self.state.child.wait().map_err(LaunchError::Wait)
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct ProcessLauncher {
    mode: LaunchMode,
}

impl ProcessLauncher {
    pub fn new(mode: LaunchMode) -> Self {
        Self { mode }
    }
}

impl Launch for ProcessLauncher {
    #[instrument(skip_all, fields(executable = %plan.executable.display(), mode = ?self.mode))]
    fn launch(&self, plan: InvocationPlan) -> Result<(), LaunchError> {
        debug!(args = ?plan.args, "Starting launcher");
        let runner = ProcessRunner::new(plan, self.mode).start()?;
        let pid = runner.pid();

        match self.mode {
            LaunchMode::Detached => {
                info!(pid, "Launcher started");
                Ok(())
            }
            LaunchMode::Attached => {
                info!(pid, "Launcher started, waiting for it to exit");
                let status = runner.wait()?;
                debug!(%status, "Launcher exited");
                if status.success() {
                    Ok(())
                } else {
                    Err(LaunchError::ChildFailed {
                        code: status.code(),
                    })
                }
            }
        }
    }
}
