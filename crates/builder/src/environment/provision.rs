//! Environment creation

use super::EnvironmentHandle;
use crate::context::PipelineContext;
use pyfreeze_errors::{Error, ProvisionError};
use pyfreeze_events::{AppEvent, EventEmitter, PipelineEvent};
use pyfreeze_platform::{Platform, PlatformCommand};
use std::path::Path;

/// Creates an isolated environment with the base interpreter's `venv` module
pub struct EnvironmentProvisioner<'a> {
    platform: &'a Platform,
    base_interpreter: Option<String>,
}

impl<'a> EnvironmentProvisioner<'a> {
    #[must_use]
    pub fn new(platform: &'a Platform) -> Self {
        Self {
            platform,
            base_interpreter: None,
        }
    }

    /// Use `program` instead of the profile's base interpreter
    #[must_use]
    pub fn with_base_interpreter(mut self, program: Option<String>) -> Self {
        self.base_interpreter = program;
        self
    }

    /// Command that initializes an environment in `directory`
    #[must_use]
    pub fn venv_command(&self, directory: &Path) -> PlatformCommand {
        let (program, leading) = match &self.base_interpreter {
            Some(program) => (program.clone(), Vec::new()),
            None => self.platform.profile().base_interpreter(),
        };

        let mut cmd = self.platform.command(&program);
        cmd.args(leading)
            .args(["-m", "venv"])
            .arg(directory.display().to_string());
        cmd
    }

    /// Create `directory` if needed and initialize an environment in it
    ///
    /// # Errors
    ///
    /// Returns a [`ProvisionError`] if the directory cannot be created, the
    /// base interpreter cannot be started or exits non-zero, or the
    /// environment has no interpreter afterwards.
    pub async fn provision(
        &self,
        ctx: &PipelineContext,
        directory: &Path,
    ) -> Result<EnvironmentHandle, Error> {
        let platform_ctx = ctx.platform_context();
        let directory = ctx.resolve(directory);

        self.platform
            .filesystem()
            .create_dir_all(&platform_ctx, &directory)
            .await
            .map_err(|e| ProvisionError::DirectoryCreation {
                path: directory.display().to_string(),
                message: e.to_string(),
            })?;

        let mut cmd = self.venv_command(&directory);
        cmd.current_dir(&ctx.workdir);
        ctx.emit_debug(format!("Creating environment: {}", cmd.display_line()));

        let output = self
            .platform
            .execute_command(&platform_ctx, cmd)
            .await
            .map_err(ProvisionError::from)?;

        if !output.success() {
            return Err(ProvisionError::CommandFailed {
                exit_code: output.exit_code,
                stderr: output.stderr_text(),
            }
            .into());
        }

        let handle = EnvironmentHandle::new(directory, self.platform.profile().clone());
        let interpreter = handle.interpreter();
        if !self
            .platform
            .filesystem()
            .exists(&platform_ctx, &interpreter)
            .await
        {
            return Err(ProvisionError::InterpreterMissing {
                path: interpreter.display().to_string(),
            }
            .into());
        }

        ctx.emit(AppEvent::Pipeline(PipelineEvent::EnvironmentReady {
            session_id: ctx.session(),
            path: handle.root().to_path_buf(),
            activation: handle.activation_command(),
        }));

        Ok(handle)
    }
}
