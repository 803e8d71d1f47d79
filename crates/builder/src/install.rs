//! Dependency installation into a provisioned environment

use crate::context::PipelineContext;
use crate::environment::EnvironmentHandle;
use pyfreeze_errors::{Error, InstallError};
use pyfreeze_events::EventEmitter;
use pyfreeze_platform::{Platform, PlatformCommand};
use std::path::Path;

/// Installs the requirements manifest with the environment's `pip`
pub struct DependencyInstaller<'a> {
    platform: &'a Platform,
    extra_packages: Vec<String>,
}

impl<'a> DependencyInstaller<'a> {
    #[must_use]
    pub fn new(platform: &'a Platform) -> Self {
        Self {
            platform,
            extra_packages: Vec::new(),
        }
    }

    /// Packages installed with one more `pip` call after the requirements
    #[must_use]
    pub fn with_extra_packages(mut self, packages: Vec<String>) -> Self {
        self.extra_packages = packages;
        self
    }

    /// `pip install -r <requirements>` inside the environment
    #[must_use]
    pub fn requirements_command(
        handle: &EnvironmentHandle,
        requirements: &Path,
    ) -> PlatformCommand {
        let mut cmd = handle.python_module("pip");
        cmd.args(["install", "-r"])
            .arg(requirements.display().to_string());
        cmd
    }

    /// Install the requirements, then the extra packages
    ///
    /// # Errors
    ///
    /// Returns [`InstallError::RequirementsNotFound`] before running anything
    /// if the manifest is missing, and [`InstallError::PipFailed`] with the
    /// captured stderr if a `pip` call exits non-zero.
    pub async fn install(
        &self,
        ctx: &PipelineContext,
        handle: &EnvironmentHandle,
        requirements: &Path,
    ) -> Result<(), Error> {
        let platform_ctx = ctx.platform_context();
        let requirements = ctx.resolve(requirements);

        if !self
            .platform
            .filesystem()
            .exists(&platform_ctx, &requirements)
            .await
        {
            return Err(InstallError::RequirementsNotFound {
                path: requirements.display().to_string(),
            }
            .into());
        }

        let mut cmd = Self::requirements_command(handle, &requirements);
        cmd.current_dir(&ctx.workdir);
        self.run_pip(ctx, cmd, requirements.display().to_string())
            .await?;

        if !self.extra_packages.is_empty() {
            let mut cmd = handle.python_module("pip");
            cmd.arg("install")
                .args(&self.extra_packages)
                .current_dir(&ctx.workdir);
            self.run_pip(ctx, cmd, self.extra_packages.join(" "))
                .await?;
        }

        Ok(())
    }

    async fn run_pip(
        &self,
        ctx: &PipelineContext,
        cmd: PlatformCommand,
        target: String,
    ) -> Result<(), Error> {
        ctx.emit_debug(format!("Installing: {}", cmd.display_line()));

        let output = self
            .platform
            .execute_command(&ctx.platform_context(), cmd)
            .await
            .map_err(InstallError::from)?;

        if output.success() {
            Ok(())
        } else {
            Err(InstallError::PipFailed {
                target,
                exit_code: output.exit_code,
                stderr: output.stderr_text(),
            }
            .into())
        }
    }
}
