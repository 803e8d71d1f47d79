//! The build pipeline state machine
//!
//! Stages run strictly in order: provisioning, installing, assembling,
//! finalizing. The first failure moves the pipeline to [`BuildStage::Failed`]
//! and aborts it. Nothing is cleaned up after a failure so the intermediate
//! state can be inspected; `clean` removes it later.

use crate::assemble::PackageAssembler;
use crate::context::PipelineContext;
use crate::environment::{EnvironmentHandle, EnvironmentProvisioner};
use crate::finalize::ArtifactFinalizer;
use crate::install::DependencyInstaller;
use pyfreeze_config::Config;
use pyfreeze_errors::{AssemblyError, Error, FinalizeError, InstallError};
use pyfreeze_events::{AppEvent, EventEmitter, EventSender, FailureContext, PipelineEvent};
use pyfreeze_platform::Platform;
use pyfreeze_types::{
    BuildManifest, BuildReport, BuildStage, DryRunReport, FinalizeReport, InstallReport,
    StageTiming,
};
use std::path::{Component, Path, PathBuf};
use std::time::{Duration, Instant};
use uuid::Uuid;

fn duration_to_millis(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}

/// One pipeline invocation
///
/// A pipeline runs a single operation. Once it reaches `Done` or `Failed`
/// every further operation is rejected; create a new pipeline instead.
pub struct BuildPipeline {
    platform: Platform,
    config: Config,
    ctx: PipelineContext,
    stage: BuildStage,
    timings: Vec<StageTiming>,
}

impl BuildPipeline {
    #[must_use]
    pub fn new(platform: Platform, config: Config, workdir: impl Into<PathBuf>) -> Self {
        Self {
            platform,
            config,
            ctx: PipelineContext::new(workdir),
            stage: BuildStage::Idle,
            timings: Vec::new(),
        }
    }

    /// Set event sender
    #[must_use]
    pub fn with_event_sender(mut self, event_sender: EventSender) -> Self {
        self.ctx = self.ctx.with_event_sender(event_sender);
        self
    }

    /// Current stage
    #[must_use]
    pub fn stage(&self) -> BuildStage {
        self.stage
    }

    #[must_use]
    pub fn session_id(&self) -> Uuid {
        self.ctx.session_id
    }

    #[must_use]
    pub fn context(&self) -> &PipelineContext {
        &self.ctx
    }

    #[must_use]
    pub fn platform(&self) -> &Platform {
        &self.platform
    }

    /// Provision the environment and install the requirements into it
    ///
    /// # Errors
    ///
    /// Returns [`InstallError::RequirementsNotFound`] before anything is
    /// created if the requirements manifest is missing, otherwise the first
    /// provisioning or installation failure.
    pub async fn install(&mut self) -> Result<InstallReport, Error> {
        let start = Instant::now();
        let handle = self.provision_and_install(None).await?;
        self.advance(BuildStage::Done)?;

        Ok(InstallReport {
            environment: handle.root().to_path_buf(),
            requirements: self.config.requirements_path(&self.ctx.workdir),
            extra_packages: self.config.install.extra_packages.clone(),
            duration_ms: duration_to_millis(start.elapsed()),
        })
    }

    /// Run every stage for `manifest` and publish the artifact
    ///
    /// # Errors
    ///
    /// Returns the first stage failure. The pipeline is left in
    /// [`BuildStage::Failed`] and nothing is cleaned up. A project named
    /// after an intermediate directory fails before anything runs.
    pub async fn build(&mut self, manifest: &BuildManifest) -> Result<BuildReport, Error> {
        let start = Instant::now();
        let handle = self.provision_and_install(Some(manifest)).await?;

        self.advance(BuildStage::Assembling)?;
        let stage_start = Instant::now();
        let result = self
            .assembler()
            .assemble(&self.ctx, &handle, manifest)
            .await;
        let dist_artifact = self.complete(BuildStage::Assembling, stage_start, result)?;

        self.advance(BuildStage::Finalizing)?;
        let stage_start = Instant::now();
        let artifact_path = match dist_artifact.file_name() {
            Some(name) => self.ctx.workdir.join(name),
            None => dist_artifact,
        };
        let result = self.publish(manifest, &artifact_path).await;
        self.complete(BuildStage::Finalizing, stage_start, result)?;
        self.advance(BuildStage::Done)?;
        self.ctx
            .emit(AppEvent::Pipeline(PipelineEvent::ArtifactReady {
                session_id: self.ctx.session(),
                project: manifest.project.clone(),
                path: artifact_path.clone(),
            }));

        Ok(BuildReport {
            session_id: self.ctx.session_id,
            project: manifest.project.clone(),
            artifact_path,
            single_file: manifest.single_file,
            stages: self.timings.clone(),
            duration_ms: duration_to_millis(start.elapsed()),
        })
    }

    /// Keyword-style entry point: build `project` with the given switches
    ///
    /// # Errors
    ///
    /// Same as [`BuildPipeline::build`].
    pub async fn build_with<S: AsRef<str>>(
        &mut self,
        project: &str,
        onefile: bool,
        terminal: bool,
        data_folders: &[S],
        hidden_modules: &[S],
    ) -> Result<BuildReport, Error> {
        let manifest = BuildManifest::new(project)
            .with_single_file(onefile)
            .with_console(terminal)
            .with_data_folders(data_folders.iter().map(|folder| folder.as_ref()))
            .with_hidden_modules(hidden_modules.iter().map(|module| module.as_ref()));
        self.build(&manifest).await
    }

    /// The packager command that `build` would run, without running anything
    ///
    /// # Errors
    ///
    /// Returns [`AssemblyError::ProjectNameConflict`] like `build` does, or a
    /// discovery error for `itk` builds when the environment does not exist
    /// yet or is ambiguous.
    pub async fn dry_run(&self, manifest: &BuildManifest) -> Result<DryRunReport, Error> {
        self.check_project_name(manifest)?;
        let handle = EnvironmentHandle::new(
            self.config.env_path(&self.ctx.workdir),
            self.platform.profile().clone(),
        );
        let invocation = self
            .assembler()
            .command_line(&self.ctx, &handle, manifest)
            .await?;

        Ok(DryRunReport {
            project: manifest.project.clone(),
            program: invocation.command.program().to_string(),
            args: invocation.command.get_args().to_vec(),
        })
    }

    /// Run the finalizer alone, e.g. after an interrupted build
    ///
    /// # Errors
    ///
    /// Returns the finalizer's error if a move or removal fails.
    pub async fn clean(&mut self, project: Option<&str>) -> Result<FinalizeReport, Error> {
        self.advance(BuildStage::Finalizing)?;
        let stage_start = Instant::now();
        let spec_file = project.map(|p| BuildManifest::new(p).spec_file_name());
        let result = self.finalizer(spec_file).finalize(&self.ctx).await;
        let report = self.complete(BuildStage::Finalizing, stage_start, result)?;
        self.advance(BuildStage::Done)?;
        Ok(report)
    }

    /// Preflight checks run inside the provisioning stage, then provision
    async fn provision_and_install(
        &mut self,
        manifest: Option<&BuildManifest>,
    ) -> Result<EnvironmentHandle, Error> {
        self.advance(BuildStage::Provisioning)?;
        let stage_start = Instant::now();
        let result = match self.preflight(manifest).await {
            Ok(()) => {
                EnvironmentProvisioner::new(&self.platform)
                    .with_base_interpreter(self.config.build.python.clone())
                    .provision(&self.ctx, &self.config.env_path(&self.ctx.workdir))
                    .await
            }
            Err(err) => Err(err),
        };
        let handle = self.complete(BuildStage::Provisioning, stage_start, result)?;

        self.advance(BuildStage::Installing)?;
        let stage_start = Instant::now();
        let result = DependencyInstaller::new(&self.platform)
            .with_extra_packages(self.config.install.extra_packages.clone())
            .install(
                &self.ctx,
                &handle,
                &self.config.requirements_path(&self.ctx.workdir),
            )
            .await;
        self.complete(BuildStage::Installing, stage_start, result)?;

        Ok(handle)
    }

    async fn preflight(&self, manifest: Option<&BuildManifest>) -> Result<(), Error> {
        if let Some(manifest) = manifest {
            self.check_project_name(manifest)?;
        }

        let requirements = self.config.requirements_path(&self.ctx.workdir);
        if !self
            .platform
            .filesystem()
            .exists(&self.ctx.platform_context(), &requirements)
            .await
        {
            return Err(InstallError::RequirementsNotFound {
                path: requirements.display().to_string(),
            }
            .into());
        }
        Ok(())
    }

    /// The project names files in the working directory, so it must not be
    /// a path or collide with a directory the finalizer removes
    fn check_project_name(&self, manifest: &BuildManifest) -> Result<(), Error> {
        let project = manifest.project.as_str();
        let conflict = |path: &Path| AssemblyError::ProjectNameConflict {
            project: project.to_string(),
            path: path.display().to_string(),
        };

        let mut components = Path::new(project).components();
        let plain_name = matches!(
            (components.next(), components.next()),
            (Some(Component::Normal(_)), None)
        ) && !project.contains(['/', '\\']);
        if !plain_name {
            return Err(conflict(Path::new(project)).into());
        }

        let names = [
            project.to_string(),
            self.platform.profile().executable_file_name(project),
            manifest.spec_file_name(),
        ];
        for dir in [
            &self.config.build.work_dir,
            &self.config.build.dist_dir,
            &self.config.build.env_dir,
        ] {
            let Some(Component::Normal(top)) = dir.components().next() else {
                continue;
            };
            if names.iter().any(|name| top == name.as_str()) {
                return Err(conflict(dir).into());
            }
        }
        Ok(())
    }

    /// Finalize, then make sure the artifact survived the cleanup
    async fn publish(
        &self,
        manifest: &BuildManifest,
        artifact_path: &Path,
    ) -> Result<FinalizeReport, Error> {
        let report = self
            .finalizer(Some(manifest.spec_file_name()))
            .finalize(&self.ctx)
            .await?;

        if !self
            .platform
            .filesystem()
            .exists(&self.ctx.platform_context(), artifact_path)
            .await
        {
            return Err(FinalizeError::NotPublished {
                path: artifact_path.display().to_string(),
            }
            .into());
        }
        Ok(report)
    }

    fn assembler(&self) -> PackageAssembler<'_> {
        PackageAssembler::new(&self.platform)
            .with_base_data(self.config.bundle.base_data.clone())
            .with_fallback_data(self.config.bundle.fallback_data.clone())
            .with_default_entry_point(self.config.build.default_entry_point.clone())
            .with_dist_dir(self.config.build.dist_dir.clone())
            .with_work_dir(self.config.build.work_dir.clone())
    }

    fn finalizer(&self, spec_file: Option<String>) -> ArtifactFinalizer<'_> {
        ArtifactFinalizer::new(
            &self.platform,
            self.config.build.dist_dir.clone(),
            self.config.build.work_dir.clone(),
            self.config.build.env_dir.clone(),
        )
        .with_spec_file(spec_file)
    }

    /// Move to `next`, announcing it unless it is terminal
    fn advance(&mut self, next: BuildStage) -> Result<(), Error> {
        if !self.stage.can_transition_to(next) {
            return Err(Error::internal(format!(
                "pipeline cannot move from {} to {next}",
                self.stage
            )));
        }
        self.stage = next;
        if !next.is_terminal() {
            self.ctx.emit_stage_started(self.ctx.session(), next);
        }
        Ok(())
    }

    /// Record the outcome of `stage`; a failure makes the pipeline terminal
    fn complete<T>(
        &mut self,
        stage: BuildStage,
        started: Instant,
        result: Result<T, Error>,
    ) -> Result<T, Error> {
        let duration = started.elapsed();
        match result {
            Ok(value) => {
                self.timings.push(StageTiming {
                    stage,
                    duration_ms: duration_to_millis(duration),
                });
                self.ctx
                    .emit_stage_completed(self.ctx.session(), stage, duration);
                Ok(value)
            }
            Err(err) => {
                self.stage = BuildStage::Failed;
                self.ctx.emit_stage_failed(
                    self.ctx.session(),
                    stage,
                    FailureContext::from_error(&err),
                );
                Err(err)
            }
        }
    }
}
