//! Packager invocation
//!
//! The packager is driven through a structured argument list built from a
//! [`BuildManifest`]. Data mappings are rendered with the profile's
//! separators and appear in a fixed order: the fallback data when the
//! default entry point is used, configured base data, the ITK package
//! directory when `itk` is a hidden module, then the manifest's own mappings.

use crate::context::PipelineContext;
use crate::environment::EnvironmentHandle;
use pyfreeze_config::fixed_paths::{PACKAGER_DIST_DIR, PACKAGER_MODULE, PACKAGER_WORK_DIR};
use pyfreeze_errors::{AssemblyError, Error};
use pyfreeze_events::{AppEvent, EventEmitter, PipelineEvent};
use pyfreeze_platform::{Platform, PlatformCommand};
use pyfreeze_types::{BuildManifest, DataMapping, ITK_MODULE};
use std::path::{Path, PathBuf};

/// Entry-point script chosen for a build
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EntryPoint {
    /// Path passed to the packager, relative to the working directory
    pub path: String,
    /// Whether the configured default was used because `<project>.py` is absent
    pub fallback: bool,
}

/// A fully prepared packager invocation
#[derive(Clone, Debug)]
pub struct PackagerInvocation {
    pub command: PlatformCommand,
    pub entry_point: EntryPoint,
    /// Every mapping passed with `--add-data`, in order
    pub data_mappings: Vec<DataMapping>,
}

/// Runs the packager inside a provisioned environment
pub struct PackageAssembler<'a> {
    platform: &'a Platform,
    base_data: Vec<DataMapping>,
    fallback_data: Vec<DataMapping>,
    default_entry_point: String,
    dist_dir: PathBuf,
    work_dir: PathBuf,
}

impl<'a> PackageAssembler<'a> {
    #[must_use]
    pub fn new(platform: &'a Platform) -> Self {
        Self {
            platform,
            base_data: Vec::new(),
            fallback_data: Vec::new(),
            default_entry_point: "wezel/main.py".to_string(),
            dist_dir: PathBuf::from(PACKAGER_DIST_DIR),
            work_dir: PathBuf::from(PACKAGER_WORK_DIR),
        }
    }

    /// Mappings bundled ahead of everything else
    #[must_use]
    pub fn with_base_data(mut self, base_data: Vec<DataMapping>) -> Self {
        self.base_data = base_data;
        self
    }

    /// `/`-separated mappings bundled only with the default entry point
    #[must_use]
    pub fn with_fallback_data(mut self, fallback_data: Vec<DataMapping>) -> Self {
        self.fallback_data = fallback_data;
        self
    }

    /// `/`-separated entry point used when `<project>.py` is absent
    #[must_use]
    pub fn with_default_entry_point(mut self, entry_point: impl Into<String>) -> Self {
        self.default_entry_point = entry_point.into();
        self
    }

    /// Packager output directory, relative to the working directory
    #[must_use]
    pub fn with_dist_dir(mut self, dist_dir: impl Into<PathBuf>) -> Self {
        self.dist_dir = dist_dir.into();
        self
    }

    /// Packager intermediate directory, relative to the working directory
    #[must_use]
    pub fn with_work_dir(mut self, work_dir: impl Into<PathBuf>) -> Self {
        self.work_dir = work_dir.into();
        self
    }

    /// Pick `<project>.py` if it exists, else the default entry point
    pub async fn entry_point(&self, ctx: &PipelineContext, manifest: &BuildManifest) -> EntryPoint {
        let script = manifest.entry_script_name();
        let exists = self
            .platform
            .filesystem()
            .exists(&ctx.platform_context(), &ctx.workdir.join(&script))
            .await;

        if exists {
            EntryPoint {
                path: script,
                fallback: false,
            }
        } else {
            EntryPoint {
                path: self
                    .platform
                    .profile()
                    .native_path(&self.default_entry_point),
                fallback: true,
            }
        }
    }

    /// All `--add-data` mappings in packager order
    ///
    /// # Errors
    ///
    /// Returns a discovery error if the ITK package directory is needed but
    /// the environment's installed-packages directory is ambiguous.
    pub async fn data_mappings(
        &self,
        ctx: &PipelineContext,
        handle: &EnvironmentHandle,
        manifest: &BuildManifest,
        entry_point: &EntryPoint,
    ) -> Result<Vec<DataMapping>, Error> {
        let profile = self.platform.profile();
        let mut mappings = Vec::new();
        if entry_point.fallback {
            mappings.extend(self.fallback_data.iter().map(|mapping| {
                DataMapping::new(
                    profile.native_path(&mapping.source),
                    profile.native_path(&mapping.destination),
                )
            }));
        }
        mappings.extend(self.base_data.iter().cloned());

        if manifest.needs_itk_data() {
            let site_packages = profile.site_packages(handle.root()).await?;
            let itk = site_packages.join(ITK_MODULE);
            ctx.emit(AppEvent::Pipeline(PipelineEvent::PackageDataLocated {
                session_id: ctx.session(),
                module: ITK_MODULE.to_string(),
                path: itk.clone(),
            }));
            mappings.push(DataMapping::new(itk.display().to_string(), ITK_MODULE));
        }

        mappings.extend(manifest.data_mappings.iter().cloned());
        Ok(mappings)
    }

    /// Build the packager invocation without running it
    ///
    /// Only reads the filesystem: the entry-point lookup and, for `itk`
    /// builds, the installed-packages discovery.
    ///
    /// # Errors
    ///
    /// Returns a discovery error if the ITK package directory cannot be
    /// located.
    pub async fn command_line(
        &self,
        ctx: &PipelineContext,
        handle: &EnvironmentHandle,
        manifest: &BuildManifest,
    ) -> Result<PackagerInvocation, Error> {
        let profile = self.platform.profile();
        let entry_point = self.entry_point(ctx, manifest).await;
        let data_mappings = self
            .data_mappings(ctx, handle, manifest, &entry_point)
            .await?;

        let mut cmd = handle.python_module(PACKAGER_MODULE);
        cmd.args(["--name", manifest.project.as_str(), "--clean"]);
        if manifest.single_file {
            cmd.arg("--onefile");
        }
        if !manifest.show_console {
            cmd.arg("--noconsole");
        }
        for module in manifest.hidden_modules() {
            cmd.args(["--hidden-import", module.as_str()]);
        }
        for mapping in &data_mappings {
            cmd.arg(format!(
                "--add-data={}",
                mapping.render(profile.data_separator(), profile.path_separator())
            ));
        }
        for module in manifest.collect_data_modules() {
            cmd.args(["--collect-datas", module]);
        }
        if self.dist_dir != Path::new(PACKAGER_DIST_DIR) {
            cmd.arg("--distpath").arg(self.dist_dir.display().to_string());
        }
        if self.work_dir != Path::new(PACKAGER_WORK_DIR) {
            cmd.arg("--workpath").arg(self.work_dir.display().to_string());
        }
        cmd.arg(&entry_point.path).current_dir(&ctx.workdir);

        Ok(PackagerInvocation {
            command: cmd,
            entry_point,
            data_mappings,
        })
    }

    /// Where the packager leaves its output for `manifest`
    #[must_use]
    pub fn artifact_path(&self, workdir: &Path, manifest: &BuildManifest) -> PathBuf {
        let name = if manifest.single_file {
            self.platform
                .profile()
                .executable_file_name(&manifest.project)
        } else {
            manifest.project.clone()
        };
        workdir.join(&self.dist_dir).join(name)
    }

    /// Run the packager and return the path of what it produced
    ///
    /// # Errors
    ///
    /// Fails before the packager runs if the entry point or a data source is
    /// missing. Fails afterwards with the captured stderr if the packager
    /// exits non-zero, or if the expected artifact was not produced.
    pub async fn assemble(
        &self,
        ctx: &PipelineContext,
        handle: &EnvironmentHandle,
        manifest: &BuildManifest,
    ) -> Result<PathBuf, Error> {
        let platform_ctx = ctx.platform_context();
        let invocation = self.command_line(ctx, handle, manifest).await?;

        let entry = ctx.workdir.join(&invocation.entry_point.path);
        if !self.platform.filesystem().exists(&platform_ctx, &entry).await {
            return Err(AssemblyError::MissingEntryPoint {
                path: entry.display().to_string(),
            }
            .into());
        }

        for mapping in &invocation.data_mappings {
            let source = ctx.resolve(Path::new(&mapping.source));
            if !self.platform.filesystem().exists(&platform_ctx, &source).await {
                return Err(AssemblyError::MissingDataSource {
                    path: source.display().to_string(),
                }
                .into());
            }
        }

        ctx.emit(AppEvent::Pipeline(PipelineEvent::EntryPointSelected {
            session_id: ctx.session(),
            path: invocation.entry_point.path.clone(),
            fallback: invocation.entry_point.fallback,
        }));
        ctx.emit(AppEvent::Pipeline(PipelineEvent::CommandPrepared {
            session_id: ctx.session(),
            program: invocation.command.program().to_string(),
            args: invocation.command.get_args().to_vec(),
        }));

        let output = self
            .platform
            .execute_command(&platform_ctx, invocation.command)
            .await
            .map_err(AssemblyError::from)?;

        if !output.success() {
            return Err(AssemblyError::PackagerFailed {
                exit_code: output.exit_code,
                stderr: output.stderr_text(),
            }
            .into());
        }

        let artifact = self.artifact_path(&ctx.workdir, manifest);
        if !self.platform.filesystem().exists(&platform_ctx, &artifact).await {
            return Err(AssemblyError::ArtifactMissing {
                path: artifact.display().to_string(),
            }
            .into());
        }

        Ok(artifact)
    }
}
