//! Publishing the artifact and removing intermediates

use crate::context::PipelineContext;
use pyfreeze_errors::{Error, FinalizeError};
use pyfreeze_events::{AppEvent, EventEmitter, GeneralEvent, PipelineEvent};
use pyfreeze_platform::{Platform, PlatformContext};
use pyfreeze_types::FinalizeReport;
use std::path::{Path, PathBuf};

/// Moves packager output into the working directory and deletes every
/// intermediate artifact
///
/// Absent paths are skipped, so finalizing twice succeeds. An existing
/// destination is only replaced when it looks like the output of an earlier
/// build; anything else aborts before the first move. Not transactional
/// past that point: a failure leaves whatever was already moved or removed.
pub struct ArtifactFinalizer<'a> {
    platform: &'a Platform,
    dist_dir: PathBuf,
    work_dir: PathBuf,
    env_dir: PathBuf,
    spec_file: Option<String>,
}

impl<'a> ArtifactFinalizer<'a> {
    /// Directories are relative to the working directory
    #[must_use]
    pub fn new(
        platform: &'a Platform,
        dist_dir: impl Into<PathBuf>,
        work_dir: impl Into<PathBuf>,
        env_dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            platform,
            dist_dir: dist_dir.into(),
            work_dir: work_dir.into(),
            env_dir: env_dir.into(),
            spec_file: None,
        }
    }

    /// Also remove the spec file the packager wrote for a project
    #[must_use]
    pub fn with_spec_file(mut self, spec_file: Option<String>) -> Self {
        self.spec_file = spec_file;
        self
    }

    /// Paths removed after the output has been moved, in removal order
    #[must_use]
    pub fn removal_targets(&self) -> Vec<PathBuf> {
        let mut targets = vec![self.work_dir.clone(), self.dist_dir.clone()];
        if let Some(spec) = &self.spec_file {
            targets.push(PathBuf::from(spec));
        }
        targets.push(self.env_dir.clone());
        targets
    }

    /// Whether `dest` may be overwritten by the output entry `name`
    ///
    /// A plain file is a stale one-file executable. A directory must hold the
    /// executable of the same name to count as an earlier one-dir bundle.
    async fn replaceable(&self, platform_ctx: &PlatformContext, name: &str, dest: &Path) -> bool {
        let fs = self.platform.filesystem();
        if !fs.is_dir(platform_ctx, dest).await {
            return true;
        }
        let launcher = dest.join(self.platform.profile().executable_file_name(name));
        fs.exists(platform_ctx, &launcher).await && !fs.is_dir(platform_ctx, &launcher).await
    }

    /// # Errors
    ///
    /// Returns [`FinalizeError::DestinationExists`] before anything moves if
    /// an output entry would overwrite a path that no build produced.
    /// Otherwise returns a [`FinalizeError`] carrying the offending path if
    /// the output directory cannot be read or an entry cannot be moved or
    /// removed.
    pub async fn finalize(&self, ctx: &PipelineContext) -> Result<FinalizeReport, Error> {
        let platform_ctx = ctx.platform_context();
        let fs = self.platform.filesystem();
        let mut report = FinalizeReport::default();

        let dist = ctx.resolve(&self.dist_dir);
        let entries = fs
            .list_dir(&platform_ctx, &dist)
            .await
            .map_err(|e| FinalizeError::ReadOutput {
                path: dist.display().to_string(),
                message: e.to_string(),
            })?;

        let mut moves = Vec::with_capacity(entries.len());
        for from in entries {
            let Some(name) = from.file_name() else {
                continue;
            };
            let to = ctx.workdir.join(name);
            if fs.exists(&platform_ctx, &to).await {
                if !self
                    .replaceable(&platform_ctx, &name.to_string_lossy(), &to)
                    .await
                {
                    return Err(FinalizeError::DestinationExists {
                        path: to.display().to_string(),
                    }
                    .into());
                }
                ctx.emit(AppEvent::General(GeneralEvent::warning_with_context(
                    "replacing output of an earlier build",
                    to.display().to_string(),
                )));
            }
            moves.push((from, to));
        }

        for (from, to) in moves {
            fs.move_entry(&platform_ctx, &from, &to)
                .await
                .map_err(|e| FinalizeError::Move {
                    from: from.display().to_string(),
                    to: to.display().to_string(),
                    message: e.to_string(),
                })?;

            ctx.emit(AppEvent::Pipeline(PipelineEvent::ArtifactMoved {
                session_id: ctx.session(),
                from,
                to: to.clone(),
            }));
            report.moved.push(to);
        }

        for target in self.removal_targets() {
            let path = ctx.resolve(&target);
            let removed = fs
                .remove_path(&platform_ctx, &path)
                .await
                .map_err(|e| FinalizeError::Remove {
                    path: path.display().to_string(),
                    message: e.to_string(),
                })?;

            if removed {
                ctx.emit(AppEvent::Pipeline(PipelineEvent::PathRemoved {
                    session_id: ctx.session(),
                    path: path.clone(),
                }));
                report.removed.push(path);
            }
        }

        Ok(report)
    }
}
