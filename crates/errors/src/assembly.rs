//! Packaging tool error types

use std::borrow::Cow;

use crate::{exit_label, UserFacingError};
use thiserror::Error;

#[derive(Debug, Clone, Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[non_exhaustive]
pub enum AssemblyError {
    #[error("data source does not exist: {path}")]
    MissingDataSource { path: String },

    #[error("entry point not found: {path}")]
    MissingEntryPoint { path: String },

    #[error("failed to start packager: {message}")]
    Spawn { message: String },

    #[error("packager failed ({}): {stderr}", exit_label(.exit_code))]
    PackagerFailed {
        exit_code: Option<i32>,
        stderr: String,
    },

    #[error("packager succeeded but produced no artifact at {path}")]
    ArtifactMissing { path: String },

    #[error("project name '{project}' clashes with {path}")]
    ProjectNameConflict { project: String, path: String },
}

impl UserFacingError for AssemblyError {
    fn user_message(&self) -> Cow<'_, str> {
        Cow::Owned(self.to_string())
    }

    fn user_hint(&self) -> Option<&'static str> {
        match self {
            Self::MissingDataSource { .. } => {
                Some("Check the --data folders and `bundle.base_data` entries.")
            }
            Self::MissingEntryPoint { .. } => Some(
                "Create <project>.py in the working directory or set `build.default_entry_point`.",
            ),
            Self::Spawn { .. } | Self::PackagerFailed { .. } => {
                Some("Make sure PyInstaller is listed in requirements.txt or `install.extra_packages`.")
            }
            Self::ArtifactMissing { .. } => None,
            Self::ProjectNameConflict { .. } => Some(
                "The executable is named after the project; pick a name that is not an intermediate directory.",
            ),
        }
    }

    fn user_code(&self) -> Option<&'static str> {
        let code = match self {
            Self::MissingDataSource { .. } => "assembly.missing_data_source",
            Self::MissingEntryPoint { .. } => "assembly.missing_entry_point",
            Self::Spawn { .. } => "assembly.spawn",
            Self::PackagerFailed { .. } => "assembly.packager_failed",
            Self::ArtifactMissing { .. } => "assembly.artifact_missing",
            Self::ProjectNameConflict { .. } => "assembly.project_name_conflict",
        };
        Some(code)
    }
}
