//! Dependency installation error types

use std::borrow::Cow;

use crate::{exit_label, UserFacingError};
use thiserror::Error;

#[derive(Debug, Clone, Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[non_exhaustive]
pub enum InstallError {
    #[error("requirements manifest not found: {path}")]
    RequirementsNotFound { path: String },

    #[error("failed to start pip: {message}")]
    Spawn { message: String },

    #[error("pip install {target} failed ({}): {stderr}", exit_label(.exit_code))]
    PipFailed {
        target: String,
        exit_code: Option<i32>,
        stderr: String,
    },
}

impl UserFacingError for InstallError {
    fn user_message(&self) -> Cow<'_, str> {
        Cow::Owned(self.to_string())
    }

    fn user_hint(&self) -> Option<&'static str> {
        match self {
            Self::RequirementsNotFound { .. } => {
                Some("Create requirements.txt in the working directory before installing.")
            }
            Self::Spawn { .. } => Some("Re-run `pyfreeze install` to recreate the environment."),
            Self::PipFailed { .. } => Some(
                "Fix the unresolved requirement and re-run; the environment is not repaired automatically.",
            ),
        }
    }

    fn is_retryable(&self) -> bool {
        matches!(self, Self::PipFailed { .. })
    }

    fn user_code(&self) -> Option<&'static str> {
        let code = match self {
            Self::RequirementsNotFound { .. } => "install.requirements_not_found",
            Self::Spawn { .. } => "install.spawn",
            Self::PipFailed { .. } => "install.pip_failed",
        };
        Some(code)
    }
}
