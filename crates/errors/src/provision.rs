//! Environment provisioning error types

use std::borrow::Cow;

use crate::{exit_label, UserFacingError};
use thiserror::Error;

#[derive(Debug, Clone, Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[non_exhaustive]
pub enum ProvisionError {
    #[error("failed to create environment directory {path}: {message}")]
    DirectoryCreation { path: String, message: String },

    #[error("failed to start {program}: {message}")]
    Spawn { program: String, message: String },

    #[error("environment initialization failed ({}): {stderr}", exit_label(.exit_code))]
    CommandFailed {
        exit_code: Option<i32>,
        stderr: String,
    },

    #[error("environment interpreter not found at {path}")]
    InterpreterMissing { path: String },
}

impl UserFacingError for ProvisionError {
    fn user_message(&self) -> Cow<'_, str> {
        Cow::Owned(self.to_string())
    }

    fn user_hint(&self) -> Option<&'static str> {
        match self {
            Self::DirectoryCreation { .. } => {
                Some("Check that the working directory is writable.")
            }
            Self::Spawn { .. } => Some(
                "Install Python 3 or point `build.python` / PYFREEZE_PYTHON at an interpreter.",
            ),
            Self::CommandFailed { .. } | Self::InterpreterMissing { .. } => {
                Some("Make sure the base interpreter ships the `venv` module.")
            }
        }
    }

    fn user_code(&self) -> Option<&'static str> {
        let code = match self {
            Self::DirectoryCreation { .. } => "provision.directory_creation",
            Self::Spawn { .. } => "provision.spawn",
            Self::CommandFailed { .. } => "provision.command_failed",
            Self::InterpreterMissing { .. } => "provision.interpreter_missing",
        };
        Some(code)
    }
}
