//! Platform-specific operation errors

use std::borrow::Cow;

use crate::{AssemblyError, InstallError, ProvisionError, UserFacingError};
use thiserror::Error;

/// Errors that can occur during platform-specific operations
#[derive(Debug, Clone, Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PlatformError {
    #[error("filesystem operation failed: {operation} - {message}")]
    FilesystemOperationFailed { operation: String, message: String },

    #[error("process execution failed: {command} - {message}")]
    ProcessExecutionFailed { command: String, message: String },

    #[error("command not found: {command}")]
    CommandNotFound { command: String },
}

impl UserFacingError for PlatformError {
    fn user_message(&self) -> Cow<'_, str> {
        Cow::Owned(self.to_string())
    }

    fn user_code(&self) -> Option<&'static str> {
        let code = match self {
            Self::FilesystemOperationFailed { .. } => "platform.filesystem_operation_failed",
            Self::ProcessExecutionFailed { .. } => "platform.process_execution_failed",
            Self::CommandNotFound { .. } => "platform.command_not_found",
        };
        Some(code)
    }
}

impl From<PlatformError> for ProvisionError {
    fn from(err: PlatformError) -> Self {
        match err {
            PlatformError::ProcessExecutionFailed { command, message } => ProvisionError::Spawn {
                program: command,
                message,
            },
            PlatformError::CommandNotFound { command } => ProvisionError::Spawn {
                program: command.clone(),
                message: format!("command not found: {command}"),
            },
            PlatformError::FilesystemOperationFailed { operation, message } => {
                ProvisionError::DirectoryCreation {
                    path: operation,
                    message,
                }
            }
        }
    }
}

impl From<PlatformError> for InstallError {
    fn from(err: PlatformError) -> Self {
        InstallError::Spawn {
            message: err.to_string(),
        }
    }
}

impl From<PlatformError> for AssemblyError {
    fn from(err: PlatformError) -> Self {
        AssemblyError::Spawn {
            message: err.to_string(),
        }
    }
}
