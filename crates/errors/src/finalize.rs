//! Artifact finalization error types

use std::borrow::Cow;

use crate::UserFacingError;
use thiserror::Error;

#[derive(Debug, Clone, Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[non_exhaustive]
pub enum FinalizeError {
    #[error("failed to move {from} to {to}: {message}")]
    Move {
        from: String,
        to: String,
        message: String,
    },

    #[error("failed to remove {path}: {message}")]
    Remove { path: String, message: String },

    #[error("failed to read output directory {path}: {message}")]
    ReadOutput { path: String, message: String },

    #[error("refusing to replace {path}: it was not produced by an earlier build")]
    DestinationExists { path: String },

    #[error("artifact missing after cleanup: {path}")]
    NotPublished { path: String },
}

impl UserFacingError for FinalizeError {
    fn user_message(&self) -> Cow<'_, str> {
        Cow::Owned(self.to_string())
    }

    fn user_hint(&self) -> Option<&'static str> {
        match self {
            Self::DestinationExists { .. } => Some(
                "Rename the project or move the existing path away; the packager output is kept in the output directory.",
            ),
            Self::NotPublished { .. } => {
                Some("The artifact name collides with an intermediate directory; rename the project.")
            }
            _ => Some(
                "Cleanup is not transactional; inspect the working directory and run `pyfreeze clean`.",
            ),
        }
    }

    fn is_retryable(&self) -> bool {
        !matches!(
            self,
            Self::DestinationExists { .. } | Self::NotPublished { .. }
        )
    }

    fn user_code(&self) -> Option<&'static str> {
        let code = match self {
            Self::Move { .. } => "finalize.move",
            Self::Remove { .. } => "finalize.remove",
            Self::ReadOutput { .. } => "finalize.read_output",
            Self::DestinationExists { .. } => "finalize.destination_exists",
            Self::NotPublished { .. } => "finalize.not_published",
        };
        Some(code)
    }
}
