//! Installed-package discovery error types

use std::borrow::Cow;

use crate::UserFacingError;
use thiserror::Error;

#[derive(Debug, Clone, Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[non_exhaustive]
pub enum DiscoveryError {
    #[error("no interpreter directory found under {path}")]
    NoCandidate { path: String },

    #[error("expected one interpreter directory under {path}, found {}: {}", .candidates.len(), .candidates.join(", "))]
    Ambiguous {
        path: String,
        candidates: Vec<String>,
    },

    #[error("cannot read {path}: {message}")]
    Unreadable { path: String, message: String },
}

impl UserFacingError for DiscoveryError {
    fn user_message(&self) -> Cow<'_, str> {
        Cow::Owned(self.to_string())
    }

    fn user_hint(&self) -> Option<&'static str> {
        match self {
            Self::NoCandidate { .. } | Self::Unreadable { .. } => {
                Some("The environment looks incomplete; run `pyfreeze clean` and build again.")
            }
            Self::Ambiguous { .. } => {
                Some("Remove the stale interpreter directories from the environment's lib folder.")
            }
        }
    }

    fn user_code(&self) -> Option<&'static str> {
        let code = match self {
            Self::NoCandidate { .. } => "discovery.no_candidate",
            Self::Ambiguous { .. } => "discovery.ambiguous",
            Self::Unreadable { .. } => "discovery.unreadable",
        };
        Some(code)
    }
}
