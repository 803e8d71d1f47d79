//! Build pipeline events

use crate::FailureContext;
use pyfreeze_types::BuildStage;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Events emitted by the provisioning, install, assembly and finalize stages
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum PipelineEvent {
    /// A stage began
    StageStarted { session_id: String, stage: BuildStage },

    /// A stage finished successfully
    StageCompleted {
        session_id: String,
        stage: BuildStage,
        duration: Duration,
    },

    /// A stage failed; the pipeline stops here
    StageFailed {
        session_id: String,
        stage: BuildStage,
        failure: FailureContext,
    },

    /// Isolated environment created and usable
    EnvironmentReady {
        session_id: String,
        path: PathBuf,
        activation: String,
    },

    /// Packager invocation about to run
    CommandPrepared {
        session_id: String,
        program: String,
        args: Vec<String>,
    },

    /// Entry-point script chosen for the packager
    EntryPointSelected {
        session_id: String,
        path: String,
        fallback: bool,
    },

    /// Installed package directory located for bundling
    PackageDataLocated {
        session_id: String,
        module: String,
        path: PathBuf,
    },

    /// Packager output moved into the working directory
    ArtifactMoved {
        session_id: String,
        from: PathBuf,
        to: PathBuf,
    },

    /// Intermediate path deleted
    PathRemoved { session_id: String, path: PathBuf },

    /// Final executable available
    ArtifactReady {
        session_id: String,
        project: String,
        path: PathBuf,
    },
}

impl PipelineEvent {
    /// Session this event belongs to
    #[must_use]
    pub fn session_id(&self) -> &str {
        match self {
            Self::StageStarted { session_id, .. }
            | Self::StageCompleted { session_id, .. }
            | Self::StageFailed { session_id, .. }
            | Self::EnvironmentReady { session_id, .. }
            | Self::CommandPrepared { session_id, .. }
            | Self::EntryPointSelected { session_id, .. }
            | Self::PackageDataLocated { session_id, .. }
            | Self::ArtifactMoved { session_id, .. }
            | Self::PathRemoved { session_id, .. }
            | Self::ArtifactReady { session_id, .. } => session_id,
        }
    }
}
