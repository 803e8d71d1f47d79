//! Build pipeline stages

use serde::{Deserialize, Serialize};
use std::fmt;

/// Where a build invocation currently is
///
/// Stages only move forward. Any stage may fall into `Failed`, which is
/// terminal: there is no retry or resume.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BuildStage {
    Idle,
    Provisioning,
    Installing,
    Assembling,
    Finalizing,
    Done,
    Failed,
}

impl BuildStage {
    /// Check whether moving from `self` to `next` is allowed
    #[must_use]
    pub fn can_transition_to(self, next: Self) -> bool {
        use BuildStage::{Assembling, Done, Failed, Finalizing, Idle, Installing, Provisioning};

        match (self, next) {
            (Done | Failed, _) => false,
            (_, Failed) => self != Idle,
            (Idle, Provisioning | Finalizing)
            | (Provisioning, Installing)
            | (Installing, Assembling | Done)
            | (Assembling, Finalizing)
            | (Finalizing, Done) => true,
            _ => false,
        }
    }

    /// Whether no further transition is possible
    #[must_use]
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Done | Self::Failed)
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Provisioning => "provisioning",
            Self::Installing => "installing",
            Self::Assembling => "assembling",
            Self::Finalizing => "finalizing",
            Self::Done => "done",
            Self::Failed => "failed",
        }
    }
}

impl Default for BuildStage {
    fn default() -> Self {
        Self::Idle
    }
}

impl fmt::Display for BuildStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
