//! Report type definitions for pipeline operations

use crate::BuildStage;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use uuid::Uuid;

/// Environment installation report
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct InstallReport {
    /// Provisioned environment directory
    pub environment: PathBuf,
    /// Requirements manifest that was installed
    pub requirements: PathBuf,
    /// Extra packages installed after the requirements
    pub extra_packages: Vec<String>,
    /// Total execution time
    pub duration_ms: u64,
}

/// Build report
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct BuildReport {
    /// Session identifier shared by every event of this build
    pub session_id: Uuid,
    /// Project that was built
    pub project: String,
    /// Final executable (or bundle directory) in the working directory
    pub artifact_path: PathBuf,
    /// Whether a single-file executable was produced
    pub single_file: bool,
    /// Per-stage timings in execution order
    pub stages: Vec<StageTiming>,
    /// Total execution time
    pub duration_ms: u64,
}

/// Wall-clock time spent in one stage
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct StageTiming {
    pub stage: BuildStage,
    pub duration_ms: u64,
}

/// What the finalizer did to the working tree
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct FinalizeReport {
    /// Entries moved out of the packager output directory
    pub moved: Vec<PathBuf>,
    /// Paths that existed and were deleted
    pub removed: Vec<PathBuf>,
}

/// Packager invocation that would run, without running it
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DryRunReport {
    pub project: String,
    pub program: String,
    pub args: Vec<String>,
}
