//! Platform-specific operation events

use serde::{Deserialize, Serialize};

/// Platform operation events for process execution and filesystem changes
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "event_type", rename_all = "snake_case")]
pub enum PlatformEvent {
    /// Process execution started
    ProcessExecutionStarted {
        /// Command being executed
        command: String,
        /// Command arguments
        args: Vec<String>,
        /// Working directory (if set)
        working_dir: Option<String>,
    },

    /// Process ran to completion, successfully or not
    ProcessExecutionCompleted {
        command: String,
        /// Exit code, `None` when killed by a signal
        exit_code: Option<i32>,
        duration_ms: u64,
        stdout_bytes: usize,
        stderr_bytes: usize,
    },

    /// Process could not be started
    ProcessExecutionFailed {
        command: String,
        error_message: String,
        duration_ms: u64,
    },

    /// Filesystem operation completed successfully
    FilesystemOperationCompleted {
        /// Operation name (e.g., `move_entry`, `remove_path`)
        operation: String,
        /// Paths affected by the operation
        paths_affected: Vec<String>,
    },
}
