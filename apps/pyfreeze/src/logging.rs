//! Structured logging integration for events
//!
//! Converts pipeline and platform events into tracing records with
//! structured fields, so `--debug` log files carry the same information the
//! terminal shows.

use pyfreeze_events::{AppEvent, GeneralEvent, PipelineEvent, PlatformEvent};
use tracing::{debug, error, info, warn};

/// Log an `AppEvent` using the tracing infrastructure with structured fields
pub fn log_event_with_tracing(event: &AppEvent) {
    let source = event.event_source();
    let source = source.as_str();

    match event {
        AppEvent::General(general_event) => match general_event {
            GeneralEvent::Warning { message, context } => {
                warn!(source, context = ?context, "{message}");
            }
            GeneralEvent::Error { message, details } => {
                error!(source, details = ?details, "{message}");
            }
            GeneralEvent::DebugLog { message, context } => {
                debug!(source, context = ?context, "{message}");
            }
        },

        AppEvent::Pipeline(pipeline_event) => log_pipeline_event(source, pipeline_event),

        AppEvent::Platform(platform_event) => match platform_event {
            PlatformEvent::ProcessExecutionStarted {
                command,
                args,
                working_dir,
            } => {
                debug!(
                    source,
                    command = %command,
                    args = ?args,
                    working_dir = ?working_dir,
                    "Process execution started"
                );
            }
            PlatformEvent::ProcessExecutionCompleted {
                command,
                exit_code,
                duration_ms,
                stdout_bytes,
                stderr_bytes,
            } => {
                debug!(
                    source,
                    command = %command,
                    exit_code = ?exit_code,
                    duration_ms,
                    stdout_bytes,
                    stderr_bytes,
                    "Process execution completed"
                );
            }
            PlatformEvent::ProcessExecutionFailed {
                command,
                error_message,
                duration_ms,
            } => {
                error!(
                    source,
                    command = %command,
                    error = %error_message,
                    duration_ms,
                    "Process execution failed"
                );
            }
            PlatformEvent::FilesystemOperationCompleted {
                operation,
                paths_affected,
            } => {
                debug!(
                    source,
                    operation = %operation,
                    paths = ?paths_affected,
                    "Filesystem operation completed"
                );
            }
        },
    }
}

fn log_pipeline_event(source: &str, event: &PipelineEvent) {
    match event {
        PipelineEvent::StageStarted { session_id, stage } => {
            info!(source, session_id = %session_id, stage = %stage, "Stage started");
        }
        PipelineEvent::StageCompleted {
            session_id,
            stage,
            duration,
        } => {
            info!(
                source,
                session_id = %session_id,
                stage = %stage,
                duration_ms = u64::try_from(duration.as_millis()).unwrap_or(u64::MAX),
                "Stage completed"
            );
        }
        PipelineEvent::StageFailed {
            session_id,
            stage,
            failure,
        } => {
            error!(
                source,
                session_id = %session_id,
                stage = %stage,
                retryable = failure.retryable,
                code = ?failure.code,
                message = %failure.message,
                hint = ?failure.hint,
                "Stage failed"
            );
        }
        PipelineEvent::EnvironmentReady {
            session_id,
            path,
            activation,
        } => {
            info!(
                source,
                session_id = %session_id,
                path = %path.display(),
                activation = %activation,
                "Environment ready"
            );
        }
        PipelineEvent::CommandPrepared {
            session_id,
            program,
            args,
        } => {
            debug!(
                source,
                session_id = %session_id,
                program = %program,
                args = ?args,
                "Packager command prepared"
            );
        }
        PipelineEvent::EntryPointSelected {
            session_id,
            path,
            fallback,
        } => {
            info!(
                source,
                session_id = %session_id,
                path = %path,
                fallback,
                "Entry point selected"
            );
        }
        PipelineEvent::PackageDataLocated {
            session_id,
            module,
            path,
        } => {
            info!(
                source,
                session_id = %session_id,
                module = %module,
                path = %path.display(),
                "Package data located"
            );
        }
        PipelineEvent::ArtifactMoved {
            session_id,
            from,
            to,
        } => {
            info!(
                source,
                session_id = %session_id,
                from = %from.display(),
                to = %to.display(),
                "Artifact moved"
            );
        }
        PipelineEvent::PathRemoved { session_id, path } => {
            info!(
                source,
                session_id = %session_id,
                path = %path.display(),
                "Path removed"
            );
        }
        PipelineEvent::ArtifactReady {
            session_id,
            project,
            path,
        } => {
            info!(
                source,
                session_id = %session_id,
                project = %project,
                path = %path.display(),
                "Artifact ready"
            );
        }
    }
}
