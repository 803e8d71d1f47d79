//! Process execution through `tokio::process`

use async_trait::async_trait;
use pyfreeze_errors::PlatformError;
use pyfreeze_events::{AppEvent, EventEmitter, PlatformEvent};
use std::process::Stdio;
use std::time::{Duration, Instant};
use tokio::process::Command;

use crate::core::PlatformContext;
use crate::process::{CommandOutput, PlatformCommand, ProcessOperations};

/// Runs commands on the host and waits for them with captured output
#[derive(Debug, Clone, Copy, Default)]
pub struct NativeProcessOperations;

impl NativeProcessOperations {
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

fn duration_to_millis(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}

fn emit_process_started(ctx: &PlatformContext, cmd: &PlatformCommand) {
    ctx.emit(AppEvent::Platform(PlatformEvent::ProcessExecutionStarted {
        command: cmd.program().to_string(),
        args: cmd.get_args().to_vec(),
        working_dir: cmd
            .get_current_dir()
            .map(|dir| dir.display().to_string()),
    }));
}

fn emit_process_completed(
    ctx: &PlatformContext,
    cmd: &PlatformCommand,
    output: &CommandOutput,
    duration: Duration,
) {
    ctx.emit(AppEvent::Platform(PlatformEvent::ProcessExecutionCompleted {
        command: cmd.program().to_string(),
        exit_code: output.exit_code,
        duration_ms: duration_to_millis(duration),
        stdout_bytes: output.stdout.len(),
        stderr_bytes: output.stderr.len(),
    }));
}

fn emit_process_failed(
    ctx: &PlatformContext,
    cmd: &PlatformCommand,
    error: &PlatformError,
    duration: Duration,
) {
    ctx.emit(AppEvent::Platform(PlatformEvent::ProcessExecutionFailed {
        command: cmd.program().to_string(),
        error_message: error.to_string(),
        duration_ms: duration_to_millis(duration),
    }));
}

#[async_trait]
impl ProcessOperations for NativeProcessOperations {
    async fn execute_command(
        &self,
        ctx: &PlatformContext,
        cmd: PlatformCommand,
    ) -> Result<CommandOutput, PlatformError> {
        let start = Instant::now();
        emit_process_started(ctx, &cmd);

        let mut command = Command::new(cmd.program());
        command
            .args(cmd.get_args())
            .stdin(Stdio::null())
            .kill_on_drop(true);

        if let Some(dir) = cmd.get_current_dir() {
            command.current_dir(dir);
        }
        for key in cmd.get_env_removals() {
            command.env_remove(key);
        }
        for (key, value) in cmd.get_env_vars() {
            command.env(key, value);
        }

        let result = command
            .output()
            .await
            .map(|output| CommandOutput {
                exit_code: output.status.code(),
                stdout: output.stdout,
                stderr: output.stderr,
            })
            .map_err(|e| {
                if e.kind() == std::io::ErrorKind::NotFound {
                    PlatformError::CommandNotFound {
                        command: cmd.program().to_string(),
                    }
                } else {
                    PlatformError::ProcessExecutionFailed {
                        command: cmd.program().to_string(),
                        message: e.to_string(),
                    }
                }
            });

        let duration = start.elapsed();
        match &result {
            Ok(output) => emit_process_completed(ctx, &cmd, output, duration),
            Err(e) => emit_process_failed(ctx, &cmd, e, duration),
        }

        result
    }
}
