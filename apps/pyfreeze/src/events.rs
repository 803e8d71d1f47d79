//! Event handling and status display

use crate::logging::log_event_with_tracing;
use console::{style, Term};
use pyfreeze_events::{AppEvent, GeneralEvent, PipelineEvent, PlatformEvent};
use pyfreeze_types::BuildStage;

/// Event handler for status lines and user feedback
///
/// Status goes to stderr so stdout stays reserved for the final result.
pub struct EventHandler {
    /// Whether colors are supported/enabled
    colors_enabled: bool,
    /// Whether debug mode is enabled
    debug_enabled: bool,
    /// Suppress status lines entirely (JSON output)
    quiet: bool,
    term: Term,
}

impl EventHandler {
    pub fn new(colors_enabled: bool, debug_enabled: bool) -> Self {
        Self {
            colors_enabled,
            debug_enabled,
            quiet: false,
            term: Term::stderr(),
        }
    }

    /// Keep logging events but print nothing
    pub fn quiet(mut self, quiet: bool) -> Self {
        self.quiet = quiet;
        self
    }

    /// Handle incoming event
    pub fn handle_event(&mut self, event: AppEvent) {
        log_event_with_tracing(&event);

        if let Some(line) = self.format_event(&event) {
            self.print(&line);
        }
    }

    /// Status line for `event`, or `None` if it is not shown
    fn format_event(&self, event: &AppEvent) -> Option<String> {
        match event {
            AppEvent::General(general) => self.format_general(general),
            AppEvent::Pipeline(pipeline) => self.format_pipeline(pipeline),
            AppEvent::Platform(platform) if self.debug_enabled => {
                Some(self.format_platform(platform))
            }
            AppEvent::Platform(_) => None,
        }
    }

    fn format_general(&self, event: &GeneralEvent) -> Option<String> {
        match event {
            GeneralEvent::Warning { message, context } => {
                let text = match context {
                    Some(context) => format!("{message} ({context})"),
                    None => message.clone(),
                };
                Some(format!("{} {text}", self.paint_warn("warning:")))
            }
            GeneralEvent::Error { message, details } => {
                let text = match details {
                    Some(details) => format!("{message}: {details}"),
                    None => message.clone(),
                };
                Some(format!("{} {text}", self.paint_error("error:")))
            }
            GeneralEvent::DebugLog { message, context } if self.debug_enabled => {
                if context.is_empty() {
                    Some(self.paint_dim(&format!("debug: {message}")))
                } else {
                    let mut pairs: Vec<_> = context
                        .iter()
                        .map(|(key, value)| format!("{key}={value}"))
                        .collect();
                    pairs.sort();
                    Some(self.paint_dim(&format!("debug: {message} [{}]", pairs.join(" "))))
                }
            }
            GeneralEvent::DebugLog { .. } => None,
        }
    }

    fn format_pipeline(&self, event: &PipelineEvent) -> Option<String> {
        match event {
            PipelineEvent::StageStarted { stage, .. } => Some(format!(
                "{} {}",
                self.paint_step("==>"),
                stage_title(*stage)
            )),
            PipelineEvent::StageCompleted {
                stage, duration, ..
            } => self.debug_enabled.then(|| {
                self.paint_dim(&format!("    {stage} finished in {}ms", duration.as_millis()))
            }),
            PipelineEvent::StageFailed { stage, failure, .. } => {
                let mut line = format!(
                    "{} {stage} failed: {}",
                    self.paint_error("error:"),
                    failure.message
                );
                if let Some(code) = &failure.code {
                    line.push_str(&format!(" [{code}]"));
                }
                Some(line)
            }
            PipelineEvent::EnvironmentReady { path, .. } => {
                Some(format!("    environment ready at {}", path.display()))
            }
            PipelineEvent::EntryPointSelected { path, fallback, .. } => {
                if *fallback {
                    Some(format!(
                        "{} using fallback entry point {path}",
                        self.paint_warn("note:")
                    ))
                } else {
                    Some(format!("    entry point {path}"))
                }
            }
            PipelineEvent::PackageDataLocated { module, path, .. } => Some(format!(
                "    bundling {module} data from {}",
                path.display()
            )),
            PipelineEvent::CommandPrepared { program, args, .. } => self
                .debug_enabled
                .then(|| self.paint_dim(&format!("    $ {program} {}", args.join(" ")))),
            PipelineEvent::ArtifactMoved { from, to, .. } => self.debug_enabled.then(|| {
                self.paint_dim(&format!("    moved {} -> {}", from.display(), to.display()))
            }),
            PipelineEvent::PathRemoved { path, .. } => self
                .debug_enabled
                .then(|| self.paint_dim(&format!("    removed {}", path.display()))),
            PipelineEvent::ArtifactReady { project, path, .. } => Some(format!(
                "{} built {project} -> {}",
                self.paint_success("==>"),
                path.display()
            )),
        }
    }

    fn format_platform(&self, event: &PlatformEvent) -> String {
        let text = match event {
            PlatformEvent::ProcessExecutionStarted { command, args, .. } => {
                format!("    exec {command} {}", args.join(" "))
            }
            PlatformEvent::ProcessExecutionCompleted {
                command,
                exit_code,
                duration_ms,
                ..
            } => match exit_code {
                Some(code) => format!("    {command} exited with {code} after {duration_ms}ms"),
                None => format!("    {command} terminated by signal after {duration_ms}ms"),
            },
            PlatformEvent::ProcessExecutionFailed {
                command,
                error_message,
                ..
            } => format!("    {command} could not start: {error_message}"),
            PlatformEvent::FilesystemOperationCompleted {
                operation,
                paths_affected,
            } => format!("    {operation} {}", paths_affected.join(", ")),
        };
        self.paint_dim(&text)
    }

    fn print(&self, line: &str) {
        if self.quiet {
            return;
        }
        // A closed stderr is not worth failing the build over
        let _ = self.term.write_line(line);
    }

    fn paint_step(&self, text: &str) -> String {
        if self.colors_enabled {
            style(text).cyan().bold().to_string()
        } else {
            text.to_string()
        }
    }

    fn paint_success(&self, text: &str) -> String {
        if self.colors_enabled {
            style(text).green().bold().to_string()
        } else {
            text.to_string()
        }
    }

    fn paint_warn(&self, text: &str) -> String {
        if self.colors_enabled {
            style(text).yellow().bold().to_string()
        } else {
            text.to_string()
        }
    }

    fn paint_error(&self, text: &str) -> String {
        if self.colors_enabled {
            style(text).red().bold().to_string()
        } else {
            text.to_string()
        }
    }

    fn paint_dim(&self, text: &str) -> String {
        if self.colors_enabled {
            style(text).dim().to_string()
        } else {
            text.to_string()
        }
    }
}

fn stage_title(stage: BuildStage) -> &'static str {
    match stage {
        BuildStage::Provisioning => "Creating isolated environment",
        BuildStage::Installing => "Installing requirements",
        BuildStage::Assembling => "Running packager",
        BuildStage::Finalizing => "Collecting artifact and cleaning up",
        BuildStage::Idle | BuildStage::Done | BuildStage::Failed => "Waiting",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pyfreeze_events::FailureContext;
    use std::path::PathBuf;
    use std::time::Duration;

    fn session() -> String {
        "s-1".to_string()
    }

    #[test]
    fn test_stage_started_is_always_shown() {
        let handler = EventHandler::new(false, false);
        let line = handler.format_event(&AppEvent::Pipeline(PipelineEvent::StageStarted {
            session_id: session(),
            stage: BuildStage::Installing,
        }));
        assert_eq!(line.as_deref(), Some("==> Installing requirements"));
    }

    #[test]
    fn test_debug_only_events_are_hidden_by_default() {
        let handler = EventHandler::new(false, false);
        let command = AppEvent::Pipeline(PipelineEvent::CommandPrepared {
            session_id: session(),
            program: "python".to_string(),
            args: vec!["-m".to_string(), "PyInstaller".to_string()],
        });
        let process = AppEvent::Platform(PlatformEvent::ProcessExecutionStarted {
            command: "python".to_string(),
            args: vec![],
            working_dir: None,
        });
        let completed = AppEvent::Pipeline(PipelineEvent::StageCompleted {
            session_id: session(),
            stage: BuildStage::Provisioning,
            duration: Duration::from_millis(12),
        });

        assert!(handler.format_event(&command).is_none());
        assert!(handler.format_event(&process).is_none());
        assert!(handler.format_event(&completed).is_none());

        let debug = EventHandler::new(false, true);
        assert_eq!(
            debug.format_event(&command).as_deref(),
            Some("    $ python -m PyInstaller")
        );
        assert!(debug.format_event(&process).is_some());
        assert_eq!(
            debug.format_event(&completed).as_deref(),
            Some("    provisioning finished in 12ms")
        );
    }

    #[test]
    fn test_stage_failure_includes_code() {
        let handler = EventHandler::new(false, false);
        let line = handler
            .format_event(&AppEvent::Pipeline(PipelineEvent::StageFailed {
                session_id: session(),
                stage: BuildStage::Assembling,
                failure: FailureContext::new(
                    Some("assembly.packager_failed"),
                    "packager exited with status 1",
                    None::<String>,
                    false,
                ),
            }))
            .unwrap();
        assert_eq!(
            line,
            "error: assembling failed: packager exited with status 1 [assembly.packager_failed]"
        );
    }

    #[test]
    fn test_fallback_entry_point_is_called_out() {
        let handler = EventHandler::new(false, false);
        let line = handler
            .format_event(&AppEvent::Pipeline(PipelineEvent::EntryPointSelected {
                session_id: session(),
                path: "wezel/main.py".to_string(),
                fallback: true,
            }))
            .unwrap();
        assert!(line.starts_with("note:"));
        assert!(line.contains("wezel/main.py"));
    }

    #[test]
    fn test_artifact_ready_and_quiet_mode() {
        let mut handler = EventHandler::new(false, false).quiet(true);
        let event = AppEvent::Pipeline(PipelineEvent::ArtifactReady {
            session_id: session(),
            project: "myapp".to_string(),
            path: PathBuf::from("/w/myapp"),
        });
        assert_eq!(
            handler.format_event(&event).as_deref(),
            Some("==> built myapp -> /w/myapp")
        );
        handler.handle_event(event);
    }
}
