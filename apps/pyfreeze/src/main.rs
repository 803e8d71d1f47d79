//! pyfreeze - Freeze Python applications into standalone executables
//!
//! This is the CLI application that drives the build pipeline and renders
//! its events and results.

mod cli;
mod display;
mod error;
mod events;
mod logging;

use crate::cli::{Cli, Commands};
use crate::display::{OperationResult, OutputRenderer};
use crate::error::CliError;
use crate::events::EventHandler;
use clap::Parser;
use pyfreeze_builder::BuildPipeline;
use pyfreeze_config::Config;
use pyfreeze_events::EventReceiver;
use pyfreeze_platform::Platform;
use pyfreeze_types::{BuildManifest, ColorChoice, OutputFormat};
use std::path::{Path, PathBuf};
use std::process;
use tokio::select;
use tracing::{error, info};

#[tokio::main]
async fn main() {
    // Parse command line arguments first to check for JSON mode
    let cli = Cli::parse();
    let json_mode = cli.global.json;

    let workdir = match resolve_workdir(cli.global.workdir.as_deref()) {
        Ok(dir) => dir,
        Err(e) => {
            eprintln!("Error: {e}");
            process::exit(1);
        }
    };

    init_tracing(json_mode, cli.global.debug, &workdir);

    if let Err(e) = run(cli, workdir).await {
        error!(code = ?e.code(), "Application error: {}", e);
        eprintln!("Error: {e}");
        process::exit(1);
    }
}

/// Main application logic
async fn run(cli: Cli, workdir: PathBuf) -> Result<(), CliError> {
    info!(workdir = %workdir.display(), "Starting pyfreeze v{}", env!("CARGO_PKG_VERSION"));

    // Load configuration with proper precedence:
    // 1. Start with file config (or defaults)
    let mut config = Config::load_or_default(cli.global.config.as_deref(), &workdir).await?;

    // 2. Merge environment variables
    config.merge_env()?;

    // 3. Apply CLI flags (highest precedence)
    apply_cli_config(&mut config, &cli.global);

    let json_output =
        cli.global.json || matches!(config.general.default_output, OutputFormat::Json);
    let renderer = OutputRenderer::new(json_output, config.general.color);

    let colors_enabled = match config.general.color {
        ColorChoice::Always => true,
        ColorChoice::Never => false,
        ColorChoice::Auto => console::Term::stderr().features().colors_supported(),
    };
    let mut event_handler = EventHandler::new(colors_enabled, cli.global.debug).quiet(json_output);

    let (event_sender, event_receiver) = pyfreeze_events::channel();
    let pipeline = BuildPipeline::new(Platform::current(), config, workdir)
        .with_event_sender(event_sender);

    let result =
        execute_command_with_events(cli.command, pipeline, event_receiver, &mut event_handler)
            .await?;

    renderer.render_result(&result)?;

    info!("Command completed successfully");
    Ok(())
}

/// Execute command with concurrent event handling
async fn execute_command_with_events(
    command: Commands,
    pipeline: BuildPipeline,
    mut event_receiver: EventReceiver,
    event_handler: &mut EventHandler,
) -> Result<OperationResult, CliError> {
    let mut command_future = Box::pin(execute_command(command, pipeline));

    // Handle events concurrently with command execution
    loop {
        select! {
            // Command completed
            result = &mut command_future => {
                // Drain any remaining events
                while let Ok(event) = event_receiver.try_recv() {
                    event_handler.handle_event(event);
                }
                return result;
            }

            // Event received
            event = event_receiver.recv() => {
                match event {
                    Some(event) => event_handler.handle_event(event),
                    None => { /* Channel closed: keep waiting for command to finish */ }
                }
            }
        }
    }
}

/// Execute the specified command
async fn execute_command(
    command: Commands,
    mut pipeline: BuildPipeline,
) -> Result<OperationResult, CliError> {
    match command {
        Commands::Install => {
            let report = pipeline.install().await?;
            Ok(OperationResult::Install(report))
        }

        Commands::Build {
            project,
            onedir,
            terminal,
            data_folders,
            hidden_imports,
            dry_run,
        } => {
            validate_project_name(&project)?;
            let manifest = BuildManifest::new(project)
                .with_single_file(!onedir)
                .with_console(terminal)
                .with_data_folders(data_folders)
                .with_hidden_modules(hidden_imports);

            if dry_run {
                let report = pipeline.dry_run(&manifest).await?;
                return Ok(OperationResult::DryRun(report));
            }

            let report = pipeline.build(&manifest).await?;
            Ok(OperationResult::Build(report))
        }

        Commands::Clean { project } => {
            if let Some(project) = &project {
                validate_project_name(project)?;
            }
            let report = pipeline.clean(project.as_deref()).await?;
            Ok(OperationResult::Clean(report))
        }
    }
}

/// The project name doubles as a file stem in the working directory
fn validate_project_name(project: &str) -> Result<(), CliError> {
    if project.trim().is_empty() {
        return Err(CliError::InvalidArguments(
            "project name must not be empty".to_string(),
        ));
    }
    if project.contains(['/', '\\']) || project == "." || project == ".." {
        return Err(CliError::InvalidArguments(format!(
            "project name '{project}' must be a file stem, not a path"
        )));
    }
    Ok(())
}

fn resolve_workdir(requested: Option<&Path>) -> Result<PathBuf, CliError> {
    let current = std::env::current_dir()?;
    let workdir = match requested {
        Some(dir) if dir.is_absolute() => dir.to_path_buf(),
        Some(dir) => current.join(dir),
        None => current,
    };
    if !workdir.is_dir() {
        return Err(CliError::InvalidArguments(format!(
            "working directory {} does not exist",
            workdir.display()
        )));
    }
    Ok(workdir)
}

/// Initialize tracing/logging
fn init_tracing(json_mode: bool, debug_enabled_flag: bool, workdir: &Path) {
    // Check if debug logging is enabled
    let debug_enabled = std::env::var("RUST_LOG").is_ok() || debug_enabled_flag;

    if debug_enabled {
        // Debug mode: structured JSON logs to file
        let log_dir = Config::logs_path(workdir);
        if let Err(e) = std::fs::create_dir_all(&log_dir) {
            if !json_mode {
                eprintln!("Warning: Failed to create log directory: {e}");
            }
        }

        let log_file = log_dir.join(format!(
            "pyfreeze-{}.log",
            chrono::Utc::now().format("%Y%m%d-%H%M%S")
        ));

        match std::fs::File::create(&log_file) {
            Ok(file) => {
                tracing_subscriber::fmt()
                    .json()
                    .with_writer(file)
                    .with_env_filter(
                        tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(
                            |_| {
                                tracing_subscriber::EnvFilter::new(
                                    "info,pyfreeze=debug,pyfreeze_builder=debug",
                                )
                            },
                        ),
                    )
                    .init();

                if !json_mode {
                    eprintln!("Debug logging enabled: {}", log_file.display());
                }
                return;
            }
            Err(e) => {
                if !json_mode {
                    eprintln!("Warning: Failed to create log file: {e}");
                }
            }
        }
    }

    if json_mode {
        // JSON mode: suppress all console output to avoid contaminating JSON
        tracing_subscriber::fmt()
            .with_writer(std::io::sink)
            .with_env_filter("off")
            .init();
    } else {
        // Normal mode: minimal logging to stderr
        tracing_subscriber::fmt()
            .with_writer(std::io::stderr)
            .with_env_filter(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
            )
            .init();
    }
}

/// Apply CLI configuration overrides (highest precedence)
fn apply_cli_config(config: &mut Config, global: &cli::GlobalArgs) {
    if let Some(color) = global.color {
        config.general.color = color;
    }
    if global.json {
        config.general.default_output = OutputFormat::Json;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_project_name_must_be_a_stem() {
        assert!(validate_project_name("myapp").is_ok());
        assert!(validate_project_name("my_app-2").is_ok());
        assert!(validate_project_name("").is_err());
        assert!(validate_project_name("src/myapp").is_err());
        assert!(validate_project_name("..\\myapp").is_err());
        assert!(validate_project_name("..").is_err());
    }

    #[test]
    fn test_cli_flags_override_config() {
        let cli = Cli::parse_from(["pyfreeze", "--json", "--color", "never", "install"]);
        let mut config = Config::default();
        apply_cli_config(&mut config, &cli.global);
        assert_eq!(config.general.color, ColorChoice::Never);
        assert_eq!(config.general.default_output, OutputFormat::Json);
    }

    #[test]
    fn test_relative_workdir_resolves_against_current_dir() {
        let current = std::env::current_dir().unwrap();
        assert_eq!(resolve_workdir(None).unwrap(), current);
        assert_eq!(resolve_workdir(Some(Path::new("."))).unwrap(), current.join("."));
        assert!(resolve_workdir(Some(Path::new("definitely/not/here"))).is_err());
    }
}
