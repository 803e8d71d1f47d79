//! Command line interface definition

use clap::{Parser, Subcommand};
use pyfreeze_types::ColorChoice;
use std::path::PathBuf;

/// pyfreeze - Freeze Python applications into standalone executables
#[derive(Parser)]
#[command(name = "pyfreeze")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Freeze Python applications into standalone executables")]
#[command(long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[command(flatten)]
    pub global: GlobalArgs,
}

/// Global arguments available for all commands
#[derive(Parser)]
pub struct GlobalArgs {
    /// Output in JSON format
    #[arg(long, global = true)]
    pub json: bool,

    /// Write JSON debug logs to .pyfreeze-logs/ in the working directory
    #[arg(long, global = true)]
    pub debug: bool,

    /// Color output control
    #[arg(long, global = true, value_enum)]
    pub color: Option<ColorChoice>,

    /// Use alternate config file
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Run as if started in DIR
    #[arg(short = 'C', long, global = true, value_name = "DIR")]
    pub workdir: Option<PathBuf>,
}

/// Available commands
#[derive(Subcommand)]
pub enum Commands {
    /// Create the isolated environment and install requirements.txt into it
    #[command(alias = "i")]
    Install,

    /// Build a standalone executable from <project>.py
    #[command(alias = "b")]
    Build {
        /// Entry-point file stem; also the executable name
        project: String,

        /// Produce a directory bundle instead of a single file
        #[arg(long)]
        onedir: bool,

        /// Keep a console window attached to the executable
        #[arg(long)]
        terminal: bool,

        /// Folder bundled under the same name (repeatable)
        #[arg(long = "data", value_name = "DIR")]
        data_folders: Vec<String>,

        /// Module the packager cannot detect on its own (repeatable)
        #[arg(long = "hidden-import", value_name = "MODULE")]
        hidden_imports: Vec<String>,

        /// Print the packager command without running anything
        #[arg(long)]
        dry_run: bool,
    },

    /// Remove build leftovers and the environment after an interrupted build
    Clean {
        /// Project whose spec file should be removed too
        project: Option<String>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_build_flags() {
        let cli = Cli::parse_from([
            "pyfreeze",
            "-C",
            "/work",
            "build",
            "myapp",
            "--onedir",
            "--data",
            "assets",
            "--data",
            "icons",
            "--hidden-import",
            "dbdicom",
        ]);

        assert_eq!(cli.global.workdir, Some(PathBuf::from("/work")));
        match cli.command {
            Commands::Build {
                project,
                onedir,
                terminal,
                data_folders,
                hidden_imports,
                dry_run,
            } => {
                assert_eq!(project, "myapp");
                assert!(onedir);
                assert!(!terminal);
                assert!(!dry_run);
                assert_eq!(data_folders, ["assets", "icons"]);
                assert_eq!(hidden_imports, ["dbdicom"]);
            }
            _ => panic!("expected build command"),
        }
    }
}
