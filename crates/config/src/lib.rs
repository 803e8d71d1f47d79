#![deny(clippy::pedantic, unsafe_code)]
#![allow(clippy::module_name_repetitions)]

//! Configuration management for pyfreeze
//!
//! This crate handles loading and merging configuration from:
//! - Default values (hard-coded)
//! - Configuration file (`--config`, `./pyfreeze.toml` or
//!   `~/.config/pyfreeze/config.toml`)
//! - Environment variables
//! - CLI flags

pub mod fixed_paths;

use pyfreeze_errors::{ConfigError, Error};
use pyfreeze_types::{ColorChoice, DataMapping, OutputFormat};
use serde::{Deserialize, Serialize};
use std::path::{Component, Path, PathBuf};
use tokio::fs;

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub general: GeneralConfig,

    #[serde(default)]
    pub build: BuildConfig,

    #[serde(default)]
    pub install: InstallConfig,

    #[serde(default)]
    pub bundle: BundleConfig,
}

/// General configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneralConfig {
    #[serde(default = "default_output_format")]
    pub default_output: OutputFormat,
    #[serde(default = "default_color_choice")]
    pub color: ColorChoice,
}

/// Pipeline paths and tools
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BuildConfig {
    /// Environment directory, relative to the working directory
    #[serde(default = "default_env_dir")]
    pub env_dir: PathBuf,
    /// Requirements manifest, relative to the working directory
    #[serde(default = "default_requirements_file")]
    pub requirements_file: PathBuf,
    /// Base interpreter used to create the environment (unset = platform default)
    #[serde(default)]
    pub python: Option<String>,
    /// Entry point used when `<project>.py` is absent; `/`-separated
    #[serde(default = "default_entry_point")]
    pub default_entry_point: String,
    /// Packager output directory
    #[serde(default = "default_dist_dir")]
    pub dist_dir: PathBuf,
    /// Packager intermediate directory
    #[serde(default = "default_work_dir")]
    pub work_dir: PathBuf,
}

/// Dependency installation configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct InstallConfig {
    /// Packages installed after the requirements, e.g. `pyinstaller`
    #[serde(default)]
    pub extra_packages: Vec<String>,
}

/// Data bundled with every build
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BundleConfig {
    /// Mappings added before the per-build data folders
    #[serde(default)]
    pub base_data: Vec<DataMapping>,
    /// Mappings added ahead of `base_data` when the default entry point is used
    #[serde(default = "default_fallback_data")]
    pub fallback_data: Vec<DataMapping>,
}

// Default implementations

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            default_output: OutputFormat::Tty,
            color: ColorChoice::Auto,
        }
    }
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            env_dir: default_env_dir(),
            requirements_file: default_requirements_file(),
            python: None,
            default_entry_point: default_entry_point(),
            dist_dir: default_dist_dir(),
            work_dir: default_work_dir(),
        }
    }
}

impl Default for BundleConfig {
    fn default() -> Self {
        Self {
            base_data: Vec::new(),
            fallback_data: default_fallback_data(),
        }
    }
}

// Default value functions for serde
fn default_output_format() -> OutputFormat {
    OutputFormat::Tty
}

fn default_color_choice() -> ColorChoice {
    ColorChoice::Auto
}

fn default_env_dir() -> PathBuf {
    PathBuf::from(".venv")
}

fn default_requirements_file() -> PathBuf {
    PathBuf::from("requirements.txt")
}

fn default_entry_point() -> String {
    "wezel/main.py".to_string()
}

fn default_dist_dir() -> PathBuf {
    PathBuf::from(fixed_paths::PACKAGER_DIST_DIR)
}

fn default_work_dir() -> PathBuf {
    PathBuf::from(fixed_paths::PACKAGER_WORK_DIR)
}

/// Icon sets and the package the default entry point lives in
fn default_fallback_data() -> Vec<DataMapping> {
    vec![
        DataMapping::folder("wezel/widgets/icons/my_icons"),
        DataMapping::folder("wezel/widgets/icons/fugue-icons-3.5.6"),
        DataMapping::folder("wezel"),
    ]
}

impl Config {
    /// Get the user-level config file path
    ///
    /// # Errors
    ///
    /// Returns an error if the system config directory cannot be determined.
    pub fn default_path() -> Result<PathBuf, Error> {
        let config_dir = dirs::config_dir().ok_or_else(|| ConfigError::NotFound {
            path: "config directory".to_string(),
        })?;
        Ok(config_dir.join("pyfreeze").join("config.toml"))
    }

    /// Load configuration from file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or if the file contents
    /// contain invalid TOML syntax that cannot be parsed.
    pub async fn load_from_file(path: &Path) -> Result<Self, Error> {
        let contents = fs::read_to_string(path)
            .await
            .map_err(|_| ConfigError::NotFound {
                path: path.display().to_string(),
            })?;

        let config: Self = toml::from_str(&contents).map_err(ConfigError::from)?;
        tracing::debug!(path = %path.display(), "loaded configuration file");
        Ok(config)
    }

    /// Load configuration for a working directory with fallback to defaults
    ///
    /// A `pyfreeze.toml` in the working directory wins over the user-level
    /// file.
    ///
    /// # Errors
    ///
    /// Returns an error if a configuration file exists but cannot be read
    /// or contains invalid TOML syntax.
    pub async fn load(workdir: &Path) -> Result<Self, Error> {
        let project_path = workdir.join(fixed_paths::CONFIG_FILE_NAME);
        if project_path.exists() {
            return Self::load_from_file(&project_path).await;
        }

        match Self::default_path() {
            Ok(user_path) if user_path.exists() => Self::load_from_file(&user_path).await,
            _ => Ok(Self::default()),
        }
    }

    /// Load configuration from an optional path or use default
    ///
    /// If path is provided, loads from that file.
    /// If path is None, uses the default loading behavior.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file cannot be read or parsed
    pub async fn load_or_default(path: Option<&Path>, workdir: &Path) -> Result<Self, Error> {
        match path {
            Some(config_path) => Self::load_from_file(config_path).await,
            None => Self::load(workdir).await,
        }
    }

    /// Merge with environment variables
    ///
    /// # Errors
    ///
    /// Returns an error if environment variables contain invalid values
    /// that cannot be parsed into the expected types.
    pub fn merge_env(&mut self) -> Result<(), Error> {
        // PYFREEZE_OUTPUT
        if let Ok(output) = std::env::var("PYFREEZE_OUTPUT") {
            self.general.default_output = match output.as_str() {
                "plain" => OutputFormat::Plain,
                "tty" => OutputFormat::Tty,
                "json" => OutputFormat::Json,
                _ => {
                    return Err(ConfigError::InvalidValue {
                        field: "PYFREEZE_OUTPUT".to_string(),
                        value: output,
                    }
                    .into())
                }
            };
        }

        // PYFREEZE_COLOR
        if let Ok(color) = std::env::var("PYFREEZE_COLOR") {
            self.general.color = match color.as_str() {
                "always" => ColorChoice::Always,
                "auto" => ColorChoice::Auto,
                "never" => ColorChoice::Never,
                _ => {
                    return Err(ConfigError::InvalidValue {
                        field: "PYFREEZE_COLOR".to_string(),
                        value: color,
                    }
                    .into())
                }
            };
        }

        // PYFREEZE_PYTHON
        if let Ok(python) = std::env::var("PYFREEZE_PYTHON") {
            if python.trim().is_empty() {
                return Err(ConfigError::InvalidValue {
                    field: "PYFREEZE_PYTHON".to_string(),
                    value: python,
                }
                .into());
            }
            self.build.python = Some(python);
        }

        // PYFREEZE_ENV_DIR
        if let Ok(env_dir) = std::env::var("PYFREEZE_ENV_DIR") {
            self.build.env_dir = PathBuf::from(env_dir);
        }

        // PYFREEZE_REQUIREMENTS
        if let Ok(requirements) = std::env::var("PYFREEZE_REQUIREMENTS") {
            self.build.requirements_file = PathBuf::from(requirements);
        }

        self.validate()
    }

    /// Reject values the pipeline cannot work with
    ///
    /// # Errors
    ///
    /// Returns an error if a directory the finalizer removes is empty or
    /// does not name a path strictly below the working directory.
    pub fn validate(&self) -> Result<(), Error> {
        for (field, path) in [
            ("build.env_dir", &self.build.env_dir),
            ("build.dist_dir", &self.build.dist_dir),
            ("build.work_dir", &self.build.work_dir),
        ] {
            let below_workdir = path.components().next().is_some()
                && path
                    .components()
                    .all(|component| matches!(component, Component::Normal(_)));
            if !below_workdir {
                return Err(ConfigError::InvalidValue {
                    field: field.to_string(),
                    value: path.display().to_string(),
                }
                .into());
            }
        }

        if self.build.default_entry_point.trim().is_empty() {
            return Err(ConfigError::Invalid {
                message: "build.default_entry_point must not be empty".to_string(),
            }
            .into());
        }

        Ok(())
    }

    /// Environment directory inside `workdir`
    #[must_use]
    pub fn env_path(&self, workdir: &Path) -> PathBuf {
        workdir.join(&self.build.env_dir)
    }

    /// Requirements manifest inside `workdir`
    #[must_use]
    pub fn requirements_path(&self, workdir: &Path) -> PathBuf {
        workdir.join(&self.build.requirements_file)
    }

    /// Packager output directory inside `workdir`
    #[must_use]
    pub fn dist_path(&self, workdir: &Path) -> PathBuf {
        workdir.join(&self.build.dist_dir)
    }

    /// Packager intermediate directory inside `workdir`
    #[must_use]
    pub fn work_path(&self, workdir: &Path) -> PathBuf {
        workdir.join(&self.build.work_dir)
    }

    /// Directory for debug log files inside `workdir`
    #[must_use]
    pub fn logs_path(workdir: &Path) -> PathBuf {
        workdir.join(fixed_paths::LOGS_DIR_NAME)
    }
}
