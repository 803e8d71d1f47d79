//! Isolated Python environments

mod provision;

pub use provision::EnvironmentProvisioner;

use pyfreeze_platform::{PlatformCommand, PlatformProfile};
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// A provisioned environment directory
///
/// Commands built through the handle run with the environment's interpreter
/// and the variables a shell activation would set, so no shell is involved.
#[derive(Clone, Debug)]
pub struct EnvironmentHandle {
    root: PathBuf,
    profile: Arc<dyn PlatformProfile>,
}

impl EnvironmentHandle {
    /// Wrap an existing environment directory without checking it
    #[must_use]
    pub fn new(root: impl Into<PathBuf>, profile: Arc<dyn PlatformProfile>) -> Self {
        Self {
            root: root.into(),
            profile,
        }
    }

    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    #[must_use]
    pub fn profile(&self) -> &Arc<dyn PlatformProfile> {
        &self.profile
    }

    /// What a user would type to activate this environment in a shell
    #[must_use]
    pub fn activation_command(&self) -> String {
        self.profile.activation_command(&self.root)
    }

    /// The environment's own interpreter
    #[must_use]
    pub fn interpreter(&self) -> PathBuf {
        self.profile.interpreter_path(&self.root)
    }

    #[must_use]
    pub fn scripts_path(&self) -> PathBuf {
        self.root.join(self.profile.scripts_dir())
    }

    /// Variables set by activation: `VIRTUAL_ENV` and `PATH` with the
    /// scripts directory first
    #[must_use]
    pub fn env_vars(&self) -> Vec<(String, OsString)> {
        let mut path = self.scripts_path().into_os_string();
        if let Some(inherited) = std::env::var_os("PATH").filter(|p| !p.is_empty()) {
            path.push(self.profile.path_list_separator().to_string());
            path.push(inherited);
        }

        vec![
            ("VIRTUAL_ENV".to_string(), self.root.clone().into_os_string()),
            ("PATH".to_string(), path),
        ]
    }

    /// Command scoped to the environment
    #[must_use]
    pub fn command(&self, program: &str) -> PlatformCommand {
        let mut cmd = PlatformCommand::new(program);
        for (key, value) in self.env_vars() {
            cmd.env(key, value);
        }
        cmd.env_remove("PYTHONHOME");
        cmd
    }

    /// `<interpreter> -m <module>` scoped to the environment
    #[must_use]
    pub fn python_module(&self, module: &str) -> PlatformCommand {
        let mut cmd = self.command(&self.interpreter().display().to_string());
        cmd.args(["-m", module]);
        cmd
    }
}
