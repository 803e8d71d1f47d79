//! Platform profiles
//!
//! A profile captures every host-dependent convention the pipeline relies
//! on: separators, the layout of an isolated environment, how it is
//! activated, where its installed packages live and which interpreter
//! creates it. Exactly one profile is selected per run.

mod posix;
mod windows;

pub use posix::PosixProfile;
pub use windows::WindowsProfile;

use async_trait::async_trait;
use pyfreeze_errors::DiscoveryError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Host platform family
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlatformKind {
    Windows,
    Posix,
}

impl PlatformKind {
    /// Family of the host this binary was compiled for
    #[must_use]
    pub fn host() -> Self {
        if cfg!(windows) {
            Self::Windows
        } else {
            Self::Posix
        }
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Windows => "windows",
            Self::Posix => "posix",
        }
    }
}

impl fmt::Display for PlatformKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Host-dependent conventions for one platform family
#[async_trait]
pub trait PlatformProfile: fmt::Debug + Send + Sync {
    fn kind(&self) -> PlatformKind;

    /// Separator between path components
    fn path_separator(&self) -> char;

    /// Separator between source and destination in a packager data mapping
    fn data_separator(&self) -> char;

    /// Separator between entries of `PATH`
    fn path_list_separator(&self) -> char;

    /// Directory inside an environment that holds its executables
    fn scripts_dir(&self) -> &'static str;

    /// Shell command a user would type to activate the environment
    fn activation_command(&self, env_dir: &Path) -> String;

    /// Interpreter inside the environment
    fn interpreter_path(&self, env_dir: &Path) -> PathBuf;

    /// Program and leading arguments that run the base interpreter
    fn base_interpreter(&self) -> (String, Vec<String>);

    /// File name the packager gives a one-file executable
    fn executable_file_name(&self, stem: &str) -> String;

    /// Installed-packages directory of the environment
    ///
    /// # Errors
    ///
    /// Returns a [`DiscoveryError`] when the directory cannot be determined
    /// unambiguously.
    async fn site_packages(&self, env_dir: &Path) -> Result<PathBuf, DiscoveryError>;

    /// Render a `/`-separated relative path with this platform's separator
    fn native_path(&self, relative: &str) -> String {
        let separator = self.path_separator().to_string();
        relative
            .split('/')
            .filter(|part| !part.is_empty())
            .collect::<Vec<_>>()
            .join(&separator)
    }
}

/// Profile for an explicit platform family
#[must_use]
pub fn profile_for(kind: PlatformKind) -> Arc<dyn PlatformProfile> {
    match kind {
        PlatformKind::Windows => Arc::new(WindowsProfile),
        PlatformKind::Posix => Arc::new(PosixProfile),
    }
}

/// Profile for the host this binary runs on
#[must_use]
pub fn profile_for_host() -> Arc<dyn PlatformProfile> {
    profile_for(PlatformKind::host())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_profile_for_kind() {
        assert_eq!(profile_for(PlatformKind::Windows).kind(), PlatformKind::Windows);
        assert_eq!(profile_for(PlatformKind::Posix).kind(), PlatformKind::Posix);
        assert_eq!(profile_for_host().kind(), PlatformKind::host());
    }

    #[test]
    fn test_native_path() {
        assert_eq!(PosixProfile.native_path("wezel/main.py"), "wezel/main.py");
        assert_eq!(WindowsProfile.native_path("wezel/main.py"), "wezel\\main.py");
        assert_eq!(WindowsProfile.native_path("/a//b/"), "a\\b");
    }
}
