//! Windows profile

use async_trait::async_trait;
use pyfreeze_errors::DiscoveryError;
use std::path::{Path, PathBuf};

use super::{PlatformKind, PlatformProfile};

/// Conventions of a `py -3 -m venv` environment on Windows
#[derive(Debug, Clone, Copy, Default)]
pub struct WindowsProfile;

/// Display `path` with backslashes only
fn backslashed(path: &Path) -> String {
    path.display()
        .to_string()
        .replace('/', "\\")
        .trim_end_matches('\\')
        .to_string()
}

#[async_trait]
impl PlatformProfile for WindowsProfile {
    fn kind(&self) -> PlatformKind {
        PlatformKind::Windows
    }

    fn path_separator(&self) -> char {
        '\\'
    }

    fn data_separator(&self) -> char {
        ';'
    }

    fn path_list_separator(&self) -> char {
        ';'
    }

    fn scripts_dir(&self) -> &'static str {
        "Scripts"
    }

    fn activation_command(&self, env_dir: &Path) -> String {
        format!("{}\\Scripts\\activate", backslashed(env_dir))
    }

    fn interpreter_path(&self, env_dir: &Path) -> PathBuf {
        env_dir.join("Scripts").join("python.exe")
    }

    fn base_interpreter(&self) -> (String, Vec<String>) {
        ("py".to_string(), vec!["-3".to_string()])
    }

    fn executable_file_name(&self, stem: &str) -> String {
        format!("{stem}.exe")
    }

    /// Windows environments have a fixed, version-independent layout.
    async fn site_packages(&self, env_dir: &Path) -> Result<PathBuf, DiscoveryError> {
        Ok(env_dir.join("Lib").join("site-packages"))
    }
}
