//! POSIX profile (Linux, macOS)

use async_trait::async_trait;
use pyfreeze_errors::DiscoveryError;
use std::path::{Path, PathBuf};
use tokio::fs;

use super::{PlatformKind, PlatformProfile};

/// Conventions of a `python3 -m venv` environment on POSIX hosts
#[derive(Debug, Clone, Copy, Default)]
pub struct PosixProfile;

#[async_trait]
impl PlatformProfile for PosixProfile {
    fn kind(&self) -> PlatformKind {
        PlatformKind::Posix
    }

    fn path_separator(&self) -> char {
        '/'
    }

    fn data_separator(&self) -> char {
        ':'
    }

    fn path_list_separator(&self) -> char {
        ':'
    }

    fn scripts_dir(&self) -> &'static str {
        "bin"
    }

    fn activation_command(&self, env_dir: &Path) -> String {
        let dir = env_dir.display().to_string();
        format!(". \"{}/bin/activate\"", dir.trim_end_matches('/'))
    }

    fn interpreter_path(&self, env_dir: &Path) -> PathBuf {
        env_dir.join("bin").join("python")
    }

    fn base_interpreter(&self) -> (String, Vec<String>) {
        ("python3".to_string(), Vec::new())
    }

    fn executable_file_name(&self, stem: &str) -> String {
        stem.to_string()
    }

    /// `<env>/lib/<pythonX.Y>/site-packages`, where the version directory
    /// must be the only directory under `<env>/lib`.
    async fn site_packages(&self, env_dir: &Path) -> Result<PathBuf, DiscoveryError> {
        let lib = env_dir.join("lib");
        let mut entries = match fs::read_dir(&lib).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(DiscoveryError::NoCandidate {
                    path: lib.display().to_string(),
                })
            }
            Err(e) => {
                return Err(DiscoveryError::Unreadable {
                    path: lib.display().to_string(),
                    message: e.to_string(),
                })
            }
        };

        let mut candidates = Vec::new();
        loop {
            let entry = entries
                .next_entry()
                .await
                .map_err(|e| DiscoveryError::Unreadable {
                    path: lib.display().to_string(),
                    message: e.to_string(),
                })?;
            let Some(entry) = entry else { break };
            // follows symlinks, unlike DirEntry::file_type
            let is_dir = fs::metadata(entry.path())
                .await
                .is_ok_and(|meta| meta.is_dir());
            if is_dir {
                candidates.push(entry.file_name().to_string_lossy().into_owned());
            }
        }
        candidates.sort();

        match candidates.as_slice() {
            [] => Err(DiscoveryError::NoCandidate {
                path: lib.display().to_string(),
            }),
            [version] => Ok(lib.join(version).join("site-packages")),
            _ => Err(DiscoveryError::Ambiguous {
                path: lib.display().to_string(),
                candidates,
            }),
        }
    }
}
