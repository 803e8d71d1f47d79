//! Fixed file names that are not exposed through configuration

/// Project-local configuration file looked up in the working directory
pub const CONFIG_FILE_NAME: &str = "pyfreeze.toml";

/// Directory (inside the working directory) for `--debug` log files
pub const LOGS_DIR_NAME: &str = ".pyfreeze-logs";

/// Python module that provides the packaging tool
pub const PACKAGER_MODULE: &str = "PyInstaller";

/// Packager output directory when `--distpath` is not passed
pub const PACKAGER_DIST_DIR: &str = "dist";

/// Packager intermediate directory when `--workpath` is not passed
pub const PACKAGER_WORK_DIR: &str = "build";
