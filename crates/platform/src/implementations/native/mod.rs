//! Implementations backed by the host operating system through tokio

pub mod filesystem;
pub mod process;

pub use filesystem::NativeFilesystemOperations;
pub use process::NativeProcessOperations;
