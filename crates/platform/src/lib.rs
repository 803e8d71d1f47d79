#![deny(clippy::pedantic, unsafe_code)]
#![allow(clippy::module_name_repetitions)]

//! Platform abstraction layer for the build pipeline.
//!
//! This crate provides a unified interface for everything that differs
//! between Windows and POSIX hosts:
//! - Platform profiles (separators, environment layout, activation, discovery)
//! - Process execution with structured argument lists and event emission
//! - Filesystem operations used to publish and clean up build output
//!
//! Pipeline code talks to a [`Platform`] value and never branches on the
//! host operating system itself.

pub mod core;
pub mod filesystem;
pub mod implementations;
pub mod process;
pub mod profile;

pub use core::{Platform, PlatformContext};
pub use implementations::native::{NativeFilesystemOperations, NativeProcessOperations};

/// Re-export commonly used types
pub use filesystem::FilesystemOperations;
pub use process::{CommandOutput, PlatformCommand, ProcessOperations};
pub use profile::{
    profile_for, profile_for_host, PlatformKind, PlatformProfile, PosixProfile, WindowsProfile,
};
