#![deny(clippy::pedantic, unsafe_code)]
#![allow(clippy::module_name_repetitions)]
//! Python application packaging for pyfreeze
//!
//! This crate turns a Python project into a standalone executable by
//! provisioning an isolated environment, installing its requirements,
//! driving the packager and publishing the result into the working
//! directory.

mod assemble;
mod context;
mod environment;
mod finalize;
mod install;
mod pipeline;

pub use assemble::{EntryPoint, PackageAssembler, PackagerInvocation};
pub use context::PipelineContext;
pub use environment::{EnvironmentHandle, EnvironmentProvisioner};
pub use finalize::ArtifactFinalizer;
pub use install::DependencyInstaller;
pub use pipeline::BuildPipeline;
