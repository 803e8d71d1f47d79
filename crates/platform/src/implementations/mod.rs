//! Platform operation implementations

pub mod native;
