//! Core platform abstractions and context management

use pyfreeze_events::{EventEmitter, EventSender};
use std::collections::HashMap;
use std::sync::Arc;

use crate::filesystem::FilesystemOperations;
use crate::implementations::native::{NativeFilesystemOperations, NativeProcessOperations};
use crate::process::{CommandOutput, PlatformCommand, ProcessOperations};
use crate::profile::{profile_for_host, PlatformProfile};
use pyfreeze_errors::PlatformError;

/// Context for platform operations, providing event emission and metadata tracking
#[derive(Debug, Clone, Default)]
pub struct PlatformContext {
    event_sender: Option<EventSender>,
    operation_metadata: HashMap<String, String>,
}

impl PlatformContext {
    /// Create a new platform context with event emission capabilities
    #[must_use]
    pub fn new(event_sender: Option<EventSender>) -> Self {
        Self {
            event_sender,
            operation_metadata: HashMap::new(),
        }
    }

    /// Attach the build session so platform events can be correlated
    #[must_use]
    pub fn with_session(mut self, session_id: impl Into<String>) -> Self {
        self.operation_metadata
            .insert("session_id".to_string(), session_id.into());
        self
    }

    /// Session this context belongs to, if any
    #[must_use]
    pub fn session_id(&self) -> Option<&str> {
        self.operation_metadata.get("session_id").map(String::as_str)
    }

    /// Add custom metadata to the context
    pub fn add_metadata(&mut self, key: String, value: String) {
        self.operation_metadata.insert(key, value);
    }

    /// Get all metadata
    #[must_use]
    pub fn metadata(&self) -> &HashMap<String, String> {
        &self.operation_metadata
    }
}

impl EventEmitter for PlatformContext {
    fn event_sender(&self) -> Option<&EventSender> {
        self.event_sender.as_ref()
    }
}

/// Main platform abstraction providing access to all platform operations
pub struct Platform {
    profile: Arc<dyn PlatformProfile>,
    filesystem_ops: Box<dyn FilesystemOperations>,
    process_ops: Box<dyn ProcessOperations>,
}

impl Platform {
    /// Create a new platform instance with the specified implementations
    #[must_use]
    pub fn new(
        profile: Arc<dyn PlatformProfile>,
        filesystem_ops: Box<dyn FilesystemOperations>,
        process_ops: Box<dyn ProcessOperations>,
    ) -> Self {
        Self {
            profile,
            filesystem_ops,
            process_ops,
        }
    }

    /// The platform for the host this binary runs on
    #[must_use]
    pub fn current() -> Self {
        Self::new(
            profile_for_host(),
            Box::new(NativeFilesystemOperations::new()),
            Box::new(NativeProcessOperations::new()),
        )
    }

    /// Host filesystem with a caller-supplied profile and process runner
    #[must_use]
    pub fn with_process(
        profile: Arc<dyn PlatformProfile>,
        process_ops: Box<dyn ProcessOperations>,
    ) -> Self {
        Self::new(
            profile,
            Box::new(NativeFilesystemOperations::new()),
            process_ops,
        )
    }

    /// Access the platform profile
    #[must_use]
    pub fn profile(&self) -> &Arc<dyn PlatformProfile> {
        &self.profile
    }

    /// Access filesystem operations
    #[must_use]
    pub fn filesystem(&self) -> &dyn FilesystemOperations {
        &*self.filesystem_ops
    }

    /// Access process operations
    #[must_use]
    pub fn process(&self) -> &dyn ProcessOperations {
        &*self.process_ops
    }

    /// Create a platform context with event emission
    #[must_use]
    pub fn create_context(&self, event_sender: Option<EventSender>) -> PlatformContext {
        PlatformContext::new(event_sender)
    }

    /// Convenience method: Execute a command and get output
    ///
    /// # Errors
    ///
    /// Returns an error if the program cannot be started.
    pub async fn execute_command(
        &self,
        ctx: &PlatformContext,
        cmd: PlatformCommand,
    ) -> Result<CommandOutput, PlatformError> {
        self.process().execute_command(ctx, cmd).await
    }

    /// Convenience method: Create a new command builder
    #[must_use]
    pub fn command(&self, program: &str) -> PlatformCommand {
        self.process().create_command(program)
    }
}

impl std::fmt::Debug for Platform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Platform")
            .field("profile", &self.profile.kind())
            .finish_non_exhaustive()
    }
}
