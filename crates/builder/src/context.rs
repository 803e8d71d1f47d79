//! Per-invocation pipeline context

use pyfreeze_events::{EventEmitter, EventSender};
use pyfreeze_platform::PlatformContext;
use std::path::{Path, PathBuf};
use uuid::Uuid;

/// State shared by every stage of one pipeline invocation
#[derive(Clone, Debug)]
pub struct PipelineContext {
    /// Correlates every event emitted by this invocation
    pub session_id: Uuid,
    /// Directory the packager runs in and the artifact lands in
    pub workdir: PathBuf,
    /// Event sender for progress reporting
    pub event_sender: Option<EventSender>,
}

impl EventEmitter for PipelineContext {
    fn event_sender(&self) -> Option<&EventSender> {
        self.event_sender.as_ref()
    }
}

impl PipelineContext {
    /// Create a context with a fresh session id
    #[must_use]
    pub fn new(workdir: impl Into<PathBuf>) -> Self {
        Self {
            session_id: Uuid::new_v4(),
            workdir: workdir.into(),
            event_sender: None,
        }
    }

    /// Set event sender
    #[must_use]
    pub fn with_event_sender(mut self, event_sender: EventSender) -> Self {
        self.event_sender = Some(event_sender);
        self
    }

    /// Session id as carried by events
    #[must_use]
    pub fn session(&self) -> String {
        self.session_id.to_string()
    }

    /// Resolve `path` against the working directory unless it is absolute
    #[must_use]
    pub fn resolve(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.workdir.join(path)
        }
    }

    /// Platform context that forwards events to the same sender
    #[must_use]
    pub fn platform_context(&self) -> PlatformContext {
        PlatformContext::new(self.event_sender.clone()).with_session(self.session())
    }
}
