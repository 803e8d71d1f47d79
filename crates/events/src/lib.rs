#![deny(clippy::pedantic, unsafe_code)]
#![allow(clippy::module_name_repetitions)]

//! Event system for pyfreeze
//!
//! Pipeline stages never print or log directly. They emit events through an
//! explicitly passed sender, and the CLI decides how to render and log them.
//! A pipeline without a sender runs silently, which keeps repeated or
//! concurrent invocations in tests independent of each other.

pub mod meta;
pub use meta::EventSource;

pub mod events;
pub use events::{AppEvent, FailureContext, GeneralEvent, PipelineEvent, PlatformEvent};

use pyfreeze_types::BuildStage;
use std::time::Duration;
use tokio::sync::mpsc::UnboundedSender;

/// Type alias for event sender
pub type EventSender = UnboundedSender<AppEvent>;

/// Type alias for event receiver
pub type EventReceiver = tokio::sync::mpsc::UnboundedReceiver<AppEvent>;

/// Create a new event channel
#[must_use]
pub fn channel() -> (EventSender, EventReceiver) {
    tokio::sync::mpsc::unbounded_channel()
}

/// The unified trait for emitting events
///
/// This trait provides a single, consistent API for emitting events regardless of
/// whether you have a raw `EventSender` or a struct that contains one.
pub trait EventEmitter {
    /// Get the event sender for this emitter
    fn event_sender(&self) -> Option<&EventSender>;

    /// Emit an event through this emitter
    fn emit(&self, event: AppEvent) {
        if let Some(sender) = self.event_sender() {
            // Ignore send errors - if receiver is dropped, we just continue
            let _ = sender.send(event);
        }
    }

    /// Emit a debug log event
    fn emit_debug(&self, message: impl Into<String>) {
        self.emit(AppEvent::General(GeneralEvent::debug(message)));
    }

    /// Emit a warning event
    fn emit_warning(&self, message: impl Into<String>) {
        self.emit(AppEvent::General(GeneralEvent::warning(message)));
    }

    /// Emit a stage started event
    fn emit_stage_started(&self, session_id: impl Into<String>, stage: BuildStage) {
        self.emit(AppEvent::Pipeline(PipelineEvent::StageStarted {
            session_id: session_id.into(),
            stage,
        }));
    }

    /// Emit a stage completed event
    fn emit_stage_completed(
        &self,
        session_id: impl Into<String>,
        stage: BuildStage,
        duration: Duration,
    ) {
        self.emit(AppEvent::Pipeline(PipelineEvent::StageCompleted {
            session_id: session_id.into(),
            stage,
            duration,
        }));
    }

    /// Emit a stage failed event
    fn emit_stage_failed(
        &self,
        session_id: impl Into<String>,
        stage: BuildStage,
        failure: FailureContext,
    ) {
        self.emit(AppEvent::Pipeline(PipelineEvent::StageFailed {
            session_id: session_id.into(),
            stage,
            failure,
        }));
    }
}

/// Implementation of `EventEmitter` for the raw `EventSender`
/// This allows `EventSender` to be used directly where `EventEmitter` is expected
impl EventEmitter for EventSender {
    fn event_sender(&self) -> Option<&EventSender> {
        Some(self)
    }
}

/// Implementation for an optional sender, so silent pipelines need no special casing
impl EventEmitter for Option<EventSender> {
    fn event_sender(&self) -> Option<&EventSender> {
        self.as_ref()
    }
}
