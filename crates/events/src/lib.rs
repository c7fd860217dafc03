#![deny(clippy::pedantic, unsafe_code)]
#![allow(clippy::module_name_repetitions)]

//! Event system for hcb
//!
//! Library crates report progress through events instead of printing; the CLI
//! owns the receiving end and decides how to present them.
//!
//! Each conda build walks through the phases of [`BuildPhase`] and emits a
//! [`BuildEvent::PhaseChanged`] for every transition.

pub mod events;
pub mod phase;

pub use events::{AppEvent, BuildEvent, FailureContext, GeneralEvent};
pub use phase::BuildPhase;

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

/// The unified trait for emitting events throughout hcb
///
/// Implemented for raw senders and for anything that carries an optional one,
/// so emitting never needs to know whether a listener exists.
pub trait EventEmitter {
    /// Get the event sender for this emitter
    fn event_sender(&self) -> Option<&EventSender>;

    /// Emit an event through this emitter
    fn emit(&self, event: AppEvent) {
        if let Some(sender) = self.event_sender() {
            // Receiver gone means nobody is listening; the build carries on
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

    /// Emit a phase transition for a package build
    fn emit_phase(&self, package: impl Into<String>, from: BuildPhase, to: BuildPhase) {
        self.emit(AppEvent::Build(BuildEvent::PhaseChanged {
            package: package.into(),
            from,
            to,
        }));
    }
}

impl EventEmitter for EventSender {
    fn event_sender(&self) -> Option<&EventSender> {
        Some(self)
    }
}

impl EventEmitter for Option<EventSender> {
    fn event_sender(&self) -> Option<&EventSender> {
        self.as_ref()
    }
}
