// SPDX-License-Identifier: Apache-2.0
//! Injected diagnostics for the simulation loop.
//!
//! The engine never owns a global logger. A [`Sink`] is handed to the
//! [`crate::World`] at construction and shared with every body it admits, so
//! embedders decide where reports go. Events are formatted as JSON lines by
//! hand to keep serde out of the diagnostic path.

use std::io::Write as _;
use std::sync::{Arc, Mutex};

/// Severity of a diagnostic event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    /// Caller misuse that the engine tolerates (e.g. forcing a kinematic
    /// body).
    Warn,
    /// Rejected configuration; the previous value was retained.
    Error,
}

/// Diagnostics sink injected into the world and its bodies.
///
/// Implementations must be cheap: sinks are invoked from inside the step
/// loop. They must not panic.
pub trait Sink {
    /// Reports one event. `code` is a stable machine-readable identifier,
    /// `message` a human-readable detail string.
    fn report(&self, level: Level, code: &str, message: &str);
}

/// Shared handle to a sink.
pub type SharedSink = Arc<dyn Sink>;

/// Sink that discards every event. The default.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl Sink for NullSink {
    fn report(&self, _level: Level, _code: &str, _message: &str) {}
}

/// Sink that writes one JSON line per event to stderr.
///
/// Best-effort: I/O errors are ignored so diagnostics can never take down
/// the simulation.
#[derive(Debug, Default, Clone, Copy)]
pub struct StderrSink;

impl Sink for StderrSink {
    fn report(&self, level: Level, code: &str, message: &str) {
        let level = match level {
            Level::Warn => "warn",
            Level::Error => "error",
        };
        let mut out = std::io::stderr().lock();
        let _ = write!(
            out,
            r#"{{"level":"{level}","code":"{code}","message":"{message}"}}"#
        );
        let _ = out.write_all(b"\n");
    }
}

/// One captured diagnostic event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Event {
    /// Severity.
    pub level: Level,
    /// Stable event code.
    pub code: String,
    /// Detail string.
    pub message: String,
}

/// Sink that records events in memory, for tests and tooling.
#[derive(Debug, Default)]
pub struct MemorySink {
    events: Mutex<Vec<Event>>,
}

impl MemorySink {
    /// Creates an empty sink.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a copy of every captured event in arrival order.
    #[must_use]
    pub fn events(&self) -> Vec<Event> {
        self.events.lock().map(|e| e.clone()).unwrap_or_default()
    }

    /// Returns `true` if any event with the given code was captured.
    #[must_use]
    pub fn has_code(&self, code: &str) -> bool {
        self.events().iter().any(|e| e.code == code)
    }
}

impl Sink for MemorySink {
    fn report(&self, level: Level, code: &str, message: &str) {
        if let Ok(mut events) = self.events.lock() {
            events.push(Event {
                level,
                code: code.to_owned(),
                message: message.to_owned(),
            });
        }
    }
}
