//! Diagnostic log sinks
//!
//! Rules and parameter sets describe what they evaluated and what they
//! decided through a [`ValidationLog`] passed in at construction.

use std::sync::{Arc, Mutex};

/// Sink for human-readable diagnostic lines
pub trait ValidationLog: Send + Sync {
    fn log(&self, source: &str, message: &str);
}

/// Shared sink handle
pub type LogHandle = Arc<dyn ValidationLog>;

/// Forwards lines to `tracing` at debug level
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingLog;

impl ValidationLog for TracingLog {
    fn log(&self, source: &str, message: &str) {
        tracing::debug!(target: "apirules", source, "{}", message);
    }
}

/// Default sink used when none is injected
pub fn default_log() -> LogHandle {
    Arc::new(TracingLog)
}

/// Keeps lines in memory, formatted as `source | message`
#[derive(Debug, Default)]
pub struct MemoryLog {
    lines: Mutex<Vec<String>>,
}

impl MemoryLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the recorded lines
    pub fn lines(&self) -> Vec<String> {
        match self.lines.lock() {
            Ok(lines) => lines.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    /// Whether any line contains `needle`
    pub fn contains(&self, needle: &str) -> bool {
        self.lines().iter().any(|l| l.contains(needle))
    }
}

impl ValidationLog for MemoryLog {
    fn log(&self, source: &str, message: &str) {
        let line = format!("{} | {}", source, message);
        match self.lines.lock() {
            Ok(mut lines) => lines.push(line),
            Err(poisoned) => poisoned.into_inner().push(line),
        }
    }
}
