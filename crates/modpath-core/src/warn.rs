//! Warning sinks for non-fatal diagnostics.

use std::sync::Mutex;

/// Receives non-fatal resolution warnings. Fire-and-forget.
pub trait WarningSink: Send + Sync {
    fn warn(&self, message: &str);
}

impl<F> WarningSink for F
where
    F: Fn(&str) + Send + Sync,
{
    fn warn(&self, message: &str) {
        self(message);
    }
}

/// Forwards warnings to `tracing` at WARN level.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl WarningSink for TracingSink {
    fn warn(&self, message: &str) {
        tracing::warn!(target: "modpath", "{message}");
    }
}

/// Keeps every warning in memory, for embedders that report them in bulk.
#[derive(Debug, Default)]
pub struct CollectingSink {
    messages: Mutex<Vec<String>>,
}

impl CollectingSink {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Drain the collected warnings.
    pub fn take(&self) -> Vec<String> {
        self.messages
            .lock()
            .map(|mut messages| std::mem::take(&mut *messages))
            .unwrap_or_default()
    }
}

impl WarningSink for CollectingSink {
    fn warn(&self, message: &str) {
        if let Ok(mut messages) = self.messages.lock() {
            messages.push(message.to_string());
        }
    }
}
