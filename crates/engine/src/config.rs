//! Engine configuration.

use chrono::Duration;

/// Tunables for the engine services.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Length of the due-date reminder window, anchored at UTC midnight of
    /// the polling day. Also the deduplication window: at most one reminder
    /// per (recipient, todo) within it.
    pub reminder_window: Duration,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            reminder_window: Duration::hours(24),
        }
    }
}
