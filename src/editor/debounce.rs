//! Idle-time debouncing for typed input
//!
//! Keystrokes in the raw stylesheet editor should not each become a history
//! snapshot. The debouncer records when the first unsaved change happened
//! and reports "due" once the text has been idle for the window.
//!
//! Time is passed in explicitly so the logic is testable without sleeping.

use std::time::{Duration, Instant};

/// Default idle window before typed text is committed.
pub const DEFAULT_WINDOW: Duration = Duration::from_millis(500);

#[derive(Debug, Clone)]
pub struct Debouncer {
    window: Duration,
    last_change: Option<Instant>,
}

impl Default for Debouncer {
    fn default() -> Self {
        Self::new(DEFAULT_WINDOW)
    }
}

impl Debouncer {
    pub fn new(window: Duration) -> Self {
        Self {
            window,
            last_change: None,
        }
    }

    /// Record a change at `now`, restarting the idle window.
    pub fn touch(&mut self, now: Instant) {
        self.last_change = Some(now);
    }

    /// Whether a change is waiting to be committed.
    pub fn is_pending(&self) -> bool {
        self.last_change.is_some()
    }

    /// Whether the pending change has been idle for the whole window.
    pub fn is_due(&self, now: Instant) -> bool {
        self.last_change
            .is_some_and(|last| now.saturating_duration_since(last) >= self.window)
    }

    /// Clear the pending state. Returns `true` if something was pending.
    pub fn take(&mut self) -> bool {
        self.last_change.take().is_some()
    }

    /// Time left until the pending change is due, for scheduling a repaint.
    pub fn remaining(&self, now: Instant) -> Option<Duration> {
        self.last_change
            .map(|last| self.window.saturating_sub(now.saturating_duration_since(last)))
    }

    pub fn set_window(&mut self, window: Duration) {
        self.window = window;
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
