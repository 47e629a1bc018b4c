//! Per-rule runtime state.

use std::time::{Duration, Instant};

/// Mutable bookkeeping for one rule, owned by the engine.
///
/// Times are passed in by the caller so the transitions stay pure.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RuleState {
    previously_visible: bool,
    last_action: Option<Instant>,
    success_count: u64,
}

impl RuleState {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record this tick's trigger visibility.
    ///
    /// Returns `true` on a rising edge: visible now, not visible last tick.
    /// The stored visibility is replaced on every call.
    pub fn observe(&mut self, visible: bool) -> bool {
        let rising = visible && !self.previously_visible;
        self.previously_visible = visible;
        rising
    }

    /// Whether at least `limit` has passed since the last recorded action.
    ///
    /// Always `true` before the first action.
    #[must_use]
    pub fn rate_limit_elapsed(&self, now: Instant, limit: Duration) -> bool {
        self.last_action
            .is_none_or(|last| now.saturating_duration_since(last) >= limit)
    }

    /// Remember when the last rate-limited action was decided.
    pub fn record_action(&mut self, at: Instant) {
        self.last_action = Some(at);
    }

    /// Count one completed action.
    pub fn record_success(&mut self) {
        self.success_count = self.success_count.saturating_add(1);
    }

    #[must_use]
    pub fn previously_visible(&self) -> bool {
        self.previously_visible
    }

    #[must_use]
    pub fn success_count(&self) -> u64 {
        self.success_count
    }
}
