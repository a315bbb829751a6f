//! Engine statistics.

use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};

/// Point-in-time snapshot of engine activity.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ScoreboardStats {
    /// Objectives created through `ensure_objective`
    pub objectives_registered: u64,
    /// Triggers bound to callbacks
    pub triggers_registered: u64,
    /// Trigger fires dispatched to a callback
    pub triggers_fired: u64,
    /// Full syncs run (debounced or via `get_all_scores`)
    pub full_syncs: u64,
    /// Single-score refreshes sent to the server
    pub single_syncs: u64,
    /// Commands sent through the console bridge
    pub commands_issued: u64,
}

/// Lock-free counters behind [`ScoreboardStats`].
#[derive(Debug, Default)]
pub(crate) struct StatsCounters {
    pub(crate) objectives_registered: AtomicU64,
    pub(crate) triggers_registered: AtomicU64,
    pub(crate) triggers_fired: AtomicU64,
    pub(crate) full_syncs: AtomicU64,
    pub(crate) single_syncs: AtomicU64,
    pub(crate) commands_issued: AtomicU64,
}

impl StatsCounters {
    pub(crate) fn bump(counter: &AtomicU64, by: u64) {
        counter.fetch_add(by, Ordering::Relaxed);
    }

    pub(crate) fn snapshot(&self) -> ScoreboardStats {
        ScoreboardStats {
            objectives_registered: self.objectives_registered.load(Ordering::Relaxed),
            triggers_registered: self.triggers_registered.load(Ordering::Relaxed),
            triggers_fired: self.triggers_fired.load(Ordering::Relaxed),
            full_syncs: self.full_syncs.load(Ordering::Relaxed),
            single_syncs: self.single_syncs.load(Ordering::Relaxed),
            commands_issued: self.commands_issued.load(Ordering::Relaxed),
        }
    }
}
