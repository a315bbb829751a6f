//! Scoreboard engine implementation.
//!
//! [`ScoreboardCore`] is split across several files by concern: lifecycle in
//! `core`, the objective registry in `objectives`, the score cache in
//! `scores`, trigger handling in `triggers` and the debounce actor in `sync`.

mod core;
mod objectives;
mod scores;
mod sync;
mod triggers;

pub use self::core::{ScoreSnapshot, ScoreboardCore};
pub use sync::{SyncAction, SyncScheduler};
pub use triggers::TriggerCallback;
