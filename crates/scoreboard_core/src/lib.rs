//! # Scoreboard Core
//!
//! Shared scoreboard service for plugins of a console-driven game server.
//! The server only exposes text commands and a text log; this crate turns
//! that into a typed, namespaced store of objectives and scores plus a
//! callback mechanism for in-game trigger objectives.
//!
//! ## Core Features
//!
//! - **Namespacing**: every plugin's objectives carry a 5-character token
//!   derived from its stable name, so plugins never collide and names survive
//!   restarts
//! - **Score Cache**: a local mirror refreshed per score on read and by a
//!   debounced full sync after registry changes
//! - **Triggers**: randomly named `tri_*` objectives bound to callbacks and
//!   re-armed after every activation
//! - **Cleanup**: trigger objectives left by a previous process are removed
//!   on start
//!
//! ## Quick Start Example
//!
//! ```rust
//! use console_bridge::MemoryConsole;
//! use scoreboard_core::*;
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() {
//!     let console = Arc::new(MemoryConsole::new());
//!     let core = create_scoreboard_core(console.clone());
//!     core.start().await;
//!
//!     let combat = core.plugin(PluginIdentity::new("combat"));
//!     combat.ensure_objective("kills", "playerKillCount", "Kills").await;
//!     combat.add_score("Alice", "kills", 1).await;
//!
//!     let trigger = combat
//!         .register_trigger(|player, value| println!("{player} pressed {value}"))
//!         .await;
//!     assert!(trigger.starts_with("tri_6xMfI_"));
//!
//!     core.shutdown();
//! }
//! ```

pub mod config;
pub mod error;
pub mod grammar;
pub mod handle;
pub mod logging;
pub mod namespace;
pub mod stats;
pub mod system;

pub use config::{LoggingSettings, ScoreboardConfig, ScoreboardSettings};
pub use console_bridge::{ConsoleBridge, LogProcessor};
pub use error::ConfigError;
pub use grammar::{ScoreOp, TriggerFire};
pub use handle::PluginScoreboard;
pub use namespace::{namespace, PluginIdentity};
pub use stats::ScoreboardStats;
pub use system::{ScoreSnapshot, ScoreboardCore, TriggerCallback};

use std::sync::Arc;

/// Creates an engine with default settings on the current Tokio runtime.
pub fn create_scoreboard_core(bridge: Arc<dyn ConsoleBridge>) -> Arc<ScoreboardCore> {
    ScoreboardCore::new(bridge, ScoreboardConfig::default())
}
