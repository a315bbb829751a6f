//! # Console Bridge
//!
//! The two primitives every console-driven extension is built on:
//!
//! * **Commands** - [`ConsoleBridge::run_command`] writes one command (or a
//!   newline-separated batch of commands) to the managed server and returns
//!   whatever the server printed in response.
//! * **Log lines** - [`ConsoleBridge::register_log_processor`] subscribes a
//!   callback to every line the server writes to its console.
//!
//! The bridge has no error channel. A command that fails, times out or is not
//! understood by the server simply produces a reply that the caller's grammar
//! does not recognise, and callers are expected to treat that as "no data".
//!
//! ## Log processors
//!
//! Processors are invoked inline on the bridge's reader path. They must return
//! quickly and push any real work onto their own task:
//!
//! ```rust
//! use console_bridge::{ConsoleBridge, MemoryConsole};
//! use std::sync::Arc;
//!
//! let console = MemoryConsole::new();
//! console.register_log_processor("greeter", Arc::new(|line: &str, _suppressed: bool| {
//!     if line.contains("joined the game") {
//!         // hand off to a task instead of blocking here
//!     }
//! }));
//! console.emit_line("[12:00:00] [Server thread/INFO]: Alice joined the game");
//! ```

use async_trait::async_trait;
use std::sync::Arc;

pub mod memory;

pub use memory::MemoryConsole;

/// Callback invoked for each console line.
///
/// The second argument is the `suppressed` flag: `true` when the bridge has
/// hidden the line from the operator's terminal (for example because it was
/// the reply to a command issued by the daemon itself).
pub type LogProcessor = Arc<dyn Fn(&str, bool) + Send + Sync>;

/// Synchronous request/response channel plus asynchronous log feed to a
/// managed server process.
#[async_trait]
pub trait ConsoleBridge: Send + Sync {
    /// Runs a command and waits for the server's reply.
    ///
    /// A string containing newlines is sent as a single transaction: every
    /// line is executed and the concatenated output is returned.
    async fn run_command(&self, command: &str) -> String;

    /// Subscribes `processor` to every console line under `owner`.
    ///
    /// Each owner holds at most one processor; registering again replaces
    /// the previous one.
    fn register_log_processor(&self, owner: &str, processor: LogProcessor);

    /// Removes the processor registered under `owner`, if any.
    fn unregister_log_processor(&self, owner: &str);
}
