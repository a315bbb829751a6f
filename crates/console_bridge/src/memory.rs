//! In-memory console bridge.
//!
//! [`MemoryConsole`] stands in for a live server: it records every command it
//! is asked to run, answers through a replaceable responder, and lets the
//! caller inject console lines that are fanned out to the registered log
//! processors exactly as a real reader loop would.

use crate::{ConsoleBridge, LogProcessor};
use async_trait::async_trait;
use dashmap::DashMap;
use std::sync::{Arc, Mutex, RwLock};
use tracing::trace;

type Responder = Arc<dyn Fn(&str) -> String + Send + Sync>;

/// Console bridge backed by process memory instead of a server process.
pub struct MemoryConsole {
    /// Every command passed to `run_command`, in issue order
    commands: Mutex<Vec<String>>,
    /// Produces the reply for a command
    responder: RwLock<Responder>,
    /// Registered log processors keyed by owner
    processors: DashMap<String, LogProcessor>,
}

impl std::fmt::Debug for MemoryConsole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemoryConsole")
            .field("commands", &self.command_count())
            .field("processors", &self.processors.len())
            .finish()
    }
}

impl MemoryConsole {
    /// Creates a console that answers every command with an empty reply.
    pub fn new() -> Self {
        let silent: Responder = Arc::new(|_: &str| String::new());
        Self {
            commands: Mutex::new(Vec::new()),
            responder: RwLock::new(silent),
            processors: DashMap::new(),
        }
    }

    /// Creates a console whose replies come from `responder`.
    pub fn with_responder<F>(responder: F) -> Self
    where
        F: Fn(&str) -> String + Send + Sync + 'static,
    {
        let console = Self::new();
        console.respond_with(responder);
        console
    }

    /// Replaces the reply function for all subsequent commands.
    pub fn respond_with<F>(&self, responder: F)
    where
        F: Fn(&str) -> String + Send + Sync + 'static,
    {
        let responder: Responder = Arc::new(responder);
        let mut slot = self.responder.write().unwrap_or_else(|e| e.into_inner());
        *slot = responder;
    }

    /// Returns a copy of every command issued so far.
    pub fn commands(&self) -> Vec<String> {
        self.commands.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    /// Returns the issued commands that start with `prefix`.
    pub fn commands_starting_with(&self, prefix: &str) -> Vec<String> {
        self.commands
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .iter()
            .filter(|command| command.starts_with(prefix))
            .cloned()
            .collect()
    }

    /// Number of commands issued so far.
    pub fn command_count(&self) -> usize {
        self.commands.lock().unwrap_or_else(|e| e.into_inner()).len()
    }

    /// Forgets the recorded command history.
    pub fn clear_commands(&self) {
        self.commands.lock().unwrap_or_else(|e| e.into_inner()).clear();
    }

    /// Whether a processor is currently registered under `owner`.
    pub fn has_processor(&self, owner: &str) -> bool {
        self.processors.contains_key(owner)
    }

    /// Feeds a visible console line to every registered processor.
    pub fn emit_line(&self, line: &str) {
        self.dispatch(line, false);
    }

    /// Feeds a line that the bridge would have hidden from the operator.
    pub fn emit_suppressed(&self, line: &str) {
        self.dispatch(line, true);
    }

    fn dispatch(&self, line: &str, suppressed: bool) {
        // Clone out of the map first so a processor may (un)register without
        // deadlocking on the shard it is being read from.
        let processors: Vec<LogProcessor> = self
            .processors
            .iter()
            .map(|entry| entry.value().clone())
            .collect();

        for processor in processors {
            processor(line, suppressed);
        }
    }
}

impl Default for MemoryConsole {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ConsoleBridge for MemoryConsole {
    async fn run_command(&self, command: &str) -> String {
        trace!("memory console <- {}", command);
        self.commands
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(command.to_string());

        let responder = self
            .responder
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .clone();
        responder(command)
    }

    fn register_log_processor(&self, owner: &str, processor: LogProcessor) {
        self.processors.insert(owner.to_string(), processor);
    }

    fn unregister_log_processor(&self, owner: &str) {
        self.processors.remove(owner);
    }
}
