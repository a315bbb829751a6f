/// Core ScoreboardCore implementation
use super::sync::{SyncAction, SyncScheduler};
use super::triggers::TriggerCallback;
use crate::config::ScoreboardConfig;
use crate::stats::{ScoreboardStats, StatsCounters};
use console_bridge::ConsoleBridge;
use futures::FutureExt;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Weak};
use tokio::runtime::Handle;
use tokio::sync::RwLock;
use tracing::{debug, info};

/// Cached scores: player -> objective -> value.
pub type ScoreSnapshot = HashMap<String, HashMap<String, i64>>;

/// Shared scoreboard state for every plugin on one server.
///
/// The real scores live inside the server process; this type keeps a local
/// mirror that is refreshed on demand and through a debounced full sync. Each
/// of the three shared maps sits behind its own lock, and no console round
/// trip is ever made while one of those locks is held.
pub struct ScoreboardCore {
    /// Command channel and log feed
    pub(super) bridge: Arc<dyn ConsoleBridge>,
    /// Engine settings
    pub(super) config: ScoreboardConfig,
    /// Runtime used for trigger dispatch from the log processor
    pub(super) runtime: Handle,
    /// Namespaced objectives known to exist on the server
    pub(super) objectives: RwLock<Vec<String>>,
    /// Local score mirror
    pub(super) scores: RwLock<ScoreSnapshot>,
    /// Live triggers bound to callbacks
    pub(super) triggers: RwLock<HashMap<String, TriggerCallback>>,
    /// Debounced full-sync actor
    pub(super) scheduler: SyncScheduler,
    /// Activity counters
    pub(super) stats: StatsCounters,
    /// Set once teardown has begun
    pub(super) shut_down: AtomicBool,
}

impl std::fmt::Debug for ScoreboardCore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScoreboardCore")
            .field("config", &self.config)
            .field("objectives", &"[objectives]")
            .field("scores", &"[scores]")
            .field("triggers", &"[triggers]")
            .field("shut_down", &self.shut_down.load(Ordering::Relaxed))
            .finish()
    }
}

impl ScoreboardCore {
    /// Creates the engine and attaches it to `bridge`.
    ///
    /// Spawns the debounce actor and registers the trigger log processor
    /// under `config.owner`.
    ///
    /// # Panics
    ///
    /// Panics when called outside a Tokio runtime.
    pub fn new(bridge: Arc<dyn ConsoleBridge>, config: ScoreboardConfig) -> Arc<Self> {
        let runtime = Handle::current();

        let core = Arc::new_cyclic(|weak: &Weak<Self>| {
            let weak = weak.clone();
            let action: SyncAction = Arc::new(move || {
                let weak = weak.clone();
                async move {
                    if let Some(core) = weak.upgrade() {
                        core.full_sync().await;
                    }
                }
                .boxed()
            });
            let scheduler = SyncScheduler::spawn(&runtime, config.sync_debounce(), action);

            Self {
                bridge,
                config,
                runtime,
                objectives: RwLock::new(Vec::new()),
                scores: RwLock::new(HashMap::new()),
                triggers: RwLock::new(HashMap::new()),
                scheduler,
                stats: StatsCounters::default(),
                shut_down: AtomicBool::new(false),
            }
        });

        core.attach_log_processor();
        core
    }

    /// Startup step: purges trigger objectives left behind by a previous
    /// process, unless disabled in the configuration.
    pub async fn start(&self) {
        if self.config.purge_stale_triggers {
            let removed = self.clear_stale_triggers().await;
            info!("Scoreboard core started, removed {} stale triggers", removed);
        } else {
            info!("Scoreboard core started");
        }
    }

    /// Stops new work: the debounce timer is cancelled and the log processor
    /// is detached. Round trips already in flight are not interrupted.
    pub fn shutdown(&self) {
        if self.shut_down.swap(true, Ordering::SeqCst) {
            return;
        }
        self.scheduler.shutdown();
        self.bridge.unregister_log_processor(&self.config.owner);
        info!("Scoreboard core shut down");
    }

    pub fn is_shut_down(&self) -> bool {
        self.shut_down.load(Ordering::SeqCst)
    }

    /// Asks for a full sync after the debounce window.
    pub fn request_sync(&self) {
        self.scheduler.request();
    }

    pub fn config(&self) -> &ScoreboardConfig {
        &self.config
    }

    /// Snapshot of activity counters.
    pub fn stats(&self) -> ScoreboardStats {
        self.stats.snapshot()
    }

    /// Sends one command (or newline-joined batch) through the bridge.
    pub(super) async fn run(&self, command: &str) -> String {
        StatsCounters::bump(&self.stats.commands_issued, 1);
        debug!("console -> {}", command);
        self.bridge.run_command(command).await
    }
}
