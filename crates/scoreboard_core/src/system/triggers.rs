/// Trigger registration, dispatch and cleanup
use super::core::ScoreboardCore;
use crate::grammar::{self, TriggerFire, TRIGGER_PREFIX};
use crate::namespace::PluginIdentity;
use crate::stats::StatsCounters;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use tracing::{debug, info};

/// Callback run when a player activates a trigger: `(player, value)`.
pub type TriggerCallback = Arc<dyn Fn(String, i32) + Send + Sync>;

/// Builds `tri_<namespace>_<suffix>` from a random 32-bit draw.
pub(crate) fn trigger_name(namespace: &str, draw: u32) -> String {
    format!(
        "{TRIGGER_PREFIX}{namespace}_{}",
        URL_SAFE_NO_PAD.encode(draw.to_be_bytes())
    )
}

impl ScoreboardCore {
    /// Binds each callback to a fresh trigger objective.
    ///
    /// Names are drawn at random and retried until unused, so concurrent
    /// callers never receive the same name. All objectives are created and
    /// enabled for every online player with a single console round trip.
    /// Returns the names in the same order as `callbacks`.
    pub async fn register_triggers(
        &self,
        identity: &PluginIdentity,
        callbacks: Vec<TriggerCallback>,
    ) -> Vec<String> {
        if callbacks.is_empty() {
            return Vec::new();
        }

        let namespace = identity.namespace();
        let mut names = Vec::with_capacity(callbacks.len());
        let mut batch = Vec::with_capacity(callbacks.len() * 2);

        {
            let mut triggers = self.triggers.write().await;
            for callback in callbacks {
                let name = loop {
                    let candidate = trigger_name(&namespace, rand::random::<u32>());
                    if !triggers.contains_key(&candidate) {
                        break candidate;
                    }
                };
                triggers.insert(name.clone(), callback);
                batch.push(grammar::add_trigger(&name));
                batch.push(grammar::enable_trigger(&name));
                names.push(name);
            }
        }

        info!(
            "Plugin {} registered {} trigger(s): {}",
            identity.display_name(),
            names.len(),
            names.join(", ")
        );
        self.run(&batch.join("\n")).await;
        StatsCounters::bump(&self.stats.triggers_registered, names.len() as u64);

        names
    }

    /// Single-callback form of [`Self::register_triggers`].
    pub async fn register_trigger<F>(&self, identity: &PluginIdentity, callback: F) -> String
    where
        F: Fn(String, i32) + Send + Sync + 'static,
    {
        let callback: TriggerCallback = Arc::new(callback);
        self.register_triggers(identity, vec![callback])
            .await
            .pop()
            .unwrap_or_default()
    }

    /// Names of every trigger currently bound to a callback.
    pub async fn trigger_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.triggers.read().await.keys().cloned().collect();
        names.sort();
        names
    }

    /// Entry point for console lines.
    ///
    /// Matching happens inline; the lookup, re-enable and callback run on
    /// the runtime so the bridge's reader is never blocked.
    pub fn process_log_line(self: &Arc<Self>, line: &str) {
        if self.shut_down.load(Ordering::SeqCst) {
            return;
        }
        let Some(fire) = grammar::parse_trigger_fire(line) else {
            return;
        };

        let core = Arc::clone(self);
        self.runtime.spawn(async move {
            core.dispatch_trigger(fire).await;
        });
    }

    /// Re-enables the trigger for everyone and hands the fire to its
    /// callback on a separate task. Unknown triggers are ignored.
    pub async fn dispatch_trigger(&self, fire: TriggerFire) {
        let callback = self.triggers.read().await.get(&fire.trigger).cloned();
        let Some(callback) = callback else {
            debug!("trigger {} fired by {} is not bound here", fire.trigger, fire.player);
            return;
        };

        self.run(&grammar::enable_trigger(&fire.trigger)).await;
        StatsCounters::bump(&self.stats.triggers_fired, 1);
        debug!("trigger {} fired by {} ({})", fire.trigger, fire.player, fire.value);

        let TriggerFire { player, value, .. } = fire;
        self.runtime.spawn(async move {
            callback(player, value);
        });
    }

    /// Removes every `tri_*` objective on the server that is not bound in
    /// this process, in one batched command. Returns how many were removed.
    pub async fn clear_stale_triggers(&self) -> usize {
        let reply = self.run(grammar::list_objectives()).await;
        let Some(names) = grammar::parse_objective_list(&reply) else {
            debug!("objective list not understood: {:?}", reply);
            return 0;
        };

        let stale: Vec<String> = {
            let live = self.triggers.read().await;
            names
                .into_iter()
                .filter(|name| grammar::is_trigger_objective(name) && !live.contains_key(name))
                .collect()
        };
        if stale.is_empty() {
            return 0;
        }

        let batch = stale
            .iter()
            .map(|name| grammar::remove_objective(name))
            .collect::<Vec<_>>()
            .join("\n");
        self.run(&batch).await;

        stale.len()
    }

    pub(super) fn attach_log_processor(self: &Arc<Self>) {
        let weak = Arc::downgrade(self);
        self.bridge.register_log_processor(
            &self.config.owner,
            Arc::new(move |line: &str, _suppressed: bool| {
                if let Some(core) = weak.upgrade() {
                    core.process_log_line(line);
                }
            }),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ScoreboardConfig;
    use console_bridge::MemoryConsole;
    use std::collections::HashSet;
    use std::time::Duration;
    use tokio::sync::mpsc;
    use tokio::time::timeout;

    fn setup() -> (Arc<MemoryConsole>, Arc<ScoreboardCore>) {
        let console = Arc::new(MemoryConsole::new());
        let core = ScoreboardCore::new(console.clone(), ScoreboardConfig::default());
        (console, core)
    }

    #[test]
    fn test_trigger_name_shape() {
        assert_eq!(trigger_name("6xMfI", 0), "tri_6xMfI_AAAAAA");
        assert_eq!(trigger_name("6xMfI", u32::MAX), "tri_6xMfI______w");

        let name = trigger_name("Y3rnr", 0x1234_abcd);
        assert!(name.starts_with("tri_Y3rnr_"));
        assert_eq!(name.len(), 16);
    }

    #[tokio::test]
    async fn test_register_triggers_single_batch() {
        let (console, core) = setup();
        let combat = PluginIdentity::new("combat");

        let first: TriggerCallback = Arc::new(|_, _| {});
        let second: TriggerCallback = Arc::new(|_, _| {});
        let names = core.register_triggers(&combat, vec![first, second]).await;

        assert_eq!(names.len(), 2);
        assert_ne!(names[0], names[1]);
        assert!(names.iter().all(|name| name.starts_with("tri_6xMfI_")));

        let commands = console.commands();
        assert_eq!(commands.len(), 1);
        let lines: Vec<&str> = commands[0].lines().collect();
        assert_eq!(
            lines,
            vec![
                format!("scoreboard objectives add {} trigger", names[0]),
                format!("scoreboard players enable @a {}", names[0]),
                format!("scoreboard objectives add {} trigger", names[1]),
                format!("scoreboard players enable @a {}", names[1]),
            ]
        );
        assert_eq!(core.stats().triggers_registered, 2);
    }

    #[tokio::test]
    async fn test_register_nothing_sends_nothing() {
        let (console, core) = setup();
        let names = core
            .register_triggers(&PluginIdentity::new("combat"), Vec::new())
            .await;
        assert!(names.is_empty());
        assert_eq!(console.command_count(), 0);
    }

    #[tokio::test]
    async fn test_many_registrations_stay_unique() {
        let (_console, core) = setup();
        let combat = PluginIdentity::new("combat");

        let mut seen = HashSet::new();
        for _ in 0..50 {
            let callbacks: Vec<TriggerCallback> = (0..20)
                .map(|_| Arc::new(|_: String, _: i32| {}) as TriggerCallback)
                .collect();
            for name in core.register_triggers(&combat, callbacks).await {
                assert!(seen.insert(name));
            }
        }
        assert_eq!(core.trigger_names().await.len(), 1000);
    }

    #[tokio::test]
    async fn test_fire_reenables_and_calls_back() {
        let (console, core) = setup();
        let (tx, mut rx) = mpsc::unbounded_channel();
        let name = core
            .register_trigger(&PluginIdentity::new("combat"), move |player, value| {
                let _ = tx.send((player, value));
            })
            .await;
        console.clear_commands();

        console.emit_line(&format!("[Alice: Triggered [{name}] (added 3 to value)]"));

        let fired = timeout(Duration::from_secs(1), rx.recv())
            .await
            .expect("callback should run")
            .expect("channel open");
        assert_eq!(fired, ("Alice".to_string(), 3));
        assert_eq!(console.commands(), vec![format!("scoreboard players enable @a {name}")]);
        assert_eq!(core.stats().triggers_fired, 1);
    }

    #[tokio::test]
    async fn test_unbound_or_unrelated_lines_do_nothing() {
        let (console, core) = setup();
        let (tx, mut rx) = mpsc::unbounded_channel::<(String, i32)>();
        let name = core
            .register_trigger(&PluginIdentity::new("combat"), move |player, value| {
                let _ = tx.send((player, value));
            })
            .await;
        console.clear_commands();

        console.emit_line("[12:00:00] [Server thread/INFO]: Alice joined the game");
        console.emit_line(&format!(
            "[12:00:01] [Server thread/INFO]: <Bob> x]: [Alice: Triggered [{name}] (set value to 9)]"
        ));
        console.emit_line("[Alice: Triggered [tri_zzzzz_AAAAAA] (added 3 to value)]");

        assert!(timeout(Duration::from_millis(200), rx.recv()).await.is_err());
        assert_eq!(console.command_count(), 0);
        assert_eq!(core.stats().triggers_fired, 0);
    }

    #[tokio::test]
    async fn test_clear_stale_triggers_removes_only_leftovers() {
        let (console, core) = setup();
        let live = core
            .register_trigger(&PluginIdentity::new("combat"), |_, _| {})
            .await;

        let listing = format!(
            "There are 5 objective(s): [6xMfI_kills], [tri_AAAAA_old1], [health], [tri_BBBBB_old2], [{live}]"
        );
        console.respond_with(move |command| {
            if command == "scoreboard objectives list" {
                listing.clone()
            } else {
                String::new()
            }
        });
        console.clear_commands();

        assert_eq!(core.clear_stale_triggers().await, 2);
        assert_eq!(
            console.commands(),
            vec![
                "scoreboard objectives list".to_string(),
                "scoreboard objectives remove tri_AAAAA_old1\nscoreboard objectives remove tri_BBBBB_old2"
                    .to_string(),
            ]
        );
    }

    #[tokio::test]
    async fn test_clear_with_nothing_stale_sends_only_listing() {
        let (console, core) = setup();
        console.respond_with(|_| "There are 1 objective(s): [health]".to_string());

        assert_eq!(core.clear_stale_triggers().await, 0);
        assert_eq!(console.commands(), vec!["scoreboard objectives list"]);
    }
}
