//! Per-plugin view of the shared engine.

use crate::grammar::ScoreOp;
use crate::namespace::PluginIdentity;
use crate::system::{ScoreboardCore, TriggerCallback};
use std::sync::Arc;

/// A [`ScoreboardCore`] bound to one plugin identity.
///
/// Plugins pass logical objective names (`kills`); the handle adds the
/// namespace. Cloning is cheap and every clone talks to the same engine.
#[derive(Debug, Clone)]
pub struct PluginScoreboard {
    core: Arc<ScoreboardCore>,
    identity: PluginIdentity,
}

impl PluginScoreboard {
    pub fn new(core: Arc<ScoreboardCore>, identity: PluginIdentity) -> Self {
        Self { core, identity }
    }

    pub fn identity(&self) -> &PluginIdentity {
        &self.identity
    }

    pub fn core(&self) -> &Arc<ScoreboardCore> {
        &self.core
    }

    /// Namespace token of this plugin.
    pub fn namespace(&self) -> String {
        self.identity.namespace()
    }

    /// Server-side name of a logical objective.
    pub fn objective_name(&self, name: &str) -> String {
        self.identity.objective_name(name)
    }

    pub async fn ensure_objective(&self, name: &str, criterion: &str, display_name: &str) {
        self.core
            .ensure_objective(&self.identity, name, criterion, display_name)
            .await;
    }

    pub async fn display_objective(&self, name: &str, slot: &str) {
        self.core.display_objective(&self.identity, name, slot).await;
    }

    pub async fn score_action(&self, player: &str, name: &str, op: ScoreOp, count: i64) {
        self.core
            .score_action(&self.identity, player, name, op, count)
            .await;
    }

    pub async fn set_score(&self, player: &str, name: &str, count: i64) {
        self.score_action(player, name, ScoreOp::Set, count).await;
    }

    pub async fn add_score(&self, player: &str, name: &str, count: i64) {
        self.score_action(player, name, ScoreOp::Add, count).await;
    }

    pub async fn remove_score(&self, player: &str, name: &str, count: i64) {
        self.score_action(player, name, ScoreOp::Remove, count).await;
    }

    /// Fresh value from the server, 0 when unknown.
    pub async fn get_score(&self, player: &str, name: &str) -> i64 {
        self.core.get_one_score(&self.identity, player, name).await
    }

    pub async fn register_trigger<F>(&self, callback: F) -> String
    where
        F: Fn(String, i32) + Send + Sync + 'static,
    {
        self.core.register_trigger(&self.identity, callback).await
    }

    pub async fn register_triggers(&self, callbacks: Vec<TriggerCallback>) -> Vec<String> {
        self.core.register_triggers(&self.identity, callbacks).await
    }
}

impl ScoreboardCore {
    /// Hands out a namespaced view for `identity`.
    pub fn plugin(self: &Arc<Self>, identity: PluginIdentity) -> PluginScoreboard {
        PluginScoreboard::new(Arc::clone(self), identity)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ScoreboardConfig;
    use console_bridge::MemoryConsole;

    #[tokio::test]
    async fn test_handle_applies_namespace() {
        let console = Arc::new(MemoryConsole::new());
        let core = ScoreboardCore::new(console.clone(), ScoreboardConfig::default());
        let economy = core.plugin(PluginIdentity::with_display_name("economy", "Economy"));

        assert_eq!(economy.namespace(), "Y3rnr");
        assert_eq!(economy.objective_name("coins"), "Y3rnr_coins");

        economy.ensure_objective("coins", "dummy", "Coins").await;
        economy.add_score("Alice", "coins", 5).await;
        economy.remove_score("Alice", "coins", 2).await;
        economy.set_score("Bob", "coins", 1).await;

        assert_eq!(
            console.commands(),
            vec![
                "scoreboard objectives add Y3rnr_coins dummy Coins",
                "scoreboard players add Alice Y3rnr_coins 5",
                "scoreboard players remove Alice Y3rnr_coins 2",
                "scoreboard players set Bob Y3rnr_coins 1",
            ]
        );
    }
}
