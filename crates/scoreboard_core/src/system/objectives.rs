/// Objective registry
use super::core::ScoreboardCore;
use crate::grammar::{self, ScoreOp};
use crate::namespace::PluginIdentity;
use crate::stats::StatsCounters;
use tracing::{info, warn};

impl ScoreboardCore {
    /// Makes sure `<namespace>_<name>` exists on the server.
    ///
    /// The first call creates the objective, records it and schedules a
    /// debounced sync so the cache learns its values. Later calls with the
    /// same identity and name return without touching the console.
    pub async fn ensure_objective(
        &self,
        identity: &PluginIdentity,
        name: &str,
        criterion: &str,
        display_name: &str,
    ) {
        let objective = identity.objective_name(name);
        if self.is_objective_registered(&objective).await {
            return;
        }

        info!(
            "Plugin {} registered scoreboard {} ({}) [{}]",
            identity.display_name(),
            name,
            display_name,
            criterion
        );
        self.run(&grammar::add_objective(&objective, criterion, display_name))
            .await;

        {
            let mut objectives = self.objectives.write().await;
            // a concurrent caller may have registered it while we were on the
            // console; its duplicate add command was already sent and is tolerated
            if objectives.contains(&objective) {
                return;
            }
            objectives.push(objective);
        }

        StatsCounters::bump(&self.stats.objectives_registered, 1);
        self.request_sync();
    }

    /// Shows the objective in a display slot (`sidebar`, `list`, ...).
    ///
    /// No-op unless the objective was created with [`Self::ensure_objective`].
    pub async fn display_objective(&self, identity: &PluginIdentity, name: &str, slot: &str) {
        let objective = identity.objective_name(name);
        if !self.is_objective_registered(&objective).await {
            warn!("setdisplay on unregistered objective {} ignored", objective);
            return;
        }
        self.run(&grammar::set_display(slot, &objective)).await;
    }

    /// Applies `op` with `count` to a player's score.
    ///
    /// No-op unless the objective was created with [`Self::ensure_objective`].
    /// The local cache is not touched; the new value is picked up by the next
    /// refresh.
    pub async fn score_action(
        &self,
        identity: &PluginIdentity,
        player: &str,
        name: &str,
        op: ScoreOp,
        count: i64,
    ) {
        let objective = identity.objective_name(name);
        if !self.is_objective_registered(&objective).await {
            warn!("{} on unregistered objective {} ignored", op, objective);
            return;
        }
        self.run(&grammar::score_op(op, player, &objective, count))
            .await;
    }

    /// Namespaced names of every registered objective, in creation order.
    pub async fn objectives(&self) -> Vec<String> {
        self.objectives.read().await.clone()
    }

    pub(super) async fn is_objective_registered(&self, objective: &str) -> bool {
        self.objectives
            .read()
            .await
            .iter()
            .any(|known| known == objective)
    }
}
