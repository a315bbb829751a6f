/// Score cache and refresh
use super::core::{ScoreSnapshot, ScoreboardCore};
use crate::grammar;
use crate::namespace::PluginIdentity;
use crate::stats::StatsCounters;
use tracing::debug;

impl ScoreboardCore {
    /// Refreshes one score from the server and returns it.
    ///
    /// Unknown values (never reported, unparsable reply, unregistered
    /// objective) read as 0.
    pub async fn get_one_score(&self, identity: &PluginIdentity, player: &str, name: &str) -> i64 {
        let objective = identity.objective_name(name);
        self.sync_one_score(player, &objective).await;
        self.cached_score(player, &objective).await.unwrap_or(0)
    }

    /// Runs a full sync and returns a copy of the whole cache.
    pub async fn get_all_scores(&self) -> ScoreSnapshot {
        self.full_sync().await;
        self.scores.read().await.clone()
    }

    /// Cached value without any round trip. `None` means unknown.
    pub async fn cached_score(&self, player: &str, objective: &str) -> Option<i64> {
        self.scores
            .read()
            .await
            .get(player)
            .and_then(|objectives| objectives.get(objective))
            .copied()
    }

    async fn sync_one_score(&self, player: &str, objective: &str) {
        if !self.is_objective_registered(objective).await {
            return;
        }

        let reply = self.run(&grammar::get_score(player, objective)).await;
        StatsCounters::bump(&self.stats.single_syncs, 1);

        match grammar::parse_score(&reply) {
            Some(value) => {
                self.scores
                    .write()
                    .await
                    .entry(player.to_string())
                    .or_default()
                    .insert(objective.to_string(), value);
            }
            None => debug!("no score for {} in {}: {:?}", player, objective, reply),
        }
    }

    /// Refreshes every known objective for every tracked player.
    ///
    /// Players missing from the tracked list keep their cached values. The
    /// results are published under one short write lock after all round
    /// trips have finished.
    pub(super) async fn full_sync(&self) {
        StatsCounters::bump(&self.stats.full_syncs, 1);

        let reply = self.run(grammar::list_tracked_players()).await;
        let Some(players) = grammar::parse_tracked_players(&reply) else {
            debug!("tracked player list not understood: {:?}", reply);
            return;
        };

        let objectives = self.objectives.read().await.clone();
        let mut fetched: Vec<(String, String, i64)> = Vec::new();

        for player in &players {
            for objective in &objectives {
                let reply = self.run(&grammar::get_score(player, objective)).await;
                if let Some(value) = grammar::parse_score(&reply) {
                    fetched.push((player.clone(), objective.clone(), value));
                }
            }
        }

        let mut scores = self.scores.write().await;
        for player in &players {
            scores.entry(player.clone()).or_default();
        }
        for (player, objective, value) in fetched {
            scores.entry(player).or_default().insert(objective, value);
        }

        debug!(
            "full sync: {} players x {} objectives",
            players.len(),
            objectives.len()
        );
    }
}
