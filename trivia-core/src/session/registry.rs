//! SessionRegistry for tracking which channels have a game running
//!
//! Sessions are keyed by team, then channel. A pair that was never seen is
//! simply not playing. Entries are never removed; stopping a game stores
//! `false`.

use std::collections::HashMap;

use tokio::sync::RwLock;

/// Tracks the active/inactive game state per (team, channel)
#[derive(Default)]
pub struct SessionRegistry {
    /// Game state indexed by team, then channel
    teams: RwLock<HashMap<String, HashMap<String, bool>>>,
}

impl SessionRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark the game in `channel` of `team` as started or stopped
    ///
    /// Idempotent. Creates the team's channel map on first use.
    pub async fn set_active(&self, team: &str, channel: &str, active: bool) {
        self.teams
            .write()
            .await
            .entry(team.to_string())
            .or_default()
            .insert(channel.to_string(), active);
    }

    /// Whether a game is running in `channel` of `team`
    ///
    /// Unknown teams and channels are not playing.
    pub async fn is_active(&self, team: &str, channel: &str) -> bool {
        self.teams
            .read()
            .await
            .get(team)
            .and_then(|channels| channels.get(channel))
            .copied()
            .unwrap_or(false)
    }

    /// All (team, channel) pairs with a running game, sorted
    pub async fn active_channels(&self) -> Vec<(String, String)> {
        let mut active: Vec<_> = self
            .teams
            .read()
            .await
            .iter()
            .flat_map(|(team, channels)| {
                channels
                    .iter()
                    .filter(|(_, active)| **active)
                    .map(move |(channel, _)| (team.clone(), channel.clone()))
            })
            .collect();
        active.sort();
        active
    }
}
