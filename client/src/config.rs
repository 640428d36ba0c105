use std::time::Duration;

use arena_battle::{BuildOptions, DefenseScaling};
use serde::{Deserialize, Serialize};

/// Tunables for an [`ArenaSession`](crate::ArenaSession)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Pause before the opponent answers a player move, in milliseconds.
    /// Zero answers immediately.
    pub opponent_delay_ms: u64,

    /// Seed for stat derivation and the default opponent strategy
    pub seed: Option<u64>,

    pub defense_scaling: DefenseScaling,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            opponent_delay_ms: 1000,
            seed: None,
            defense_scaling: DefenseScaling::default(),
        }
    }
}

impl SessionConfig {
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Session that never waits, seeded for reproducible battles
    pub fn instant(seed: u64) -> Self {
        Self {
            opponent_delay_ms: 0,
            seed: Some(seed),
            ..Self::default()
        }
    }

    pub fn opponent_delay(&self) -> Option<Duration> {
        (self.opponent_delay_ms > 0).then(|| Duration::from_millis(self.opponent_delay_ms))
    }

    pub fn build_options(&self) -> BuildOptions {
        BuildOptions {
            defense_scaling: self.defense_scaling,
        }
    }
}
