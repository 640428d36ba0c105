//! Durable battle records and leaderboard rows

use serde::{Deserialize, Serialize};

/// Persistent counter on an entity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StatKind {
    Victories,
    Defeats,
}

/// Immutable record of a battle between two real accounts
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BattleRecord {
    /// Challenger account
    pub participant_a: String,

    /// Challenged account
    pub participant_b: String,

    /// Entity fielded by participant A
    pub combatant_a_id: String,

    /// Entity fielded by participant B
    pub combatant_b_id: String,

    /// Entity id of the winner
    pub winner_id: String,

    /// Unix seconds
    pub timestamp: u64,
}

impl BattleRecord {
    /// Account that won, if the winner id matches either combatant
    pub fn winning_participant(&self) -> Option<&str> {
        if self.winner_id == self.combatant_a_id {
            Some(&self.participant_a)
        } else if self.winner_id == self.combatant_b_id {
            Some(&self.participant_b)
        } else {
            None
        }
    }

    /// Whether the given account took part
    pub fn involves(&self, user_id: &str) -> bool {
        self.participant_a == user_id || self.participant_b == user_id
    }
}

/// Aggregated per-account results, joined with the account name
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaderboardRow {
    pub user_id: String,
    pub name: String,
    pub victories: u32,
    pub defeats: u32,
}

impl LeaderboardRow {
    /// Win rate in 0.0-1.0, 0 when no battles were recorded
    pub fn win_rate(&self) -> f64 {
        let total = self.victories + self.defeats;
        if total == 0 {
            0.0
        } else {
            f64::from(self.victories) / f64::from(total)
        }
    }
}
