//! Battle lifecycle phases

use std::fmt;

/// Where a battle is in its lifecycle
///
/// ```text
/// Idle ──prepare──▶ Preparing ──confirm──▶ Active ──knockout──▶ Finished
///   ▲                                                              │
///   └──────────────────────────── reset ───────────────────────────┘
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum BattlePhase {
    #[default]
    Idle,
    Preparing,
    Active,
    Finished,
}

impl BattlePhase {
    /// Whether moves are accepted
    pub fn accepts_moves(self) -> bool {
        self == BattlePhase::Active
    }
}

impl fmt::Display for BattlePhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            BattlePhase::Idle => "idle",
            BattlePhase::Preparing => "preparing",
            BattlePhase::Active => "active",
            BattlePhase::Finished => "finished",
        })
    }
}
