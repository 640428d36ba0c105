//! Move templates and scaled moves

use std::fmt;

use serde::{Deserialize, Serialize};

/// Move type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MoveKind {
    Attack,
    Defense,
    Heal,
}

impl fmt::Display for MoveKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(match self {
            MoveKind::Attack => "attack",
            MoveKind::Defense => "defense",
            MoveKind::Heal => "heal",
        })
    }
}

/// What a move does when applied.
///
/// Attack and heal power are flat amounts. Defense power is a damage
/// reduction fraction, clamped to 0.75 when it becomes a buff.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum MoveEffect {
    Attack { power: u32, cost: u32 },
    Defense { reduction: f64 },
    Heal { amount: u32 },
}

impl MoveEffect {
    pub fn kind(&self) -> MoveKind {
        match self {
            MoveEffect::Attack { .. } => MoveKind::Attack,
            MoveEffect::Defense { .. } => MoveKind::Defense,
            MoveEffect::Heal { .. } => MoveKind::Heal,
        }
    }

    /// Reference power as a float (reduction fraction for defense moves)
    pub fn power(&self) -> f64 {
        match *self {
            MoveEffect::Attack { power, .. } => f64::from(power),
            MoveEffect::Defense { reduction } => reduction,
            MoveEffect::Heal { amount } => f64::from(amount),
        }
    }

    /// Energy cost; only attacks cost energy
    pub fn cost(&self) -> u32 {
        match *self {
            MoveEffect::Attack { cost, .. } => cost,
            _ => 0,
        }
    }
}

/// A named move. Templates live in the move catalog; each combatant owns
/// its own scaled copies.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Move {
    pub name: String,
    #[serde(flatten)]
    pub effect: MoveEffect,
}

impl Move {
    pub fn attack(name: impl Into<String>, power: u32, cost: u32) -> Self {
        Self {
            name: name.into(),
            effect: MoveEffect::Attack { power, cost },
        }
    }

    pub fn defense(name: impl Into<String>, reduction: f64) -> Self {
        Self {
            name: name.into(),
            effect: MoveEffect::Defense { reduction },
        }
    }

    pub fn heal(name: impl Into<String>, amount: u32) -> Self {
        Self {
            name: name.into(),
            effect: MoveEffect::Heal { amount },
        }
    }

    pub fn kind(&self) -> MoveKind {
        self.effect.kind()
    }

    pub fn power(&self) -> f64 {
        self.effect.power()
    }

    pub fn cost(&self) -> u32 {
        self.effect.cost()
    }
}
