//! Combatant state types

use arena_model::{Category, Move, MoveKind};

use super::stats::StatBlock;

/// Identifier given to generated opponents that have no backing entity
pub const SYNTHETIC_ID: &str = "enemy";

/// Energy pool ceiling; combatants start full
pub const MAX_ENERGY: u32 = 100;

/// Largest damage reduction a defense buff can hold
pub const MAX_DEFENSE_BUFF: f64 = 0.75;

/// Floor applied to maximum health at battle start
pub const MIN_MAX_HEALTH: u32 = 10;

/// Per-battle combat state derived from an entity
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Combatant {
    /// Entity id, or [`SYNTHETIC_ID`] for generated opponents
    pub id: String,

    /// Owning account (None for generated opponents)
    pub owner_id: Option<String>,

    /// Generated opponent with no backing entity
    #[cfg_attr(feature = "serde", serde(default))]
    pub synthetic: bool,

    pub name: String,
    pub icon: String,
    pub category: Category,

    // === Pools ===
    /// Current health, 0..=max_health
    pub health: u32,

    /// Fixed at battle start
    pub max_health: u32,

    /// 0..=MAX_ENERGY
    pub energy: u32,

    // === Stats ===
    pub attack: u32,
    pub defense: u32,

    /// Active damage reduction from a defense move, 0..=MAX_DEFENSE_BUFF
    pub defense_buff: f64,

    /// Scaled moves owned by this combatant
    pub moves: Vec<Move>,
}

impl Combatant {
    /// Create a combatant at full health and energy
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        category: Category,
        max_health: u32,
        stats: StatBlock,
        moves: Vec<Move>,
    ) -> Self {
        let max_health = max_health.max(MIN_MAX_HEALTH);
        Self {
            id: id.into(),
            owner_id: None,
            synthetic: false,
            name: name.into(),
            icon: category.icon().to_string(),
            category,
            health: max_health,
            max_health,
            energy: MAX_ENERGY,
            attack: stats.attack,
            defense: stats.defense,
            defense_buff: 0.0,
            moves,
        }
    }

    /// Whether this combatant was generated rather than built from an entity
    pub fn is_synthetic(&self) -> bool {
        self.synthetic
    }

    /// Check if combatant can still fight
    pub fn is_alive(&self) -> bool {
        self.health > 0
    }

    /// Get health as percentage (0-100)
    pub fn health_percent(&self) -> u32 {
        if self.max_health == 0 {
            return 0;
        }
        (self.health * 100) / self.max_health
    }

    /// Move at a position in the move list
    pub fn move_at(&self, index: usize) -> Option<&Move> {
        self.moves.get(index)
    }

    /// Whether the combatant has enough energy for a move
    pub fn can_afford(&self, mv: &Move) -> bool {
        self.energy >= mv.cost()
    }

    /// Indices of moves that would not fail for lack of energy
    pub fn affordable_moves(&self) -> impl Iterator<Item = usize> + '_ {
        self.moves
            .iter()
            .enumerate()
            .filter(|(_, mv)| self.can_afford(mv))
            .map(|(i, _)| i)
    }

    /// Index of the move with this name
    pub fn move_index(&self, name: &str) -> Option<usize> {
        self.moves.iter().position(|mv| mv.name == name)
    }

    /// First move of the given kind
    pub fn find_move(&self, kind: MoveKind) -> Option<usize> {
        self.moves.iter().position(|mv| mv.kind() == kind)
    }

    /// Set health, clamped to 0..=max_health
    pub fn set_health(&mut self, health: u32) {
        self.health = health.min(self.max_health);
    }

    /// Set energy, clamped to 0..=MAX_ENERGY
    pub fn set_energy(&mut self, energy: u32) {
        self.energy = energy.min(MAX_ENERGY);
    }

    /// Set the defense buff, clamped to 0..=MAX_DEFENSE_BUFF
    pub fn set_defense_buff(&mut self, buff: f64) {
        self.defense_buff = if buff.is_finite() {
            buff.clamp(0.0, MAX_DEFENSE_BUFF)
        } else {
            0.0
        };
    }

    /// Drop any active defense buff
    pub fn clear_buff(&mut self) {
        self.defense_buff = 0.0;
    }
}
