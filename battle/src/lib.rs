//! Turn-based battle engine for the plant arena.
//!
//! This crate derives combat stats and move sets from persistent plant
//! attributes and resolves one-on-one battles between them.
//!
//! # Overview
//!
//! ```text
//! arena-model (entities, moves, records)
//!        │
//!        ▼
//! arena-battle (engine) ← THIS CRATE
//!        │
//!        └─> arena-client (async sessions, result reporting)
//! ```
//!
//! # Main Types
//!
//! - [`MoveCatalog`] - Category → base move table, built once per process
//! - [`StatBlock`] - Attack and defense derived from an entity
//! - [`CombatantFactory`] - Builds battle-ready [`Combatant`]s, including
//!   synthetic opponents
//! - [`apply_move`] - Pure single-move resolution
//! - [`BattleController`] - Idle → Preparing → Active → Finished state machine
//! - [`MoveStrategy`] - Pluggable opponent move selection
//!
//! # Example Usage
//!
//! ```
//! use arena_battle::{BattleController, OpponentSource};
//! use arena_model::{Category, Entity};
//!
//! let mut battle = BattleController::new();
//! let basil = Entity::new("basil-1", "Basil", Category::Herbs);
//!
//! battle
//!     .prepare(&basil, OpponentSource::Synthetic, &mut rand::thread_rng())
//!     .unwrap();
//! battle.confirm().unwrap();
//!
//! while !battle.is_finished() {
//!     let player = battle.player().unwrap();
//!     let choice = player.affordable_moves().next().unwrap_or(0);
//!     battle.play_exchange(choice).unwrap();
//! }
//! println!("{}", battle.log());
//! ```

pub mod catalog;
pub mod controller;
pub mod error;
pub mod factory;
pub mod resolve;
pub mod types;

// Re-export main types at crate root for convenience
pub use catalog::MoveCatalog;
pub use controller::{
    BattleController, BattleOutcome, BattlePhase, Exchange, MoveStrategy, Participant,
    RandomStrategy, ScriptedStrategy,
};
pub use error::{BattleError, MoveRejection};
pub use factory::{BuildOptions, CombatantFactory, DefenseScaling, OpponentSource};
pub use resolve::{MoveResult, TurnOutcome, apply_move, pass_turn};
pub use types::{Combatant, Side, StatBlock, win_rate_bonus};

// Re-export commonly used model types
pub use arena_model::{Category, Entity, Move, MoveEffect, MoveKind};
