use thiserror::Error;

pub mod entity;
pub mod moves;
pub mod record;

pub use entity::{Category, Entity};
pub use moves::{Move, MoveEffect, MoveKind};
pub use record::{BattleRecord, LeaderboardRow, StatKind};

#[derive(Error, Debug)]
pub enum ModelError {
    #[error("Unknown category: {0}")]
    UnknownCategory(String),

    #[error("Invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
}
