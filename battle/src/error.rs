use thiserror::Error;

use crate::controller::BattlePhase;

/// Why a move selection was refused
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MoveRejection {
    #[error("move {index} is out of range ({available} moves available)")]
    OutOfRange { index: usize, available: usize },

    #[error("no move named {0:?}")]
    UnknownMove(String),

    #[error("battle is {0}, not active")]
    NotActive(BattlePhase),

    #[error("opponent has not answered the previous move yet")]
    CounterPending,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BattleError {
    #[error("Invalid move selection: {0}")]
    InvalidMoveSelection(MoveRejection),

    #[error("Opponent roster is empty")]
    MissingOpponentData,

    #[error("Cannot {action} while battle is {phase}")]
    InvalidTransition {
        action: &'static str,
        phase: BattlePhase,
    },

    #[error("Invalid move catalog: {0}")]
    Catalog(String),
}

impl BattleError {
    /// Move-selection errors leave the battle untouched and can be retried
    pub fn is_recoverable(&self) -> bool {
        matches!(self, BattleError::InvalidMoveSelection(_))
    }
}

impl From<MoveRejection> for BattleError {
    fn from(rejection: MoveRejection) -> Self {
        BattleError::InvalidMoveSelection(rejection)
    }
}
