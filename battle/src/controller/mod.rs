//! Match state machine
//!
//! [`BattleController`] drives a battle through its phases and applies
//! moves through [`apply_move`](crate::resolve::apply_move). Pacing of the
//! opponent's answer is left to the caller: [`BattleController::submit_move`]
//! and [`BattleController::resolve_counter`] are separate steps, and a second
//! player move is refused until the counter has been played.

mod battle;
mod exchange;
mod phase;
mod strategy;

pub use battle::{BattleController, BattleOutcome, Participant};
pub use exchange::Exchange;
pub use phase::BattlePhase;
pub use strategy::{MoveStrategy, RandomStrategy, ScriptedStrategy};
