//! Async glue between the battle engine and an interactive front end.
//!
//! [`ArenaSession`] drives one battle at a time and paces the opponent's
//! answer, [`ResultReporter`] persists finished battles through the
//! [`EntityStore`] and [`BattleStore`] collaborators.

mod config;
pub mod memory;
pub mod reporter;
mod session;
pub mod store;

pub use arena_battle::{
    BattleError, BattleOutcome, BattlePhase, Combatant, Exchange, MoveRejection, MoveResult,
    MoveStrategy, OpponentSource, RandomStrategy, ScriptedStrategy, Side, TurnOutcome,
};
pub use arena_model::{BattleRecord, Category, Entity, LeaderboardRow, StatKind};

pub use config::SessionConfig;
pub use memory::{MemoryBattleStore, MemoryEntityStore};
pub use reporter::{CounterUpdate, RemoteSummary, Report, ReportError, ResultReporter};
pub use session::{ArenaSession, BattleSnapshot, SessionError};
pub use store::{BattleStore, EntityStore, StoreError};
