//! Storage collaborators.
//!
//! Two layers:
//! - [`EntityStore`]: the local entity store the app already owns
//! - [`BattleStore`]: optional remote storage shared between accounts

use arena_model::{BattleRecord, Entity, LeaderboardRow, StatKind};
use async_trait::async_trait;

/// Storage errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    #[error("Store unavailable: {0}")]
    Unavailable(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Conflicting write: {0}")]
    Conflict(String),
}

/// Local entity storage.
///
/// `increment_stat` must be atomic with respect to other increments of the
/// same entity; callers never read-modify-write counters themselves.
#[async_trait]
pub trait EntityStore: Send + Sync {
    /// Fetch a single entity
    async fn get_by_id(&self, id: &str) -> Result<Entity, StoreError>;

    /// Fetch several entities. Unknown ids are skipped.
    async fn get_many(&self, ids: &[String]) -> Result<Vec<Entity>, StoreError>;

    /// Add one to a counter and return the new value
    async fn increment_stat(&self, id: &str, stat: StatKind) -> Result<u32, StoreError>;
}

/// Remote storage for battles between accounts.
#[async_trait]
pub trait BattleStore: Send + Sync {
    /// Persist an immutable battle record
    async fn insert_battle_record(&self, record: BattleRecord) -> Result<(), StoreError>;

    /// Add one to a remote entity counter and return the new value
    async fn increment_entity_stat(&self, entity_id: &str, stat: StatKind)
    -> Result<u32, StoreError>;

    /// Records involving an account, newest first
    async fn list_battles_for_user(&self, user_id: &str) -> Result<Vec<BattleRecord>, StoreError>;

    /// Per-account totals, best first
    async fn list_leaderboard(&self) -> Result<Vec<LeaderboardRow>, StoreError>;
}
