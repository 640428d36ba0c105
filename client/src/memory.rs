//! In-memory stores for tests, demos and offline play.
//!
//! Both stores are cheap to clone; clones share the same data. Either can be
//! switched offline to simulate an unreachable backend.

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use arena_model::{BattleRecord, Entity, LeaderboardRow, StatKind};
use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::store::{BattleStore, EntityStore, StoreError};

fn bump(counters: &mut (u32, u32), stat: StatKind) -> u32 {
    let slot = match stat {
        StatKind::Victories => &mut counters.0,
        StatKind::Defeats => &mut counters.1,
    };
    *slot = slot.saturating_add(1);
    *slot
}

/// Entity store backed by a map
#[derive(Clone, Default)]
pub struct MemoryEntityStore {
    entities: Arc<Mutex<HashMap<String, Entity>>>,
    offline: Arc<AtomicBool>,
}

impl MemoryEntityStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store seeded with entities
    pub fn with_entities(entities: impl IntoIterator<Item = Entity>) -> Self {
        let map = entities.into_iter().map(|e| (e.id.clone(), e)).collect();
        Self {
            entities: Arc::new(Mutex::new(map)),
            offline: Arc::default(),
        }
    }

    /// Insert or replace an entity
    pub async fn insert(&self, entity: Entity) {
        self.entities.lock().await.insert(entity.id.clone(), entity);
    }

    /// Make every call fail with [`StoreError::Unavailable`]
    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::Relaxed);
    }

    fn check_online(&self) -> Result<(), StoreError> {
        if self.offline.load(Ordering::Relaxed) {
            Err(StoreError::Unavailable("entity store offline".to_string()))
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl EntityStore for MemoryEntityStore {
    async fn get_by_id(&self, id: &str) -> Result<Entity, StoreError> {
        self.check_online()?;
        self.entities
            .lock()
            .await
            .get(id)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(id.to_string()))
    }

    async fn get_many(&self, ids: &[String]) -> Result<Vec<Entity>, StoreError> {
        self.check_online()?;
        let entities = self.entities.lock().await;
        Ok(ids.iter().filter_map(|id| entities.get(id).cloned()).collect())
    }

    async fn increment_stat(&self, id: &str, stat: StatKind) -> Result<u32, StoreError> {
        self.check_online()?;
        let mut entities = self.entities.lock().await;
        let entity = entities
            .get_mut(id)
            .ok_or_else(|| StoreError::NotFound(id.to_string()))?;

        let mut counters = (entity.victories, entity.defeats);
        let value = bump(&mut counters, stat);
        (entity.victories, entity.defeats) = counters;
        Ok(value)
    }
}

#[derive(Default)]
struct BattleTables {
    records: Vec<BattleRecord>,
    /// Account id → display name
    users: HashMap<String, String>,
    /// Entity id → (victories, defeats)
    entity_stats: HashMap<String, (u32, u32)>,
}

/// Remote battle storage simulated in memory
#[derive(Clone, Default)]
pub struct MemoryBattleStore {
    tables: Arc<Mutex<BattleTables>>,
    offline: Arc<AtomicBool>,
}

impl MemoryBattleStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an account name for leaderboard rows
    pub async fn register_user(&self, user_id: impl Into<String>, name: impl Into<String>) {
        self.tables
            .lock()
            .await
            .users
            .insert(user_id.into(), name.into());
    }

    /// Remote (victories, defeats) of an entity
    pub async fn entity_stats(&self, entity_id: &str) -> (u32, u32) {
        self.tables
            .lock()
            .await
            .entity_stats
            .get(entity_id)
            .copied()
            .unwrap_or_default()
    }

    /// All records in insertion order
    pub async fn records(&self) -> Vec<BattleRecord> {
        self.tables.lock().await.records.clone()
    }

    /// Make every call fail with [`StoreError::Unavailable`]
    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::Relaxed);
    }

    fn check_online(&self) -> Result<(), StoreError> {
        if self.offline.load(Ordering::Relaxed) {
            Err(StoreError::Unavailable("battle store offline".to_string()))
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl BattleStore for MemoryBattleStore {
    async fn insert_battle_record(&self, record: BattleRecord) -> Result<(), StoreError> {
        self.check_online()?;
        self.tables.lock().await.records.push(record);
        Ok(())
    }

    async fn increment_entity_stat(
        &self,
        entity_id: &str,
        stat: StatKind,
    ) -> Result<u32, StoreError> {
        self.check_online()?;
        let mut tables = self.tables.lock().await;
        let counters = tables
            .entity_stats
            .entry(entity_id.to_string())
            .or_default();
        Ok(bump(counters, stat))
    }

    async fn list_battles_for_user(&self, user_id: &str) -> Result<Vec<BattleRecord>, StoreError> {
        self.check_online()?;
        let tables = self.tables.lock().await;

        // Reversed first so equal timestamps keep newest-inserted first
        let mut records: Vec<_> = tables
            .records
            .iter()
            .rev()
            .filter(|r| r.involves(user_id))
            .cloned()
            .collect();
        records.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        Ok(records)
    }

    async fn list_leaderboard(&self) -> Result<Vec<LeaderboardRow>, StoreError> {
        self.check_online()?;
        let tables = self.tables.lock().await;

        let mut totals: HashMap<&str, (u32, u32)> = tables
            .users
            .keys()
            .map(|id| (id.as_str(), (0, 0)))
            .collect();

        for record in &tables.records {
            let Some(winner) = record.winning_participant() else {
                continue;
            };
            let loser = if winner == record.participant_a {
                &record.participant_b
            } else {
                &record.participant_a
            };
            bump(totals.entry(winner).or_default(), StatKind::Victories);
            bump(totals.entry(loser.as_str()).or_default(), StatKind::Defeats);
        }

        let mut rows: Vec<_> = totals
            .into_iter()
            .map(|(user_id, (victories, defeats))| LeaderboardRow {
                user_id: user_id.to_string(),
                name: tables
                    .users
                    .get(user_id)
                    .cloned()
                    .unwrap_or_else(|| user_id.to_string()),
                victories,
                defeats,
            })
            .collect();

        rows.sort_by(|a, b| {
            b.victories
                .cmp(&a.victories)
                .then(a.defeats.cmp(&b.defeats))
                .then_with(|| a.name.cmp(&b.name))
        });
        Ok(rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use arena_model::Category;

    fn record(a: &str, b: &str, winner: &str, timestamp: u64) -> BattleRecord {
        BattleRecord {
            participant_a: a.to_string(),
            participant_b: b.to_string(),
            combatant_a_id: format!("{a}-plant"),
            combatant_b_id: format!("{b}-plant"),
            winner_id: format!("{winner}-plant"),
            timestamp,
        }
    }

    #[tokio::test]
    async fn test_entity_store_lookup() {
        let store = MemoryEntityStore::with_entities([
            Entity::new("basil-1", "Basil", Category::Herbs),
            Entity::new("aloe-1", "Aloe", Category::Succulents),
        ]);

        assert_eq!(store.get_by_id("aloe-1").await.unwrap().name, "Aloe");
        assert_eq!(
            store.get_by_id("rose-1").await,
            Err(StoreError::NotFound("rose-1".to_string()))
        );

        let ids = vec!["aloe-1".to_string(), "rose-1".to_string(), "basil-1".to_string()];
        let found: Vec<_> = store
            .get_many(&ids)
            .await
            .unwrap()
            .into_iter()
            .map(|e| e.id)
            .collect();
        assert_eq!(found, vec!["aloe-1", "basil-1"]);
    }

    #[tokio::test]
    async fn test_entity_store_increment() {
        let store = MemoryEntityStore::new();
        store.insert(Entity::new("basil-1", "Basil", Category::Herbs)).await;

        assert_eq!(store.increment_stat("basil-1", StatKind::Victories).await, Ok(1));
        assert_eq!(store.increment_stat("basil-1", StatKind::Victories).await, Ok(2));
        assert_eq!(store.increment_stat("basil-1", StatKind::Defeats).await, Ok(1));

        let basil = store.get_by_id("basil-1").await.unwrap();
        assert_eq!((basil.victories, basil.defeats), (2, 1));

        assert!(matches!(
            store.increment_stat("nope", StatKind::Defeats).await,
            Err(StoreError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_concurrent_increments_are_not_lost() {
        let store = MemoryEntityStore::with_entities([Entity::new("fern-1", "Fern", Category::Other)]);

        let handles: Vec<_> = (0..50)
            .map(|_| {
                let store = store.clone();
                tokio::spawn(async move { store.increment_stat("fern-1", StatKind::Victories).await })
            })
            .collect();
        for handle in handles {
            handle.await.unwrap().unwrap();
        }

        assert_eq!(store.get_by_id("fern-1").await.unwrap().victories, 50);
    }

    #[tokio::test]
    async fn test_offline_stores() {
        let entities = MemoryEntityStore::with_entities([Entity::new("fern-1", "Fern", Category::Other)]);
        entities.set_offline(true);
        assert!(matches!(
            entities.get_by_id("fern-1").await,
            Err(StoreError::Unavailable(_))
        ));
        entities.set_offline(false);
        assert!(entities.get_by_id("fern-1").await.is_ok());

        let battles = MemoryBattleStore::new();
        battles.set_offline(true);
        assert!(battles.insert_battle_record(record("a", "b", "a", 1)).await.is_err());
        assert!(battles.list_leaderboard().await.is_err());
        assert!(battles.records().await.is_empty());
    }

    #[tokio::test]
    async fn test_battles_for_user_newest_first() {
        let store = MemoryBattleStore::new();
        store.insert_battle_record(record("alice", "bob", "alice", 10)).await.unwrap();
        store.insert_battle_record(record("carol", "bob", "bob", 30)).await.unwrap();
        store.insert_battle_record(record("alice", "carol", "carol", 20)).await.unwrap();

        let stamps: Vec<_> = store
            .list_battles_for_user("alice")
            .await
            .unwrap()
            .iter()
            .map(|r| r.timestamp)
            .collect();
        assert_eq!(stamps, vec![20, 10]);

        assert!(store.list_battles_for_user("dave").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_leaderboard_ordering() {
        let store = MemoryBattleStore::new();
        store.register_user("alice", "Alice").await;
        store.register_user("bob", "Bob").await;
        store.register_user("carol", "Carol").await;
        store.register_user("dave", "Dave").await;

        store.insert_battle_record(record("alice", "bob", "alice", 1)).await.unwrap();
        store.insert_battle_record(record("carol", "bob", "carol", 2)).await.unwrap();
        store.insert_battle_record(record("alice", "carol", "carol", 3)).await.unwrap();
        store.insert_battle_record(record("alice", "erin", "alice", 4)).await.unwrap();

        let board = store.list_leaderboard().await.unwrap();
        let summary: Vec<_> = board
            .iter()
            .map(|r| (r.name.as_str(), r.victories, r.defeats))
            .collect();
        assert_eq!(
            summary,
            vec![
                ("Carol", 2, 0),
                ("Alice", 2, 1),
                ("Dave", 0, 0),
                ("erin", 0, 1),
                ("Bob", 0, 2),
            ]
        );
    }

    #[tokio::test]
    async fn test_remote_entity_stats() {
        let store = MemoryBattleStore::new();
        assert_eq!(store.increment_entity_stat("basil-1", StatKind::Defeats).await, Ok(1));
        assert_eq!(store.increment_entity_stat("basil-1", StatKind::Victories).await, Ok(1));
        assert_eq!(store.increment_entity_stat("basil-1", StatKind::Defeats).await, Ok(2));
        assert_eq!(store.entity_stats("basil-1").await, (1, 2));
        assert_eq!(store.entity_stats("unknown").await, (0, 0));
    }
}
