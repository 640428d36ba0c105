//! Persists the result of a finished battle.
//!
//! Reporting runs in two phases:
//! 1. Local counters on the [`EntityStore`], awaited. Failures are returned.
//! 2. Remote record and counters on the [`BattleStore`], spawned on tokio.
//!    Failures are logged and swallowed; phase one is never rolled back.
//!
//! Phase two only runs for battles between two account-owned entities.

use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use arena_battle::BattleOutcome;
use arena_model::{BattleRecord, StatKind};
use tokio::task::JoinHandle;

use crate::store::{BattleStore, EntityStore, StoreError};

/// A counter changed during reporting
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CounterUpdate {
    pub entity_id: String,
    pub stat: StatKind,

    /// Value after the increment
    pub value: u32,
}

/// What the remote phase managed to do
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RemoteSummary {
    pub record_saved: bool,
    pub counters_updated: u32,
    pub failures: Vec<StoreError>,
}

impl RemoteSummary {
    pub fn is_complete(&self) -> bool {
        self.record_saved && self.counters_updated == 2 && self.failures.is_empty()
    }
}

/// Local phase failed part way
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Local counters not updated: {error}")]
pub struct ReportError {
    /// Counters incremented before the failure, winner first
    pub applied: Vec<CounterUpdate>,

    #[source]
    pub error: StoreError,
}

/// Result of [`ResultReporter::report`]
#[derive(Debug)]
pub struct Report {
    /// Local counters, winner first
    pub local: Vec<CounterUpdate>,
    remote: Option<JoinHandle<RemoteSummary>>,
}

impl Report {
    /// Whether remote persistence was dispatched
    pub fn has_remote(&self) -> bool {
        self.remote.is_some()
    }

    /// Wait for the remote phase.
    ///
    /// Dropping the report instead leaves the task running in the background.
    pub async fn remote_summary(self) -> Option<RemoteSummary> {
        let handle = self.remote?;
        Some(handle.await.unwrap_or_else(|e| {
            tracing::warn!(error = %e, "Remote persistence task failed");
            RemoteSummary {
                failures: vec![StoreError::Unavailable(e.to_string())],
                ..RemoteSummary::default()
            }
        }))
    }
}

#[derive(Clone)]
pub struct ResultReporter {
    entities: Arc<dyn EntityStore>,
    battles: Option<Arc<dyn BattleStore>>,
}

impl ResultReporter {
    pub fn new(entities: Arc<dyn EntityStore>) -> Self {
        Self {
            entities,
            battles: None,
        }
    }

    /// Enable remote persistence
    pub fn with_battle_store(mut self, battles: Arc<dyn BattleStore>) -> Self {
        self.battles = Some(battles);
        self
    }

    pub fn has_battle_store(&self) -> bool {
        self.battles.is_some()
    }

    /// Report a finished battle. Call once per outcome.
    pub async fn report(&self, outcome: &BattleOutcome) -> Result<Report, ReportError> {
        self.resume(outcome, Vec::new()).await
    }

    /// Continue a report whose local phase failed, skipping the counters
    /// in `applied`.
    pub async fn resume(
        &self,
        outcome: &BattleOutcome,
        applied: Vec<CounterUpdate>,
    ) -> Result<Report, ReportError> {
        let mut local = applied;
        for (participant, stat) in [
            (outcome.winning(), StatKind::Victories),
            (outcome.losing(), StatKind::Defeats),
        ] {
            let done = local
                .iter()
                .any(|u| u.entity_id == participant.entity_id && u.stat == stat);
            if participant.synthetic || done {
                continue;
            }
            let value = match self
                .entities
                .increment_stat(&participant.entity_id, stat)
                .await
            {
                Ok(value) => value,
                Err(error) => {
                    return Err(ReportError {
                        applied: local,
                        error,
                    });
                }
            };
            tracing::debug!(entity = %participant.entity_id, ?stat, value, "Local counter updated");
            local.push(CounterUpdate {
                entity_id: participant.entity_id.clone(),
                stat,
                value,
            });
        }

        let remote = match (&self.battles, Self::record_for(outcome)) {
            (Some(battles), Some(record)) => {
                let battles = Arc::clone(battles);
                let loser_id = outcome.losing().entity_id.clone();
                Some(tokio::spawn(persist_remote(battles, record, loser_id)))
            }
            _ => None,
        };

        Ok(Report { local, remote })
    }

    /// Record for a battle between two accounts
    fn record_for(outcome: &BattleOutcome) -> Option<BattleRecord> {
        if !outcome.is_between_accounts() {
            return None;
        }
        Some(BattleRecord {
            participant_a: outcome.player.owner_id.clone()?,
            participant_b: outcome.opponent.owner_id.clone()?,
            combatant_a_id: outcome.player.entity_id.clone(),
            combatant_b_id: outcome.opponent.entity_id.clone(),
            winner_id: outcome.winning().entity_id.clone(),
            timestamp: unix_now(),
        })
    }
}

/// Record first, then winner and loser counters, one after another
async fn persist_remote(
    battles: Arc<dyn BattleStore>,
    record: BattleRecord,
    loser_id: String,
) -> RemoteSummary {
    let mut summary = RemoteSummary::default();
    let winner_id = record.winner_id.clone();

    match battles.insert_battle_record(record).await {
        Ok(()) => summary.record_saved = true,
        Err(e) => {
            tracing::warn!(error = %e, "Failed to save battle record");
            summary.failures.push(e);
        }
    }

    for (entity_id, stat) in [(winner_id, StatKind::Victories), (loser_id, StatKind::Defeats)] {
        match battles.increment_entity_stat(&entity_id, stat).await {
            Ok(_) => summary.counters_updated += 1,
            Err(e) => {
                tracing::warn!(entity = %entity_id, ?stat, error = %e, "Failed to update remote counter");
                summary.failures.push(e);
            }
        }
    }

    summary
}

fn unix_now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or_default()
}
