//! ArenaSession - a battle controller driven from async UI code.
//!
//! The session paces the opponent's counter-move: after the player's move
//! is applied the lock is released for the configured delay, so the UI can
//! render the intermediate state. Moves submitted during the pause are
//! rejected by the controller.

use std::sync::Arc;

use arena_battle::{
    BattleController, BattleError, BattleOutcome, BattlePhase, Combatant, CombatantFactory,
    Exchange, MoveStrategy, OpponentSource, RandomStrategy, Side,
};
use arena_model::Entity;
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::Serialize;
use tokio::sync::Mutex;

use crate::config::SessionConfig;
use crate::reporter::{CounterUpdate, Report, ReportError, ResultReporter};
use crate::store::{BattleStore, EntityStore, StoreError};

/// Session errors
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error(transparent)]
    Battle(#[from] BattleError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("No {0} configured for this session")]
    NotConfigured(&'static str),

    /// The outcome stays unclaimed; report it again to retry
    #[error("Failed to report battle result: {error}")]
    Report {
        outcome: Box<BattleOutcome>,
        #[source]
        error: ReportError,
    },
}

/// Point-in-time view of the battle for rendering
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BattleSnapshot {
    pub phase: BattlePhase,
    pub player: Option<Combatant>,
    pub opponent: Option<Combatant>,
    pub log: String,
    pub exchanges: u32,
    pub counter_pending: bool,
    pub winner: Option<Side>,
}

struct SessionState {
    controller: BattleController,
    rng: StdRng,

    /// Bumped whenever the current battle is replaced or abandoned
    generation: u64,

    /// Local counters already applied by a failed report
    applied: Vec<CounterUpdate>,
}

/// Shared handle to one battle at a time.
///
/// Cheap to clone; clones drive the same battle.
#[derive(Clone)]
pub struct ArenaSession {
    state: Arc<Mutex<SessionState>>,
    config: SessionConfig,
    entities: Option<Arc<dyn EntityStore>>,
    battles: Option<Arc<dyn BattleStore>>,
}

impl ArenaSession {
    pub fn new(config: SessionConfig) -> Self {
        let (rng, strategy) = match config.seed {
            Some(seed) => (
                StdRng::seed_from_u64(seed),
                RandomStrategy::seeded(seed.wrapping_add(1)),
            ),
            None => (StdRng::from_entropy(), RandomStrategy::from_entropy()),
        };
        let factory = CombatantFactory::default().with_options(config.build_options());

        Self {
            state: Arc::new(Mutex::new(SessionState {
                controller: BattleController::with_parts(factory, Box::new(strategy)),
                rng,
                generation: 0,
                applied: Vec::new(),
            })),
            config,
            entities: None,
            battles: None,
        }
    }

    /// Use an entity store for lookups and local result counters
    pub fn with_entity_store(mut self, entities: Arc<dyn EntityStore>) -> Self {
        self.entities = Some(entities);
        self
    }

    /// Persist battles between accounts remotely. Only used together with
    /// an entity store.
    pub fn with_battle_store(mut self, battles: Arc<dyn BattleStore>) -> Self {
        self.battles = Some(battles);
        self
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Replace the opponent's move selection
    pub async fn set_strategy(&self, strategy: Box<dyn MoveStrategy + Send>) {
        self.state.lock().await.controller.set_strategy(strategy);
    }

    /// Build both combatants for a new battle
    pub async fn prepare(
        &self,
        player: &Entity,
        opponent: OpponentSource,
    ) -> Result<(), SessionError> {
        let mut state = self.state.lock().await;
        let SessionState {
            controller, rng, ..
        } = &mut *state;
        controller.prepare(player, opponent, rng)?;
        state.generation += 1;
        state.applied.clear();
        Ok(())
    }

    /// Look up the player's entity and, for a friend challenge, the friend's
    /// entities. `None` fights a synthetic opponent.
    pub async fn prepare_from_store(
        &self,
        player_id: &str,
        friend_entity_ids: Option<&[String]>,
    ) -> Result<(), SessionError> {
        let entities = self
            .entities
            .as_ref()
            .ok_or(SessionError::NotConfigured("entity store"))?;

        let player = entities.get_by_id(player_id).await?;
        let opponent = match friend_entity_ids {
            Some(ids) => OpponentSource::Known(entities.get_many(ids).await?),
            None => OpponentSource::Synthetic,
        };
        self.prepare(&player, opponent).await
    }

    /// Lock in the prepared pairing
    pub async fn confirm(&self) -> Result<(), SessionError> {
        self.state.lock().await.controller.confirm()?;
        Ok(())
    }

    /// Play the player's move and, after the configured pause, the
    /// opponent's answer.
    ///
    /// If the battle is reset during the pause the counter-move is dropped
    /// and the returned exchange has none.
    pub async fn play_move(&self, index: usize) -> Result<Exchange, SessionError> {
        let (mut exchange, generation) = {
            let mut state = self.state.lock().await;
            (state.controller.submit_move(index)?, state.generation)
        };
        if !exchange.awaits_counter() {
            return Ok(exchange);
        }

        if let Some(delay) = self.config.opponent_delay() {
            tokio::time::sleep(delay).await;
        }

        let mut state = self.state.lock().await;
        if state.generation != generation || !state.controller.is_counter_pending() {
            tracing::debug!("Battle replaced during the pause, counter dropped");
            return Ok(exchange);
        }

        let counter = state.controller.resolve_counter()?;
        if !counter.defender.is_alive() {
            exchange.winner = Some(Side::Opponent);
        }
        exchange.counter = Some(counter);
        Ok(exchange)
    }

    /// Abandon the current battle without reporting it
    pub async fn reset(&self) {
        let mut state = self.state.lock().await;
        state.controller.reset();
        state.generation += 1;
        state.applied.clear();
    }

    /// Claim the outcome of a finished battle and report it.
    ///
    /// Returns `None` until the battle finishes and after the outcome was
    /// already reported. Without an entity store the outcome is claimed but
    /// nothing is persisted. When the local counters fail the outcome is
    /// released and returned in [`SessionError::Report`]; calling again
    /// retries without repeating the counters that already went through.
    pub async fn report_outcome(
        &self,
    ) -> Result<Option<(BattleOutcome, Option<Report>)>, SessionError> {
        // Held across the report so concurrent callers cannot claim twice
        let mut state = self.state.lock().await;
        let Some(outcome) = state.controller.claim_outcome() else {
            return Ok(None);
        };
        let Some(reporter) = self.reporter() else {
            return Ok(Some((outcome, None)));
        };

        let applied = std::mem::take(&mut state.applied);
        match reporter.resume(&outcome, applied).await {
            Ok(report) => Ok(Some((outcome, Some(report)))),
            Err(error) => {
                tracing::warn!(error = %error.error, applied = error.applied.len(), "Battle result not reported");
                state.controller.release_outcome();
                state.applied = error.applied.clone();
                Err(SessionError::Report {
                    outcome: Box::new(outcome),
                    error,
                })
            }
        }
    }

    fn reporter(&self) -> Option<ResultReporter> {
        let reporter = ResultReporter::new(Arc::clone(self.entities.as_ref()?));
        Some(match &self.battles {
            Some(battles) => reporter.with_battle_store(Arc::clone(battles)),
            None => reporter,
        })
    }

    // === Snapshots ===

    pub async fn snapshot(&self) -> BattleSnapshot {
        let state = self.state.lock().await;
        let controller = &state.controller;
        BattleSnapshot {
            phase: controller.phase(),
            player: controller.player().cloned(),
            opponent: controller.opponent().cloned(),
            log: controller.log().to_string(),
            exchanges: controller.exchanges(),
            counter_pending: controller.is_counter_pending(),
            winner: controller.winner(),
        }
    }

    pub async fn phase(&self) -> BattlePhase {
        self.state.lock().await.controller.phase()
    }

    pub async fn log(&self) -> String {
        self.state.lock().await.controller.log().to_string()
    }

    pub async fn is_finished(&self) -> bool {
        self.state.lock().await.controller.is_finished()
    }
}
