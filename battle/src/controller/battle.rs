//! BattleController - owns the two combatants and the match lifecycle

use std::fmt;

use arena_model::Entity;
use rand::Rng;

use super::phase::BattlePhase;
use super::strategy::{MoveStrategy, RandomStrategy};
use crate::error::BattleError;
use crate::factory::{CombatantFactory, OpponentSource};
use crate::types::{Combatant, Side};

/// One side of a finished battle, as needed for result reporting
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Participant {
    /// Entity id, or the synthetic sentinel
    pub entity_id: String,
    pub owner_id: Option<String>,
    pub name: String,
    pub synthetic: bool,
}

impl Participant {
    fn from_combatant(combatant: &Combatant) -> Self {
        Self {
            entity_id: combatant.id.clone(),
            owner_id: combatant.owner_id.clone(),
            name: combatant.name.clone(),
            synthetic: combatant.is_synthetic(),
        }
    }
}

/// Final result of a battle
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BattleOutcome {
    pub winner: Side,
    pub player: Participant,
    pub opponent: Participant,

    /// Player turns taken
    pub exchanges: u32,
}

impl BattleOutcome {
    pub fn participant(&self, side: Side) -> &Participant {
        match side {
            Side::Player => &self.player,
            Side::Opponent => &self.opponent,
        }
    }

    pub fn winning(&self) -> &Participant {
        self.participant(self.winner)
    }

    pub fn losing(&self) -> &Participant {
        self.participant(self.winner.other())
    }

    /// Both sides are real entities owned by accounts
    pub fn is_between_accounts(&self) -> bool {
        [&self.player, &self.opponent]
            .iter()
            .all(|p| !p.synthetic && p.owner_id.is_some())
    }
}

/// A single match between a player combatant and an opponent.
///
/// The controller never shares its combatants: accessors hand out
/// references for rendering, and every state change goes through the
/// controller's own methods.
pub struct BattleController {
    pub(super) phase: BattlePhase,
    pub(super) factory: CombatantFactory,
    pub(super) strategy: Box<dyn MoveStrategy + Send>,

    // === Combatants (present from Preparing until reset) ===
    pub(super) player: Option<Combatant>,
    pub(super) opponent: Option<Combatant>,

    // === Turn state ===
    /// Most recent action description
    pub(super) log: String,

    /// Player turns taken so far
    pub(super) exchanges: u32,

    /// Player has moved and the opponent has not answered yet
    pub(super) counter_pending: bool,

    // === Outcome ===
    pub(super) winner: Option<Side>,
    pub(super) outcome_claimed: bool,
}

impl BattleController {
    /// Create a controller with the built-in catalog and a random opponent
    pub fn new() -> Self {
        Self::with_parts(CombatantFactory::default(), Box::new(RandomStrategy::default()))
    }

    /// Create a controller from a factory and an opponent strategy
    pub fn with_parts(factory: CombatantFactory, strategy: Box<dyn MoveStrategy + Send>) -> Self {
        Self {
            phase: BattlePhase::Idle,
            factory,
            strategy,
            player: None,
            opponent: None,
            log: String::new(),
            exchanges: 0,
            counter_pending: false,
            winner: None,
            outcome_claimed: false,
        }
    }

    /// Replace the opponent strategy
    pub fn set_strategy(&mut self, strategy: Box<dyn MoveStrategy + Send>) {
        self.strategy = strategy;
    }

    pub fn factory(&self) -> &CombatantFactory {
        &self.factory
    }

    /// Idle → Preparing: build both combatants.
    ///
    /// An empty known-opponent roster is rejected before the phase changes.
    pub fn prepare<R: Rng + ?Sized>(
        &mut self,
        player: &Entity,
        opponent: OpponentSource,
        rng: &mut R,
    ) -> Result<(), BattleError> {
        self.expect_phase(BattlePhase::Idle, "prepare")?;

        let (player, opponent) = self.factory.prepare(player, &opponent, rng)?;
        tracing::debug!(
            player = %player.id,
            opponent = %opponent.id,
            synthetic = opponent.is_synthetic(),
            "Battle prepared"
        );

        self.player = Some(player);
        self.opponent = Some(opponent);
        self.log.clear();
        self.phase = BattlePhase::Preparing;
        Ok(())
    }

    /// Preparing → Active: lock in the pairing and announce it
    pub fn confirm(&mut self) -> Result<(), BattleError> {
        self.expect_phase(BattlePhase::Preparing, "confirm")?;

        let (player, opponent) = self.combatants()?;
        self.log = format!(
            "{} {} vs {} {}! Choose your move.",
            player.icon, player.name, opponent.icon, opponent.name
        );
        self.phase = BattlePhase::Active;
        tracing::debug!("Battle active");
        Ok(())
    }

    /// Any phase → Idle, discarding both combatants.
    ///
    /// Abandoning a battle before it finishes produces no outcome, and an
    /// unclaimed outcome of a finished battle is dropped.
    pub fn reset(&mut self) {
        if self.phase == BattlePhase::Active {
            tracing::debug!(exchanges = self.exchanges, "Battle abandoned");
        }
        self.phase = BattlePhase::Idle;
        self.player = None;
        self.opponent = None;
        self.log.clear();
        self.exchanges = 0;
        self.counter_pending = false;
        self.winner = None;
        self.outcome_claimed = false;
    }

    /// Take the outcome of a finished battle.
    ///
    /// Returns `Some` exactly once per finished battle.
    pub fn claim_outcome(&mut self) -> Option<BattleOutcome> {
        if self.outcome_claimed {
            return None;
        }
        let outcome = self.outcome()?;
        self.outcome_claimed = true;
        Some(outcome)
    }

    /// Undo [`claim_outcome`](Self::claim_outcome) after the outcome could
    /// not be reported, so it can be claimed again.
    pub fn release_outcome(&mut self) {
        if self.winner.is_some() {
            self.outcome_claimed = false;
        }
    }

    /// Outcome of a finished battle, without claiming it
    pub fn outcome(&self) -> Option<BattleOutcome> {
        let winner = self.winner?;
        let (player, opponent) = self.combatants().ok()?;
        Some(BattleOutcome {
            winner,
            player: Participant::from_combatant(player),
            opponent: Participant::from_combatant(opponent),
            exchanges: self.exchanges,
        })
    }

    // === Snapshots ===

    pub fn phase(&self) -> BattlePhase {
        self.phase
    }

    pub fn player(&self) -> Option<&Combatant> {
        self.player.as_ref()
    }

    pub fn opponent(&self) -> Option<&Combatant> {
        self.opponent.as_ref()
    }

    /// Combatant on a side
    pub fn combatant(&self, side: Side) -> Option<&Combatant> {
        match side {
            Side::Player => self.player(),
            Side::Opponent => self.opponent(),
        }
    }

    /// Most recent action description
    pub fn log(&self) -> &str {
        &self.log
    }

    pub fn winner(&self) -> Option<Side> {
        self.winner
    }

    /// Entity id of the winner
    pub fn winner_id(&self) -> Option<&str> {
        self.winner
            .and_then(|side| self.combatant(side))
            .map(|c| c.id.as_str())
    }

    pub fn exchanges(&self) -> u32 {
        self.exchanges
    }

    /// Whether the opponent still owes a counter-move
    pub fn is_counter_pending(&self) -> bool {
        self.counter_pending
    }

    pub fn is_finished(&self) -> bool {
        self.phase == BattlePhase::Finished
    }

    // === Internal helpers ===

    pub(super) fn expect_phase(
        &self,
        expected: BattlePhase,
        action: &'static str,
    ) -> Result<(), BattleError> {
        if self.phase == expected {
            Ok(())
        } else {
            Err(BattleError::InvalidTransition {
                action,
                phase: self.phase,
            })
        }
    }

    pub(super) fn combatants(&self) -> Result<(&Combatant, &Combatant), BattleError> {
        match (&self.player, &self.opponent) {
            (Some(p), Some(o)) => Ok((p, o)),
            _ => Err(BattleError::InvalidTransition {
                action: "read combatants",
                phase: self.phase,
            }),
        }
    }
}

impl Default for BattleController {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for BattleController {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BattleController")
            .field("phase", &self.phase)
            .field("player", &self.player)
            .field("opponent", &self.opponent)
            .field("log", &self.log)
            .field("exchanges", &self.exchanges)
            .field("counter_pending", &self.counter_pending)
            .field("winner", &self.winner)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::controller::ScriptedStrategy;
    use arena_model::Category;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn controller() -> BattleController {
        BattleController::with_parts(
            CombatantFactory::default(),
            Box::new(ScriptedStrategy::new(vec![2])),
        )
    }

    fn basil() -> Entity {
        Entity::new("basil-1", "Basil", Category::Herbs).with_owner("alice")
    }

    #[test]
    fn test_new_controller() {
        let battle = BattleController::new();
        assert_eq!(battle.phase(), BattlePhase::Idle);
        assert!(battle.player().is_none());
        assert!(battle.opponent().is_none());
        assert!(battle.winner().is_none());
        assert_eq!(battle.exchanges(), 0);
        assert!(battle.log().is_empty());
    }

    #[test]
    fn test_prepare_and_confirm() {
        let mut battle = controller();
        let mut rng = StdRng::seed_from_u64(1);

        battle
            .prepare(&basil(), OpponentSource::Synthetic, &mut rng)
            .unwrap();
        assert_eq!(battle.phase(), BattlePhase::Preparing);
        assert_eq!(battle.player().unwrap().id, "basil-1");
        assert!(battle.opponent().unwrap().is_synthetic());

        battle.confirm().unwrap();
        assert_eq!(battle.phase(), BattlePhase::Active);
        assert!(battle.log().contains("Basil vs"));
    }

    #[test]
    fn test_prepare_rejects_empty_roster() {
        let mut battle = controller();
        let mut rng = StdRng::seed_from_u64(1);

        let result = battle.prepare(&basil(), OpponentSource::Known(vec![]), &mut rng);
        assert_eq!(result, Err(BattleError::MissingOpponentData));
        assert_eq!(battle.phase(), BattlePhase::Idle);
        assert!(battle.player().is_none());
    }

    #[test]
    fn test_prepare_twice_rejected() {
        let mut battle = controller();
        let mut rng = StdRng::seed_from_u64(1);
        battle
            .prepare(&basil(), OpponentSource::Synthetic, &mut rng)
            .unwrap();

        let result = battle.prepare(&basil(), OpponentSource::Synthetic, &mut rng);
        assert_eq!(
            result,
            Err(BattleError::InvalidTransition {
                action: "prepare",
                phase: BattlePhase::Preparing
            })
        );
    }

    #[test]
    fn test_confirm_requires_preparing() {
        let mut battle = controller();
        assert!(matches!(
            battle.confirm(),
            Err(BattleError::InvalidTransition { .. })
        ));
    }

    #[test]
    fn test_reset_discards_everything() {
        let mut battle = controller();
        let mut rng = StdRng::seed_from_u64(1);
        battle
            .prepare(&basil(), OpponentSource::Synthetic, &mut rng)
            .unwrap();
        battle.confirm().unwrap();

        battle.reset();
        assert_eq!(battle.phase(), BattlePhase::Idle);
        assert!(battle.player().is_none());
        assert!(battle.opponent().is_none());
        assert!(battle.outcome().is_none());
        assert!(battle.claim_outcome().is_none());
    }

    #[test]
    fn test_outcome_between_accounts() {
        let participant = |id: &str, owner: Option<&str>, synthetic| Participant {
            entity_id: id.to_string(),
            owner_id: owner.map(str::to_string),
            name: id.to_string(),
            synthetic,
        };

        let outcome = BattleOutcome {
            winner: Side::Opponent,
            player: participant("basil-1", Some("alice"), false),
            opponent: participant("aloe-1", Some("bob"), false),
            exchanges: 4,
        };
        assert!(outcome.is_between_accounts());
        assert_eq!(outcome.winning().entity_id, "aloe-1");
        assert_eq!(outcome.losing().entity_id, "basil-1");

        let practice = BattleOutcome {
            opponent: participant("enemy", None, true),
            ..outcome
        };
        assert!(!practice.is_between_accounts());
    }
}
