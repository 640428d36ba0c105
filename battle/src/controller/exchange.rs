//! Turn exchange logic for an active battle

use super::battle::BattleController;
use super::phase::BattlePhase;
use crate::error::{BattleError, MoveRejection};
use crate::resolve::{TurnOutcome, apply_move, pass_turn};
use crate::types::{Combatant, Side};

/// What happened in one exchange
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Exchange {
    /// The player's move
    pub player_turn: TurnOutcome,

    /// The opponent's answer, once resolved
    pub counter: Option<TurnOutcome>,

    /// Set when the exchange ended the battle
    pub winner: Option<Side>,
}

impl Exchange {
    /// The opponent still has to answer
    pub fn awaits_counter(&self) -> bool {
        self.counter.is_none() && self.winner.is_none()
    }
}

impl BattleController {
    /// Apply the player's move (step 1) and check for a knockout (step 2).
    ///
    /// On success the opponent owes a counter-move unless the battle just
    /// ended; call [`resolve_counter`](Self::resolve_counter) to play it.
    /// A move the player cannot afford is accepted and wastes the turn.
    pub fn submit_move(&mut self, index: usize) -> Result<Exchange, BattleError> {
        if !self.phase.accepts_moves() {
            return Err(MoveRejection::NotActive(self.phase).into());
        }
        if self.counter_pending {
            return Err(MoveRejection::CounterPending.into());
        }

        let (player, opponent) = self.combatants()?;
        let mv = player
            .move_at(index)
            .ok_or(MoveRejection::OutOfRange {
                index,
                available: player.moves.len(),
            })?
            .clone();

        let turn = apply_move(player, opponent, &mv);
        tracing::debug!(
            actor = %turn.attacker.name,
            mv = %mv.name,
            outcome = ?turn.result,
            "Player move resolved"
        );

        self.commit(Side::Player, &turn);
        self.exchanges += 1;

        let winner = if turn.defender.is_alive() {
            self.counter_pending = true;
            None
        } else {
            self.finish(Side::Player);
            Some(Side::Player)
        };

        Ok(Exchange {
            player_turn: turn,
            counter: None,
            winner,
        })
    }

    /// [`submit_move`](Self::submit_move) by move name
    pub fn submit_move_named(&mut self, name: &str) -> Result<Exchange, BattleError> {
        if !self.phase.accepts_moves() {
            return Err(MoveRejection::NotActive(self.phase).into());
        }
        let index = self
            .player
            .as_ref()
            .and_then(|p| p.move_index(name))
            .ok_or_else(|| MoveRejection::UnknownMove(name.to_string()))?;
        self.submit_move(index)
    }

    /// Play the opponent's counter-move (step 3).
    ///
    /// Afterwards both defense buffs expire. Returns the move as resolved,
    /// before the buffs were cleared.
    pub fn resolve_counter(&mut self) -> Result<TurnOutcome, BattleError> {
        self.expect_phase(BattlePhase::Active, "resolve counter")?;
        if !self.counter_pending {
            return Err(BattleError::InvalidTransition {
                action: "resolve counter without a pending player move",
                phase: self.phase,
            });
        }

        let (Some(player), Some(opponent)) = (&self.player, &self.opponent) else {
            return Err(BattleError::InvalidTransition {
                action: "resolve counter without combatants",
                phase: self.phase,
            });
        };
        // The strategy's choice wraps onto the move list so the counter
        // always completes.
        let choice = self.strategy.choose_move(opponent);
        let turn = match opponent.moves.len() {
            0 => pass_turn(opponent, player),
            len => {
                if choice >= len {
                    tracing::warn!(choice, available = len, "Strategy chose a move out of range");
                }
                apply_move(opponent, player, &opponent.moves[choice % len])
            }
        };
        tracing::debug!(
            actor = %turn.attacker.name,
            outcome = ?turn.result,
            "Counter move resolved"
        );

        self.commit(Side::Opponent, &turn);
        self.counter_pending = false;
        for combatant in [&mut self.player, &mut self.opponent].into_iter().flatten() {
            combatant.clear_buff();
        }

        if !turn.defender.is_alive() {
            self.finish(Side::Opponent);
        }
        Ok(turn)
    }

    /// Run a whole exchange without pacing
    pub fn play_exchange(&mut self, index: usize) -> Result<Exchange, BattleError> {
        let mut exchange = self.submit_move(index)?;
        if exchange.awaits_counter() {
            let counter = self.resolve_counter()?;
            if !counter.defender.is_alive() {
                exchange.winner = Some(Side::Opponent);
            }
            exchange.counter = Some(counter);
        }
        Ok(exchange)
    }

    /// Store the result of a move made by `actor`
    fn commit(&mut self, actor: Side, turn: &TurnOutcome) {
        let (acting, target): (&mut Option<Combatant>, &mut Option<Combatant>) = match actor {
            Side::Player => (&mut self.player, &mut self.opponent),
            Side::Opponent => (&mut self.opponent, &mut self.player),
        };
        *acting = Some(turn.attacker.clone());
        *target = Some(turn.defender.clone());
        self.log = turn.log.clone();
    }

    fn finish(&mut self, winner: Side) {
        self.winner = Some(winner);
        self.counter_pending = false;
        self.phase = BattlePhase::Finished;

        let winner_name = self
            .combatant(winner)
            .map(|c| c.name.clone())
            .unwrap_or_default();
        self.log = format!("{} {} wins the battle!", self.log, winner_name);

        tracing::info!(
            winner = %winner,
            winner_id = self.winner_id().unwrap_or_default(),
            exchanges = self.exchanges,
            "Battle finished"
        );
    }
}
