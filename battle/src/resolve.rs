//! Single-move resolution
//!
//! [`apply_move`] is a pure function: it clones both combatants, applies the
//! move and hands back the new states with a log line. Inputs are never
//! mutated, so callers decide when to commit a result.

use arena_model::{Move, MoveEffect};

use crate::types::{Combatant, MAX_DEFENSE_BUFF, MAX_ENERGY, round};

/// Cap on the attack bonus and on the defense reduction
pub const MODIFIER_CAP: f64 = 0.2;

/// Energy restored by a defense move
pub const DEFENSE_ENERGY_GAIN: u32 = 15;

/// Largest energy gain a heal can give
pub const HEAL_ENERGY_CAP: u32 = 20;

/// Typed result of one move
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum MoveResult {
    /// Attack landed
    Hit { damage: u32 },

    /// Defense buff set
    Guarded { reduction: f64 },

    /// Health restored
    Healed { restored: u32, energy_gained: u32 },

    /// Attack failed for lack of energy; nothing changed
    Exhausted { cost: u32, energy: u32 },

    /// No move to play; the turn passed
    Passed,
}

/// New states after a move, plus what happened
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TurnOutcome {
    pub attacker: Combatant,
    pub defender: Combatant,
    pub result: MoveResult,
    pub log: String,
}

/// Attack bonus from the attacker's stat and remaining health, capped at 20%
pub fn attack_bonus(attacker: &Combatant) -> f64 {
    let health_ratio = if attacker.max_health == 0 {
        0.0
    } else {
        f64::from(attacker.health) / f64::from(attacker.max_health)
    };
    (f64::from(attacker.attack) / 100.0 + health_ratio * 0.1).min(MODIFIER_CAP)
}

/// Damage reduction from the defender's stat and buff, capped at 20%
pub fn defense_reduction(defender: &Combatant) -> f64 {
    (f64::from(defender.defense) / 100.0 + defender.defense_buff).min(MODIFIER_CAP)
}

/// Damage a move of the given power would deal, at least 1
pub fn damage_for(power: u32, attacker: &Combatant, defender: &Combatant) -> u32 {
    let boosted = round(f64::from(power) * (1.0 + attack_bonus(attacker)));
    let mitigated = round(boosted as f64 * (1.0 - defense_reduction(defender)));
    mitigated.max(1) as u32
}

/// Let the turn pass without a move
pub fn pass_turn(attacker: &Combatant, defender: &Combatant) -> TurnOutcome {
    TurnOutcome {
        log: format!("{} hesitates and lets the turn pass", attacker.name),
        attacker: attacker.clone(),
        defender: defender.clone(),
        result: MoveResult::Passed,
    }
}

/// Apply a move from `attacker` against `defender`
pub fn apply_move(attacker: &Combatant, defender: &Combatant, mv: &Move) -> TurnOutcome {
    let mut attacker = attacker.clone();
    let mut defender = defender.clone();

    let (result, log) = match mv.effect {
        MoveEffect::Attack { power, cost } => {
            if attacker.energy < cost {
                let log = format!(
                    "{} tried {} but lacks the energy ({}/{})",
                    attacker.name, mv.name, attacker.energy, cost
                );
                (
                    MoveResult::Exhausted {
                        cost,
                        energy: attacker.energy,
                    },
                    log,
                )
            } else {
                let damage = damage_for(power, &attacker, &defender);
                defender.set_health(defender.health.saturating_sub(damage));
                attacker.set_energy(attacker.energy.saturating_sub(cost));

                let log = format!(
                    "{} used {} and dealt {} damage to {}!",
                    attacker.name, mv.name, damage, defender.name
                );
                (MoveResult::Hit { damage }, log)
            }
        }

        MoveEffect::Defense { reduction } => {
            attacker.set_defense_buff(reduction.min(MAX_DEFENSE_BUFF));
            attacker.set_energy(attacker.energy.saturating_add(DEFENSE_ENERGY_GAIN));

            let log = format!(
                "{} used {} and braced for impact ({}% guard)",
                attacker.name,
                mv.name,
                round(attacker.defense_buff * 100.0)
            );
            (
                MoveResult::Guarded {
                    reduction: attacker.defense_buff,
                },
                log,
            )
        }

        MoveEffect::Heal { amount } => {
            let missing = attacker.max_health.saturating_sub(attacker.health);
            let restored = missing.min(amount);
            let energy_gained =
                (round(f64::from(restored) / 2.0).max(0) as u32).min(HEAL_ENERGY_CAP);

            attacker.set_health(attacker.health + restored);
            attacker.set_energy(attacker.energy.saturating_add(energy_gained));

            let log = format!(
                "{} used {} and restored {} health",
                attacker.name, mv.name, restored
            );
            (
                MoveResult::Healed {
                    restored,
                    energy_gained,
                },
                log,
            )
        }
    };

    debug_assert!(attacker.energy <= MAX_ENERGY && defender.energy <= MAX_ENERGY);

    TurnOutcome {
        attacker,
        defender,
        result,
        log,
    }
}
