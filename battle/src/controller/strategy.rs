//! Opponent move selection

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::types::Combatant;

/// Picks the opponent's next move.
///
/// Returns an index into `combatant.moves`. Affordability is not the
/// strategy's concern: an unaffordable attack simply fails and uses the turn.
pub trait MoveStrategy {
    fn choose_move(&mut self, combatant: &Combatant) -> usize;
}

impl<F> MoveStrategy for F
where
    F: FnMut(&Combatant) -> usize,
{
    fn choose_move(&mut self, combatant: &Combatant) -> usize {
        self(combatant)
    }
}

/// Uniformly random choice over the whole move list
#[derive(Debug, Clone)]
pub struct RandomStrategy {
    rng: StdRng,
}

impl RandomStrategy {
    /// Deterministic strategy for a seed
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Strategy seeded from OS entropy
    pub fn from_entropy() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }
}

impl Default for RandomStrategy {
    fn default() -> Self {
        Self::from_entropy()
    }
}

impl MoveStrategy for RandomStrategy {
    fn choose_move(&mut self, combatant: &Combatant) -> usize {
        if combatant.moves.is_empty() {
            return 0;
        }
        self.rng.gen_range(0..combatant.moves.len())
    }
}

/// Replays a fixed list of move indices, wrapping around at the end
#[derive(Debug, Clone)]
pub struct ScriptedStrategy {
    script: Vec<usize>,
    cursor: usize,
}

impl ScriptedStrategy {
    pub fn new(script: impl Into<Vec<usize>>) -> Self {
        Self {
            script: script.into(),
            cursor: 0,
        }
    }
}

impl MoveStrategy for ScriptedStrategy {
    fn choose_move(&mut self, _combatant: &Combatant) -> usize {
        if self.script.is_empty() {
            return 0;
        }
        let choice = self.script[self.cursor % self.script.len()];
        self.cursor += 1;
        choice
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::factory::CombatantFactory;
    use crate::types::StatBlock;
    use arena_model::{Category, Entity};

    fn combatant() -> Combatant {
        CombatantFactory::default().build_with_stats(
            &Entity::new("fern-1", "Fern", Category::Other),
            StatBlock::default(),
        )
    }

    #[test]
    fn test_random_strategy_covers_all_moves() {
        let c = combatant();
        let mut strategy = RandomStrategy::seeded(3);
        let mut seen = [false; 4];
        for _ in 0..200 {
            let idx = strategy.choose_move(&c);
            assert!(idx < 4);
            seen[idx] = true;
        }
        assert!(seen.iter().all(|s| *s));
    }

    #[test]
    fn test_random_strategy_ignores_energy() {
        let mut c = combatant();
        c.energy = 0;
        let mut strategy = RandomStrategy::seeded(11);
        let picked_attack = (0..200).any(|_| strategy.choose_move(&c) < 2);
        assert!(picked_attack);
    }

    #[test]
    fn test_random_strategy_is_reproducible() {
        let c = combatant();
        let mut a = RandomStrategy::seeded(8);
        let mut b = RandomStrategy::seeded(8);
        for _ in 0..50 {
            assert_eq!(a.choose_move(&c), b.choose_move(&c));
        }
    }

    #[test]
    fn test_random_strategy_empty_moves() {
        let mut c = combatant();
        c.moves.clear();
        assert_eq!(RandomStrategy::seeded(1).choose_move(&c), 0);
    }

    #[test]
    fn test_scripted_strategy_wraps() {
        let c = combatant();
        let mut strategy = ScriptedStrategy::new(vec![2, 3, 0]);
        let picks: Vec<_> = (0..5).map(|_| strategy.choose_move(&c)).collect();
        assert_eq!(picks, vec![2, 3, 0, 2, 3]);
    }

    #[test]
    fn test_closure_strategy() {
        let c = combatant();
        let mut always_heal = |_: &Combatant| -> usize { 3 };
        assert_eq!(always_heal.choose_move(&c), 3);
    }
}
