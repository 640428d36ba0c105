//! Building battle-ready combatants from entities

use std::sync::Arc;

use arena_model::{Category, Entity, Move, MoveEffect};
use rand::Rng;
use rand::seq::SliceRandom;

use crate::catalog::MoveCatalog;
use crate::error::BattleError;
use crate::types::{Combatant, SYNTHETIC_ID, StatBlock, round, win_rate_bonus};

/// Names given to generated opponents
pub const SYNTHETIC_NAMES: [&str; 8] = [
    "Wild Thistle",
    "Rogue Nettle",
    "Feral Ivy",
    "Stray Dandelion",
    "Thorny Bramble",
    "Creeping Kudzu",
    "Shadow Fern",
    "Bitter Hemlock",
];

/// How move generation treats a defense move's reduction fraction.
///
/// Scaling a fraction with the flat-power formula rounds it to a whole
/// number, which the buff clamp then pins at its maximum. `Unscaled` keeps
/// the template fraction; `Scaled` reproduces the legacy behaviour.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "lowercase")
)]
pub enum DefenseScaling {
    #[default]
    Unscaled,
    Scaled,
}

/// Knobs for combatant construction
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BuildOptions {
    pub defense_scaling: DefenseScaling,
}

/// Where the opponent comes from
#[derive(Debug, Clone, PartialEq)]
pub enum OpponentSource {
    /// Generate a random opponent with no backing entity
    Synthetic,

    /// Pick one of these entities uniformly at random
    Known(Vec<Entity>),
}

/// Move power multiplier from age, robustness and health
pub fn move_scale(entity: &Entity) -> f64 {
    let age_bonus = (f64::from(entity.age_days) / 600.0).min(0.2);
    let robustness_bonus = (entity.robustness() - 1.0) * 0.15;
    let health_bonus = (f64::from(entity.health()) / 100.0 - 1.0) * 0.05;
    1.0 + age_bonus + robustness_bonus + health_bonus
}

fn scale_power(power: f64, scale: f64, bonus: i32) -> u32 {
    round(power * scale + f64::from(bonus)).max(1) as u32
}

/// Builds combatants against a shared move catalog
#[derive(Debug, Clone)]
pub struct CombatantFactory {
    catalog: Arc<MoveCatalog>,
    options: BuildOptions,
}

impl CombatantFactory {
    /// Create a factory over a catalog
    pub fn new(catalog: Arc<MoveCatalog>) -> Self {
        Self {
            catalog,
            options: BuildOptions::default(),
        }
    }

    /// Override build options
    pub fn with_options(mut self, options: BuildOptions) -> Self {
        self.options = options;
        self
    }

    pub fn catalog(&self) -> &MoveCatalog {
        &self.catalog
    }

    pub fn options(&self) -> BuildOptions {
        self.options
    }

    /// Scaled copies of the entity's category moves
    pub fn generate_moves(&self, entity: &Entity) -> Vec<Move> {
        let scale = move_scale(entity);
        let bonus = win_rate_bonus(entity.victories, entity.defeats);

        self.catalog
            .moves_for(entity.category())
            .iter()
            .map(|template| {
                let effect = match template.effect {
                    MoveEffect::Attack { power, cost } => MoveEffect::Attack {
                        power: scale_power(f64::from(power), scale, bonus),
                        cost,
                    },
                    MoveEffect::Heal { amount } => MoveEffect::Heal {
                        amount: scale_power(f64::from(amount), scale, bonus),
                    },
                    MoveEffect::Defense { reduction } => match self.options.defense_scaling {
                        DefenseScaling::Unscaled => MoveEffect::Defense { reduction },
                        DefenseScaling::Scaled => MoveEffect::Defense {
                            reduction: f64::from(scale_power(reduction, scale, bonus)),
                        },
                    },
                };
                Move {
                    name: template.name.clone(),
                    effect,
                }
            })
            .collect()
    }

    /// Build a combatant from an entity with freshly derived stats
    pub fn build<R: Rng + ?Sized>(&self, entity: &Entity, rng: &mut R) -> Combatant {
        let stats = StatBlock::derive(entity, rng);
        self.build_with_stats(entity, stats)
    }

    /// Build a combatant from an entity with the given stats
    pub fn build_with_stats(&self, entity: &Entity, stats: StatBlock) -> Combatant {
        let mut combatant = Combatant::new(
            entity.id.clone(),
            entity.name.clone(),
            entity.category(),
            entity.health(),
            stats,
            self.generate_moves(entity),
        );
        combatant.icon = entity.icon().to_string();
        combatant.owner_id = entity.owner_id.clone();
        combatant
    }

    /// Build the player and opponent for a new battle.
    ///
    /// Fails with [`BattleError::MissingOpponentData`] when a known-opponent
    /// roster is empty.
    pub fn prepare<R: Rng + ?Sized>(
        &self,
        player: &Entity,
        source: &OpponentSource,
        rng: &mut R,
    ) -> Result<(Combatant, Combatant), BattleError> {
        let opponent_entity = match source {
            OpponentSource::Known(roster) => roster
                .choose(rng)
                .cloned()
                .ok_or(BattleError::MissingOpponentData)?,
            OpponentSource::Synthetic => synthetic_entity(rng),
        };

        let player = self.build(player, rng);
        let mut opponent = self.build(&opponent_entity, rng);
        opponent.synthetic = matches!(source, OpponentSource::Synthetic);
        Ok((player, opponent))
    }
}

impl Default for CombatantFactory {
    fn default() -> Self {
        Self::new(MoveCatalog::builtin())
    }
}

/// Generate a random opponent entity
pub fn synthetic_entity<R: Rng + ?Sized>(rng: &mut R) -> Entity {
    let category = Category::ALL.choose(rng).copied().unwrap_or_default();
    let name = SYNTHETIC_NAMES.choose(rng).copied().unwrap_or("Wild Weed");

    let mut entity = Entity::new(SYNTHETIC_ID, name, category);
    entity.age_days = rng.gen_range(0..200);
    entity.robustness = Some(rng.gen_range(0.9..=1.4));
    entity.health = Some(100);
    entity
}

#[cfg(test)]
mod tests {
    use super::*;
    use arena_model::MoveKind;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn basil() -> Entity {
        Entity::new("basil-1", "Basil", Category::Herbs).with_owner("alice")
    }

    #[test]
    fn test_move_scale_fresh_entity() {
        assert!((move_scale(&basil()) - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_move_scale_components() {
        let mut e = basil();
        e.age_days = 600;
        e.robustness = Some(1.4);
        e.health = Some(50);
        // 1 + 0.2 + 0.06 - 0.025
        assert!((move_scale(&e) - 1.235).abs() < 1e-9);

        e.age_days = 6000;
        assert!((move_scale(&e) - 1.235).abs() < 1e-9);
    }

    #[test]
    fn test_generate_moves_fresh_entity_matches_templates() {
        let factory = CombatantFactory::default();
        let moves = factory.generate_moves(&basil());
        assert_eq!(moves, factory.catalog().moves_for(Category::Herbs));
    }

    #[test]
    fn test_generate_moves_scaling_and_bonus() {
        let factory = CombatantFactory::default();
        let mut e = basil();
        e.age_days = 120; // +0.2
        e.victories = 10; // +10 flat

        let moves = factory.generate_moves(&e);
        // Leaf Blade: 20 * 1.2 + 10 = 34
        assert_eq!(moves[0].effect, MoveEffect::Attack { power: 34, cost: 20 });
        // Soothing Balm: 20 * 1.2 + 10 = 34
        assert_eq!(moves[3].effect, MoveEffect::Heal { amount: 34 });
        // Herbal Shield stays a fraction by default
        assert_eq!(moves[2].effect, MoveEffect::Defense { reduction: 0.5 });
    }

    #[test]
    fn test_generate_moves_power_floor() {
        let factory = CombatantFactory::default();
        let mut e = basil();
        e.defeats = 40; // -5
        e.robustness = Some(0.0);
        e.health = Some(0);

        for mv in factory.generate_moves(&e) {
            if mv.kind() != MoveKind::Defense {
                assert!(mv.power() >= 1.0);
            }
        }
    }

    #[test]
    fn test_generate_moves_legacy_defense_scaling() {
        let factory = CombatantFactory::default().with_options(BuildOptions {
            defense_scaling: DefenseScaling::Scaled,
        });
        let moves = factory.generate_moves(&basil());
        // round(0.5 * 1.0) = 1 -> floor of 1
        assert_eq!(moves[2].effect, MoveEffect::Defense { reduction: 1.0 });
    }

    #[test]
    fn test_generate_moves_unknown_category_uses_herbs() {
        let factory = CombatantFactory::default();
        let mut e = basil();
        e.category = None;
        let names: Vec<_> = factory
            .generate_moves(&e)
            .into_iter()
            .map(|m| m.name)
            .collect();
        assert_eq!(names[0], "Leaf Blade");
    }

    #[test]
    fn test_build_combatant() {
        let factory = CombatantFactory::default();
        let mut e = basil();
        e.health = Some(64);
        e.icon = "🌱".to_string();

        let c = factory.build_with_stats(
            &e,
            StatBlock {
                attack: 18,
                defense: 9,
            },
        );
        assert_eq!(c.id, "basil-1");
        assert_eq!(c.owner_id.as_deref(), Some("alice"));
        assert_eq!(c.icon, "🌱");
        assert_eq!(c.health, 64);
        assert_eq!(c.max_health, 64);
        assert_eq!(c.energy, 100);
        assert_eq!(c.defense_buff, 0.0);
        assert_eq!(c.attack, 18);
        assert_eq!(c.moves.len(), 4);
    }

    #[test]
    fn test_build_combatant_health_floor_and_default() {
        let factory = CombatantFactory::default();
        let mut rng = StdRng::seed_from_u64(1);

        let mut e = basil();
        e.health = Some(2);
        assert_eq!(factory.build(&e, &mut rng).max_health, 10);

        e.health = None;
        assert_eq!(factory.build(&e, &mut rng).max_health, 100);
    }

    #[test]
    fn test_synthetic_entity_ranges() {
        let mut rng = StdRng::seed_from_u64(99);
        for _ in 0..200 {
            let e = synthetic_entity(&mut rng);
            assert_eq!(e.id, SYNTHETIC_ID);
            assert!(e.owner_id.is_none());
            assert!(e.age_days < 200);
            let r = e.robustness();
            assert!((0.9..=1.4).contains(&r));
            assert_eq!(e.health(), 100);
            assert!(SYNTHETIC_NAMES.contains(&e.name.as_str()));
        }
    }

    #[test]
    fn test_prepare_synthetic() {
        let factory = CombatantFactory::default();
        let mut rng = StdRng::seed_from_u64(5);
        let (player, opponent) = factory
            .prepare(&basil(), &OpponentSource::Synthetic, &mut rng)
            .unwrap();

        assert_eq!(player.id, "basil-1");
        assert!(opponent.is_synthetic());
        assert_eq!(opponent.max_health, 100);
    }

    #[test]
    fn test_prepare_known_picks_from_roster() {
        let factory = CombatantFactory::default();
        let mut rng = StdRng::seed_from_u64(5);
        let roster = vec![
            Entity::new("aloe-1", "Aloe", Category::Succulents).with_owner("bob"),
            Entity::new("rose-1", "Rose", Category::Flowers).with_owner("carol"),
        ];

        for _ in 0..20 {
            let (_, opponent) = factory
                .prepare(&basil(), &OpponentSource::Known(roster.clone()), &mut rng)
                .unwrap();
            assert!(opponent.id == "aloe-1" || opponent.id == "rose-1");
            assert!(!opponent.is_synthetic());
        }
    }

    #[test]
    fn test_prepare_known_entity_with_reserved_id() {
        let factory = CombatantFactory::default();
        let mut rng = StdRng::seed_from_u64(5);
        let roster = vec![Entity::new(SYNTHETIC_ID, "Enemy Fern", Category::Herbs).with_owner("bob")];

        let (_, opponent) = factory
            .prepare(&basil(), &OpponentSource::Known(roster), &mut rng)
            .unwrap();
        assert_eq!(opponent.id, SYNTHETIC_ID);
        assert!(!opponent.is_synthetic());
    }

    #[test]
    fn test_prepare_empty_roster() {
        let factory = CombatantFactory::default();
        let mut rng = StdRng::seed_from_u64(5);
        let result = factory.prepare(&basil(), &OpponentSource::Known(vec![]), &mut rng);
        assert_eq!(result, Err(BattleError::MissingOpponentData));
    }
}
