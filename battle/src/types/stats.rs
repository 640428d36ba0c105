//! Combat stat derivation from persistent entity attributes

use arena_model::Entity;
use rand::Rng;

/// Minimum number of recorded battles before the win-rate bonus applies
pub const WIN_RATE_MIN_SAMPLE: u32 = 10;

/// Baseline attack range, inclusive
pub const ATTACK_BASE_RANGE: (u32, u32) = (15, 24);

/// Baseline defense range, inclusive
pub const DEFENSE_BASE_RANGE: (u32, u32) = (8, 13);

/// Round half up, matching the arithmetic the stat tables were tuned with
pub(crate) fn round(value: f64) -> i64 {
    (value + 0.5).floor() as i64
}

/// Win-rate bonus from a battle record.
///
/// Flat modifier added to attack, defense and every move's power.
/// Zero until [`WIN_RATE_MIN_SAMPLE`] battles have been recorded.
pub fn win_rate_bonus(victories: u32, defeats: u32) -> i32 {
    let total = u64::from(victories) + u64::from(defeats);
    if total < u64::from(WIN_RATE_MIN_SAMPLE) {
        return 0;
    }

    let win_rate = victories as f64 / total as f64;
    if win_rate >= 1.0 {
        10
    } else if win_rate >= 0.75 {
        5
    } else if win_rate <= 0.25 {
        -5
    } else {
        0
    }
}

/// Attack multiplier from age: +1% per 3 days, capped at +30% by day 300
pub fn attack_age_multiplier(age_days: u32) -> f64 {
    1.0 + (f64::from(age_days) / 300.0).min(0.3)
}

/// Attack and defense derived for one battle
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StatBlock {
    pub attack: u32,
    pub defense: u32,
}

impl StatBlock {
    /// Derive stats for an entity.
    ///
    /// Draws fresh baselines on every call, so deriving twice from the same
    /// entity generally gives different results.
    pub fn derive<R: Rng + ?Sized>(entity: &Entity, rng: &mut R) -> Self {
        let attack_base = rng.gen_range(ATTACK_BASE_RANGE.0..=ATTACK_BASE_RANGE.1);
        let defense_base = rng.gen_range(DEFENSE_BASE_RANGE.0..=DEFENSE_BASE_RANGE.1);
        Self::from_baselines(entity, attack_base, defense_base)
    }

    /// Derive stats from explicit baselines
    pub fn from_baselines(entity: &Entity, attack_base: u32, defense_base: u32) -> Self {
        let robustness = entity.robustness();
        let health_factor = f64::from(entity.health()) / 100.0;
        let bonus = i64::from(win_rate_bonus(entity.victories, entity.defeats));

        let attack = round(
            f64::from(attack_base)
                * attack_age_multiplier(entity.age_days)
                * robustness
                * health_factor,
        ) + bonus;
        let defense =
            round(f64::from(defense_base) * robustness + f64::from(entity.age_days) / 50.0) + bonus;

        Self {
            attack: clamp_stat(attack),
            defense: clamp_stat(defense),
        }
    }
}

fn clamp_stat(value: i64) -> u32 {
    value.clamp(0, i64::from(u32::MAX)) as u32
}

#[cfg(test)]
mod tests {
    use super::*;
    use arena_model::Category;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn entity(age_days: u32, robustness: f64, health: u32) -> Entity {
        let mut e = Entity::new("p1", "Basil", Category::Herbs);
        e.age_days = age_days;
        e.robustness = Some(robustness);
        e.health = Some(health);
        e
    }

    #[test]
    fn test_win_rate_bonus_thresholds() {
        assert_eq!(win_rate_bonus(8, 2), 5);
        assert_eq!(win_rate_bonus(2, 8), -5);
        assert_eq!(win_rate_bonus(3, 3), 0);
        assert_eq!(win_rate_bonus(10, 0), 10);
        assert_eq!(win_rate_bonus(5, 5), 0);
        assert_eq!(win_rate_bonus(0, 10), -5);
        assert_eq!(win_rate_bonus(9, 0), 0); // below sample size
    }

    #[test]
    fn test_attack_age_multiplier_caps() {
        assert!((attack_age_multiplier(0) - 1.0).abs() < 1e-9);
        assert!((attack_age_multiplier(150) - 1.15).abs() < 1e-9);
        assert!((attack_age_multiplier(300) - 1.3).abs() < 1e-9);
        assert!((attack_age_multiplier(5000) - 1.3).abs() < 1e-9);
    }

    #[test]
    fn test_from_baselines_fresh_entity() {
        let stats = StatBlock::from_baselines(&entity(0, 1.0, 100), 20, 10);
        assert_eq!(stats, StatBlock { attack: 20, defense: 10 });
    }

    #[test]
    fn test_from_baselines_aged_robust_entity() {
        // attack: 20 * 1.3 * 1.2 * 0.5 = 15.6 -> 16
        // defense: 10 * 1.2 + 300/50 = 18
        let stats = StatBlock::from_baselines(&entity(300, 1.2, 50), 20, 10);
        assert_eq!(stats.attack, 16);
        assert_eq!(stats.defense, 18);
    }

    #[test]
    fn test_from_baselines_applies_win_rate_bonus() {
        let mut e = entity(0, 1.0, 100);
        e.victories = 10;
        let stats = StatBlock::from_baselines(&e, 20, 10);
        assert_eq!(stats, StatBlock { attack: 30, defense: 20 });
    }

    #[test]
    fn test_from_baselines_never_negative() {
        let mut e = entity(0, 1.0, 0);
        e.defeats = 20;
        let stats = StatBlock::from_baselines(&e, 15, 8);
        assert_eq!(stats.attack, 0);
        assert_eq!(stats.defense, 3);
    }

    #[test]
    fn test_derive_within_baseline_ranges() {
        let mut rng = StdRng::seed_from_u64(7);
        let e = entity(0, 1.0, 100);
        for _ in 0..200 {
            let stats = StatBlock::derive(&e, &mut rng);
            assert!((15..=24).contains(&stats.attack));
            assert!((8..=13).contains(&stats.defense));
        }
    }

    #[test]
    fn test_derive_is_not_deterministic_per_entity() {
        let mut rng = StdRng::seed_from_u64(42);
        let e = entity(0, 1.0, 100);
        let first = StatBlock::derive(&e, &mut rng);
        let varied = (0..50).any(|_| StatBlock::derive(&e, &mut rng) != first);
        assert!(varied);
    }
}
