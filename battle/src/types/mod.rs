//! Domain types for battle state

mod combatant;
mod side;
mod stats;

pub use combatant::{Combatant, MAX_DEFENSE_BUFF, MAX_ENERGY, MIN_MAX_HEALTH, SYNTHETIC_ID};
pub use side::Side;
pub use stats::{
    ATTACK_BASE_RANGE, DEFENSE_BASE_RANGE, StatBlock, WIN_RATE_MIN_SAMPLE, attack_age_multiplier,
    win_rate_bonus,
};

pub(crate) use stats::round;
