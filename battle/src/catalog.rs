//! Category → base move table
//!
//! Every category supplies exactly four template moves: two attacks, one
//! defense and one heal. Combatants receive scaled copies of these at
//! creation time; the templates themselves never change.

use std::collections::HashMap;
use std::sync::{Arc, LazyLock};

use arena_model::{Category, Move, MoveKind};

use crate::error::BattleError;

static BUILTIN: LazyLock<Arc<MoveCatalog>> = LazyLock::new(|| Arc::new(MoveCatalog::standard()));

/// Immutable mapping from category to template moves
#[derive(Debug, Clone, PartialEq)]
pub struct MoveCatalog {
    tables: HashMap<Category, Vec<Move>>,
}

impl MoveCatalog {
    /// The built-in table, constructed once per process
    pub fn builtin() -> Arc<MoveCatalog> {
        Arc::clone(&BUILTIN)
    }

    /// Template moves for a category.
    ///
    /// Categories without a table fall back to herbs.
    pub fn moves_for(&self, category: Category) -> &[Move] {
        self.tables
            .get(&category)
            .or_else(|| self.tables.get(&Category::Herbs))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Template moves for a raw category tag (unknown tags use herbs)
    pub fn moves_for_tag(&self, tag: &str) -> &[Move] {
        self.moves_for(Category::from_tag_lossy(tag))
    }

    /// Iterate over all category tables
    pub fn iter(&self) -> impl Iterator<Item = (Category, &[Move])> {
        Category::ALL
            .into_iter()
            .filter_map(|c| self.tables.get(&c).map(|moves| (c, moves.as_slice())))
    }

    /// Replace the table for one category after validating its shape
    pub fn set_table(&mut self, category: Category, moves: Vec<Move>) -> Result<(), BattleError> {
        validate_table(category, &moves)?;
        self.tables.insert(category, moves);
        Ok(())
    }

    /// Load a catalog from JSON.
    ///
    /// The document maps category tags to move lists. Categories it omits
    /// keep their built-in moves.
    ///
    /// ```json
    /// { "herbs": [
    ///     { "name": "Leaf Blade", "type": "attack", "power": 20, "cost": 20 },
    ///     { "name": "Aroma Burst", "type": "attack", "power": 26, "cost": 30 },
    ///     { "name": "Herbal Shield", "type": "defense", "reduction": 0.5 },
    ///     { "name": "Soothing Balm", "type": "heal", "amount": 20 }
    /// ] }
    /// ```
    #[cfg(feature = "serde")]
    pub fn from_json(json: &str) -> Result<Self, BattleError> {
        let overrides: HashMap<Category, Vec<Move>> =
            serde_json::from_str(json).map_err(|e| BattleError::Catalog(e.to_string()))?;

        let mut catalog = Self::standard();
        for (category, moves) in overrides {
            catalog.set_table(category, moves)?;
        }
        Ok(catalog)
    }

    fn standard() -> Self {
        let tables = Category::ALL
            .into_iter()
            .map(|category| (category, standard_table(category)))
            .collect();
        Self { tables }
    }
}

impl Default for MoveCatalog {
    fn default() -> Self {
        Self::standard()
    }
}

/// Check a table has two attacks, one defense and one heal
pub fn validate_table(category: Category, moves: &[Move]) -> Result<(), BattleError> {
    let count = |kind: MoveKind| moves.iter().filter(|m| m.kind() == kind).count();

    if moves.len() != 4
        || count(MoveKind::Attack) != 2
        || count(MoveKind::Defense) != 1
        || count(MoveKind::Heal) != 1
    {
        return Err(BattleError::Catalog(format!(
            "{category} needs two attack, one defense and one heal move, got {}",
            moves.len()
        )));
    }

    if moves.iter().any(|m| !m.power().is_finite() || m.power() < 0.0) {
        return Err(BattleError::Catalog(format!(
            "{category} has a move with invalid power"
        )));
    }

    Ok(())
}

fn standard_table(category: Category) -> Vec<Move> {
    match category {
        Category::Herbs => vec![
            Move::attack("Leaf Blade", 20, 20),
            Move::attack("Aroma Burst", 26, 30),
            Move::defense("Herbal Shield", 0.5),
            Move::heal("Soothing Balm", 20),
        ],
        Category::Succulents => vec![
            Move::attack("Spine Shot", 18, 15),
            Move::attack("Desert Slam", 25, 30),
            Move::defense("Waxy Coat", 0.6),
            Move::heal("Stored Water", 23),
        ],
        Category::Flowers => vec![
            Move::attack("Petal Storm", 22, 25),
            Move::attack("Pollen Burst", 17, 15),
            Move::defense("Bloom Guard", 0.45),
            Move::heal("Sweet Nectar", 21),
        ],
        Category::Vegetables => vec![
            Move::attack("Root Smash", 24, 25),
            Move::attack("Seed Bomb", 19, 15),
            Move::defense("Thick Skin", 0.55),
            Move::heal("Compost", 22),
        ],
        Category::Indoor => vec![
            Move::attack("Vine Whip", 20, 20),
            Move::attack("Sunbeam", 27, 35),
            Move::defense("Canopy", 0.5),
            Move::heal("Photosynthesis", 21),
        ],
        Category::Aquatic => vec![
            Move::attack("Tidal Lash", 21, 20),
            Move::attack("Bubble Burst", 25, 30),
            Move::defense("Lily Pad", 0.5),
            Move::heal("Freshwater", 23),
        ],
        Category::Ornamental => vec![
            Move::attack("Thorn Lash", 23, 25),
            Move::attack("Bark Bash", 19, 15),
            Move::defense("Bark Armor", 0.6),
            Move::heal("Sap Mend", 18),
        ],
        Category::Other => vec![
            Move::attack("Tackle", 18, 15),
            Move::attack("Wild Growth", 24, 30),
            Move::defense("Overgrowth", 0.45),
            Move::heal("Regrow", 19),
        ],
    }
}
