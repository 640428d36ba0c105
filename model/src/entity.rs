//! Persistent entities that can be sent into the arena

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize};

use crate::ModelError;

/// Plant category, selects the base move table
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    #[default]
    Herbs,
    Succulents,
    Flowers,
    Vegetables,
    Indoor,
    Aquatic,
    Ornamental,
    Other,
}

impl Category {
    /// All categories in table order
    pub const ALL: [Category; 8] = [
        Category::Herbs,
        Category::Succulents,
        Category::Flowers,
        Category::Vegetables,
        Category::Indoor,
        Category::Aquatic,
        Category::Ornamental,
        Category::Other,
    ];

    /// Lowercase tag used in storage and config files
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Herbs => "herbs",
            Category::Succulents => "succulents",
            Category::Flowers => "flowers",
            Category::Vegetables => "vegetables",
            Category::Indoor => "indoor",
            Category::Aquatic => "aquatic",
            Category::Ornamental => "ornamental",
            Category::Other => "other",
        }
    }

    /// Parse a tag, falling back to herbs for anything unrecognised
    pub fn from_tag_lossy(tag: &str) -> Self {
        tag.parse().unwrap_or_default()
    }

    /// Default icon shown for combatants of this category
    pub fn icon(&self) -> &'static str {
        match self {
            Category::Herbs => "🌿",
            Category::Succulents => "🌵",
            Category::Flowers => "🌸",
            Category::Vegetables => "🥕",
            Category::Indoor => "🪴",
            Category::Aquatic => "🪷",
            Category::Ornamental => "🌳",
            Category::Other => "🌱",
        }
    }
}

impl FromStr for Category {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let tag = s.trim().to_ascii_lowercase();
        Category::ALL
            .into_iter()
            .find(|c| c.as_str() == tag)
            .ok_or_else(|| ModelError::UnknownCategory(s.to_string()))
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A user-owned plant as stored by the surrounding application.
///
/// The engine only reads these. Optional fields are defaulted rather than
/// rejected: missing health counts as 100, missing robustness as 1.0 and a
/// missing category as herbs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entity {
    pub id: String,

    /// Account that owns this entity, if any
    #[serde(default)]
    pub owner_id: Option<String>,

    pub name: String,

    #[serde(default)]
    pub icon: String,

    /// Unrecognised tags read as herbs
    #[serde(default, deserialize_with = "category_lossy")]
    pub category: Option<Category>,

    /// Health 0-100
    #[serde(default)]
    pub health: Option<u32>,

    #[serde(default)]
    pub age_days: u32,

    /// Robustness multiplier, typically 0.9-1.5
    #[serde(default)]
    pub robustness: Option<f64>,

    #[serde(default)]
    pub victories: u32,

    #[serde(default)]
    pub defeats: u32,
}

impl Entity {
    /// Create an entity with default attributes
    pub fn new(id: impl Into<String>, name: impl Into<String>, category: Category) -> Self {
        Self {
            id: id.into(),
            owner_id: None,
            name: name.into(),
            icon: category.icon().to_string(),
            category: Some(category),
            health: Some(100),
            age_days: 0,
            robustness: Some(1.0),
            victories: 0,
            defeats: 0,
        }
    }

    /// Set the owning account
    pub fn with_owner(mut self, owner_id: impl Into<String>) -> Self {
        self.owner_id = Some(owner_id.into());
        self
    }

    /// Category, defaulting to herbs
    pub fn category(&self) -> Category {
        self.category.unwrap_or_default()
    }

    /// Health clamped to 0-100, defaulting to 100
    pub fn health(&self) -> u32 {
        self.health.unwrap_or(100).min(100)
    }

    /// Robustness, defaulting to 1.0; negative or non-finite values count as 0
    pub fn robustness(&self) -> f64 {
        match self.robustness {
            Some(r) if r.is_finite() => r.max(0.0),
            Some(_) => 0.0,
            None => 1.0,
        }
    }

    /// Icon, falling back to the category icon
    pub fn icon(&self) -> &str {
        if self.icon.is_empty() {
            self.category().icon()
        } else {
            &self.icon
        }
    }

    /// Total recorded battles
    pub fn battles(&self) -> u32 {
        self.victories.saturating_add(self.defeats)
    }
}

fn category_lossy<'de, D>(deserializer: D) -> Result<Option<Category>, D::Error>
where
    D: Deserializer<'de>,
{
    let tag = Option::<String>::deserialize(deserializer)?;
    Ok(tag.map(|tag| Category::from_tag_lossy(&tag)))
}
