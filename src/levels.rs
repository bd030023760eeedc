//! Level catalog
//!
//! Static, ordered list of access levels. Ordering by id is the promotion order.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// A single access level
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelDefinition {
    pub id: u32,
    /// Short uppercase label shown in notifications
    pub name: String,
    pub description: String,
}

impl LevelDefinition {
    pub fn new(id: u32, name: &str, description: &str) -> Self {
        Self {
            id,
            name: name.to_string(),
            description: description.to_string(),
        }
    }
}

/// Open-ended catalog keyed by non-negative level id
///
/// Serialized as a plain list of definitions; each entry is keyed by its `id`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<LevelDefinition>", into = "Vec<LevelDefinition>")]
pub struct LevelCatalog {
    levels: BTreeMap<u32, LevelDefinition>,
}

impl From<Vec<LevelDefinition>> for LevelCatalog {
    fn from(levels: Vec<LevelDefinition>) -> Self {
        Self::from_levels(levels)
    }
}

impl From<LevelCatalog> for Vec<LevelDefinition> {
    fn from(catalog: LevelCatalog) -> Self {
        catalog.levels.into_values().collect()
    }
}

impl Default for LevelCatalog {
    fn default() -> Self {
        Self::from_levels([
            LevelDefinition::new(0, "AWAKENING", "First arrival, only the surface is visible (hub)"),
            LevelDefinition::new(1, "AWARENESS", "Soul questionnaire completed, monitor unlocked"),
            LevelDefinition::new(
                2,
                "OBSERVER",
                "More than 3 interactions on the monitor, timeline unlocked",
            ),
            LevelDefinition::new(3, "SEEKER", "Prophecy read on the timeline, deep links unlocked"),
        ])
    }
}

impl LevelCatalog {
    pub fn from_levels(levels: impl IntoIterator<Item = LevelDefinition>) -> Self {
        Self {
            levels: levels.into_iter().map(|l| (l.id, l)).collect(),
        }
    }

    pub fn get(&self, id: u32) -> Option<&LevelDefinition> {
        self.levels.get(&id)
    }

    pub fn contains(&self, id: u32) -> bool {
        self.levels.contains_key(&id)
    }

    /// Display label for a level, falling back to `LEVEL <n>` for unknown ids
    pub fn label(&self, id: u32) -> String {
        match self.get(id) {
            Some(level) => level.name.clone(),
            None => format!("LEVEL {}", id),
        }
    }

    /// Highest id in the catalog (the terminal state)
    pub fn max_level(&self) -> Option<u32> {
        self.levels.keys().next_back().copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = &LevelDefinition> {
        self.levels.values()
    }

    pub fn len(&self) -> usize {
        self.levels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }
}
