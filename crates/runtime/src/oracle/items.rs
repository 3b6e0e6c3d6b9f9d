//! [`gotvalis_core::ItemOracle`] backed by an in-memory map.
use gotvalis_core::{ItemDefinition, ItemOracle};
use std::collections::HashMap;

use crate::api::{Result, RuntimeError};

/// ItemOracle implementation with static item definitions.
///
/// Items resolve by id (case-insensitive) or by emoji. Emoji lookups ignore
/// the U+FE0F variation selector, so `🛡` and `🛡️` find the same item.
#[derive(Debug, Default)]
pub struct ItemOracleImpl {
    definitions: HashMap<String, ItemDefinition>,
    emojis: HashMap<String, String>,
}

impl ItemOracleImpl {
    pub fn new() -> Self {
        Self::default()
    }

    /// Oracle over the catalog shipped in `gotvalis-content`.
    pub fn builtin() -> Result<Self> {
        let items = gotvalis_content::ItemLoader::builtin()
            .map_err(|e| RuntimeError::ItemCatalog(e.to_string()))?;
        Ok(Self::from_definitions(items))
    }

    pub fn from_definitions(items: impl IntoIterator<Item = ItemDefinition>) -> Self {
        let mut oracle = Self::new();
        for item in items {
            oracle.add_definition(item);
        }
        oracle
    }

    /// Add an item definition, replacing one with the same id.
    pub fn add_definition(&mut self, def: ItemDefinition) {
        let key = def.id.to_lowercase();
        self.emojis.insert(normalize_emoji(&def.emoji), key.clone());
        self.definitions.insert(key, def);
    }

    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }
}

impl ItemOracle for ItemOracleImpl {
    fn definition(&self, item_id: &str) -> Option<ItemDefinition> {
        let key = item_id.trim();
        self.definitions
            .get(&key.to_lowercase())
            .or_else(|| {
                self.emojis
                    .get(&normalize_emoji(key))
                    .and_then(|id| self.definitions.get(id))
            })
            .cloned()
    }

    fn all_definitions(&self) -> Vec<ItemDefinition> {
        let mut items: Vec<_> = self.definitions.values().cloned().collect();
        items.sort_by(|a, b| a.id.cmp(&b.id));
        items
    }
}

fn normalize_emoji(emoji: &str) -> String {
    emoji.trim().chars().filter(|c| *c != '\u{FE0F}').collect()
}
