//! Item catalog loader.

use std::collections::HashSet;
use std::path::Path;

use gotvalis_core::{ItemDefinition, ItemKind};
use serde::{Deserialize, Serialize};

use crate::loaders::{LoadResult, read_file};

/// Catalog shipped with the bot.
const BUILTIN_ITEMS: &str = include_str!("../../data/items.ron");

/// Item catalog structure for RON files.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ItemCatalog {
    pub items: Vec<ItemDefinition>,
}

impl ItemCatalog {
    /// Rejects duplicate ids or emojis and cures that list nothing.
    pub fn validate(&self) -> LoadResult<()> {
        let mut ids = HashSet::new();
        let mut emojis = HashSet::new();

        for item in &self.items {
            if !ids.insert(item.id.to_ascii_lowercase()) {
                anyhow::bail!("duplicate item id `{}`", item.id);
            }
            if !emojis.insert(item.emoji.as_str()) {
                anyhow::bail!("duplicate item emoji `{}` on `{}`", item.emoji, item.id);
            }
            if let ItemKind::Cure(data) = &item.kind {
                if data.cures.is_empty() {
                    anyhow::bail!("cure item `{}` cures nothing", item.id);
                }
            }
        }

        Ok(())
    }
}

/// Loader for item catalog from RON files.
pub struct ItemLoader;

impl ItemLoader {
    /// Load item catalog from a RON file.
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the RON file containing ItemCatalog
    pub fn load(path: &Path) -> LoadResult<Vec<ItemDefinition>> {
        let content = read_file(path)?;
        Self::parse(&content)
            .map_err(|e| anyhow::anyhow!("Invalid item catalog {}: {}", path.display(), e))
    }

    /// Parse and validate an item catalog from RON text.
    pub fn parse(content: &str) -> LoadResult<Vec<ItemDefinition>> {
        let catalog: ItemCatalog = ron::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse item catalog RON: {}", e))?;
        catalog.validate()?;

        Ok(catalog.items)
    }

    /// The catalog embedded from `data/items.ron`.
    pub fn builtin() -> LoadResult<Vec<ItemDefinition>> {
        Self::parse(BUILTIN_ITEMS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gotvalis_core::StatusEffectKind;

    fn find<'a>(items: &'a [ItemDefinition], key: &str) -> &'a ItemDefinition {
        items
            .iter()
            .find(|item| item.matches(key))
            .unwrap_or_else(|| panic!("missing item {key}"))
    }

    #[test]
    fn builtin_catalog_parses() {
        let items = ItemLoader::builtin().unwrap();
        assert_eq!(items.len(), 25);

        let offensive = items
            .iter()
            .filter(|item| matches!(item.kind, ItemKind::Offensive(_)))
            .count();
        assert_eq!(offensive, 13);
    }

    #[test]
    fn builtin_values_match_live_balance() {
        let items = ItemLoader::builtin().unwrap();

        let dynamite = find(&items, "🧨").as_offensive().unwrap();
        assert_eq!(
            (
                dynamite.base_damage,
                dynamite.crit_chance_pct,
                dynamite.crit_multiplier_pct
            ),
            (35, 15, 150)
        );

        assert_eq!(find(&items, "flame").payload(), Some(StatusEffectKind::Burn));
        assert_eq!(find(&items, "skull").payload(), Some(StatusEffectKind::Poison));
        assert_eq!(find(&items, "virus").payload(), Some(StatusEffectKind::Virus));
        assert_eq!(find(&items, "zombie").payload(), Some(StatusEffectKind::Infection));
        assert_eq!(
            find(&items, "herb").payload(),
            Some(StatusEffectKind::Regeneration)
        );

        match &find(&items, "💉").kind {
            ItemKind::Cure(data) => assert_eq!(data.cures.len(), 3),
            other => panic!("syringe should cure, got {other:?}"),
        }
    }

    #[test]
    fn items_used_by_runtime_tests_exist() {
        let items = ItemLoader::builtin().unwrap();
        for key in ["bomb", "flame", "sword", "potion", "shield", "syringe", "herb"] {
            find(&items, key);
        }
    }

    #[test]
    fn duplicate_ids_are_rejected() {
        let ron = r#"(
            items: [
                (id: "pill", emoji: "💊", name: "Pilule", kind: Healing((heal_amount: 10))),
                (id: "PILL", emoji: "🍎", name: "Pomme", kind: Healing((heal_amount: 10))),
            ],
        )"#;
        let err = ItemLoader::parse(ron).unwrap_err();
        assert!(err.to_string().contains("duplicate item id"));
    }
}
