use crate::status::StatusEffectKind;

pub trait ItemOracle: Send + Sync {
    fn definition(&self, item_id: &str) -> Option<ItemDefinition>;

    /// Returns all item definitions available in this oracle.
    fn all_definitions(&self) -> Vec<ItemDefinition>;
}

/// Item definition with common fields and type-specific data.
///
/// # Design: Base + Kind Pattern
///
/// - Base struct holds the fields every item shares (id, emoji, name)
/// - `kind` enum holds what the item does when spent
///
/// Items are looked up by `id` (`"bomb"`) or by `emoji` (`"💣"`), since
/// players refer to them either way.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ItemDefinition {
    pub id: String,
    pub emoji: String,
    pub name: String,
    pub kind: ItemKind,
}

impl ItemDefinition {
    pub fn new(
        id: impl Into<String>,
        emoji: impl Into<String>,
        name: impl Into<String>,
        kind: ItemKind,
    ) -> Self {
        Self {
            id: id.into(),
            emoji: emoji.into(),
            name: name.into(),
            kind,
        }
    }

    /// True if `key` names this item by id (case-insensitive) or emoji.
    pub fn matches(&self, key: &str) -> bool {
        self.id.eq_ignore_ascii_case(key) || self.emoji == key
    }

    /// Status effect delivered alongside the item's main effect, if any.
    pub fn payload(&self) -> Option<StatusEffectKind> {
        match &self.kind {
            ItemKind::Offensive(data) => data.applies,
            ItemKind::Healing(data) => data.applies,
            ItemKind::Shield(_) | ItemKind::Cure(_) => None,
        }
    }

    pub fn as_offensive(&self) -> Option<&OffensiveData> {
        match &self.kind {
            ItemKind::Offensive(data) => Some(data),
            _ => None,
        }
    }
}

/// Item type with type-specific data.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ItemKind {
    /// Spent by an attack.
    Offensive(OffensiveData),

    /// Restores HP, optionally applying a heal-over-time.
    Healing(HealingData),

    /// Adds shield points.
    Shield(ShieldData),

    /// Removes the listed effects from the target.
    Cure(CureData),
}

impl ItemKind {
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Offensive(_) => "offensive",
            Self::Healing(_) => "healing",
            Self::Shield(_) => "shield",
            Self::Cure(_) => "cure",
        }
    }
}

/// Offensive item data. Chances and multipliers are integer percentages.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct OffensiveData {
    pub base_damage: u32,
    pub crit_chance_pct: u32,
    /// `150` = ×1.5
    pub crit_multiplier_pct: u32,
    #[cfg_attr(feature = "serde", serde(default))]
    pub applies: Option<StatusEffectKind>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct HealingData {
    pub heal_amount: u32,
    #[cfg_attr(feature = "serde", serde(default))]
    pub applies: Option<StatusEffectKind>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ShieldData {
    pub shield_amount: u32,
}

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CureData {
    pub cures: Vec<StatusEffectKind>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn items_match_by_id_or_emoji() {
        let bomb = ItemDefinition::new(
            "bomb",
            "💣",
            "Bombe",
            ItemKind::Offensive(OffensiveData {
                base_damage: 40,
                crit_chance_pct: 12,
                crit_multiplier_pct: 150,
                applies: None,
            }),
        );

        assert!(bomb.matches("bomb"));
        assert!(bomb.matches("BOMB"));
        assert!(bomb.matches("💣"));
        assert!(!bomb.matches("sword"));
        assert_eq!(bomb.kind.label(), "offensive");
    }

    #[test]
    fn payload_comes_from_offensive_and_healing_items() {
        let herb = ItemDefinition::new(
            "herb",
            "🌿",
            "Herbe",
            ItemKind::Healing(HealingData {
                heal_amount: 5,
                applies: Some(StatusEffectKind::Regeneration),
            }),
        );
        let shield = ItemDefinition::new(
            "shield",
            "🛡️",
            "Bouclier",
            ItemKind::Shield(ShieldData { shield_amount: 20 }),
        );

        assert_eq!(herb.payload(), Some(StatusEffectKind::Regeneration));
        assert_eq!(shield.payload(), None);
    }
}
