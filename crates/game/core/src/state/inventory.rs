use std::collections::BTreeMap;

/// Item counts owned by an entity, keyed by item id.
///
/// Entries never hold a zero count: consuming the last unit removes the key.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct Inventory {
    items: BTreeMap<String, u32>,
}

impl Inventory {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn count(&self, item_id: &str) -> u32 {
        self.items.get(item_id).copied().unwrap_or(0)
    }

    pub fn has(&self, item_id: &str) -> bool {
        self.count(item_id) > 0
    }

    pub fn add(&mut self, item_id: impl Into<String>, quantity: u32) {
        if quantity == 0 {
            return;
        }
        let count = self.items.entry(item_id.into()).or_insert(0);
        *count = count.saturating_add(quantity);
    }

    /// Takes one unit of `item_id`. Returns the remaining count, or `None`
    /// when the item is not owned.
    pub fn take_one(&mut self, item_id: &str) -> Option<u32> {
        let count = self.items.get_mut(item_id)?;
        if *count == 0 {
            self.items.remove(item_id);
            return None;
        }
        *count -= 1;
        let remaining = *count;
        if remaining == 0 {
            self.items.remove(item_id);
        }
        Some(remaining)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, u32)> {
        self.items.iter().map(|(id, count)| (id.as_str(), *count))
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl<S: Into<String>> FromIterator<(S, u32)> for Inventory {
    fn from_iter<I: IntoIterator<Item = (S, u32)>>(iter: I) -> Self {
        let mut inventory = Self::empty();
        for (id, quantity) in iter {
            inventory.add(id, quantity);
        }
        inventory
    }
}
