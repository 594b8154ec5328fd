use std::rc::Rc;

use crate::error::{Result, SceneError};

use super::items::{Item, SharedItem};

/// One keyed registry slot.
#[derive(Debug, Clone)]
pub struct RegistryEntry {
    pub key: String,
    pub item: SharedItem,
}

/// Ordered, uniquely keyed item collection.
///
/// Order is paint order: index 0 is drawn first (bottom), the last entry on top.
///
/// Every operation is linear in the number of entries; reordering happens on
/// user actions, not per frame.
#[derive(Debug, Default)]
pub struct Registry {
    entries: Vec<RegistryEntry>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in paint order.
    #[inline]
    pub fn iter(&self) -> std::slice::Iter<'_, RegistryEntry> {
        self.entries.iter()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> + '_ {
        self.entries.iter().map(|e| e.key.as_str())
    }

    #[inline]
    pub fn contains(&self, key: &str) -> bool {
        self.index_of(key).is_some()
    }

    pub fn index_of(&self, key: &str) -> Option<usize> {
        self.entries.iter().position(|e| e.key == key)
    }

    fn require(&self, key: &str) -> Result<usize> {
        self.index_of(key).ok_or_else(|| SceneError::NotFound(key.to_string()))
    }

    fn check_item(key: &str, item: &SharedItem) -> Result<()> {
        let valid = item
            .try_borrow()
            .map_err(|_| SceneError::ItemInUse(key.to_string()))?
            .is_valid();
        if valid {
            Ok(())
        } else {
            Err(SceneError::InvalidItem(key.to_string()))
        }
    }

    /// Appends `item` on top of the paint order.
    ///
    /// Takes an owned [`Item`] or an existing [`SharedItem`]; sharing a handle
    /// lets several scenes draw the same item.
    pub fn insert(&mut self, key: impl Into<String>, item: impl Into<SharedItem>) -> Result<SharedItem> {
        let key = key.into();
        let item = item.into();
        if self.contains(&key) {
            return Err(SceneError::DuplicateKey(key));
        }
        Self::check_item(&key, &item)?;

        log::debug!("registered `{key}` at position {}", self.entries.len());
        self.entries.push(RegistryEntry {
            key,
            item: Rc::clone(&item),
        });
        Ok(item)
    }

    pub fn get(&self, key: &str) -> Result<SharedItem> {
        let i = self.require(key)?;
        Ok(Rc::clone(&self.entries[i].item))
    }

    /// Swaps the item stored under `key`, keeping its position. Returns the old item.
    pub fn replace(&mut self, key: &str, item: impl Into<SharedItem>) -> Result<SharedItem> {
        let i = self.require(key)?;
        let item = item.into();
        Self::check_item(key, &item)?;
        log::debug!("replaced `{key}`");
        Ok(std::mem::replace(&mut self.entries[i].item, item))
    }

    /// Removes `key`; entries above it shift down one position.
    pub fn remove(&mut self, key: &str) -> Result<SharedItem> {
        let i = self.require(key)?;
        log::debug!("removed `{key}` from position {i}");
        Ok(self.entries.remove(i).item)
    }

    /// Moves `key` one position toward the top. No-op when already on top.
    pub fn raise(&mut self, key: &str) -> Result<()> {
        let i = self.require(key)?;
        if i + 1 < self.entries.len() {
            self.entries.swap(i, i + 1);
        }
        Ok(())
    }

    /// Moves `key` one position toward the bottom. No-op when already at the bottom.
    pub fn lower(&mut self, key: &str) -> Result<()> {
        let i = self.require(key)?;
        if i > 0 {
            self.entries.swap(i, i - 1);
        }
        Ok(())
    }

    pub fn bring_to_front(&mut self, key: &str) -> Result<()> {
        let i = self.require(key)?;
        let entry = self.entries.remove(i);
        self.entries.push(entry);
        Ok(())
    }

    pub fn send_to_back(&mut self, key: &str) -> Result<()> {
        let i = self.require(key)?;
        let entry = self.entries.remove(i);
        self.entries.insert(0, entry);
        Ok(())
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

impl<'a> IntoIterator for &'a Registry {
    type Item = &'a RegistryEntry;
    type IntoIter = std::slice::Iter<'a, RegistryEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

impl From<Item> for SharedItem {
    fn from(item: Item) -> Self {
        item.shared()
    }
}
