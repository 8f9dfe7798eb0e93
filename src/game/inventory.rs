use bevy::prelude::*;
use thiserror::Error;
use uuid::Uuid;

/// Unique identity of one item instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ItemId(pub Uuid);

impl ItemId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ItemId {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Item {
    pub id: ItemId,
    pub name: String,
}

impl Item {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: ItemId::new(),
            name: name.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InventoryError {
    #[error("inventory full ({capacity} items)")]
    Full { capacity: usize },
    #[error("item {0:?} not in inventory")]
    NotFound(ItemId),
}

/// Capacity-bounded item list owned by the character carrying it.
#[derive(Component, Debug, Clone)]
pub struct Inventory {
    capacity: usize,
    items: Vec<Item>,
}

impl Inventory {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            capacity,
            items: Vec::with_capacity(capacity),
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn items(&self) -> &[Item] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.items.len() >= self.capacity
    }

    pub fn add_item(&mut self, item: Item) -> Result<(), InventoryError> {
        if self.is_full() {
            return Err(InventoryError::Full {
                capacity: self.capacity,
            });
        }
        self.items.push(item);
        Ok(())
    }

    pub fn remove_item(&mut self, id: &ItemId) -> Result<Item, InventoryError> {
        let index = self
            .items
            .iter()
            .position(|item| item.id == *id)
            .ok_or(InventoryError::NotFound(*id))?;
        Ok(self.items.remove(index))
    }

    /// Apply a new capacity (e.g. after a tuning reload). Items already held
    /// beyond the new capacity are kept; only further additions are refused.
    pub fn set_capacity(&mut self, capacity: usize) {
        self.capacity = capacity;
    }
}
