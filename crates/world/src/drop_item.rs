//! Dropped item entities.
//!
//! Items land here when a spit is broken and dumps its contents, or when a
//! withdrawn item does not fit in the player's inventory. They despawn after
//! 5 minutes unless picked up.

use serde::{Deserialize, Serialize};
use spitroast_core::ItemStack;
use std::collections::BTreeMap;

/// Maximum lifetime for dropped items (5 minutes = 6000 ticks at 20 TPS).
pub const ITEM_DESPAWN_TICKS: u32 = 6000;

/// Pickup radius in blocks.
pub const PICKUP_RADIUS: f64 = 1.5;

/// A dropped item entity in the world.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DroppedItem {
    /// Unique ID for this dropped item.
    pub id: u64,
    /// World position.
    pub pos: [f64; 3],
    /// Items carried by the entity.
    pub stack: ItemStack,
    /// Ticks remaining before despawn.
    pub lifetime_ticks: u32,
}

impl DroppedItem {
    /// Create a new dropped item at the given position.
    pub fn new(id: u64, pos: [f64; 3], stack: ItemStack) -> Self {
        Self {
            id,
            pos,
            stack,
            lifetime_ticks: ITEM_DESPAWN_TICKS,
        }
    }

    /// Count down the lifetime. Returns `true` once the item should despawn.
    pub fn update(&mut self) -> bool {
        if self.lifetime_ticks == 0 {
            return true;
        }
        self.lifetime_ticks -= 1;
        false
    }

    /// Check if this item can be picked up from `pos`.
    pub fn can_pickup(&self, pos: [f64; 3]) -> bool {
        let dist_sq: f64 = self
            .pos
            .iter()
            .zip(pos.iter())
            .map(|(a, b)| (a - b) * (a - b))
            .sum();
        dist_sq <= PICKUP_RADIUS * PICKUP_RADIUS
    }
}

/// Manages all dropped items in the world.
#[derive(Debug, Default)]
pub struct ItemManager {
    items: BTreeMap<u64, DroppedItem>,
    next_id: u64,
}

impl ItemManager {
    /// Create a new empty item manager.
    pub fn new() -> Self {
        Self {
            items: BTreeMap::new(),
            next_id: 1,
        }
    }

    /// Spawn a new dropped item, returning its ID.
    pub fn spawn_item(&mut self, pos: [f64; 3], stack: ItemStack) -> u64 {
        let id = self.next_id.max(1);
        self.next_id = id + 1;
        self.items.insert(id, DroppedItem::new(id, pos, stack));
        id
    }

    /// Age every item, returning how many despawned this tick.
    pub fn update(&mut self) -> usize {
        let before = self.items.len();
        self.items.retain(|_, item| !item.update());
        before - self.items.len()
    }

    /// Pick up every item within reach of `pos`.
    pub fn pickup_items(&mut self, pos: [f64; 3]) -> Vec<ItemStack> {
        let ids: Vec<u64> = self
            .items
            .values()
            .filter(|item| item.can_pickup(pos))
            .map(|item| item.id)
            .collect();

        ids.into_iter()
            .filter_map(|id| self.items.remove(&id))
            .map(|item| item.stack)
            .collect()
    }

    /// Get the number of active dropped items.
    pub fn count(&self) -> usize {
        self.items.len()
    }

    /// Get a reference to a specific item by ID.
    pub fn get(&self, id: u64) -> Option<&DroppedItem> {
        self.items.get(&id)
    }

    /// All items in spawn order.
    pub fn items(&self) -> impl Iterator<Item = &DroppedItem> {
        self.items.values()
    }
}
