//! Slot-limited inventory backing the cooking spit.
//!
//! Every slot holds at most [`SLOT_LIMIT`] items. Mutations report back to the
//! owner through a [`ContentsListener`] so the owner can mark itself dirty and
//! push a sync update.

use serde::{Deserialize, Serialize};
use spitroast_core::{ItemStack, ItemType};
use tracing::warn;

/// Hard per-slot quantity limit.
pub const SLOT_LIMIT: u32 = 1;

/// Receives a callback whenever a slot's contents change.
pub trait ContentsListener {
    /// Called after `slot` was mutated.
    fn on_contents_changed(&mut self, slot: usize);
}

impl<F: FnMut(usize)> ContentsListener for F {
    fn on_contents_changed(&mut self, slot: usize) {
        self(slot)
    }
}

/// One persisted slot entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlotRecord {
    /// Item kind.
    pub item: ItemType,
    /// Quantity (0 or 1 for spit slots).
    pub count: u32,
}

/// Persisted form of an inventory: ordered slots, `None` for empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct InventoryRecord {
    /// Slot contents in slot order.
    pub slots: Vec<Option<SlotRecord>>,
}

/// Fixed-size inventory where each slot holds a single item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpitInventory {
    slots: Vec<Option<ItemStack>>,
}

impl SpitInventory {
    /// Create an empty inventory with `slot_count` slots.
    pub fn new(slot_count: usize) -> Self {
        Self {
            slots: vec![None; slot_count],
        }
    }

    /// Number of slots, fixed at construction.
    pub fn slot_count(&self) -> usize {
        self.slots.len()
    }

    /// Quantity limit for `slot`.
    pub fn slot_limit(&self, _slot: usize) -> u32 {
        SLOT_LIMIT
    }

    /// Contents of `slot`. Panics if `slot` is out of range.
    pub fn get(&self, slot: usize) -> Option<&ItemStack> {
        self.slots[slot].as_ref()
    }

    /// Iterate slot contents in order.
    pub fn iter(&self) -> impl Iterator<Item = Option<&ItemStack>> + '_ {
        self.slots.iter().map(Option::as_ref)
    }

    /// Number of non-empty slots.
    pub fn occupied(&self) -> usize {
        self.slots.iter().filter(|slot| slot.is_some()).count()
    }

    /// Check if every slot is empty.
    pub fn is_empty(&self) -> bool {
        self.slots.iter().all(Option::is_none)
    }

    /// First empty slot, if any.
    pub fn first_empty(&self) -> Option<usize> {
        self.slots.iter().position(Option::is_none)
    }

    /// Replace the contents of `slot`, clamping the quantity to the slot limit.
    pub fn set<L>(&mut self, slot: usize, stack: Option<ItemStack>, listener: &mut L)
    where
        L: ContentsListener + ?Sized,
    {
        let limit = self.slot_limit(slot);
        self.slots[slot] = stack.filter(|s| s.count > 0).map(|mut s| {
            s.count = s.count.min(limit);
            s
        });
        listener.on_contents_changed(slot);
    }

    /// Insert up to `quantity` of `item` into `slot`.
    ///
    /// Only succeeds when the slot is empty or already holds `item`. Returns the
    /// quantity actually inserted.
    pub fn insert<L>(
        &mut self,
        slot: usize,
        item: ItemType,
        quantity: u32,
        listener: &mut L,
    ) -> u32
    where
        L: ContentsListener + ?Sized,
    {
        let limit = self.slot_limit(slot);
        let current = match &self.slots[slot] {
            None => 0,
            Some(existing) if existing.item_type == item => existing.count,
            Some(_) => return 0,
        };

        let inserted = quantity.min(limit.saturating_sub(current));
        if inserted == 0 {
            return 0;
        }

        self.slots[slot] = Some(ItemStack::new(item, current + inserted));
        listener.on_contents_changed(slot);
        inserted
    }

    /// Remove up to `max` items (capped at the slot limit) from `slot`.
    pub fn extract<L>(&mut self, slot: usize, max: u32, listener: &mut L) -> Option<ItemStack>
    where
        L: ContentsListener + ?Sized,
    {
        let amount = max.min(self.slot_limit(slot));
        let stack = self.slots[slot].as_mut()?;
        let extracted = stack.split(amount)?;
        if stack.count == 0 {
            self.slots[slot] = None;
        }
        listener.on_contents_changed(slot);
        Some(extracted)
    }

    /// Snapshot the inventory into its persisted form.
    pub fn to_record(&self) -> InventoryRecord {
        InventoryRecord {
            slots: self
                .slots
                .iter()
                .map(|slot| {
                    slot.map(|s| SlotRecord {
                        item: s.item_type,
                        count: s.count,
                    })
                })
                .collect(),
        }
    }

    /// Replace every slot from a persisted record without notifying.
    ///
    /// Missing trailing entries load as empty; extra entries are dropped.
    pub fn load_record(&mut self, record: &InventoryRecord) {
        if record.slots.len() > self.slots.len() {
            warn!(
                expected = self.slots.len(),
                got = record.slots.len(),
                "Ignoring extra inventory slots in record"
            );
        }

        for slot in 0..self.slots.len() {
            let limit = self.slot_limit(slot);
            self.slots[slot] = record
                .slots
                .get(slot)
                .copied()
                .flatten()
                .filter(|entry| entry.count > 0)
                .map(|entry| ItemStack::new(entry.item, entry.count.min(limit)));
        }
    }
}
