//! Players and the interaction surface the spit needs from them.
//!
//! The spit only ever sees an [`Interactor`]: what is in hand, whether the
//! actor is sneaking, where it stands, and a way to stash items.

use serde::{Deserialize, Serialize};
use spitroast_core::ItemStack;

/// Number of slots in player inventory.
pub const INVENTORY_SIZE: usize = 36;

/// Actor interacting with a block entity.
pub trait Interactor {
    /// Stack currently held in the interacting hand.
    fn held_item(&self) -> Option<&ItemStack>;

    /// Replace the stack in the interacting hand.
    fn set_held_item(&mut self, stack: Option<ItemStack>);

    /// Whether the actor is sneaking.
    fn is_sneaking(&self) -> bool;

    /// Where items dropped by this actor land.
    fn position(&self) -> [f64; 3];

    /// Merge `stack` into the general inventory, handing it back if it does not fit.
    fn add_to_inventory(&mut self, stack: ItemStack) -> Result<(), ItemStack>;

    /// Push a full inventory refresh to the actor's client.
    ///
    /// Inventory merges done on the server side are otherwise not observed by
    /// a remote client until its next container sync.
    fn refresh_inventory(&mut self) {}
}

/// 36-slot stacking inventory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerInventory {
    slots: Vec<Option<ItemStack>>,
}

impl PlayerInventory {
    /// Create a new empty inventory.
    pub fn new() -> Self {
        Self {
            slots: vec![None; INVENTORY_SIZE],
        }
    }

    /// Get an item stack from a slot.
    pub fn get(&self, slot: usize) -> Option<&ItemStack> {
        self.slots.get(slot).and_then(Option::as_ref)
    }

    /// Set an item stack in a slot. Returns `false` for an invalid slot.
    pub fn set(&mut self, slot: usize, stack: Option<ItemStack>) -> bool {
        match self.slots.get_mut(slot) {
            Some(entry) => {
                *entry = stack;
                true
            }
            None => false,
        }
    }

    /// All slots, in order.
    pub fn slots(&self) -> &[Option<ItemStack>] {
        &self.slots
    }

    /// Try to add a stack, merging with existing stacks first.
    /// Returns the remainder that didn't fit, if any.
    pub fn add_item(&mut self, mut stack: ItemStack) -> Option<ItemStack> {
        for existing in self.slots.iter_mut().flatten() {
            if existing.can_merge(&stack) && !existing.is_full() {
                stack.count = existing.add(stack.count);
                if stack.count == 0 {
                    return None;
                }
            }
        }

        if let Some(slot) = self.slots.iter_mut().find(|slot| slot.is_none()) {
            *slot = Some(stack);
            return None;
        }

        Some(stack)
    }

    /// Count the total number of a specific item in the inventory.
    pub fn count_item(&self, item: spitroast_core::ItemType) -> u32 {
        self.slots
            .iter()
            .flatten()
            .filter(|stack| stack.item_type == item)
            .map(|stack| stack.count)
            .sum()
    }

    /// Check if the inventory is completely full.
    pub fn is_full(&self) -> bool {
        self.slots.iter().all(Option::is_some)
    }
}

impl Default for PlayerInventory {
    fn default() -> Self {
        Self::new()
    }
}

/// A player standing in the camp.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    /// Display name.
    pub name: String,
    /// World position (feet).
    pub pos: [f64; 3],
    /// Sneaking posture.
    pub sneaking: bool,
    /// Main hand contents.
    pub hand: Option<ItemStack>,
    /// General inventory.
    pub inventory: PlayerInventory,
    /// Connected over the network (as opposed to the local host player).
    pub remote: bool,
    #[serde(skip)]
    inventory_sync_pending: bool,
}

impl Player {
    /// Create an empty-handed player at `pos`.
    pub fn new(name: impl Into<String>, pos: [f64; 3]) -> Self {
        Self {
            name: name.into(),
            pos,
            sneaking: false,
            hand: None,
            inventory: PlayerInventory::new(),
            remote: false,
            inventory_sync_pending: false,
        }
    }

    /// Mark the player as a remote (networked) client.
    pub fn remote(mut self) -> Self {
        self.remote = true;
        self
    }

    /// Consume a pending full-inventory refresh request.
    pub fn take_inventory_sync(&mut self) -> bool {
        std::mem::take(&mut self.inventory_sync_pending)
    }
}

impl Interactor for Player {
    fn held_item(&self) -> Option<&ItemStack> {
        self.hand.as_ref()
    }

    fn set_held_item(&mut self, stack: Option<ItemStack>) {
        self.hand = stack.filter(|s| s.count > 0);
    }

    fn is_sneaking(&self) -> bool {
        self.sneaking
    }

    fn position(&self) -> [f64; 3] {
        self.pos
    }

    fn add_to_inventory(&mut self, stack: ItemStack) -> Result<(), ItemStack> {
        match self.inventory.add_item(stack) {
            None => Ok(()),
            Some(rest) => Err(rest),
        }
    }

    fn refresh_inventory(&mut self) {
        if self.remote {
            self.inventory_sync_pending = true;
        }
    }
}
