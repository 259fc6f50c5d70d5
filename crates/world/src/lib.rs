//! Camp world: cooking spits, the blocks around them and their persistence.

pub mod camp;
pub mod drop_item;
pub mod heat;
pub mod inventory;
pub mod persist;
pub mod player;
pub mod spit;

pub use camp::{Camp, CampWorld, SpitMirror, SpitSettings, SpitSync, DEFAULT_SPIT_DELAY};
pub use drop_item::{DroppedItem, ItemManager, ITEM_DESPAWN_TICKS, PICKUP_RADIUS};
pub use heat::{Block, HeatQuery, HeatState};
pub use inventory::{ContentsListener, InventoryRecord, SlotRecord, SpitInventory, SLOT_LIMIT};
pub use persist::{SpitRecord, SpitStore};
pub use player::{Interactor, Player, PlayerInventory, INVENTORY_SIZE};
pub use spit::{
    Handoff, InteractOutcome, SecondOutcome, Spit, SpitPhase, SpitSound, SpitWorld, SyncHook,
    SPIT_SLOTS, TICKS_PER_EVALUATION,
};
