//! Messages pushed from the host to observers.
//!
//! All messages use postcard serialization for compact binary encoding.

use serde::{Deserialize, Serialize};
use spitroast_core::{BlockPos, ItemStack};
use spitroast_world::{SpitRecord, SpitSync};

/// Protocol version for compatibility checking.
pub const PROTOCOL_VERSION: u16 = 1;

/// Maximum slots accepted in a spit update.
pub const MAX_SPIT_SLOTS: usize = 16;

/// Maximum slots accepted in an inventory refresh.
pub const MAX_REFRESH_SLOTS: usize = 64;

/// Maximum player name length (bytes).
pub const MAX_PLAYER_NAME_LEN: usize = 32;

/// Messages sent from the host to observers.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub enum ServerMessage {
    /// First frame on every observer stream.
    Hello {
        /// Host protocol version; observers reject anything else.
        version: u16,
    },

    /// Full state of one spit; replaces whatever the observer had.
    SpitUpdate {
        /// Spit position.
        pos: BlockPos,
        /// Complete spit state.
        record: SpitRecord,
    },

    /// The spit at `pos` is gone.
    SpitRemoved {
        /// Former spit position.
        pos: BlockPos,
    },

    /// Full inventory contents for a remote player.
    InventoryRefresh {
        /// Player name.
        player: String,
        /// Every slot, in order.
        slots: Vec<Option<ItemStack>>,
    },
}

impl ServerMessage {
    /// Verify message limits and validity.
    ///
    /// Call on every received message before applying it.
    pub fn verify(&self) -> Result<(), &'static str> {
        match self {
            ServerMessage::Hello { version } => {
                if *version != PROTOCOL_VERSION {
                    return Err("Protocol version mismatch");
                }
            }
            ServerMessage::SpitUpdate { record, .. } => {
                if record.items.slots.len() > MAX_SPIT_SLOTS {
                    return Err("Too many spit slots");
                }
                if record.items.slots.iter().flatten().any(|slot| slot.count == 0) {
                    return Err("Empty stack in spit slot");
                }
            }
            ServerMessage::InventoryRefresh { player, slots } => {
                if player.len() > MAX_PLAYER_NAME_LEN {
                    return Err("Player name too long");
                }
                if slots.len() > MAX_REFRESH_SLOTS {
                    return Err("Too many inventory slots");
                }
            }
            ServerMessage::SpitRemoved { .. } => {}
        }
        Ok(())
    }

    /// Greeting carrying this build's protocol version.
    pub fn hello() -> Self {
        ServerMessage::Hello {
            version: PROTOCOL_VERSION,
        }
    }

    /// Single-byte tag written ahead of the payload.
    pub fn tag(&self) -> u8 {
        match self {
            ServerMessage::SpitUpdate { .. } => 0,
            ServerMessage::SpitRemoved { .. } => 1,
            ServerMessage::InventoryRefresh { .. } => 2,
            ServerMessage::Hello { .. } => 3,
        }
    }
}

impl From<SpitSync> for ServerMessage {
    fn from(sync: SpitSync) -> Self {
        match sync {
            SpitSync::Update { pos, record } => ServerMessage::SpitUpdate { pos, record },
            SpitSync::Removed { pos } => ServerMessage::SpitRemoved { pos },
        }
    }
}

impl ServerMessage {
    /// The camp-side sync event this message carries, if any.
    pub fn into_sync(self) -> Option<SpitSync> {
        match self {
            ServerMessage::SpitUpdate { pos, record } => Some(SpitSync::Update { pos, record }),
            ServerMessage::SpitRemoved { pos } => Some(SpitSync::Removed { pos }),
            ServerMessage::Hello { .. } | ServerMessage::InventoryRefresh { .. } => None,
        }
    }
}
