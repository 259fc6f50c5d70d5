//! Heat sources and the blocks that can host them.

use serde::{Deserialize, Serialize};
use spitroast_core::BlockPos;

/// Blocks the camp world knows about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum Block {
    /// Empty space.
    #[default]
    Air,
    /// Plain solid block.
    Stone,
    /// A campfire, lit or unlit.
    Campfire {
        /// Whether the fire is currently burning.
        burning: bool,
    },
    /// The spit itself.
    Spit,
}

impl Block {
    /// Heat state this block provides to whatever sits above it.
    pub fn heat(self) -> HeatState {
        match self {
            Block::Campfire { burning } => HeatState::Source { burning },
            _ => HeatState::None,
        }
    }
}

/// Result of a heat query at a position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeatState {
    /// Not a heat source.
    None,
    /// A recognized heat source.
    Source {
        /// Whether it is burning right now.
        burning: bool,
    },
}

impl HeatState {
    /// True for a heat source that is currently burning.
    pub fn is_burning(self) -> bool {
        matches!(self, HeatState::Source { burning: true })
    }
}

/// Pure query for the heat state of a block.
pub trait HeatQuery {
    /// Heat state of the block at `pos`.
    fn heat_at(&self, pos: BlockPos) -> HeatState;
}
