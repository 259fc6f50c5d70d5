#![warn(missing_docs)]
//! Core primitives shared across the workspace.

pub mod cooking;
pub mod item;

use serde::{Deserialize, Serialize};
use std::fmt;

// Re-export commonly used types
pub use cooking::{CookingRules, RecipeError, SmeltRecipe, SmeltingTable, SMELT_RECIPES};
pub use item::{ItemStack, ItemType, ParseItemError};

/// Host simulation rate (20 TPS => 50 ms per tick).
pub const TICKS_PER_SECOND: u32 = 20;

/// Fixed tick type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SimTick(pub u64);

impl SimTick {
    /// First tick in any deterministic timeline.
    pub const ZERO: Self = Self(0);

    /// Advance by `delta` ticks.
    pub fn advance(self, delta: u64) -> Self {
        Self(self.0 + delta)
    }
}

/// Integer block coordinate in world space.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize,
)]
pub struct BlockPos {
    /// X coordinate.
    pub x: i32,
    /// Y coordinate (up).
    pub y: i32,
    /// Z coordinate.
    pub z: i32,
}

impl BlockPos {
    /// Create a new block position.
    pub const fn new(x: i32, y: i32, z: i32) -> Self {
        Self { x, y, z }
    }

    /// The block directly below this one.
    pub const fn down(self) -> Self {
        Self::new(self.x, self.y - 1, self.z)
    }

    /// The block directly above this one.
    pub const fn up(self) -> Self {
        Self::new(self.x, self.y + 1, self.z)
    }

    /// Center of the block in continuous coordinates.
    pub fn center(self) -> [f64; 3] {
        [
            self.x as f64 + 0.5,
            self.y as f64 + 0.5,
            self.z as f64 + 0.5,
        ]
    }
}

impl fmt::Display for BlockPos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {})", self.x, self.y, self.z)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn block_pos_neighbors() {
        let pos = BlockPos::new(3, 64, -2);
        assert_eq!(pos.down(), BlockPos::new(3, 63, -2));
        assert_eq!(pos.up().down(), pos);
        assert_eq!(pos.center(), [3.5, 64.5, -1.5]);
    }

    #[test]
    fn sim_tick_advances() {
        assert_eq!(SimTick::ZERO.advance(20), SimTick(20));
    }
}
