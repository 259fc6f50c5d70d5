//! Item system - food, ingredients and other inventory items

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Item type identifier
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum ItemType {
    // Meat and fish
    /// Raw porkchop
    RawPork,
    /// Cooked porkchop
    CookedPork,
    /// Raw beef
    RawBeef,
    /// Steak
    CookedBeef,
    /// Raw chicken
    RawChicken,
    /// Cooked chicken
    CookedChicken,
    /// Raw mutton
    RawMutton,
    /// Cooked mutton
    CookedMutton,
    /// Raw rabbit
    RawRabbit,
    /// Cooked rabbit
    CookedRabbit,
    /// Raw cod
    RawCod,
    /// Cooked cod
    CookedCod,
    /// Raw salmon
    RawSalmon,
    /// Cooked salmon
    CookedSalmon,

    // Plants
    /// Potato
    Potato,
    /// Baked potato
    BakedPotato,
    /// Kelp
    Kelp,
    /// Dried kelp
    DriedKelp,
    /// Apple
    Apple,
    /// Bread
    Bread,

    // Smeltables with non-food results
    /// Iron ore
    IronOre,
    /// Iron ingot
    IronIngot,
    /// Gold ore
    GoldOre,
    /// Gold ingot
    GoldIngot,
    /// Sand
    Sand,
    /// Glass
    Glass,
    /// Cobblestone
    Cobblestone,
    /// Stone
    Stone,

    // Misc
    /// Stick
    Stick,
    /// Coal
    Coal,
    /// Leather
    Leather,
    /// Feather
    Feather,
}

impl ItemType {
    /// Every item type, in declaration order.
    pub const ALL: [ItemType; 32] = [
        ItemType::RawPork,
        ItemType::CookedPork,
        ItemType::RawBeef,
        ItemType::CookedBeef,
        ItemType::RawChicken,
        ItemType::CookedChicken,
        ItemType::RawMutton,
        ItemType::CookedMutton,
        ItemType::RawRabbit,
        ItemType::CookedRabbit,
        ItemType::RawCod,
        ItemType::CookedCod,
        ItemType::RawSalmon,
        ItemType::CookedSalmon,
        ItemType::Potato,
        ItemType::BakedPotato,
        ItemType::Kelp,
        ItemType::DriedKelp,
        ItemType::Apple,
        ItemType::Bread,
        ItemType::IronOre,
        ItemType::IronIngot,
        ItemType::GoldOre,
        ItemType::GoldIngot,
        ItemType::Sand,
        ItemType::Glass,
        ItemType::Cobblestone,
        ItemType::Stone,
        ItemType::Stick,
        ItemType::Coal,
        ItemType::Leather,
        ItemType::Feather,
    ];

    /// Whether this item can be eaten.
    pub fn is_food(self) -> bool {
        matches!(
            self,
            ItemType::RawPork
                | ItemType::CookedPork
                | ItemType::RawBeef
                | ItemType::CookedBeef
                | ItemType::RawChicken
                | ItemType::CookedChicken
                | ItemType::RawMutton
                | ItemType::CookedMutton
                | ItemType::RawRabbit
                | ItemType::CookedRabbit
                | ItemType::RawCod
                | ItemType::CookedCod
                | ItemType::RawSalmon
                | ItemType::CookedSalmon
                | ItemType::Potato
                | ItemType::BakedPotato
                | ItemType::DriedKelp
                | ItemType::Apple
                | ItemType::Bread
        )
    }

    /// Maximum stack size for this item type in a general inventory.
    pub fn max_stack_size(self) -> u32 {
        match self {
            ItemType::Stick
            | ItemType::Coal
            | ItemType::Sand
            | ItemType::Glass
            | ItemType::Cobblestone
            | ItemType::Stone
            | ItemType::IronOre
            | ItemType::IronIngot
            | ItemType::GoldOre
            | ItemType::GoldIngot
            | ItemType::Feather
            | ItemType::Kelp
            | ItemType::DriedKelp => 64,
            // Food and hides stack to 16
            _ => 16,
        }
    }

    /// Stable snake_case key used in scripts, configs and recipe files.
    pub fn key(self) -> &'static str {
        match self {
            ItemType::RawPork => "raw_pork",
            ItemType::CookedPork => "cooked_pork",
            ItemType::RawBeef => "raw_beef",
            ItemType::CookedBeef => "cooked_beef",
            ItemType::RawChicken => "raw_chicken",
            ItemType::CookedChicken => "cooked_chicken",
            ItemType::RawMutton => "raw_mutton",
            ItemType::CookedMutton => "cooked_mutton",
            ItemType::RawRabbit => "raw_rabbit",
            ItemType::CookedRabbit => "cooked_rabbit",
            ItemType::RawCod => "raw_cod",
            ItemType::CookedCod => "cooked_cod",
            ItemType::RawSalmon => "raw_salmon",
            ItemType::CookedSalmon => "cooked_salmon",
            ItemType::Potato => "potato",
            ItemType::BakedPotato => "baked_potato",
            ItemType::Kelp => "kelp",
            ItemType::DriedKelp => "dried_kelp",
            ItemType::Apple => "apple",
            ItemType::Bread => "bread",
            ItemType::IronOre => "iron_ore",
            ItemType::IronIngot => "iron_ingot",
            ItemType::GoldOre => "gold_ore",
            ItemType::GoldIngot => "gold_ingot",
            ItemType::Sand => "sand",
            ItemType::Glass => "glass",
            ItemType::Cobblestone => "cobblestone",
            ItemType::Stone => "stone",
            ItemType::Stick => "stick",
            ItemType::Coal => "coal",
            ItemType::Leather => "leather",
            ItemType::Feather => "feather",
        }
    }
}

impl fmt::Display for ItemType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Error returned when an item key does not name a known item.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown item `{0}`")]
pub struct ParseItemError(pub String);

impl FromStr for ItemType {
    type Err = ParseItemError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.trim();
        // Accept an optional namespace prefix such as `mc:raw_beef`.
        let key = key.rsplit_once(':').map_or(key, |(_, path)| path);
        ItemType::ALL
            .iter()
            .copied()
            .find(|item| item.key() == key)
            .ok_or_else(|| ParseItemError(s.to_string()))
    }
}

/// An item stack in inventory
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemStack {
    /// Type of item
    pub item_type: ItemType,
    /// Quantity in stack
    pub count: u32,
}

impl ItemStack {
    /// Create a new item stack
    pub fn new(item_type: ItemType, count: u32) -> Self {
        Self { item_type, count }
    }

    /// A stack holding exactly one item.
    pub fn single(item_type: ItemType) -> Self {
        Self::new(item_type, 1)
    }

    /// Maximum stack size for this item type
    pub fn max_stack_size(&self) -> u32 {
        self.item_type.max_stack_size()
    }

    /// Check if this stack can merge with another stack.
    pub fn can_merge(&self, other: &ItemStack) -> bool {
        self.item_type == other.item_type
    }

    /// Check if this stack is at max capacity.
    pub fn is_full(&self) -> bool {
        self.count >= self.max_stack_size()
    }

    /// Try to add items to this stack, returning the amount that didn't fit.
    pub fn add(&mut self, amount: u32) -> u32 {
        let space = self.max_stack_size().saturating_sub(self.count);
        let added = amount.min(space);
        self.count += added;
        amount - added
    }

    /// Remove up to `amount` items, returning how many were removed.
    pub fn shrink(&mut self, amount: u32) -> u32 {
        let removed = amount.min(self.count);
        self.count -= removed;
        removed
    }

    /// Split off up to `amount` items into a new stack.
    pub fn split(&mut self, amount: u32) -> Option<ItemStack> {
        let taken = self.shrink(amount);
        (taken > 0).then(|| ItemStack::new(self.item_type, taken))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn item_keys_roundtrip_through_from_str() {
        for item in ItemType::ALL {
            assert_eq!(item.key().parse::<ItemType>(), Ok(item));
        }
        assert_eq!("mc:raw_beef".parse::<ItemType>(), Ok(ItemType::RawBeef));
        assert!("diamond_sword".parse::<ItemType>().is_err());
    }

    #[test]
    fn serde_uses_snake_case_keys() {
        let json = serde_json::to_string(&ItemType::CookedBeef).unwrap();
        assert_eq!(json, "\"cooked_beef\"");
    }

    #[test]
    fn food_classification() {
        assert!(ItemType::CookedBeef.is_food());
        assert!(ItemType::RawBeef.is_food());
        assert!(ItemType::DriedKelp.is_food());
        assert!(!ItemType::Kelp.is_food());
        assert!(!ItemType::IronIngot.is_food());
    }

    #[test]
    fn stack_add_respects_max_size() {
        let mut stack = ItemStack::new(ItemType::CookedBeef, 14);
        assert_eq!(stack.add(5), 3);
        assert_eq!(stack.count, 16);
        assert!(stack.is_full());
    }

    #[test]
    fn stack_split_and_shrink() {
        let mut stack = ItemStack::new(ItemType::RawBeef, 3);
        let taken = stack.split(1).unwrap();
        assert_eq!(taken, ItemStack::single(ItemType::RawBeef));
        assert_eq!(stack.count, 2);
        assert_eq!(stack.shrink(5), 2);
        assert_eq!(stack.count, 0);
        assert!(stack.split(1).is_none());
    }
}
