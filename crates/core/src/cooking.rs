//! Cooking rules - what an item becomes when heated.
//!
//! A heat-driven station only accepts items whose smelting result is edible.
//! The rules are an external collaborator, so the station talks to them
//! through the [`CookingRules`] trait; [`SmeltingTable`] is the stock table.

use crate::{ItemStack, ItemType};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;

/// Lookup from an item to what it turns into when heated.
pub trait CookingRules {
    /// Result of heating `item`, if any recipe exists.
    fn cooked_result(&self, item: ItemType) -> Option<ItemType>;

    /// An item is cookable iff it has a result and that result is edible.
    fn is_cookable(&self, item: ItemType) -> bool {
        self.cooked_result(item)
            .is_some_and(|result| result.is_food())
    }

    /// Stack-level [`CookingRules::is_cookable`]; empty slots are never cookable.
    fn is_cookable_stack(&self, stack: Option<&ItemStack>) -> bool {
        stack.is_some_and(|s| s.count > 0 && self.is_cookable(s.item_type))
    }

    /// A non-empty stack that is not cookable (already cooked, or never will be).
    fn is_cooked_stack(&self, stack: Option<&ItemStack>) -> bool {
        stack.is_some_and(|s| s.count > 0 && !self.is_cookable(s.item_type))
    }
}

/// A smelting recipe: input item -> output item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SmeltRecipe {
    /// Item placed over the heat.
    pub input: ItemType,
    /// Item produced.
    pub output: ItemType,
}

/// Stock smelting recipes.
pub const SMELT_RECIPES: &[SmeltRecipe] = &[
    SmeltRecipe {
        input: ItemType::RawPork,
        output: ItemType::CookedPork,
    },
    SmeltRecipe {
        input: ItemType::RawBeef,
        output: ItemType::CookedBeef,
    },
    SmeltRecipe {
        input: ItemType::RawChicken,
        output: ItemType::CookedChicken,
    },
    SmeltRecipe {
        input: ItemType::RawMutton,
        output: ItemType::CookedMutton,
    },
    SmeltRecipe {
        input: ItemType::RawRabbit,
        output: ItemType::CookedRabbit,
    },
    SmeltRecipe {
        input: ItemType::RawCod,
        output: ItemType::CookedCod,
    },
    SmeltRecipe {
        input: ItemType::RawSalmon,
        output: ItemType::CookedSalmon,
    },
    SmeltRecipe {
        input: ItemType::Potato,
        output: ItemType::BakedPotato,
    },
    SmeltRecipe {
        input: ItemType::Kelp,
        output: ItemType::DriedKelp,
    },
    SmeltRecipe {
        input: ItemType::IronOre,
        output: ItemType::IronIngot,
    },
    SmeltRecipe {
        input: ItemType::GoldOre,
        output: ItemType::GoldIngot,
    },
    SmeltRecipe {
        input: ItemType::Sand,
        output: ItemType::Glass,
    },
    SmeltRecipe {
        input: ItemType::Cobblestone,
        output: ItemType::Stone,
    },
];

/// Errors raised while loading a smelting table.
#[derive(Debug, Error)]
pub enum RecipeError {
    /// The recipe file is not valid JSON or names unknown items.
    #[error("invalid recipe file: {0}")]
    Parse(#[from] serde_json::Error),
    /// Two recipes share the same input.
    #[error("duplicate recipe input `{0}`")]
    DuplicateInput(ItemType),
}

/// Smelting recipes indexed by input item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SmeltingTable {
    recipes: BTreeMap<ItemType, ItemType>,
}

impl SmeltingTable {
    /// Build a table from a list of recipes; later duplicates are rejected.
    pub fn new(recipes: &[SmeltRecipe]) -> Result<Self, RecipeError> {
        let mut map = BTreeMap::new();
        for recipe in recipes {
            if map.insert(recipe.input, recipe.output).is_some() {
                return Err(RecipeError::DuplicateInput(recipe.input));
            }
        }
        Ok(Self { recipes: map })
    }

    /// Parse a table from a JSON array of `{"input", "output"}` objects.
    pub fn from_json_str(contents: &str) -> Result<Self, RecipeError> {
        let recipes: Vec<SmeltRecipe> = serde_json::from_str(contents)?;
        Self::new(&recipes)
    }

    /// Number of registered recipes.
    pub fn len(&self) -> usize {
        self.recipes.len()
    }

    /// Check if the table is empty.
    pub fn is_empty(&self) -> bool {
        self.recipes.is_empty()
    }

    /// Iterate recipes in input order.
    pub fn recipes(&self) -> impl Iterator<Item = SmeltRecipe> + '_ {
        self.recipes
            .iter()
            .map(|(&input, &output)| SmeltRecipe { input, output })
    }
}

impl Default for SmeltingTable {
    fn default() -> Self {
        Self {
            recipes: SMELT_RECIPES.iter().map(|r| (r.input, r.output)).collect(),
        }
    }
}

impl CookingRules for SmeltingTable {
    fn cooked_result(&self, item: ItemType) -> Option<ItemType> {
        self.recipes.get(&item).copied()
    }
}
