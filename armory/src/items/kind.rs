//! Item categories and their per-category data

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::dice::DiceRoll;

/// Item category as written in the `item_type` field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemType {
    Weapon,
    Shield,
    Armor,
    Potion,
    Wand,
    Coin,
    Key,
    Oddment,
}

impl ItemType {
    /// Get all item types
    pub fn all() -> &'static [ItemType] {
        &[
            ItemType::Weapon,
            ItemType::Shield,
            ItemType::Armor,
            ItemType::Potion,
            ItemType::Wand,
            ItemType::Coin,
            ItemType::Key,
            ItemType::Oddment,
        ]
    }

    /// Weapons, shields, armor and wands go in an equipment slot
    pub fn is_equippable(&self) -> bool {
        matches!(
            self,
            ItemType::Weapon | ItemType::Shield | ItemType::Armor | ItemType::Wand
        )
    }

    /// Type-specific fields that carry meaning for this category
    pub fn relevant_fields(&self) -> &'static [&'static str] {
        match self {
            ItemType::Weapon | ItemType::Wand => &["attack_bonus", "damage"],
            ItemType::Shield | ItemType::Armor => &["armor_bonus"],
            ItemType::Potion => &["hit_points_recovered", "mana_points_recovered"],
            ItemType::Coin | ItemType::Key | ItemType::Oddment => &[],
        }
    }
}

impl FromStr for ItemType {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "weapon" => Ok(ItemType::Weapon),
            "shield" => Ok(ItemType::Shield),
            "armor" => Ok(ItemType::Armor),
            "potion" => Ok(ItemType::Potion),
            "wand" => Ok(ItemType::Wand),
            "coin" => Ok(ItemType::Coin),
            "key" => Ok(ItemType::Key),
            "oddment" => Ok(ItemType::Oddment),
            _ => Err(()),
        }
    }
}

impl fmt::Display for ItemType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ItemType::Weapon => "weapon",
            ItemType::Shield => "shield",
            ItemType::Armor => "armor",
            ItemType::Potion => "potion",
            ItemType::Wand => "wand",
            ItemType::Coin => "coin",
            ItemType::Key => "key",
            ItemType::Oddment => "oddment",
        };
        f.pad(s)
    }
}

/// Category plus the data only that category uses
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "item_type", rename_all = "snake_case")]
pub enum ItemKind {
    Weapon { attack_bonus: i32, damage: DiceRoll },
    Shield { armor_bonus: u32 },
    Armor { armor_bonus: u32 },
    Potion {
        #[serde(skip_serializing_if = "Option::is_none")]
        hit_points_recovered: Option<u32>,
        #[serde(skip_serializing_if = "Option::is_none")]
        mana_points_recovered: Option<u32>,
    },
    Wand { attack_bonus: i32, damage: DiceRoll },
    Coin,
    Key,
    Oddment,
}

impl ItemKind {
    pub fn item_type(&self) -> ItemType {
        match self {
            ItemKind::Weapon { .. } => ItemType::Weapon,
            ItemKind::Shield { .. } => ItemType::Shield,
            ItemKind::Armor { .. } => ItemType::Armor,
            ItemKind::Potion { .. } => ItemType::Potion,
            ItemKind::Wand { .. } => ItemType::Wand,
            ItemKind::Coin => ItemType::Coin,
            ItemKind::Key => ItemType::Key,
            ItemKind::Oddment => ItemType::Oddment,
        }
    }
}
