//! armory - RPG item catalog loader and dice engine
//!
//! Loads block-format item definitions (`[Key]` sections of `key=value`
//! lines) into an immutable, ordered catalog, collecting diagnostics for
//! every irregularity instead of failing, and evaluates the dice notation
//! used by weapon damage.

pub mod catalog;
pub mod config;
pub mod dice;
pub mod items;

pub use catalog::{Catalog, CatalogError, Diagnostic, DiagnosticKind, LoadReport, Location};
pub use config::{ArmoryConfig, LoaderOptions};
pub use dice::{evaluate, parse_dice, DiceRoll, MalformedDiceExpression};
pub use items::{CharacterClass, Item, ItemError, ItemKind, ItemType};
