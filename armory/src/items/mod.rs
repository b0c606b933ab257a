//! Item model and class usability rules

mod class;
mod item;
mod kind;

pub use class::{CharacterClass, FLAG_SUFFIX};
pub use item::{format_amount, Item, ItemError};
pub use kind::{ItemKind, ItemType};
