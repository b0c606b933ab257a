//! Dice expression engine
//!
//! Parses and evaluates dice notation like "2d6+3", "1d20", "4d6-2".
//! Evaluation always draws from a caller-supplied random source.

mod parse;
mod roll;

pub use parse::{parse_dice, MalformedDiceExpression};
pub use roll::{attack_roll, evaluate, is_critical, is_fumble, DiceRoll, MAX_DICE};
