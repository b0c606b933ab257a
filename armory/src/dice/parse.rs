//! Dice notation grammar
//!
//! `[count] 'd' sides [('+' | '-') modifier]`, case-insensitive, no inner
//! whitespace. A missing count means one die.

use thiserror::Error;

use super::roll::{DiceRoll, MAX_DICE};

/// A string that does not match the dice grammar
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("malformed dice expression '{input}': {reason} (at '{offending}')")]
pub struct MalformedDiceExpression {
    /// The full text that was rejected
    pub input: String,
    /// The substring that broke the grammar
    pub offending: String,
    /// Human-readable description of the problem
    pub reason: String,
}

impl MalformedDiceExpression {
    pub(crate) fn new(input: &str, offending: &str, reason: impl Into<String>) -> Self {
        Self {
            input: input.to_string(),
            offending: offending.to_string(),
            reason: reason.into(),
        }
    }
}

/// Parse a dice notation string like "2d6+3"
pub fn parse_dice(notation: &str) -> Result<DiceRoll, MalformedDiceExpression> {
    let input = notation.trim();
    if input.is_empty() {
        return Err(MalformedDiceExpression::new(notation, "", "empty expression"));
    }

    if let Some((pos, ch)) = input.char_indices().find(|(_, c)| c.is_whitespace()) {
        return Err(MalformedDiceExpression::new(
            notation,
            &input[pos..pos + ch.len_utf8()],
            "whitespace is not allowed inside a dice expression",
        ));
    }

    // Find the 'd' separator
    let d_pos = input
        .find(['d', 'D'])
        .ok_or_else(|| MalformedDiceExpression::new(notation, input, "missing 'd' separator"))?;

    // Parse count (before 'd')
    let count_str = &input[..d_pos];
    let count = if count_str.is_empty() {
        1 // "d6" means "1d6"
    } else {
        parse_digits(count_str)
            .ok_or_else(|| MalformedDiceExpression::new(notation, count_str, "invalid dice count"))?
    };

    if count == 0 || count > MAX_DICE {
        return Err(MalformedDiceExpression::new(
            notation,
            count_str,
            format!("dice count must be between 1 and {}", MAX_DICE),
        ));
    }

    // Split sides from the optional modifier
    let rest = &input[d_pos + 1..];
    let (sides_str, modifier) = match rest.find(['+', '-']) {
        Some(0) => {
            return Err(MalformedDiceExpression::new(notation, rest, "missing die sides"));
        }
        Some(sign_pos) => {
            let mod_str = &rest[sign_pos + 1..];
            let magnitude = parse_digits(mod_str)
                .ok_or_else(|| MalformedDiceExpression::new(notation, mod_str, "invalid modifier"))?;
            let signed = if rest[sign_pos..].starts_with('-') {
                -i64::from(magnitude)
            } else {
                i64::from(magnitude)
            };
            let modifier = i32::try_from(signed).map_err(|_| {
                MalformedDiceExpression::new(notation, &rest[sign_pos..], "modifier out of range")
            })?;
            (&rest[..sign_pos], modifier)
        }
        None => (rest, 0),
    };

    let sides = parse_digits(sides_str)
        .ok_or_else(|| MalformedDiceExpression::new(notation, sides_str, "invalid die sides"))?;

    if sides < 2 {
        return Err(MalformedDiceExpression::new(
            notation,
            sides_str,
            "die sides must be at least 2",
        ));
    }

    Ok(DiceRoll::from_parts(count, sides, modifier))
}

/// Plain ASCII digits only; rejects signs that `str::parse` would accept
fn parse_digits(s: &str) -> Option<u32> {
    if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    s.parse().ok()
}
