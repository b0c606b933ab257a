//! Fixed item schema: declared field types and value coercion
//!
//! Unknown keys are not errors; they are kept and reported. Keys that look
//! like a misspelled `<class>_can_use` flag get a suggestion, never a fix.

use serde::Serialize;

use crate::items::{CharacterClass, FLAG_SUFFIX};

/// Declared type of a schema field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldType {
    Text,
    Signed,
    Unsigned,
    Decimal,
    Flag,
}

/// A field value after coercion to its declared type
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum FieldValue {
    Text(String),
    Signed(i32),
    Unsigned(u32),
    Decimal(f64),
    Flag(bool),
}

impl FieldValue {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            FieldValue::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_signed(&self) -> Option<i32> {
        match self {
            FieldValue::Signed(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_unsigned(&self) -> Option<u32> {
        match self {
            FieldValue::Unsigned(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_decimal(&self) -> Option<f64> {
        match self {
            FieldValue::Decimal(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_flag(&self) -> Option<bool> {
        match self {
            FieldValue::Flag(v) => Some(*v),
            _ => None,
        }
    }
}

/// Look up the declared type of a key (case-sensitive)
pub fn field_type(key: &str) -> Option<FieldType> {
    match key {
        "title" | "description" | "item_type" | "damage" => Some(FieldType::Text),
        "attack_bonus" => Some(FieldType::Signed),
        "armor_bonus" | "hit_points_recovered" | "mana_points_recovered" => {
            Some(FieldType::Unsigned)
        }
        "value" | "weight" => Some(FieldType::Decimal),
        _ if CharacterClass::from_flag_key(key).is_some() => Some(FieldType::Flag),
        _ => None,
    }
}

/// Coerce raw text to the declared type, or describe why it cannot be
pub fn coerce(ty: FieldType, raw: &str) -> Result<FieldValue, String> {
    match ty {
        FieldType::Text => Ok(FieldValue::Text(raw.to_string())),
        FieldType::Signed => raw
            .parse::<i32>()
            .map(FieldValue::Signed)
            .map_err(|e| format!("'{}' is not a signed integer: {}", raw, e)),
        FieldType::Unsigned => raw
            .parse::<u32>()
            .map(FieldValue::Unsigned)
            .map_err(|e| format!("'{}' is not an unsigned integer: {}", raw, e)),
        FieldType::Decimal => {
            let value = raw
                .parse::<f64>()
                .map_err(|e| format!("'{}' is not a decimal number: {}", raw, e))?;
            if !value.is_finite() || value < 0.0 {
                return Err(format!("'{}' must be a finite, non-negative number", raw));
            }
            Ok(FieldValue::Decimal(value))
        }
        FieldType::Flag => {
            if raw.eq_ignore_ascii_case("true") {
                Ok(FieldValue::Flag(true))
            } else if raw.eq_ignore_ascii_case("false") {
                Ok(FieldValue::Flag(false))
            } else {
                Err(format!("'{}' is not a boolean (expected true or false)", raw))
            }
        }
    }
}

/// Suggest the usability flag an unknown key was probably meant to be
///
/// Matches case-insensitively; both the class name and the `can_use`
/// suffix may each be up to `max_distance` edits away. Returns `None`
/// when `max_distance` is 0.
pub fn suggest_flag(key: &str, max_distance: usize) -> Option<String> {
    if max_distance == 0 {
        return None;
    }

    let lowered = key.to_lowercase();
    let suffix = &FLAG_SUFFIX[1..];

    // Try every underscore as the class/suffix boundary
    let mut best: Option<(usize, CharacterClass)> = None;
    for (pos, _) in lowered.match_indices('_') {
        let (prefix, rest) = (&lowered[..pos], &lowered[pos + 1..]);
        let suffix_distance = edit_distance(rest, suffix);
        if suffix_distance > max_distance {
            continue;
        }
        for class in CharacterClass::all() {
            let class_distance = edit_distance(prefix, class.as_str());
            if class_distance > max_distance {
                continue;
            }
            let distance = class_distance + suffix_distance;
            if best.map_or(true, |(d, _)| distance < d) {
                best = Some((distance, *class));
            }
        }
    }

    best.map(|(_, class)| class.flag_key())
        .filter(|suggestion| suggestion != key)
}

/// Levenshtein distance over chars
fn edit_distance(a: &str, b: &str) -> usize {
    let b: Vec<char> = b.chars().collect();
    let mut prev: Vec<usize> = (0..=b.len()).collect();
    let mut curr = vec![0; b.len() + 1];

    for (i, ca) in a.chars().enumerate() {
        curr[0] = i + 1;
        for (j, cb) in b.iter().enumerate() {
            let cost = usize::from(ca != *cb);
            curr[j + 1] = (prev[j] + cost).min(prev[j + 1] + 1).min(curr[j] + 1);
        }
        std::mem::swap(&mut prev, &mut curr);
    }

    prev[b.len()]
}
