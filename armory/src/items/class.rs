//! Character classes and the `<class>_can_use` flags that name them

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Suffix shared by every usability flag key
pub const FLAG_SUFFIX: &str = "_can_use";

/// A character class an item can be restricted to
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CharacterClass {
    Warrior,
    Priest,
    Mage,
    Thief,
    Rogue,
}

impl CharacterClass {
    /// Get all character classes
    pub fn all() -> &'static [CharacterClass] {
        &[
            CharacterClass::Warrior,
            CharacterClass::Priest,
            CharacterClass::Mage,
            CharacterClass::Thief,
            CharacterClass::Rogue,
        ]
    }

    /// Lowercase identifier used in catalog keys
    pub fn as_str(&self) -> &'static str {
        match self {
            CharacterClass::Warrior => "warrior",
            CharacterClass::Priest => "priest",
            CharacterClass::Mage => "mage",
            CharacterClass::Thief => "thief",
            CharacterClass::Rogue => "rogue",
        }
    }

    /// The catalog key that grants this class use of an item
    pub fn flag_key(&self) -> String {
        format!("{}{}", self.as_str(), FLAG_SUFFIX)
    }

    /// Exact (case-sensitive) match of a usability flag key
    pub fn from_flag_key(key: &str) -> Option<Self> {
        let name = key.strip_suffix(FLAG_SUFFIX)?;
        Self::all().iter().copied().find(|c| c.as_str() == name)
    }
}

impl FromStr for CharacterClass {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "warrior" => Ok(CharacterClass::Warrior),
            "priest" => Ok(CharacterClass::Priest),
            "mage" => Ok(CharacterClass::Mage),
            "thief" => Ok(CharacterClass::Thief),
            "rogue" => Ok(CharacterClass::Rogue),
            _ => Err(()),
        }
    }
}

impl fmt::Display for CharacterClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flag_keys() {
        assert_eq!(CharacterClass::Warrior.flag_key(), "warrior_can_use");
        assert_eq!(CharacterClass::Rogue.flag_key(), "rogue_can_use");
    }

    #[test]
    fn test_from_flag_key_is_exact() {
        assert_eq!(
            CharacterClass::from_flag_key("priest_can_use"),
            Some(CharacterClass::Priest)
        );
        assert_eq!(CharacterClass::from_flag_key("warrior_can_user"), None);
        assert_eq!(CharacterClass::from_flag_key("Warrior_can_use"), None);
        assert_eq!(CharacterClass::from_flag_key("bard_can_use"), None);
    }

    #[test]
    fn test_parse_case_insensitive() {
        assert_eq!("Mage".parse(), Ok(CharacterClass::Mage));
        assert_eq!("THIEF".parse(), Ok(CharacterClass::Thief));
        assert!("paladin".parse::<CharacterClass>().is_err());
    }

    #[test]
    fn test_display_matches_key_prefix() {
        for class in CharacterClass::all() {
            assert!(class.flag_key().starts_with(&class.to_string()));
        }
    }
}
