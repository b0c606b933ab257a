//! Validated, immutable item records

use std::collections::BTreeSet;

use indexmap::IndexMap;
use serde::Serialize;
use thiserror::Error;

use super::{CharacterClass, ItemKind, ItemType};
use crate::catalog::{Diagnostic, DiagnosticKind, FieldValue, Location, RawRecord};
use crate::config::LoaderOptions;
use crate::dice::{attack_roll, parse_dice, DiceRoll};

/// Fields whose meaning depends on the item type
const TYPE_SPECIFIC_FIELDS: &[&str] = &[
    "attack_bonus",
    "damage",
    "armor_bonus",
    "hit_points_recovered",
    "mana_points_recovered",
];

/// Errors building an item from a record
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ItemError {
    #[error("invalid item definition '{key}': {field}: {reason}")]
    InvalidItemDefinition {
        key: String,
        field: String,
        reason: String,
    },
}

impl ItemError {
    fn invalid(key: &str, field: &str, reason: impl Into<String>) -> Self {
        ItemError::InvalidItemDefinition {
            key: key.to_string(),
            field: field.to_string(),
            reason: reason.into(),
        }
    }

    /// The field that made the record invalid
    pub fn field(&self) -> &str {
        match self {
            ItemError::InvalidItemDefinition { field, .. } => field,
        }
    }

    pub fn reason(&self) -> &str {
        match self {
            ItemError::InvalidItemDefinition { reason, .. } => reason,
        }
    }
}

/// A catalog item
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Item {
    key: String,
    title: String,
    description: String,
    #[serde(flatten)]
    kind: ItemKind,
    value: f64,
    weight: f64,
    usable_by: BTreeSet<CharacterClass>,
    #[serde(skip_serializing_if = "IndexMap::is_empty")]
    extra_fields: IndexMap<String, String>,
}

impl Item {
    /// Build an item from a parsed record
    ///
    /// Non-fatal findings (fields that mean nothing for this item type, a
    /// missing description) are appended to `diagnostics`. A missing title
    /// or `item_type`, an unknown `item_type`, or missing/invalid damage on
    /// a weapon or wand fail the whole record.
    pub fn from_record(
        record: &RawRecord,
        options: &LoaderOptions,
        diagnostics: &mut Vec<Diagnostic>,
    ) -> Result<Self, ItemError> {
        let key = record.key.as_str();

        let title = required_text(record, "title")?;
        let type_name = required_text(record, "item_type")?;
        let item_type: ItemType = type_name.parse().map_err(|_| {
            ItemError::invalid(key, "item_type", format!("unknown item type '{}'", type_name))
        })?;

        let kind = build_kind(record, item_type)?;

        let description = match required_text(record, "description") {
            Ok(text) => text,
            Err(e) => {
                diagnostics.push(Diagnostic::new(
                    Location::record(key),
                    record.line_of("description"),
                    "description",
                    DiagnosticKind::MissingField,
                    format!("description {}; using an empty one", e.reason()),
                ));
                String::new()
            }
        };

        if options.report_irrelevant_fields {
            let relevant = item_type.relevant_fields();
            for field in TYPE_SPECIFIC_FIELDS {
                if record.get(field).is_some() && !relevant.contains(field) {
                    diagnostics.push(Diagnostic::new(
                        Location::record(key),
                        record.line_of(field),
                        field,
                        DiagnosticKind::IrrelevantField,
                        format!("'{}' has no meaning for a {} and is ignored", field, item_type),
                    ));
                }
            }
        }

        let usable_by = CharacterClass::all()
            .iter()
            .copied()
            .filter(|class| {
                record
                    .get(&class.flag_key())
                    .and_then(FieldValue::as_flag)
                    .unwrap_or(false)
            })
            .collect();

        Ok(Self {
            key: key.to_string(),
            title,
            description,
            kind,
            value: record.get("value").and_then(FieldValue::as_decimal).unwrap_or(0.0),
            weight: record.get("weight").and_then(FieldValue::as_decimal).unwrap_or(0.0),
            usable_by,
            extra_fields: record.unrecognized.clone(),
        })
    }

    /// Unique catalog key (the section name)
    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn kind(&self) -> &ItemKind {
        &self.kind
    }

    pub fn item_type(&self) -> ItemType {
        self.kind.item_type()
    }

    /// Value in currency units
    pub fn value(&self) -> f64 {
        self.value
    }

    pub fn weight(&self) -> f64 {
        self.weight
    }

    /// Classes with an explicit, true usability flag
    pub fn usable_by(&self) -> &BTreeSet<CharacterClass> {
        &self.usable_by
    }

    pub fn can_use(&self, class: CharacterClass) -> bool {
        self.usable_by.contains(&class)
    }

    /// Keys outside the schema, kept verbatim
    pub fn extra_fields(&self) -> &IndexMap<String, String> {
        &self.extra_fields
    }

    pub fn damage(&self) -> Option<&DiceRoll> {
        match &self.kind {
            ItemKind::Weapon { damage, .. } | ItemKind::Wand { damage, .. } => Some(damage),
            _ => None,
        }
    }

    pub fn attack_bonus(&self) -> Option<i32> {
        match &self.kind {
            ItemKind::Weapon { attack_bonus, .. } | ItemKind::Wand { attack_bonus, .. } => {
                Some(*attack_bonus)
            }
            _ => None,
        }
    }

    pub fn armor_bonus(&self) -> Option<u32> {
        match &self.kind {
            ItemKind::Shield { armor_bonus } | ItemKind::Armor { armor_bonus } => Some(*armor_bonus),
            _ => None,
        }
    }

    pub fn hit_points_recovered(&self) -> Option<u32> {
        match &self.kind {
            ItemKind::Potion {
                hit_points_recovered,
                ..
            } => *hit_points_recovered,
            _ => None,
        }
    }

    pub fn mana_points_recovered(&self) -> Option<u32> {
        match &self.kind {
            ItemKind::Potion {
                mana_points_recovered,
                ..
            } => *mana_points_recovered,
            _ => None,
        }
    }

    /// Damage dice with a wielder's bonus folded into the modifier
    pub fn damage_roll(&self, bonus: i32) -> Option<DiceRoll> {
        self.damage().map(|damage| damage.with_bonus(bonus))
    }

    /// `1d20 + attack_bonus + bonus` for weapons and wands
    pub fn attack_roll(&self, bonus: i32) -> Option<DiceRoll> {
        self.attack_bonus()
            .map(|attack_bonus| attack_roll(attack_bonus.saturating_add(bonus)))
    }
}

fn required_text(record: &RawRecord, field: &str) -> Result<String, ItemError> {
    match record.get(field).and_then(FieldValue::as_text) {
        Some(text) if !text.is_empty() => Ok(text.to_string()),
        Some(_) => Err(ItemError::invalid(&record.key, field, "must not be empty")),
        None => Err(ItemError::invalid(&record.key, field, "is required")),
    }
}

fn build_kind(record: &RawRecord, item_type: ItemType) -> Result<ItemKind, ItemError> {
    let unsigned = |field: &str| record.get(field).and_then(FieldValue::as_unsigned);

    let kind = match item_type {
        ItemType::Weapon | ItemType::Wand => {
            let text = record
                .get("damage")
                .and_then(FieldValue::as_text)
                .ok_or_else(|| {
                    ItemError::invalid(&record.key, "damage", format!("is required for a {}", item_type))
                })?;
            let damage = parse_dice(text)
                .map_err(|e| ItemError::invalid(&record.key, "damage", e.to_string()))?;
            let attack_bonus = record
                .get("attack_bonus")
                .and_then(FieldValue::as_signed)
                .unwrap_or(0);

            if item_type == ItemType::Weapon {
                ItemKind::Weapon {
                    attack_bonus,
                    damage,
                }
            } else {
                ItemKind::Wand {
                    attack_bonus,
                    damage,
                }
            }
        }
        ItemType::Shield => ItemKind::Shield {
            armor_bonus: unsigned("armor_bonus").unwrap_or(0),
        },
        ItemType::Armor => ItemKind::Armor {
            armor_bonus: unsigned("armor_bonus").unwrap_or(0),
        },
        ItemType::Potion => ItemKind::Potion {
            hit_points_recovered: unsigned("hit_points_recovered"),
            mana_points_recovered: unsigned("mana_points_recovered"),
        },
        ItemType::Coin => ItemKind::Coin,
        ItemType::Key => ItemKind::Key,
        ItemType::Oddment => ItemKind::Oddment,
    };

    Ok(kind)
}

/// Render a value or weight with at most two decimals, trailing zeros trimmed
///
/// Rounds half away from zero: `2.0` → `"2"`, `7.5` → `"7.5"`, `0.125` → `"0.13"`.
pub fn format_amount(amount: f64) -> String {
    let cents = (amount * 100.0).round();
    let text = format!("{:.2}", cents / 100.0);
    let text = text.trim_end_matches('0').trim_end_matches('.');
    if text == "-0" {
        "0".to_string()
    } else {
        text.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::parse_catalog;

    fn build(text: &str) -> (Result<Item, ItemError>, Vec<Diagnostic>) {
        let options = LoaderOptions::default();
        let parsed = parse_catalog(text, &options);
        let record = parsed.records.values().next().unwrap();
        let mut diagnostics = Vec::new();
        let item = Item::from_record(record, &options, &mut diagnostics);
        (item, diagnostics)
    }

    #[test]
    fn test_dagger() {
        let (item, diagnostics) = build(
            "[Dagger]\nattack_bonus=0\ndamage=1d4\ndescription=A simple blade.\nitem_type=weapon\ntitle=dagger\nvalue=2\nweight=1",
        );
        let item = item.unwrap();
        assert!(diagnostics.is_empty());
        assert_eq!(item.key(), "Dagger");
        assert_eq!(item.item_type(), ItemType::Weapon);
        assert_eq!(item.damage(), Some(&DiceRoll::new(1, 4, 0).unwrap()));
        assert_eq!(item.attack_bonus(), Some(0));
        assert_eq!(item.value(), 2.0);
        assert_eq!(item.weight(), 1.0);
        assert!(item.usable_by().is_empty());
    }

    #[test]
    fn test_usable_by_from_flags() {
        let (item, _) = build(
            "[Mace]\ndamage=1d6\ndescription=d\nitem_type=weapon\ntitle=mace\npriest_can_use=true\nwarrior_can_use=TRUE\nmage_can_use=false",
        );
        let item = item.unwrap();
        assert!(item.can_use(CharacterClass::Priest));
        assert!(item.can_use(CharacterClass::Warrior));
        assert!(!item.can_use(CharacterClass::Mage));
        assert!(!item.can_use(CharacterClass::Thief));
        assert_eq!(item.usable_by().len(), 2);
    }

    #[test]
    fn test_misspelled_flag_has_no_effect() {
        let (item, _) = build(
            "[Dagger]\ndamage=1d4\ndescription=d\nitem_type=weapon\ntitle=dagger\nwarrior_can_user=true",
        );
        let item = item.unwrap();
        assert!(!item.can_use(CharacterClass::Warrior));
        assert_eq!(
            item.extra_fields().get("warrior_can_user"),
            Some(&"true".to_string())
        );
    }

    #[test]
    fn test_weapon_without_damage_fails() {
        let (item, _) = build("[Club]\ndescription=d\nitem_type=weapon\ntitle=club");
        let err = item.unwrap_err();
        assert_eq!(err.field(), "damage");
        assert!(matches!(err, ItemError::InvalidItemDefinition { ref key, .. } if key == "Club"));
    }

    #[test]
    fn test_wand_with_bad_damage_fails() {
        let (item, _) = build("[Wand]\ndamage=lots\ndescription=d\nitem_type=wand\ntitle=wand");
        let err = item.unwrap_err();
        assert_eq!(err.field(), "damage");
        assert!(err.to_string().contains("lots"));
    }

    #[test]
    fn test_required_text_fields() {
        let (item, _) = build("[X]\ndescription=d\nitem_type=coin");
        assert_eq!(item.unwrap_err().field(), "title");

        let (item, diagnostics) = build("[X]\ntitle=x\nitem_type=coin");
        assert_eq!(item.unwrap().description(), "");
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].kind, DiagnosticKind::MissingField);
        assert_eq!(diagnostics[0].field, "description");

        let (item, _) = build("[X]\ntitle=x\ndescription=d");
        assert_eq!(item.unwrap_err().field(), "item_type");

        let (item, _) = build("[X]\ntitle=\ndescription=d\nitem_type=coin");
        assert_eq!(item.unwrap_err().field(), "title");
    }

    #[test]
    fn test_unknown_item_type() {
        let (item, _) = build("[X]\ntitle=x\ndescription=d\nitem_type=scroll");
        let err = item.unwrap_err();
        assert_eq!(err.field(), "item_type");
        assert!(err.to_string().contains("scroll"));
    }

    #[test]
    fn test_irrelevant_fields_on_coin() {
        let (item, diagnostics) = build(
            "[Gold_Coin]\ntitle=gold coin\ndescription=d\nitem_type=coin\narmor_bonus=3\ndamage=1d4\nvalue=1\nweight=0.02",
        );
        let item = item.unwrap();
        assert_eq!(item.armor_bonus(), None);
        assert_eq!(item.damage(), None);
        assert_eq!(item.weight(), 0.02);
        let fields: Vec<&str> = diagnostics.iter().map(|d| d.field.as_str()).collect();
        assert_eq!(fields, vec!["damage", "armor_bonus"]);
        assert!(diagnostics
            .iter()
            .all(|d| d.kind == DiagnosticKind::IrrelevantField));
    }

    #[test]
    fn test_irrelevant_fields_can_be_silenced() {
        let options = LoaderOptions {
            report_irrelevant_fields: false,
            ..LoaderOptions::default()
        };
        let parsed = parse_catalog(
            "[Key]\ntitle=key\ndescription=d\nitem_type=key\narmor_bonus=1",
            &options,
        );
        let mut diagnostics = Vec::new();
        let item = Item::from_record(&parsed.records["Key"], &options, &mut diagnostics);
        assert!(item.is_ok());
        assert!(diagnostics.is_empty());
    }

    #[test]
    fn test_potion_and_armor() {
        let (item, _) = build(
            "[Health_Potion]\ntitle=health potion\ndescription=d\nitem_type=potion\nhit_points_recovered=20\nvalue=25",
        );
        let potion = item.unwrap();
        assert_eq!(potion.hit_points_recovered(), Some(20));
        assert_eq!(potion.mana_points_recovered(), None);
        assert_eq!(potion.damage_roll(0), None);

        let (item, _) = build(
            "[Buckler]\ntitle=buckler\ndescription=d\nitem_type=shield\narmor_bonus=1\nweight=6",
        );
        let shield = item.unwrap();
        assert_eq!(shield.armor_bonus(), Some(1));
        assert!(shield.item_type().is_equippable());
    }

    #[test]
    fn test_defaults_when_absent() {
        let (item, _) = build("[Rock]\ntitle=rock\ndescription=d\nitem_type=oddment");
        let item = item.unwrap();
        assert_eq!(item.value(), 0.0);
        assert_eq!(item.weight(), 0.0);
    }

    #[test]
    fn test_damage_and_attack_rolls() {
        let (item, _) = build(
            "[Magic_Sword]\ntitle=sword\ndescription=d\nitem_type=weapon\ndamage=1d8+3\nattack_bonus=3",
        );
        let item = item.unwrap();
        assert_eq!(item.damage_roll(2).unwrap().to_string(), "1d8+5");
        assert_eq!(item.attack_roll(1).unwrap().to_string(), "1d20+4");
    }

    #[test]
    fn test_serialize_item() {
        let (item, _) = build(
            "[Dagger]\ndamage=1d4\ndescription=d\nitem_type=weapon\ntitle=dagger\nthief_can_use=true",
        );
        let json = serde_json::to_value(item.unwrap()).unwrap();
        assert_eq!(json["item_type"], "weapon");
        assert_eq!(json["damage"], "1d4");
        assert_eq!(json["usable_by"][0], "thief");
        assert!(json.get("extra_fields").is_none());
    }

    #[test]
    fn test_format_amount() {
        assert_eq!(format_amount(2.0), "2");
        assert_eq!(format_amount(7.5), "7.5");
        assert_eq!(format_amount(0.02), "0.02");
        assert_eq!(format_amount(0.1), "0.1");
        assert_eq!(format_amount(0.125), "0.13");
        assert_eq!(format_amount(0.0), "0");
        assert_eq!(format_amount(1500.0), "1500");
    }
}
