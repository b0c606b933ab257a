//! Parsed dice expressions and their evaluation

use std::fmt;
use std::str::FromStr;

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::parse::{parse_dice, MalformedDiceExpression};

/// Largest number of dice a single expression may roll
pub const MAX_DICE: u32 = 10_000;

/// A parsed dice expression
///
/// Always holds `1..=MAX_DICE` dice with at least two sides each, so
/// evaluation cannot fail or overflow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct DiceRoll {
    count: u32,
    sides: u32,
    modifier: i32,
}

impl DiceRoll {
    /// Create a dice roll, validating the same limits as the parser
    pub fn new(count: u32, sides: u32, modifier: i32) -> Result<Self, MalformedDiceExpression> {
        let text = Self::from_parts(count, sides, modifier).to_string();
        if count == 0 || count > MAX_DICE {
            return Err(MalformedDiceExpression::new(
                &text,
                &count.to_string(),
                format!("dice count must be between 1 and {}", MAX_DICE),
            ));
        }
        if sides < 2 {
            return Err(MalformedDiceExpression::new(
                &text,
                &sides.to_string(),
                "die sides must be at least 2",
            ));
        }
        Ok(Self::from_parts(count, sides, modifier))
    }

    pub(crate) fn from_parts(count: u32, sides: u32, modifier: i32) -> Self {
        Self {
            count,
            sides,
            modifier,
        }
    }

    /// Number of dice to roll
    pub fn count(&self) -> u32 {
        self.count
    }

    /// Number of sides per die
    pub fn sides(&self) -> u32 {
        self.sides
    }

    /// Constant added after summing the dice
    pub fn modifier(&self) -> i32 {
        self.modifier
    }

    /// Roll the dice and return the total
    pub fn evaluate<R: Rng>(&self, rng: &mut R) -> i64 {
        let sum: i64 = (0..self.count)
            .map(|_| i64::from(rng.random_range(1..=self.sides)))
            .sum();
        sum + i64::from(self.modifier)
    }

    /// Roll and return individual die results plus total
    pub fn roll_detailed<R: Rng>(&self, rng: &mut R) -> (Vec<u32>, i64) {
        let results: Vec<u32> = (0..self.count)
            .map(|_| rng.random_range(1..=self.sides))
            .collect();

        let sum: i64 = results.iter().map(|&r| i64::from(r)).sum();
        let total = sum + i64::from(self.modifier);

        (results, total)
    }

    /// Get the minimum possible result
    pub fn min(&self) -> i64 {
        i64::from(self.count) + i64::from(self.modifier)
    }

    /// Get the maximum possible result
    pub fn max(&self) -> i64 {
        i64::from(self.count) * i64::from(self.sides) + i64::from(self.modifier)
    }

    /// Get the expected average (rounded down)
    pub fn average(&self) -> i64 {
        let avg_per_die = (1.0 + f64::from(self.sides)) / 2.0;
        (f64::from(self.count) * avg_per_die + f64::from(self.modifier)).floor() as i64
    }

    /// Same dice with `delta` folded into the modifier
    pub fn with_bonus(&self, delta: i32) -> Self {
        Self {
            modifier: self.modifier.saturating_add(delta),
            ..*self
        }
    }
}

impl FromStr for DiceRoll {
    type Err = MalformedDiceExpression;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_dice(s)
    }
}

impl TryFrom<String> for DiceRoll {
    type Error = MalformedDiceExpression;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        parse_dice(&s)
    }
}

impl From<DiceRoll> for String {
    fn from(roll: DiceRoll) -> Self {
        roll.to_string()
    }
}

impl fmt::Display for DiceRoll {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.modifier > 0 {
            write!(f, "{}d{}+{}", self.count, self.sides, self.modifier)
        } else if self.modifier < 0 {
            write!(f, "{}d{}{}", self.count, self.sides, self.modifier)
        } else {
            write!(f, "{}d{}", self.count, self.sides)
        }
    }
}

/// Evaluate an expression against the caller's random source
pub fn evaluate<R: Rng>(expression: &DiceRoll, rng: &mut R) -> i64 {
    expression.evaluate(rng)
}

/// A d20 attack roll with the given bonus
pub fn attack_roll(bonus: i32) -> DiceRoll {
    DiceRoll::from_parts(1, 20, bonus)
}

/// Check if a d20 roll is a natural 20 (critical hit)
pub fn is_critical(roll: u32) -> bool {
    roll == 20
}

/// Check if a d20 roll is a natural 1 (critical fail)
pub fn is_fumble(roll: u32) -> bool {
    roll == 1
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_roll_bounds() {
        let roll = DiceRoll::new(2, 6, 0).unwrap();
        let mut rng = StdRng::seed_from_u64(7);

        for _ in 0..200 {
            let result = roll.evaluate(&mut rng);
            assert!(result >= 2, "Roll {} below minimum 2", result);
            assert!(result <= 12, "Roll {} above maximum 12", result);
        }
    }

    #[test]
    fn test_roll_with_modifier() {
        let roll: DiceRoll = "2d6+5".parse().unwrap();
        let mut rng = StdRng::seed_from_u64(11);

        for _ in 0..200 {
            let result = evaluate(&roll, &mut rng);
            assert!((7..=17).contains(&result), "Roll {} out of range", result);
        }
    }

    #[test]
    fn test_negative_modifier_can_go_below_zero() {
        let roll: DiceRoll = "1d4-6".parse().unwrap();
        let mut rng = StdRng::seed_from_u64(3);

        for _ in 0..50 {
            let result = roll.evaluate(&mut rng);
            assert!((-5..=-2).contains(&result));
        }
    }

    #[test]
    fn test_seeded_rolls_repeat() {
        let roll: DiceRoll = "3d8+2".parse().unwrap();
        let mut first = StdRng::seed_from_u64(42);
        let mut second = StdRng::seed_from_u64(42);

        let a: Vec<i64> = (0..20).map(|_| roll.evaluate(&mut first)).collect();
        let b: Vec<i64> = (0..20).map(|_| roll.evaluate(&mut second)).collect();
        assert_eq!(a, b);
    }

    #[test]
    fn test_min_max_average() {
        let roll = DiceRoll::new(2, 6, 3).unwrap();
        assert_eq!(roll.min(), 5); // 2 + 3
        assert_eq!(roll.max(), 15); // 12 + 3
        assert_eq!(roll.average(), 10); // 7 + 3
    }

    #[test]
    fn test_max_does_not_overflow() {
        let roll = DiceRoll::new(MAX_DICE, u32::MAX, i32::MAX).unwrap();
        assert!(roll.max() > i64::from(u32::MAX));
    }

    #[test]
    fn test_new_rejects_degenerate_dice() {
        assert!(DiceRoll::new(0, 6, 0).is_err());
        assert!(DiceRoll::new(1, 1, 0).is_err());
        assert!(DiceRoll::new(MAX_DICE + 1, 6, 0).is_err());
    }

    #[test]
    fn test_display() {
        assert_eq!(DiceRoll::new(2, 6, 0).unwrap().to_string(), "2d6");
        assert_eq!(DiceRoll::new(1, 20, 5).unwrap().to_string(), "1d20+5");
        assert_eq!(DiceRoll::new(3, 8, -2).unwrap().to_string(), "3d8-2");
    }

    #[test]
    fn test_display_round_trip() {
        for text in ["1d4", "2d6+5", "1d8+3", "4d6-2", "10d10", "1d20-1"] {
            let roll: DiceRoll = text.parse().unwrap();
            assert_eq!(roll.to_string().parse::<DiceRoll>().unwrap(), roll);
        }
    }

    #[test]
    fn test_detailed_roll() {
        let roll = DiceRoll::new(3, 6, 2).unwrap();
        let mut rng = StdRng::seed_from_u64(5);
        let (dice, total) = roll.roll_detailed(&mut rng);

        assert_eq!(dice.len(), 3);
        for d in &dice {
            assert!(*d >= 1 && *d <= 6);
        }

        let sum: u32 = dice.iter().sum();
        assert_eq!(total, i64::from(sum) + 2);
    }

    #[test]
    fn test_with_bonus() {
        let roll: DiceRoll = "1d8+1".parse().unwrap();
        assert_eq!(roll.with_bonus(2).to_string(), "1d8+3");
        assert_eq!(roll.with_bonus(-3).to_string(), "1d8-2");
    }

    #[test]
    fn test_attack_roll() {
        assert_eq!(attack_roll(4).to_string(), "1d20+4");
        assert_eq!(attack_roll(0).to_string(), "1d20");
    }

    #[test]
    fn test_serde_as_notation() {
        let roll: DiceRoll = "2d6+5".parse().unwrap();
        let json = serde_json::to_string(&roll).unwrap();
        assert_eq!(json, "\"2d6+5\"");
        let back: DiceRoll = serde_json::from_str(&json).unwrap();
        assert_eq!(back, roll);
        assert!(serde_json::from_str::<DiceRoll>("\"2x6\"").is_err());
    }

    #[test]
    fn test_critical_fumble() {
        assert!(is_critical(20));
        assert!(!is_critical(19));
        assert!(is_fumble(1));
        assert!(!is_fumble(2));
    }
}
