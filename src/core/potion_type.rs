//! Color and potion-type primitives.
//!
//! Every per-color operation in the crate goes through [`Color`], a closed set of four
//! variants. A [`PotionType`] is the structural identity of a recipe: four non-negative
//! parts that add up to 100.

use crate::{
    entities::potion,
    errors::{Error, Result},
};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Parts per potion; also the ml in one bottle.
pub const PARTS_PER_POTION: i32 = 100;

/// One of the four raw-material colors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Color {
    /// Red ml
    Red,
    /// Green ml
    Green,
    /// Blue ml
    Blue,
    /// Dark ml
    Dark,
}

impl Color {
    /// All colors in ledger column order.
    pub const ALL: [Self; 4] = [Self::Red, Self::Green, Self::Blue, Self::Dark];

    /// Position of this color in a `[red, green, blue, dark]` vector.
    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            Self::Red => 0,
            Self::Green => 1,
            Self::Blue => 2,
            Self::Dark => 3,
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Red => "red",
            Self::Green => "green",
            Self::Blue => "blue",
            Self::Dark => "dark",
        };
        f.write_str(name)
    }
}

/// A validated recipe color mix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "Vec<i32>", into = "Vec<i32>")]
pub struct PotionType([i32; 4]);

impl PotionType {
    /// Builds a potion type, rejecting negative parts or a total other than 100.
    pub fn new(red: i32, green: i32, blue: i32, dark: i32) -> Result<Self> {
        let parts = [red, green, blue, dark];
        if parts.iter().any(|part| *part < 0) {
            return Err(Error::InvalidPotionType {
                components: parts.to_vec(),
                reason: "parts must be non-negative".to_string(),
            });
        }
        if parts.iter().sum::<i32>() != PARTS_PER_POTION {
            return Err(Error::InvalidPotionType {
                components: parts.to_vec(),
                reason: format!("parts must sum to {PARTS_PER_POTION}"),
            });
        }
        Ok(Self(parts))
    }

    /// Parts of `color` in this mix.
    #[must_use]
    pub const fn part(&self, color: Color) -> i32 {
        self.0[color.index()]
    }

    /// The mix as `[red, green, blue, dark]`.
    #[must_use]
    pub const fn parts(&self) -> [i32; 4] {
        self.0
    }

    /// Ml of each color in one bottle of this type.
    #[must_use]
    pub fn per_potion(&self) -> MlTotals {
        MlTotals::from_fn(|color| i64::from(self.part(color)))
    }

    /// Ml of each color consumed by bottling `quantity` potions of this type.
    ///
    /// None if the volume does not fit in an `i64`.
    #[must_use]
    pub fn ml_for(&self, quantity: i64) -> Option<MlTotals> {
        self.per_potion().checked_times(quantity)
    }

    /// Reads the mix stored on a potion row.
    pub fn from_model(model: &potion::Model) -> Result<Self> {
        Self::new(model.red, model.green, model.blue, model.dark)
    }
}

impl TryFrom<Vec<i32>> for PotionType {
    type Error = Error;

    fn try_from(value: Vec<i32>) -> Result<Self> {
        match value.as_slice() {
            [red, green, blue, dark] => Self::new(*red, *green, *blue, *dark),
            _ => Err(Error::InvalidPotionType {
                components: value,
                reason: "expected exactly four parts".to_string(),
            }),
        }
    }
}

impl From<PotionType> for Vec<i32> {
    fn from(value: PotionType) -> Self {
        value.0.to_vec()
    }
}

impl fmt::Display for PotionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [red, green, blue, dark] = self.0;
        write!(f, "[{red}, {green}, {blue}, {dark}]")
    }
}

/// Ml held (or moved) per color.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MlTotals {
    /// Red ml
    pub red: i64,
    /// Green ml
    pub green: i64,
    /// Blue ml
    pub blue: i64,
    /// Dark ml
    pub dark: i64,
}

impl MlTotals {
    /// Builds totals by evaluating `f` for each color.
    pub fn from_fn(mut f: impl FnMut(Color) -> i64) -> Self {
        Self {
            red: f(Color::Red),
            green: f(Color::Green),
            blue: f(Color::Blue),
            dark: f(Color::Dark),
        }
    }

    /// Like [`MlTotals::from_fn`], but gives up on the first None.
    pub fn try_from_fn(mut f: impl FnMut(Color) -> Option<i64>) -> Option<Self> {
        Some(Self {
            red: f(Color::Red)?,
            green: f(Color::Green)?,
            blue: f(Color::Blue)?,
            dark: f(Color::Dark)?,
        })
    }

    /// Ml of one color.
    #[must_use]
    pub const fn get(&self, color: Color) -> i64 {
        match color {
            Color::Red => self.red,
            Color::Green => self.green,
            Color::Blue => self.blue,
            Color::Dark => self.dark,
        }
    }

    /// Mutable access to one color.
    pub fn get_mut(&mut self, color: Color) -> &mut i64 {
        match color {
            Color::Red => &mut self.red,
            Color::Green => &mut self.green,
            Color::Blue => &mut self.blue,
            Color::Dark => &mut self.dark,
        }
    }

    /// Ml across all colors.
    #[must_use]
    pub const fn total(&self) -> i64 {
        self.red + self.green + self.blue + self.dark
    }

    /// Ml across all colors, or None on overflow.
    #[must_use]
    pub fn checked_total(&self) -> Option<i64> {
        Color::ALL
            .iter()
            .try_fold(0_i64, |sum, color| sum.checked_add(self.get(*color)))
    }

    /// Color-wise sum, or None on overflow.
    #[must_use]
    pub fn checked_plus(&self, other: &Self) -> Option<Self> {
        Self::try_from_fn(|color| self.get(color).checked_add(other.get(color)))
    }

    /// Every color multiplied by `factor`, or None on overflow.
    #[must_use]
    pub fn checked_times(&self, factor: i64) -> Option<Self> {
        Self::try_from_fn(|color| self.get(color).checked_mul(factor))
    }

    /// Color-wise sum.
    #[must_use]
    pub fn plus(&self, other: &Self) -> Self {
        Self::from_fn(|color| self.get(color) + other.get(color))
    }

    /// Color-wise difference.
    #[must_use]
    pub fn minus(&self, other: &Self) -> Self {
        Self::from_fn(|color| self.get(color) - other.get(color))
    }

    /// Color-wise negation, used to turn consumption into a ledger debit.
    #[must_use]
    pub fn negated(&self) -> Self {
        Self::from_fn(|color| -self.get(color))
    }

    /// True if every color holds at least as much as `needed`.
    #[must_use]
    pub fn covers(&self, needed: &Self) -> bool {
        Color::ALL
            .iter()
            .all(|color| self.get(*color) >= needed.get(*color))
    }

    /// True if no color holds any ml.
    #[must_use]
    pub fn is_zero(&self) -> bool {
        Color::ALL.iter().all(|color| self.get(*color) == 0)
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;

    #[test]
    fn test_potion_type_accepts_valid_mix() {
        let purple = PotionType::new(50, 0, 50, 0).unwrap();
        assert_eq!(purple.part(Color::Red), 50);
        assert_eq!(purple.part(Color::Green), 0);
        assert_eq!(purple.part(Color::Blue), 50);
        assert_eq!(purple.parts(), [50, 0, 50, 0]);
        assert_eq!(purple.to_string(), "[50, 0, 50, 0]");
    }

    #[test]
    fn test_potion_type_rejects_bad_sum() {
        let result = PotionType::new(50, 0, 0, 0);
        assert!(matches!(result, Err(Error::InvalidPotionType { .. })));

        let result = PotionType::new(100, 100, 0, 0);
        assert!(matches!(result, Err(Error::InvalidPotionType { .. })));
    }

    #[test]
    fn test_potion_type_rejects_negative_part() {
        let result = PotionType::new(150, -50, 0, 0);
        assert!(matches!(
            result,
            Err(Error::InvalidPotionType { components, reason: _ }) if components == vec![150, -50, 0, 0]
        ));
    }

    #[test]
    fn test_potion_type_from_vec_requires_four_parts() {
        assert!(PotionType::try_from(vec![0, 100, 0, 0]).is_ok());
        assert!(PotionType::try_from(vec![100, 0, 0]).is_err());
        assert!(PotionType::try_from(vec![100, 0, 0, 0, 0]).is_err());
    }

    #[test]
    fn test_ml_for_scales_by_quantity() {
        let mix = PotionType::new(25, 25, 50, 0).unwrap();
        let needed = mix.ml_for(4).unwrap();
        assert_eq!(mix.per_potion().blue, 50);
        assert_eq!(
            needed,
            MlTotals {
                red: 100,
                green: 100,
                blue: 200,
                dark: 0
            }
        );
        assert_eq!(needed.total(), 400);

        assert!(mix.ml_for(i64::MAX / 10).is_none());
    }

    #[test]
    fn test_checked_arithmetic_reports_overflow() {
        let big = MlTotals {
            red: i64::MAX,
            ..MlTotals::default()
        };
        let one = MlTotals {
            red: 1,
            green: 1,
            ..MlTotals::default()
        };
        assert!(big.checked_plus(&one).is_none());
        assert!(big.checked_total().is_some());
        assert!(big.checked_plus(&MlTotals::default()).is_some());
        let spread = MlTotals {
            red: i64::MAX,
            green: 1,
            ..MlTotals::default()
        };
        assert!(spread.checked_total().is_none());
        assert_eq!(one.checked_times(3).map(|ml| ml.total()), Some(6));
        assert!(big.checked_times(2).is_none());
    }

    #[test]
    fn test_ml_totals_arithmetic() {
        let have = MlTotals {
            red: 300,
            green: 50,
            blue: 0,
            dark: 10,
        };
        let need = MlTotals {
            red: 100,
            green: 50,
            ..MlTotals::default()
        };
        assert!(have.covers(&need));
        assert!(!need.covers(&have));

        let left = have.minus(&need);
        assert_eq!(left.red, 200);
        assert_eq!(left.green, 0);
        assert_eq!(left.plus(&need), have);
        assert_eq!(need.negated().red, -100);
        assert!(MlTotals::default().is_zero());
    }

    #[test]
    fn test_color_display_and_index() {
        let names: Vec<String> = Color::ALL.iter().map(ToString::to_string).collect();
        assert_eq!(names, vec!["red", "green", "blue", "dark"]);
        for (position, color) in Color::ALL.iter().enumerate() {
            assert_eq!(color.index(), position);
        }
    }
}
