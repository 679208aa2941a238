use std::fmt;
use std::ops::{Add, AddAssign};

use serde::{Deserialize, Serialize};

/// The four tracked nutrients, in reporting order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Nutrient {
    Calories,
    Proteins,
    Carbs,
    Fats,
}

impl Nutrient {
    pub const ALL: [Nutrient; 4] = [
        Nutrient::Calories,
        Nutrient::Proteins,
        Nutrient::Carbs,
        Nutrient::Fats,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Nutrient::Calories => "calories",
            Nutrient::Proteins => "proteins",
            Nutrient::Carbs => "carbs",
            Nutrient::Fats => "fats",
        }
    }

    /// Unit suffix used when printing realized values.
    pub fn unit(self) -> &'static str {
        match self {
            Nutrient::Calories => "kcal",
            _ => "g",
        }
    }
}

impl fmt::Display for Nutrient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Calories plus macro grams.
///
/// Also used as a target, where a zero field means "no constraint".
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct NutrientVector {
    #[serde(default)]
    pub calories: f64,

    #[serde(default)]
    pub proteins: f64,

    #[serde(default)]
    pub carbs: f64,

    #[serde(default)]
    pub fats: f64,
}

impl NutrientVector {
    pub fn new(calories: f64, proteins: f64, carbs: f64, fats: f64) -> Self {
        Self {
            calories,
            proteins,
            carbs,
            fats,
        }
    }

    #[inline]
    pub fn get(&self, nutrient: Nutrient) -> f64 {
        match nutrient {
            Nutrient::Calories => self.calories,
            Nutrient::Proteins => self.proteins,
            Nutrient::Carbs => self.carbs,
            Nutrient::Fats => self.fats,
        }
    }

    /// Multiply every field by `factor`.
    pub fn scale(&self, factor: f64) -> Self {
        Self {
            calories: self.calories * factor,
            proteins: self.proteins * factor,
            carbs: self.carbs * factor,
            fats: self.fats * factor,
        }
    }

    /// True when every field is exactly zero.
    pub fn is_zero(&self) -> bool {
        Nutrient::ALL.iter().all(|&n| self.get(n) == 0.0)
    }

    /// Nutrients with a strictly positive value.
    pub fn active(&self) -> Vec<Nutrient> {
        Nutrient::ALL
            .into_iter()
            .filter(|&n| self.get(n) > 0.0)
            .collect()
    }

    /// First field that is negative or not finite, if any.
    pub fn first_invalid(&self) -> Option<Nutrient> {
        Nutrient::ALL
            .into_iter()
            .find(|&n| !self.get(n).is_finite() || self.get(n) < 0.0)
    }

    /// Copy with every field rounded to one decimal.
    pub fn rounded(&self) -> Self {
        Self {
            calories: round1(self.calories),
            proteins: round1(self.proteins),
            carbs: round1(self.carbs),
            fats: round1(self.fats),
        }
    }
}

impl Add for NutrientVector {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self {
            calories: self.calories + rhs.calories,
            proteins: self.proteins + rhs.proteins,
            carbs: self.carbs + rhs.carbs,
            fats: self.fats + rhs.fats,
        }
    }
}

impl AddAssign for NutrientVector {
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}

impl std::iter::Sum for NutrientVector {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::default(), Add::add)
    }
}

/// Round to one decimal place, the precision used for reporting.
#[inline]
pub fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}
