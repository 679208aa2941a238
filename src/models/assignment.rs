use crate::models::NutrientVector;

/// Quantity assigned to one food, with the nutrients it contributes.
#[derive(Debug, Clone, PartialEq)]
pub struct Portion {
    pub food_code: String,

    /// Grams of the food.
    pub quantity: f64,

    /// Nutrients contributed by `quantity` grams.
    pub nutrients: NutrientVector,
}

/// Result of a successful portion solve.
///
/// Portions keep the order of the input foods, including foods that were
/// excluded from the solve (reported at 0 g).
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PortionAssignment {
    pub portions: Vec<Portion>,

    /// Sum of every portion's nutrients.
    pub realized: NutrientVector,

    /// Non-fatal notes about the solve, e.g. excluded foods.
    pub warnings: Vec<String>,

    /// Quantities are exact rather than rounded to one decimal, because
    /// rounding would have pushed a total out of its band.
    pub unrounded: bool,
}

impl PortionAssignment {
    pub fn new(portions: Vec<Portion>, warnings: Vec<String>) -> Self {
        let realized = portions.iter().map(|p| p.nutrients).sum();
        Self {
            portions,
            realized,
            warnings,
            unrounded: false,
        }
    }

    /// Mark the quantities as exact so reporting keeps every digit.
    pub fn keep_unrounded(mut self) -> Self {
        self.unrounded = true;
        self
    }

    /// Quantity assigned to `code`, if the food was part of the request.
    pub fn quantity_of(&self, code: &str) -> Option<f64> {
        self.portions
            .iter()
            .find(|p| p.food_code == code)
            .map(|p| p.quantity)
    }

    pub fn total_quantity(&self) -> f64 {
        self.portions.iter().map(|p| p.quantity).sum()
    }

    pub fn len(&self) -> usize {
        self.portions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.portions.is_empty()
    }
}
