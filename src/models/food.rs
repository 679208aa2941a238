use serde::{Deserialize, Serialize};

use crate::models::NutrientVector;

/// Default nutrient basis in grams.
pub const DEFAULT_UNIT_BASIS: f64 = 100.0;

/// A row of the food database.
///
/// Nutrients refer to `quantity` grams of the food.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FoodRecord {
    pub code: String,

    #[serde(default)]
    pub name: String,

    #[serde(default = "default_unit_basis")]
    pub quantity: f64,

    pub calories: f64,
    pub proteins: f64,
    pub carbs: f64,
    pub fats: f64,
}

fn default_unit_basis() -> f64 {
    DEFAULT_UNIT_BASIS
}

impl FoodRecord {
    /// Nutrients for the record's own unit basis.
    pub fn nutrients(&self) -> NutrientVector {
        NutrientVector::new(self.calories, self.proteins, self.carbs, self.fats)
    }

    /// Nutrients scaled to an arbitrary quantity in grams.
    pub fn nutrients_for(&self, grams: f64) -> NutrientVector {
        if self.quantity > 0.0 {
            self.nutrients().scale(grams / self.quantity)
        } else {
            NutrientVector::default()
        }
    }

    /// Basic validation: positive basis and non-negative nutrients.
    pub fn is_valid(&self) -> bool {
        !self.code.trim().is_empty()
            && self.quantity.is_finite()
            && self.quantity > 0.0
            && self.nutrients().first_invalid().is_none()
    }

    pub fn debug_string(&self) -> String {
        format!(
            "{} ({}): per {}g {} kcal, P:{} C:{} F:{}",
            self.code, self.name, self.quantity, self.calories, self.proteins, self.carbs, self.fats
        )
    }
}

/// A food selected for a portion calculation, with its nutrient lookup
/// already resolved.
#[derive(Debug, Clone, PartialEq)]
pub struct FoodCandidate {
    pub code: String,
    pub nutrients_per_unit: NutrientVector,
    /// Grams the nutrient profile refers to.
    pub unit_basis: f64,
    pub min_quantity: Option<f64>,
    pub max_quantity: Option<f64>,
}

impl FoodCandidate {
    /// Candidate with a 100 g basis and no bounds.
    pub fn new(code: impl Into<String>, nutrients_per_unit: NutrientVector) -> Self {
        Self {
            code: code.into(),
            nutrients_per_unit,
            unit_basis: DEFAULT_UNIT_BASIS,
            min_quantity: None,
            max_quantity: None,
        }
    }

    pub fn with_unit_basis(mut self, unit_basis: f64) -> Self {
        self.unit_basis = unit_basis;
        self
    }

    pub fn with_min(mut self, min: f64) -> Self {
        self.min_quantity = Some(min);
        self
    }

    pub fn with_max(mut self, max: f64) -> Self {
        self.max_quantity = Some(max);
        self
    }

    pub fn with_bounds(mut self, min: Option<f64>, max: Option<f64>) -> Self {
        self.min_quantity = min;
        self.max_quantity = max;
        self
    }

    /// Nutrients contributed by `grams` of this food.
    #[inline]
    pub fn nutrients_for(&self, grams: f64) -> NutrientVector {
        self.nutrients_per_unit.scale(grams / self.unit_basis)
    }

    /// A food capped at zero grams takes no part in the solve.
    pub fn is_excluded(&self) -> bool {
        self.max_quantity == Some(0.0)
    }
}

impl From<&FoodRecord> for FoodCandidate {
    fn from(record: &FoodRecord) -> Self {
        FoodCandidate::new(record.code.clone(), record.nutrients()).with_unit_basis(record.quantity)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_record() -> FoodRecord {
        FoodRecord {
            code: "arroz_branco".to_string(),
            name: "Arroz branco cozido".to_string(),
            quantity: 100.0,
            calories: 130.0,
            proteins: 2.7,
            carbs: 28.0,
            fats: 0.3,
        }
    }

    #[test]
    fn test_nutrients_for_quantity() {
        let rice = sample_record();
        let half = rice.nutrients_for(50.0);
        assert!((half.calories - 65.0).abs() < 1e-9);
        assert!((half.carbs - 14.0).abs() < 1e-9);
    }

    #[test]
    fn test_is_valid() {
        assert!(sample_record().is_valid());

        let mut invalid = sample_record();
        invalid.quantity = 0.0;
        assert!(!invalid.is_valid());

        let mut negative = sample_record();
        negative.fats = -0.1;
        assert!(!negative.is_valid());
    }

    #[test]
    fn test_candidate_from_record_keeps_basis() {
        let mut egg = sample_record();
        egg.code = "ovo".to_string();
        egg.quantity = 50.0;
        let candidate = FoodCandidate::from(&egg);
        assert_eq!(candidate.unit_basis, 50.0);
        assert!((candidate.nutrients_for(100.0).calories - 260.0).abs() < 1e-9);
    }

    #[test]
    fn test_excluded_only_when_max_is_zero() {
        let n = NutrientVector::new(100.0, 1.0, 1.0, 1.0);
        assert!(FoodCandidate::new("a", n).with_max(0.0).is_excluded());
        assert!(!FoodCandidate::new("a", n).with_min(0.0).is_excluded());
        assert!(!FoodCandidate::new("a", n).is_excluded());
    }

    #[test]
    fn test_record_basis_defaults_to_100g() {
        let json = r#"{"code": "x", "calories": 10, "proteins": 1, "carbs": 1, "fats": 0}"#;
        let record: FoodRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.quantity, DEFAULT_UNIT_BASIS);
        assert_eq!(record.name, "");
    }
}
