use std::collections::HashMap;

use strsim::jaro_winkler;

use crate::error::{PortionError, Result};
use crate::models::{FoodCandidate, FoodRecord, NutrientVector};

/// Shortest query `search` answers.
pub const MIN_QUERY_LEN: usize = 2;

/// Results returned by a search.
pub const SEARCH_LIMIT: usize = 10;

/// Minimum Jaro-Winkler score for a code suggestion.
const SUGGESTION_THRESHOLD: f64 = 0.7;

/// Resolves food codes to nutrient profiles.
pub trait NutritionLookup {
    /// Nutrients of `code` and the grams they refer to.
    fn nutrients_for(&self, code: &str) -> Option<(NutrientVector, f64)>;

    /// Foods whose code contains `query`.
    fn search(&self, query: &str, limit: usize) -> Vec<&FoodRecord>;

    /// Candidate ready for the solver, without bounds.
    fn candidate(&self, code: &str) -> Result<FoodCandidate> {
        let (nutrients, basis) = self
            .nutrients_for(code)
            .ok_or_else(|| PortionError::FoodNotFound(code.to_string()))?;
        Ok(FoodCandidate::new(code, nutrients).with_unit_basis(basis))
    }
}

/// In-memory food table keyed by code.
#[derive(Debug, Default)]
pub struct FoodDatabase {
    foods: HashMap<String, FoodRecord>,
}

impl FoodDatabase {
    /// Build the table, keeping the last record of a repeated code.
    pub fn new(foods: Vec<FoodRecord>) -> Self {
        let mut map = HashMap::new();
        for food in foods {
            map.insert(food.code.clone(), food);
        }
        Self { foods: map }
    }

    pub fn get(&self, code: &str) -> Option<&FoodRecord> {
        self.foods.get(code)
    }

    /// Nutrients for `quantity` grams of `code`; `None` uses the record's
    /// own basis.
    pub fn nutrition(&self, code: &str, quantity: Option<f64>) -> Result<(f64, NutrientVector)> {
        let food = self
            .get(code)
            .ok_or_else(|| PortionError::FoodNotFound(code.to_string()))?;
        let grams = quantity.unwrap_or(food.quantity);
        if !grams.is_finite() || grams < 0.0 {
            return Err(PortionError::invalid(
                "quantity",
                format!("{} is not a valid number of grams", grams),
            ));
        }
        Ok((grams, food.nutrients_for(grams)))
    }

    /// Codes resembling `input`, best match first.
    pub fn suggest(&self, input: &str, limit: usize) -> Vec<&FoodRecord> {
        let needle = input.to_lowercase();
        let mut scored: Vec<(&FoodRecord, f64)> = self
            .foods
            .values()
            .map(|f| (f, jaro_winkler(&f.code.to_lowercase(), &needle)))
            .filter(|(_, score)| *score > SUGGESTION_THRESHOLD)
            .collect();

        scored.sort_by(|a, b| {
            b.1.partial_cmp(&a.1)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| a.0.code.cmp(&b.0.code))
        });
        scored.into_iter().take(limit).map(|(f, _)| f).collect()
    }

    /// Records sorted by code.
    pub fn all_foods(&self) -> Vec<&FoodRecord> {
        let mut foods: Vec<&FoodRecord> = self.foods.values().collect();
        foods.sort_by(|a, b| a.code.cmp(&b.code));
        foods
    }

    pub fn insert(&mut self, food: FoodRecord) {
        self.foods.insert(food.code.clone(), food);
    }

    /// Records for JSON serialization.
    pub fn to_foods(&self) -> Vec<FoodRecord> {
        self.all_foods().into_iter().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.foods.len()
    }

    pub fn is_empty(&self) -> bool {
        self.foods.is_empty()
    }
}

impl NutritionLookup for FoodDatabase {
    fn nutrients_for(&self, code: &str) -> Option<(NutrientVector, f64)> {
        self.get(code).map(|f| (f.nutrients(), f.quantity))
    }

    /// Case-insensitive substring match on the code, sorted by code.
    fn search(&self, query: &str, limit: usize) -> Vec<&FoodRecord> {
        let query = query.trim().to_lowercase();
        if query.chars().count() < MIN_QUERY_LEN {
            return Vec::new();
        }

        self.all_foods()
            .into_iter()
            .filter(|f| f.code.to_lowercase().contains(&query))
            .take(limit)
            .collect()
    }
}
