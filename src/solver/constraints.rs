use std::collections::HashSet;

use crate::error::{PortionError, Result};
use crate::models::{FoodCandidate, Nutrient, NutrientVector};
use crate::solver::constants::UNBOUNDED_QUANTITY;

/// A non-zero target taking part in the solve.
#[derive(Debug, Clone, Copy)]
pub(crate) struct ActiveTarget {
    pub nutrient: Nutrient,
    pub value: f64,
    pub weight: f64,
}

/// Linear model of the solve: one variable (grams) per included food.
#[derive(Debug, Clone)]
pub(crate) struct ConstraintModel {
    pub targets: Vec<ActiveTarget>,
    /// `coefficients[i][k]`: amount of target `k` per gram of variable `i`.
    pub coefficients: Vec<Vec<f64>>,
    pub lower: Vec<f64>,
    pub upper: Vec<f64>,
    /// Position of each variable in the caller's food list.
    pub food_index: Vec<usize>,
    pub tolerance: f64,
}

impl ConstraintModel {
    /// Validate the inputs and build the model.
    ///
    /// Returns the warnings raised while building (excluded foods).
    pub fn build(
        foods: &[FoodCandidate],
        targets: &NutrientVector,
        tolerance: f64,
        weights: &NutrientVector,
    ) -> Result<(Self, Vec<String>)> {
        validate_tolerance(tolerance)?;
        validate_targets(targets)?;
        if foods.is_empty() {
            return Err(PortionError::invalid(
                "foods",
                "select at least one food",
            ));
        }

        let mut seen = HashSet::new();
        for (i, food) in foods.iter().enumerate() {
            validate_food(i, food)?;
            if !seen.insert(food.code.as_str()) {
                return Err(PortionError::invalid(
                    format!("foods[{}].code", i),
                    format!("'{}' is listed more than once", food.code),
                ));
            }
        }

        let active: Vec<ActiveTarget> = targets
            .active()
            .into_iter()
            .map(|nutrient| {
                let weight = weights.get(nutrient);
                if !weight.is_finite() || weight <= 0.0 {
                    return Err(PortionError::invalid(
                        format!("weights.{}", nutrient),
                        "must be positive for a constrained nutrient",
                    ));
                }
                Ok(ActiveTarget {
                    nutrient,
                    value: targets.get(nutrient),
                    weight,
                })
            })
            .collect::<Result<_>>()?;

        let mut model = ConstraintModel {
            targets: active,
            coefficients: Vec::new(),
            lower: Vec::new(),
            upper: Vec::new(),
            food_index: Vec::new(),
            tolerance,
        };
        let mut warnings = Vec::new();

        for (i, food) in foods.iter().enumerate() {
            if food.is_excluded() {
                warnings.push(format!(
                    "{} has a maximum of 0 g and was left out of the calculation",
                    food.code
                ));
                continue;
            }

            let per_gram = food.nutrients_per_unit.scale(1.0 / food.unit_basis);
            model.coefficients.push(
                model
                    .targets
                    .iter()
                    .map(|t| per_gram.get(t.nutrient))
                    .collect(),
            );
            let lower = food.min_quantity.unwrap_or(0.0);
            let upper = food
                .max_quantity
                .unwrap_or_else(|| UNBOUNDED_QUANTITY.max(lower));
            model.lower.push(lower);
            model.upper.push(upper);
            model.food_index.push(i);
        }

        Ok((model, warnings))
    }

    /// Number of variables.
    pub fn len(&self) -> usize {
        self.food_index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.food_index.is_empty()
    }

    /// Totals of every active target for the given quantities.
    pub fn totals(&self, quantities: &[f64]) -> Vec<f64> {
        let mut totals = vec![0.0; self.targets.len()];
        for (row, &q) in self.coefficients.iter().zip(quantities) {
            for (total, &a) in totals.iter_mut().zip(row) {
                *total += a * q;
            }
        }
        totals
    }

    pub fn lower_bounds(&self) -> Vec<f64> {
        self.lower.clone()
    }

    pub fn upper_bounds(&self) -> Vec<f64> {
        self.upper.clone()
    }

    pub fn midpoints(&self) -> Vec<f64> {
        self.lower
            .iter()
            .zip(&self.upper)
            .map(|(lo, hi)| lo + (hi - lo) / 2.0)
            .collect()
    }

    #[inline]
    pub fn clamp(&self, i: usize, q: f64) -> f64 {
        q.max(self.lower[i]).min(self.upper[i])
    }
}

pub(crate) fn validate_tolerance(tolerance: f64) -> Result<()> {
    if !tolerance.is_finite() || !(0.0..=1.0).contains(&tolerance) {
        return Err(PortionError::invalid(
            "tolerance",
            format!("{} is outside [0, 1]", tolerance),
        ));
    }
    Ok(())
}

pub(crate) fn validate_targets(targets: &NutrientVector) -> Result<()> {
    if let Some(nutrient) = targets.first_invalid() {
        return Err(PortionError::invalid(
            format!("targets.{}", nutrient),
            "must be a non-negative number",
        ));
    }
    if targets.is_zero() {
        return Err(PortionError::invalid(
            "targets",
            "set at least one of calories, proteins, carbs or fats",
        ));
    }
    Ok(())
}

fn validate_food(i: usize, food: &FoodCandidate) -> Result<()> {
    let field = |name: &str| format!("foods[{}].{}", i, name);

    if food.code.trim().is_empty() {
        return Err(PortionError::invalid(field("code"), "must not be empty"));
    }
    if let Some(nutrient) = food.nutrients_per_unit.first_invalid() {
        return Err(PortionError::invalid(
            field(nutrient.name()),
            format!("{} has a negative or non-numeric value", food.code),
        ));
    }
    if !food.unit_basis.is_finite() || food.unit_basis <= 0.0 {
        return Err(PortionError::invalid(
            field("unit_basis"),
            format!("{} must have a positive unit basis", food.code),
        ));
    }
    for (name, bound) in [("min", food.min_quantity), ("max", food.max_quantity)] {
        if let Some(value) = bound {
            if !value.is_finite() || value < 0.0 {
                return Err(PortionError::invalid(
                    field(name),
                    format!("{} must be a non-negative number of grams", food.code),
                ));
            }
        }
    }
    if let (Some(min), Some(max)) = (food.min_quantity, food.max_quantity) {
        if min > max {
            return Err(PortionError::invalid(
                field("min"),
                format!("{} has min {} g above max {} g", food.code, min, max),
            ));
        }
    }
    if food.nutrients_per_unit.is_zero() {
        return Err(PortionError::invalid(
            field("nutrients"),
            format!("{} has no calories or macros", food.code),
        ));
    }
    Ok(())
}
