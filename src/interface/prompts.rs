use dialoguer::{Confirm, Input, Select};

use crate::error::{PortionError, Result};
use crate::models::{CalculationRequest, FoodSelection, Nutrient, NutrientVector};
use crate::state::FoodDatabase;

/// Prompt for one target; 0 leaves the nutrient unconstrained.
fn prompt_target(nutrient: Nutrient, default: f64) -> Result<f64> {
    let input: String = Input::new()
        .with_prompt(format!(
            "Target {} ({}, 0 for no target)",
            nutrient.name(),
            nutrient.unit()
        ))
        .default(format!("{}", default))
        .interact_text()?;

    let value: f64 = input
        .trim()
        .parse()
        .map_err(|_| PortionError::invalid(format!("targets.{}", nutrient), "invalid number"))?;
    if value < 0.0 {
        return Err(PortionError::invalid(
            format!("targets.{}", nutrient),
            "must not be negative",
        ));
    }
    Ok(value)
}

/// Prompt for all four targets, prefilled with `defaults`.
pub fn prompt_targets(defaults: &NutrientVector) -> Result<NutrientVector> {
    Ok(NutrientVector::new(
        prompt_target(Nutrient::Calories, defaults.calories)?,
        prompt_target(Nutrient::Proteins, defaults.proteins)?,
        prompt_target(Nutrient::Carbs, defaults.carbs)?,
        prompt_target(Nutrient::Fats, defaults.fats)?,
    ))
}

/// Prompt for the tolerance in percent; returns a fraction.
pub fn prompt_tolerance(default_percent: f64) -> Result<f64> {
    let input: String = Input::new()
        .with_prompt("Tolerance (%)")
        .default(format!("{}", default_percent))
        .interact_text()?;

    let percent: f64 = input
        .trim()
        .parse()
        .map_err(|_| PortionError::invalid("tolerance", "invalid number"))?;
    Ok(percent / 100.0)
}

/// Prompt for an optional bound in grams; empty input means no bound.
pub fn prompt_optional_grams(prompt: &str) -> Result<Option<f64>> {
    let input: String = Input::new()
        .with_prompt(prompt)
        .allow_empty(true)
        .interact_text()?;

    let input = input.trim();
    if input.is_empty() {
        return Ok(None);
    }
    input
        .parse()
        .map(Some)
        .map_err(|_| PortionError::invalid("bound", "invalid number of grams"))
}

/// Match typed input to a food code, exactly or by fuzzy suggestion.
fn match_food_code(db: &FoodDatabase, input: &str) -> Result<Option<String>> {
    if db.get(input).is_some() {
        return Ok(Some(input.to_string()));
    }

    let candidates = db.suggest(input, 5);
    if candidates.is_empty() {
        println!("No food code matches '{}'", input);
        return Ok(None);
    }

    if candidates.len() == 1 {
        let food = candidates[0];
        let confirm = Confirm::new()
            .with_prompt(format!("Did you mean '{}' ({})?", food.code, food.name))
            .default(true)
            .interact()?;
        return Ok(confirm.then(|| food.code.clone()));
    }

    let options: Vec<String> = candidates.iter().map(|f| f.code.clone()).collect();
    let mut selection_options: Vec<String> = candidates
        .iter()
        .map(|f| format!("{} ({})", f.code, f.name))
        .collect();
    selection_options.push("None of these".to_string());

    let selection = Select::new()
        .with_prompt("Which did you mean?")
        .items(&selection_options)
        .default(0)
        .interact()?;

    Ok(options.get(selection).cloned())
}

/// Prompt for foods with optional min/max grams until an empty line.
pub fn prompt_food_selection(db: &FoodDatabase) -> Result<Vec<FoodSelection>> {
    let mut selections: Vec<FoodSelection> = Vec::new();

    loop {
        let input: String = Input::new()
            .with_prompt("Food code (or press Enter to finish)")
            .allow_empty(true)
            .interact_text()?;

        let input = input.trim();
        if input.is_empty() {
            break;
        }

        let Some(code) = match_food_code(db, input)? else {
            continue;
        };
        if selections.iter().any(|s| s.code == code) {
            println!("{} is already selected", code);
            continue;
        }

        let min = prompt_optional_grams("Min (g), empty for none")?;
        let max = prompt_optional_grams("Max (g), empty for none")?;
        println!("Added: {}", code);
        selections.push(FoodSelection { code, min, max });
    }

    Ok(selections)
}

/// Prompt for yes/no confirmation.
pub fn prompt_yes_no(prompt: &str, default: bool) -> Result<bool> {
    Ok(Confirm::new()
        .with_prompt(prompt)
        .default(default)
        .interact()?)
}

/// Collect a whole calculation request.
pub fn collect_request(
    db: &FoodDatabase,
    default_targets: &NutrientVector,
    default_tolerance_percent: f64,
) -> Result<CalculationRequest> {
    let targets = prompt_targets(default_targets)?;
    let tolerance = prompt_tolerance(default_tolerance_percent)?;
    let foods = prompt_food_selection(db)?;

    Ok(CalculationRequest {
        targets,
        tolerance,
        foods,
    })
}
