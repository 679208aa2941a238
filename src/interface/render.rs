use crate::models::{FoodRecord, Nutrient, NutrientVector, PortionAssignment};
use crate::solver::{band, within_band};

/// Display portions as a table with totals, the target bands and, when a
/// body weight is known, totals per kg.
pub fn display_assignment(
    assignment: &PortionAssignment,
    targets: &NutrientVector,
    tolerance: f64,
    body_weight: Option<f64>,
) {
    if assignment.is_empty() {
        println!("No portions calculated.");
        return;
    }

    println!();
    println!("=== Portions ===");
    println!();

    let width = assignment
        .portions
        .iter()
        .map(|p| p.food_code.len())
        .max()
        .unwrap_or(10)
        .max(4);

    println!(
        "{:<width$}  {:>9}  {:>8}  {:>8}  {:>8}  {:>8}",
        "Food",
        "Quantity",
        "Kcal",
        "Prot",
        "Carb",
        "Fat",
        width = width
    );
    let grams_precision = if assignment.unrounded { 3 } else { 1 };
    for portion in &assignment.portions {
        let n = &portion.nutrients;
        println!(
            "{:<width$}  {:>8.prec$}g  {:>8.1}  {:>8.1}  {:>8.1}  {:>8.1}",
            portion.food_code,
            portion.quantity,
            n.calories,
            n.proteins,
            n.carbs,
            n.fats,
            width = width,
            prec = grams_precision
        );
    }

    let total = &assignment.realized;
    println!(
        "{:<width$}  {:>8.1}g  {:>8.1}  {:>8.1}  {:>8.1}  {:>8.1}",
        "Total",
        assignment.total_quantity(),
        total.calories,
        total.proteins,
        total.carbs,
        total.fats,
        width = width
    );

    println!();
    println!("--- Targets (±{:.0}%) ---", tolerance * 100.0);
    for nutrient in Nutrient::ALL {
        let target = targets.get(nutrient);
        if target <= 0.0 {
            println!("{:<9} unconstrained", nutrient.name());
            continue;
        }
        let (lower, upper) = band(target, tolerance);
        let mark = if within_band(total.get(nutrient), target, tolerance) {
            "ok"
        } else {
            "out of range"
        };
        println!(
            "{:<9} {:.1} {} (target {:.1}, range {:.1}-{:.1}) {}",
            nutrient.name(),
            total.get(nutrient),
            nutrient.unit(),
            target,
            lower,
            upper,
            mark
        );
    }

    if let Some(weight) = body_weight.filter(|w| *w > 0.0) {
        println!();
        println!("--- Per kg of body weight ({:.1} kg) ---", weight);
        for nutrient in Nutrient::ALL {
            println!(
                "{:<9} {:.2} {}/kg",
                nutrient.name(),
                total.get(nutrient) / weight,
                nutrient.unit()
            );
        }
    }

    if !assignment.warnings.is_empty() {
        println!();
        for warning in &assignment.warnings {
            println!("Note: {}", warning);
        }
    }
    println!();
}

/// Display a list of food records.
pub fn display_food_list(foods: &[&FoodRecord], title: &str) {
    if foods.is_empty() {
        println!("{}: (none)", title);
        return;
    }

    println!();
    println!("=== {} ({} items) ===", title, foods.len());
    println!();

    for food in foods {
        println!(
            "  {} - {} | per {}g: {} kcal, P:{} C:{} F:{}",
            food.code, food.name, food.quantity, food.calories, food.proteins, food.carbs, food.fats
        );
    }

    println!();
}

/// Display nutrients for a quantity of one food.
pub fn display_nutrition(code: &str, grams: f64, nutrients: &NutrientVector) {
    let n = nutrients.rounded();
    println!(
        "{} {:.1}g: {} kcal, P:{} C:{} F:{}",
        code, grams, n.calories, n.proteins, n.carbs, n.fats
    );
}
