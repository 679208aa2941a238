use std::fs;
use std::path::Path;

use clap::Parser;

use portion_calc_rs::calculator::{calculate, calculate_portions};
use portion_calc_rs::cli::{Cli, Command};
use portion_calc_rs::error::{PortionError, Result};
use portion_calc_rs::interface::{
    collect_request, display_assignment, display_food_list, display_nutrition, prompt_yes_no,
};
use portion_calc_rs::logging;
use portion_calc_rs::models::{CalculationRequest, NutrientVector, UserGoals};
use portion_calc_rs::solver::PortionSolver;
use portion_calc_rs::state::{
    FoodDatabase, NutritionLookup, import_into, load_food_table, load_goals,
};

/// Tolerance points added per retry in interactive mode.
const TOLERANCE_STEP_PERCENT: f64 = 5.0;

fn main() {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    if let Err(e) = run(cli) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    let command = cli.command.unwrap_or_default();

    match command {
        Command::Calculate {
            request,
            json,
            weight,
        } => cmd_calculate(&cli.foods, &request, json, weight),
        Command::Search { query, limit } => cmd_search(&cli.foods, &query, limit),
        Command::Nutrition { code, quantity } => cmd_nutrition(&cli.foods, &code, quantity),
        Command::Interactive { goals, tolerance } => {
            cmd_interactive(&cli.foods, goals.as_deref(), tolerance)
        }
        Command::Import { source } => cmd_import(&cli.foods, &source),
        Command::Goals { goals } => cmd_goals(&goals),
    }
}

fn open_database(path: &Path) -> Result<FoodDatabase> {
    let foods = load_food_table(path)?;
    Ok(FoodDatabase::new(foods))
}

/// Solve a request file.
fn cmd_calculate(foods: &Path, request_path: &Path, json: bool, weight: Option<f64>) -> Result<()> {
    let db = open_database(foods)?;
    let content = fs::read_to_string(request_path)?;
    let request: CalculationRequest = serde_json::from_str(&content)?;
    let solver = PortionSolver::new();

    if json {
        let response = calculate_portions(&request, &db, &solver);
        println!("{}", serde_json::to_string_pretty(&response)?);
        if !response.is_success() {
            std::process::exit(1);
        }
        return Ok(());
    }

    let assignment = calculate(&request, &db, &solver)?;
    display_assignment(&assignment, &request.targets, request.tolerance, weight);
    Ok(())
}

/// List foods whose code contains the query.
fn cmd_search(foods: &Path, query: &str, limit: usize) -> Result<()> {
    let db = open_database(foods)?;
    let found = db.search(query, limit);
    display_food_list(&found, &format!("Foods matching '{}'", query));
    Ok(())
}

/// Show nutrients for a quantity of one food.
fn cmd_nutrition(foods: &Path, code: &str, quantity: Option<f64>) -> Result<()> {
    let db = open_database(foods)?;
    match db.nutrition(code, quantity) {
        Ok((grams, nutrients)) => {
            display_nutrition(code, grams, &nutrients);
            Ok(())
        }
        Err(PortionError::FoodNotFound(code)) => {
            let suggestions = db.suggest(&code, 5);
            if !suggestions.is_empty() {
                display_food_list(&suggestions, "Did you mean");
            }
            Err(PortionError::FoodNotFound(code))
        }
        Err(e) => Err(e),
    }
}

/// Prompt for a request, solve it, and offer to widen the tolerance when
/// no assignment fits.
fn cmd_interactive(foods: &Path, goals_path: Option<&Path>, tolerance_percent: f64) -> Result<()> {
    let db = open_database(foods)?;
    if db.is_empty() {
        println!("No foods loaded from {}.", foods.display());
        return Ok(());
    }
    println!("Loaded {} foods", db.len());

    let goals = match goals_path {
        Some(path) => load_goals(path)?,
        None => UserGoals::default(),
    };

    let mut request = collect_request(&db, &goals.targets(), tolerance_percent)?;
    if request.foods.is_empty() {
        println!("No foods selected.");
        return Ok(());
    }

    let solver = PortionSolver::new();
    loop {
        match calculate(&request, &db, &solver) {
            Ok(assignment) => {
                display_assignment(
                    &assignment,
                    &request.targets,
                    request.tolerance,
                    goals.body_weight(),
                );
                return Ok(());
            }
            Err(e) if e.is_infeasible() && request.tolerance < 1.0 => {
                println!("{}", e);
                let next = (request.tolerance * 100.0 + TOLERANCE_STEP_PERCENT).min(100.0);
                let retry = prompt_yes_no(&format!("Retry with {:.0}% tolerance?", next), true)?;
                if !retry {
                    return Ok(());
                }
                request.tolerance = next / 100.0;
            }
            Err(e) => return Err(e),
        }
    }
}

/// Merge a food file into the table at `foods`.
fn cmd_import(foods: &Path, source: &Path) -> Result<()> {
    let total = import_into(source, foods)?;
    println!("Saved {} foods to {}", total, foods.display());
    Ok(())
}

/// Print the targets derived from a goals file.
fn cmd_goals(path: &Path) -> Result<()> {
    let goals = load_goals(path)?;
    let targets: NutrientVector = goals.targets();

    if let Some(profile) = &goals.profile {
        println!("Estimated BMR: {:.0} kcal", profile.bmr());
        println!("Estimated daily calories: {:.0} kcal", profile.daily_calories());
    }
    println!(
        "Targets: {:.0} kcal, P:{:.1} C:{:.1} F:{:.1}",
        targets.calories, targets.proteins, targets.carbs, targets.fats
    );
    if let Some(weight) = goals.body_weight() {
        println!(
            "Per kg ({:.1} kg): {:.2} kcal, P:{:.2} C:{:.2} F:{:.2}",
            weight,
            targets.calories / weight,
            targets.proteins / weight,
            targets.carbs / weight,
            targets.fats / weight
        );
    }
    Ok(())
}
