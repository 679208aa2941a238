use std::collections::HashMap;
use std::fs;
use std::path::Path;

use tracing::{debug, info, warn};

use crate::error::Result;
use crate::models::{FoodRecord, UserGoals};
use crate::state::FoodDatabase;

/// Load foods from a JSON file.
///
/// Deduplicates by code (last occurrence wins).
pub fn load_foods<P: AsRef<Path>>(path: P) -> Result<Vec<FoodRecord>> {
    let content = fs::read_to_string(path)?;
    let foods: Vec<FoodRecord> = serde_json::from_str(&content)?;
    Ok(dedup_valid(foods))
}

/// Save foods to a JSON file.
///
/// Deduplicates by code before saving.
pub fn save_foods<P: AsRef<Path>>(path: P, foods: &[FoodRecord]) -> Result<()> {
    let mut seen: HashMap<&str, &FoodRecord> = HashMap::new();
    for food in foods {
        seen.insert(food.code.as_str(), food);
    }

    let mut deduped: Vec<&FoodRecord> = seen.into_values().collect();
    deduped.sort_by(|a, b| a.code.cmp(&b.code));
    let json = serde_json::to_string_pretty(&deduped)?;
    fs::write(path, json)?;
    Ok(())
}

/// Import foods from a CSV file with the header
/// `code,name,quantity,calories,proteins,carbs,fats`.
pub fn import_csv<P: AsRef<Path>>(path: P) -> Result<Vec<FoodRecord>> {
    let mut rdr = csv::ReaderBuilder::new().trim(csv::Trim::All).from_path(path)?;
    let mut foods = Vec::new();
    for row in rdr.deserialize() {
        let food: FoodRecord = row?;
        foods.push(food);
    }
    Ok(dedup_valid(foods))
}

/// Load a food table, choosing the reader by file extension.
pub fn load_food_table<P: AsRef<Path>>(path: P) -> Result<Vec<FoodRecord>> {
    let path = path.as_ref();
    let is_csv = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("csv"));

    let foods = if is_csv {
        import_csv(path)?
    } else {
        load_foods(path)?
    };
    debug!("loaded {} foods from {}", foods.len(), path.display());
    Ok(foods)
}

/// Merge the foods of `source` (JSON or CSV) into the JSON table at
/// `table`, creating it when missing. Imported rows replace stored rows
/// with the same code.
///
/// Returns the number of foods in the saved table.
pub fn import_into<P: AsRef<Path>, Q: AsRef<Path>>(source: P, table: Q) -> Result<usize> {
    let table = table.as_ref();
    let mut db = if table.exists() {
        FoodDatabase::new(load_foods(table)?)
    } else {
        FoodDatabase::default()
    };

    let imported = load_food_table(source)?;
    let count = imported.len();
    for food in imported {
        db.insert(food);
    }

    save_foods(table, &db.to_foods())?;
    info!("imported {} foods into {} ({} total)", count, table.display(), db.len());
    Ok(db.len())
}

/// Load stored user goals from a JSON file.
pub fn load_goals<P: AsRef<Path>>(path: P) -> Result<UserGoals> {
    let content = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&content)?)
}

fn dedup_valid(foods: Vec<FoodRecord>) -> Vec<FoodRecord> {
    let mut order = Vec::new();
    let mut seen: HashMap<String, FoodRecord> = HashMap::new();
    for food in foods {
        if !food.is_valid() {
            warn!("skipping invalid food record: {}", food.debug_string());
            continue;
        }
        if !seen.contains_key(&food.code) {
            order.push(food.code.clone());
        }
        seen.insert(food.code.clone(), food);
    }

    order
        .into_iter()
        .filter_map(|code| seen.remove(&code))
        .collect()
}
