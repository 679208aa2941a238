mod database;
mod persistence;

pub use database::{FoodDatabase, MIN_QUERY_LEN, NutritionLookup, SEARCH_LIMIT};
pub use persistence::{
    import_csv, import_into, load_food_table, load_foods, load_goals, save_foods,
};
