use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Portion calculator: solves food quantities for calorie and macro targets.
#[derive(Parser, Debug)]
#[command(name = "portion_calc")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Path to the food table (JSON, or CSV with a .csv extension).
    #[arg(short, long, global = true, default_value = "food_data.json")]
    pub foods: PathBuf,

    /// Enable debug logging on stderr.
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Solve a calculation request read from a JSON file.
    Calculate {
        /// Request file with targets, tolerance and foods.
        #[arg(short, long)]
        request: PathBuf,

        /// Print the JSON response instead of a table.
        #[arg(long)]
        json: bool,

        /// Body weight in kg, to show totals per kg.
        #[arg(long)]
        weight: Option<f64>,
    },

    /// Search food codes containing a query.
    Search {
        query: String,

        /// Maximum number of results.
        #[arg(long, default_value_t = crate::state::SEARCH_LIMIT)]
        limit: usize,
    },

    /// Show nutrients of a food for a quantity.
    Nutrition {
        code: String,

        /// Grams; defaults to the food's own basis.
        #[arg(short, long)]
        quantity: Option<f64>,
    },

    /// Build a request interactively and solve it.
    Interactive {
        /// Stored goals used to prefill the targets.
        #[arg(short, long)]
        goals: Option<PathBuf>,

        /// Initial tolerance in percent.
        #[arg(short, long, default_value_t = 10.0)]
        tolerance: f64,
    },

    /// Merge a JSON or CSV food file into the food table.
    Import {
        /// File to import; `.csv` files are read as CSV.
        source: PathBuf,
    },

    /// Show targets derived from stored goals or a profile.
    Goals {
        /// Goals JSON file.
        #[arg(short, long, default_value = "goals.json")]
        goals: PathBuf,
    },
}

impl Default for Command {
    fn default() -> Self {
        Command::Interactive {
            goals: None,
            tolerance: 10.0,
        }
    }
}
