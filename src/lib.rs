pub mod calculator;
pub mod cli;
pub mod error;
pub mod interface;
pub mod logging;
pub mod models;
pub mod solver;
pub mod state;

pub use error::{PortionError, Result};
pub use models::{FoodCandidate, NutrientVector, PortionAssignment};
pub use solver::{PortionSolver, SolverOptions, TargetSpec, solve};
