mod assignment;
mod food;
mod nutrients;
pub mod profile;
mod request;

pub use assignment::{Portion, PortionAssignment};
pub use food::{DEFAULT_UNIT_BASIS, FoodCandidate, FoodRecord};
pub use nutrients::{Nutrient, NutrientVector, round1};
pub use profile::{Profile, UserGoals};
pub use request::{CalculationRequest, FoodSelection, PortionLine, PortionResponse};
