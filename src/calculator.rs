//! Request/response boundary around the solver.
//!
//! Food codes are resolved through a [`NutritionLookup`] before solving so
//! that the solve itself never touches I/O.

use tracing::{info, warn};

use crate::error::Result;
use crate::models::{CalculationRequest, FoodCandidate, PortionAssignment, PortionResponse};
use crate::solver::PortionSolver;
use crate::state::NutritionLookup;

/// Resolve every selected code to a solver candidate carrying its bounds.
pub fn resolve<L: NutritionLookup + ?Sized>(
    request: &CalculationRequest,
    lookup: &L,
) -> Result<Vec<FoodCandidate>> {
    request
        .foods
        .iter()
        .map(|selection| {
            let candidate = lookup.candidate(&selection.code)?;
            Ok(candidate.with_bounds(selection.min, selection.max))
        })
        .collect()
}

/// Resolve and solve a request.
pub fn calculate<L: NutritionLookup + ?Sized>(
    request: &CalculationRequest,
    lookup: &L,
    solver: &PortionSolver,
) -> Result<PortionAssignment> {
    let foods = resolve(request, lookup)?;
    solver.solve(&foods, &request.targets, request.tolerance)
}

/// Resolve, solve and shape the outcome as a response.
pub fn calculate_portions<L: NutritionLookup + ?Sized>(
    request: &CalculationRequest,
    lookup: &L,
    solver: &PortionSolver,
) -> PortionResponse {
    match calculate(request, lookup, solver) {
        Ok(assignment) => {
            info!("calculated portions for {} foods", assignment.len());
            PortionResponse::success(&assignment)
        }
        Err(e) => {
            warn!("portion calculation failed: {}", e);
            PortionResponse::failure(e.to_string(), e.status_code())
        }
    }
}
