//! Portion solver: grams per food so that calories and macros land within a
//! tolerance band of their targets.
//!
//! The solve is a small box-constrained least-squares problem. A first
//! descent minimizes the weighted squared relative deviation from every
//! non-zero target. When that point misses a band, a bounded number of
//! restarts minimize the distance to the bands themselves from different
//! starting points. Quantities are rounded to one decimal only when the
//! result is reported.

pub mod constants;
mod constraints;
pub mod feasibility;
mod search;

use std::time::{Duration, Instant};

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, info, warn};

use crate::error::{PortionError, Result};
use crate::models::{FoodCandidate, NutrientVector, Portion, PortionAssignment, round1};
use constants::*;
use constraints::ConstraintModel;
use search::{Objective, descend};

pub use feasibility::{Violation, band, check_tolerance, within_band};

/// Desired totals; a zero field is not constrained.
pub type TargetSpec = NutrientVector;

/// Tunables for [`PortionSolver`].
#[derive(Debug, Clone)]
pub struct SolverOptions {
    /// Coordinate-descent sweeps allowed per attempt.
    pub max_sweeps: usize,
    /// Attempts after the first least-squares descent.
    pub max_restarts: usize,
    /// Wall-clock ceiling for a whole solve.
    pub time_budget: Duration,
    /// Relative weight of each nutrient in the objective.
    pub weights: NutrientVector,
    /// Seed for the pseudo-random restart points.
    pub seed: u64,
}

impl Default for SolverOptions {
    fn default() -> Self {
        Self {
            max_sweeps: MAX_SWEEPS,
            max_restarts: MAX_RESTARTS,
            time_budget: DEFAULT_TIME_BUDGET,
            weights: NutrientVector::new(1.0, 1.0, 1.0, 1.0),
            seed: RESTART_SEED,
        }
    }
}

impl SolverOptions {
    pub fn with_max_sweeps(mut self, max_sweeps: usize) -> Self {
        self.max_sweeps = max_sweeps.max(1);
        self
    }

    pub fn with_max_restarts(mut self, max_restarts: usize) -> Self {
        self.max_restarts = max_restarts;
        self
    }

    pub fn with_time_budget(mut self, time_budget: Duration) -> Self {
        self.time_budget = time_budget;
        self
    }

    pub fn with_weights(mut self, weights: NutrientVector) -> Self {
        self.weights = weights;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }
}

/// Stateless portion solver. One instance can serve concurrent calls.
#[derive(Debug, Clone, Default)]
pub struct PortionSolver {
    options: SolverOptions,
}

/// Best attempt seen so far, kept to explain an infeasible result.
struct Attempt {
    quantities: Vec<f64>,
    band_distance: f64,
}

impl PortionSolver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(options: SolverOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &SolverOptions {
        &self.options
    }

    /// Solve for the grams of each food.
    ///
    /// Fails with `InvalidArgument` for malformed input and `Infeasible`
    /// when no assignment inside the bounds meets every non-zero target
    /// within `tolerance`, including when the time budget runs out.
    pub fn solve(
        &self,
        foods: &[FoodCandidate],
        targets: &TargetSpec,
        tolerance: f64,
    ) -> Result<PortionAssignment> {
        let deadline = Instant::now() + self.options.time_budget;
        let (model, warnings) =
            ConstraintModel::build(foods, targets, tolerance, &self.options.weights)?;

        for warning in &warnings {
            warn!("{}", warning);
        }

        if model.is_empty() {
            return Err(PortionError::Infeasible(
                "every selected food has a maximum of 0 g".to_string(),
            ));
        }

        let band_objective = Objective::BandDistance { tolerance };
        let least_squares = descend(
            &model,
            Objective::LeastSquares,
            model.lower_bounds(),
            self.options.max_sweeps,
            deadline,
        );
        debug!(
            "least-squares attempt: objective={:.3e} sweeps={}",
            least_squares.objective, least_squares.sweeps
        );

        if meets_bands(&model, &least_squares.totals) {
            return self.report(&model, foods, targets, &least_squares.quantities, warnings);
        }
        let mut best = Attempt {
            band_distance: band_objective.evaluate(&model, &least_squares.totals),
            quantities: least_squares.quantities.clone(),
        };

        let mut timed_out = least_squares.timed_out;
        let mut rng = StdRng::seed_from_u64(self.options.seed);
        let inner = Objective::BandDistance {
            tolerance: tolerance * BAND_MARGIN,
        };

        for restart in 0..self.options.max_restarts {
            if timed_out {
                break;
            }

            let start = restart_point(&model, restart, &least_squares.quantities, &mut rng);

            let mut descent = descend(&model, inner, start, self.options.max_sweeps, deadline);
            let mut distance = band_objective.evaluate(&model, &descent.totals);
            if distance > OBJECTIVE_FLOOR && !descent.timed_out {
                // The tightened band may be out of reach while the full one is not.
                descent = descend(
                    &model,
                    band_objective,
                    descent.quantities,
                    self.options.max_sweeps,
                    deadline,
                );
                distance = band_objective.evaluate(&model, &descent.totals);
            }
            timed_out = descent.timed_out;
            debug!(
                "restart {}: band distance={:.3e} sweeps={}",
                restart + 1,
                distance,
                descent.sweeps
            );

            if meets_bands(&model, &descent.totals) {
                return self.report(&model, foods, targets, &descent.quantities, warnings);
            }
            if distance < best.band_distance {
                best = Attempt {
                    quantities: descent.quantities,
                    band_distance: distance,
                };
            }
        }

        Err(self.infeasible(&model, foods, targets, tolerance, &best, timed_out))
    }

    /// Build the reported assignment, rounding quantities to one decimal
    /// unless rounding would push a total out of its band.
    fn report(
        &self,
        model: &ConstraintModel,
        foods: &[FoodCandidate],
        targets: &TargetSpec,
        quantities: &[f64],
        mut warnings: Vec<String>,
    ) -> Result<PortionAssignment> {
        let rounded: Vec<f64> = quantities
            .iter()
            .enumerate()
            .map(|(i, &q)| round_within(q, model.lower[i], model.upper[i]))
            .collect();

        let assignment = assemble(model, foods, &rounded);
        if !check_tolerance(targets, &assignment.realized, model.tolerance).is_empty() {
            let raw = assemble(model, foods, quantities);
            if check_tolerance(targets, &raw.realized, model.tolerance).is_empty() {
                let note = "quantities were left unrounded to stay within tolerance".to_string();
                warn!("{}", note);
                warnings.push(note);
                info!("solved {} foods", raw.len());
                return Ok(PortionAssignment::new(raw.portions, warnings).keep_unrounded());
            }
            return Err(PortionError::Infeasible(
                "no assignment stays within tolerance after rounding".to_string(),
            ));
        }

        info!("solved {} foods", assignment.len());
        Ok(PortionAssignment::new(assignment.portions, warnings))
    }

    fn infeasible(
        &self,
        model: &ConstraintModel,
        foods: &[FoodCandidate],
        targets: &TargetSpec,
        tolerance: f64,
        best: &Attempt,
        timed_out: bool,
    ) -> PortionError {
        if timed_out {
            warn!("solver time budget exhausted");
            return PortionError::Infeasible(format!(
                "gave up after {:?}; try fewer foods or a larger tolerance",
                self.options.time_budget
            ));
        }

        let closest = assemble(model, foods, &best.quantities);
        let violations = check_tolerance(targets, &closest.realized, tolerance);
        let detail = feasibility::worst(&violations)
            .map(Violation::describe)
            .unwrap_or_else(|| "targets could not be met".to_string());

        info!("infeasible: {}", detail);
        PortionError::Infeasible(format!(
            "{}; increase the tolerance or relax the food bounds",
            detail
        ))
    }
}

/// Convenience wrapper using default options.
pub fn solve(
    foods: &[FoodCandidate],
    targets: &TargetSpec,
    tolerance: f64,
) -> Result<PortionAssignment> {
    PortionSolver::default().solve(foods, targets, tolerance)
}

/// Starting point of a restart: the least-squares point, the bound
/// midpoints, the upper bounds, then uniform random points in the box.
fn restart_point(
    model: &ConstraintModel,
    restart: usize,
    least_squares: &[f64],
    rng: &mut StdRng,
) -> Vec<f64> {
    match restart {
        0 => least_squares.to_vec(),
        1 => model.midpoints(),
        2 => model.upper_bounds(),
        _ => (0..model.len())
            .map(|i| rng.gen_range(model.lower[i]..=model.upper[i]))
            .collect(),
    }
}

/// Whether every active total lies within its tolerance band.
fn meets_bands(model: &ConstraintModel, totals: &[f64]) -> bool {
    model
        .targets
        .iter()
        .zip(totals)
        .all(|(t, &total)| within_band(total, t.value, model.tolerance))
}

/// Portions for every input food; excluded foods get 0 g.
fn assemble(
    model: &ConstraintModel,
    foods: &[FoodCandidate],
    quantities: &[f64],
) -> PortionAssignment {
    let mut grams = vec![0.0; foods.len()];
    for (&index, &q) in model.food_index.iter().zip(quantities) {
        grams[index] = q;
    }

    let portions = foods
        .iter()
        .zip(grams)
        .map(|(food, quantity)| Portion {
            food_code: food.code.clone(),
            quantity,
            nutrients: food.nutrients_for(quantity),
        })
        .collect();

    PortionAssignment::new(portions, Vec::new())
}

/// Round to one decimal, moving to the nearest decimal inside the bounds
/// when plain rounding would leave them.
fn round_within(q: f64, lower: f64, upper: f64) -> f64 {
    let r = round1(q);
    if r < lower {
        let up = (lower * 10.0).ceil() / 10.0;
        if up <= upper { up } else { q }
    } else if r > upper {
        let down = (upper * 10.0).floor() / 10.0;
        if down >= lower { down } else { q }
    } else {
        r
    }
}
