use std::time::Instant;

use crate::solver::constants::{MAX_STEP_HALVINGS, OBJECTIVE_FLOOR, RELATIVE_IMPROVEMENT};
use crate::solver::constraints::ConstraintModel;
use crate::solver::feasibility::band_deviation;

/// What a descent minimizes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) enum Objective {
    /// Weighted squared relative deviation from each target.
    LeastSquares,
    /// Weighted squared relative distance to each tolerance band; zero
    /// exactly when every band is met.
    BandDistance { tolerance: f64 },
}

impl Objective {
    /// Signed deviation of a total from what the objective aims for.
    #[inline]
    fn deviation(self, total: f64, target: f64) -> f64 {
        match self {
            Objective::LeastSquares => total - target,
            Objective::BandDistance { tolerance } => band_deviation(total, target, tolerance),
        }
    }

    /// Value of the objective for the given totals.
    pub fn evaluate(self, model: &ConstraintModel, totals: &[f64]) -> f64 {
        model
            .targets
            .iter()
            .zip(totals)
            .map(|(t, &total)| {
                let r = self.deviation(total, t.value) / t.value;
                t.weight * r * r
            })
            .sum()
    }
}

/// Outcome of one descent.
#[derive(Debug, Clone)]
pub(crate) struct Descent {
    pub quantities: Vec<f64>,
    pub totals: Vec<f64>,
    pub objective: f64,
    pub sweeps: usize,
    pub timed_out: bool,
}

/// Projected coordinate descent over the box bounds of `model`.
///
/// Each coordinate takes a Newton step on its one-dimensional slice of the
/// objective, clamped to the food's bounds and halved until the objective
/// does not increase. Sweeps stop when the relative improvement drops below
/// `RELATIVE_IMPROVEMENT`, the objective vanishes, `max_sweeps` is reached
/// or `deadline` passes.
pub(crate) fn descend(
    model: &ConstraintModel,
    objective: Objective,
    start: Vec<f64>,
    max_sweeps: usize,
    deadline: Instant,
) -> Descent {
    let mut quantities: Vec<f64> = start
        .into_iter()
        .enumerate()
        .map(|(i, q)| model.clamp(i, q))
        .collect();
    let mut totals = model.totals(&quantities);
    let mut value = objective.evaluate(model, &totals);
    let mut sweeps = 0;
    let mut timed_out = false;

    while sweeps < max_sweeps && value > OBJECTIVE_FLOOR {
        if Instant::now() >= deadline {
            timed_out = true;
            break;
        }
        sweeps += 1;

        for i in 0..model.len() {
            update_coordinate(model, objective, i, &mut quantities, &mut totals);
        }

        let next = objective.evaluate(model, &totals);
        let improvement = value - next;
        value = next;
        if improvement <= RELATIVE_IMPROVEMENT * (value + improvement) {
            break;
        }
    }

    Descent {
        quantities,
        totals,
        objective: value,
        sweeps,
        timed_out,
    }
}

fn update_coordinate(
    model: &ConstraintModel,
    objective: Objective,
    i: usize,
    quantities: &mut [f64],
    totals: &mut [f64],
) {
    let row = &model.coefficients[i];

    // Work in units relative to each target, normalized by the largest
    // relative coefficient, so tiny targets neither underflow nor overflow.
    let relative: Vec<f64> = model
        .targets
        .iter()
        .zip(row)
        .map(|(t, &a)| a / t.value)
        .collect();
    let norm = relative.iter().fold(0.0_f64, |m, b| m.max(b.abs()));
    if !norm.is_finite() || norm <= 0.0 {
        return;
    }

    let mut gradient = 0.0;
    let mut curvature = 0.0;
    for ((t, &total), &b) in model.targets.iter().zip(totals.iter()).zip(&relative) {
        let b = b / norm;
        let r = objective.deviation(total, t.value) / t.value;
        gradient += t.weight * b * r;
        // The band objective is flat inside the band.
        if r != 0.0 || objective == Objective::LeastSquares {
            curvature += t.weight * b * b;
        }
    }

    if gradient == 0.0 || curvature <= 0.0 {
        return;
    }

    let current = objective.evaluate(model, totals);
    let mut step = -gradient / curvature / norm;

    for _ in 0..MAX_STEP_HALVINGS {
        let next_q = model.clamp(i, quantities[i] + step);
        let delta = next_q - quantities[i];
        if delta == 0.0 {
            return;
        }

        let moved: Vec<f64> = totals
            .iter()
            .zip(row)
            .map(|(&total, &a)| total + a * delta)
            .collect();
        if objective.evaluate(model, &moved) <= current {
            quantities[i] = next_q;
            totals.copy_from_slice(&moved);
            return;
        }
        step /= 2.0;
    }
}
