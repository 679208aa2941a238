use std::time::Duration;

/// Upper bound in grams for foods without a max quantity.
pub const UNBOUNDED_QUANTITY: f64 = 10_000.0;

/// Maximum coordinate-descent sweeps per attempt.
pub const MAX_SWEEPS: usize = 1000;

/// Stop a descent when the objective improves by less than this fraction.
pub const RELATIVE_IMPROVEMENT: f64 = 1e-6;

/// Objective value treated as an exact fit.
pub const OBJECTIVE_FLOOR: f64 = 1e-18;

/// Restarts after the initial least-squares attempt.
pub const MAX_RESTARTS: usize = 4;

/// Wall-clock ceiling for one solve.
pub const DEFAULT_TIME_BUDGET: Duration = Duration::from_secs(2);

/// Relative slack when checking a realized value against its band.
pub const FEASIBILITY_SLACK: f64 = 1e-6;

/// Fraction of the tolerance band aimed for during restarts, leaving room
/// for one-decimal rounding of the reported quantities.
pub const BAND_MARGIN: f64 = 0.95;

/// Seed for the pseudo-random restart points.
pub const RESTART_SEED: u64 = 0x5eed_f00d;

/// Step halvings tried before a coordinate is left unchanged.
pub const MAX_STEP_HALVINGS: usize = 30;
