use crate::models::{Nutrient, NutrientVector};
use crate::solver::constants::FEASIBILITY_SLACK;

/// A realized total that landed outside its tolerance band.
#[derive(Debug, Clone, PartialEq)]
pub struct Violation {
    pub nutrient: Nutrient,
    pub target: f64,
    pub realized: f64,
    pub lower: f64,
    pub upper: f64,
}

impl Violation {
    /// Distance to the band as a fraction of the target.
    pub fn relative_gap(&self) -> f64 {
        let gap = if self.realized < self.lower {
            self.lower - self.realized
        } else {
            self.realized - self.upper
        };
        gap / self.target
    }

    pub fn describe(&self) -> String {
        let unit = self.nutrient.unit();
        format!(
            "{} reached {:.1} {} but must be within {:.1}-{:.1} {}",
            self.nutrient, self.realized, unit, self.lower, self.upper, unit
        )
    }
}

/// Acceptance band `[target * (1 - tol), target * (1 + tol)]`.
#[inline]
pub fn band(target: f64, tolerance: f64) -> (f64, f64) {
    (target * (1.0 - tolerance), target * (1.0 + tolerance))
}

/// Whether `value` lies within the band of `target`, allowing a relative
/// floating-point slack.
pub fn within_band(value: f64, target: f64, tolerance: f64) -> bool {
    let (lower, upper) = band(target, tolerance);
    let slack = target * FEASIBILITY_SLACK;
    value >= lower - slack && value <= upper + slack
}

/// Signed distance from `value` to the band: negative below, positive
/// above, zero inside.
#[inline]
pub(crate) fn band_deviation(value: f64, target: f64, tolerance: f64) -> f64 {
    let (lower, upper) = band(target, tolerance);
    if value < lower {
        value - lower
    } else if value > upper {
        value - upper
    } else {
        0.0
    }
}

/// Every non-zero target whose realized total falls outside its band.
///
/// Zero targets are never checked.
pub fn check_tolerance(
    targets: &NutrientVector,
    realized: &NutrientVector,
    tolerance: f64,
) -> Vec<Violation> {
    targets
        .active()
        .into_iter()
        .filter_map(|nutrient| {
            let target = targets.get(nutrient);
            let value = realized.get(nutrient);
            if within_band(value, target, tolerance) {
                return None;
            }
            let (lower, upper) = band(target, tolerance);
            Some(Violation {
                nutrient,
                target,
                realized: value,
                lower,
                upper,
            })
        })
        .collect()
}

/// The violation furthest from its band, relative to its target.
pub fn worst(violations: &[Violation]) -> Option<&Violation> {
    violations.iter().max_by(|a, b| {
        a.relative_gap()
            .partial_cmp(&b.relative_gap())
            .unwrap_or(std::cmp::Ordering::Equal)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_band() {
        let (lower, upper) = band(2000.0, 0.1);
        assert!((lower - 1800.0).abs() < 1e-9);
        assert!((upper - 2200.0).abs() < 1e-9);
    }

    #[test]
    fn test_within_band_edges() {
        assert!(within_band(1800.0, 2000.0, 0.1));
        assert!(within_band(2200.0, 2000.0, 0.1));
        assert!(!within_band(1799.0, 2000.0, 0.1));
        assert!(within_band(2000.0, 2000.0, 0.0));
        assert!(!within_band(2000.1, 2000.0, 0.0));
    }

    #[test]
    fn test_band_deviation_sign() {
        assert!((band_deviation(1700.0, 2000.0, 0.1) + 100.0).abs() < 1e-9);
        assert!((band_deviation(2300.0, 2000.0, 0.1) - 100.0).abs() < 1e-9);
        assert_eq!(band_deviation(2000.0, 2000.0, 0.1), 0.0);
    }

    #[test]
    fn test_check_ignores_zero_targets() {
        let targets = NutrientVector::new(2000.0, 150.0, 0.0, 0.0);
        let realized = NutrientVector::new(1950.0, 100.0, 999.0, 999.0);
        let violations = check_tolerance(&targets, &realized, 0.1);

        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].nutrient, Nutrient::Proteins);
        assert!((violations[0].relative_gap() - 35.0 / 150.0).abs() < 1e-9);
        assert!(violations[0].describe().starts_with("proteins reached 100.0 g"));
    }

    #[test]
    fn test_worst_violation() {
        let targets = NutrientVector::new(2000.0, 150.0, 200.0, 0.0);
        let realized = NutrientVector::new(1000.0, 140.0, 250.0, 0.0);
        let violations = check_tolerance(&targets, &realized, 0.05);
        let worst = worst(&violations).unwrap();
        assert_eq!(worst.nutrient, Nutrient::Calories);
    }
}
