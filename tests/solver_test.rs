use assert_float_eq::{assert_float_absolute_eq, assert_float_relative_eq};

use portion_calc_rs::models::{FoodCandidate, NutrientVector, PortionAssignment};
use portion_calc_rs::solver::{PortionSolver, SolverOptions, check_tolerance, within_band};
use portion_calc_rs::{PortionError, solve};

fn chicken() -> FoodCandidate {
    FoodCandidate::new("frango", NutrientVector::new(165.0, 31.0, 0.0, 3.6))
}

fn rice() -> FoodCandidate {
    FoodCandidate::new("arroz", NutrientVector::new(130.0, 2.7, 28.0, 0.3))
}

fn oil() -> FoodCandidate {
    FoodCandidate::new("azeite", NutrientVector::new(884.0, 0.0, 0.0, 100.0))
}

fn egg() -> FoodCandidate {
    FoodCandidate::new("ovo", NutrientVector::new(155.0, 13.0, 1.1, 11.0))
}

fn oats() -> FoodCandidate {
    FoodCandidate::new("aveia", NutrientVector::new(389.0, 16.9, 66.3, 6.9))
}

fn assert_bounds(foods: &[FoodCandidate], assignment: &PortionAssignment) {
    for food in foods {
        let q = assignment.quantity_of(&food.code).unwrap();
        assert!(q >= 0.0, "{} has negative quantity {}", food.code, q);
        assert!(q >= food.min_quantity.unwrap_or(0.0), "{} below min", food.code);
        assert!(q <= food.max_quantity.unwrap_or(f64::INFINITY), "{} above max", food.code);
    }
}

fn assert_within_tolerance(targets: &NutrientVector, assignment: &PortionAssignment, tolerance: f64) {
    let violations = check_tolerance(targets, &assignment.realized, tolerance);
    assert!(violations.is_empty(), "out of tolerance: {:?}", violations);
}

#[test]
fn test_two_foods_without_carb_target() {
    let foods = [chicken(), rice()];
    let targets = NutrientVector::new(2000.0, 150.0, 0.0, 0.0);

    let assignment = solve(&foods, &targets, 0.1).unwrap();

    assert!(within_band(assignment.realized.calories, 2000.0, 0.1));
    assert!(within_band(assignment.realized.proteins, 150.0, 0.1));
    assert_bounds(&foods, &assignment);
    // Two unknowns, two targets: the fit is exact up to rounding.
    assert_float_absolute_eq!(assignment.realized.calories, 2000.0, 1.0);
    assert_float_absolute_eq!(assignment.realized.proteins, 150.0, 0.5);
}

#[test]
fn test_chicken_and_rice_miss_three_targets_at_ten_percent() {
    // Within the protein and carb bands calories top out near 1787 kcal.
    let err = solve(
        &[chicken(), rice()],
        &NutrientVector::new(2000.0, 150.0, 200.0, 0.0),
        0.1,
    )
    .unwrap_err();

    assert!(err.is_infeasible());
    assert_eq!(err.status_code(), 400);
}

#[test]
fn test_chicken_and_rice_fit_three_targets_at_fifteen_percent() {
    let foods = [chicken(), rice()];
    let targets = NutrientVector::new(2000.0, 150.0, 200.0, 0.0);

    let assignment = solve(&foods, &targets, 0.15).unwrap();

    assert_within_tolerance(&targets, &assignment, 0.15);
    assert_bounds(&foods, &assignment);
}

#[test]
fn test_single_capped_food_is_infeasible() {
    let err = solve(
        &[chicken().with_max(50.0)],
        &NutrientVector::new(2000.0, 150.0, 200.0, 0.0),
        0.1,
    )
    .unwrap_err();

    assert!(matches!(err, PortionError::Infeasible(_)));
}

#[test]
fn test_all_zero_targets_are_invalid() {
    let err = solve(&[chicken(), rice()], &NutrientVector::default(), 0.1).unwrap_err();
    assert!(matches!(err, PortionError::InvalidArgument { ref field, .. } if field == "targets"));
}

#[test]
fn test_tolerance_above_one_is_invalid() {
    let err = solve(
        &[chicken(), rice()],
        &NutrientVector::new(2000.0, 150.0, 0.0, 0.0),
        1.5,
    )
    .unwrap_err();
    assert!(err.is_invalid_argument());
    assert_eq!(err.status_code(), 422);
}

#[test]
fn test_all_four_targets_with_four_foods() {
    let foods = [chicken(), rice(), oil(), egg()];
    let targets = NutrientVector::new(2000.0, 150.0, 200.0, 60.0);

    let assignment = solve(&foods, &targets, 0.1).unwrap();

    assert_within_tolerance(&targets, &assignment, 0.1);
    assert_bounds(&foods, &assignment);
}

#[test]
fn test_bounds_are_respected() {
    let foods = [
        chicken().with_max(250.0),
        rice().with_min(100.0).with_max(400.0),
        oats().with_max(150.0),
        oil().with_max(30.0),
        egg().with_min(50.0).with_max(200.0),
    ];
    let targets = NutrientVector::new(2000.0, 150.0, 200.0, 60.0);

    let assignment = solve(&foods, &targets, 0.1).unwrap();

    assert_within_tolerance(&targets, &assignment, 0.1);
    assert_bounds(&foods, &assignment);
}

#[test]
fn test_min_bound_above_target_is_infeasible() {
    let err = solve(
        &[oil().with_min(500.0)],
        &NutrientVector::new(2000.0, 0.0, 0.0, 0.0),
        0.1,
    )
    .unwrap_err();
    assert!(err.is_infeasible());
}

#[test]
fn test_all_foods_capped_at_zero_terminate() {
    let err = solve(
        &[chicken().with_max(0.0), rice().with_max(0.0)],
        &NutrientVector::new(2000.0, 0.0, 0.0, 0.0),
        0.1,
    )
    .unwrap_err();
    assert!(err.is_infeasible());
}

#[test]
fn test_unused_nutrient_does_not_change_quantities() {
    let targets = NutrientVector::new(2000.0, 150.0, 0.0, 0.0);
    let lean = solve(&[chicken(), rice()], &targets, 0.1).unwrap();

    let fatty_chicken = FoodCandidate::new("frango", NutrientVector::new(165.0, 31.0, 0.0, 9.9));
    let fatty_rice = FoodCandidate::new("arroz", NutrientVector::new(130.0, 2.7, 28.0, 5.0));
    let fatty = solve(&[fatty_chicken, fatty_rice], &targets, 0.1).unwrap();

    assert_eq!(lean.quantity_of("frango"), fatty.quantity_of("frango"));
    assert_eq!(lean.quantity_of("arroz"), fatty.quantity_of("arroz"));
    assert!(fatty.realized.fats > lean.realized.fats);
}

#[test]
fn test_repeated_solves_agree() {
    let foods = [chicken(), rice(), oil(), egg()];
    let targets = NutrientVector::new(2000.0, 150.0, 200.0, 60.0);
    let solver = PortionSolver::new();

    let first = solver.solve(&foods, &targets, 0.1).unwrap();
    let second = solver.solve(&foods, &targets, 0.1).unwrap();

    assert_float_relative_eq!(first.realized.calories, second.realized.calories, 1e-6);
    assert_float_relative_eq!(first.realized.proteins, second.realized.proteins, 1e-6);
    assert_float_relative_eq!(first.realized.carbs, second.realized.carbs, 1e-6);
    assert_float_relative_eq!(first.realized.fats, second.realized.fats, 1e-6);
}

#[test]
fn test_identical_foods_share_the_target() {
    let foods = [rice(), FoodCandidate::new("arroz_2", rice().nutrients_per_unit)];
    let targets = NutrientVector::new(0.0, 0.0, 200.0, 0.0);

    let assignment = solve(&foods, &targets, 0.05).unwrap();

    assert_within_tolerance(&targets, &assignment, 0.05);
    assert_float_absolute_eq!(assignment.total_quantity(), 714.3, 0.2);
}

#[test]
fn test_quantities_are_rounded_to_one_decimal() {
    let foods = [chicken(), rice(), oil(), egg()];
    let targets = NutrientVector::new(2000.0, 150.0, 200.0, 60.0);

    let assignment = solve(&foods, &targets, 0.1).unwrap();

    for portion in &assignment.portions {
        let scaled = portion.quantity * 10.0;
        assert_float_absolute_eq!(scaled, scaled.round(), 1e-6);
    }
}

#[test]
fn test_zero_tolerance_keeps_exact_quantities() {
    let foods = [chicken(), rice()];
    let targets = NutrientVector::new(0.0, 150.0, 200.0, 0.0);

    let assignment = solve(&foods, &targets, 0.0).unwrap();

    assert_within_tolerance(&targets, &assignment, 0.0);
    assert!(
        assignment
            .warnings
            .iter()
            .any(|w| w.contains("unrounded")),
        "{:?}",
        assignment.warnings
    );
}

#[test]
fn test_unit_basis_is_honored() {
    // Half an egg's worth of nutrients per 50 g basis is the same food.
    let per_50g = FoodCandidate::new("ovo", NutrientVector::new(77.5, 6.5, 0.55, 5.5))
        .with_unit_basis(50.0);
    let targets = NutrientVector::new(0.0, 26.0, 0.0, 0.0);

    let assignment = solve(&[per_50g], &targets, 0.05).unwrap();

    assert_float_absolute_eq!(assignment.quantity_of("ovo").unwrap(), 200.0, 0.1);
}

#[test]
fn test_shared_solver_across_threads() {
    let solver = PortionSolver::new();
    let foods = [chicken(), rice()];
    let targets = NutrientVector::new(2000.0, 150.0, 0.0, 0.0);

    let results: Vec<PortionAssignment> = std::thread::scope(|s| {
        let handles: Vec<_> = (0..4)
            .map(|_| s.spawn(|| solver.solve(&foods, &targets, 0.1).unwrap()))
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });

    for assignment in &results {
        assert_eq!(assignment.quantity_of("frango"), results[0].quantity_of("frango"));
        assert_eq!(assignment.quantity_of("arroz"), results[0].quantity_of("arroz"));
    }
}

#[test]
fn test_tiny_target_is_met() {
    let food = FoodCandidate::new("sal", NutrientVector::new(100.0, 0.0, 0.0, 0.0));
    let targets = NutrientVector::new(1e-200, 0.0, 0.0, 0.0);

    let assignment = solve(&[food], &targets, 0.1).unwrap();

    assert_within_tolerance(&targets, &assignment, 0.1);
    assert!(assignment.unrounded);
}

#[test]
fn test_restart_settings_do_not_change_the_verdict() {
    let feasible = NutrientVector::new(2000.0, 150.0, 200.0, 60.0);
    let out_of_reach = NutrientVector::new(2000.0, 150.0, 200.0, 0.0);

    for seed in [1, 7, 42] {
        // Extra restarts past the three fixed starting points draw random ones.
        let solver = PortionSolver::with_options(
            SolverOptions::default().with_seed(seed).with_max_restarts(8),
        );

        let foods = [chicken(), rice(), oil(), egg()];
        let assignment = solver.solve(&foods, &feasible, 0.1).unwrap();
        assert_within_tolerance(&feasible, &assignment, 0.1);

        let err = solver.solve(&[chicken(), rice()], &out_of_reach, 0.1).unwrap_err();
        assert!(err.is_infeasible());
    }
}
