//! Integration tests for the budgeted `PowerIterationSolver`.
//!
//! Tests cover convergence through the `EigenSolverEngine` trait, budget
//! interaction, the event stream, and output validation.

mod helpers;

use std::time::Duration;

use approx::assert_relative_eq;
use ruvector_eigen::error::EigenError;
use ruvector_eigen::events::{BudgetLimit, EigenEvent};
use ruvector_eigen::solver::{PowerIterationConfig, PowerIterationSolver};
use ruvector_eigen::traits::EigenSolverEngine;
use ruvector_eigen::types::{Algorithm, ComputeBudget, CsrMatrix, FnOperator};
use ruvector_eigen::validation::validate_output;

use helpers::{distance_up_to_sign, planted_spectrum_csr, random_vector};

fn seeded(seed: u64) -> PowerIterationSolver {
    PowerIterationSolver::new(PowerIterationConfig {
        tolerance: 1e-10,
        seed: Some(seed),
        ..Default::default()
    })
}

fn budget(max_iterations: usize, tolerance: f64) -> ComputeBudget {
    ComputeBudget {
        max_time: Duration::from_secs(30),
        max_iterations,
        tolerance,
    }
}

// ---------------------------------------------------------------------------
// Convergence via the trait object
// ---------------------------------------------------------------------------

#[test]
fn test_solver_planted_spectrum() {
    let eigs: Vec<f64> = (0..25).map(|k| if k == 0 { 8.0 } else { 4.0 / (k as f64) }).collect();
    let (a, vectors) = planted_spectrum_csr(&eigs, 31);

    let engine: Box<dyn EigenSolverEngine> = Box::new(seeded(1));
    assert_eq!(engine.algorithm(), Algorithm::PowerIteration);

    let result = engine.solve(&a, &budget(1000, 1e-10)).unwrap();
    assert_relative_eq!(result.eigenvalue, 8.0, epsilon = 1e-10);
    assert!(distance_up_to_sign(&result.eigenvector, &vectors[0]) < 1e-9);
    assert!(result.residual_norm < 1e-10);
    validate_output(&result).unwrap();
}

#[test]
fn test_history_ends_at_result() {
    let a = CsrMatrix::<f64>::from_diagonal(&[5.0, 2.0, 1.0]);
    let result = seeded(2).solve(&a, &budget(1000, 1e-8)).unwrap();

    let history = &result.convergence_history;
    assert_eq!(history.len(), result.iterations);
    for (k, info) in history.iter().enumerate() {
        assert_eq!(info.iteration, k + 1);
    }
    let last = history.last().unwrap();
    assert_eq!(last.residual_norm, result.residual_norm);
    assert_eq!(last.ritz_value, result.eigenvalue);

    assert!(history[0].residual_norm > last.residual_norm);
}

#[test]
fn test_solve_from_explicit_start() {
    let (a, vectors) = planted_spectrum_csr(&[-6.0, 3.0, 1.0, 0.5], 40);
    let result = PowerIterationSolver::default()
        .solve_from(&a, random_vector(4, 41), &budget(1000, 1e-9))
        .unwrap();
    assert_relative_eq!(result.eigenvalue, -6.0, epsilon = 1e-9);
    assert!(distance_up_to_sign(&result.eigenvector, &vectors[0]) < 1e-8);
}

// ---------------------------------------------------------------------------
// Budget handling
// ---------------------------------------------------------------------------

#[test]
fn test_oscillation_is_non_convergence() {
    let a = CsrMatrix::<f64>::from_diagonal(&[2.0, -2.0]);
    let err = seeded(3).solve(&a, &budget(5, 1e-9)).unwrap_err();
    match err {
        EigenError::NonConvergence {
            iterations,
            residual,
            tolerance,
        } => {
            assert_eq!(iterations, 5);
            assert!(residual > 1e-9);
            assert_eq!(tolerance, 1e-10_f64.min(1e-9));
        }
        other => panic!("expected NonConvergence, got {other:?}"),
    }
}

#[test]
fn test_wall_clock_budget() {
    // Each apply sleeps, so the bootstrap alone exceeds the time budget.
    let slow = FnOperator::new(2, |x: &[f64], y: &mut [f64]| {
        std::thread::sleep(Duration::from_millis(2));
        y[0] = 2.0 * x[0];
        y[1] = -2.0 * x[1];
    });
    let tight = ComputeBudget {
        max_time: Duration::from_micros(100),
        max_iterations: 1000,
        tolerance: 1e-9,
    };

    let mut events = Vec::new();
    let err = seeded(4)
        .solve_with_events(&slow, &tight, &mut events)
        .unwrap_err();

    assert!(matches!(err, EigenError::BudgetExhausted { .. }), "{err}");
    assert!(matches!(
        events.last(),
        Some(EigenEvent::BudgetExhausted {
            limit: BudgetLimit::WallTime,
            ..
        })
    ));
}

#[test]
fn test_invalid_budget_rejected() {
    let a = CsrMatrix::<f64>::identity(2);
    let err = seeded(5).solve(&a, &budget(0, 1e-6)).unwrap_err();
    assert!(matches!(err, EigenError::InvalidInput(_)));
    assert!(err.to_string().contains("max_iterations"));
}

#[test]
fn test_empty_operator_rejected() {
    let a = CsrMatrix::<f64>::from_diagonal(&[]);
    let err = seeded(5).solve(&a, &ComputeBudget::default()).unwrap_err();
    assert!(matches!(err, EigenError::InvalidInput(_)));
}

// ---------------------------------------------------------------------------
// Event stream
// ---------------------------------------------------------------------------

#[test]
fn test_events_serialise_with_type_tag() {
    let a = CsrMatrix::<f64>::from_diagonal(&[3.0, 1.0]);
    let mut events = Vec::new();
    seeded(6)
        .solve_with_events(&a, &budget(100, 1e-6), &mut events)
        .unwrap();

    let json = serde_json::to_value(&events[0]).unwrap();
    assert_eq!(json["type"], "SolveRequested");
    assert_eq!(json["algorithm"], "PowerIteration");
    assert_eq!(json["dim"], 2);

    let last = serde_json::to_string(events.last().unwrap()).unwrap();
    let back: EigenEvent = serde_json::from_str(&last).unwrap();
    assert!(matches!(back, EigenEvent::SolveConverged { .. }));
}
