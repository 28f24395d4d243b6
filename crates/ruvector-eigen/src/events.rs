//! Event stream for budgeted eigensolves.
//!
//! [`PowerIterationSolver::solve_with_events`](crate::solver::PowerIterationSolver::solve_with_events)
//! appends [`EigenEvent`]s describing what was requested, each refinement
//! step, and how the solve ended.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::types::Algorithm;

/// Events emitted during a budgeted eigensolve.
///
/// Tagged with `#[serde(tag = "type")]` so they serialise as
/// `{ "type": "SolveRequested", ... }`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum EigenEvent {
    /// A solve request was received and is about to begin.
    SolveRequested {
        /// Algorithm that will run.
        algorithm: Algorithm,
        /// Operator dimension.
        dim: usize,
        /// Residual tolerance.
        tolerance: f64,
        /// Iteration cap.
        max_iterations: usize,
    },

    /// One refinement step completed.
    IterationCompleted {
        /// Iteration counter after the step.
        iteration: usize,
        /// Ritz value after the step.
        ritz_value: f64,
        /// Ritz residual norm after the step.
        residual: f64,
        /// Wall time elapsed since the solve began.
        elapsed: Duration,
    },

    /// The Ritz pair met the tolerance.
    SolveConverged {
        /// Algorithm that produced the result.
        algorithm: Algorithm,
        /// Total refinement steps.
        iterations: usize,
        /// Dominant eigenvalue estimate.
        eigenvalue: f64,
        /// Final residual norm.
        residual: f64,
        /// Total wall time.
        wall_time: Duration,
    },

    /// The compute budget was exhausted before convergence.
    BudgetExhausted {
        /// Algorithm that was running.
        algorithm: Algorithm,
        /// Which limit was hit.
        limit: BudgetLimit,
        /// Wall time elapsed.
        elapsed: Duration,
    },
}

/// Which budget limit was exhausted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BudgetLimit {
    /// Wall-clock time limit.
    WallTime,
    /// Iteration count limit.
    Iterations,
    /// Working memory limit.
    Memory,
}
