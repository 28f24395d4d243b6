//! Error types for the eigensolver crate.
//!
//! The stateful [`PowerMethod`](crate::power::PowerMethod) reports
//! non-convergence through its boolean `compute` return and never fails.
//! These types cover the fallible surfaces: validated construction, input
//! validation, and the budgeted [`PowerIterationSolver`](crate::solver::PowerIterationSolver).

use std::time::Duration;

/// Primary error type for eigensolver operations.
#[derive(Debug, thiserror::Error)]
pub enum EigenError {
    /// The Ritz pair did not reach the residual tolerance within the
    /// allowed iteration budget.
    #[error(
        "power iteration did not converge after {iterations} iterations (residual={residual:.2e}, tol={tolerance:.2e})"
    )]
    NonConvergence {
        /// Number of refinement steps completed.
        iterations: usize,
        /// Ritz residual norm at termination.
        residual: f64,
        /// Target tolerance that was not reached.
        tolerance: f64,
    },

    /// The Ritz value or residual became NaN or infinite.
    #[error("numerical instability at iteration {iteration}: {detail}")]
    NumericalInstability {
        /// Iteration at which the instability was detected.
        iteration: usize,
        /// Human-readable explanation.
        detail: String,
    },

    /// The compute budget (wall-time or iterations) was exhausted.
    #[error("compute budget exhausted: {reason}")]
    BudgetExhausted {
        /// Which budget limit was hit.
        reason: String,
        /// Wall-clock time elapsed before the budget was hit.
        elapsed: Duration,
    },

    /// The caller supplied invalid input (dimensions, parameters, etc.).
    #[error("invalid input: {0}")]
    InvalidInput(#[from] ValidationError),
}

/// Validation errors for eigensolver inputs.
///
/// Raised eagerly before any operator application so that callers get clear
/// diagnostics instead of NaN-filled Ritz vectors.
#[derive(Debug, thiserror::Error)]
pub enum ValidationError {
    /// Vector or matrix dimensions are inconsistent.
    #[error("dimension mismatch: {0}")]
    DimensionMismatch(String),

    /// A value is NaN or infinite where a finite number is required.
    #[error("non-finite value detected: {0}")]
    NonFiniteValue(String),

    /// A starting vector has zero Euclidean norm and cannot be normalised.
    #[error("starting vector of length {len} has zero norm")]
    ZeroVector {
        /// Length of the offending vector.
        len: usize,
    },

    /// The operator has dimension zero.
    #[error("operator has dimension 0")]
    EmptyOperator,

    /// A parameter is outside its valid range.
    #[error("parameter out of range: {name} = {value} (expected {expected})")]
    ParameterOutOfRange {
        /// Name of the parameter.
        name: String,
        /// The invalid value (as a string for flexibility).
        value: String,
        /// Human-readable description of the valid range.
        expected: String,
    },

    /// Operator dimension exceeds the implementation limit.
    #[error("operator dimension {dim} exceeds maximum supported {max_dim}")]
    MatrixTooLarge {
        /// Dimension of the operator.
        dim: usize,
        /// Maximum supported dimension.
        max_dim: usize,
    },
}
