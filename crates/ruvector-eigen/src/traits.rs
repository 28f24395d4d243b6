//! Operator and solver trait hierarchy.
//!
//! [`LinearOperator`] is the only capability the power method needs from a
//! matrix: its dimension and a matrix-vector product. [`EigenSolverEngine`]
//! is the budgeted, fallible solve surface implemented by
//! [`PowerIterationSolver`](crate::solver::PowerIterationSolver).

use crate::error::EigenError;
use crate::types::{Algorithm, ComputeBudget, EigenResult};

/// A square linear map over real vectors of fixed dimension `n`.
///
/// Implementors only need [`rows`](Self::rows) and [`apply`](Self::apply).
/// The operator is always borrowed by the solvers in this crate and must not
/// change while a solver holds it.
pub trait LinearOperator {
    /// Dimension `n` of the operator (number of rows).
    fn rows(&self) -> usize;

    /// Apply the operator: `y = A * x`.
    ///
    /// `x` and `y` both have length [`rows`](Self::rows). Every entry of `y`
    /// must be overwritten.
    fn apply(&self, x: &[f64], y: &mut [f64]);

    /// Apply the operator into a freshly allocated vector.
    fn multiply(&self, x: &[f64]) -> Vec<f64> {
        let mut y = vec![0.0f64; self.rows()];
        self.apply(x, &mut y);
        y
    }
}

impl<T: LinearOperator + ?Sized> LinearOperator for &T {
    #[inline]
    fn rows(&self) -> usize {
        (**self).rows()
    }

    #[inline]
    fn apply(&self, x: &[f64], y: &mut [f64]) {
        (**self).apply(x, y)
    }
}

/// Core trait for budgeted dominant-eigenpair solvers.
///
/// An `EigenSolverEngine` accepts an operator and a compute budget and
/// returns either a converged [`EigenResult`] or a structured [`EigenError`].
pub trait EigenSolverEngine: Send + Sync {
    /// Compute the dominant eigenpair of `operator` subject to `budget`.
    ///
    /// # Errors
    ///
    /// Returns [`EigenError`] on non-convergence, numerical issues, budget
    /// exhaustion, or invalid input.
    fn solve(
        &self,
        operator: &dyn LinearOperator,
        budget: &ComputeBudget,
    ) -> Result<EigenResult, EigenError>;

    /// Return the algorithm identifier for this engine.
    fn algorithm(&self) -> Algorithm;
}
