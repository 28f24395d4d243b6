//! Budgeted power-iteration solver.
//!
//! [`PowerIterationSolver`] drives a [`PowerMethod`] one refinement step at a
//! time under a [`BudgetEnforcer`], recording a convergence history and an
//! optional [`EigenEvent`] stream. Unlike [`PowerMethod::compute`], running
//! out of iterations here is reported as [`EigenError::NonConvergence`].

use std::time::Instant;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, warn};

use crate::budget::BudgetEnforcer;
use crate::error::EigenError;
use crate::events::{BudgetLimit, EigenEvent};
use crate::power::PowerMethod;
use crate::traits::{EigenSolverEngine, LinearOperator};
use crate::types::{Algorithm, ComputeBudget, ConvergenceInfo, EigenResult};
use crate::validation::{validate_budget, validate_operator, validate_params};
use crate::vector::l2_norm;

/// Working vectors alive during a step: Ritz vector, `A x`, residual.
const WORKING_VECTORS: usize = 3;

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

/// Configuration for [`PowerIterationSolver`].
///
/// The effective limits of a solve are the tighter of this config and the
/// [`ComputeBudget`] passed to it.
///
/// # Example
///
/// ```rust
/// use ruvector_eigen::solver::PowerIterationConfig;
///
/// let config = PowerIterationConfig {
///     seed: Some(42),
///     ..Default::default()
/// };
/// assert_eq!(config.max_iterations, 1000);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PowerIterationConfig {
    /// Ritz residual tolerance.
    ///
    /// Default: `1e-6`.
    pub tolerance: f64,

    /// Maximum number of refinement steps.
    ///
    /// Default: `1000`.
    pub max_iterations: usize,

    /// Seed for the random starting vector. `None` draws from the
    /// thread-local RNG.
    ///
    /// Default: `None`.
    pub seed: Option<u64>,

    /// Record a [`ConvergenceInfo`] per step in the result.
    ///
    /// Default: `true`.
    pub record_history: bool,
}

impl Default for PowerIterationConfig {
    fn default() -> Self {
        Self {
            tolerance: 1e-6,
            max_iterations: 1000,
            seed: None,
            record_history: true,
        }
    }
}

// ---------------------------------------------------------------------------
// PowerIterationSolver
// ---------------------------------------------------------------------------

/// Fallible, budgeted front end over [`PowerMethod`].
///
/// # Example
///
/// ```rust
/// use ruvector_eigen::solver::{PowerIterationConfig, PowerIterationSolver};
/// use ruvector_eigen::traits::EigenSolverEngine;
/// use ruvector_eigen::types::{ComputeBudget, CsrMatrix};
///
/// let a = CsrMatrix::<f64>::from_diagonal(&[3.0, 1.0]);
/// let solver = PowerIterationSolver::new(PowerIterationConfig {
///     seed: Some(1),
///     ..Default::default()
/// });
///
/// let result = solver.solve(&a, &ComputeBudget::default()).unwrap();
/// assert!((result.eigenvalue - 3.0).abs() < 1e-6);
/// ```
#[derive(Debug, Clone, Default)]
pub struct PowerIterationSolver {
    config: PowerIterationConfig,
}

impl PowerIterationSolver {
    /// Create a solver with the given configuration.
    pub fn new(config: PowerIterationConfig) -> Self {
        Self { config }
    }

    /// Create a solver with the given tolerance and iteration cap and
    /// defaults elsewhere.
    pub fn with_tolerance(tolerance: f64, max_iterations: usize) -> Self {
        Self::new(PowerIterationConfig {
            tolerance,
            max_iterations,
            ..Default::default()
        })
    }

    /// The solver configuration.
    pub fn config(&self) -> &PowerIterationConfig {
        &self.config
    }

    /// Solve starting from `initial` instead of a random vector.
    ///
    /// # Errors
    ///
    /// As [`EigenSolverEngine::solve`], plus [`EigenError::InvalidInput`] for
    /// a wrong-length, non-finite, or zero starting vector.
    pub fn solve_from(
        &self,
        operator: &dyn LinearOperator,
        initial: Vec<f64>,
        budget: &ComputeBudget,
    ) -> Result<EigenResult, EigenError> {
        self.run(operator, Some(initial), budget, None)
    }

    /// Solve and append the [`EigenEvent`] stream to `events`.
    ///
    /// Events are appended even when the solve fails.
    ///
    /// # Errors
    ///
    /// As [`EigenSolverEngine::solve`].
    pub fn solve_with_events(
        &self,
        operator: &dyn LinearOperator,
        budget: &ComputeBudget,
        events: &mut Vec<EigenEvent>,
    ) -> Result<EigenResult, EigenError> {
        self.run(operator, None, budget, Some(events))
    }

    #[instrument(skip_all, fields(n = operator.rows()))]
    fn run(
        &self,
        operator: &dyn LinearOperator,
        initial: Option<Vec<f64>>,
        budget: &ComputeBudget,
        mut events: Option<&mut Vec<EigenEvent>>,
    ) -> Result<EigenResult, EigenError> {
        let start = Instant::now();
        let mut emit = |event: EigenEvent| {
            if let Some(sink) = events.as_deref_mut() {
                sink.push(event);
            }
        };

        validate_operator(operator)?;
        validate_params(self.config.tolerance, self.config.max_iterations)?;
        validate_budget(budget)?;

        let n = operator.rows();
        let effective = ComputeBudget {
            max_time: budget.max_time,
            max_iterations: self.config.max_iterations.min(budget.max_iterations),
            tolerance: self.config.tolerance.min(budget.tolerance),
        };
        let tol = effective.tolerance;

        emit(EigenEvent::SolveRequested {
            algorithm: Algorithm::PowerIteration,
            dim: n,
            tolerance: tol,
            max_iterations: effective.max_iterations,
        });

        let mut enforcer = BudgetEnforcer::new(effective);
        if let Err(e) = enforcer.check_memory(n * std::mem::size_of::<f64>() * WORKING_VECTORS) {
            emit(EigenEvent::BudgetExhausted {
                algorithm: Algorithm::PowerIteration,
                limit: BudgetLimit::Memory,
                elapsed: start.elapsed(),
            });
            return Err(e);
        }

        let mut pm = match (initial, self.config.seed) {
            (Some(v), _) => PowerMethod::try_new(operator, Some(v))?,
            (None, Some(seed)) => PowerMethod::with_seed(operator, seed),
            (None, None) => PowerMethod::new(operator, None),
        };
        if l2_norm(pm.eigenvector()) == 0.0 {
            return Err(EigenError::NumericalInstability {
                iteration: 0,
                detail: "operator maps the starting vector to zero".into(),
            });
        }

        let mut history = Vec::new();
        let mut residual = f64::INFINITY;

        loop {
            if let Err(e) = enforcer.check_iteration() {
                let limit = enforcer.exhausted().unwrap_or(BudgetLimit::Iterations);
                emit(EigenEvent::BudgetExhausted {
                    algorithm: Algorithm::PowerIteration,
                    limit,
                    elapsed: start.elapsed(),
                });
                warn!(iterations = pm.nr_iterations(), residual, ?limit, "budget exhausted");
                return Err(match limit {
                    BudgetLimit::Iterations => EigenError::NonConvergence {
                        iterations: pm.nr_iterations(),
                        residual,
                        tolerance: tol,
                    },
                    _ => e,
                });
            }

            let ritz_value = pm.step();
            residual = pm.ritz_residual();
            let iteration = pm.nr_iterations();

            if !ritz_value.is_finite() || !residual.is_finite() {
                return Err(EigenError::NumericalInstability {
                    iteration,
                    detail: format!("ritz value {ritz_value}, residual {residual}"),
                });
            }
            if l2_norm(pm.eigenvector()) == 0.0 {
                return Err(EigenError::NumericalInstability {
                    iteration,
                    detail: "operator maps the Ritz vector to zero".into(),
                });
            }

            debug!(iteration, ritz_value, residual, "power iteration step");
            if self.config.record_history {
                history.push(ConvergenceInfo {
                    iteration,
                    ritz_value,
                    residual_norm: residual,
                });
            }
            emit(EigenEvent::IterationCompleted {
                iteration,
                ritz_value,
                residual,
                elapsed: start.elapsed(),
            });

            if residual < tol {
                let wall_time = start.elapsed();
                info!(iterations = iteration, eigenvalue = ritz_value, residual, "converged");
                emit(EigenEvent::SolveConverged {
                    algorithm: Algorithm::PowerIteration,
                    iterations: iteration,
                    eigenvalue: ritz_value,
                    residual,
                    wall_time,
                });
                let (eigenvalue, eigenvector) = pm.into_pair();
                return Ok(EigenResult {
                    eigenvalue,
                    eigenvector,
                    iterations: iteration,
                    residual_norm: residual,
                    wall_time,
                    convergence_history: history,
                    algorithm: Algorithm::PowerIteration,
                });
            }
        }
    }
}

impl EigenSolverEngine for PowerIterationSolver {
    fn solve(
        &self,
        operator: &dyn LinearOperator,
        budget: &ComputeBudget,
    ) -> Result<EigenResult, EigenError> {
        self.run(operator, None, budget, None)
    }

    fn algorithm(&self) -> Algorithm {
        Algorithm::PowerIteration
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
