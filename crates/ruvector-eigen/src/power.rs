//! Power method for the dominant eigenpair of a linear operator.
//!
//! Repeatedly applies the operator to the current Ritz vector and
//! renormalises:
//!
//! ```text
//! x_0 = normalize(initial or random)
//! x_1 = A x_0 / ||A x_0||            (bootstrap, during construction)
//! loop k = 1, 2, ...:
//!     x_{k+1} = A x_k / ||A x_k||
//!     lambda  = x_{k+1}^T A x_{k+1}
//!     if ||A x_{k+1} - lambda x_{k+1}|| < tol: converged
//! ```
//!
//! # Convergence
//!
//! The error in the Ritz vector decays like `|lambda_2 / lambda_1|^k`. When
//! the two largest-magnitude eigenvalues have equal magnitude (e.g.
//! `diag(2, -2)`) the iterate oscillates and `compute` simply runs out of
//! iterations and returns `false`; this is not detected separately.
//!
//! # Ritz value sentinel
//!
//! After construction the Ritz value is `0.0` even though the Ritz vector
//! already reflects one bootstrap step. The value is only computed by
//! [`PowerMethod::compute`]; [`PowerMethod::is_refined`] reports whether that
//! has happened.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, info, instrument, warn};

use crate::error::EigenError;
use crate::traits::LinearOperator;
use crate::validation::{validate_initial_vector, validate_operator};
use crate::vector::{dot, l2_norm, normalize, random_unit_vector, scaled_sub};

// ---------------------------------------------------------------------------
// PowerMethod
// ---------------------------------------------------------------------------

/// Stateful power-iteration eigensolver.
///
/// Borrows the operator for `'a`; the operator must outlive the solver and
/// must not change while the solver is in use. Not designed for concurrent
/// access: wrap it in external synchronisation if it is shared.
///
/// # Example
///
/// ```rust
/// use ruvector_eigen::power::PowerMethod;
/// use ruvector_eigen::types::DenseMatrix;
///
/// let a = DenseMatrix::from_rows(&[vec![2.0, 1.0], vec![1.0, 2.0]]);
/// let mut pm = PowerMethod::with_seed(&a, 7);
///
/// assert!(pm.compute(200, 1e-8));
/// assert!((pm.eigenvalue() - 3.0).abs() < 1e-8);
/// ```
pub struct PowerMethod<'a, A: LinearOperator + ?Sized> {
    operator: &'a A,
    dim: usize,
    nr_iterations: usize,
    ritz_value: f64,
    ritz_vector: Vec<f64>,
}

impl<A: LinearOperator + ?Sized> Clone for PowerMethod<'_, A> {
    fn clone(&self) -> Self {
        Self {
            operator: self.operator,
            dim: self.dim,
            nr_iterations: self.nr_iterations,
            ritz_value: self.ritz_value,
            ritz_vector: self.ritz_vector.clone(),
        }
    }
}

impl<A: LinearOperator + ?Sized> std::fmt::Debug for PowerMethod<'_, A> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PowerMethod")
            .field("dim", &self.dim)
            .field("nr_iterations", &self.nr_iterations)
            .field("ritz_value", &self.ritz_value)
            .finish_non_exhaustive()
    }
}

impl<'a, A: LinearOperator + ?Sized> PowerMethod<'a, A> {
    /// Create a solver and run the bootstrap power step.
    ///
    /// With `initial == None` the starting direction is drawn uniformly from
    /// `[-1, 1]^n` using the thread-local RNG. The starting vector is
    /// normalised, then replaced by one power step. The Ritz value starts at
    /// `0.0` and the iteration counter at 0.
    ///
    /// A zero-norm or wrong-length `initial` is a precondition violation; use
    /// [`try_new`](Self::try_new) for a checked constructor.
    pub fn new(operator: &'a A, initial: Option<Vec<f64>>) -> Self {
        Self::with_rng(operator, initial, &mut rand::thread_rng())
    }

    /// Like [`new`](Self::new) with a random start drawn from a seeded
    /// [`StdRng`], for reproducible runs.
    pub fn with_seed(operator: &'a A, seed: u64) -> Self {
        Self::with_rng(operator, None, &mut StdRng::seed_from_u64(seed))
    }

    /// Like [`new`](Self::new), drawing any random start from `rng`.
    pub fn with_rng<R: Rng + ?Sized>(
        operator: &'a A,
        initial: Option<Vec<f64>>,
        rng: &mut R,
    ) -> Self {
        let dim = operator.rows();
        let mut x0 = match initial {
            Some(v) => v,
            None => random_unit_vector(dim, rng),
        };
        normalize(&mut x0);

        let mut pm = Self {
            operator,
            dim,
            nr_iterations: 0,
            ritz_value: 0.0,
            ritz_vector: vec![0.0; dim],
        };
        pm.ritz_vector = pm.power_iteration_of(&x0);
        pm
    }

    /// Checked constructor.
    ///
    /// # Errors
    ///
    /// Returns [`EigenError::InvalidInput`] if the operator is empty or too
    /// large, or if `initial` has the wrong length, non-finite entries, or
    /// zero norm.
    pub fn try_new(operator: &'a A, initial: Option<Vec<f64>>) -> Result<Self, EigenError> {
        validate_operator(operator)?;
        if let Some(v) = &initial {
            validate_initial_vector(v, operator.rows())?;
        }
        Ok(Self::new(operator, initial))
    }

    /// One power step on `x`: returns `A x / ||A x||`.
    ///
    /// Does not touch solver state. If `A x` is exactly zero the result is
    /// the zero vector.
    pub fn power_iteration_of(&self, x: &[f64]) -> Vec<f64> {
        let mut y = self.operator.multiply(x);
        normalize(&mut y);
        y
    }

    /// One power step on the current Ritz vector, without advancing state.
    #[inline]
    pub fn power_iteration(&self) -> Vec<f64> {
        self.power_iteration_of(&self.ritz_vector)
    }

    /// Rayleigh quotient `x^T A x` (for unit-norm `x`).
    #[inline]
    pub fn rayleigh_quotient(&self, x: &[f64]) -> f64 {
        dot(x, &self.operator.multiply(x))
    }

    /// Ritz residual norm `||A x - lambda x||` of the current Ritz vector,
    /// with `lambda` recomputed as its Rayleigh quotient.
    pub fn ritz_residual(&self) -> f64 {
        let x = &self.ritz_vector;
        let ax = self.operator.multiply(x);
        let lambda = dot(x, &ax);
        l2_norm(&scaled_sub(&ax, lambda, x))
    }

    /// `true` iff the current Ritz residual is strictly below `tol`.
    ///
    /// Does not modify the stored Ritz value.
    #[inline]
    pub fn converged(&self, tol: f64) -> bool {
        self.ritz_residual() < tol
    }

    /// Run up to `max_iterations` refinement steps, stopping early once the
    /// Ritz residual drops below `tol`.
    ///
    /// Each step increments the iteration counter, replaces the Ritz vector
    /// with one power step, and recomputes the Ritz value. State accumulates
    /// across calls. Returns whether convergence was reached; `false` is the
    /// normal signal for an exhausted cap, not an error.
    ///
    /// With `max_iterations == 0` no step runs and the result is whether the
    /// current Ritz pair already satisfies `tol`.
    #[instrument(skip(self), fields(n = self.dim, start = self.nr_iterations))]
    pub fn compute(&mut self, max_iterations: usize, tol: f64) -> bool {
        if max_iterations == 0 {
            return self.converged(tol);
        }

        let mut is_converged = false;

        for _ in 0..max_iterations {
            self.step();
            let residual = self.ritz_residual();
            debug!(
                iteration = self.nr_iterations,
                ritz_value = self.ritz_value,
                residual,
                "power iteration",
            );
            if residual < tol {
                is_converged = true;
                break;
            }
        }

        if is_converged {
            info!(
                iterations = self.nr_iterations,
                eigenvalue = self.ritz_value,
                "power iteration converged",
            );
        } else {
            warn!(
                iterations = self.nr_iterations,
                max_iterations,
                tol,
                "power iteration exhausted its iteration cap",
            );
        }
        is_converged
    }

    /// Advance exactly one refinement step and return the new Ritz value.
    ///
    /// Used by the budgeted solver, which interleaves its own checks between
    /// steps.
    pub(crate) fn step(&mut self) -> f64 {
        self.nr_iterations += 1;
        self.ritz_vector = self.power_iteration();
        self.ritz_value = self.rayleigh_quotient(&self.ritz_vector);
        self.ritz_value
    }

    /// Current Ritz value (`0.0` until the first refinement step).
    #[inline]
    pub fn eigenvalue(&self) -> f64 {
        self.ritz_value
    }

    /// Current Ritz vector.
    #[inline]
    pub fn eigenvector(&self) -> &[f64] {
        &self.ritz_vector
    }

    /// Consume the solver and return `(eigenvalue, eigenvector)`.
    pub fn into_pair(self) -> (f64, Vec<f64>) {
        (self.ritz_value, self.ritz_vector)
    }

    /// Number of refinement steps since construction. The bootstrap step is
    /// not counted.
    #[inline]
    pub fn nr_iterations(&self) -> usize {
        self.nr_iterations
    }

    /// `false` while the Ritz value is still the construction-time `0.0`
    /// sentinel.
    #[inline]
    pub fn is_refined(&self) -> bool {
        self.nr_iterations > 0
    }

    /// Operator dimension.
    #[inline]
    pub fn dim(&self) -> usize {
        self.dim
    }

    /// The borrowed operator.
    #[inline]
    pub fn operator(&self) -> &'a A {
        self.operator
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
