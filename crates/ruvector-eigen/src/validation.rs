//! Input validation for eigensolver operations.
//!
//! Validation runs eagerly before any operator application, so callers get a
//! [`ValidationError`] rather than a NaN-filled Ritz vector. Every function
//! here returns [`ValidationError`], which converts into
//! [`EigenError::InvalidInput`](crate::error::EigenError::InvalidInput) via `From`.
//!
//! # Limits
//!
//! | Resource        | Limit       | Constant           |
//! |-----------------|-------------|--------------------|
//! | Dimension       | 10,000,000  | [`MAX_DIM`]        |
//! | Non-zeros       | 100,000,000 | [`MAX_NNZ`]        |
//! | Iterations      | 1,000,000   | [`MAX_ITERATIONS`] |

use crate::error::ValidationError;
use crate::traits::LinearOperator;
use crate::types::{ComputeBudget, CsrMatrix, EigenResult};
use crate::vector::l2_norm;

/// Maximum operator dimension.
pub const MAX_DIM: usize = 10_000_000;

/// Maximum number of stored entries in a CSR operator.
pub const MAX_NNZ: usize = 100_000_000;

/// Maximum refinement steps accepted by the budgeted solver.
pub const MAX_ITERATIONS: usize = 1_000_000;

// ---------------------------------------------------------------------------
// Operator validation
// ---------------------------------------------------------------------------

/// Validate the dimension of an arbitrary operator.
///
/// # Errors
///
/// [`ValidationError::EmptyOperator`] for dimension 0 and
/// [`ValidationError::MatrixTooLarge`] above [`MAX_DIM`].
pub fn validate_operator<A: LinearOperator + ?Sized>(operator: &A) -> Result<(), ValidationError> {
    let dim = operator.rows();
    if dim == 0 {
        return Err(ValidationError::EmptyOperator);
    }
    if dim > MAX_DIM {
        return Err(ValidationError::MatrixTooLarge {
            dim,
            max_dim: MAX_DIM,
        });
    }
    Ok(())
}

/// Validate the structural integrity of a CSR operator.
///
/// Checks, in order:
///
/// 1. The matrix is square and non-empty, within [`MAX_DIM`].
/// 2. `nnz` is within [`MAX_NNZ`].
/// 3. `row_ptr` has length `rows + 1`, starts at 0, ends at `nnz`, and is
///    monotonically non-decreasing.
/// 4. `col_indices` has the same length as `values`.
/// 5. Every column index is `< cols` and every value is finite.
///
/// Unsorted column indices within a row are legal and only logged.
///
/// # Errors
///
/// Returns [`ValidationError`] describing the first violation found.
///
/// # Examples
///
/// ```
/// use ruvector_eigen::types::CsrMatrix;
/// use ruvector_eigen::validation::validate_csr_matrix;
///
/// let m = CsrMatrix::<f64>::from_coo(2, 2, vec![(0, 0, 1.0), (1, 1, 2.0)]);
/// assert!(validate_csr_matrix(&m).is_ok());
/// ```
pub fn validate_csr_matrix(matrix: &CsrMatrix<f64>) -> Result<(), ValidationError> {
    if !matrix.is_square() {
        return Err(ValidationError::DimensionMismatch(format!(
            "eigensolver requires a square matrix but got {}x{}",
            matrix.rows, matrix.cols,
        )));
    }
    validate_operator(matrix)?;

    let nnz = matrix.values.len();
    if nnz > MAX_NNZ {
        return Err(ValidationError::DimensionMismatch(format!(
            "nnz {} exceeds maximum allowed {}",
            nnz, MAX_NNZ,
        )));
    }

    if matrix.row_ptr.len() != matrix.rows + 1 {
        return Err(ValidationError::DimensionMismatch(format!(
            "row_ptr length {} does not equal rows + 1 = {}",
            matrix.row_ptr.len(),
            matrix.rows + 1,
        )));
    }
    if matrix.row_ptr[0] != 0 {
        return Err(ValidationError::DimensionMismatch(format!(
            "row_ptr[0] = {} (expected 0)",
            matrix.row_ptr[0],
        )));
    }
    if let Some(pos) = matrix.row_ptr.windows(2).position(|w| w[1] < w[0]) {
        return Err(ValidationError::DimensionMismatch(format!(
            "row_ptr is not monotonically non-decreasing at position {}",
            pos + 1,
        )));
    }
    if matrix.row_ptr[matrix.rows] != nnz {
        return Err(ValidationError::DimensionMismatch(format!(
            "values length {} does not match row_ptr[rows] = {}",
            nnz, matrix.row_ptr[matrix.rows],
        )));
    }
    if matrix.col_indices.len() != nnz {
        return Err(ValidationError::DimensionMismatch(format!(
            "col_indices length {} does not match values length {}",
            matrix.col_indices.len(),
            nnz,
        )));
    }

    for row in 0..matrix.rows {
        let mut prev_col: Option<usize> = None;
        for (col, &val) in matrix.row_entries(row) {
            if col >= matrix.cols {
                return Err(ValidationError::DimensionMismatch(format!(
                    "column index {} out of bounds for {} columns (row {})",
                    col, matrix.cols, row,
                )));
            }
            if !val.is_finite() {
                return Err(ValidationError::NonFiniteValue(format!(
                    "matrix[{}, {}] = {}",
                    row, col, val,
                )));
            }
            if prev_col.is_some_and(|pc| col < pc) {
                tracing::debug!(row, col, "column indices not sorted within row");
            }
            prev_col = Some(col);
        }
    }

    Ok(())
}

// ---------------------------------------------------------------------------
// Starting vector validation
// ---------------------------------------------------------------------------

/// Validate a caller-supplied starting vector against the operator dimension.
///
/// # Errors
///
/// - [`ValidationError::DimensionMismatch`] if `v.len() != dim`.
/// - [`ValidationError::NonFiniteValue`] on NaN/Inf entries.
/// - [`ValidationError::ZeroVector`] if the vector cannot be normalised.
pub fn validate_initial_vector(v: &[f64], dim: usize) -> Result<(), ValidationError> {
    if v.len() != dim {
        return Err(ValidationError::DimensionMismatch(format!(
            "initial vector length {} does not match operator dimension {}",
            v.len(),
            dim,
        )));
    }
    if let Some((i, x)) = v.iter().enumerate().find(|(_, x)| !x.is_finite()) {
        return Err(ValidationError::NonFiniteValue(format!(
            "initial[{}] = {}",
            i, x,
        )));
    }
    if l2_norm(v) == 0.0 {
        return Err(ValidationError::ZeroVector { len: v.len() });
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Parameter validation
// ---------------------------------------------------------------------------

/// Validate convergence parameters for the budgeted solver.
///
/// # Rules
///
/// - `tolerance` must be finite and strictly positive. A zero tolerance is
///   legal for [`PowerMethod::converged`](crate::power::PowerMethod::converged)
///   but can never be met by a budgeted solve.
/// - `max_iterations` must be in `[1, MAX_ITERATIONS]`.
///
/// # Errors
///
/// Returns [`ValidationError::ParameterOutOfRange`] naming the parameter.
pub fn validate_params(tolerance: f64, max_iterations: usize) -> Result<(), ValidationError> {
    if !tolerance.is_finite() || tolerance <= 0.0 {
        return Err(ValidationError::ParameterOutOfRange {
            name: "tolerance".into(),
            value: format!("{tolerance:.2e}"),
            expected: "finite positive value".into(),
        });
    }

    if max_iterations == 0 || max_iterations > MAX_ITERATIONS {
        return Err(ValidationError::ParameterOutOfRange {
            name: "max_iterations".into(),
            value: max_iterations.to_string(),
            expected: format!("[1, {}]", MAX_ITERATIONS),
        });
    }

    Ok(())
}

/// Validate a [`ComputeBudget`] (tolerance, iteration cap, non-zero time).
///
/// # Errors
///
/// Returns [`ValidationError::ParameterOutOfRange`] on the first bad field.
pub fn validate_budget(budget: &ComputeBudget) -> Result<(), ValidationError> {
    validate_params(budget.tolerance, budget.max_iterations)?;
    if budget.max_time.is_zero() {
        return Err(ValidationError::ParameterOutOfRange {
            name: "max_time".into(),
            value: format!("{:?}", budget.max_time),
            expected: "non-zero duration".into(),
        });
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Output validation (post-solve)
// ---------------------------------------------------------------------------

/// Validate an [`EigenResult`] after computation completes.
///
/// Catches silent numerical corruption: non-finite eigenvalue or eigenvector
/// entries, or an eigenvector that drifted away from unit norm.
///
/// # Errors
///
/// Returns [`ValidationError::NonFiniteValue`] or
/// [`ValidationError::DimensionMismatch`].
pub fn validate_output(result: &EigenResult) -> Result<(), ValidationError> {
    if !result.eigenvalue.is_finite() {
        return Err(ValidationError::NonFiniteValue(format!(
            "eigenvalue = {}",
            result.eigenvalue,
        )));
    }
    if let Some((i, x)) = result
        .eigenvector
        .iter()
        .enumerate()
        .find(|(_, x)| !x.is_finite())
    {
        return Err(ValidationError::NonFiniteValue(format!(
            "eigenvector[{}] = {}",
            i, x,
        )));
    }
    let norm = l2_norm(&result.eigenvector);
    if (norm - 1.0).abs() > 1e-6 {
        return Err(ValidationError::DimensionMismatch(format!(
            "eigenvector norm {norm:.6e} is not 1",
        )));
    }
    Ok(())
}
