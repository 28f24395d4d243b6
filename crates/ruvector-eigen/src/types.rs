//! Core types for the eigensolver.
//!
//! Provides the operator implementations shipped with the crate
//! ([`CsrMatrix`], [`DenseMatrix`], [`FnOperator`]) and the result types for
//! convergence tracking.

use std::fmt;
use std::time::Duration;

use crate::traits::LinearOperator;

/// Row count above which the `parallel` feature switches CSR SpMV to rayon.
#[cfg(feature = "parallel")]
pub const PARALLEL_ROW_THRESHOLD: usize = 4096;

// ---------------------------------------------------------------------------
// CsrMatrix<T>
// ---------------------------------------------------------------------------

/// Compressed Sparse Row (CSR) matrix.
///
/// Stores only non-zero entries for efficient sparse matrix-vector
/// multiplication in O(nnz) time with excellent cache locality.
///
/// # Layout
///
/// For a matrix with `m` rows and `nnz` non-zeros:
/// - `row_ptr` has length `m + 1`
/// - `col_indices` and `values` each have length `nnz`
/// - Row `i` spans indices `row_ptr[i]..row_ptr[i+1]`
#[derive(Debug, Clone)]
pub struct CsrMatrix<T> {
    /// Row pointers: `row_ptr[i]` is the start index in `col_indices`/`values`
    /// for row `i`.
    pub row_ptr: Vec<usize>,
    /// Column indices for each non-zero entry.
    pub col_indices: Vec<usize>,
    /// Values for each non-zero entry.
    pub values: Vec<T>,
    /// Number of rows.
    pub rows: usize,
    /// Number of columns.
    pub cols: usize,
}

impl<T: Copy + Default + std::ops::Mul<Output = T> + std::ops::AddAssign> CsrMatrix<T> {
    /// Sparse matrix-vector multiply: `y = A * x`.
    ///
    /// # Panics
    ///
    /// Debug-asserts that `x.len() >= self.cols` and `y.len() >= self.rows`.
    #[inline]
    pub fn spmv(&self, x: &[T], y: &mut [T]) {
        debug_assert!(
            x.len() >= self.cols,
            "spmv: x.len()={} < cols={}",
            x.len(),
            self.cols,
        );
        debug_assert!(
            y.len() >= self.rows,
            "spmv: y.len()={} < rows={}",
            y.len(),
            self.rows,
        );

        for (i, yi) in y.iter_mut().enumerate().take(self.rows) {
            *yi = self.row_dot(i, x);
        }
    }

    /// Dot product of row `i` with `x`.
    #[inline]
    fn row_dot(&self, i: usize, x: &[T]) -> T {
        let mut sum = T::default();
        for idx in self.row_ptr[i]..self.row_ptr[i + 1] {
            sum += self.values[idx] * x[self.col_indices[idx]];
        }
        sum
    }
}

#[cfg(feature = "parallel")]
impl<T> CsrMatrix<T>
where
    T: Copy + Default + Send + Sync + std::ops::Mul<Output = T> + std::ops::AddAssign,
{
    /// Row-parallel SpMV: `y = A * x`, one rayon task per row chunk.
    pub fn par_spmv(&self, x: &[T], y: &mut [T]) {
        use rayon::prelude::*;

        debug_assert!(x.len() >= self.cols);
        debug_assert!(y.len() >= self.rows);

        y[..self.rows]
            .par_iter_mut()
            .enumerate()
            .for_each(|(i, yi)| *yi = self.row_dot(i, x));
    }
}

impl<T> CsrMatrix<T> {
    /// Number of non-zero entries.
    #[inline]
    pub fn nnz(&self) -> usize {
        self.values.len()
    }

    /// Number of non-zeros in a specific row.
    #[inline]
    pub fn row_degree(&self, row: usize) -> usize {
        self.row_ptr[row + 1] - self.row_ptr[row]
    }

    /// Iterate over `(col_index, &value)` pairs for the given row.
    #[inline]
    pub fn row_entries(&self, row: usize) -> impl Iterator<Item = (usize, &T)> {
        let start = self.row_ptr[row];
        let end = self.row_ptr[row + 1];
        self.col_indices[start..end]
            .iter()
            .copied()
            .zip(self.values[start..end].iter())
    }

    /// `true` if the matrix has as many rows as columns.
    #[inline]
    pub fn is_square(&self) -> bool {
        self.rows == self.cols
    }
}

impl<T: Copy + Default> CsrMatrix<T> {
    /// Transpose: produces `A^T` in CSR form.
    ///
    /// Two-pass counting sort in O(nnz + rows + cols) time. Power iteration
    /// on `A^T` yields the dominant left eigenvector of `A`.
    pub fn transpose(&self) -> CsrMatrix<T> {
        let nnz = self.nnz();
        let t_rows = self.cols;
        let t_cols = self.rows;

        let mut row_ptr = vec![0usize; t_rows + 1];
        for &c in &self.col_indices {
            row_ptr[c + 1] += 1;
        }
        for i in 1..=t_rows {
            row_ptr[i] += row_ptr[i - 1];
        }

        let mut col_indices = vec![0usize; nnz];
        let mut values = vec![T::default(); nnz];
        let mut cursor = row_ptr.clone();

        for row in 0..self.rows {
            for idx in self.row_ptr[row]..self.row_ptr[row + 1] {
                let c = self.col_indices[idx];
                let dest = cursor[c];
                col_indices[dest] = row;
                values[dest] = self.values[idx];
                cursor[c] += 1;
            }
        }

        CsrMatrix {
            row_ptr,
            col_indices,
            values,
            rows: t_rows,
            cols: t_cols,
        }
    }

    /// Build a CSR matrix from COO (coordinate) triplets.
    ///
    /// Entries are sorted by (row, col) internally. Duplicate positions are
    /// kept as separate entries, which SpMV sums.
    ///
    /// # Panics
    ///
    /// Panics if any row or column index is out of bounds.
    pub fn from_coo_generic(
        rows: usize,
        cols: usize,
        entries: impl IntoIterator<Item = (usize, usize, T)>,
    ) -> Self {
        let mut sorted: Vec<_> = entries.into_iter().collect();
        sorted.sort_unstable_by_key(|(r, c, _)| (*r, *c));

        let nnz = sorted.len();
        let mut row_ptr = vec![0usize; rows + 1];
        let mut col_indices = Vec::with_capacity(nnz);
        let mut values = Vec::with_capacity(nnz);

        for &(r, _, _) in &sorted {
            assert!(r < rows, "row index {} out of bounds (rows={})", r, rows);
            row_ptr[r + 1] += 1;
        }
        for i in 1..=rows {
            row_ptr[i] += row_ptr[i - 1];
        }

        for (_, c, v) in sorted {
            assert!(c < cols, "col index {} out of bounds (cols={})", c, cols);
            col_indices.push(c);
            values.push(v);
        }

        Self {
            row_ptr,
            col_indices,
            values,
            rows,
            cols,
        }
    }
}

impl CsrMatrix<f64> {
    /// Build a CSR matrix from COO (coordinate) triplets.
    pub fn from_coo(
        rows: usize,
        cols: usize,
        entries: impl IntoIterator<Item = (usize, usize, f64)>,
    ) -> Self {
        Self::from_coo_generic(rows, cols, entries)
    }

    /// Build a square identity matrix of dimension `n`.
    pub fn identity(n: usize) -> Self {
        Self::from_diagonal(&vec![1.0f64; n])
    }

    /// Build a square diagonal matrix `diag(d_0, ..., d_{n-1})`.
    pub fn from_diagonal(diag: &[f64]) -> Self {
        let n = diag.len();
        Self {
            row_ptr: (0..=n).collect(),
            col_indices: (0..n).collect(),
            values: diag.to_vec(),
            rows: n,
            cols: n,
        }
    }
}

impl LinearOperator for CsrMatrix<f64> {
    #[inline]
    fn rows(&self) -> usize {
        self.rows
    }

    fn apply(&self, x: &[f64], y: &mut [f64]) {
        #[cfg(feature = "parallel")]
        {
            if self.rows >= PARALLEL_ROW_THRESHOLD {
                self.par_spmv(x, y);
                return;
            }
        }
        self.spmv(x, y);
    }
}

// ---------------------------------------------------------------------------
// DenseMatrix
// ---------------------------------------------------------------------------

/// Dense row-major `f64` matrix.
#[derive(Debug, Clone, PartialEq)]
pub struct DenseMatrix {
    /// Row-major entries, length `rows * cols`.
    pub data: Vec<f64>,
    /// Number of rows.
    pub rows: usize,
    /// Number of columns.
    pub cols: usize,
}

impl DenseMatrix {
    /// Build from a list of rows.
    ///
    /// # Panics
    ///
    /// Panics if the rows have different lengths.
    pub fn from_rows(rows: &[Vec<f64>]) -> Self {
        let cols = rows.first().map_or(0, Vec::len);
        let mut data = Vec::with_capacity(rows.len() * cols);
        for (i, row) in rows.iter().enumerate() {
            assert_eq!(row.len(), cols, "row {} has length {} (expected {})", i, row.len(), cols);
            data.extend_from_slice(row);
        }
        Self {
            data,
            rows: rows.len(),
            cols,
        }
    }

    /// Build a square diagonal matrix.
    pub fn from_diagonal(diag: &[f64]) -> Self {
        let n = diag.len();
        let mut data = vec![0.0f64; n * n];
        for (i, &d) in diag.iter().enumerate() {
            data[i * n + i] = d;
        }
        Self {
            data,
            rows: n,
            cols: n,
        }
    }

    /// Entry at `(row, col)`.
    #[inline]
    pub fn get(&self, row: usize, col: usize) -> f64 {
        self.data[row * self.cols + col]
    }
}

impl LinearOperator for DenseMatrix {
    #[inline]
    fn rows(&self) -> usize {
        self.rows
    }

    fn apply(&self, x: &[f64], y: &mut [f64]) {
        debug_assert!(x.len() >= self.cols);
        debug_assert!(y.len() >= self.rows);

        for (yi, row) in y.iter_mut().zip(self.data.chunks_exact(self.cols.max(1))) {
            *yi = crate::vector::dot(row, &x[..self.cols]);
        }
    }
}

// ---------------------------------------------------------------------------
// FnOperator
// ---------------------------------------------------------------------------

/// Matrix-free operator backed by a closure computing `y = A * x`.
pub struct FnOperator<F> {
    dim: usize,
    apply_fn: F,
}

impl<F: Fn(&[f64], &mut [f64])> FnOperator<F> {
    /// Wrap `apply_fn` as an operator of dimension `dim`.
    pub fn new(dim: usize, apply_fn: F) -> Self {
        Self { dim, apply_fn }
    }
}

impl<F> fmt::Debug for FnOperator<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnOperator").field("dim", &self.dim).finish_non_exhaustive()
    }
}

impl<F: Fn(&[f64], &mut [f64])> LinearOperator for FnOperator<F> {
    #[inline]
    fn rows(&self) -> usize {
        self.dim
    }

    #[inline]
    fn apply(&self, x: &[f64], y: &mut [f64]) {
        (self.apply_fn)(x, y)
    }
}

// ---------------------------------------------------------------------------
// Solver result types
// ---------------------------------------------------------------------------

/// Algorithm identifier carried by results and events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[non_exhaustive]
pub enum Algorithm {
    /// Power iteration with Rayleigh-quotient Ritz values.
    ///
    /// Converges at rate `|lambda_2 / lambda_1|` to the eigenvector of the
    /// largest-magnitude eigenvalue.
    PowerIteration,
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Algorithm::PowerIteration => write!(f, "power-iteration"),
        }
    }
}

/// Budget constraints for solver execution.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct ComputeBudget {
    /// Maximum wall-clock time allowed.
    pub max_time: Duration,
    /// Maximum number of refinement steps.
    pub max_iterations: usize,
    /// Target Ritz residual tolerance.
    pub tolerance: f64,
}

impl Default for ComputeBudget {
    fn default() -> Self {
        Self {
            max_time: Duration::from_secs(30),
            max_iterations: 1000,
            tolerance: 1e-6,
        }
    }
}

/// Per-iteration convergence snapshot.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ConvergenceInfo {
    /// Value of the solver's iteration counter after this step.
    pub iteration: usize,
    /// Ritz value after this step.
    pub ritz_value: f64,
    /// Ritz residual norm `||A x - lambda x||` after this step.
    pub residual_norm: f64,
}

/// Result returned by a successful budgeted solve.
#[derive(Debug, Clone)]
pub struct EigenResult {
    /// Dominant eigenvalue estimate (Rayleigh quotient).
    pub eigenvalue: f64,
    /// Unit-norm eigenvector estimate.
    pub eigenvector: Vec<f64>,
    /// Number of refinement steps performed.
    pub iterations: usize,
    /// Final Ritz residual norm.
    pub residual_norm: f64,
    /// Wall-clock time taken.
    pub wall_time: Duration,
    /// Per-iteration convergence history (empty when recording is disabled).
    pub convergence_history: Vec<ConvergenceInfo>,
    /// Algorithm used.
    pub algorithm: Algorithm,
}
