//! Shared test helpers for the ruvector-eigen integration test suite.
//!
//! Provides deterministic operators with known spectra and vector comparison
//! utilities. Not every test module uses every helper.

#![allow(dead_code)]

use ruvector_eigen::types::CsrMatrix;

// ---------------------------------------------------------------------------
// Random number generator (simple LCG for deterministic reproducibility)
// ---------------------------------------------------------------------------

/// A minimal linear congruential generator for deterministic test data.
pub struct Lcg {
    state: u64,
}

impl Lcg {
    pub fn new(seed: u64) -> Self {
        Self { state: seed }
    }

    pub fn next_u64(&mut self) -> u64 {
        self.state = self.state.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
        self.state
    }

    /// Uniform f64 in [0, 1).
    pub fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    /// Uniform f64 in [lo, hi).
    pub fn next_f64_range(&mut self, lo: f64, hi: f64) -> f64 {
        lo + (hi - lo) * self.next_f64()
    }
}

/// Deterministic random vector with entries in [-1, 1).
pub fn random_vector(n: usize, seed: u64) -> Vec<f64> {
    let mut rng = Lcg::new(seed);
    (0..n).map(|_| rng.next_f64_range(-1.0, 1.0)).collect()
}

// ---------------------------------------------------------------------------
// Operators with known spectra
// ---------------------------------------------------------------------------

/// Symmetric matrix `Q diag(eigenvalues) Q^T` with a Householder reflector
/// `Q = I - 2 u u^T` for a random unit `u`.
///
/// Returns the matrix and its eigenvectors (column `i` of `Q`, paired with
/// `eigenvalues[i]`).
pub fn planted_spectrum_csr(eigenvalues: &[f64], seed: u64) -> (CsrMatrix<f64>, Vec<Vec<f64>>) {
    let n = eigenvalues.len();
    let mut u = random_vector(n, seed);
    let norm = l2_norm(&u);
    u.iter_mut().for_each(|x| *x /= norm);

    // q[i][j] = delta_ij - 2 u_i u_j (Q is symmetric, so rows == columns).
    let q: Vec<Vec<f64>> = (0..n)
        .map(|i| {
            (0..n)
                .map(|j| (if i == j { 1.0 } else { 0.0 }) - 2.0 * u[i] * u[j])
                .collect()
        })
        .collect();

    let mut entries = Vec::with_capacity(n * n);
    for i in 0..n {
        for j in 0..n {
            let a_ij: f64 = (0..n).map(|k| q[i][k] * eigenvalues[k] * q[j][k]).sum();
            if a_ij.abs() > 1e-15 {
                entries.push((i, j, a_ij));
            }
        }
    }

    (CsrMatrix::<f64>::from_coo(n, n, entries), q)
}

/// Laplacian of the path graph on `n` nodes.
///
/// Eigenvalues are `2 - 2 cos(k pi / n)` for `k = 0..n`.
pub fn path_laplacian_csr(n: usize) -> CsrMatrix<f64> {
    let mut entries = Vec::new();
    for i in 0..n {
        let degree = (i > 0) as usize + (i + 1 < n) as usize;
        entries.push((i, i, degree as f64));
        if i + 1 < n {
            entries.push((i, i + 1, -1.0));
            entries.push((i + 1, i, -1.0));
        }
    }
    CsrMatrix::<f64>::from_coo(n, n, entries)
}

/// Largest eigenvalue of [`path_laplacian_csr`].
pub fn path_laplacian_max_eigenvalue(n: usize) -> f64 {
    2.0 - 2.0 * (std::f64::consts::PI * (n - 1) as f64 / n as f64).cos()
}

/// Dense symmetric matrix `R + shift * u u^T` with `R` uniform in
/// [-0.5, 0.5) and a random unit `u`; the rank-one term separates the
/// dominant eigenvalue (close to `shift`) from the rest.
pub fn shifted_symmetric_dense(n: usize, shift: f64, seed: u64) -> Vec<Vec<f64>> {
    let mut rng = Lcg::new(seed);
    let mut u = random_vector(n, seed.wrapping_add(1));
    let norm = l2_norm(&u);
    u.iter_mut().for_each(|x| *x /= norm);

    let mut a = vec![vec![0.0; n]; n];
    for i in 0..n {
        for j in i..n {
            let r = rng.next_f64_range(-0.5, 0.5);
            a[i][j] = r + shift * u[i] * u[j];
            a[j][i] = a[i][j];
        }
    }
    a
}

// ---------------------------------------------------------------------------
// Reference eigensolver
// ---------------------------------------------------------------------------

/// All eigenvalues of a dense symmetric matrix by cyclic Jacobi rotations.
///
/// Slow but independent of the power method; only for small test matrices.
pub fn jacobi_eigenvalues(a: &[Vec<f64>]) -> Vec<f64> {
    let n = a.len();
    let mut m = a.to_vec();

    for _sweep in 0..100 {
        let off: f64 = (0..n)
            .flat_map(|i| (0..n).filter(move |&j| j != i).map(move |j| (i, j)))
            .map(|(i, j)| m[i][j] * m[i][j])
            .sum();
        if off < 1e-24 {
            break;
        }

        for p in 0..n {
            for q in (p + 1)..n {
                if m[p][q].abs() < 1e-300 {
                    continue;
                }
                let theta = (m[q][q] - m[p][p]) / (2.0 * m[p][q]);
                let t = theta.signum() / (theta.abs() + (theta * theta + 1.0).sqrt());
                let c = 1.0 / (t * t + 1.0).sqrt();
                let s = t * c;

                for row in m.iter_mut() {
                    let (mkp, mkq) = (row[p], row[q]);
                    row[p] = c * mkp - s * mkq;
                    row[q] = s * mkp + c * mkq;
                }
                for k in 0..n {
                    let (mpk, mqk) = (m[p][k], m[q][k]);
                    m[p][k] = c * mpk - s * mqk;
                    m[q][k] = s * mpk + c * mqk;
                }
            }
        }
    }

    (0..n).map(|i| m[i][i]).collect()
}

/// The eigenvalue of largest magnitude from [`jacobi_eigenvalues`].
pub fn jacobi_dominant_eigenvalue(a: &[Vec<f64>]) -> f64 {
    jacobi_eigenvalues(a)
        .into_iter()
        .fold(0.0, |best, x| if x.abs() > best.abs() { x } else { best })
}

// ---------------------------------------------------------------------------
// Comparison utilities
// ---------------------------------------------------------------------------

pub fn l2_norm(v: &[f64]) -> f64 {
    v.iter().map(|&x| x * x).sum::<f64>().sqrt()
}

pub fn l2_distance(a: &[f64], b: &[f64]) -> f64 {
    assert_eq!(a.len(), b.len(), "vectors must have same length");
    a.iter()
        .zip(b)
        .map(|(&ai, &bi)| (ai - bi) * (ai - bi))
        .sum::<f64>()
        .sqrt()
}

/// Distance between two directions, ignoring sign: `min(||a - b||, ||a + b||)`.
pub fn distance_up_to_sign(a: &[f64], b: &[f64]) -> f64 {
    let neg_b: Vec<f64> = b.iter().map(|x| -x).collect();
    l2_distance(a, b).min(l2_distance(a, &neg_b))
}
