//! Dense `f64` vector primitives used by the power method.
//!
//! Dot products use a 4-wide accumulator to shorten the floating-point
//! dependency chain. All functions assume equal-length inputs.

use rand::Rng;

/// Dot product `a . b` with 4-wide accumulation.
///
/// # Panics
///
/// Panics if `a.len() != b.len()`.
#[inline]
pub fn dot(a: &[f64], b: &[f64]) -> f64 {
    assert_eq!(a.len(), b.len(), "dot: length mismatch");

    let n = a.len();
    let chunks = n / 4;

    let mut acc0: f64 = 0.0;
    let mut acc1: f64 = 0.0;
    let mut acc2: f64 = 0.0;
    let mut acc3: f64 = 0.0;

    for i in 0..chunks {
        let j = i * 4;
        acc0 += a[j] * b[j];
        acc1 += a[j + 1] * b[j + 1];
        acc2 += a[j + 2] * b[j + 2];
        acc3 += a[j + 3] * b[j + 3];
    }

    for j in (chunks * 4)..n {
        acc0 += a[j] * b[j];
    }

    (acc0 + acc1) + (acc2 + acc3)
}

/// Euclidean norm `||v||_2`.
#[inline]
pub fn l2_norm(v: &[f64]) -> f64 {
    dot(v, v).sqrt()
}

/// Scale `v` to unit Euclidean norm in place and return its previous norm.
///
/// A zero vector is left unchanged (the returned norm is `0.0`); callers
/// that care must check the return value.
#[inline]
pub fn normalize(v: &mut [f64]) -> f64 {
    let norm = l2_norm(v);
    if norm > 0.0 {
        let inv = 1.0 / norm;
        for x in v.iter_mut() {
            *x *= inv;
        }
    }
    norm
}

/// Residual-style difference `a - s * b`.
///
/// # Panics
///
/// Panics if `a.len() != b.len()`.
#[inline]
pub fn scaled_sub(a: &[f64], s: f64, b: &[f64]) -> Vec<f64> {
    assert_eq!(a.len(), b.len(), "scaled_sub: length mismatch");
    a.iter().zip(b).map(|(&ai, &bi)| ai - s * bi).collect()
}

/// Draw a vector uniformly from `[-1, 1]^n` and normalise it.
///
/// Redraws in the (measure-zero) event of an all-zero sample so the result
/// always has unit norm for `n > 0`.
pub fn random_unit_vector<R: Rng + ?Sized>(n: usize, rng: &mut R) -> Vec<f64> {
    loop {
        let mut v: Vec<f64> = (0..n).map(|_| rng.gen_range(-1.0..=1.0)).collect();
        if normalize(&mut v) > 0.0 || n == 0 {
            return v;
        }
    }
}
