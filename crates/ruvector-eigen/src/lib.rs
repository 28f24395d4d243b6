//! Dominant eigenpair computation for the ruvector ecosystem.
//!
//! This crate extracts the largest-magnitude eigenvalue and its eigenvector
//! from a linear operator using the power method. The operator is anything
//! implementing [`LinearOperator`](traits::LinearOperator): a sparse
//! [`CsrMatrix`](types::CsrMatrix), a [`DenseMatrix`](types::DenseMatrix), or
//! a matrix-free closure wrapped in [`FnOperator`](types::FnOperator).
//!
//! # Layers
//!
//! | Type | Module | Contract |
//! |------|--------|----------|
//! | [`PowerMethod`](power::PowerMethod) | `power` | Stateful Ritz pair, `compute` returns `bool` |
//! | [`PowerIterationSolver`](solver::PowerIterationSolver) | `solver` | Budgeted, returns `Result<EigenResult, EigenError>` |
//!
//! # Example
//!
//! ```rust
//! use ruvector_eigen::power::PowerMethod;
//! use ruvector_eigen::types::CsrMatrix;
//!
//! let a = CsrMatrix::<f64>::from_diagonal(&[3.0, 1.0]);
//! let mut pm = PowerMethod::new(&a, Some(vec![1.0, 1.0]));
//!
//! assert!(pm.compute(100, 1e-6));
//! assert!((pm.eigenvalue() - 3.0).abs() < 1e-6);
//! ```

pub mod budget;
pub mod error;
pub mod events;
pub mod power;
pub mod solver;
pub mod traits;
pub mod types;
pub mod validation;
pub mod vector;
