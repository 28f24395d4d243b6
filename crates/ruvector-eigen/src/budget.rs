//! Compute budget enforcement for the budgeted eigensolver.
//!
//! [`BudgetEnforcer`] tracks refinement steps, wall-clock time, and working
//! memory against a [`ComputeBudget`]. The solver calls
//! [`check_iteration`](BudgetEnforcer::check_iteration) before every power
//! step and [`check_memory`](BudgetEnforcer::check_memory) before allocating
//! its working vectors.

use std::time::{Duration, Instant};

use crate::error::EigenError;
use crate::events::BudgetLimit;
use crate::types::ComputeBudget;

/// Default memory ceiling when none is specified (256 MiB).
const DEFAULT_MEMORY_LIMIT: usize = 256 * 1024 * 1024;

/// Enforces wall-time, iteration, and memory budgets during a solve.
///
/// One enforcer per solve.
///
/// # Example
///
/// ```
/// use ruvector_eigen::budget::BudgetEnforcer;
/// use ruvector_eigen::types::ComputeBudget;
///
/// let mut enforcer = BudgetEnforcer::new(ComputeBudget::default());
/// enforcer.check_memory(2 * 1024 * std::mem::size_of::<f64>()).unwrap();
/// enforcer.check_iteration().unwrap();
/// assert_eq!(enforcer.iterations_used(), 1);
/// ```
pub struct BudgetEnforcer {
    start_time: Instant,
    budget: ComputeBudget,
    iterations_used: usize,
    /// Tracked by the caller, not measured.
    memory_used: usize,
    memory_limit: usize,
    exhausted: Option<BudgetLimit>,
}

impl BudgetEnforcer {
    /// Create a new enforcer; the wall-clock timer starts immediately.
    pub fn new(budget: ComputeBudget) -> Self {
        Self::with_memory_limit(budget, DEFAULT_MEMORY_LIMIT)
    }

    /// Create an enforcer with a custom memory ceiling in bytes.
    pub fn with_memory_limit(budget: ComputeBudget, memory_limit: usize) -> Self {
        Self {
            start_time: Instant::now(),
            budget,
            iterations_used: 0,
            memory_used: 0,
            memory_limit,
            exhausted: None,
        }
    }

    /// Claim the next refinement step.
    ///
    /// Call once per step, before the step runs. Increments the internal
    /// counter and checks the iteration cap and the wall-clock limit.
    ///
    /// # Errors
    ///
    /// Returns [`EigenError::BudgetExhausted`] if either limit is exceeded.
    pub fn check_iteration(&mut self) -> Result<(), EigenError> {
        self.iterations_used += 1;

        if self.iterations_used > self.budget.max_iterations {
            self.exhausted = Some(BudgetLimit::Iterations);
            return Err(EigenError::BudgetExhausted {
                reason: format!(
                    "iteration limit reached ({} > {})",
                    self.iterations_used, self.budget.max_iterations,
                ),
                elapsed: self.start_time.elapsed(),
            });
        }

        let elapsed = self.start_time.elapsed();
        if elapsed > self.budget.max_time {
            self.exhausted = Some(BudgetLimit::WallTime);
            return Err(EigenError::BudgetExhausted {
                reason: format!(
                    "wall-clock time limit reached ({:.2?} > {:.2?})",
                    elapsed, self.budget.max_time,
                ),
                elapsed,
            });
        }

        Ok(())
    }

    /// Reserve `additional` bytes of working memory.
    ///
    /// On failure the counter is left unchanged.
    ///
    /// # Errors
    ///
    /// Returns [`EigenError::BudgetExhausted`] if the reservation would
    /// exceed the memory limit.
    pub fn check_memory(&mut self, additional: usize) -> Result<(), EigenError> {
        let new_total = self.memory_used.saturating_add(additional);
        if new_total > self.memory_limit {
            self.exhausted = Some(BudgetLimit::Memory);
            return Err(EigenError::BudgetExhausted {
                reason: format!(
                    "memory limit reached ({} + {} = {} > {} bytes)",
                    self.memory_used, additional, new_total, self.memory_limit,
                ),
                elapsed: self.start_time.elapsed(),
            });
        }
        self.memory_used = new_total;
        Ok(())
    }

    /// Wall-clock duration since the enforcer was created.
    #[inline]
    pub fn elapsed(&self) -> Duration {
        self.start_time.elapsed()
    }

    /// Number of steps claimed so far, including a rejected one.
    #[inline]
    pub fn iterations_used(&self) -> usize {
        self.iterations_used
    }

    /// Cumulative memory reserved so far (in bytes).
    #[inline]
    pub fn memory_used(&self) -> usize {
        self.memory_used
    }

    /// Which limit was hit, if any.
    #[inline]
    pub fn exhausted(&self) -> Option<BudgetLimit> {
        self.exhausted
    }

    /// The tolerance target from the budget.
    #[inline]
    pub fn tolerance(&self) -> f64 {
        self.budget.tolerance
    }

    /// The underlying budget.
    #[inline]
    pub fn budget(&self) -> &ComputeBudget {
        &self.budget
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn tiny_budget() -> ComputeBudget {
        ComputeBudget {
            max_time: Duration::from_secs(60),
            max_iterations: 5,
            tolerance: 1e-6,
        }
    }

    #[test]
    fn iterations_within_budget() {
        let mut enforcer = BudgetEnforcer::new(tiny_budget());
        for _ in 0..5 {
            enforcer.check_iteration().unwrap();
        }
        assert_eq!(enforcer.iterations_used(), 5);
        assert_eq!(enforcer.exhausted(), None);
    }

    #[test]
    fn iteration_limit_exceeded() {
        let mut enforcer = BudgetEnforcer::new(tiny_budget());
        for _ in 0..5 {
            enforcer.check_iteration().unwrap();
        }
        let err = enforcer.check_iteration().unwrap_err();
        match err {
            EigenError::BudgetExhausted { ref reason, .. } => {
                assert!(reason.contains("iteration"), "reason: {reason}");
            }
            other => panic!("expected BudgetExhausted, got {other:?}"),
        }
        assert_eq!(enforcer.exhausted(), Some(BudgetLimit::Iterations));
    }

    #[test]
    fn wall_clock_limit_exceeded() {
        let budget = ComputeBudget {
            max_time: Duration::from_nanos(1),
            max_iterations: 1_000_000,
            tolerance: 1e-6,
        };
        let mut enforcer = BudgetEnforcer::new(budget);
        std::thread::sleep(Duration::from_micros(10));

        let err = enforcer.check_iteration().unwrap_err();
        assert!(err.to_string().contains("wall-clock"), "{err}");
        assert_eq!(enforcer.exhausted(), Some(BudgetLimit::WallTime));
    }

    #[test]
    fn memory_limit_exceeded_leaves_counter() {
        let mut enforcer = BudgetEnforcer::with_memory_limit(tiny_budget(), 1024);
        enforcer.check_memory(800).unwrap();
        assert!(enforcer.check_memory(300).is_err());
        assert_eq!(enforcer.memory_used(), 800);
        assert_eq!(enforcer.exhausted(), Some(BudgetLimit::Memory));
    }

    #[test]
    fn memory_saturating_add_no_panic() {
        let limit = usize::MAX / 2;
        let mut enforcer = BudgetEnforcer::with_memory_limit(tiny_budget(), limit);
        enforcer.check_memory(limit - 1).unwrap();
        let err = enforcer.check_memory(usize::MAX).unwrap_err();
        assert!(matches!(err, EigenError::BudgetExhausted { .. }));
    }

    #[test]
    fn accessors() {
        let enforcer = BudgetEnforcer::new(tiny_budget());
        assert!((enforcer.tolerance() - 1e-6).abs() < f64::EPSILON);
        assert_eq!(enforcer.budget().max_iterations, 5);
    }
}
