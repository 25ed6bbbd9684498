use uc_model::{Demand, Solution, Unit};

use crate::error::OptimizeError;

/// Numerical tolerance used throughout capacity pre-checks and audit
/// comparisons, unless a caller overrides it at construction.
pub const DEFAULT_TOLERANCE: f64 = 1e-6;

/// Shared contract for unit commitment optimizer variants.
///
/// `validate_inputs` is a total feasibility pre-check: it never touches the
/// solver and either succeeds or returns the specific reason it can't.
/// `optimize` must call `validate_inputs` before doing any solver work, and
/// must run the constraint auditor over a solver-optimal result before
/// returning it.
///
/// Implementors hold nothing but a tolerance and a
/// [`ConstraintAuditor`](crate::ConstraintAuditor) built from the same
/// tolerance, so a single instance may be called concurrently from
/// multiple threads: every call builds and solves its own `good_lp`
/// problem.
pub trait Optimizer {
    fn validate_inputs(&self, units: &[Unit], demand: &Demand) -> Result<(), OptimizeError>;

    fn optimize(&self, units: &[Unit], demand: &Demand) -> Result<Solution, OptimizeError>;
}
