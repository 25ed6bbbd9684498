use thiserror::Error;

/// The demand profile has the wrong number of periods for the optimizer
/// variant it was handed to.
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum InputShapeError {
    #[error("no units provided")]
    EmptyUnitList,

    #[error("single-period optimizer requires exactly 1 demand period, got {actual}")]
    SinglePeriodRequiresOnePeriod { actual: usize },

    #[error("multi-period optimizer requires at least 2 demand periods, got {actual}")]
    MultiPeriodRequiresAtLeastTwoPeriods { actual: usize },
}

/// The fleet's combined `max_power` cannot cover the demand it's being
/// asked to serve, so no feasible dispatch can exist.
#[derive(Debug, Clone, Copy, PartialEq, Error)]
#[error("insufficient fleet capacity: {total_capacity:.3} MW available, {required:.3} MW required")]
pub struct InfeasibleCapacityError {
    pub total_capacity: f64,
    pub required: f64,
}

/// The solver backend failed in a way that isn't a clean
/// infeasible/unbounded status — those are reported through
/// [`uc_model::Solution::is_optimal`] instead, not as an error.
#[derive(Debug, Error)]
#[error("solver backend failed: {0}")]
pub struct SolverError(#[from] good_lp::ResolutionError);

/// The kind of constraint the [`crate::ConstraintAuditor`] found broken.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViolationKind {
    PowerBalance,
    Capacity,
    RampUp,
    RampDown,
    MinUptime,
    MinDowntime,
}

/// A solution that the auditor rejected. Carries enough context to locate
/// the offending unit/period without re-deriving it from `detail`.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("{kind:?} violated (unit={unit_id:?}, period={period:?}): {detail}")]
pub struct ConstraintViolation {
    pub kind: ViolationKind,
    pub unit_id: Option<i64>,
    pub period: Option<usize>,
    pub detail: String,
}

/// The union of everything [`crate::Optimizer::validate_inputs`] and
/// [`crate::Optimizer::optimize`] can fail with.
#[derive(Debug, Error)]
pub enum OptimizeError {
    #[error(transparent)]
    InputShape(#[from] InputShapeError),

    #[error(transparent)]
    InfeasibleCapacity(#[from] InfeasibleCapacityError),

    #[error(transparent)]
    Solver(#[from] SolverError),

    #[error(transparent)]
    ConstraintViolation(#[from] ConstraintViolation),
}

impl From<good_lp::ResolutionError> for OptimizeError {
    fn from(err: good_lp::ResolutionError) -> Self {
        OptimizeError::Solver(SolverError(err))
    }
}
