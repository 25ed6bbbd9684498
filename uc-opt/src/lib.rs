//! MILP-based unit commitment optimization on top of `good_lp`.
//!
//! Given a fleet of [`Unit`](uc_model::Unit)s and a
//! [`Demand`](uc_model::Demand) profile, an [`Optimizer`] builds a mixed
//! integer linear program, solves it through a `good_lp` backend, and hands
//! back a [`Solution`](uc_model::Solution) that has already passed the
//! [`ConstraintAuditor`]. Two variants are provided: [`SinglePeriodOptimizer`]
//! for one-shot economic dispatch, and [`MultiPeriodOptimizer`] for the full
//! problem with minimum up/down time, ramp, and startup/shutdown coupling
//! across periods.

mod auditor;
mod error;
mod multi_period;
mod optimizer;
mod single_period;

pub use auditor::ConstraintAuditor;
pub use error::{
    InfeasibleCapacityError, InputShapeError, OptimizeError, SolverError, ViolationKind,
};
pub use error::ConstraintViolation;
pub use multi_period::MultiPeriodOptimizer;
pub use optimizer::{Optimizer, DEFAULT_TOLERANCE};
pub use single_period::SinglePeriodOptimizer;
