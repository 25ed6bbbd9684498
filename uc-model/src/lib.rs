//! Value types for the unit commitment problem.
//!
//! This crate only knows about `Unit`, `Demand`, and `Solution` plus the
//! invariants checked when they are built. It does not know how to build a
//! MILP from them or how to solve one — that's `uc-opt`.

mod demand;
mod error;
mod solution;
mod unit;

pub use demand::Demand;
pub use error::{InvalidDemandError, InvalidUnitError};
pub use solution::{MetadataValue, Solution};
pub use unit::{RampLimit, Unit};
