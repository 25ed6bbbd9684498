use thiserror::Error;

/// Raised by [`crate::Unit::new`] and [`crate::Unit::minimal`] when a unit's
/// attributes fall outside the ranges the optimizer can reason about.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum InvalidUnitError {
    #[error("unit {id}: min_power must be non-negative, got {min_power}")]
    NegativeMinPower { id: i64, min_power: f64 },

    #[error("unit {id}: max_power ({max_power}) must be >= min_power ({min_power})")]
    MaxBelowMin {
        id: i64,
        min_power: f64,
        max_power: f64,
    },

    #[error("unit {id}: startup_cost, shutdown_cost and fuel_cost must be non-negative")]
    NegativeCost { id: i64 },

    #[error("unit {id}: min_uptime and min_downtime must both be >= 1 period")]
    InvalidMinRuntime { id: i64 },

    #[error("unit {id}: initial_power must be non-negative, got {initial_power}")]
    NegativeInitialPower { id: i64, initial_power: f64 },
}

/// Raised by [`crate::Demand::new`] when the demand profile itself is
/// malformed, independent of any unit or optimizer.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum InvalidDemandError {
    #[error("demand values cannot be empty")]
    Empty,

    #[error("demand value at period {period} is negative: {value}")]
    Negative { period: usize, value: f64 },
}
