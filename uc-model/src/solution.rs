use std::collections::BTreeMap;

/// A tagged value in a [`Solution`]'s metadata map — the typed replacement
/// for the source's loosely-typed solver-status dict.
#[derive(Debug, Clone, PartialEq)]
pub enum MetadataValue {
    Text(String),
    Int(i64),
    Float(f64),
}

impl MetadataValue {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            MetadataValue::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            MetadataValue::Int(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_float(&self) -> Option<f64> {
        match self {
            MetadataValue::Float(v) => Some(*v),
            _ => None,
        }
    }
}

/// A unit commitment solution: per-unit, per-period commitment and
/// dispatch, plus the objective value and solver bookkeeping.
///
/// Produced exclusively by an `Optimizer` implementation (see the `uc-opt`
/// crate) and never mutated afterwards. `Unit`/`Demand` are only borrowed
/// while a `Solution` is built; the `Solution` itself owns its arrays
/// outright.
#[derive(Debug, Clone, PartialEq)]
pub struct Solution {
    status: Vec<Vec<u8>>,
    power: Vec<Vec<f64>>,
    total_cost: f64,
    is_optimal: bool,
    solve_time: f64,
    metadata: BTreeMap<String, MetadataValue>,
}

impl Solution {
    /// Builds a `Solution`. Panics (via `debug_assert!`) if `status`/`power`
    /// aren't rectangular with matching shapes — that's an optimizer bug,
    /// not a user input error, so it isn't part of the public error
    /// taxonomy.
    pub fn new(
        status: Vec<Vec<u8>>,
        power: Vec<Vec<f64>>,
        total_cost: f64,
        is_optimal: bool,
        solve_time: f64,
        metadata: BTreeMap<String, MetadataValue>,
    ) -> Self {
        debug_assert_eq!(status.len(), power.len(), "status/power row count mismatch");
        if let Some(periods) = status.first().map(Vec::len) {
            debug_assert!(
                status.iter().all(|row| row.len() == periods),
                "status rows are not rectangular"
            );
            debug_assert!(
                power.iter().all(|row| row.len() == periods),
                "power rows are not rectangular"
            );
        }
        Self {
            status,
            power,
            total_cost,
            is_optimal,
            solve_time,
            metadata,
        }
    }

    pub fn unit_status(&self, unit: usize, period: usize) -> u8 {
        self.status[unit][period]
    }

    pub fn unit_power(&self, unit: usize, period: usize) -> f64 {
        self.power[unit][period]
    }

    pub fn total_power_at(&self, period: usize) -> f64 {
        self.power.iter().map(|row| row[period]).sum()
    }

    pub fn num_units(&self) -> usize {
        self.status.len()
    }

    pub fn num_periods(&self) -> usize {
        self.status.first().map_or(0, Vec::len)
    }

    pub fn status(&self) -> &[Vec<u8>] {
        &self.status
    }

    pub fn power(&self) -> &[Vec<f64>] {
        &self.power
    }

    pub fn total_cost(&self) -> f64 {
        self.total_cost
    }

    pub fn is_optimal(&self) -> bool {
        self.is_optimal
    }

    pub fn solve_time(&self) -> f64 {
        self.solve_time
    }

    pub fn metadata(&self) -> &BTreeMap<String, MetadataValue> {
        &self.metadata
    }
}
