use crate::error::InvalidUnitError;

/// A ramp rate limit, or the absence of one.
///
/// The source this model is drawn from represents "no limit" with
/// `float('inf')`; a typed core prefers an explicit tag over a magic
/// sentinel so constraint emission can match on it directly.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RampLimit {
    Finite(f64),
    Unbounded,
}

impl RampLimit {
    /// The rate as an `f64`, with `Unbounded` mapped to `f64::INFINITY` so
    /// callers that just want a bound (the auditor) don't need to match.
    pub fn as_f64(&self) -> f64 {
        match self {
            RampLimit::Finite(rate) => *rate,
            RampLimit::Unbounded => f64::INFINITY,
        }
    }

    pub fn is_finite(&self) -> bool {
        matches!(self, RampLimit::Finite(_))
    }
}

impl Default for RampLimit {
    fn default() -> Self {
        RampLimit::Unbounded
    }
}

/// A dispatchable generation unit and its operational characteristics.
///
/// Construct through [`Unit::new`] (all thirteen fields) or [`Unit::minimal`]
/// (just the required seven, with sensible defaults for the rest) — both
/// validate and return `Err` on an inconsistent unit rather than leaving
/// callers to check the fields afterward.
#[derive(Debug, Clone, PartialEq)]
pub struct Unit {
    pub id: i64,
    pub name: String,
    pub min_power: f64,
    pub max_power: f64,
    pub startup_cost: f64,
    pub shutdown_cost: f64,
    pub fuel_cost: f64,
    pub min_uptime: u32,
    pub min_downtime: u32,
    pub ramp_up_rate: RampLimit,
    pub ramp_down_rate: RampLimit,
    pub initial_status: bool,
    pub initial_power: f64,
}

impl Unit {
    /// Create a unit with every field given explicitly.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        id: i64,
        name: impl Into<String>,
        min_power: f64,
        max_power: f64,
        startup_cost: f64,
        shutdown_cost: f64,
        fuel_cost: f64,
        min_uptime: u32,
        min_downtime: u32,
        ramp_up_rate: RampLimit,
        ramp_down_rate: RampLimit,
        initial_status: bool,
        initial_power: f64,
    ) -> Result<Self, InvalidUnitError> {
        if min_power < 0.0 {
            return Err(InvalidUnitError::NegativeMinPower { id, min_power });
        }
        if max_power < min_power {
            return Err(InvalidUnitError::MaxBelowMin {
                id,
                min_power,
                max_power,
            });
        }
        if startup_cost < 0.0 || shutdown_cost < 0.0 || fuel_cost < 0.0 {
            return Err(InvalidUnitError::NegativeCost { id });
        }
        if min_uptime < 1 || min_downtime < 1 {
            return Err(InvalidUnitError::InvalidMinRuntime { id });
        }
        if initial_power < 0.0 {
            return Err(InvalidUnitError::NegativeInitialPower { id, initial_power });
        }

        Ok(Unit {
            id,
            name: name.into(),
            min_power,
            max_power,
            startup_cost,
            shutdown_cost,
            fuel_cost,
            min_uptime,
            min_downtime,
            ramp_up_rate,
            ramp_down_rate,
            initial_status,
            initial_power,
        })
    }

    /// Create a unit with minimal information: unbounded ramps, a one-period
    /// minimum up/down time, and starting offline at zero output.
    pub fn minimal(
        id: i64,
        name: impl Into<String>,
        min_power: f64,
        max_power: f64,
        startup_cost: f64,
        shutdown_cost: f64,
        fuel_cost: f64,
    ) -> Result<Self, InvalidUnitError> {
        Self::new(
            id,
            name,
            min_power,
            max_power,
            startup_cost,
            shutdown_cost,
            fuel_cost,
            1,
            1,
            RampLimit::Unbounded,
            RampLimit::Unbounded,
            false,
            0.0,
        )
    }

    /// Whether `power` falls within this unit's committed output range.
    pub fn can_produce(&self, power: f64) -> bool {
        self.min_power <= power && power <= self.max_power
    }

    /// The linear production cost of running at `power`, or `None` if
    /// `power` is outside `[min_power, max_power]`. `None` rather than a
    /// raised error for the same reason as [`crate::Demand::get`]: an
    /// out-of-range query here is a routine, recoverable caller mistake,
    /// not a crate-internal bug.
    pub fn production_cost(&self, power: f64) -> Option<f64> {
        self.can_produce(power).then(|| power * self.fuel_cost)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid() -> Unit {
        Unit::minimal(1, "U1", 10.0, 100.0, 50.0, 20.0, 5.0).unwrap()
    }

    #[test]
    fn minimal_applies_defaults() {
        let unit = valid();
        assert_eq!(unit.min_uptime, 1);
        assert_eq!(unit.min_downtime, 1);
        assert_eq!(unit.ramp_up_rate, RampLimit::Unbounded);
        assert!(!unit.initial_status);
        assert_eq!(unit.initial_power, 0.0);
    }

    #[test]
    fn rejects_negative_min_power() {
        let err = Unit::minimal(1, "U1", -1.0, 100.0, 0.0, 0.0, 0.0).unwrap_err();
        assert_eq!(
            err,
            InvalidUnitError::NegativeMinPower {
                id: 1,
                min_power: -1.0
            }
        );
    }

    #[test]
    fn rejects_max_below_min() {
        let err = Unit::minimal(2, "U2", 50.0, 10.0, 0.0, 0.0, 0.0).unwrap_err();
        assert_eq!(
            err,
            InvalidUnitError::MaxBelowMin {
                id: 2,
                min_power: 50.0,
                max_power: 10.0
            }
        );
    }

    #[test]
    fn rejects_negative_costs() {
        let err = Unit::minimal(3, "U3", 0.0, 10.0, -5.0, 0.0, 0.0).unwrap_err();
        assert_eq!(err, InvalidUnitError::NegativeCost { id: 3 });
    }

    #[test]
    fn rejects_zero_min_uptime() {
        let err = Unit::new(
            1,
            "U1",
            10.0,
            100.0,
            50.0,
            20.0,
            5.0,
            0,
            1,
            RampLimit::Unbounded,
            RampLimit::Unbounded,
            false,
            0.0,
        )
        .unwrap_err();
        assert_eq!(err, InvalidUnitError::InvalidMinRuntime { id: 1 });
    }

    #[test]
    fn can_produce_checks_range() {
        let unit = valid();
        assert!(unit.can_produce(10.0));
        assert!(unit.can_produce(100.0));
        assert!(!unit.can_produce(9.9));
        assert!(!unit.can_produce(100.1));
    }

    #[test]
    fn ramp_limit_as_f64() {
        assert_eq!(RampLimit::Finite(20.0).as_f64(), 20.0);
        assert!(RampLimit::Unbounded.as_f64().is_infinite());
    }

    #[test]
    fn production_cost_in_range() {
        let unit = Unit::minimal(1, "U1", 10.0, 100.0, 0.0, 0.0, 5.0).unwrap();
        assert_eq!(unit.production_cost(20.0), Some(100.0));
    }

    #[test]
    fn production_cost_out_of_range() {
        let unit = valid();
        assert_eq!(unit.production_cost(9.9), None);
        assert_eq!(unit.production_cost(100.1), None);
    }
}
