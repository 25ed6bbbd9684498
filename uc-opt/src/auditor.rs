use tracing::debug;
use uc_model::{Demand, Solution, Unit};

use crate::error::{ConstraintViolation, ViolationKind};
use crate::optimizer::DEFAULT_TOLERANCE;

/// Independently re-derives feasibility from a [`Solution`] alone.
///
/// The auditor never looks at how a solution was produced — it takes the
/// committed/dispatched arrays, the units, and the demand, and checks the
/// same physical constraints the MILP builders encode. This is what lets a
/// solver-optimal result be trusted: if the MILP has a modeling bug, the
/// auditor catches it on the very first solve it's run against.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConstraintAuditor {
    tolerance: f64,
}

impl ConstraintAuditor {
    pub fn new(tolerance: f64) -> Self {
        Self { tolerance }
    }

    pub fn tolerance(&self) -> f64 {
        self.tolerance
    }

    /// Runs every check in a fixed order, returning the first violation found.
    pub fn audit(
        &self,
        solution: &Solution,
        units: &[Unit],
        demand: &Demand,
    ) -> Result<(), ConstraintViolation> {
        self.check_power_balance(solution, demand)?;
        self.check_capacity(solution, units)?;
        self.check_ramps(solution, units)?;
        self.check_min_up_down(solution, units)?;
        debug!(num_units = units.len(), periods = demand.periods(), "audit passed");
        Ok(())
    }

    fn check_power_balance(
        &self,
        solution: &Solution,
        demand: &Demand,
    ) -> Result<(), ConstraintViolation> {
        for t in 0..demand.periods() {
            let generated = solution.total_power_at(t);
            let required = demand.get(t).expect("t < demand.periods()");
            if (generated - required).abs() > self.tolerance {
                return Err(ConstraintViolation {
                    kind: ViolationKind::PowerBalance,
                    unit_id: None,
                    period: Some(t),
                    detail: format!(
                        "generated {generated:.6} MW, required {required:.6} MW"
                    ),
                });
            }
        }
        Ok(())
    }

    fn check_capacity(&self, solution: &Solution, units: &[Unit]) -> Result<(), ConstraintViolation> {
        for (i, unit) in units.iter().enumerate() {
            for t in 0..solution.num_periods() {
                let status = solution.unit_status(i, t);
                let power = solution.unit_power(i, t);
                if status == 1 {
                    if power < unit.min_power - self.tolerance
                        || power > unit.max_power + self.tolerance
                    {
                        return Err(ConstraintViolation {
                            kind: ViolationKind::Capacity,
                            unit_id: Some(unit.id),
                            period: Some(t),
                            detail: format!(
                                "power {power:.6} MW outside capacity [{}, {}] MW",
                                unit.min_power,
                                unit.max_power
                            ),
                        });
                    }
                } else if power > self.tolerance {
                    return Err(ConstraintViolation {
                        kind: ViolationKind::Capacity,
                        unit_id: Some(unit.id),
                        period: Some(t),
                        detail: format!("unit is off but producing {power:.6} MW"),
                    });
                }
            }
        }
        Ok(())
    }

    fn check_ramps(&self, solution: &Solution, units: &[Unit]) -> Result<(), ConstraintViolation> {
        let periods = solution.num_periods();
        if periods <= 1 {
            return Ok(());
        }
        for (i, unit) in units.iter().enumerate() {
            let mut prev = unit.initial_power;
            for t in 0..periods {
                let curr = solution.unit_power(i, t);
                let change = curr - prev;
                if change > unit.ramp_up_rate.as_f64() + self.tolerance {
                    return Err(ConstraintViolation {
                        kind: ViolationKind::RampUp,
                        unit_id: Some(unit.id),
                        period: Some(t),
                        detail: format!(
                            "ramp up {change:.6} MW/period exceeds limit {:?}",
                            unit.ramp_up_rate
                        ),
                    });
                }
                if -change > unit.ramp_down_rate.as_f64() + self.tolerance {
                    return Err(ConstraintViolation {
                        kind: ViolationKind::RampDown,
                        unit_id: Some(unit.id),
                        period: Some(t),
                        detail: format!(
                            "ramp down {:.6} MW/period exceeds limit {:?}",
                            -change,
                            unit.ramp_down_rate
                        ),
                    });
                }
                prev = curr;
            }
        }
        Ok(())
    }

    fn check_min_up_down(
        &self,
        solution: &Solution,
        units: &[Unit],
    ) -> Result<(), ConstraintViolation> {
        let periods = solution.num_periods();
        for (i, unit) in units.iter().enumerate() {
            let mut prev_status = unit.initial_status as u8;
            let mut consecutive_on: u32 = if prev_status == 1 { 1 } else { 0 };
            let mut consecutive_off: u32 = if prev_status == 0 { 1 } else { 0 };

            for t in 0..periods {
                let curr_status = solution.unit_status(i, t);

                if curr_status == 1 {
                    consecutive_on += 1;
                    if prev_status == 0 {
                        if consecutive_off < unit.min_downtime {
                            return Err(ConstraintViolation {
                                kind: ViolationKind::MinDowntime,
                                unit_id: Some(unit.id),
                                period: Some(t),
                                detail: format!(
                                    "off for {consecutive_off} periods, needs {}",
                                    unit.min_downtime
                                ),
                            });
                        }
                        consecutive_off = 0;
                    }
                } else {
                    consecutive_off += 1;
                    if prev_status == 1 {
                        if consecutive_on < unit.min_uptime {
                            return Err(ConstraintViolation {
                                kind: ViolationKind::MinUptime,
                                unit_id: Some(unit.id),
                                period: Some(t),
                                detail: format!(
                                    "on for {consecutive_on} periods, needs {}",
                                    unit.min_uptime
                                ),
                            });
                        }
                        consecutive_on = 0;
                    }
                }

                prev_status = curr_status;
            }
        }
        Ok(())
    }
}

impl Default for ConstraintAuditor {
    fn default() -> Self {
        Self::new(DEFAULT_TOLERANCE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;
    use uc_model::{RampLimit, Solution};

    fn unit(id: i64) -> Unit {
        Unit::minimal(id, format!("U{id}"), 0.0, 100.0, 0.0, 0.0, 1.0).unwrap()
    }

    fn solution(status: Vec<Vec<u8>>, power: Vec<Vec<f64>>) -> Solution {
        Solution::new(status, power, 0.0, true, 0.0, BTreeMap::new())
    }

    #[test]
    fn accepts_balanced_solution() {
        let demand = Demand::new(vec![50.0]).unwrap();
        let units = vec![unit(1)];
        let sol = solution(vec![vec![1]], vec![vec![50.0]]);
        ConstraintAuditor::default().audit(&sol, &units, &demand).unwrap();
    }

    #[test]
    fn rejects_power_balance_violation() {
        let demand = Demand::new(vec![50.0]).unwrap();
        let units = vec![unit(1)];
        let sol = solution(vec![vec![1]], vec![vec![40.0]]);
        let err = ConstraintAuditor::default()
            .audit(&sol, &units, &demand)
            .unwrap_err();
        assert_eq!(err.kind, ViolationKind::PowerBalance);
    }

    #[test]
    fn rejects_off_unit_producing_power() {
        let demand = Demand::new(vec![0.0]).unwrap();
        let units = vec![unit(1)];
        let sol = solution(vec![vec![0]], vec![vec![5.0]]);
        let err = ConstraintAuditor::default()
            .audit(&sol, &units, &demand)
            .unwrap_err();
        assert_eq!(err.kind, ViolationKind::Capacity);
    }

    #[test]
    fn rejects_below_min_power_while_on() {
        let u = Unit::minimal(1, "U1", 20.0, 100.0, 0.0, 0.0, 1.0).unwrap();
        let demand = Demand::new(vec![10.0]).unwrap();
        let sol = solution(vec![vec![1]], vec![vec![10.0]]);
        let err = ConstraintAuditor::default()
            .audit(&sol, &[u], &demand)
            .unwrap_err();
        assert_eq!(err.kind, ViolationKind::Capacity);
    }

    #[test]
    fn ramp_check_skipped_for_single_period() {
        let u = Unit::new(
            1,
            "U1",
            0.0,
            100.0,
            0.0,
            0.0,
            1.0,
            1,
            1,
            RampLimit::Finite(5.0),
            RampLimit::Unbounded,
            false,
            0.0,
        )
        .unwrap();
        let demand = Demand::new(vec![90.0]).unwrap();
        let sol = solution(vec![vec![1]], vec![vec![90.0]]);
        ConstraintAuditor::default().audit(&sol, &[u], &demand).unwrap();
    }

    #[test]
    fn rejects_ramp_up_violation() {
        let u = Unit::new(
            1,
            "U1",
            0.0,
            100.0,
            0.0,
            0.0,
            1.0,
            1,
            1,
            RampLimit::Finite(20.0),
            RampLimit::Unbounded,
            true,
            0.0,
        )
        .unwrap();
        let demand = Demand::new(vec![50.0, 50.0]).unwrap();
        let sol = solution(vec![vec![1, 1]], vec![vec![50.0, 50.0]]);
        let err = ConstraintAuditor::default()
            .audit(&sol, &[u], &demand)
            .unwrap_err();
        assert_eq!(err.kind, ViolationKind::RampUp);
    }

    #[test]
    fn rejects_min_uptime_violation() {
        let u = Unit::new(
            1,
            "U1",
            0.0,
            100.0,
            0.0,
            0.0,
            1.0,
            3,
            1,
            RampLimit::Unbounded,
            RampLimit::Unbounded,
            false,
            0.0,
        )
        .unwrap();
        let other = Unit::minimal(2, "U2", 0.0, 100.0, 0.0, 0.0, 1.0).unwrap();
        let demand = Demand::new(vec![100.0, 10.0, 10.0, 100.0]).unwrap();
        // U1 on at t=0 only, then off, then on again at t=3: violates min_uptime=3.
        let sol = solution(
            vec![vec![1, 0, 0, 1], vec![0, 1, 1, 0]],
            vec![vec![100.0, 0.0, 0.0, 100.0], vec![0.0, 10.0, 10.0, 0.0]],
        );
        let err = ConstraintAuditor::default()
            .audit(&sol, &[u, other], &demand)
            .unwrap_err();
        assert_eq!(err.kind, ViolationKind::MinUptime);
    }

    #[test]
    fn audit_is_idempotent() {
        let demand = Demand::new(vec![50.0]).unwrap();
        let units = vec![unit(1)];
        let sol = solution(vec![vec![1]], vec![vec![50.0]]);
        let auditor = ConstraintAuditor::default();
        assert_eq!(auditor.audit(&sol, &units, &demand), Ok(()));
        assert_eq!(auditor.audit(&sol, &units, &demand), Ok(()));
    }
}
