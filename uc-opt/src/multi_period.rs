use std::collections::BTreeMap;
use std::time::Instant;

use good_lp::{constraint, variable, Expression, ProblemVariables, Solution as LpSolution, SolverModel};
use tracing::{debug, info, warn};
use uc_model::{Demand, MetadataValue, RampLimit, Solution, Unit};

use crate::error::{InfeasibleCapacityError, InputShapeError, OptimizeError};
use crate::optimizer::{Optimizer, DEFAULT_TOLERANCE};
use crate::single_period::infeasibility_label;
use crate::ConstraintAuditor;

/// Full unit commitment across a horizon of two or more periods: minimum
/// up/down time, ramp limits, and startup/shutdown accounting couple
/// adjacent periods together.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MultiPeriodOptimizer {
    tolerance: f64,
    auditor: ConstraintAuditor,
}

impl MultiPeriodOptimizer {
    pub fn new(tolerance: f64) -> Self {
        Self {
            tolerance,
            auditor: ConstraintAuditor::new(tolerance),
        }
    }

    pub fn tolerance(&self) -> f64 {
        self.tolerance
    }
}

impl Default for MultiPeriodOptimizer {
    fn default() -> Self {
        Self::new(DEFAULT_TOLERANCE)
    }
}

impl Optimizer for MultiPeriodOptimizer {
    fn validate_inputs(&self, units: &[Unit], demand: &Demand) -> Result<(), OptimizeError> {
        if units.is_empty() {
            return Err(InputShapeError::EmptyUnitList.into());
        }
        if demand.periods() < 2 {
            return Err(InputShapeError::MultiPeriodRequiresAtLeastTwoPeriods {
                actual: demand.periods(),
            }
            .into());
        }

        let total_capacity: f64 = units.iter().map(|unit| unit.max_power).sum();
        let peak = demand.peak();
        if total_capacity < peak - self.tolerance {
            return Err(InfeasibleCapacityError {
                total_capacity,
                required: peak,
            }
            .into());
        }

        Ok(())
    }

    fn optimize(&self, units: &[Unit], demand: &Demand) -> Result<Solution, OptimizeError> {
        self.validate_inputs(units, demand)?;

        let n = units.len();
        let t_total = demand.periods();
        debug!(num_units = n, periods = t_total, "building multi-period model");

        let mut vars = ProblemVariables::new();
        let mut u = vec![Vec::with_capacity(t_total); n];
        let mut p = vec![Vec::with_capacity(t_total); n];
        let mut v = vec![Vec::with_capacity(t_total); n];
        let mut w = vec![Vec::with_capacity(t_total); n];

        for i in 0..n {
            for t in 0..t_total {
                u[i].push(vars.add(variable().binary().name(format!("u_{i}_{t}"))));
                p[i].push(vars.add(
                    variable()
                        .min(0.0)
                        .max(units[i].max_power)
                        .name(format!("p_{i}_{t}")),
                ));
                v[i].push(vars.add(variable().binary().name(format!("v_{i}_{t}"))));
                w[i].push(vars.add(variable().binary().name(format!("w_{i}_{t}"))));
            }
        }

        let mut objective = Expression::default();
        for i in 0..n {
            for t in 0..t_total {
                objective += v[i][t] * units[i].startup_cost;
                objective += w[i][t] * units[i].shutdown_cost;
                objective += p[i][t] * units[i].fuel_cost;
            }
        }

        let mut model = vars.minimise(objective.clone()).using(good_lp::highs);

        // 1. Power balance.
        for t in 0..t_total {
            let total: Expression = (0..n).map(|i| Expression::from(p[i][t])).sum();
            let required = demand.get(t).expect("t < demand.periods()");
            model = model.with(constraint!(total == required));
        }

        for i in 0..n {
            let unit = &units[i];
            for t in 0..t_total {
                // 2. Capacity.
                model = model.with(constraint!(p[i][t] >= u[i][t] * unit.min_power));
                model = model.with(constraint!(p[i][t] <= u[i][t] * unit.max_power));

                // 3. State transition: u[i,-1] := initial_status.
                let prev_u: Expression = if t == 0 {
                    Expression::from(if unit.initial_status { 1.0 } else { 0.0 })
                } else {
                    Expression::from(u[i][t - 1])
                };
                model = model.with(constraint!(v[i][t] - w[i][t] == u[i][t] - prev_u));
            }

            // 4. Minimum uptime, omitted past the tail of the horizon.
            let min_up = unit.min_uptime as usize;
            for t in 0..t_total {
                if t + min_up <= t_total {
                    let run: Expression = (t..t + min_up).map(|tau| Expression::from(u[i][tau])).sum();
                    model = model.with(constraint!(run >= v[i][t] * (min_up as f64)));
                }
            }

            // 5. Minimum downtime, same tail policy.
            let min_down = unit.min_downtime as usize;
            for t in 0..t_total {
                if t + min_down <= t_total {
                    let off_run: Expression = (t..t + min_down)
                        .map(|tau| Expression::from(1.0) - Expression::from(u[i][tau]))
                        .sum();
                    model = model.with(constraint!(off_run >= w[i][t] * (min_down as f64)));
                }
            }

            // 6. Ramp rates, conditional on finiteness, regardless of commitment.
            let ramp_up = unit.ramp_up_rate;
            let ramp_down = unit.ramp_down_rate;
            if ramp_up.is_finite() || ramp_down.is_finite() {
                for t in 0..t_total {
                    let prev_power: Expression = if t == 0 {
                        Expression::from(unit.initial_power)
                    } else {
                        Expression::from(p[i][t - 1])
                    };
                    if let RampLimit::Finite(rate) = ramp_up {
                        model = model.with(constraint!(p[i][t] - prev_power.clone() <= rate));
                    }
                    if let RampLimit::Finite(rate) = ramp_down {
                        model = model.with(constraint!(prev_power - p[i][t] <= rate));
                    }
                }
            }
        }

        let start = Instant::now();
        let solved = model.solve();
        let solve_time = start.elapsed().as_secs_f64();

        match solved {
            Ok(solution) => {
                let status: Vec<Vec<u8>> = (0..n)
                    .map(|i| {
                        (0..t_total)
                            .map(|t| if solution.value(u[i][t]) > 0.5 { 1 } else { 0 })
                            .collect()
                    })
                    .collect();
                let power: Vec<Vec<f64>> = (0..n)
                    .map(|i| (0..t_total).map(|t| solution.value(p[i][t])).collect())
                    .collect();
                let total_cost = solution.eval(objective);

                let total_startups: i64 = (0..n)
                    .flat_map(|i| (0..t_total).map(move |t| (i, t)))
                    .map(|(i, t)| if solution.value(v[i][t]) > 0.5 { 1 } else { 0 })
                    .sum();
                let total_shutdowns: i64 = (0..n)
                    .flat_map(|i| (0..t_total).map(move |t| (i, t)))
                    .map(|(i, t)| if solution.value(w[i][t]) > 0.5 { 1 } else { 0 })
                    .sum();
                let units_on_periods: i64 = status
                    .iter()
                    .flat_map(|row| row.iter())
                    .map(|&s| s as i64)
                    .sum();
                let avg_units_on = units_on_periods as f64 / t_total as f64;

                let mut metadata = BTreeMap::new();
                metadata.insert(
                    "solver_status".to_string(),
                    MetadataValue::Text("Optimal".to_string()),
                );
                metadata.insert("num_units".to_string(), MetadataValue::Int(n as i64));
                metadata.insert("num_periods".to_string(), MetadataValue::Int(t_total as i64));
                metadata.insert("total_demand".to_string(), MetadataValue::Float(demand.total()));
                metadata.insert("peak_demand".to_string(), MetadataValue::Float(demand.peak()));
                metadata.insert("total_startups".to_string(), MetadataValue::Int(total_startups));
                metadata.insert("total_shutdowns".to_string(), MetadataValue::Int(total_shutdowns));
                metadata.insert("avg_units_on".to_string(), MetadataValue::Float(avg_units_on));

                let solution = Solution::new(status, power, total_cost, true, solve_time, metadata);
                info!(total_cost, solve_time, "multi-period solve complete");

                self.auditor.audit(&solution, units, demand)?;
                Ok(solution)
            }
            Err(err @ (good_lp::ResolutionError::Infeasible | good_lp::ResolutionError::Unbounded)) => {
                warn!(?err, "multi-period solve did not reach optimality");
                let status_label = infeasibility_label(&err);
                let status = vec![vec![0u8; t_total]; n];
                let power = vec![vec![0.0f64; t_total]; n];

                let mut metadata = BTreeMap::new();
                metadata.insert(
                    "solver_status".to_string(),
                    MetadataValue::Text(status_label.to_string()),
                );
                metadata.insert("num_units".to_string(), MetadataValue::Int(n as i64));
                metadata.insert("num_periods".to_string(), MetadataValue::Int(t_total as i64));

                Ok(Solution::new(status, power, 0.0, false, solve_time, metadata))
            }
            Err(err) => Err(OptimizeError::from(err)),
        }
    }
}


/// Property-based tests mirroring `single_period::properties`. Fleets have
/// `min_power = 0`, `min_uptime = min_downtime = 1`, and unbounded ramps, so
/// every period can be dispatched independently of its neighbours: the
/// temporal coupling constraints never bind, which keeps every generated
/// instance feasible while still exercising the full (i,t) variable grid.
#[cfg(test)]
mod properties {
    use super::*;
    use proptest::prelude::*;

    fn units_and_demand() -> impl Strategy<Value = (Vec<Unit>, Demand)> {
        (
            proptest::collection::vec((1.0..100.0f64, 0.0..20.0f64), 1..=3),
            2..=4usize,
        )
            .prop_flat_map(|(fleet, periods)| {
                let total_capacity: f64 = fleet.iter().map(|(max, _)| max).sum();
                (
                    Just(fleet),
                    proptest::collection::vec(0.0..=total_capacity, periods),
                )
            })
            .prop_map(|(fleet, demand_values)| {
                let units = fleet
                    .into_iter()
                    .enumerate()
                    .map(|(i, (max_power, fuel_cost))| {
                        Unit::minimal(i as i64, format!("U{i}"), 0.0, max_power, 0.0, 0.0, fuel_cost).unwrap()
                    })
                    .collect();
                (units, Demand::new(demand_values).unwrap())
            })
    }

    proptest! {
        // Invariant 1, 2, 3.
        #[test]
        fn optimal_solution_is_well_formed((units, demand) in units_and_demand()) {
            let solution = MultiPeriodOptimizer::default().optimize(&units, &demand).unwrap();

            prop_assert!(solution.is_optimal());
            prop_assert_eq!(solution.num_units(), units.len());
            prop_assert_eq!(solution.num_periods(), demand.periods());

            for i in 0..units.len() {
                for t in 0..demand.periods() {
                    let status = solution.unit_status(i, t);
                    prop_assert!(status == 0 || status == 1);
                    prop_assert!(solution.unit_power(i, t) >= 0.0);
                }
            }

            ConstraintAuditor::default().audit(&solution, &units, &demand).unwrap();
        }

        // Invariant 6.
        #[test]
        fn determinism((units, demand) in units_and_demand()) {
            let optimizer = MultiPeriodOptimizer::default();
            let first = optimizer.optimize(&units, &demand).unwrap();
            let second = optimizer.optimize(&units, &demand).unwrap();
            prop_assert!((first.total_cost() - second.total_cost()).abs() < 1e-6);
        }
    }
}
