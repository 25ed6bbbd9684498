use std::collections::BTreeMap;
use std::time::Instant;

use good_lp::{constraint, variable, Expression, ProblemVariables, Solution as LpSolution, SolverModel};
use tracing::{debug, info, warn};
use uc_model::{Demand, MetadataValue, Solution, Unit};

use crate::error::{InfeasibleCapacityError, InputShapeError, OptimizeError};
use crate::optimizer::{Optimizer, DEFAULT_TOLERANCE};
use crate::ConstraintAuditor;

/// Economic dispatch with an on/off decision, no temporal coupling.
/// Applicable only to a [`Demand`] with exactly one period.
///
/// `shutdown_cost` and `initial_status` are intentionally ignored here:
/// a standalone single-period snapshot has no history to charge a
/// shutdown or an already-running unit against. This is a known,
/// flagged simplification inherited from the model this optimizer is
/// drawn from, not an oversight.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SinglePeriodOptimizer {
    tolerance: f64,
    auditor: ConstraintAuditor,
}

impl SinglePeriodOptimizer {
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

impl Default for SinglePeriodOptimizer {
    fn default() -> Self {
        Self::new(DEFAULT_TOLERANCE)
    }
}

impl Optimizer for SinglePeriodOptimizer {
    fn validate_inputs(&self, units: &[Unit], demand: &Demand) -> Result<(), OptimizeError> {
        if units.is_empty() {
            return Err(InputShapeError::EmptyUnitList.into());
        }
        if demand.periods() != 1 {
            return Err(InputShapeError::SinglePeriodRequiresOnePeriod {
                actual: demand.periods(),
            }
            .into());
        }

        let total_capacity: f64 = units.iter().map(|unit| unit.max_power).sum();
        let required = demand.get(0).expect("validated: exactly one period");
        if total_capacity < required - self.tolerance {
            return Err(InfeasibleCapacityError {
                total_capacity,
                required,
            }
            .into());
        }

        Ok(())
    }

    fn optimize(&self, units: &[Unit], demand: &Demand) -> Result<Solution, OptimizeError> {
        self.validate_inputs(units, demand)?;

        let n = units.len();
        let required = demand.get(0).expect("validated: exactly one period");
        debug!(num_units = n, demand = required, "building single-period model");

        let mut vars = ProblemVariables::new();
        let mut u = Vec::with_capacity(n);
        let mut p = Vec::with_capacity(n);
        for (i, unit) in units.iter().enumerate() {
            u.push(vars.add(variable().binary().name(format!("u_{i}"))));
            p.push(vars.add(
                variable()
                    .min(0.0)
                    .max(unit.max_power)
                    .name(format!("p_{i}")),
            ));
        }

        let mut objective = Expression::default();
        for (i, unit) in units.iter().enumerate() {
            objective += u[i] * unit.startup_cost;
            objective += p[i] * unit.fuel_cost;
        }

        let mut model = vars.minimise(objective.clone()).using(good_lp::highs);

        let balance: Expression = p.iter().map(|&v| Expression::from(v)).sum();
        model = model.with(constraint!(balance == required));

        for (i, unit) in units.iter().enumerate() {
            model = model.with(constraint!(p[i] >= u[i] * unit.min_power));
            model = model.with(constraint!(p[i] <= u[i] * unit.max_power));
        }

        let start = Instant::now();
        let solved = model.solve();
        let solve_time = start.elapsed().as_secs_f64();

        match solved {
            Ok(solution) => {
                let status: Vec<Vec<u8>> = (0..n)
                    .map(|i| vec![if solution.value(u[i]) > 0.5 { 1 } else { 0 }])
                    .collect();
                let power: Vec<Vec<f64>> = (0..n).map(|i| vec![solution.value(p[i])]).collect();
                let total_cost = solution.eval(objective);
                let units_on: i64 = status.iter().map(|row| row[0] as i64).sum();

                let mut metadata = BTreeMap::new();
                metadata.insert(
                    "solver_status".to_string(),
                    MetadataValue::Text("Optimal".to_string()),
                );
                metadata.insert("num_units".to_string(), MetadataValue::Int(n as i64));
                metadata.insert("demand".to_string(), MetadataValue::Float(required));
                metadata.insert("units_on".to_string(), MetadataValue::Int(units_on));

                let solution = Solution::new(status, power, total_cost, true, solve_time, metadata);
                info!(total_cost, solve_time, "single-period solve complete");

                self.auditor.audit(&solution, units, demand)?;
                Ok(solution)
            }
            Err(err @ (good_lp::ResolutionError::Infeasible | good_lp::ResolutionError::Unbounded)) => {
                warn!(?err, "single-period solve did not reach optimality");
                let status_label = infeasibility_label(&err);
                let status = vec![vec![0u8]; n];
                let power = vec![vec![0.0f64]; n];

                let mut metadata = BTreeMap::new();
                metadata.insert(
                    "solver_status".to_string(),
                    MetadataValue::Text(status_label.to_string()),
                );
                metadata.insert("num_units".to_string(), MetadataValue::Int(n as i64));
                metadata.insert("demand".to_string(), MetadataValue::Float(required));

                Ok(Solution::new(status, power, 0.0, false, solve_time, metadata))
            }
            Err(err) => Err(OptimizeError::from(err)),
        }
    }
}

pub(crate) fn infeasibility_label(err: &good_lp::ResolutionError) -> &'static str {
    match err {
        good_lp::ResolutionError::Infeasible => "Infeasible",
        good_lp::ResolutionError::Unbounded => "Unbounded",
        _ => "Error",
    }
}
