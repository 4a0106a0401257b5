// HiGHS Solver Adapter
// Translates the domain LinearProgram to the HiGHS row-wise API directly

use std::time::Instant;

use highs::{HighsModelStatus, RowProblem, Sense};
use tracing::debug;

use crate::domain::{
    models::{LinearProgram, Solution, SolverStatistics},
    solver_service::{Result, SolverError, SolverService},
    value_objects::{ConstraintType, OptimizationType, SolutionStatus},
};

pub struct HighsSolver;

impl HighsSolver {
    pub fn new() -> Self {
        Self
    }
}

impl Default for HighsSolver {
    fn default() -> Self {
        Self::new()
    }
}

impl SolverService for HighsSolver {
    fn solve(&self, problem: &LinearProgram) -> Result<Solution> {
        self.validate(problem)?;

        let start_time = Instant::now();

        if let Some(violated) = problem.violated_trivial_constraint() {
            debug!(constraint = %violated.name, "constant constraint cannot hold");
            return Ok(Solution::infeasible().with_statistics(SolverStatistics::for_program(
                problem,
                start_time.elapsed().as_secs_f64() * 1000.0,
            )));
        }

        // Columns first, then rows
        let mut pb = RowProblem::default();
        let mut cols = Vec::with_capacity(problem.num_variables());

        for (i, &obj_coeff) in problem.objective.coefficients.iter().enumerate() {
            let col = match problem.variables.get(i) {
                Some(var) => {
                    let upper = var.upper_bound.unwrap_or(f64::INFINITY);
                    pb.add_column(obj_coeff, var.lower_bound..upper)
                }
                None => pb.add_column(obj_coeff, 0.0..),
            };
            cols.push(col);
        }

        for constraint in problem.constraints.iter().filter(|c| !c.is_trivial()) {
            let terms: Vec<_> = constraint
                .coefficients
                .iter()
                .zip(&cols)
                .filter(|&(&coeff, _)| coeff != 0.0)
                .map(|(&coeff, &col)| (col, coeff))
                .collect();

            match constraint.constraint_type {
                ConstraintType::LessThanOrEqual => pb.add_row(..=constraint.bound, terms),
                ConstraintType::Equal => pb.add_row(constraint.bound..=constraint.bound, terms),
                ConstraintType::GreaterThanOrEqual => pb.add_row(constraint.bound.., terms),
            }
        }

        let sense = match problem.objective.optimization_type {
            OptimizationType::Maximize => Sense::Maximise,
            OptimizationType::Minimize => Sense::Minimise,
        };

        let mut model = pb.optimise(sense);
        model.make_quiet();
        if let Some(seconds) = problem.solver_config.time_limit {
            model.set_option("time_limit", seconds);
        }

        let solved = model.solve();
        let statistics =
            SolverStatistics::for_program(problem, start_time.elapsed().as_secs_f64() * 1000.0);

        match solved.status() {
            HighsModelStatus::Optimal => {
                let variable_values = solved.get_solution().columns().to_vec();
                let value = problem.objective.evaluate(&variable_values);

                let mut solution =
                    Solution::optimal(value, variable_values).with_statistics(statistics);
                solution.message = format!("Optimal solution found for '{}'", problem.name);
                Ok(solution)
            }
            status => Ok(non_optimal_solution(status)?.with_statistics(statistics)),
        }
    }

    fn name(&self) -> &str {
        "HiGHS"
    }
}

/// Map a non-optimal HiGHS status onto the domain solution.
///
/// `UnboundedOrInfeasible` comes out of presolve without telling the two
/// apart; it is reported as infeasible so callers can run their diagnosis.
fn non_optimal_solution(status: HighsModelStatus) -> Result<Solution> {
    match status {
        HighsModelStatus::Infeasible | HighsModelStatus::UnboundedOrInfeasible => {
            Ok(Solution::infeasible())
        }
        HighsModelStatus::Unbounded => Ok(Solution::unbounded()),
        HighsModelStatus::ReachedTimeLimit => Ok(Solution::new(
            SolutionStatus::TimeLimit,
            "HiGHS stopped at its time limit",
        )),
        status => Err(SolverError::ExecutionFailed(format!(
            "HiGHS solver returned status: {:?}",
            status
        ))),
    }
}
