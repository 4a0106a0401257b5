// Shared translation from the domain LinearProgram to a good_lp model.
// Used by every backend that goes through good_lp (microlp, CBC).

use std::time::Instant;

use good_lp::{
    constraint, solvers::Solver, variable, Expression, ProblemVariables, ResolutionError,
    Solution as GoodLpSolution, SolverModel, Variable as GoodLpVariable,
};
use tracing::debug;

use crate::domain::{
    models::{LinearProgram, Solution, SolverStatistics},
    solver_service::{Result, SolverError},
    value_objects::{ConstraintType, OptimizationType},
};

/// Build `problem` for `solver`, let `configure` adjust the backend model
/// (time limits and the like), then solve.
pub(crate) fn solve_with<S, F>(
    problem: &LinearProgram,
    solver: S,
    backend: &str,
    configure: F,
) -> Result<Solution>
where
    S: Solver,
    S::Model: SolverModel<Error = ResolutionError>,
    F: FnOnce(S::Model) -> S::Model,
{
    let start_time = Instant::now();
    let stats = |start: Instant| {
        SolverStatistics::for_program(problem, start.elapsed().as_secs_f64() * 1000.0)
    };

    if let Some(violated) = problem.violated_trivial_constraint() {
        debug!(backend, constraint = %violated.name, "constant constraint cannot hold");
        return Ok(Solution::infeasible().with_statistics(stats(start_time)));
    }

    let mut vars = ProblemVariables::new();
    let lp_variables: Vec<GoodLpVariable> = if problem.variables.is_empty() {
        (0..problem.num_variables())
            .map(|_| vars.add(variable().min(0.0)))
            .collect()
    } else {
        problem
            .variables
            .iter()
            .map(|v| {
                let def = variable().min(v.lower_bound);
                match v.upper_bound {
                    Some(upper) => vars.add(def.max(upper)),
                    None => vars.add(def),
                }
            })
            .collect()
    };

    let objective = linear_expression(&problem.objective.coefficients, &lp_variables);
    let unsolved = match problem.objective.optimization_type {
        OptimizationType::Maximize => vars.maximise(objective),
        OptimizationType::Minimize => vars.minimise(objective),
    };

    let mut model = configure(unsolved.using(solver));
    for c in problem.constraints.iter().filter(|c| !c.is_trivial()) {
        let lhs = linear_expression(&c.coefficients, &lp_variables);
        model = match c.constraint_type {
            ConstraintType::LessThanOrEqual => model.with(constraint::leq(lhs, c.bound)),
            ConstraintType::Equal => model.with(constraint::eq(lhs, c.bound)),
            ConstraintType::GreaterThanOrEqual => model.with(constraint::geq(lhs, c.bound)),
        };
    }

    let result = model.solve();
    let statistics = stats(start_time);
    debug!(backend, solve_time_ms = statistics.solve_time_ms, "good_lp solve finished");

    match result {
        Ok(sol) => {
            let variable_values: Vec<f64> = lp_variables.iter().map(|&v| sol.value(v)).collect();
            let value = problem.objective.evaluate(&variable_values);

            let mut solution = Solution::optimal(value, variable_values).with_statistics(statistics);
            solution.message = format!("Optimal solution found for '{}'", problem.name);
            Ok(solution)
        }
        Err(ResolutionError::Infeasible) => Ok(Solution::infeasible().with_statistics(statistics)),
        Err(ResolutionError::Unbounded) => Ok(Solution::unbounded().with_statistics(statistics)),
        Err(e) => Err(SolverError::ExecutionFailed(format!("{}: {:?}", backend, e))),
    }
}

fn linear_expression(coefficients: &[f64], vars: &[GoodLpVariable]) -> Expression {
    let mut expr = Expression::default();
    for (&coeff, &var) in coefficients.iter().zip(vars) {
        if coeff != 0.0 {
            expr += coeff * var;
        }
    }
    expr
}
