// COIN-OR CBC adapter, via good_lp

use good_lp::solvers::{coin_cbc::coin_cbc, WithTimeLimit};

use super::good_lp_model;
use crate::domain::{
    models::{LinearProgram, Solution},
    solver_service::{Result, SolverService},
};

pub struct CoinCbcSolver;

impl CoinCbcSolver {
    pub fn new() -> Self {
        Self
    }
}

impl Default for CoinCbcSolver {
    fn default() -> Self {
        Self::new()
    }
}

impl SolverService for CoinCbcSolver {
    fn solve(&self, problem: &LinearProgram) -> Result<Solution> {
        self.validate(problem)?;

        let time_limit = problem.solver_config.time_limit;
        good_lp_model::solve_with(problem, coin_cbc, self.name(), |mut model| {
            model.set_parameter("log", "0");
            match time_limit {
                Some(seconds) => model.with_time_limit(seconds),
                None => model,
            }
        })
    }

    fn name(&self) -> &str {
        "COIN-OR CBC"
    }
}
