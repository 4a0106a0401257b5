// microlp adapter: bundled pure-Rust simplex reached through good_lp

use good_lp::solvers::microlp::microlp;

use super::good_lp_model;
use crate::domain::{
    models::{LinearProgram, Solution},
    solver_service::{Result, SolverService},
};

pub struct MicroLpSolver;

impl MicroLpSolver {
    pub fn new() -> Self {
        Self
    }
}

impl Default for MicroLpSolver {
    fn default() -> Self {
        Self::new()
    }
}

impl SolverService for MicroLpSolver {
    fn solve(&self, problem: &LinearProgram) -> Result<Solution> {
        self.validate(problem)?;

        // No native time limit; deadlines are enforced by the caller.
        good_lp_model::solve_with(problem, microlp, self.name(), |model| model)
    }

    fn name(&self) -> &str {
        "microlp"
    }
}
