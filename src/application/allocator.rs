// Lead allocator: runs an AllocationProgram through a solver backend and maps
// the variable values back onto campaigns.

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, error, info, warn};

use super::model_builder::{AllocationProgram, TOTAL_VOLUME};
use crate::domain::{
    CampaignAllocation, LeadAllocation, LinearProgram, Solution, SolutionStatus, SolveError,
    SolverService,
};

/// Relative tolerance on the total-volume balance.
pub const CONSERVATION_TOLERANCE: f64 = 1e-6;

/// Values this far below zero (relative to the lead total) are solver noise and
/// are clamped to zero; anything lower is reported as an internal error.
pub const NEGATIVE_NOISE: f64 = 1e-9;

#[derive(Clone)]
pub struct LeadAllocator {
    solver: Arc<dyn SolverService>,
}

impl std::fmt::Debug for LeadAllocator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LeadAllocator")
            .field("solver", &self.solver.name())
            .finish()
    }
}

impl LeadAllocator {
    pub fn new(solver: Arc<dyn SolverService>) -> Self {
        Self { solver }
    }

    pub fn solver_name(&self) -> &str {
        self.solver.name()
    }

    /// Solve `program` and translate the result into a [`LeadAllocation`].
    pub fn solve(&self, program: &AllocationProgram) -> Result<LeadAllocation, SolveError> {
        info!(
            solver = self.solver.name(),
            campaigns = program.campaigns.len(),
            total_leads = program.total_leads,
            "solving lead allocation"
        );

        let solution = self.run(&program.program)?;

        match solution.status {
            SolutionStatus::Optimal => self.unpack(program, &solution),
            SolutionStatus::Infeasible => {
                let constraints = self.diagnose_infeasibility(&program.program);
                warn!(?constraints, "lead allocation is infeasible");
                Err(SolveError::Infeasible { constraints })
            }
            SolutionStatus::TimeLimit => {
                let after = program
                    .program
                    .solver_config
                    .time_limit
                    .and_then(|seconds| Duration::try_from_secs_f64(seconds).ok())
                    .unwrap_or_default();
                warn!(?after, "solver hit its time limit");
                Err(SolveError::Timeout { after })
            }
            SolutionStatus::Unbounded => {
                error!(
                    "solver reported an unbounded allocation; the total-volume constraint is missing or malformed"
                );
                Err(SolveError::Internal(
                    "solver reported the allocation as unbounded".to_string(),
                ))
            }
            SolutionStatus::Error => {
                error!(message = %solution.message, "solver returned an error status");
                Err(SolveError::Internal(solution.message))
            }
        }
    }

    /// Like [`solve`](Self::solve), but gives up with [`SolveError::Timeout`]
    /// once `deadline` has elapsed. Backends with a native time limit are
    /// told about the deadline as well.
    pub async fn solve_with_deadline(
        &self,
        mut program: AllocationProgram,
        deadline: Duration,
    ) -> Result<LeadAllocation, SolveError> {
        program.program.solver_config.time_limit = Some(deadline.as_secs_f64());

        let allocator = self.clone();
        let task = tokio::task::spawn_blocking(move || allocator.solve(&program));

        match tokio::time::timeout(deadline, task).await {
            Ok(Ok(result)) => result,
            Ok(Err(join_error)) => {
                error!(%join_error, "solver task failed");
                Err(SolveError::Internal(format!(
                    "solver task failed: {}",
                    join_error
                )))
            }
            Err(_) => {
                warn!(?deadline, "lead allocation exceeded its deadline");
                Err(SolveError::Timeout { after: deadline })
            }
        }
    }

    fn run(&self, program: &LinearProgram) -> Result<Solution, SolveError> {
        self.solver.solve(program).map_err(|e| {
            error!(error = %e, solver = self.solver.name(), "solver failed");
            SolveError::from(e)
        })
    }

    fn unpack(
        &self,
        program: &AllocationProgram,
        solution: &Solution,
    ) -> Result<LeadAllocation, SolveError> {
        if solution.variable_values.len() != program.campaigns.len() {
            return Err(SolveError::Internal(format!(
                "solver returned {} values for {} campaigns",
                solution.variable_values.len(),
                program.campaigns.len()
            )));
        }

        let noise = NEGATIVE_NOISE * program.total_leads.max(1.0);
        let mut campaigns = Vec::with_capacity(program.campaigns.len());

        for (campaign, &value) in program.campaigns.iter().zip(&solution.variable_values) {
            if value < -noise {
                error!(campaign = %campaign.name, value, "solver returned a negative allocation");
                return Err(SolveError::Internal(format!(
                    "negative allocation {} for campaign '{}'",
                    value, campaign.name
                )));
            }

            campaigns.push(CampaignAllocation {
                name: campaign.name.clone(),
                category: campaign.category.clone(),
                net_profit: campaign.net_profit(),
                leads: value.max(0.0),
            });
        }

        let allocated: f64 = campaigns.iter().map(|c| c.leads).sum();
        if (allocated - program.total_leads).abs() > CONSERVATION_TOLERANCE * program.total_leads {
            error!(allocated, expected = program.total_leads, "allocation does not conserve leads");
            return Err(SolveError::Internal(format!(
                "allocations sum to {} but {} leads were requested",
                allocated, program.total_leads
            )));
        }

        let total_profit: f64 = campaigns.iter().map(CampaignAllocation::profit).sum();
        info!(total_profit, time_ms = solution.statistics.solve_time_ms, "lead allocation solved");

        Ok(LeadAllocation {
            campaigns,
            total_leads: program.total_leads,
            total_profit,
        })
    }

    /// Best-effort list of the constraints responsible for infeasibility.
    ///
    /// Each constraint except the volume balance is dropped in turn; the ones
    /// whose removal makes the program feasible are reported. Falls back to
    /// every droppable constraint when no single removal helps.
    fn diagnose_infeasibility(&self, program: &LinearProgram) -> Vec<String> {
        let candidates: Vec<usize> = program
            .constraints
            .iter()
            .enumerate()
            .filter(|(_, c)| c.name != TOTAL_VOLUME)
            .map(|(i, _)| i)
            .collect();

        let culprits: Vec<String> = candidates
            .iter()
            .filter(|&&i| {
                let reduced = program.without_constraint(i);
                matches!(self.solver.solve(&reduced), Ok(s) if s.is_optimal())
            })
            .map(|&i| program.constraints[i].name.clone())
            .collect();

        if culprits.is_empty() {
            debug!("no single constraint explains the infeasibility");
            candidates
                .iter()
                .map(|&i| program.constraints[i].name.clone())
                .collect()
        } else {
            culprits
        }
    }
}
