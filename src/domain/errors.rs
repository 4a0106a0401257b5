// Errors surfaced by the allocation core

use std::time::Duration;

/// Input rejected before any program is built
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ValidationError {
    #[error("at least two campaigns are required, got {count}")]
    TooFewCampaigns { count: usize },

    #[error("campaign '{campaign}': cost must be a finite non-negative number, got {value}")]
    InvalidCost { campaign: String, value: f64 },

    #[error("campaign '{campaign}': revenue must be a finite non-negative number, got {value}")]
    InvalidRevenue { campaign: String, value: f64 },

    #[error("total_leads must be a finite positive number, got {value}")]
    InvalidTotalLeads { value: f64 },

    #[error("min_category_fraction must be within [0, 1], got {value}")]
    InvalidCategoryFraction { value: f64 },

    #[error("campaign name '{name}' is used more than once")]
    DuplicateCampaignName { name: String },

    #[error("campaign '{campaign}' has a blank category")]
    BlankCategory { campaign: String },
}

/// Failure to turn a built program into an allocation
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SolveError {
    /// The constraints cannot all hold; `constraints` names the likely culprits.
    #[error("no allocation satisfies the constraints (likely responsible: {})", .constraints.join(", "))]
    Infeasible { constraints: Vec<String> },

    #[error("internal solver error: {0}")]
    Internal(String),

    #[error("solver did not finish within {after:?}")]
    Timeout { after: Duration },
}

impl From<super::solver_service::SolverError> for SolveError {
    fn from(err: super::solver_service::SolverError) -> Self {
        SolveError::Internal(err.to_string())
    }
}
