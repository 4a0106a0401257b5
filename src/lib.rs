// Domain layer: campaign data, generic LP model, solver contract
pub mod domain;

// Application layer: model builder and lead allocator
pub mod application;

// Infrastructure layer: scenario files, logging, rendering
pub mod infrastructure;

// Solver adapters: concrete implementations of SolverService
pub mod solver;

// Re-export commonly used types
pub use domain::{
    CampaignAllocation, CampaignRecord, Category, Constraint, ConstraintType, LeadAllocation,
    LinearProgram, ObjectiveFunction, OptimizationInput, OptimizationType, Solution,
    SolutionStatus, SolveError, SolverBackend, SolverConfig, SolverError, SolverService,
    ValidationError, Variable,
};

pub use application::{allocate, AllocationError, AllocationProgram, LeadAllocator, ModelBuilder};

pub use infrastructure::{ConfigError, ScenarioConfig};

pub use solver::SolverFactory;

#[cfg(feature = "solver-cbc")]
pub use solver::CoinCbcSolver;
#[cfg(feature = "solver-highs")]
pub use solver::HighsSolver;
#[cfg(feature = "solver-microlp")]
pub use solver::MicroLpSolver;
