use std::sync::Arc;

use crate::domain::{
    models::LinearProgram,
    solver_service::{Result, SolverError, SolverService},
    value_objects::SolverBackend,
};

/// Factory for creating solver instances based on configuration
pub struct SolverFactory;

impl SolverFactory {
    /// Create a solver based on the problem configuration
    pub fn create_solver(problem: &LinearProgram) -> Result<Arc<dyn SolverService>> {
        Self::create_from_backend(problem.solver_config.backend)
    }

    /// Create a solver for a specific backend
    pub fn create_from_backend(backend: SolverBackend) -> Result<Arc<dyn SolverService>> {
        match backend {
            SolverBackend::Auto => Self::default_solver(),
            SolverBackend::MicroLp => microlp(),
            SolverBackend::CoinCbc => coin_cbc(),
            SolverBackend::Highs => highs(),
        }
    }

    /// First compiled-in backend: HiGHS, then CBC, then microlp
    pub fn default_solver() -> Result<Arc<dyn SolverService>> {
        highs().or_else(|_| coin_cbc()).or_else(|_| microlp())
    }
}

fn not_compiled(backend: SolverBackend, feature: &str) -> SolverError {
    SolverError::SolverNotAvailable(format!(
        "{} support is not compiled in (enable the `{}` feature)",
        backend, feature
    ))
}

#[cfg(feature = "solver-microlp")]
fn microlp() -> Result<Arc<dyn SolverService>> {
    Ok(Arc::new(super::MicroLpSolver::new()))
}

#[cfg(not(feature = "solver-microlp"))]
fn microlp() -> Result<Arc<dyn SolverService>> {
    Err(not_compiled(SolverBackend::MicroLp, "solver-microlp"))
}

#[cfg(feature = "solver-cbc")]
fn coin_cbc() -> Result<Arc<dyn SolverService>> {
    Ok(Arc::new(super::CoinCbcSolver::new()))
}

#[cfg(not(feature = "solver-cbc"))]
fn coin_cbc() -> Result<Arc<dyn SolverService>> {
    Err(not_compiled(SolverBackend::CoinCbc, "solver-cbc"))
}

#[cfg(feature = "solver-highs")]
fn highs() -> Result<Arc<dyn SolverService>> {
    Ok(Arc::new(super::HighsSolver::new()))
}

#[cfg(not(feature = "solver-highs"))]
fn highs() -> Result<Arc<dyn SolverService>> {
    Err(not_compiled(SolverBackend::Highs, "solver-highs"))
}
