// Solver adapters module

pub mod factory;
#[cfg(any(feature = "solver-microlp", feature = "solver-cbc"))]
mod good_lp_model;

#[cfg(feature = "solver-cbc")]
pub mod coin_cbc_solver;
#[cfg(feature = "solver-highs")]
pub mod highs_solver;
#[cfg(feature = "solver-microlp")]
pub mod microlp_solver;

#[cfg(feature = "solver-cbc")]
pub use coin_cbc_solver::CoinCbcSolver;
pub use factory::SolverFactory;
#[cfg(feature = "solver-highs")]
pub use highs_solver::HighsSolver;
#[cfg(feature = "solver-microlp")]
pub use microlp_solver::MicroLpSolver;
