// Application layer: build the allocation model and solve it

pub mod allocator;
pub mod model_builder;

pub use allocator::LeadAllocator;
pub use model_builder::{AllocationProgram, ModelBuilder};

use crate::domain::{LeadAllocation, OptimizationInput, SolveError, ValidationError};

/// Any failure between an `OptimizationInput` and a solved allocation
#[derive(Debug, thiserror::Error)]
pub enum AllocationError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Solve(#[from] SolveError),
}

/// Build and solve in one step
pub fn allocate(
    input: OptimizationInput,
    allocator: &LeadAllocator,
) -> Result<LeadAllocation, AllocationError> {
    let program = ModelBuilder::new().build(input)?;
    Ok(allocator.solve(&program)?)
}
