// Domain module: campaign data, the generic LP model and the solver contract

pub mod campaign;
pub mod errors;
pub mod models;
pub mod solver_service;
pub mod value_objects;

pub use campaign::*;
pub use errors::*;
pub use models::*;
pub use solver_service::*;
pub use value_objects::*;
