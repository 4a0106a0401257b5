// Infrastructure: scenario files, logging and terminal output

pub mod config;
#[cfg(feature = "cli")]
pub mod logging;
#[cfg(feature = "cli")]
pub mod render;

pub use config::{ConfigError, ScenarioConfig};
