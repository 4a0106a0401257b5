// Scenario files: YAML description of one allocation run

use std::{fs, path::Path};

use serde::Deserialize;
use thiserror::Error;

use crate::domain::{CampaignRecord, Category, OptimizationInput, SolverBackend, SolverConfig};

/// Campaign count accepted from a scenario file. The allocation core itself
/// only needs two; the upper bound keeps hand-written scenarios reviewable.
pub const MIN_SCENARIO_CAMPAIGNS: usize = 2;
pub const MAX_SCENARIO_CAMPAIGNS: usize = 10;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read scenario file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse scenario YAML: {0}")]
    Yaml(#[from] serde_norway::Error),

    #[error("Scenario must list between {min} and {max} campaigns, got {count}")]
    CampaignCount { count: usize, min: usize, max: usize },

    #[error("Solver time limit must be a positive number of seconds, got {0}")]
    TimeLimit(f64),
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CampaignConfig {
    #[serde(default)]
    pub name: String,
    pub category: Category,
    pub cost: f64,
    pub revenue: f64,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SolverSection {
    #[serde(default)]
    pub backend: SolverBackend,
    pub time_limit_secs: Option<f64>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ScenarioConfig {
    #[serde(default = "default_total_leads")]
    pub total_leads: f64,
    #[serde(default = "default_min_category_fraction")]
    pub min_category_fraction: f64,
    #[serde(default = "Category::corpo")]
    pub floor_category: Category,
    pub campaigns: Vec<CampaignConfig>,
    #[serde(default)]
    pub solver: SolverSection,
}

fn default_total_leads() -> f64 {
    10_000.0
}

fn default_min_category_fraction() -> f64 {
    0.33
}

impl ScenarioConfig {
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_yaml_str(&contents)
    }

    pub fn from_yaml_str(yaml: &str) -> Result<Self, ConfigError> {
        let config: ScenarioConfig = serde_norway::from_str(yaml)?;
        config.check()?;
        Ok(config)
    }

    fn check(&self) -> Result<(), ConfigError> {
        let count = self.campaigns.len();
        if !(MIN_SCENARIO_CAMPAIGNS..=MAX_SCENARIO_CAMPAIGNS).contains(&count) {
            return Err(ConfigError::CampaignCount {
                count,
                min: MIN_SCENARIO_CAMPAIGNS,
                max: MAX_SCENARIO_CAMPAIGNS,
            });
        }

        if let Some(limit) = self.solver.time_limit_secs {
            if !limit.is_finite() || limit <= 0.0 {
                return Err(ConfigError::TimeLimit(limit));
            }
        }

        Ok(())
    }

    pub fn solver_config(&self) -> SolverConfig {
        SolverConfig {
            backend: self.solver.backend,
            time_limit: self.solver.time_limit_secs,
        }
    }

    /// Optimization input for the model builder; range checks happen there.
    pub fn to_input(&self) -> OptimizationInput {
        let campaigns = self
            .campaigns
            .iter()
            .map(|c| CampaignRecord::new(c.name.clone(), c.category.clone(), c.cost, c.revenue))
            .collect();

        OptimizationInput::new(campaigns, self.total_leads, self.min_category_fraction)
            .with_floor_category(self.floor_category.clone())
    }
}
