//! Loading scenario files from disk and running them

#![cfg(feature = "solver-microlp")]

use std::io::Write;

use testresult::TestResult;

use leadopt::{
    allocate, Category, ConfigError, LeadAllocator, ScenarioConfig, SolverBackend, SolverFactory,
};

const SCENARIO: &str = r#"
total_leads: 2000
min_category_fraction: 0.25
campaigns:
  - name: Laser Spring
    category: laser
    cost: 12.5
    revenue: 20
  - name: Laser Summer
    category: laser
    cost: 10
    revenue: 12
  - name: Body Contour
    category: corpo
    cost: 8
    revenue: 11
solver:
  backend: microlp
"#;

#[test]
fn scenario_file_round_trip_to_allocation() -> TestResult {
    let mut file = tempfile::NamedTempFile::new()?;
    file.write_all(SCENARIO.as_bytes())?;

    let scenario = ScenarioConfig::from_path(file.path())?;
    assert_eq!(scenario.solver_config().backend, SolverBackend::MicroLp);

    let solver = SolverFactory::create_from_backend(scenario.solver_config().backend)?;
    let allocation = allocate(scenario.to_input(), &LeadAllocator::new(solver))?;

    // Corpo takes exactly its floor; laser splits 4:1 in favour of the 7.5 margin.
    let corpo = allocation.category_total(&Category::corpo());
    assert!((corpo - 500.0).abs() < 1e-6);
    assert!((allocation.leads_for("Laser Spring").unwrap_or_default() - 1200.0).abs() < 1e-6);
    assert!((allocation.leads_for("Laser Summer").unwrap_or_default() - 300.0).abs() < 1e-6);
    assert!((allocation.total_profit - (1200.0 * 7.5 + 300.0 * 2.0 + 500.0 * 3.0)).abs() < 1e-6);

    Ok(())
}

#[test]
fn missing_file_reports_its_path() {
    let err = ScenarioConfig::from_path("/definitely/not/here.yml").unwrap_err();
    assert!(matches!(err, ConfigError::Io { .. }));
    assert!(err.to_string().contains("/definitely/not/here.yml"));
}

#[test]
fn too_many_campaigns_are_rejected() {
    let mut yaml = String::from("campaigns:\n");
    for i in 0..11 {
        yaml.push_str(&format!(
            "  - {{ name: c{i}, category: laser, cost: 1, revenue: 2 }}\n"
        ));
    }

    assert!(matches!(
        ScenarioConfig::from_yaml_str(&yaml),
        Err(ConfigError::CampaignCount { count: 11, .. })
    ));
}
