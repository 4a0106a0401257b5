//! End-to-end allocation runs through the default backend

#![cfg(feature = "solver-microlp")]

use std::sync::Arc;
use std::time::Duration;

use testresult::TestResult;

use leadopt::{
    allocate, AllocationError, CampaignRecord, Category, LeadAllocation, LeadAllocator,
    LinearProgram, MicroLpSolver, ModelBuilder, OptimizationInput, Solution, SolveError,
    SolverError, SolverService,
};

const TOL: f64 = 1e-6;

fn allocator() -> LeadAllocator {
    LeadAllocator::new(Arc::new(MicroLpSolver::new()))
}

fn campaign(name: &str, category: &str, net_profit: f64) -> CampaignRecord {
    // Keep cost and revenue non-negative whatever the sign of the margin.
    let cost = 10.0;
    CampaignRecord::new(name, category, cost, cost + net_profit)
}

fn close(a: f64, b: f64, scale: f64) -> bool {
    (a - b).abs() <= TOL * scale.max(1.0)
}

/// Checks the invariants every returned allocation must satisfy.
fn assert_allocation_invariants(input: &OptimizationInput, allocation: &LeadAllocation) {
    let total = input.total_leads;
    assert!(
        close(allocation.allocated(), total, total),
        "allocated {} of {}",
        allocation.allocated(),
        total
    );
    assert!(allocation.iter().all(|c| c.leads >= 0.0));

    let floor = allocation.category_total(&input.floor_category);
    assert!(floor >= input.min_category_fraction * total - TOL * total);

    let mut categories: Vec<&Category> = input.campaigns.iter().map(|c| &c.category).collect();
    categories.sort();
    categories.dedup();
    for category in categories {
        let members: Vec<&CampaignRecord> = input
            .campaigns
            .iter()
            .filter(|c| &c.category == category)
            .collect();
        if members.len() < 2 {
            continue;
        }
        let least = members
            .iter()
            .copied()
            .reduce(|a, b| if b.net_profit() < a.net_profit() { b } else { a })
            .unwrap();
        let category_total = allocation.category_total(category);
        let least_leads = allocation.leads_for(&least.name).unwrap();
        assert!(
            least_leads >= 0.2 * category_total - TOL * total,
            "{} holds {} of {} in {}",
            least.name,
            least_leads,
            category_total,
            category
        );
    }

    let realised: f64 = allocation.iter().map(|c| c.net_profit * c.leads).sum();
    assert!(close(realised, allocation.total_profit, allocation.total_profit.abs()));
}

#[test]
fn scenario_a_single_campaign_per_category() -> TestResult {
    let input = OptimizationInput::new(
        vec![campaign("laser", "laser", 5.0), campaign("corpo", "corpo", 3.0)],
        1000.0,
        0.33,
    );

    let allocation = allocate(input.clone(), &allocator())?;

    assert_allocation_invariants(&input, &allocation);
    assert!(close(allocation.leads_for("corpo").unwrap(), 330.0, 1000.0));
    assert!(close(allocation.leads_for("laser").unwrap(), 670.0, 1000.0));
    assert!(close(allocation.total_profit, 4340.0, 4340.0));

    Ok(())
}

#[test]
fn scenario_b_fairness_floor_costs_profit() -> TestResult {
    let input = OptimizationInput::new(
        vec![
            campaign("laser", "laser", 2.0),
            campaign("corpo-strong", "corpo", 5.0),
            campaign("corpo-weak", "corpo", 1.0),
        ],
        1000.0,
        0.33,
    );

    let allocation = allocate(input.clone(), &allocator())?;

    assert_allocation_invariants(&input, &allocation);
    // A 4:1 corpo blend earns 4.2 per lead, still above laser's 2.
    assert!(close(allocation.leads_for("corpo-strong").unwrap(), 800.0, 1000.0));
    assert!(close(allocation.leads_for("corpo-weak").unwrap(), 200.0, 1000.0));
    assert!(close(allocation.leads_for("laser").unwrap(), 0.0, 1000.0));
    assert!(close(allocation.total_profit, 4200.0, 4200.0));
    assert!(allocation.total_profit < 5000.0);

    Ok(())
}

#[test]
fn single_campaign_category_is_not_floored_by_fairness() -> TestResult {
    // Laser is the only category with one member; it may be left empty.
    let input = OptimizationInput::new(
        vec![
            campaign("laser", "laser", -1.0),
            campaign("c1", "corpo", 4.0),
            campaign("c2", "corpo", 3.0),
        ],
        500.0,
        0.0,
    );

    let program = ModelBuilder::new().build(input.clone())?;
    assert!(program.program.constraint("fairness:laser").is_none());
    assert!(program.program.constraint("fairness:corpo").is_some());

    let allocation = allocator().solve(&program)?;
    assert_allocation_invariants(&input, &allocation);
    assert!(close(allocation.leads_for("laser").unwrap(), 0.0, 500.0));
    assert!(close(allocation.leads_for("c2").unwrap(), 100.0, 500.0));

    Ok(())
}

#[test]
fn negative_margins_still_place_every_lead() -> TestResult {
    let input = OptimizationInput::new(
        vec![campaign("a", "laser", -2.0), campaign("b", "corpo", -5.0)],
        100.0,
        0.1,
    );

    let allocation = allocate(input.clone(), &allocator())?;

    assert_allocation_invariants(&input, &allocation);
    assert!(close(allocation.leads_for("b").unwrap(), 10.0, 100.0));
    assert!(close(allocation.total_profit, -2.0 * 90.0 - 5.0 * 10.0, 230.0));

    Ok(())
}

#[test]
fn invariants_hold_across_mixed_inputs() -> TestResult {
    let cases = [
        (vec![("a", "laser", 3.0), ("b", "laser", 7.0), ("c", "corpo", 1.0)], 1_000.0, 0.5),
        (
            vec![
                ("a", "laser", 1.0),
                ("b", "laser", 1.0),
                ("c", "corpo", 2.0),
                ("d", "corpo", 9.0),
                ("e", "corpo", 4.0),
            ],
            12_345.0,
            0.25,
        ),
        (vec![("a", "laser", 0.0), ("b", "corpo", 0.0)], 1.0, 1.0),
        (
            vec![
                ("a", "laser", 8.0),
                ("b", "corpo", 2.0),
                ("c", "retention", 6.0),
                ("d", "retention", -3.0),
            ],
            10_000.0,
            0.33,
        ),
    ];

    for (campaigns, total, fraction) in cases {
        let input = OptimizationInput::new(
            campaigns
                .iter()
                .map(|&(name, category, net)| campaign(name, category, net))
                .collect(),
            total,
            fraction,
        );
        let allocation = allocate(input.clone(), &allocator())?;
        assert_allocation_invariants(&input, &allocation);
    }

    Ok(())
}

#[test]
fn moving_leads_to_a_weaker_campaign_never_helps() -> TestResult {
    let input = OptimizationInput::new(
        vec![
            campaign("l1", "laser", 6.0),
            campaign("l2", "laser", 2.0),
            campaign("c1", "corpo", 4.0),
            campaign("c2", "corpo", 3.0),
        ],
        1000.0,
        0.4,
    );

    let program = ModelBuilder::new().build(input)?;
    let allocation = allocator().solve(&program)?;
    let values: Vec<f64> = allocation.iter().map(|c| c.leads).collect();
    let unit = 1.0;

    for (from, source) in allocation.iter().enumerate() {
        for (to, target) in allocation.iter().enumerate() {
            if from == to || target.net_profit >= source.net_profit || values[from] < unit {
                continue;
            }
            let mut moved = values.clone();
            moved[from] -= unit;
            moved[to] += unit;

            let feasible = program
                .program
                .constraints
                .iter()
                .all(|c| c.is_satisfied_by(&moved, TOL));
            if !feasible {
                continue;
            }

            let profit = program.program.objective.evaluate(&moved);
            assert!(
                profit <= allocation.total_profit + TOL,
                "moving a lead from {} to {} raised profit to {}",
                source.name,
                target.name,
                profit
            );
        }
    }

    Ok(())
}

#[test]
fn unreachable_floor_is_infeasible() -> TestResult {
    // No corpo campaign exists, so no allocation can give corpo 90%.
    let input = OptimizationInput::new(
        vec![campaign("l1", "laser", 5.0), campaign("l2", "laser", 1.0)],
        1000.0,
        0.9,
    );

    let err = allocate(input, &allocator()).unwrap_err();
    match err {
        AllocationError::Solve(SolveError::Infeasible { constraints }) => {
            assert_eq!(constraints, vec!["category-floor:corpo".to_string()]);
        }
        other => panic!("expected infeasibility, got {other:?}"),
    }

    Ok(())
}

#[test]
fn validation_errors_surface_before_solving() {
    let input = OptimizationInput::new(vec![campaign("only", "laser", 1.0)], 100.0, 0.3);
    assert!(matches!(
        allocate(input, &allocator()),
        Err(AllocationError::Validation(_))
    ));
}

#[test]
fn allocator_is_reusable_across_runs() -> TestResult {
    let allocator = allocator();
    for total in [10.0, 100.0, 1000.0] {
        let input = OptimizationInput::new(
            vec![campaign("a", "laser", 5.0), campaign("b", "corpo", 3.0)],
            total,
            0.5,
        );
        let allocation = allocate(input.clone(), &allocator)?;
        assert_allocation_invariants(&input, &allocation);
        assert!(close(allocation.leads_for("b").unwrap(), total / 2.0, total));
    }
    Ok(())
}

/// Backend that always reports an unbounded program.
struct UnboundedSolver;

impl SolverService for UnboundedSolver {
    fn solve(&self, _problem: &LinearProgram) -> Result<Solution, SolverError> {
        Ok(Solution::unbounded())
    }

    fn name(&self) -> &str {
        "unbounded"
    }
}

/// Backend that never returns within a test's patience.
struct StallingSolver;

impl SolverService for StallingSolver {
    fn solve(&self, problem: &LinearProgram) -> Result<Solution, SolverError> {
        std::thread::sleep(Duration::from_millis(500));
        MicroLpSolver::new().solve(problem)
    }

    fn name(&self) -> &str {
        "stalling"
    }
}

fn two_campaign_program() -> leadopt::AllocationProgram {
    ModelBuilder::new()
        .build(OptimizationInput::new(
            vec![campaign("a", "laser", 5.0), campaign("b", "corpo", 3.0)],
            100.0,
            0.3,
        ))
        .unwrap()
}

#[test]
fn unbounded_status_is_an_internal_error() {
    let allocator = LeadAllocator::new(Arc::new(UnboundedSolver));
    assert!(matches!(
        allocator.solve(&two_campaign_program()),
        Err(SolveError::Internal(_))
    ));
}

#[tokio::test]
async fn deadline_expiry_reports_timeout() {
    let allocator = LeadAllocator::new(Arc::new(StallingSolver));
    let deadline = Duration::from_millis(20);

    let result = allocator
        .solve_with_deadline(two_campaign_program(), deadline)
        .await;

    assert_eq!(result, Err(SolveError::Timeout { after: deadline }));
}

#[tokio::test]
async fn deadline_path_returns_the_allocation_when_in_time() -> TestResult {
    let allocation = allocator()
        .solve_with_deadline(two_campaign_program(), Duration::from_secs(10))
        .await?;

    assert!(close(allocation.leads_for("b").unwrap(), 30.0, 100.0));
    assert!(close(allocation.leads_for("a").unwrap(), 70.0, 100.0));
    Ok(())
}
