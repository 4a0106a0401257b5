// Model builder: turns campaign data into the lead-allocation linear program

use std::collections::{BTreeMap, HashSet};

use tracing::debug;

use crate::domain::{
    CampaignRecord, Category, Constraint, ConstraintType, LinearProgram, ObjectiveFunction,
    OptimizationInput, ValidationError, Variable, with_default_names,
};

/// Minimum share of a category's leads kept by its least profitable campaign.
pub const FAIRNESS_SHARE: f64 = 0.20;

pub const TOTAL_VOLUME: &str = "total-volume";

pub fn category_floor_name(category: &Category) -> String {
    format!("category-floor:{}", category)
}

pub fn fairness_name(category: &Category) -> String {
    format!("fairness:{}", category)
}

/// A linear program together with the campaigns its variables stand for.
///
/// Variable `i` of `program` is the number of leads given to `campaigns[i]`.
#[derive(Debug, Clone)]
pub struct AllocationProgram {
    pub program: LinearProgram,
    pub campaigns: Vec<CampaignRecord>,
    pub total_leads: f64,
}

/// Campaign indices grouped by category, in category label order.
pub fn group_by_category(campaigns: &[CampaignRecord]) -> Vec<(Category, Vec<usize>)> {
    let mut groups: BTreeMap<Category, Vec<usize>> = BTreeMap::new();
    for (i, campaign) in campaigns.iter().enumerate() {
        groups.entry(campaign.category.clone()).or_default().push(i);
    }
    groups.into_iter().collect()
}

/// Index of the member with the lowest net profit. Ties go to the earliest
/// member in input order.
pub fn least_profitable(campaigns: &[CampaignRecord], members: &[usize]) -> Option<usize> {
    members.iter().copied().fold(None, |least, i| match least {
        Some(current) if campaigns[current].net_profit() <= campaigns[i].net_profit() => {
            Some(current)
        }
        _ => Some(i),
    })
}

/// Stateless builder for [`AllocationProgram`]s.
#[derive(Debug, Clone, Copy, Default)]
pub struct ModelBuilder;

impl ModelBuilder {
    pub fn new() -> Self {
        Self
    }

    /// Build the allocation program for `input`.
    ///
    /// Constraints, in order: `total-volume`, `category-floor:<floor>`, then
    /// one `fairness:<category>` for each category holding two or more
    /// campaigns. Blank campaign names are defaulted before validation.
    pub fn build(&self, mut input: OptimizationInput) -> Result<AllocationProgram, ValidationError> {
        input.campaigns = with_default_names(input.campaigns);
        validate(&input)?;

        let OptimizationInput {
            campaigns,
            total_leads,
            min_category_fraction,
            floor_category,
        } = input;
        let n = campaigns.len();

        let names: Vec<String> = campaigns.iter().map(|c| c.name.clone()).collect();
        let variables = names.iter().map(Variable::continuous).collect();
        let objective =
            ObjectiveFunction::maximize(campaigns.iter().map(CampaignRecord::net_profit).collect())
                .with_names(names);

        let mut program = LinearProgram::new(objective)
            .with_name("lead-allocation")
            .with_description(format!(
                "Allocate {} leads across {} campaigns",
                total_leads, n
            ))
            .with_variables(variables)
            .add_constraint(
                Constraint::new(ConstraintType::Equal, vec![1.0; n], total_leads)
                    .with_name(TOTAL_VOLUME),
            );

        let floor_row = campaigns
            .iter()
            .map(|c| if c.category == floor_category { 1.0 } else { 0.0 })
            .collect();
        program = program.add_constraint(
            Constraint::new(
                ConstraintType::GreaterThanOrEqual,
                floor_row,
                min_category_fraction * total_leads,
            )
            .with_name(category_floor_name(&floor_category)),
        );

        for (category, members) in group_by_category(&campaigns) {
            if members.len() < 2 {
                continue;
            }
            let Some(least) = least_profitable(&campaigns, &members) else {
                continue;
            };

            // x_least >= share * sum(members)  <=>  (1 - share) x_least - share * sum(others) >= 0
            let mut row = vec![0.0; n];
            for &i in &members {
                row[i] = -FAIRNESS_SHARE;
            }
            row[least] = 1.0 - FAIRNESS_SHARE;

            debug!(
                category = %category,
                campaign = %campaigns[least].name,
                members = members.len(),
                "fairness floor on least profitable campaign"
            );
            program = program.add_constraint(
                Constraint::new(ConstraintType::GreaterThanOrEqual, row, 0.0)
                    .with_name(fairness_name(&category)),
            );
        }

        debug!(
            variables = n,
            constraints = program.constraints.len(),
            names = ?program.constraints.iter().map(|c| c.name.as_str()).collect::<Vec<_>>(),
            "built allocation program"
        );

        Ok(AllocationProgram {
            program,
            campaigns,
            total_leads,
        })
    }
}

fn validate(input: &OptimizationInput) -> Result<(), ValidationError> {
    if input.campaigns.len() < 2 {
        return Err(ValidationError::TooFewCampaigns {
            count: input.campaigns.len(),
        });
    }

    if !input.total_leads.is_finite() || input.total_leads <= 0.0 {
        return Err(ValidationError::InvalidTotalLeads {
            value: input.total_leads,
        });
    }

    if !(0.0..=1.0).contains(&input.min_category_fraction) {
        return Err(ValidationError::InvalidCategoryFraction {
            value: input.min_category_fraction,
        });
    }

    let mut seen = HashSet::new();
    for campaign in &input.campaigns {
        if !seen.insert(campaign.name.as_str()) {
            return Err(ValidationError::DuplicateCampaignName {
                name: campaign.name.clone(),
            });
        }
        if campaign.category.is_blank() {
            return Err(ValidationError::BlankCategory {
                campaign: campaign.name.clone(),
            });
        }
        if !campaign.cost.is_finite() || campaign.cost < 0.0 {
            return Err(ValidationError::InvalidCost {
                campaign: campaign.name.clone(),
                value: campaign.cost,
            });
        }
        if !campaign.revenue.is_finite() || campaign.revenue < 0.0 {
            return Err(ValidationError::InvalidRevenue {
                campaign: campaign.name.clone(),
                value: campaign.revenue,
            });
        }
    }

    Ok(())
}
