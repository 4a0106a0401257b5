// Campaign inputs and the lead allocation produced for them

use serde::Serialize;

use super::value_objects::Category;

/// One marketing campaign; immutable once constructed
#[derive(Debug, Clone, PartialEq)]
pub struct CampaignRecord {
    pub name: String,
    pub category: Category,
    /// Cost per lead
    pub cost: f64,
    /// Revenue per lead
    pub revenue: f64,
}

impl CampaignRecord {
    pub fn new(name: impl Into<String>, category: impl Into<Category>, cost: f64, revenue: f64) -> Self {
        Self {
            name: name.into(),
            category: category.into(),
            cost,
            revenue,
        }
    }

    /// Revenue minus cost per lead; may be negative
    pub fn net_profit(&self) -> f64 {
        self.revenue - self.cost
    }
}

/// Everything the model builder needs for one run
#[derive(Debug, Clone)]
pub struct OptimizationInput {
    pub campaigns: Vec<CampaignRecord>,
    pub total_leads: f64,
    /// Minimum share of `total_leads` reserved for `floor_category`
    pub min_category_fraction: f64,
    pub floor_category: Category,
}

impl OptimizationInput {
    /// Blank campaign names are replaced with `Campaign_<n>` (1-based position).
    pub fn new(campaigns: Vec<CampaignRecord>, total_leads: f64, min_category_fraction: f64) -> Self {
        Self {
            campaigns: with_default_names(campaigns),
            total_leads,
            min_category_fraction,
            floor_category: Category::corpo(),
        }
    }

    pub fn with_floor_category(mut self, category: impl Into<Category>) -> Self {
        self.floor_category = category.into();
        self
    }
}

pub fn default_campaign_name(index: usize) -> String {
    format!("Campaign_{}", index + 1)
}

/// Replace blank names with `Campaign_<n>`; other names are left untouched.
pub fn with_default_names(campaigns: Vec<CampaignRecord>) -> Vec<CampaignRecord> {
    campaigns
        .into_iter()
        .enumerate()
        .map(|(i, mut campaign)| {
            if campaign.name.trim().is_empty() {
                campaign.name = default_campaign_name(i);
            }
            campaign
        })
        .collect()
}

/// Leads assigned to a single campaign
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CampaignAllocation {
    pub name: String,
    pub category: Category,
    pub net_profit: f64,
    pub leads: f64,
}

impl CampaignAllocation {
    pub fn profit(&self) -> f64 {
        self.net_profit * self.leads
    }
}

/// Solved allocation, one entry per campaign in input order
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LeadAllocation {
    pub campaigns: Vec<CampaignAllocation>,
    pub total_leads: f64,
    pub total_profit: f64,
}

impl LeadAllocation {
    pub fn leads_for(&self, name: &str) -> Option<f64> {
        self.campaigns
            .iter()
            .find(|c| c.name == name)
            .map(|c| c.leads)
    }

    pub fn allocated(&self) -> f64 {
        self.campaigns.iter().map(|c| c.leads).sum()
    }

    pub fn category_total(&self, category: &Category) -> f64 {
        self.campaigns
            .iter()
            .filter(|c| &c.category == category)
            .map(|c| c.leads)
            .sum()
    }

    /// Share of its own category's leads held by `name`; `None` for unknown
    /// campaigns or an empty category.
    pub fn share_of_category(&self, name: &str) -> Option<f64> {
        let campaign = self.campaigns.iter().find(|c| c.name == name)?;
        let total = self.category_total(&campaign.category);
        (total > 0.0).then(|| campaign.leads / total)
    }

    pub fn iter(&self) -> impl Iterator<Item = &CampaignAllocation> {
        self.campaigns.iter()
    }
}
