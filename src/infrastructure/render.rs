// Plain-text rendering of a solved allocation

use tabled::{
    settings::{object::Columns, Alignment, Style},
    Table, Tabled,
};

use crate::domain::LeadAllocation;

#[derive(Tabled)]
struct AllocationRow {
    #[tabled(rename = "Campaign")]
    campaign: String,
    #[tabled(rename = "Category")]
    category: String,
    #[tabled(rename = "Net profit / lead")]
    net_profit: String,
    #[tabled(rename = "Leads")]
    leads: String,
    #[tabled(rename = "Share of category")]
    share: String,
}

pub fn allocation_table(allocation: &LeadAllocation) -> String {
    let rows = allocation.iter().map(|c| AllocationRow {
        campaign: c.name.clone(),
        category: c.category.to_string(),
        net_profit: format!("{:.2}", c.net_profit),
        leads: format!("{:.2}", c.leads),
        share: allocation
            .share_of_category(&c.name)
            .map(|share| format!("{:.1}%", share * 100.0))
            .unwrap_or_else(|| "-".to_string()),
    });

    let mut table = Table::new(rows);
    table
        .with(Style::modern_rounded())
        .modify(Columns::new(2..5), Alignment::right());

    format!(
        "{}\nTotal leads: {:.2}\nTotal profit: {:.2}",
        table, allocation.total_leads, allocation.total_profit
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{CampaignAllocation, Category};

    #[test]
    fn table_lists_every_campaign_and_totals() {
        let allocation = LeadAllocation {
            campaigns: vec![
                CampaignAllocation {
                    name: "Laser A".into(),
                    category: Category::laser(),
                    net_profit: 5.0,
                    leads: 670.0,
                },
                CampaignAllocation {
                    name: "Corpo B".into(),
                    category: Category::corpo(),
                    net_profit: 3.0,
                    leads: 330.0,
                },
            ],
            total_leads: 1000.0,
            total_profit: 4340.0,
        };

        let rendered = allocation_table(&allocation);
        assert!(rendered.contains("Laser A"));
        assert!(rendered.contains("330.00"));
        assert!(rendered.contains("100.0%"));
        assert!(rendered.ends_with("Total profit: 4340.00"));
    }
}
