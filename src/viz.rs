// Sample visualization data.
//
// The panel shows fixed sample arrays chosen by query kind; nothing here is
// computed from the actual answer.

use crate::classify::QueryKind;

/// How a chart's values are displayed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Unit {
    Inr,
    Percent,
}

/// Panel presentation, cycled by the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum VizMode {
    #[default]
    Chart,
    Table,
    /// Summary stat cards and key insights, independent of the chart.
    Insights,
}

impl VizMode {
    pub fn toggled(self) -> Self {
        match self {
            VizMode::Chart => VizMode::Table,
            VizMode::Table => VizMode::Insights,
            VizMode::Insights => VizMode::Chart,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            VizMode::Chart => "chart",
            VizMode::Table => "table",
            VizMode::Insights => "insights",
        }
    }
}

/// Headline figure shown as a stat card in insights mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatCard {
    pub label: &'static str,
    pub value: &'static str,
    pub note: &'static str,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChartRow {
    pub label: &'static str,
    pub value: u64,
    /// Extra column for the table view.
    pub detail: Option<&'static str>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChartSpec {
    pub title: &'static str,
    pub unit: Unit,
    pub rows: Vec<ChartRow>,
}

impl ChartSpec {
    pub fn format_value(&self, value: u64) -> String {
        match self.unit {
            Unit::Inr => format_inr(value),
            Unit::Percent => format!("{value}%"),
        }
    }

    /// Compact label for bar tops.
    pub fn short_value(&self, value: u64) -> String {
        match self.unit {
            Unit::Inr => format_large_number(value),
            Unit::Percent => format!("{value}%"),
        }
    }
}

// ---------------------------------------------------------------------------
// Sample datasets
// ---------------------------------------------------------------------------

const PORTFOLIO_ANALYSIS: &[(&str, u64, &str)] = &[
    ("Amitabh Bachchan", 45_000_000, "High / Sarah Smith"),
    ("Shah Rukh Khan", 38_000_000, "High / Mike Johnson"),
    ("Virat Kohli", 32_000_000, "Medium / Sarah Smith"),
    ("MS Dhoni", 28_000_000, "Medium / Lisa Chen"),
    ("Sachin Tendulkar", 25_000_000, "Low / Mike Johnson"),
];

const RISK_DISTRIBUTION: &[(&str, u64)] = &[
    ("High Risk", 45),
    ("Medium Risk", 35),
    ("Low Risk", 20),
];

/// Month, real estate, stocks, bonds (percent of new investment).
const INVESTMENT_TRENDS: &[(&str, u64, u64, u64)] = &[
    ("Jan", 40, 35, 25),
    ("Feb", 42, 38, 20),
    ("Mar", 45, 40, 15),
    ("Apr", 48, 42, 10),
    ("May", 50, 45, 5),
];

pub const SUMMARY_STATS: [StatCard; 4] = [
    StatCard {
        label: "Total Portfolio Value",
        value: "₹2.5 Cr",
        note: "+12.5%",
    },
    StatCard {
        label: "Active Clients",
        value: "156",
        note: "+8.2%",
    },
    StatCard {
        label: "Top Manager",
        value: "Sarah Smith",
        note: "₹85 Cr",
    },
    StatCard {
        label: "Avg Portfolio",
        value: "₹1.6 Cr",
        note: "+15.3%",
    },
];

pub const KEY_INSIGHTS: [&str; 4] = [
    "Top 5 portfolios account for 35% of total AUM",
    "Sarah Smith manages the highest value portfolios",
    "High-risk clients show 15% better returns",
    "Real estate investments are trending upward",
];

fn portfolio_rows(limit: usize) -> Vec<ChartRow> {
    PORTFOLIO_ANALYSIS
        .iter()
        .take(limit)
        .map(|&(label, value, detail)| ChartRow {
            label,
            value,
            detail: Some(detail),
        })
        .collect()
}

/// Sample chart for a query kind. Kinds without a dedicated dataset fall back
/// to the full portfolio analysis.
pub fn chart_for(kind: QueryKind) -> ChartSpec {
    match kind {
        QueryKind::TopPortfolios => ChartSpec {
            title: "Top 5 Investors by Portfolio Value",
            unit: Unit::Inr,
            rows: portfolio_rows(5),
        },
        QueryKind::RiskDistribution => ChartSpec {
            title: "Risk Distribution",
            unit: Unit::Percent,
            rows: RISK_DISTRIBUTION
                .iter()
                .map(|&(label, value)| ChartRow {
                    label,
                    value,
                    detail: None,
                })
                .collect(),
        },
        QueryKind::InvestmentTrends => ChartSpec {
            title: "Investment Trends (Real Estate)",
            unit: Unit::Percent,
            rows: INVESTMENT_TRENDS
                .iter()
                .map(|&(label, real_estate, _, _)| ChartRow {
                    label,
                    value: real_estate,
                    detail: None,
                })
                .collect(),
        },
        QueryKind::TopTransactions
        | QueryKind::ClientList
        | QueryKind::TransactionAnalysis => ChartSpec {
            title: "Portfolio Analysis",
            unit: Unit::Inr,
            rows: portfolio_rows(PORTFOLIO_ANALYSIS.len()),
        },
    }
}

// ---------------------------------------------------------------------------
// Formatting
// ---------------------------------------------------------------------------

/// Group digits the Indian way: last three, then pairs (`4,50,00,000`).
pub fn group_indian(value: u64) -> String {
    let digits = value.to_string();
    if digits.len() <= 3 {
        return digits;
    }
    let (head, tail) = digits.split_at(digits.len() - 3);
    let mut groups: Vec<&str> = Vec::new();
    let mut end = head.len();
    while end > 0 {
        let start = end.saturating_sub(2);
        groups.push(&head[start..end]);
        end = start;
    }
    groups.reverse();
    format!("{},{}", groups.join(","), tail)
}

/// Whole-rupee currency string, e.g. `₹4,50,00,000`.
pub fn format_inr(value: u64) -> String {
    format!("₹{}", group_indian(value))
}

/// Crore / lakh abbreviation for large amounts.
pub fn format_large_number(value: u64) -> String {
    if value >= 10_000_000 {
        format!("{:.1} Cr", value as f64 / 10_000_000.0)
    } else if value >= 100_000 {
        format!("{:.1} L", value as f64 / 100_000.0)
    } else {
        group_thousands(value)
    }
}

fn group_thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn indian_grouping() {
        assert_eq!(group_indian(0), "0");
        assert_eq!(group_indian(999), "999");
        assert_eq!(group_indian(1_000), "1,000");
        assert_eq!(group_indian(100_000), "1,00,000");
        assert_eq!(group_indian(45_000_000), "4,50,00,000");
        assert_eq!(format_inr(25_000_000), "₹2,50,00,000");
    }

    #[test]
    fn large_number_abbreviations() {
        assert_eq!(format_large_number(45_000_000), "4.5 Cr");
        assert_eq!(format_large_number(10_000_000), "1.0 Cr");
        assert_eq!(format_large_number(250_000), "2.5 L");
        assert_eq!(format_large_number(99_999), "99,999");
        assert_eq!(format_large_number(42), "42");
    }

    #[test]
    fn top_portfolios_chart_has_five_investors() {
        let chart = chart_for(QueryKind::TopPortfolios);
        assert_eq!(chart.rows.len(), 5);
        assert_eq!(chart.unit, Unit::Inr);
        assert_eq!(chart.rows[0].label, "Amitabh Bachchan");
        assert_eq!(chart.format_value(chart.rows[0].value), "₹4,50,00,000");
        assert_eq!(chart.short_value(chart.rows[0].value), "4.5 Cr");
    }

    #[test]
    fn risk_distribution_sums_to_100() {
        let chart = chart_for(QueryKind::RiskDistribution);
        assert_eq!(chart.unit, Unit::Percent);
        assert_eq!(chart.rows.iter().map(|r| r.value).sum::<u64>(), 100);
        assert_eq!(chart.format_value(45), "45%");
    }

    #[test]
    fn trends_use_real_estate_series() {
        let chart = chart_for(QueryKind::InvestmentTrends);
        let values: Vec<u64> = chart.rows.iter().map(|r| r.value).collect();
        assert_eq!(values, vec![40, 42, 45, 48, 50]);
    }

    #[test]
    fn other_kinds_fall_back_to_portfolio_analysis() {
        for kind in [
            QueryKind::TopTransactions,
            QueryKind::ClientList,
            QueryKind::TransactionAnalysis,
        ] {
            assert_eq!(chart_for(kind).title, "Portfolio Analysis");
        }
    }

    #[test]
    fn mode_toggles() {
        assert_eq!(VizMode::default(), VizMode::Chart);
        assert_eq!(VizMode::Chart.toggled(), VizMode::Table);
        assert_eq!(VizMode::Table.toggled(), VizMode::Insights);
        assert_eq!(VizMode::Insights.toggled(), VizMode::Chart);
        assert_eq!(VizMode::Insights.label(), "insights");
    }
}
