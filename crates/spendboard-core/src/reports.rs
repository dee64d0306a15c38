//! Chart-ready view models built from pipeline output

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::models::BudgetStatus;
use crate::pipeline::Summary;

/// Doughnut slice colors, cycled when there are more categories
pub const PALETTE: [&str; 6] = ["#FF9F6E", "#FF7A3D", "#64D2FF", "#A084FF", "#34C759", "#FFD60A"];

/// Category breakdown for charts
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryBreakdown {
    pub category: String,
    pub amount: Decimal,
    pub percentage: f64,
    pub count: usize,
    pub color: String,
}

/// Per-day point for the trend line
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendPoint {
    pub date: String,
    pub amount: Decimal,
}

/// Chart dataset
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChartDataset {
    pub label: String,
    pub data: Vec<f64>,
    pub background_color: Vec<String>,
}

/// Chart data for an external renderer
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChartData {
    pub chart_type: String,
    pub title: String,
    pub labels: Vec<String>,
    pub datasets: Vec<ChartDataset>,
}

/// Category shares of the filtered total, in first-occurrence order
pub fn category_breakdown(summary: &Summary) -> Vec<CategoryBreakdown> {
    summary
        .by_category
        .iter()
        .enumerate()
        .map(|(i, entry)| CategoryBreakdown {
            category: entry.category.clone(),
            amount: entry.amount,
            percentage: percentage_of(entry.amount, summary.total),
            count: entry.count,
            color: PALETTE[i % PALETTE.len()].to_string(),
        })
        .collect()
}

/// Daily totals in ascending date order
pub fn spending_trend(summary: &Summary) -> Vec<TrendPoint> {
    summary
        .by_day
        .iter()
        .map(|d| TrendPoint {
            date: d.date.clone(),
            amount: d.amount,
        })
        .collect()
}

/// Doughnut chart of spending by category
pub fn category_chart(summary: &Summary) -> ChartData {
    let breakdown = category_breakdown(summary);
    ChartData {
        chart_type: "doughnut".to_string(),
        title: "Expenses by Category".to_string(),
        labels: breakdown.iter().map(|b| b.category.clone()).collect(),
        datasets: vec![ChartDataset {
            label: "Expenses".to_string(),
            data: breakdown.iter().map(|b| to_f64(b.amount)).collect(),
            background_color: breakdown.iter().map(|b| b.color.clone()).collect(),
        }],
    }
}

/// Line chart of spending per day
pub fn trend_chart(summary: &Summary) -> ChartData {
    let points = spending_trend(summary);
    ChartData {
        chart_type: "line".to_string(),
        title: "Spending Trend".to_string(),
        labels: points.iter().map(|p| p.date.clone()).collect(),
        datasets: vec![ChartDataset {
            label: "Daily total".to_string(),
            data: points.iter().map(|p| to_f64(p.amount)).collect(),
            background_color: vec![PALETTE[2].to_string()],
        }],
    }
}

/// How close a budget is to its limit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BudgetLevel {
    Ok,
    Warning,
    Over,
}

impl std::fmt::Display for BudgetLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BudgetLevel::Ok => write!(f, "ok"),
            BudgetLevel::Warning => write!(f, "warning"),
            BudgetLevel::Over => write!(f, "over"),
        }
    }
}

/// Budget status with its advisory level
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BudgetRow {
    pub category: String,
    pub limit: Decimal,
    pub spent: Decimal,
    pub remaining: Decimal,
    pub percentage: f64,
    pub level: BudgetLevel,
}

/// Classify budgets; `warning_percent` is the threshold for `Warning`
pub fn budget_rows(statuses: &[BudgetStatus], warning_percent: f64) -> Vec<BudgetRow> {
    statuses
        .iter()
        .map(|status| {
            let level = if status.percentage > 100.0 {
                BudgetLevel::Over
            } else if status.percentage >= warning_percent {
                BudgetLevel::Warning
            } else {
                BudgetLevel::Ok
            };
            BudgetRow {
                category: status.category_name.clone(),
                limit: status.limit,
                spent: status.spent,
                remaining: status.limit - status.spent,
                percentage: status.percentage,
                level,
            }
        })
        .collect()
}

fn percentage_of(part: Decimal, whole: Decimal) -> f64 {
    if whole.is_zero() {
        0.0
    } else {
        to_f64(part / whole * Decimal::ONE_HUNDRED)
    }
}

fn to_f64(value: Decimal) -> f64 {
    value.to_f64().unwrap_or(0.0)
}
