//! Horizon-level totals, averages and extremes over a monthly series.

use serde::{Deserialize, Serialize};

use crate::projector::MonthlyForecast;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ForecastSummary {
    pub total_income: f64,
    pub total_expenses: f64,
    pub total_goal_contributions: f64,
    pub final_balance: f64,
    pub average_monthly_income: f64,
    pub average_monthly_expenses: f64,
    pub average_monthly_goal_contributions: f64,
    pub average_monthly_net_change: f64,
    /// Includes the starting balance.
    pub lowest_balance: f64,
    /// Includes the starting balance.
    pub highest_balance: f64,
    pub months_with_negative_balance: usize,
}

/// Single pass over the series.
pub fn summarize(starting_balance: f64, months: &[MonthlyForecast]) -> ForecastSummary {
    let mut summary = ForecastSummary {
        final_balance: starting_balance,
        lowest_balance: starting_balance,
        highest_balance: starting_balance,
        ..ForecastSummary::default()
    };
    let mut total_net = 0.0;

    for m in months {
        summary.total_income += m.income;
        summary.total_expenses += m.expenses;
        summary.total_goal_contributions += m.goal_contributions;
        total_net += m.net_change;

        summary.lowest_balance = summary.lowest_balance.min(m.ending_balance);
        summary.highest_balance = summary.highest_balance.max(m.ending_balance);
        if m.ending_balance < 0.0 {
            summary.months_with_negative_balance += 1;
        }
        summary.final_balance = m.ending_balance;
    }

    let n = months.len().max(1) as f64;
    summary.average_monthly_income = summary.total_income / n;
    summary.average_monthly_expenses = summary.total_expenses / n;
    summary.average_monthly_goal_contributions = summary.total_goal_contributions / n;
    summary.average_monthly_net_change = total_net / n;

    summary
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::month::MonthKey;
    use std::collections::BTreeMap;

    fn month(i: i64, start: f64, income: f64, expenses: f64, goals: f64) -> MonthlyForecast {
        let net = income - expenses - goals;
        MonthlyForecast {
            month: MonthKey::parse("2025-01").unwrap().add_months(i),
            starting_balance: start,
            income,
            expenses,
            goal_contributions: goals,
            net_change: net,
            ending_balance: start + net,
            allocations: vec![],
            expenses_by_category: BTreeMap::new(),
        }
    }

    #[test]
    fn test_totals_and_averages() {
        let series = vec![
            month(0, 100.0, 1_000.0, 600.0, 200.0),
            month(1, 300.0, 1_000.0, 1_500.0, 0.0),
            month(2, -200.0, 1_000.0, 700.0, 100.0),
        ];
        let s = summarize(100.0, &series);

        assert_eq!(s.total_income, 3_000.0);
        assert_eq!(s.total_expenses, 2_800.0);
        assert_eq!(s.total_goal_contributions, 300.0);
        assert_eq!(s.final_balance, 0.0);
        assert_eq!(s.average_monthly_income, 1_000.0);
        assert_eq!(s.average_monthly_goal_contributions, 100.0);
        assert!((s.average_monthly_net_change - (-100.0 / 3.0)).abs() < 1e-9);
        assert_eq!(s.lowest_balance, -200.0);
        assert_eq!(s.highest_balance, 300.0);
        assert_eq!(s.months_with_negative_balance, 1);
    }

    #[test]
    fn test_extremes_include_starting_balance() {
        let series = vec![month(0, 5_000.0, 0.0, 1_000.0, 0.0)];
        let s = summarize(5_000.0, &series);
        assert_eq!(s.highest_balance, 5_000.0);
        assert_eq!(s.lowest_balance, 4_000.0);
    }
}
