//! Plain-text and CSV rendering of engine results.

use anyhow::{Context, Result};
use runway_core::{
    AllocationSchedule, ExpenseCategory, ForecastResult, GoalProgress, MonthlyForecast,
};
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt::Write as _;
use std::io;

use crate::config::DisplaySection;

pub struct Money<'a> {
    display: &'a DisplaySection,
}

impl<'a> Money<'a> {
    pub fn new(display: &'a DisplaySection) -> Self {
        Self { display }
    }

    pub fn fmt(&self, amount: f64) -> String {
        let sign = if amount < 0.0 { "-" } else { "" };
        format!(
            "{sign}{}{:.*}",
            self.display.currency,
            self.display.decimals,
            amount.abs()
        )
    }
}

pub fn forecast_text(result: &ForecastResult, display: &DisplaySection) -> String {
    let money = Money::new(display);
    let mut out = String::new();

    let _ = writeln!(out, "# Cash-flow forecast\n");
    let _ = writeln!(
        out,
        "{:<8} {:>12} {:>12} {:>12} {:>12} {:>12}",
        "month", "start", "income", "expenses", "to goals", "end"
    );
    for m in &result.monthly_forecasts {
        let _ = writeln!(
            out,
            "{:<8} {:>12} {:>12} {:>12} {:>12} {:>12}",
            m.month.to_string(),
            money.fmt(m.starting_balance),
            money.fmt(m.income),
            money.fmt(m.expenses),
            money.fmt(m.goal_contributions),
            money.fmt(m.ending_balance),
        );
    }

    let s = &result.summary;
    let _ = writeln!(out, "\n## Summary\n");
    let _ = writeln!(out, "- total income:         {}", money.fmt(s.total_income));
    let _ = writeln!(out, "- total expenses:       {}", money.fmt(s.total_expenses));
    let _ = writeln!(out, "- to goals:             {}", money.fmt(s.total_goal_contributions));
    let _ = writeln!(out, "- avg monthly net:      {}", money.fmt(s.average_monthly_net_change));
    let _ = writeln!(out, "- final balance:        {}", money.fmt(s.final_balance));
    let _ = writeln!(
        out,
        "- balance range:        {} .. {}",
        money.fmt(s.lowest_balance),
        money.fmt(s.highest_balance)
    );
    if s.months_with_negative_balance > 0 {
        let _ = writeln!(
            out,
            "- WARNING: balance below zero in {} month(s)",
            s.months_with_negative_balance
        );
    }

    let by_category = spending_by_category(&result.monthly_forecasts);
    if !by_category.is_empty() {
        let _ = writeln!(out, "\n## Spending by category\n");
        for (category, amount) in &by_category {
            let _ = writeln!(out, "- {:<16} {}", category.label(), money.fmt(*amount));
        }
    }

    if !result.goal_progress.is_empty() {
        let _ = writeln!(out, "\n## Goals\n");
        for g in &result.goal_progress {
            let _ = writeln!(out, "{}", goal_line(g, &money));
        }
    }

    out
}

pub fn schedule_text(schedule: &AllocationSchedule, display: &DisplaySection) -> String {
    let money = Money::new(display);
    let mut out = String::new();

    let _ = writeln!(out, "# Monthly allocation schedule\n");
    for m in &schedule.monthly_schedule {
        let _ = writeln!(
            out,
            "{}  surplus {}  -> {}",
            m.month,
            money.fmt(m.surplus),
            m.guidance
        );
        for a in m.allocations.iter().filter(|a| a.amount > 0.0) {
            let _ = writeln!(out, "    {:<24} {}", a.goal_name, money.fmt(a.amount));
        }
        if m.unallocated > 0.0 {
            let _ = writeln!(out, "    {:<24} {}", "(kept in balance)", money.fmt(m.unallocated));
        }
    }

    let s = &schedule.summary;
    let _ = writeln!(out, "\n## Summary ({} months)\n", s.months);
    let _ = writeln!(out, "- allocated:   {}", money.fmt(s.total_allocated));
    let _ = writeln!(out, "- unallocated: {}", money.fmt(s.total_unallocated));
    let _ = writeln!(out, "- on track:    {}", s.goals_on_track);
    let _ = writeln!(out, "- behind:      {}", s.goals_behind);
    if !s.behind_goals.is_empty() {
        let _ = writeln!(out, "  ({})", s.behind_goals.join(", "));
    }
    for g in &s.goal_progress {
        let _ = writeln!(out, "{}", goal_line(g, &money));
    }

    out
}

/// Horizon totals per category.
fn spending_by_category(months: &[MonthlyForecast]) -> BTreeMap<ExpenseCategory, f64> {
    let mut totals = BTreeMap::new();
    for m in months {
        for (category, amount) in &m.expenses_by_category {
            *totals.entry(*category).or_insert(0.0) += amount;
        }
    }
    totals
}

fn goal_line(g: &GoalProgress, money: &Money<'_>) -> String {
    let status = if g.on_track { "on track" } else { "behind" };
    let progress = match g.projected_progress {
        Some(p) => format!("{p:.0}% of {}", money.fmt(g.target_amount)),
        None => "open-ended".to_string(),
    };
    let done = g
        .estimated_completion_month
        .map(|m| format!(", done {m}"))
        .unwrap_or_default();
    format!(
        "- [{status}] {} | {} -> {} ({progress}{done}) | avg {}/mo",
        g.goal_name,
        money.fmt(g.current_amount),
        money.fmt(g.projected_amount),
        money.fmt(g.average_monthly_allocation),
    )
}

#[derive(Debug, Serialize)]
struct ForecastRow<'a> {
    month: String,
    starting_balance: f64,
    income: f64,
    expenses: f64,
    goal_contributions: f64,
    net_change: f64,
    ending_balance: f64,
    funded_goals: &'a str,
}

/// Write the monthly series as CSV, one row per month.
pub fn write_forecast_csv<W: io::Write>(out: W, months: &[MonthlyForecast]) -> Result<()> {
    let mut wtr = csv::Writer::from_writer(out);
    for m in months {
        let funded = m
            .allocations
            .iter()
            .filter(|a| a.amount > 0.0)
            .map(|a| a.goal_id.as_str())
            .collect::<Vec<_>>()
            .join(";");
        wtr.serialize(ForecastRow {
            month: m.month.to_string(),
            starting_balance: m.starting_balance,
            income: m.income,
            expenses: m.expenses,
            goal_contributions: m.goal_contributions,
            net_change: m.net_change,
            ending_balance: m.ending_balance,
            funded_goals: &funded,
        })
        .context("write csv row")?;
    }
    wtr.flush().context("flush csv")?;
    Ok(())
}
