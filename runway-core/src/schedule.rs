//! Monthly allocation schedule: the month-by-month guidance view.
//!
//! Same projector + scheduler pipeline as `generate_forecast`, with the
//! configuration derived from the plan and each month annotated with what to
//! do with its surplus.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::config::ForecastConfig;
use crate::error::Result;
use crate::estimator::{estimate_progress, GoalProgress};
use crate::month::MonthKey;
use crate::plan::UserPlan;
use crate::projector::{simulate, MonthlyForecast};
use crate::scheduler::GoalAllocation;

/// What a month's surplus does.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Guidance {
    /// Some goals received money this month.
    GoalsFunded { count: usize },
    /// Surplus exists but no goal took any; it stays in the balance.
    SurplusRetained,
    /// Expenses matched or exceeded income.
    NoSurplus,
}

impl fmt::Display for Guidance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Guidance::GoalsFunded { count: 1 } => write!(f, "1 goal funded"),
            Guidance::GoalsFunded { count } => write!(f, "{count} goals funded"),
            Guidance::SurplusRetained => write!(f, "surplus available, kept in balance"),
            Guidance::NoSurplus => write!(f, "no surplus this month"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthlyAllocation {
    pub month: MonthKey,
    pub income: f64,
    pub expenses: f64,
    /// `income - expenses`; may be negative.
    pub surplus: f64,
    pub allocations: Vec<GoalAllocation>,
    pub total_allocated: f64,
    /// Positive surplus not taken by any goal.
    pub unallocated: f64,
    pub ending_balance: f64,
    pub guidance: Guidance,
}

impl MonthlyAllocation {
    fn from_forecast(m: MonthlyForecast) -> Self {
        let surplus = m.income - m.expenses;
        let funded = m.allocations.iter().filter(|a| a.amount > 0.0).count();
        let guidance = if surplus <= 0.0 {
            Guidance::NoSurplus
        } else if funded > 0 {
            Guidance::GoalsFunded { count: funded }
        } else {
            Guidance::SurplusRetained
        };

        Self {
            month: m.month,
            income: m.income,
            expenses: m.expenses,
            surplus,
            total_allocated: m.goal_contributions,
            unallocated: (surplus - m.goal_contributions).max(0.0),
            ending_balance: m.ending_balance,
            allocations: m.allocations,
            guidance,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AllocationSummary {
    pub months: u32,
    pub total_surplus: f64,
    pub total_allocated: f64,
    pub total_unallocated: f64,
    pub goals_on_track: usize,
    pub goals_behind: usize,
    /// Names of goals behind schedule, in serving order.
    pub behind_goals: Vec<String>,
    pub goal_progress: Vec<GoalProgress>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AllocationSchedule {
    pub monthly_schedule: Vec<MonthlyAllocation>,
    pub summary: AllocationSummary,
}

/// Build the guidance schedule for `plan`, starting at `start`, using the
/// plan's stored forecast settings (or the defaults).
pub fn generate_monthly_goal_allocation_schedule(
    plan: &UserPlan,
    start: MonthKey,
) -> Result<AllocationSchedule> {
    let config = ForecastConfig::from_plan(plan, start);
    let sim = simulate(plan, &config)?;
    let goal_progress = estimate_progress(&sim.ledger, &config);

    let monthly_schedule: Vec<MonthlyAllocation> = sim
        .months
        .into_iter()
        .map(MonthlyAllocation::from_forecast)
        .collect();

    let behind_goals: Vec<String> = goal_progress
        .iter()
        .filter(|g| !g.on_track)
        .map(|g| g.goal_name.clone())
        .collect();

    let summary = AllocationSummary {
        months: config.months,
        total_surplus: monthly_schedule.iter().map(|m| m.surplus).sum(),
        total_allocated: monthly_schedule.iter().map(|m| m.total_allocated).sum(),
        total_unallocated: monthly_schedule.iter().map(|m| m.unallocated).sum(),
        goals_on_track: goal_progress.len() - behind_goals.len(),
        goals_behind: behind_goals.len(),
        behind_goals,
        goal_progress,
    };

    Ok(AllocationSchedule {
        monthly_schedule,
        summary,
    })
}
