//! Cash-flow projector: walks the horizon month by month.
//!
//! Each month: income and expenses from the active records, the allocatable
//! pool (`income - expenses`, new cash only), goal allocations from that pool,
//! and the balance carried into the next month.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::config::ForecastConfig;
use crate::error::Result;
use crate::month::MonthKey;
use crate::normalizer::{expense_share, income_share};
use crate::plan::{ExpenseCategory, UserPlan};
use crate::scheduler::{GoalAllocation, GoalLedger};

/// One month's cash flow before any goal allocation.
#[derive(Debug, Clone, PartialEq)]
pub struct MonthCashFlow {
    pub month: MonthKey,
    pub income: f64,
    pub expenses: f64,
    pub expenses_by_category: BTreeMap<ExpenseCategory, f64>,
}

impl MonthCashFlow {
    /// Net new cash this month; the pool the scheduler draws from.
    pub fn surplus(&self) -> f64 {
        self.income - self.expenses
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthlyForecast {
    pub month: MonthKey,
    pub starting_balance: f64,
    pub income: f64,
    pub expenses: f64,
    pub goal_contributions: f64,
    /// `income - expenses - goal_contributions`
    pub net_change: f64,
    pub ending_balance: f64,
    pub allocations: Vec<GoalAllocation>,
    pub expenses_by_category: BTreeMap<ExpenseCategory, f64>,
}

/// Income and expenses for `month`, with conservative scaling applied.
pub fn project_month(plan: &UserPlan, config: &ForecastConfig, month: MonthKey) -> MonthCashFlow {
    let policy = config.one_time_policy;

    let income: f64 = plan
        .income
        .iter()
        .filter(|src| src.is_active && src.started_by(month))
        .map(|src| income_share(src, month, policy))
        .sum::<f64>()
        * config.income_factor();

    let mut expenses = 0.0;
    let mut expenses_by_category: BTreeMap<ExpenseCategory, f64> = BTreeMap::new();
    for expense in plan.expenses.iter().filter(|e| e.is_active) {
        let share = expense_share(expense, month, policy) * config.expense_factor();
        if share > 0.0 {
            *expenses_by_category.entry(expense.category).or_insert(0.0) += share;
        }
        expenses += share;
    }

    MonthCashFlow {
        month,
        income,
        expenses,
        expenses_by_category,
    }
}

/// Output of a full simulation run: the monthly series plus the goal ledger
/// the estimator reads from.
#[derive(Debug, Clone)]
pub(crate) struct Simulation {
    pub months: Vec<MonthlyForecast>,
    pub ledger: GoalLedger,
}

pub(crate) fn simulate(plan: &UserPlan, config: &ForecastConfig) -> Result<Simulation> {
    config.validate()?;

    debug!(
        months = config.months,
        start = %config.start_date,
        income = plan.income.len(),
        expenses = plan.expenses.len(),
        goals = plan.goals.len(),
        conservative = config.conservative_mode,
        "simulating forecast"
    );

    let mut ledger = GoalLedger::new(&plan.goals);
    let mut months = Vec::new();
    let mut balance = config.starting_balance;

    for i in 0..config.months {
        let month = config.month_at(i);
        let flow = project_month(plan, config, month);

        let allocations = if config.include_goal_contributions {
            ledger.allocate(flow.surplus())
        } else {
            Vec::new()
        };
        ledger.record_completions(month);

        let goal_contributions: f64 = allocations.iter().map(|a| a.amount).sum();
        let net_change = flow.income - flow.expenses - goal_contributions;
        let starting_balance = balance;
        let ending_balance = starting_balance + net_change;

        trace!(
            %month,
            income = flow.income,
            expenses = flow.expenses,
            goal_contributions,
            ending_balance,
            "month projected"
        );

        months.push(MonthlyForecast {
            month,
            starting_balance,
            income: flow.income,
            expenses: flow.expenses,
            goal_contributions,
            net_change,
            ending_balance,
            allocations,
            expenses_by_category: flow.expenses_by_category,
        });
        balance = ending_balance;
    }

    Ok(Simulation { months, ledger })
}
