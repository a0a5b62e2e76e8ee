//! Goal allocation scheduler: priority waterfall over a month's surplus.
//!
//! Algorithm (deterministic, one pass per month):
//! 1) active goals only, ranked by `priority_order` ASC, ties by plan order
//! 2) pool = max(0, income - expenses)
//! 3) each goal takes min(pool, remaining need); open-ended need is unbounded
//! 4) whatever is left after the last goal stays in the balance
//!
//! Running totals live in a [`GoalLedger`] built fresh per engine call, so the
//! caller's `Goal` records are never touched.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::month::MonthKey;
use crate::plan::{Goal, GoalType};

/// One goal's share of one month's surplus.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GoalAllocation {
    pub goal_id: String,
    pub goal_name: String,
    pub amount: f64,
}

/// Per-goal scratch state carried across simulated months.
#[derive(Debug, Clone, PartialEq)]
pub struct GoalAccount {
    pub goal_id: String,
    pub goal_name: String,
    pub goal_type: GoalType,
    pub priority_order: i32,
    pub target_amount: f64,
    pub current_amount: f64,
    pub target_date: NaiveDate,
    /// Sum of everything allocated during this simulation.
    pub allocated: f64,
    /// Fixed goals: what is still missing. Decremented by exactly what is
    /// allocated so a met goal lands on zero without rounding drift.
    need: f64,
    completed_in: Option<MonthKey>,
}

impl GoalAccount {
    fn open(goal: &Goal) -> Self {
        Self {
            goal_id: goal.id.clone(),
            goal_name: goal.name.clone(),
            goal_type: goal.goal_type,
            priority_order: goal.priority_order,
            target_amount: goal.target_amount,
            current_amount: goal.current_amount,
            target_date: goal.target_date,
            allocated: 0.0,
            need: (goal.target_amount - goal.current_amount).max(0.0),
            completed_in: None,
        }
    }

    /// How much more this goal can take. Unbounded for open-ended goals.
    pub fn remaining_need(&self) -> f64 {
        match self.goal_type {
            GoalType::FixedAmount => self.need,
            GoalType::OpenEnded => f64::INFINITY,
        }
    }

    /// Starting amount plus everything allocated so far.
    pub fn projected_amount(&self) -> f64 {
        let projected = self.current_amount + self.allocated;
        match self.goal_type {
            // A met goal sits exactly on its target.
            GoalType::FixedAmount if self.need <= 0.0 => {
                self.target_amount.max(self.current_amount)
            }
            _ => projected,
        }
    }

    pub fn is_met(&self) -> bool {
        match self.goal_type {
            GoalType::FixedAmount => self.need <= 0.0,
            GoalType::OpenEnded => false,
        }
    }

    /// First simulated month in which a fixed goal reached its target.
    pub fn completed_in(&self) -> Option<MonthKey> {
        self.completed_in
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct GoalLedger {
    accounts: Vec<GoalAccount>,
}

impl GoalLedger {
    /// Open accounts for the active goals, in serving order.
    pub fn new(goals: &[Goal]) -> Self {
        let mut accounts: Vec<GoalAccount> = goals
            .iter()
            .filter(|g| g.is_active)
            .map(GoalAccount::open)
            .collect();

        // Stable: equal priorities keep plan order.
        accounts.sort_by_key(|a| a.priority_order);

        Self { accounts }
    }

    pub fn accounts(&self) -> &[GoalAccount] {
        &self.accounts
    }

    /// Split `pool` across goals in priority order. Returns one entry per
    /// active goal (zero for goals the pool never reached).
    pub fn allocate(&mut self, pool: f64) -> Vec<GoalAllocation> {
        // NaN and negative pools both clamp to zero.
        let mut remaining = pool.max(0.0);
        let mut out = Vec::with_capacity(self.accounts.len());

        for account in &mut self.accounts {
            let mut amount = 0.0;
            if remaining > 0.0 {
                amount = remaining.min(account.remaining_need());
                if amount > 0.0 {
                    account.allocated += amount;
                    if account.goal_type == GoalType::FixedAmount {
                        account.need -= amount;
                    }
                    remaining -= amount;
                }
            }

            out.push(GoalAllocation {
                goal_id: account.goal_id.clone(),
                goal_name: account.goal_name.clone(),
                amount,
            });
        }

        out
    }

    /// Stamp `month` as the completion month of any fixed goal that has just
    /// been met. Sticky: earlier stamps are kept.
    pub fn record_completions(&mut self, month: MonthKey) {
        for account in &mut self.accounts {
            if account.completed_in.is_none() && account.is_met() {
                debug!(goal = %account.goal_id, %month, "goal reaches target");
                account.completed_in = Some(month);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 12, 1).unwrap()
    }

    fn amounts(allocs: &[GoalAllocation]) -> Vec<(String, f64)> {
        allocs.iter().map(|a| (a.goal_id.clone(), a.amount)).collect()
    }

    #[test]
    fn test_priority_waterfall() {
        let goals = vec![
            Goal::fixed("b", "B", 1000.0, date()).with_priority(2),
            Goal::fixed("a", "A", 600.0, date()).with_priority(1),
        ];
        let mut ledger = GoalLedger::new(&goals);

        let allocs = ledger.allocate(1000.0);
        assert_eq!(
            amounts(&allocs),
            vec![("a".to_string(), 600.0), ("b".to_string(), 400.0)]
        );
    }

    #[test]
    fn test_negative_pool_allocates_nothing() {
        let goals = vec![Goal::fixed("a", "A", 600.0, date())];
        let mut ledger = GoalLedger::new(&goals);

        let allocs = ledger.allocate(-250.0);
        assert_eq!(allocs.len(), 1);
        assert_eq!(allocs[0].amount, 0.0);
        assert_eq!(ledger.accounts()[0].allocated, 0.0);
    }

    #[test]
    fn test_met_goal_passes_pool_down() {
        let goals = vec![
            Goal::fixed("a", "A", 500.0, date()).with_priority(1),
            Goal::fixed("b", "B", 5000.0, date()).with_priority(2),
        ];
        let mut ledger = GoalLedger::new(&goals);

        ledger.allocate(500.0);
        assert!(ledger.accounts()[0].is_met());

        let second = ledger.allocate(300.0);
        assert_eq!(
            amounts(&second),
            vec![("a".to_string(), 0.0), ("b".to_string(), 300.0)]
        );
    }

    #[test]
    fn test_current_amount_counts_toward_cap() {
        let goals = vec![Goal::fixed("a", "A", 1000.0, date()).with_current(900.0)];
        let mut ledger = GoalLedger::new(&goals);

        let allocs = ledger.allocate(500.0);
        assert_eq!(allocs[0].amount, 100.0);
        assert_eq!(ledger.accounts()[0].projected_amount(), 1000.0);
    }

    #[test]
    fn test_open_ended_absorbs_everything() {
        let goals = vec![
            Goal::open_ended("inv", "Invest", date()).with_priority(1),
            Goal::fixed("trip", "Trip", 500.0, date()).with_priority(2),
        ];
        let mut ledger = GoalLedger::new(&goals);

        let allocs = ledger.allocate(1234.5);
        assert_eq!(allocs[0].amount, 1234.5);
        assert_eq!(allocs[1].amount, 0.0);
    }

    #[test]
    fn test_ties_keep_plan_order() {
        let goals = vec![
            Goal::fixed("first", "First", 100.0, date()).with_priority(1),
            Goal::fixed("second", "Second", 100.0, date()).with_priority(1),
            Goal::fixed("zero", "Zero", 100.0, date()).with_priority(0),
        ];
        let ledger = GoalLedger::new(&goals);
        let order: Vec<_> = ledger.accounts().iter().map(|a| a.goal_id.as_str()).collect();
        assert_eq!(order, vec!["zero", "first", "second"]);
    }

    #[test]
    fn test_inactive_goals_skipped() {
        let goals = vec![
            Goal::fixed("a", "A", 100.0, date()).inactive(),
            Goal::fixed("b", "B", 100.0, date()),
        ];
        let mut ledger = GoalLedger::new(&goals);
        let allocs = ledger.allocate(50.0);
        assert_eq!(amounts(&allocs), vec![("b".to_string(), 50.0)]);
    }

    #[test]
    fn test_completion_month_is_sticky() {
        let goals = vec![Goal::fixed("a", "A", 100.0, date())];
        let mut ledger = GoalLedger::new(&goals);
        let jan = MonthKey::parse("2025-01").unwrap();

        ledger.allocate(100.0);
        ledger.record_completions(jan);
        ledger.allocate(100.0);
        ledger.record_completions(jan.add_months(1));

        assert_eq!(ledger.accounts()[0].completed_in(), Some(jan));
        assert_eq!(ledger.accounts()[0].allocated, 100.0);
    }
}
