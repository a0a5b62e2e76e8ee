//! Progress & completion estimator.
//!
//! Reads the goal ledger after a simulation and derives, per active goal,
//! where it ends up, when (if ever) a fixed goal is met, and whether it is
//! on pace for its target date.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::config::ForecastConfig;
use crate::month::MonthKey;
use crate::plan::GoalType;
use crate::scheduler::{GoalAccount, GoalLedger};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GoalProgress {
    pub goal_id: String,
    pub goal_name: String,
    pub goal_type: GoalType,
    pub current_amount: f64,
    pub projected_amount: f64,
    pub target_amount: f64,
    pub target_date: NaiveDate,
    /// Percent of target, capped at 100. `None` for open-ended goals.
    pub projected_progress: Option<f64>,
    pub on_track: bool,
    pub estimated_completion_month: Option<MonthKey>,
    pub average_monthly_allocation: f64,
    /// Per month from `current_amount` to hit the target on time.
    pub required_monthly_pace: Option<f64>,
    /// Still missing at the end of the horizon (zero for open-ended goals).
    pub remaining_amount: f64,
}

/// One entry per active goal, in serving order.
pub fn estimate_progress(ledger: &GoalLedger, config: &ForecastConfig) -> Vec<GoalProgress> {
    ledger
        .accounts()
        .iter()
        .map(|account| estimate_goal(account, config))
        .collect()
}

fn estimate_goal(account: &GoalAccount, config: &ForecastConfig) -> GoalProgress {
    let projected_amount = account.projected_amount();
    let average_monthly_allocation = account.allocated / f64::from(config.months.max(1));
    let target_month = MonthKey::from_date(account.target_date);
    // Simulated months up to and including the target month.
    let months_to_target = config.start_date.months_until(target_month) + 1;

    let (projected_progress, required_monthly_pace, remaining_amount, on_track) =
        match account.goal_type {
            GoalType::FixedAmount => {
                let progress = if account.target_amount > 0.0 {
                    (projected_amount / account.target_amount * 100.0).min(100.0)
                } else {
                    100.0
                };

                let outstanding = (account.target_amount - account.current_amount).max(0.0);
                let pace = outstanding / months_to_target.max(1) as f64;

                let on_track = match account.completed_in() {
                    Some(done) => done <= target_month,
                    None => months_to_target > 0 && pace <= average_monthly_allocation,
                };

                (
                    Some(progress),
                    Some(pace),
                    (account.target_amount - projected_amount).max(0.0),
                    on_track,
                )
            }
            GoalType::OpenEnded => (None, None, 0.0, average_monthly_allocation > 0.0),
        };

    GoalProgress {
        goal_id: account.goal_id.clone(),
        goal_name: account.goal_name.clone(),
        goal_type: account.goal_type,
        current_amount: account.current_amount,
        projected_amount,
        target_amount: account.target_amount,
        target_date: account.target_date,
        projected_progress,
        on_track,
        estimated_completion_month: account.completed_in(),
        average_monthly_allocation,
        required_monthly_pace,
        remaining_amount,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plan::Goal;

    fn ymd(y: i32, m: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, 1).unwrap()
    }

    fn config(months: u32) -> ForecastConfig {
        ForecastConfig::new(months, 0.0, MonthKey::parse("2025-01").unwrap())
    }

    /// Feed `pool` every month for `months` months.
    fn run(goals: &[Goal], pool: f64, months: u32) -> Vec<GoalProgress> {
        let cfg = config(months);
        let mut ledger = GoalLedger::new(goals);
        for i in 0..months {
            ledger.allocate(pool);
            ledger.record_completions(cfg.month_at(i));
        }
        estimate_progress(&ledger, &cfg)
    }

    #[test]
    fn test_completion_before_target_is_on_track() {
        let goals = vec![Goal::fixed("g", "Laptop", 1_500.0, ymd(2025, 6))];
        let progress = run(&goals, 500.0, 12);

        let p = &progress[0];
        assert_eq!(p.estimated_completion_month.unwrap().to_string(), "2025-03");
        assert!(p.on_track);
        assert_eq!(p.projected_amount, 1_500.0);
        assert_eq!(p.projected_progress, Some(100.0));
        assert_eq!(p.remaining_amount, 0.0);
        assert_eq!(p.average_monthly_allocation, 125.0);
    }

    #[test]
    fn test_completion_after_target_is_behind() {
        let goals = vec![Goal::fixed("g", "Car", 3_000.0, ymd(2025, 2))];
        let progress = run(&goals, 500.0, 12);

        let p = &progress[0];
        assert_eq!(p.estimated_completion_month.unwrap().to_string(), "2025-06");
        assert!(!p.on_track);
    }

    #[test]
    fn test_target_beyond_horizon_uses_pace() {
        // 12_000 over 24 months needs 500/month; 600/month is enough.
        let goals = vec![Goal::fixed("g", "House", 12_000.0, ymd(2026, 12))];
        let on_pace = run(&goals, 600.0, 12);
        assert!(on_pace[0].estimated_completion_month.is_none());
        assert!(on_pace[0].on_track);
        assert_eq!(on_pace[0].required_monthly_pace, Some(500.0));
        assert!((on_pace[0].projected_progress.unwrap() - 60.0).abs() < 1e-9);

        let slow = run(&goals, 400.0, 12);
        assert!(!slow[0].on_track);
        assert_eq!(slow[0].remaining_amount, 7_200.0);
    }

    #[test]
    fn test_overdue_unmet_goal_is_behind() {
        let goals = vec![Goal::fixed("g", "Old", 10_000.0, ymd(2024, 6))];
        let progress = run(&goals, 100.0, 6);
        assert!(!progress[0].on_track);
    }

    #[test]
    fn test_already_met_goal_completes_in_first_month() {
        let goals = vec![Goal::fixed("g", "Done", 1_000.0, ymd(2025, 12)).with_current(1_200.0)];
        let progress = run(&goals, 500.0, 3);
        let p = &progress[0];
        assert_eq!(p.estimated_completion_month.unwrap().to_string(), "2025-01");
        assert!(p.on_track);
        assert_eq!(p.average_monthly_allocation, 0.0);
        assert_eq!(p.projected_amount, 1_200.0);
    }

    #[test]
    fn test_inactive_goals_get_no_entry() {
        let goals = vec![
            Goal::fixed("paused", "Paused", 1_000.0, ymd(2025, 6)).inactive(),
            Goal::fixed("live", "Live", 1_000.0, ymd(2025, 6)),
        ];
        let progress = run(&goals, 100.0, 3);
        assert_eq!(progress.len(), 1);
        assert_eq!(progress[0].goal_id, "live");
        assert_eq!(progress[0].projected_amount, 300.0);
    }

    #[test]
    fn test_open_ended_on_track_with_any_allocation() {
        let goals = vec![Goal::open_ended("g", "Invest", ymd(2030, 1))];
        let funded = run(&goals, 10.0, 3);
        assert!(funded[0].on_track);
        assert!(funded[0].projected_progress.is_none());
        assert!(funded[0].required_monthly_pace.is_none());

        let starved = run(&goals, 0.0, 3);
        assert!(!starved[0].on_track);
    }
}
