//! Forecast configuration.

use serde::{Deserialize, Serialize};

use crate::error::{EngineError, Result};
use crate::month::MonthKey;
use crate::plan::UserPlan;

pub const DEFAULT_FORECAST_MONTHS: u32 = 12;
/// Longest horizon the engine will simulate.
pub const MAX_FORECAST_MONTHS: u32 = 120;

/// Stress-case scaling applied in conservative mode.
pub const CONSERVATIVE_INCOME_FACTOR: f64 = 0.9;
pub const CONSERVATIVE_EXPENSE_FACTOR: f64 = 1.1;

/// What to do with one-off amounts (one-time income, non-recurring expenses).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OneTimePolicy {
    /// Leave them out of the monthly series.
    #[default]
    Exclude,
    /// Book the full amount in the month of its date.
    DueMonth,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ForecastConfig {
    pub months: u32,
    pub starting_balance: f64,
    pub start_date: MonthKey,
    pub include_goal_contributions: bool,
    pub conservative_mode: bool,
    #[serde(default)]
    pub one_time_policy: OneTimePolicy,
}

impl ForecastConfig {
    pub fn new(months: u32, starting_balance: f64, start_date: MonthKey) -> Self {
        Self {
            months,
            starting_balance,
            start_date,
            include_goal_contributions: true,
            conservative_mode: false,
            one_time_policy: OneTimePolicy::Exclude,
        }
    }

    /// Like [`ForecastConfig::new`] but takes the start month as text.
    pub fn parse(months: u32, starting_balance: f64, start_date: &str) -> Result<Self> {
        let config = Self::new(months, starting_balance, MonthKey::parse(start_date)?);
        config.validate()?;
        Ok(config)
    }

    /// Defaults taken from the plan's stored settings, falling back to a
    /// 12-month horizon from the plan's current balance with goals funded.
    pub fn from_plan(plan: &UserPlan, start_date: MonthKey) -> Self {
        let settings = plan.forecast_settings.clone().unwrap_or_default();
        Self {
            months: settings.months.unwrap_or(DEFAULT_FORECAST_MONTHS),
            starting_balance: plan.current_balance,
            start_date,
            include_goal_contributions: settings.include_goal_contributions.unwrap_or(true),
            conservative_mode: settings.conservative_mode.unwrap_or(false),
            one_time_policy: settings.one_time_expenses.unwrap_or_default(),
        }
    }

    pub fn with_goal_contributions(mut self, include: bool) -> Self {
        self.include_goal_contributions = include;
        self
    }

    pub fn conservative(mut self, conservative_mode: bool) -> Self {
        self.conservative_mode = conservative_mode;
        self
    }

    pub fn with_one_time_policy(mut self, policy: OneTimePolicy) -> Self {
        self.one_time_policy = policy;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.months == 0 || self.months > MAX_FORECAST_MONTHS {
            return Err(EngineError::InvalidHorizon {
                months: self.months,
            });
        }
        if !self.starting_balance.is_finite() {
            return Err(EngineError::NonFiniteAmount {
                field: "starting balance",
            });
        }
        Ok(())
    }

    /// The `i`-th simulated month.
    pub fn month_at(&self, i: u32) -> MonthKey {
        self.start_date.add_months(i64::from(i))
    }

    pub(crate) fn income_factor(&self) -> f64 {
        if self.conservative_mode {
            CONSERVATIVE_INCOME_FACTOR
        } else {
            1.0
        }
    }

    pub(crate) fn expense_factor(&self) -> f64 {
        if self.conservative_mode {
            CONSERVATIVE_EXPENSE_FACTOR
        } else {
            1.0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plan::ForecastSettings;

    fn march() -> MonthKey {
        MonthKey::parse("2024-03").unwrap()
    }

    #[test]
    fn test_zero_months_rejected() {
        let err = ForecastConfig::new(0, 0.0, march()).validate().unwrap_err();
        assert_eq!(err, EngineError::InvalidHorizon { months: 0 });
    }

    #[test]
    fn test_oversized_horizon_rejected() {
        let max = ForecastConfig::new(MAX_FORECAST_MONTHS, 0.0, march());
        assert!(max.validate().is_ok());

        let err = ForecastConfig::new(4_000_000_000, 0.0, march()).validate().unwrap_err();
        assert_eq!(err, EngineError::InvalidHorizon { months: 4_000_000_000 });
    }

    #[test]
    fn test_unparsable_start_rejected() {
        let err = ForecastConfig::parse(12, 0.0, "next month").unwrap_err();
        assert!(matches!(err, EngineError::InvalidMonthKey(_)));
    }

    #[test]
    fn test_non_finite_balance_rejected() {
        let err = ForecastConfig::new(6, f64::NAN, march()).validate().unwrap_err();
        assert!(matches!(err, EngineError::NonFiniteAmount { .. }));
    }

    #[test]
    fn test_from_plan_defaults() {
        let plan = UserPlan {
            current_balance: 2500.0,
            ..UserPlan::default()
        };
        let config = ForecastConfig::from_plan(&plan, march());
        assert_eq!(config.months, DEFAULT_FORECAST_MONTHS);
        assert_eq!(config.starting_balance, 2500.0);
        assert!(config.include_goal_contributions);
        assert!(!config.conservative_mode);
        assert_eq!(config.one_time_policy, OneTimePolicy::Exclude);
    }

    #[test]
    fn test_from_plan_uses_stored_settings() {
        let plan = UserPlan {
            forecast_settings: Some(ForecastSettings {
                months: Some(24),
                include_goal_contributions: None,
                conservative_mode: Some(true),
                one_time_expenses: Some(OneTimePolicy::DueMonth),
            }),
            ..UserPlan::default()
        };
        let config = ForecastConfig::from_plan(&plan, march());
        assert_eq!(config.months, 24);
        assert!(config.include_goal_contributions);
        assert!(config.conservative_mode);
        assert_eq!(config.one_time_policy, OneTimePolicy::DueMonth);
        assert_eq!(config.month_at(23).to_string(), "2026-02");
    }
}
