//! `generate_forecast`: projector + scheduler + estimator + aggregator.

use serde::{Deserialize, Serialize};

use crate::config::ForecastConfig;
use crate::error::Result;
use crate::estimator::{estimate_progress, GoalProgress};
use crate::plan::UserPlan;
use crate::projector::{simulate, MonthlyForecast};
use crate::summary::{summarize, ForecastSummary};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ForecastResult {
    pub monthly_forecasts: Vec<MonthlyForecast>,
    pub summary: ForecastSummary,
    pub goal_progress: Vec<GoalProgress>,
}

/// Simulate `config.months` months of `plan`.
///
/// Pure: inputs are only read, and identical inputs give identical output.
/// Fails only on malformed configuration.
pub fn generate_forecast(plan: &UserPlan, config: &ForecastConfig) -> Result<ForecastResult> {
    let sim = simulate(plan, config)?;
    let summary = summarize(config.starting_balance, &sim.months);
    let goal_progress = estimate_progress(&sim.ledger, config);

    Ok(ForecastResult {
        monthly_forecasts: sim.months,
        summary,
        goal_progress,
    })
}
