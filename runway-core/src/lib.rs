//! runway-core: cash-flow forecast and priority goal-allocation engine.
//!
//! Pure and synchronous. Takes a [`UserPlan`] snapshot plus a
//! [`ForecastConfig`], returns plain result records, never mutates its inputs.

pub mod config;
pub mod error;
pub mod estimator;
pub mod forecast;
pub mod month;
pub mod normalizer;
pub mod plan;
pub mod projector;
pub mod schedule;
pub mod scheduler;
pub mod summary;

pub use config::{ForecastConfig, OneTimePolicy, DEFAULT_FORECAST_MONTHS, MAX_FORECAST_MONTHS};
pub use error::{EngineError, Result};
pub use estimator::GoalProgress;
pub use forecast::{generate_forecast, ForecastResult};
pub use month::MonthKey;
pub use normalizer::{installment_share, monthly_equivalent};
pub use plan::{
    ExpenseCategory, ExpenseItem, ForecastSettings, Frequency, Goal, GoalType, IncomeSource,
    Installment, UserPlan,
};
pub use projector::{project_month, MonthCashFlow, MonthlyForecast};
pub use schedule::{
    generate_monthly_goal_allocation_schedule, AllocationSchedule, AllocationSummary, Guidance,
    MonthlyAllocation,
};
pub use scheduler::{GoalAccount, GoalAllocation, GoalLedger};
pub use summary::ForecastSummary;
