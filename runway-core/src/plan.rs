//! Plan record types: income sources, expenses and savings goals.
//!
//! These are the plain snapshot the engine consumes. JSON field names are
//! camelCase so plans exported by the app load unchanged.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::month::MonthKey;

/// Recurrence of an income or expense amount.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Frequency {
    Daily,
    Weekly,
    Biweekly,
    #[default]
    Monthly,
    Quarterly,
    Yearly,
    OneTime,
}

impl Frequency {
    pub fn is_recurring(&self) -> bool {
        !matches!(self, Frequency::OneTime)
    }
}

/// How a goal absorbs surplus.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum GoalType {
    /// Capped at `target_amount`; stops receiving once met.
    #[default]
    FixedAmount,
    /// No cap; absorbs whatever reaches it.
    OpenEnded,
}

/// Expense categories. Descriptive only; the engine never branches on them.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExpenseCategory {
    Housing,
    Transportation,
    Food,
    Utilities,
    Insurance,
    Healthcare,
    Debt,
    Entertainment,
    Subscriptions,
    Education,
    Personal,
    Savings,
    #[default]
    Other,
}

impl ExpenseCategory {
    pub fn label(&self) -> &'static str {
        match self {
            ExpenseCategory::Housing => "housing",
            ExpenseCategory::Transportation => "transportation",
            ExpenseCategory::Food => "food",
            ExpenseCategory::Utilities => "utilities",
            ExpenseCategory::Insurance => "insurance",
            ExpenseCategory::Healthcare => "healthcare",
            ExpenseCategory::Debt => "debt",
            ExpenseCategory::Entertainment => "entertainment",
            ExpenseCategory::Subscriptions => "subscriptions",
            ExpenseCategory::Education => "education",
            ExpenseCategory::Personal => "personal",
            ExpenseCategory::Savings => "savings",
            ExpenseCategory::Other => "other",
        }
    }
}

/// A purchase split evenly over consecutive months.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Installment {
    pub months: u32,
    pub start_month: MonthKey,
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IncomeSource {
    pub id: String,
    pub name: String,
    pub amount: f64,
    #[serde(default)]
    pub frequency: Frequency,
    #[serde(default = "default_true")]
    pub is_active: bool,
    /// First day this source pays out. `None` means it already does.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl IncomeSource {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        amount: f64,
        frequency: Frequency,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            amount,
            frequency,
            is_active: true,
            start_date: None,
            description: None,
        }
    }

    pub fn with_start_date(mut self, start_date: NaiveDate) -> Self {
        self.start_date = Some(start_date);
        self
    }

    pub fn inactive(mut self) -> Self {
        self.is_active = false;
        self
    }

    /// True if the source has started paying by `month`.
    pub fn started_by(&self, month: MonthKey) -> bool {
        self.start_date
            .map(|d| MonthKey::from_date(d) <= month)
            .unwrap_or(true)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExpenseItem {
    pub id: String,
    pub name: String,
    pub amount: f64,
    #[serde(default)]
    pub category: ExpenseCategory,
    #[serde(default = "default_true")]
    pub is_active: bool,
    #[serde(default = "default_true")]
    pub is_recurring: bool,
    /// Ignored unless `is_recurring`; missing means monthly.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub frequency: Option<Frequency>,
    /// When set, overrides `is_recurring` and `frequency`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub installment: Option<Installment>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due_date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl ExpenseItem {
    /// A recurring monthly expense.
    pub fn new(id: impl Into<String>, name: impl Into<String>, amount: f64) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            amount,
            category: ExpenseCategory::Other,
            is_active: true,
            is_recurring: true,
            frequency: Some(Frequency::Monthly),
            installment: None,
            due_date: None,
            description: None,
        }
    }

    pub fn with_category(mut self, category: ExpenseCategory) -> Self {
        self.category = category;
        self
    }

    pub fn with_frequency(mut self, frequency: Frequency) -> Self {
        self.is_recurring = true;
        self.frequency = Some(frequency);
        self
    }

    /// A single payment due on `due_date`.
    pub fn one_off(mut self, due_date: NaiveDate) -> Self {
        self.is_recurring = false;
        self.frequency = None;
        self.due_date = Some(due_date);
        self
    }

    pub fn with_installment(mut self, months: u32, start_month: MonthKey) -> Self {
        self.installment = Some(Installment {
            months,
            start_month,
        });
        self
    }

    pub fn inactive(mut self) -> Self {
        self.is_active = false;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Goal {
    pub id: String,
    pub name: String,
    /// Ignored for open-ended goals.
    #[serde(default)]
    pub target_amount: f64,
    /// Saved before the simulation starts. Read-only to the engine.
    #[serde(default)]
    pub current_amount: f64,
    pub target_date: NaiveDate,
    #[serde(default = "default_true")]
    pub is_active: bool,
    #[serde(default)]
    pub goal_type: GoalType,
    /// Lower is served first.
    #[serde(default)]
    pub priority_order: i32,
}

impl Goal {
    pub fn fixed(
        id: impl Into<String>,
        name: impl Into<String>,
        target_amount: f64,
        target_date: NaiveDate,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            target_amount,
            current_amount: 0.0,
            target_date,
            is_active: true,
            goal_type: GoalType::FixedAmount,
            priority_order: 0,
        }
    }

    pub fn open_ended(id: impl Into<String>, name: impl Into<String>, target_date: NaiveDate) -> Self {
        Self {
            goal_type: GoalType::OpenEnded,
            ..Self::fixed(id, name, 0.0, target_date)
        }
    }

    pub fn with_current(mut self, current_amount: f64) -> Self {
        self.current_amount = current_amount;
        self
    }

    pub fn with_priority(mut self, priority_order: i32) -> Self {
        self.priority_order = priority_order;
        self
    }

    pub fn inactive(mut self) -> Self {
        self.is_active = false;
        self
    }
}

/// Forecast preferences stored alongside a plan. Every field is optional.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ForecastSettings {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub months: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub include_goal_contributions: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub conservative_mode: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub one_time_expenses: Option<crate::config::OneTimePolicy>,
}

/// Snapshot of a user's financial records.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserPlan {
    #[serde(default)]
    pub income: Vec<IncomeSource>,
    #[serde(default)]
    pub expenses: Vec<ExpenseItem>,
    #[serde(default)]
    pub goals: Vec<Goal>,
    #[serde(default)]
    pub current_balance: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub forecast_settings: Option<ForecastSettings>,
}
