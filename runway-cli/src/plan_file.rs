use anyhow::{bail, Context, Result};
use chrono::NaiveDate;
use runway_core::{
    ExpenseCategory, ExpenseItem, Frequency, Goal, IncomeSource, MonthKey, UserPlan,
};
use std::fs;
use std::path::Path;

/// Read a plan JSON file (camelCase fields, as exported by the app).
pub fn load_plan(path: &Path) -> Result<UserPlan> {
    if !path.exists() {
        bail!("plan not found: {} (create one with `runway init-plan`)", path.display());
    }
    let s = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    serde_json::from_str(&s).with_context(|| format!("parse {}", path.display()))
}

pub fn write_sample_plan(path: &Path, start: MonthKey) -> Result<()> {
    if path.exists() {
        bail!("refusing to overwrite {}", path.display());
    }
    let json = serde_json::to_string_pretty(&sample_plan(start)).context("serialize plan")?;
    fs::write(path, json).with_context(|| format!("write {}", path.display()))?;
    Ok(())
}

/// A small household plan anchored at `start`.
pub fn sample_plan(start: MonthKey) -> UserPlan {
    let on = |months_ahead: i64| {
        let m = start.add_months(months_ahead);
        NaiveDate::from_ymd_opt(m.year(), m.month(), 1).unwrap_or(NaiveDate::MIN)
    };
    let first = on(0);

    UserPlan {
        income: vec![
            IncomeSource::new("salary", "Salary", 4_800.0, Frequency::Monthly).with_start_date(first),
            IncomeSource::new("freelance", "Freelance", 250.0, Frequency::Weekly),
        ],
        expenses: vec![
            ExpenseItem::new("rent", "Rent", 1_650.0).with_category(ExpenseCategory::Housing),
            ExpenseItem::new("groceries", "Groceries", 110.0)
                .with_category(ExpenseCategory::Food)
                .with_frequency(Frequency::Weekly),
            ExpenseItem::new("transit", "Transit pass", 95.0)
                .with_category(ExpenseCategory::Transportation),
            ExpenseItem::new("insurance", "Renters insurance", 240.0)
                .with_category(ExpenseCategory::Insurance)
                .with_frequency(Frequency::Yearly),
            ExpenseItem::new("laptop", "Laptop", 1_800.0)
                .with_category(ExpenseCategory::Personal)
                .with_installment(12, start),
        ],
        goals: vec![
            Goal::fixed("emergency", "Emergency fund", 6_000.0, on(6))
                .with_current(1_500.0)
                .with_priority(1),
            Goal::fixed("vacation", "Vacation", 2_500.0, on(10)).with_priority(2),
            Goal::open_ended("invest", "Index fund", on(60)).with_priority(3),
        ],
        current_balance: 2_000.0,
        forecast_settings: None,
    }
}

/// Current local calendar month.
pub fn this_month() -> MonthKey {
    MonthKey::from_date(chrono::Local::now().date_naive())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn start() -> MonthKey {
        MonthKey::parse("2025-03").unwrap()
    }

    #[test]
    fn test_sample_plan_round_trips_through_file() {
        let dir = tempfile::tempdir().unwrap();
        let p = dir.path().join("plan.json");
        write_sample_plan(&p, start()).unwrap();

        let loaded = load_plan(&p).unwrap();
        assert_eq!(loaded, sample_plan(start()));
        assert_eq!(loaded.goals.len(), 3);
    }

    #[test]
    fn test_refuses_overwrite() {
        let dir = tempfile::tempdir().unwrap();
        let p = dir.path().join("plan.json");
        fs::write(&p, "{}").unwrap();
        assert!(write_sample_plan(&p, start()).is_err());
    }

    #[test]
    fn test_missing_and_malformed_plans() {
        let dir = tempfile::tempdir().unwrap();
        let missing = load_plan(&dir.path().join("nope.json")).unwrap_err();
        assert!(missing.to_string().contains("plan not found"));

        let bad = dir.path().join("bad.json");
        fs::write(&bad, "{\"income\": 5}").unwrap();
        let err = load_plan(&bad).unwrap_err();
        assert!(err.to_string().starts_with("parse "));
    }

    #[test]
    fn test_empty_object_is_an_empty_plan() {
        let dir = tempfile::tempdir().unwrap();
        let p = dir.path().join("empty.json");
        fs::write(&p, "{}").unwrap();
        assert_eq!(load_plan(&p).unwrap(), UserPlan::default());
    }
}
