//! Frequency normalization: periodic amounts to monthly equivalents.

use chrono::NaiveDate;

use crate::config::OneTimePolicy;
use crate::month::MonthKey;
use crate::plan::{ExpenseItem, Frequency, IncomeSource};

/// Average days in a month (365.25 / 12, rounded).
pub const DAYS_PER_MONTH: f64 = 30.44;
pub const WEEKS_PER_MONTH: f64 = 4.33;
pub const BIWEEKLY_PERIODS_PER_MONTH: f64 = 2.17;

/// Monthly-equivalent of a recurring amount. One-time amounts never recur,
/// so they normalize to zero.
pub fn monthly_equivalent(amount: f64, frequency: Frequency) -> f64 {
    match frequency {
        Frequency::Daily => amount * DAYS_PER_MONTH,
        Frequency::Weekly => amount * WEEKS_PER_MONTH,
        Frequency::Biweekly => amount * BIWEEKLY_PERIODS_PER_MONTH,
        Frequency::Monthly => amount,
        Frequency::Quarterly => amount / 3.0,
        Frequency::Yearly => amount / 12.0,
        Frequency::OneTime => 0.0,
    }
}

/// The slice of an installment expense that falls in `month`:
/// `amount / months` inside `[start, start + months - 1]`, zero elsewhere.
/// Expenses without an installment plan contribute nothing here.
pub fn installment_share(expense: &ExpenseItem, month: MonthKey) -> f64 {
    let Some(plan) = expense.installment else {
        return 0.0;
    };
    if plan.months == 0 {
        return 0.0;
    }

    let offset = plan.start_month.months_until(month);
    if (0..i64::from(plan.months)).contains(&offset) {
        expense.amount / f64::from(plan.months)
    } else {
        0.0
    }
}

/// What an expense costs in `month`, ignoring its active flag.
pub fn expense_share(expense: &ExpenseItem, month: MonthKey, policy: OneTimePolicy) -> f64 {
    if expense.installment.is_some() {
        return installment_share(expense, month);
    }

    let frequency = if expense.is_recurring {
        expense.frequency.unwrap_or_default()
    } else {
        Frequency::OneTime
    };

    match frequency {
        Frequency::OneTime => dated_share(expense.amount, expense.due_date, month, policy),
        recurring => monthly_equivalent(expense.amount, recurring),
    }
}

/// What an income source pays in `month`, ignoring its active flag and start date.
pub fn income_share(source: &IncomeSource, month: MonthKey, policy: OneTimePolicy) -> f64 {
    match source.frequency {
        Frequency::OneTime => dated_share(source.amount, source.start_date, month, policy),
        recurring => monthly_equivalent(source.amount, recurring),
    }
}

fn dated_share(amount: f64, date: Option<NaiveDate>, month: MonthKey, policy: OneTimePolicy) -> f64 {
    match (policy, date) {
        (OneTimePolicy::DueMonth, Some(d)) if MonthKey::from_date(d) == month => amount,
        _ => 0.0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn month(s: &str) -> MonthKey {
        MonthKey::parse(s).unwrap()
    }

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_monthly_equivalent_factors() {
        assert!(approx(monthly_equivalent(10.0, Frequency::Daily), 304.4));
        assert!(approx(monthly_equivalent(100.0, Frequency::Weekly), 433.0));
        assert!(approx(monthly_equivalent(1000.0, Frequency::Biweekly), 2170.0));
        assert!(approx(monthly_equivalent(800.0, Frequency::Monthly), 800.0));
        assert!(approx(monthly_equivalent(300.0, Frequency::Quarterly), 100.0));
        assert!(approx(monthly_equivalent(1200.0, Frequency::Yearly), 100.0));
        assert_eq!(monthly_equivalent(5000.0, Frequency::OneTime), 0.0);
    }

    #[test]
    fn test_installment_window() {
        let laptop = ExpenseItem::new("e1", "Laptop", 1200.0).with_installment(12, month("2024-03"));

        assert_eq!(installment_share(&laptop, month("2024-02")), 0.0);
        assert!(approx(installment_share(&laptop, month("2024-03")), 100.0));
        assert!(approx(installment_share(&laptop, month("2024-12")), 100.0));
        assert!(approx(installment_share(&laptop, month("2025-02")), 100.0));
        assert_eq!(installment_share(&laptop, month("2025-03")), 0.0);
    }

    #[test]
    fn test_zero_month_installment_contributes_nothing() {
        let odd = ExpenseItem::new("e1", "Odd", 500.0).with_installment(0, month("2024-03"));
        assert_eq!(installment_share(&odd, month("2024-03")), 0.0);
    }

    #[test]
    fn test_installment_overrides_recurrence() {
        let phone = ExpenseItem::new("e1", "Phone", 600.0)
            .with_frequency(Frequency::Weekly)
            .with_installment(6, month("2024-01"));
        assert!(approx(expense_share(&phone, month("2024-01"), OneTimePolicy::Exclude), 100.0));
        assert_eq!(expense_share(&phone, month("2024-07"), OneTimePolicy::Exclude), 0.0);
    }

    #[test]
    fn test_recurring_without_frequency_is_monthly() {
        let mut gym = ExpenseItem::new("e1", "Gym", 40.0);
        gym.frequency = None;
        assert!(approx(expense_share(&gym, month("2024-01"), OneTimePolicy::Exclude), 40.0));
    }

    #[test]
    fn test_one_off_expense_policy() {
        let due = NaiveDate::from_ymd_opt(2024, 6, 15).unwrap();
        let repair = ExpenseItem::new("e1", "Car repair", 900.0).one_off(due);

        assert_eq!(expense_share(&repair, month("2024-06"), OneTimePolicy::Exclude), 0.0);
        assert_eq!(expense_share(&repair, month("2024-06"), OneTimePolicy::DueMonth), 900.0);
        assert_eq!(expense_share(&repair, month("2024-07"), OneTimePolicy::DueMonth), 0.0);
    }

    #[test]
    fn test_one_time_income_lands_in_start_month() {
        let bonus = IncomeSource::new("i1", "Bonus", 3000.0, Frequency::OneTime)
            .with_start_date(NaiveDate::from_ymd_opt(2024, 12, 1).unwrap());

        assert_eq!(income_share(&bonus, month("2024-12"), OneTimePolicy::Exclude), 0.0);
        assert_eq!(income_share(&bonus, month("2024-12"), OneTimePolicy::DueMonth), 3000.0);
        assert_eq!(income_share(&bonus, month("2025-01"), OneTimePolicy::DueMonth), 0.0);
    }
}
