use crate::models::{
    CategoryTotal, DashboardSummary, Expense, Income, LedgerStats, PeriodStats, StatsResponse,
};
use chrono::{DateTime, Datelike, Local, NaiveDate};

/// Anything with an amount booked against a category on a calendar date.
pub trait LedgerEntry {
    fn amount(&self) -> f64;
    fn category(&self) -> &str;
    fn date(&self) -> &str;
}

impl LedgerEntry for Expense {
    fn amount(&self) -> f64 {
        self.amount
    }

    fn category(&self) -> &str {
        &self.category
    }

    fn date(&self) -> &str {
        &self.date
    }
}

impl LedgerEntry for Income {
    fn amount(&self) -> f64 {
        self.amount
    }

    fn category(&self) -> &str {
        &self.category
    }

    fn date(&self) -> &str {
        &self.date
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Period {
    Month { year: i32, month: u32 },
    Year(i32),
}

impl Period {
    pub fn month_of(date: NaiveDate) -> Self {
        Period::Month {
            year: date.year(),
            month: date.month(),
        }
    }

    pub fn previous_month_of(date: NaiveDate) -> Self {
        if date.month() == 1 {
            Period::Month {
                year: date.year() - 1,
                month: 12,
            }
        } else {
            Period::Month {
                year: date.year(),
                month: date.month() - 1,
            }
        }
    }

    pub fn contains(self, date: NaiveDate) -> bool {
        match self {
            Period::Month { year, month } => date.year() == year && date.month() == month,
            Period::Year(year) => date.year() == year,
        }
    }

    /// Unparseable dates never fall inside any period.
    pub fn contains_raw(self, raw: &str) -> bool {
        parse_date(raw).is_some_and(|date| self.contains(date))
    }
}

pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .or_else(|| DateTime::parse_from_rfc3339(raw).ok().map(|dt| dt.date_naive()))
}

pub fn period_total<E: LedgerEntry>(entries: &[E], period: Period) -> f64 {
    entries
        .iter()
        .filter(|entry| period.contains_raw(entry.date()))
        .map(|entry| entry.amount())
        .sum()
}

pub fn period_stats(incomes: &[Income], expenses: &[Expense], period: Period) -> PeriodStats {
    let total_income = period_total(incomes, period);
    let total_expense = period_total(expenses, period);
    let savings = total_income - total_expense;
    PeriodStats {
        total_income,
        total_expense,
        savings,
        positive: savings >= 0.0,
    }
}

pub fn ledger_stats_at(today: NaiveDate, incomes: &[Income], expenses: &[Expense]) -> LedgerStats {
    LedgerStats {
        current_month: period_stats(incomes, expenses, Period::month_of(today)),
        previous_month: period_stats(incomes, expenses, Period::previous_month_of(today)),
        current_year: period_stats(incomes, expenses, Period::Year(today.year())),
        previous_year: period_stats(incomes, expenses, Period::Year(today.year() - 1)),
    }
}

/// Sums per category, in order of each category's first appearance.
pub fn category_totals<E: LedgerEntry>(entries: &[E]) -> Vec<CategoryTotal> {
    let mut totals: Vec<CategoryTotal> = Vec::new();
    for entry in entries {
        match totals.iter_mut().find(|total| total.category == entry.category()) {
            Some(total) => total.amount += entry.amount(),
            None => totals.push(CategoryTotal {
                category: entry.category().to_string(),
                amount: entry.amount(),
            }),
        }
    }
    totals
}

/// Category totals largest first; equal amounts keep first-appearance order.
pub fn category_totals_by_amount<E: LedgerEntry>(entries: &[E]) -> Vec<CategoryTotal> {
    let mut totals = category_totals(entries);
    totals.sort_by(|a, b| b.amount.total_cmp(&a.amount));
    totals
}

pub fn dashboard_summary_at(today: NaiveDate, total_links: usize, expenses: &[Expense]) -> DashboardSummary {
    DashboardSummary {
        total_links,
        month_expenses: period_total(expenses, Period::month_of(today)),
    }
}

pub fn build_stats(total_links: usize, incomes: &[Income], expenses: &[Expense]) -> StatsResponse {
    build_stats_at(Local::now().date_naive(), total_links, incomes, expenses)
}

pub fn build_stats_at(
    today: NaiveDate,
    total_links: usize,
    incomes: &[Income],
    expenses: &[Expense],
) -> StatsResponse {
    StatsResponse {
        periods: ledger_stats_at(today, incomes, expenses),
        expense_categories: category_totals_by_amount(expenses),
        income_categories: category_totals(incomes),
        dashboard: dashboard_summary_at(today, total_links, expenses),
    }
}

pub fn format_amount(value: f64) -> String {
    format!("₹{value:.2}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn expense(title: &str, amount: f64, category: &str, date: &str) -> Expense {
        Expense {
            id: Uuid::new_v4(),
            title: title.into(),
            amount,
            category: category.into(),
            payment_mode: "Cash".into(),
            date: date.into(),
            timestamp: 0,
        }
    }

    fn income(amount: f64, category: &str, date: &str) -> Income {
        Income {
            id: Uuid::new_v4(),
            title: "Pay".into(),
            amount,
            category: category.into(),
            date: date.into(),
            timestamp: 0,
        }
    }

    fn day(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).unwrap()
    }

    #[test]
    fn coffee_shows_up_in_month_year_and_category() {
        let expenses = vec![expense("Coffee", 4.50, "Food", "2024-03-01")];
        let stats = build_stats_at(day(2024, 3, 15), 0, &[], &expenses);

        assert_eq!(stats.periods.current_month.total_expense, 4.50);
        assert_eq!(stats.periods.current_year.total_expense, 4.50);
        assert_eq!(stats.periods.previous_month.total_expense, 0.0);
        assert_eq!(stats.dashboard.month_expenses, 4.50);
        assert_eq!(
            stats.expense_categories,
            vec![CategoryTotal {
                category: "Food".into(),
                amount: 4.50
            }]
        );
    }

    #[test]
    fn savings_are_income_minus_expense() {
        let incomes = vec![income(1000.0, "Salary", "2024-05-02")];
        let expenses = vec![expense("Rent", 400.0, "Housing", "2024-05-03")];
        let stats = ledger_stats_at(day(2024, 5, 20), &incomes, &expenses);

        assert_eq!(stats.current_month.savings, 600.0);
        assert!(stats.current_month.positive);
    }

    #[test]
    fn negative_savings_are_flagged() {
        let expenses = vec![expense("Trip", 250.0, "Travel", "2024-05-03")];
        let stats = ledger_stats_at(day(2024, 5, 20), &[], &expenses);
        assert_eq!(stats.current_month.savings, -250.0);
        assert!(!stats.current_month.positive);
    }

    #[test]
    fn january_looks_back_to_december_of_last_year() {
        let expenses = vec![
            expense("Gifts", 80.0, "Shopping", "2023-12-24"),
            expense("Old", 5.0, "Shopping", "2024-12-24"),
        ];
        let stats = ledger_stats_at(day(2024, 1, 10), &[], &expenses);

        assert_eq!(stats.previous_month.total_expense, 80.0);
        assert_eq!(stats.previous_year.total_expense, 80.0);
        assert_eq!(stats.current_year.total_expense, 5.0);
    }

    #[test]
    fn same_month_of_another_year_is_not_current_month() {
        let expenses = vec![expense("Coffee", 3.0, "Food", "2023-03-04")];
        let stats = ledger_stats_at(day(2024, 3, 10), &[], &expenses);
        assert_eq!(stats.current_month.total_expense, 0.0);
    }

    #[test]
    fn unparseable_dates_are_skipped_by_periods_only() {
        let expenses = vec![
            expense("Coffee", 4.0, "Food", "2024-03-01"),
            expense("Mystery", 9.0, "Food", "someday"),
        ];
        let stats = build_stats_at(day(2024, 3, 2), 0, &[], &expenses);

        assert_eq!(stats.periods.current_month.total_expense, 4.0);
        assert_eq!(stats.periods.current_year.total_expense, 4.0);
        assert_eq!(stats.expense_categories[0].amount, 13.0);
    }

    #[test]
    fn rfc3339_dates_are_accepted() {
        assert_eq!(parse_date("2024-03-01T10:00:00Z"), Some(day(2024, 3, 1)));
        assert_eq!(parse_date(" 2024-03-01 "), Some(day(2024, 3, 1)));
        assert_eq!(parse_date("2024-02-30"), None);
    }

    #[test]
    fn category_totals_keep_first_appearance_order() {
        let expenses = vec![
            expense("a", 1.0, "Food", "2024-01-01"),
            expense("b", 10.0, "Travel", "2024-01-01"),
            expense("c", 2.0, "Food", "2024-01-01"),
        ];
        let totals = category_totals(&expenses);
        let names: Vec<_> = totals.iter().map(|t| t.category.as_str()).collect();
        assert_eq!(names, ["Food", "Travel"]);
        assert_eq!(totals[0].amount, 3.0);

        let sorted = category_totals_by_amount(&expenses);
        let names: Vec<_> = sorted.iter().map(|t| t.category.as_str()).collect();
        assert_eq!(names, ["Travel", "Food"]);
    }

    #[test]
    fn category_totals_match_sum_of_yearly_totals() {
        let expenses = vec![
            expense("a", 12.25, "Food", "2022-07-01"),
            expense("b", 3.5, "Bills", "2023-01-31"),
            expense("c", 40.0, "Food", "2023-11-11"),
            expense("d", 7.75, "Travel", "2024-02-29"),
        ];
        let by_category: f64 = category_totals(&expenses).iter().map(|t| t.amount).sum();
        let by_year: f64 = (2022..=2024)
            .map(|year| period_total(&expenses, Period::Year(year)))
            .sum();
        assert!((by_category - by_year).abs() < 1e-9);
    }

    #[test]
    fn amounts_are_rounded_for_display_only() {
        let expenses = vec![
            expense("a", 0.1, "Food", "2024-01-01"),
            expense("b", 0.2, "Food", "2024-01-01"),
        ];
        let total = period_total(&expenses, Period::Year(2024));
        assert_ne!(total, 0.3);
        assert_eq!(format_amount(total), "₹0.30");
    }
}
