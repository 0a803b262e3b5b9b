//! Summarises a user's transactions for the dashboard.
//!
//! Everything here is pure: the caller supplies "now" and the local timezone,
//! so the same inputs always give the same summary.

use std::{collections::HashMap, ops::RangeInclusive};

use serde::{Deserialize, Serialize};
use time::{Date, Duration, OffsetDateTime, PrimitiveDateTime, Time};
use time_tz::{Offset, OffsetDateTimeExt, OffsetResult, PrimitiveDateTimeExt, TimeZone, Tz};

use crate::transaction::{Transaction, TransactionKind};

/// The monthly budget shown when the user has not set any monthly budgets.
pub const DEFAULT_MONTHLY_BUDGET: f64 = 2000.0;

/// How many of the latest transactions the summary includes.
pub const RECENT_TRANSACTION_COUNT: usize = 5;

/// The total spent in one category during the month.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategorySummary {
    /// The category name.
    pub category: String,
    /// The summed expense amount.
    pub amount: f64,
    /// The share of the month's expenses, rounded to a whole percent.
    pub percentage: u32,
}

/// An overview of the current month and the latest transactions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSummary {
    /// Income earned this month.
    pub total_income: f64,
    /// Money spent this month.
    pub total_expenses: f64,
    /// Income minus expenses for this month.
    pub balance: f64,
    /// The budget the month's expenses are compared against.
    pub monthly_budget: f64,
    /// Budget minus expenses, negative when overspent.
    pub budget_remaining: f64,
    /// This month's expenses per category, largest first.
    pub transactions_by_category: Vec<CategorySummary>,
    /// The latest transactions of all time, newest first.
    pub recent_transactions: Vec<Transaction>,
}

/// The first and last instants of the local calendar month containing `now`.
///
/// Each bound carries the UTC offset in effect at that instant, so a month
/// that starts in daylight saving time and ends outside it is still covered
/// from its first local midnight to its last.
pub fn month_bounds(now: OffsetDateTime, timezone: &Tz) -> RangeInclusive<OffsetDateTime> {
    let today = now.to_timezone(timezone).date();
    let first_day = today - Duration::days(i64::from(today.day()) - 1);
    // Day 1 plus 31 days always lands in the following month.
    let day_in_next_month = first_day + Duration::days(31);
    let first_day_of_next_month =
        day_in_next_month - Duration::days(i64::from(day_in_next_month.day()) - 1);

    let start = start_of_day(first_day, timezone);
    let next_start = start_of_day(first_day_of_next_month, timezone);

    start..=(next_start - Duration::NANOSECOND)
}

/// The first instant of the local calendar day `date`.
///
/// A repeated midnight resolves to the earlier instant. A midnight skipped by
/// a daylight saving gap resolves to the instant the gap starts.
fn start_of_day(date: Date, timezone: &Tz) -> OffsetDateTime {
    let midnight = PrimitiveDateTime::new(date, Time::MIDNIGHT);

    match midnight.assume_timezone(timezone) {
        OffsetResult::Some(start) => start,
        OffsetResult::Ambiguous(first, second) => first.min(second),
        OffsetResult::None => {
            let offset_before_gap = timezone
                .get_offset_utc(&(midnight.assume_utc() - Duration::days(1)))
                .to_utc();
            midnight.assume_offset(offset_before_gap)
        }
    }
}

/// Group expenses by category, largest total first.
///
/// Categories with equal totals keep the order they first appeared in.
pub fn group_expenses_by_category<'a>(
    expenses: impl IntoIterator<Item = &'a Transaction>,
) -> Vec<CategorySummary> {
    let mut positions: HashMap<&str, usize> = HashMap::new();
    let mut groups: Vec<CategorySummary> = Vec::new();

    for transaction in expenses {
        match positions.get(transaction.category.as_str()) {
            Some(&index) => groups[index].amount += transaction.amount,
            None => {
                positions.insert(&transaction.category, groups.len());
                groups.push(CategorySummary {
                    category: transaction.category.clone(),
                    amount: transaction.amount,
                    percentage: 0,
                });
            }
        }
    }

    let total = groups.iter().fold(0.0, |total, group| total + group.amount);
    if total > 0.0 {
        for group in &mut groups {
            group.percentage = (100.0 * group.amount / total).round() as u32;
        }
    }

    // `sort_by` is stable, so ties stay in first-seen order.
    groups.sort_by(|a, b| b.amount.total_cmp(&a.amount));

    groups
}

/// The `count` latest transactions, newest first.
pub fn recent_transactions(transactions: &[Transaction], count: usize) -> Vec<Transaction> {
    let mut sorted: Vec<&Transaction> = transactions.iter().collect();
    sorted.sort_by(|a, b| b.date.cmp(&a.date));

    sorted.into_iter().take(count).cloned().collect()
}

/// Summarise `transactions` for the calendar month containing `now` in `timezone`.
///
/// Totals and the category breakdown only count transactions dated within the
/// month, bounds included. The recent transactions are taken from the whole list.
pub fn calculate_dashboard_summary(
    transactions: &[Transaction],
    monthly_budget: f64,
    now: OffsetDateTime,
    timezone: &Tz,
) -> DashboardSummary {
    let month = month_bounds(now, timezone);
    let this_month: Vec<&Transaction> = transactions
        .iter()
        .filter(|transaction| month.contains(&transaction.date))
        .collect();

    // Empty totals must be 0.0, `Iterator::sum` starts from -0.0.
    let sum_of = |kind: TransactionKind| -> f64 {
        this_month
            .iter()
            .filter(|transaction| transaction.kind == kind)
            .fold(0.0, |total, transaction| total + transaction.amount)
    };
    let total_income = sum_of(TransactionKind::Income);
    let total_expenses = sum_of(TransactionKind::Expense);

    let transactions_by_category = group_expenses_by_category(
        this_month
            .iter()
            .copied()
            .filter(|transaction| transaction.kind == TransactionKind::Expense),
    );

    DashboardSummary {
        total_income,
        total_expenses,
        balance: total_income - total_expenses,
        monthly_budget,
        budget_remaining: monthly_budget - total_expenses,
        transactions_by_category,
        recent_transactions: recent_transactions(transactions, RECENT_TRANSACTION_COUNT),
    }
}

#[cfg(test)]
mod tests {
    use time::{
        Duration, OffsetDateTime,
        macros::{datetime, offset},
    };
    use time_tz::{
        Tz,
        timezones::db::{UTC, pacific::AUCKLAND},
    };

    use crate::{
        transaction::{Transaction, TransactionKind},
        user::UserId,
    };

    use super::{
        CategorySummary, calculate_dashboard_summary, group_expenses_by_category, month_bounds,
    };

    fn create_test_transaction(
        id: i64,
        kind: TransactionKind,
        amount: f64,
        category: &str,
        date: OffsetDateTime,
    ) -> Transaction {
        Transaction {
            id,
            user_id: UserId::new_unchecked("alice"),
            kind,
            amount,
            category: category.to_owned(),
            description: String::new(),
            notes: String::new(),
            date,
            created_at: date,
            updated_at: date,
        }
    }

    fn expense(id: i64, amount: f64, category: &str, date: OffsetDateTime) -> Transaction {
        create_test_transaction(id, TransactionKind::Expense, amount, category, date)
    }

    fn income(id: i64, amount: f64, category: &str, date: OffsetDateTime) -> Transaction {
        create_test_transaction(id, TransactionKind::Income, amount, category, date)
    }

    fn summarise_utc(
        transactions: &[Transaction],
        monthly_budget: f64,
        now: OffsetDateTime,
    ) -> super::DashboardSummary {
        calculate_dashboard_summary(transactions, monthly_budget, now, UTC)
    }

    fn march_scenario() -> Vec<Transaction> {
        vec![
            expense(1, 50.0, "Food", datetime!(2024-03-01 0:00 UTC)),
            income(2, 1000.0, "Salary", datetime!(2024-03-02 0:00 UTC)),
            expense(3, 30.0, "Food", datetime!(2024-02-15 0:00 UTC)),
        ]
    }

    #[test]
    fn summarises_the_current_month() {
        let summary = summarise_utc(&march_scenario(), 500.0, datetime!(2024-03-15 0:00 UTC));

        assert_eq!(summary.total_expenses, 50.0);
        assert_eq!(summary.total_income, 1000.0);
        assert_eq!(summary.balance, 950.0);
        assert_eq!(summary.monthly_budget, 500.0);
        assert_eq!(summary.budget_remaining, 450.0);
        assert_eq!(
            summary.transactions_by_category,
            vec![CategorySummary {
                category: "Food".to_owned(),
                amount: 50.0,
                percentage: 100,
            }]
        );
        let recent_ids: Vec<i64> = summary
            .recent_transactions
            .iter()
            .map(|transaction| transaction.id)
            .collect();
        assert_eq!(recent_ids, vec![2, 1, 3]);
    }

    #[test]
    fn empty_list_gives_zeroes() {
        let summary = summarise_utc(&[], 2000.0, datetime!(2024-03-15 0:00 UTC));

        assert_eq!(summary.total_income, 0.0);
        assert_eq!(summary.total_expenses, 0.0);
        assert_eq!(summary.balance, 0.0);
        assert_eq!(summary.budget_remaining, 2000.0);
        assert!(summary.transactions_by_category.is_empty());
        assert!(summary.recent_transactions.is_empty());
    }

    #[test]
    fn empty_totals_are_positive_zero() {
        let summary = summarise_utc(&[], 2000.0, datetime!(2024-03-15 0:00 UTC));

        assert!(summary.total_income.is_sign_positive());
        assert!(summary.total_expenses.is_sign_positive());
        assert!(summary.balance.is_sign_positive());

        let json = serde_json::to_string(&summary).unwrap();
        assert!(!json.contains("-0"), "got {json}");
    }

    #[test]
    fn income_only_month_has_positive_zero_expenses() {
        let transactions = vec![income(1, 900.0, "Salary", datetime!(2024-03-05 0:00 UTC))];

        let summary = summarise_utc(&transactions, 100.0, datetime!(2024-03-15 0:00 UTC));

        assert_eq!(summary.total_expenses, 0.0);
        assert!(summary.total_expenses.is_sign_positive());
        assert!(summary.transactions_by_category.is_empty());
        assert_eq!(summary.recent_transactions.len(), 1);
    }

    #[test]
    fn budget_remaining_can_be_negative() {
        let transactions = vec![expense(1, 750.0, "Rent", datetime!(2024-03-03 0:00 UTC))];

        let summary = summarise_utc(&transactions, 500.0, datetime!(2024-03-15 0:00 UTC));

        assert_eq!(summary.budget_remaining, -250.0);
    }

    #[test]
    fn month_bounds_are_inclusive() {
        let now = datetime!(2024-02-10 12:00 UTC);
        let bounds = month_bounds(now, UTC);
        assert_eq!(*bounds.start(), datetime!(2024-02-01 0:00 UTC));
        assert_eq!(
            *bounds.end(),
            datetime!(2024-03-01 0:00 UTC) - Duration::NANOSECOND
        );

        let transactions = vec![
            expense(1, 1.0, "A", *bounds.start()),
            expense(2, 2.0, "A", *bounds.end()),
            expense(3, 4.0, "A", datetime!(2024-03-01 0:00 UTC)),
            expense(4, 8.0, "A", *bounds.start() - Duration::NANOSECOND),
        ];

        let summary = summarise_utc(&transactions, 0.0, now);

        assert_eq!(summary.total_expenses, 3.0);
    }

    #[test]
    fn month_follows_the_local_date() {
        // 11:30 UTC on the 31st of December is already January in Auckland.
        let bounds = month_bounds(datetime!(2024-12-31 11:30 UTC), AUCKLAND);

        assert_eq!(*bounds.start(), datetime!(2025-01-01 0:00 +13:00));
        assert_eq!(
            *bounds.end(),
            datetime!(2025-02-01 0:00 +13:00) - Duration::NANOSECOND
        );
    }

    #[test]
    fn month_bounds_use_the_offset_in_effect_at_each_bound() {
        // Daylight saving ends in Auckland on 7 April 2024.
        let bounds = month_bounds(datetime!(2024-04-15 12:00 +12:00), AUCKLAND);

        assert_eq!(*bounds.start(), datetime!(2024-04-01 0:00 +13:00));
        assert_eq!(bounds.start().offset(), offset!(+13:00));
        assert_eq!(
            *bounds.end(),
            datetime!(2024-05-01 0:00 +12:00) - Duration::NANOSECOND
        );
    }

    #[test]
    fn first_local_hour_of_a_daylight_saving_month_is_counted() {
        let timezone: &Tz = AUCKLAND;
        let transactions = vec![
            expense(1, 10.0, "Food", datetime!(2024-04-01 0:30 +13:00)),
            expense(2, 20.0, "Food", datetime!(2024-03-31 23:30 +13:00)),
        ];

        let summary = calculate_dashboard_summary(
            &transactions,
            100.0,
            datetime!(2024-04-15 12:00 +12:00),
            timezone,
        );

        assert_eq!(summary.total_expenses, 10.0);
    }

    #[test]
    fn breakdown_is_sorted_descending_and_keeps_ties_in_order() {
        let date = datetime!(2024-03-05 0:00 UTC);
        let transactions = vec![
            expense(1, 20.0, "Fun", date),
            expense(2, 50.0, "Rent", date),
            expense(3, 20.0, "Food", date),
            income(4, 500.0, "Salary", date),
        ];

        let summary = summarise_utc(&transactions, 0.0, date);

        let categories: Vec<&str> = summary
            .transactions_by_category
            .iter()
            .map(|group| group.category.as_str())
            .collect();
        assert_eq!(categories, vec!["Rent", "Fun", "Food"]);
    }

    #[test]
    fn percentages_are_rounded_shares() {
        let date = datetime!(2024-03-05 0:00 UTC);
        let transactions = vec![
            expense(1, 1.0, "A", date),
            expense(2, 1.0, "B", date),
            expense(3, 1.0, "C", date),
        ];

        let groups = group_expenses_by_category(&transactions);

        assert!(groups.iter().all(|group| group.percentage == 33));
        let total: u32 = groups.iter().map(|group| group.percentage).sum();
        assert!(total.abs_diff(100) <= groups.len() as u32);
    }

    #[test]
    fn summary_properties_hold() {
        let now = datetime!(2024-03-20 0:00 UTC);
        let categories = ["Food", "Rent", "Fuel", "Fun"];
        let transactions: Vec<Transaction> = (0..40)
            .map(|i| {
                let kind = if i % 4 == 0 {
                    TransactionKind::Income
                } else {
                    TransactionKind::Expense
                };
                create_test_transaction(
                    i,
                    kind,
                    (i as f64 * 3.7) + 1.25,
                    categories[i as usize % categories.len()],
                    datetime!(2024-02-10 0:00 UTC) + Duration::days(i),
                )
            })
            .collect();

        let summary = summarise_utc(&transactions, 1234.0, now);

        assert_eq!(summary.balance, summary.total_income - summary.total_expenses);
        let category_total: f64 = summary
            .transactions_by_category
            .iter()
            .map(|group| group.amount)
            .sum();
        assert!((category_total - summary.total_expenses).abs() < 1e-9);
        let percentage_total: u32 = summary
            .transactions_by_category
            .iter()
            .map(|group| group.percentage)
            .sum();
        assert!(
            percentage_total.abs_diff(100) <= summary.transactions_by_category.len() as u32
        );
        assert_eq!(summary.recent_transactions.len(), 5);
        assert!(
            summary
                .recent_transactions
                .windows(2)
                .all(|pair| pair[0].date >= pair[1].date)
        );
        assert_eq!(summary.recent_transactions[0].id, 39);
    }

    #[test]
    fn summary_is_idempotent() {
        let now = datetime!(2024-03-15 0:00 UTC);
        let transactions = march_scenario();

        assert_eq!(
            summarise_utc(&transactions, 500.0, now),
            summarise_utc(&transactions, 500.0, now)
        );
    }
}
