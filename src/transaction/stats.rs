//! Income and expense totals over a date range.

use std::collections::BTreeMap;

use axum::{Json, extract::State};
use serde::{Deserialize, Serialize};

use crate::{
    Error,
    db::lock_connection,
    input::{ApiQuery, parse_optional_date},
    user::UserId,
};

use super::{
    core::{Transaction, TransactionKind},
    query::{TransactionFilters, list_transactions},
    state::TransactionState,
};

/// Totals for a set of transactions.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionStats {
    /// The sum of the income amounts.
    pub total_income: f64,
    /// The sum of the expense amounts.
    pub total_expenses: f64,
    /// Income minus expenses.
    pub balance: f64,
    /// The summed expense amount for each category.
    pub category_breakdown: BTreeMap<String, f64>,
}

/// Sum up the income and expenses in `transactions`.
pub fn calculate_stats(transactions: &[Transaction]) -> TransactionStats {
    let mut stats = TransactionStats::default();

    for transaction in transactions {
        match transaction.kind {
            TransactionKind::Income => stats.total_income += transaction.amount,
            TransactionKind::Expense => {
                stats.total_expenses += transaction.amount;
                *stats
                    .category_breakdown
                    .entry(transaction.category.clone())
                    .or_default() += transaction.amount;
            }
        }
    }

    stats.balance = stats.total_income - stats.total_expenses;

    stats
}

/// The query string for the stats endpoint.
#[derive(Debug, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsQuery {
    /// The user that owns the transactions.
    pub user_id: Option<String>,
    /// Inclusive lower bound on the occurrence date.
    pub start_date: Option<String>,
    /// Inclusive upper bound on the occurrence date.
    pub end_date: Option<String>,
}

/// A route handler for the income and expense totals of a user.
pub async fn get_stats_endpoint(
    State(state): State<TransactionState>,
    ApiQuery(query): ApiQuery<StatsQuery>,
) -> Result<Json<TransactionStats>, Error> {
    let user_id = UserId::parse(query.user_id.as_deref())?;
    let filters = TransactionFilters {
        start_date: parse_optional_date(query.start_date.as_deref())?,
        end_date: parse_optional_date(query.end_date.as_deref())?,
        ..Default::default()
    };

    let connection = lock_connection(&state.db_connection)?;
    let transactions = list_transactions(&user_id, &filters, &connection)?;

    Ok(Json(calculate_stats(&transactions)))
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use time::macros::datetime;

    use crate::{
        endpoints,
        test_utils::get_test_server,
        transaction::{Transaction, TransactionKind, create_transaction},
        user::UserId,
    };

    use super::calculate_stats;

    fn transaction(kind: TransactionKind, amount: f64, category: &str) -> Transaction {
        let now = datetime!(2024-03-10 0:00 UTC);
        Transaction {
            id: 1,
            user_id: UserId::new_unchecked("alice"),
            kind,
            amount,
            category: category.to_owned(),
            description: String::new(),
            notes: String::new(),
            date: now,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn stats_of_no_transactions_are_zero() {
        let stats = calculate_stats(&[]);

        assert_eq!(stats.total_income, 0.0);
        assert_eq!(stats.total_expenses, 0.0);
        assert_eq!(stats.balance, 0.0);
        assert!(stats.category_breakdown.is_empty());
    }

    #[test]
    fn breakdown_only_counts_expenses() {
        let stats = calculate_stats(&[
            transaction(TransactionKind::Income, 1000.0, "Salary"),
            transaction(TransactionKind::Expense, 30.0, "Food"),
            transaction(TransactionKind::Expense, 20.0, "Food"),
            transaction(TransactionKind::Expense, 45.0, "Fuel"),
        ]);

        assert_eq!(stats.total_income, 1000.0);
        assert_eq!(stats.total_expenses, 95.0);
        assert_eq!(stats.balance, 905.0);
        assert_eq!(stats.category_breakdown.len(), 2);
        assert_eq!(stats.category_breakdown["Food"], 50.0);
        assert_eq!(stats.category_breakdown["Fuel"], 45.0);
    }

    #[tokio::test]
    async fn endpoint_respects_date_range() {
        let (server, state) = get_test_server();
        {
            let connection = state.db_connection.lock().unwrap();
            let alice = UserId::new_unchecked("alice");
            for (kind, amount, category, date) in [
                (TransactionKind::Income, 400.0, "Salary", datetime!(2024-03-01 0:00 UTC)),
                (TransactionKind::Expense, 60.0, "Food", datetime!(2024-03-15 0:00 UTC)),
                (TransactionKind::Expense, 70.0, "Food", datetime!(2024-02-15 0:00 UTC)),
            ] {
                create_transaction(
                    Transaction::build(alice.clone(), kind, amount, category, date),
                    &connection,
                )
                .unwrap();
            }
        }

        let response = server
            .get(endpoints::TRANSACTION_STATS)
            .add_query_param("userId", "alice")
            .add_query_param("startDate", "2024-03-01")
            .await;

        response.assert_status_ok();
        response.assert_json(&json!({
            "totalIncome": 400.0,
            "totalExpenses": 60.0,
            "balance": 340.0,
            "categoryBreakdown": { "Food": 60.0 },
        }));
    }
}
