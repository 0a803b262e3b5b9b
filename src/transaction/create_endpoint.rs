//! Defines the endpoint for creating a new transaction.

use axum::{Json, extract::State, http::StatusCode};

use crate::{
    Error, db::lock_connection, input::ApiJson, transaction::core::create_transaction,
};

use super::{core::Transaction, request::CreateTransactionRequest, state::TransactionState};

/// A route handler for creating a new transaction, responds with the stored transaction.
pub async fn create_transaction_endpoint(
    State(state): State<TransactionState>,
    ApiJson(request): ApiJson<CreateTransactionRequest>,
) -> Result<(StatusCode, Json<Transaction>), Error> {
    let new_transaction = request
        .validate()
        .inspect_err(|error| tracing::debug!("rejected new transaction: {error}"))?;

    let connection = lock_connection(&state.db_connection)?;
    let transaction = create_transaction(new_transaction, &connection)
        .inspect_err(|error| tracing::error!("could not create transaction: {error}"))?;

    tracing::debug!(
        "created transaction {} for user {}",
        transaction.id,
        transaction.user_id
    );

    Ok((StatusCode::CREATED, Json(transaction)))
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;
    use serde_json::{Value, json};
    use time::macros::datetime;

    use crate::{
        endpoints,
        test_utils::get_test_server,
        transaction::{Transaction, TransactionKind, count_transactions},
    };

    #[tokio::test]
    async fn can_create_transaction() {
        let (server, state) = get_test_server();

        let response = server
            .post(endpoints::TRANSACTIONS)
            .json(&json!({
                "userId": "alice",
                "type": "expense",
                "amount": "12.30",
                "category": "Food",
                "description": "Lunch",
                "date": "2024-03-01T12:00:00Z",
            }))
            .await;

        response.assert_status(StatusCode::CREATED);
        let transaction = response.json::<Transaction>();
        assert_eq!(transaction.id, 1);
        assert_eq!(transaction.user_id.as_str(), "alice");
        assert_eq!(transaction.kind, TransactionKind::Expense);
        assert_eq!(transaction.amount, 12.3);
        assert_eq!(transaction.description, "Lunch");
        assert_eq!(transaction.notes, "");
        assert_eq!(transaction.date, datetime!(2024-03-01 12:00 UTC));

        let connection = state.db_connection.lock().unwrap();
        assert_eq!(count_transactions(&connection), Ok(1));
    }

    #[tokio::test]
    async fn missing_amount_is_bad_request() {
        let (server, state) = get_test_server();

        let response = server
            .post(endpoints::TRANSACTIONS)
            .json(&json!({
                "userId": "alice",
                "type": "expense",
                "category": "Food",
                "date": "2024-03-01",
            }))
            .await;

        response.assert_status_bad_request();
        response.assert_json(&json!({
            "error": "userId, type, amount, category, and date are required"
        }));
        let connection = state.db_connection.lock().unwrap();
        assert_eq!(count_transactions(&connection), Ok(0));
    }

    #[tokio::test]
    async fn invalid_kind_is_bad_request() {
        let (server, _) = get_test_server();

        let response = server
            .post(endpoints::TRANSACTIONS)
            .json(&json!({
                "userId": "alice",
                "type": "transfer",
                "amount": 5,
                "category": "Food",
                "date": "2024-03-01",
            }))
            .await;

        response.assert_status_bad_request();
        response.assert_json(&json!({
            "error": "type must be either \"income\" or \"expense\""
        }));
    }

    #[tokio::test]
    async fn malformed_json_is_bad_request() {
        let (server, _) = get_test_server();

        let response = server
            .post(endpoints::TRANSACTIONS)
            .content_type("application/json")
            .text("{\"userId\": ")
            .await;

        response.assert_status_bad_request();
        let body = response.json::<Value>();
        assert!(body["error"].is_string());
    }
}
