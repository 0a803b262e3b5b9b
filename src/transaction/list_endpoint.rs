//! Defines the endpoints for reading a user's transactions.

use axum::{
    Json,
    extract::{Path, State},
};

use crate::{
    Error,
    database_id::parse_id,
    db::lock_connection,
    input::ApiQuery,
    user::UserQuery,
};

use super::{
    core::{Transaction, get_transaction},
    query::{TransactionQuery, list_transactions},
    state::TransactionState,
};

/// A route handler for listing a user's transactions, newest first.
///
/// Supports filtering by category and an inclusive date range.
pub async fn list_transactions_endpoint(
    State(state): State<TransactionState>,
    ApiQuery(query): ApiQuery<TransactionQuery>,
) -> Result<Json<Vec<Transaction>>, Error> {
    let (user_id, filters) = query.parse()?;

    let connection = lock_connection(&state.db_connection)?;
    let transactions = list_transactions(&user_id, &filters, &connection)?;

    Ok(Json(transactions))
}

/// A route handler for getting a single transaction owned by the user.
pub async fn get_transaction_endpoint(
    State(state): State<TransactionState>,
    Path(transaction_id): Path<String>,
    ApiQuery(query): ApiQuery<UserQuery>,
) -> Result<Json<Transaction>, Error> {
    let transaction_id = parse_id(&transaction_id)?;
    let user_id = query.user_id()?;

    let connection = lock_connection(&state.db_connection)?;
    let transaction = get_transaction(transaction_id, &user_id, &connection)?;

    Ok(Json(transaction))
}
