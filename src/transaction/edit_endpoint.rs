//! Defines the endpoint for updating an existing transaction.

use axum::{
    Json,
    extract::{Path, State},
};

use crate::{Error, database_id::parse_id, db::lock_connection, input::ApiJson};

use super::{
    core::{Transaction, update_transaction},
    request::UpdateTransactionRequest,
    state::TransactionState,
};

/// A route handler for updating a transaction, responds with the updated transaction.
///
/// Only the fields present in the request body are changed.
pub async fn update_transaction_endpoint(
    State(state): State<TransactionState>,
    Path(transaction_id): Path<String>,
    ApiJson(request): ApiJson<UpdateTransactionRequest>,
) -> Result<Json<Transaction>, Error> {
    let transaction_id = parse_id(&transaction_id)?;
    let (user_id, patch) = request.validate()?;

    let connection = lock_connection(&state.db_connection)?;
    let transaction = update_transaction(transaction_id, &user_id, patch, &connection)?;

    tracing::debug!("updated transaction {transaction_id} for user {user_id}");

    Ok(Json(transaction))
}
