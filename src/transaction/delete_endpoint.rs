use axum::{
    Json,
    extract::{Path, State},
};
use serde_json::{Value, json};

use crate::{
    Error, database_id::parse_id, db::lock_connection, input::ApiQuery, user::UserQuery,
};

use super::{core::delete_transaction, state::TransactionState};

/// A route handler for deleting a transaction, responds with a confirmation message.
pub async fn delete_transaction_endpoint(
    State(state): State<TransactionState>,
    Path(transaction_id): Path<String>,
    ApiQuery(query): ApiQuery<UserQuery>,
) -> Result<Json<Value>, Error> {
    let transaction_id = parse_id(&transaction_id)?;
    let user_id = query.user_id()?;

    let connection = lock_connection(&state.db_connection)?;

    match delete_transaction(transaction_id, &user_id, &connection)? {
        0 => Err(Error::TransactionNotFound),
        _ => Ok(Json(json!({ "message": "Transaction deleted successfully" }))),
    }
}
