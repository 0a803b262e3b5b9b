//! Route handlers for the budget API.

use std::sync::{Arc, Mutex};

use axum::{
    Json,
    extract::{FromRef, Path, State},
    http::StatusCode,
};
use rusqlite::Connection;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use crate::{
    AppState, Error,
    database_id::parse_id,
    db::lock_connection,
    input::{ApiJson, ApiQuery},
    user::UserQuery,
};

use super::{
    core::{
        Budget, create_budget, delete_budget, get_budget, list_budgets, replace_monthly_budget,
        total_monthly_budget, update_budget,
    },
    request::{CreateBudgetRequest, SetMonthlyBudgetRequest, UpdateBudgetRequest},
};

/// The state needed by the budget endpoints.
#[derive(Debug, Clone)]
pub struct BudgetState {
    /// The database connection for managing budgets.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for BudgetState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// The response body for the total monthly budget.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BudgetTotal {
    /// The sum of the user's monthly budgets.
    pub total: f64,
}

/// A route handler for listing a user's budgets in creation order.
pub async fn list_budgets_endpoint(
    State(state): State<BudgetState>,
    ApiQuery(query): ApiQuery<UserQuery>,
) -> Result<Json<Vec<Budget>>, Error> {
    let user_id = query.user_id()?;
    let connection = lock_connection(&state.db_connection)?;

    Ok(Json(list_budgets(&user_id, &connection)?))
}

/// A route handler for getting a single budget owned by the user.
pub async fn get_budget_endpoint(
    State(state): State<BudgetState>,
    Path(budget_id): Path<String>,
    ApiQuery(query): ApiQuery<UserQuery>,
) -> Result<Json<Budget>, Error> {
    let budget_id = parse_id(&budget_id)?;
    let user_id = query.user_id()?;
    let connection = lock_connection(&state.db_connection)?;

    Ok(Json(get_budget(budget_id, &user_id, &connection)?))
}

/// A route handler for the sum of the user's monthly budgets.
pub async fn get_budget_total_endpoint(
    State(state): State<BudgetState>,
    ApiQuery(query): ApiQuery<UserQuery>,
) -> Result<Json<BudgetTotal>, Error> {
    let user_id = query.user_id()?;
    let connection = lock_connection(&state.db_connection)?;
    let total = total_monthly_budget(&user_id, &connection)?;

    Ok(Json(BudgetTotal { total }))
}

/// A route handler for replacing the user's monthly budgets with one total.
pub async fn set_budget_total_endpoint(
    State(state): State<BudgetState>,
    ApiJson(request): ApiJson<SetMonthlyBudgetRequest>,
) -> Result<Json<BudgetTotal>, Error> {
    let (user_id, amount) = request.validate()?;
    let connection = lock_connection(&state.db_connection)?;
    let budget = replace_monthly_budget(&user_id, amount, &connection)?;

    tracing::debug!("set monthly budget for user {user_id} to {}", budget.amount);

    Ok(Json(BudgetTotal {
        total: budget.amount,
    }))
}

/// A route handler for creating a budget, responds with the stored budget.
pub async fn create_budget_endpoint(
    State(state): State<BudgetState>,
    ApiJson(request): ApiJson<CreateBudgetRequest>,
) -> Result<(StatusCode, Json<Budget>), Error> {
    let new_budget = request.validate()?;
    let connection = lock_connection(&state.db_connection)?;
    let budget = create_budget(new_budget, &connection)?;

    Ok((StatusCode::CREATED, Json(budget)))
}

/// A route handler for updating a budget, responds with the updated budget.
pub async fn update_budget_endpoint(
    State(state): State<BudgetState>,
    Path(budget_id): Path<String>,
    ApiJson(request): ApiJson<UpdateBudgetRequest>,
) -> Result<Json<Budget>, Error> {
    let budget_id = parse_id(&budget_id)?;
    let (user_id, patch) = request.validate()?;
    let connection = lock_connection(&state.db_connection)?;

    Ok(Json(update_budget(budget_id, &user_id, patch, &connection)?))
}

/// A route handler for deleting a budget, responds with a confirmation message.
pub async fn delete_budget_endpoint(
    State(state): State<BudgetState>,
    Path(budget_id): Path<String>,
    ApiQuery(query): ApiQuery<UserQuery>,
) -> Result<Json<Value>, Error> {
    let budget_id = parse_id(&budget_id)?;
    let user_id = query.user_id()?;
    let connection = lock_connection(&state.db_connection)?;

    match delete_budget(budget_id, &user_id, &connection)? {
        0 => Err(Error::BudgetNotFound),
        _ => Ok(Json(json!({ "message": "Budget deleted successfully" }))),
    }
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;
    use serde_json::json;

    use crate::{
        budget::{Budget, BudgetPeriod, BudgetTotal},
        endpoints::{self, format_endpoint},
        test_utils::get_test_server,
    };

    #[tokio::test]
    async fn create_then_list_budgets() {
        let (server, _) = get_test_server();

        let response = server
            .post(endpoints::BUDGETS)
            .json(&json!({
                "userId": "alice",
                "category": "Food",
                "amount": 400,
                "period": "monthly",
            }))
            .await;
        response.assert_status(StatusCode::CREATED);
        let created = response.json::<Budget>();
        assert_eq!(created.period, BudgetPeriod::Monthly);

        let response = server
            .get(endpoints::BUDGETS)
            .add_query_param("userId", "alice")
            .await;

        response.assert_status_ok();
        assert_eq!(response.json::<Vec<Budget>>(), vec![created]);
    }

    #[tokio::test]
    async fn invalid_period_is_bad_request() {
        let (server, _) = get_test_server();

        let response = server
            .post(endpoints::BUDGETS)
            .json(&json!({
                "userId": "alice",
                "category": "Food",
                "amount": 400,
                "period": "daily",
            }))
            .await;

        response.assert_status_bad_request();
        response.assert_json(&json!({
            "error": "period must be either \"monthly\", \"weekly\", or \"yearly\""
        }));
    }

    #[tokio::test]
    async fn two_monthly_budgets_are_summed() {
        let (server, _) = get_test_server();
        for amount in [100, 200] {
            server
                .post(endpoints::BUDGETS)
                .json(&json!({
                    "userId": "alice",
                    "category": "Food",
                    "amount": amount,
                    "period": "monthly",
                }))
                .await
                .assert_status(StatusCode::CREATED);
        }

        let response = server
            .get(endpoints::BUDGET_TOTAL)
            .add_query_param("userId", "alice")
            .await;

        response.assert_status_ok();
        assert_eq!(response.json::<BudgetTotal>(), BudgetTotal { total: 300.0 });
    }

    #[tokio::test]
    async fn setting_total_replaces_monthly_budgets() {
        let (server, _) = get_test_server();
        server
            .post(endpoints::BUDGETS)
            .json(&json!({
                "userId": "alice",
                "category": "Food",
                "amount": 100,
                "period": "monthly",
            }))
            .await
            .assert_status(StatusCode::CREATED);

        server
            .put(endpoints::BUDGET_TOTAL)
            .json(&json!({ "userId": "alice", "amount": "1800" }))
            .await
            .assert_json(&json!({ "total": 1800.0 }));

        let response = server
            .get(endpoints::BUDGET_TOTAL)
            .add_query_param("userId", "alice")
            .await;
        response.assert_json(&json!({ "total": 1800.0 }));
    }

    #[tokio::test]
    async fn update_and_delete_are_scoped_to_owner() {
        let (server, _) = get_test_server();
        let created = server
            .post(endpoints::BUDGETS)
            .json(&json!({
                "userId": "alice",
                "category": "Food",
                "amount": 100,
                "period": "weekly",
            }))
            .await
            .json::<Budget>();
        let path = format_endpoint(endpoints::BUDGET, created.id);

        server
            .put(&path)
            .json(&json!({ "userId": "bob", "amount": 1 }))
            .await
            .assert_status(StatusCode::NOT_FOUND);
        server
            .delete(&path)
            .add_query_param("userId", "bob")
            .await
            .assert_json(&json!({ "error": "Budget not found" }));

        let response = server
            .put(&path)
            .json(&json!({ "userId": "alice", "amount": 150 }))
            .await;
        response.assert_status_ok();
        assert_eq!(response.json::<Budget>().amount, 150.0);

        server
            .delete(&path)
            .add_query_param("userId", "alice")
            .await
            .assert_json(&json!({ "message": "Budget deleted successfully" }));
        server
            .get(&path)
            .add_query_param("userId", "alice")
            .await
            .assert_status(StatusCode::NOT_FOUND);
    }
}
