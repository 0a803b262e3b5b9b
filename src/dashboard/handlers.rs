//! Dashboard HTTP handler.

use std::sync::{Arc, Mutex};

use axum::{
    Json,
    extract::{FromRef, State},
};
use rusqlite::Connection;
use time::OffsetDateTime;

use crate::{
    AppState, Error,
    budget::total_monthly_budget,
    dashboard::aggregation::{
        DEFAULT_MONTHLY_BUDGET, DashboardSummary, calculate_dashboard_summary,
    },
    db::lock_connection,
    input::ApiQuery,
    timezone::get_timezone,
    transaction::{TransactionFilters, list_transactions},
    user::UserQuery,
};

/// The state needed for the dashboard summary.
#[derive(Debug, Clone)]
pub struct DashboardState {
    /// The database connection for reading transactions and budgets.
    pub db_connection: Arc<Mutex<Connection>>,
    /// The local timezone as a canonical timezone name, e.g. "Pacific/Auckland".
    pub local_timezone: String,
}

impl FromRef<AppState> for DashboardState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
            local_timezone: state.local_timezone.clone(),
        }
    }
}

/// A route handler for the summary of the current month in the local timezone.
///
/// Falls back to [DEFAULT_MONTHLY_BUDGET] when the user has no monthly budgets.
pub async fn get_dashboard_summary(
    State(state): State<DashboardState>,
    ApiQuery(query): ApiQuery<UserQuery>,
) -> Result<Json<DashboardSummary>, Error> {
    let user_id = query.user_id()?;
    let timezone = get_timezone(&state.local_timezone)?;

    let (transactions, budget_total) = {
        let connection = lock_connection(&state.db_connection)?;
        let transactions =
            list_transactions(&user_id, &TransactionFilters::default(), &connection)?;
        let budget_total = total_monthly_budget(&user_id, &connection)?;
        (transactions, budget_total)
    };

    let monthly_budget = if budget_total > 0.0 {
        budget_total
    } else {
        DEFAULT_MONTHLY_BUDGET
    };

    Ok(Json(calculate_dashboard_summary(
        &transactions,
        monthly_budget,
        OffsetDateTime::now_utc(),
        timezone,
    )))
}
