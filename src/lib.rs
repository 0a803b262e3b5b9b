//! A personal expense tracker.
//!
//! This library provides a JSON REST API for recording income and expense
//! transactions, setting budgets and summarising the current month, plus a
//! client-side ledger that keeps a user's transactions in step with the API.

#![warn(missing_docs)]

use std::{net::SocketAddr, time::Duration};

use axum_server::Handle;
use tokio::signal;

mod app_state;
mod budget;
mod client;
mod dashboard;
mod database_id;
mod db;
pub mod endpoints;
mod error;
mod input;
mod logging;
mod routing;
mod timezone;
mod transaction;
mod user;

#[cfg(test)]
mod test_utils;

pub use app_state::{AppState, Environment};
pub use budget::{
    Budget, BudgetPatch, BudgetPeriod, BudgetTotal, NewBudget, TOTAL_BUDGET_CATEGORY,
    create_budget, list_budgets, replace_monthly_budget, total_monthly_budget,
};
pub use client::{
    ClientError, DEMO_USER_ID, LocalTransactionApi, TransactionApi, TransactionDraft,
    TransactionLedger,
};
pub use dashboard::{
    CategorySummary, DEFAULT_MONTHLY_BUDGET, DashboardSummary, calculate_dashboard_summary,
};
pub use database_id::{BudgetId, DatabaseId, TransactionId};
pub use db::initialize as initialize_db;
pub use error::{Error, INTERNAL_SERVER_ERROR_MESSAGE};
pub use logging::{LOG_BODY_LENGTH_LIMIT, logging_middleware};
pub use routing::{DEFAULT_ALLOWED_ORIGINS, build_cors_layer, build_router};
pub use timezone::get_local_offset;
pub use transaction::{
    NewTransaction, Transaction, TransactionFilters, TransactionKind, TransactionPatch,
    TransactionStats, calculate_stats, create_transaction, delete_user_transactions,
    list_transactions, transactions_to_csv,
};
pub use user::UserId;

/// An async task that waits for either the ctrl+c or terminate signal, whichever comes first, and
/// then signals the server to shut down gracefully.
///
/// `handle` is a handle to an Axum `Server`.
pub async fn graceful_shutdown(handle: Handle<SocketAddr>) {
    let ctrl_c = async {
        if let Err(error) = signal::ctrl_c().await {
            tracing::error!("failed to install Ctrl+C handler: {error}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(error) => {
                tracing::error!("failed to install signal handler: {error}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::debug!("Received ctrl+c signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
        _ = terminate => {
            tracing::debug!("Received terminate signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
    }
}
