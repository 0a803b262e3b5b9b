//! Application router configuration.

use axum::{
    Json, Router,
    extract::State,
    http::{HeaderValue, Method, StatusCode, header},
    middleware,
    response::{IntoResponse, Response},
    routing::get,
};
use serde_json::json;
use time::{OffsetDateTime, format_description::well_known::Rfc3339};
use tower_http::cors::CorsLayer;

use crate::{
    AppState,
    budget::{
        create_budget_endpoint, delete_budget_endpoint, get_budget_endpoint,
        get_budget_total_endpoint, list_budgets_endpoint, set_budget_total_endpoint,
        update_budget_endpoint,
    },
    dashboard::get_dashboard_summary,
    db::lock_connection,
    endpoints,
    error::expose_error_details,
    logging::logging_middleware,
    transaction::{
        create_transaction_endpoint, delete_transaction_endpoint, export_transactions_endpoint,
        get_stats_endpoint, get_transaction_endpoint, list_transactions_endpoint,
        update_transaction_endpoint,
    },
};

/// The origins a local frontend is served from during development.
pub const DEFAULT_ALLOWED_ORIGINS: [&str; 3] = [
    "http://localhost:5173",
    "http://localhost:8080",
    "http://localhost:3000",
];

/// Return a router with all the app's routes.
pub fn build_router(state: AppState) -> Router {
    let api_routes = Router::new()
        .route(
            endpoints::TRANSACTIONS,
            get(list_transactions_endpoint).post(create_transaction_endpoint),
        )
        .route(endpoints::TRANSACTION_STATS, get(get_stats_endpoint))
        .route(
            endpoints::TRANSACTION_EXPORT,
            get(export_transactions_endpoint),
        )
        .route(
            endpoints::TRANSACTION,
            get(get_transaction_endpoint)
                .put(update_transaction_endpoint)
                .delete(delete_transaction_endpoint),
        )
        .route(
            endpoints::BUDGETS,
            get(list_budgets_endpoint).post(create_budget_endpoint),
        )
        .route(
            endpoints::BUDGET_TOTAL,
            get(get_budget_total_endpoint).put(set_budget_total_endpoint),
        )
        .route(
            endpoints::BUDGET,
            get(get_budget_endpoint)
                .put(update_budget_endpoint)
                .delete(delete_budget_endpoint),
        )
        .route(endpoints::DASHBOARD, get(get_dashboard_summary));

    Router::new()
        .route(endpoints::ROOT, get(get_service_info))
        .route(endpoints::HEALTH, get(get_health))
        .merge(api_routes)
        .fallback(get_404_not_found)
        .layer(middleware::from_fn_with_state(
            state.environment,
            expose_error_details,
        ))
        .layer(middleware::from_fn(logging_middleware))
        .with_state(state)
}

/// Build the CORS layer from the development origins plus `extra_origins`.
///
/// Origins that are not valid header values are skipped with a warning.
pub fn build_cors_layer(extra_origins: &[String]) -> CorsLayer {
    let origins: Vec<HeaderValue> = DEFAULT_ALLOWED_ORIGINS
        .into_iter()
        .map(str::to_owned)
        .chain(extra_origins.iter().cloned())
        .filter_map(|origin| {
            origin
                .parse::<HeaderValue>()
                .inspect_err(|error| tracing::warn!("ignoring CORS origin {origin:?}: {error}"))
                .ok()
        })
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_credentials(true)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::PATCH,
            Method::OPTIONS,
        ])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
}

fn timestamp() -> String {
    OffsetDateTime::now_utc()
        .format(&Rfc3339)
        .unwrap_or_default()
}

/// Describe the service and its main routes.
async fn get_service_info() -> Json<serde_json::Value> {
    Json(json!({
        "status": "OK",
        "message": "Personal Expense Tracker API",
        "version": env!("CARGO_PKG_VERSION"),
        "endpoints": {
            "health": endpoints::HEALTH,
            "transactions": endpoints::TRANSACTIONS,
            "budgets": endpoints::BUDGETS,
            "dashboard": endpoints::DASHBOARD,
        },
        "timestamp": timestamp(),
    }))
}

/// Report whether the server and its database are usable.
async fn get_health(State(state): State<AppState>) -> Response {
    let database_check = lock_connection(&state.db_connection).and_then(|connection| {
        connection
            .query_row("SELECT 1", [], |row| row.get::<_, i64>(0))
            .map_err(crate::Error::from)
    });

    match database_check {
        Ok(_) => Json(json!({
            "status": "OK",
            "message": "Server is running",
            "timestamp": timestamp(),
        }))
        .into_response(),
        Err(error) => {
            tracing::error!("health check failed: {error}");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "status": "ERROR", "message": error.to_string() })),
            )
                .into_response()
        }
    }
}

async fn get_404_not_found() -> Response {
    (
        StatusCode::NOT_FOUND,
        Json(json!({ "error": "Route not found" })),
    )
        .into_response()
}
