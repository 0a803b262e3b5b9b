//! The API endpoints URIs.
//!
//! For endpoints that take a parameter, e.g., '/api/transactions/{transaction_id}', use
//! [format_endpoint].

/// The root route which describes the service.
pub const ROOT: &str = "/";
/// The liveness probe.
pub const HEALTH: &str = "/health";

/// The route to list and create transactions.
pub const TRANSACTIONS: &str = "/api/transactions";
/// The route to get, update and delete a single transaction.
pub const TRANSACTION: &str = "/api/transactions/{transaction_id}";
/// The route for income and expense totals over a date range.
pub const TRANSACTION_STATS: &str = "/api/transactions/stats";
/// The route to download transactions as a CSV file.
pub const TRANSACTION_EXPORT: &str = "/api/transactions/export";

/// The route to list and create budgets.
pub const BUDGETS: &str = "/api/budgets";
/// The route to get, update and delete a single budget.
pub const BUDGET: &str = "/api/budgets/{budget_id}";
/// The route to get or replace the total monthly budget.
pub const BUDGET_TOTAL: &str = "/api/budgets/total";

/// The route for the dashboard summary of the current month.
pub const DASHBOARD: &str = "/api/dashboard";

/// Replace the first parameter in `endpoint_path` with `id`.
///
/// # Examples
///
/// ```
/// use expense_tracker::endpoints::{TRANSACTION, format_endpoint};
///
/// assert_eq!(format_endpoint(TRANSACTION, 1), "/api/transactions/1");
/// ```
pub fn format_endpoint(endpoint_path: &str, id: i64) -> String {
    match (endpoint_path.find('{'), endpoint_path.find('}')) {
        (Some(start), Some(end)) if start < end => format!(
            "{}{}{}",
            &endpoint_path[..start],
            id,
            &endpoint_path[end + 1..]
        ),
        _ => endpoint_path.to_owned(),
    }
}
