//! Dashboard module
//!
//! Summarises the current month's income, expenses and budget, and lists the
//! latest transactions.

mod aggregation;
mod handlers;

pub use aggregation::{
    CategorySummary, DEFAULT_MONTHLY_BUDGET, DashboardSummary, calculate_dashboard_summary,
};
pub use handlers::get_dashboard_summary;
