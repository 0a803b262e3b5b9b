//! Budgets: per-category spending limits over a weekly, monthly or yearly period.
//!
//! The sum of a user's monthly budgets is the figure the dashboard compares
//! the month's expenses against.

mod core;
mod handlers;
mod request;

pub use core::{
    Budget, BudgetPatch, BudgetPeriod, NewBudget, TOTAL_BUDGET_CATEGORY, create_budget,
    create_budget_table, list_budgets, replace_monthly_budget, total_monthly_budget,
};
pub use handlers::{
    BudgetTotal, create_budget_endpoint, delete_budget_endpoint, get_budget_endpoint,
    get_budget_total_endpoint, list_budgets_endpoint, set_budget_total_endpoint,
    update_budget_endpoint,
};
