//! Transaction management for the expense tracker.
//!
//! This module contains everything related to transactions:
//! - The `Transaction` model and `NewTransaction` builder
//! - Database functions for storing, querying, and managing transactions
//! - Route handlers for the transaction API, its stats and its CSV export

mod core;
mod create_endpoint;
mod delete_endpoint;
mod edit_endpoint;
mod export_endpoint;
mod list_endpoint;
mod query;
mod request;
mod state;
mod stats;

pub use core::{
    NewTransaction, Transaction, TransactionKind, TransactionPatch, create_transaction,
    create_transaction_table, delete_transaction, delete_user_transactions, update_transaction,
};
pub use create_endpoint::create_transaction_endpoint;
pub use delete_endpoint::delete_transaction_endpoint;
pub use edit_endpoint::update_transaction_endpoint;
pub use export_endpoint::{export_transactions_endpoint, transactions_to_csv};
pub use list_endpoint::{get_transaction_endpoint, list_transactions_endpoint};
pub use query::{TransactionFilters, list_transactions};
pub use stats::{TransactionStats, calculate_stats, get_stats_endpoint};

#[cfg(test)]
pub use core::count_transactions;
