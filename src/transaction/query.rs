//! Database query helpers for listing a user's transactions.

use rusqlite::Connection;
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::{
    Error,
    input::{non_blank, parse_optional_date},
    user::UserId,
};

use super::core::{Transaction, TransactionKind, map_transaction_row};

/// The `type` query value that matches both income and expenses.
const ALL_KINDS: &str = "all";

/// Narrows down the transactions returned by [list_transactions].
///
/// Filters that are `None` are not applied. Date bounds are inclusive.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TransactionFilters {
    /// Only include transactions whose description or category contains this
    /// text, ignoring case.
    pub search: Option<String>,
    /// Only include transactions in this exact category.
    pub category: Option<String>,
    /// Only include income or only include expenses.
    pub kind: Option<TransactionKind>,
    /// Only include transactions on or after this instant.
    pub start_date: Option<OffsetDateTime>,
    /// Only include transactions on or before this instant.
    pub end_date: Option<OffsetDateTime>,
}

/// The query string for listing transactions.
#[derive(Debug, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionQuery {
    /// The user that owns the transactions.
    pub user_id: Option<String>,
    /// Case-insensitive text to find in the description or category.
    pub search: Option<String>,
    /// Exact category match.
    pub category: Option<String>,
    /// "income", "expense" or "all".
    #[serde(rename = "type")]
    pub kind: Option<String>,
    /// Inclusive lower bound on the occurrence date.
    pub start_date: Option<String>,
    /// Inclusive upper bound on the occurrence date.
    pub end_date: Option<String>,
}

impl TransactionQuery {
    /// Validate the query, blank values are treated as absent.
    ///
    /// A `type` of "all" is the same as leaving it out.
    ///
    /// # Errors
    /// Returns a:
    /// - [Error::MissingUserId] if there is no user ID,
    /// - [Error::InvalidTransactionKind] if the type is not income, expense or all,
    /// - or [Error::InvalidDate] if either date cannot be parsed.
    pub fn parse(&self) -> Result<(UserId, TransactionFilters), Error> {
        let user_id = UserId::parse(self.user_id.as_deref())?;
        let kind = match non_blank(self.kind.as_deref()) {
            None | Some(ALL_KINDS) => None,
            Some(kind) => Some(kind.parse()?),
        };
        let filters = TransactionFilters {
            search: non_blank(self.search.as_deref()).map(str::to_owned),
            category: non_blank(self.category.as_deref()).map(str::to_owned),
            kind,
            start_date: parse_optional_date(self.start_date.as_deref())?,
            end_date: parse_optional_date(self.end_date.as_deref())?,
        };

        Ok((user_id, filters))
    }
}

/// Get the transactions owned by `user_id` that match `filters`.
///
/// The text search lowercases with SQLite's `lower`, which only folds ASCII letters.
///
/// Transactions are sorted by occurrence date, newest first. Transactions on
/// the same date are sorted by ID, newest first, so that the order is stable.
///
/// # Errors
/// Returns [Error::SqlError] if:
/// - SQL query preparation or execution fails
/// - Transaction row mapping fails
pub fn list_transactions(
    user_id: &UserId,
    filters: &TransactionFilters,
    connection: &Connection,
) -> Result<Vec<Transaction>, Error> {
    connection
        .prepare(
            "SELECT id, user_id, kind, amount, category, description, notes, date, created_at, updated_at \
             FROM \"transaction\" \
             WHERE user_id = ?1 \
                AND (?2 IS NULL OR category = ?2) \
                AND (?3 IS NULL OR date >= ?3) \
                AND (?4 IS NULL OR date <= ?4) \
                AND (?5 IS NULL \
                    OR instr(lower(description), lower(?5)) > 0 \
                    OR instr(lower(category), lower(?5)) > 0) \
                AND (?6 IS NULL OR kind = ?6) \
             ORDER BY date DESC, id DESC",
        )?
        .query_map(
            (
                user_id,
                &filters.category,
                filters.start_date,
                filters.end_date,
                &filters.search,
                filters.kind,
            ),
            map_transaction_row,
        )?
        .map(|transaction_result| transaction_result.map_err(Error::from))
        .collect()
}
