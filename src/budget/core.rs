//! Defines the budget model and its database queries.

use std::{fmt::Display, str::FromStr};

use rusqlite::{
    Connection, OptionalExtension, Row, ToSql, Transaction as SqlTransaction,
    types::{FromSql, FromSqlError, FromSqlResult, ToSqlOutput, ValueRef},
};
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::{Error, database_id::BudgetId, user::UserId};

/// The category used for a budget that covers all spending.
pub const TOTAL_BUDGET_CATEGORY: &str = "Total";

/// How often a budget's amount resets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BudgetPeriod {
    /// Resets every week.
    Weekly,
    /// Resets every calendar month.
    Monthly,
    /// Resets every year.
    Yearly,
}

impl BudgetPeriod {
    /// The name used for the period in requests, responses and the database.
    pub fn as_str(&self) -> &'static str {
        match self {
            BudgetPeriod::Weekly => "weekly",
            BudgetPeriod::Monthly => "monthly",
            BudgetPeriod::Yearly => "yearly",
        }
    }
}

impl Display for BudgetPeriod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BudgetPeriod {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "weekly" => Ok(BudgetPeriod::Weekly),
            "monthly" => Ok(BudgetPeriod::Monthly),
            "yearly" => Ok(BudgetPeriod::Yearly),
            other => Err(Error::InvalidBudgetPeriod(other.to_owned())),
        }
    }
}

impl ToSql for BudgetPeriod {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.as_str()))
    }
}

impl FromSql for BudgetPeriod {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        value
            .as_str()?
            .parse()
            .map_err(|error| FromSqlError::Other(Box::new(error)))
    }
}

/// A spending limit for a category over a period.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Budget {
    /// The ID of the budget.
    pub id: BudgetId,
    /// The user that owns the budget.
    pub user_id: UserId,
    /// The category the budget applies to, or [TOTAL_BUDGET_CATEGORY].
    pub category: String,
    /// The spending limit, always positive.
    pub amount: f64,
    /// How often the limit resets.
    pub period: BudgetPeriod,
    /// When the budget was created.
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    /// When the budget was last changed.
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

/// A validated budget that has not been stored yet.
#[derive(Debug, Clone, PartialEq)]
pub struct NewBudget {
    /// The user that will own the budget.
    pub user_id: UserId,
    /// The category the budget applies to.
    pub category: String,
    /// The spending limit, must be greater than zero.
    pub amount: f64,
    /// How often the limit resets.
    pub period: BudgetPeriod,
}

/// The fields to change on an existing budget.
///
/// Fields set to `None` keep their current value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BudgetPatch {
    /// The new category.
    pub category: Option<String>,
    /// The new amount.
    pub amount: Option<f64>,
    /// The new period.
    pub period: Option<BudgetPeriod>,
}

const BUDGET_COLUMNS: &str = "id, user_id, category, amount, period, created_at, updated_at";

/// Create a new budget in the database.
///
/// # Errors
/// This function will return a [Error::SqlError] if there is some SQL error.
pub fn create_budget(budget: NewBudget, connection: &Connection) -> Result<Budget, Error> {
    let now = OffsetDateTime::now_utc();

    connection
        .prepare(&format!(
            "INSERT INTO budget (user_id, category, amount, period, created_at, updated_at) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?5) \
             RETURNING {BUDGET_COLUMNS}"
        ))?
        .query_row(
            (
                &budget.user_id,
                &budget.category,
                budget.amount,
                budget.period,
                now,
            ),
            map_budget_row,
        )
        .map_err(Error::from)
}

/// Retrieve the budget `id` owned by `user_id`.
///
/// # Errors
/// This function will return a:
/// - [Error::BudgetNotFound] if `id` does not refer to a budget owned by `user_id`,
/// - or [Error::SqlError] there is some other SQL error.
pub fn get_budget(
    id: BudgetId,
    user_id: &UserId,
    connection: &Connection,
) -> Result<Budget, Error> {
    connection
        .prepare(&format!(
            "SELECT {BUDGET_COLUMNS} FROM budget WHERE id = ?1 AND user_id = ?2"
        ))?
        .query_row((id, user_id), map_budget_row)
        .optional()?
        .ok_or(Error::BudgetNotFound)
}

/// Get the budgets owned by `user_id` in the order they were created.
///
/// # Errors
/// This function will return a [Error::SqlError] if there is some SQL error.
pub fn list_budgets(user_id: &UserId, connection: &Connection) -> Result<Vec<Budget>, Error> {
    connection
        .prepare(&format!(
            "SELECT {BUDGET_COLUMNS} FROM budget WHERE user_id = ?1 ORDER BY id ASC"
        ))?
        .query_map((user_id,), map_budget_row)?
        .map(|budget_result| budget_result.map_err(Error::from))
        .collect()
}

/// Change the fields given in `patch` on the budget `id` owned by `user_id`.
///
/// # Errors
/// This function will return a:
/// - [Error::BudgetNotFound] if `id` does not refer to a budget owned by `user_id`,
/// - or [Error::SqlError] there is some other SQL error.
pub fn update_budget(
    id: BudgetId,
    user_id: &UserId,
    patch: BudgetPatch,
    connection: &Connection,
) -> Result<Budget, Error> {
    connection
        .prepare(&format!(
            "UPDATE budget SET \
                category = COALESCE(?1, category), \
                amount = COALESCE(?2, amount), \
                period = COALESCE(?3, period), \
                updated_at = ?4 \
             WHERE id = ?5 AND user_id = ?6 \
             RETURNING {BUDGET_COLUMNS}"
        ))?
        .query_row(
            (
                patch.category,
                patch.amount,
                patch.period,
                OffsetDateTime::now_utc(),
                id,
                user_id,
            ),
            map_budget_row,
        )
        .optional()?
        .ok_or(Error::BudgetNotFound)
}

type RowsAffected = usize;

/// Delete the budget `id` owned by `user_id`.
///
/// Returns the number of rows deleted, zero if no budget matched.
///
/// # Errors
/// This function will return a [Error::SqlError] if there is some SQL error.
pub fn delete_budget(
    id: BudgetId,
    user_id: &UserId,
    connection: &Connection,
) -> Result<RowsAffected, Error> {
    connection
        .execute(
            "DELETE FROM budget WHERE id = ?1 AND user_id = ?2",
            (id, user_id),
        )
        .map_err(Error::from)
}

/// The sum of the user's monthly budgets, zero if they have none.
///
/// # Errors
/// This function will return a [Error::SqlError] if there is some SQL error.
pub fn total_monthly_budget(user_id: &UserId, connection: &Connection) -> Result<f64, Error> {
    connection
        .query_row(
            "SELECT COALESCE(SUM(amount), 0.0) FROM budget WHERE user_id = ?1 AND period = ?2",
            (user_id, BudgetPeriod::Monthly),
            |row| row.get(0),
        )
        .map_err(Error::from)
}

/// Replace all of the user's monthly budgets with a single [TOTAL_BUDGET_CATEGORY] budget.
///
/// The delete and insert happen in one SQL transaction.
///
/// # Errors
/// This function will return a [Error::SqlError] if there is some SQL error.
pub fn replace_monthly_budget(
    user_id: &UserId,
    amount: f64,
    connection: &Connection,
) -> Result<Budget, Error> {
    let transaction =
        SqlTransaction::new_unchecked(connection, rusqlite::TransactionBehavior::Immediate)?;

    transaction.execute(
        "DELETE FROM budget WHERE user_id = ?1 AND period = ?2",
        (user_id, BudgetPeriod::Monthly),
    )?;

    let budget = create_budget(
        NewBudget {
            user_id: user_id.clone(),
            category: TOTAL_BUDGET_CATEGORY.to_owned(),
            amount,
            period: BudgetPeriod::Monthly,
        },
        &transaction,
    )?;

    transaction.commit()?;

    Ok(budget)
}

/// Create the budget table in the database.
///
/// # Errors
/// Returns an error if the table cannot be created or if there is an SQL error.
pub fn create_budget_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS budget (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                user_id TEXT NOT NULL,
                category TEXT NOT NULL,
                amount REAL NOT NULL CHECK (amount > 0),
                period TEXT NOT NULL CHECK (period IN ('weekly', 'monthly', 'yearly')),
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL
                )",
        (),
    )?;

    connection.execute(
        "CREATE INDEX IF NOT EXISTS idx_budget_user ON budget(user_id);",
        (),
    )?;

    Ok(())
}

fn map_budget_row(row: &Row) -> Result<Budget, rusqlite::Error> {
    Ok(Budget {
        id: row.get(0)?,
        user_id: row.get(1)?,
        category: row.get(2)?,
        amount: row.get(3)?,
        period: row.get(4)?,
        created_at: row.get(5)?,
        updated_at: row.get(6)?,
    })
}
