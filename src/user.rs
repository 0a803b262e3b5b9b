//! The identity of the user that owns transactions and budgets.

use std::fmt::Display;

use rusqlite::{
    ToSql,
    types::{FromSql, FromSqlResult, ToSqlOutput, ValueRef},
};
use serde::{Deserialize, Serialize};

use crate::Error;

/// An opaque user identifier issued by the external identity provider.
///
/// The server trusts this value and scopes every record by it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(String);

impl UserId {
    /// Create a user ID from a request value.
    ///
    /// # Errors
    /// Returns [Error::MissingUserId] if `value` is missing or blank.
    pub fn parse(value: Option<&str>) -> Result<Self, Error> {
        match value.map(str::trim) {
            Some(user_id) if !user_id.is_empty() => Ok(Self(user_id.to_owned())),
            _ => Err(Error::MissingUserId),
        }
    }

    /// Create a user ID without checking that it is non-empty.
    pub fn new_unchecked(user_id: &str) -> Self {
        Self(user_id.to_owned())
    }

    /// The user ID as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// A query string that only carries the owning user's ID, e.g. `?userId=abc`.
#[derive(Debug, Default, Deserialize, Serialize)]
pub struct UserQuery {
    /// The user that owns the requested records.
    #[serde(rename = "userId")]
    pub user_id: Option<String>,
}

impl UserQuery {
    /// The validated user ID.
    ///
    /// # Errors
    /// Returns [Error::MissingUserId] if the user ID is missing or blank.
    pub fn user_id(&self) -> Result<UserId, Error> {
        UserId::parse(self.user_id.as_deref())
    }
}

impl Display for UserId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl ToSql for UserId {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        self.0.to_sql()
    }
}

impl FromSql for UserId {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        String::column_result(value).map(Self)
    }
}
