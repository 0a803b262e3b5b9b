//! Database ID type definitions.

use crate::Error;

/// Alias for the integer type used for mapping to database IDs.
pub type DatabaseId = i64;
/// The ID of a transaction.
pub type TransactionId = DatabaseId;
/// The ID of a budget.
pub type BudgetId = DatabaseId;

/// Parse a record ID taken from a URL path segment.
///
/// # Errors
/// Returns [Error::InvalidId] if `text` is not a positive integer.
pub fn parse_id(text: &str) -> Result<DatabaseId, Error> {
    match text.trim().parse::<DatabaseId>() {
        Ok(id) if id > 0 => Ok(id),
        _ => Err(Error::InvalidId(text.to_owned())),
    }
}
