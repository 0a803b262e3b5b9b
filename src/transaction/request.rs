//! The JSON bodies for creating and updating transactions.

use serde::{Deserialize, Serialize};

use crate::{
    Error,
    input::{AmountInput, is_missing_text, parse_date_input},
    user::UserId,
};

use super::core::{NewTransaction, TransactionKind, TransactionPatch};

const REQUIRED_FIELDS_MESSAGE: &str = "userId, type, amount, category, and date are required";

/// The request body for creating a transaction.
///
/// Every field is optional here so that missing fields can be reported
/// together with [Error::MissingFields].
#[derive(Debug, Default, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTransactionRequest {
    /// The user that will own the transaction.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    /// "income" or "expense".
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    /// The amount as a number or numeric string.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub amount: Option<AmountInput>,
    /// The category of the transaction.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    /// Defaults to an empty string.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Defaults to an empty string.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    /// The occurrence date, see [parse_date_input] for the accepted formats.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
}

impl CreateTransactionRequest {
    /// Check the required fields and coerce the values into a [NewTransaction].
    ///
    /// # Errors
    /// Returns a:
    /// - [Error::MissingFields] if any of userId, type, amount, category or date is missing,
    /// - [Error::InvalidTransactionKind] if type is not income or expense,
    /// - [Error::InvalidAmount] if amount is not a positive number,
    /// - or [Error::InvalidDate] if the date cannot be parsed.
    pub fn validate(self) -> Result<NewTransaction, Error> {
        let (Some(user_id), Some(kind), Some(amount), Some(category), Some(date)) =
            (self.user_id, self.kind, self.amount, self.category, self.date)
        else {
            return Err(Error::MissingFields(REQUIRED_FIELDS_MESSAGE));
        };

        if [&user_id, &kind, &category, &date]
            .into_iter()
            .any(|text| text.trim().is_empty())
            || amount.is_blank()
        {
            return Err(Error::MissingFields(REQUIRED_FIELDS_MESSAGE));
        }

        let kind: TransactionKind = kind.parse()?;
        let amount = amount.parse()?;
        let date = parse_date_input(&date)?;

        Ok(NewTransaction {
            user_id: UserId::parse(Some(&user_id))?,
            kind,
            amount,
            category,
            description: self.description.unwrap_or_default(),
            notes: self.notes.unwrap_or_default(),
            date,
        })
    }
}

/// The request body for updating a transaction.
///
/// Only the fields that are present are changed.
#[derive(Debug, Default, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTransactionRequest {
    /// The user that owns the transaction.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    /// "income" or "expense".
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    /// The amount as a number or numeric string.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub amount: Option<AmountInput>,
    /// The category of the transaction.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    /// A text description of the transaction.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Free-form notes.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    /// The occurrence date.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
}

impl UpdateTransactionRequest {
    /// Check the user ID and coerce the present fields into a [TransactionPatch].
    ///
    /// # Errors
    /// Returns a:
    /// - [Error::MissingUserId] if there is no user ID,
    /// - [Error::MissingFields] if category is present but blank,
    /// - [Error::InvalidTransactionKind] if type is not income or expense,
    /// - [Error::InvalidAmount] if amount is not a positive number,
    /// - or [Error::InvalidDate] if the date cannot be parsed.
    pub fn validate(self) -> Result<(UserId, TransactionPatch), Error> {
        let user_id = UserId::parse(self.user_id.as_deref())?;

        if self.category.is_some() && is_missing_text(&self.category) {
            return Err(Error::MissingFields("category cannot be empty"));
        }

        let patch = TransactionPatch {
            kind: self.kind.as_deref().map(str::parse).transpose()?,
            amount: self.amount.as_ref().map(AmountInput::parse).transpose()?,
            category: self.category,
            description: self.description,
            notes: self.notes,
            date: self.date.as_deref().map(parse_date_input).transpose()?,
        };

        Ok((user_id, patch))
    }
}

#[cfg(test)]
mod tests {
    use time::macros::datetime;

    use crate::{
        Error,
        input::AmountInput,
        transaction::{
            TransactionKind, TransactionPatch,
            request::{CreateTransactionRequest, UpdateTransactionRequest},
        },
        user::UserId,
    };

    fn valid_request() -> CreateTransactionRequest {
        CreateTransactionRequest {
            user_id: Some("alice".to_owned()),
            kind: Some("expense".to_owned()),
            amount: Some(AmountInput::Text("12.50".to_owned())),
            category: Some("Food".to_owned()),
            description: None,
            notes: None,
            date: Some("2024-03-01".to_owned()),
        }
    }

    #[test]
    fn create_request_coerces_values() {
        let transaction = valid_request().validate().unwrap();

        assert_eq!(transaction.user_id, UserId::new_unchecked("alice"));
        assert_eq!(transaction.kind, TransactionKind::Expense);
        assert_eq!(transaction.amount, 12.5);
        assert_eq!(transaction.description, "");
        assert_eq!(transaction.notes, "");
        assert_eq!(transaction.date, datetime!(2024-03-01 0:00 UTC));
    }

    #[test]
    fn create_request_reports_missing_fields() {
        let request = CreateTransactionRequest {
            amount: None,
            ..valid_request()
        };

        assert_eq!(
            request.validate(),
            Err(Error::MissingFields(
                "userId, type, amount, category, and date are required"
            ))
        );
    }

    #[test]
    fn create_request_treats_blank_fields_as_missing() {
        let request = CreateTransactionRequest {
            category: Some("  ".to_owned()),
            ..valid_request()
        };

        assert!(matches!(request.validate(), Err(Error::MissingFields(_))));
    }

    #[test]
    fn create_request_rejects_unknown_kind() {
        let request = CreateTransactionRequest {
            kind: Some("transfer".to_owned()),
            ..valid_request()
        };

        assert_eq!(
            request.validate(),
            Err(Error::InvalidTransactionKind("transfer".to_owned()))
        );
    }

    #[test]
    fn update_request_only_sets_present_fields() {
        let request = UpdateTransactionRequest {
            user_id: Some("alice".to_owned()),
            amount: Some(AmountInput::Number(75.0)),
            ..Default::default()
        };

        let (user_id, patch) = request.validate().unwrap();

        assert_eq!(user_id, UserId::new_unchecked("alice"));
        assert_eq!(
            patch,
            TransactionPatch {
                amount: Some(75.0),
                ..Default::default()
            }
        );
    }

    #[test]
    fn update_request_requires_user_id() {
        let request = UpdateTransactionRequest {
            amount: Some(AmountInput::Number(75.0)),
            ..Default::default()
        };

        assert_eq!(request.validate(), Err(Error::MissingUserId));
    }

    #[test]
    fn update_request_reparses_date() {
        let request = UpdateTransactionRequest {
            user_id: Some("alice".to_owned()),
            date: Some("2024-04-02T10:00:00+02:00".to_owned()),
            ..Default::default()
        };

        let (_, patch) = request.validate().unwrap();

        assert_eq!(patch.date, Some(datetime!(2024-04-02 8:00 UTC)));
    }
}
