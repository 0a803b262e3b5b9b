//! The JSON bodies for creating and updating budgets.

use serde::{Deserialize, Serialize};

use crate::{
    Error,
    input::{AmountInput, is_missing_text},
    user::UserId,
};

use super::core::{BudgetPatch, NewBudget};

const REQUIRED_FIELDS_MESSAGE: &str = "userId, category, amount, and period are required";

/// The request body for creating a budget.
#[derive(Debug, Default, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateBudgetRequest {
    /// The user that will own the budget.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    /// The category the budget applies to.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    /// The amount as a number or numeric string.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub amount: Option<AmountInput>,
    /// "weekly", "monthly" or "yearly".
    #[serde(skip_serializing_if = "Option::is_none")]
    pub period: Option<String>,
}

impl CreateBudgetRequest {
    /// Check the required fields and coerce the values into a [NewBudget].
    ///
    /// # Errors
    /// Returns a:
    /// - [Error::MissingFields] if any of userId, category, amount or period is missing,
    /// - [Error::InvalidBudgetPeriod] if period is not weekly, monthly or yearly,
    /// - or [Error::InvalidAmount] if amount is not a positive number.
    pub fn validate(self) -> Result<NewBudget, Error> {
        if is_missing_text(&self.user_id)
            || is_missing_text(&self.category)
            || is_missing_text(&self.period)
            || self.amount.as_ref().is_none_or(AmountInput::is_blank)
        {
            return Err(Error::MissingFields(REQUIRED_FIELDS_MESSAGE));
        }

        let (Some(category), Some(amount), Some(period)) = (self.category, self.amount, self.period)
        else {
            return Err(Error::MissingFields(REQUIRED_FIELDS_MESSAGE));
        };

        Ok(NewBudget {
            user_id: UserId::parse(self.user_id.as_deref())?,
            period: period.parse()?,
            amount: amount.parse()?,
            category,
        })
    }
}

/// The request body for updating a budget.
#[derive(Debug, Default, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateBudgetRequest {
    /// The user that owns the budget.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    /// The new category.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    /// The new amount.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub amount: Option<AmountInput>,
    /// The new period.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub period: Option<String>,
}

impl UpdateBudgetRequest {
    /// Check the user ID and coerce the present fields into a [BudgetPatch].
    ///
    /// # Errors
    /// Returns a:
    /// - [Error::MissingUserId] if there is no user ID,
    /// - [Error::MissingFields] if category is present but blank,
    /// - [Error::InvalidBudgetPeriod] if period is not weekly, monthly or yearly,
    /// - or [Error::InvalidAmount] if amount is not a positive number.
    pub fn validate(self) -> Result<(UserId, BudgetPatch), Error> {
        let user_id = UserId::parse(self.user_id.as_deref())?;

        if self.category.is_some() && is_missing_text(&self.category) {
            return Err(Error::MissingFields("category cannot be empty"));
        }

        let patch = BudgetPatch {
            period: self.period.as_deref().map(str::parse).transpose()?,
            amount: self.amount.as_ref().map(AmountInput::parse).transpose()?,
            category: self.category,
        };

        Ok((user_id, patch))
    }
}

/// The request body for replacing the total monthly budget.
#[derive(Debug, Default, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SetMonthlyBudgetRequest {
    /// The user that owns the budget.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    /// The new monthly total.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub amount: Option<AmountInput>,
}

impl SetMonthlyBudgetRequest {
    /// # Errors
    /// Returns a:
    /// - [Error::MissingFields] if userId or amount is missing,
    /// - or [Error::InvalidAmount] if amount is not a positive number.
    pub fn validate(self) -> Result<(UserId, f64), Error> {
        let (Some(user_id), Some(amount)) = (self.user_id, self.amount) else {
            return Err(Error::MissingFields("userId and amount are required"));
        };

        if amount.is_blank() {
            return Err(Error::MissingFields("userId and amount are required"));
        }

        let user_id = UserId::parse(Some(&user_id))
            .map_err(|_| Error::MissingFields("userId and amount are required"))?;

        Ok((user_id, amount.parse()?))
    }
}
