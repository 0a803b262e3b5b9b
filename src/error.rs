//! Defines the app level error type and its conversion to JSON error responses.
use axum::{
    Json,
    extract::{
        Request, State,
        rejection::{JsonRejection, QueryRejection},
    },
    http::StatusCode,
    middleware::Next,
    response::{IntoResponse, Response},
};
use serde_json::json;

use crate::app_state::Environment;

/// The message sent to clients in place of the details of a server error.
pub const INTERNAL_SERVER_ERROR_MESSAGE: &str = "Internal server error";

/// The errors that may occur in the application.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum Error {
    /// The request did not include the ID of the user that owns the records.
    #[error("userId is required")]
    MissingUserId,

    /// One or more required fields were missing from a request body.
    ///
    /// The message names the fields that are required.
    #[error("{0}")]
    MissingFields(&'static str),

    /// A transaction type other than income or expense was given.
    #[error("type must be either \"income\" or \"expense\"")]
    InvalidTransactionKind(String),

    /// A budget period other than weekly, monthly or yearly was given.
    #[error("period must be either \"monthly\", \"weekly\", or \"yearly\"")]
    InvalidBudgetPeriod(String),

    /// The amount could not be read as a positive, finite number.
    #[error("amount must be a positive number, got \"{0}\"")]
    InvalidAmount(String),

    /// The date string could not be parsed as a date or date-time.
    #[error("invalid date \"{0}\", expected an ISO 8601 date or date-time")]
    InvalidDate(String),

    /// A record ID in the URL was not a valid ID.
    #[error("\"{0}\" is not a valid id")]
    InvalidId(String),

    /// The request body could not be parsed as JSON of the expected shape.
    #[error("invalid request body: {0}")]
    InvalidJson(String),

    /// The query string could not be parsed.
    #[error("invalid query string: {0}")]
    InvalidQuery(String),

    /// No transaction matched both the transaction ID and the user ID.
    ///
    /// A transaction owned by another user is reported the same way so that
    /// clients cannot probe for other users' records.
    #[error("Transaction not found")]
    TransactionNotFound,

    /// No budget matched both the budget ID and the user ID.
    #[error("Budget not found")]
    BudgetNotFound,

    /// The requested resource was not found.
    ///
    /// Internally, this error may occur when a query returns no rows.
    #[error("the requested resource could not be found")]
    NotFound,

    /// An unhandled/unexpected SQL error.
    #[error("an unexpected SQL error occurred: {0}")]
    SqlError(rusqlite::Error),

    /// Could not acquire the database lock
    #[error("could not acquire the database lock")]
    DatabaseLockError,

    /// An error occurred while getting the local timezone from a canonical timezone string.
    #[error("invalid timezone {0}")]
    InvalidTimezoneError(String),

    /// The transactions could not be written as CSV.
    #[error("could not write CSV: {0}")]
    CsvError(String),

    /// A request or response body could not be read.
    #[error("could not read body: {0}")]
    BodyReadError(String),
}

impl Error {
    /// The HTTP status code that the error is reported with.
    pub fn status_code(&self) -> StatusCode {
        match self {
            Error::MissingUserId
            | Error::MissingFields(_)
            | Error::InvalidTransactionKind(_)
            | Error::InvalidBudgetPeriod(_)
            | Error::InvalidAmount(_)
            | Error::InvalidDate(_)
            | Error::InvalidId(_)
            | Error::InvalidJson(_)
            | Error::InvalidQuery(_) => StatusCode::BAD_REQUEST,
            Error::TransactionNotFound | Error::BudgetNotFound | Error::NotFound => {
                StatusCode::NOT_FOUND
            }
            Error::SqlError(_)
            | Error::DatabaseLockError
            | Error::InvalidTimezoneError(_)
            | Error::CsvError(_)
            | Error::BodyReadError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<rusqlite::Error> for Error {
    fn from(value: rusqlite::Error) -> Self {
        match value {
            rusqlite::Error::QueryReturnedNoRows => Error::NotFound,
            error => {
                tracing::error!("an unhandled SQL error occurred: {}", error);
                Error::SqlError(error)
            }
        }
    }
}

impl From<JsonRejection> for Error {
    fn from(rejection: JsonRejection) -> Self {
        Error::InvalidJson(rejection.body_text())
    }
}

impl From<QueryRejection> for Error {
    fn from(rejection: QueryRejection) -> Self {
        Error::InvalidQuery(rejection.body_text())
    }
}

/// The details of a server error, attached to the response so that
/// [expose_error_details] can add them to the body in development mode.
#[derive(Debug, Clone)]
pub struct ErrorDetails(pub String);

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status_code = self.status_code();

        if !status_code.is_server_error() {
            return (status_code, Json(json!({ "error": self.to_string() }))).into_response();
        }

        // Server errors are not intended to be shown to the client.
        tracing::error!("An unexpected error occurred: {}", self);
        let mut response = (
            status_code,
            Json(json!({ "error": INTERNAL_SERVER_ERROR_MESSAGE })),
        )
            .into_response();
        response
            .extensions_mut()
            .insert(ErrorDetails(self.to_string()));

        response
    }
}

/// Middleware that adds the underlying error message to server error responses
/// when the app is running in development mode.
pub async fn expose_error_details(
    State(environment): State<Environment>,
    request: Request,
    next: Next,
) -> Response {
    let response = next.run(request).await;

    if environment != Environment::Development {
        return response;
    }

    let Some(ErrorDetails(message)) = response.extensions().get::<ErrorDetails>().cloned() else {
        return response;
    };

    (
        response.status(),
        Json(json!({ "error": INTERNAL_SERVER_ERROR_MESSAGE, "message": message })),
    )
        .into_response()
}
