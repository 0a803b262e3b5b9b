//! Defines the endpoint for downloading transactions as a CSV file.

use axum::{
    extract::State,
    http::header,
    response::{IntoResponse, Response},
};
use csv::{QuoteStyle, Terminator, Writer, WriterBuilder};
use time::macros::format_description;

use crate::{Error, db::lock_connection, input::ApiQuery, timezone::now_in_timezone};

use super::{
    core::Transaction,
    query::{TransactionQuery, list_transactions},
    state::TransactionState,
};

const CSV_HEADER: [&str; 6] = ["Date", "Description", "Category", "Type", "Amount", "Notes"];

fn csv_writer(quote_style: QuoteStyle, buffer: Vec<u8>) -> Writer<Vec<u8>> {
    WriterBuilder::new()
        .quote_style(quote_style)
        .terminator(Terminator::Any(b'\n'))
        .from_writer(buffer)
}

/// Render `transactions` as CSV with a plain header row and every data field quoted.
///
/// Dates are written as `YYYY-MM-DD` in UTC.
///
/// # Errors
/// Returns [Error::CsvError] if a record cannot be written.
pub fn transactions_to_csv(transactions: &[Transaction]) -> Result<String, Error> {
    let date_format = format_description!("[year]-[month]-[day]");

    let mut header = csv_writer(QuoteStyle::Necessary, Vec::new());
    header
        .write_record(CSV_HEADER)
        .map_err(|error| Error::CsvError(error.to_string()))?;
    let buffer = header
        .into_inner()
        .map_err(|error| Error::CsvError(error.to_string()))?;

    let mut writer = csv_writer(QuoteStyle::Always, buffer);

    for transaction in transactions {
        let date = transaction
            .date
            .format(date_format)
            .map_err(|error| Error::CsvError(error.to_string()))?;

        writer
            .write_record([
                date.as_str(),
                transaction.description.as_str(),
                transaction.category.as_str(),
                transaction.kind.as_str(),
                transaction.amount.to_string().as_str(),
                transaction.notes.as_str(),
            ])
            .map_err(|error| Error::CsvError(error.to_string()))?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|error| Error::CsvError(error.to_string()))?;

    String::from_utf8(bytes).map_err(|error| Error::CsvError(error.to_string()))
}

/// A route handler for downloading a user's transactions as a CSV file.
///
/// Accepts the same filters as the transaction listing.
pub async fn export_transactions_endpoint(
    State(state): State<TransactionState>,
    ApiQuery(query): ApiQuery<TransactionQuery>,
) -> Result<Response, Error> {
    let (user_id, filters) = query.parse()?;
    let today = now_in_timezone(&state.local_timezone)?.date();

    let transactions = {
        let connection = lock_connection(&state.db_connection)?;
        list_transactions(&user_id, &filters, &connection)?
    };

    let body = transactions_to_csv(&transactions)?;
    let file_name = today
        .format(format_description!("[year]-[month]-[day]"))
        .map_err(|error| Error::CsvError(error.to_string()))?;

    tracing::debug!(
        "exporting {} transactions for user {user_id}",
        transactions.len()
    );

    Ok((
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_owned()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"transactions-{file_name}.csv\""),
            ),
        ],
        body,
    )
        .into_response())
}
