//! The seam between the client ledger and the transaction service.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use rusqlite::Connection;

use crate::{
    AppState, Error,
    database_id::TransactionId,
    db::lock_connection,
    transaction::{
        NewTransaction, Transaction, TransactionFilters, TransactionPatch, create_transaction,
        delete_transaction, list_transactions, update_transaction,
    },
    user::UserId,
};

/// The failures a client operation can report.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum ClientError {
    /// The operation needs an active user and there is none.
    #[error("no user is signed in")]
    NotAuthenticated,

    /// The transaction service rejected the request or failed.
    #[error(transparent)]
    Service(#[from] Error),
}

/// The transaction operations the client ledger relies on.
#[async_trait]
pub trait TransactionApi: Send + Sync {
    /// List the user's transactions that match `filters`, newest first.
    async fn list(
        &self,
        user_id: &UserId,
        filters: &TransactionFilters,
    ) -> Result<Vec<Transaction>, Error>;

    /// Store a new transaction and return it with its ID.
    async fn create(&self, transaction: NewTransaction) -> Result<Transaction, Error>;

    /// Apply `patch` to the user's transaction `id`.
    async fn update(
        &self,
        id: TransactionId,
        user_id: &UserId,
        patch: TransactionPatch,
    ) -> Result<Transaction, Error>;

    /// Delete the user's transaction `id`.
    ///
    /// Reports [Error::TransactionNotFound] if nothing was deleted.
    async fn delete(&self, id: TransactionId, user_id: &UserId) -> Result<(), Error>;
}

/// A [TransactionApi] that calls the record access layer in-process.
#[derive(Debug, Clone)]
pub struct LocalTransactionApi {
    db_connection: Arc<Mutex<Connection>>,
}

impl LocalTransactionApi {
    /// Share the database connection of `state`.
    pub fn new(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

#[async_trait]
impl TransactionApi for LocalTransactionApi {
    async fn list(
        &self,
        user_id: &UserId,
        filters: &TransactionFilters,
    ) -> Result<Vec<Transaction>, Error> {
        let connection = lock_connection(&self.db_connection)?;
        list_transactions(user_id, filters, &connection)
    }

    async fn create(&self, transaction: NewTransaction) -> Result<Transaction, Error> {
        let connection = lock_connection(&self.db_connection)?;
        create_transaction(transaction, &connection)
    }

    async fn update(
        &self,
        id: TransactionId,
        user_id: &UserId,
        patch: TransactionPatch,
    ) -> Result<Transaction, Error> {
        let connection = lock_connection(&self.db_connection)?;
        update_transaction(id, user_id, patch, &connection)
    }

    async fn delete(&self, id: TransactionId, user_id: &UserId) -> Result<(), Error> {
        let connection = lock_connection(&self.db_connection)?;

        match delete_transaction(id, user_id, &connection)? {
            0 => Err(Error::TransactionNotFound),
            _ => Ok(()),
        }
    }
}
