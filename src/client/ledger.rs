//! The client's in-memory copy of the active user's transactions.

use time::OffsetDateTime;
use tokio::sync::watch;

use crate::{
    database_id::TransactionId,
    transaction::{
        NewTransaction, Transaction, TransactionFilters, TransactionKind, TransactionPatch,
    },
    user::UserId,
};

use super::api::{ClientError, TransactionApi};

/// The user ID used to browse sample data without signing in.
pub const DEMO_USER_ID: &str = "demo-user";

/// A transaction entered by the active user, not yet stored.
#[derive(Debug, Clone, PartialEq)]
pub struct TransactionDraft {
    /// Whether the transaction is income or an expense.
    pub kind: TransactionKind,
    /// The amount of money, must be greater than zero.
    pub amount: f64,
    /// The category of the transaction.
    pub category: String,
    /// A text description of the transaction.
    pub description: String,
    /// Free-form notes.
    pub notes: String,
    /// When the transaction happened.
    pub date: OffsetDateTime,
}

impl TransactionDraft {
    fn for_user(self, user_id: UserId) -> NewTransaction {
        NewTransaction {
            user_id,
            kind: self.kind,
            amount: self.amount,
            category: self.category,
            description: self.description,
            notes: self.notes,
            date: self.date,
        }
    }
}

/// Keeps the active user's transactions in step with the service.
///
/// Local state only changes after the service accepts a change, so a failed
/// call leaves the list exactly as it was. Views follow the list through
/// [TransactionLedger::subscribe].
pub struct TransactionLedger<A> {
    api: A,
    user_id: Option<UserId>,
    transactions: watch::Sender<Vec<Transaction>>,
}

impl<A: TransactionApi> TransactionLedger<A> {
    /// Create an empty ledger with no active user.
    pub fn new(api: A) -> Self {
        let (transactions, _) = watch::channel(Vec::new());

        Self {
            api,
            user_id: None,
            transactions,
        }
    }

    /// A receiver that sees the list every time it changes.
    pub fn subscribe(&self) -> watch::Receiver<Vec<Transaction>> {
        self.transactions.subscribe()
    }

    /// A copy of the current list.
    pub fn transactions(&self) -> Vec<Transaction> {
        self.transactions.borrow().clone()
    }

    /// The active user, if any.
    pub fn user_id(&self) -> Option<&UserId> {
        self.user_id.as_ref()
    }

    /// Make `user_id` the active user and load their transactions.
    ///
    /// The previous user's list is discarded before loading. Passing `None`
    /// signs out and leaves the list empty.
    ///
    /// # Errors
    /// Returns [ClientError::Service] if the list cannot be loaded, the list stays empty.
    pub async fn switch_user(&mut self, user_id: Option<UserId>) -> Result<(), ClientError> {
        self.transactions.send_replace(Vec::new());
        self.user_id = user_id;

        match &self.user_id {
            Some(_) => self.refresh().await,
            None => Ok(()),
        }
    }

    /// Reload the active user's full list.
    ///
    /// # Errors
    /// Returns a:
    /// - [ClientError::NotAuthenticated] if there is no active user,
    /// - or [ClientError::Service] if the list cannot be loaded.
    pub async fn refresh(&mut self) -> Result<(), ClientError> {
        self.filter(&TransactionFilters::default()).await
    }

    /// Replace the list with the active user's transactions that match `filters`.
    ///
    /// # Errors
    /// Returns a:
    /// - [ClientError::NotAuthenticated] if there is no active user,
    /// - or [ClientError::Service] if the list cannot be loaded.
    pub async fn filter(&mut self, filters: &TransactionFilters) -> Result<(), ClientError> {
        let user_id = self.active_user()?;

        let transactions = self
            .api
            .list(&user_id, filters)
            .await
            .inspect_err(|error| tracing::error!("could not load transactions: {error}"))?;

        self.transactions.send_replace(transactions);

        Ok(())
    }

    /// Store `draft` for the active user and put it at the front of the list.
    ///
    /// # Errors
    /// Returns a:
    /// - [ClientError::NotAuthenticated] if there is no active user,
    /// - or [ClientError::Service] if the service rejects the transaction.
    pub async fn add(&mut self, draft: TransactionDraft) -> Result<Transaction, ClientError> {
        let user_id = self.active_user()?;

        let transaction = self
            .api
            .create(draft.for_user(user_id))
            .await
            .inspect_err(|error| tracing::error!("could not add transaction: {error}"))?;

        self.transactions
            .send_modify(|transactions| transactions.insert(0, transaction.clone()));

        Ok(transaction)
    }

    /// Apply `patch` to the transaction `id` and replace the local copy.
    ///
    /// # Errors
    /// Returns a:
    /// - [ClientError::NotAuthenticated] if there is no active user,
    /// - or [ClientError::Service] if the service rejects the change.
    pub async fn update(
        &mut self,
        id: TransactionId,
        patch: TransactionPatch,
    ) -> Result<Transaction, ClientError> {
        let user_id = self.active_user()?;

        let updated = self
            .api
            .update(id, &user_id, patch)
            .await
            .inspect_err(|error| tracing::error!("could not update transaction {id}: {error}"))?;

        self.transactions.send_modify(|transactions| {
            if let Some(local) = transactions
                .iter_mut()
                .find(|transaction| transaction.id == id)
            {
                *local = updated.clone();
            }
        });

        Ok(updated)
    }

    /// Delete the transaction `id` and drop the local copy.
    ///
    /// # Errors
    /// Returns a:
    /// - [ClientError::NotAuthenticated] if there is no active user,
    /// - or [ClientError::Service] if the service could not delete it.
    pub async fn delete(&mut self, id: TransactionId) -> Result<(), ClientError> {
        let user_id = self.active_user()?;

        self.api
            .delete(id, &user_id)
            .await
            .inspect_err(|error| tracing::error!("could not delete transaction {id}: {error}"))?;

        self.transactions
            .send_modify(|transactions| transactions.retain(|transaction| transaction.id != id));

        Ok(())
    }

    fn active_user(&self) -> Result<UserId, ClientError> {
        self.user_id.clone().ok_or(ClientError::NotAuthenticated)
    }
}
