//! Client-side synchronisation of the active user's transactions.
//!
//! [TransactionLedger] holds the list that views render, and changes it only
//! after the service has accepted a change through a [TransactionApi].

mod api;
mod ledger;

pub use api::{ClientError, LocalTransactionApi, TransactionApi};
pub use ledger::{DEMO_USER_ID, TransactionDraft, TransactionLedger};
