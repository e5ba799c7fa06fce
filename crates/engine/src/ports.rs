//! Collaborators the engine depends on but does not own.
//!
//! - [`IdentityProvider`] resolves usernames and supplies profiles.
//! - [`LedgerRepository`] stores the four record kinds, scoped by user.
//! - [`NotificationSink`] surfaces mutation outcomes to the user.
//!
//! [`SqlStore`](crate::SqlStore) implements the first two on top of sea-orm;
//! [`TracingSink`](crate::TracingSink) and [`MemorySink`](crate::MemorySink)
//! implement the third.

use async_trait::async_trait;
use serde::Serialize;
use uuid::Uuid;

use crate::{Expense, ResultEngine, Saving, Transaction, UserProfile, ValidationItem};

#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Returns the user id for `username`, or `None` if nobody has that name.
    async fn resolve_user_by_username(&self, username: &str) -> ResultEngine<Option<String>>;

    async fn profile(&self, user_id: &str) -> ResultEngine<Option<UserProfile>>;

    /// Inserts or replaces the profile keyed by its username.
    async fn save_profile(&self, profile: &UserProfile) -> ResultEngine<()>;
}

/// Durable storage for expenses, savings, transactions and validation gates.
///
/// Every method is scoped by `user_id`; a record owned by another user is
/// invisible (finds return `None`, deletes affect nothing).
#[async_trait]
pub trait LedgerRepository: Send + Sync {
    async fn list_expenses(&self, user_id: &str) -> ResultEngine<Vec<Expense>>;
    async fn find_expense(&self, user_id: &str, id: Uuid) -> ResultEngine<Option<Expense>>;
    async fn insert_expense(&self, expense: &Expense) -> ResultEngine<()>;
    async fn update_expense(&self, expense: &Expense) -> ResultEngine<()>;
    async fn delete_expense(&self, user_id: &str, id: Uuid) -> ResultEngine<()>;

    async fn list_savings(&self, user_id: &str) -> ResultEngine<Vec<Saving>>;
    async fn find_saving(&self, user_id: &str, id: Uuid) -> ResultEngine<Option<Saving>>;
    async fn insert_saving(&self, saving: &Saving) -> ResultEngine<()>;
    async fn update_saving(&self, saving: &Saving) -> ResultEngine<()>;
    async fn delete_saving(&self, user_id: &str, id: Uuid) -> ResultEngine<()>;

    async fn list_transactions(&self, user_id: &str) -> ResultEngine<Vec<Transaction>>;
    async fn insert_transaction(&self, tx: &Transaction) -> ResultEngine<()>;
    /// Removes the transactions produced by `related_id`; returns how many.
    async fn delete_transactions_for(&self, user_id: &str, related_id: Uuid) -> ResultEngine<u64>;

    async fn list_validations(&self, user_id: &str) -> ResultEngine<Vec<ValidationItem>>;
    async fn insert_validation(&self, item: &ValidationItem) -> ResultEngine<()>;
    /// Deletes the gate if it is still there. Returns `false` when it was
    /// already consumed, which makes a decision safe to race.
    async fn claim_validation(&self, user_id: &str, id: Uuid) -> ResultEngine<bool>;
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    Success,
    Failure,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Notification {
    pub outcome: Outcome,
    pub message: String,
}

impl Notification {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            outcome: Outcome::Success,
            message: message.into(),
        }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            outcome: Outcome::Failure,
            message: message.into(),
        }
    }
}

/// Fire-and-forget outcome reporting. Implementations must not panic; a sink
/// has no way to undo the mutation it reports on.
pub trait NotificationSink: Send + Sync {
    fn report(&self, notification: Notification);
}
