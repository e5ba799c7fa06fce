//! In-memory view of one user's records.
//!
//! The ledger is a write-through cache: the session persists first and only
//! patches the ledger once the repository accepted the write, so the view
//! never runs ahead of durable state.

use serde::Serialize;
use uuid::Uuid;

use crate::{Expense, LedgerRepository, ResultEngine, Saving, Transaction, ValidationItem};

#[derive(Clone, Debug, Default, Serialize)]
pub struct Ledger {
    user_id: String,
    expenses: Vec<Expense>,
    savings: Vec<Saving>,
    transactions: Vec<Transaction>,
    validations: Vec<ValidationItem>,
}

impl Ledger {
    /// An empty ledger for `user_id`.
    pub fn new(user_id: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            ..Self::default()
        }
    }

    /// Loads every record owned by `user_id`.
    pub async fn load(repo: &dyn LedgerRepository, user_id: &str) -> ResultEngine<Self> {
        Ok(Self {
            user_id: user_id.to_string(),
            expenses: repo.list_expenses(user_id).await?,
            savings: repo.list_savings(user_id).await?,
            transactions: repo.list_transactions(user_id).await?,
            validations: repo.list_validations(user_id).await?,
        })
    }

    pub fn user_id(&self) -> &str {
        &self.user_id
    }

    pub fn expenses(&self) -> &[Expense] {
        &self.expenses
    }

    pub fn savings(&self) -> &[Saving] {
        &self.savings
    }

    pub fn transactions(&self) -> &[Transaction] {
        &self.transactions
    }

    /// Pending gates in this user's queue.
    pub fn validations(&self) -> &[ValidationItem] {
        &self.validations
    }

    pub fn expense(&self, id: Uuid) -> Option<&Expense> {
        self.expenses.iter().find(|e| e.id == id)
    }

    pub fn saving(&self, id: Uuid) -> Option<&Saving> {
        self.savings.iter().find(|s| s.id == id)
    }

    pub fn validation(&self, id: Uuid) -> Option<&ValidationItem> {
        self.validations.iter().find(|v| v.id == id)
    }

    pub(crate) fn push_expense(&mut self, expense: Expense) {
        self.expenses.push(expense);
    }

    /// Replaces the stored copy with the same id; no-op if it is not here.
    pub(crate) fn replace_expense(&mut self, expense: Expense) {
        if let Some(slot) = self.expenses.iter_mut().find(|e| e.id == expense.id) {
            *slot = expense;
        }
    }

    pub(crate) fn remove_expense(&mut self, id: Uuid) {
        self.expenses.retain(|e| e.id != id);
    }

    pub(crate) fn push_saving(&mut self, saving: Saving) {
        self.savings.push(saving);
    }

    pub(crate) fn replace_saving(&mut self, saving: Saving) {
        if let Some(slot) = self.savings.iter_mut().find(|s| s.id == saving.id) {
            *slot = saving;
        }
    }

    pub(crate) fn remove_saving(&mut self, id: Uuid) {
        self.savings.retain(|s| s.id != id);
    }

    pub(crate) fn push_transaction(&mut self, tx: Transaction) {
        self.transactions.push(tx);
    }

    pub(crate) fn remove_transactions_for(&mut self, related_id: Uuid) {
        self.transactions
            .retain(|t| t.related_id != Some(related_id));
    }

    pub(crate) fn push_validation(&mut self, item: ValidationItem) {
        self.validations.push(item);
    }

    pub(crate) fn remove_validation(&mut self, id: Uuid) {
        self.validations.retain(|v| v.id != id);
    }

    /// Live gates pointing at `related_id`.
    pub(crate) fn validations_for(&self, related_id: Uuid) -> Vec<Uuid> {
        self.validations
            .iter()
            .filter(|v| v.related_id == related_id)
            .map(|v| v.id)
            .collect()
    }
}
