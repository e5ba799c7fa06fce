use std::collections::BTreeMap;

use crate::{
    ExpenseCategory, Ledger, Money, Transaction, UserProfile, ValidationItem,
    totals::{self, Summary, TransactionFilter, TypeShare},
};

use super::Session;

impl Session {
    pub fn user_id(&self) -> &str {
        &self.user_id
    }

    pub fn profile(&self) -> Option<&UserProfile> {
        self.profile.as_ref()
    }

    pub fn ledger(&self) -> &Ledger {
        &self.ledger
    }

    /// Gates waiting for this user's decision, oldest first.
    pub fn pending_validations(&self) -> &[ValidationItem] {
        self.ledger.validations()
    }

    /// Zero when no profile has been saved yet.
    pub fn monthly_salary(&self) -> Money {
        self.profile
            .as_ref()
            .map_or(Money::ZERO, |p| p.monthly_salary)
    }

    pub fn summary(&self) -> Summary {
        totals::summarize(&self.ledger, self.monthly_salary())
    }

    pub fn total_saved(&self) -> Money {
        totals::total_saved(&self.ledger)
    }

    pub fn total_expenses(&self) -> Money {
        totals::total_expenses(&self.ledger)
    }

    pub fn extra_income(&self) -> Money {
        totals::extra_income(&self.ledger)
    }

    pub fn remaining_balance(&self) -> Money {
        totals::remaining_balance(&self.ledger, self.monthly_salary())
    }

    pub fn expenses_by_category(&self) -> BTreeMap<ExpenseCategory, Money> {
        totals::expenses_by_category(&self.ledger)
    }

    pub fn savings_by_type(&self) -> Vec<TypeShare> {
        totals::savings_by_type(&self.ledger)
    }

    pub fn history(&self, filter: &TransactionFilter) -> Vec<&Transaction> {
        totals::history(&self.ledger, filter)
    }

    pub fn recent_transactions(&self, n: usize) -> Vec<&Transaction> {
        totals::recent_transactions(&self.ledger, n)
    }
}
