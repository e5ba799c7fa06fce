use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::{
    EngineError, ResultEngine, ValidationItem, ValidationKind,
    rules::{self, Effect, Related},
};

use super::Session;

/// What a decision on a gate did.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Resolution {
    pub validation_id: Uuid,
    pub kind: ValidationKind,
    pub approved: bool,
    /// The transaction the approval posted, if any.
    pub transaction_id: Option<Uuid>,
    /// The record the gate pointed at was gone; the gate was consumed anyway.
    pub related_missing: bool,
}

impl Session {
    /// Approves or rejects a gate in this user's queue.
    ///
    /// The gate is claimed before anything else is written, so deciding the
    /// same gate twice yields [`EngineError::ValidationNotFound`] the second
    /// time and never posts a second transaction.
    pub async fn validate_item(
        &mut self,
        id: Uuid,
        approved: bool,
        decided_at: DateTime<Utc>,
    ) -> ResultEngine<Resolution> {
        let result = self.validate_item_inner(id, approved, decided_at).await;
        self.report(result, |resolution| {
            let verb = if resolution.approved {
                "approved"
            } else {
                "rejected"
            };
            format!("{} {verb}", resolution.kind.as_str().replace('_', " "))
        })
    }

    async fn validate_item_inner(
        &mut self,
        id: Uuid,
        approved: bool,
        decided_at: DateTime<Utc>,
    ) -> ResultEngine<Resolution> {
        let item = self
            .ledger
            .validation(id)
            .cloned()
            .ok_or(EngineError::ValidationNotFound(id))?;

        let claimed = self.repo.claim_validation(&self.user_id, id).await?;
        self.ledger.remove_validation(id);
        if !claimed {
            return Err(EngineError::ValidationNotFound(id));
        }

        let related = self.related_record(&item).await?;
        let related_missing = matches!(related, Related::Missing);
        if related_missing {
            tracing::warn!(
                validation = %id,
                related = %item.related_id,
                "gate resolved without its record"
            );
        }

        let effects = rules::decide(&item, approved, related, &self.user_id, decided_at)?;
        let mut transaction_id = None;
        for effect in effects {
            if let Effect::InsertTransaction(tx) = &effect {
                transaction_id = Some(tx.id);
            }
            self.apply(effect).await?;
        }

        tracing::info!(validation = %id, kind = item.kind.as_str(), approved, "gate resolved");
        Ok(Resolution {
            validation_id: id,
            kind: item.kind,
            approved,
            transaction_id,
            related_missing,
        })
    }

    async fn related_record(&self, item: &ValidationItem) -> ResultEngine<Related> {
        let related = match item.kind {
            // The split original belongs to whoever asked.
            ValidationKind::ExpenseSplit => match item.initiated_by.as_deref() {
                Some(initiator) => self
                    .repo
                    .find_expense(initiator, item.related_id)
                    .await?
                    .map(Related::Expense),
                None => None,
            },
            ValidationKind::FutureExpense => self
                .ledger
                .expense(item.related_id)
                .cloned()
                .map(Related::Expense),
            ValidationKind::Saving | ValidationKind::SavingReturn => self
                .ledger
                .saving(item.related_id)
                .cloned()
                .map(Related::Saving),
        };
        Ok(related.unwrap_or(Related::Missing))
    }

    async fn apply(&mut self, effect: Effect) -> ResultEngine<()> {
        match effect {
            Effect::UpdateExpense(expense) => {
                self.repo.update_expense(&expense).await?;
                self.ledger.replace_expense(expense);
            }
            Effect::InsertExpense(expense) => {
                self.repo.insert_expense(&expense).await?;
                self.ledger.push_expense(expense);
            }
            Effect::DeleteExpense { user_id, id } => {
                self.repo.delete_expense(&user_id, id).await?;
                self.ledger.remove_expense(id);
            }
            Effect::UpdateSaving(saving) => {
                self.repo.update_saving(&saving).await?;
                self.ledger.replace_saving(saving);
            }
            Effect::InsertTransaction(tx) => {
                self.repo.insert_transaction(&tx).await?;
                self.ledger.push_transaction(tx);
            }
        }
        Ok(())
    }
}
