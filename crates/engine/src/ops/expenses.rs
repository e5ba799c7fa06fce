use uuid::Uuid;

use crate::{
    EngineError, Expense, ExpenseCmd, ResultEngine, SplitStatus, ValidationKind,
    rules::{self, ExpenseRoute},
};

use super::Session;

impl Session {
    /// Submits an expense.
    ///
    /// - With `split_with`: the submitter's half posts now and the other half
    ///   waits in the counterparty's queue.
    /// - Dated after the submission day: stored unvalidated behind a
    ///   `future_expense` gate.
    /// - Otherwise: validated with its transaction recorded.
    ///
    /// A split whose gate cannot be written after the submitter's half
    /// posted fails with [`EngineError::PartialSplitFailure`].
    pub async fn submit_expense(&mut self, cmd: ExpenseCmd) -> ResultEngine<Expense> {
        let result = self.submit_expense_inner(cmd).await;
        self.report(result, |expense| {
            if let Some(counterparty) = &expense.split_with {
                format!(
                    "Expense \"{}\" split with {counterparty}, awaiting their approval",
                    expense.title
                )
            } else if expense.is_validated {
                format!("Expense \"{}\" of {} recorded", expense.title, expense.amount)
            } else {
                format!(
                    "Expense \"{}\" scheduled for {}",
                    expense.title, expense.date
                )
            }
        })
    }

    async fn submit_expense_inner(&mut self, cmd: ExpenseCmd) -> ResultEngine<Expense> {
        let counterparty = match cmd.split_target() {
            Some(username) => Some(
                self.identity
                    .resolve_user_by_username(username)
                    .await?
                    .ok_or_else(|| EngineError::CounterpartyNotFound(username.to_string()))?,
            ),
            None => None,
        };

        let plan = rules::plan_expense(&cmd, &self.user_id, counterparty.as_deref())?;
        tracing::debug!(
            user = %self.user_id,
            route = ?plan.route,
            expense = %plan.expense.id,
            "submitting expense"
        );

        self.repo.insert_expense(&plan.expense).await?;
        self.ledger.push_expense(plan.expense.clone());

        if let Some(tx) = plan.transaction {
            self.repo.insert_transaction(&tx).await?;
            self.ledger.push_transaction(tx);
        }

        if let Some(gate) = plan.gate {
            match plan.route {
                ExpenseRoute::Split => {
                    // The gate lives in the counterparty's queue, not ours.
                    if let Err(err) = self.repo.insert_validation(&gate).await {
                        tracing::warn!(
                            expense = %plan.expense.id,
                            "split gate not written: {err}"
                        );
                        return Err(EngineError::PartialSplitFailure {
                            expense_id: plan.expense.id,
                            reason: err.to_string(),
                        });
                    }
                }
                _ => {
                    self.repo.insert_validation(&gate).await?;
                    self.ledger.push_validation(gate);
                }
            }
        }

        Ok(plan.expense)
    }

    /// Deletes one of this user's expenses together with its transactions and
    /// any gate in this user's queue that points at it. A split still waiting
    /// on the counterparty also loses its gate in their queue.
    pub async fn delete_expense(&mut self, id: Uuid) -> ResultEngine<Expense> {
        let result = self.delete_expense_inner(id).await;
        self.report(result, |expense| format!("Expense \"{}\" deleted", expense.title))
    }

    async fn delete_expense_inner(&mut self, id: Uuid) -> ResultEngine<Expense> {
        let expense = self
            .ledger
            .expense(id)
            .cloned()
            .ok_or_else(|| EngineError::KeyNotFound(format!("expense {id}")))?;

        self.drop_gates_for(id).await?;
        if expense.split_status == Some(SplitStatus::Pending)
            && let Some(counterparty) = expense.split_with.as_deref()
        {
            self.withdraw_split(counterparty, id).await?;
        }
        let removed = self.repo.delete_transactions_for(&self.user_id, id).await?;
        self.ledger.remove_transactions_for(id);
        self.repo.delete_expense(&self.user_id, id).await?;
        self.ledger.remove_expense(id);
        tracing::debug!(expense = %id, transactions = removed, "expense deleted");
        Ok(expense)
    }

    async fn withdraw_split(&self, counterparty: &str, expense_id: Uuid) -> ResultEngine<()> {
        let gates = self.repo.list_validations(counterparty).await?;
        for gate in gates.iter().filter(|g| {
            g.kind == ValidationKind::ExpenseSplit
                && g.related_id == expense_id
                && g.initiated_by.as_deref() == Some(self.user_id.as_str())
        }) {
            self.repo.claim_validation(counterparty, gate.id).await?;
            tracing::debug!(expense = %expense_id, gate = %gate.id, "split gate withdrawn");
        }
        Ok(())
    }

    pub(super) async fn drop_gates_for(&mut self, related_id: Uuid) -> ResultEngine<()> {
        for gate_id in self.ledger.validations_for(related_id) {
            self.repo.claim_validation(&self.user_id, gate_id).await?;
            self.ledger.remove_validation(gate_id);
        }
        Ok(())
    }
}
