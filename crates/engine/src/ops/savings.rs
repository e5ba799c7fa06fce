use uuid::Uuid;

use crate::{EngineError, ResultEngine, Saving, SavingCmd, rules};

use super::Session;

impl Session {
    /// Submits a saving contribution.
    ///
    /// The saving is stored unvalidated behind a `saving` gate. When it
    /// carries a positive return rate with a periodic return frequency, a
    /// `saving_return` gate for the first expected return is queued too.
    pub async fn submit_saving(&mut self, cmd: SavingCmd) -> ResultEngine<Saving> {
        let result = self.submit_saving_inner(cmd).await;
        self.report(result, |saving| {
            format!(
                "Saving \"{}\" of {} awaiting validation",
                saving.title, saving.amount
            )
        })
    }

    async fn submit_saving_inner(&mut self, cmd: SavingCmd) -> ResultEngine<Saving> {
        let plan = rules::plan_saving(&cmd, &self.user_id)?;
        tracing::debug!(
            user = %self.user_id,
            saving = %plan.saving.id,
            gates = plan.gates.len(),
            "submitting saving"
        );

        self.repo.insert_saving(&plan.saving).await?;
        self.ledger.push_saving(plan.saving.clone());
        for gate in plan.gates {
            self.repo.insert_validation(&gate).await?;
            self.ledger.push_validation(gate);
        }
        Ok(plan.saving)
    }

    /// Deletes one of this user's savings with its transactions and gates.
    pub async fn delete_saving(&mut self, id: Uuid) -> ResultEngine<Saving> {
        let result = self.delete_saving_inner(id).await;
        self.report(result, |saving| format!("Saving \"{}\" deleted", saving.title))
    }

    async fn delete_saving_inner(&mut self, id: Uuid) -> ResultEngine<Saving> {
        let saving = self
            .ledger
            .saving(id)
            .cloned()
            .ok_or_else(|| EngineError::KeyNotFound(format!("saving {id}")))?;

        self.drop_gates_for(id).await?;
        self.repo.delete_transactions_for(&self.user_id, id).await?;
        self.ledger.remove_transactions_for(id);
        self.repo.delete_saving(&self.user_id, id).await?;
        self.ledger.remove_saving(id);
        Ok(saving)
    }
}
