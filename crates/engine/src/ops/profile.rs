use crate::{
    EngineError, IncomeCmd, ResultEngine, Transaction, TransactionKind, UserProfile,
    util::{normalize_optional_text, normalize_required_text, require_positive},
};

use super::Session;

impl Session {
    /// Validates and stores the signed-in user's profile.
    pub async fn update_profile(&mut self, profile: UserProfile) -> ResultEngine<UserProfile> {
        let result = self.update_profile_inner(profile).await;
        self.report(result, |profile| {
            format!("Profile for {} saved", profile.username)
        })
    }

    async fn update_profile_inner(&mut self, profile: UserProfile) -> ResultEngine<UserProfile> {
        let profile = profile.validated()?;
        if profile.username != self.user_id {
            return Err(EngineError::InvalidInput(format!(
                "cannot edit the profile of {}",
                profile.username
            )));
        }
        self.identity.save_profile(&profile).await?;
        self.profile = Some(profile.clone());
        Ok(profile)
    }

    /// Records extra income dated on the day it was received. Income is
    /// never gated.
    pub async fn add_income(&mut self, cmd: IncomeCmd) -> ResultEngine<Transaction> {
        let result = self.add_income_inner(cmd).await;
        self.report(result, |tx| {
            format!("Income \"{}\" of {} recorded", tx.title, tx.amount)
        })
    }

    async fn add_income_inner(&mut self, cmd: IncomeCmd) -> ResultEngine<Transaction> {
        require_positive(cmd.amount, "amount")?;
        let title = normalize_required_text(&cmd.title, "title")?;
        let tx = Transaction::new(
            self.user_id.clone(),
            TransactionKind::Income,
            title,
            cmd.amount,
            cmd.received_at.date_naive(),
            cmd.received_at,
        )?
        .description(normalize_optional_text(cmd.description.as_deref()));

        self.repo.insert_transaction(&tx).await?;
        self.ledger.push_transaction(tx.clone());
        Ok(tx)
    }
}
