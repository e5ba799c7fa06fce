use std::{fmt, sync::Arc};

use crate::{
    EngineError, IdentityProvider, Ledger, LedgerRepository, Notification, NotificationSink,
    ResultEngine, SqlStore, TracingSink, UserProfile, users::validate_username,
};

mod expenses;
mod profile;
mod queries;
mod savings;
mod validations;

pub use validations::Resolution;

/// One user's view of the ledger plus the operations that change it.
///
/// Every mutation persists through the repository first and patches the
/// in-memory [`Ledger`] only for writes that succeeded, then reports the
/// outcome to the notification sink.
pub struct Session {
    user_id: String,
    profile: Option<UserProfile>,
    ledger: Ledger,
    repo: Arc<dyn LedgerRepository>,
    identity: Arc<dyn IdentityProvider>,
    notifier: Arc<dyn NotificationSink>,
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("user_id", &self.user_id)
            .field("profile", &self.profile)
            .field("ledger", &self.ledger)
            .finish_non_exhaustive()
    }
}

impl Session {
    /// Return a builder for `Session`. Help to build the struct.
    pub fn builder() -> SessionBuilder {
        SessionBuilder::default()
    }

    /// Re-reads the profile and every record from the collaborators.
    pub async fn refresh(&mut self) -> ResultEngine<()> {
        self.profile = self.identity.profile(&self.user_id).await?;
        self.ledger = Ledger::load(self.repo.as_ref(), &self.user_id).await?;
        tracing::debug!(
            user = %self.user_id,
            expenses = self.ledger.expenses().len(),
            savings = self.ledger.savings().len(),
            transactions = self.ledger.transactions().len(),
            validations = self.ledger.validations().len(),
            "ledger loaded"
        );
        Ok(())
    }

    /// Sends the outcome of a mutation to the sink and passes it through.
    fn report<T>(
        &self,
        result: ResultEngine<T>,
        success: impl FnOnce(&T) -> String,
    ) -> ResultEngine<T> {
        match &result {
            Ok(value) => self.notifier.report(Notification::success(success(value))),
            Err(err) => {
                tracing::warn!(user = %self.user_id, "mutation failed: {err}");
                self.notifier.report(Notification::failure(err.to_string()));
            }
        }
        result
    }
}

/// The builder for `Session`
#[derive(Default)]
pub struct SessionBuilder {
    user_id: Option<String>,
    repo: Option<Arc<dyn LedgerRepository>>,
    identity: Option<Arc<dyn IdentityProvider>>,
    notifier: Option<Arc<dyn NotificationSink>>,
}

impl SessionBuilder {
    /// The signed-in user (their username).
    pub fn user(mut self, user_id: impl Into<String>) -> SessionBuilder {
        self.user_id = Some(user_id.into());
        self
    }

    pub fn repository(mut self, repo: Arc<dyn LedgerRepository>) -> SessionBuilder {
        self.repo = Some(repo);
        self
    }

    pub fn identity(mut self, identity: Arc<dyn IdentityProvider>) -> SessionBuilder {
        self.identity = Some(identity);
        self
    }

    /// Use one [`SqlStore`] as both repository and identity provider.
    pub fn store(self, store: SqlStore) -> SessionBuilder {
        let store = Arc::new(store);
        self.repository(store.clone()).identity(store)
    }

    /// Defaults to [`TracingSink`].
    pub fn notifier(mut self, notifier: Arc<dyn NotificationSink>) -> SessionBuilder {
        self.notifier = Some(notifier);
        self
    }

    /// Construct `Session`, loading the user's profile and records.
    pub async fn build(self) -> ResultEngine<Session> {
        let user_id = self
            .user_id
            .ok_or_else(|| EngineError::InvalidInput("session needs a user".to_string()))?;
        let user_id = user_id.trim().to_string();
        validate_username(&user_id)?;
        let repo = self
            .repo
            .ok_or_else(|| EngineError::InvalidInput("session needs a repository".to_string()))?;
        let identity = self.identity.ok_or_else(|| {
            EngineError::InvalidInput("session needs an identity provider".to_string())
        })?;

        let mut session = Session {
            ledger: Ledger::new(user_id.clone()),
            user_id,
            profile: None,
            repo,
            identity,
            notifier: self.notifier.unwrap_or_else(|| Arc::new(TracingSink)),
        };
        session.refresh().await?;
        Ok(session)
    }
}
