mod common;

use std::sync::{
    Arc,
    atomic::{AtomicBool, Ordering},
};

use async_trait::async_trait;
use uuid::Uuid;

use engine::{
    EngineError, Expense, ExpenseCmd, LedgerRepository, Money, Outcome, Saving, SqlStore,
    Transaction, ValidationItem,
};

use common::{now, session_for, session_with_repo, store, today};

type Result<T> = std::result::Result<T, EngineError>;

/// Delegates to a real store but can be told to refuse some writes.
struct FlakyRepo {
    inner: SqlStore,
    refuse_validations: AtomicBool,
    refuse_transactions: AtomicBool,
}

impl FlakyRepo {
    fn new(inner: SqlStore) -> Self {
        Self {
            inner,
            refuse_validations: AtomicBool::new(false),
            refuse_transactions: AtomicBool::new(false),
        }
    }

    fn refused(flag: &AtomicBool) -> Result<()> {
        if flag.load(Ordering::SeqCst) {
            return Err(EngineError::Persistence("disk full".to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl LedgerRepository for FlakyRepo {
    async fn list_expenses(&self, user_id: &str) -> Result<Vec<Expense>> {
        self.inner.list_expenses(user_id).await
    }
    async fn find_expense(&self, user_id: &str, id: Uuid) -> Result<Option<Expense>> {
        self.inner.find_expense(user_id, id).await
    }
    async fn insert_expense(&self, expense: &Expense) -> Result<()> {
        self.inner.insert_expense(expense).await
    }
    async fn update_expense(&self, expense: &Expense) -> Result<()> {
        self.inner.update_expense(expense).await
    }
    async fn delete_expense(&self, user_id: &str, id: Uuid) -> Result<()> {
        self.inner.delete_expense(user_id, id).await
    }
    async fn list_savings(&self, user_id: &str) -> Result<Vec<Saving>> {
        self.inner.list_savings(user_id).await
    }
    async fn find_saving(&self, user_id: &str, id: Uuid) -> Result<Option<Saving>> {
        self.inner.find_saving(user_id, id).await
    }
    async fn insert_saving(&self, saving: &Saving) -> Result<()> {
        self.inner.insert_saving(saving).await
    }
    async fn update_saving(&self, saving: &Saving) -> Result<()> {
        self.inner.update_saving(saving).await
    }
    async fn delete_saving(&self, user_id: &str, id: Uuid) -> Result<()> {
        self.inner.delete_saving(user_id, id).await
    }
    async fn list_transactions(&self, user_id: &str) -> Result<Vec<Transaction>> {
        self.inner.list_transactions(user_id).await
    }
    async fn insert_transaction(&self, tx: &Transaction) -> Result<()> {
        Self::refused(&self.refuse_transactions)?;
        self.inner.insert_transaction(tx).await
    }
    async fn delete_transactions_for(&self, user_id: &str, related_id: Uuid) -> Result<u64> {
        self.inner.delete_transactions_for(user_id, related_id).await
    }
    async fn list_validations(&self, user_id: &str) -> Result<Vec<ValidationItem>> {
        self.inner.list_validations(user_id).await
    }
    async fn insert_validation(&self, item: &ValidationItem) -> Result<()> {
        Self::refused(&self.refuse_validations)?;
        self.inner.insert_validation(item).await
    }
    async fn claim_validation(&self, user_id: &str, id: Uuid) -> Result<bool> {
        self.inner.claim_validation(user_id, id).await
    }
}

#[tokio::test]
async fn split_gate_failure_is_partial() {
    let store = store().await;
    let repo = Arc::new(FlakyRepo::new(store.clone()));
    let (mut asha, sink) = session_with_repo(&store, repo.clone(), "asha").await;
    let (_, _) = session_with_repo(&store, repo.clone(), "ravi").await;
    repo.refuse_validations.store(true, Ordering::SeqCst);

    let err = asha
        .submit_expense(
            ExpenseCmd::new("Dinner", Money::rupees(1_000), today(), now()).split_with("ravi"),
        )
        .await
        .unwrap_err();

    let EngineError::PartialSplitFailure { expense_id, reason } = err else {
        panic!("expected a partial split failure, got {err:?}");
    };
    assert!(reason.contains("disk full"));
    // The submitter's half stays posted.
    assert!(asha.ledger().expense(expense_id).is_some());
    assert_eq!(asha.ledger().transactions().len(), 1);
    assert_eq!(store.list_transactions("asha").await.unwrap().len(), 1);
    assert!(store.list_validations("ravi").await.unwrap().is_empty());
    assert_eq!(sink.last().unwrap().outcome, Outcome::Failure);
}

#[tokio::test]
async fn refused_write_leaves_no_cached_record() {
    let store = store().await;
    let repo = Arc::new(FlakyRepo::new(store.clone()));
    let (mut asha, sink) = session_with_repo(&store, repo.clone(), "asha").await;
    repo.refuse_transactions.store(true, Ordering::SeqCst);

    let err = asha
        .submit_expense(ExpenseCmd::new("Lunch", Money::rupees(300), today(), now()))
        .await
        .unwrap_err();

    assert!(err.is_persistence());
    assert!(asha.ledger().transactions().is_empty());
    assert_eq!(sink.last().unwrap().outcome, Outcome::Failure);

    // The cache matches what the store holds.
    let cached = asha.ledger().expenses().len();
    let (reopened, _) = session_for(&store, "asha").await;
    assert_eq!(reopened.ledger().expenses().len(), cached);
    assert!(reopened.ledger().transactions().is_empty());
}

#[tokio::test]
async fn refused_gate_keeps_the_saving_unvalidated() {
    let store = store().await;
    let repo = Arc::new(FlakyRepo::new(store.clone()));
    let (mut asha, _) = session_with_repo(&store, repo.clone(), "asha").await;
    repo.refuse_validations.store(true, Ordering::SeqCst);

    let err = asha
        .submit_saving(engine::SavingCmd::new(
            "SIP",
            Money::rupees(1_000),
            today(),
            engine::SavingType::Sip,
            engine::Frequency::Monthly,
            now(),
        ))
        .await
        .unwrap_err();

    assert!(err.is_persistence());
    assert!(asha.pending_validations().is_empty());
    assert_eq!(asha.total_saved(), Money::ZERO);
}
