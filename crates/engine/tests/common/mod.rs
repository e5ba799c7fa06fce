#![allow(dead_code)]

use std::sync::Arc;

use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use sea_orm::Database;

use engine::{IdentityProvider, LedgerRepository, MemorySink, Money, Session, SqlStore, UserProfile};
use migration::MigratorTrait;

pub async fn store() -> SqlStore {
    let db = Database::connect("sqlite::memory:").await.unwrap();
    migration::Migrator::up(&db, None).await.unwrap();
    SqlStore::new(db)
}

pub fn profile(username: &str, salary_rupees: i64) -> UserProfile {
    UserProfile {
        username: username.to_string(),
        name: format!("{username} test"),
        email: format!("{username}@example.in"),
        phone_number: "9876543210".to_string(),
        monthly_salary: Money::rupees(salary_rupees),
    }
}

/// Saves a profile for `username` and opens a session for them.
pub async fn session_with_profile(
    store: &SqlStore,
    username: &str,
    salary_rupees: i64,
) -> (Session, Arc<MemorySink>) {
    store
        .save_profile(&profile(username, salary_rupees))
        .await
        .unwrap();
    session_for(store, username).await
}

pub async fn session_for(store: &SqlStore, username: &str) -> (Session, Arc<MemorySink>) {
    let sink = Arc::new(MemorySink::new());
    let session = Session::builder()
        .user(username)
        .store(store.clone())
        .notifier(sink.clone())
        .build()
        .await
        .unwrap();
    (session, sink)
}

/// Session over an arbitrary repository; identity still comes from `store`.
pub async fn session_with_repo(
    store: &SqlStore,
    repo: Arc<dyn LedgerRepository>,
    username: &str,
) -> (Session, Arc<MemorySink>) {
    store
        .save_profile(&profile(username, 50_000))
        .await
        .unwrap();
    let sink = Arc::new(MemorySink::new());
    let session = Session::builder()
        .user(username)
        .repository(repo)
        .identity(Arc::new(store.clone()))
        .notifier(sink.clone())
        .build()
        .await
        .unwrap();
    (session, sink)
}

pub fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 10, 17, 10, 0, 0).unwrap()
}

pub fn today() -> NaiveDate {
    now().date_naive()
}

pub fn days_from_today(days: u64) -> NaiveDate {
    today() + chrono::Days::new(days)
}

/// remaining = salary + extra income - expenses - saved
pub fn assert_balance_identity(session: &Session) {
    let expected = session.monthly_salary() + session.extra_income()
        - session.total_expenses()
        - session.total_saved();
    assert_eq!(session.remaining_balance(), expected);
}
