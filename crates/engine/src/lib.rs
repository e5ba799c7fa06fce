//! Personal-finance ledger: expenses, savings, extra income, and the
//! approval gates that hold records back until the user (or a split
//! counterparty) confirms them.
//!
//! Start with [`Session::builder`].

pub use commands::{ExpenseCmd, IncomeCmd, SavingCmd};
pub use error::EngineError;
pub use expenses::{Expense, ExpenseCategory, ExpenseKind, SplitStatus};
pub use frequency::Frequency;
pub use ledger::Ledger;
pub use money::Money;
pub use notify::{MemorySink, TracingSink};
pub use ops::{Resolution, Session, SessionBuilder};
pub use ports::{IdentityProvider, LedgerRepository, Notification, NotificationSink, Outcome};
pub use rules::{
    ExpenseRoute, ReturnSchedule, SPLIT_WINDOW_DAYS, expense_route, return_schedule,
    saving_gate_expiry, split_shares,
};
pub use savings::{Saving, SavingType};
pub use sql_store::SqlStore;
pub use totals::{Summary, TransactionFilter, TypeShare};
pub use transactions::{Transaction, TransactionKind};
pub use users::UserProfile;
pub use validations::{ValidationItem, ValidationKind};

mod commands;
mod error;
mod expenses;
mod frequency;
mod ledger;
mod money;
mod notify;
mod ops;
mod ports;
mod rules;
mod savings;
mod sql_store;
pub mod totals;
mod transactions;
mod users;
mod util;
mod validations;

type ResultEngine<T> = Result<T, EngineError>;
