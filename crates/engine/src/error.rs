//! The module contains the errors the engine can return.
//!
//! Input problems are caught before any write:
//!
//! - [`InvalidInput`] for missing or malformed fields.
//! - [`InvalidAmount`] for non-positive amounts.
//! - [`CounterpartyNotFound`] when a split target does not resolve.
//!
//! Decisions on a gate that is gone yield [`ValidationNotFound`]. Storage
//! failures surface as [`Persistence`] or [`Database`], and a split whose
//! counterparty gate could not be written after the submitter's half posted is
//! reported as [`PartialSplitFailure`].
//!
//!  [`InvalidInput`]: EngineError::InvalidInput
//!  [`InvalidAmount`]: EngineError::InvalidAmount
//!  [`CounterpartyNotFound`]: EngineError::CounterpartyNotFound
//!  [`ValidationNotFound`]: EngineError::ValidationNotFound
//!  [`Persistence`]: EngineError::Persistence
//!  [`Database`]: EngineError::Database
//!  [`PartialSplitFailure`]: EngineError::PartialSplitFailure
use sea_orm::DbErr;
use thiserror::Error;
use uuid::Uuid;

/// Engine custom errors.
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),
    #[error("User \"{0}\" not found")]
    CounterpartyNotFound(String),
    #[error("Validation {0} not found")]
    ValidationNotFound(Uuid),
    #[error("\"{0}\" key not found!")]
    KeyNotFound(String),
    #[error("Invalid stored row: {0}")]
    InvalidRow(String),
    #[error("Split expense {expense_id} posted but the counterparty gate failed: {reason}")]
    PartialSplitFailure { expense_id: Uuid, reason: String },
    #[error("Persistence failure: {0}")]
    Persistence(String),
    #[error(transparent)]
    Database(#[from] DbErr),
}

impl EngineError {
    /// `true` when the persistence collaborator rejected a write or read.
    pub fn is_persistence(&self) -> bool {
        matches!(self, Self::Persistence(_) | Self::Database(_))
    }
}

impl PartialEq for EngineError {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::InvalidInput(a), Self::InvalidInput(b)) => a == b,
            (Self::InvalidAmount(a), Self::InvalidAmount(b)) => a == b,
            (Self::CounterpartyNotFound(a), Self::CounterpartyNotFound(b)) => a == b,
            (Self::ValidationNotFound(a), Self::ValidationNotFound(b)) => a == b,
            (Self::KeyNotFound(a), Self::KeyNotFound(b)) => a == b,
            (Self::InvalidRow(a), Self::InvalidRow(b)) => a == b,
            (
                Self::PartialSplitFailure {
                    expense_id: a,
                    reason: ra,
                },
                Self::PartialSplitFailure {
                    expense_id: b,
                    reason: rb,
                },
            ) => a == b && ra == rb,
            (Self::Persistence(a), Self::Persistence(b)) => a == b,
            (Self::Database(a), Self::Database(b)) => a.to_string() == b.to_string(),
            _ => false,
        }
    }
}
