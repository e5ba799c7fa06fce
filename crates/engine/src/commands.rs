//! Command structs for session write operations.
//!
//! These types group the parameters of a submission, keeping call sites
//! readable and avoiding long argument lists. Each command carries the instant
//! it was submitted at, so the rules that compare against "now" stay
//! deterministic.

use chrono::{DateTime, NaiveDate, Utc};

use crate::{ExpenseCategory, ExpenseKind, Frequency, Money, SavingType};

/// Submit an expense (immediate, scheduled or split).
#[derive(Clone, Debug)]
pub struct ExpenseCmd {
    pub title: String,
    pub amount: Money,
    pub date: NaiveDate,
    pub kind: ExpenseKind,
    pub category: ExpenseCategory,
    pub frequency: Option<Frequency>,
    pub description: Option<String>,
    /// Username to split the expense with. Blank means no split.
    pub split_with: Option<String>,
    pub submitted_at: DateTime<Utc>,
}

impl ExpenseCmd {
    /// A one-time expense in category `other`.
    #[must_use]
    pub fn new(
        title: impl Into<String>,
        amount: Money,
        date: NaiveDate,
        submitted_at: DateTime<Utc>,
    ) -> Self {
        Self {
            title: title.into(),
            amount,
            date,
            kind: ExpenseKind::OneTime,
            category: ExpenseCategory::Other,
            frequency: None,
            description: None,
            split_with: None,
            submitted_at,
        }
    }

    #[must_use]
    pub fn category(mut self, category: ExpenseCategory) -> Self {
        self.category = category;
        self
    }

    /// Marks the expense as recurring with the given frequency.
    #[must_use]
    pub fn recurring(mut self, frequency: Frequency) -> Self {
        self.kind = ExpenseKind::Recurring;
        self.frequency = Some(frequency);
        self
    }

    #[must_use]
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    #[must_use]
    pub fn split_with(mut self, username: impl Into<String>) -> Self {
        self.split_with = Some(username.into());
        self
    }

    /// The trimmed split target, if one was given.
    pub fn split_target(&self) -> Option<&str> {
        self.split_with
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }
}

/// Submit a saving contribution.
#[derive(Clone, Debug)]
pub struct SavingCmd {
    pub title: String,
    pub amount: Money,
    pub date: NaiveDate,
    pub saving_type: SavingType,
    pub frequency: Frequency,
    pub return_rate: Option<f64>,
    pub return_frequency: Option<Frequency>,
    pub description: Option<String>,
    pub submitted_at: DateTime<Utc>,
}

impl SavingCmd {
    #[must_use]
    pub fn new(
        title: impl Into<String>,
        amount: Money,
        date: NaiveDate,
        saving_type: SavingType,
        frequency: Frequency,
        submitted_at: DateTime<Utc>,
    ) -> Self {
        Self {
            title: title.into(),
            amount,
            date,
            saving_type,
            frequency,
            return_rate: None,
            return_frequency: None,
            description: None,
            submitted_at,
        }
    }

    /// Expected return of `rate` percent every `frequency` period.
    #[must_use]
    pub fn returns(mut self, rate: f64, frequency: Frequency) -> Self {
        self.return_rate = Some(rate);
        self.return_frequency = Some(frequency);
        self
    }

    #[must_use]
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// Record extra income (never gated).
#[derive(Clone, Debug)]
pub struct IncomeCmd {
    pub title: String,
    pub amount: Money,
    pub description: Option<String>,
    pub received_at: DateTime<Utc>,
}

impl IncomeCmd {
    #[must_use]
    pub fn new(title: impl Into<String>, amount: Money, received_at: DateTime<Utc>) -> Self {
        Self {
            title: title.into(),
            amount,
            description: None,
            received_at,
        }
    }

    #[must_use]
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}
