//! Expenses: discretionary outflows, optionally split with another user.

use chrono::NaiveDate;
use sea_orm::{ActiveValue, entity::prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    EngineError, Frequency, Money, ResultEngine,
    util::{parse_uuid, row_amount},
};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExpenseCategory {
    Rent,
    Food,
    Subscription,
    Recharge,
    Travel,
    Bill,
    Emi,
    Entertainment,
    Shopping,
    Other,
}

impl ExpenseCategory {
    pub const ALL: [ExpenseCategory; 10] = [
        Self::Rent,
        Self::Food,
        Self::Subscription,
        Self::Recharge,
        Self::Travel,
        Self::Bill,
        Self::Emi,
        Self::Entertainment,
        Self::Shopping,
        Self::Other,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Rent => "rent",
            Self::Food => "food",
            Self::Subscription => "subscription",
            Self::Recharge => "recharge",
            Self::Travel => "travel",
            Self::Bill => "bill",
            Self::Emi => "emi",
            Self::Entertainment => "entertainment",
            Self::Shopping => "shopping",
            Self::Other => "other",
        }
    }
}

impl TryFrom<&str> for ExpenseCategory {
    type Error = EngineError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::ALL
            .into_iter()
            .find(|c| c.as_str() == value)
            .ok_or_else(|| EngineError::InvalidInput(format!("invalid expense category: {value}")))
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExpenseKind {
    Recurring,
    OneTime,
}

impl ExpenseKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Recurring => "recurring",
            Self::OneTime => "one_time",
        }
    }
}

impl TryFrom<&str> for ExpenseKind {
    type Error = EngineError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "recurring" => Ok(Self::Recurring),
            "one_time" => Ok(Self::OneTime),
            other => Err(EngineError::InvalidInput(format!(
                "invalid expense kind: {other}"
            ))),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SplitStatus {
    Pending,
    Approved,
    Rejected,
}

impl SplitStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Approved => "approved",
            Self::Rejected => "rejected",
        }
    }
}

impl TryFrom<&str> for SplitStatus {
    type Error = EngineError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "pending" => Ok(Self::Pending),
            "approved" => Ok(Self::Approved),
            "rejected" => Ok(Self::Rejected),
            other => Err(EngineError::InvalidInput(format!(
                "invalid split status: {other}"
            ))),
        }
    }
}

/// An expense recorded by `user_id`.
///
/// `is_validated` tells whether the expense counts toward the balance; only
/// the rules engine flips it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Expense {
    pub id: Uuid,
    pub user_id: String,
    pub title: String,
    pub amount: Money,
    pub date: NaiveDate,
    pub category: ExpenseCategory,
    pub kind: ExpenseKind,
    pub frequency: Option<Frequency>,
    pub description: Option<String>,
    pub is_split: bool,
    pub split_with: Option<String>,
    pub split_status: Option<SplitStatus>,
    pub is_validated: bool,
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "expenses")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub user_id: String,
    pub title: String,
    pub amount_minor: i64,
    pub date: Date,
    pub category: String,
    pub kind: String,
    pub frequency: Option<String>,
    pub description: Option<String>,
    pub is_split: bool,
    pub split_with: Option<String>,
    pub split_status: Option<String>,
    pub is_validated: bool,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<&Expense> for ActiveModel {
    fn from(expense: &Expense) -> Self {
        Self {
            id: ActiveValue::Set(expense.id.to_string()),
            user_id: ActiveValue::Set(expense.user_id.clone()),
            title: ActiveValue::Set(expense.title.clone()),
            amount_minor: ActiveValue::Set(expense.amount.paise()),
            date: ActiveValue::Set(expense.date),
            category: ActiveValue::Set(expense.category.as_str().to_string()),
            kind: ActiveValue::Set(expense.kind.as_str().to_string()),
            frequency: ActiveValue::Set(expense.frequency.map(|f| f.as_str().to_string())),
            description: ActiveValue::Set(expense.description.clone()),
            is_split: ActiveValue::Set(expense.is_split),
            split_with: ActiveValue::Set(expense.split_with.clone()),
            split_status: ActiveValue::Set(expense.split_status.map(|s| s.as_str().to_string())),
            is_validated: ActiveValue::Set(expense.is_validated),
        }
    }
}

impl TryFrom<Model> for Expense {
    type Error = EngineError;

    fn try_from(model: Model) -> ResultEngine<Self> {
        let row_err =
            |e: EngineError| EngineError::InvalidRow(format!("expense {}: {e}", model.id));
        let split_status = model
            .split_status
            .as_deref()
            .map(SplitStatus::try_from)
            .transpose()
            .map_err(row_err)?;
        if split_status.is_some() != model.is_split {
            return Err(EngineError::InvalidRow(format!(
                "expense {}: split status must be present iff the expense is split",
                model.id
            )));
        }
        Ok(Self {
            id: parse_uuid(&model.id, "expense")?,
            amount: row_amount(model.amount_minor, "expense")?,
            category: ExpenseCategory::try_from(model.category.as_str()).map_err(row_err)?,
            kind: ExpenseKind::try_from(model.kind.as_str()).map_err(row_err)?,
            frequency: model
                .frequency
                .as_deref()
                .map(Frequency::try_from)
                .transpose()
                .map_err(row_err)?,
            user_id: model.user_id,
            title: model.title,
            date: model.date,
            description: model.description,
            is_split: model.is_split,
            split_with: model.split_with,
            split_status,
            is_validated: model.is_validated,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row() -> Model {
        Model {
            id: Uuid::new_v4().to_string(),
            user_id: "asha".to_string(),
            title: "Groceries".to_string(),
            amount_minor: 50_000,
            date: NaiveDate::from_ymd_opt(2026, 10, 1).unwrap(),
            category: "food".to_string(),
            kind: "one_time".to_string(),
            frequency: None,
            description: None,
            is_split: false,
            split_with: None,
            split_status: None,
            is_validated: true,
        }
    }

    #[test]
    fn maps_a_valid_row() {
        let expense = Expense::try_from(row()).unwrap();
        assert_eq!(expense.category, ExpenseCategory::Food);
        assert_eq!(expense.kind, ExpenseKind::OneTime);
        assert_eq!(expense.amount, Money::rupees(500));
    }

    #[test]
    fn rejects_unknown_category() {
        let mut model = row();
        model.category = "gadgets".to_string();
        assert!(matches!(
            Expense::try_from(model),
            Err(EngineError::InvalidRow(_))
        ));
    }

    #[test]
    fn rejects_split_status_on_unsplit_expense() {
        let mut model = row();
        model.split_status = Some("pending".to_string());
        assert!(matches!(
            Expense::try_from(model),
            Err(EngineError::InvalidRow(_))
        ));
    }
}
