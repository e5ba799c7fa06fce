//! Pending approval gates.
//!
//! A `ValidationItem` sits in the queue of `user_id` until that user approves
//! or rejects it. The decision consumes the item; it is never edited.

use chrono::{DateTime, NaiveDate, Utc};
use sea_orm::{ActiveValue, entity::prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    EngineError, Money, ResultEngine,
    util::{parse_uuid, row_amount},
};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValidationKind {
    /// The counterparty's half of a split expense.
    ExpenseSplit,
    /// Confirmation that a saving contribution happened.
    Saving,
    /// An expense dated in the future.
    FutureExpense,
    /// An expected investment return on a saving.
    SavingReturn,
}

impl ValidationKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::ExpenseSplit => "expense_split",
            Self::Saving => "saving",
            Self::FutureExpense => "future_expense",
            Self::SavingReturn => "saving_return",
        }
    }
}

impl TryFrom<&str> for ValidationKind {
    type Error = EngineError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "expense_split" => Ok(Self::ExpenseSplit),
            "saving" => Ok(Self::Saving),
            "future_expense" => Ok(Self::FutureExpense),
            "saving_return" => Ok(Self::SavingReturn),
            other => Err(EngineError::InvalidInput(format!(
                "invalid validation kind: {other}"
            ))),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationItem {
    pub id: Uuid,
    /// Owner of the queue this item sits in.
    pub user_id: String,
    pub title: String,
    pub amount: Money,
    pub kind: ValidationKind,
    pub date: NaiveDate,
    /// Informational only; nothing expires automatically.
    pub expires_at: DateTime<Utc>,
    pub description: Option<String>,
    /// The gated expense or saving.
    pub related_id: Uuid,
    /// Submitter of a split; owner of the related expense.
    pub initiated_by: Option<String>,
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "validations")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub user_id: String,
    pub title: String,
    pub amount_minor: i64,
    pub kind: String,
    pub date: Date,
    pub expires_at: DateTimeUtc,
    pub description: Option<String>,
    pub related_id: String,
    pub initiated_by: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<&ValidationItem> for ActiveModel {
    fn from(item: &ValidationItem) -> Self {
        Self {
            id: ActiveValue::Set(item.id.to_string()),
            user_id: ActiveValue::Set(item.user_id.clone()),
            title: ActiveValue::Set(item.title.clone()),
            amount_minor: ActiveValue::Set(item.amount.paise()),
            kind: ActiveValue::Set(item.kind.as_str().to_string()),
            date: ActiveValue::Set(item.date),
            expires_at: ActiveValue::Set(item.expires_at),
            description: ActiveValue::Set(item.description.clone()),
            related_id: ActiveValue::Set(item.related_id.to_string()),
            initiated_by: ActiveValue::Set(item.initiated_by.clone()),
        }
    }
}

impl TryFrom<Model> for ValidationItem {
    type Error = EngineError;

    fn try_from(model: Model) -> ResultEngine<Self> {
        let kind = ValidationKind::try_from(model.kind.as_str())
            .map_err(|e| EngineError::InvalidRow(format!("validation {}: {e}", model.id)))?;
        if kind == ValidationKind::ExpenseSplit && model.initiated_by.is_none() {
            return Err(EngineError::InvalidRow(format!(
                "validation {}: split gate without initiator",
                model.id
            )));
        }
        Ok(Self {
            id: parse_uuid(&model.id, "validation")?,
            amount: row_amount(model.amount_minor, "validation")?,
            related_id: parse_uuid(&model.related_id, "related")?,
            kind,
            user_id: model.user_id,
            title: model.title,
            date: model.date,
            expires_at: model.expires_at,
            description: model.description,
            initiated_by: model.initiated_by,
        })
    }
}
