//! Transaction primitives.
//!
//! A `Transaction` records money that actually moved. Transactions are only
//! appended as a side effect of a validated mutation and are never edited;
//! they disappear only together with the expense or saving that produced them.

use chrono::{DateTime, NaiveDate, Utc};
use sea_orm::{ActiveValue, entity::prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    EngineError, Money, ResultEngine,
    util::{parse_optional_uuid, parse_uuid, require_positive, row_amount},
};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransactionKind {
    Expense,
    Income,
    Saving,
    Return,
}

impl TransactionKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Expense => "expense",
            Self::Income => "income",
            Self::Saving => "saving",
            Self::Return => "return",
        }
    }

    /// Income and investment returns add to the balance.
    pub fn is_inflow(self) -> bool {
        matches!(self, Self::Income | Self::Return)
    }
}

impl TryFrom<&str> for TransactionKind {
    type Error = EngineError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "expense" => Ok(Self::Expense),
            "income" => Ok(Self::Income),
            "saving" => Ok(Self::Saving),
            "return" => Ok(Self::Return),
            other => Err(EngineError::InvalidInput(format!(
                "invalid transaction kind: {other}"
            ))),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: Uuid,
    pub user_id: String,
    pub title: String,
    pub amount: Money,
    pub date: NaiveDate,
    pub kind: TransactionKind,
    /// Expense category or saving type label.
    pub category: Option<String>,
    pub description: Option<String>,
    /// The expense or saving this transaction was produced by (lookup only).
    pub related_id: Option<Uuid>,
    pub recorded_at: DateTime<Utc>,
}

impl Transaction {
    pub fn new(
        user_id: impl Into<String>,
        kind: TransactionKind,
        title: impl Into<String>,
        amount: Money,
        date: NaiveDate,
        recorded_at: DateTime<Utc>,
    ) -> ResultEngine<Self> {
        require_positive(amount, "transaction amount")?;
        Ok(Self {
            id: Uuid::new_v4(),
            user_id: user_id.into(),
            title: title.into(),
            amount,
            date,
            kind,
            category: None,
            description: None,
            related_id: None,
            recorded_at,
        })
    }

    #[must_use]
    pub fn category(mut self, category: Option<&str>) -> Self {
        self.category = category.map(ToString::to_string);
        self
    }

    #[must_use]
    pub fn description(mut self, description: Option<String>) -> Self {
        self.description = description;
        self
    }

    #[must_use]
    pub fn related_to(mut self, related_id: Uuid) -> Self {
        self.related_id = Some(related_id);
        self
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "transactions")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub user_id: String,
    pub title: String,
    pub amount_minor: i64,
    pub date: Date,
    pub kind: String,
    pub category: Option<String>,
    pub description: Option<String>,
    pub related_id: Option<String>,
    pub recorded_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<&Transaction> for ActiveModel {
    fn from(tx: &Transaction) -> Self {
        Self {
            id: ActiveValue::Set(tx.id.to_string()),
            user_id: ActiveValue::Set(tx.user_id.clone()),
            title: ActiveValue::Set(tx.title.clone()),
            amount_minor: ActiveValue::Set(tx.amount.paise()),
            date: ActiveValue::Set(tx.date),
            kind: ActiveValue::Set(tx.kind.as_str().to_string()),
            category: ActiveValue::Set(tx.category.clone()),
            description: ActiveValue::Set(tx.description.clone()),
            related_id: ActiveValue::Set(tx.related_id.map(|id| id.to_string())),
            recorded_at: ActiveValue::Set(tx.recorded_at),
        }
    }
}

impl TryFrom<Model> for Transaction {
    type Error = EngineError;

    fn try_from(model: Model) -> ResultEngine<Self> {
        Ok(Self {
            id: parse_uuid(&model.id, "transaction")?,
            amount: row_amount(model.amount_minor, "transaction")?,
            kind: TransactionKind::try_from(model.kind.as_str()).map_err(|e| {
                EngineError::InvalidRow(format!("transaction {}: {e}", model.id))
            })?,
            related_id: parse_optional_uuid(model.related_id.as_deref(), "related")?,
            user_id: model.user_id,
            title: model.title,
            date: model.date,
            category: model.category,
            description: model.description,
            recorded_at: model.recorded_at,
        })
    }
}
