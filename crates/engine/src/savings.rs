//! Savings: contributions toward a savings vehicle.
//!
//! A saving never counts toward the saved total until its `saving` gate is
//! approved.

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
pub enum SavingType {
    Sip,
    MutualFund,
    Gullak,
    FixedDeposit,
    Other,
}

impl SavingType {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Sip => "sip",
            Self::MutualFund => "mutual_fund",
            Self::Gullak => "gullak",
            Self::FixedDeposit => "fixed_deposit",
            Self::Other => "other",
        }
    }
}

impl TryFrom<&str> for SavingType {
    type Error = EngineError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "sip" => Ok(Self::Sip),
            "mutual_fund" => Ok(Self::MutualFund),
            "gullak" => Ok(Self::Gullak),
            "fixed_deposit" => Ok(Self::FixedDeposit),
            "other" => Ok(Self::Other),
            other => Err(EngineError::InvalidInput(format!(
                "invalid saving type: {other}"
            ))),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Saving {
    pub id: Uuid,
    pub user_id: String,
    pub title: String,
    pub amount: Money,
    pub date: NaiveDate,
    pub saving_type: SavingType,
    pub frequency: Frequency,
    /// Expected return in percent per `return_frequency` period.
    pub return_rate: Option<f64>,
    pub return_frequency: Option<Frequency>,
    pub description: Option<String>,
    pub is_validated: bool,
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "savings")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub user_id: String,
    pub title: String,
    pub amount_minor: i64,
    pub date: Date,
    pub saving_type: String,
    pub frequency: String,
    pub return_rate: Option<f64>,
    pub return_frequency: Option<String>,
    pub description: Option<String>,
    pub is_validated: bool,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<&Saving> for ActiveModel {
    fn from(saving: &Saving) -> Self {
        Self {
            id: ActiveValue::Set(saving.id.to_string()),
            user_id: ActiveValue::Set(saving.user_id.clone()),
            title: ActiveValue::Set(saving.title.clone()),
            amount_minor: ActiveValue::Set(saving.amount.paise()),
            date: ActiveValue::Set(saving.date),
            saving_type: ActiveValue::Set(saving.saving_type.as_str().to_string()),
            frequency: ActiveValue::Set(saving.frequency.as_str().to_string()),
            return_rate: ActiveValue::Set(saving.return_rate),
            return_frequency: ActiveValue::Set(
                saving.return_frequency.map(|f| f.as_str().to_string()),
            ),
            description: ActiveValue::Set(saving.description.clone()),
            is_validated: ActiveValue::Set(saving.is_validated),
        }
    }
}

impl TryFrom<Model> for Saving {
    type Error = EngineError;

    fn try_from(model: Model) -> ResultEngine<Self> {
        let row_err = |e: EngineError| EngineError::InvalidRow(format!("saving {}: {e}", model.id));
        if model.return_rate.is_some_and(|rate| !rate.is_finite() || rate < 0.0) {
            return Err(EngineError::InvalidRow(format!(
                "saving {}: return rate must be a non-negative number",
                model.id
            )));
        }
        Ok(Self {
            id: parse_uuid(&model.id, "saving")?,
            amount: row_amount(model.amount_minor, "saving")?,
            saving_type: SavingType::try_from(model.saving_type.as_str()).map_err(row_err)?,
            frequency: Frequency::try_from(model.frequency.as_str()).map_err(row_err)?,
            return_frequency: model
                .return_frequency
                .as_deref()
                .map(Frequency::try_from)
                .transpose()
                .map_err(row_err)?,
            user_id: model.user_id,
            title: model.title,
            date: model.date,
            return_rate: model.return_rate,
            description: model.description,
            is_validated: model.is_validated,
        })
    }
}
