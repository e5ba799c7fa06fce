//! Users table and profiles.
//!
//! The engine keys every record by `user_id`, which is the username.

use sea_orm::{ActiveValue, entity::prelude::*};
use serde::{Deserialize, Serialize};

use crate::{EngineError, Money, ResultEngine, util::require_positive};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    pub username: String,
    pub name: String,
    pub email: String,
    pub phone_number: String,
    pub monthly_salary: Money,
}

impl UserProfile {
    /// A profile is usable for budgeting once it has a name, an email, a
    /// username and a salary.
    pub fn is_complete(&self) -> bool {
        !self.name.is_empty()
            && !self.email.is_empty()
            && !self.username.is_empty()
            && self.monthly_salary.is_positive()
    }

    /// Checks every field, trimming surrounding whitespace first.
    pub fn validated(self) -> ResultEngine<Self> {
        let username = self.username.trim().to_string();
        validate_username(&username)?;

        let name = self.name.trim().to_string();
        let name_len = name.chars().count();
        if !(2..=50).contains(&name_len) {
            return Err(EngineError::InvalidInput(
                "name must be 2 to 50 characters".to_string(),
            ));
        }

        let email = self.email.trim().to_string();
        if !looks_like_email(&email) {
            return Err(EngineError::InvalidInput(format!("invalid email: {email}")));
        }

        let phone_number = self.phone_number.trim().to_string();
        if !(10..=15).contains(&phone_number.chars().count()) {
            return Err(EngineError::InvalidInput(
                "phone number must be 10 to 15 characters".to_string(),
            ));
        }

        require_positive(self.monthly_salary, "monthly salary")?;

        Ok(Self {
            username,
            name,
            email,
            phone_number,
            monthly_salary: self.monthly_salary,
        })
    }
}

/// Usernames are 3 to 20 characters of `a-z`, `0-9` and `_`.
pub(crate) fn validate_username(username: &str) -> ResultEngine<()> {
    let len = username.chars().count();
    if !(3..=20).contains(&len) {
        return Err(EngineError::InvalidInput(
            "username must be 3 to 20 characters".to_string(),
        ));
    }
    if !username
        .chars()
        .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_')
    {
        return Err(EngineError::InvalidInput(
            "username may only contain lowercase letters, digits and underscores".to_string(),
        ));
    }
    Ok(())
}

fn looks_like_email(email: &str) -> bool {
    let mut parts = email.split('@');
    let (Some(local), Some(domain), None) = (parts.next(), parts.next(), parts.next()) else {
        return false;
    };
    !local.is_empty()
        && !email.contains(char::is_whitespace)
        && domain
            .split_once('.')
            .is_some_and(|(host, tld)| !host.is_empty() && !tld.is_empty())
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub username: String,
    pub name: String,
    pub email: String,
    pub phone_number: String,
    pub monthly_salary_minor: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<&UserProfile> for ActiveModel {
    fn from(profile: &UserProfile) -> Self {
        Self {
            username: ActiveValue::Set(profile.username.clone()),
            name: ActiveValue::Set(profile.name.clone()),
            email: ActiveValue::Set(profile.email.clone()),
            phone_number: ActiveValue::Set(profile.phone_number.clone()),
            monthly_salary_minor: ActiveValue::Set(profile.monthly_salary.paise()),
        }
    }
}

impl From<Model> for UserProfile {
    fn from(model: Model) -> Self {
        Self {
            username: model.username,
            name: model.name,
            email: model.email,
            phone_number: model.phone_number,
            monthly_salary: Money::new(model.monthly_salary_minor),
        }
    }
}
