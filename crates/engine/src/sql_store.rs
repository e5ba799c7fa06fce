//! sea-orm backed persistence and identity.

use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, Order, QueryFilter, QueryOrder,
    sea_query::Expr,
};
use uuid::Uuid;

use crate::{
    EngineError, Expense, IdentityProvider, LedgerRepository, ResultEngine, Saving, Transaction,
    UserProfile, ValidationItem, expenses, savings, transactions, users, validations,
};

/// Stores everything in the database behind `database`.
///
/// Rows come back in insertion order (SQLite `rowid`).
#[derive(Clone, Debug)]
pub struct SqlStore {
    database: DatabaseConnection,
}

impl SqlStore {
    pub fn new(database: DatabaseConnection) -> Self {
        Self { database }
    }

    pub fn database(&self) -> &DatabaseConnection {
        &self.database
    }
}

fn not_updated(label: &str, id: Uuid) -> EngineError {
    EngineError::KeyNotFound(format!("{label} {id}"))
}

#[async_trait]
impl IdentityProvider for SqlStore {
    async fn resolve_user_by_username(&self, username: &str) -> ResultEngine<Option<String>> {
        let user = users::Entity::find_by_id(username.to_string())
            .one(&self.database)
            .await?;
        Ok(user.map(|m| m.username))
    }

    async fn profile(&self, user_id: &str) -> ResultEngine<Option<UserProfile>> {
        let user = users::Entity::find_by_id(user_id.to_string())
            .one(&self.database)
            .await?;
        Ok(user.map(UserProfile::from))
    }

    async fn save_profile(&self, profile: &UserProfile) -> ResultEngine<()> {
        let active = users::ActiveModel::from(profile);
        // Upsert: insert if missing, otherwise replace every column.
        match users::Entity::find_by_id(profile.username.clone())
            .one(&self.database)
            .await?
        {
            Some(_) => {
                active.update(&self.database).await?;
            }
            None => {
                active.insert(&self.database).await?;
            }
        }
        Ok(())
    }
}

#[async_trait]
impl LedgerRepository for SqlStore {
    async fn list_expenses(&self, user_id: &str) -> ResultEngine<Vec<Expense>> {
        expenses::Entity::find()
            .filter(expenses::Column::UserId.eq(user_id))
            .order_by(Expr::cust("rowid"), Order::Asc)
            .all(&self.database)
            .await?
            .into_iter()
            .map(Expense::try_from)
            .collect()
    }

    async fn find_expense(&self, user_id: &str, id: Uuid) -> ResultEngine<Option<Expense>> {
        expenses::Entity::find_by_id(id.to_string())
            .filter(expenses::Column::UserId.eq(user_id))
            .one(&self.database)
            .await?
            .map(Expense::try_from)
            .transpose()
    }

    async fn insert_expense(&self, expense: &Expense) -> ResultEngine<()> {
        expenses::ActiveModel::from(expense)
            .insert(&self.database)
            .await?;
        Ok(())
    }

    async fn update_expense(&self, expense: &Expense) -> ResultEngine<()> {
        let result = expenses::Entity::update_many()
            .set(expenses::ActiveModel::from(expense))
            .filter(expenses::Column::Id.eq(expense.id.to_string()))
            .filter(expenses::Column::UserId.eq(expense.user_id.as_str()))
            .exec(&self.database)
            .await?;
        if result.rows_affected == 0 {
            return Err(not_updated("expense", expense.id));
        }
        Ok(())
    }

    async fn delete_expense(&self, user_id: &str, id: Uuid) -> ResultEngine<()> {
        expenses::Entity::delete_many()
            .filter(expenses::Column::Id.eq(id.to_string()))
            .filter(expenses::Column::UserId.eq(user_id))
            .exec(&self.database)
            .await?;
        Ok(())
    }

    async fn list_savings(&self, user_id: &str) -> ResultEngine<Vec<Saving>> {
        savings::Entity::find()
            .filter(savings::Column::UserId.eq(user_id))
            .order_by(Expr::cust("rowid"), Order::Asc)
            .all(&self.database)
            .await?
            .into_iter()
            .map(Saving::try_from)
            .collect()
    }

    async fn find_saving(&self, user_id: &str, id: Uuid) -> ResultEngine<Option<Saving>> {
        savings::Entity::find_by_id(id.to_string())
            .filter(savings::Column::UserId.eq(user_id))
            .one(&self.database)
            .await?
            .map(Saving::try_from)
            .transpose()
    }

    async fn insert_saving(&self, saving: &Saving) -> ResultEngine<()> {
        savings::ActiveModel::from(saving)
            .insert(&self.database)
            .await?;
        Ok(())
    }

    async fn update_saving(&self, saving: &Saving) -> ResultEngine<()> {
        let result = savings::Entity::update_many()
            .set(savings::ActiveModel::from(saving))
            .filter(savings::Column::Id.eq(saving.id.to_string()))
            .filter(savings::Column::UserId.eq(saving.user_id.as_str()))
            .exec(&self.database)
            .await?;
        if result.rows_affected == 0 {
            return Err(not_updated("saving", saving.id));
        }
        Ok(())
    }

    async fn delete_saving(&self, user_id: &str, id: Uuid) -> ResultEngine<()> {
        savings::Entity::delete_many()
            .filter(savings::Column::Id.eq(id.to_string()))
            .filter(savings::Column::UserId.eq(user_id))
            .exec(&self.database)
            .await?;
        Ok(())
    }

    async fn list_transactions(&self, user_id: &str) -> ResultEngine<Vec<Transaction>> {
        transactions::Entity::find()
            .filter(transactions::Column::UserId.eq(user_id))
            .order_by(Expr::cust("rowid"), Order::Asc)
            .all(&self.database)
            .await?
            .into_iter()
            .map(Transaction::try_from)
            .collect()
    }

    async fn insert_transaction(&self, tx: &Transaction) -> ResultEngine<()> {
        transactions::ActiveModel::from(tx)
            .insert(&self.database)
            .await?;
        Ok(())
    }

    async fn delete_transactions_for(&self, user_id: &str, related_id: Uuid) -> ResultEngine<u64> {
        let result = transactions::Entity::delete_many()
            .filter(transactions::Column::UserId.eq(user_id))
            .filter(transactions::Column::RelatedId.eq(related_id.to_string()))
            .exec(&self.database)
            .await?;
        Ok(result.rows_affected)
    }

    async fn list_validations(&self, user_id: &str) -> ResultEngine<Vec<ValidationItem>> {
        validations::Entity::find()
            .filter(validations::Column::UserId.eq(user_id))
            .order_by(Expr::cust("rowid"), Order::Asc)
            .all(&self.database)
            .await?
            .into_iter()
            .map(ValidationItem::try_from)
            .collect()
    }

    async fn insert_validation(&self, item: &ValidationItem) -> ResultEngine<()> {
        validations::ActiveModel::from(item)
            .insert(&self.database)
            .await?;
        Ok(())
    }

    async fn claim_validation(&self, user_id: &str, id: Uuid) -> ResultEngine<bool> {
        let result = validations::Entity::delete_many()
            .filter(validations::Column::Id.eq(id.to_string()))
            .filter(validations::Column::UserId.eq(user_id))
            .exec(&self.database)
            .await?;
        Ok(result.rows_affected > 0)
    }
}
