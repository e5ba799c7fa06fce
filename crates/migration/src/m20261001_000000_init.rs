//! Initial schema.
//!
//! - `users`: profiles, keyed by username
//! - `expenses`: spending records, split or not
//! - `savings`: contributions with optional expected returns
//! - `transactions`: the posted history
//! - `validations`: gates waiting for a user's approval

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

// ─────────────────────────────────────────────────────────────────────────────
// Table identifiers
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Iden)]
enum Users {
    Table,
    Username,
    Name,
    Email,
    PhoneNumber,
    MonthlySalaryMinor,
}

#[derive(Iden)]
enum Expenses {
    Table,
    Id,
    UserId,
    Title,
    AmountMinor,
    Date,
    Category,
    Kind,
    Frequency,
    Description,
    IsSplit,
    SplitWith,
    SplitStatus,
    IsValidated,
}

#[derive(Iden)]
enum Savings {
    Table,
    Id,
    UserId,
    Title,
    AmountMinor,
    Date,
    SavingType,
    Frequency,
    ReturnRate,
    ReturnFrequency,
    Description,
    IsValidated,
}

#[derive(Iden)]
enum Transactions {
    Table,
    Id,
    UserId,
    Title,
    AmountMinor,
    Date,
    Kind,
    Category,
    Description,
    RelatedId,
    RecordedAt,
}

#[derive(Iden)]
enum Validations {
    Table,
    Id,
    UserId,
    Title,
    AmountMinor,
    Kind,
    Date,
    ExpiresAt,
    Description,
    RelatedId,
    InitiatedBy,
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // ───────────────────────────────────────────────────────────────────
        // 1. Users
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(Users::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Users::Username)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Users::Name).string().not_null())
                    .col(ColumnDef::new(Users::Email).string().not_null())
                    .col(ColumnDef::new(Users::PhoneNumber).string().not_null())
                    .col(
                        ColumnDef::new(Users::MonthlySalaryMinor)
                            .big_integer()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        // ───────────────────────────────────────────────────────────────────
        // 2. Expenses
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(Expenses::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Expenses::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Expenses::UserId).string().not_null())
                    .col(ColumnDef::new(Expenses::Title).string().not_null())
                    .col(ColumnDef::new(Expenses::AmountMinor).big_integer().not_null())
                    .col(ColumnDef::new(Expenses::Date).date().not_null())
                    .col(ColumnDef::new(Expenses::Category).string().not_null())
                    .col(ColumnDef::new(Expenses::Kind).string().not_null())
                    .col(ColumnDef::new(Expenses::Frequency).string())
                    .col(ColumnDef::new(Expenses::Description).string())
                    .col(
                        ColumnDef::new(Expenses::IsSplit)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(ColumnDef::new(Expenses::SplitWith).string())
                    .col(ColumnDef::new(Expenses::SplitStatus).string())
                    .col(
                        ColumnDef::new(Expenses::IsValidated)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-expenses-user_id-date")
                    .table(Expenses::Table)
                    .col(Expenses::UserId)
                    .col(Expenses::Date)
                    .to_owned(),
            )
            .await?;

        // ───────────────────────────────────────────────────────────────────
        // 3. Savings
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(Savings::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Savings::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Savings::UserId).string().not_null())
                    .col(ColumnDef::new(Savings::Title).string().not_null())
                    .col(ColumnDef::new(Savings::AmountMinor).big_integer().not_null())
                    .col(ColumnDef::new(Savings::Date).date().not_null())
                    .col(ColumnDef::new(Savings::SavingType).string().not_null())
                    .col(ColumnDef::new(Savings::Frequency).string().not_null())
                    .col(ColumnDef::new(Savings::ReturnRate).double())
                    .col(ColumnDef::new(Savings::ReturnFrequency).string())
                    .col(ColumnDef::new(Savings::Description).string())
                    .col(
                        ColumnDef::new(Savings::IsValidated)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-savings-user_id-date")
                    .table(Savings::Table)
                    .col(Savings::UserId)
                    .col(Savings::Date)
                    .to_owned(),
            )
            .await?;

        // ───────────────────────────────────────────────────────────────────
        // 4. Transactions
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(Transactions::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Transactions::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Transactions::UserId).string().not_null())
                    .col(ColumnDef::new(Transactions::Title).string().not_null())
                    .col(
                        ColumnDef::new(Transactions::AmountMinor)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Transactions::Date).date().not_null())
                    .col(ColumnDef::new(Transactions::Kind).string().not_null())
                    .col(ColumnDef::new(Transactions::Category).string())
                    .col(ColumnDef::new(Transactions::Description).string())
                    .col(ColumnDef::new(Transactions::RelatedId).string())
                    .col(
                        ColumnDef::new(Transactions::RecordedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-transactions-user_id-date")
                    .table(Transactions::Table)
                    .col(Transactions::UserId)
                    .col(Transactions::Date)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-transactions-related_id")
                    .table(Transactions::Table)
                    .col(Transactions::RelatedId)
                    .to_owned(),
            )
            .await?;

        // ───────────────────────────────────────────────────────────────────
        // 5. Validations
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(Validations::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Validations::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Validations::UserId).string().not_null())
                    .col(ColumnDef::new(Validations::Title).string().not_null())
                    .col(
                        ColumnDef::new(Validations::AmountMinor)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Validations::Kind).string().not_null())
                    .col(ColumnDef::new(Validations::Date).date().not_null())
                    .col(
                        ColumnDef::new(Validations::ExpiresAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Validations::Description).string())
                    .col(ColumnDef::new(Validations::RelatedId).string().not_null())
                    .col(ColumnDef::new(Validations::InitiatedBy).string())
                    .to_owned(),
            )
            .await?;

        // At most one live gate of each kind per record.
        manager
            .create_index(
                Index::create()
                    .name("idx-validations-related_id-kind-unique")
                    .table(Validations::Table)
                    .col(Validations::RelatedId)
                    .col(Validations::Kind)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-validations-user_id")
                    .table(Validations::Table)
                    .col(Validations::UserId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Validations::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Transactions::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Savings::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Expenses::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Users::Table).to_owned())
            .await?;
        Ok(())
    }
}
