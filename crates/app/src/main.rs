use std::error::Error;

use chrono::Utc;
use clap::Parser;
use engine::{
    ExpenseCmd, IncomeCmd, SavingCmd, Session, SqlStore, TransactionFilter, UserProfile,
};
use migration::{Migrator, MigratorTrait};
use serde::Serialize;
use uuid::Uuid;

use cli::{Cli, Command, ExpenseCommand, ProfileCommand, SavingCommand};
use settings::Database;

mod cli;
mod settings;

type AppResult<T> = Result<T, Box<dyn Error + Send + Sync>>;

#[tokio::main]
async fn main() -> AppResult<()> {
    let cli = Cli::parse();
    let mut settings = settings::Settings::new(cli.config.as_deref())?;
    if let Some(user) = cli.user.clone() {
        settings.user = Some(user);
    }
    if let Some(path) = cli.database.clone() {
        settings.database = match path.as_str() {
            ":memory:" => Database::Memory,
            _ => Database::Sqlite(path),
        };
    }

    tracing_subscriber::fmt()
        .with_env_filter(format!(
            "pocketbook={level},engine={level},notification={level}",
            level = settings.app.level
        ))
        .with_writer(std::io::stderr)
        .init();

    let Some(user) = settings.user.clone() else {
        tracing::error!("no user configured: pass --user or set POCKETBOOK__USER");
        std::process::exit(2);
    };

    let db = parse_database(&settings.database).await?;
    let mut session = Session::builder()
        .user(user)
        .store(SqlStore::new(db))
        .build()
        .await?;

    run(&mut session, cli.command, cli.json).await
}

async fn run(session: &mut Session, command: Command, json: bool) -> AppResult<()> {
    let now = Utc::now();
    let today = now.date_naive();

    match command {
        Command::Profile {
            command: ProfileCommand::Show,
        } => match session.profile() {
            Some(profile) => emit(json, profile, || {
                format!(
                    "{} ({})\n{} / {}\nsalary {}",
                    profile.name,
                    profile.username,
                    profile.email,
                    profile.phone_number,
                    profile.monthly_salary
                )
            })?,
            None => println!("no profile saved for {}", session.user_id()),
        },
        Command::Profile {
            command: ProfileCommand::Set(args),
        } => {
            let username = session.user_id().to_string();
            let profile = session
                .update_profile(UserProfile {
                    username,
                    name: args.name,
                    email: args.email,
                    phone_number: args.phone,
                    monthly_salary: args.salary,
                })
                .await?;
            emit(json, &profile, || format!("saved profile {}", profile.username))?;
        }
        Command::Expense {
            command: ExpenseCommand::Add(args),
        } => {
            let mut cmd = ExpenseCmd::new(args.title, args.amount, args.date.unwrap_or(today), now)
                .category(args.category);
            if let Some(frequency) = args.recurring {
                cmd = cmd.recurring(frequency);
            }
            if let Some(description) = args.description {
                cmd = cmd.description(description);
            }
            if let Some(username) = args.split_with {
                cmd = cmd.split_with(username);
            }
            let expense = session.submit_expense(cmd).await?;
            emit(json, &expense, || format!("{} {}", expense.id, expense.title))?;
        }
        Command::Expense {
            command: ExpenseCommand::Delete { id },
        } => {
            let expense = session.delete_expense(id).await?;
            emit(json, &expense, || format!("deleted {}", expense.title))?;
        }
        Command::Saving {
            command: SavingCommand::Add(args),
        } => {
            let mut cmd = SavingCmd::new(
                args.title,
                args.amount,
                args.date.unwrap_or(today),
                args.saving_type,
                args.frequency,
                now,
            );
            if let (Some(rate), Some(frequency)) = (args.rate, args.return_frequency) {
                cmd = cmd.returns(rate, frequency);
            }
            if let Some(description) = args.description {
                cmd = cmd.description(description);
            }
            let saving = session.submit_saving(cmd).await?;
            emit(json, &saving, || format!("{} {}", saving.id, saving.title))?;
        }
        Command::Saving {
            command: SavingCommand::Delete { id },
        } => {
            let saving = session.delete_saving(id).await?;
            emit(json, &saving, || format!("deleted {}", saving.title))?;
        }
        Command::Income(args) => {
            let mut cmd = IncomeCmd::new(args.title, args.amount, now);
            if let Some(description) = args.description {
                cmd = cmd.description(description);
            }
            let tx = session.add_income(cmd).await?;
            emit(json, &tx, || format!("{} {}", tx.id, tx.title))?;
        }
        Command::Pending => {
            let pending = session.pending_validations();
            emit(json, &pending, || {
                pending
                    .iter()
                    .map(|v| {
                        format!(
                            "{}  {:<15} {:>12}  {}  (expires {})",
                            v.id,
                            v.kind.as_str(),
                            v.amount.to_string(),
                            v.title,
                            v.expires_at.format("%Y-%m-%d %H:%M")
                        )
                    })
                    .collect::<Vec<_>>()
                    .join("\n")
            })?;
        }
        Command::Approve { id } => decide(session, id, true, json).await?,
        Command::Reject { id } => decide(session, id, false, json).await?,
        Command::Summary => {
            let summary = session.summary();
            emit(json, &summary, || {
                let mut lines = vec![
                    format!("salary        {:>14}", summary.monthly_salary.to_string()),
                    format!("extra income  {:>14}", summary.extra_income.to_string()),
                    format!("expenses      {:>14}", summary.total_expenses.to_string()),
                    format!("saved         {:>14}", summary.total_saved.to_string()),
                    format!("remaining     {:>14}", summary.remaining_balance.to_string()),
                    format!("pending       {:>14}", summary.pending_validations),
                ];
                for (category, amount) in session.expenses_by_category() {
                    lines.push(format!("  {:<12}{:>14}", category.as_str(), amount.to_string()));
                }
                for share in session.savings_by_type() {
                    lines.push(format!(
                        "  {:<12}{:>14} {:>5.1}%",
                        share.saving_type.as_str(),
                        share.amount.to_string(),
                        share.percent
                    ));
                }
                lines.join("\n")
            })?;
        }
        Command::History(args) => {
            let filter = TransactionFilter {
                search: args.search,
                kind: args.kind,
                from: args.from,
                to: args.to,
            };
            let mut rows = session.history(&filter);
            if let Some(limit) = args.limit {
                rows.truncate(limit);
            }
            emit(json, &rows, || {
                rows.iter()
                    .map(|tx| {
                        let sign = if tx.kind.is_inflow() { '+' } else { '-' };
                        format!(
                            "{}  {:<8} {sign}{:>12}  {}",
                            tx.date,
                            tx.kind.as_str(),
                            tx.amount.to_string(),
                            tx.title
                        )
                    })
                    .collect::<Vec<_>>()
                    .join("\n")
            })?;
        }
    }

    Ok(())
}

async fn decide(session: &mut Session, id: Uuid, approved: bool, json: bool) -> AppResult<()> {
    let resolution = session.validate_item(id, approved, Utc::now()).await?;
    emit(json, &resolution, || {
        let verb = if approved { "approved" } else { "rejected" };
        let mut line = match resolution.transaction_id {
            Some(tx) => format!("{verb} {id}, posted {tx}"),
            None => format!("{verb} {id}"),
        };
        if resolution.related_missing {
            line.push_str(" (its record no longer exists)");
        }
        line
    })
}

/// Prints `value` as pretty JSON or as the text `render` produces.
fn emit<T: Serialize + ?Sized>(
    json: bool,
    value: &T,
    render: impl FnOnce() -> String,
) -> AppResult<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(value)?);
    } else {
        let text = render();
        if !text.is_empty() {
            println!("{text}");
        }
    }
    Ok(())
}

async fn parse_database(config: &Database) -> AppResult<sea_orm::DatabaseConnection> {
    let url = match config {
        Database::Memory => String::from("sqlite::memory:"),
        Database::Sqlite(path) => format!("sqlite:{path}?mode=rwc"),
    };

    tracing::debug!("connecting to {url}");
    let database = sea_orm::Database::connect(url).await?;
    Migrator::up(&database, None).await?;
    Ok(database)
}
