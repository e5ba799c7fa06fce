use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use engine::{ExpenseCategory, Frequency, Money, SavingType, TransactionKind};
use uuid::Uuid;

#[derive(Parser, Debug)]
#[command(name = "pocketbook")]
#[command(about = "Track expenses, savings and extra income against a monthly salary")]
pub struct Cli {
    /// Settings file (TOML, extension optional).
    #[arg(long)]
    pub config: Option<String>,
    /// Run as this user; overrides `user` from settings.
    #[arg(long, short)]
    pub user: Option<String>,
    /// SQLite file to use; `:memory:` for a throwaway database.
    #[arg(long)]
    pub database: Option<String>,
    /// Print results as JSON.
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Show or edit the profile.
    Profile {
        #[command(subcommand)]
        command: ProfileCommand,
    },
    /// Record or delete expenses.
    Expense {
        #[command(subcommand)]
        command: ExpenseCommand,
    },
    /// Record or delete savings.
    Saving {
        #[command(subcommand)]
        command: SavingCommand,
    },
    /// Record extra income.
    Income(IncomeArgs),
    /// List gates waiting for a decision.
    Pending,
    /// Approve a pending gate.
    Approve { id: Uuid },
    /// Reject a pending gate.
    Reject { id: Uuid },
    /// Salary, totals and remaining balance.
    Summary,
    /// Posted transactions, newest first.
    History(HistoryArgs),
}

#[derive(Subcommand, Debug)]
pub enum ProfileCommand {
    Show,
    Set(ProfileArgs),
}

#[derive(Args, Debug)]
pub struct ProfileArgs {
    #[arg(long)]
    pub name: String,
    #[arg(long)]
    pub email: String,
    #[arg(long)]
    pub phone: String,
    /// Monthly salary in rupees, e.g. `50000` or `50000.50`.
    #[arg(long, value_parser = parse_money)]
    pub salary: Money,
}

#[derive(Subcommand, Debug)]
pub enum ExpenseCommand {
    Add(ExpenseArgs),
    Delete { id: Uuid },
}

#[derive(Args, Debug)]
pub struct ExpenseArgs {
    pub title: String,
    #[arg(value_parser = parse_money)]
    pub amount: Money,
    /// Defaults to today; a later date schedules the expense.
    #[arg(long)]
    pub date: Option<NaiveDate>,
    #[arg(long, value_parser = parse_category, default_value = "other")]
    pub category: ExpenseCategory,
    /// Mark as recurring with this frequency.
    #[arg(long, value_parser = parse_frequency)]
    pub recurring: Option<Frequency>,
    #[arg(long)]
    pub description: Option<String>,
    /// Username to split the expense with.
    #[arg(long)]
    pub split_with: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum SavingCommand {
    Add(SavingArgs),
    Delete { id: Uuid },
}

#[derive(Args, Debug)]
pub struct SavingArgs {
    pub title: String,
    #[arg(value_parser = parse_money)]
    pub amount: Money,
    #[arg(long = "type", value_parser = parse_saving_type, default_value = "other")]
    pub saving_type: SavingType,
    #[arg(long, value_parser = parse_frequency, default_value = "monthly")]
    pub frequency: Frequency,
    #[arg(long)]
    pub date: Option<NaiveDate>,
    /// Expected return in percent per return period.
    #[arg(long, requires = "return_frequency")]
    pub rate: Option<f64>,
    #[arg(long, value_parser = parse_frequency, requires = "rate")]
    pub return_frequency: Option<Frequency>,
    #[arg(long)]
    pub description: Option<String>,
}

#[derive(Args, Debug)]
pub struct IncomeArgs {
    pub title: String,
    #[arg(value_parser = parse_money)]
    pub amount: Money,
    #[arg(long)]
    pub description: Option<String>,
}

#[derive(Args, Debug)]
pub struct HistoryArgs {
    /// Match title or description.
    #[arg(long)]
    pub search: Option<String>,
    #[arg(long, value_parser = parse_kind)]
    pub kind: Option<TransactionKind>,
    #[arg(long)]
    pub from: Option<NaiveDate>,
    #[arg(long)]
    pub to: Option<NaiveDate>,
    #[arg(long)]
    pub limit: Option<usize>,
}

fn parse_money(raw: &str) -> Result<Money, String> {
    raw.parse().map_err(|err: engine::EngineError| err.to_string())
}

fn parse_category(raw: &str) -> Result<ExpenseCategory, String> {
    ExpenseCategory::try_from(raw).map_err(|err| err.to_string())
}

fn parse_frequency(raw: &str) -> Result<Frequency, String> {
    Frequency::try_from(raw).map_err(|err| err.to_string())
}

fn parse_saving_type(raw: &str) -> Result<SavingType, String> {
    SavingType::try_from(raw).map_err(|err| err.to_string())
}

fn parse_kind(raw: &str) -> Result<TransactionKind, String> {
    TransactionKind::try_from(raw).map_err(|err| err.to_string())
}
