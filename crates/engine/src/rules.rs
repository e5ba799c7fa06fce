//! Mutation rules.
//!
//! Everything here is pure: a submission or a decision goes in, the records to
//! write come out. [`Session`](crate::Session) performs the writes in the
//! order given and stops at the first failure.

use chrono::{DateTime, Days, Months, NaiveDate, NaiveTime, Utc};
use uuid::Uuid;

use crate::{
    EngineError, Expense, ExpenseCmd, ExpenseKind, Frequency, Money, ResultEngine, Saving,
    SavingCmd, SplitStatus, Transaction, TransactionKind, ValidationItem, ValidationKind,
    util::{normalize_optional_text, normalize_required_text, require_positive},
};

/// How long a counterparty has to answer a split.
pub const SPLIT_WINDOW_DAYS: u64 = 7;

/// How an expense submission is routed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ExpenseRoute {
    /// Shared with another user: half posts now, half waits for them.
    Split,
    /// Dated after the submission day: waits for confirmation.
    Scheduled,
    /// Posts now.
    Immediate,
}

/// Split wins over scheduling; a future date only matters for unsplit
/// expenses.
pub fn expense_route(cmd: &ExpenseCmd) -> ExpenseRoute {
    if cmd.split_target().is_some() {
        ExpenseRoute::Split
    } else if cmd.date > cmd.submitted_at.date_naive() {
        ExpenseRoute::Scheduled
    } else {
        ExpenseRoute::Immediate
    }
}

/// `(submitter share, counterparty share)`; odd paise stay with the
/// submitter.
pub fn split_shares(amount: Money) -> (Money, Money) {
    let counterparty = amount.half();
    (amount - counterparty, counterparty)
}

/// Expiry of a `saving` gate: a week for weekly contributions, a month for
/// monthly ones, a day otherwise.
pub fn saving_gate_expiry(
    frequency: Frequency,
    submitted_at: DateTime<Utc>,
) -> ResultEngine<DateTime<Utc>> {
    let expiry = match frequency {
        Frequency::Weekly => submitted_at.checked_add_days(Days::new(7)),
        Frequency::Monthly => submitted_at.checked_add_months(Months::new(1)),
        _ => submitted_at.checked_add_days(Days::new(1)),
    };
    expiry.ok_or_else(out_of_range)
}

/// The expected return for a saving, if one should be scheduled.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ReturnSchedule {
    pub amount: Money,
    pub date: NaiveDate,
    pub expires_at: DateTime<Utc>,
}

/// One return period after `date`, worth `rate` percent of `amount`.
///
/// Nothing is scheduled without a positive rate, without a frequency, for a
/// one-off frequency, or when the percentage rounds to zero paise.
pub fn return_schedule(
    amount: Money,
    date: NaiveDate,
    rate: Option<f64>,
    frequency: Option<Frequency>,
) -> ResultEngine<Option<ReturnSchedule>> {
    let (Some(rate), Some(frequency)) = (rate, frequency) else {
        return Ok(None);
    };
    if rate <= 0.0 || !frequency.is_periodic() {
        return Ok(None);
    }
    let return_amount = amount.percent(rate);
    if !return_amount.is_positive() {
        return Ok(None);
    }
    require_positive(return_amount, "return")?;
    let return_date = frequency.next_date(date).ok_or_else(out_of_range)?;
    let expires_at = start_of_day(return_date)
        .checked_add_days(Days::new(1))
        .ok_or_else(out_of_range)?;
    Ok(Some(ReturnSchedule {
        amount: return_amount,
        date: return_date,
        expires_at,
    }))
}

fn start_of_day(date: NaiveDate) -> DateTime<Utc> {
    date.and_time(NaiveTime::MIN).and_utc()
}

fn out_of_range() -> EngineError {
    EngineError::InvalidInput("date out of range".to_string())
}

/// Records to write for one expense submission, in order: the expense, its
/// transaction (if it posts now), then its gate (if it waits).
#[derive(Clone, Debug)]
pub(crate) struct ExpensePlan {
    pub(crate) route: ExpenseRoute,
    pub(crate) expense: Expense,
    pub(crate) transaction: Option<Transaction>,
    pub(crate) gate: Option<ValidationItem>,
}

/// Builds the plan for `cmd` submitted by `user_id`.
///
/// `counterparty` must be the resolved user id when the route is a split.
pub(crate) fn plan_expense(
    cmd: &ExpenseCmd,
    user_id: &str,
    counterparty: Option<&str>,
) -> ResultEngine<ExpensePlan> {
    require_positive(cmd.amount, "amount")?;
    let title = normalize_required_text(&cmd.title, "title")?;
    let description = normalize_optional_text(cmd.description.as_deref());
    let frequency = match cmd.kind {
        ExpenseKind::Recurring => Some(cmd.frequency.ok_or_else(|| {
            EngineError::InvalidInput("recurring expenses need a frequency".to_string())
        })?),
        ExpenseKind::OneTime => None,
    };

    let route = expense_route(cmd);
    let mut expense = Expense {
        id: Uuid::new_v4(),
        user_id: user_id.to_string(),
        title: title.clone(),
        amount: cmd.amount,
        date: cmd.date,
        category: cmd.category,
        kind: cmd.kind,
        frequency,
        description: description.clone(),
        is_split: false,
        split_with: None,
        split_status: None,
        is_validated: false,
    };

    let plan = match route {
        ExpenseRoute::Split => {
            let counterparty = counterparty.ok_or_else(|| {
                EngineError::InvalidInput("split target was not resolved".to_string())
            })?;
            if counterparty == user_id {
                return Err(EngineError::InvalidInput(
                    "cannot split an expense with yourself".to_string(),
                ));
            }
            let (mine, theirs) = split_shares(cmd.amount);
            if !theirs.is_positive() {
                return Err(EngineError::InvalidAmount(
                    "amount too small to split".to_string(),
                ));
            }
            expense.amount = mine;
            expense.is_split = true;
            expense.split_with = Some(counterparty.to_string());
            expense.split_status = Some(SplitStatus::Pending);
            expense.is_validated = true;

            let transaction = expense_transaction(&expense, expense.date, cmd.submitted_at)?;
            let expires_at = cmd
                .submitted_at
                .checked_add_days(Days::new(SPLIT_WINDOW_DAYS))
                .ok_or_else(out_of_range)?;
            let gate = ValidationItem {
                id: Uuid::new_v4(),
                user_id: counterparty.to_string(),
                title: format!("Split expense: {title}"),
                amount: theirs,
                kind: ValidationKind::ExpenseSplit,
                date: cmd.date,
                expires_at,
                description,
                related_id: expense.id,
                initiated_by: Some(user_id.to_string()),
            };
            ExpensePlan {
                route,
                expense,
                transaction: Some(transaction),
                gate: Some(gate),
            }
        }
        ExpenseRoute::Scheduled => {
            let gate = ValidationItem {
                id: Uuid::new_v4(),
                user_id: user_id.to_string(),
                title: format!("Scheduled expense: {title}"),
                amount: cmd.amount,
                kind: ValidationKind::FutureExpense,
                date: cmd.date,
                expires_at: start_of_day(cmd.date),
                description,
                related_id: expense.id,
                initiated_by: None,
            };
            ExpensePlan {
                route,
                expense,
                transaction: None,
                gate: Some(gate),
            }
        }
        ExpenseRoute::Immediate => {
            expense.is_validated = true;
            let transaction = expense_transaction(&expense, expense.date, cmd.submitted_at)?;
            ExpensePlan {
                route,
                expense,
                transaction: Some(transaction),
                gate: None,
            }
        }
    };
    Ok(plan)
}

/// Records to write for one saving submission: the saving, then its gates.
#[derive(Clone, Debug)]
pub(crate) struct SavingPlan {
    pub(crate) saving: Saving,
    pub(crate) gates: Vec<ValidationItem>,
}

pub(crate) fn plan_saving(cmd: &SavingCmd, user_id: &str) -> ResultEngine<SavingPlan> {
    require_positive(cmd.amount, "amount")?;
    let title = normalize_required_text(&cmd.title, "title")?;
    let description = normalize_optional_text(cmd.description.as_deref());
    if let Some(rate) = cmd.return_rate
        && (!rate.is_finite() || rate < 0.0)
    {
        return Err(EngineError::InvalidAmount(
            "return rate must be >= 0".to_string(),
        ));
    }

    let saving = Saving {
        id: Uuid::new_v4(),
        user_id: user_id.to_string(),
        title: title.clone(),
        amount: cmd.amount,
        date: cmd.date,
        saving_type: cmd.saving_type,
        frequency: cmd.frequency,
        return_rate: cmd.return_rate,
        return_frequency: cmd.return_frequency,
        description: description.clone(),
        is_validated: false,
    };

    let mut gates = vec![ValidationItem {
        id: Uuid::new_v4(),
        user_id: user_id.to_string(),
        title: format!("Validate saving: {title}"),
        amount: cmd.amount,
        kind: ValidationKind::Saving,
        date: cmd.date,
        expires_at: saving_gate_expiry(cmd.frequency, cmd.submitted_at)?,
        description: description.clone(),
        related_id: saving.id,
        initiated_by: None,
    }];

    if let Some(schedule) =
        return_schedule(cmd.amount, cmd.date, cmd.return_rate, cmd.return_frequency)?
    {
        gates.push(ValidationItem {
            id: Uuid::new_v4(),
            user_id: user_id.to_string(),
            title: format!("Return on {title}"),
            amount: schedule.amount,
            kind: ValidationKind::SavingReturn,
            date: schedule.date,
            expires_at: schedule.expires_at,
            description,
            related_id: saving.id,
            initiated_by: None,
        });
    }

    Ok(SavingPlan { saving, gates })
}

/// The record a gate points at, as found when the decision is made.
#[derive(Clone, Debug)]
pub(crate) enum Related {
    Expense(Expense),
    Saving(Saving),
    Missing,
}

/// One write produced by a decision.
#[derive(Clone, Debug)]
pub(crate) enum Effect {
    UpdateExpense(Expense),
    InsertExpense(Expense),
    DeleteExpense { user_id: String, id: Uuid },
    UpdateSaving(Saving),
    InsertTransaction(Transaction),
}

/// Writes that resolve `item` once `approver` approved or rejected it.
pub(crate) fn decide(
    item: &ValidationItem,
    approved: bool,
    related: Related,
    approver: &str,
    decided_at: DateTime<Utc>,
) -> ResultEngine<Vec<Effect>> {
    let today = decided_at.date_naive();
    let effects = match (item.kind, related) {
        (ValidationKind::ExpenseSplit, Related::Expense(mut original)) => {
            let status = if approved {
                SplitStatus::Approved
            } else {
                SplitStatus::Rejected
            };
            original.split_status = Some(status);
            let mut effects = vec![Effect::UpdateExpense(original.clone())];
            if approved {
                let share = Expense {
                    id: Uuid::new_v4(),
                    user_id: approver.to_string(),
                    title: format!("Split: {}", original.title),
                    amount: item.amount,
                    date: today,
                    category: original.category,
                    kind: ExpenseKind::OneTime,
                    frequency: None,
                    description: Some(format!("Split payment for {}", original.title)),
                    is_split: true,
                    split_with: Some(original.user_id.clone()),
                    split_status: Some(SplitStatus::Approved),
                    is_validated: true,
                };
                let tx = expense_transaction(&share, today, decided_at)?;
                effects.push(Effect::InsertExpense(share));
                effects.push(Effect::InsertTransaction(tx));
            }
            effects
        }
        (ValidationKind::FutureExpense, Related::Expense(mut expense)) => {
            if approved {
                expense.is_validated = true;
                let tx = expense_transaction(&expense, today, decided_at)?;
                vec![Effect::UpdateExpense(expense), Effect::InsertTransaction(tx)]
            } else {
                vec![Effect::DeleteExpense {
                    user_id: expense.user_id,
                    id: expense.id,
                }]
            }
        }
        (ValidationKind::Saving, Related::Saving(mut saving)) => {
            if approved {
                saving.is_validated = true;
                let tx = Transaction::new(
                    saving.user_id.clone(),
                    TransactionKind::Saving,
                    saving.title.clone(),
                    saving.amount,
                    today,
                    decided_at,
                )?
                .category(Some(saving.saving_type.as_str()))
                .description(saving.description.clone())
                .related_to(saving.id);
                vec![Effect::UpdateSaving(saving), Effect::InsertTransaction(tx)]
            } else {
                Vec::new()
            }
        }
        (ValidationKind::SavingReturn, Related::Saving(saving)) => {
            if approved {
                let tx = Transaction::new(
                    saving.user_id.clone(),
                    TransactionKind::Return,
                    format!("Return on {}", saving.title),
                    item.amount,
                    today,
                    decided_at,
                )?
                .category(Some(saving.saving_type.as_str()))
                .description(item.description.clone())
                .related_to(saving.id);
                vec![Effect::InsertTransaction(tx)]
            } else {
                Vec::new()
            }
        }
        (_, Related::Missing) => Vec::new(),
        (kind, _) => {
            return Err(EngineError::InvalidRow(format!(
                "validation {} ({}) points at the wrong kind of record",
                item.id,
                kind.as_str()
            )));
        }
    };
    Ok(effects)
}

fn expense_transaction(
    expense: &Expense,
    date: NaiveDate,
    recorded_at: DateTime<Utc>,
) -> ResultEngine<Transaction> {
    Ok(Transaction::new(
        expense.user_id.clone(),
        TransactionKind::Expense,
        expense.title.clone(),
        expense.amount,
        date,
        recorded_at,
    )?
    .category(Some(expense.category.as_str()))
    .description(expense.description.clone())
    .related_to(expense.id))
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;
    use crate::{ExpenseCategory, SavingType};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 10, 17, 9, 30, 0).unwrap()
    }

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn today_expense_posts_immediately() {
        let cmd = ExpenseCmd::new("Lunch", Money::rupees(500), day(2026, 10, 17), now())
            .category(ExpenseCategory::Food);
        let plan = plan_expense(&cmd, "asha", None).unwrap();

        assert_eq!(plan.route, ExpenseRoute::Immediate);
        assert!(plan.expense.is_validated);
        assert!(plan.gate.is_none());
        let tx = plan.transaction.unwrap();
        assert_eq!(tx.kind, TransactionKind::Expense);
        assert_eq!(tx.amount, Money::rupees(500));
        assert_eq!(tx.related_id, Some(plan.expense.id));
        assert_eq!(tx.category.as_deref(), Some("food"));
    }

    #[test]
    fn future_expense_is_gated_until_its_date() {
        let cmd = ExpenseCmd::new("Flight", Money::rupees(8000), day(2026, 10, 27), now());
        let plan = plan_expense(&cmd, "asha", None).unwrap();

        assert_eq!(plan.route, ExpenseRoute::Scheduled);
        assert!(!plan.expense.is_validated);
        assert!(plan.transaction.is_none());
        let gate = plan.gate.unwrap();
        assert_eq!(gate.kind, ValidationKind::FutureExpense);
        assert_eq!(gate.amount, Money::rupees(8000));
        assert_eq!(gate.user_id, "asha");
        assert_eq!(gate.expires_at, Utc.with_ymd_and_hms(2026, 10, 27, 0, 0, 0).unwrap());
    }

    #[test]
    fn split_goes_half_and_half() {
        let cmd = ExpenseCmd::new("Dinner", Money::rupees(1000), day(2026, 10, 17), now())
            .split_with("ravi");
        let plan = plan_expense(&cmd, "asha", Some("ravi")).unwrap();

        assert_eq!(plan.route, ExpenseRoute::Split);
        assert_eq!(plan.expense.amount, Money::rupees(500));
        assert_eq!(plan.expense.split_status, Some(SplitStatus::Pending));
        assert!(plan.expense.is_validated);
        assert_eq!(plan.transaction.unwrap().amount, Money::rupees(500));

        let gate = plan.gate.unwrap();
        assert_eq!(gate.user_id, "ravi");
        assert_eq!(gate.initiated_by.as_deref(), Some("asha"));
        assert_eq!(gate.amount, Money::rupees(500));
        assert_eq!(gate.expires_at, now() + chrono::Duration::days(7));
    }

    #[test]
    fn split_takes_precedence_over_future_date() {
        let cmd = ExpenseCmd::new("Trip", Money::rupees(1000), day(2026, 12, 1), now())
            .split_with("ravi");
        assert_eq!(expense_route(&cmd), ExpenseRoute::Split);
    }

    #[test]
    fn odd_paise_stay_with_the_submitter() {
        assert_eq!(split_shares(Money::new(1001)), (Money::new(501), Money::new(500)));
    }

    #[test]
    fn blank_split_target_is_not_a_split() {
        let cmd = ExpenseCmd::new("Chai", Money::rupees(40), day(2026, 10, 17), now())
            .split_with("   ");
        assert_eq!(cmd.split_target(), None);
        assert_eq!(expense_route(&cmd), ExpenseRoute::Immediate);
        let plan = plan_expense(&cmd, "asha", None).unwrap();
        assert!(!plan.expense.is_split);
        assert_eq!(plan.expense.amount, Money::rupees(40));
    }

    #[test]
    fn split_with_self_is_rejected() {
        let cmd = ExpenseCmd::new("Dinner", Money::rupees(10), day(2026, 10, 17), now())
            .split_with("asha");
        assert_eq!(
            plan_expense(&cmd, "asha", Some("asha")).unwrap_err(),
            EngineError::InvalidInput("cannot split an expense with yourself".to_string())
        );
    }

    #[test]
    fn rejects_bad_amounts_and_titles() {
        let cmd = ExpenseCmd::new("Dinner", Money::ZERO, day(2026, 10, 17), now());
        assert_eq!(
            plan_expense(&cmd, "asha", None).unwrap_err(),
            EngineError::InvalidAmount("amount must be > 0".to_string())
        );
        let cmd = ExpenseCmd::new("  ", Money::rupees(1), day(2026, 10, 17), now());
        assert!(matches!(
            plan_expense(&cmd, "asha", None),
            Err(EngineError::InvalidInput(_))
        ));
    }

    #[test]
    fn recurring_expense_requires_frequency() {
        let mut cmd = ExpenseCmd::new("Rent", Money::rupees(15000), day(2026, 10, 1), now())
            .recurring(Frequency::Monthly);
        let plan = plan_expense(&cmd, "asha", None).unwrap();
        assert_eq!(plan.expense.frequency, Some(Frequency::Monthly));

        cmd.frequency = None;
        assert!(plan_expense(&cmd, "asha", None).is_err());
    }

    #[test]
    fn saving_gate_expiry_follows_frequency() {
        assert_eq!(
            saving_gate_expiry(Frequency::Daily, now()).unwrap(),
            now() + chrono::Duration::days(1)
        );
        assert_eq!(
            saving_gate_expiry(Frequency::Weekly, now()).unwrap(),
            now() + chrono::Duration::days(7)
        );
        assert_eq!(
            saving_gate_expiry(Frequency::Monthly, now()).unwrap(),
            Utc.with_ymd_and_hms(2026, 11, 17, 9, 30, 0).unwrap()
        );
        assert_eq!(
            saving_gate_expiry(Frequency::Yearly, now()).unwrap(),
            now() + chrono::Duration::days(1)
        );
    }

    #[test]
    fn saving_with_returns_gets_two_gates() {
        let cmd = SavingCmd::new(
            "Index fund",
            Money::rupees(2000),
            day(2026, 10, 17),
            SavingType::Sip,
            Frequency::Monthly,
            now(),
        )
        .returns(5.0, Frequency::Monthly);
        let plan = plan_saving(&cmd, "asha").unwrap();

        assert!(!plan.saving.is_validated);
        assert_eq!(plan.gates.len(), 2);
        assert_eq!(plan.gates[0].kind, ValidationKind::Saving);
        assert_eq!(plan.gates[0].amount, Money::rupees(2000));

        let ret = &plan.gates[1];
        assert_eq!(ret.kind, ValidationKind::SavingReturn);
        assert_eq!(ret.amount, Money::rupees(100));
        assert_eq!(ret.date, day(2026, 11, 17));
        assert_eq!(ret.expires_at, Utc.with_ymd_and_hms(2026, 11, 18, 0, 0, 0).unwrap());
        assert_eq!(ret.related_id, plan.saving.id);
    }

    #[test]
    fn no_return_gate_without_rate_or_period() {
        let base = SavingCmd::new(
            "Gullak",
            Money::rupees(100),
            day(2026, 10, 17),
            SavingType::Gullak,
            Frequency::Daily,
            now(),
        );
        assert_eq!(plan_saving(&base, "asha").unwrap().gates.len(), 1);
        let zero = base.clone().returns(0.0, Frequency::Monthly);
        assert_eq!(plan_saving(&zero, "asha").unwrap().gates.len(), 1);
        let once = base.clone().returns(4.0, Frequency::Once);
        assert_eq!(plan_saving(&once, "asha").unwrap().gates.len(), 1);
        let negative = base.returns(-1.0, Frequency::Monthly);
        assert!(matches!(
            plan_saving(&negative, "asha"),
            Err(EngineError::InvalidAmount(_))
        ));
    }

    #[test]
    fn oversized_return_is_rejected() {
        let cmd = SavingCmd::new(
            "Moonshot",
            Money::MAX_INPUT,
            day(2026, 10, 17),
            SavingType::Other,
            Frequency::Monthly,
            now(),
        )
        .returns(1e6, Frequency::Monthly);
        assert!(matches!(
            plan_saving(&cmd, "asha"),
            Err(EngineError::InvalidAmount(_))
        ));
    }

    #[test]
    fn quarterly_return_lands_three_months_later() {
        let schedule = return_schedule(
            Money::rupees(10_000),
            day(2026, 1, 15),
            Some(7.5),
            Some(Frequency::Quarterly),
        )
        .unwrap()
        .unwrap();
        assert_eq!(schedule.amount, Money::rupees(750));
        assert_eq!(schedule.date, day(2026, 4, 15));
    }

    #[test]
    fn rejected_future_expense_is_deleted() {
        let cmd = ExpenseCmd::new("Flight", Money::rupees(8000), day(2026, 10, 27), now());
        let plan = plan_expense(&cmd, "asha", None).unwrap();
        let gate = plan.gate.clone().unwrap();

        let effects = decide(
            &gate,
            false,
            Related::Expense(plan.expense.clone()),
            "asha",
            now(),
        )
        .unwrap();
        assert!(matches!(
            effects.as_slice(),
            [Effect::DeleteExpense { id, .. }] if *id == plan.expense.id
        ));
    }

    #[test]
    fn approved_split_creates_the_approvers_share() {
        let cmd = ExpenseCmd::new("Dinner", Money::rupees(1000), day(2026, 10, 17), now())
            .category(ExpenseCategory::Food)
            .split_with("ravi");
        let plan = plan_expense(&cmd, "asha", Some("ravi")).unwrap();
        let gate = plan.gate.clone().unwrap();

        let effects = decide(&gate, true, Related::Expense(plan.expense), "ravi", now()).unwrap();
        let [
            Effect::UpdateExpense(original),
            Effect::InsertExpense(share),
            Effect::InsertTransaction(tx),
        ] = effects.as_slice()
        else {
            panic!("unexpected effects: {effects:?}");
        };
        assert_eq!(original.split_status, Some(SplitStatus::Approved));
        assert_eq!(share.user_id, "ravi");
        assert_eq!(share.amount, Money::rupees(500));
        assert_eq!(share.category, ExpenseCategory::Food);
        assert!(share.is_validated);
        assert_eq!(tx.user_id, "ravi");
        assert_eq!(tx.related_id, Some(share.id));
    }

    #[test]
    fn missing_related_record_has_no_effect() {
        let cmd = ExpenseCmd::new("Flight", Money::rupees(8000), day(2026, 10, 27), now());
        let gate = plan_expense(&cmd, "asha", None).unwrap().gate.unwrap();
        assert!(
            decide(&gate, true, Related::Missing, "asha", now())
                .unwrap()
                .is_empty()
        );
    }
}
