//! Figures derived from a [`Ledger`]. Nothing here is stored.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::Serialize;

use crate::{
    ExpenseCategory, Ledger, Money, SavingType, Transaction, TransactionKind, util::search_key,
};

/// Validated savings only.
pub fn total_saved(ledger: &Ledger) -> Money {
    ledger
        .savings()
        .iter()
        .filter(|s| s.is_validated)
        .map(|s| s.amount)
        .sum()
}

/// Validated expenses only.
pub fn total_expenses(ledger: &Ledger) -> Money {
    ledger
        .expenses()
        .iter()
        .filter(|e| e.is_validated)
        .map(|e| e.amount)
        .sum()
}

/// Income and saving returns.
pub fn extra_income(ledger: &Ledger) -> Money {
    ledger
        .transactions()
        .iter()
        .filter(|t| t.kind.is_inflow())
        .map(|t| t.amount)
        .sum()
}

/// `salary + extra income - expenses - saved`; may go negative.
pub fn remaining_balance(ledger: &Ledger, monthly_salary: Money) -> Money {
    monthly_salary + extra_income(ledger) - total_expenses(ledger) - total_saved(ledger)
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct Summary {
    pub monthly_salary: Money,
    pub total_saved: Money,
    pub total_expenses: Money,
    pub extra_income: Money,
    pub remaining_balance: Money,
    pub pending_validations: usize,
}

pub fn summarize(ledger: &Ledger, monthly_salary: Money) -> Summary {
    Summary {
        monthly_salary,
        total_saved: total_saved(ledger),
        total_expenses: total_expenses(ledger),
        extra_income: extra_income(ledger),
        remaining_balance: remaining_balance(ledger, monthly_salary),
        pending_validations: ledger.validations().len(),
    }
}

pub fn expenses_by_category(ledger: &Ledger) -> BTreeMap<ExpenseCategory, Money> {
    let mut totals = BTreeMap::new();
    for expense in ledger.expenses().iter().filter(|e| e.is_validated) {
        *totals.entry(expense.category).or_insert(Money::ZERO) += expense.amount;
    }
    totals
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct TypeShare {
    pub saving_type: SavingType,
    pub amount: Money,
    /// Share of the validated total, 0..=100.
    pub percent: f64,
}

/// Validated savings per type, largest first.
pub fn savings_by_type(ledger: &Ledger) -> Vec<TypeShare> {
    let mut totals: BTreeMap<SavingType, Money> = BTreeMap::new();
    for saving in ledger.savings().iter().filter(|s| s.is_validated) {
        *totals.entry(saving.saving_type).or_insert(Money::ZERO) += saving.amount;
    }
    let grand: i64 = totals.values().map(|m| m.paise()).sum();

    let mut shares: Vec<TypeShare> = totals
        .into_iter()
        .map(|(saving_type, amount)| TypeShare {
            saving_type,
            amount,
            percent: if grand == 0 {
                0.0
            } else {
                amount.paise() as f64 * 100.0 / grand as f64
            },
        })
        .collect();
    shares.sort_by(|a, b| b.amount.cmp(&a.amount));
    shares
}

/// Filter for [`history`]. Every field is optional; an empty filter matches
/// everything.
#[derive(Clone, Debug, Default)]
pub struct TransactionFilter {
    /// Case and accent insensitive match on title or description.
    pub search: Option<String>,
    pub kind: Option<TransactionKind>,
    /// Inclusive.
    pub from: Option<NaiveDate>,
    /// Inclusive.
    pub to: Option<NaiveDate>,
}

impl TransactionFilter {
    fn matches(&self, tx: &Transaction, needle: Option<&str>) -> bool {
        if self.kind.is_some_and(|kind| kind != tx.kind) {
            return false;
        }
        if self.from.is_some_and(|from| tx.date < from) || self.to.is_some_and(|to| tx.date > to)
        {
            return false;
        }
        match needle {
            Some(needle) => {
                search_key(&tx.title).contains(needle)
                    || tx
                        .description
                        .as_deref()
                        .is_some_and(|d| search_key(d).contains(needle))
            }
            None => true,
        }
    }
}

/// Transactions matching `filter`, newest first.
pub fn history<'a>(ledger: &'a Ledger, filter: &TransactionFilter) -> Vec<&'a Transaction> {
    let needle = filter
        .search
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(search_key);

    let mut rows: Vec<&Transaction> = ledger
        .transactions()
        .iter()
        .filter(|tx| filter.matches(tx, needle.as_deref()))
        .collect();
    rows.sort_by(|a, b| {
        b.date
            .cmp(&a.date)
            .then_with(|| b.recorded_at.cmp(&a.recorded_at))
    });
    rows
}

/// The `n` newest transactions.
pub fn recent_transactions(ledger: &Ledger, n: usize) -> Vec<&Transaction> {
    let mut rows = history(ledger, &TransactionFilter::default());
    rows.truncate(n);
    rows
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};
    use uuid::Uuid;

    use super::*;
    use crate::{Expense, ExpenseKind, Frequency, Saving};

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, d).unwrap()
    }

    fn expense(amount: i64, category: ExpenseCategory, validated: bool) -> Expense {
        Expense {
            id: Uuid::new_v4(),
            user_id: "asha".to_string(),
            title: "x".to_string(),
            amount: Money::rupees(amount),
            date: day(1),
            category,
            kind: ExpenseKind::OneTime,
            frequency: None,
            description: None,
            is_split: false,
            split_with: None,
            split_status: None,
            is_validated: validated,
        }
    }

    fn saving(amount: i64, saving_type: SavingType, validated: bool) -> Saving {
        Saving {
            id: Uuid::new_v4(),
            user_id: "asha".to_string(),
            title: "s".to_string(),
            amount: Money::rupees(amount),
            date: day(1),
            saving_type,
            frequency: Frequency::Monthly,
            return_rate: None,
            return_frequency: None,
            description: None,
            is_validated: validated,
        }
    }

    fn tx(kind: TransactionKind, title: &str, amount: i64, d: u32, second: u32) -> Transaction {
        Transaction::new(
            "asha",
            kind,
            title,
            Money::rupees(amount),
            day(d),
            Utc.with_ymd_and_hms(2026, 10, d, 12, 0, second).unwrap(),
        )
        .unwrap()
    }

    fn sample() -> Ledger {
        let mut ledger = Ledger::new("asha");
        ledger.push_expense(expense(500, ExpenseCategory::Food, true));
        ledger.push_expense(expense(15000, ExpenseCategory::Rent, true));
        ledger.push_expense(expense(8000, ExpenseCategory::Travel, false));
        ledger.push_saving(saving(3000, SavingType::Sip, true));
        ledger.push_saving(saving(1000, SavingType::Gullak, true));
        ledger.push_saving(saving(700, SavingType::Gullak, false));
        ledger.push_transaction(tx(TransactionKind::Income, "Freelance gig", 2000, 3, 0));
        ledger.push_transaction(tx(TransactionKind::Return, "Return on FD", 100, 4, 0));
        ledger.push_transaction(tx(TransactionKind::Expense, "Café latte", 500, 4, 5));
        ledger
    }

    #[test]
    fn totals_count_validated_records_only() {
        let ledger = sample();
        assert_eq!(total_expenses(&ledger), Money::rupees(15500));
        assert_eq!(total_saved(&ledger), Money::rupees(4000));
        assert_eq!(extra_income(&ledger), Money::rupees(2100));
        assert_eq!(
            remaining_balance(&ledger, Money::rupees(50000)),
            Money::rupees(50000 + 2100 - 15500 - 4000)
        );
    }

    #[test]
    fn huge_totals_saturate() {
        let mut ledger = Ledger::new("asha");
        for _ in 0..2 {
            let mut e = expense(0, ExpenseCategory::Other, true);
            e.amount = Money::new(i64::MAX);
            ledger.push_expense(e);
        }
        let summary = summarize(&ledger, Money::rupees(50000));
        assert_eq!(summary.total_expenses, Money::new(i64::MAX));
        assert_eq!(
            summary.remaining_balance,
            Money::rupees(50000) - Money::new(i64::MAX)
        );
        assert!(summary.remaining_balance.paise() < 0);
    }

    #[test]
    fn empty_ledger_without_salary_is_zero() {
        let summary = summarize(&Ledger::new("asha"), Money::ZERO);
        assert_eq!(summary.remaining_balance, Money::ZERO);
        assert_eq!(summary.pending_validations, 0);
    }

    #[test]
    fn balance_can_go_negative() {
        let ledger = sample();
        assert!(remaining_balance(&ledger, Money::ZERO) < Money::ZERO);
    }

    #[test]
    fn groups_expenses_and_savings() {
        let ledger = sample();
        let by_category = expenses_by_category(&ledger);
        assert_eq!(by_category.get(&ExpenseCategory::Rent), Some(&Money::rupees(15000)));
        assert!(!by_category.contains_key(&ExpenseCategory::Travel));

        let shares = savings_by_type(&ledger);
        assert_eq!(shares.len(), 2);
        assert_eq!(shares[0].saving_type, SavingType::Sip);
        assert!((shares[0].percent - 75.0).abs() < 1e-9);
        assert!((shares[1].percent - 25.0).abs() < 1e-9);
    }

    #[test]
    fn history_filters_and_sorts_newest_first() {
        let ledger = sample();
        let all = history(&ledger, &TransactionFilter::default());
        let titles: Vec<&str> = all.iter().map(|t| t.title.as_str()).collect();
        assert_eq!(titles, ["Café latte", "Return on FD", "Freelance gig"]);

        let filter = TransactionFilter {
            search: Some("CAFE".to_string()),
            ..TransactionFilter::default()
        };
        assert_eq!(history(&ledger, &filter).len(), 1);

        let filter = TransactionFilter {
            kind: Some(TransactionKind::Income),
            from: Some(day(3)),
            to: Some(day(3)),
            ..TransactionFilter::default()
        };
        assert_eq!(history(&ledger, &filter)[0].title, "Freelance gig");

        assert_eq!(recent_transactions(&ledger, 2).len(), 2);
    }
}
