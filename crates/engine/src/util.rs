//! Internal helpers for input validation and row conversion.
//!
//! These utilities are **not** part of the public API. They centralize
//! validation and mapping logic so every entry point enforces the same
//! invariants.

use unicode_normalization::{UnicodeNormalization, char::is_combining_mark};
use uuid::Uuid;

use crate::{EngineError, Money, ResultEngine};

/// Trim and NFC-normalize a required text field.
pub(crate) fn normalize_required_text(value: &str, label: &str) -> ResultEngine<String> {
    let normalized: String = value.trim().nfc().collect();
    if normalized.is_empty() {
        return Err(EngineError::InvalidInput(format!("{label} must not be empty")));
    }
    Ok(normalized)
}

pub(crate) fn normalize_optional_text(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| s.nfc().collect())
}

/// Folds text for case and accent insensitive matching.
pub(crate) fn search_key(value: &str) -> String {
    value
        .nfkd()
        .filter(|c| !is_combining_mark(*c))
        .flat_map(char::to_lowercase)
        .collect()
}

pub(crate) fn require_positive(amount: Money, label: &str) -> ResultEngine<()> {
    if !amount.is_positive() {
        return Err(EngineError::InvalidAmount(format!("{label} must be > 0")));
    }
    if amount > Money::MAX_INPUT {
        return Err(EngineError::InvalidAmount(format!(
            "{label} must be at most {}",
            Money::MAX_INPUT
        )));
    }
    Ok(())
}

/// Parse a UUID from storage and return a labeled error on failure.
pub(crate) fn parse_uuid(value: &str, label: &str) -> ResultEngine<Uuid> {
    Uuid::parse_str(value).map_err(|_| EngineError::InvalidRow(format!("invalid {label} id")))
}

pub(crate) fn parse_optional_uuid(value: Option<&str>, label: &str) -> ResultEngine<Option<Uuid>> {
    value.map(|raw| parse_uuid(raw, label)).transpose()
}

/// Stored amounts must be strictly positive.
pub(crate) fn row_amount(value: i64, label: &str) -> ResultEngine<Money> {
    if value <= 0 {
        return Err(EngineError::InvalidRow(format!(
            "{label} amount must be > 0, got {value}"
        )));
    }
    Ok(Money::new(value))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn required_text_is_trimmed() {
        assert_eq!(normalize_required_text("  Rent ", "title").unwrap(), "Rent");
        assert_eq!(
            normalize_required_text("   ", "title"),
            Err(EngineError::InvalidInput("title must not be empty".to_string()))
        );
    }

    #[test]
    fn search_key_folds_case_and_accents() {
        assert_eq!(search_key("Café"), "cafe");
        assert_eq!(search_key("GROCERIES"), "groceries");
    }

    #[test]
    fn amounts_are_bounded() {
        assert!(require_positive(Money::new(1), "amount").is_ok());
        assert!(require_positive(Money::MAX_INPUT, "amount").is_ok());
        assert!(require_positive(Money::ZERO, "amount").is_err());
        assert_eq!(
            require_positive(Money::new(i64::MAX), "amount"),
            Err(EngineError::InvalidAmount(
                "amount must be at most ₹1000000000000.00".to_string()
            ))
        );
    }

    #[test]
    fn row_amount_rejects_non_positive() {
        assert!(row_amount(0, "expense").is_err());
        assert_eq!(row_amount(10, "expense").unwrap(), Money::new(10));
    }
}
