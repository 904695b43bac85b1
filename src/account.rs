// 💳 Account - a named balance record identified by a store-assigned integer
//
// Input parsing lives here too: dialogs hand over raw text and get back
// typed values or a validation error.

use crate::error::{BankError, BankResult};

/// Store-assigned identifier (SQLite INTEGER PRIMARY KEY)
pub type AccountId = i64;

#[derive(Debug, Clone, PartialEq)]
pub struct Account {
    pub id: AccountId,
    pub name: String,
    pub balance: f64,
}

impl Account {
    /// Balance formatted for popups, e.g. "$30.00"
    pub fn balance_display(&self) -> String {
        format!("${:.2}", self.balance)
    }
}

// ============================================================================
// INPUT VALIDATION
// ============================================================================

/// Trim the name and reject it if nothing is left
pub fn validate_name(input: &str) -> BankResult<&str> {
    let name = input.trim();
    if name.is_empty() {
        return Err(BankError::EmptyName);
    }
    Ok(name)
}

pub fn parse_account_id(input: &str) -> BankResult<AccountId> {
    input
        .trim()
        .parse::<AccountId>()
        .map_err(|_| BankError::InvalidAccountId(input.trim().to_string()))
}

/// Parse a deposit/withdrawal amount. Must be finite and strictly positive.
pub fn parse_amount(input: &str) -> BankResult<f64> {
    let trimmed = input.trim();
    let amount = trimmed
        .parse::<f64>()
        .map_err(|_| BankError::InvalidAmount(trimmed.to_string()))?;

    ensure_positive(amount)
}

/// Reject amounts that are not finite or not strictly positive
pub fn ensure_positive(amount: f64) -> BankResult<f64> {
    if !amount.is_finite() {
        return Err(BankError::InvalidAmount(amount.to_string()));
    }
    if amount > 0.0 {
        Ok(amount)
    } else {
        Err(BankError::NonPositiveAmount)
    }
}

/// Format money with thousands separators: 1234.5 → "$1,234.50"
pub fn format_money(value: f64) -> String {
    let fixed = format!("{:.2}", value.abs());
    let (whole, cents) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, ch) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    let sign = if value < 0.0 && fixed != "0.00" { "-" } else { "" };
    format!("{}${}.{}", sign, grouped, cents)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_name_trims() {
        assert_eq!(validate_name("  Alice  ").unwrap(), "Alice");
        assert!(matches!(validate_name(""), Err(BankError::EmptyName)));
        assert!(matches!(validate_name(" \t\n "), Err(BankError::EmptyName)));
    }

    #[test]
    fn test_parse_account_id() {
        assert_eq!(parse_account_id("12").unwrap(), 12);
        assert_eq!(parse_account_id(" 7 ").unwrap(), 7);
        assert!(matches!(parse_account_id("abc"), Err(BankError::InvalidAccountId(_))));
        assert!(matches!(parse_account_id(""), Err(BankError::InvalidAccountId(_))));
        assert!(matches!(parse_account_id("1.5"), Err(BankError::InvalidAccountId(_))));
    }

    #[test]
    fn test_parse_amount() {
        assert_eq!(parse_amount("50").unwrap(), 50.0);
        assert_eq!(parse_amount(" 20.25 ").unwrap(), 20.25);
        assert!(matches!(parse_amount("ten"), Err(BankError::InvalidAmount(_))));
        assert!(matches!(parse_amount("0"), Err(BankError::NonPositiveAmount)));
        assert!(matches!(parse_amount("-5"), Err(BankError::NonPositiveAmount)));
        assert!(matches!(parse_amount("inf"), Err(BankError::InvalidAmount(_))));
        assert!(matches!(parse_amount("NaN"), Err(BankError::InvalidAmount(_))));
    }

    #[test]
    fn test_format_money() {
        assert_eq!(format_money(0.0), "$0.00");
        assert_eq!(format_money(30.0), "$30.00");
        assert_eq!(format_money(999.999), "$1,000.00");
        assert_eq!(format_money(1234.5), "$1,234.50");
        assert_eq!(format_money(1234567.891), "$1,234,567.89");
        assert_eq!(format_money(-42.1), "-$42.10");
    }

    #[test]
    fn test_account_helpers() {
        let account = Account { id: 1, name: "Alice".into(), balance: 30.0 };
        assert_eq!(account.balance_display(), "$30.00");
    }

    #[test]
    fn test_ensure_positive_rejects_non_finite() {
        assert!(matches!(ensure_positive(f64::INFINITY), Err(BankError::InvalidAmount(_))));
        assert!(matches!(ensure_positive(f64::NEG_INFINITY), Err(BankError::InvalidAmount(_))));
        assert!(matches!(ensure_positive(f64::NAN), Err(BankError::InvalidAmount(_))));
        assert!(matches!(ensure_positive(0.0), Err(BankError::NonPositiveAmount)));
        assert_eq!(ensure_positive(1e308).unwrap(), 1e308);
    }
}
