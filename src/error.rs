// Error taxonomy for account operations
// Every failure a dialog can show maps to one BankError variant

use thiserror::Error;

use crate::account::AccountId;

/// Which class of failure occurred
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Bad user input (empty name, non-numeric id/amount, non-positive amount)
    Validation,
    /// Input was well formed but the request cannot be honored
    Domain,
    /// Unexpected failure from the underlying store
    Storage,
}

#[derive(Debug, Error)]
pub enum BankError {
    #[error("Name cannot be empty!")]
    EmptyName,

    #[error("'{0}' is not a valid account ID.")]
    InvalidAccountId(String),

    #[error("'{0}' is not a valid amount.")]
    InvalidAmount(String),

    #[error("Amount must be positive.")]
    NonPositiveAmount,

    #[error("Account {0} not found!")]
    AccountNotFound(AccountId),

    #[error("Insufficient balance! Account {id} holds ${balance:.2}, requested ${requested:.2}.")]
    InsufficientFunds {
        id: AccountId,
        balance: f64,
        requested: f64,
    },

    #[error("Deposit refused! Account {id} holds ${balance:.2}; adding ${requested:.2} exceeds the largest storable balance.")]
    BalanceLimitExceeded {
        id: AccountId,
        balance: f64,
        requested: f64,
    },

    #[error("Database error: {0}")]
    Storage(#[from] rusqlite::Error),
}

impl BankError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            BankError::EmptyName
            | BankError::InvalidAccountId(_)
            | BankError::InvalidAmount(_)
            | BankError::NonPositiveAmount => ErrorKind::Validation,
            BankError::AccountNotFound(_)
            | BankError::InsufficientFunds { .. }
            | BankError::BalanceLimitExceeded { .. } => ErrorKind::Domain,
            BankError::Storage(_) => ErrorKind::Storage,
        }
    }

    /// Popup title shown above the message
    pub fn title(&self) -> &'static str {
        match self {
            BankError::AccountNotFound(_) => "Not Found",
            BankError::InsufficientFunds { .. } => "Insufficient Funds",
            BankError::BalanceLimitExceeded { .. } => "Limit Exceeded",
            BankError::Storage(_) => "Database Error",
            _ => "Input Error",
        }
    }
}

pub type BankResult<T> = std::result::Result<T, BankError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_kinds() {
        assert_eq!(BankError::EmptyName.kind(), ErrorKind::Validation);
        assert_eq!(BankError::InvalidAccountId("x".into()).kind(), ErrorKind::Validation);
        assert_eq!(BankError::NonPositiveAmount.kind(), ErrorKind::Validation);
        assert_eq!(BankError::AccountNotFound(7).kind(), ErrorKind::Domain);
        assert_eq!(
            BankError::InsufficientFunds { id: 1, balance: 1.0, requested: 2.0 }.kind(),
            ErrorKind::Domain
        );
        assert_eq!(
            BankError::BalanceLimitExceeded { id: 1, balance: 1e308, requested: 1e308 }.kind(),
            ErrorKind::Domain
        );
        assert_eq!(
            BankError::Storage(rusqlite::Error::QueryReturnedNoRows).kind(),
            ErrorKind::Storage
        );
    }

    #[test]
    fn test_error_messages() {
        assert_eq!(BankError::AccountNotFound(42).to_string(), "Account 42 not found!");
        let err = BankError::InsufficientFunds { id: 3, balance: 30.0, requested: 1000.0 };
        assert_eq!(
            err.to_string(),
            "Insufficient balance! Account 3 holds $30.00, requested $1000.00."
        );
        assert_eq!(err.title(), "Insufficient Funds");
        assert_eq!(BankError::EmptyName.title(), "Input Error");
    }
}
