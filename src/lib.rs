// Simple Banking System - Core Library
// Exposes the account store, repository and settings for the UI binary and tests

pub mod account;
pub mod config;
pub mod db;
pub mod error;
pub mod logging;
pub mod repository;
pub mod theme;

// Re-export commonly used types
pub use account::{
    format_money, parse_account_id, parse_amount, validate_name,
    Account, AccountId,
};
pub use config::Config;
pub use db::setup_database;
pub use error::{BankError, BankResult, ErrorKind};
pub use logging::init_logging;
pub use repository::{AccountRepository, SqliteAccountRepository};
pub use theme::{Palette, Rgb, ThemeMode};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
