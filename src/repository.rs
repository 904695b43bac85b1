//! Account repository.
//!
//! The UI talks to the store only through [`AccountRepository`], so every
//! account rule can be exercised without a terminal. The SQLite
//! implementation opens a connection per operation for file-backed stores.

use rusqlite::Connection;
use std::path::PathBuf;
use tracing::{info, warn};

use crate::account::{ensure_positive, validate_name, Account, AccountId};
use crate::db;
use crate::error::{BankError, BankResult};

/// Create, deposit, withdraw, get, list.
pub trait AccountRepository {
    /// Insert a new account with a zero balance. The name is trimmed first.
    fn create_account(&self, name: &str) -> BankResult<Account>;

    /// Add a positive, finite amount. Returns the account after the change.
    fn deposit(&self, id: AccountId, amount: f64) -> BankResult<Account>;

    /// Remove a positive amount the balance covers. Returns the account after the change.
    fn withdraw(&self, id: AccountId, amount: f64) -> BankResult<Account>;

    /// Fails with `AccountNotFound` for an unknown id.
    fn get_account(&self, id: AccountId) -> BankResult<Account>;

    /// All accounts, ordered by id ascending.
    fn list_accounts(&self) -> BankResult<Vec<Account>>;
}

enum Store {
    File(PathBuf),
    Memory(Connection),
}

pub struct SqliteAccountRepository {
    store: Store,
}

impl SqliteAccountRepository {
    /// Open (or create) the store at `path` and make sure the table exists.
    pub fn open(path: impl Into<PathBuf>) -> BankResult<Self> {
        let path = path.into();
        let conn = db::open_database(&path)?;
        db::setup_database(&conn)?;
        let accounts = db::verify_count(&conn)?;
        info!(path = %path.display(), accounts, "account store ready");

        Ok(Self {
            store: Store::File(path),
        })
    }

    /// Store that lives as long as the repository. Used by tests.
    pub fn open_in_memory() -> BankResult<Self> {
        let conn = Connection::open_in_memory()?;
        db::setup_database(&conn)?;

        Ok(Self {
            store: Store::Memory(conn),
        })
    }

    fn with_connection<T>(&self, op: impl FnOnce(&Connection) -> BankResult<T>) -> BankResult<T> {
        match &self.store {
            Store::File(path) => {
                let conn = db::open_database(path)?;
                op(&conn)
            }
            Store::Memory(conn) => op(conn),
        }
    }
}

impl AccountRepository for SqliteAccountRepository {
    fn create_account(&self, name: &str) -> BankResult<Account> {
        let name = validate_name(name)?;

        let id = self.with_connection(|conn| db::insert_account(conn, name))?;
        info!(account_id = id, name, "account created");

        Ok(Account {
            id,
            name: name.to_string(),
            balance: 0.0,
        })
    }

    fn deposit(&self, id: AccountId, amount: f64) -> BankResult<Account> {
        let amount = ensure_positive(amount)?;

        self.with_connection(|conn| {
            if let Some(balance) = db::credit_account(conn, id, amount)? {
                info!(account_id = id, amount, balance, "deposit");
                return account_after_change(conn, id);
            }

            // Nothing changed: find out why
            match db::get_account(conn, id)? {
                None => {
                    warn!(account_id = id, "deposit to unknown account");
                    Err(BankError::AccountNotFound(id))
                }
                Some(account) => {
                    warn!(account_id = id, amount, balance = account.balance, "balance limit exceeded");
                    Err(BankError::BalanceLimitExceeded {
                        id,
                        balance: account.balance,
                        requested: amount,
                    })
                }
            }
        })
    }

    fn withdraw(&self, id: AccountId, amount: f64) -> BankResult<Account> {
        let amount = ensure_positive(amount)?;

        self.with_connection(|conn| {
            if let Some(balance) = db::debit_account_if_covered(conn, id, amount)? {
                info!(account_id = id, amount, balance, "withdrawal");
                return account_after_change(conn, id);
            }

            // Nothing changed: find out why
            match db::get_account(conn, id)? {
                None => {
                    warn!(account_id = id, "withdrawal from unknown account");
                    Err(BankError::AccountNotFound(id))
                }
                Some(account) => {
                    warn!(account_id = id, amount, balance = account.balance, "insufficient funds");
                    Err(BankError::InsufficientFunds {
                        id,
                        balance: account.balance,
                        requested: amount,
                    })
                }
            }
        })
    }

    fn get_account(&self, id: AccountId) -> BankResult<Account> {
        self.with_connection(|conn| db::get_account(conn, id))?
            .ok_or(BankError::AccountNotFound(id))
    }

    fn list_accounts(&self) -> BankResult<Vec<Account>> {
        self.with_connection(db::get_all_accounts)
    }
}

fn account_after_change(conn: &Connection, id: AccountId) -> BankResult<Account> {
    db::get_account(conn, id)?.ok_or(BankError::AccountNotFound(id))
}
