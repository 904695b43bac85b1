use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;
use tracing::debug;

use crate::account::{Account, AccountId};
use crate::error::BankResult;

/// Open a connection to the account store at `path`
pub fn open_database(path: &Path) -> BankResult<Connection> {
    debug!(path = %path.display(), "opening account store");
    let conn = Connection::open(path)?;
    Ok(conn)
}

pub fn setup_database(conn: &Connection) -> BankResult<()> {
    // Enable WAL mode for crash recovery
    conn.pragma_update(None, "journal_mode", "WAL")?;

    // ==========================================================================
    // Accounts Table
    // Same layout as banking.db files written by earlier versions of the app
    // ==========================================================================
    conn.execute(
        "CREATE TABLE IF NOT EXISTS accounts (
            account_id INTEGER PRIMARY KEY,
            name TEXT NOT NULL,
            balance REAL NOT NULL DEFAULT 0.0
        )",
        [],
    )?;

    Ok(())
}

/// Insert a new account with balance 0.0 and return its assigned id
pub fn insert_account(conn: &Connection, name: &str) -> BankResult<AccountId> {
    conn.execute("INSERT INTO accounts (name) VALUES (?1)", params![name])?;
    Ok(conn.last_insert_rowid())
}

pub fn get_account(conn: &Connection, id: AccountId) -> BankResult<Option<Account>> {
    let account = conn
        .query_row(
            "SELECT account_id, name, balance FROM accounts WHERE account_id = ?1",
            params![id],
            |row| {
                Ok(Account {
                    id: row.get(0)?,
                    name: row.get(1)?,
                    balance: row.get(2)?,
                })
            },
        )
        .optional()?;

    Ok(account)
}

pub fn get_all_accounts(conn: &Connection) -> BankResult<Vec<Account>> {
    let mut stmt = conn.prepare(
        "SELECT account_id, name, balance
         FROM accounts
         ORDER BY account_id ASC",
    )?;

    let accounts = stmt
        .query_map([], |row| {
            Ok(Account {
                id: row.get(0)?,
                name: row.get(1)?,
                balance: row.get(2)?,
            })
        })?
        .collect::<Result<Vec<_>, _>>()?;

    Ok(accounts)
}

/// Add `amount` to the balance unless the sum would overflow to infinity.
/// Returns the new balance, or None when the id is unknown or the sum is too large.
pub fn credit_account(conn: &Connection, id: AccountId, amount: f64) -> BankResult<Option<f64>> {
    let balance = conn
        .query_row(
            "UPDATE accounts SET balance = balance + ?1
             WHERE account_id = ?2 AND balance + ?1 <= ?3
             RETURNING balance",
            params![amount, id, f64::MAX],
            |row| row.get(0),
        )
        .optional()?;
    Ok(balance)
}

/// Subtract `amount` only if the balance covers it, in a single statement.
/// Returns None when the id is unknown or the balance is too low.
pub fn debit_account_if_covered(
    conn: &Connection,
    id: AccountId,
    amount: f64,
) -> BankResult<Option<f64>> {
    let balance = conn
        .query_row(
            "UPDATE accounts SET balance = balance - ?1
             WHERE account_id = ?2 AND balance >= ?1
             RETURNING balance",
            params![amount, id],
            |row| row.get(0),
        )
        .optional()?;
    Ok(balance)
}

pub fn verify_count(conn: &Connection) -> BankResult<i64> {
    let count: i64 = conn.query_row("SELECT COUNT(*) FROM accounts", [], |row| row.get(0))?;

    Ok(count)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_db() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        setup_database(&conn).unwrap();
        conn
    }

    #[test]
    fn test_setup_is_idempotent() {
        let conn = test_db();
        setup_database(&conn).unwrap();
        assert_eq!(verify_count(&conn).unwrap(), 0);
    }

    #[test]
    fn test_insert_and_get() {
        let conn = test_db();

        let id = insert_account(&conn, "Alice").unwrap();
        let account = get_account(&conn, id).unwrap().unwrap();

        assert_eq!(account.id, id);
        assert_eq!(account.name, "Alice");
        assert_eq!(account.balance, 0.0);
        assert!(get_account(&conn, id + 1).unwrap().is_none());
    }

    #[test]
    fn test_get_all_ordered_by_id() {
        let conn = test_db();
        let a = insert_account(&conn, "Zed").unwrap();
        let b = insert_account(&conn, "Amy").unwrap();

        let ids: Vec<_> = get_all_accounts(&conn).unwrap().into_iter().map(|a| a.id).collect();
        assert_eq!(ids, vec![a, b]);
        assert_eq!(verify_count(&conn).unwrap(), 2);
    }

    #[test]
    fn test_credit_unknown_account_changes_nothing() {
        let conn = test_db();
        assert_eq!(credit_account(&conn, 99, 10.0).unwrap(), None);
        assert_eq!(verify_count(&conn).unwrap(), 0);
    }

    #[test]
    fn test_conditional_debit() {
        let conn = test_db();
        let id = insert_account(&conn, "Bob").unwrap();
        assert_eq!(credit_account(&conn, id, 25.0).unwrap(), Some(25.0));

        assert_eq!(debit_account_if_covered(&conn, id, 30.0).unwrap(), None);
        assert_eq!(get_account(&conn, id).unwrap().unwrap().balance, 25.0);

        assert_eq!(debit_account_if_covered(&conn, id, 25.0).unwrap(), Some(0.0));
        assert_eq!(get_account(&conn, id).unwrap().unwrap().balance, 0.0);
    }

    #[test]
    fn test_credit_refuses_overflow() {
        let conn = test_db();
        let id = insert_account(&conn, "Carol").unwrap();

        assert_eq!(credit_account(&conn, id, 1e308).unwrap(), Some(1e308));
        assert_eq!(credit_account(&conn, id, 1e308).unwrap(), None);
        assert_eq!(get_account(&conn, id).unwrap().unwrap().balance, 1e308);
    }
}
