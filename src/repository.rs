//! Data access for user wallets.
//!
//! [`WalletRepository`] hides the SQLite layer from the HTTP handlers: a
//! wallet is the sequence of its transaction rows, and the balance is the sum
//! of their amounts. All methods are synchronous and are expected to run
//! inside `spawn_blocking` when called from async code.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::sqlitepool::SqlitePool;

pub const TOP_UP_DESCRIPTION: &str = "Top-up";

/// One row of the wallet ledger, serialized with the field names the wire
/// format uses.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WalletTransaction {
    pub id: i64,
    pub user_fk: i64,
    pub transaction_description: String,
    pub amount: i64,
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
    #[serde(rename = "updatedAt")]
    pub updated_at: DateTime<Utc>,
}

#[derive(Clone)]
pub struct WalletRepository {
    pool: SqlitePool,
}

impl WalletRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Returns the current balance for a user, zero when the user has no
    /// transactions.
    pub fn user_balance(&self, user_id: i64) -> Result<i64, String> {
        let conn = self
            .pool
            .get()
            .map_err(|err| format!("get connection: {err}"))?;

        conn.query_row(
            "SELECT COALESCE(SUM(amount), 0) FROM wallet_transactions WHERE user_fk = ?1",
            [user_id],
            |row| row.get(0),
        )
        .map_err(|err| format!("query balance: {err}"))
    }

    /// Records a top-up transaction and returns the resulting balance.
    pub fn top_up(&self, user_id: i64, amount: i64) -> Result<i64, String> {
        if amount <= 0 {
            return Err(format!("top-up amount must be positive, got {amount}"));
        }

        let conn = self
            .pool
            .get()
            .map_err(|err| format!("get connection: {err}"))?;

        let now = Utc::now();
        conn.execute(
            "INSERT INTO wallet_transactions \
             (user_fk, transaction_description, amount, created_at, updated_at) \
             VALUES (?1, ?2, ?3, ?4, ?5)",
            rusqlite::params![user_id, TOP_UP_DESCRIPTION, amount, now, now],
        )
        .map_err(|err| format!("insert top-up: {err}"))?;

        drop(conn);
        self.user_balance(user_id)
    }

    /// Returns all transactions for a user, newest first.
    pub fn list_transactions(&self, user_id: i64) -> Result<Vec<WalletTransaction>, String> {
        let conn = self
            .pool
            .get()
            .map_err(|err| format!("get connection: {err}"))?;

        let mut stmt = conn
            .prepare(
                "SELECT id, user_fk, transaction_description, amount, created_at, updated_at \
                 FROM wallet_transactions \
                 WHERE user_fk = ?1 \
                 ORDER BY id DESC",
            )
            .map_err(|err| format!("prepare transactions statement: {err}"))?;

        let mapped = stmt
            .query_map([user_id], |row| {
                Ok(WalletTransaction {
                    id: row.get(0)?,
                    user_fk: row.get(1)?,
                    transaction_description: row.get(2)?,
                    amount: row.get(3)?,
                    created_at: row.get(4)?,
                    updated_at: row.get(5)?,
                })
            })
            .map_err(|err| format!("query transactions map: {err}"))?;

        mapped
            .collect::<Result<Vec<_>, _>>()
            .map_err(|err| format!("collect transactions: {err}"))
    }
}

impl std::fmt::Debug for WalletRepository {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WalletRepository")
            .field("pool", &"SqlitePool")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sqlitepool::build_sqlite_pool;
    use tempfile::tempdir;

    fn fresh_repository() -> (WalletRepository, tempfile::TempDir) {
        let tmp = tempdir().expect("temp dir");
        let pool = build_sqlite_pool(&tmp.path().join("wallet.sqlite3")).expect("build pool");
        (WalletRepository::new(pool), tmp)
    }

    #[test]
    fn user_balance_is_zero_for_unknown_user() {
        let (repo, _tmp) = fresh_repository();

        assert_eq!(repo.user_balance(42).expect("balance"), 0);
    }

    #[test]
    fn top_up_accumulates_balance() {
        let (repo, _tmp) = fresh_repository();

        assert_eq!(repo.top_up(1, 100).expect("first top-up"), 100);
        assert_eq!(repo.top_up(1, 500).expect("second top-up"), 600);
        // Another user's wallet stays untouched.
        assert_eq!(repo.user_balance(2).expect("balance"), 0);
    }

    #[test]
    fn top_up_rejects_non_positive_amounts() {
        let (repo, _tmp) = fresh_repository();

        let err = repo.top_up(1, 0).expect_err("zero amount");
        assert!(err.contains("must be positive"), "unexpected error: {err}");
        let err = repo.top_up(1, -50).expect_err("negative amount");
        assert!(err.contains("must be positive"), "unexpected error: {err}");
        assert_eq!(repo.user_balance(1).expect("balance"), 0);
    }

    #[test]
    fn list_transactions_returns_rows_newest_first() {
        let (repo, _tmp) = fresh_repository();
        repo.top_up(1, 100).expect("first top-up");
        repo.top_up(1, 200).expect("second top-up");
        repo.top_up(2, 999).expect("other user top-up");

        let transactions = repo.list_transactions(1).expect("list");

        assert_eq!(transactions.len(), 2);
        assert_eq!(transactions[0].amount, 200);
        assert_eq!(transactions[1].amount, 100);
        assert!(transactions
            .iter()
            .all(|tx| tx.user_fk == 1 && tx.transaction_description == TOP_UP_DESCRIPTION));
        assert!(transactions[0].id > transactions[1].id);
    }

    #[test]
    fn list_transactions_is_empty_for_unknown_user() {
        let (repo, _tmp) = fresh_repository();
        repo.top_up(1, 100).expect("top-up");

        assert!(repo.list_transactions(7).expect("list").is_empty());
    }

    #[test]
    fn transaction_serializes_with_wire_field_names() {
        let (repo, _tmp) = fresh_repository();
        repo.top_up(3, 250).expect("top-up");

        let transactions = repo.list_transactions(3).expect("list");
        let value = serde_json::to_value(&transactions[0]).expect("serialize");

        assert_eq!(value["user_fk"], 3);
        assert_eq!(value["transaction_description"], TOP_UP_DESCRIPTION);
        assert_eq!(value["amount"], 250);
        assert!(value.get("createdAt").is_some());
        assert!(value.get("updatedAt").is_some());
        assert!(value.get("created_at").is_none());
    }
}
