//! SQLite connection pool and schema management for the wallet database.

use r2d2::Pool;
use r2d2_sqlite::SqliteConnectionManager;
use std::path::Path;

pub type SqlitePool = Pool<SqliteConnectionManager>;

const SCHEMA: &str = "CREATE TABLE IF NOT EXISTS wallet_transactions (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    user_fk INTEGER NOT NULL,
    transaction_description TEXT NOT NULL,
    amount INTEGER NOT NULL,
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL
);
CREATE INDEX IF NOT EXISTS idx_wallet_transactions_user_fk
    ON wallet_transactions (user_fk);";

pub fn build_sqlite_pool(db_path: &Path) -> Result<SqlitePool, String> {
    let manager = SqliteConnectionManager::file(db_path);
    let pool = Pool::builder()
        .build(manager)
        .map_err(|err| format!("build pool: {err}"))?;

    let conn = pool
        .get()
        .map_err(|err| format!("get connection: {err}"))?;
    conn.execute_batch(SCHEMA)
        .map_err(|err| format!("apply schema: {err}"))?;

    Ok(pool)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn build_sqlite_pool_creates_database_and_schema() {
        let tmp = tempdir().expect("temp dir");
        let db_path = tmp.path().join("wallet.sqlite3");

        let pool = build_sqlite_pool(&db_path).expect("pool should build");
        let conn = pool.get().expect("connection from pool");

        let count: i64 = conn
            .query_row(
                "SELECT count(*) FROM sqlite_master WHERE type = 'table' AND name = 'wallet_transactions'",
                [],
                |row| row.get(0),
            )
            .expect("query sqlite_master");
        assert_eq!(count, 1);
        assert!(db_path.is_file());
    }

    #[test]
    fn build_sqlite_pool_is_idempotent_for_existing_database() {
        let tmp = tempdir().expect("temp dir");
        let db_path = tmp.path().join("wallet.sqlite3");

        build_sqlite_pool(&db_path).expect("first build");
        let pool = build_sqlite_pool(&db_path).expect("second build");

        let conn = pool.get().expect("connection from pool");
        conn.execute(
            "INSERT INTO wallet_transactions (user_fk, transaction_description, amount, created_at, updated_at) \
             VALUES (1, 'Deposit', 100, '2024-01-01T00:00:00Z', '2024-01-01T00:00:00Z')",
            [],
        )
        .expect("insert row");
    }

    #[test]
    fn build_sqlite_pool_fails_for_unwritable_path() {
        let result = build_sqlite_pool(Path::new("/nonexistent/wallet-api/wallet.sqlite3"));
        assert!(result.is_err(), "expected pool build failure");
    }
}
