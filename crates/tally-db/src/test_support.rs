//! Temporary SQLite stores for tests.

use sqlx::sqlite::SqliteConnectOptions;
use sqlx::{ConnectOptions, Connection};
use tempfile::TempDir;

use crate::connection::StoreConfig;
use crate::VENTAS_SQLITE_SCHEMA;

/// Creates an empty `Ventas` store in a fresh temp directory.
///
/// Keep the returned `TempDir` alive for the duration of the test.
pub async fn sqlite_store() -> (TempDir, StoreConfig) {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("ventas.db");

    let mut conn = SqliteConnectOptions::new()
        .filename(&path)
        .create_if_missing(true)
        .connect()
        .await
        .unwrap();
    sqlx::raw_sql(VENTAS_SQLITE_SCHEMA)
        .execute(&mut conn)
        .await
        .unwrap();
    conn.close().await.unwrap();

    (dir, StoreConfig::sqlite(path))
}

/// Runs raw SQL against the store.
pub async fn execute(config: &StoreConfig, sql: &str) {
    let mut conn = SqliteConnectOptions::new()
        .filename(&config.database)
        .connect()
        .await
        .unwrap();
    sqlx::raw_sql(sql).execute(&mut conn).await.unwrap();
    conn.close().await.unwrap();
}

/// Inserts `(Folio, Estado, Total)`.
pub async fn insert_sale(config: &StoreConfig, values: &str) {
    execute(
        config,
        &format!("INSERT INTO Ventas (Folio, Estado, Total) VALUES ({values})"),
    )
    .await;
}
