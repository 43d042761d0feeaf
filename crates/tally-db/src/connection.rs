//! # Store Connection Management
//!
//! Opening and closing the single connection a pipeline run uses.
//!
//! ## Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Connection Lifecycle                               │
//! │                                                                         │
//! │  StoreConfig::mysql(host, db, user, pass)  /  StoreConfig::sqlite(path)│
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  open_connection(&config, &mut diagnostics).await                      │
//! │       │                                                                 │
//! │       ├── Err(ConnectError) ──► logged, nothing to close               │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  StoreConnection ──► SaleRepository::new(&mut conn).fetch_open_sales() │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  conn.close(&mut diagnostics).await  ← consumes the connection         │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! A pipeline run is strictly sequential, so there is no pool: one
//! connection is opened, used for exactly one query, and closed.

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use sqlx::mysql::{MySqlConnectOptions, MySqlConnection};
use sqlx::sqlite::{SqliteConnectOptions, SqliteConnection};
use sqlx::{ConnectOptions, Connection};
use tally_core::Diagnostics;
use tracing::debug;

use crate::error::ConnectError;

// =============================================================================
// Backend
// =============================================================================

/// Which driver a [`StoreConfig`] targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StoreBackend {
    /// Production sales store.
    #[default]
    MySql,
    /// Local file store (seed tool, tests).
    Sqlite,
}

impl StoreBackend {
    pub const fn as_str(self) -> &'static str {
        match self {
            StoreBackend::MySql => "mysql",
            StoreBackend::Sqlite => "sqlite",
        }
    }
}

impl fmt::Display for StoreBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StoreBackend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "mysql" => Ok(StoreBackend::MySql),
            "sqlite" => Ok(StoreBackend::Sqlite),
            other => Err(format!("unknown store backend: {other:?}")),
        }
    }
}

// =============================================================================
// Configuration
// =============================================================================

/// Where and how to connect.
///
/// ## Example
/// ```rust,ignore
/// let config = StoreConfig::mysql("db.internal", "ventas", "tally", "secret").port(3307);
/// let local = StoreConfig::sqlite("./ventas_dev.db");
/// ```
#[derive(Clone, PartialEq, Eq)]
pub struct StoreConfig {
    pub backend: StoreBackend,

    /// Server host name or address. Ignored by SQLite.
    pub host: String,

    /// Server port. `None` uses the driver default.
    pub port: Option<u16>,

    /// Database name, or the file path for SQLite.
    pub database: String,

    pub username: String,
    pub password: String,
}

impl StoreConfig {
    /// Configuration for a MySQL server.
    pub fn mysql(
        host: impl Into<String>,
        database: impl Into<String>,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        StoreConfig {
            backend: StoreBackend::MySql,
            host: host.into(),
            port: None,
            database: database.into(),
            username: username.into(),
            password: password.into(),
        }
    }

    /// Configuration for an existing SQLite file.
    pub fn sqlite(path: impl Into<PathBuf>) -> Self {
        StoreConfig {
            backend: StoreBackend::Sqlite,
            host: String::new(),
            port: None,
            database: path.into().to_string_lossy().into_owned(),
            username: String::new(),
            password: String::new(),
        }
    }

    /// Sets the server port.
    pub fn port(mut self, port: u16) -> Self {
        self.port = Some(port);
        self
    }

    /// Human-readable target for logs. Never includes the password.
    pub fn target(&self) -> String {
        match self.backend {
            StoreBackend::Sqlite => format!("sqlite://{}", self.database),
            StoreBackend::MySql => match self.port {
                Some(port) => format!(
                    "mysql://{}@{}:{}/{}",
                    self.username, self.host, port, self.database
                ),
                None => format!("mysql://{}@{}/{}", self.username, self.host, self.database),
            },
        }
    }
}

impl fmt::Debug for StoreConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StoreConfig")
            .field("backend", &self.backend)
            .field("host", &self.host)
            .field("port", &self.port)
            .field("database", &self.database)
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

// =============================================================================
// Connection
// =============================================================================

/// A live connection to one of the supported backends.
///
/// Only [`open_connection`] creates one, so holding a `StoreConnection`
/// means the open succeeded.
#[derive(Debug)]
pub enum StoreConnection {
    Sqlite(SqliteConnection),
    MySql(MySqlConnection),
}

impl StoreConnection {
    pub fn backend(&self) -> StoreBackend {
        match self {
            StoreConnection::Sqlite(_) => StoreBackend::Sqlite,
            StoreConnection::MySql(_) => StoreBackend::MySql,
        }
    }

    /// Closes the connection. A failing close is only logged.
    pub async fn close(self, diagnostics: &mut Diagnostics) {
        let backend = self.backend();

        let result = match self {
            StoreConnection::Sqlite(conn) => conn.close().await,
            StoreConnection::MySql(conn) => conn.close().await,
        };

        match result {
            Ok(()) => debug!(%backend, "Connection closed"),
            Err(err) => diagnostics.warn(format!("failed to close {backend} connection: {err}")),
        }
    }
}

/// Opens a connection described by `config`.
///
/// No retry and no timeout beyond the driver default. A failure is recorded
/// as an error diagnostic and returned as a typed [`ConnectError`].
pub async fn open_connection(
    config: &StoreConfig,
    diagnostics: &mut Diagnostics,
) -> Result<StoreConnection, ConnectError> {
    debug!(target_db = %config.target(), "Opening store connection");

    let result = match config.backend {
        StoreBackend::Sqlite => {
            // Never create the file: a missing store is a connection failure.
            SqliteConnectOptions::new()
                .filename(&config.database)
                .create_if_missing(false)
                .connect()
                .await
                .map(StoreConnection::Sqlite)
        }
        StoreBackend::MySql => {
            let mut options = MySqlConnectOptions::new()
                .host(&config.host)
                .username(&config.username)
                .password(&config.password)
                .database(&config.database);

            if let Some(port) = config.port {
                options = options.port(port);
            }

            options.connect().await.map(StoreConnection::MySql)
        }
    };

    result.map_err(|err| {
        let err = ConnectError::from_driver(config.backend, err);
        diagnostics.error(format!(
            "could not connect to {}: {}",
            config.target(),
            err
        ));
        err
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backend_parsing() {
        assert_eq!("mysql".parse::<StoreBackend>(), Ok(StoreBackend::MySql));
        assert_eq!(" SQLite ".parse::<StoreBackend>(), Ok(StoreBackend::Sqlite));
        assert!("mssql".parse::<StoreBackend>().is_err());
        assert_eq!(StoreBackend::default(), StoreBackend::MySql);
    }

    #[test]
    fn test_debug_redacts_password() {
        let config = StoreConfig::mysql("db.local", "ventas", "tally", "hunter2");
        let debug = format!("{:?}", config);

        assert!(!debug.contains("hunter2"));
        assert!(debug.contains("<redacted>"));
    }

    #[test]
    fn test_target_formats() {
        let mysql = StoreConfig::mysql("db.local", "ventas", "tally", "secret").port(3307);
        assert_eq!(mysql.target(), "mysql://tally@db.local:3307/ventas");

        let sqlite = StoreConfig::sqlite("/tmp/ventas.db");
        assert_eq!(sqlite.target(), "sqlite:///tmp/ventas.db");
    }

    #[tokio::test]
    async fn test_missing_sqlite_file_is_unreachable() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.db");
        let config = StoreConfig::sqlite(&path);

        let mut diagnostics = Diagnostics::new();
        let result = open_connection(&config, &mut diagnostics).await;

        assert!(matches!(result, Err(ConnectError::HostUnreachable(_))));
        assert!(diagnostics.has_errors());
        assert!(!path.exists(), "open must not create the store file");
    }
}
