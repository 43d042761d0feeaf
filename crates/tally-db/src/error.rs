//! # Store Error Types
//!
//! Error types for store operations.
//!
//! ## Error Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Propagation                                    │
//! │                                                                         │
//! │  Driver error (sqlx::Error)                                            │
//! │       │                                                                 │
//! │       ├── while opening ──► ConnectError                               │
//! │       │                     HostUnreachable / AuthRejected /           │
//! │       │                     DriverError                                │
//! │       │                                                                 │
//! │       └── while querying ─► StoreError::QueryFailed / Unexpected       │
//! │                                                                         │
//! │  StoreError                                                            │
//! │       │                                                                 │
//! │       ├── fetch_sales          → returned to the caller                │
//! │       └── fetch_sales_or_empty → logged, empty table returned          │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use thiserror::Error;

use crate::connection::StoreBackend;

// SQLite primary result codes.
const SQLITE_CANTOPEN: i32 = 14;
const SQLITE_AUTH: i32 = 23;

// SQLSTATE for "invalid authorization specification" (MySQL 1045).
const SQLSTATE_ACCESS_DENIED: &str = "28000";

/// Why a connection could not be opened.
#[derive(Debug, Error)]
pub enum ConnectError {
    /// The store could not be reached.
    ///
    /// ## When This Occurs
    /// - Host down, refused connection, DNS failure
    /// - SQLite file missing or unreadable
    #[error("Store unreachable: {0}")]
    HostUnreachable(String),

    /// The store rejected the credentials.
    #[error("Authentication rejected: {0}")]
    AuthRejected(String),

    /// Any other driver failure (TLS, protocol, unknown database, ...).
    #[error("Driver error: {0}")]
    DriverError(String),
}

impl ConnectError {
    /// Classifies a driver error raised while opening a connection.
    ///
    /// ## Mapping
    /// ```text
    /// sqlx::Error::Io / PoolTimedOut          → HostUnreachable
    /// MySQL SQLSTATE 28000                    → AuthRejected
    /// SQLite SQLITE_CANTOPEN                  → HostUnreachable
    /// SQLite SQLITE_AUTH                      → AuthRejected
    /// Other                                   → DriverError
    /// ```
    pub fn from_driver(backend: StoreBackend, err: sqlx::Error) -> Self {
        let message = err.to_string();

        match &err {
            sqlx::Error::Io(_) | sqlx::Error::PoolTimedOut => ConnectError::HostUnreachable(message),

            sqlx::Error::Database(db_err) => {
                let code = db_err.code().map(|c| c.into_owned()).unwrap_or_default();

                match backend {
                    StoreBackend::MySql if code == SQLSTATE_ACCESS_DENIED => {
                        ConnectError::AuthRejected(message)
                    }
                    StoreBackend::Sqlite => {
                        // Extended codes carry the primary code in the low byte.
                        match code.parse::<i32>().map(|c| c & 0xff) {
                            Ok(SQLITE_CANTOPEN) => ConnectError::HostUnreachable(message),
                            Ok(SQLITE_AUTH) => ConnectError::AuthRejected(message),
                            _ => ConnectError::DriverError(message),
                        }
                    }
                    _ => ConnectError::DriverError(message),
                }
            }

            _ => ConnectError::DriverError(message),
        }
    }
}

/// Store operation errors.
#[derive(Debug, Error)]
pub enum StoreError {
    /// No connection could be established; no query was attempted.
    #[error("Connection failed: {0}")]
    Connection(#[from] ConnectError),

    /// The driver failed while executing the query or fetching rows.
    #[error("Query failed: {0}")]
    QueryFailed(String),

    /// Rows came back in a shape the pipeline cannot use.
    ///
    /// ## When This Occurs
    /// - `Folio` missing from the result set
    /// - `Folio` value that cannot be decoded
    #[error("Unexpected failure: {0}")]
    Unexpected(String),
}

/// Convert sqlx errors raised after the connection is open.
///
/// ## Error Mapping
/// ```text
/// sqlx::Error::ColumnNotFound / ColumnDecode /
///   ColumnIndexOutOfBounds / Decode         → StoreError::Unexpected
/// Other                                     → StoreError::QueryFailed
/// ```
impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::ColumnNotFound(_)
            | sqlx::Error::ColumnDecode { .. }
            | sqlx::Error::ColumnIndexOutOfBounds { .. }
            | sqlx::Error::Decode(_) => StoreError::Unexpected(err.to_string()),

            _ => StoreError::QueryFailed(err.to_string()),
        }
    }
}

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;
