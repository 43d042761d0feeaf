//! # tally-db: Store Access Layer for Tally
//!
//! Connects to the sales store, runs the open-sales query, and hands the
//! decoded rows to `tally-core` for normalization.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                          Tally Data Flow                                │
//! │                                                                         │
//! │  sales-report (ReportConfig ──► StoreConfig)                           │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                     tally-db (THIS CRATE)                       │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐    ┌────────────────┐    ┌──────────────┐  │   │
//! │  │   │  connection   │    │   repository   │    │   pipeline   │  │   │
//! │  │   │               │    │                │    │              │  │   │
//! │  │   │ StoreConfig   │───►│ SaleRepository │───►│ fetch_sales  │  │   │
//! │  │   │ open / close  │    │ OPEN_SALES_    │    │ + _or_empty  │  │   │
//! │  │   │ ConnectError  │    │ QUERY, decode  │    │              │  │   │
//! │  │   └───────────────┘    └────────────────┘    └──────┬───────┘  │   │
//! │  │                                                     │          │   │
//! │  └─────────────────────────────────────────────────────┼──────────┘   │
//! │       │                                                 │              │
//! │       ▼                                                 ▼              │
//! │  MySQL server / SQLite file              tally-core::normalize_rows    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`connection`] - Backend selection, connection open/close
//! - [`repository`] - The `Ventas` query and row decoding
//! - [`pipeline`] - `fetch_sales` / `fetch_sales_or_empty`
//! - [`error`] - Connection and store error types
//!
//! ## Usage
//!
//! ```rust,ignore
//! use tally_core::Diagnostics;
//! use tally_db::{fetch_sales, StoreConfig};
//!
//! let config = StoreConfig::mysql("db.internal", "ventas", "tally", "secret");
//! let mut diagnostics = Diagnostics::new();
//!
//! let table = fetch_sales(&config, &mut diagnostics).await?;
//! for (folio, record) in table.iter() {
//!     println!("{folio}: {}", record.status);
//! }
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod connection;
pub mod error;
pub mod pipeline;
pub mod repository;

#[cfg(test)]
mod test_support;

// =============================================================================
// Re-exports
// =============================================================================

pub use connection::{open_connection, StoreBackend, StoreConfig, StoreConnection};
pub use error::{ConnectError, StoreError, StoreResult};
pub use pipeline::{fetch_sales, fetch_sales_or_empty};
pub use repository::sale::{SaleRepository, OPEN_SALES_QUERY};

/// `Ventas` DDL for SQLite stores (seed tool, tests).
pub const VENTAS_SQLITE_SCHEMA: &str = include_str!("../sql/ventas.sqlite.sql");
