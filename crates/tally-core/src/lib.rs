//! # tally-core: Pure Normalization Logic for Tally
//!
//! This crate turns loosely-typed sale rows into canonical, strongly-typed
//! records. It has zero I/O dependencies: the store layer (`tally-db`)
//! hands it [`RawRow`]s and gets a [`TransactionTable`] back.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                          Tally Data Flow                                │
//! │                                                                         │
//! │  tally-db: ConnectionProvider ──► QueryExecutor ──► Vec<RawRow>        │
//! │                                                          │              │
//! │  ┌───────────────────────────────────────────────────────▼──────────┐  │
//! │  │               ★ tally-core (THIS CRATE) ★                        │  │
//! │  │                                                                  │  │
//! │  │   ┌────────────┐   ┌──────────────┐   ┌──────────────────────┐  │  │
//! │  │   │   parse    │──►│  normalize   │──►│      aggregate       │  │  │
//! │  │   │ per field  │   │ RawRow ──►   │   │ folio ──► record     │  │  │
//! │  │   │ ParseError │   │ Transaction- │   │ last-write-wins      │  │  │
//! │  │   └────────────┘   │ Record       │   └──────────────────────┘  │  │
//! │  │                    └──────────────┘                              │  │
//! │  │          every component writes into Diagnostics                 │  │
//! │  └──────────────────────────────────────────────────────────────────┘  │
//! │                                                          │              │
//! │                                                          ▼              │
//! │                                                 TransactionTable        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Raw rows, source columns, records, the transaction table
//! - [`parse`] - Per-field parsers returning [`ParseError`]
//! - [`normalize`] - RecordNormalizer (never fails)
//! - [`aggregate`] - Folio-keyed fold with last-write-wins
//! - [`diagnostics`] - Explicit event channel mirrored to `tracing`
//! - [`error`] - Field parse errors
//!
//! ## Example
//!
//! ```rust
//! use chrono::NaiveDate;
//! use tally_core::{normalize_rows, Diagnostics, RawRow, RawValue, SaleColumn};
//!
//! let row = RawRow::new()
//!     .with(SaleColumn::Folio, RawValue::Int(1001))
//!     .with(SaleColumn::Estado, RawValue::text(" PAGADA "))
//!     .with(SaleColumn::Fecha, RawValue::Date(NaiveDate::from_ymd_opt(2024, 1, 5).unwrap()))
//!     .with(SaleColumn::Paga, RawValue::Float(150.5));
//!
//! let mut diagnostics = Diagnostics::new();
//! let table = normalize_rows(vec![row], &mut diagnostics);
//!
//! let record = table.get("1001").unwrap();
//! assert_eq!(record.status, "PAGADA");
//! assert_eq!(record.date, "2024-01-05");
//! assert_eq!(record.total, 0.0);
//! assert_eq!(record.amount_paid, 150.5);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod aggregate;
pub mod diagnostics;
pub mod error;
pub mod normalize;
pub mod parse;
pub mod types;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use aggregate::{aggregate, normalize_rows};
pub use diagnostics::{Diagnostic, Diagnostics, Severity};
pub use error::{ParseError, ParseResult};
pub use normalize::normalize;
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Status value of cancelled sales. Rows carrying it never reach the core.
pub const CANCELLED_STATUS: &str = "CANCELADA";

/// Canonical textual form of date fields.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Canonical textual form of time fields.
pub const TIME_FORMAT: &str = "%H:%M:%S";
