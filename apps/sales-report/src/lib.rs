//! # Tally Sales Report
//!
//! Library half of the `sales-report` binary: environment configuration and
//! report rendering, kept out of `main.rs` so both are testable.
//!
//! - [`config`] - `ReportConfig` from `TALLY_*` variables
//! - [`report`] - Text and JSON rendering of a `TransactionTable`

pub mod config;
pub mod report;
