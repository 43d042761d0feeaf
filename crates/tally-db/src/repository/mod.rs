//! # Repository Module
//!
//! Store queries, one repository per table.
//!
//! - [`SaleRepository`] - open sales from `Ventas`

pub mod sale;

pub use sale::{SaleRepository, OPEN_SALES_QUERY};
