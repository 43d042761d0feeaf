//! # Report Rendering
//!
//! Prints a [`TransactionTable`] the way the sales desk reads it.
//!
//! ## Layout
//! ```text
//!
//! ==================================================
//! FOLIO: 1001
//! ==================================================
//! estado: PAGADA
//! cveCte: C001
//! ...                         one line per field, record order
//!
//! ==================================================
//! FORMATO JSON:
//! ==================================================
//! {
//!   "1001": {
//!     "estado": "PAGADA",
//!     ...
//! ```
//!
//! Rendering writes to any [`Write`] so tests capture it in a `Vec<u8>`.

use std::io::{self, Write};

use tally_core::TransactionTable;

const BANNER_WIDTH: usize = 50;

fn banner<W: Write>(out: &mut W, title: &str) -> io::Result<()> {
    let rule = "=".repeat(BANNER_WIDTH);
    writeln!(out)?;
    writeln!(out, "{rule}")?;
    writeln!(out, "{title}")?;
    writeln!(out, "{rule}")
}

/// One banner and `key: value` block per record.
pub fn render_text<W: Write>(table: &TransactionTable, out: &mut W) -> io::Result<()> {
    for (folio, record) in table.iter() {
        banner(out, &format!("FOLIO: {folio}"))?;
        for (key, value) in record.fields() {
            writeln!(out, "{key}: {value}")?;
        }
    }
    Ok(())
}

/// The table as 2-space indented JSON. Non-ASCII text is written as-is.
pub fn render_json<W: Write>(table: &TransactionTable, out: &mut W) -> io::Result<()> {
    serde_json::to_writer_pretty(&mut *out, table)?;
    writeln!(out)
}

/// Text blocks, then the JSON section under its own banner.
pub fn render_report<W: Write>(table: &TransactionTable, out: &mut W) -> io::Result<()> {
    render_text(table, out)?;
    banner(out, "FORMATO JSON:")?;
    render_json(table, out)
}
