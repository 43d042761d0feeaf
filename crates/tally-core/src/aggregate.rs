//! # Aggregator
//!
//! Folds normalized records into a [`TransactionTable`].
//!
//! ## Duplicate Folios
//! ```text
//! rows:   1001(A)  1002(B)  1001(C)
//!                                │
//!                                ▼
//! table:  { 1001: C, 1002: B }      last write wins, no merge
//! ```
//! The table can therefore hold fewer entries than the store returned rows.

use crate::diagnostics::Diagnostics;
use crate::normalize::normalize;
use crate::parse::parse_folio;
use crate::types::{RawRow, TransactionRecord, TransactionTable};

/// Folds `(folio, record)` pairs into a table, last write wins.
pub fn aggregate<I>(records: I, diagnostics: &mut Diagnostics) -> TransactionTable
where
    I: IntoIterator<Item = (String, TransactionRecord)>,
{
    let mut table = TransactionTable::new();

    for (folio, record) in records {
        if table.insert(folio.clone(), record).is_some() {
            diagnostics.row_warning(&folio, "duplicate folio, earlier row overwritten");
        }
    }

    table
}

/// Normalizes every row and aggregates the result.
///
/// Rows without a folio have nothing to be keyed by and are skipped with a
/// warning.
pub fn normalize_rows<I>(rows: I, diagnostics: &mut Diagnostics) -> TransactionTable
where
    I: IntoIterator<Item = RawRow>,
{
    let mut keyed = Vec::new();

    for row in rows {
        match parse_folio(row.folio()) {
            Ok(folio) => {
                let record = normalize(&row, diagnostics);
                keyed.push((folio, record));
            }
            Err(err) => diagnostics.warn(format!("row skipped: {}", err)),
        }
    }

    aggregate(keyed, diagnostics)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{RawValue, SaleColumn};

    fn row(folio: RawValue, status: &str, total: f64) -> RawRow {
        RawRow::new()
            .with(SaleColumn::Folio, folio)
            .with(SaleColumn::Estado, RawValue::text(status))
            .with(SaleColumn::Total, RawValue::Float(total))
    }

    #[test]
    fn test_last_write_wins() {
        let rows = vec![
            row(RawValue::Int(1001), "PAGADA", 10.0),
            row(RawValue::Int(1002), "PAGADA", 20.0),
            row(RawValue::Int(1001), "PENDIENTE", 30.0),
        ];

        let mut diagnostics = Diagnostics::new();
        let table = normalize_rows(rows, &mut diagnostics);

        assert_eq!(table.len(), 2);
        let winner = table.get("1001").unwrap();
        assert_eq!(winner.status, "PENDIENTE");
        assert_eq!(winner.total, 30.0);

        let warnings: Vec<_> = diagnostics.warnings().collect();
        assert_eq!(warnings.len(), 1);
        assert_eq!(warnings[0].folio.as_deref(), Some("1001"));
    }

    #[test]
    fn test_later_row_replaces_whole_record() {
        let first = row(RawValue::Int(9), "PAGADA", 10.0)
            .with(SaleColumn::Cliente, RawValue::text("Ana"));
        let second = row(RawValue::Int(9), "PAGADA", 12.0);

        let table = normalize_rows(vec![first, second.clone()], &mut Diagnostics::new());

        let expected = normalize(&second, &mut Diagnostics::new());
        assert_eq!(table.get("9"), Some(&expected));
        assert_eq!(table.get("9").unwrap().customer_name, "");
    }

    #[test]
    fn test_row_without_folio_is_skipped() {
        let rows = vec![
            row(RawValue::Null, "PAGADA", 10.0),
            row(RawValue::text("B-2"), "PAGADA", 5.0),
        ];

        let mut diagnostics = Diagnostics::new();
        let table = normalize_rows(rows, &mut diagnostics);

        assert_eq!(table.folios().collect::<Vec<_>>(), vec!["B-2"]);
        assert_eq!(diagnostics.warnings().count(), 1);
    }

    #[test]
    fn test_empty_input_is_empty_table() {
        let mut diagnostics = Diagnostics::new();
        let table = normalize_rows(Vec::new(), &mut diagnostics);

        assert!(table.is_empty());
        assert!(diagnostics.is_empty());
    }

    #[test]
    fn test_aggregate_preserves_first_seen_order() {
        let records = vec![
            ("3".to_string(), TransactionRecord::default()),
            ("1".to_string(), TransactionRecord::default()),
            ("3".to_string(), TransactionRecord::default()),
            ("2".to_string(), TransactionRecord::default()),
        ];

        let table = aggregate(records, &mut Diagnostics::new());

        assert_eq!(table.folios().collect::<Vec<_>>(), vec!["3", "1", "2"]);
    }
}
