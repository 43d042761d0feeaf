//! # Record Normalizer
//!
//! Turns one [`RawRow`] into a [`TransactionRecord`].
//!
//! Normalization cannot fail. A field whose raw value does not parse gets
//! its default (`""`, `0.0`, `0`) and a warning naming the folio and the
//! source column is recorded; the rest of the row is processed as usual.

use crate::diagnostics::Diagnostics;
use crate::error::ParseResult;
use crate::parse::{parse_date, parse_decimal, parse_integer, parse_text, parse_time};
use crate::types::{RawRow, RawValue, SaleColumn, TransactionRecord};

/// Normalizes one row.
pub fn normalize(row: &RawRow, diagnostics: &mut Diagnostics) -> TransactionRecord {
    let folio = row.folio().to_string();
    let mut fields = FieldReader {
        row,
        folio: &folio,
        diagnostics,
    };

    TransactionRecord {
        status: fields.text(SaleColumn::Estado),
        customer_code: fields.text(SaleColumn::CveCte),
        customer_name: fields.text(SaleColumn::Cliente),
        date: fields.lenient(SaleColumn::Fecha, parse_date),
        time: fields.lenient(SaleColumn::Hora, parse_time),
        total: fields.lenient(SaleColumn::Total, parse_decimal),
        remaining: fields.lenient(SaleColumn::Restante, parse_decimal),
        payment_date: fields.lenient(SaleColumn::FechaPago, parse_date),
        amount_paid: fields.lenient(SaleColumn::Paga, parse_decimal),
        change: fields.text(SaleColumn::Cambio),
        ticket: fields.text(SaleColumn::Ticket),
        terms: fields.text(SaleColumn::Condiciones),
        scheduled_date: fields.lenient(SaleColumn::FechaProg, parse_date),
        cut_number: fields.lenient(SaleColumn::Corte, parse_integer),
        salesperson: fields.text(SaleColumn::Vendedor),
        payment_method: fields.text(SaleColumn::ComoPago),
        credit_days: fields.lenient(SaleColumn::DiasCred, parse_integer),
        credit_interest: fields.text(SaleColumn::IntCred),
        items: fields.text(SaleColumn::Articulos),
        bar_account: fields.text(SaleColumn::BarCuenta),
        bar_server: fields.text(SaleColumn::BarMesero),
        notes: fields.text(SaleColumn::NotasAdicionales),
        bar_account_id: fields.text(SaleColumn::IdBarCuenta),
        log: fields.text(SaleColumn::Bitacora),
        advance_payment: fields.lenient(SaleColumn::Anticipo, parse_decimal),
        payment_folio: fields.text(SaleColumn::FolioPago),
        customer_balance: fields.lenient(SaleColumn::SaldoCliente, parse_decimal),
        register: fields.lenient(SaleColumn::Caja, parse_integer),
    }
}

/// Reads the fields of one row, recovering parse errors at the field
/// boundary.
struct FieldReader<'a> {
    row: &'a RawRow,
    folio: &'a str,
    diagnostics: &'a mut Diagnostics,
}

impl FieldReader<'_> {
    fn text(&mut self, column: SaleColumn) -> String {
        parse_text(self.row.get(column))
    }

    fn lenient<T: Default>(
        &mut self,
        column: SaleColumn,
        parse: fn(&RawValue) -> ParseResult<T>,
    ) -> T {
        match parse(self.row.get(column)) {
            Ok(value) => value,
            Err(err) => {
                self.diagnostics
                    .field_warning(self.folio, column.name(), err.to_string());
                T::default()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::Severity;
    use chrono::{NaiveDate, NaiveTime};

    fn sample_row() -> RawRow {
        RawRow::new()
            .with(SaleColumn::Folio, RawValue::Int(1001))
            .with(SaleColumn::Estado, RawValue::text(" PAGADA "))
            .with(SaleColumn::Total, RawValue::Null)
            .with(
                SaleColumn::Fecha,
                RawValue::Date(NaiveDate::from_ymd_opt(2024, 1, 5).unwrap()),
            )
            .with(SaleColumn::Paga, RawValue::Float(150.5))
    }

    #[test]
    fn test_normalize_example_row() {
        let mut diagnostics = Diagnostics::new();
        let record = normalize(&sample_row(), &mut diagnostics);

        assert_eq!(record.status, "PAGADA");
        assert_eq!(record.total, 0.0);
        assert_eq!(record.date, "2024-01-05");
        assert_eq!(record.amount_paid, 150.5);

        // Everything else defaults.
        let expected = TransactionRecord {
            status: "PAGADA".to_string(),
            date: "2024-01-05".to_string(),
            amount_paid: 150.5,
            ..Default::default()
        };
        assert_eq!(record, expected);
        assert!(diagnostics.is_empty());
    }

    #[test]
    fn test_string_fields_are_trimmed() {
        let row = RawRow::new()
            .with(SaleColumn::Folio, RawValue::Int(1))
            .with(SaleColumn::Cliente, RawValue::text("\tMaría José  "))
            .with(SaleColumn::Vendedor, RawValue::text("  "))
            .with(SaleColumn::NotasAdicionales, RawValue::text("sin cebolla\n"));

        let record = normalize(&row, &mut Diagnostics::new());

        assert_eq!(record.customer_name, "María José");
        assert_eq!(record.salesperson, "");
        assert_eq!(record.notes, "sin cebolla");
    }

    #[test]
    fn test_zero_like_numerics_default_without_warnings() {
        let row = RawRow::new()
            .with(SaleColumn::Folio, RawValue::Int(2))
            .with(SaleColumn::Total, RawValue::Int(0))
            .with(SaleColumn::Restante, RawValue::text(""))
            .with(SaleColumn::Anticipo, RawValue::Float(0.0))
            .with(SaleColumn::Corte, RawValue::text(""))
            .with(SaleColumn::DiasCred, RawValue::Null)
            .with(SaleColumn::Caja, RawValue::Int(0));

        let mut diagnostics = Diagnostics::new();
        let record = normalize(&row, &mut diagnostics);

        assert_eq!(record.total, 0.0);
        assert_eq!(record.remaining, 0.0);
        assert_eq!(record.advance_payment, 0.0);
        assert_eq!(record.cut_number, 0);
        assert_eq!(record.credit_days, 0);
        assert_eq!(record.register, 0);
        assert!(diagnostics.is_empty());
    }

    #[test]
    fn test_malformed_fields_default_with_warnings() {
        let row = RawRow::new()
            .with(SaleColumn::Folio, RawValue::Int(3))
            .with(SaleColumn::Estado, RawValue::text("PENDIENTE"))
            .with(SaleColumn::Fecha, RawValue::text("05/01/2024"))
            .with(SaleColumn::Hora, RawValue::Int(1230))
            .with(SaleColumn::Total, RawValue::text("mil"))
            .with(SaleColumn::Caja, RawValue::text("dos"))
            .with(SaleColumn::Paga, RawValue::Float(80.0));

        let mut diagnostics = Diagnostics::new();
        let record = normalize(&row, &mut diagnostics);

        assert_eq!(record.date, "");
        assert_eq!(record.time, "");
        assert_eq!(record.total, 0.0);
        assert_eq!(record.register, 0);
        // The rest of the row is unaffected.
        assert_eq!(record.status, "PENDIENTE");
        assert_eq!(record.amount_paid, 80.0);

        let fields: Vec<_> = diagnostics.events().iter().map(|d| d.field).collect();
        assert_eq!(
            fields,
            vec![Some("Fecha"), Some("Hora"), Some("Total"), Some("Caja")]
        );
        assert!(diagnostics
            .events()
            .iter()
            .all(|d| d.severity == Severity::Warning && d.folio.as_deref() == Some("3")));
    }

    #[test]
    fn test_native_time_and_text_time() {
        let native = RawRow::new()
            .with(SaleColumn::Folio, RawValue::Int(4))
            .with(
                SaleColumn::Hora,
                RawValue::Time(NaiveTime::from_hms_milli_opt(13, 4, 59, 250).unwrap()),
            );
        let text = RawRow::new()
            .with(SaleColumn::Folio, RawValue::Int(5))
            .with(SaleColumn::Hora, RawValue::text("13:04"));

        let mut diagnostics = Diagnostics::new();
        assert_eq!(normalize(&native, &mut diagnostics).time, "13:04:59");
        assert_eq!(normalize(&text, &mut diagnostics).time, "13:04");
        assert!(diagnostics.is_empty());
    }

    #[test]
    fn test_datetime_feeds_date_fields() {
        let paid_at = NaiveDate::from_ymd_opt(2024, 2, 29)
            .unwrap()
            .and_hms_opt(23, 59, 59)
            .unwrap();
        let row = RawRow::new()
            .with(SaleColumn::Folio, RawValue::Int(6))
            .with(SaleColumn::FechaPago, RawValue::DateTime(paid_at))
            .with(SaleColumn::FechaProg, RawValue::text("2024-03-15"));

        let record = normalize(&row, &mut Diagnostics::new());

        assert_eq!(record.payment_date, "2024-02-29");
        assert_eq!(record.scheduled_date, "2024-03-15");
    }

    #[test]
    fn test_decimal_text_feeds_integer_fields() {
        let row = RawRow::new()
            .with(SaleColumn::Folio, RawValue::Int(7))
            .with(SaleColumn::Corte, RawValue::text("5.00"))
            .with(SaleColumn::DiasCred, RawValue::text("30.00"))
            .with(SaleColumn::Caja, RawValue::text("2.0"));

        let mut diagnostics = Diagnostics::new();
        let record = normalize(&row, &mut diagnostics);

        assert_eq!(record.cut_number, 5);
        assert_eq!(record.credit_days, 30);
        assert_eq!(record.register, 2);
        assert!(diagnostics.is_empty());
    }
}
