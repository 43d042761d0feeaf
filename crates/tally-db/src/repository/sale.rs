//! # Sale Repository
//!
//! Reads the open sales from the `Ventas` table.
//!
//! ## Query Path
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Open Sales Read                                  │
//! │                                                                         │
//! │  fetch_open_sales()                                                    │
//! │       │                                                                 │
//! │       ├── info: query text                                             │
//! │       ▼                                                                 │
//! │  OPEN_SALES_QUERY ──► driver rows (MySqlRow / SqliteRow)               │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  decode_row() per row                                                  │
//! │       ├── column name ──► SaleColumn (unknown columns ignored)         │
//! │       ├── driver type ──► RawValue                                     │
//! │       └── undecodable value ──► RawValue::Null + warning               │
//! │       │                                                                 │
//! │       ├── info: row count                                              │
//! │       ▼                                                                 │
//! │  Vec<RawRow> in store order                                            │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The date/time columns are selected bare: they have no zero value, and a
//! NULL reaches the normalizer as `RawValue::Null`.

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use sqlx::mysql::MySqlRow;
use sqlx::sqlite::SqliteRow;
use sqlx::types::BigDecimal;
use sqlx::{Column, Row, TypeInfo, ValueRef};
use tally_core::parse::parse_folio;
use tally_core::{Diagnostics, RawRow, RawValue, SaleColumn};

use crate::connection::StoreConnection;
use crate::error::{StoreError, StoreResult};

/// The one query the pipeline runs. Cancelled and status-less sales are
/// excluded.
pub const OPEN_SALES_QUERY: &str = "\
SELECT Folio, \
COALESCE(Estado, '') AS Estado, \
COALESCE(CveCte, '') AS CveCte, \
COALESCE(Cliente, '') AS Cliente, \
Fecha, \
Hora, \
COALESCE(Total, 0) AS Total, \
COALESCE(Restante, 0) AS Restante, \
FechaPago, \
COALESCE(Paga, 0) AS Paga, \
COALESCE(Cambio, '') AS Cambio, \
COALESCE(Ticket, '') AS Ticket, \
COALESCE(Condiciones, '') AS Condiciones, \
FechaProg, \
COALESCE(Corte, 0) AS Corte, \
COALESCE(Vendedor, '') AS Vendedor, \
COALESCE(ComoPago, '') AS ComoPago, \
COALESCE(DiasCred, 0) AS DiasCred, \
COALESCE(IntCred, '') AS IntCred, \
COALESCE(Articulos, '') AS Articulos, \
COALESCE(BarCuenta, '') AS BarCuenta, \
COALESCE(BarMesero, '') AS BarMesero, \
COALESCE(NotasAdicionales, '') AS NotasAdicionales, \
COALESCE(IdBarCuenta, '') AS IdBarCuenta, \
COALESCE(Bitacora, '') AS Bitacora, \
COALESCE(Anticipo, 0) AS Anticipo, \
COALESCE(FolioPago, '') AS FolioPago, \
COALESCE(SaldoCliente, 0) AS SaldoCliente, \
COALESCE(Caja, 0) AS Caja \
FROM Ventas \
WHERE Estado != 'CANCELADA' AND Estado IS NOT NULL";

/// Repository over a borrowed connection.
///
/// The repository never closes the connection; whoever opened it does.
#[derive(Debug)]
pub struct SaleRepository<'c> {
    conn: &'c mut StoreConnection,
}

impl<'c> SaleRepository<'c> {
    /// Creates a new SaleRepository.
    pub fn new(conn: &'c mut StoreConnection) -> Self {
        SaleRepository { conn }
    }

    /// Runs [`OPEN_SALES_QUERY`] and decodes every row.
    ///
    /// ## Returns
    /// The rows in store iteration order. Duplicate folios are kept; the
    /// aggregator resolves them.
    pub async fn fetch_open_sales(
        &mut self,
        diagnostics: &mut Diagnostics,
    ) -> StoreResult<Vec<RawRow>> {
        diagnostics.info(format!("executing query: {}", OPEN_SALES_QUERY));

        let rows = match &mut *self.conn {
            StoreConnection::Sqlite(conn) => {
                let rows = sqlx::query(OPEN_SALES_QUERY).fetch_all(&mut *conn).await?;
                rows.iter()
                    .map(|row| decode_row(row, decode_sqlite_value, diagnostics))
                    .collect::<StoreResult<Vec<_>>>()?
            }
            StoreConnection::MySql(conn) => {
                let rows = sqlx::query(OPEN_SALES_QUERY).fetch_all(&mut *conn).await?;
                rows.iter()
                    .map(|row| decode_row(row, decode_mysql_value, diagnostics))
                    .collect::<StoreResult<Vec<_>>>()?
            }
        };

        diagnostics.info(format!("fetched {} rows", rows.len()));

        Ok(rows)
    }
}

// =============================================================================
// Row Decoding
// =============================================================================

/// Converts one driver row into a [`RawRow`].
///
/// `Folio` must be present and decodable; every other column degrades to
/// `RawValue::Null` with a field warning.
fn decode_row<R>(
    row: &R,
    decode: fn(&R, usize) -> Result<RawValue, sqlx::Error>,
    diagnostics: &mut Diagnostics,
) -> StoreResult<RawRow>
where
    R: Row,
{
    let columns: Vec<(usize, SaleColumn)> = row
        .columns()
        .iter()
        .filter_map(|column| {
            SaleColumn::from_name(column.name()).map(|sale| (column.ordinal(), sale))
        })
        .collect();

    let folio_index = columns
        .iter()
        .find(|(_, column)| *column == SaleColumn::Folio)
        .map(|(index, _)| *index)
        .ok_or_else(|| StoreError::Unexpected("result set has no Folio column".to_string()))?;

    let folio = decode(row, folio_index)
        .map_err(|err| StoreError::Unexpected(format!("undecodable Folio: {err}")))?;
    let folio_label = parse_folio(&folio).unwrap_or_else(|_| "<none>".to_string());

    let mut raw = RawRow::new().with(SaleColumn::Folio, folio);

    for (index, column) in columns {
        if column == SaleColumn::Folio {
            continue;
        }

        let value = match decode(row, index) {
            Ok(value) => value,
            Err(err) => {
                diagnostics.field_warning(
                    &folio_label,
                    column.name(),
                    format!("undecodable value, treated as NULL: {err}"),
                );
                RawValue::Null
            }
        };

        raw.set(column, value);
    }

    Ok(raw)
}

/// SQLite values carry their storage class. DATE/DATETIME declared columns
/// are stored as text and decoded to chrono values when they parse; TIME
/// text stays text so the normalizer passes it through as recorded.
fn decode_sqlite_value(row: &SqliteRow, index: usize) -> Result<RawValue, sqlx::Error> {
    let raw = row.try_get_raw(index)?;
    if raw.is_null() {
        return Ok(RawValue::Null);
    }
    let storage = raw.type_info().name().to_ascii_uppercase();
    let declared = row.columns()[index].type_info().name().to_ascii_uppercase();

    let value = match storage.as_str() {
        "INTEGER" | "BOOLEAN" => RawValue::Int(row.try_get::<i64, _>(index)?),
        "REAL" | "NUMERIC" => RawValue::Float(row.try_get::<f64, _>(index)?),
        "BLOB" => {
            let bytes = row.try_get::<Vec<u8>, _>(index)?;
            RawValue::Text(String::from_utf8_lossy(&bytes).into_owned())
        }
        _ => match declared.as_str() {
            "DATE" => row
                .try_get::<NaiveDate, _>(index)
                .map(RawValue::Date)
                .or_else(|_| row.try_get::<String, _>(index).map(RawValue::Text))?,
            "DATETIME" => row
                .try_get::<NaiveDateTime, _>(index)
                .map(RawValue::DateTime)
                .or_else(|_| row.try_get::<String, _>(index).map(RawValue::Text))?,
            _ => RawValue::Text(row.try_get::<String, _>(index)?),
        },
    };

    Ok(value)
}

/// MySQL reports the column type; DECIMAL travels as text to keep precision
/// until the normalizer parses it.
fn decode_mysql_value(row: &MySqlRow, index: usize) -> Result<RawValue, sqlx::Error> {
    let raw = row.try_get_raw(index)?;
    if raw.is_null() {
        return Ok(RawValue::Null);
    }
    let type_name = raw.type_info().name().to_ascii_uppercase();

    if type_name.ends_with("UNSIGNED") {
        let unsigned = row.try_get::<u64, _>(index)?;
        return Ok(match i64::try_from(unsigned) {
            Ok(signed) => RawValue::Int(signed),
            Err(_) => RawValue::Float(unsigned as f64),
        });
    }

    let value = match type_name.as_str() {
        "TINYINT" | "SMALLINT" | "INT" | "MEDIUMINT" | "BIGINT" | "YEAR" => {
            RawValue::Int(row.try_get::<i64, _>(index)?)
        }
        "BOOLEAN" => RawValue::Int(i64::from(row.try_get::<bool, _>(index)?)),
        "FLOAT" => RawValue::Float(f64::from(row.try_get::<f32, _>(index)?)),
        "DOUBLE" => RawValue::Float(row.try_get::<f64, _>(index)?),
        "DECIMAL" => RawValue::Text(row.try_get::<BigDecimal, _>(index)?.to_string()),
        "DATE" => RawValue::Date(row.try_get::<NaiveDate, _>(index)?),
        "TIME" => RawValue::Time(row.try_get::<NaiveTime, _>(index)?),
        "DATETIME" | "TIMESTAMP" => RawValue::DateTime(row.try_get::<NaiveDateTime, _>(index)?),
        "BLOB" | "TINYBLOB" | "MEDIUMBLOB" | "LONGBLOB" | "BINARY" | "VARBINARY" => {
            let bytes = row.try_get::<Vec<u8>, _>(index)?;
            RawValue::Text(String::from_utf8_lossy(&bytes).into_owned())
        }
        _ => RawValue::Text(row.try_get::<String, _>(index)?),
    };

    Ok(value)
}
