//! # Domain Types
//!
//! Types flowing through the sales pipeline.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────────┐   │
//! │  │   SaleColumn    │   │    RawValue     │   │       RawRow        │   │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────────  │   │
//! │  │  Folio          │   │  Null           │   │  SaleColumn ──►     │   │
//! │  │  Estado         │   │  Int / Float    │   │      RawValue       │   │
//! │  │  ... (29)       │   │  Text           │   │  (missing = Null)   │   │
//! │  └─────────────────┘   │  Date/DateTime  │   └─────────────────────┘   │
//! │                        │  Time           │                              │
//! │                        └─────────────────┘                              │
//! │                                                                         │
//! │  ┌──────────────────────────┐   ┌──────────────────────────────────┐   │
//! │  │   TransactionRecord      │   │       TransactionTable           │   │
//! │  │  ──────────────────────  │   │  ──────────────────────────────  │   │
//! │  │  28 typed, defaulted     │◄──│  folio ──► record                │   │
//! │  │  fields                  │   │  unique keys, store row order    │   │
//! │  └──────────────────────────┘   └──────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::collections::{BTreeMap, HashMap};
use std::fmt;

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

use crate::{DATE_FORMAT, TIME_FORMAT};

// =============================================================================
// Source Columns
// =============================================================================

/// How a source column is normalized.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnKind {
    /// The transaction identifier (map key, not a record field).
    Identifier,
    Text,
    Decimal,
    Integer,
    Date,
    Time,
}

/// The columns of the `Ventas` table read by the pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum SaleColumn {
    Folio,
    Estado,
    CveCte,
    Cliente,
    Fecha,
    Hora,
    Total,
    Restante,
    FechaPago,
    Paga,
    Cambio,
    Ticket,
    Condiciones,
    FechaProg,
    Corte,
    Vendedor,
    ComoPago,
    DiasCred,
    IntCred,
    Articulos,
    BarCuenta,
    BarMesero,
    NotasAdicionales,
    IdBarCuenta,
    Bitacora,
    Anticipo,
    FolioPago,
    SaldoCliente,
    Caja,
}

impl SaleColumn {
    /// Every column, in query order.
    pub const ALL: [SaleColumn; 29] = [
        SaleColumn::Folio,
        SaleColumn::Estado,
        SaleColumn::CveCte,
        SaleColumn::Cliente,
        SaleColumn::Fecha,
        SaleColumn::Hora,
        SaleColumn::Total,
        SaleColumn::Restante,
        SaleColumn::FechaPago,
        SaleColumn::Paga,
        SaleColumn::Cambio,
        SaleColumn::Ticket,
        SaleColumn::Condiciones,
        SaleColumn::FechaProg,
        SaleColumn::Corte,
        SaleColumn::Vendedor,
        SaleColumn::ComoPago,
        SaleColumn::DiasCred,
        SaleColumn::IntCred,
        SaleColumn::Articulos,
        SaleColumn::BarCuenta,
        SaleColumn::BarMesero,
        SaleColumn::NotasAdicionales,
        SaleColumn::IdBarCuenta,
        SaleColumn::Bitacora,
        SaleColumn::Anticipo,
        SaleColumn::FolioPago,
        SaleColumn::SaldoCliente,
        SaleColumn::Caja,
    ];

    /// Column name as it appears in the store.
    pub const fn name(self) -> &'static str {
        match self {
            SaleColumn::Folio => "Folio",
            SaleColumn::Estado => "Estado",
            SaleColumn::CveCte => "CveCte",
            SaleColumn::Cliente => "Cliente",
            SaleColumn::Fecha => "Fecha",
            SaleColumn::Hora => "Hora",
            SaleColumn::Total => "Total",
            SaleColumn::Restante => "Restante",
            SaleColumn::FechaPago => "FechaPago",
            SaleColumn::Paga => "Paga",
            SaleColumn::Cambio => "Cambio",
            SaleColumn::Ticket => "Ticket",
            SaleColumn::Condiciones => "Condiciones",
            SaleColumn::FechaProg => "FechaProg",
            SaleColumn::Corte => "Corte",
            SaleColumn::Vendedor => "Vendedor",
            SaleColumn::ComoPago => "ComoPago",
            SaleColumn::DiasCred => "DiasCred",
            SaleColumn::IntCred => "IntCred",
            SaleColumn::Articulos => "Articulos",
            SaleColumn::BarCuenta => "BarCuenta",
            SaleColumn::BarMesero => "BarMesero",
            SaleColumn::NotasAdicionales => "NotasAdicionales",
            SaleColumn::IdBarCuenta => "IdBarCuenta",
            SaleColumn::Bitacora => "Bitacora",
            SaleColumn::Anticipo => "Anticipo",
            SaleColumn::FolioPago => "FolioPago",
            SaleColumn::SaldoCliente => "SaldoCliente",
            SaleColumn::Caja => "Caja",
        }
    }

    /// Looks a column up by its store name (case-insensitive).
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL
            .iter()
            .copied()
            .find(|column| column.name().eq_ignore_ascii_case(name))
    }

    pub const fn kind(self) -> ColumnKind {
        match self {
            SaleColumn::Folio => ColumnKind::Identifier,
            SaleColumn::Fecha | SaleColumn::FechaPago | SaleColumn::FechaProg => ColumnKind::Date,
            SaleColumn::Hora => ColumnKind::Time,
            SaleColumn::Total
            | SaleColumn::Restante
            | SaleColumn::Paga
            | SaleColumn::Anticipo
            | SaleColumn::SaldoCliente => ColumnKind::Decimal,
            SaleColumn::Corte | SaleColumn::DiasCred | SaleColumn::Caja => ColumnKind::Integer,
            _ => ColumnKind::Text,
        }
    }
}

impl fmt::Display for SaleColumn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// =============================================================================
// Raw Values
// =============================================================================

/// One column value as the driver produced it, before normalization.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum RawValue {
    #[default]
    Null,
    Int(i64),
    Float(f64),
    Text(String),
    Date(NaiveDate),
    DateTime(NaiveDateTime),
    Time(NaiveTime),
}

impl RawValue {
    pub fn text(value: impl Into<String>) -> Self {
        RawValue::Text(value.into())
    }

    pub fn is_null(&self) -> bool {
        matches!(self, RawValue::Null)
    }

    /// Null, zero, and the empty string carry no data.
    ///
    /// Falsy values normalize to the field default without a warning.
    pub fn is_falsy(&self) -> bool {
        match self {
            RawValue::Null => true,
            RawValue::Int(n) => *n == 0,
            RawValue::Float(f) => *f == 0.0,
            RawValue::Text(s) => s.is_empty(),
            RawValue::Date(_) | RawValue::DateTime(_) | RawValue::Time(_) => false,
        }
    }
}

impl fmt::Display for RawValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RawValue::Null => Ok(()),
            RawValue::Int(n) => write!(f, "{}", n),
            RawValue::Float(x) => write!(f, "{}", x),
            RawValue::Text(s) => f.write_str(s),
            RawValue::Date(d) => write!(f, "{}", d.format(DATE_FORMAT)),
            RawValue::DateTime(dt) => write!(f, "{}", dt.format("%Y-%m-%d %H:%M:%S")),
            RawValue::Time(t) => write!(f, "{}", t.format(TIME_FORMAT)),
        }
    }
}

// =============================================================================
// Raw Row
// =============================================================================

static NULL_VALUE: RawValue = RawValue::Null;

/// One row of the `Ventas` query. Columns that were not produced read as
/// [`RawValue::Null`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawRow {
    values: BTreeMap<SaleColumn, RawValue>,
}

impl RawRow {
    pub fn new() -> Self {
        RawRow::default()
    }

    /// Builder form of [`RawRow::set`].
    pub fn with(mut self, column: SaleColumn, value: RawValue) -> Self {
        self.set(column, value);
        self
    }

    pub fn set(&mut self, column: SaleColumn, value: RawValue) {
        self.values.insert(column, value);
    }

    pub fn get(&self, column: SaleColumn) -> &RawValue {
        self.values.get(&column).unwrap_or(&NULL_VALUE)
    }

    pub fn folio(&self) -> &RawValue {
        self.get(SaleColumn::Folio)
    }

    /// Number of columns explicitly present.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

// =============================================================================
// Transaction Record
// =============================================================================

/// A normalized sale.
///
/// Field names follow the domain; the serialized keys follow the store's
/// reporting format (`estado`, `cveCte`, ...). Date fields hold
/// `YYYY-MM-DD` or `""`, the time field holds `HH:MM:SS`, a pass-through
/// string, or `""`.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct TransactionRecord {
    #[serde(rename = "estado")]
    pub status: String,
    #[serde(rename = "cveCte")]
    pub customer_code: String,
    #[serde(rename = "cliente")]
    pub customer_name: String,
    #[serde(rename = "fecha")]
    pub date: String,
    #[serde(rename = "hora")]
    pub time: String,
    pub total: f64,
    #[serde(rename = "restante")]
    pub remaining: f64,
    #[serde(rename = "fechaPago")]
    pub payment_date: String,
    #[serde(rename = "paga")]
    pub amount_paid: f64,
    #[serde(rename = "cambio")]
    pub change: String,
    pub ticket: String,
    #[serde(rename = "condiciones")]
    pub terms: String,
    #[serde(rename = "fechaProg")]
    pub scheduled_date: String,
    #[serde(rename = "corte")]
    pub cut_number: i64,
    #[serde(rename = "vendedor")]
    pub salesperson: String,
    #[serde(rename = "comoPago")]
    pub payment_method: String,
    // Reporting format has always keyed credit days as `diasCorte`.
    #[serde(rename = "diasCorte")]
    pub credit_days: i64,
    #[serde(rename = "intCred")]
    pub credit_interest: String,
    #[serde(rename = "articulos")]
    pub items: String,
    #[serde(rename = "barCuenta")]
    pub bar_account: String,
    #[serde(rename = "barMesero")]
    pub bar_server: String,
    #[serde(rename = "notasAdicionales")]
    pub notes: String,
    #[serde(rename = "idBarCuenta")]
    pub bar_account_id: String,
    #[serde(rename = "bitacora")]
    pub log: String,
    #[serde(rename = "anticipo")]
    pub advance_payment: f64,
    #[serde(rename = "folioPago")]
    pub payment_folio: String,
    #[serde(rename = "saldoCliente")]
    pub customer_balance: f64,
    #[serde(rename = "caja")]
    pub register: i64,
}

/// A borrowed record field, for line-oriented rendering.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FieldValue<'a> {
    Text(&'a str),
    Decimal(f64),
    Integer(i64),
}

impl fmt::Display for FieldValue<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Text(s) => f.write_str(s),
            // Debug keeps the trailing `.0` on whole amounts.
            FieldValue::Decimal(x) => write!(f, "{:?}", x),
            FieldValue::Integer(n) => write!(f, "{}", n),
        }
    }
}

impl TransactionRecord {
    /// Number of fields in a record.
    pub const FIELD_COUNT: usize = 28;

    /// Every field with its serialized key, in record order.
    pub fn fields(&self) -> [(&'static str, FieldValue<'_>); Self::FIELD_COUNT] {
        use FieldValue::{Decimal, Integer, Text};

        [
            ("estado", Text(&self.status)),
            ("cveCte", Text(&self.customer_code)),
            ("cliente", Text(&self.customer_name)),
            ("fecha", Text(&self.date)),
            ("hora", Text(&self.time)),
            ("total", Decimal(self.total)),
            ("restante", Decimal(self.remaining)),
            ("fechaPago", Text(&self.payment_date)),
            ("paga", Decimal(self.amount_paid)),
            ("cambio", Text(&self.change)),
            ("ticket", Text(&self.ticket)),
            ("condiciones", Text(&self.terms)),
            ("fechaProg", Text(&self.scheduled_date)),
            ("corte", Integer(self.cut_number)),
            ("vendedor", Text(&self.salesperson)),
            ("comoPago", Text(&self.payment_method)),
            ("diasCorte", Integer(self.credit_days)),
            ("intCred", Text(&self.credit_interest)),
            ("articulos", Text(&self.items)),
            ("barCuenta", Text(&self.bar_account)),
            ("barMesero", Text(&self.bar_server)),
            ("notasAdicionales", Text(&self.notes)),
            ("idBarCuenta", Text(&self.bar_account_id)),
            ("bitacora", Text(&self.log)),
            ("anticipo", Decimal(self.advance_payment)),
            ("folioPago", Text(&self.payment_folio)),
            ("saldoCliente", Decimal(self.customer_balance)),
            ("caja", Integer(self.register)),
        ]
    }
}

// =============================================================================
// Transaction Table
// =============================================================================

/// Folio-keyed sales, in the order the store first produced each folio.
///
/// ## Overwrite Semantics
/// ```text
/// insert("7", A)   →  [ 7:A ]
/// insert("9", B)   →  [ 7:A, 9:B ]
/// insert("7", C)   →  [ 7:C, 9:B ]     (position kept, value replaced)
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TransactionTable {
    entries: Vec<(String, TransactionRecord)>,
    index: HashMap<String, usize>,
}

impl TransactionTable {
    pub fn new() -> Self {
        TransactionTable::default()
    }

    /// Inserts a record, returning the one it replaced.
    pub fn insert(
        &mut self,
        folio: impl Into<String>,
        record: TransactionRecord,
    ) -> Option<TransactionRecord> {
        let folio = folio.into();

        if let Some(&position) = self.index.get(&folio) {
            return Some(std::mem::replace(&mut self.entries[position].1, record));
        }

        self.index.insert(folio.clone(), self.entries.len());
        self.entries.push((folio, record));
        None
    }

    pub fn get(&self, folio: &str) -> Option<&TransactionRecord> {
        self.index.get(folio).map(|&position| &self.entries[position].1)
    }

    pub fn contains(&self, folio: &str) -> bool {
        self.index.contains_key(folio)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &TransactionRecord)> {
        self.entries
            .iter()
            .map(|(folio, record)| (folio.as_str(), record))
    }

    pub fn folios(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(folio, _)| folio.as_str())
    }

    /// The first `n` entries as a new table.
    pub fn head(&self, n: usize) -> TransactionTable {
        self.entries.iter().take(n).cloned().collect()
    }
}

impl FromIterator<(String, TransactionRecord)> for TransactionTable {
    fn from_iter<I: IntoIterator<Item = (String, TransactionRecord)>>(iter: I) -> Self {
        let mut table = TransactionTable::new();
        for (folio, record) in iter {
            table.insert(folio, record);
        }
        table
    }
}

impl IntoIterator for TransactionTable {
    type Item = (String, TransactionRecord);
    type IntoIter = std::vec::IntoIter<(String, TransactionRecord)>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

impl Serialize for TransactionTable {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (folio, record) in &self.entries {
            map.serialize_entry(folio, record)?;
        }
        map.end()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn record(status: &str) -> TransactionRecord {
        TransactionRecord {
            status: status.to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_column_lookup_is_case_insensitive() {
        assert_eq!(SaleColumn::from_name("Folio"), Some(SaleColumn::Folio));
        assert_eq!(SaleColumn::from_name("saldocliente"), Some(SaleColumn::SaldoCliente));
        assert_eq!(SaleColumn::from_name("Descuento"), None);
    }

    #[test]
    fn test_column_kinds() {
        let count = |kind| SaleColumn::ALL.iter().filter(|c| c.kind() == kind).count();

        assert_eq!(count(ColumnKind::Identifier), 1);
        assert_eq!(count(ColumnKind::Decimal), 5);
        assert_eq!(count(ColumnKind::Integer), 3);
        assert_eq!(count(ColumnKind::Date), 3);
        assert_eq!(count(ColumnKind::Time), 1);
        assert_eq!(count(ColumnKind::Text), 16);
    }

    #[test]
    fn test_falsy_values() {
        assert!(RawValue::Null.is_falsy());
        assert!(RawValue::Int(0).is_falsy());
        assert!(RawValue::Float(0.0).is_falsy());
        assert!(RawValue::text("").is_falsy());

        assert!(!RawValue::text(" ").is_falsy());
        assert!(!RawValue::text("0").is_falsy());
        assert!(!RawValue::Int(-1).is_falsy());
        assert!(!RawValue::Time(NaiveTime::from_hms_opt(0, 0, 0).unwrap()).is_falsy());
    }

    #[test]
    fn test_missing_column_reads_as_null() {
        let row = RawRow::new().with(SaleColumn::Folio, RawValue::Int(7));

        assert_eq!(row.folio(), &RawValue::Int(7));
        assert!(row.get(SaleColumn::Total).is_null());
        assert_eq!(row.len(), 1);
    }

    #[test]
    fn test_table_overwrite_keeps_position() {
        let mut table = TransactionTable::new();
        assert!(table.insert("7", record("A")).is_none());
        assert!(table.insert("9", record("B")).is_none());

        let replaced = table.insert("7", record("C"));

        assert_eq!(replaced.unwrap().status, "A");
        assert_eq!(table.len(), 2);
        assert_eq!(table.folios().collect::<Vec<_>>(), vec!["7", "9"]);
        assert_eq!(table.get("7").unwrap().status, "C");
    }

    #[test]
    fn test_table_head() {
        let table: TransactionTable = (1..=5)
            .map(|n| (n.to_string(), record("PAGADA")))
            .collect();

        let head = table.head(2);
        assert_eq!(head.folios().collect::<Vec<_>>(), vec!["1", "2"]);
        assert_eq!(table.head(50).len(), 5);
    }

    #[test]
    fn test_record_json_keys() {
        let json = serde_json::to_value(TransactionRecord::default()).unwrap();
        let object = json.as_object().unwrap();

        assert_eq!(object.len(), TransactionRecord::FIELD_COUNT);
        assert_eq!(object["diasCorte"], serde_json::json!(0));
        assert_eq!(object["saldoCliente"], serde_json::json!(0.0));
        assert_eq!(object["estado"], serde_json::json!(""));
    }

    #[test]
    fn test_fields_match_serialized_keys() {
        let json = serde_json::to_value(TransactionRecord::default()).unwrap();
        let object = json.as_object().unwrap();

        for (key, _) in TransactionRecord::default().fields() {
            assert!(object.contains_key(key), "missing key {key}");
        }
    }

    #[test]
    fn test_field_value_display() {
        assert_eq!(FieldValue::Decimal(0.0).to_string(), "0.0");
        assert_eq!(FieldValue::Decimal(150.5).to_string(), "150.5");
        assert_eq!(FieldValue::Integer(3).to_string(), "3");
        assert_eq!(FieldValue::Text("PAGADA").to_string(), "PAGADA");
    }

    #[test]
    fn test_table_serializes_in_insertion_order() {
        let mut table = TransactionTable::new();
        table.insert("20", record("B"));
        table.insert("10", record("A"));

        let json = serde_json::to_string(&table).unwrap();
        let first = json.find("\"20\"").unwrap();
        let second = json.find("\"10\"").unwrap();
        assert!(first < second);
    }
}
