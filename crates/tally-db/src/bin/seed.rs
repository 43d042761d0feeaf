//! # Seed Data Generator
//!
//! Creates a local SQLite `Ventas` store and fills it with sales for
//! development.
//!
//! ## Usage
//! ```bash
//! # Generate 200 sales (default)
//! cargo run -p tally-db --bin seed
//!
//! # Generate custom amount
//! cargo run -p tally-db --bin seed -- --count 1000
//!
//! # Specify database path
//! cargo run -p tally-db --bin seed -- --db ./data/ventas.db
//! ```
//!
//! ## Generated Sales
//! The data exercises every normalization path:
//! - Open statuses (`PAGADA`, `PENDIENTE`, `CREDITO`) plus `CANCELADA` rows
//!   and rows with a NULL status, both of which the report never shows
//! - NULL totals and balances
//! - Customer names and sellers padded with whitespace
//! - One folio written twice (the later row wins in the report)
//!
//! Point the report at the result with `TALLY_DB_BACKEND=sqlite` and
//! `TALLY_DB_NAME=./ventas_dev.db`.

use chrono::{Duration, NaiveDate, NaiveTime};
use sqlx::sqlite::{SqliteConnectOptions, SqliteConnection};
use sqlx::{ConnectOptions, Connection};
use std::env;
use tally_core::{CANCELLED_STATUS, DATE_FORMAT, TIME_FORMAT};
use tally_db::VENTAS_SQLITE_SCHEMA;

const DEFAULT_COUNT: usize = 200;
const FIRST_FOLIO: i64 = 10_000;

/// Open statuses, cycled through.
const STATUSES: &[&str] = &["PAGADA", "PENDIENTE", "CREDITO"];

const CUSTOMERS: &[(&str, &str)] = &[
    ("C001", "Ana López"),
    ("C002", "Bruno Díaz"),
    ("C003", "Carmen Ruiz"),
    ("C004", "Diego Martínez"),
    ("C005", "Elena Gómez"),
    ("C006", "Fernando Núñez"),
    ("C007", "Gabriela Peña"),
    ("C008", "Público en General"),
];

const SELLERS: &[&str] = &["MARIO", "LUCIA", "PEDRO", "SOFIA"];

const PAYMENT_METHODS: &[&str] = &["EFECTIVO", "TARJETA", "TRANSFERENCIA", "CREDITO"];

/// One generated `Ventas` row.
struct SeedSale {
    folio: i64,
    status: Option<&'static str>,
    customer_code: &'static str,
    customer_name: String,
    date: NaiveDate,
    time: NaiveTime,
    total: Option<f64>,
    remaining: Option<f64>,
    amount_paid: f64,
    change: String,
    ticket: String,
    cut_number: i64,
    salesperson: String,
    payment_method: &'static str,
    credit_days: i64,
    items: i64,
    advance_payment: Option<f64>,
    customer_balance: Option<f64>,
    register: i64,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Parse command line arguments
    let args: Vec<String> = env::args().collect();

    let mut count: usize = DEFAULT_COUNT;
    let mut db_path = String::from("./ventas_dev.db");

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--count" | "-c" => {
                if i + 1 < args.len() {
                    count = parse_count(&args[i + 1])?;
                    i += 1;
                }
            }
            "--db" | "-d" => {
                if i + 1 < args.len() {
                    db_path = args[i + 1].clone();
                    i += 1;
                }
            }
            "--help" | "-h" => {
                println!("Tally Seed Data Generator");
                println!();
                println!("Usage: seed [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -c, --count <N>    Number of sales to generate (default: 200)");
                println!("  -d, --db <PATH>    Database file path (default: ./ventas_dev.db)");
                println!("  -h, --help         Show this help message");
                return Ok(());
            }
            _ => {}
        }
        i += 1;
    }

    println!("🌱 Tally Seed Data Generator");
    println!("============================");
    println!("Database: {}", db_path);
    println!("Sales:    {}", count);
    println!();

    let mut conn = SqliteConnectOptions::new()
        .filename(&db_path)
        .create_if_missing(true)
        .connect()
        .await?;

    sqlx::raw_sql(VENTAS_SQLITE_SCHEMA).execute(&mut conn).await?;

    println!("✓ Connected to database");
    println!("✓ Ventas table ready");

    let existing: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM Ventas")
        .fetch_one(&mut conn)
        .await?;
    if existing > 0 {
        println!("⚠ Database already has {} sales", existing);
        println!("  Skipping seed to avoid duplicates.");
        println!("  Delete the database file to regenerate.");
        conn.close().await?;
        return Ok(());
    }

    println!();
    println!("Generating sales...");

    let start = std::time::Instant::now();
    let mut sales: Vec<SeedSale> = (0..count).map(generate_sale).collect();

    // Repeat the first folio once at the end.
    if sales.len() > 1 {
        let mut repeat = generate_sale(count);
        repeat.folio = FIRST_FOLIO;
        repeat.status = Some("PAGADA");
        sales.push(repeat);
    }

    let inserted = insert_sales(&mut conn, &sales).await?;

    let elapsed = start.elapsed();
    println!();
    println!("✓ Inserted {} rows in {:?}", inserted, elapsed);

    let (cancelled, no_status): (i64, i64) = sqlx::query_as(
        "SELECT \
         COALESCE(SUM(CASE WHEN Estado = ?1 THEN 1 ELSE 0 END), 0), \
         COALESCE(SUM(CASE WHEN Estado IS NULL THEN 1 ELSE 0 END), 0) \
         FROM Ventas",
    )
    .bind(CANCELLED_STATUS)
    .fetch_one(&mut conn)
    .await?;
    println!("  Cancelled: {}", cancelled);
    println!("  No status: {}", no_status);

    conn.close().await?;

    println!();
    println!("✓ Seed complete!");

    Ok(())
}

/// Inserts all rows in one transaction.
async fn insert_sales(
    conn: &mut SqliteConnection,
    sales: &[SeedSale],
) -> Result<usize, sqlx::Error> {
    let mut tx = conn.begin().await?;

    for (inserted, sale) in sales.iter().enumerate() {
        sqlx::query(
            r#"
            INSERT INTO Ventas (
                Folio, Estado, CveCte, Cliente, Fecha, Hora,
                Total, Restante, FechaPago, Paga, Cambio, Ticket,
                Condiciones, FechaProg, Corte, Vendedor, ComoPago, DiasCred,
                IntCred, Articulos, Anticipo, FolioPago, SaldoCliente, Caja
            ) VALUES (
                ?1, ?2, ?3, ?4, ?5, ?6,
                ?7, ?8, ?9, ?10, ?11, ?12,
                ?13, ?14, ?15, ?16, ?17, ?18,
                ?19, ?20, ?21, ?22, ?23, ?24
            )
            "#,
        )
        .bind(sale.folio)
        .bind(sale.status)
        .bind(sale.customer_code)
        .bind(&sale.customer_name)
        .bind(sale.date.format(DATE_FORMAT).to_string())
        .bind(sale.time.format(TIME_FORMAT).to_string())
        .bind(sale.total)
        .bind(sale.remaining)
        .bind(payment_date(sale))
        .bind(sale.amount_paid)
        .bind(&sale.change)
        .bind(&sale.ticket)
        .bind(terms(sale))
        .bind(scheduled_date(sale))
        .bind(sale.cut_number)
        .bind(&sale.salesperson)
        .bind(sale.payment_method)
        .bind(sale.credit_days)
        .bind(if sale.credit_days > 0 { "2.5" } else { "" })
        .bind(sale.items.to_string())
        .bind(sale.advance_payment)
        .bind(format!("P-{}", sale.folio))
        .bind(sale.customer_balance)
        .bind(sale.register)
        .execute(&mut *tx)
        .await?;

        if (inserted + 1) % 100 == 0 {
            println!("  Inserted {} rows...", inserted + 1);
        }
    }

    tx.commit().await?;

    Ok(sales.len())
}

/// Generates a single sale from its index.
fn generate_sale(seed: usize) -> SeedSale {
    let base_date = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap_or_default();
    let (customer_code, customer_name) = CUSTOMERS[seed % CUSTOMERS.len()];

    // Every 10th sale is cancelled, every 17th has no status.
    let status = if seed % 17 == 16 {
        None
    } else if seed % 10 == 9 {
        Some(CANCELLED_STATUS)
    } else {
        Some(STATUSES[seed % STATUSES.len()])
    };

    // Price: $25.00 - $1,024.50
    let total = 25.0 + ((seed * 37) % 2000) as f64 * 0.5;
    let on_credit = status == Some("CREDITO");
    let amount_paid = if on_credit { 0.0 } else { (total / 50.0).ceil() * 50.0 };

    // Padded strings every 5th sale.
    let customer_name = if seed % 5 == 0 {
        format!("  {}   ", customer_name)
    } else {
        customer_name.to_string()
    };
    let seller = SELLERS[seed % SELLERS.len()];
    let salesperson = if seed % 5 == 2 {
        format!(" {} ", seller)
    } else {
        seller.to_string()
    };

    let seconds = 8 * 3600 + ((seed * 523) % (12 * 3600)) as u32;

    SeedSale {
        folio: FIRST_FOLIO + seed as i64,
        status,
        customer_code,
        customer_name,
        date: base_date + Duration::days((seed % 120) as i64),
        time: NaiveTime::from_num_seconds_from_midnight_opt(seconds, 0).unwrap_or_default(),
        // NULL numerics every 7th sale.
        total: if seed % 7 == 3 { None } else { Some(total) },
        remaining: if seed % 7 == 3 {
            None
        } else if on_credit {
            Some(total)
        } else {
            Some(0.0)
        },
        amount_paid,
        change: format!("{:.2}", (amount_paid - total).max(0.0)),
        ticket: format!("T{:06}", seed),
        cut_number: (seed / 25) as i64 + 1,
        salesperson,
        payment_method: if on_credit {
            "CREDITO"
        } else {
            PAYMENT_METHODS[seed % (PAYMENT_METHODS.len() - 1)]
        },
        credit_days: if on_credit { 30 } else { 0 },
        items: (seed % 9) as i64 + 1,
        advance_payment: if seed % 11 == 0 { None } else { Some(0.0) },
        customer_balance: if on_credit { Some(total) } else { None },
        register: (seed % 3) as i64 + 1,
    }
}

fn payment_date(sale: &SeedSale) -> Option<String> {
    (sale.credit_days == 0).then(|| sale.date.format(DATE_FORMAT).to_string())
}

fn scheduled_date(sale: &SeedSale) -> Option<String> {
    (sale.credit_days > 0).then(|| {
        (sale.date + Duration::days(sale.credit_days))
            .format(DATE_FORMAT)
            .to_string()
    })
}

fn terms(sale: &SeedSale) -> &'static str {
    if sale.credit_days > 0 {
        "CREDITO 30 DIAS"
    } else {
        "CONTADO"
    }
}

/// Parses `--count`. Anything but a non-negative integer is an error.
fn parse_count(raw: &str) -> Result<usize, String> {
    raw.trim()
        .parse()
        .map_err(|_| format!("invalid --count value: {raw:?} (expected a non-negative integer)"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_count() {
        assert_eq!(parse_count("500"), Ok(500));
        assert_eq!(parse_count(" 0 "), Ok(0));
        assert!(parse_count("abc").is_err());
        assert!(parse_count("-5").is_err());
        assert!(parse_count("").is_err());
    }

    #[test]
    fn test_generated_sales_cover_edge_cases() {
        let sales: Vec<SeedSale> = (0..DEFAULT_COUNT).map(generate_sale).collect();

        assert!(sales.iter().any(|s| s.status == Some(CANCELLED_STATUS)));
        assert!(sales.iter().any(|s| s.status.is_none()));
        assert!(sales.iter().any(|s| s.total.is_none()));
        assert!(sales.iter().any(|s| s.customer_name != s.customer_name.trim()));
    }
}
