//! # Tally Sales Report
//!
//! Prints the open sales from the store.
//!
//! ## Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         sales-report                                    │
//! │                                                                         │
//! │  args + ReportConfig::load() (.env, TALLY_*)                           │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  strict?  ── yes ──► fetch_sales()          Err ──► exit 1             │
//! │           ── no  ──► fetch_sales_or_empty() Err ──► empty table        │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  empty? ──► error "no sales data", exit 0                              │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  first N records ──► text blocks + FORMATO JSON  (stdout)              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```bash
//! TALLY_DB_BACKEND=sqlite TALLY_DB_NAME=./ventas_dev.db \
//!     cargo run -p tally-report --bin sales-report -- --limit 5
//! ```

use std::env;
use std::io::{self, Write};
use std::process::ExitCode;

use anyhow::{bail, Context};
use tally_core::{Diagnostics, TransactionTable};
use tally_db::{fetch_sales, fetch_sales_or_empty};
use tally_report::config::ReportConfig;
use tally_report::report::{render_json, render_report};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

/// Command line options. Flags override the environment.
#[derive(Debug, Default)]
struct Args {
    limit: Option<usize>,
    json_only: bool,
    strict: bool,
    help: bool,
}

fn parse_args() -> anyhow::Result<Args> {
    let args: Vec<String> = env::args().collect();
    let mut parsed = Args::default();

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--limit" | "-n" => {
                let value = args.get(i + 1).context("--limit needs a value")?;
                parsed.limit = Some(
                    value
                        .parse()
                        .with_context(|| format!("invalid --limit value: {value}"))?,
                );
                i += 1;
            }
            "--json" => parsed.json_only = true,
            "--strict" => parsed.strict = true,
            "--help" | "-h" => parsed.help = true,
            other => bail!("unknown argument: {other}"),
        }
        i += 1;
    }

    Ok(parsed)
}

fn print_help() {
    println!("Tally Sales Report");
    println!();
    println!("Usage: sales-report [OPTIONS]");
    println!();
    println!("Options:");
    println!("  -n, --limit <N>    Records to print (default: TALLY_REPORT_LIMIT or 20)");
    println!("      --json         Print only the JSON section");
    println!("      --strict       Exit non-zero when the store cannot be read");
    println!("  -h, --help         Show this help message");
    println!();
    println!("Store settings come from TALLY_DB_BACKEND, TALLY_DB_HOST, TALLY_DB_NAME,");
    println!("TALLY_DB_USER and TALLY_DB_PASSWORD (a .env file is read if present).");
}

/// Initializes the tracing subscriber.
///
/// Filter comes from `RUST_LOG`, defaulting to app debug logs and quiet sqlx.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,tally=debug,sqlx=warn"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<ExitCode> {
    init_tracing();

    let args = parse_args()?;
    if args.help {
        print_help();
        return Ok(ExitCode::SUCCESS);
    }

    let config = ReportConfig::load().context("failed to load configuration")?;
    let strict = config.strict || args.strict;
    let limit = args.limit.unwrap_or(config.limit);

    info!(
        target_db = %config.store.target(),
        limit,
        strict,
        "Configuration loaded"
    );

    info!("Fetching sales data...");
    let mut diagnostics = Diagnostics::new();

    let table: TransactionTable = if strict {
        match fetch_sales(&config.store, &mut diagnostics).await {
            Ok(table) => table,
            Err(err) => {
                error!(%err, "Sales retrieval failed");
                return Ok(ExitCode::FAILURE);
            }
        }
    } else {
        fetch_sales_or_empty(&config.store, &mut diagnostics).await
    };

    if table.is_empty() {
        error!("No sales data retrieved");
        return Ok(ExitCode::SUCCESS);
    }

    info!(records = table.len(), "Total sales records");
    info!(
        warnings = diagnostics.warnings().count(),
        "Normalization finished"
    );

    let shown = table.head(limit);
    info!(shown = shown.len(), "Printing first sales records");

    let stdout = io::stdout();
    let mut out = stdout.lock();
    if args.json_only {
        render_json(&shown, &mut out)?;
    } else {
        render_report(&shown, &mut out)?;
    }
    out.flush()?;

    Ok(ExitCode::SUCCESS)
}
