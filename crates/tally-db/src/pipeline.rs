//! # Sales Pipeline
//!
//! open → fetch → normalize → aggregate, in one call.
//!
//! ```text
//! fetch_sales(config)
//!   │
//!   ├── open_connection ── Err ──► Err(StoreError::Connection)   (no query, nothing to close)
//!   │
//!   ├── fetch_open_sales ─ Err ──┐
//!   │                            ├─► conn.close()  (exactly once)
//!   ├── Ok(rows) ────────────────┘
//!   │
//!   └── normalize_rows(rows) ──► Ok(TransactionTable)
//! ```

use tally_core::{normalize_rows, Diagnostics, TransactionTable};
use tracing::instrument;

use crate::connection::{open_connection, StoreConfig};
use crate::error::StoreResult;
use crate::repository::sale::SaleRepository;

/// Retrieves the open sales as a folio-keyed table.
///
/// ## Errors
/// - [`StoreError::Connection`](crate::StoreError::Connection) when the store
///   cannot be opened; the query is never attempted.
/// - `QueryFailed` / `Unexpected` when the query or row decoding fails.
#[instrument(skip_all, fields(target_db = %config.target()))]
pub async fn fetch_sales(
    config: &StoreConfig,
    diagnostics: &mut Diagnostics,
) -> StoreResult<TransactionTable> {
    let mut conn = open_connection(config, diagnostics).await?;

    let fetched = SaleRepository::new(&mut conn)
        .fetch_open_sales(diagnostics)
        .await;

    conn.close(diagnostics).await;

    let rows = fetched?;
    let table = normalize_rows(rows, diagnostics);

    diagnostics.info(format!("normalized {} sales records", table.len()));

    Ok(table)
}

/// Like [`fetch_sales`], but any failure is recorded as an error diagnostic
/// and an empty table is returned.
pub async fn fetch_sales_or_empty(
    config: &StoreConfig,
    diagnostics: &mut Diagnostics,
) -> TransactionTable {
    match fetch_sales(config, diagnostics).await {
        Ok(table) => table,
        Err(err) => {
            diagnostics.error(format!("sales retrieval failed: {err}"));
            TransactionTable::new()
        }
    }
}
