//! Table catalog scan.

use tracing::info;

use msclone_core::{Error, Result, TableStore};

/// List every table starting with `prefix`.
///
/// Fails with [`Error::NoTables`] when nothing matches: an empty scan means
/// the source tenant has no data to clone, not that the clone succeeded.
pub async fn scan_tables(store: &dyn TableStore, prefix: &str) -> Result<Vec<String>> {
    let tables: Vec<String> = store
        .list_tables(prefix)
        .await?
        .into_iter()
        .filter(|t| t.starts_with(prefix))
        .collect();

    if tables.is_empty() {
        return Err(Error::NoTables(format!(
            "no tables start with prefix '{}'",
            prefix
        )));
    }

    info!(
        subsystem = "engine",
        component = "catalog",
        op = "scan",
        table_prefix = prefix,
        result_count = tables.len(),
        "Scanned source tables"
    );
    Ok(tables)
}
