//! Table duplication.

use std::time::Instant;

use tracing::info;

use msclone_core::{Error, Result, TablePlan, TableStore};
use msclone_db::validate_table_name;

/// Destination name for `table`: the leading `source_prefix` replaced by
/// `target_prefix`. Occurrences of the prefix further into the name are left
/// alone.
pub fn destination_name(table: &str, source_prefix: &str, target_prefix: &str) -> Result<String> {
    let rest = table.strip_prefix(source_prefix).ok_or_else(|| {
        Error::Internal(format!(
            "table '{}' does not start with prefix '{}'",
            table, source_prefix
        ))
    })?;
    Ok(format!("{}{}", target_prefix, rest))
}

/// Pair every table with its destination name.
///
/// Every source and destination name is checked here, before the first
/// table is touched. A name MySQL cannot hold (for instance a destination
/// pushed past 64 characters by a longer target prefix) fails the whole
/// plan with [`Error::Precondition`].
pub fn plan_tables(
    tables: &[String],
    source_prefix: &str,
    target_prefix: &str,
) -> Result<Vec<TablePlan>> {
    tables
        .iter()
        .map(|table| {
            let plan = TablePlan {
                source: table.clone(),
                destination: destination_name(table, source_prefix, target_prefix)?,
            };
            check_name(&plan.source)?;
            check_name(&plan.destination)?;
            Ok(plan)
        })
        .collect()
}

fn check_name(table: &str) -> Result<()> {
    validate_table_name(table).map_err(|e| {
        Error::Precondition(format!("Cannot clone table '{}': {}", table, e))
    })
}

/// Replace each destination table with a copy of its source.
///
/// Every step is logged before it runs, in dry-run too, so a dry run prints
/// exactly what a real run would do. The first failure aborts; tables already
/// copied stay copied. Returns the total number of rows copied.
pub async fn duplicate_tables(
    store: &dyn TableStore,
    plans: &[TablePlan],
    dry_run: bool,
) -> Result<u64> {
    let mut rows_copied = 0;

    for plan in plans {
        let start = Instant::now();
        info!(
            subsystem = "engine",
            component = "duplicator",
            db_table = %plan.source,
            dest_table = %plan.destination,
            dry_run,
            "Source table: {} => Destination table: {}",
            plan.source,
            plan.destination
        );

        info!(
            subsystem = "engine",
            component = "duplicator",
            op = "drop",
            dry_run,
            "DROP TABLE IF EXISTS {}",
            plan.destination
        );
        if !dry_run {
            store.drop_table(&plan.destination).await?;
        }

        info!(
            subsystem = "engine",
            component = "duplicator",
            op = "create_like",
            dry_run,
            "CREATE TABLE {} LIKE {}",
            plan.destination,
            plan.source
        );
        if !dry_run {
            store
                .create_table_like(&plan.destination, &plan.source)
                .await?;
        }

        info!(
            subsystem = "engine",
            component = "duplicator",
            op = "copy_rows",
            dry_run,
            "INSERT INTO {} SELECT * FROM {}",
            plan.destination,
            plan.source
        );
        if !dry_run {
            let rows = store.copy_rows(&plan.destination, &plan.source).await?;
            rows_copied += rows;
            info!(
                subsystem = "engine",
                component = "duplicator",
                dest_table = %plan.destination,
                rows,
                duration_ms = start.elapsed().as_millis() as u64,
                "Table copied"
            );
        }
    }

    Ok(rows_copied)
}
