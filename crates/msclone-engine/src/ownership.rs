//! Table ownership classification.
//!
//! The root tenant's tables share the bare prefix with platform-wide
//! registry tables and with every numbered tenant's tables (`wp_` matches
//! `wp_site` and `wp_5_options` alike). Classification makes that ambiguity
//! explicit instead of hiding it in a pattern match.

use tracing::debug;

use msclone_core::defaults::SHARED_TABLE_SUFFIXES;
use msclone_core::{SkippedTable, TableOwnership, Tenant};

/// Classify a table found under the root tenant's bare prefix.
///
/// - remainder after the prefix is a shared suffix → [`TableOwnership::SharedPlatformTable`]
/// - remainder starts with an ASCII digit → [`TableOwnership::OwnedByOtherTenant`]
/// - anything else → [`TableOwnership::OwnedByTenant`]
///
/// A table that does not start with `root_prefix` at all is reported as
/// owned by another tenant.
pub fn classify_table(table: &str, root_prefix: &str) -> TableOwnership {
    let Some(remainder) = table.strip_prefix(root_prefix) else {
        return TableOwnership::OwnedByOtherTenant;
    };

    if SHARED_TABLE_SUFFIXES.contains(&remainder) {
        TableOwnership::SharedPlatformTable
    } else if remainder.starts_with(|c: char| c.is_ascii_digit()) {
        TableOwnership::OwnedByOtherTenant
    } else {
        TableOwnership::OwnedByTenant
    }
}

/// Tables kept for cloning and tables excluded, in scan order.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct FilteredTables {
    pub kept: Vec<String>,
    pub skipped: Vec<SkippedTable>,
}

/// Split scanned tables into the ones `source` owns and the rest.
///
/// Only the root tenant needs filtering: a numbered tenant's prefix
/// (`wp_5_`) is unique to it.
pub fn filter_tables(source: &Tenant, tables: Vec<String>) -> FilteredTables {
    if !source.is_root() {
        return FilteredTables {
            kept: tables,
            skipped: Vec::new(),
        };
    }

    let mut filtered = FilteredTables::default();
    for table in tables {
        match classify_table(&table, &source.prefix) {
            TableOwnership::OwnedByTenant => filtered.kept.push(table),
            ownership => {
                debug!(
                    subsystem = "engine",
                    component = "filter",
                    db_table = %table,
                    ownership = %ownership,
                    "Skipping table not owned by the root tenant"
                );
                filtered.skipped.push(SkippedTable { table, ownership });
            }
        }
    }
    filtered
}
