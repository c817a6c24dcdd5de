//! Collaborator traits for the clone engine.
//!
//! Every resource the engine touches (the tenant registry, the shared
//! database, the platform's own command-line tools) is reached through one of
//! these traits and handed to the engine explicitly, so any of them can be
//! replaced by an in-memory fake.

use async_trait::async_trait;

use crate::error::Result;
use crate::models::{Tenant, TenantId};

/// Resolves tenant IDs to their table prefix and base URL.
#[async_trait]
pub trait TenantResolver: Send + Sync {
    /// Whether the platform runs in multi-tenant mode at all.
    async fn is_multisite(&self) -> Result<bool>;

    /// Look up a tenant. `Ok(None)` when no tenant has this ID.
    async fn resolve(&self, id: TenantId) -> Result<Option<Tenant>>;
}

/// Raw table operations on the shared database.
///
/// Table names passed in come from [`TableStore::list_tables`] or are derived
/// from a tenant prefix; implementations must still quote them safely.
#[async_trait]
pub trait TableStore: Send + Sync {
    /// Names of all tables starting with `prefix`, matched literally.
    async fn list_tables(&self, prefix: &str) -> Result<Vec<String>>;

    /// Drop `table` if it exists.
    async fn drop_table(&self, table: &str) -> Result<()>;

    /// Create `destination` with the structure of `source` and no rows.
    async fn create_table_like(&self, destination: &str, source: &str) -> Result<()>;

    /// Copy every row of `source` into `destination`. Returns rows copied.
    async fn copy_rows(&self, destination: &str, source: &str) -> Result<u64>;

    /// Rename an option key in `options_table`. Returns rows affected.
    async fn rename_option(&self, options_table: &str, from: &str, to: &str) -> Result<u64>;

    /// Overwrite the value of each option in `names`. Returns rows affected.
    async fn set_option_values(
        &self,
        options_table: &str,
        names: &[&str],
        value: &str,
    ) -> Result<u64>;
}

/// Replaces one base URL with another across a tenant's tables.
#[async_trait]
pub trait ReferenceRewriter: Send + Sync {
    /// Replace `old_url` with `new_url` in every table whose name starts with
    /// `table_prefix`, across the whole network.
    async fn rewrite(&self, table_prefix: &str, old_url: &str, new_url: &str) -> Result<()>;
}

/// Invalidates platform-wide caches after a clone.
#[async_trait]
pub trait CacheFlusher: Send + Sync {
    async fn flush(&self) -> Result<()>;
}
