//! In-memory collaborators for deterministic engine tests.
//!
//! ```rust,ignore
//! let store = MemoryTableStore::new()
//!     .with_table("wp_5_options", vec![option_row("home", "http://five.test")]);
//! let resolver = StaticTenantResolver::network("wp_")
//!     .with_tenant(5, "http://five.test");
//! ```

use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use msclone_core::{
    tenant_prefix, CacheFlusher, Error, ReferenceRewriter, Result, TableStore, Tenant, TenantId,
    TenantResolver,
};

/// One row: column name to value.
pub type Row = BTreeMap<String, String>;

/// Row of an option table.
pub fn option_row(name: &str, value: &str) -> Row {
    Row::from([
        ("option_name".to_string(), name.to_string()),
        ("option_value".to_string(), value.to_string()),
    ])
}

/// Row with a single `content` column.
pub fn content_row(content: &str) -> Row {
    Row::from([("content".to_string(), content.to_string())])
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemoryTable {
    /// Stand-in for the table structure, copied by `create_table_like`.
    pub schema: String,
    pub rows: Vec<Row>,
}

/// Table store over an in-memory map.
#[derive(Clone, Default)]
pub struct MemoryTableStore {
    tables: Arc<Mutex<BTreeMap<String, MemoryTable>>>,
    mutations: Arc<AtomicUsize>,
    fail_create: Arc<Mutex<Option<String>>>,
}

impl MemoryTableStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a table; its schema is derived from the name.
    pub fn with_table(self, name: &str, rows: Vec<Row>) -> Self {
        self.tables.lock().unwrap().insert(
            name.to_string(),
            MemoryTable {
                schema: format!("schema-of-{}", name),
                rows,
            },
        );
        self
    }

    /// Make `create_table_like` fail for this destination.
    pub fn fail_create_of(self, destination: &str) -> Self {
        *self.fail_create.lock().unwrap() = Some(destination.to_string());
        self
    }

    pub fn table(&self, name: &str) -> Option<MemoryTable> {
        self.tables.lock().unwrap().get(name).cloned()
    }

    pub fn table_names(&self) -> Vec<String> {
        self.tables.lock().unwrap().keys().cloned().collect()
    }

    /// Value of an option, if the table and the option exist.
    pub fn option(&self, table: &str, name: &str) -> Option<String> {
        self.table(table)?
            .rows
            .into_iter()
            .find(|row| row.get("option_name").map(String::as_str) == Some(name))
            .and_then(|row| row.get("option_value").cloned())
    }

    /// Number of mutating calls received.
    pub fn mutation_count(&self) -> usize {
        self.mutations.load(Ordering::SeqCst)
    }

    /// Snapshot of every table.
    pub fn snapshot(&self) -> BTreeMap<String, MemoryTable> {
        self.tables.lock().unwrap().clone()
    }

    fn record_mutation(&self) {
        self.mutations.fetch_add(1, Ordering::SeqCst);
    }

    /// Replace `old` with `new` in every value of every table starting with
    /// `prefix`.
    fn replace_in_tables(&self, prefix: &str, old: &str, new: &str) {
        let mut tables = self.tables.lock().unwrap();
        for (_, table) in tables.iter_mut().filter(|(name, _)| name.starts_with(prefix)) {
            for row in &mut table.rows {
                for value in row.values_mut() {
                    *value = value.replace(old, new);
                }
            }
        }
    }
}

#[async_trait]
impl TableStore for MemoryTableStore {
    async fn list_tables(&self, prefix: &str) -> Result<Vec<String>> {
        Ok(self
            .tables
            .lock()
            .unwrap()
            .keys()
            .filter(|name| name.starts_with(prefix))
            .cloned()
            .collect())
    }

    async fn drop_table(&self, table: &str) -> Result<()> {
        self.record_mutation();
        self.tables.lock().unwrap().remove(table);
        Ok(())
    }

    async fn create_table_like(&self, destination: &str, source: &str) -> Result<()> {
        self.record_mutation();
        if self.fail_create.lock().unwrap().as_deref() == Some(destination) {
            return Err(Error::Internal(format!(
                "injected failure creating {}",
                destination
            )));
        }
        let mut tables = self.tables.lock().unwrap();
        if tables.contains_key(destination) {
            return Err(Error::InvalidInput(format!(
                "table {} already exists",
                destination
            )));
        }
        let schema = tables
            .get(source)
            .ok_or_else(|| Error::Internal(format!("no such table {}", source)))?
            .schema
            .clone();
        tables.insert(
            destination.to_string(),
            MemoryTable {
                schema,
                rows: Vec::new(),
            },
        );
        Ok(())
    }

    async fn copy_rows(&self, destination: &str, source: &str) -> Result<u64> {
        self.record_mutation();
        let mut tables = self.tables.lock().unwrap();
        let rows = tables
            .get(source)
            .ok_or_else(|| Error::Internal(format!("no such table {}", source)))?
            .rows
            .clone();
        let count = rows.len() as u64;
        tables
            .get_mut(destination)
            .ok_or_else(|| Error::Internal(format!("no such table {}", destination)))?
            .rows
            .extend(rows);
        Ok(count)
    }

    async fn rename_option(&self, options_table: &str, from: &str, to: &str) -> Result<u64> {
        self.record_mutation();
        let mut tables = self.tables.lock().unwrap();
        let Some(table) = tables.get_mut(options_table) else {
            return Err(Error::Internal(format!("no such table {}", options_table)));
        };
        let mut affected = 0;
        for row in &mut table.rows {
            if let Some(name) = row.get_mut("option_name") {
                if *name == from {
                    *name = to.to_string();
                    affected += 1;
                }
            }
        }
        Ok(affected)
    }

    async fn set_option_values(
        &self,
        options_table: &str,
        names: &[&str],
        value: &str,
    ) -> Result<u64> {
        self.record_mutation();
        let mut tables = self.tables.lock().unwrap();
        let Some(table) = tables.get_mut(options_table) else {
            return Err(Error::Internal(format!("no such table {}", options_table)));
        };
        let mut affected = 0;
        for row in &mut table.rows {
            let matches = row
                .get("option_name")
                .is_some_and(|name| names.contains(&name.as_str()));
            if matches {
                row.insert("option_value".to_string(), value.to_string());
                affected += 1;
            }
        }
        Ok(affected)
    }
}

/// Tenant registry with a fixed set of tenants.
#[derive(Clone)]
pub struct StaticTenantResolver {
    base_prefix: String,
    multisite: bool,
    tenants: HashMap<TenantId, Tenant>,
}

impl StaticTenantResolver {
    /// Multi-tenant network with no tenants yet.
    pub fn network(base_prefix: &str) -> Self {
        Self {
            base_prefix: base_prefix.to_string(),
            multisite: true,
            tenants: HashMap::new(),
        }
    }

    /// Single-tenant installation.
    pub fn single_site(base_prefix: &str) -> Self {
        Self {
            multisite: false,
            ..Self::network(base_prefix)
        }
    }

    pub fn with_tenant(mut self, id: u64, base_url: &str) -> Self {
        let id = TenantId::new(id).unwrap();
        self.tenants.insert(
            id,
            Tenant::new(id, tenant_prefix(&self.base_prefix, id), base_url),
        );
        self
    }
}

#[async_trait]
impl TenantResolver for StaticTenantResolver {
    async fn is_multisite(&self) -> Result<bool> {
        Ok(self.multisite)
    }

    async fn resolve(&self, id: TenantId) -> Result<Option<Tenant>> {
        Ok(self.tenants.get(&id).cloned())
    }
}

/// One recorded rewrite call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RewriteCall {
    pub table_prefix: String,
    pub old_url: String,
    pub new_url: String,
}

/// Rewriter that applies replacements to a [`MemoryTableStore`] and records
/// every call.
#[derive(Clone)]
pub struct MemoryRewriter {
    store: MemoryTableStore,
    calls: Arc<Mutex<Vec<RewriteCall>>>,
}

impl MemoryRewriter {
    pub fn new(store: MemoryTableStore) -> Self {
        Self {
            store,
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn calls(&self) -> Vec<RewriteCall> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl ReferenceRewriter for MemoryRewriter {
    async fn rewrite(&self, table_prefix: &str, old_url: &str, new_url: &str) -> Result<()> {
        self.calls.lock().unwrap().push(RewriteCall {
            table_prefix: table_prefix.to_string(),
            old_url: old_url.to_string(),
            new_url: new_url.to_string(),
        });
        self.store.replace_in_tables(table_prefix, old_url, new_url);
        Ok(())
    }
}

/// Cache flusher that only counts calls.
#[derive(Clone, Default)]
pub struct RecordingCacheFlusher {
    flushes: Arc<AtomicUsize>,
}

impl RecordingCacheFlusher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn flush_count(&self) -> usize {
        self.flushes.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl CacheFlusher for RecordingCacheFlusher {
    async fn flush(&self) -> Result<()> {
        self.flushes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}
