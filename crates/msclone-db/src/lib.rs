//! # msclone-db
//!
//! MySQL database layer for msclone.
//!
//! This crate provides:
//! - Connection pool management
//! - Tenant resolution against the network registry tables
//! - Table catalog scan and table duplication primitives
//! - Identifier validation and quoting for DDL
//!
//! ## Example
//!
//! ```rust,ignore
//! use msclone_db::{Database, TenantId, TenantResolver};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let db = Database::connect("mysql://root@localhost/wordpress", "wp_").await?;
//!
//!     if let Some(tenant) = db.tenants.resolve(TenantId::new(5).unwrap()).await? {
//!         println!("{} -> {}", tenant.prefix, tenant.base_url);
//!     }
//!     Ok(())
//! }
//! ```
pub mod identifier;
pub mod pool;
pub mod tables;
pub mod tenants;

// Test fixtures for integration tests
pub mod test_fixtures;

// Re-export core types
pub use msclone_core::*;

pub use identifier::{escape_like, quote_identifier, validate_table_name, validate_table_prefix};
pub use pool::{create_pool, log_pool_metrics, pool_options};
pub use tables::MySqlTableStore;
pub use tenants::MySqlTenantResolver;

/// Combined database context.
#[derive(Clone)]
pub struct Database {
    /// The underlying connection pool.
    pub pool: sqlx::MySqlPool,
    /// Table catalog and duplication primitives.
    pub tables: MySqlTableStore,
    /// Tenant registry lookups.
    pub tenants: MySqlTenantResolver,
}

impl Database {
    /// Create a new Database instance from a connection pool.
    pub fn new(pool: sqlx::MySqlPool, base_prefix: &str) -> Result<Self> {
        Ok(Self {
            tables: MySqlTableStore::new(pool.clone()),
            tenants: MySqlTenantResolver::new(pool.clone(), base_prefix)?,
            pool,
        })
    }

    /// Create a new Database instance by connecting to the given URL.
    pub async fn connect(url: &str, base_prefix: &str) -> Result<Self> {
        let pool = create_pool(url).await?;
        Self::new(pool, base_prefix)
    }

    /// Get the underlying connection pool.
    pub fn pool(&self) -> &sqlx::MySqlPool {
        &self.pool
    }
}
