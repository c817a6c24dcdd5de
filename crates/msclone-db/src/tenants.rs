//! Tenant resolution against the network registry tables.

use async_trait::async_trait;
use sqlx::{MySqlPool, Row};
use tracing::debug;

use msclone_core::defaults::{NETWORK_TABLE_SUFFIX, REGISTRY_TABLE_SUFFIX, SITEURL_OPTION};
use msclone_core::{tenant_prefix, Error, Result, Tenant, TenantId, TenantResolver};

use crate::identifier::{quote_identifier, validate_table_prefix};
use crate::tables::MySqlTableStore;

/// MySQL implementation of [`TenantResolver`].
///
/// A tenant exists when the registry table (`{base}blogs`) has a row for its
/// ID. Its base URL is the `siteurl` option of its own option table, falling
/// back to the registry's domain and path.
#[derive(Clone)]
pub struct MySqlTenantResolver {
    pool: MySqlPool,
    base_prefix: String,
}

impl MySqlTenantResolver {
    /// Create a resolver for a network whose tables use `base_prefix`.
    pub fn new(pool: MySqlPool, base_prefix: impl Into<String>) -> Result<Self> {
        let base_prefix = base_prefix.into();
        validate_table_prefix(&base_prefix)?;
        Ok(Self { pool, base_prefix })
    }

    pub fn base_prefix(&self) -> &str {
        &self.base_prefix
    }

    fn registry_table(&self) -> String {
        format!("{}{}", self.base_prefix, REGISTRY_TABLE_SUFFIX)
    }

    async fn siteurl_option(&self, prefix: &str) -> Result<Option<String>> {
        let options_table = format!("{}{}", prefix, msclone_core::defaults::OPTIONS_TABLE_SUFFIX);
        let store = MySqlTableStore::new(self.pool.clone());
        if !store.table_exists(&options_table).await? {
            return Ok(None);
        }

        let value: Option<String> = sqlx::query_scalar(&format!(
            "SELECT option_value FROM {} WHERE option_name = ? LIMIT 1",
            quote_identifier(&options_table)?
        ))
        .bind(SITEURL_OPTION)
        .fetch_optional(&self.pool)
        .await
        .map_err(Error::Database)?;

        Ok(value.filter(|v| !v.is_empty()))
    }
}

/// Base URL built from a registry row: `http://{domain}{path}` without the
/// trailing slash.
pub fn registry_url(domain: &str, path: &str) -> String {
    format!("http://{}{}", domain, path)
        .trim_end_matches('/')
        .to_string()
}

#[async_trait]
impl TenantResolver for MySqlTenantResolver {
    async fn is_multisite(&self) -> Result<bool> {
        let store = MySqlTableStore::new(self.pool.clone());
        let registry = store.table_exists(&self.registry_table()).await?;
        let network = store
            .table_exists(&format!("{}{}", self.base_prefix, NETWORK_TABLE_SUFFIX))
            .await?;

        debug!(
            subsystem = "db",
            component = "tenants",
            op = "is_multisite",
            registry,
            network,
            "Checked network registry tables"
        );
        Ok(registry && network)
    }

    async fn resolve(&self, id: TenantId) -> Result<Option<Tenant>> {
        let row = sqlx::query(&format!(
            "SELECT CAST(domain AS CHAR) AS domain, CAST(path AS CHAR) AS path \
             FROM {} WHERE blog_id = ?",
            quote_identifier(&self.registry_table())?
        ))
        .bind(id.get())
        .fetch_optional(&self.pool)
        .await
        .map_err(Error::Database)?;

        let Some(row) = row else {
            return Ok(None);
        };
        let domain: String = row.try_get("domain").map_err(Error::Database)?;
        let path: String = row.try_get("path").map_err(Error::Database)?;

        let prefix = tenant_prefix(&self.base_prefix, id);
        let base_url = match self.siteurl_option(&prefix).await? {
            Some(url) => url,
            None => registry_url(&domain, &path),
        };

        debug!(
            subsystem = "db",
            component = "tenants",
            op = "resolve",
            tenant = %id,
            table_prefix = %prefix,
            base_url = %base_url,
            "Resolved tenant"
        );
        Ok(Some(Tenant::new(id, prefix, base_url)))
    }
}
