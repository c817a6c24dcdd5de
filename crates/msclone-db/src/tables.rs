//! MySQL table catalog and duplication primitives.
//!
//! Each statement runs on its own: MySQL commits DDL implicitly, so a
//! drop/create/copy sequence cannot be rolled back as a unit anyway.

use async_trait::async_trait;
use sqlx::MySqlPool;
use tracing::debug;

use msclone_core::{Error, Result, TableStore};

use crate::identifier::{escape_like, quote_identifier};

/// MySQL implementation of [`TableStore`].
#[derive(Clone)]
pub struct MySqlTableStore {
    pool: MySqlPool,
}

impl MySqlTableStore {
    /// Create a new MySqlTableStore with the given connection pool.
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    /// Whether a table with exactly this name exists in the current database.
    pub async fn table_exists(&self, table: &str) -> Result<bool> {
        let count: i64 = sqlx::query_scalar(
            r#"
            SELECT COUNT(*)
            FROM information_schema.tables
            WHERE table_schema = DATABASE()
                AND table_name = ?
            "#,
        )
        .bind(table)
        .fetch_one(&self.pool)
        .await
        .map_err(Error::Database)?;

        Ok(count > 0)
    }

    /// Number of rows in `table`.
    pub async fn row_count(&self, table: &str) -> Result<i64> {
        let count: i64 = sqlx::query_scalar(&format!(
            "SELECT COUNT(*) FROM {}",
            quote_identifier(table)?
        ))
        .fetch_one(&self.pool)
        .await
        .map_err(Error::Database)?;

        Ok(count)
    }
}

#[async_trait]
impl TableStore for MySqlTableStore {
    async fn list_tables(&self, prefix: &str) -> Result<Vec<String>> {
        let pattern = format!("{}%", escape_like(prefix));
        let tables: Vec<String> = sqlx::query_scalar(
            r#"
            SELECT CAST(table_name AS CHAR)
            FROM information_schema.tables
            WHERE table_schema = DATABASE()
                AND table_type = 'BASE TABLE'
                AND table_name LIKE ?
            ORDER BY table_name
            "#,
        )
        .bind(&pattern)
        .fetch_all(&self.pool)
        .await
        .map_err(Error::Database)?;

        debug!(
            subsystem = "db",
            component = "catalog",
            op = "list_tables",
            table_prefix = prefix,
            result_count = tables.len(),
            "Listed tables"
        );

        // LIKE collation may be case-insensitive; keep exact prefix matches only.
        Ok(tables
            .into_iter()
            .filter(|t| t.starts_with(prefix))
            .collect())
    }

    async fn drop_table(&self, table: &str) -> Result<()> {
        sqlx::query(&format!("DROP TABLE IF EXISTS {}", quote_identifier(table)?))
            .execute(&self.pool)
            .await
            .map_err(Error::Database)?;
        Ok(())
    }

    async fn create_table_like(&self, destination: &str, source: &str) -> Result<()> {
        sqlx::query(&format!(
            "CREATE TABLE {} LIKE {}",
            quote_identifier(destination)?,
            quote_identifier(source)?
        ))
        .execute(&self.pool)
        .await
        .map_err(Error::Database)?;
        Ok(())
    }

    async fn copy_rows(&self, destination: &str, source: &str) -> Result<u64> {
        let result = sqlx::query(&format!(
            "INSERT INTO {} SELECT * FROM {}",
            quote_identifier(destination)?,
            quote_identifier(source)?
        ))
        .execute(&self.pool)
        .await
        .map_err(Error::Database)?;
        Ok(result.rows_affected())
    }

    async fn rename_option(&self, options_table: &str, from: &str, to: &str) -> Result<u64> {
        let result = sqlx::query(&format!(
            "UPDATE {} SET option_name = ? WHERE option_name = ?",
            quote_identifier(options_table)?
        ))
        .bind(to)
        .bind(from)
        .execute(&self.pool)
        .await
        .map_err(Error::Database)?;
        Ok(result.rows_affected())
    }

    async fn set_option_values(
        &self,
        options_table: &str,
        names: &[&str],
        value: &str,
    ) -> Result<u64> {
        if names.is_empty() {
            return Ok(0);
        }
        let placeholders = vec!["?"; names.len()].join(", ");
        let sql = format!(
            "UPDATE {} SET option_value = ? WHERE option_name IN ({})",
            quote_identifier(options_table)?,
            placeholders
        );

        let mut query = sqlx::query(&sql).bind(value);
        for name in names {
            query = query.bind(*name);
        }
        let result = query.execute(&self.pool).await.map_err(Error::Database)?;
        Ok(result.rows_affected())
    }
}
