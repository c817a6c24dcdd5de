//! Runtime configuration.
//!
//! Loaded from environment variables (a `.env` file is honoured by the
//! binary through `dotenvy`), then overridden by command-line flags.
//!
//! | Variable | Default |
//! |----------|---------|
//! | `DATABASE_URL` | `mysql://root@localhost/wordpress` |
//! | `MSCLONE_TABLE_PREFIX` | `wp_` |
//! | `MSCLONE_UPLOADS_DIR` | `wp-content/uploads` |
//! | `MSCLONE_WP_CLI` | `wp` |
//! | `MSCLONE_WP_PATH` | unset |
//! | `MSCLONE_WP_CLI_ARGS` | unset (whitespace-separated) |

use std::path::PathBuf;

use serde::Serialize;
use tracing::debug;

use msclone_core::{defaults, Error, Result};
use msclone_db::validate_table_prefix;

use crate::wp_cli::WpCli;

/// Configuration of one engine run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CloneConfig {
    #[serde(skip_serializing)]
    pub database_url: String,
    /// Base table prefix of the network.
    pub table_prefix: String,
    /// Upload root of the network.
    pub uploads_dir: PathBuf,
    /// Platform CLI binary.
    pub wp_cli: String,
    /// Installation directory passed to the platform CLI.
    pub wp_path: Option<PathBuf>,
    /// Extra arguments for every platform CLI call.
    pub wp_cli_args: Vec<String>,
}

impl Default for CloneConfig {
    fn default() -> Self {
        Self {
            database_url: defaults::DATABASE_URL.to_string(),
            table_prefix: defaults::TABLE_PREFIX.to_string(),
            uploads_dir: PathBuf::from(defaults::UPLOADS_DIR),
            wp_cli: defaults::WP_CLI_BIN.to_string(),
            wp_path: None,
            wp_cli_args: Vec::new(),
        }
    }
}

impl CloneConfig {
    /// Load from the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load from an arbitrary variable lookup. Unset or empty values fall
    /// back to the defaults.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let base = Self::default();

        let config = Self {
            database_url: get("DATABASE_URL").unwrap_or(base.database_url),
            table_prefix: get("MSCLONE_TABLE_PREFIX").unwrap_or(base.table_prefix),
            uploads_dir: get("MSCLONE_UPLOADS_DIR")
                .map(PathBuf::from)
                .unwrap_or(base.uploads_dir),
            wp_cli: get("MSCLONE_WP_CLI").unwrap_or(base.wp_cli),
            wp_path: get("MSCLONE_WP_PATH").map(PathBuf::from),
            wp_cli_args: get("MSCLONE_WP_CLI_ARGS")
                .map(|v| v.split_whitespace().map(String::from).collect())
                .unwrap_or_default(),
        };
        debug!(
            subsystem = "engine",
            component = "config",
            table_prefix = %config.table_prefix,
            uploads_dir = %config.uploads_dir.display(),
            wp_cli = %config.wp_cli,
            "Loaded configuration"
        );
        config
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<()> {
        if self.database_url.trim().is_empty() {
            return Err(Error::Config("database URL cannot be empty".to_string()));
        }
        if !self.database_url.starts_with("mysql://") && !self.database_url.starts_with("mariadb://")
        {
            return Err(Error::Config(format!(
                "database URL must start with mysql:// or mariadb://, got: {}",
                redact_url(&self.database_url)
            )));
        }
        validate_table_prefix(&self.table_prefix)?;
        if self.uploads_dir.as_os_str().is_empty() {
            return Err(Error::Config("uploads directory cannot be empty".to_string()));
        }
        if self.wp_cli.trim().is_empty() {
            return Err(Error::Config("platform CLI binary cannot be empty".to_string()));
        }
        Ok(())
    }

    /// Platform CLI collaborator built from this configuration.
    pub fn wp_cli(&self) -> WpCli {
        WpCli::new(self.wp_cli.clone())
            .with_path(self.wp_path.clone())
            .with_extra_args(self.wp_cli_args.clone())
    }
}

/// Hide the password part of a database URL.
pub fn redact_url(url: &str) -> String {
    let Some((scheme, rest)) = url.split_once("://") else {
        return url.to_string();
    };
    match rest.rsplit_once('@') {
        Some((credentials, host)) => {
            let user = credentials.split(':').next().unwrap_or_default();
            format!("{}://{}:***@{}", scheme, user, host)
        }
        None => url.to_string(),
    }
}
