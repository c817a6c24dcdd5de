//! Platform command-line collaborators.
//!
//! The network-wide URL search/replace and the cache flush are delegated to
//! the platform's own CLI (`wp`), which understands serialized option values.

use std::path::PathBuf;
use std::time::Instant;

use async_trait::async_trait;
use tokio::process::Command;
use tracing::{debug, info};

use msclone_core::defaults::WP_CLI_BIN;
use msclone_core::{CacheFlusher, Error, ReferenceRewriter, Result};

/// Invokes the platform CLI.
#[derive(Debug, Clone)]
pub struct WpCli {
    bin: String,
    path: Option<PathBuf>,
    extra_args: Vec<String>,
}

impl Default for WpCli {
    fn default() -> Self {
        Self::new(WP_CLI_BIN)
    }
}

impl WpCli {
    pub fn new(bin: impl Into<String>) -> Self {
        Self {
            bin: bin.into(),
            path: None,
            extra_args: Vec::new(),
        }
    }

    /// Installation directory passed as `--path=`.
    pub fn with_path(mut self, path: Option<PathBuf>) -> Self {
        self.path = path;
        self
    }

    /// Arguments appended to every invocation (e.g. `--allow-root`).
    pub fn with_extra_args(mut self, args: Vec<String>) -> Self {
        self.extra_args = args;
        self
    }

    /// Full argument list for a subcommand.
    pub fn command_args(&self, args: &[&str]) -> Vec<String> {
        let mut full: Vec<String> = args.iter().map(|a| a.to_string()).collect();
        if let Some(path) = &self.path {
            full.push(format!("--path={}", path.display()));
        }
        full.extend(self.extra_args.iter().cloned());
        full
    }

    /// Run a subcommand to completion and return its stdout.
    pub async fn run(&self, args: &[&str]) -> Result<String> {
        let full = self.command_args(args);
        let start = Instant::now();
        debug!(
            subsystem = "wp_cli",
            op = "run",
            bin = %self.bin,
            args = ?full,
            "Running platform command"
        );

        let output = Command::new(&self.bin)
            .args(&full)
            .output()
            .await
            .map_err(|e| Error::Command(format!("Failed to execute {}: {}", self.bin, e)))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(Error::Command(format!(
                "{} {} failed ({}): {}",
                self.bin,
                args.join(" "),
                output.status,
                stderr.trim()
            )));
        }

        debug!(
            subsystem = "wp_cli",
            op = "run",
            duration_ms = start.elapsed().as_millis() as u64,
            "Platform command finished"
        );
        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

/// Arguments of the network-wide search/replace for one tenant prefix.
pub fn search_replace_args(table_prefix: &str, old_url: &str, new_url: &str) -> Vec<String> {
    vec![
        "search-replace".to_string(),
        old_url.to_string(),
        new_url.to_string(),
        format!("{}*", table_prefix),
        "--network".to_string(),
    ]
}

#[async_trait]
impl ReferenceRewriter for WpCli {
    async fn rewrite(&self, table_prefix: &str, old_url: &str, new_url: &str) -> Result<()> {
        info!(
            subsystem = "wp_cli",
            op = "search_replace",
            table_prefix,
            "Replacing URLs in the target site tables: {} => {}",
            old_url,
            new_url
        );
        let args = search_replace_args(table_prefix, old_url, new_url);
        let args: Vec<&str> = args.iter().map(String::as_str).collect();
        let stdout = self.run(&args).await?;
        debug!(subsystem = "wp_cli", op = "search_replace", output = %stdout.trim(), "search-replace output");
        Ok(())
    }
}

#[async_trait]
impl CacheFlusher for WpCli {
    async fn flush(&self) -> Result<()> {
        info!(subsystem = "wp_cli", op = "cache_flush", "Flushing object cache");
        self.run(&["cache", "flush"]).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_search_replace_args() {
        assert_eq!(
            search_replace_args("wp_7_", "http://five.test", "https://seven.test"),
            vec![
                "search-replace",
                "http://five.test",
                "https://seven.test",
                "wp_7_*",
                "--network"
            ]
        );
    }

    #[test]
    fn test_command_args_appends_path_and_extras() {
        let cli = WpCli::new("wp")
            .with_path(Some(PathBuf::from("/var/www/html")))
            .with_extra_args(vec!["--allow-root".to_string()]);

        assert_eq!(
            cli.command_args(&["cache", "flush"]),
            vec!["cache", "flush", "--path=/var/www/html", "--allow-root"]
        );
    }

    #[test]
    fn test_default_binary() {
        assert_eq!(WpCli::default().command_args(&["cli", "version"]), vec!["cli", "version"]);
    }

    #[tokio::test]
    async fn test_missing_binary_is_command_error() {
        let cli = WpCli::new("/nonexistent/msclone-test-wp");
        match cli.run(&["cache", "flush"]).await {
            Err(Error::Command(msg)) => assert!(msg.contains("Failed to execute")),
            other => panic!("Expected Command error, got {:?}", other),
        }
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_non_zero_exit_is_command_error() {
        let cli = WpCli::new("false");
        match cli.flush().await {
            Err(Error::Command(msg)) => assert!(msg.contains("cache flush")),
            other => panic!("Expected Command error, got {:?}", other),
        }
    }
}
