//! msclone: clone one tenant of a WordPress multisite network onto another.
//!
//! ```text
//! msclone <SOURCE_ID> <TARGET_ID> [--force-https] [--skip-replace] [--dry-run]
//! ```
//!
//! Exit codes: `0` on success and after a dry run, `2` when the clone was
//! refused before anything was touched, `1` for any other failure.

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::Context;
use clap::{Parser, ValueEnum};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use msclone_core::{CloneOptions, CloneOutcome, CloneRequest, Error};
use msclone_db::{log_pool_metrics, Database};
use msclone_engine::{redact_url, CloneConfig, CloneEngine};

const EXIT_PRECONDITION: u8 = 2;

#[derive(Parser)]
#[command(name = "msclone")]
#[command(author, version, about = "Clone a WordPress multisite tenant onto another tenant")]
struct Cli {
    /// Source and target tenant IDs
    #[arg(value_name = "ID", num_args = 0.., allow_negative_numbers = true)]
    ids: Vec<String>,

    /// Rewrite the target URL to https
    #[arg(long)]
    force_https: bool,

    /// Skip the URL search/replace in the target tables
    #[arg(long)]
    skip_replace: bool,

    /// Log what would be done without changing anything
    #[arg(long)]
    dry_run: bool,

    /// Database URL (overrides DATABASE_URL)
    #[arg(long)]
    database_url: Option<String>,

    /// Base table prefix of the network
    #[arg(long)]
    table_prefix: Option<String>,

    /// Upload root of the network
    #[arg(long)]
    uploads_dir: Option<PathBuf>,

    /// Platform CLI binary
    #[arg(long)]
    wp_cli: Option<String>,

    /// Installation directory passed to the platform CLI
    #[arg(long)]
    wp_path: Option<PathBuf>,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

impl Cli {
    fn options(&self) -> CloneOptions {
        CloneOptions {
            force_https: self.force_https,
            skip_replace: self.skip_replace,
            dry_run: self.dry_run,
        }
    }

    fn apply_overrides(&self, config: &mut CloneConfig) {
        if let Some(url) = &self.database_url {
            config.database_url = url.clone();
        }
        if let Some(prefix) = &self.table_prefix {
            config.table_prefix = prefix.clone();
        }
        if let Some(dir) = &self.uploads_dir {
            config.uploads_dir = dir.clone();
        }
        if let Some(bin) = &self.wp_cli {
            config.wp_cli = bin.clone();
        }
        if let Some(path) = &self.wp_path {
            config.wp_path = Some(path.clone());
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    let _file_guard = init_tracing();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            let precondition = e
                .downcast_ref::<Error>()
                .is_some_and(Error::is_precondition);
            if precondition {
                ExitCode::from(EXIT_PRECONDITION)
            } else {
                ExitCode::FAILURE
            }
        }
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let request = CloneRequest::from_args(&cli.ids, cli.options())?;

    let mut config = CloneConfig::from_env();
    cli.apply_overrides(&mut config);
    config.validate()?;

    info!(
        database_url = %redact_url(&config.database_url),
        table_prefix = %config.table_prefix,
        uploads_dir = %config.uploads_dir.display(),
        "Connecting to database"
    );
    let db = Database::connect(&config.database_url, &config.table_prefix)
        .await
        .context("Failed to connect to database")?;
    log_pool_metrics(db.pool());

    let engine = CloneEngine::for_database(&db, &config);
    let outcome = engine.run(&request).await?;

    match cli.format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&outcome)?),
        OutputFormat::Text => match &outcome {
            CloneOutcome::Success(_) => println!("Success: Clone completed!"),
            CloneOutcome::DryRunPreview(report) => {
                for plan in &report.tables {
                    println!("{} => {}", plan.source, plan.destination);
                }
                println!("Dry run completed!");
            }
        },
    }

    db.pool.close().await;
    Ok(())
}

/// Initialize tracing.
///
/// Environment variables:
///   LOG_FORMAT  - "json" or "text" (default: "text")
///   LOG_FILE    - path to log file (optional, enables file logging)
///   LOG_ANSI    - "true"/"false" override ANSI colors (auto-detected by default)
///   RUST_LOG    - standard env filter (default: "msclone=info,msclone_engine=info,msclone_db=info")
///
/// Console output goes to stderr so stdout carries only the result.
fn init_tracing() -> Option<tracing_appender::non_blocking::WorkerGuard> {
    let log_format = std::env::var("LOG_FORMAT").unwrap_or_else(|_| "text".to_string());
    let log_file = std::env::var("LOG_FILE").ok();
    let log_ansi = std::env::var("LOG_ANSI")
        .ok()
        .map(|v| v == "true" || v == "1");

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "msclone=info,msclone_engine=info,msclone_db=info".into());

    let registry = tracing_subscriber::registry().with(env_filter);

    if let Some(ref path) = log_file {
        let file_dir = Path::new(path).parent().unwrap_or(Path::new("."));
        let file_name = Path::new(path)
            .file_name()
            .and_then(|f| f.to_str())
            .unwrap_or("msclone.log");
        let file_appender = tracing_appender::rolling::daily(file_dir, file_name);
        let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

        if log_format == "json" {
            registry
                .with(
                    tracing_subscriber::fmt::layer()
                        .json()
                        .with_writer(non_blocking),
                )
                .init();
        } else {
            let layer = tracing_subscriber::fmt::layer()
                .with_writer(non_blocking)
                .with_ansi(log_ansi.unwrap_or(false));
            registry.with(layer).init();
        }
        Some(guard)
    } else {
        if log_format == "json" {
            registry
                .with(
                    tracing_subscriber::fmt::layer()
                        .json()
                        .with_writer(std::io::stderr),
                )
                .init();
        } else {
            let mut layer = tracing_subscriber::fmt::layer().with_writer(std::io::stderr);
            if let Some(ansi) = log_ansi {
                layer = layer.with_ansi(ansi);
            }
            registry.with(layer).init();
        }
        None
    }
}
