//! # msclone-engine
//!
//! Clones one tenant of a multi-tenant WordPress network onto another.
//!
//! A run copies every table the source tenant owns under the target's
//! prefix, fixes the tenant-scoped options, rewrites the base URL across the
//! target's tables, mirrors the upload tree, and flushes caches. The
//! [`CloneEngine`] drives those steps over explicit collaborators
//! ([`msclone_core::TenantResolver`], [`msclone_core::TableStore`],
//! [`msclone_core::ReferenceRewriter`], [`msclone_core::CacheFlusher`]).
//!
//! ## Example
//!
//! ```rust,ignore
//! use msclone_engine::{CloneConfig, CloneEngine};
//! use msclone_core::{CloneOptions, CloneRequest};
//! use msclone_db::Database;
//!
//! let config = CloneConfig::from_env();
//! let db = Database::connect(&config.database_url, &config.table_prefix).await?;
//! let engine = CloneEngine::for_database(&db, &config);
//!
//! let request = CloneRequest::from_args(&["5", "7"], CloneOptions::default())?;
//! let outcome = engine.run(&request).await?;
//! println!("{} tables cloned", outcome.report().tables.len());
//! ```

pub mod assets;
pub mod catalog;
pub mod config;
pub mod duplicator;
pub mod metadata;
pub mod orchestrator;
pub mod ownership;
pub mod wp_cli;

#[cfg(test)]
pub mod mock;


pub use assets::{mirror_tree, AssetMirror};
pub use catalog::scan_tables;
pub use config::{redact_url, CloneConfig};
pub use duplicator::{destination_name, duplicate_tables, plan_tables};
pub use metadata::fix_metadata;
pub use orchestrator::CloneEngine;
pub use ownership::{classify_table, filter_tables, FilteredTables};
pub use wp_cli::{search_replace_args, WpCli};
