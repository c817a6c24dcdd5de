//! Structured logging schema and field name constants for msclone.
//!
//! All crates use these constants for consistent structured logging fields,
//! so a clone run can be followed in a log aggregator by `operation_id`.
//!
//! ## Log Level Contract
//!
//! | Level | Usage |
//! |-------|-------|
//! | ERROR | Clone aborted, operator attention required |
//! | WARN  | Best-effort step degraded (asset copy failures) |
//! | INFO  | Lifecycle events and every planned table step (dry-run preview) |
//! | DEBUG | Decision points: skipped tables, resolved prefixes, config choices |
//! | TRACE | Per-file iteration in the asset mirror |

// ─── Identity fields ───────────────────────────────────────────────────────

/// Correlation ID for one clone run.
/// Format: UUIDv7 (time-ordered).
pub const OPERATION_ID: &str = "operation_id";

/// Subsystem originating the log event.
/// Values: "engine", "db", "assets", "wp_cli"
pub const SUBSYSTEM: &str = "subsystem";

/// Component within a subsystem.
/// Examples: "orchestrator", "duplicator", "pool", "mirror"
pub const COMPONENT: &str = "component";

/// Logical operation name.
/// Examples: "scan", "drop", "create_like", "copy_rows", "search_replace"
pub const OPERATION: &str = "op";

// ─── Tenant fields ─────────────────────────────────────────────────────────

/// Source tenant ID.
pub const SOURCE_TENANT: &str = "source_tenant";

/// Target tenant ID.
pub const TARGET_TENANT: &str = "target_tenant";

/// Table-name prefix in effect.
pub const TABLE_PREFIX: &str = "table_prefix";

/// Whether the run is a dry-run preview.
pub const DRY_RUN: &str = "dry_run";

// ─── Database fields ───────────────────────────────────────────────────────

/// Database table affected.
pub const DB_TABLE: &str = "db_table";

/// Destination table of a duplication step.
pub const DEST_TABLE: &str = "dest_table";

/// Ownership classification of a scanned table.
pub const OWNERSHIP: &str = "ownership";

/// Rows affected by a statement.
pub const ROWS: &str = "rows";

/// Number of active connections in the pool.
pub const POOL_SIZE: &str = "pool_size";

/// Number of idle connections in the pool.
pub const POOL_IDLE: &str = "pool_idle";

// ─── Filesystem fields ─────────────────────────────────────────────────────

/// Filesystem path being read or written.
pub const PATH: &str = "path";

// ─── Measurement fields ────────────────────────────────────────────────────

/// Wall-clock duration in milliseconds.
pub const DURATION_MS: &str = "duration_ms";

/// Number of items produced by a scan or copy.
pub const RESULT_COUNT: &str = "result_count";

// ─── Outcome fields ────────────────────────────────────────────────────────

/// Boolean success/failure indicator.
pub const SUCCESS: &str = "success";

/// Error message when an operation fails.
pub const ERROR_MSG: &str = "error";
