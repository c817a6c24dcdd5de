//! Domain types for tenant cloning.

use std::fmt;
use std::num::NonZeroU64;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::defaults::ROOT_TENANT_ID;
use crate::error::{Error, Result};

// =============================================================================
// TENANTS
// =============================================================================

/// Positive integer identifying a tenant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TenantId(NonZeroU64);

impl TenantId {
    /// The root tenant.
    pub const ROOT: TenantId = match NonZeroU64::new(ROOT_TENANT_ID) {
        Some(id) => TenantId(id),
        None => panic!("root tenant id must be positive"),
    };

    /// Create from a raw integer. Returns `None` for zero.
    pub fn new(id: u64) -> Option<Self> {
        NonZeroU64::new(id).map(TenantId)
    }

    /// Parse a tenant identifier given as a numeric string.
    ///
    /// Only a non-empty run of ASCII digits with a positive value is
    /// accepted: signs, whitespace, and `0` are rejected.
    pub fn parse(raw: &str) -> Result<Self> {
        if raw.is_empty() || !raw.bytes().all(|b| b.is_ascii_digit()) {
            return Err(Error::Precondition(
                "Please provide two integer arguments.".to_string(),
            ));
        }
        let value: u64 = raw
            .parse()
            .map_err(|_| Error::Precondition(format!("Tenant ID out of range: {}", raw)))?;
        Self::new(value)
            .ok_or_else(|| Error::Precondition("Tenant ID must be positive.".to_string()))
    }

    pub fn get(self) -> u64 {
        self.0.get()
    }

    pub fn is_root(self) -> bool {
        self == Self::ROOT
    }
}

impl fmt::Display for TenantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Table-name prefix of a tenant.
///
/// The root tenant uses the bare base prefix; every other tenant appends its
/// numeric ID and an underscore (`wp_` vs `wp_7_`).
pub fn tenant_prefix(base_prefix: &str, id: TenantId) -> String {
    if id.is_root() {
        base_prefix.to_string()
    } else {
        format!("{}{}_", base_prefix, id)
    }
}

/// A resolved tenant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tenant {
    pub id: TenantId,
    /// Literal prefix of every table this tenant owns.
    pub prefix: String,
    /// Public base URL (`siteurl`), without trailing slash.
    pub base_url: String,
}

impl Tenant {
    pub fn new(id: TenantId, prefix: impl Into<String>, base_url: impl Into<String>) -> Self {
        Self {
            id,
            prefix: prefix.into(),
            base_url: base_url.into(),
        }
    }

    pub fn is_root(&self) -> bool {
        self.id.is_root()
    }

    /// Copy of this tenant whose base URL uses the `https` scheme.
    ///
    /// Only a leading `http://` is rewritten; the rest of the URL is kept.
    pub fn with_forced_https(&self) -> Self {
        let base_url = match self.base_url.strip_prefix("http://") {
            Some(rest) => format!("https://{}", rest),
            None => self.base_url.clone(),
        };
        Self {
            base_url,
            ..self.clone()
        }
    }

    /// Name of this tenant's option table.
    pub fn options_table(&self) -> String {
        format!("{}{}", self.prefix, crate::defaults::OPTIONS_TABLE_SUFFIX)
    }

    /// Option key of this tenant's role-definition blob.
    pub fn user_roles_option(&self) -> String {
        format!("{}{}", self.prefix, crate::defaults::USER_ROLES_OPTION_SUFFIX)
    }
}

// =============================================================================
// TABLES
// =============================================================================

/// Ownership classification of a table found under a tenant's prefix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TableOwnership {
    /// Belongs to the tenant being scanned; cloned.
    OwnedByTenant,
    /// Platform-wide registry table; never cloned.
    SharedPlatformTable,
    /// Belongs to a numbered tenant that shares the bare prefix; never cloned.
    OwnedByOtherTenant,
}

impl fmt::Display for TableOwnership {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::OwnedByTenant => write!(f, "owned_by_tenant"),
            Self::SharedPlatformTable => write!(f, "shared_platform_table"),
            Self::OwnedByOtherTenant => write!(f, "owned_by_other_tenant"),
        }
    }
}

/// One source table and the destination it is copied to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TablePlan {
    pub source: String,
    pub destination: String,
}

/// A scanned table excluded from the clone.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkippedTable {
    pub table: String,
    pub ownership: TableOwnership,
}

// =============================================================================
// CLONE OPERATION
// =============================================================================

/// Flags of a clone operation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CloneOptions {
    /// Rewrite the target base URL to `https`.
    pub force_https: bool,
    /// Skip the network-wide base URL search/replace.
    pub skip_replace: bool,
    /// Discover and log, mutate nothing.
    pub dry_run: bool,
}

/// A validated clone request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CloneRequest {
    pub source: TenantId,
    pub target: TenantId,
    pub options: CloneOptions,
}

impl CloneRequest {
    /// Build a request, enforcing the tenant-pair invariants.
    pub fn new(source: TenantId, target: TenantId, options: CloneOptions) -> Result<Self> {
        if source == target {
            return Err(Error::Precondition(
                "Can't clone the site to itself.".to_string(),
            ));
        }
        if target.is_root() {
            return Err(Error::Precondition(format!(
                "Target site ID = {} is not supported yet.",
                TenantId::ROOT
            )));
        }
        Ok(Self {
            source,
            target,
            options,
        })
    }

    /// Build a request from raw positional arguments.
    ///
    /// Exactly two arguments are required, each a positive integer string.
    pub fn from_args<S: AsRef<str>>(args: &[S], options: CloneOptions) -> Result<Self> {
        let [source, target] = args else {
            return Err(Error::Precondition(
                "Please provide two integer arguments.".to_string(),
            ));
        };
        let source = TenantId::parse(source.as_ref())?;
        let target = TenantId::parse(target.as_ref())?;
        Self::new(source, target, options)
    }
}

/// Counters reported by the asset mirror.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MirrorStats {
    pub directories_created: u64,
    pub files_copied: u64,
    pub bytes_copied: u64,
    /// Entries deliberately not copied (container directory, symlinked dirs).
    pub skipped_entries: u64,
    /// Entries that failed to copy; the mirror keeps going.
    pub errors: u64,
}

/// Summary of one clone run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CloneReport {
    pub operation_id: Uuid,
    pub source: Tenant,
    pub target: Tenant,
    pub dry_run: bool,
    pub tables: Vec<TablePlan>,
    pub skipped: Vec<SkippedTable>,
    pub rows_copied: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assets: Option<MirrorStats>,
    pub references_rewritten: bool,
    pub started_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub finished_at: Option<DateTime<Utc>>,
}

impl CloneReport {
    pub fn new(source: Tenant, target: Tenant, dry_run: bool) -> Self {
        Self {
            operation_id: Uuid::now_v7(),
            source,
            target,
            dry_run,
            tables: Vec::new(),
            skipped: Vec::new(),
            rows_copied: 0,
            assets: None,
            references_rewritten: false,
            started_at: Utc::now(),
            finished_at: None,
        }
    }
}

/// Non-failure result of a clone run.
///
/// Together with `Err(Error)` this forms the tri-state
/// success / dry-run preview / failure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", content = "report", rename_all = "snake_case")]
pub enum CloneOutcome {
    /// Every step ran.
    Success(CloneReport),
    /// Discovery ran and table steps were logged; nothing was mutated.
    DryRunPreview(CloneReport),
}

impl CloneOutcome {
    pub fn report(&self) -> &CloneReport {
        match self {
            Self::Success(report) | Self::DryRunPreview(report) => report,
        }
    }

    pub fn is_dry_run(&self) -> bool {
        matches!(self, Self::DryRunPreview(_))
    }
}
