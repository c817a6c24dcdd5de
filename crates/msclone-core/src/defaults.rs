//! Centralized default constants for msclone.
//!
//! **This module is the single source of truth** for the platform layout
//! the engine assumes (table names, option keys, directory names) and for
//! runtime defaults. Other crates reference these constants instead of
//! repeating string literals.

// =============================================================================
// TENANTS
// =============================================================================

/// ID of the root tenant. Its tables carry the bare prefix.
pub const ROOT_TENANT_ID: u64 = 1;

/// Default base table prefix of the platform.
pub const TABLE_PREFIX: &str = "wp_";

/// Table suffixes (after the bare prefix) that belong to the platform as a
/// whole and are never cloned when the root tenant is the source.
pub const SHARED_TABLE_SUFFIXES: &[&str] = &[
    "blogs",
    "blog_versions",
    "registration_log",
    "site",
    "sitemeta",
    "signups",
    "users",
    "usermeta",
];

/// Tenant registry table suffix (`{prefix}blogs`).
pub const REGISTRY_TABLE_SUFFIX: &str = "blogs";

/// Network registry table suffix (`{prefix}site`).
pub const NETWORK_TABLE_SUFFIX: &str = "site";

// =============================================================================
// OPTIONS
// =============================================================================

/// Per-tenant option table suffix (`{prefix}options`).
pub const OPTIONS_TABLE_SUFFIX: &str = "options";

/// Option key suffix holding the role-definition blob (`{prefix}user_roles`).
pub const USER_ROLES_OPTION_SUFFIX: &str = "user_roles";

/// Option key holding the tenant's home URL.
pub const HOME_OPTION: &str = "home";

/// Option key holding the tenant's public base URL.
pub const SITEURL_OPTION: &str = "siteurl";

// =============================================================================
// ASSETS
// =============================================================================

/// Container directory holding every non-root tenant's upload tree.
pub const SITES_DIR: &str = "sites";

/// Default upload root, relative to the working directory.
pub const UPLOADS_DIR: &str = "wp-content/uploads";

// =============================================================================
// COLLABORATORS
// =============================================================================

/// Default platform command-line binary.
pub const WP_CLI_BIN: &str = "wp";

// =============================================================================
// DATABASE
// =============================================================================

/// Default database URL.
pub const DATABASE_URL: &str = "mysql://root@localhost/wordpress";

/// Default pool size. Clone steps run sequentially, so a handful is plenty.
pub const POOL_MAX_CONNECTIONS: u32 = 2;

/// Default connection acquire timeout in seconds.
pub const POOL_CONNECT_TIMEOUT_SECS: u64 = 30;

/// Default idle timeout in seconds.
pub const POOL_IDLE_TIMEOUT_SECS: u64 = 600;

/// MySQL identifier length limit in characters.
pub const MAX_IDENTIFIER_LEN: usize = 64;
