//! Tenant-scoped option fixes applied to freshly duplicated tables.

use tracing::info;

use msclone_core::defaults::{HOME_OPTION, SITEURL_OPTION};
use msclone_core::{Result, TableStore, Tenant};

/// Point the target's copied options at the target instead of the source.
///
/// - The role-definition key `{source}user_roles` becomes `{target}user_roles`;
///   its value is carried over untouched.
/// - `home` and `siteurl` are set to the target's base URL, which the caller
///   has already adjusted for forced HTTPS.
pub async fn fix_metadata(store: &dyn TableStore, source: &Tenant, target: &Tenant) -> Result<()> {
    let options_table = target.options_table();

    let renamed = store
        .rename_option(
            &options_table,
            &source.user_roles_option(),
            &target.user_roles_option(),
        )
        .await?;
    info!(
        subsystem = "engine",
        component = "metadata",
        op = "rename_user_roles",
        db_table = %options_table,
        rows = renamed,
        "Renamed {} to {}",
        source.user_roles_option(),
        target.user_roles_option()
    );

    let updated = store
        .set_option_values(
            &options_table,
            &[HOME_OPTION, SITEURL_OPTION],
            &target.base_url,
        )
        .await?;
    info!(
        subsystem = "engine",
        component = "metadata",
        op = "set_base_url",
        db_table = %options_table,
        rows = updated,
        "Set {} and {} to {}",
        HOME_OPTION,
        SITEURL_OPTION,
        target.base_url
    );

    Ok(())
}
