//! Clone orchestration.
//!
//! Order of a run:
//!
//! 1. platform check and tenant resolution (no mutation before this passes)
//! 2. table scan and ownership filter
//! 3. table duplication (logged only in dry-run, which stops here)
//! 4. option fixes
//! 5. network-wide URL rewrite, unless skipped
//! 6. upload tree mirror
//! 7. cache flush

use std::sync::Arc;
use std::time::Instant;

use chrono::Utc;
use tracing::{info, info_span, Instrument};

use msclone_core::{
    CacheFlusher, CloneOutcome, CloneReport, CloneRequest, Error, ReferenceRewriter, Result,
    TableStore, Tenant, TenantId, TenantResolver,
};
use msclone_db::Database;

use crate::assets::AssetMirror;
use crate::catalog::scan_tables;
use crate::config::CloneConfig;
use crate::duplicator::{duplicate_tables, plan_tables};
use crate::metadata::fix_metadata;
use crate::ownership::filter_tables;

/// The tenant clone engine.
///
/// Holds every collaborator explicitly; nothing is reached through globals.
pub struct CloneEngine {
    resolver: Arc<dyn TenantResolver>,
    store: Arc<dyn TableStore>,
    rewriter: Arc<dyn ReferenceRewriter>,
    cache: Arc<dyn CacheFlusher>,
    assets: AssetMirror,
}

impl CloneEngine {
    pub fn new(
        resolver: Arc<dyn TenantResolver>,
        store: Arc<dyn TableStore>,
        rewriter: Arc<dyn ReferenceRewriter>,
        cache: Arc<dyn CacheFlusher>,
        assets: AssetMirror,
    ) -> Self {
        Self {
            resolver,
            store,
            rewriter,
            cache,
            assets,
        }
    }

    /// Engine backed by MySQL and the platform CLI.
    pub fn for_database(db: &Database, config: &CloneConfig) -> Self {
        let wp_cli = Arc::new(config.wp_cli());
        Self::new(
            Arc::new(db.tenants.clone()),
            Arc::new(db.tables.clone()),
            wp_cli.clone(),
            wp_cli,
            AssetMirror::new(config.uploads_dir.clone()),
        )
    }

    /// Run one clone operation.
    ///
    /// `Ok(CloneOutcome::DryRunPreview)` is a clean stop after the table
    /// preview. Errors for which [`Error::is_precondition`] holds were raised
    /// before anything was mutated; any other error may leave earlier steps
    /// applied.
    pub async fn run(&self, request: &CloneRequest) -> Result<CloneOutcome> {
        let span = info_span!(
            "clone",
            source_tenant = %request.source,
            target_tenant = %request.target,
            dry_run = request.options.dry_run,
        );
        self.execute(request).instrument(span).await
    }

    async fn execute(&self, request: &CloneRequest) -> Result<CloneOutcome> {
        let start = Instant::now();
        let request = CloneRequest::new(request.source, request.target, request.options)?;
        let options = request.options;

        if !self.resolver.is_multisite().await? {
            return Err(Error::Precondition(
                "This is not a multisite installation.".to_string(),
            ));
        }

        let source = self.resolve(request.source).await?;
        let mut target = self.resolve(request.target).await?;
        if options.force_https {
            target = target.with_forced_https();
        }

        let mut report = CloneReport::new(source.clone(), target.clone(), options.dry_run);
        info!(
            subsystem = "engine",
            component = "orchestrator",
            operation_id = %report.operation_id,
            "Cloning tables: {} => {}",
            source.base_url,
            target.base_url
        );

        let scanned = scan_tables(self.store.as_ref(), &source.prefix).await?;
        let filtered = filter_tables(&source, scanned);
        if filtered.kept.is_empty() {
            return Err(Error::NoTables(format!(
                "every table under '{}' belongs to the platform or another site",
                source.prefix
            )));
        }
        report.skipped = filtered.skipped;

        let plans = plan_tables(&filtered.kept, &source.prefix, &target.prefix)?;
        report.rows_copied =
            duplicate_tables(self.store.as_ref(), &plans, options.dry_run).await?;
        report.tables = plans;

        if options.dry_run {
            report.finished_at = Some(Utc::now());
            info!(
                subsystem = "engine",
                component = "orchestrator",
                result_count = report.tables.len(),
                duration_ms = start.elapsed().as_millis() as u64,
                "Dry run completed!"
            );
            return Ok(CloneOutcome::DryRunPreview(report));
        }

        fix_metadata(self.store.as_ref(), &source, &target).await?;

        if options.skip_replace {
            info!(
                subsystem = "engine",
                component = "orchestrator",
                "Skipping URL replacement in the target site tables"
            );
        } else {
            self.rewriter
                .rewrite(&target.prefix, &source.base_url, &target.base_url)
                .await?;
            report.references_rewritten = true;
        }

        report.assets = Some(self.assets.mirror_tenant(source.id, target.id).await);

        self.cache.flush().await?;

        report.finished_at = Some(Utc::now());
        info!(
            subsystem = "engine",
            component = "orchestrator",
            result_count = report.tables.len(),
            rows = report.rows_copied,
            duration_ms = start.elapsed().as_millis() as u64,
            success = true,
            "Clone completed!"
        );
        Ok(CloneOutcome::Success(report))
    }

    async fn resolve(&self, id: TenantId) -> Result<Tenant> {
        self.resolver
            .resolve(id)
            .await?
            .ok_or_else(|| Error::Precondition(format!("Site {} does not exist", id)))
    }
}
