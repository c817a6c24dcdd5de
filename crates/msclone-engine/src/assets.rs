//! Upload directory mirroring.
//!
//! Copies one tenant's upload tree onto another's. The root tenant's upload
//! root also holds the `sites/` container with every other tenant's tree, so
//! any directory with that name is never descended into.
//!
//! The mirror is best-effort: a failing entry is logged and counted in
//! [`MirrorStats::errors`] and the walk continues. A partially populated
//! destination is an accepted result.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tokio::fs;
use tracing::{debug, info, trace, warn};

use msclone_core::defaults::SITES_DIR;
use msclone_core::{MirrorStats, TenantId};

/// Copies tenant upload trees under a shared upload root.
#[derive(Debug, Clone)]
pub struct AssetMirror {
    uploads_root: PathBuf,
}

impl AssetMirror {
    pub fn new(uploads_root: impl Into<PathBuf>) -> Self {
        Self {
            uploads_root: uploads_root.into(),
        }
    }

    pub fn uploads_root(&self) -> &Path {
        &self.uploads_root
    }

    /// Upload directory of a tenant: the root itself for the root tenant,
    /// `sites/{id}` below it for everyone else.
    pub fn tenant_dir(&self, id: TenantId) -> PathBuf {
        if id.is_root() {
            self.uploads_root.clone()
        } else {
            self.uploads_root.join(SITES_DIR).join(id.to_string())
        }
    }

    /// Mirror the upload tree of `source` onto the one of `target`.
    pub async fn mirror_tenant(&self, source: TenantId, target: TenantId) -> MirrorStats {
        let src = self.tenant_dir(source);
        let dst = self.tenant_dir(target);
        info!(
            subsystem = "assets",
            component = "mirror",
            source_tenant = %source,
            target_tenant = %target,
            "Copying site files: {} => {}",
            src.display(),
            dst.display()
        );
        let stats = mirror_tree(&src, &dst).await;
        info!(
            subsystem = "assets",
            component = "mirror",
            files_copied = stats.files_copied,
            bytes_copied = stats.bytes_copied,
            directories_created = stats.directories_created,
            skipped_entries = stats.skipped_entries,
            errors = stats.errors,
            "Site files copied"
        );
        stats
    }
}

/// Copy the tree at `src` onto `dst`, overwriting existing files.
///
/// Directories named [`SITES_DIR`] and symlinked directories are skipped.
/// A missing `src` means there is nothing to copy and is not an error; `dst`
/// is still created.
pub async fn mirror_tree(src: &Path, dst: &Path) -> MirrorStats {
    let mut stats = MirrorStats::default();

    match fs::metadata(src).await {
        Ok(meta) if meta.is_dir() => {}
        Ok(_) => {
            warn!(subsystem = "assets", path = %src.display(), "Upload source is not a directory");
            stats.errors += 1;
            return stats;
        }
        Err(e) if e.kind() == ErrorKind::NotFound => {
            info!(subsystem = "assets", path = %src.display(), "No upload directory to copy");
            ensure_dir(dst, &mut stats).await;
            return stats;
        }
        Err(e) => {
            warn!(subsystem = "assets", path = %src.display(), error = %e, "Cannot read upload source");
            stats.errors += 1;
            return stats;
        }
    }

    let mut pending = vec![(src.to_path_buf(), dst.to_path_buf())];
    while let Some((src_dir, dst_dir)) = pending.pop() {
        if !ensure_dir(&dst_dir, &mut stats).await {
            continue;
        }

        let mut entries = match fs::read_dir(&src_dir).await {
            Ok(entries) => entries,
            Err(e) => {
                warn!(subsystem = "assets", path = %src_dir.display(), error = %e, "Cannot list directory");
                stats.errors += 1;
                continue;
            }
        };

        loop {
            let entry = match entries.next_entry().await {
                Ok(Some(entry)) => entry,
                Ok(None) => break,
                Err(e) => {
                    warn!(subsystem = "assets", path = %src_dir.display(), error = %e, "Directory listing failed");
                    stats.errors += 1;
                    break;
                }
            };

            let name = entry.file_name();
            let from = entry.path();
            let to = dst_dir.join(&name);

            let file_type = match entry.file_type().await {
                Ok(file_type) => file_type,
                Err(e) => {
                    warn!(subsystem = "assets", path = %from.display(), error = %e, "Cannot stat entry");
                    stats.errors += 1;
                    continue;
                }
            };

            let is_dir = if file_type.is_symlink() {
                match fs::metadata(&from).await {
                    Ok(meta) if meta.is_dir() => {
                        debug!(subsystem = "assets", path = %from.display(), "Skipping symlinked directory");
                        stats.skipped_entries += 1;
                        continue;
                    }
                    Ok(_) => false,
                    Err(e) => {
                        warn!(subsystem = "assets", path = %from.display(), error = %e, "Broken symlink");
                        stats.errors += 1;
                        continue;
                    }
                }
            } else {
                file_type.is_dir()
            };

            if is_dir {
                if name == SITES_DIR {
                    debug!(subsystem = "assets", path = %from.display(), "Skipping per-tenant container directory");
                    stats.skipped_entries += 1;
                    continue;
                }
                pending.push((from, to));
                continue;
            }

            match fs::copy(&from, &to).await {
                Ok(bytes) => {
                    trace!(subsystem = "assets", path = %to.display(), bytes, "Copied file");
                    stats.files_copied += 1;
                    stats.bytes_copied += bytes;
                }
                Err(e) => {
                    warn!(
                        subsystem = "assets",
                        from = %from.display(),
                        to = %to.display(),
                        error = %e,
                        "File copy failed"
                    );
                    stats.errors += 1;
                }
            }
        }
    }

    stats
}

/// Create `dir` (and missing parents). An existing directory is fine.
async fn ensure_dir(dir: &Path, stats: &mut MirrorStats) -> bool {
    if let Ok(meta) = fs::metadata(dir).await {
        if meta.is_dir() {
            return true;
        }
    }
    match fs::create_dir_all(dir).await {
        Ok(()) => {
            stats.directories_created += 1;
            true
        }
        Err(e) => {
            warn!(subsystem = "assets", path = %dir.display(), error = %e, "Cannot create directory");
            stats.errors += 1;
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write(path: &Path, contents: &str) {
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(path, contents).unwrap();
    }

    #[test]
    fn test_tenant_dir() {
        let mirror = AssetMirror::new("/srv/uploads");
        assert_eq!(mirror.tenant_dir(TenantId::ROOT), PathBuf::from("/srv/uploads"));
        assert_eq!(
            mirror.tenant_dir(TenantId::new(7).unwrap()),
            PathBuf::from("/srv/uploads/sites/7")
        );
    }

    #[tokio::test]
    async fn test_mirror_copies_nested_tree() {
        let tmp = TempDir::new().unwrap();
        let src = tmp.path().join("src");
        let dst = tmp.path().join("dst");
        write(&src.join("2024/01/a.jpg"), "image-a");
        write(&src.join("2024/02/b.pdf"), "doc-b");
        write(&src.join("top.txt"), "top");

        let stats = mirror_tree(&src, &dst).await;

        assert_eq!(stats.files_copied, 3);
        assert_eq!(stats.errors, 0);
        assert_eq!(stats.bytes_copied, 7 + 5 + 3);
        assert_eq!(
            std::fs::read_to_string(dst.join("2024/01/a.jpg")).unwrap(),
            "image-a"
        );
        assert_eq!(std::fs::read_to_string(dst.join("top.txt")).unwrap(), "top");
    }

    #[tokio::test]
    async fn test_mirror_skips_sites_container() {
        let tmp = TempDir::new().unwrap();
        let root = tmp.path().join("uploads");
        write(&root.join("2024/logo.png"), "logo");
        write(&root.join("sites/5/2024/five.png"), "five");
        write(&root.join("2024/sites/nested.txt"), "nested");

        let mirror = AssetMirror::new(&root);
        let stats = mirror
            .mirror_tenant(TenantId::ROOT, TenantId::new(9).unwrap())
            .await;

        let dst = root.join("sites/9");
        assert!(dst.join("2024/logo.png").exists());
        assert!(!dst.join("sites").exists());
        assert!(!dst.join("2024/sites").exists());
        assert_eq!(stats.files_copied, 1);
        assert_eq!(stats.skipped_entries, 2);
        assert_eq!(stats.errors, 0);
    }

    #[tokio::test]
    async fn test_mirror_overwrites_existing_files() {
        let tmp = TempDir::new().unwrap();
        let src = tmp.path().join("src");
        let dst = tmp.path().join("dst");
        write(&src.join("a.txt"), "new");
        write(&dst.join("a.txt"), "old contents");
        write(&dst.join("keep.txt"), "untouched");

        let stats = mirror_tree(&src, &dst).await;

        assert_eq!(stats.files_copied, 1);
        assert_eq!(stats.directories_created, 0);
        assert_eq!(std::fs::read_to_string(dst.join("a.txt")).unwrap(), "new");
        assert!(dst.join("keep.txt").exists());
    }

    #[tokio::test]
    async fn test_mirror_missing_source_still_creates_destination() {
        let tmp = TempDir::new().unwrap();
        let dst = tmp.path().join("sites/7");
        let stats = mirror_tree(&tmp.path().join("missing"), &dst).await;

        assert!(dst.is_dir());
        assert_eq!(stats.directories_created, 1);
        assert_eq!(stats.files_copied, 0);
        assert_eq!(stats.errors, 0);
    }

    #[tokio::test]
    async fn test_mirror_creates_missing_parent_directories() {
        let tmp = TempDir::new().unwrap();
        let root = tmp.path().join("uploads");
        write(&root.join("sites/5/a.txt"), "a");

        let mirror = AssetMirror::new(&root);
        let stats = mirror
            .mirror_tenant(TenantId::new(5).unwrap(), TenantId::new(6).unwrap())
            .await;

        assert_eq!(stats.files_copied, 1);
        assert!(root.join("sites/6/a.txt").exists());
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_mirror_skips_symlinked_directories() {
        let tmp = TempDir::new().unwrap();
        let src = tmp.path().join("src");
        let dst = tmp.path().join("dst");
        write(&src.join("real/a.txt"), "a");
        std::os::unix::fs::symlink(&src, src.join("loop")).unwrap();

        let stats = mirror_tree(&src, &dst).await;

        assert_eq!(stats.files_copied, 1);
        assert_eq!(stats.skipped_entries, 1);
        assert!(!dst.join("loop").exists());
    }
}
