//! The update/clean pipeline.
//!
//! `update` walks the product tree for JSON sidecars and registers new
//! ones in the catalog. The whole pass runs inside one transaction with
//! a savepoint per sidecar, so a bad file never leaves partial rows and
//! readers only ever see whole batches. `clean` evicts the oldest
//! records until the tree fits the quota again, then prunes emptied
//! directories.

use std::ffi::OsStr;
use std::fs;
use std::io;
use std::path::{Component, Path, PathBuf};

use catalog::{
    ArtifactRole, Catalog, CatalogError, NewArtifact, NewRecord, ProjectionParams, RecordFilter,
    RecordKind,
};
use image::DynamicImage;
use sqlx::{Acquire, SqliteConnection};
use tracing::{debug, info, warn};
use walkdir::WalkDir;

use crate::error::{IngestError, Result};
use crate::sidecar::{self, SidecarDocument};

/// Records fetched per round of the eviction scan.
const EVICTION_BATCH: u32 = 64;

/// Pipeline settings, independent of the catalog connection.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Root of the received-product tree. All catalog paths are
    /// relative to it.
    pub root: PathBuf,
    /// Storage quota in bytes. `None` disables eviction.
    pub quota_bytes: Option<u64>,
    /// Longest thumbnail edge in pixels. `None` disables thumbnails.
    pub thumbnail_max_dim: Option<u32>,
}

/// Counters from one `update` pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UpdateSummary {
    pub updated: usize,
    pub skipped: usize,
    pub failed: usize,
}

/// Counters from one `clean` pass. In dry-run mode these report what
/// would have been removed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CleanSummary {
    pub deleted_records: usize,
    pub deleted_bytes: u64,
    pub pruned_dirs: usize,
}

/// Batch indexer over a received-product tree.
pub struct Pipeline {
    catalog: Catalog,
    config: PipelineConfig,
}

impl Pipeline {
    pub fn new(catalog: Catalog, config: PipelineConfig) -> Self {
        Self { catalog, config }
    }

    /// Index every sidecar under the root that is not already
    /// cataloged. Per-sidecar failures are logged and skipped; only
    /// catalog failures abort the run.
    pub async fn update(&self) -> Result<UpdateSummary> {
        let mut summary = UpdateSummary::default();
        let sidecars = self.scan_sidecars()?;

        let mut tx = self.catalog.begin().await?;
        for sidecar_path in &sidecars {
            let mut savepoint = tx.begin().await.map_err(CatalogError::from)?;
            match self.ingest_one(&mut savepoint, sidecar_path).await {
                Ok(true) => {
                    savepoint.commit().await.map_err(CatalogError::from)?;
                    summary.updated += 1;
                }
                Ok(false) => {
                    savepoint.rollback().await.map_err(CatalogError::from)?;
                    summary.skipped += 1;
                }
                Err(err) if err.is_fatal() => return Err(err),
                Err(err) => {
                    savepoint.rollback().await.map_err(CatalogError::from)?;
                    warn!(
                        path = %sidecar_path.display(),
                        error = %err,
                        "skipping sidecar"
                    );
                    summary.failed += 1;
                }
            }
        }
        tx.commit().await.map_err(CatalogError::from)?;

        info!(
            updated = summary.updated,
            skipped = summary.skipped,
            failed = summary.failed,
            "update pass finished"
        );
        Ok(summary)
    }

    /// Evict oldest-first until total artifact size fits the quota,
    /// then prune directories the eviction emptied. With `dry_run` set,
    /// reports what would be removed without touching disk or catalog.
    pub async fn clean(&self, dry_run: bool) -> Result<CleanSummary> {
        let mut summary = CleanSummary::default();

        if let Some(quota) = self.config.quota_bytes {
            let total = self
                .catalog
                .total_artifact_size(&RecordFilter::default())
                .await?;
            let mut excess = total as i64 - quota as i64;
            if excess > 0 {
                info!(total, quota, excess, "over quota, evicting oldest records");
                let mut tx = self.catalog.begin().await?;
                let mut cursor = None;
                'evict: loop {
                    let batch = Catalog::oldest_records(&mut tx, cursor, EVICTION_BATCH).await?;
                    if batch.is_empty() {
                        break;
                    }
                    for candidate in batch {
                        cursor = Some((candidate.captured_at, candidate.id));
                        excess -= candidate.total_size as i64;

                        for (path, _) in &candidate.artifacts {
                            info!(path, dry_run, "deleting artifact");
                            if !dry_run {
                                self.unlink_artifact(path)?;
                            }
                        }
                        if !dry_run {
                            Catalog::delete_record(&mut tx, candidate.id).await?;
                        }
                        summary.deleted_records += 1;
                        summary.deleted_bytes += candidate.total_size;

                        if excess <= 0 {
                            break 'evict;
                        }
                    }
                }
                if dry_run {
                    tx.rollback().await.map_err(CatalogError::from)?;
                } else {
                    tx.commit().await.map_err(CatalogError::from)?;
                }
            }
        }

        summary.pruned_dirs = self.prune_empty_dirs(&self.config.root, dry_run)?;

        info!(
            deleted_records = summary.deleted_records,
            deleted_bytes = summary.deleted_bytes,
            pruned_dirs = summary.pruned_dirs,
            dry_run,
            "clean pass finished"
        );
        Ok(summary)
    }

    /// Index one sidecar. Returns `Ok(false)` when it is already
    /// cataloged.
    async fn ingest_one(&self, conn: &mut SqliteConnection, sidecar_path: &Path) -> Result<bool> {
        let sidecar_rel = sidecar_path
            .strip_prefix(&self.config.root)
            .map_err(|_| IngestError::PathEscapesRoot(sidecar_path.display().to_string()))?
            .to_path_buf();
        let sidecar_rel_str = rel_str(&sidecar_rel)?;

        if Catalog::artifact_exists(conn, &sidecar_rel_str).await? {
            return Ok(false);
        }
        debug!(path = %sidecar_rel.display(), "indexing sidecar");

        let raw = fs::read_to_string(sidecar_path)?;
        let doc = SidecarDocument::parse(&raw)?;

        let data_rel = self.resolve_declared_path(doc.primary_path()?)?;
        let data_path = self.config.root.join(&data_rel);
        let data_size = match fs::metadata(&data_path) {
            Ok(meta) => meta.len(),
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                return Err(IngestError::ArtifactMissing(data_path));
            }
            Err(err) => return Err(err.into()),
        };
        let sidecar_size = fs::metadata(sidecar_path)?.len();

        let stem = sidecar_path
            .file_stem()
            .and_then(OsStr::to_str)
            .ok_or_else(|| {
                IngestError::UnparseableFilename(sidecar_path.display().to_string())
            })?;
        let first_segment = if sidecar_rel.components().count() > 1 {
            sidecar_rel.components().next().and_then(|c| match c {
                Component::Normal(part) => part.to_str(),
                _ => None,
            })
        } else {
            None
        };
        let mut parsed = sidecar::parse_stem(stem, first_segment)?;

        // The sidecar's own timestamp, when present, beats whatever the
        // filename said.
        if let Some(captured_at) = doc.iso_timestamp() {
            parsed.captured_at = captured_at;
        }

        // Image or text is decided by actually decoding, not by file
        // extension; upstream extensions lie sometimes.
        let image = image::open(&data_path).ok();
        let kind = if image.is_some() {
            RecordKind::Image
        } else {
            RecordKind::Text
        };

        // Dimensions come from the decoded image when we have one;
        // otherwise the sidecar's own structure blocks can supply them
        // (segmented products we cannot decode locally).
        let params = match &image {
            Some(img) => doc.navigation().and_then(|nav| {
                ProjectionParams::from_navigation(img.width() as i32, img.height() as i32, nav)
            }),
            None => ProjectionParams::from_document(doc.as_value()),
        };
        let projection_id = match &params {
            Some(params) => Some(
                Catalog::find_or_insert_projection(conn, params)
                    .await?
                    .id,
            ),
            None => None,
        };

        let mut style = None;
        let mut channel = parsed.channel.clone();
        let mut nnn = None;
        let mut xxx = None;
        match kind {
            RecordKind::Image => {
                if let Some(raw_channel) = &channel {
                    let (base, normalized) = sidecar::normalize_channel(raw_channel);
                    channel = Some(base);
                    style = Some(normalized);
                }
            }
            RecordKind::Text => {
                if let Some((n, x)) = sidecar::split_text_identifier(&parsed.name) {
                    nnn = Some(n);
                    xxx = Some(x);
                }
            }
        }

        let mut artifacts = vec![
            NewArtifact {
                role: ArtifactRole::Main,
                path: rel_str(&data_rel)?,
                size: data_size,
            },
            NewArtifact {
                role: ArtifactRole::Meta,
                path: sidecar_rel_str,
                size: sidecar_size,
            },
        ];
        if let (Some(max_dim), Some(img)) = (self.config.thumbnail_max_dim, &image) {
            if let Some(thumb) = self.generate_thumbnail(&data_rel, img, max_dim) {
                artifacts.push(thumb);
            }
        }

        let record = NewRecord {
            name: parsed.name,
            captured_at: parsed.captured_at,
            kind,
            style,
            source: parsed.source,
            region: parsed.region,
            channel,
            nnn,
            xxx,
            meta_json: raw,
            projection_id,
        };
        Catalog::insert_record(conn, &record, &artifacts).await?;

        Ok(true)
    }

    /// All JSON sidecars under the root, in a stable order.
    fn scan_sidecars(&self) -> Result<Vec<PathBuf>> {
        let mut found = Vec::new();
        for entry in WalkDir::new(&self.config.root).sort_by_file_name() {
            let entry = entry.map_err(io::Error::from)?;
            if !entry.file_type().is_file() {
                continue;
            }
            if entry.path().extension().and_then(OsStr::to_str) == Some("json") {
                found.push(entry.into_path());
            }
        }
        Ok(found)
    }

    /// Validate a path declared inside a sidecar. Only plain relative
    /// components are allowed; anything that could leave the root is
    /// rejected.
    fn resolve_declared_path(&self, declared: &str) -> Result<PathBuf> {
        let mut rel = PathBuf::new();
        for component in Path::new(declared).components() {
            match component {
                Component::Normal(part) => rel.push(part),
                Component::CurDir => {}
                _ => return Err(IngestError::PathEscapesRoot(declared.to_string())),
            }
        }
        if rel.as_os_str().is_empty() {
            return Err(IngestError::PathEscapesRoot(declared.to_string()));
        }
        Ok(rel)
    }

    /// Write a reduced copy of `img` next to the primary file.
    /// Best-effort: failures are logged and the record keeps only its
    /// main and meta artifacts.
    fn generate_thumbnail(
        &self,
        data_rel: &Path,
        img: &DynamicImage,
        max_dim: u32,
    ) -> Option<NewArtifact> {
        let ext = data_rel.extension()?.to_str()?;
        let thumb_rel = data_rel.with_extension(format!("thumbnail.{ext}"));
        let thumb_path = self.config.root.join(&thumb_rel);

        let reduced = img.thumbnail(max_dim, max_dim);
        if let Err(err) = reduced.save(&thumb_path) {
            warn!(path = %thumb_path.display(), error = %err, "thumbnail generation failed");
            return None;
        }
        let size = match fs::metadata(&thumb_path) {
            Ok(meta) => meta.len(),
            Err(err) => {
                warn!(path = %thumb_path.display(), error = %err, "thumbnail stat failed");
                return None;
            }
        };
        debug!(path = %thumb_rel.display(), size, "generated thumbnail");

        Some(NewArtifact {
            role: ArtifactRole::Thumbnail,
            path: rel_str(&thumb_rel).ok()?,
            size,
        })
    }

    fn unlink_artifact(&self, rel: &str) -> Result<()> {
        let path = self.config.root.join(rel);
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            // Already gone is fine, the catalog row is what matters.
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(err) => Err(err.into()),
        }
    }

    /// Remove empty directories bottom-up, leaving the root itself in
    /// place. A directory vanishing mid-walk counts as already pruned;
    /// same policy as `unlink_artifact`.
    fn prune_empty_dirs(&self, dir: &Path, dry_run: bool) -> Result<usize> {
        let entries = match fs::read_dir(dir) {
            Ok(entries) => entries,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(0),
            Err(err) => return Err(err.into()),
        };
        let mut pruned = 0;
        for entry in entries {
            let entry = entry?;
            if entry.file_type()?.is_dir() {
                pruned += self.prune_empty_dirs(&entry.path(), dry_run)?;
            }
        }
        if dir == self.config.root {
            return Ok(pruned);
        }
        let now_empty = match fs::read_dir(dir) {
            Ok(mut entries) => entries.next().is_none(),
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(pruned),
            Err(err) => return Err(err.into()),
        };
        if now_empty {
            info!(path = %dir.display(), dry_run, "removing empty directory");
            if !dry_run {
                match fs::remove_dir(dir) {
                    Ok(()) => {}
                    Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(pruned),
                    Err(err) => return Err(err.into()),
                }
            }
            pruned += 1;
        }
        Ok(pruned)
    }
}

fn rel_str(path: &Path) -> Result<String> {
    path.to_str()
        .map(str::to_string)
        .ok_or_else(|| IngestError::UnparseableFilename(path.display().to_string()))
}
