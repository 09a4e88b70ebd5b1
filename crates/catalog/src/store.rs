//! SQLite-backed catalog store.
//!
//! Write operations take an explicit connection so the ingestion
//! pipeline can batch a whole run into one transaction (with a
//! savepoint per record); read operations go through the pool.

use std::path::Path;

use chrono::{DateTime, Utc};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use sqlx::{Sqlite, SqliteConnection, Transaction};
use tracing::info;

use crate::error::{CatalogError, CatalogResult};
use crate::model::{
    Artifact, ArtifactRole, CatalogRecord, EvictionCandidate, FilterField, MapStyle,
    NewArtifact, NewRecord, RecordFilter, RecordKind,
};
use crate::projection_params::{ProjectionParams, StoredProjection};

/// Connection pool and catalog operations.
#[derive(Clone)]
pub struct Catalog {
    pool: SqlitePool,
}

impl Catalog {
    /// Open or create the catalog database at the given path.
    pub async fn connect(path: &Path) -> CatalogResult<Self> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(sqlx::Error::Io)?;
        }

        let options = SqliteConnectOptions::new()
            .filename(path)
            .create_if_missing(true)
            .foreign_keys(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(options)
            .await?;

        info!(path = %path.display(), "Opened catalog database");

        Ok(Self { pool })
    }

    /// Open an in-memory database (for testing).
    pub async fn open_memory() -> CatalogResult<Self> {
        let options = SqliteConnectOptions::new()
            .filename(":memory:")
            .create_if_missing(true)
            .foreign_keys(true);

        // A single connection: in-memory databases are per-connection.
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect_with(options)
            .await?;

        let catalog = Self { pool };
        catalog.migrate().await?;
        Ok(catalog)
    }

    /// Create the schema if it does not exist.
    pub async fn migrate(&self) -> CatalogResult<()> {
        for statement in SCHEMA_SQL.split(';') {
            let trimmed = statement.trim();
            if !trimmed.is_empty() {
                sqlx::query(trimmed).execute(&self.pool).await?;
            }
        }
        Ok(())
    }

    /// Begin a write transaction.
    pub async fn begin(&self) -> CatalogResult<Transaction<'static, Sqlite>> {
        Ok(self.pool.begin().await?)
    }

    // === writes (single ingestion writer, inside a transaction) ===

    /// Whether an artifact with this relative path is already cataloged.
    pub async fn artifact_exists(
        conn: &mut SqliteConnection,
        path: &str,
    ) -> CatalogResult<bool> {
        let count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM artifacts WHERE path = ?")
            .bind(path)
            .fetch_one(conn)
            .await?;
        Ok(count.0 > 0)
    }

    /// Insert a record with its artifact rows. Records are insert-once:
    /// callers must check `artifact_exists` first; a duplicate artifact
    /// path fails the unique index.
    pub async fn insert_record(
        conn: &mut SqliteConnection,
        record: &NewRecord,
        artifacts: &[NewArtifact],
    ) -> CatalogResult<i64> {
        let result = sqlx::query(
            r#"
            INSERT INTO records (
                name, captured_at, kind, style, source, region, channel,
                nnn, xxx, meta_json, projection_id
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&record.name)
        .bind(record.captured_at.to_rfc3339())
        .bind(record.kind.as_str())
        .bind(record.style.map(|s| s.as_str()))
        .bind(&record.source)
        .bind(&record.region)
        .bind(&record.channel)
        .bind(&record.nnn)
        .bind(&record.xxx)
        .bind(&record.meta_json)
        .bind(record.projection_id)
        .execute(&mut *conn)
        .await?;

        let record_id = result.last_insert_rowid();

        for artifact in artifacts {
            sqlx::query("INSERT INTO artifacts (record_id, role, path, size) VALUES (?, ?, ?, ?)")
                .bind(record_id)
                .bind(artifact.role.as_str())
                .bind(&artifact.path)
                .bind(artifact.size as i64)
                .execute(&mut *conn)
                .await?;
        }

        Ok(record_id)
    }

    /// Look up a stored projection with an identical 7-tuple, inserting
    /// the candidate when none exists. Single-writer only: no locking
    /// around the lookup/insert pair.
    pub async fn find_or_insert_projection(
        conn: &mut SqliteConnection,
        params: &ProjectionParams,
    ) -> CatalogResult<StoredProjection> {
        let existing: Option<(i64,)> = sqlx::query_as(
            r#"
            SELECT id FROM projections
            WHERE width = ? AND height = ?
              AND x_offset = ? AND y_offset = ?
              AND x_scale = ? AND y_scale = ?
              AND lon_0 = ?
            "#,
        )
        .bind(params.width)
        .bind(params.height)
        .bind(params.x_offset)
        .bind(params.y_offset)
        .bind(params.x_scale)
        .bind(params.y_scale)
        .bind(params.lon_0)
        .fetch_optional(&mut *conn)
        .await?;

        if let Some((id,)) = existing {
            return StoredProjection::new(id, params.clone());
        }

        let result = sqlx::query(
            r#"
            INSERT INTO projections (width, height, x_offset, y_offset, x_scale, y_scale, lon_0)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(params.width)
        .bind(params.height)
        .bind(params.x_offset)
        .bind(params.y_offset)
        .bind(params.x_scale)
        .bind(params.y_scale)
        .bind(params.lon_0)
        .execute(&mut *conn)
        .await?;

        StoredProjection::new(result.last_insert_rowid(), params.clone())
    }

    /// Delete a record and its artifact rows.
    pub async fn delete_record(conn: &mut SqliteConnection, id: i64) -> CatalogResult<()> {
        sqlx::query("DELETE FROM artifacts WHERE record_id = ?")
            .bind(id)
            .execute(&mut *conn)
            .await?;
        sqlx::query("DELETE FROM records WHERE id = ?")
            .bind(id)
            .execute(&mut *conn)
            .await?;
        Ok(())
    }

    /// Page through records ordered by capture time ascending (oldest
    /// first), with total artifact sizes and backing file paths. The
    /// keyset cursor makes the scan restartable mid-eviction.
    pub async fn oldest_records(
        conn: &mut SqliteConnection,
        after: Option<(DateTime<Utc>, i64)>,
        limit: u32,
    ) -> CatalogResult<Vec<EvictionCandidate>> {
        let mut sql = String::from(
            "SELECT r.id, r.captured_at, COALESCE(SUM(a.size), 0) \
             FROM records r LEFT JOIN artifacts a ON a.record_id = r.id",
        );
        if after.is_some() {
            sql.push_str(" WHERE r.captured_at > ? OR (r.captured_at = ? AND r.id > ?)");
        }
        sql.push_str(" GROUP BY r.id ORDER BY r.captured_at ASC, r.id ASC LIMIT ?");

        let mut query = sqlx::query_as::<_, (i64, String, i64)>(&sql);
        if let Some((captured_at, id)) = &after {
            let ts = captured_at.to_rfc3339();
            query = query.bind(ts.clone()).bind(ts).bind(id);
        }
        let rows = query.bind(limit as i64).fetch_all(&mut *conn).await?;

        let mut candidates = Vec::with_capacity(rows.len());
        for (id, captured_at, total_size) in rows {
            let artifacts: Vec<(String, i64)> =
                sqlx::query_as("SELECT path, size FROM artifacts WHERE record_id = ? ORDER BY id")
                    .bind(id)
                    .fetch_all(&mut *conn)
                    .await?;

            candidates.push(EvictionCandidate {
                id,
                captured_at: parse_timestamp(&captured_at)?,
                total_size: total_size.max(0) as u64,
                artifacts: artifacts
                    .into_iter()
                    .map(|(path, size)| (path, size.max(0) as u64))
                    .collect(),
            });
        }

        Ok(candidates)
    }

    // === reads (pool, concurrent with the writer) ===

    /// Load a stored projection by id.
    pub async fn get_projection(&self, id: i64) -> CatalogResult<Option<StoredProjection>> {
        let row: Option<(i32, i32, i32, i32, i32, i32, f64)> = sqlx::query_as(
            "SELECT width, height, x_offset, y_offset, x_scale, y_scale, lon_0 \
             FROM projections WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        match row {
            Some((width, height, x_offset, y_offset, x_scale, y_scale, lon_0)) => {
                let params = ProjectionParams {
                    width,
                    height,
                    x_offset,
                    y_offset,
                    x_scale,
                    y_scale,
                    lon_0,
                };
                Ok(Some(StoredProjection::new(id, params)?))
            }
            None => Ok(None),
        }
    }

    /// Number of stored projection rows.
    pub async fn count_projections(&self) -> CatalogResult<u64> {
        let count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM projections")
            .fetch_one(&self.pool)
            .await?;
        Ok(count.0 as u64)
    }

    /// Distinct non-null values of an indexed field, under a filter.
    pub async fn distinct_values(
        &self,
        field: FilterField,
        filter: &RecordFilter,
    ) -> CatalogResult<Vec<String>> {
        let mut sql = format!(
            "SELECT DISTINCT r.{col} FROM records r WHERE r.{col} IS NOT NULL",
            col = field.column()
        );
        filter.push_sql(&mut sql);
        sql.push_str(&format!(" ORDER BY r.{}", field.column()));

        let mut query = sqlx::query_as::<_, (String,)>(&sql);
        for (_, value) in filter.terms() {
            query = query.bind(value);
        }
        let rows = query.fetch_all(&self.pool).await?;
        Ok(rows.into_iter().map(|(v,)| v).collect())
    }

    /// Count of records matching a filter.
    pub async fn count_records(&self, filter: &RecordFilter) -> CatalogResult<u64> {
        let mut sql = String::from("SELECT COUNT(*) FROM records r WHERE 1 = 1");
        filter.push_sql(&mut sql);

        let mut query = sqlx::query_as::<_, (i64,)>(&sql);
        for (_, value) in filter.terms() {
            query = query.bind(value);
        }
        let count = query.fetch_one(&self.pool).await?;
        Ok(count.0 as u64)
    }

    /// Total size in bytes of all artifacts of matching records.
    pub async fn total_artifact_size(&self, filter: &RecordFilter) -> CatalogResult<u64> {
        let mut sql = String::from(
            "SELECT COALESCE(SUM(a.size), 0) FROM artifacts a \
             JOIN records r ON r.id = a.record_id WHERE 1 = 1",
        );
        filter.push_sql(&mut sql);

        let mut query = sqlx::query_as::<_, (i64,)>(&sql);
        for (_, value) in filter.terms() {
            query = query.bind(value);
        }
        let sum = query.fetch_one(&self.pool).await?;
        Ok(sum.0.max(0) as u64)
    }

    /// Records ordered by capture time, for the browsing layer.
    pub async fn records_by_capture(
        &self,
        filter: &RecordFilter,
        ascending: bool,
        limit: u32,
        offset: u32,
    ) -> CatalogResult<Vec<CatalogRecord>> {
        let mut sql = String::from(
            "SELECT r.id, r.name, r.captured_at, r.kind, r.style, r.source, \
             r.region, r.channel, r.nnn, r.xxx, r.projection_id \
             FROM records r WHERE 1 = 1",
        );
        filter.push_sql(&mut sql);
        sql.push_str(if ascending {
            " ORDER BY r.captured_at ASC, r.id ASC"
        } else {
            " ORDER BY r.captured_at DESC, r.id DESC"
        });
        sql.push_str(" LIMIT ? OFFSET ?");

        let mut query = sqlx::query_as::<_, RecordRow>(&sql);
        for (_, value) in filter.terms() {
            query = query.bind(value);
        }
        let rows = query
            .bind(limit as i64)
            .bind(offset as i64)
            .fetch_all(&self.pool)
            .await?;

        rows.into_iter().map(record_from_row).collect()
    }

    /// Load one record by id.
    pub async fn record_by_id(&self, id: i64) -> CatalogResult<Option<CatalogRecord>> {
        let row: Option<RecordRow> = sqlx::query_as(
            "SELECT r.id, r.name, r.captured_at, r.kind, r.style, r.source, \
             r.region, r.channel, r.nnn, r.xxx, r.projection_id \
             FROM records r WHERE r.id = ?",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(record_from_row).transpose()
    }

    /// Raw sidecar JSON for a record.
    pub async fn record_meta_json(&self, id: i64) -> CatalogResult<Option<String>> {
        let row: Option<(String,)> = sqlx::query_as("SELECT meta_json FROM records WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(|(json,)| json))
    }

    /// Artifact rows of a record.
    pub async fn record_artifacts(&self, id: i64) -> CatalogResult<Vec<Artifact>> {
        let rows: Vec<(String, String, i64)> =
            sqlx::query_as("SELECT role, path, size FROM artifacts WHERE record_id = ? ORDER BY id")
                .bind(id)
                .fetch_all(&self.pool)
                .await?;

        Ok(rows
            .into_iter()
            .map(|(role, path, size)| Artifact {
                record_id: id,
                role: ArtifactRole::from_str(&role),
                path,
                size: size.max(0) as u64,
            })
            .collect())
    }
}

type RecordRow = (
    i64,
    String,
    String,
    String,
    Option<String>,
    Option<String>,
    Option<String>,
    Option<String>,
    Option<String>,
    Option<String>,
    Option<i64>,
);

fn record_from_row(row: RecordRow) -> CatalogResult<CatalogRecord> {
    let (id, name, captured_at, kind, style, source, region, channel, nnn, xxx, projection_id) =
        row;
    Ok(CatalogRecord {
        id,
        name,
        captured_at: parse_timestamp(&captured_at)?,
        kind: RecordKind::from_str(&kind),
        style: style.as_deref().map(MapStyle::from_str),
        source,
        region,
        channel,
        nnn,
        xxx,
        projection_id,
    })
}

fn parse_timestamp(s: &str) -> CatalogResult<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|_| CatalogError::InvalidTimestamp(s.to_string()))
}

/// Database schema SQL.
const SCHEMA_SQL: &str = r#"
CREATE TABLE IF NOT EXISTS projections (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    width INTEGER NOT NULL,
    height INTEGER NOT NULL,
    x_offset INTEGER NOT NULL,
    y_offset INTEGER NOT NULL,
    x_scale INTEGER NOT NULL,
    y_scale INTEGER NOT NULL,
    lon_0 REAL NOT NULL
);

CREATE TABLE IF NOT EXISTS records (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL,
    captured_at TEXT NOT NULL,
    kind TEXT NOT NULL,
    style TEXT,
    source TEXT,
    region TEXT,
    channel TEXT,
    nnn TEXT,
    xxx TEXT,
    meta_json TEXT NOT NULL,
    projection_id INTEGER REFERENCES projections(id)
);

CREATE INDEX IF NOT EXISTS idx_records_captured_at ON records(captured_at);
CREATE INDEX IF NOT EXISTS idx_records_filter
    ON records(kind, source, region, channel, style, nnn);

CREATE TABLE IF NOT EXISTS artifacts (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    record_id INTEGER NOT NULL REFERENCES records(id) ON DELETE CASCADE,
    role TEXT NOT NULL,
    path TEXT NOT NULL UNIQUE,
    size INTEGER NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_artifacts_record ON artifacts(record_id);
"#;

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn sample_record(name: &str, hour: u32) -> NewRecord {
        NewRecord {
            name: name.to_string(),
            captured_at: Utc.with_ymd_and_hms(2020, 1, 1, hour, 0, 0).unwrap(),
            kind: RecordKind::Image,
            style: Some(MapStyle::FalseColor),
            source: Some("GOES16".to_string()),
            region: Some("FD".to_string()),
            channel: Some("FC".to_string()),
            nnn: None,
            xxx: None,
            meta_json: "{}".to_string(),
            projection_id: None,
        }
    }

    fn sample_params() -> ProjectionParams {
        ProjectionParams {
            width: 5424,
            height: 5424,
            x_offset: 2712,
            y_offset: 2712,
            x_scale: 20496160,
            y_scale: 20496160,
            lon_0: -75.0,
        }
    }

    #[tokio::test]
    async fn test_insert_and_exists() {
        let catalog = Catalog::open_memory().await.unwrap();
        let mut tx = catalog.begin().await.unwrap();

        assert!(!Catalog::artifact_exists(&mut tx, "goes16/a.json")
            .await
            .unwrap());

        let record = sample_record("GOES16_FD_FC", 0);
        let artifacts = vec![
            NewArtifact {
                role: ArtifactRole::Main,
                path: "goes16/a.jpg".to_string(),
                size: 100,
            },
            NewArtifact {
                role: ArtifactRole::Meta,
                path: "goes16/a.json".to_string(),
                size: 10,
            },
        ];
        let id = Catalog::insert_record(&mut tx, &record, &artifacts)
            .await
            .unwrap();
        assert!(id > 0);
        assert!(Catalog::artifact_exists(&mut tx, "goes16/a.json")
            .await
            .unwrap());
        tx.commit().await.unwrap();

        let loaded = catalog.record_by_id(id).await.unwrap().unwrap();
        assert_eq!(loaded.name, "GOES16_FD_FC");
        assert_eq!(loaded.kind, RecordKind::Image);
        assert_eq!(loaded.style, Some(MapStyle::FalseColor));
        assert_eq!(loaded.captured_at, record.captured_at);

        let artifacts = catalog.record_artifacts(id).await.unwrap();
        assert_eq!(artifacts.len(), 2);
        assert_eq!(artifacts[0].role, ArtifactRole::Main);
        assert_eq!(artifacts[1].path, "goes16/a.json");
    }

    #[tokio::test]
    async fn test_projection_dedup() {
        let catalog = Catalog::open_memory().await.unwrap();
        let mut tx = catalog.begin().await.unwrap();

        let first = Catalog::find_or_insert_projection(&mut tx, &sample_params())
            .await
            .unwrap();
        let second = Catalog::find_or_insert_projection(&mut tx, &sample_params())
            .await
            .unwrap();
        assert_eq!(first.id, second.id);

        // Each single-field difference yields a fresh row.
        let variants = [
            ProjectionParams { width: 1, ..sample_params() },
            ProjectionParams { height: 1, ..sample_params() },
            ProjectionParams { x_offset: 1, ..sample_params() },
            ProjectionParams { y_offset: 1, ..sample_params() },
            ProjectionParams { x_scale: 1, ..sample_params() },
            ProjectionParams { y_scale: 1, ..sample_params() },
            ProjectionParams { lon_0: -137.2, ..sample_params() },
        ];
        let mut seen = vec![first.id];
        for params in &variants {
            let stored = Catalog::find_or_insert_projection(&mut tx, params)
                .await
                .unwrap();
            assert!(!seen.contains(&stored.id), "expected a new row for {params:?}");
            seen.push(stored.id);
        }
        tx.commit().await.unwrap();

        assert_eq!(catalog.count_projections().await.unwrap(), 8);
    }

    #[tokio::test]
    async fn test_get_projection_roundtrip() {
        let catalog = Catalog::open_memory().await.unwrap();
        let mut tx = catalog.begin().await.unwrap();
        let stored = Catalog::find_or_insert_projection(&mut tx, &sample_params())
            .await
            .unwrap();
        tx.commit().await.unwrap();

        let loaded = catalog.get_projection(stored.id).await.unwrap().unwrap();
        assert_eq!(loaded.params, sample_params());

        // Reconstruction determinism: same pixel mapping either way.
        let a = stored.to_pixel(-80.0, 30.0).unwrap();
        let b = loaded.to_pixel(-80.0, 30.0).unwrap();
        assert_eq!(a, b);

        assert!(catalog.get_projection(9999).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_filters_and_distinct() {
        let catalog = Catalog::open_memory().await.unwrap();
        let mut tx = catalog.begin().await.unwrap();

        let mut r1 = sample_record("a", 0);
        r1.source = Some("GOES16".to_string());
        let mut r2 = sample_record("b", 1);
        r2.source = Some("GOES17".to_string());
        r2.kind = RecordKind::Text;
        r2.style = None;

        Catalog::insert_record(
            &mut tx,
            &r1,
            &[NewArtifact {
                role: ArtifactRole::Main,
                path: "1.jpg".to_string(),
                size: 7,
            }],
        )
        .await
        .unwrap();
        Catalog::insert_record(
            &mut tx,
            &r2,
            &[NewArtifact {
                role: ArtifactRole::Main,
                path: "2.txt".to_string(),
                size: 5,
            }],
        )
        .await
        .unwrap();
        tx.commit().await.unwrap();

        let all = RecordFilter::default();
        assert_eq!(catalog.count_records(&all).await.unwrap(), 2);
        assert_eq!(catalog.total_artifact_size(&all).await.unwrap(), 12);

        let images = RecordFilter {
            kind: Some("image".to_string()),
            ..Default::default()
        };
        assert_eq!(catalog.count_records(&images).await.unwrap(), 1);
        assert_eq!(catalog.total_artifact_size(&images).await.unwrap(), 7);

        let sources = catalog
            .distinct_values(FilterField::Source, &all)
            .await
            .unwrap();
        assert_eq!(sources, vec!["GOES16".to_string(), "GOES17".to_string()]);

        let sources = catalog
            .distinct_values(FilterField::Source, &images)
            .await
            .unwrap();
        assert_eq!(sources, vec!["GOES16".to_string()]);
    }

    #[tokio::test]
    async fn test_oldest_records_order_and_cursor() {
        let catalog = Catalog::open_memory().await.unwrap();
        let mut tx = catalog.begin().await.unwrap();

        // Insert newest first to prove ordering comes from captured_at.
        for (hour, name) in [(2, "newest"), (0, "oldest"), (1, "middle")] {
            Catalog::insert_record(
                &mut tx,
                &sample_record(name, hour),
                &[NewArtifact {
                    role: ArtifactRole::Main,
                    path: format!("{name}.jpg"),
                    size: 10 * (hour as u64 + 1),
                }],
            )
            .await
            .unwrap();
        }

        let first = Catalog::oldest_records(&mut tx, None, 2).await.unwrap();
        assert_eq!(first.len(), 2);
        assert_eq!(first[0].artifacts[0].0, "oldest.jpg");
        assert_eq!(first[0].total_size, 10);
        assert_eq!(first[1].artifacts[0].0, "middle.jpg");

        let cursor = Some((first[1].captured_at, first[1].id));
        let rest = Catalog::oldest_records(&mut tx, cursor, 2).await.unwrap();
        assert_eq!(rest.len(), 1);
        assert_eq!(rest[0].artifacts[0].0, "newest.jpg");
        tx.commit().await.unwrap();
    }

    #[tokio::test]
    async fn test_delete_record_cascades() {
        let catalog = Catalog::open_memory().await.unwrap();
        let mut tx = catalog.begin().await.unwrap();
        let id = Catalog::insert_record(
            &mut tx,
            &sample_record("a", 0),
            &[
                NewArtifact {
                    role: ArtifactRole::Main,
                    path: "a.jpg".to_string(),
                    size: 1,
                },
                NewArtifact {
                    role: ArtifactRole::Meta,
                    path: "a.json".to_string(),
                    size: 1,
                },
            ],
        )
        .await
        .unwrap();

        Catalog::delete_record(&mut tx, id).await.unwrap();
        assert!(!Catalog::artifact_exists(&mut tx, "a.jpg").await.unwrap());
        tx.commit().await.unwrap();

        assert!(catalog.record_by_id(id).await.unwrap().is_none());
        assert_eq!(
            catalog.count_records(&RecordFilter::default()).await.unwrap(),
            0
        );
    }

    #[tokio::test]
    async fn test_records_by_capture_paging() {
        let catalog = Catalog::open_memory().await.unwrap();
        let mut tx = catalog.begin().await.unwrap();
        for hour in 0..5 {
            Catalog::insert_record(
                &mut tx,
                &sample_record(&format!("r{hour}"), hour),
                &[NewArtifact {
                    role: ArtifactRole::Main,
                    path: format!("r{hour}.jpg"),
                    size: 1,
                }],
            )
            .await
            .unwrap();
        }
        tx.commit().await.unwrap();

        let filter = RecordFilter::default();
        let newest = catalog
            .records_by_capture(&filter, false, 2, 0)
            .await
            .unwrap();
        assert_eq!(newest.len(), 2);
        assert_eq!(newest[0].name, "r4");
        assert_eq!(newest[1].name, "r3");

        let page2 = catalog
            .records_by_capture(&filter, false, 2, 2)
            .await
            .unwrap();
        assert_eq!(page2[0].name, "r2");

        let oldest = catalog
            .records_by_capture(&filter, true, 1, 0)
            .await
            .unwrap();
        assert_eq!(oldest[0].name, "r0");
    }
}
