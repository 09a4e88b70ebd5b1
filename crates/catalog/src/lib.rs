//! Catalog of ingested GOES products.
//!
//! One logical record per received product, with role-tagged artifact
//! rows (primary data file, metadata sidecar, optional thumbnail or
//! timelapse) and a small table of deduplicated image projections
//! shared across records.
//!
//! Backed by SQLite through sqlx. The ingestion pipeline is the single
//! writer; the web layer reads concurrently and only ever observes
//! committed batches.

pub mod error;
pub mod model;
pub mod projection_params;
pub mod store;

pub use error::{CatalogError, CatalogResult};
pub use model::{
    Artifact, ArtifactRole, CatalogRecord, EvictionCandidate, FilterField, MapStyle,
    NewArtifact, NewRecord, RecordFilter, RecordKind,
};
pub use projection_params::{ProjectionParams, StoredProjection, GEOS_SATELLITE_HEIGHT, NAV_SCALE_FACTOR};
pub use store::Catalog;
