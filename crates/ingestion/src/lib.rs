//! GOES product ingestion library.
//!
//! Scans a directory tree of received products for JSON metadata
//! sidecars, extracts structured fields (capture time, satellite,
//! region, channel, navigation), registers them in the catalog, and
//! enforces a storage quota by evicting the oldest records.
//!
//! The pipeline is a batch job: one `update` pass indexes new files in
//! a single transaction, one `clean` pass evicts past-quota records and
//! prunes emptied directories.

pub mod error;
pub mod pipeline;
pub mod sidecar;

pub use error::{IngestError, Result};
pub use pipeline::{CleanSummary, Pipeline, PipelineConfig, UpdateSummary};
pub use sidecar::{normalize_channel, parse_stem, split_text_identifier, ParsedStem, SidecarDocument};
