//! Error types for the ingestion crate.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur during ingestion.
///
/// Everything except `Catalog` is isolated per sidecar: the pipeline
/// logs it and moves on to the next file. Catalog failures abort the
/// run with no partial commit.
#[derive(Error, Debug)]
pub enum IngestError {
    #[error("Failed to read file: {0}")]
    FileRead(#[from] std::io::Error),

    #[error("Failed to parse sidecar JSON: {0}")]
    SidecarParse(#[from] serde_json::Error),

    #[error("Unparseable filename: {0}")]
    UnparseableFilename(String),

    #[error("Declared artifact missing: {0}")]
    ArtifactMissing(PathBuf),

    #[error("Declared path escapes the catalog root: {0}")]
    PathEscapesRoot(String),

    #[error("Sidecar missing required field: {0}")]
    MissingSidecarField(&'static str),

    #[error("Catalog error: {0}")]
    Catalog(#[from] catalog::CatalogError),
}

impl IngestError {
    /// Whether this error aborts the whole run instead of skipping one
    /// sidecar.
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::Catalog(_))
    }
}

/// Result type for ingestion operations.
pub type Result<T> = std::result::Result<T, IngestError>;
