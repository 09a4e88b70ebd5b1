//! Error types for the catalog crate.

use thiserror::Error;

/// Errors raised by catalog operations.
#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Projection error: {0}")]
    Projection(#[from] projection::ProjectionError),

    #[error("Invalid stored timestamp: {0}")]
    InvalidTimestamp(String),
}

/// Result type for catalog operations.
pub type CatalogResult<T> = std::result::Result<T, CatalogError>;
