//! Error types for the projection crate.

use thiserror::Error;

/// Errors that can occur constructing projections or ellipsoids.
#[derive(Error, Debug)]
pub enum ProjectionError {
    #[error("Satellite height must be positive, got {0}")]
    InvalidHeight(f64),

    #[error("Unknown sweep axis: {0}")]
    InvalidSweepAxis(String),

    #[error("Shape parameter yields invalid eccentricity squared: {0}")]
    InvalidShape(f64),

    #[error("Unknown ellipsoid: {0}")]
    UnknownEllipsoid(String),
}

/// Result type for projection operations.
pub type Result<T> = std::result::Result<T, ProjectionError>;
