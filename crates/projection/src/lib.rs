//! Geodetic reference ellipsoids and the geostationary satellite projection.
//!
//! The math follows the PROJ `geos` projection: forward maps geodetic
//! longitude/latitude to normalized scan-angle coordinates as seen from a
//! geostationary satellite, reverse maps scan angles back to the ellipsoid.

pub mod ellipsoid;
pub mod error;
pub mod geostationary;

pub use ellipsoid::{Ellipsoid, Shape};
pub use error::ProjectionError;
pub use geostationary::{GeosProjection, SweepAxis};
