//! Geostationary satellite view projection.
//!
//! The satellite sits above the equator at a fixed longitude and images
//! the Earth disc. Forward maps geodetic lon/lat (degrees) to normalized
//! scan-angle coordinates; reverse maps scan angles back to lon/lat.
//! Points on the far side of the ellipsoid are not visible and map to
//! `None` in both directions.
//!
//! The math follows the PROJ `geos` projection.

use std::str::FromStr;

use crate::ellipsoid::Ellipsoid;
use crate::error::{ProjectionError, Result};

/// Scan geometry axis of the imaging instrument.
///
/// GOES LRIT/HRIT imagery sweeps along the x axis; Meteosat and
/// Himawari sweep along y.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SweepAxis {
    X,
    Y,
}

impl FromStr for SweepAxis {
    type Err = ProjectionError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "x" | "X" => Ok(SweepAxis::X),
            "y" | "Y" => Ok(SweepAxis::Y),
            other => Err(ProjectionError::InvalidSweepAxis(other.to_string())),
        }
    }
}

/// Geostationary projection for one satellite position.
///
/// All derived radii are computed once at construction and depend only
/// on the inputs, so a projector rebuilt from stored parameters is
/// identical to the one that produced them.
#[derive(Debug, Clone)]
pub struct GeosProjection {
    /// Satellite height above the ellipsoid surface (meters).
    pub h: f64,
    /// Sweep angle axis.
    pub sweep: SweepAxis,
    /// Longitude of the sub-satellite point (degrees).
    pub lon_0: f64,
    /// Earth model.
    pub ellipsoid: Ellipsoid,

    // Derived constants, all normalized by the semimajor axis.
    radius_g_1: f64,
    radius_g: f64,
    c: f64,
    radius_p: f64,
    radius_p2: f64,
    radius_p_inv2: f64,
    flip_axis: bool,
}

impl GeosProjection {
    /// Create a projection for a satellite at `h` meters above the
    /// ellipsoid, at longitude `lon_0_deg`.
    pub fn new(h: f64, sweep: SweepAxis, lon_0_deg: f64, ellipsoid: Ellipsoid) -> Result<Self> {
        if h <= 0.0 {
            return Err(ProjectionError::InvalidHeight(h));
        }

        let radius_g_1 = h / ellipsoid.a;
        let radius_g = 1.0 + radius_g_1;
        let c = radius_g * radius_g - 1.0;

        let (radius_p, radius_p2, radius_p_inv2) = if ellipsoid.es != 0.0 {
            (ellipsoid.one_es.sqrt(), ellipsoid.one_es, ellipsoid.rone_es)
        } else {
            (1.0, 1.0, 1.0)
        };

        Ok(Self {
            h,
            sweep,
            lon_0: lon_0_deg,
            ellipsoid,
            radius_g_1,
            radius_g,
            c,
            radius_p,
            radius_p2,
            radius_p_inv2,
            flip_axis: sweep == SweepAxis::X,
        })
    }

    /// Forward transform: geodetic lon/lat (degrees) to normalized scan
    /// angles. Returns `None` when the point is not visible from the
    /// satellite.
    pub fn forward(&self, lon_deg: f64, lat_deg: f64) -> Option<(f64, f64)> {
        let lam = (lon_deg - self.lon_0).to_radians();
        // Geodetic latitude to geocentric.
        let phi = (self.radius_p2 * lat_deg.to_radians().tan()).atan();

        // View vector from Earth center to the surface point, in units
        // of the equatorial radius.
        let r = self.radius_p
            / ((self.radius_p * phi.cos()).powi(2) + phi.sin().powi(2)).sqrt();
        let vx = r * lam.cos() * phi.cos();
        let vy = r * lam.sin() * phi.cos();
        let vz = r * phi.sin();

        // Visibility: the point must be on the near side of the ellipsoid.
        let tmp = self.radius_g - vx;
        if tmp * vx - vy * vy - vz * vz * self.radius_p_inv2 < 0.0 {
            return None;
        }

        let (x, y) = if self.flip_axis {
            (
                self.radius_g_1 * (vy / (vz * vz + tmp * tmp).sqrt()).atan(),
                self.radius_g_1 * (vz / tmp).atan(),
            )
        } else {
            (
                self.radius_g_1 * (vy / tmp).atan(),
                self.radius_g_1 * (vz / (vy * vy + tmp * tmp).sqrt()).atan(),
            )
        };

        Some((x, y))
    }

    /// Reverse transform: normalized scan angles back to geodetic
    /// lon/lat (degrees). Returns `None` when the ray misses the
    /// ellipsoid.
    pub fn reverse(&self, x: f64, y: f64) -> Option<(f64, f64)> {
        // Direction of the line of sight from the satellite.
        let vx = -1.0;
        let (vy, vz) = if self.flip_axis {
            let vz = (y / self.radius_g_1).tan();
            let vy = (x / self.radius_g_1).tan() * (1.0 + vz * vz).sqrt();
            (vy, vz)
        } else {
            let vy = (x / self.radius_g_1).tan();
            let vz = (y / self.radius_g_1).tan() * (1.0 + vy * vy).sqrt();
            (vy, vz)
        };

        // Intersection of the ray with the ellipsoid: quadratic in the
        // line-of-sight parameter k.
        let a = vx * vx + vy * vy + (vz / self.radius_p).powi(2);
        let b = 2.0 * self.radius_g * vx;
        let det = b * b - 4.0 * a * self.c;
        if det < 0.0 {
            return None;
        }

        let k = (-b - det.sqrt()) / (2.0 * a);
        let vx = self.radius_g + k * vx;
        let vy = k * vy;
        let vz = k * vz;

        let lam = vy.atan2(vx);
        // Geocentric latitude back to geodetic.
        let phi = (vz * lam.cos() / vx).atan();
        let phi = (self.radius_p_inv2 * phi.tan()).atan();

        Some((lam.to_degrees() + self.lon_0, phi.to_degrees()))
    }
}
