//! Earth reference ellipsoids.
//!
//! An ellipsoid is described by its semimajor axis and eccentricity
//! squared; all other shape parameters are converted on construction.

use crate::error::{ProjectionError, Result};

/// Mean Earth radius in meters, used for the default spherical model.
pub const MEAN_EARTH_RADIUS: f64 = 6_371_008.8;

/// A single alternative shape parameter for an ellipsoid.
///
/// Exactly one of these, together with the semimajor axis, fixes the
/// ellipsoid shape.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Shape {
    /// Reverse flattening (1/f), e.g. 298.257 for GRS80.
    ReverseFlattening(f64),
    /// Flattening f.
    Flattening(f64),
    /// Eccentricity squared e².
    EccentricitySquared(f64),
    /// Eccentricity e.
    Eccentricity(f64),
    /// Semiminor axis b in the same units as the semimajor axis.
    SemiminorAxis(f64),
}

/// An Earth reference ellipsoid.
///
/// Immutable once constructed; the derived `one_es` and `rone_es`
/// values are pure functions of `a` and `es`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ellipsoid {
    /// Semimajor axis (meters).
    pub a: f64,
    /// Eccentricity squared.
    pub es: f64,
    /// 1 - e².
    pub one_es: f64,
    /// 1 / (1 - e²).
    pub rone_es: f64,
}

impl Ellipsoid {
    fn from_eccentricity_squared(a: f64, es: f64) -> Result<Self> {
        if !(0.0..1.0).contains(&es) {
            return Err(ProjectionError::InvalidShape(es));
        }
        let one_es = 1.0 - es;
        Ok(Self {
            a,
            es,
            one_es,
            rone_es: 1.0 / one_es,
        })
    }

    /// Build an ellipsoid from a semimajor axis and one shape parameter.
    pub fn from_shape(a: f64, shape: Shape) -> Result<Self> {
        let es = match shape {
            Shape::ReverseFlattening(rf) => {
                let f = 1.0 / rf;
                2.0 * f - f * f
            }
            Shape::Flattening(f) => 2.0 * f - f * f,
            Shape::EccentricitySquared(es) => es,
            Shape::Eccentricity(e) => e * e,
            Shape::SemiminorAxis(b) => 1.0 - (b * b) / (a * a),
        };
        Self::from_eccentricity_squared(a, es)
    }

    /// A spherical model with zero eccentricity.
    pub fn from_sphere(radius: f64) -> Self {
        Self {
            a: radius,
            es: 0.0,
            one_es: 1.0,
            rone_es: 1.0,
        }
    }

    /// The default spherical model using the mean Earth radius.
    pub fn mean_sphere() -> Self {
        Self::from_sphere(MEAN_EARTH_RADIUS)
    }

    /// Look up a named reference ellipsoid.
    ///
    /// Currently only `GRS80` is defined, which is what GOES LRIT/HRIT
    /// navigation assumes.
    pub fn from_name(name: &str) -> Result<Self> {
        match name {
            "GRS80" => Self::from_shape(6_378_137.0, Shape::ReverseFlattening(298.257_222_101)),
            other => Err(ProjectionError::UnknownEllipsoid(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grs80_parameters() {
        let e = Ellipsoid::from_name("GRS80").unwrap();
        assert_eq!(e.a, 6_378_137.0);
        // Known GRS80 e² to 12 digits
        assert!((e.es - 0.006_694_380_022_9).abs() < 1e-12);
        assert!((e.one_es - (1.0 - e.es)).abs() < 1e-15);
        assert!((e.rone_es * e.one_es - 1.0).abs() < 1e-15);
    }

    #[test]
    fn test_unknown_name() {
        assert!(matches!(
            Ellipsoid::from_name("WGS84-ish"),
            Err(ProjectionError::UnknownEllipsoid(_))
        ));
    }

    #[test]
    fn test_sphere_has_zero_eccentricity() {
        let e = Ellipsoid::from_sphere(1000.0);
        assert_eq!(e.es, 0.0);
        assert_eq!(e.one_es, 1.0);
        assert_eq!(e.rone_es, 1.0);
    }

    #[test]
    fn test_shape_parameters_agree() {
        let a = 6_378_137.0;
        let rf = Ellipsoid::from_shape(a, Shape::ReverseFlattening(298.257_222_101)).unwrap();
        let f = Ellipsoid::from_shape(a, Shape::Flattening(1.0 / 298.257_222_101)).unwrap();
        let es = Ellipsoid::from_shape(a, Shape::EccentricitySquared(rf.es)).unwrap();
        let e = Ellipsoid::from_shape(a, Shape::Eccentricity(rf.es.sqrt())).unwrap();
        let b = Ellipsoid::from_shape(a, Shape::SemiminorAxis(a * (1.0 - 1.0 / 298.257_222_101)))
            .unwrap();

        assert!((rf.es - f.es).abs() < 1e-15);
        assert!((rf.es - es.es).abs() < 1e-15);
        assert!((rf.es - e.es).abs() < 1e-15);
        assert!((rf.es - b.es).abs() < 1e-9);
    }

    #[test]
    fn test_invalid_shape_rejected() {
        assert!(matches!(
            Ellipsoid::from_shape(6_378_137.0, Shape::EccentricitySquared(1.5)),
            Err(ProjectionError::InvalidShape(_))
        ));
        assert!(matches!(
            Ellipsoid::from_shape(6_378_137.0, Shape::EccentricitySquared(-0.1)),
            Err(ProjectionError::InvalidShape(_))
        ));
    }
}
