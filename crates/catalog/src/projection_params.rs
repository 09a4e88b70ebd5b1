//! Deduplicated image projections and the pixel mapping.
//!
//! Many received images share the same satellite geometry; the catalog
//! stores each distinct parameter set once and records reference it.

use projection::{Ellipsoid, GeosProjection, SweepAxis};
use serde_json::Value;

use crate::error::CatalogResult;

/// Height of the GOES satellites above the ellipsoid surface (meters).
pub const GEOS_SATELLITE_HEIGHT: f64 = 35_786_023.0;

/// Prefactor bridging LRIT navigation ColumnScaling/LineScaling units
/// to the projector's normalized scan-angle output. Hand-tuned against
/// received imagery; nobody has derived it from first principles yet.
pub const NAV_SCALE_FACTOR: f64 = 0.000_155_799_131_554_172_3;

/// The comparable parameter set of a stored projection.
///
/// Two navigation blocks describe the same projection exactly when all
/// seven fields match.
#[derive(Debug, Clone, PartialEq)]
pub struct ProjectionParams {
    pub width: i32,
    pub height: i32,
    pub x_offset: i32,
    pub y_offset: i32,
    pub x_scale: i32,
    pub y_scale: i32,
    pub lon_0: f64,
}

impl ProjectionParams {
    /// Extract parameters from an `ImageNavigation` block.
    ///
    /// Returns `None` when any required key is absent or the projection
    /// name is not a `geos(<longitude>)` form; both just mean the image
    /// carries no usable navigation.
    pub fn from_navigation(width: i32, height: i32, nav: &Value) -> Option<Self> {
        let x_offset = nav.get("ColumnOffset")?.as_i64()? as i32;
        let y_offset = nav.get("LineOffset")?.as_i64()? as i32;
        let x_scale = nav.get("ColumnScaling")?.as_i64()? as i32;
        let y_scale = nav.get("LineScaling")?.as_i64()? as i32;
        let name = nav.get("ProjectionName")?.as_str()?;
        let lon_0 = parse_geos_longitude(name)?;

        Some(Self {
            width,
            height,
            x_offset,
            y_offset,
            x_scale,
            y_scale,
            lon_0,
        })
    }

    /// Extract parameters from a whole sidecar document, taking the
    /// image dimensions from `SegmentIdentification` (preferred) or
    /// `ImageStructure`. Used when the primary artifact could not be
    /// decoded for its dimensions.
    pub fn from_document(doc: &Value) -> Option<Self> {
        let (width, height) = document_dimensions(doc)?;
        let nav = doc.get("ImageNavigation")?;
        Self::from_navigation(width, height, nav)
    }
}

/// Image dimensions declared in a sidecar document, if any.
pub fn document_dimensions(doc: &Value) -> Option<(i32, i32)> {
    if let Some(seg) = doc.get("SegmentIdentification") {
        if let (Some(w), Some(h)) = (
            seg.get("MaxColumn").and_then(Value::as_i64),
            seg.get("MaxLine").and_then(Value::as_i64),
        ) {
            return Some((w as i32, h as i32));
        }
    }
    let st = doc.get("ImageStructure")?;
    let w = st.get("Columns")?.as_i64()?;
    let h = st.get("Lines")?.as_i64()?;
    Some((w as i32, h as i32))
}

/// Parse a `geos(<signed float>)` projection name, case-insensitively.
fn parse_geos_longitude(name: &str) -> Option<f64> {
    let lower = name.trim().to_ascii_lowercase();
    let inner = lower.strip_prefix("geos(")?.strip_suffix(')')?;

    // Signed decimal only: optional sign, digits, at most one dot.
    let mut chars = inner.chars().peekable();
    if matches!(chars.peek(), Some('+') | Some('-')) {
        chars.next();
    }
    let mut digits = 0;
    let mut dots = 0;
    for c in chars {
        match c {
            '0'..='9' => digits += 1,
            '.' => dots += 1,
            _ => return None,
        }
    }
    if digits == 0 || dots > 1 {
        return None;
    }

    inner.parse::<f64>().ok()
}

/// A projection row as stored in the catalog, with its projector
/// rebuilt from the stored parameters.
#[derive(Debug, Clone)]
pub struct StoredProjection {
    pub id: i64,
    pub params: ProjectionParams,
    proj: GeosProjection,
}

impl StoredProjection {
    /// Rebuild the projector for a stored row. GOES LRIT navigation is
    /// always GRS80, x-sweep, at the fixed geostationary height; only
    /// the longitude varies.
    pub fn new(id: i64, params: ProjectionParams) -> CatalogResult<Self> {
        let proj = GeosProjection::new(
            GEOS_SATELLITE_HEIGHT,
            SweepAxis::X,
            params.lon_0,
            Ellipsoid::from_name("GRS80")?,
        )?;
        Ok(Self { id, params, proj })
    }

    /// Map geodetic lon/lat (degrees) to pixel coordinates of the
    /// referencing image. `None` when the point is not visible.
    pub fn to_pixel(&self, lon_deg: f64, lat_deg: f64) -> Option<(f64, f64)> {
        let (x, y) = self.proj.forward(lon_deg, lat_deg)?;
        let px = x * self.params.x_scale as f64 * NAV_SCALE_FACTOR + self.params.x_offset as f64;
        let py = -y * self.params.y_scale as f64 * NAV_SCALE_FACTOR + self.params.y_offset as f64;
        Some((px, py))
    }
}
