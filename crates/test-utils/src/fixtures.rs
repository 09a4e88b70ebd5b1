//! Canned sidecar documents for goesdex tests.
//!
//! The values mirror what goestools emits for GOES-16 full-disk
//! products: a `Path` pointing at the primary file, a `TimeStamp`
//! block, and for images an `ImageNavigation` block.

use serde_json::{json, Value};

/// Navigation constants for a GOES-16 full-disk ABI image.
pub mod full_disk {
    pub const PROJECTION_NAME: &str = "geos(-75.0)";
    pub const COLUMN_OFFSET: i64 = 2712;
    pub const LINE_OFFSET: i64 = 2712;
    pub const COLUMN_SCALING: i64 = 20496160;
    pub const LINE_SCALING: i64 = 20496160;
}

/// A sidecar for an image product, with a full-disk navigation block.
pub fn image_sidecar(data_path: &str, iso_timestamp: &str) -> Value {
    json!({
        "Path": data_path,
        "TimeStamp": { "ISO8601": iso_timestamp },
        "ImageNavigation": {
            "ProjectionName": full_disk::PROJECTION_NAME,
            "ColumnOffset": full_disk::COLUMN_OFFSET,
            "LineOffset": full_disk::LINE_OFFSET,
            "ColumnScaling": full_disk::COLUMN_SCALING,
            "LineScaling": full_disk::LINE_SCALING,
        },
    })
}

/// A sidecar for an image product with no navigation block.
pub fn plain_image_sidecar(data_path: &str, iso_timestamp: &str) -> Value {
    json!({
        "Path": data_path,
        "TimeStamp": { "ISO8601": iso_timestamp },
    })
}

/// A sidecar for a text product.
pub fn text_sidecar(data_path: &str, iso_timestamp: &str) -> Value {
    json!({
        "Path": data_path,
        "TimeStamp": { "ISO8601": iso_timestamp },
    })
}

/// A sidecar with no timestamp block, so the filename stamp wins.
pub fn untimed_sidecar(data_path: &str) -> Value {
    json!({ "Path": data_path })
}
