//! Record and artifact types stored in the catalog.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Role of a physical file belonging to a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ArtifactRole {
    /// Primary data file.
    Main,
    /// JSON metadata sidecar.
    Meta,
    /// Derived thumbnail image.
    Thumbnail,
    /// Derived timelapse video.
    Timelapse,
}

impl ArtifactRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Main => "main",
            Self::Meta => "meta",
            Self::Thumbnail => "thumbnail",
            Self::Timelapse => "timelapse",
        }
    }

    pub fn from_str(s: &str) -> Self {
        match s {
            "meta" => Self::Meta,
            "thumbnail" => Self::Thumbnail,
            "timelapse" => Self::Timelapse,
            _ => Self::Main,
        }
    }
}

/// Broad product classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RecordKind {
    /// Decodable imagery (full-disk, mesoscale, ...).
    Image,
    /// Everything else: text bulletins, EMWIN files, undecodable data.
    Text,
}

impl RecordKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Image => "image",
            Self::Text => "text",
        }
    }

    pub fn from_str(s: &str) -> Self {
        match s {
            "image" => Self::Image,
            _ => Self::Text,
        }
    }
}

/// Rendering style of an image product, derived from the channel name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MapStyle {
    Normal,
    Enhanced,
    FalseColor,
}

impl MapStyle {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Normal => "normal",
            Self::Enhanced => "enhanced",
            Self::FalseColor => "falsecolor",
        }
    }

    pub fn from_str(s: &str) -> Self {
        match s {
            "enhanced" => Self::Enhanced,
            "falsecolor" => Self::FalseColor,
            _ => Self::Normal,
        }
    }
}

/// A record to be inserted, before it has an id.
#[derive(Debug, Clone)]
pub struct NewRecord {
    pub name: String,
    pub captured_at: DateTime<Utc>,
    pub kind: RecordKind,
    pub style: Option<MapStyle>,
    pub source: Option<String>,
    pub region: Option<String>,
    pub channel: Option<String>,
    pub nnn: Option<String>,
    pub xxx: Option<String>,
    /// Raw sidecar JSON, kept verbatim.
    pub meta_json: String,
    pub projection_id: Option<i64>,
}

/// A physical file belonging to a record. Paths are relative to the
/// catalog root and unique catalog-wide.
#[derive(Debug, Clone)]
pub struct NewArtifact {
    pub role: ArtifactRole,
    pub path: String,
    pub size: u64,
}

/// A committed artifact row.
#[derive(Debug, Clone)]
pub struct Artifact {
    pub record_id: i64,
    pub role: ArtifactRole,
    pub path: String,
    pub size: u64,
}

/// A committed catalog record.
#[derive(Debug, Clone)]
pub struct CatalogRecord {
    pub id: i64,
    pub name: String,
    pub captured_at: DateTime<Utc>,
    pub kind: RecordKind,
    pub style: Option<MapStyle>,
    pub source: Option<String>,
    pub region: Option<String>,
    pub channel: Option<String>,
    pub nnn: Option<String>,
    pub xxx: Option<String>,
    pub projection_id: Option<i64>,
}

/// An eviction candidate: a record with its total artifact size and
/// the backing files to unlink.
#[derive(Debug, Clone)]
pub struct EvictionCandidate {
    pub id: i64,
    pub captured_at: DateTime<Utc>,
    pub total_size: u64,
    /// (relative path, size) per artifact.
    pub artifacts: Vec<(String, u64)>,
}

/// The fixed set of indexed fields that filters may constrain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterField {
    Kind,
    Source,
    Region,
    Channel,
    Style,
    Nnn,
}

impl FilterField {
    /// Column name; fixed set, safe to splice into SQL.
    pub fn column(&self) -> &'static str {
        match self {
            Self::Kind => "kind",
            Self::Source => "source",
            Self::Region => "region",
            Self::Channel => "channel",
            Self::Style => "style",
            Self::Nnn => "nnn",
        }
    }
}

/// Conjunctive equality filter over the indexed record fields.
#[derive(Debug, Clone, Default)]
pub struct RecordFilter {
    pub kind: Option<String>,
    pub source: Option<String>,
    pub region: Option<String>,
    pub channel: Option<String>,
    pub style: Option<String>,
    pub nnn: Option<String>,
}

impl RecordFilter {
    /// (field, value) pairs for every constrained field.
    pub fn terms(&self) -> Vec<(FilterField, &str)> {
        let mut terms = Vec::new();
        if let Some(v) = &self.kind {
            terms.push((FilterField::Kind, v.as_str()));
        }
        if let Some(v) = &self.source {
            terms.push((FilterField::Source, v.as_str()));
        }
        if let Some(v) = &self.region {
            terms.push((FilterField::Region, v.as_str()));
        }
        if let Some(v) = &self.channel {
            terms.push((FilterField::Channel, v.as_str()));
        }
        if let Some(v) = &self.style {
            terms.push((FilterField::Style, v.as_str()));
        }
        if let Some(v) = &self.nnn {
            terms.push((FilterField::Nnn, v.as_str()));
        }
        terms
    }

    /// Append `AND r.<col> = ?` for every constrained field.
    pub fn push_sql(&self, sql: &mut String) {
        for (field, _) in self.terms() {
            sql.push_str(" AND r.");
            sql.push_str(field.column());
            sql.push_str(" = ?");
        }
    }
}
