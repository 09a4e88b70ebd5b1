//! Sidecar document access and filename heuristics.
//!
//! Received products arrive as a data file plus a JSON sidecar whose
//! stem encodes capture time and, depending on the upstream tool,
//! source/region/channel. The naming is inconsistent across upstreams,
//! so parsing is a chain of patterns tried in order.

use catalog::MapStyle;
use chrono::{DateTime, NaiveDateTime, Utc};
use serde_json::Value;

use crate::error::{IngestError, Result};

/// Timestamp format used in sidecar stems, e.g. `20200101T000000Z`.
const STEM_TIMESTAMP: &str = "%Y%m%dT%H%M%SZ";

/// Compact timestamp embedded in some text-product names, e.g.
/// `20200101123456-KWBC...`.
const EMBEDDED_TIMESTAMP: &str = "%Y%m%d%H%M%S";

/// AWIPS product category codes seen on the text feeds.
const AWIPS_NNN: &[&str] = &[
    "adm", "afd", "aww", "cap", "cli", "ffa", "ffw", "flw", "for", "fwf", "glf", "hur", "met",
    "now", "obs", "off", "omr", "osw", "otw", "pmd", "rep", "rfd", "rwr", "sab", "sel", "smw",
    "svr", "svs", "swo", "syn", "taf", "tcd", "tcm", "tcp", "tor", "tsu", "war", "wat", "wou",
    "wrn", "wsw", "zfp",
];

/// A parsed JSON sidecar.
///
/// Only a few keys are interpreted; the rest of the document is kept
/// verbatim and stored alongside the record.
#[derive(Debug)]
pub struct SidecarDocument {
    value: Value,
}

impl SidecarDocument {
    pub fn parse(raw: &str) -> Result<Self> {
        let value = serde_json::from_str(raw)?;
        Ok(Self { value })
    }

    /// Relative path of the primary data file this sidecar describes.
    pub fn primary_path(&self) -> Result<&str> {
        self.value
            .get("Path")
            .and_then(Value::as_str)
            .ok_or(IngestError::MissingSidecarField("Path"))
    }

    /// Capture timestamp from `TimeStamp.ISO8601`, when present.
    /// Authoritative over anything derived from the filename.
    pub fn iso_timestamp(&self) -> Option<DateTime<Utc>> {
        let raw = self.value.get("TimeStamp")?.get("ISO8601")?.as_str()?;
        NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%SZ")
            .ok()
            .map(|dt| dt.and_utc())
    }

    /// The `ImageNavigation` block, when present.
    pub fn navigation(&self) -> Option<&Value> {
        self.value.get("ImageNavigation")
    }

    pub fn as_value(&self) -> &Value {
        &self.value
    }
}

/// Fields recovered from a sidecar file stem.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedStem {
    pub name: String,
    pub source: Option<String>,
    pub region: Option<String>,
    pub channel: Option<String>,
    pub captured_at: DateTime<Utc>,
    pub meta_from_name: bool,
}

/// Split a sidecar stem into name, capture time, and (when the name
/// carries them) source/region/channel.
///
/// Patterns are tried in order and the first one whose timestamp
/// parses wins. `first_segment` is the top-level directory the sidecar
/// lives under, used as the source when the name carries no metadata.
pub fn parse_stem(stem: &str, first_segment: Option<&str>) -> Result<ParsedStem> {
    let (name, date, meta_from_name, swap_region_channel) =
        if let Some((name, date)) = name_then_timestamp(stem) {
            (name, date, true, false)
        } else if let Some((name, date)) = name_timestamp_region(stem) {
            (name, date, true, true)
        } else if let Some((name, date)) = timestamp_then_name(stem) {
            (name, date, false, false)
        } else {
            return Err(IngestError::UnparseableFilename(stem.to_string()));
        };

    let mut source = None;
    let mut region = None;
    let mut channel = None;
    if meta_from_name {
        // Exactly three parts or nothing. A mismatched shape is not an
        // error, the fields just stay unset.
        let parts: Vec<&str> = name.splitn(3, '_').collect();
        if let [s, r, c] = parts[..] {
            let (r, c) = if swap_region_channel { (c, r) } else { (r, c) };
            source = Some(s.to_string());
            region = Some(r.to_string());
            channel = Some(c.to_string());
        }
    } else {
        source = first_segment.map(str::to_string);
    }

    Ok(ParsedStem {
        name,
        source,
        region,
        channel,
        captured_at: date.and_utc(),
        meta_from_name,
    })
}

/// `{name}_{timestamp}`
fn name_then_timestamp(stem: &str) -> Option<(String, NaiveDateTime)> {
    let (name, stamp) = stem.rsplit_once('_')?;
    let date = NaiveDateTime::parse_from_str(stamp, STEM_TIMESTAMP).ok()?;
    Some((name.to_string(), date))
}

/// `{name}_{timestamp}_{region}`. The trailing region folds back into
/// the name, and region/channel come out swapped. Upstream quirk.
fn name_timestamp_region(stem: &str) -> Option<(String, NaiveDateTime)> {
    let (rest, region) = stem.rsplit_once('_')?;
    let (name, stamp) = rest.rsplit_once('_')?;
    let date = NaiveDateTime::parse_from_str(stamp, STEM_TIMESTAMP).ok()?;
    Some((format!("{name}_{region}"), date))
}

/// `{timestamp}_{name}`, with an optional `{embedded}-{name}` refinement.
fn timestamp_then_name(stem: &str) -> Option<(String, NaiveDateTime)> {
    let (stamp, name) = stem.split_once('_')?;
    let date = NaiveDateTime::parse_from_str(stamp, STEM_TIMESTAMP).ok()?;
    if let Some((embedded, rest)) = name.split_once('-') {
        if let Ok(inner) = NaiveDateTime::parse_from_str(embedded, EMBEDDED_TIMESTAMP) {
            // The embedded stamp tracks the actual capture time more
            // closely than the outer one.
            return Some((rest.to_string(), inner));
        }
    }
    Some((name.to_string(), date))
}

/// Strip style markers from an image channel name.
pub fn normalize_channel(channel: &str) -> (String, MapStyle) {
    if let Some(base) = channel.strip_suffix("_enhanced") {
        return (base.to_string(), MapStyle::Enhanced);
    }
    if channel.eq_ignore_ascii_case("fc") {
        return (channel.to_string(), MapStyle::FalseColor);
    }
    (channel.to_string(), MapStyle::Normal)
}

/// Split a text-product name into its AWIPS `{nnn, xxx}` identifier
/// pair. Returns `None` when the name is too short or the category is
/// unknown; unidentified text products are still cataloged.
pub fn split_text_identifier(name: &str) -> Option<(String, String)> {
    if name.len() < 5 {
        return None;
    }
    let nnn = name.get(..3)?.to_ascii_lowercase();
    if !AWIPS_NNN.contains(&nnn.as_str()) {
        return None;
    }
    Some((nnn, name[3..].to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn utc(y: i32, mo: u32, d: u32, h: u32, mi: u32, s: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, mo, d, h, mi, s).unwrap()
    }

    #[test]
    fn stem_with_trailing_timestamp() {
        let parsed = parse_stem("GOES16_FD_FC_20200101T000000Z", None).unwrap();
        assert_eq!(parsed.name, "GOES16_FD_FC");
        assert_eq!(parsed.source.as_deref(), Some("GOES16"));
        assert_eq!(parsed.region.as_deref(), Some("FD"));
        assert_eq!(parsed.channel.as_deref(), Some("FC"));
        assert_eq!(parsed.captured_at, utc(2020, 1, 1, 0, 0, 0));
        assert!(parsed.meta_from_name);
    }

    #[test]
    fn stem_with_timestamp_then_region_swaps_fields() {
        let parsed = parse_stem("GOES17_FD_20200615T120000Z_ch13", None).unwrap();
        assert_eq!(parsed.name, "GOES17_FD_ch13");
        assert_eq!(parsed.source.as_deref(), Some("GOES17"));
        assert_eq!(parsed.region.as_deref(), Some("ch13"));
        assert_eq!(parsed.channel.as_deref(), Some("FD"));
        assert_eq!(parsed.captured_at, utc(2020, 6, 15, 12, 0, 0));
    }

    #[test]
    fn stem_with_leading_timestamp_uses_directory_source() {
        let parsed = parse_stem("20200101T000000Z_sometext", Some("nws")).unwrap();
        assert_eq!(parsed.name, "sometext");
        assert_eq!(parsed.source.as_deref(), Some("nws"));
        assert_eq!(parsed.region, None);
        assert_eq!(parsed.channel, None);
        assert!(!parsed.meta_from_name);
        assert_eq!(parsed.captured_at, utc(2020, 1, 1, 0, 0, 0));
    }

    #[test]
    fn embedded_timestamp_wins_over_outer() {
        let parsed = parse_stem("20200101T000000Z_20200101123456-tafABC", Some("nws")).unwrap();
        assert_eq!(parsed.name, "tafABC");
        assert_eq!(parsed.captured_at, utc(2020, 1, 1, 12, 34, 56));
    }

    #[test]
    fn embedded_dash_without_timestamp_keeps_outer() {
        let parsed = parse_stem("20200101T000000Z_foo-bar", Some("nws")).unwrap();
        assert_eq!(parsed.name, "foo-bar");
        assert_eq!(parsed.captured_at, utc(2020, 1, 1, 0, 0, 0));
    }

    #[test]
    fn name_with_wrong_part_count_leaves_fields_unset() {
        let parsed = parse_stem("justname_20200101T000000Z", None).unwrap();
        assert_eq!(parsed.name, "justname");
        assert_eq!(parsed.source, None);
        assert_eq!(parsed.region, None);
        assert_eq!(parsed.channel, None);
    }

    #[test]
    fn extra_name_parts_fold_into_channel() {
        let parsed = parse_stem("GOES16_FD_ch02_extra_20200101T000000Z", None).unwrap();
        assert_eq!(parsed.source.as_deref(), Some("GOES16"));
        assert_eq!(parsed.region.as_deref(), Some("FD"));
        assert_eq!(parsed.channel.as_deref(), Some("ch02_extra"));
    }

    #[test]
    fn unparseable_stem_is_an_error() {
        let err = parse_stem("no-timestamp-here", None).unwrap_err();
        assert!(matches!(err, IngestError::UnparseableFilename(_)));
        let err = parse_stem("name_20209999T000000Z", None).unwrap_err();
        assert!(matches!(err, IngestError::UnparseableFilename(_)));
    }

    #[test]
    fn channel_normalization() {
        assert_eq!(
            normalize_channel("ch13_enhanced"),
            ("ch13".to_string(), MapStyle::Enhanced)
        );
        assert_eq!(normalize_channel("fc"), ("fc".to_string(), MapStyle::FalseColor));
        assert_eq!(normalize_channel("FC"), ("FC".to_string(), MapStyle::FalseColor));
        assert_eq!(normalize_channel("ch02"), ("ch02".to_string(), MapStyle::Normal));
    }

    #[test]
    fn text_identifier_split() {
        assert_eq!(
            split_text_identifier("tafJFK"),
            Some(("taf".to_string(), "JFK".to_string()))
        );
        assert_eq!(
            split_text_identifier("TAFJFK"),
            Some(("taf".to_string(), "JFK".to_string()))
        );
        // too short
        assert_eq!(split_text_identifier("taf"), None);
        // unknown category
        assert_eq!(split_text_identifier("zzzABC"), None);
    }

    #[test]
    fn sidecar_document_fields() {
        let doc = SidecarDocument::parse(
            r#"{
                "Path": "goes16/fd/x.jpg",
                "TimeStamp": { "ISO8601": "2020-03-04T05:06:07Z" },
                "ImageNavigation": { "ProjectionName": "geos(-75.0)" }
            }"#,
        )
        .unwrap();
        assert_eq!(doc.primary_path().unwrap(), "goes16/fd/x.jpg");
        assert_eq!(doc.iso_timestamp(), Some(utc(2020, 3, 4, 5, 6, 7)));
        assert!(doc.navigation().is_some());
    }

    #[test]
    fn sidecar_document_missing_path() {
        let doc = SidecarDocument::parse(r#"{"TimeStamp": {}}"#).unwrap();
        assert!(matches!(
            doc.primary_path().unwrap_err(),
            IngestError::MissingSidecarField("Path")
        ));
        assert_eq!(doc.iso_timestamp(), None);
    }
}
