use serde::Serialize;
use std::collections::BTreeMap;

use super::gps::dms_to_decimal;
use super::tags::{self, GPS_INFO};
use super::value::{TagMap, TagValue};

/// EXIF tags keyed by their canonical name.
pub type ExifMap = BTreeMap<String, TagValue>;

/// Parsed GPS sub-block.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct GpsInfo {
    /// Every GPS tag rendered as a string, keyed by name.
    pub raw: BTreeMap<String, String>,
    pub latitude_decimal: Option<f64>,
    pub longitude_decimal: Option<f64>,
}

impl GpsInfo {
    /// Both decimal coordinates, when both are known.
    pub fn coordinates(&self) -> Option<(f64, f64)> {
        Some((self.latitude_decimal?, self.longitude_decimal?))
    }
}

/// Compact view of the most commonly wanted fields.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Summary {
    pub camera_make: Option<String>,
    pub camera_model: Option<String>,
    pub datetime_original: Option<String>,
    pub has_gps: bool,
}

/// Named EXIF tags plus the parsed GPS block, if the image has one.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Extracted {
    pub exif: ExifMap,
    pub gps: Option<GpsInfo>,
}

/// Map raw tag ids to names and parse the GPS sub-block.
///
/// Never fails: missing tags leave fields empty, and a `GPSInfo` entry that
/// is not a nested mapping is treated as no GPS data.
pub fn extract(tags: &TagMap) -> Extracted {
    if tags.is_empty() {
        return Extracted::default();
    }

    let exif: ExifMap = tags
        .iter()
        .map(|(id, value)| (tags::exif_tag_name(*id), value.clone()))
        .collect();

    let gps = match tags.get(&GPS_INFO) {
        Some(TagValue::Map(block)) => Some(parse_gps(block)),
        Some(other) => {
            log::debug!("GPSInfo is not a tag block ({other}); ignoring");
            None
        }
        None => None,
    };

    Extracted { exif, gps }
}

fn parse_gps(block: &TagMap) -> GpsInfo {
    let named: BTreeMap<String, &TagValue> = block
        .iter()
        .map(|(id, value)| (tags::gps_tag_name(*id), value))
        .collect();

    let latitude = coordinate(&named, "GPSLatitude", "GPSLatitudeRef", 90.0);
    let longitude = coordinate(&named, "GPSLongitude", "GPSLongitudeRef", 180.0);

    GpsInfo {
        raw: named
            .iter()
            .map(|(name, value)| (name.clone(), value.to_string()))
            .collect(),
        latitude_decimal: latitude,
        longitude_decimal: longitude,
    }
}

/// Decimal coordinate from a raw triple and its reference tag. Requires both
/// to be present and rejects non-finite results or ones outside
/// `[-limit, limit]`.
fn coordinate(
    named: &BTreeMap<String, &TagValue>,
    value_tag: &str,
    ref_tag: &str,
    limit: f64,
) -> Option<f64> {
    let raw = named.get(value_tag).filter(|v| !v.is_empty())?;
    let reference = named.get(ref_tag).filter(|v| !v.is_empty())?;

    let decimal = dms_to_decimal(raw, &reference.to_string())?;
    if !decimal.is_finite() || decimal.abs() > limit {
        log::warn!("{value_tag} {decimal} is out of range; ignoring");
        return None;
    }
    Some(decimal)
}

impl Extracted {
    pub fn summary(&self) -> Summary {
        let has_gps = self
            .gps
            .as_ref()
            .is_some_and(|gps| gps.coordinates().is_some());

        Summary {
            camera_make: self.text("Make"),
            camera_model: self.text("Model"),
            datetime_original: self
                .text("DateTimeOriginal")
                .or_else(|| self.text("DateTime")),
            has_gps,
        }
    }

    /// Tag value as trimmed text; `None` when missing or blank.
    fn text(&self, name: &str) -> Option<String> {
        let value = self.exif.get(name)?;
        let s = match value {
            TagValue::Text(s) => s.trim().to_string(),
            other => other.to_string(),
        };
        if s.is_empty() { None } else { Some(s) }
    }
}
