use anyhow::{Context, Result};
use std::fs::File;
use std::io::{BufRead, BufReader, Seek};
use std::path::Path;

use super::tags::GPS_INFO;
use super::value::{Rational, TagMap, TagValue};

/// Read the primary-image tag map of an image file.
///
/// Opening the file is the only failure; a missing or unreadable EXIF block
/// yields an empty map.
pub fn read_tags_from_path(path: &Path) -> Result<TagMap> {
    let file = File::open(path).context("Failed to open image file")?;
    let mut reader = BufReader::new(file);
    Ok(read_tags(&mut reader, path))
}

/// Read the primary-image tag map from any seekable container.
///
/// TIFF, Exif and Interop tags land in one flat map keyed by tag number. GPS
/// tags are gathered into a nested [`TagValue::Map`] under `GPSInfo`.
pub fn read_tags<R: BufRead + Seek>(reader: &mut R, origin: &Path) -> TagMap {
    let exif = match exif::Reader::new().read_from_container(reader) {
        Ok(exif) => exif,
        Err(exif::Error::NotFound(_)) => {
            log::debug!("No EXIF data found in {}", origin.display());
            return TagMap::new();
        }
        Err(e) => {
            log::warn!("Unreadable EXIF data in {}: {e}", origin.display());
            return TagMap::new();
        }
    };

    let mut tags = TagMap::new();
    let mut gps = TagMap::new();
    let mut has_gps_block = false;

    for field in exif.fields() {
        if field.ifd_num != exif::In::PRIMARY {
            continue;
        }
        if field.tag == exif::Tag::GPSInfoIFDPointer {
            has_gps_block = true;
            continue;
        }
        let value = convert(&field.value);
        match field.tag.context() {
            exif::Context::Gps => {
                has_gps_block = true;
                gps.insert(field.tag.number(), value);
            }
            _ => {
                tags.insert(field.tag.number(), value);
            }
        }
    }

    if has_gps_block {
        tags.insert(GPS_INFO, TagValue::Map(gps));
    }

    log::debug!("Read {} EXIF tags from {}", tags.len(), origin.display());
    tags
}

/// Convert a decoder value into the decoder-independent model.
fn convert(value: &exif::Value) -> TagValue {
    match value {
        exif::Value::Ascii(parts) => {
            let strings: Vec<String> = parts
                .iter()
                .map(|bytes| {
                    String::from_utf8_lossy(bytes)
                        .trim_end_matches('\0')
                        .to_string()
                })
                .collect();
            TagValue::Text(strings.join(", "))
        }
        exif::Value::Byte(v) => TagValue::Integers(v.iter().map(|&n| i64::from(n)).collect()),
        exif::Value::SByte(v) => TagValue::Integers(v.iter().map(|&n| i64::from(n)).collect()),
        exif::Value::Short(v) => TagValue::Integers(v.iter().map(|&n| i64::from(n)).collect()),
        exif::Value::SShort(v) => TagValue::Integers(v.iter().map(|&n| i64::from(n)).collect()),
        exif::Value::Long(v) => TagValue::Integers(v.iter().map(|&n| i64::from(n)).collect()),
        exif::Value::SLong(v) => TagValue::Integers(v.iter().map(|&n| i64::from(n)).collect()),
        exif::Value::Rational(v) => TagValue::Rationals(
            v.iter()
                .map(|r| Rational::new(i64::from(r.num), i64::from(r.denom)))
                .collect(),
        ),
        exif::Value::SRational(v) => TagValue::Rationals(
            v.iter()
                .map(|r| Rational::new(i64::from(r.num), i64::from(r.denom)))
                .collect(),
        ),
        exif::Value::Float(v) => TagValue::Floats(v.iter().map(|&x| f64::from(x)).collect()),
        exif::Value::Double(v) => TagValue::Floats(v.clone()),
        exif::Value::Undefined(bytes, _) => undefined_to_value(bytes),
        _ => TagValue::Unknown,
    }
}

/// UNDEFINED blobs that are plain ASCII (ExifVersion, FlashPixVersion, ...)
/// read better as text.
fn undefined_to_value(bytes: &[u8]) -> TagValue {
    let trimmed = match bytes.iter().rposition(|&b| b != 0) {
        Some(last) => &bytes[..=last],
        None => &[][..],
    };
    if !trimmed.is_empty() && trimmed.iter().all(|b| b.is_ascii_graphic() || *b == b' ') {
        TagValue::Text(String::from_utf8_lossy(trimmed).into_owned())
    } else {
        TagValue::Bytes(bytes.to_vec())
    }
}
