//! EXIF reading and normalization.
//!
//! - [`read_tags_from_path`]: Read the raw tag map of an image file
//! - [`extract`]: Name the tags, parse the GPS block and derive a [`Summary`]
//! - [`dms_to_decimal`]: Degrees/minutes/seconds to signed decimal degrees
//!
//! The raw map is decoder-independent ([`TagMap`] of [`TagValue`]), so the
//! extraction logic can be exercised without image files.

mod extractor;
mod gps;
mod reader;
pub mod tags;
mod value;

pub use extractor::{ExifMap, Extracted, GpsInfo, Summary, extract};
pub use gps::dms_to_decimal;
pub use reader::{read_tags, read_tags_from_path};
pub use value::{Rational, TagMap, TagValue};
