//! # exif-report
//!
//! Image metadata analysis: EXIF tags with readable names, GPS coordinates
//! converted to signed decimal degrees, and an optional OCR pass with
//! language detection.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use exif_report::config::Config;
//! use exif_report::ocr::OcrCapabilities;
//! use exif_report::{pipeline, report};
//! use std::path::Path;
//!
//! fn main() -> anyhow::Result<()> {
//!     let config = Config::load(None)?;
//!
//!     // Probe once for the OCR binary and language detector
//!     let capabilities = OcrCapabilities::probe(&config);
//!
//!     let metadata = pipeline::analyze_image(Path::new("photo.jpg"), Some(&capabilities))?;
//!     println!("Camera: {:?}", metadata.summary.camera_model);
//!
//!     // JSON to stdout, text report to a file
//!     report::write_report(&metadata, Some(Path::new("output.txt")))?;
//!     Ok(())
//! }
//! ```
//!
//! ## Lower-Level Usage
//!
//! The extraction logic works on a decoder-independent tag map, so it can be
//! driven without any image file:
//!
//! ```rust
//! use exif_report::exif::{extract, tags::GPS_INFO, Rational, TagMap, TagValue};
//!
//! let dms = |d, m, s| TagValue::Rationals(vec![
//!     Rational::new(d, 1), Rational::new(m, 1), Rational::new(s, 1),
//! ]);
//!
//! let mut gps = TagMap::new();
//! gps.insert(1, TagValue::Text("N".into()));
//! gps.insert(2, dms(48, 51, 29));
//! gps.insert(3, TagValue::Text("E".into()));
//! gps.insert(4, dms(2, 17, 40));
//!
//! let mut tags = TagMap::new();
//! tags.insert(0x010F, TagValue::Text("Canon".into()));
//! tags.insert(GPS_INFO, TagValue::Map(gps));
//!
//! let extracted = extract(&tags);
//! let summary = extracted.summary();
//! assert!(summary.has_gps);
//! assert_eq!(summary.camera_make.as_deref(), Some("Canon"));
//! ```
//!
//! ## Modules
//!
//! - [`exif`]: Tag reading, naming, GPS conversion and summary
//! - [`source`]: Opening and decoding the image, orientation correction
//! - [`ocr`]: OCR engine and language detector seams, degraded-mode handling
//! - [`pipeline`]: The [`pipeline::ImageMetadata`] model and [`pipeline::analyze_image`]
//! - [`report`]: JSON and text report output
//! - [`config`]: Configuration loading/saving

pub mod config;
pub mod exif;
pub mod ocr;
pub mod pipeline;
pub mod report;
pub mod source;
