use anyhow::Result;
use serde::ser::{Serialize, SerializeMap, Serializer};
use std::path::Path;

use crate::exif::{self, ExifMap, GpsInfo, Summary};
use crate::ocr::{self, OcrCapabilities, OcrResult};
use crate::source::{FileInfo, OpenedImage};

/// Everything learned about one image.
///
/// Serializes to the JSON document printed on standard output, with keys
/// `file`, `exif`, `gps`, `summary` and, when OCR was requested, `ocr`.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct ImageMetadata {
    pub file: FileInfo,
    pub exif: ExifMap,
    /// Rendered as `{}` when the image has no GPS block.
    #[serde(serialize_with = "gps_or_empty")]
    pub gps: Option<GpsInfo>,
    pub summary: Summary,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ocr: Option<OcrResult>,
}

fn gps_or_empty<S: Serializer>(gps: &Option<GpsInfo>, serializer: S) -> Result<S::Ok, S::Error> {
    match gps {
        Some(gps) => gps.serialize(serializer),
        None => serializer.serialize_map(Some(0))?.end(),
    }
}

/// Analyze a single image: open it, extract and normalize its metadata and,
/// when `capabilities` is given, run the OCR pass.
///
/// Fails only if the file cannot be opened or decoded as an image. The image
/// is released before this returns, whatever the outcome.
///
/// # Example
///
/// ```rust,no_run
/// use exif_report::pipeline::analyze_image;
/// use std::path::Path;
///
/// let metadata = analyze_image(Path::new("photo.jpg"), None)?;
/// if let Some(gps) = &metadata.gps {
///     println!("lat/lon: {:?}", gps.coordinates());
/// }
/// # Ok::<(), anyhow::Error>(())
/// ```
pub fn analyze_image(path: &Path, capabilities: Option<&OcrCapabilities>) -> Result<ImageMetadata> {
    let image = OpenedImage::open(path)?;

    let extracted = exif::extract(image.tags());
    let summary = extracted.summary();
    log::debug!(
        "{}: {} tags, has_gps={}",
        image.info().name,
        extracted.exif.len(),
        summary.has_gps
    );

    let ocr = capabilities.map(|capabilities| ocr::run_ocr(&image, capabilities));

    Ok(ImageMetadata {
        file: image.info().clone(),
        exif: extracted.exif,
        gps: extracted.gps,
        summary,
        ocr,
    })
}
