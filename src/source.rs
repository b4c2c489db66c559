use anyhow::{Context, Result};
use image::{ColorType, DynamicImage, ImageFormat, ImageReader};
use serde::Serialize;
use std::borrow::Cow;
use std::path::Path;

use crate::exif::{self, TagMap, tags::ORIENTATION};

/// Identity of the analyzed file.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FileInfo {
    pub name: String,
    /// Absolute path.
    pub path: String,
    /// Upper-case container format (`JPEG`, `PNG`, ...), if recognized.
    pub format: Option<String>,
    /// Colour mode short name (`RGB`, `RGBA`, `L`, ...).
    pub mode: String,
    pub size: ImageSize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ImageSize {
    pub width: u32,
    pub height: u32,
}

/// A decoded image together with its raw tag map.
///
/// The file itself is closed once `open` returns; pixel data is freed when
/// the value is dropped.
#[derive(Debug)]
pub struct OpenedImage {
    info: FileInfo,
    pixels: DynamicImage,
    tags: TagMap,
}

impl OpenedImage {
    /// Open and decode an image, guessing its format from the content.
    pub fn open(path: &Path) -> Result<Self> {
        let reader = ImageReader::open(path)
            .with_context(|| format!("Failed to open {}", path.display()))?
            .with_guessed_format()
            .context("Failed to read image header")?;
        let format = reader.format();
        let pixels = reader
            .decode()
            .with_context(|| format!("Failed to decode image {}", path.display()))?;

        let tags = exif::read_tags_from_path(path)?;

        let absolute = std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf());
        let info = FileInfo {
            name: path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default(),
            path: absolute.display().to_string(),
            format: format.map(format_name),
            mode: mode_name(pixels.color()).to_string(),
            size: ImageSize {
                width: pixels.width(),
                height: pixels.height(),
            },
        };

        log::debug!(
            "Opened {} ({:?}, {}x{})",
            info.path,
            info.format,
            info.size.width,
            info.size.height
        );

        Ok(Self { info, pixels, tags })
    }

    pub fn info(&self) -> &FileInfo {
        &self.info
    }

    pub fn tags(&self) -> &TagMap {
        &self.tags
    }

    /// Raw EXIF orientation (1-8), if recorded.
    pub fn orientation(&self) -> Option<i64> {
        self.tags.get(&ORIENTATION)?.first_integer()
    }

    /// Pixels turned right side up according to the EXIF orientation tag.
    pub fn oriented(&self) -> Cow<'_, DynamicImage> {
        apply_orientation(&self.pixels, self.orientation())
    }

    #[cfg(test)]
    pub(crate) fn from_parts(info: FileInfo, pixels: DynamicImage, tags: TagMap) -> Self {
        Self { info, pixels, tags }
    }
}

/// Transpose an image according to an EXIF orientation value (1–8).
///
/// Values outside that range, and `1`, leave the image untouched.
pub fn apply_orientation(image: &DynamicImage, orientation: Option<i64>) -> Cow<'_, DynamicImage> {
    match orientation {
        Some(2) => Cow::Owned(image.fliph()),
        Some(3) => Cow::Owned(image.rotate180()),
        Some(4) => Cow::Owned(image.flipv()),
        Some(5) => Cow::Owned(image.rotate90().fliph()),
        Some(6) => Cow::Owned(image.rotate90()),
        Some(7) => Cow::Owned(image.rotate270().fliph()),
        Some(8) => Cow::Owned(image.rotate270()),
        _ => Cow::Borrowed(image),
    }
}

fn format_name(format: ImageFormat) -> String {
    format!("{format:?}").to_uppercase()
}

fn mode_name(color: ColorType) -> &'static str {
    match color {
        ColorType::L8 => "L",
        ColorType::La8 => "LA",
        ColorType::Rgb8 => "RGB",
        ColorType::Rgba8 => "RGBA",
        ColorType::L16 => "I;16",
        ColorType::La16 => "LA;16",
        ColorType::Rgb16 => "RGB;16",
        ColorType::Rgba16 => "RGBA;16",
        ColorType::Rgb32F => "RGB;F",
        ColorType::Rgba32F => "RGBA;F",
        _ => "unknown",
    }
}
