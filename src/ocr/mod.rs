//! Optional OCR pass with language detection.
//!
//! Both collaborators sit behind traits ([`OcrEngine`], [`LanguageDetector`])
//! and are resolved once by [`OcrCapabilities::probe`]. A missing or failing
//! collaborator never fails the run: it is reported in [`OcrResult::note`].

#[cfg(feature = "lang-detect")]
mod language;
mod tesseract;

#[cfg(feature = "lang-detect")]
pub use language::WhatlangDetector;
pub use tesseract::TesseractEngine;

use image::DynamicImage;
use serde::Serialize;
use thiserror::Error;

use crate::config::Config;
use crate::source::OpenedImage;

/// Outcome of the OCR pass.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct OcrResult {
    /// Extracted text; absent when empty or when OCR did not run.
    pub text: Option<String>,
    /// Detected language code.
    pub language: Option<String>,
    /// Why `text` or `language` is absent.
    pub note: Option<String>,
}

#[derive(Debug, Error)]
pub enum OcrError {
    #[error("{engine} not installed; skip OCR.")]
    EngineMissing { engine: String },
    #[error("OCR failed: {0}")]
    EngineFailed(String),
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum LanguageError {
    #[error("language detection not available; language not detected.")]
    Unavailable,
    #[error("language detection disabled; language not detected.")]
    Disabled,
    #[error("language could not be determined")]
    Undetermined,
}

/// Text recognition backend.
pub trait OcrEngine {
    /// The display name of this engine (e.g. "tesseract").
    fn name(&self) -> &str;
    /// Recognize the visible text of an image that is already right side up.
    fn extract_text(&self, image: &DynamicImage) -> Result<String, OcrError>;
}

/// Best-guess language identification.
pub trait LanguageDetector {
    fn detect(&self, text: &str) -> Result<String, LanguageError>;
}

/// Collaborators available in this environment, resolved once at startup.
pub struct OcrCapabilities {
    pub engine: Result<Box<dyn OcrEngine>, OcrError>,
    pub detector: Result<Box<dyn LanguageDetector>, LanguageError>,
}

impl OcrCapabilities {
    /// Probe for the OCR binary and the language detector.
    pub fn probe(config: &Config) -> Self {
        let engine = TesseractEngine::probe(&config.ocr)
            .map(|engine| Box::new(engine) as Box<dyn OcrEngine>);
        match &engine {
            Ok(e) => log::debug!("OCR engine available: {}", e.name()),
            Err(e) => log::info!("{e}"),
        }

        Self {
            engine,
            detector: probe_detector(config),
        }
    }
}

#[cfg(feature = "lang-detect")]
fn probe_detector(config: &Config) -> Result<Box<dyn LanguageDetector>, LanguageError> {
    if !config.language.enabled {
        return Err(LanguageError::Disabled);
    }
    Ok(Box::new(WhatlangDetector::new(config.language.reliable_only)))
}

#[cfg(not(feature = "lang-detect"))]
fn probe_detector(config: &Config) -> Result<Box<dyn LanguageDetector>, LanguageError> {
    if !config.language.enabled {
        return Err(LanguageError::Disabled);
    }
    Err(LanguageError::Unavailable)
}

/// Run OCR on an opened image, honouring its orientation tag.
pub fn run_ocr(image: &OpenedImage, capabilities: &OcrCapabilities) -> OcrResult {
    let engine = match &capabilities.engine {
        Ok(engine) => engine.as_ref(),
        Err(e) => {
            return OcrResult {
                note: Some(e.to_string()),
                ..OcrResult::default()
            };
        }
    };
    recognize(&image.oriented(), engine, &capabilities.detector)
}

/// Extract text from upright pixels and detect its language.
pub fn recognize(
    image: &DynamicImage,
    engine: &dyn OcrEngine,
    detector: &Result<Box<dyn LanguageDetector>, LanguageError>,
) -> OcrResult {
    let mut result = OcrResult::default();

    let text = match engine.extract_text(image) {
        Ok(text) => text.trim().to_string(),
        Err(e) => {
            log::warn!("{e}");
            result.note = Some(e.to_string());
            return result;
        }
    };

    if text.is_empty() {
        log::debug!("{} found no text", engine.name());
        return result;
    }

    match detector {
        Ok(detector) => match detector.detect(&text) {
            Ok(code) => result.language = Some(code),
            Err(e) => log::debug!("Language detection failed: {e}"),
        },
        Err(e) => result.note = Some(e.to_string()),
    }

    result.text = Some(text);
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::exif::{TagMap, TagValue, tags::ORIENTATION};
    use crate::source::{FileInfo, ImageSize};
    use std::cell::Cell;
    use std::rc::Rc;

    struct FixedEngine(Result<&'static str, &'static str>);

    impl OcrEngine for FixedEngine {
        fn name(&self) -> &str {
            "fixed"
        }

        fn extract_text(&self, _image: &DynamicImage) -> Result<String, OcrError> {
            self.0
                .map(str::to_string)
                .map_err(|e| OcrError::EngineFailed(e.to_string()))
        }
    }

    struct FixedDetector(Option<&'static str>);

    impl LanguageDetector for FixedDetector {
        fn detect(&self, _text: &str) -> Result<String, LanguageError> {
            self.0.map(str::to_string).ok_or(LanguageError::Undetermined)
        }
    }

    /// Remembers the size of the last image it was given.
    struct SizeRecorder(Rc<Cell<Option<(u32, u32)>>>);

    impl OcrEngine for SizeRecorder {
        fn name(&self) -> &str {
            "recorder"
        }

        fn extract_text(&self, image: &DynamicImage) -> Result<String, OcrError> {
            self.0.set(Some((image.width(), image.height())));
            Ok("ok".to_string())
        }
    }

    fn blank() -> DynamicImage {
        DynamicImage::new_rgb8(4, 4)
    }

    fn detector(code: Option<&'static str>) -> Result<Box<dyn LanguageDetector>, LanguageError> {
        Ok(Box::new(FixedDetector(code)))
    }

    #[test]
    fn text_and_language() {
        let result = recognize(
            &blank(),
            &FixedEngine(Ok("  Hello world \n")),
            &detector(Some("en")),
        );
        assert_eq!(result.text.as_deref(), Some("Hello world"));
        assert_eq!(result.language.as_deref(), Some("en"));
        assert_eq!(result.note, None);
    }

    #[test]
    fn whitespace_only_text_is_absent() {
        let result = recognize(&blank(), &FixedEngine(Ok(" \n\t \n")), &detector(Some("en")));
        assert_eq!(result.text, None);
        assert_eq!(result.language, None);
        assert_eq!(result.note, None);
    }

    #[test]
    fn engine_failure_becomes_note() {
        let result = recognize(
            &blank(),
            &FixedEngine(Err("missing eng.traineddata")),
            &detector(Some("en")),
        );
        assert_eq!(result.text, None);
        assert_eq!(result.language, None);
        assert_eq!(result.note.as_deref(), Some("OCR failed: missing eng.traineddata"));
    }

    #[test]
    fn detection_failure_keeps_text() {
        let result = recognize(&blank(), &FixedEngine(Ok("zzz")), &detector(None));
        assert_eq!(result.text.as_deref(), Some("zzz"));
        assert_eq!(result.language, None);
        assert_eq!(result.note, None);
    }

    #[test]
    fn missing_detector_is_noted() {
        let result = recognize(
            &blank(),
            &FixedEngine(Ok("Bonjour")),
            &Err(LanguageError::Unavailable),
        );
        assert_eq!(result.text.as_deref(), Some("Bonjour"));
        assert_eq!(result.language, None);
        assert_eq!(
            result.note.as_deref(),
            Some("language detection not available; language not detected.")
        );
    }

    #[test]
    fn run_ocr_passes_upright_pixels() {
        let info = FileInfo {
            name: "sideways.jpg".into(),
            path: "/tmp/sideways.jpg".into(),
            format: Some("JPEG".into()),
            mode: "RGB".into(),
            size: ImageSize { width: 4, height: 2 },
        };
        let mut tags = TagMap::new();
        tags.insert(ORIENTATION, TagValue::Integers(vec![6]));
        let image = OpenedImage::from_parts(info, DynamicImage::new_rgb8(4, 2), tags);

        let seen = Rc::new(Cell::new(None));
        let capabilities = OcrCapabilities {
            engine: Ok(Box::new(SizeRecorder(Rc::clone(&seen)))),
            detector: Err(LanguageError::Unavailable),
        };

        let result = run_ocr(&image, &capabilities);
        assert_eq!(result.text.as_deref(), Some("ok"));
        assert_eq!(seen.get(), Some((2, 4)));
    }

    #[test]
    fn missing_engine_note_names_engine() {
        let err = OcrError::EngineMissing {
            engine: "tesseract".to_string(),
        };
        assert_eq!(err.to_string(), "tesseract not installed; skip OCR.");
    }

    #[test]
    fn probe_with_missing_binary_reports_engine_missing() {
        let mut config = Config::default();
        config.ocr.command = "definitely-not-an-ocr-binary-4242".to_string();

        let capabilities = OcrCapabilities::probe(&config);
        match &capabilities.engine {
            Err(OcrError::EngineMissing { engine }) => {
                assert_eq!(engine, "definitely-not-an-ocr-binary-4242");
            }
            Err(other) => panic!("unexpected error: {other}"),
            Ok(_) => panic!("probe should fail for a missing binary"),
        }
    }

    #[test]
    fn disabled_detection_is_reported() {
        let mut config = Config::default();
        config.language.enabled = false;
        assert!(matches!(
            probe_detector(&config),
            Err(LanguageError::Disabled)
        ));
    }
}
