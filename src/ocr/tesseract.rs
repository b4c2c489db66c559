use image::{DynamicImage, ImageFormat};
use std::io::ErrorKind;
use std::path::Path;
use std::process::{Command, Stdio};

use super::{OcrEngine, OcrError};
use crate::config::OcrConfig;

/// OCR through the `tesseract` command-line binary.
///
/// The image is handed over as a temporary PNG and text is read back from
/// standard output.
#[derive(Debug, Clone)]
pub struct TesseractEngine {
    command: String,
    languages: String,
    page_segmentation_mode: Option<u8>,
}

impl TesseractEngine {
    pub fn new(config: &OcrConfig) -> Self {
        Self {
            command: config.command.clone(),
            languages: config.languages.clone(),
            page_segmentation_mode: config.page_segmentation_mode,
        }
    }

    /// Build the engine if its binary can be started.
    pub fn probe(config: &OcrConfig) -> Result<Self, OcrError> {
        let status = Command::new(&config.command)
            .arg("--version")
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status();

        match status {
            Ok(_) => Ok(Self::new(config)),
            Err(e) => {
                log::debug!("Could not start {}: {e}", config.command);
                Err(OcrError::EngineMissing {
                    engine: config.command.clone(),
                })
            }
        }
    }

    fn command_for(&self, input: &Path) -> Command {
        let mut cmd = Command::new(&self.command);
        cmd.arg(input).arg("stdout");
        if !self.languages.is_empty() {
            cmd.arg("-l").arg(&self.languages);
        }
        if let Some(psm) = self.page_segmentation_mode {
            cmd.arg("--psm").arg(psm.to_string());
        }
        cmd.stdin(Stdio::null());
        cmd
    }
}

impl OcrEngine for TesseractEngine {
    fn name(&self) -> &str {
        &self.command
    }

    fn extract_text(&self, image: &DynamicImage) -> Result<String, OcrError> {
        let scratch = tempfile::Builder::new()
            .prefix("exif-report-")
            .suffix(".png")
            .tempfile()
            .map_err(|e| OcrError::EngineFailed(format!("cannot create scratch file: {e}")))?;

        image
            .save_with_format(scratch.path(), ImageFormat::Png)
            .map_err(|e| OcrError::EngineFailed(format!("cannot write scratch image: {e}")))?;

        log::debug!("Running {} on {}", self.command, scratch.path().display());
        let output = self.command_for(scratch.path()).output().map_err(|e| {
            if e.kind() == ErrorKind::NotFound {
                OcrError::EngineMissing {
                    engine: self.command.clone(),
                }
            } else {
                OcrError::EngineFailed(e.to_string())
            }
        })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            let reason = stderr.trim();
            return Err(OcrError::EngineFailed(if reason.is_empty() {
                format!("{} exited with {}", self.command, output.status)
            } else {
                reason.to_string()
            }));
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}
