//! JSON and plain-text renderings of an [`ImageMetadata`].

use anyhow::{Context, Result};
use std::io::Write;
use std::path::Path;

use crate::pipeline::ImageMetadata;

const MISSING: &str = "n/a";

/// Pretty-printed JSON, two-space indent, non-ASCII kept verbatim.
pub fn to_json(metadata: &ImageMetadata) -> Result<String> {
    serde_json::to_string_pretty(metadata).context("Failed to serialize metadata")
}

/// Markdown-style report: file identity, summary, decimal GPS and, when OCR
/// was requested, language, note and extracted text.
pub fn render_text(metadata: &ImageMetadata) -> String {
    let file = &metadata.file;
    let summary = &metadata.summary;

    let camera: Vec<&str> = [summary.camera_make.as_deref(), summary.camera_model.as_deref()]
        .into_iter()
        .flatten()
        .collect();
    let camera = if camera.is_empty() { MISSING.to_string() } else { camera.join(" ") };

    let mut lines = vec![
        format!("# Image Metadata Report: {}", file.name),
        String::new(),
        "## File".to_string(),
        format!("- Path: {}", file.path),
        format!("- Format: {}", file.format.as_deref().unwrap_or(MISSING)),
        format!("- Mode: {}", file.mode),
        format!("- Size: {}x{}", file.size.width, file.size.height),
        String::new(),
        "## Summary".to_string(),
        format!("- Camera: {camera}"),
        format!(
            "- Date/Time: {}",
            summary.datetime_original.as_deref().unwrap_or(MISSING)
        ),
        format!("- GPS present: {}", yes_no(summary.has_gps)),
    ];

    if let Some(gps) = &metadata.gps {
        if gps.latitude_decimal.is_some() || gps.longitude_decimal.is_some() {
            lines.push(format!(
                "- GPS (decimal): {}, {}",
                decimal(gps.latitude_decimal),
                decimal(gps.longitude_decimal)
            ));
        }
    }

    if let Some(ocr) = &metadata.ocr {
        lines.push(String::new());
        lines.push("## OCR".to_string());
        lines.push(format!("- Language: {}", ocr.language.as_deref().unwrap_or(MISSING)));
        lines.push(format!("- Note: {}", ocr.note.as_deref().unwrap_or(MISSING)));
        if let Some(text) = &ocr.text {
            lines.push(String::new());
            lines.push("### Extracted Text".to_string());
            lines.push(text.clone());
        }
    }

    let mut out = lines.join("\n");
    out.push('\n');
    out
}

fn yes_no(flag: bool) -> &'static str {
    if flag { "yes" } else { "no" }
}

fn decimal(value: Option<f64>) -> String {
    value.map_or_else(|| MISSING.to_string(), |v| format!("{v:.6}"))
}

/// Print the JSON document to `stdout` and, if `out_path` is given, replace
/// the file there with the text report.
pub fn emit<W: Write>(metadata: &ImageMetadata, stdout: &mut W, out_path: Option<&Path>) -> Result<()> {
    let json = to_json(metadata)?;
    writeln!(stdout, "{json}").context("Failed to write JSON to standard output")?;
    stdout.flush().context("Failed to flush standard output")?;

    if let Some(path) = out_path {
        std::fs::write(path, render_text(metadata))
            .with_context(|| format!("Failed to write report to {}", path.display()))?;
        log::info!("Report written to {}", path.display());
    }

    Ok(())
}

/// [`emit`] to the process's standard output.
pub fn write_report(metadata: &ImageMetadata, out_path: Option<&Path>) -> Result<()> {
    let stdout = std::io::stdout();
    let mut handle = stdout.lock();
    emit(metadata, &mut handle, out_path)
}
