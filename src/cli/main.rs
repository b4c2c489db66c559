use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;

use exif_report::config::Config;
use exif_report::ocr::OcrCapabilities;
use exif_report::{pipeline, report};

#[derive(Parser, Debug)]
#[command(
    name = "exif-report",
    version,
    about = "Image metadata analysis (EXIF + optional OCR)"
)]
struct Cli {
    /// Path to the image (e.g. sample.jpg)
    #[arg(value_name = "IMAGE", required_unless_present = "init")]
    image: Option<PathBuf>,

    /// Run OCR and attempt language detection
    #[arg(long)]
    ocr: bool,

    /// Write a readable report to this file
    #[arg(long, value_name = "FILE", default_value = "output.txt")]
    out: PathBuf,

    /// Path to config file (default: config.json next to binary)
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Initialize a default config.json and exit
    #[arg(long)]
    init: bool,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Logs go to stderr; stdout is reserved for the JSON document
    let log_level = if cli.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level))
        .format_timestamp(None)
        .init();

    // Handle --init
    if cli.init {
        let saved = Config::default().save(cli.config.as_deref())?;
        println!("Default config written to {}", saved.display());
        return Ok(());
    }

    let Some(image) = cli.image else {
        anyhow::bail!("No input image specified. Use --help for usage.");
    };

    if !image.exists() {
        anyhow::bail!("file not found: {}", image.display());
    }

    let capabilities = if cli.ocr {
        let config = Config::load_or_default(cli.config.as_deref());
        Some(OcrCapabilities::probe(&config))
    } else {
        None
    };

    let metadata = pipeline::analyze_image(&image, capabilities.as_ref())?;
    report::write_report(&metadata, Some(cli.out.as_path()))?;

    Ok(())
}
