use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Top-level configuration.
///
/// Only the optional OCR pass is configurable; metadata extraction has no
/// settings.
///
/// # Loading
///
/// ```rust,no_run
/// use exif_report::config::Config;
///
/// // From a JSON file
/// let config = Config::load(Some("config.json".as_ref())).unwrap();
///
/// // Or use defaults and customize
/// let mut config = Config::default();
/// config.ocr.languages = "eng+deu".into();
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// OCR engine settings.
    pub ocr: OcrConfig,
    /// Language detection settings.
    pub language: LanguageConfig,
}

/// Settings for the `tesseract` command-line engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OcrConfig {
    /// Executable name or path.
    pub command: String,
    /// Tesseract language packs, `+`-separated (e.g. `eng+fra`).
    pub languages: String,
    /// Page segmentation mode passed as `--psm`; engine default when unset.
    pub page_segmentation_mode: Option<u8>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LanguageConfig {
    pub enabled: bool,
    /// Drop detections the detector itself marks as unreliable.
    pub reliable_only: bool,
}

impl Default for OcrConfig {
    fn default() -> Self {
        Self {
            command: "tesseract".to_string(),
            languages: "eng".to_string(),
            page_segmentation_mode: None,
        }
    }
}

impl Default for LanguageConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            reliable_only: false,
        }
    }
}

impl Config {
    /// Resolve the config file path: `config.json` next to the executable.
    pub fn config_path() -> Result<PathBuf> {
        let exe_path = std::env::current_exe().context("Failed to get executable path")?;
        let exe_dir = exe_path
            .parent()
            .context("Failed to get executable directory")?;
        Ok(exe_dir.join("config.json"))
    }

    /// Load config from the given path, or from the default location.
    ///
    /// A missing file is not an error: defaults are used.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let config_path = match path {
            Some(p) => p.to_path_buf(),
            None => Self::config_path()?,
        };

        if !config_path.exists() {
            log::debug!(
                "Config file not found at {}. Using defaults.",
                config_path.display()
            );
            return Ok(Self::default());
        }

        let contents =
            std::fs::read_to_string(&config_path).context("Failed to read config file")?;
        let config: Config =
            serde_json::from_str(&contents).context("Failed to parse config file")?;
        Ok(config)
    }

    /// [`Config::load`], falling back to defaults when the file cannot be
    /// read or parsed.
    pub fn load_or_default(path: Option<&Path>) -> Self {
        Self::load(path).unwrap_or_else(|e| {
            log::warn!("{e:#}; using default config");
            Self::default()
        })
    }

    /// Save config to the given path, or to the default location.
    pub fn save(&self, path: Option<&Path>) -> Result<PathBuf> {
        let config_path = match path {
            Some(p) => p.to_path_buf(),
            None => Self::config_path()?,
        };

        let contents = serde_json::to_string_pretty(self).context("Failed to serialize config")?;
        std::fs::write(&config_path, contents).context("Failed to write config file")?;
        log::info!("Config saved to {}", config_path.display());
        Ok(config_path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn defaults() {
        let config = Config::default();
        assert_eq!(config.ocr.command, "tesseract");
        assert_eq!(config.ocr.languages, "eng");
        assert_eq!(config.ocr.page_segmentation_mode, None);
        assert!(config.language.enabled);
        assert!(!config.language.reliable_only);
    }

    #[test]
    fn missing_file_uses_defaults() {
        let dir = TempDir::new().unwrap();
        let config = Config::load(Some(dir.path().join("absent.json").as_path())).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn save_then_load() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.json");

        let mut config = Config::default();
        config.ocr.languages = "eng+deu".to_string();
        config.ocr.page_segmentation_mode = Some(6);
        config.language.reliable_only = true;

        let written = config.save(Some(path.as_path())).unwrap();
        assert_eq!(written, path);
        assert_eq!(Config::load(Some(path.as_path())).unwrap(), config);
    }

    #[test]
    fn partial_file_fills_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{ "ocr": { "command": "/opt/bin/tesseract" } }"#).unwrap();

        let config = Config::load(Some(path.as_path())).unwrap();
        assert_eq!(config.ocr.command, "/opt/bin/tesseract");
        assert_eq!(config.ocr.languages, "eng");
        assert!(config.language.enabled);
    }

    #[test]
    fn malformed_file_is_an_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, "{ not json").unwrap();

        assert!(Config::load(Some(path.as_path())).is_err());
    }

    #[test]
    fn malformed_file_falls_back_to_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, "{ not json").unwrap();

        assert_eq!(Config::load_or_default(Some(path.as_path())), Config::default());
    }
}
