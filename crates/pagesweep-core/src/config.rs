// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Application configuration.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::{PageSweepError, Result};

/// Bytes per megabyte used by the size gates.
pub const BYTES_PER_MB: f64 = 1024.0 * 1024.0;

/// Persistent application settings, read from a TOML file.
///
/// Every key is optional; anything missing falls back to [`AppConfig::default`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AppConfig {
    /// Optional log file. Log lines go to stderr as well.
    pub log_file: Option<PathBuf>,
    /// Directory that receives `page_stats_*.csv` reports (created if absent).
    pub reports_dir: PathBuf,
    /// Upper bound for input and derived PDFs, in megabytes.
    pub max_pdf_size_mb: f64,
    /// Rasterisation resolution for page analysis.
    pub render_dpi: u32,
    /// Channel value below which a pixel counts as ink.
    pub white_threshold: u8,
    /// Language passed to the OCR engine.
    pub ocr_language: String,
    /// Ask the OCR engine to straighten skewed scans.
    pub ocr_deskew: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            log_file: None,
            reports_dir: PathBuf::from("reports"),
            max_pdf_size_mb: 120.0,
            render_dpi: 72,
            white_threshold: 240,
            ocr_language: "spa".to_string(),
            ocr_deskew: true,
        }
    }
}

impl AppConfig {
    /// Load settings from `path`. A missing file yields the defaults.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            info!(path = %path.display(), "config file not found, using defaults");
            return Ok(Self::default());
        }

        let raw = std::fs::read_to_string(path)?;
        let config = Self::from_toml_str(&raw).map_err(|err| match err {
            PageSweepError::Config(detail) => {
                PageSweepError::Config(format!("{}: {}", path.display(), detail))
            }
            other => other,
        })?;
        debug!(path = %path.display(), ?config, "config loaded");
        Ok(config)
    }

    /// Parse settings from a TOML document and validate them.
    pub fn from_toml_str(raw: &str) -> Result<Self> {
        let config: Self =
            toml::from_str(raw).map_err(|err| PageSweepError::Config(err.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Size limit in bytes.
    pub fn max_pdf_size_bytes(&self) -> u64 {
        (self.max_pdf_size_mb * BYTES_PER_MB) as u64
    }

    fn validate(&self) -> Result<()> {
        if !self.max_pdf_size_mb.is_finite() || self.max_pdf_size_mb <= 0.0 {
            return Err(PageSweepError::Config(format!(
                "max_pdf_size_mb must be a positive number, got {}",
                self.max_pdf_size_mb
            )));
        }
        if self.render_dpi == 0 {
            return Err(PageSweepError::Config("render_dpi must be non-zero".into()));
        }
        if self.ocr_language.trim().is_empty() {
            return Err(PageSweepError::Config("ocr_language must not be empty".into()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_document_gives_defaults() {
        let config = AppConfig::from_toml_str("").unwrap();
        assert_eq!(config, AppConfig::default());
        assert_eq!(config.max_pdf_size_mb, 120.0);
    }

    #[test]
    fn partial_document_overrides_only_given_keys() {
        let config = AppConfig::from_toml_str(
            r#"
            reports_dir = "/var/lib/pagesweep/reports"
            max_pdf_size_mb = 15.5
            "#,
        )
        .unwrap();
        assert_eq!(config.reports_dir, PathBuf::from("/var/lib/pagesweep/reports"));
        assert_eq!(config.max_pdf_size_mb, 15.5);
        assert_eq!(config.white_threshold, 240);
    }

    #[test]
    fn unknown_key_is_rejected() {
        let err = AppConfig::from_toml_str("max_size = 3").unwrap_err();
        assert!(matches!(err, PageSweepError::Config(_)));
    }

    #[test]
    fn non_positive_limit_is_rejected() {
        let err = AppConfig::from_toml_str("max_pdf_size_mb = 0.0").unwrap_err();
        assert!(err.to_string().contains("max_pdf_size_mb"));
    }

    #[test]
    fn missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = AppConfig::load(dir.path().join("absent.toml")).unwrap();
        assert_eq!(config, AppConfig::default());
    }

    #[test]
    fn load_reads_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("pagesweep.toml");
        std::fs::write(&path, "log_file = \"sweep.log\"\nocr_deskew = false\n").unwrap();

        let config = AppConfig::load(&path).unwrap();
        assert_eq!(config.log_file, Some(PathBuf::from("sweep.log")));
        assert!(!config.ocr_deskew);
    }

    #[test]
    fn size_limit_in_bytes() {
        let config = AppConfig {
            max_pdf_size_mb: 2.0,
            ..AppConfig::default()
        };
        assert_eq!(config.max_pdf_size_bytes(), 2 * 1024 * 1024);
    }
}
