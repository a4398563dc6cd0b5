//! Reconstruction configuration.
//!
//! A [`ReconstructionConfig`] can be created programmatically, loaded from a
//! TOML file, or taken from `Default`. Every field has a serde default so
//! partial config files stay valid.
use crate::{DurchsichtError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Configuration for the OCR reconstruction pipeline.
///
/// # Example
///
/// ```rust
/// use durchsicht::ReconstructionConfig;
///
/// let config = ReconstructionConfig {
///     raster_scale: 2.0,
///     ..Default::default()
/// };
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReconstructionConfig {
    /// Multiplier between a page's native point dimensions and the pixel
    /// dimensions of the raster handed to recognition. Higher values trade
    /// latency for recognition accuracy. 3.0 suits standalone use; 2.0 is a
    /// reasonable server-side setting that favors latency.
    #[serde(default = "default_raster_scale")]
    pub raster_scale: f64,

    /// Tesseract language code (e.g. "eng", "deu").
    #[serde(default = "default_language")]
    pub language: String,

    /// Pages whose aggregate confidence falls below this value are flagged
    /// in the advisory report. Never alters pipeline behavior.
    #[serde(default = "default_low_confidence_threshold")]
    pub low_confidence_threshold: f64,

    /// How many leading pages the scan detector inspects for a native text
    /// layer before trusting the verdict. Bounds latency on large documents.
    #[serde(default = "default_scan_detection_page_cap")]
    pub scan_detection_page_cap: usize,

    /// Words below this confidence are dropped before placement.
    /// 0.0 keeps everything the engine emitted.
    #[serde(default)]
    pub min_word_confidence: f64,

    /// Fill alpha of the overlay text layer. Near-zero rather than exactly
    /// zero so viewers' hit-testing and "show invisible text" debug modes
    /// keep working.
    #[serde(default = "default_text_alpha")]
    pub text_alpha: f64,

    /// Floor for derived font sizes, in points. Keeps degenerate-but-drawable
    /// boxes from producing unrenderable text runs.
    #[serde(default = "default_min_font_size")]
    pub min_font_size: f64,
}

fn default_raster_scale() -> f64 {
    3.0
}

fn default_language() -> String {
    "eng".to_string()
}

fn default_low_confidence_threshold() -> f64 {
    70.0
}

fn default_scan_detection_page_cap() -> usize {
    3
}

fn default_text_alpha() -> f64 {
    0.1
}

fn default_min_font_size() -> f64 {
    1.0
}

impl Default for ReconstructionConfig {
    fn default() -> Self {
        Self {
            raster_scale: default_raster_scale(),
            language: default_language(),
            low_confidence_threshold: default_low_confidence_threshold(),
            scan_detection_page_cap: default_scan_detection_page_cap(),
            min_word_confidence: 0.0,
            text_alpha: default_text_alpha(),
            min_font_size: default_min_font_size(),
        }
    }
}

impl ReconstructionConfig {
    /// Load configuration from a TOML file.
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        let config: Self = toml::from_str(&content)
            .map_err(|e| DurchsichtError::validation_with_source("invalid TOML configuration", e))?;
        config.validate()?;
        Ok(config)
    }

    /// Check invariants the pipeline relies on.
    pub fn validate(&self) -> Result<()> {
        if !self.raster_scale.is_finite() || self.raster_scale <= 0.0 {
            return Err(DurchsichtError::validation(format!(
                "raster_scale must be positive, got {}",
                self.raster_scale
            )));
        }
        if self.language.trim().is_empty() {
            return Err(DurchsichtError::validation("language must not be empty"));
        }
        if !(0.0..=100.0).contains(&self.low_confidence_threshold) {
            return Err(DurchsichtError::validation(format!(
                "low_confidence_threshold must be within [0, 100], got {}",
                self.low_confidence_threshold
            )));
        }
        if self.scan_detection_page_cap == 0 {
            return Err(DurchsichtError::validation(
                "scan_detection_page_cap must be at least 1",
            ));
        }
        if !(0.0..=100.0).contains(&self.min_word_confidence) {
            return Err(DurchsichtError::validation(format!(
                "min_word_confidence must be within [0, 100], got {}",
                self.min_word_confidence
            )));
        }
        if !(0.0..=1.0).contains(&self.text_alpha) {
            return Err(DurchsichtError::validation(format!(
                "text_alpha must be within [0, 1], got {}",
                self.text_alpha
            )));
        }
        if !self.min_font_size.is_finite() || self.min_font_size <= 0.0 {
            return Err(DurchsichtError::validation(format!(
                "min_font_size must be positive, got {}",
                self.min_font_size
            )));
        }
        Ok(())
    }
}
