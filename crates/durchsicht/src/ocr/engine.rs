//! Native Tesseract recognition backend.
//!
//! Wraps the `kreuzberg-tesseract` bindings behind the [`RecognitionBackend`]
//! trait so the pipeline can be exercised against stub engines in tests.
use std::env;
use std::path::Path;

use image::DynamicImage;
use kreuzberg_tesseract::{TessPageSegMode, TesseractAPI};

use super::error::OcrError;
use super::tsv::{mean_confidence, parse_word_boxes};
use crate::types::PageRecognition;

/// Automatic page segmentation; the pipeline always recognizes whole pages.
const PAGE_SEG_MODE: i32 = 3;

/// Options forwarded to the recognition engine for one page.
#[derive(Debug, Clone)]
pub struct RecognitionOptions {
    /// Tesseract language code (e.g. "eng").
    pub language: String,
    /// Words below this confidence are dropped from the result.
    pub min_word_confidence: f64,
}

impl Default for RecognitionOptions {
    fn default() -> Self {
        Self {
            language: "eng".to_string(),
            min_word_confidence: 0.0,
        }
    }
}

/// Engine-level progress callback, invoked with monotonically non-decreasing
/// values in `[0, 100]`. Observability only, never control flow.
pub type RecognitionProgress = dyn Fn(f64) + Send + Sync;

/// A text-recognition capability: image in, page-level result out.
///
/// The result's word order is the engine's emission order and must be
/// preserved by implementations; the pipeline relies on it for determinism.
pub trait RecognitionBackend: Send + Sync {
    fn recognize(
        &self,
        image: &DynamicImage,
        options: &RecognitionOptions,
        on_progress: Option<&RecognitionProgress>,
    ) -> Result<PageRecognition, OcrError>;
}

/// Recognition backend backed by a native Tesseract installation.
#[derive(Debug, Default)]
pub struct TesseractEngine;

impl TesseractEngine {
    pub fn new() -> Self {
        Self
    }
}

fn report(on_progress: Option<&RecognitionProgress>, percent: f64) {
    if let Some(callback) = on_progress {
        callback(percent);
    }
}

fn strip_control_characters(text: &str) -> String {
    if text
        .chars()
        .any(|c| matches!(c, '\u{0000}'..='\u{001F}' | '\u{007F}') && c != '\n' && c != '\r' && c != '\t')
    {
        text.chars()
            .filter(|c| !matches!(c, '\u{0000}'..='\u{001F}' | '\u{007F}') || matches!(c, '\n' | '\r' | '\t'))
            .collect()
    } else {
        text.to_string()
    }
}

fn resolve_tessdata_path() -> String {
    let fallback_paths = [
        "/opt/homebrew/share/tessdata",
        "/opt/homebrew/opt/tesseract/share/tessdata",
        "/usr/local/opt/tesseract/share/tessdata",
        "/usr/share/tesseract-ocr/5/tessdata",
        "/usr/share/tesseract-ocr/4/tessdata",
        "/usr/share/tessdata",
        "/usr/local/share/tessdata",
        r#"C:\Program Files\Tesseract-OCR\tessdata"#,
        r#"C:\ProgramData\Tesseract-OCR\tessdata"#,
    ];

    env::var("TESSDATA_PREFIX")
        .ok()
        .or_else(|| {
            fallback_paths
                .iter()
                .find(|p| Path::new(p).exists())
                .map(|p| (*p).to_string())
        })
        .unwrap_or_default()
}

/// Reject configurations that are known to crash the native bindings
/// instead of returning an error (empty language, missing traineddata).
fn validate_language(language: &str, tessdata_path: &str) -> Result<(), OcrError> {
    if language.trim().is_empty() {
        return Err(OcrError::InitializationFailed(
            "Language cannot be empty. Please specify a valid language code (e.g., 'eng')".to_string(),
        ));
    }

    if !tessdata_path.is_empty() {
        for lang in language.split('+') {
            let lang = lang.trim();
            if lang.is_empty() {
                continue;
            }
            let traineddata_path = Path::new(tessdata_path).join(format!("{}.traineddata", lang));
            if !traineddata_path.exists() {
                return Err(OcrError::InitializationFailed(format!(
                    "Language '{}' not found. Traineddata file does not exist: {}",
                    lang,
                    traineddata_path.display()
                )));
            }
        }
    }

    Ok(())
}

impl RecognitionBackend for TesseractEngine {
    fn recognize(
        &self,
        image: &DynamicImage,
        options: &RecognitionOptions,
        on_progress: Option<&RecognitionProgress>,
    ) -> Result<PageRecognition, OcrError> {
        report(on_progress, 0.0);

        let rgb_image = image.to_rgb8();
        let (width, height) = rgb_image.dimensions();
        let bytes_per_pixel = 3;
        let bytes_per_line = width * bytes_per_pixel;

        let tessdata_path = resolve_tessdata_path();
        validate_language(&options.language, &tessdata_path)?;

        let api = TesseractAPI::new();
        api.init(&tessdata_path, &options.language).map_err(|e| {
            OcrError::InitializationFailed(format!(
                "Failed to initialize language '{}': {}",
                options.language, e
            ))
        })?;

        api.set_page_seg_mode(TessPageSegMode::from_int(PAGE_SEG_MODE))
            .map_err(|e| OcrError::InvalidConfiguration(format!("Failed to set PSM mode: {}", e)))?;

        api.set_image(
            rgb_image.as_raw(),
            width as i32,
            height as i32,
            bytes_per_pixel as i32,
            bytes_per_line as i32,
        )
        .map_err(|e| OcrError::ProcessingFailed(format!("Failed to set image: {}", e)))?;

        report(on_progress, 25.0);

        api.recognize()
            .map_err(|e| OcrError::ProcessingFailed(format!("Failed to recognize text: {}", e)))?;

        report(on_progress, 75.0);

        let tsv = api
            .get_tsv_text(0)
            .map_err(|e| OcrError::ProcessingFailed(format!("Failed to extract TSV: {}", e)))?;
        let raw_text = api
            .get_utf8_text()
            .map_err(|e| OcrError::ProcessingFailed(format!("Failed to extract text: {}", e)))?;

        let words = parse_word_boxes(&tsv, options.min_word_confidence)?;
        let confidence = mean_confidence(&words);

        tracing::debug!(
            words = words.len(),
            confidence,
            width,
            height,
            "page recognition complete"
        );

        report(on_progress, 100.0);

        Ok(PageRecognition {
            full_text: strip_control_characters(&raw_text),
            words,
            confidence,
            pixel_width: width,
            pixel_height: height,
        })
    }
}
