//! Tesseract TSV parsing.
//!
//! Tesseract's TSV output carries one row per layout element with the
//! element's level in the first column; level 5 rows are words and carry the
//! geometry this pipeline places text with: `left top width height` in
//! pixels from the image's top-left corner, plus a confidence.
use super::error::OcrError;
use crate::types::{RecognizedWord, WordBox};

pub(crate) const TSV_WORD_LEVEL: u32 = 5;
pub(crate) const TSV_MIN_FIELDS: usize = 12;

/// Extract word-level boxes from Tesseract TSV output.
///
/// Rows below `min_confidence`, non-word rows, and rows whose text trims to
/// empty are dropped. Emission order is preserved.
pub fn parse_word_boxes(tsv_data: &str, min_confidence: f64) -> Result<Vec<RecognizedWord>, OcrError> {
    let mut words = Vec::new();

    for (line_num, line) in tsv_data.lines().enumerate() {
        if line_num == 0 {
            continue;
        }

        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let fields: Vec<&str> = line.split('\t').collect();
        if fields.len() < TSV_MIN_FIELDS {
            continue;
        }

        let level = fields[0].parse::<u32>().unwrap_or(0);
        if level != TSV_WORD_LEVEL {
            continue;
        }

        let confidence = fields[10].parse::<f64>().unwrap_or(-1.0);
        if confidence < min_confidence {
            continue;
        }

        let text = fields[11].trim();
        if text.is_empty() {
            continue;
        }

        let left = fields[6].parse::<f64>().unwrap_or(0.0);
        let top = fields[7].parse::<f64>().unwrap_or(0.0);
        let width = fields[8].parse::<f64>().unwrap_or(0.0);
        let height = fields[9].parse::<f64>().unwrap_or(0.0);

        words.push(RecognizedWord {
            text: text.to_string(),
            bbox: WordBox::new(left, top, left + width, top + height),
            confidence,
        });
    }

    Ok(words)
}

/// Mean word confidence, or 0.0 for a page with no words.
pub fn mean_confidence(words: &[RecognizedWord]) -> f64 {
    if words.is_empty() {
        return 0.0;
    }
    words.iter().map(|w| w.confidence).sum::<f64>() / words.len() as f64
}
