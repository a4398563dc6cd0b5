//! Public data model shared across the reconstruction pipeline.
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// Axis-aligned bounding box in recognition space: pixel offsets from the
/// top-left corner of the rasterized page, with `x1 >= x0` and `y1 >= y0`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WordBox {
    pub x0: f64,
    pub y0: f64,
    pub x1: f64,
    pub y1: f64,
}

impl WordBox {
    pub fn new(x0: f64, y0: f64, x1: f64, y1: f64) -> Self {
        Self { x0, y0, x1, y1 }
    }

    pub fn width(&self) -> f64 {
        self.x1 - self.x0
    }

    pub fn height(&self) -> f64 {
        self.y1 - self.y0
    }

    /// A box that cannot anchor a text run: zero or negative extent on
    /// either axis. Such boxes are skipped with a warning, never drawn.
    pub fn is_degenerate(&self) -> bool {
        self.width() <= 0.0 || self.height() <= 0.0
    }
}

/// One recognized token with its geometry and engine-reported confidence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecognizedWord {
    pub text: String,
    pub bbox: WordBox,
    /// Engine confidence in `[0, 100]`, passed through unrecalibrated.
    pub confidence: f64,
}

/// One page's recognition output.
///
/// `words` preserves the engine's emission order. `full_text` is diagnostic
/// only and never used for placement. Produced once per page and consumed
/// exactly once by the page synthesizer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageRecognition {
    pub full_text: String,
    pub words: Vec<RecognizedWord>,
    /// Page-level aggregate confidence in `[0, 100]`.
    pub confidence: f64,
    /// Dimensions of the rasterized image this result was computed from.
    pub pixel_width: u32,
    pub pixel_height: u32,
}

/// Advisory sidecar returned with every successful reconstruction.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReconstructionReport {
    /// Aggregate confidence per page, in source page order.
    pub per_page_confidence: Vec<f64>,
    /// 1-based indices of pages whose confidence fell below the configured
    /// threshold. Always present, even when empty.
    pub low_confidence_pages: Vec<usize>,
}

impl ReconstructionReport {
    /// Flag every page whose confidence falls below `threshold`.
    pub fn from_confidences(per_page_confidence: Vec<f64>, threshold: f64) -> Self {
        let low_confidence_pages = per_page_confidence
            .iter()
            .enumerate()
            .filter(|(_, confidence)| **confidence < threshold)
            .map(|(index, _)| index + 1)
            .collect();

        Self {
            per_page_confidence,
            low_confidence_pages,
        }
    }
}

/// Result of a full document reconstruction: serialized PDF bytes plus the
/// advisory confidence report.
#[derive(Debug, Clone)]
pub struct ReconstructionOutput {
    pub pdf: Vec<u8>,
    pub report: ReconstructionReport,
}

/// Progress notification pushed to the caller during assembly.
///
/// Observability only; never used for control flow. `percent_within_page`
/// is monotonically non-decreasing within one page's processing.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProgressUpdate {
    /// 0-based index of the page currently being processed.
    pub page_index: usize,
    pub page_count: usize,
    /// Progress through the current page in `[0, 100]`.
    pub percent_within_page: f64,
}

/// Callback type for document-level progress reporting.
pub type ProgressCallback = dyn Fn(ProgressUpdate) + Send + Sync;

/// Cooperative cancellation flag checked between pages.
///
/// Cancellation observed between pages aborts the assembly before the next
/// page's rasterization starts; no partial output document is emitted.
#[derive(Debug, Clone, Default)]
pub struct CancelFlag(Arc<AtomicBool>);

impl CancelFlag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_word_box_dimensions() {
        let bbox = WordBox::new(100.0, 50.0, 180.0, 80.0);
        assert_eq!(bbox.width(), 80.0);
        assert_eq!(bbox.height(), 30.0);
        assert!(!bbox.is_degenerate());
    }

    #[test]
    fn test_word_box_degenerate_zero_height() {
        let bbox = WordBox::new(100.0, 50.0, 180.0, 50.0);
        assert!(bbox.is_degenerate());
    }

    #[test]
    fn test_word_box_degenerate_negative_width() {
        let bbox = WordBox::new(180.0, 50.0, 100.0, 80.0);
        assert!(bbox.is_degenerate());
    }

    #[test]
    fn test_report_flags_low_confidence_pages() {
        let report = ReconstructionReport::from_confidences(vec![95.0, 60.0, 72.0, 40.0], 70.0);
        assert_eq!(report.low_confidence_pages, vec![2, 4]);
        assert_eq!(report.per_page_confidence.len(), 4);
    }

    #[test]
    fn test_report_empty_when_all_pages_confident() {
        let report = ReconstructionReport::from_confidences(vec![90.0, 85.0], 70.0);
        assert!(report.low_confidence_pages.is_empty());
    }

    #[test]
    fn test_report_threshold_is_exclusive() {
        let report = ReconstructionReport::from_confidences(vec![70.0, 69.9], 70.0);
        assert_eq!(report.low_confidence_pages, vec![2]);
    }

    #[test]
    fn test_report_empty_document() {
        let report = ReconstructionReport::from_confidences(vec![], 70.0);
        assert!(report.per_page_confidence.is_empty());
        assert!(report.low_confidence_pages.is_empty());
    }

    #[test]
    fn test_cancel_flag_roundtrip() {
        let flag = CancelFlag::new();
        assert!(!flag.is_cancelled());

        let shared = flag.clone();
        shared.cancel();
        assert!(flag.is_cancelled());
    }
}
