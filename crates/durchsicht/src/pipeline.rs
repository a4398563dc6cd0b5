//! Document assembly: the orchestration layer of the reconstruction
//! pipeline.
//!
//! For each source page, in order: rasterize at the configured scale,
//! recognize, reconcile word geometry into output space, and append the
//! synthesized page to the output document. Pages within one document are
//! processed strictly sequentially; the recognition engine is treated as a
//! heavy singleton resource. Independent documents do not serialize against
//! each other: the async entry points run each assembly on the blocking
//! thread pool.
//!
//! Failure policy is whole-document atomicity: any page's rasterize,
//! recognize, or synthesize failure aborts the assembly and surfaces an
//! error naming the page and stage. No partial document is ever emitted.
use std::sync::Arc;

use crate::config::ReconstructionConfig;
use crate::error::{DurchsichtError, Result};
use crate::geometry::{page_point_size, place_word};
use crate::ocr::{RecognitionBackend, RecognitionOptions, TesseractEngine};
use crate::pdf::{self, DocumentWriter, PageRasterizer, TextRun};
use crate::types::{
    CancelFlag, PageRecognition, ProgressCallback, ProgressUpdate, ReconstructionOutput, ReconstructionReport,
};

/// Reject payloads that are not PDF documents before any processing begins.
fn ensure_pdf_payload(payload: &[u8]) -> Result<()> {
    match infer::get(payload) {
        Some(kind) if kind.mime_type() == "application/pdf" => Ok(()),
        Some(kind) => Err(DurchsichtError::UnsupportedFormat(kind.mime_type().to_string())),
        None => Err(DurchsichtError::UnsupportedFormat("unrecognized payload".to_string())),
    }
}

fn report(progress: Option<&ProgressCallback>, page_index: usize, page_count: usize, percent_within_page: f64) {
    if let Some(callback) = progress {
        callback(ProgressUpdate {
            page_index,
            page_count,
            percent_within_page,
        });
    }
}

/// Reconcile one page's recognition result into drawable text runs.
///
/// Words with whitespace-only text or degenerate boxes are skipped; the
/// remainder keeps the engine's emission order.
fn text_runs(recognition: &PageRecognition, scale: f64, page_height: f64, min_font_size: f64) -> Vec<TextRun> {
    let mut runs = Vec::with_capacity(recognition.words.len());

    for word in &recognition.words {
        let text = word.text.trim();
        if text.is_empty() {
            continue;
        }

        match place_word(&word.bbox, scale, page_height, min_font_size) {
            Some(placement) => runs.push(TextRun {
                text: text.to_string(),
                placement,
            }),
            None => {
                tracing::warn!(text = %word.text, "degenerate bounding box, skipping word");
            }
        }
    }

    runs
}

/// Drives the full reconstruction of one source document.
pub struct DocumentReconstructor {
    config: ReconstructionConfig,
    backend: Arc<dyn RecognitionBackend>,
}

impl DocumentReconstructor {
    /// Create a reconstructor backed by the native Tesseract engine.
    pub fn new(config: ReconstructionConfig) -> Result<Self> {
        Self::with_backend(config, Arc::new(TesseractEngine::new()))
    }

    /// Create a reconstructor with a custom recognition backend.
    pub fn with_backend(config: ReconstructionConfig, backend: Arc<dyn RecognitionBackend>) -> Result<Self> {
        config.validate()?;
        Ok(Self { config, backend })
    }

    pub fn config(&self) -> &ReconstructionConfig {
        &self.config
    }

    /// Does this document need OCR reconstruction at all?
    pub fn needs_ocr(&self, payload: &[u8]) -> Result<bool> {
        ensure_pdf_payload(payload)?;
        Ok(pdf::needs_ocr(payload, self.config.scan_detection_page_cap)?)
    }

    /// Reconstruct a scanned document into a searchable one.
    ///
    /// `progress` is observability only. `cancel` is checked between pages;
    /// a cancelled run returns [`DurchsichtError::Cancelled`] and emits no
    /// output bytes.
    pub fn reconstruct(
        &self,
        payload: &[u8],
        progress: Option<&ProgressCallback>,
        cancel: Option<&CancelFlag>,
    ) -> Result<ReconstructionOutput> {
        ensure_pdf_payload(payload)?;

        let rasterizer = PageRasterizer::new()?;
        let page_count = rasterizer.page_count(payload)?;
        let scale = self.config.raster_scale;

        let options = RecognitionOptions {
            language: self.config.language.clone(),
            min_word_confidence: self.config.min_word_confidence,
        };

        let mut writer = DocumentWriter::new(self.config.text_alpha);
        let mut confidences = Vec::with_capacity(page_count);

        for page_index in 0..page_count {
            let page_number = page_index + 1;

            if let Some(flag) = cancel {
                if flag.is_cancelled() {
                    tracing::info!(page = page_number, "reconstruction cancelled");
                    return Err(DurchsichtError::Cancelled { page: page_number });
                }
            }

            report(progress, page_index, page_count, 0.0);

            let raster = rasterizer
                .render_page(payload, page_index, scale)
                .map_err(|e| DurchsichtError::page_render(page_number, e))?;

            // report() is a no-op without a caller callback, so the engine
            // can always be handed a progress hook
            let page_progress = |percent: f64| report(progress, page_index, page_count, percent);
            let recognition = self
                .backend
                .recognize(&raster.image, &options, Some(&page_progress))
                .map_err(|e| DurchsichtError::recognition(page_number, e))?;

            let (_, page_height) = page_point_size(raster.pixel_width, raster.pixel_height, scale);
            let runs = text_runs(&recognition, scale, page_height, self.config.min_font_size);

            tracing::debug!(
                page = page_number,
                words = runs.len(),
                confidence = recognition.confidence,
                "page synthesized"
            );

            writer
                .add_page(&raster, scale, &runs)
                .map_err(DurchsichtError::synthesis)?;
            confidences.push(recognition.confidence);

            report(progress, page_index, page_count, 100.0);
            // raster buffer dropped here; no page's image outlives its synthesis
        }

        let summary = ReconstructionReport::from_confidences(confidences, self.config.low_confidence_threshold);
        let pdf = writer.finish().map_err(DurchsichtError::synthesis)?;

        Ok(ReconstructionOutput { pdf, report: summary })
    }
}

/// Reconstruct a document synchronously with default backend wiring.
pub fn reconstruct_bytes_sync(payload: &[u8], config: &ReconstructionConfig) -> Result<ReconstructionOutput> {
    DocumentReconstructor::new(config.clone())?.reconstruct(payload, None, None)
}

/// Reconstruct a document on the blocking thread pool.
pub async fn reconstruct_bytes(payload: Vec<u8>, config: ReconstructionConfig) -> Result<ReconstructionOutput> {
    tokio::task::spawn_blocking(move || reconstruct_bytes_sync(&payload, &config))
        .await
        .map_err(|e| DurchsichtError::Synthesis {
            message: format!("Reconstruction task panicked: {}", e),
            source: None,
        })?
}

/// Reconstruct with progress reporting and cooperative cancellation.
pub async fn reconstruct_bytes_with_progress(
    payload: Vec<u8>,
    config: ReconstructionConfig,
    progress: Arc<ProgressCallback>,
    cancel: Option<CancelFlag>,
) -> Result<ReconstructionOutput> {
    tokio::task::spawn_blocking(move || {
        let reconstructor = DocumentReconstructor::new(config)?;
        reconstructor.reconstruct(&payload, Some(progress.as_ref()), cancel.as_ref())
    })
    .await
    .map_err(|e| DurchsichtError::Synthesis {
        message: format!("Reconstruction task panicked: {}", e),
        source: None,
    })?
}

/// Read and reconstruct a document from the filesystem.
pub async fn reconstruct_file(path: impl AsRef<std::path::Path>, config: ReconstructionConfig) -> Result<ReconstructionOutput> {
    let payload = tokio::fs::read(path.as_ref()).await?;
    reconstruct_bytes(payload, config).await
}

/// Probe a document for a native text layer synchronously.
pub fn needs_ocr_sync(payload: &[u8], config: &ReconstructionConfig) -> Result<bool> {
    DocumentReconstructor::new(config.clone())?.needs_ocr(payload)
}

/// Probe a document for a native text layer on the blocking thread pool.
pub async fn needs_ocr_bytes(payload: Vec<u8>, config: ReconstructionConfig) -> Result<bool> {
    tokio::task::spawn_blocking(move || needs_ocr_sync(&payload, &config))
        .await
        .map_err(|e| DurchsichtError::Synthesis {
            message: format!("Probe task panicked: {}", e),
            source: None,
        })?
}
