//! Scan detection: does a document need OCR reconstruction at all?
//!
//! Probes up to the first N pages for a native text layer. Any inspected
//! page with non-empty text classifies the whole document as text-bearing
//! and stops the probe early; a document whose leading pages are
//! text-bearing is trusted to be text-bearing throughout. That bounds probe
//! latency on large documents at the cost of full-document certainty.
use super::bindings::bind_pdfium;
use super::error::{PdfError, Result};
use super::rendering::classify_load_error;
use pdfium_render::prelude::*;

pub struct ScanProbe {
    pdfium: Pdfium,
}

impl ScanProbe {
    pub fn new() -> Result<Self> {
        let binding = bind_pdfium(PdfError::TextProbeFailed, "text layer probe")?;

        let pdfium = Pdfium::new(binding);
        Ok(Self { pdfium })
    }

    /// Returns `true` when the document looks scanned (no extractable text
    /// on any of the first `page_cap` pages), `false` as soon as one
    /// inspected page yields text. Unparseable input is an error, never a
    /// silent default.
    pub fn needs_ocr(&self, pdf_bytes: &[u8], page_cap: usize) -> Result<bool> {
        let document = self
            .pdfium
            .load_pdf_from_byte_slice(pdf_bytes, None)
            .map_err(classify_load_error)?;

        for (page_index, page) in document.pages().iter().take(page_cap).enumerate() {
            let text = page
                .text()
                .map_err(|e| PdfError::TextProbeFailed(format!("Page text extraction failed: {}", e)))?;

            if !text.all().trim().is_empty() {
                tracing::debug!(page = page_index + 1, "native text layer found, skipping OCR");
                return Ok(false);
            }
        }

        Ok(true)
    }
}

/// Probe a document without holding a long-lived [`ScanProbe`].
pub fn needs_ocr(pdf_bytes: &[u8], page_cap: usize) -> Result<bool> {
    let probe = ScanProbe::new()?;
    probe.needs_ocr(pdf_bytes, page_cap)
}
